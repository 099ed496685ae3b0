use crate::ids::{CellId, ColumnId, EntityId};

/// The value/notes pair stored for one (entity, column).
///
/// `value` keeps the raw text exactly as entered, including `/`-separated
/// sub-values and `?` estimation markers. Aggregation happens only at display
/// time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub entity_id: EntityId,
    pub column_id: ColumnId,
    pub value: Option<String>,
    pub notes: Option<String>,
}

impl Cell {
    pub fn new(entity_id: EntityId, column_id: ColumnId) -> Self {
        Self {
            entity_id,
            column_id,
            value: None,
            notes: None,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = non_empty(value.into());
        self
    }

    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = non_empty(notes.into());
        self
    }

    pub fn id(&self) -> CellId {
        CellId::new(self.entity_id, self.column_id)
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// True when neither a value nor notes are stored.
    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.notes.is_none()
    }
}

/// Empty text is stored as absence.
pub fn non_empty(text: String) -> Option<String> {
    if text.is_empty() { None } else { Some(text) }
}
