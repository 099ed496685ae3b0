use crate::ids::ColumnId;

/// Role of a column in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    /// Benchmark column used for ranking.
    Metric,
    /// Descriptive field rendered next to the entity name (price, context, cutoff).
    InfoField,
}

impl ColumnKind {
    pub fn is_info_field(self) -> bool {
        self == ColumnKind::InfoField
    }
}

/// A named attribute or benchmark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub id: ColumnId,
    /// Stable short name, also the CSV header.
    pub key: String,
    pub full_name: String,
    pub notes: Option<String>,
    pub hidden: bool,
    pub sort_index: i64,
    pub kind: ColumnKind,
    pub show_beside_entity_name: bool,
}

impl Column {
    pub fn new(id: ColumnId, key: impl Into<String>, kind: ColumnKind) -> Self {
        let key = key.into();
        Self {
            id,
            full_name: key.clone(),
            key,
            notes: None,
            hidden: false,
            sort_index: 0,
            kind,
            show_beside_entity_name: false,
        }
    }

    #[must_use]
    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = full_name.into();
        self
    }

    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    #[must_use]
    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    #[must_use]
    pub fn with_sort_index(mut self, sort_index: i64) -> Self {
        self.sort_index = sort_index;
        self
    }

    #[must_use]
    pub fn with_show_beside_entity_name(mut self, enable: bool) -> Self {
        self.show_beside_entity_name = enable;
        self
    }

    pub fn is_info_field(&self) -> bool {
        self.kind.is_info_field()
    }

    pub fn is_reserved(&self) -> bool {
        self.id.is_reserved()
    }
}

/// Fields for a column created through [`TableModel::add_column`](crate::TableModel::add_column).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewColumn {
    pub key: String,
    pub full_name: Option<String>,
    pub notes: Option<String>,
    pub hidden: bool,
    pub kind: ColumnKind,
    pub show_beside_entity_name: bool,
}

impl NewColumn {
    pub fn new(key: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            key: key.into(),
            full_name: None,
            notes: None,
            hidden: false,
            kind,
            show_beside_entity_name: false,
        }
    }
}

/// Partial update of a column; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnPatch {
    pub key: Option<String>,
    pub full_name: Option<String>,
    pub notes: Option<Option<String>>,
    pub hidden: Option<bool>,
    pub kind: Option<ColumnKind>,
    pub show_beside_entity_name: Option<bool>,
}

impl ColumnPatch {
    pub(crate) fn apply(self, column: &mut Column) {
        if let Some(key) = self.key {
            column.key = key;
        }
        if let Some(full_name) = self.full_name {
            column.full_name = full_name;
        }
        if let Some(notes) = self.notes {
            column.notes = notes;
        }
        if let Some(hidden) = self.hidden {
            column.hidden = hidden;
        }
        if let Some(kind) = self.kind {
            column.kind = kind;
        }
        if let Some(show) = self.show_beside_entity_name {
            column.show_beside_entity_name = show;
        }
    }
}
