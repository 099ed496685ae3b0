use crate::ids::EntityId;

/// Whether an entity row carries table data or table metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Reserved control row (id below 10) or structural row kept in storage.
    Control,
    /// A ranked subject shown in the table.
    Real,
}

/// A ranked subject, one row of the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub id: EntityId,
    pub display_name: String,
    pub full_name: Option<String>,
    pub external_name: Option<String>,
    /// Persisted default-hidden flag.
    pub hidden: bool,
    /// Cached position in the entity order list.
    pub sort_index: i64,
    pub show_beside_column_header: bool,
    pub is_real_entity: bool,
}

impl Entity {
    pub fn new(id: EntityId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            full_name: None,
            external_name: None,
            hidden: false,
            sort_index: 0,
            show_beside_column_header: false,
            is_real_entity: true,
        }
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
    pub fn with_show_beside_column_header(mut self, enable: bool) -> Self {
        self.show_beside_column_header = enable;
        self
    }

    #[must_use]
    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }

    #[must_use]
    pub fn with_real_entity(mut self, is_real: bool) -> Self {
        self.is_real_entity = is_real;
        self
    }

    pub fn kind(&self) -> EntityKind {
        if self.id.is_reserved() || !self.is_real_entity {
            EntityKind::Control
        } else {
            EntityKind::Real
        }
    }

    pub fn is_control(&self) -> bool {
        self.kind() == EntityKind::Control
    }
}

/// Fields for an entity created through [`TableModel::add_entity`](crate::TableModel::add_entity).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewEntity {
    pub display_name: String,
    pub full_name: Option<String>,
    pub external_name: Option<String>,
    pub hidden: bool,
    pub show_beside_column_header: bool,
}

impl NewEntity {
    pub fn named(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            ..Self::default()
        }
    }
}

/// Partial update of an entity; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityPatch {
    pub display_name: Option<String>,
    pub full_name: Option<Option<String>>,
    pub external_name: Option<Option<String>>,
    pub hidden: Option<bool>,
    pub show_beside_column_header: Option<bool>,
}

impl EntityPatch {
    pub(crate) fn apply(self, entity: &mut Entity) {
        if let Some(name) = self.display_name {
            entity.display_name = name;
        }
        if let Some(full_name) = self.full_name {
            entity.full_name = full_name;
        }
        if let Some(external_name) = self.external_name {
            entity.external_name = external_name;
        }
        if let Some(hidden) = self.hidden {
            entity.hidden = hidden;
        }
        if let Some(show) = self.show_beside_column_header {
            entity.show_beside_column_header = show;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_and_structural_rows_are_control() {
        let control = Entity::new(EntityId::new(3).unwrap(), "隐藏");
        assert_eq!(control.kind(), EntityKind::Control);

        let structural = Entity::new(EntityId::new(120).unwrap(), "divider").with_real_entity(false);
        assert!(structural.is_control());

        let real = Entity::new(EntityId::new(120).unwrap(), "GPT-4o");
        assert_eq!(real.kind(), EntityKind::Real);
    }
}
