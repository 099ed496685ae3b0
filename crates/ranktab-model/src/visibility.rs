use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::ids::{ColumnId, EntityId};

/// Effective visibility of a row or a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Control row or control column; never shown.
    Reserved,
    /// Hidden by the persisted flag.
    DefaultHidden,
    /// Hidden by the session overlay only.
    UserHidden,
    Visible,
}

impl Visibility {
    /// Reserved wins over the persisted flag, which wins over the overlay.
    pub fn combine(reserved: bool, persisted_hidden: bool, session_hidden: bool) -> Self {
        if reserved {
            Visibility::Reserved
        } else if persisted_hidden {
            Visibility::DefaultHidden
        } else if session_hidden {
            Visibility::UserHidden
        } else {
            Visibility::Visible
        }
    }

    pub fn is_visible(self) -> bool {
        self == Visibility::Visible
    }
}

/// Per-session hidden ids kept beside the persisted flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionOverlay {
    pub hidden_entities: BTreeSet<EntityId>,
    pub hidden_columns: BTreeSet<ColumnId>,
}

impl SessionOverlay {
    pub fn is_entity_hidden(&self, id: EntityId) -> bool {
        self.hidden_entities.contains(&id)
    }

    pub fn is_column_hidden(&self, id: ColumnId) -> bool {
        self.hidden_columns.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.hidden_entities.is_empty() && self.hidden_columns.is_empty()
    }

    pub fn clear(&mut self) {
        self.hidden_entities.clear();
        self.hidden_columns.clear();
    }
}
