//! Serialized shapes: the API payload and saved per-user tables.

use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::column::{Column, ColumnKind};
use crate::entity::Entity;
use crate::ids::{CellId, ColumnId, EntityId, UserId};
use crate::ordering::{column_sort_index_for, sort_index_for};
use crate::table::TableModel;

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRecord {
    pub id: EntityId,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_name: Option<String>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub sort_index: i64,
    #[serde(default)]
    pub show_beside_column_header: bool,
    #[serde(default = "default_true")]
    pub is_real_entity: bool,
}

impl From<&Entity> for EntityRecord {
    fn from(entity: &Entity) -> Self {
        Self {
            id: entity.id,
            display_name: entity.display_name.clone(),
            full_name: entity.full_name.clone(),
            external_name: entity.external_name.clone(),
            hidden: entity.hidden,
            sort_index: entity.sort_index,
            show_beside_column_header: entity.show_beside_column_header,
            is_real_entity: entity.is_real_entity,
        }
    }
}

impl From<EntityRecord> for Entity {
    fn from(record: EntityRecord) -> Self {
        Self {
            id: record.id,
            display_name: record.display_name,
            full_name: record.full_name.filter(|name| !name.is_empty()),
            external_name: record.external_name.filter(|name| !name.is_empty()),
            hidden: record.hidden,
            sort_index: record.sort_index,
            show_beside_column_header: record.show_beside_column_header,
            is_real_entity: record.is_real_entity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnRecord {
    pub id: ColumnId,
    pub key: String,
    /// Empty falls back to `key`.
    #[serde(default)]
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub sort_index: i64,
    #[serde(default)]
    pub is_info_field: bool,
    #[serde(default)]
    pub show_beside_entity_name: bool,
}

impl From<&Column> for ColumnRecord {
    fn from(column: &Column) -> Self {
        Self {
            id: column.id,
            key: column.key.clone(),
            full_name: column.full_name.clone(),
            notes: column.notes.clone(),
            hidden: column.hidden,
            sort_index: column.sort_index,
            is_info_field: column.is_info_field(),
            show_beside_entity_name: column.show_beside_entity_name,
        }
    }
}

impl From<ColumnRecord> for Column {
    fn from(record: ColumnRecord) -> Self {
        let full_name = if record.full_name.is_empty() {
            record.key.clone()
        } else {
            record.full_name
        };
        Self {
            id: record.id,
            key: record.key,
            full_name,
            notes: record.notes.filter(|notes| !notes.is_empty()),
            hidden: record.hidden,
            sort_index: record.sort_index,
            kind: if record.is_info_field {
                ColumnKind::InfoField
            } else {
                ColumnKind::Metric
            },
            show_beside_entity_name: record.show_beside_entity_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellRecord {
    /// Derived from the two ids when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CellId>,
    pub entity_id: EntityId,
    pub column_id: ColumnId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl From<&Cell> for CellRecord {
    fn from(cell: &Cell) -> Self {
        Self {
            id: Some(cell.id()),
            entity_id: cell.entity_id,
            column_id: cell.column_id,
            value: cell.value.clone(),
            notes: cell.notes.clone(),
        }
    }
}

/// The table as exchanged with API clients and stored in state files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TablePayload {
    #[serde(default)]
    pub entities: Vec<EntityRecord>,
    #[serde(default)]
    pub columns: Vec<ColumnRecord>,
    #[serde(default)]
    pub cells: Vec<CellRecord>,
    #[serde(default)]
    pub entity_order: Vec<EntityId>,
    #[serde(default)]
    pub column_order: Vec<ColumnId>,
    #[serde(default)]
    pub hidden_entities: Vec<EntityId>,
    #[serde(default)]
    pub hidden_columns: Vec<ColumnId>,
}

/// A table saved under a user's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedTable {
    pub user_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_default: bool,
    pub table: TablePayload,
}

impl SavedTable {
    pub fn new(user_id: UserId, table: TablePayload) -> Self {
        Self {
            user_id,
            name: None,
            description: None,
            is_default: false,
            table,
        }
    }
}

impl TableModel {
    /// Payload with the current order baked into every sort index and the
    /// session overlay folded into the hidden flags.
    pub fn snapshot(&self) -> TablePayload {
        let session = self.session();
        let entities = self
            .entities()
            .map(|entity| {
                let mut record = EntityRecord::from(entity);
                record.sort_index = sort_index_for(self.entity_order(), &entity.id);
                record.hidden = entity.hidden || session.is_entity_hidden(entity.id);
                record
            })
            .collect();
        let columns = self
            .columns()
            .map(|column| {
                let mut record = ColumnRecord::from(column);
                record.sort_index = column_sort_index_for(self.column_order(), &column.id);
                record.hidden = column.hidden || session.is_column_hidden(column.id);
                record
            })
            .collect();
        TablePayload {
            entities,
            columns,
            cells: self.cells().map(CellRecord::from).collect(),
            entity_order: self.entity_order().to_vec(),
            column_order: self.column_order().to_vec(),
            hidden_entities: session.hidden_entities.iter().copied().collect(),
            hidden_columns: session.hidden_columns.iter().copied().collect(),
        }
    }
}
