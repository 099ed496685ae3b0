pub mod cell;
pub mod column;
pub mod entity;
pub mod error;
pub mod format;
pub mod ids;
pub mod ordering;
pub mod payload;
pub mod report;
pub mod table;
pub mod visibility;

pub use cell::Cell;
pub use column::{Column, ColumnKind, ColumnPatch, NewColumn};
pub use entity::{Entity, EntityKind, EntityPatch, NewEntity};
pub use error::{ModelError, Result};
pub use format::ControlRow;
pub use ids::{CellId, ColumnId, EntityId, RESERVED_ID_LIMIT, UserId, is_reserved_id};
pub use ordering::UNORDERED_SORT_INDEX;
pub use payload::{CellRecord, ColumnRecord, EntityRecord, SavedTable, TablePayload};
pub use report::{Diagnostic, ImportCounts, ImportReport, ItemCounts, Severity};
pub use table::{TableModel, Upsert};
pub use visibility::{SessionOverlay, Visibility};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_report_counts() {
        let mut report = ImportReport::default();
        report.push(Diagnostic::warning("column \"x\"", "missing id"));
        report.push(Diagnostic::error("row 7", "reserved entity id"));
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.warning_count(), 1);
        assert!(report.has_errors());
    }

    #[test]
    fn saved_table_serializes() {
        let saved = SavedTable::new(UserId::new("alice").unwrap(), TablePayload::default());
        let json = serde_json::to_string(&saved).expect("serialize saved table");
        assert!(json.contains("\"userId\":\"alice\""));
        let round: SavedTable = serde_json::from_str(&json).expect("deserialize saved table");
        assert_eq!(round, saved);
        assert!(serde_json::from_str::<SavedTable>(r#"{"userId":"a/b","table":{}}"#).is_err());
    }
}
