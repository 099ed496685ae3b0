//! Incremental update of an existing table from a CSV pair.

use ranktab_model::{ColumnPatch, EntityPatch, ImportReport, TableModel, Upsert};

use crate::decode::decode_csv;
use crate::error::Result;

/// Apply a CSV pair on top of `model`.
///
/// Columns and entities are matched by id: known ones are updated in place,
/// new ones are appended to the order lists. Only cells with a non-empty
/// value are applied; their notes replace the stored notes. Cells whose
/// incoming value is empty never clear stored data.
///
/// The CSV is fully decoded before `model` is touched, so a structural error
/// leaves `model` unchanged.
pub fn merge_csv(model: &mut TableModel, main: &str, notes: Option<&str>) -> Result<ImportReport> {
    let _span = tracing::info_span!("merge_csv").entered();
    let incoming = decode_csv(main, notes)?;
    let mut report = ImportReport {
        diagnostics: incoming.report.diagnostics,
        ..ImportReport::default()
    };
    report.counts.entities.skipped = incoming.report.counts.entities.skipped;
    report.counts.columns.skipped = incoming.report.counts.columns.skipped;

    for column in incoming.model.columns() {
        if model.column(column.id).is_some() {
            let patch = ColumnPatch {
                key: Some(column.key.clone()),
                full_name: Some(column.full_name.clone()),
                notes: Some(column.notes.clone()),
                hidden: Some(column.hidden),
                kind: Some(column.kind),
                show_beside_entity_name: Some(column.show_beside_entity_name),
            };
            model.update_column(column.id, patch)?;
            report.counts.columns.updated += 1;
        } else {
            model.insert_column(column.clone())?;
            report.counts.columns.created += 1;
        }
    }

    for entity in incoming.model.entities() {
        if model.entity(entity.id).is_some() {
            let patch = EntityPatch {
                display_name: Some(entity.display_name.clone()),
                hidden: Some(entity.hidden),
                show_beside_column_header: Some(entity.show_beside_column_header),
                ..EntityPatch::default()
            };
            model.update_entity(entity.id, patch)?;
            report.counts.entities.updated += 1;
        } else {
            let mut entity = entity.clone();
            entity.sort_index = model.entity_order().len() as i64;
            model.insert_entity(entity)?;
            report.counts.entities.created += 1;
        }
    }

    for cell in incoming.model.cells() {
        let Some(value) = cell.value.clone() else {
            report.counts.cells.skipped += 1;
            continue;
        };
        match model.upsert_cell(cell.entity_id, cell.column_id, Some(value), cell.notes.clone())? {
            Upsert::Created => report.counts.cells.created += 1,
            Upsert::Updated => report.counts.cells.updated += 1,
            Upsert::Cleared => report.counts.cells.skipped += 1,
        }
    }

    let counts = report.counts;
    tracing::info!(
        entities_created = counts.entities.created,
        entities_updated = counts.entities.updated,
        columns_created = counts.columns.created,
        columns_updated = counts.columns.updated,
        cells_created = counts.cells.created,
        cells_updated = counts.cells.updated,
        "Merged CSV update"
    );
    Ok(report)
}
