//! Flat export of what the table currently shows.

use csv::{Terminator, WriterBuilder};
use ranktab_model::{Cell, ColumnKind, TableModel};
use ranktab_normalization::normalize;

use crate::error::Result;

const ENTITY_HEADER: &str = "Model";

/// Visible entities by visible columns, info fields first, display values.
pub fn encode_view_csv(model: &TableModel) -> Result<String> {
    let mut columns = model.visible_columns(ColumnKind::InfoField);
    columns.extend(model.visible_columns(ColumnKind::Metric));
    let entities = model.visible_entities();

    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let mut header = Vec::with_capacity(columns.len() + 1);
    header.push(ENTITY_HEADER.to_string());
    header.extend(columns.iter().map(|column| column.key.clone()));
    writer.write_record(&header)?;

    for entity in &entities {
        let mut row = Vec::with_capacity(header.len());
        row.push(entity.display_name.clone());
        row.extend(columns.iter().map(|column| {
            model
                .get_cell(entity.id, column.id)
                .and_then(Cell::value)
                .map(normalize)
                .unwrap_or_default()
        }));
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(csv::IntoInnerError::into_error)?;
    tracing::debug!(entities = entities.len(), columns = columns.len(), "Encoded view CSV");
    Ok(String::from_utf8(bytes)?)
}
