//! Encoding a [`TableModel`] into the self-describing CSV pair.
//!
//! Layout of the main file:
//!
//! ```text
//! id, 模型名, 隐藏, <early info fields>, <metrics>, <late info fields>, 显示在列名旁, isModel
//! <one row per entity>
//! <six control rows, id 1..=6>
//! ```
//!
//! Info fields with a sort index of 5 or less go before the metric block and
//! the rest after it. The notes file repeats the header, carries the cell
//! notes of every entity and ends with the column id row.

use csv::{Terminator, Writer, WriterBuilder};
use ranktab_model::format::{
    HIDDEN_HEADER, ID_HEADER, IS_MODEL_HEADER, NAME_HEADER, SHOW_BESIDE_HEADER_HEADER, YES, flag,
    is_early_info_field,
};
use ranktab_model::{Cell, Column, ColumnKind, ControlRow, Entity, TableModel};

use crate::error::Result;

/// The two CSV documents of an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedTable {
    pub main_csv: String,
    pub notes_csv: String,
}

/// Which rows and columns an export contains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EncodeScope {
    /// Every non-reserved entity and column, hidden ones flagged.
    #[default]
    All,
    /// Only what is currently visible, session overlay applied.
    Visible,
}

/// Encode every non-reserved entity and column.
pub fn encode(model: &TableModel) -> Result<EncodedTable> {
    encode_with(model, EncodeScope::All)
}

pub fn encode_with(model: &TableModel, scope: EncodeScope) -> Result<EncodedTable> {
    let _span = tracing::info_span!("encode", ?scope).entered();
    let (entities, columns) = match scope {
        EncodeScope::All => (model.ordered_entities(), model.ordered_columns()),
        EncodeScope::Visible => (model.visible_entities(), model.all_visible_columns()),
    };
    let columns = layout_columns(&columns);
    let header = header_row(&columns);

    let mut main = csv_writer();
    let mut notes = csv_writer();
    main.write_record(&header)?;
    notes.write_record(&header)?;

    for entity in &entities {
        main.write_record(entity_row(model, entity, &columns))?;
        notes.write_record(notes_row(model, entity, &columns))?;
    }
    for row in ControlRow::ALL {
        main.write_record(control_row(row, &columns))?;
    }
    notes.write_record(control_row(ControlRow::ColumnId, &columns))?;

    let encoded = EncodedTable {
        main_csv: finish(main)?,
        notes_csv: finish(notes)?,
    };
    tracing::info!(
        entities = entities.len(),
        columns = columns.len(),
        bytes = encoded.main_csv.len(),
        "Encoded ranking table"
    );
    Ok(encoded)
}

/// Columns in file order: early info fields, metrics, late info fields.
///
/// Each group keeps the order of `columns`.
pub fn layout_columns<'a>(columns: &[&'a Column]) -> Vec<&'a Column> {
    let early = columns
        .iter()
        .filter(|c| c.kind == ColumnKind::InfoField && is_early_info_field(c.sort_index));
    let metrics = columns.iter().filter(|c| c.kind == ColumnKind::Metric);
    let late = columns
        .iter()
        .filter(|c| c.kind == ColumnKind::InfoField && !is_early_info_field(c.sort_index));
    early.chain(metrics).chain(late).copied().collect()
}

fn header_row(columns: &[&Column]) -> Vec<String> {
    let mut header = vec![
        ID_HEADER.to_string(),
        NAME_HEADER.to_string(),
        HIDDEN_HEADER.to_string(),
    ];
    header.extend(columns.iter().map(|c| c.key.clone()));
    header.push(SHOW_BESIDE_HEADER_HEADER.to_string());
    header.push(IS_MODEL_HEADER.to_string());
    header
}

fn entity_row(model: &TableModel, entity: &Entity, columns: &[&Column]) -> Vec<String> {
    let mut row = vec![
        entity.id.to_string(),
        entity.display_name.clone(),
        flag(entity.hidden).to_string(),
    ];
    row.extend(columns.iter().map(|column| {
        model
            .get_cell(entity.id, column.id)
            .and_then(Cell::value)
            .unwrap_or_default()
            .to_string()
    }));
    let show = if entity.show_beside_column_header { YES } else { "" };
    row.push(show.to_string());
    row.push(YES.to_string());
    row
}

fn notes_row(model: &TableModel, entity: &Entity, columns: &[&Column]) -> Vec<String> {
    let mut row = vec![
        entity.id.to_string(),
        entity.display_name.clone(),
        String::new(),
    ];
    row.extend(columns.iter().map(|column| {
        model
            .get_cell(entity.id, column.id)
            .and_then(Cell::notes)
            .unwrap_or_default()
            .to_string()
    }));
    row.push(String::new());
    row.push(String::new());
    row
}

fn control_row(row: ControlRow, columns: &[&Column]) -> Vec<String> {
    let fixed = row.reserved_cells();
    let mut cells = vec![
        row.id().to_string(),
        row.label().to_string(),
        fixed.hidden.to_string(),
    ];
    cells.extend(columns.iter().map(|column| match row {
        ControlRow::IsMetric => flag(column.kind == ColumnKind::Metric).to_string(),
        ControlRow::Hidden => flag(column.hidden).to_string(),
        ControlRow::ShowBesideEntity => flag(column.show_beside_entity_name).to_string(),
        ControlRow::FullName => column.full_name.clone(),
        ControlRow::Notes => column.notes.clone().unwrap_or_default(),
        ControlRow::ColumnId => column.id.to_string(),
    }));
    cells.push(fixed.show_beside_header.to_string());
    cells.push(fixed.is_model.to_string());
    cells
}

fn csv_writer() -> Writer<Vec<u8>> {
    WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new())
}

fn finish(writer: Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer.into_inner().map_err(csv::IntoInnerError::into_error)?;
    Ok(String::from_utf8(bytes)?)
}
