//! Decoding of the self-describing CSV pair into a [`TableModel`].

use std::collections::{HashMap, HashSet};

use ranktab_model::format::{
    HIDDEN_HEADER, ID_HEADER, IS_MODEL_HEADER, NAME_HEADER, SHOW_BESIDE_HEADER_HEADER,
    is_reserved_header, is_yes,
};
use ranktab_model::{
    Column, ColumnId, ColumnKind, ControlRow, Diagnostic, Entity, EntityId, ImportReport,
    TableModel,
};
use ranktab_normalization::{is_date_column, normalize_date_value};

use crate::csv_table::{CsvTable, parse_csv_text};
use crate::error::{CsvFile, IngestError, Result};

/// A decoded table together with what was skipped on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decoded {
    pub model: TableModel,
    pub report: ImportReport,
}

/// Row index of each control row in the main table.
struct ControlRows {
    rows: HashMap<ControlRow, usize>,
}

impl ControlRows {
    fn locate(table: &CsvTable, id_col: usize) -> Result<Self> {
        let mut rows = HashMap::new();
        for (idx, _) in table.rows.iter().enumerate() {
            let Ok(id) = EntityId::parse(table.cell(idx, id_col)) else {
                continue;
            };
            if let Some(row) = ControlRow::from_id(id.get()) {
                rows.entry(row).or_insert(idx);
            }
        }
        let missing: Vec<u32> = ControlRow::ALL
            .iter()
            .filter(|row| !rows.contains_key(row))
            .map(|row| row.id())
            .collect();
        if !missing.is_empty() {
            return Err(IngestError::MissingControlRows { ids: missing });
        }
        Ok(Self { rows })
    }

    fn cell<'a>(&self, table: &'a CsvTable, row: ControlRow, column: usize) -> &'a str {
        self.rows
            .get(&row)
            .map_or("", |&idx| table.cell(idx, column))
    }
}

/// Notes file indexed by entity id and header.
struct NotesIndex {
    table: CsvTable,
    rows: HashMap<EntityId, usize>,
}

impl NotesIndex {
    fn parse(text: &str) -> Result<Self> {
        let table = parse_csv_text(text, CsvFile::Notes)?;
        let id_col = table
            .column_index(ID_HEADER)
            .ok_or(IngestError::MissingHeader {
                file: CsvFile::Notes,
                header: ID_HEADER,
            })?;
        let mut rows = HashMap::new();
        for idx in 0..table.rows.len() {
            if let Ok(id) = EntityId::parse(table.cell(idx, id_col)) {
                rows.entry(id).or_insert(idx);
            }
        }
        Ok(Self { table, rows })
    }

    fn notes(&self, entity: EntityId, key: &str) -> &str {
        match (self.rows.get(&entity), self.table.column_index(key)) {
            (Some(&row), Some(col)) => self.table.cell(row, col),
            _ => "",
        }
    }
}

/// A decoded column and its position in the main header.
struct ColumnSlot {
    id: ColumnId,
    key: String,
    header_index: usize,
    is_date: bool,
}

/// Decode the main CSV and the optional notes CSV.
///
/// Structural problems (missing header, missing control row, broken quoting)
/// fail the whole decode. Unresolvable columns and rows are skipped and
/// listed in the returned report.
pub fn decode_csv(main: &str, notes: Option<&str>) -> Result<Decoded> {
    let _span = tracing::info_span!("decode_csv").entered();

    let table = parse_csv_text(main, CsvFile::Main)?;
    let required = |header: &'static str| {
        table.column_index(header).ok_or(IngestError::MissingHeader {
            file: CsvFile::Main,
            header,
        })
    };
    let id_col = required(ID_HEADER)?;
    let name_col = required(NAME_HEADER)?;
    let control = ControlRows::locate(&table, id_col)?;
    let notes = notes.map(NotesIndex::parse).transpose()?;

    let mut decoded = Decoded::default();
    let slots = decode_columns(&table, &control, &mut decoded)?;
    let entities = decode_entities(&table, id_col, name_col, &mut decoded);
    decode_cells(&table, &slots, &entities, notes.as_ref(), &mut decoded)?;

    let counts = decoded.report.counts;
    tracing::info!(
        entities = counts.entities.created,
        columns = counts.columns.created,
        cells = counts.cells.created,
        skipped = decoded.report.diagnostics.len(),
        "Decoded ranking table"
    );
    Ok(decoded)
}

fn skip_column(decoded: &mut Decoded, key: &str, message: String) {
    tracing::warn!(column = %key, "{message}");
    decoded
        .report
        .push(Diagnostic::warning(format!("column \"{key}\""), message));
    decoded.report.counts.columns.skipped += 1;
}

fn decode_columns(
    table: &CsvTable,
    control: &ControlRows,
    decoded: &mut Decoded,
) -> Result<Vec<ColumnSlot>> {
    let mut slots = Vec::new();
    let mut seen_keys = HashSet::new();
    let mut position = 0i64;

    for (header_index, key) in table.headers.iter().enumerate() {
        if is_reserved_header(key) {
            continue;
        }
        if key.is_empty() {
            let message = format!("empty header at position {}", header_index + 1);
            skip_column(decoded, key, message);
            continue;
        }
        if !seen_keys.insert(key.as_str()) {
            skip_column(decoded, key, "duplicate header".to_string());
            continue;
        }
        let raw_id = control.cell(table, ControlRow::ColumnId, header_index);
        let Ok(id) = ColumnId::parse(raw_id) else {
            skip_column(decoded, key, format!("missing or invalid column id {raw_id:?}"));
            continue;
        };
        if decoded.model.column(id).is_some() {
            skip_column(decoded, key, format!("duplicate column id {id}"));
            continue;
        }

        let kind = if is_yes(control.cell(table, ControlRow::IsMetric, header_index)) {
            ColumnKind::Metric
        } else {
            ColumnKind::InfoField
        };
        let full_name = match control.cell(table, ControlRow::FullName, header_index) {
            "" => key.clone(),
            name => name.to_string(),
        };
        let hidden =
            is_yes(control.cell(table, ControlRow::Hidden, header_index)) || id.is_reserved();
        let show_beside =
            is_yes(control.cell(table, ControlRow::ShowBesideEntity, header_index));
        // only accepted columns take a position
        position += 1;
        let mut column = Column::new(id, key.clone(), kind)
            .with_full_name(full_name)
            .with_hidden(hidden)
            .with_show_beside_entity_name(show_beside)
            .with_sort_index(position);
        match control.cell(table, ControlRow::Notes, header_index) {
            "" => {}
            notes => column = column.with_notes(notes),
        }

        let is_date = is_date_column(&column.key, &column.full_name);
        tracing::debug!(column = %key, %id, ?kind, "Decoded column");
        decoded.model.insert_column(column)?;
        decoded.report.counts.columns.created += 1;
        slots.push(ColumnSlot {
            id,
            key: key.clone(),
            header_index,
            is_date,
        });
    }
    Ok(slots)
}

fn decode_entities(
    table: &CsvTable,
    id_col: usize,
    name_col: usize,
    decoded: &mut Decoded,
) -> Vec<(EntityId, usize)> {
    let Some(is_model_col) = table.column_index(IS_MODEL_HEADER) else {
        tracing::warn!("No '{IS_MODEL_HEADER}' column; table has no entity rows");
        decoded.report.push(Diagnostic::warning(
            format!("column \"{IS_MODEL_HEADER}\""),
            "column missing; no entity rows decoded",
        ));
        return Vec::new();
    };
    let hidden_col = table.column_index(HIDDEN_HEADER);
    let show_col = table.column_index(SHOW_BESIDE_HEADER_HEADER);
    let flag_at = |row: usize, col: Option<usize>| col.is_some_and(|c| is_yes(table.cell(row, c)));

    let mut entities = Vec::new();
    let mut position = 0i64;
    for row in 0..table.rows.len() {
        if !is_yes(table.cell(row, is_model_col)) {
            continue;
        }
        let sort_index = position;
        position += 1;
        let subject = format!("row {}", row + 1);
        let raw_id = table.cell(row, id_col);

        let id = match EntityId::parse(raw_id) {
            Ok(id) if id.is_reserved() => {
                tracing::warn!(row = row + 1, %id, "Entity row uses a reserved id");
                decoded.report.push(Diagnostic::error(
                    &subject,
                    format!("entity id {id} collides with a control row"),
                ));
                decoded.report.counts.entities.skipped += 1;
                continue;
            }
            Ok(id) if decoded.model.entity(id).is_some() => {
                tracing::warn!(row = row + 1, %id, "Duplicate entity id");
                decoded
                    .report
                    .push(Diagnostic::warning(&subject, format!("duplicate entity id {id}")));
                decoded.report.counts.entities.skipped += 1;
                continue;
            }
            Ok(id) => id,
            Err(_) => {
                tracing::warn!(row = row + 1, raw_id, "Invalid entity id");
                decoded.report.push(Diagnostic::warning(
                    &subject,
                    format!("missing or invalid entity id {raw_id:?}"),
                ));
                decoded.report.counts.entities.skipped += 1;
                continue;
            }
        };

        let entity = Entity::new(id, table.cell(row, name_col))
            .with_hidden(flag_at(row, hidden_col))
            .with_show_beside_column_header(flag_at(row, show_col))
            .with_sort_index(sort_index);
        // id checked unique above
        if decoded.model.insert_entity(entity).is_ok() {
            decoded.report.counts.entities.created += 1;
            entities.push((id, row));
        }
    }
    entities
}

fn decode_cells(
    table: &CsvTable,
    slots: &[ColumnSlot],
    entities: &[(EntityId, usize)],
    notes: Option<&NotesIndex>,
    decoded: &mut Decoded,
) -> Result<()> {
    for &(entity, row) in entities {
        for slot in slots {
            let raw = table.cell(row, slot.header_index);
            let value = if slot.is_date && !raw.is_empty() {
                normalize_date_value(raw)
            } else {
                raw.to_string()
            };
            let note = notes.map_or("", |index| index.notes(entity, &slot.key));
            if value.is_empty() && note.is_empty() {
                continue;
            }
            decoded
                .model
                .upsert_cell(entity, slot.id, Some(value), Some(note.to_string()))?;
            decoded.report.counts.cells.created += 1;
        }
    }
    Ok(())
}
