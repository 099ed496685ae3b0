use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use ranktab_model::{
    Cell as TableCell, Column, ColumnKind, Entity, ImportReport, ItemCounts, Severity, TableModel,
};
use ranktab_normalization::{Locale, describe_estimation_in, is_estimated, normalize};

pub fn print_report(report: &ImportReport) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Items"),
        header_cell("Created"),
        header_cell("Updated"),
        header_cell("Skipped"),
        header_cell("Total"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..=4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for (label, counts) in [
        ("Entities", report.counts.entities),
        ("Columns", report.counts.columns),
        ("Cells", report.counts.cells),
    ] {
        table.add_row(counts_row(label, counts));
    }
    println!("{table}");
    print_diagnostics(report);
}

/// Diagnostics only, on stderr.
pub fn print_diagnostics(report: &ImportReport) {
    if report.diagnostics.is_empty() {
        return;
    }
    let mut diagnostics: Vec<_> = report.diagnostics.iter().collect();
    // errors first, otherwise input order
    diagnostics.sort_by_key(|diag| severity_rank(diag.severity));

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Severity"),
        header_cell("Subject"),
        header_cell("Message"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Center);
    for diag in diagnostics {
        table.add_row(vec![
            severity_cell(diag.severity),
            Cell::new(&diag.subject),
            Cell::new(&diag.message),
        ]);
    }
    eprintln!("Diagnostics:");
    eprintln!("{table}");
}

/// Visible entities by visible columns of `kinds`, display values.
pub fn view_table(model: &TableModel, kinds: &[ColumnKind]) -> Table {
    let columns = view_columns(model, kinds);
    let mut table = Table::new();
    let mut header = vec![header_cell("Model")];
    header.extend(columns.iter().map(|column| column_header(column)));
    table.set_header(header);
    apply_table_style(&mut table);
    for index in 1..=columns.len() {
        align_column(&mut table, index, CellAlignment::Right);
    }

    for entity in model.visible_entities() {
        let mut row = vec![entity_cell(model, entity)];
        row.extend(columns.iter().map(|column| {
            model
                .get_cell(entity.id, column.id)
                .and_then(TableCell::value)
                .map_or_else(|| dim_cell("-"), value_cell)
        }));
        table.add_row(row);
    }
    table
}

/// One line per derived cell (estimated or averaged): `<entity> / <column>: <explanation>`.
pub fn estimation_notes(model: &TableModel, kinds: &[ColumnKind], locale: Locale) -> Vec<String> {
    let columns = view_columns(model, kinds);
    let mut notes = Vec::new();
    for entity in model.visible_entities() {
        for column in &columns {
            let Some(raw) = model.get_cell(entity.id, column.id).and_then(TableCell::value) else {
                continue;
            };
            if let Some(text) = describe_estimation_in(raw, locale) {
                let text = text.replace('\n', "; ");
                notes.push(format!("{} / {}: {text}", entity.display_name, column.key));
            }
        }
    }
    notes
}

fn view_columns<'a>(model: &'a TableModel, kinds: &[ColumnKind]) -> Vec<&'a Column> {
    kinds
        .iter()
        .flat_map(|kind| model.visible_columns(*kind))
        .collect()
}

/// Entity name plus the values of columns shown beside it.
fn entity_label(model: &TableModel, entity: &Entity) -> String {
    let beside: Vec<&str> = model
        .all_visible_columns()
        .into_iter()
        .filter(|column| column.show_beside_entity_name)
        .filter_map(|column| model.get_cell(entity.id, column.id).and_then(TableCell::value))
        .collect();
    if beside.is_empty() {
        entity.display_name.clone()
    } else {
        format!("{} ({})", entity.display_name, beside.join(", "))
    }
}

fn entity_cell(model: &TableModel, entity: &Entity) -> Cell {
    let cell = Cell::new(entity_label(model, entity));
    if entity.show_beside_column_header {
        cell.fg(Color::Blue).add_attribute(Attribute::Bold)
    } else {
        cell
    }
}

fn column_header(column: &Column) -> Cell {
    let label = if column.full_name.is_empty() || column.full_name == column.key {
        column.key.clone()
    } else {
        format!("{}\n{}", column.key, column.full_name)
    };
    header_cell(&label)
}

fn value_cell(raw: &str) -> Cell {
    let display = normalize(raw);
    if is_estimated(raw) {
        Cell::new(format!("{display}*")).fg(Color::Yellow)
    } else {
        Cell::new(display)
    }
}

fn counts_row(label: &str, counts: ItemCounts) -> Vec<Cell> {
    vec![
        Cell::new(label)
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold),
        count_cell(counts.created, Color::Green),
        count_cell(counts.updated, Color::Cyan),
        count_cell(counts.skipped, Color::Yellow),
        Cell::new(counts.total()).add_attribute(Attribute::Bold),
    ]
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(160);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn severity_rank(severity: Severity) -> u8 {
    match severity {
        Severity::Error => 0,
        Severity::Warning => 1,
    }
}

fn severity_cell(severity: Severity) -> Cell {
    match severity {
        Severity::Error => Cell::new("ERROR")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        Severity::Warning => Cell::new("WARN").fg(Color::Yellow),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ranktab_model::{ColumnId, EntityId};

    fn model() -> TableModel {
        let mut model = TableModel::new();
        let price = ColumnId::new(20).unwrap();
        let mmlu = ColumnId::new(57).unwrap();
        let gpt = EntityId::new(101).unwrap();
        model
            .insert_column(
                Column::new(price, "价格", ColumnKind::InfoField).with_show_beside_entity_name(true),
            )
            .unwrap();
        model
            .insert_column(Column::new(mmlu, "MMLU", ColumnKind::Metric))
            .unwrap();
        model.insert_entity(Entity::new(gpt, "GPT-4o")).unwrap();
        model
            .upsert_cell(gpt, price, Some("$5".into()), None)
            .unwrap();
        model
            .upsert_cell(gpt, mmlu, Some("70/72?".into()), None)
            .unwrap();
        model
    }

    #[test]
    fn entity_label_carries_beside_values() {
        let model = model();
        let entity = model.entities().next().unwrap();
        assert_eq!(entity_label(&model, entity), "GPT-4o ($5)");
    }

    #[test]
    fn view_table_has_one_row_per_visible_entity() {
        let model = model();
        let mut table = view_table(&model, &[ColumnKind::InfoField, ColumnKind::Metric]);
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.row_iter().count(), 1);
    }

    #[test]
    fn estimation_notes_name_entity_and_column() {
        let notes = estimation_notes(&model(), &[ColumnKind::Metric], Locale::En);
        assert_eq!(notes.len(), 1);
        assert!(notes[0].starts_with("GPT-4o / MMLU: "));
    }
}
