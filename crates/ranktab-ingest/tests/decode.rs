//! Tests for decoding the CSV pair.

use ranktab_ingest::{IngestError, decode_csv};
use ranktab_model::{ColumnId, ColumnKind, EntityId, Severity};

const MAIN: &str = "\
id,模型名,隐藏,价格,MMLU,GPQA,显示在列名旁,isModel
101,GPT-4o,否,$5,70/72,88,,是
102,Claude,否,$3,65?,,是,是
103,Gemini,是,,80,90,,是
1,isDataset,否,否,是,是,,否
2,隐藏,是,否,否,否,,否
3,显示在模型旁,是,是,否,否,,否
4,数据集全名,是,Price,Massive Multitask,Graduate QA,是,否
5,备注,是,,5-shot,,是,否
6,id,1,20,57,58,5,4
";

const NOTES: &str = "\
id,模型名,隐藏,价格,MMLU,GPQA,显示在列名旁,isModel
101,GPT-4o,,,,,,
102,Claude,,,,not reported,,
103,Gemini,,,,,,
6,id,1,20,57,58,5,4
";

fn eid(value: u32) -> EntityId {
    EntityId::new(value).unwrap()
}

fn cid(value: u32) -> ColumnId {
    ColumnId::new(value).unwrap()
}

#[test]
fn decodes_columns_from_control_rows() {
    let decoded = decode_csv(MAIN, Some(NOTES)).expect("decode");
    let model = &decoded.model;

    let price = model.column(cid(20)).unwrap();
    assert_eq!(price.key, "价格");
    assert_eq!(price.kind, ColumnKind::InfoField);
    assert_eq!(price.full_name, "Price");
    assert!(price.show_beside_entity_name);
    assert_eq!(price.sort_index, 1);

    let mmlu = model.column(cid(57)).unwrap();
    assert_eq!(mmlu.kind, ColumnKind::Metric);
    assert_eq!(mmlu.notes.as_deref(), Some("5-shot"));
    assert_eq!(mmlu.sort_index, 2);

    let gpqa = model.column(cid(58)).unwrap();
    assert_eq!(gpqa.notes, None);
    assert_eq!(model.column_order(), &[cid(20), cid(57), cid(58)]);
}

#[test]
fn decodes_entities_and_cells() {
    let decoded = decode_csv(MAIN, Some(NOTES)).expect("decode");
    let model = &decoded.model;

    assert_eq!(model.entity_count(), 3);
    assert!(model.entity(eid(103)).unwrap().hidden);
    assert!(model.entity(eid(102)).unwrap().show_beside_column_header);
    assert_eq!(model.entity(eid(102)).unwrap().sort_index, 1);
    assert_eq!(model.entity_order(), &[eid(101), eid(102), eid(103)]);

    assert_eq!(model.get_cell(eid(101), cid(57)).unwrap().value(), Some("70/72"));
    assert_eq!(model.get_cell(eid(102), cid(57)).unwrap().value(), Some("65?"));
    let notes_only = model.get_cell(eid(102), cid(58)).unwrap();
    assert_eq!(notes_only.value(), None);
    assert_eq!(notes_only.notes(), Some("not reported"));
    assert!(model.get_cell(eid(103), cid(20)).is_none());
    assert_eq!(model.cell_count(), 8);

    let visible: Vec<u32> = model.visible_entities().iter().map(|e| e.id.get()).collect();
    assert_eq!(visible, vec![101, 102]);
    assert!(decoded.report.diagnostics.is_empty());
    assert_eq!(decoded.report.counts.cells.created, 8);
}

#[test]
fn missing_notes_file_is_tolerated() {
    let decoded = decode_csv(MAIN, None).expect("decode");
    assert!(decoded.model.get_cell(eid(102), cid(58)).is_none());
    assert_eq!(decoded.model.cell_count(), 7);
}

#[test]
fn missing_control_row_is_structural_error() {
    let main: String = MAIN
        .lines()
        .filter(|line| !line.starts_with("3,"))
        .map(|line| format!("{line}\n"))
        .collect();
    let err = decode_csv(&main, None).unwrap_err();
    assert!(matches!(err, IngestError::MissingControlRows { ref ids } if ids == &[3]));
}

#[test]
fn required_headers_are_checked() {
    let main = MAIN.replacen("模型名", "name", 1);
    let err = decode_csv(&main, None).unwrap_err();
    assert!(matches!(err, IngestError::MissingHeader { header: "模型名", .. }));
}

#[test]
fn malformed_notes_file_is_hard_error() {
    let err = decode_csv(MAIN, Some("id,模型名\n101,\"GPT\n")).unwrap_err();
    assert!(matches!(err, IngestError::UnbalancedQuotes { .. }));
}

#[test]
fn unresolvable_columns_are_skipped_without_taking_a_position() {
    let main = "\
id,模型名,A,B,isModel
101,X,1,2,是
1,isDataset,是,是,否
2,隐藏,否,否,否
3,显示在模型旁,否,否,否
4,数据集全名,,,否
5,备注,,,否
6,id,abc,31,4
";
    let decoded = decode_csv(main, None).expect("decode");
    assert!(decoded.model.column_by_key("A").is_none());
    let b = decoded.model.column(cid(31)).unwrap();
    assert_eq!(b.sort_index, 1);
    assert_eq!(b.full_name, "B");
    assert_eq!(decoded.report.warning_count(), 1);
    assert_eq!(decoded.report.counts.columns.skipped, 1);
    assert_eq!(decoded.report.diagnostics[0].subject, "column \"A\"");
}

#[test]
fn reserved_and_duplicate_entity_ids_are_skipped() {
    let main = "\
id,模型名,A,isModel
101,X,1,是
7,Collides,2,是
101,Again,3,是
x1,Bad,4,是
1,isDataset,是,否
2,隐藏,否,否
3,显示在模型旁,否,否
4,数据集全名,,否
5,备注,,否
6,id,31,4
";
    let decoded = decode_csv(main, None).expect("decode");
    assert_eq!(decoded.model.entity_count(), 1);
    assert_eq!(decoded.report.error_count(), 1);
    assert_eq!(decoded.report.warning_count(), 2);
    assert_eq!(decoded.report.counts.entities.skipped, 3);
    let error = decoded
        .report
        .diagnostics
        .iter()
        .find(|d| d.severity == Severity::Error)
        .unwrap();
    assert_eq!(error.subject, "row 2");
}

#[test]
fn date_columns_are_normalized_on_decode() {
    let main = "\
id,模型名,Knowledge Cutoff,Score,isModel
101,X,2024/6/1,1/2,是
1,isDataset,否,是,否
2,隐藏,否,否,否
3,显示在模型旁,否,否,否
4,数据集全名,,,否
5,备注,,,否
6,id,30,31,4
";
    let decoded = decode_csv(main, None).expect("decode");
    assert_eq!(decoded.model.get_cell(eid(101), cid(30)).unwrap().value(), Some("2024.6.1"));
    assert_eq!(decoded.model.get_cell(eid(101), cid(31)).unwrap().value(), Some("1/2"));
}

#[test]
fn unequal_record_lengths_are_rejected() {
    let main = MAIN.replacen("101,GPT-4o,否,$5,70/72,88,,是", "101,GPT-4o,否,$5,70/72,88,,是,extra", 1);
    let err = decode_csv(&main, None).unwrap_err();
    assert!(matches!(err, IngestError::CsvParse { .. }));
}
