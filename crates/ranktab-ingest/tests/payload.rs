//! Tests for payload decoding, incremental merges and file loading.

use std::fs;

use ranktab_ingest::{IngestError, decode_csv, decode_payload_json, merge_csv, read_csv_pair};
use ranktab_model::{ColumnId, EntityId, Visibility};
use tempfile::tempdir;

const MAIN: &str = "\
id,模型名,隐藏,MMLU,GPQA,显示在列名旁,isModel
101,GPT-4o,否,70/72,88,,是
102,Claude,否,65?,,,是
1,isDataset,否,是,是,,否
2,隐藏,是,否,否,,否
3,显示在模型旁,是,否,否,,否
4,数据集全名,是,MMLU,GPQA,是,否
5,备注,是,,,是,否
6,id,1,57,58,5,4
";

fn eid(value: u32) -> EntityId {
    EntityId::new(value).unwrap()
}

fn cid(value: u32) -> ColumnId {
    ColumnId::new(value).unwrap()
}

#[test]
fn payload_accepts_string_ids_and_skips_dangling_cells() {
    let json = r#"{
        "entities": [
            {"id": "102", "displayName": "Claude", "sortIndex": 1},
            {"id": 101, "displayName": "GPT-4o", "sortIndex": 0, "fullName": "GPT-4 omni"},
            {"id": 101, "displayName": "Duplicate"}
        ],
        "columns": [
            {"id": "57", "key": "MMLU", "fullName": "Massive Multitask"},
            {"id": 20, "key": "价格", "isInfoField": true, "hidden": true}
        ],
        "cells": [
            {"entityId": "101", "columnId": "57", "value": "88"},
            {"entityId": 101, "columnId": 57, "value": "89"},
            {"entityId": 999, "columnId": 57, "value": "1"},
            {"id": "102_20", "entityId": 102, "columnId": 20, "notes": "n/a"}
        ],
        "hiddenEntities": [102, 555]
    }"#;
    let decoded = decode_payload_json(json).expect("decode payload");
    let model = &decoded.model;

    assert_eq!(model.entity_order(), &[eid(101), eid(102)]);
    assert_eq!(model.entity(eid(101)).unwrap().full_name.as_deref(), Some("GPT-4 omni"));
    assert_eq!(model.get_cell(eid(101), cid(57)).unwrap().value(), Some("88"));
    assert_eq!(model.get_cell(eid(102), cid(20)).unwrap().notes(), Some("n/a"));
    assert_eq!(model.entity_visibility(eid(102)), Some(Visibility::UserHidden));
    assert_eq!(model.column_visibility(cid(20)), Some(Visibility::DefaultHidden));
    assert_eq!(model.session().hidden_entities.len(), 1);

    assert_eq!(decoded.report.counts.entities.skipped, 1);
    assert_eq!(decoded.report.counts.cells.skipped, 2);
    assert_eq!(decoded.report.warning_count(), 3);
}

#[test]
fn payload_order_lists_win_over_sort_index() {
    let json = r#"{
        "entities": [
            {"id": 101, "displayName": "A", "sortIndex": 0},
            {"id": 102, "displayName": "B", "sortIndex": 1}
        ],
        "entityOrder": [102, 101]
    }"#;
    let decoded = decode_payload_json(json).expect("decode payload");
    let names: Vec<&str> = decoded
        .model
        .visible_entities()
        .iter()
        .map(|e| e.display_name.as_str())
        .collect();
    assert_eq!(names, vec!["B", "A"]);
}

#[test]
fn malformed_json_is_hard_error() {
    let err = decode_payload_json("{\"entities\": [").unwrap_err();
    assert!(matches!(err, IngestError::Json(_)));
}

#[test]
fn merge_updates_and_appends() {
    let mut model = decode_csv(MAIN, None).expect("decode").model;
    let update = "\
id,模型名,隐藏,MMLU,GPQA,HLE,显示在列名旁,isModel
101,GPT-4o (2024-08),否,,90,12,,是
103,Gemini,否,81,,,,是
1,isDataset,否,是,是,是,,否
2,隐藏,是,否,否,否,,否
3,显示在模型旁,是,否,否,否,,否
4,数据集全名,是,MMLU,GPQA,Humanity's Last Exam,是,否
5,备注,是,,,,是,否
6,id,1,57,58,59,5,4
";
    let report = merge_csv(&mut model, update, None).expect("merge");

    assert_eq!(report.counts.entities.created, 1);
    assert_eq!(report.counts.entities.updated, 1);
    assert_eq!(report.counts.columns.created, 1);
    assert_eq!(report.counts.columns.updated, 2);
    assert_eq!(report.counts.cells.created, 2);
    assert_eq!(report.counts.cells.updated, 1);

    assert_eq!(model.entity(eid(101)).unwrap().display_name, "GPT-4o (2024-08)");
    // empty incoming value keeps stored data
    assert_eq!(model.get_cell(eid(101), cid(57)).unwrap().value(), Some("70/72"));
    assert_eq!(model.get_cell(eid(101), cid(58)).unwrap().value(), Some("90"));
    assert_eq!(model.get_cell(eid(103), cid(57)).unwrap().value(), Some("81"));
    assert_eq!(model.entity_order(), &[eid(101), eid(102), eid(103)]);
    assert_eq!(model.column(cid(59)).unwrap().full_name, "Humanity's Last Exam");
}

#[test]
fn merge_replaces_notes_of_applied_cells() {
    let mut model = decode_csv(MAIN, None).expect("decode").model;
    let notes = "\
id,模型名,隐藏,MMLU,GPQA,显示在列名旁,isModel
101,GPT-4o,,5-shot,,,
";
    merge_csv(&mut model, MAIN, Some(notes)).expect("merge");
    assert_eq!(model.get_cell(eid(101), cid(57)).unwrap().notes(), Some("5-shot"));

    merge_csv(&mut model, MAIN, None).expect("merge");
    assert_eq!(model.get_cell(eid(101), cid(57)).unwrap().notes(), None);
}

#[test]
fn merge_error_leaves_model_untouched() {
    let mut model = decode_csv(MAIN, None).expect("decode").model;
    let before = model.clone();
    let broken = MAIN.replace("3,显示在模型旁,是,否,否,,否\n", "");
    assert!(merge_csv(&mut model, &broken, None).is_err());
    assert_eq!(model, before);
}

#[test]
fn reads_pair_and_tolerates_missing_notes() {
    let dir = tempdir().expect("tempdir");
    let main_path = dir.path().join("default-ranking.csv");
    fs::write(&main_path, MAIN).expect("write main");

    let pair = read_csv_pair(&main_path, Some(&dir.path().join("data-notes.csv"))).expect("read");
    assert_eq!(pair.main, MAIN);
    assert!(pair.notes().is_none());

    let err = read_csv_pair(&dir.path().join("missing.csv"), None).unwrap_err();
    assert!(matches!(err, IngestError::FileNotFound { .. }));
}
