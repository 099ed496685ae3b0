//! Decoding of the API payload shape.

use std::collections::BTreeSet;

use ranktab_model::{Column, Diagnostic, Entity, SessionOverlay, TablePayload};

use crate::decode::Decoded;
use crate::error::Result;

/// Parse a JSON payload and decode it.
pub fn decode_payload_json(json: &str) -> Result<Decoded> {
    let payload: TablePayload = serde_json::from_str(json)?;
    decode_payload(payload)
}

/// Build a table from the payload shape.
///
/// Duplicate ids, dangling cells and duplicate cells are skipped with a
/// diagnostic. Empty order lists are derived from the records' sort indexes.
pub fn decode_payload(payload: TablePayload) -> Result<Decoded> {
    let _span = tracing::info_span!("decode_payload").entered();
    let mut decoded = Decoded::default();
    let report = &mut decoded.report;
    let model = &mut decoded.model;

    for record in payload.entities {
        let id = record.id;
        if model.entity(id).is_some() {
            tracing::warn!(%id, "Duplicate entity id in payload");
            report.push(Diagnostic::warning(format!("entity {id}"), "duplicate entity id"));
            report.counts.entities.skipped += 1;
            continue;
        }
        model.insert_entity(Entity::from(record))?;
        report.counts.entities.created += 1;
    }

    for record in payload.columns {
        let id = record.id;
        if model.column(id).is_some() {
            tracing::warn!(%id, "Duplicate column id in payload");
            report.push(Diagnostic::warning(format!("column {id}"), "duplicate column id"));
            report.counts.columns.skipped += 1;
            continue;
        }
        model.insert_column(Column::from(record))?;
        report.counts.columns.created += 1;
    }

    for record in payload.cells {
        let (entity, column) = (record.entity_id, record.column_id);
        let subject = format!("cell {entity}_{column}");
        let problem = if model.entity(entity).is_none() {
            Some(format!("unknown entity id {entity}"))
        } else if model.column(column).is_none() {
            Some(format!("unknown column id {column}"))
        } else if model.get_cell(entity, column).is_some() {
            Some("duplicate cell".to_string())
        } else {
            None
        };
        if let Some(message) = problem {
            tracing::warn!(cell = %subject, "{message}");
            report.push(Diagnostic::warning(subject, message));
            report.counts.cells.skipped += 1;
            continue;
        }
        if let Some(stated) = record
            .id
            .filter(|stated| stated.entity != entity || stated.column != column)
        {
            tracing::debug!(%stated, "Cell id disagrees with its entity and column; using derived id");
        }
        model.upsert_cell(entity, column, record.value, record.notes)?;
        report.counts.cells.created += 1;
    }

    let entity_order = if payload.entity_order.is_empty() {
        order_by_sort_index(model.entities().map(|e| (e.id, e.sort_index)).collect())
    } else {
        payload.entity_order
    };
    let column_order = if payload.column_order.is_empty() {
        order_by_sort_index(model.columns().map(|c| (c.id, c.sort_index)).collect())
    } else {
        payload.column_order
    };
    model.set_entity_order(entity_order);
    model.set_column_order(column_order);

    let hidden_entities: BTreeSet<_> = payload
        .hidden_entities
        .into_iter()
        .filter(|id| model.entity(*id).is_some())
        .collect();
    let hidden_columns: BTreeSet<_> = payload
        .hidden_columns
        .into_iter()
        .filter(|id| model.column(*id).is_some())
        .collect();
    model.set_session(SessionOverlay {
        hidden_entities,
        hidden_columns,
    });

    tracing::info!(
        entities = report.counts.entities.created,
        columns = report.counts.columns.created,
        cells = report.counts.cells.created,
        skipped = report.diagnostics.len(),
        "Decoded table payload"
    );
    Ok(decoded)
}

/// Ids ordered by sort index, ties kept in record order.
fn order_by_sort_index<K>(mut keyed: Vec<(K, i64)>) -> Vec<K> {
    keyed.sort_by_key(|&(_, sort_index)| sort_index);
    keyed.into_iter().map(|(id, _)| id).collect()
}
