//! The in-memory ranking table.

use std::collections::{BTreeMap, HashMap};

use crate::cell::{Cell, non_empty};
use crate::column::{Column, ColumnKind, ColumnPatch, NewColumn};
use crate::entity::{Entity, EntityPatch, NewEntity};
use crate::error::{ModelError, Result};
use crate::ids::{CellId, ColumnId, EntityId};
use crate::ordering::{column_sort_index_for, sort_by_order, sort_index_for};
use crate::visibility::{SessionOverlay, Visibility};

/// Whether an upsert replaced an existing item or created a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Created,
    Updated,
    /// Neither value nor notes given: any stored cell was removed.
    Cleared,
}

/// Entities, columns, cells, the two order lists and the session overlay.
///
/// Entities and columns are never removed individually; [`TableModel::reset`]
/// is the only way to drop them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableModel {
    entities: Vec<Entity>,
    entity_index: HashMap<EntityId, usize>,
    columns: Vec<Column>,
    column_index: HashMap<ColumnId, usize>,
    cells: BTreeMap<CellId, Cell>,
    entity_order: Vec<EntityId>,
    column_order: Vec<ColumnId>,
    session: SessionOverlay,
}

impl TableModel {
    pub fn new() -> Self {
        Self::default()
    }

    // --- entities ---

    /// Store an entity and append its id to the entity order list.
    pub fn insert_entity(&mut self, entity: Entity) -> Result<()> {
        if self.entity_index.contains_key(&entity.id) {
            return Err(ModelError::DuplicateEntity(entity.id));
        }
        let id = entity.id;
        self.entity_index.insert(id, self.entities.len());
        self.entities.push(entity);
        if !self.entity_order.contains(&id) {
            self.entity_order.push(id);
        }
        Ok(())
    }

    /// Create an entity with the next free non-reserved id.
    pub fn add_entity(&mut self, new: NewEntity) -> EntityId {
        let id = EntityId::next_after(self.entity_index.keys().max().copied());
        let mut entity = Entity::new(id, new.display_name)
            .with_hidden(new.hidden)
            .with_show_beside_column_header(new.show_beside_column_header)
            .with_sort_index(self.entity_order.len() as i64);
        entity.full_name = new.full_name;
        entity.external_name = new.external_name;
        self.entity_index.insert(id, self.entities.len());
        self.entities.push(entity);
        self.entity_order.push(id);
        id
    }

    pub fn update_entity(&mut self, id: EntityId, patch: EntityPatch) -> Result<()> {
        let entity = self.entity_mut(id)?;
        patch.apply(entity);
        Ok(())
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entity_index.get(&id).map(|&idx| &self.entities[idx])
    }

    fn entity_mut(&mut self, id: EntityId) -> Result<&mut Entity> {
        let idx = *self
            .entity_index
            .get(&id)
            .ok_or(ModelError::UnknownEntity(id))?;
        Ok(&mut self.entities[idx])
    }

    /// Entities in insertion order, control rows included.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    // --- columns ---

    /// Store a column and append its id to the column order list.
    pub fn insert_column(&mut self, column: Column) -> Result<()> {
        if self.column_index.contains_key(&column.id) {
            return Err(ModelError::DuplicateColumn(column.id));
        }
        let id = column.id;
        self.column_index.insert(id, self.columns.len());
        self.columns.push(column);
        if !self.column_order.contains(&id) {
            self.column_order.push(id);
        }
        Ok(())
    }

    /// Create a column with the next free non-reserved id.
    pub fn add_column(&mut self, new: NewColumn) -> ColumnId {
        let id = ColumnId::next_after(self.column_index.keys().max().copied());
        let full_name = new.full_name.unwrap_or_else(|| new.key.clone());
        let mut column = Column::new(id, new.key, new.kind)
            .with_full_name(full_name)
            .with_hidden(new.hidden)
            .with_show_beside_entity_name(new.show_beside_entity_name)
            .with_sort_index(self.column_order.len() as i64 + 1);
        column.notes = new.notes.and_then(non_empty);
        self.column_index.insert(id, self.columns.len());
        self.columns.push(column);
        self.column_order.push(id);
        id
    }

    pub fn update_column(&mut self, id: ColumnId, patch: ColumnPatch) -> Result<()> {
        let column = self.column_mut(id)?;
        patch.apply(column);
        Ok(())
    }

    pub fn column(&self, id: ColumnId) -> Option<&Column> {
        self.column_index.get(&id).map(|&idx| &self.columns[idx])
    }

    pub fn column_by_key(&self, key: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.key == key)
    }

    fn column_mut(&mut self, id: ColumnId) -> Result<&mut Column> {
        let idx = *self
            .column_index
            .get(&id)
            .ok_or(ModelError::UnknownColumn(id))?;
        Ok(&mut self.columns[idx])
    }

    /// Columns in insertion order, reserved ids included.
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    // --- cells ---

    pub fn get_cell(&self, entity: EntityId, column: ColumnId) -> Option<&Cell> {
        self.cells.get(&CellId::new(entity, column))
    }

    /// Cell lookup by textual ids; `"0101"`, `" 101 "` and `"101"` name the same row.
    pub fn lookup_cell(&self, entity: &str, column: &str) -> Option<&Cell> {
        let entity = EntityId::parse(entity).ok()?;
        let column = ColumnId::parse(column).ok()?;
        self.get_cell(entity, column)
    }

    /// Replace the cell at (entity, column) or create it. Empty text is stored
    /// as absence, and a cell with neither value nor notes is not stored.
    pub fn upsert_cell(
        &mut self,
        entity: EntityId,
        column: ColumnId,
        value: Option<String>,
        notes: Option<String>,
    ) -> Result<Upsert> {
        if !self.entity_index.contains_key(&entity) {
            return Err(ModelError::UnknownEntity(entity));
        }
        if !self.column_index.contains_key(&column) {
            return Err(ModelError::UnknownColumn(column));
        }
        let value = value.and_then(non_empty);
        let notes = notes.and_then(non_empty);
        let id = CellId::new(entity, column);
        if value.is_none() && notes.is_none() {
            self.cells.remove(&id);
            return Ok(Upsert::Cleared);
        }
        match self.cells.get_mut(&id) {
            Some(cell) => {
                cell.value = value;
                cell.notes = notes;
                Ok(Upsert::Updated)
            }
            None => {
                self.cells.insert(
                    id,
                    Cell {
                        entity_id: entity,
                        column_id: column,
                        value,
                        notes,
                    },
                );
                Ok(Upsert::Created)
            }
        }
    }

    /// Cells ordered by (entity id, column id).
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.values()
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Value of the info-field column named `key` for `entity`.
    pub fn info_value(&self, entity: EntityId, key: &str) -> Option<&str> {
        let column = self
            .columns
            .iter()
            .find(|column| column.is_info_field() && column.key == key)?;
        self.get_cell(entity, column.id)?.value()
    }

    // --- ordering ---

    pub fn entity_order(&self) -> &[EntityId] {
        &self.entity_order
    }

    pub fn column_order(&self) -> &[ColumnId] {
        &self.column_order
    }

    /// Replace the entity order list without touching cached sort indexes.
    pub fn set_entity_order(&mut self, order: Vec<EntityId>) {
        self.entity_order = order;
    }

    /// Replace the column order list without touching cached sort indexes.
    pub fn set_column_order(&mut self, order: Vec<ColumnId>) {
        self.column_order = order;
    }

    /// Replace the entity order and restamp every entity's sort index.
    pub fn reorder_entities(&mut self, order: Vec<EntityId>) {
        for entity in &mut self.entities {
            entity.sort_index = sort_index_for(&order, &entity.id);
        }
        self.entity_order = order;
    }

    /// Replace the column order and restamp every column's 1-based sort index.
    pub fn reorder_columns(&mut self, order: Vec<ColumnId>) {
        for column in &mut self.columns {
            column.sort_index = column_sort_index_for(&order, &column.id);
        }
        self.column_order = order;
    }

    /// Every non-control entity in display order, hidden ones included.
    pub fn ordered_entities(&self) -> Vec<&Entity> {
        let mut items: Vec<&Entity> = self.entities.iter().filter(|e| !e.is_control()).collect();
        sort_by_order(&mut items, &self.entity_order, |entity| entity.id);
        items
    }

    /// Every non-reserved column in display order, hidden ones included.
    pub fn ordered_columns(&self) -> Vec<&Column> {
        let mut items: Vec<&Column> = self.columns.iter().filter(|c| !c.is_reserved()).collect();
        sort_by_order(&mut items, &self.column_order, |column| column.id);
        items
    }

    // --- visibility ---

    pub fn entity_visibility(&self, id: EntityId) -> Option<Visibility> {
        self.entity(id).map(|entity| {
            Visibility::combine(
                entity.is_control(),
                entity.hidden,
                self.session.is_entity_hidden(id),
            )
        })
    }

    pub fn column_visibility(&self, id: ColumnId) -> Option<Visibility> {
        self.column(id).map(|column| {
            Visibility::combine(
                column.is_reserved(),
                column.hidden,
                self.session.is_column_hidden(id),
            )
        })
    }

    pub fn visible_entities(&self) -> Vec<&Entity> {
        let mut items: Vec<&Entity> = self
            .entities
            .iter()
            .filter(|entity| {
                self.entity_visibility(entity.id)
                    .is_some_and(Visibility::is_visible)
            })
            .collect();
        sort_by_order(&mut items, &self.entity_order, |entity| entity.id);
        items
    }

    /// Visible columns of one kind, in display order.
    pub fn visible_columns(&self, kind: ColumnKind) -> Vec<&Column> {
        self.visible_columns_where(|column| column.kind == kind)
    }

    pub fn all_visible_columns(&self) -> Vec<&Column> {
        self.visible_columns_where(|_| true)
    }

    fn visible_columns_where(&self, keep: impl Fn(&Column) -> bool) -> Vec<&Column> {
        let mut items: Vec<&Column> = self
            .columns
            .iter()
            .filter(|column| keep(column))
            .filter(|column| {
                self.column_visibility(column.id)
                    .is_some_and(Visibility::is_visible)
            })
            .collect();
        sort_by_order(&mut items, &self.column_order, |column| column.id);
        items
    }

    pub fn session(&self) -> &SessionOverlay {
        &self.session
    }

    pub fn set_session(&mut self, session: SessionOverlay) {
        self.session = session;
    }

    /// Hide or unhide an entity for this session only.
    pub fn set_entity_hidden(&mut self, id: EntityId, hidden: bool) -> Result<()> {
        if !self.entity_index.contains_key(&id) {
            return Err(ModelError::UnknownEntity(id));
        }
        if hidden {
            self.session.hidden_entities.insert(id);
        } else {
            self.session.hidden_entities.remove(&id);
        }
        Ok(())
    }

    /// Hide or unhide a column for this session only.
    pub fn set_column_hidden(&mut self, id: ColumnId, hidden: bool) -> Result<()> {
        if !self.column_index.contains_key(&id) {
            return Err(ModelError::UnknownColumn(id));
        }
        if hidden {
            self.session.hidden_columns.insert(id);
        } else {
            self.session.hidden_columns.remove(&id);
        }
        Ok(())
    }

    /// Flip the session flag; returns the new hidden state.
    pub fn toggle_entity_hidden(&mut self, id: EntityId) -> Result<bool> {
        let hidden = !self.session.is_entity_hidden(id);
        self.set_entity_hidden(id, hidden)?;
        Ok(hidden)
    }

    /// Flip the session flag; returns the new hidden state.
    pub fn toggle_column_hidden(&mut self, id: ColumnId) -> Result<bool> {
        let hidden = !self.session.is_column_hidden(id);
        self.set_column_hidden(id, hidden)?;
        Ok(hidden)
    }

    /// Reveal entities: clears the session flag and the persisted hidden flag.
    ///
    /// Unknown ids are ignored. Clearing the persisted flag cannot be undone
    /// short of a reset.
    pub fn show_entities(&mut self, ids: &[EntityId]) {
        for &id in ids {
            self.session.hidden_entities.remove(&id);
            if let Ok(entity) = self.entity_mut(id) {
                entity.hidden = false;
            }
        }
    }

    /// Reveal columns: clears the session flag and the persisted hidden flag.
    pub fn show_columns(&mut self, ids: &[ColumnId]) {
        for &id in ids {
            self.session.hidden_columns.remove(&id);
            if let Ok(column) = self.column_mut(id) {
                column.hidden = false;
            }
        }
    }

    /// Drop the session overlay, restoring default visibility.
    pub fn clear_session(&mut self) {
        self.session.clear();
    }

    /// Remove every entity, column, cell and order entry.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ColumnKind;

    fn eid(value: u32) -> EntityId {
        EntityId::new(value).unwrap()
    }

    fn cid(value: u32) -> ColumnId {
        ColumnId::new(value).unwrap()
    }

    #[test]
    fn insert_rejects_duplicates() {
        let mut table = TableModel::new();
        table.insert_entity(Entity::new(eid(101), "A")).unwrap();
        let err = table.insert_entity(Entity::new(eid(101), "B")).unwrap_err();
        assert!(matches!(err, ModelError::DuplicateEntity(id) if id == eid(101)));
        assert_eq!(table.entity_order(), &[eid(101)]);
    }

    #[test]
    fn add_allocates_after_reserved_range() {
        let mut table = TableModel::new();
        let first = table.add_column(NewColumn::new("MMLU", ColumnKind::Metric));
        let second = table.add_column(NewColumn::new("GPQA", ColumnKind::Metric));
        assert_eq!(first.get(), 10);
        assert_eq!(second.get(), 11);
        assert_eq!(table.column(second).unwrap().full_name, "GPQA");
        assert_eq!(table.column_order(), &[first, second]);
    }

    #[test]
    fn upsert_reports_created_then_updated() {
        let mut table = TableModel::new();
        table.insert_entity(Entity::new(eid(101), "A")).unwrap();
        table
            .insert_column(Column::new(cid(57), "MMLU", ColumnKind::Metric))
            .unwrap();
        let first = table
            .upsert_cell(eid(101), cid(57), Some("88".into()), None)
            .unwrap();
        let second = table
            .upsert_cell(eid(101), cid(57), Some("88".into()), None)
            .unwrap();
        assert_eq!(first, Upsert::Created);
        assert_eq!(second, Upsert::Updated);
        assert_eq!(table.cell_count(), 1);
        assert_eq!(table.lookup_cell("0101", " 57 ").unwrap().value(), Some("88"));
    }

    #[test]
    fn upsert_without_data_stores_nothing() {
        let mut table = TableModel::new();
        table.insert_entity(Entity::new(eid(101), "A")).unwrap();
        table
            .insert_column(Column::new(cid(57), "MMLU", ColumnKind::Metric))
            .unwrap();
        let empty = table
            .upsert_cell(eid(101), cid(57), Some(String::new()), Some(String::new()))
            .unwrap();
        assert_eq!(empty, Upsert::Cleared);
        assert_eq!(table.cell_count(), 0);

        table
            .upsert_cell(eid(101), cid(57), Some("88".into()), Some("note".into()))
            .unwrap();
        let cleared = table.upsert_cell(eid(101), cid(57), None, None).unwrap();
        assert_eq!(cleared, Upsert::Cleared);
        assert!(table.get_cell(eid(101), cid(57)).is_none());
    }

    #[test]
    fn added_columns_count_from_one() {
        let mut table = TableModel::new();
        let first = table.add_column(NewColumn::new("Price", ColumnKind::InfoField));
        let second = table.add_column(NewColumn::new("MMLU", ColumnKind::Metric));
        assert_eq!(table.column(first).unwrap().sort_index, 1);
        assert_eq!(table.column(second).unwrap().sort_index, 2);

        table.reorder_columns(vec![second, first]);
        assert_eq!(table.column(second).unwrap().sort_index, 1);
        assert_eq!(table.column(first).unwrap().sort_index, 2);
        let payload = table.snapshot();
        let price = payload.columns.iter().find(|c| c.id == first).unwrap();
        assert_eq!(price.sort_index, 2);
    }

    #[test]
    fn upsert_unknown_column_is_error() {
        let mut table = TableModel::new();
        table.insert_entity(Entity::new(eid(101), "A")).unwrap();
        let err = table
            .upsert_cell(eid(101), cid(57), Some("1".into()), None)
            .unwrap_err();
        assert!(matches!(err, ModelError::UnknownColumn(_)));
    }

    #[test]
    fn toggle_flips_session_only() {
        let mut table = TableModel::new();
        table.insert_entity(Entity::new(eid(101), "A")).unwrap();
        assert!(table.toggle_entity_hidden(eid(101)).unwrap());
        assert_eq!(table.entity_visibility(eid(101)), Some(Visibility::UserHidden));
        assert!(!table.toggle_entity_hidden(eid(101)).unwrap());
        assert!(!table.entity(eid(101)).unwrap().hidden);
    }
}
