//! Date-by-entity table with sparse cells.
//!
//! Rows are dates in ascending order, columns are entities in registry order,
//! and a cell is either a value or absent. Absence is never an error and is
//! never defaulted to zero.

use crate::domain::entity::EntityId;
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WideTable {
    rows: Vec<NaiveDate>,
    columns: Vec<EntityId>,
    column_index: HashMap<EntityId, usize>,
    cells: HashMap<(usize, usize), f64>,
}

impl WideTable {
    /// Empty table over a fixed row and column domain.
    ///
    /// Rows are sorted and de-duplicated; columns keep the given order, a
    /// repeated column keeps its first position.
    pub fn new(rows: impl IntoIterator<Item = NaiveDate>, columns: Vec<EntityId>) -> Self {
        let rows: Vec<NaiveDate> = rows.into_iter().collect::<BTreeSet<_>>().into_iter().collect();

        let mut unique = Vec::with_capacity(columns.len());
        let mut column_index = HashMap::with_capacity(columns.len());
        for id in columns {
            if !column_index.contains_key(&id) {
                column_index.insert(id.clone(), unique.len());
                unique.push(id);
            }
        }

        Self {
            rows,
            columns: unique,
            column_index,
            cells: HashMap::new(),
        }
    }

    pub fn rows(&self) -> &[NaiveDate] {
        &self.rows
    }

    pub fn columns(&self) -> &[EntityId] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of present cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn row_position(&self, date: NaiveDate) -> Option<usize> {
        self.rows.binary_search(&date).ok()
    }

    pub fn column_position(&self, entity: &EntityId) -> Option<usize> {
        self.column_index.get(entity).copied()
    }

    pub fn has_column(&self, entity: &EntityId) -> bool {
        self.column_index.contains_key(entity)
    }

    /// Store a value. Returns `false` when the date or entity is outside the
    /// table's domain.
    pub fn set(&mut self, date: NaiveDate, entity: &EntityId, value: f64) -> bool {
        match (self.row_position(date), self.column_position(entity)) {
            (Some(row), Some(col)) => {
                self.cells.insert((row, col), value);
                true
            }
            _ => false,
        }
    }

    pub(crate) fn set_at(&mut self, row: usize, col: usize, value: f64) {
        debug_assert!(row < self.rows.len() && col < self.columns.len());
        self.cells.insert((row, col), value);
    }

    pub fn get(&self, date: NaiveDate, entity: &EntityId) -> Option<f64> {
        let row = self.row_position(date)?;
        let col = self.column_position(entity)?;
        self.get_at(row, col)
    }

    pub fn get_at(&self, row: usize, col: usize) -> Option<f64> {
        self.cells.get(&(row, col)).copied()
    }

    /// Cells of one row, in column order.
    pub fn row_values(&self, row: usize) -> Vec<Option<f64>> {
        (0..self.columns.len())
            .map(|col| self.get_at(row, col))
            .collect()
    }

    /// Cells of one column, in row order; `None` if the entity has no column.
    pub fn column_values(&self, entity: &EntityId) -> Option<Vec<Option<f64>>> {
        let col = self.column_position(entity)?;
        Some((0..self.rows.len()).map(|row| self.get_at(row, col)).collect())
    }
}
