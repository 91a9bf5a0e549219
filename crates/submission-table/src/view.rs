use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value};
use tracing::debug;

use crate::TableError;
use crate::cell::{Cell, compare};
use crate::columns::{ColumnState, SortDirection};

/// Row identity: the record's `id` when it has one, else its position.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum RowKey {
    Id(String),
    Index(usize),
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowKey::Id(id) => f.write_str(id),
            RowKey::Index(index) => write!(f, "#{index}"),
        }
    }
}

/// One submitted application, decoded into typed cells.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionRecord {
    key: RowKey,
    cells: BTreeMap<String, Cell>,
}

impl SubmissionRecord {
    pub fn from_json(index: usize, record: &Map<String, Value>) -> Self {
        let key = match record.get("id") {
            Some(Value::String(id)) => RowKey::Id(id.clone()),
            Some(Value::Number(id)) => RowKey::Id(id.to_string()),
            _ => RowKey::Index(index),
        };
        let cells = record
            .iter()
            .map(|(column, value)| (column.clone(), Cell::from_json(value)))
            .collect();
        Self { key, cells }
    }

    pub fn key(&self) -> &RowKey {
        &self.key
    }

    pub fn cell(&self, column: &str) -> Option<&Cell> {
        self.cells.get(column)
    }
}

/// A rendered row: its identity plus one cell per selected column.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedRow<'a> {
    pub key: &'a RowKey,
    pub cells: Vec<(&'a str, Option<&'a Cell>)>,
}

/// Transient state of a header drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragSession {
    pub from: usize,
    pub over: usize,
}

/// Submitted applications plus the user's column and sort choices.
#[derive(Debug, Clone, Default)]
pub struct TableView {
    columns: ColumnState,
    records: Vec<SubmissionRecord>,
    drag: Option<DragSession>,
}

impl TableView {
    pub fn new(columns: Vec<String>, records: &[Map<String, Value>]) -> Self {
        Self {
            columns: ColumnState::new(columns),
            records: decode(records),
            drag: None,
        }
    }

    pub fn columns(&self) -> &ColumnState {
        &self.columns
    }

    pub fn records(&self) -> &[SubmissionRecord] {
        &self.records
    }

    pub fn replace_data(&mut self, columns: Vec<String>, records: &[Map<String, Value>]) {
        self.columns.replace_available(columns);
        self.records = decode(records);
        self.drag = None;
    }

    pub fn toggle_column(&mut self, column: &str) -> Result<bool, TableError> {
        self.columns.toggle_column(column)
    }

    pub fn toggle_all(&mut self) {
        self.columns.toggle_all();
    }

    pub fn set_sort(&mut self, column: &str) -> Result<(), TableError> {
        self.columns.set_sort(column)
    }

    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), TableError> {
        self.columns.reorder(from, to)
    }

    pub fn drag_start(&mut self, index: usize) -> Result<(), TableError> {
        let len = self.columns.selected().len();
        if index >= len {
            return Err(TableError::IndexOutOfRange { index, len });
        }
        self.drag = Some(DragSession {
            from: index,
            over: index,
        });
        Ok(())
    }

    /// Ignored outside a drag gesture.
    pub fn drag_over(&mut self, index: usize) {
        if let Some(drag) = &mut self.drag {
            drag.over = index;
        }
    }

    /// Applies the pending move and ends the gesture.
    pub fn drag_end(&mut self) -> Result<(), TableError> {
        match self.drag.take() {
            Some(DragSession { from, over }) => {
                debug!(from, over, "reordering column after drag");
                self.columns.reorder(from, over)
            }
            None => Ok(()),
        }
    }

    pub fn drag_session(&self) -> Option<DragSession> {
        self.drag
    }

    /// Rows in sort order, each restricted to the selected columns in their
    /// selected order.
    ///
    /// Rows that compare equal keep their input order because the underlying
    /// slice sort is stable, but callers should not rely on tie order.
    ///
    /// Mismatched or missing cells compare equal, so mixed columns are not
    /// totally ordered and the resulting order among them is unspecified.
    pub fn project(&self) -> Vec<ProjectedRow<'_>> {
        let mut rows: Vec<&SubmissionRecord> = self.records.iter().collect();
        if let Some(key) = self.columns.sort_key() {
            let direction = self.columns.sort_direction();
            rows.sort_by(|left, right| match (left.cell(key), right.cell(key)) {
                (Some(left), Some(right)) => match direction {
                    SortDirection::Asc => compare(left, right),
                    SortDirection::Desc => compare(right, left),
                },
                _ => std::cmp::Ordering::Equal,
            });
        }

        rows.into_iter()
            .map(|record| ProjectedRow {
                key: record.key(),
                cells: self
                    .columns
                    .selected()
                    .iter()
                    .map(|column| (column.as_str(), record.cell(column)))
                    .collect(),
            })
            .collect()
    }
}

fn decode(records: &[Map<String, Value>]) -> Vec<SubmissionRecord> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| SubmissionRecord::from_json(index, record))
        .collect()
}
