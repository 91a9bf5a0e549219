#![allow(missing_docs)]

pub mod cell;
pub mod columns;
pub mod view;

use thiserror::Error;

pub use cell::{Cell, compare};
pub use columns::{ColumnState, SortDirection};
pub use view::{DragSession, ProjectedRow, RowKey, SubmissionRecord, TableView};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("unknown column '{0}'")]
    UnknownColumn(String),
    #[error("column index {index} out of range for {len} selected column(s)")]
    IndexOutOfRange { index: usize, len: usize },
}
