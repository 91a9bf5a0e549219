use serde::{Deserialize, Serialize};

use crate::TableError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Which columns are shown, in what order, and how rows are sorted.
///
/// `selected` is always a subset of `available`. `available` keeps the
/// discovery order and only drives the column picker and "select all".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnState {
    available: Vec<String>,
    selected: Vec<String>,
    sort_key: Option<String>,
    sort_direction: SortDirection,
}

impl ColumnState {
    /// Starts with every discovered column selected.
    pub fn new(available: Vec<String>) -> Self {
        Self {
            selected: available.clone(),
            available,
            sort_key: None,
            sort_direction: SortDirection::Asc,
        }
    }

    pub fn available(&self) -> &[String] {
        &self.available
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn sort_key(&self) -> Option<&str> {
        self.sort_key.as_deref()
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    pub fn is_selected(&self, column: &str) -> bool {
        self.selected.iter().any(|selected| selected == column)
    }

    pub fn is_all_selected(&self) -> bool {
        self.selected.len() == self.available.len()
    }

    /// Direction marker for a column header, only for the active sort key.
    pub fn sort_indicator(&self, column: &str) -> Option<SortDirection> {
        (self.sort_key() == Some(column)).then_some(self.sort_direction)
    }

    /// Shows a hidden column (appended last) or hides a shown one.
    ///
    /// Returns whether the column is selected afterwards.
    pub fn toggle_column(&mut self, column: &str) -> Result<bool, TableError> {
        self.ensure_available(column)?;
        if self.is_selected(column) {
            self.selected.retain(|selected| selected != column);
            Ok(false)
        } else {
            self.selected.push(column.to_string());
            Ok(true)
        }
    }

    /// Clears the selection when everything is shown, otherwise shows every
    /// column in discovery order.
    pub fn toggle_all(&mut self) {
        if self.is_all_selected() {
            self.selected.clear();
        } else {
            self.selected = self.available.clone();
        }
    }

    /// Same column flips the direction; a new column sorts ascending.
    pub fn set_sort(&mut self, column: &str) -> Result<(), TableError> {
        self.ensure_available(column)?;
        if self.sort_key() == Some(column) {
            self.sort_direction = self.sort_direction.flipped();
        } else {
            self.sort_key = Some(column.to_string());
            self.sort_direction = SortDirection::Asc;
        }
        Ok(())
    }

    /// Moves the selected column at `from` so it ends up at `to`.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), TableError> {
        let len = self.selected.len();
        for index in [from, to] {
            if index >= len {
                return Err(TableError::IndexOutOfRange { index, len });
            }
        }
        if from != to {
            let column = self.selected.remove(from);
            self.selected.insert(to, column);
        }
        Ok(())
    }

    /// Adopts a freshly fetched column list.
    ///
    /// Every column becomes selected again; the sort key survives only when
    /// the new list still contains it.
    pub fn replace_available(&mut self, available: Vec<String>) {
        if let Some(key) = &self.sort_key
            && !available.contains(key)
        {
            self.sort_key = None;
            self.sort_direction = SortDirection::Asc;
        }
        self.selected = available.clone();
        self.available = available;
    }

    fn ensure_available(&self, column: &str) -> Result<(), TableError> {
        if self.available.iter().any(|available| available == column) {
            Ok(())
        } else {
            Err(TableError::UnknownColumn(column.to_string()))
        }
    }
}
