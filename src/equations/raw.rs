//! Raw worksheet rows as handed over by a workbook reader
//!
//! A row maps header labels to cell values. Only text and numbers are
//! distinguished; empty cells are simply absent from the row.

use std::collections::HashMap;

use crate::equations::LoadError;
use crate::utils::parse_decimal;

#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Text(String),
    Number(f64),
}

impl RawCell {
    /// Cell rendered as text, integral numbers without a trailing `.0`
    pub fn to_text(&self) -> String {
        match self {
            RawCell::Text(s) => s.clone(),
            RawCell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                format!("{}", *n as i64)
            }
            RawCell::Number(n) => n.to_string(),
        }
    }

    /// Numeric value of the cell, see [`parse_decimal`] for text cells
    pub fn to_number(&self) -> Option<f64> {
        match self {
            RawCell::Number(n) if n.is_finite() => Some(*n),
            RawCell::Number(_) => None,
            RawCell::Text(s) => parse_decimal(s),
        }
    }
}

impl From<&str> for RawCell {
    fn from(value: &str) -> Self {
        RawCell::Text(value.to_string())
    }
}

impl From<String> for RawCell {
    fn from(value: String) -> Self {
        RawCell::Text(value)
    }
}

impl From<f64> for RawCell {
    fn from(value: f64) -> Self {
        RawCell::Number(value)
    }
}

impl From<i64> for RawCell {
    fn from(value: i64) -> Self {
        RawCell::Number(value as f64)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    cells: HashMap<String, RawCell>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for fixtures
    pub fn with(mut self, label: &str, cell: impl Into<RawCell>) -> Self {
        self.insert(label, cell);
        self
    }

    pub fn insert(&mut self, label: &str, cell: impl Into<RawCell>) {
        self.cells.insert(label.to_string(), cell.into());
    }

    pub fn get(&self, label: &str) -> Option<&RawCell> {
        self.cells.get(label)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn number(&self, label: &str) -> Option<f64> {
        self.get(label).and_then(RawCell::to_number)
    }

    /// Trimmed text of a cell, `None` when absent or blank
    pub fn text(&self, label: &str) -> Option<String> {
        self.get(label)
            .map(|cell| cell.to_text().trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// Untrimmed text of a cell, `None` when absent or empty
    pub fn raw_text(&self, label: &str) -> Option<String> {
        self.get(label)
            .map(RawCell::to_text)
            .filter(|s| !s.is_empty())
    }
}

impl FromIterator<(String, RawCell)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (String, RawCell)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

/// Anything that can hand out the rows of a named sheet
pub trait RowSource {
    /// Rows of `sheet` in source order, or `None` when the sheet does not exist
    fn sheet_rows(&mut self, sheet: &str) -> Result<Option<Vec<RawRow>>, LoadError>;
}

/// Row source backed by plain vectors, used by tests and tooling
#[derive(Debug, Clone, Default)]
pub struct InMemoryRows {
    sheets: HashMap<String, Vec<RawRow>>,
}

impl InMemoryRows {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(mut self, name: &str, rows: Vec<RawRow>) -> Self {
        self.sheets.insert(name.to_string(), rows);
        self
    }
}

impl RowSource for InMemoryRows {
    fn sheet_rows(&mut self, sheet: &str) -> Result<Option<Vec<RawRow>>, LoadError> {
        Ok(self.sheets.get(sheet).cloned())
    }
}
