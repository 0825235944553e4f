use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::equations::{LoadError, RawCell, RawRow, RowSource};

/// Row source over an `.xlsx`/`.xls`/`.ods` workbook
///
/// Each sheet is read as a table: the first row holds the column labels,
/// every following non-empty row becomes a [`RawRow`].
pub struct WorkbookReader {
    workbook: Sheets<BufReader<File>>,
}

impl WorkbookReader {
    /// Open the workbook (this is synchronous, caller should use spawn_blocking)
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let workbook =
            open_workbook_auto(path).map_err(|e| LoadError::WorkbookOpen(e.to_string()))?;
        info!("Opened workbook {}", path.display());
        Ok(Self { workbook })
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }
}

impl RowSource for WorkbookReader {
    fn sheet_rows(&mut self, sheet: &str) -> Result<Option<Vec<RawRow>>, LoadError> {
        if !self.workbook.sheet_names().iter().any(|name| name == sheet) {
            debug!("Sheet {} not present in workbook", sheet);
            return Ok(None);
        }

        let range = self
            .workbook
            .worksheet_range(sheet)
            .map_err(|e| LoadError::SheetRead {
                sheet: sheet.to_string(),
                msg: e.to_string(),
            })?;

        let rows = rows_from_range(&range);
        debug!("Read {} data rows from sheet {}", rows.len(), sheet);
        Ok(Some(rows))
    }
}

/// Convert a worksheet range into header-labelled rows
///
/// Columns without a header label are ignored and rows with no usable cell
/// are skipped, so row positions count data rows only.
pub fn rows_from_range(range: &Range<Data>) -> Vec<RawRow> {
    let mut rows = range.rows();

    let Some(header) = rows.next() else {
        return Vec::new();
    };

    let labels: Vec<Option<String>> = header
        .iter()
        .map(|cell| {
            raw_cell(cell)
                .map(|c| c.to_text().trim().to_string())
                .filter(|label| !label.is_empty())
        })
        .collect();

    rows.map(|cells| {
        cells
            .iter()
            .zip(&labels)
            .filter_map(|(cell, label)| {
                let label = label.as_ref()?;
                raw_cell(cell).map(|value| (label.clone(), value))
            })
            .collect::<RawRow>()
    })
    .filter(|row| !row.is_empty())
    .collect()
}

fn raw_cell(cell: &Data) -> Option<RawCell> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(RawCell::Text(s.clone())),
        Data::Float(f) => Some(RawCell::Number(*f)),
        Data::Int(i) => Some(RawCell::Number(*i as f64)),
        Data::Bool(b) => Some(RawCell::Text(b.to_string())),
        Data::DateTime(dt) => Some(RawCell::Number(dt.as_f64())),
        Data::Error(e) => {
            warn!("Cell error {:?}, treating as empty", e);
            None
        }
        other => Some(RawCell::Text(other.to_string())),
    }
}
