use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to open workbook: {0}")]
    WorkbookOpen(String),

    #[error("Required sheet '{0}' not found in equation workbook")]
    MissingSheet(String),

    #[error("Failed to read sheet '{sheet}': {msg}")]
    SheetRead { sheet: String, msg: String },
}
