// ! Workbook readers feeding the equation loader

pub mod workbook_reader;

// Re-export commonly used items
pub use workbook_reader::{rows_from_range, WorkbookReader};
