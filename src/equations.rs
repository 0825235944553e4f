//! Legacy IDF equation dataset: workbook rows in, immutable lookup index out

pub mod error;
pub mod loader;
pub mod models;
pub mod raw;
pub mod repository;

pub use error::LoadError;
pub use loader::{load_equations, LoadedEquations};
pub use models::*;
pub use raw::{InMemoryRows, RawCell, RawRow, RowSource};
pub use repository::{BestMatch, BestMatchQuery, EquationRepository, MatchPrecision};
