use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Reference code used when a row leaves the Reference column blank.
///
/// Rows without a citation all share this literal code, so it is kept as a
/// real value rather than collapsed to `None`.
pub const NO_REFERENCE: &str = "SEM_REFERENCIA";

/// Coefficient family a record was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum SourceSheet {
    Standard,
    Disaggregation,
}

impl SourceSheet {
    pub const ALL: [SourceSheet; 2] = [SourceSheet::Standard, SourceSheet::Disaggregation];

    /// Worksheet name in the IDF workbook
    pub fn sheet_name(&self) -> &'static str {
        match self {
            SourceSheet::Standard => "Standard",
            SourceSheet::Disaggregation => "Disaggregation",
        }
    }

    pub fn equation_version(&self) -> &'static str {
        match self {
            SourceSheet::Standard => "idf_curves_brazil_standard",
            SourceSheet::Disaggregation => "idf_curves_brazil_disaggregation",
        }
    }
}

impl fmt::Display for SourceSheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sheet_name())
    }
}

/// One validated row of the Standard or Disaggregation sheet
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EquationRecord {
    pub id: String,
    pub source_sheet: SourceSheet,

    // Location
    pub state: String,
    pub agency: Option<String>,
    pub code: Option<String>,
    pub municipality: String,
    pub station: String,
    pub latitude: f64,
    pub longitude: f64,

    /// Length of the observation record, 0 when the sheet does not say
    pub years: u32,

    // Sherman coefficients
    #[serde(rename = "K")]
    pub k: f64,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub r2: Option<f64>,
    pub duration_range: Option<String>,

    // Citation
    pub reference_code: String,
    pub reference_title: Option<String>,
    pub reference_link: Option<String>,

    // Disaggregation citation (only when the row carries one)
    pub disaggregation_coefficients: Option<String>,
    pub disaggregation_reference_code: Option<String>,
    pub disaggregation_reference_title: Option<String>,
    pub disaggregation_reference_link: Option<String>,

    pub equation_version: String,
}

/// Entry of the "Reference list" sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ReferenceEntry {
    pub code: String,
    pub title: Option<String>,
    pub link: Option<String>,
}
