//! Builds the equation dataset from the IDF workbook sheets
//!
//! # Expected sheets
//! ```text
//! Standard        State | Agency | Code | Name | Latitude (º) | Longitude (º) | Years | K | a | b | c | R2 | ...
//! Disaggregation  same columns as Standard
//! Reference list  Code | Reference | Link   (optional)
//! ```
//!
//! Rows missing a state, a name, any of K/a/b/c or a coordinate are dropped
//! without error. The source sheets are hand-maintained and such rows are
//! notes or placeholders, not equations.

use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::equations::models::{EquationRecord, ReferenceEntry, SourceSheet, NO_REFERENCE};
use crate::equations::raw::{RawRow, RowSource};
use crate::equations::LoadError;

pub const REFERENCE_SHEET: &str = "Reference list";

/// Spreadsheet row of the first data row (row 1 holds the headers)
const FIRST_DATA_ROW: usize = 2;

/// Column labels of the coefficient sheets
pub mod columns {
    pub const STATE: &str = "State";
    pub const AGENCY: &str = "Agency";
    pub const CODE: &str = "Code";
    pub const NAME: &str = "Name";
    pub const LATITUDE: &str = "Latitude (º)";
    pub const LONGITUDE: &str = "Longitude (º)";
    pub const YEARS: &str = "Years";
    pub const K: &str = "K";
    pub const A: &str = "a";
    pub const B: &str = "b";
    pub const C: &str = "c";
    pub const R2: &str = "R2";
    pub const DURATION_RANGE: &str = "Duration range";
    pub const REFERENCE: &str = "Reference";
    pub const DISAGGREGATION_COEFFICIENTS: &str = "Disaggregation coefficients";
    pub const DISAGGREGATION_REFERENCE: &str = "Disaggregation reference";

    // Reference list sheet
    pub const REFERENCE_CODE: &str = "Code";
    pub const REFERENCE_TITLE: &str = "Reference";
    pub const REFERENCE_LINK: &str = "Link";
}

/// Output of a workbook load
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedEquations {
    /// Standard records first, then Disaggregation, each in sheet order
    pub equations: Vec<EquationRecord>,
    pub references: BTreeMap<String, ReferenceEntry>,
}

impl LoadedEquations {
    pub fn count_for(&self, sheet: SourceSheet) -> usize {
        self.equations
            .iter()
            .filter(|eq| eq.source_sheet == sheet)
            .count()
    }
}

/// Read both coefficient sheets and the citation table from `source`
///
/// Fails when either coefficient sheet is missing. A missing
/// "Reference list" only leaves every citation unresolved.
pub fn load_equations<S: RowSource + ?Sized>(source: &mut S) -> Result<LoadedEquations, LoadError> {
    let standard_rows = source
        .sheet_rows(SourceSheet::Standard.sheet_name())?
        .ok_or_else(|| LoadError::MissingSheet(SourceSheet::Standard.sheet_name().to_string()))?;
    let disaggregation_rows = source
        .sheet_rows(SourceSheet::Disaggregation.sheet_name())?
        .ok_or_else(|| {
            LoadError::MissingSheet(SourceSheet::Disaggregation.sheet_name().to_string())
        })?;

    let references = match source.sheet_rows(REFERENCE_SHEET)? {
        Some(rows) => build_reference_table(&rows),
        None => {
            debug!("No '{}' sheet, citations will be unresolved", REFERENCE_SHEET);
            BTreeMap::new()
        }
    };

    let mut equations = parse_sheet(SourceSheet::Standard, &standard_rows, &references);
    equations.extend(parse_sheet(
        SourceSheet::Disaggregation,
        &disaggregation_rows,
        &references,
    ));

    let loaded = LoadedEquations {
        equations,
        references,
    };

    info!(
        "Equations loaded: total={}, standard={}, disaggregation={}, references={}",
        loaded.equations.len(),
        loaded.count_for(SourceSheet::Standard),
        loaded.count_for(SourceSheet::Disaggregation),
        loaded.references.len()
    );

    Ok(loaded)
}

/// Build the code → citation table; blank codes are skipped, last row wins
pub fn build_reference_table(rows: &[RawRow]) -> BTreeMap<String, ReferenceEntry> {
    let mut references = BTreeMap::new();

    for row in rows {
        let Some(code) = row.text(columns::REFERENCE_CODE) else {
            continue;
        };

        references.insert(
            code.clone(),
            ReferenceEntry {
                code,
                title: row.raw_text(columns::REFERENCE_TITLE),
                link: row.raw_text(columns::REFERENCE_LINK),
            },
        );
    }

    references
}

/// Normalize every valid row of one coefficient sheet, keeping sheet order
pub fn parse_sheet(
    sheet: SourceSheet,
    rows: &[RawRow],
    references: &BTreeMap<String, ReferenceEntry>,
) -> Vec<EquationRecord> {
    let equations: Vec<EquationRecord> = rows
        .iter()
        .enumerate()
        .filter_map(|(index, row)| parse_row(sheet, index, row, references))
        .collect();

    debug!(
        "Sheet {}: kept {} of {} rows",
        sheet,
        equations.len(),
        rows.len()
    );

    equations
}

fn parse_row(
    sheet: SourceSheet,
    index: usize,
    row: &RawRow,
    references: &BTreeMap<String, ReferenceEntry>,
) -> Option<EquationRecord> {
    let state = row.text(columns::STATE)?.to_uppercase();
    let municipality = row.text(columns::NAME)?;
    let k = row.number(columns::K)?;
    let a = row.number(columns::A)?;
    let b = row.number(columns::B)?;
    let c = row.number(columns::C)?;
    let latitude = row.number(columns::LATITUDE)?;
    let longitude = row.number(columns::LONGITUDE)?;

    let reference_code = row
        .text(columns::REFERENCE)
        .unwrap_or_else(|| NO_REFERENCE.to_string());
    let reference = references.get(&reference_code);

    let disaggregation_reference_code = row.text(columns::DISAGGREGATION_REFERENCE);
    let disaggregation_reference = disaggregation_reference_code
        .as_ref()
        .and_then(|code| references.get(code));

    let code = row.text(columns::CODE).filter(|code| code != "-");

    let years = row
        .number(columns::YEARS)
        .filter(|years| *years >= 0.0)
        .map(|years| years.trunc() as u32)
        .unwrap_or(0);

    Some(EquationRecord {
        id: format!("{}-{}-{}", sheet, state, index + FIRST_DATA_ROW),
        source_sheet: sheet,
        agency: row.raw_text(columns::AGENCY),
        code,
        station: municipality.clone(),
        municipality,
        state,
        latitude,
        longitude,
        years,
        k,
        a,
        b,
        c,
        r2: row.number(columns::R2),
        duration_range: row.raw_text(columns::DURATION_RANGE),
        reference_title: reference.and_then(|r| r.title.clone()),
        reference_link: reference.and_then(|r| r.link.clone()),
        reference_code,
        disaggregation_coefficients: row.raw_text(columns::DISAGGREGATION_COEFFICIENTS),
        disaggregation_reference_title: disaggregation_reference.and_then(|r| r.title.clone()),
        disaggregation_reference_link: disaggregation_reference.and_then(|r| r.link.clone()),
        disaggregation_reference_code,
        equation_version: sheet.equation_version().to_string(),
    })
}
