// Shared fixtures: an in-memory copy of the IDF workbook sheets
#![allow(dead_code)]

use idf_equation_service::equations::loader::columns;
use idf_equation_service::equations::{EquationRepository, InMemoryRows, RawRow};
use std::sync::Arc;

pub fn equation_row(state: &str, name: &str, years: f64, k: f64) -> RawRow {
    RawRow::new()
        .with(columns::STATE, state)
        .with(columns::NAME, name)
        .with(columns::LATITUDE, -19.9)
        .with(columns::LONGITUDE, -43.9)
        .with(columns::YEARS, years)
        .with(columns::K, k)
        .with(columns::A, 0.16)
        .with(columns::B, 12.0)
        .with(columns::C, 0.78)
}

pub fn reference_row(code: &str, title: &str, link: &str) -> RawRow {
    RawRow::new()
        .with(columns::REFERENCE_CODE, code)
        .with(columns::REFERENCE_TITLE, title)
        .with(columns::REFERENCE_LINK, link)
}

/// Standard sheet: 5 valid rows + 2 broken ones
pub fn standard_rows() -> Vec<RawRow> {
    vec![
        equation_row("MG", "Beta", 30.0, 1500.0).with(columns::REFERENCE, "PINHEIRO"),
        equation_row("sp", "São Paulo", 40.0, 1747.9)
            .with(columns::REFERENCE, "MARTINEZ")
            .with(columns::CODE, 2346007_i64),
        // comma decimals as typed in the source sheet
        RawRow::new()
            .with(columns::STATE, "PR")
            .with(columns::NAME, "Curitiba")
            .with(columns::LATITUDE, "-25,43")
            .with(columns::LONGITUDE, "-49,27")
            .with(columns::YEARS, "22")
            .with(columns::K, "1239,0")
            .with(columns::A, "0,15")
            .with(columns::B, "20")
            .with(columns::C, "0,74")
            .with(columns::REFERENCE, "FENDRICH"),
        equation_row("MG", "", 12.0, 900.0),
        equation_row("MG", "Gama", 12.0, 1100.0).with(columns::K, "-"),
        equation_row("MG", "Gama", 12.0, 1100.0).with(columns::REFERENCE, "UNKNOWN"),
        equation_row("RJ", "Niterói", 18.0, 1210.0),
    ]
}

/// Disaggregation sheet: 3 valid rows + 1 without coordinates
pub fn disaggregation_rows() -> Vec<RawRow> {
    vec![
        equation_row("MG", "Alfa", 10.0, 980.0)
            .with(columns::REFERENCE, "PINHEIRO")
            .with(columns::DISAGGREGATION_COEFFICIENTS, "CETESB (1986)")
            .with(columns::DISAGGREGATION_REFERENCE, "CETESB"),
        equation_row("MG", "Beta", 50.0, 1020.0),
        equation_row("SP", "Campinas", 35.0, 1300.0).with(columns::LATITUDE, "-"),
        equation_row("BA", "Salvador", 25.0, 1150.0),
    ]
}

pub fn reference_rows() -> Vec<RawRow> {
    vec![
        reference_row("PINHEIRO", "Pinheiro (1997) Equações de chuva de MG", "http://example.org/pinheiro"),
        reference_row("MARTINEZ", "Martinez & Magni (1999)", "http://example.org/martinez"),
        reference_row("FENDRICH", "Fendrich (1998)", "http://example.org/fendrich"),
        reference_row("CETESB", "CETESB (1986) Drenagem urbana", "http://example.org/cetesb"),
        reference_row("", "Row without code", "http://example.org/ignored"),
    ]
}

pub fn workbook_rows() -> InMemoryRows {
    InMemoryRows::new()
        .with_sheet("Standard", standard_rows())
        .with_sheet("Disaggregation", disaggregation_rows())
        .with_sheet("Reference list", reference_rows())
}

pub fn test_repository() -> Arc<EquationRepository> {
    Arc::new(EquationRepository::load(&mut workbook_rows()).expect("fixture rows load"))
}
