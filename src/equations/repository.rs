use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::{debug, info, instrument};
use utoipa::ToSchema;

use crate::equations::loader::{load_equations, LoadedEquations};
use crate::equations::models::{EquationRecord, ReferenceEntry, SourceSheet};
use crate::equations::raw::RowSource;
use crate::equations::LoadError;
use crate::importers::WorkbookReader;
use crate::utils::normalize_text;

/// Which filter produced a best-match result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MatchPrecision {
    Station,
    Municipality,
    /// No place name matched, the top-ranked equation of the state was used
    State,
}

/// Parameters of [`EquationRepository::find_best_match`]
#[derive(Debug, Clone)]
pub struct BestMatchQuery {
    pub state: String,
    pub municipality: Option<String>,
    pub station: Option<String>,
    pub preferred_sheets: Vec<SourceSheet>,
}

impl BestMatchQuery {
    pub fn new(state: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            municipality: None,
            station: None,
            preferred_sheets: SourceSheet::ALL.to_vec(),
        }
    }

    pub fn municipality(mut self, municipality: impl Into<String>) -> Self {
        self.municipality = Some(municipality.into());
        self
    }

    pub fn station(mut self, station: impl Into<String>) -> Self {
        self.station = Some(station.into());
        self
    }

    pub fn preferred_sheets(mut self, sheets: Vec<SourceSheet>) -> Self {
        self.preferred_sheets = sheets;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestMatch<'a> {
    pub record: &'a EquationRecord,
    pub precision: MatchPrecision,
}

/// Read-only index over the legacy IDF equations
///
/// Built once at startup and shared behind an `Arc`; every query is a pure
/// scan over the loaded records.
#[derive(Debug, Clone, Default)]
pub struct EquationRepository {
    equations: Vec<EquationRecord>,
    references: BTreeMap<String, ReferenceEntry>,
}

impl EquationRepository {
    pub fn new(loaded: LoadedEquations) -> Self {
        Self {
            equations: loaded.equations,
            references: loaded.references,
        }
    }

    pub fn load<S: RowSource + ?Sized>(source: &mut S) -> Result<Self, LoadError> {
        Ok(Self::new(load_equations(source)?))
    }

    /// Open an `.xlsx` workbook and load it (blocking, use spawn_blocking from async code)
    pub fn from_workbook(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        info!("Loading IDF equations from {}", path.display());
        let mut reader = WorkbookReader::open(path)?;
        Self::load(&mut reader)
    }

    pub fn equations(&self) -> &[EquationRecord] {
        &self.equations
    }

    pub fn len(&self) -> usize {
        self.equations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.equations.is_empty()
    }

    /// Distinct state codes, sorted
    pub fn list_states(&self) -> Vec<String> {
        self.equations
            .iter()
            .map(|eq| eq.state.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct municipality names of a state, sorted
    pub fn list_municipalities(&self, state: &str) -> Vec<String> {
        let state = state.to_uppercase();
        self.equations
            .iter()
            .filter(|eq| eq.state == state)
            .map(|eq| eq.municipality.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Records of a state and/or municipality, in dataset order
    ///
    /// A missing or blank filter matches everything.
    pub fn list_stations(
        &self,
        state: Option<&str>,
        municipality: Option<&str>,
    ) -> Vec<&EquationRecord> {
        let state = non_blank(state).map(str::to_uppercase);
        let municipality = non_blank(municipality).map(normalize_text);

        self.equations
            .iter()
            .filter(|eq| state.as_ref().map_or(true, |s| &eq.state == s))
            .filter(|eq| {
                municipality
                    .as_ref()
                    .map_or(true, |m| &normalize_text(&eq.municipality) == m)
            })
            .collect()
    }

    pub fn find_by_id(&self, id: &str) -> Option<&EquationRecord> {
        self.equations.iter().find(|eq| eq.id == id)
    }

    pub fn list_references(&self) -> Vec<&ReferenceEntry> {
        self.references.values().collect()
    }

    pub fn find_reference_by_code(&self, code: &str) -> Option<&ReferenceEntry> {
        self.references.get(code)
    }

    /// Pick the equation for a calculation request
    ///
    /// Candidates are ranked over the whole dataset by position of their sheet
    /// in `preferred_sheets` (unlisted sheets last), then by longest
    /// observation record. The first station match wins, then the first
    /// municipality match, then the first record of the state.
    #[instrument(skip(self, query), fields(state = %query.state))]
    pub fn find_best_match(&self, query: &BestMatchQuery) -> Option<BestMatch<'_>> {
        let state = query.state.to_uppercase();
        let station = non_blank(query.station.as_deref()).map(normalize_text);
        let municipality = non_blank(query.municipality.as_deref()).map(normalize_text);

        let ordered = self.ranked(&query.preferred_sheets);
        let named = |name: &str| {
            ordered
                .iter()
                .copied()
                .find(|eq| eq.state == state && normalize_text(&eq.station) == name)
        };

        if let Some(record) = station.as_deref().and_then(&named) {
            debug!("Matched station {}", record.id);
            return Some(BestMatch {
                record,
                precision: MatchPrecision::Station,
            });
        }

        if let Some(record) = municipality.as_deref().and_then(&named) {
            debug!("Matched municipality {}", record.id);
            return Some(BestMatch {
                record,
                precision: MatchPrecision::Municipality,
            });
        }

        let fallback = ordered
            .iter()
            .copied()
            .find(|eq| eq.state == state)
            .map(|record| BestMatch {
                record,
                precision: MatchPrecision::State,
            });

        match &fallback {
            Some(found) => debug!("Fell back to state-level equation {}", found.record.id),
            None => debug!("No equation for state {}", state),
        }

        fallback
    }

    /// All records ordered by sheet preference, then years descending
    fn ranked(&self, preferred_sheets: &[SourceSheet]) -> Vec<&EquationRecord> {
        let rank = |sheet: SourceSheet| {
            preferred_sheets
                .iter()
                .position(|s| *s == sheet)
                .unwrap_or(usize::MAX)
        };

        let mut ordered: Vec<&EquationRecord> = self.equations.iter().collect();
        ordered.sort_by(|x, y| {
            rank(x.source_sheet)
                .cmp(&rank(y.source_sheet))
                .then_with(|| y.years.cmp(&x.years))
        });
        ordered
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
