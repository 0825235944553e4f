use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::equations::{EquationRecord, EquationRepository};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StateEntry {
    pub uf: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MunicipalityEntry {
    pub uf: String,
    pub municipio: String,
}

/// Station listing row (one per equation record)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StationSummary {
    pub id: String,
    pub uf: String,
    pub municipio: String,
    pub estacao: String,
    pub latitude: f64,
    pub longitude: f64,
    pub reference_code: String,
}

impl From<&EquationRecord> for StationSummary {
    fn from(eq: &EquationRecord) -> Self {
        Self {
            id: eq.id.clone(),
            uf: eq.state.clone(),
            municipio: eq.municipality.clone(),
            estacao: eq.station.clone(),
            latitude: eq.latitude,
            longitude: eq.longitude,
            reference_code: eq.reference_code.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StationFilter {
    /// State code, case-insensitive
    pub uf: Option<String>,
    /// Municipality name, accents and case ignored
    pub municipio: Option<String>,
}

#[derive(Clone)]
pub struct GeoService {
    repository: Arc<EquationRepository>,
}

impl GeoService {
    pub fn new(repository: Arc<EquationRepository>) -> Self {
        Self { repository }
    }

    pub fn list_states(&self) -> Vec<StateEntry> {
        self.repository
            .list_states()
            .into_iter()
            .map(|uf| StateEntry { uf })
            .collect()
    }

    pub fn list_municipalities(&self, state: &str) -> Vec<MunicipalityEntry> {
        let uf = state.to_uppercase();
        self.repository
            .list_municipalities(&uf)
            .into_iter()
            .map(|municipio| MunicipalityEntry {
                uf: uf.clone(),
                municipio,
            })
            .collect()
    }

    pub fn list_stations(&self, filter: &StationFilter) -> Vec<StationSummary> {
        self.repository
            .list_stations(filter.uf.as_deref(), filter.municipio.as_deref())
            .into_iter()
            .map(StationSummary::from)
            .collect()
    }
}
