use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument};
use utoipa::ToSchema;

use crate::calculator::{
    intensity_mm_per_hour, MAX_DURATION_MINUTES, MAX_RETURN_PERIOD_YEARS, MIN_DURATION_MINUTES,
    MIN_RETURN_PERIOD_YEARS,
};
use crate::equations::{
    BestMatchQuery, EquationRecord, EquationRepository, MatchPrecision, SourceSheet,
};
use crate::services::ServiceError;
use crate::utils::round_to;

const MODEL: &str = "SHERMAN";
const STATE_FALLBACK_WARNING: &str = "Equacao escolhida por fallback de UF.";

/// Calculation mode requested by the client; only the legacy model exists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum CalculationMode {
    #[default]
    Legado,
    Auto,
    Moderno,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CalculateRequest {
    pub uf: String,
    pub municipio: Option<String>,
    pub estacao: Option<String>,
    /// Storm duration in minutes (5 to 1440)
    pub duracao: f64,
    /// Return period in years (2 to 100)
    #[serde(rename = "TR")]
    pub tr: f64,
    pub modo: Option<CalculationMode>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CalculationInput {
    pub uf: String,
    pub municipio: Option<String>,
    pub estacao: Option<String>,
    pub duracao: f64,
    #[serde(rename = "TR")]
    pub tr: f64,
    pub modo: CalculationMode,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IntensityResult {
    pub intensidade_mm_h: f64,
    pub unidade: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EquationUsed {
    pub source_sheet: SourceSheet,
    pub equation_id: String,
    pub equation_version: String,
    pub modelo: String,
    pub modo: CalculationMode,
    #[serde(rename = "K")]
    pub k: f64,
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CitationSummary {
    pub reference_code: String,
    pub titulo: Option<String>,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Locality {
    pub uf: String,
    pub municipio: String,
    pub estacao: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CalculationFlags {
    /// True when neither municipality nor station was requested
    pub interpolada: bool,
    pub aviso: Option<String>,
    /// Filter level that selected the equation
    pub precisao: MatchPrecision,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CalculationResponse {
    pub input: CalculationInput,
    pub resultado: IntensityResult,
    pub equacao: EquationUsed,
    pub referencia: CitationSummary,
    pub referencia_disaggregation: Option<CitationSummary>,
    pub localidade: Locality,
    pub flags: CalculationFlags,
}

/// Full equation view for `GET /idf/equations/{id}`
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EquationDetail {
    pub id: String,
    pub source_sheet: SourceSheet,
    pub uf: String,
    pub municipio: String,
    pub estacao: String,
    pub modelo: String,
    pub modo: CalculationMode,
    #[serde(rename = "K")]
    pub k: f64,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub years: u32,
    pub r2: Option<f64>,
    pub duration_range: Option<String>,
    pub reference_code: String,
    pub reference_title: Option<String>,
    pub reference_link: Option<String>,
    pub disaggregation_coefficients: Option<String>,
    pub disaggregation_reference_code: Option<String>,
    pub disaggregation_reference_title: Option<String>,
    pub disaggregation_reference_link: Option<String>,
    pub equation_version: String,
}

impl From<&EquationRecord> for EquationDetail {
    fn from(eq: &EquationRecord) -> Self {
        Self {
            id: eq.id.clone(),
            source_sheet: eq.source_sheet,
            uf: eq.state.clone(),
            municipio: eq.municipality.clone(),
            estacao: eq.station.clone(),
            modelo: MODEL.to_string(),
            modo: CalculationMode::Legado,
            k: eq.k,
            a: eq.a,
            b: eq.b,
            c: eq.c,
            years: eq.years,
            r2: eq.r2,
            duration_range: eq.duration_range.clone(),
            reference_code: eq.reference_code.clone(),
            reference_title: eq.reference_title.clone(),
            reference_link: eq.reference_link.clone(),
            disaggregation_coefficients: eq.disaggregation_coefficients.clone(),
            disaggregation_reference_code: eq.disaggregation_reference_code.clone(),
            disaggregation_reference_title: eq.disaggregation_reference_title.clone(),
            disaggregation_reference_link: eq.disaggregation_reference_link.clone(),
            equation_version: eq.equation_version.clone(),
        }
    }
}

#[derive(Clone)]
pub struct IdfService {
    repository: Arc<EquationRepository>,
}

impl IdfService {
    pub fn new(repository: Arc<EquationRepository>) -> Self {
        Self { repository }
    }

    pub fn get_equation(&self, id: &str) -> Result<EquationDetail, ServiceError> {
        self.repository
            .find_by_id(id)
            .map(EquationDetail::from)
            .ok_or_else(|| ServiceError::NotFound(format!("equation {id}")))
    }

    /// Resolve the best equation for the request and evaluate it
    #[instrument(skip(self, request), fields(uf = %request.uf))]
    pub fn calculate(&self, request: &CalculateRequest) -> Result<CalculationResponse, ServiceError> {
        validate(request)?;

        let mut query = BestMatchQuery::new(request.uf.clone())
            .preferred_sheets(vec![SourceSheet::Standard, SourceSheet::Disaggregation]);
        query.municipality = request.municipio.clone();
        query.station = request.estacao.clone();

        let found = self.repository.find_best_match(&query).ok_or_else(|| {
            ServiceError::NotFound(format!("no legacy equation for uf {}", request.uf))
        })?;
        let eq = found.record;

        let interpolated = is_blank(&request.municipio) && is_blank(&request.estacao);
        let intensity = intensity_mm_per_hour(eq.k, eq.a, eq.b, eq.c, request.duracao, request.tr);
        debug!(
            "Equation {} ({:?}) gives {:.3} mm/h",
            eq.id, found.precision, intensity
        );

        info!(
            "Calculated intensity for uf {} with equation {}",
            eq.state, eq.id
        );

        Ok(CalculationResponse {
            input: CalculationInput {
                uf: request.uf.to_uppercase(),
                municipio: request.municipio.clone(),
                estacao: request.estacao.clone(),
                duracao: request.duracao,
                tr: request.tr,
                modo: request.modo.unwrap_or_default(),
            },
            resultado: IntensityResult {
                intensidade_mm_h: round_to(intensity, 3),
                unidade: "mm/h".to_string(),
            },
            equacao: EquationUsed {
                source_sheet: eq.source_sheet,
                equation_id: eq.id.clone(),
                equation_version: eq.equation_version.clone(),
                modelo: MODEL.to_string(),
                modo: CalculationMode::Legado,
                k: eq.k,
                a: eq.a,
                b: eq.b,
                c: eq.c,
            },
            referencia: CitationSummary {
                reference_code: eq.reference_code.clone(),
                titulo: eq.reference_title.clone(),
                link: eq.reference_link.clone(),
            },
            referencia_disaggregation: eq.disaggregation_reference_code.as_ref().map(|code| {
                CitationSummary {
                    reference_code: code.clone(),
                    titulo: eq.disaggregation_reference_title.clone(),
                    link: eq.disaggregation_reference_link.clone(),
                }
            }),
            localidade: Locality {
                uf: eq.state.clone(),
                municipio: eq.municipality.clone(),
                estacao: eq.station.clone(),
            },
            flags: CalculationFlags {
                interpolada: interpolated,
                aviso: interpolated.then(|| STATE_FALLBACK_WARNING.to_string()),
                precisao: found.precision,
            },
        })
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

fn validate(request: &CalculateRequest) -> Result<(), ServiceError> {
    if request.uf.trim().is_empty() {
        return Err(ServiceError::InvalidInput("uf is required".to_string()));
    }
    if !(MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&request.duracao) {
        return Err(ServiceError::InvalidInput(format!(
            "duracao must be between {MIN_DURATION_MINUTES} and {MAX_DURATION_MINUTES} minutes"
        )));
    }
    if !(MIN_RETURN_PERIOD_YEARS..=MAX_RETURN_PERIOD_YEARS).contains(&request.tr) {
        return Err(ServiceError::InvalidInput(format!(
            "TR must be between {MIN_RETURN_PERIOD_YEARS} and {MAX_RETURN_PERIOD_YEARS} years"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(duracao: f64, tr: f64) -> CalculateRequest {
        CalculateRequest {
            uf: "MG".to_string(),
            municipio: None,
            estacao: None,
            duracao,
            tr,
            modo: None,
        }
    }

    #[test]
    fn test_validate_bounds_inclusive() {
        assert!(validate(&request(5.0, 2.0)).is_ok());
        assert!(validate(&request(1440.0, 100.0)).is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        assert!(matches!(
            validate(&request(4.9, 10.0)),
            Err(ServiceError::InvalidInput(_))
        ));
        assert!(matches!(
            validate(&request(60.0, 1.0)),
            Err(ServiceError::InvalidInput(_))
        ));
        assert!(matches!(
            validate(&request(f64::NAN, 10.0)),
            Err(ServiceError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_mode_parses_uppercase() {
        let mode: CalculationMode = serde_json::from_str("\"MODERNO\"").unwrap();
        assert_eq!(mode, CalculationMode::Moderno);
        assert!(serde_json::from_str::<CalculationMode>("\"legado\"").is_err());
    }
}
