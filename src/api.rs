use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use utoipa::{IntoParams, OpenApi, ToSchema};

use crate::equations::{MatchPrecision, ReferenceEntry, SourceSheet};
use crate::services::geo_service::{MunicipalityEntry, StateEntry, StationFilter, StationSummary};
use crate::services::idf_service::{
    CalculateRequest, CalculationFlags, CalculationInput, CalculationMode, CalculationResponse,
    CitationSummary, EquationDetail, EquationUsed, IntensityResult, Locality,
};
use crate::services::{GeoService, IdfService, ReferenceService, ServiceError};

#[derive(Clone)]
pub struct AppState {
    pub geo_service: GeoService,
    pub idf_service: IdfService,
    pub reference_service: ReferenceService,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MunicipalityQuery {
    /// State code; without it the list is empty
    pub uf: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        list_states,
        list_municipalities,
        list_stations,
        calculate,
        get_equation,
        list_references,
        get_reference,
    ),
    components(schemas(
        HealthResponse,
        StateEntry,
        MunicipalityEntry,
        StationSummary,
        CalculateRequest,
        CalculationMode,
        CalculationResponse,
        CalculationInput,
        IntensityResult,
        EquationUsed,
        CitationSummary,
        Locality,
        CalculationFlags,
        MatchPrecision,
        SourceSheet,
        EquationDetail,
        ReferenceEntry,
    )),
    tags(
        (name = "geo", description = "States, municipalities and stations with IDF equations"),
        (name = "idf", description = "Rainfall intensity from legacy IDF equations"),
        (name = "references", description = "Bibliographic sources of the equations"),
    )
)]
pub struct ApiDoc;

pub fn generate_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health))
        .route("/ufs", get(list_states))
        .route("/municipios", get(list_municipalities))
        .route("/estacoes", get(list_stations))
        .route("/idf/calculate", post(calculate))
        .route("/idf/equations/{id}", get(get_equation))
        .route("/references", get(list_references))
        .route("/references/{code}", get(get_reference))
        .with_state(state);

    Router::new().nest("/api/v1", api_routes)
}

fn status_for(error: &ServiceError) -> StatusCode {
    match error {
        ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "geo",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
#[instrument(skip(_state))]
async fn health(State(_state): State<AppState>) -> impl IntoResponse {
    debug!("Health check requested");
    let response = HealthResponse {
        status: "healthy".to_string(),
    };
    (StatusCode::OK, Json(response))
}

#[utoipa::path(
    get,
    path = "/api/v1/ufs",
    tag = "geo",
    responses((status = 200, description = "States with at least one equation", body = [StateEntry]))
)]
#[instrument(skip(state))]
async fn list_states(State(state): State<AppState>) -> Json<Vec<StateEntry>> {
    let states = state.geo_service.list_states();
    info!("Listed {} states", states.len());
    Json(states)
}

#[utoipa::path(
    get,
    path = "/api/v1/municipios",
    tag = "geo",
    params(MunicipalityQuery),
    responses((status = 200, description = "Municipalities of the state", body = [MunicipalityEntry]))
)]
#[instrument(skip(state))]
async fn list_municipalities(
    State(state): State<AppState>,
    Query(query): Query<MunicipalityQuery>,
) -> Json<Vec<MunicipalityEntry>> {
    let Some(uf) = query.uf.filter(|uf| !uf.trim().is_empty()) else {
        debug!("No uf given, returning empty municipality list");
        return Json(Vec::new());
    };

    let municipalities = state.geo_service.list_municipalities(&uf);
    info!("Listed {} municipalities for uf {}", municipalities.len(), uf);
    Json(municipalities)
}

#[utoipa::path(
    get,
    path = "/api/v1/estacoes",
    tag = "geo",
    params(StationFilter),
    responses((status = 200, description = "Stations matching the filters", body = [StationSummary]))
)]
#[instrument(skip(state))]
async fn list_stations(
    State(state): State<AppState>,
    Query(filter): Query<StationFilter>,
) -> Json<Vec<StationSummary>> {
    let stations = state.geo_service.list_stations(&filter);
    info!("Listed {} stations", stations.len());
    Json(stations)
}

#[utoipa::path(
    post,
    path = "/api/v1/idf/calculate",
    tag = "idf",
    request_body = CalculateRequest,
    responses(
        (status = 200, description = "Rainfall intensity", body = CalculationResponse),
        (status = 400, description = "Duration or return period out of range"),
        (status = 404, description = "No equation for the requested state"),
    )
)]
#[instrument(skip(state, request), fields(uf = %request.uf))]
async fn calculate(
    State(state): State<AppState>,
    Json(request): Json<CalculateRequest>,
) -> Result<Json<CalculationResponse>, StatusCode> {
    debug!(
        "Calculating intensity for duration {} min, TR {} years",
        request.duracao, request.tr
    );

    let response = state.idf_service.calculate(&request).map_err(|e| {
        warn!("Calculation rejected for uf {}: {}", request.uf, e);
        status_for(&e)
    })?;

    info!(
        "Intensity {} mm/h from equation {}",
        response.resultado.intensidade_mm_h, response.equacao.equation_id
    );
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/v1/idf/equations/{id}",
    tag = "idf",
    params(("id" = String, Path, description = "Equation id, e.g. Standard-MG-12")),
    responses(
        (status = 200, description = "Equation coefficients and citation", body = EquationDetail),
        (status = 404, description = "Unknown equation id"),
    )
)]
#[instrument(skip(state), fields(id = %id))]
async fn get_equation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EquationDetail>, StatusCode> {
    let equation = state.idf_service.get_equation(&id).map_err(|e| {
        warn!("Equation {} not available: {}", id, e);
        status_for(&e)
    })?;

    info!("Retrieved equation {}", id);
    Ok(Json(equation))
}

#[utoipa::path(
    get,
    path = "/api/v1/references",
    tag = "references",
    responses((status = 200, description = "All citations", body = [ReferenceEntry]))
)]
#[instrument(skip(state))]
async fn list_references(State(state): State<AppState>) -> Json<Vec<ReferenceEntry>> {
    let references = state.reference_service.list_references();
    info!("Listed {} references", references.len());
    Json(references)
}

#[utoipa::path(
    get,
    path = "/api/v1/references/{code}",
    tag = "references",
    params(("code" = String, Path, description = "Citation code from the Reference list sheet")),
    responses(
        (status = 200, description = "Citation", body = ReferenceEntry),
        (status = 404, description = "Unknown citation code"),
    )
)]
#[instrument(skip(state), fields(code = %code))]
async fn get_reference(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<ReferenceEntry>, StatusCode> {
    let reference = state.reference_service.get_reference(&code).map_err(|e| {
        warn!("Reference {} not available: {}", code, e);
        status_for(&e)
    })?;

    info!("Retrieved reference {}", code);
    Ok(Json(reference))
}
