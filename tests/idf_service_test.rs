// Calculation, geo and reference services over the fixture dataset

mod common;

use idf_equation_service::calculator::intensity_mm_per_hour;
use idf_equation_service::equations::{MatchPrecision, SourceSheet};
use idf_equation_service::services::geo_service::StationFilter;
use idf_equation_service::services::idf_service::{CalculateRequest, CalculationMode};
use idf_equation_service::services::{GeoService, IdfService, ReferenceService, ServiceError};

fn request(uf: &str, municipio: Option<&str>, estacao: Option<&str>) -> CalculateRequest {
    CalculateRequest {
        uf: uf.to_string(),
        municipio: municipio.map(str::to_string),
        estacao: estacao.map(str::to_string),
        duracao: 60.0,
        tr: 10.0,
        modo: None,
    }
}

#[test]
fn test_calculate_state_fallback_is_flagged() {
    let service = IdfService::new(common::test_repository());
    let response = service.calculate(&request("mg", None, None)).unwrap();

    assert_eq!(response.input.uf, "MG");
    assert_eq!(response.input.modo, CalculationMode::Legado);
    assert_eq!(response.equacao.equation_id, "Standard-MG-2");
    assert_eq!(response.equacao.source_sheet, SourceSheet::Standard);
    assert!(response.flags.interpolada);
    assert_eq!(
        response.flags.aviso.as_deref(),
        Some("Equacao escolhida por fallback de UF.")
    );
    assert_eq!(response.flags.precisao, MatchPrecision::State);
    assert_eq!(response.resultado.unidade, "mm/h");
}

#[test]
fn test_calculate_intensity_value() {
    let service = IdfService::new(common::test_repository());
    let response = service
        .calculate(&request("MG", None, Some("Beta")))
        .unwrap();

    // Standard-MG-2: K=1500 a=0.16 b=12 c=0.78
    let expected = intensity_mm_per_hour(1500.0, 0.16, 12.0, 0.78, 60.0, 10.0);
    assert!((response.resultado.intensidade_mm_h - expected).abs() < 0.0005);
    assert!(!response.flags.interpolada);
    assert_eq!(response.flags.aviso, None);
    assert_eq!(response.flags.precisao, MatchPrecision::Station);
}

#[test]
fn test_calculate_station_with_disaggregation_reference() {
    let service = IdfService::new(common::test_repository());
    let response = service
        .calculate(&request("MG", Some("Beta"), Some("Alfa")))
        .unwrap();

    assert_eq!(response.equacao.equation_id, "Disaggregation-MG-2");
    assert_eq!(response.localidade.municipio, "Alfa");
    assert_eq!(response.referencia.reference_code, "PINHEIRO");
    let disaggregation = response.referencia_disaggregation.expect("secondary citation");
    assert_eq!(disaggregation.reference_code, "CETESB");
    assert!(disaggregation.titulo.is_some());
}

#[test]
fn test_calculate_unknown_city_keeps_requested_names() {
    let service = IdfService::new(common::test_repository());
    let response = service
        .calculate(&request("MG", Some("Unknown City"), None))
        .unwrap();

    assert_eq!(response.input.municipio.as_deref(), Some("Unknown City"));
    assert_eq!(response.localidade.municipio, "Beta");
    assert!(!response.flags.interpolada);
    assert_eq!(response.flags.precisao, MatchPrecision::State);
}

#[test]
fn test_calculate_unknown_state_is_not_found() {
    let service = IdfService::new(common::test_repository());
    let result = service.calculate(&request("AM", None, None));
    assert!(matches!(result, Err(ServiceError::NotFound(_))));
}

#[test]
fn test_calculate_rejects_out_of_range_input() {
    let service = IdfService::new(common::test_repository());

    let mut short = request("MG", None, None);
    short.duracao = 2.0;
    assert!(matches!(
        service.calculate(&short),
        Err(ServiceError::InvalidInput(_))
    ));

    let mut rare = request("MG", None, None);
    rare.tr = 500.0;
    assert!(matches!(
        service.calculate(&rare),
        Err(ServiceError::InvalidInput(_))
    ));
}

#[test]
fn test_get_equation_detail() {
    let service = IdfService::new(common::test_repository());

    let detail = service.get_equation("Standard-SP-3").unwrap();
    assert_eq!(detail.uf, "SP");
    assert_eq!(detail.modelo, "SHERMAN");
    assert_eq!(detail.years, 40);
    assert_eq!(detail.reference_title.as_deref(), Some("Martinez & Magni (1999)"));

    assert!(matches!(
        service.get_equation("Standard-SP-99"),
        Err(ServiceError::NotFound(_))
    ));
}

#[test]
fn test_geo_service_listings() {
    let service = GeoService::new(common::test_repository());

    let states: Vec<_> = service.list_states().into_iter().map(|s| s.uf).collect();
    assert_eq!(states, vec!["BA", "MG", "PR", "RJ", "SP"]);

    let municipalities = service.list_municipalities("mg");
    assert_eq!(municipalities.len(), 3);
    assert!(municipalities.iter().all(|m| m.uf == "MG"));

    let stations = service.list_stations(&StationFilter {
        uf: Some("mg".to_string()),
        municipio: Some("BETA".to_string()),
    });
    let ids: Vec<_> = stations.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["Standard-MG-2", "Disaggregation-MG-3"]);
    assert_eq!(stations[0].reference_code, "PINHEIRO");
}

#[test]
fn test_reference_service() {
    let service = ReferenceService::new(common::test_repository());

    assert_eq!(service.list_references().len(), 4);
    assert_eq!(
        service.get_reference("CETESB").unwrap().link.as_deref(),
        Some("http://example.org/cetesb")
    );
    assert!(matches!(
        service.get_reference("SEM_REFERENCIA"),
        Err(ServiceError::NotFound(_))
    ));
}
