pub mod error;
pub mod geo_service;
pub mod idf_service;
pub mod reference_service;

pub use error::ServiceError;
pub use geo_service::GeoService;
pub use idf_service::IdfService;
pub use reference_service::ReferenceService;
