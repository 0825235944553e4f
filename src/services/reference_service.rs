use std::sync::Arc;

use crate::equations::{EquationRepository, ReferenceEntry};
use crate::services::ServiceError;

#[derive(Clone)]
pub struct ReferenceService {
    repository: Arc<EquationRepository>,
}

impl ReferenceService {
    pub fn new(repository: Arc<EquationRepository>) -> Self {
        Self { repository }
    }

    pub fn list_references(&self) -> Vec<ReferenceEntry> {
        self.repository
            .list_references()
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn get_reference(&self, code: &str) -> Result<ReferenceEntry, ServiceError> {
        self.repository
            .find_reference_by_code(code)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(format!("reference {code}")))
    }
}
