//! Business logic services

pub mod aggregate;
pub mod catalog;
pub mod forms;
pub mod integrity;
pub mod view;

use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository),
        }
    }
}
