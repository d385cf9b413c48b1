//! Collaborator seams: city search and city registration

use std::sync::Mutex;

use async_trait::async_trait;

use crate::state::City;

#[derive(thiserror::Error, Debug)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("search service answered {0}")]
    Status(reqwest::StatusCode),
}

#[derive(thiserror::Error, Debug)]
pub enum RegistrationError {
    #[error("{0} is already registered")]
    AlreadyPresent(String),
    #[error("registry rejected the city with status {status}")]
    Rejected { status: u16 },
    #[error("registration request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("registry state unavailable")]
    Unavailable,
}

impl RegistrationError {
    /// Whether the failure means the city is already in the collection
    pub fn has_city_already(&self) -> bool {
        matches!(self, RegistrationError::AlreadyPresent(_))
    }
}

#[async_trait]
pub trait CitySearch: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<City>, SearchError>;
}

#[async_trait]
pub trait CityRegistry: Send + Sync {
    /// Returns the city as confirmed by the registry
    async fn add(&self, city: &City) -> Result<City, RegistrationError>;
}

/// In-process registry used when no registry service is configured
#[derive(Default)]
pub struct LocalRegistry {
    cities: Mutex<Vec<City>>,
}

impl LocalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the registered cities
    pub fn cities(&self) -> Result<Vec<City>, RegistrationError> {
        self.cities
            .lock()
            .map(|cities| cities.clone())
            .map_err(|_| RegistrationError::Unavailable)
    }
}

#[async_trait]
impl CityRegistry for LocalRegistry {
    async fn add(&self, city: &City) -> Result<City, RegistrationError> {
        let mut cities = self
            .cities
            .lock()
            .map_err(|_| RegistrationError::Unavailable)?;
        if cities.contains(city) {
            return Err(RegistrationError::AlreadyPresent(city.name.clone()));
        }
        cities.push(city.clone());
        Ok(city.clone())
    }
}
