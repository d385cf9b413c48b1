//! HTTP clients: Open-Meteo geocoding search and a remote city registry

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::{CityRegistry, CitySearch, RegistrationError, SearchError};
use crate::state::City;

pub const OPEN_METEO_GEOCODING: &str = "https://geocoding-api.open-meteo.com";

// ============================================================================
// Geocoding API
// ============================================================================

/// Geocoding API response from Open-Meteo
#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    name: String,
    latitude: f64,
    longitude: f64,
    country: Option<String>,
}

impl From<GeocodingResult> for City {
    fn from(result: GeocodingResult) -> Self {
        City {
            name: result.name,
            country: result.country,
            lat: result.latitude,
            lon: result.longitude,
        }
    }
}

fn cities_from_response(data: GeocodingResponse) -> Vec<City> {
    data.results
        .unwrap_or_default()
        .into_iter()
        .map(City::from)
        .collect()
}

pub struct OpenMeteoSearch {
    client: reqwest::Client,
    base_url: String,
}

impl OpenMeteoSearch {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl CitySearch for OpenMeteoSearch {
    async fn search(&self, query: &str) -> Result<Vec<City>, SearchError> {
        let url = format!(
            "{}/v1/search?name={}&count=10&language=en",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(query.trim())
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(SearchError::Status(response.status()));
        }
        let data: GeocodingResponse = response.json().await?;
        Ok(cities_from_response(data))
    }
}

// ============================================================================
// Registry API
// ============================================================================

#[derive(Debug, Deserialize)]
struct AddCityResponse {
    city: City,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddCityFailure {
    #[serde(default)]
    has_city_already: bool,
}

#[derive(Serialize)]
struct AddCityRequest<'a> {
    city: &'a City,
}

/// Registry service reached over HTTP: `POST {base}/cities`
pub struct HttpRegistry {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRegistry {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

/// Map a non-success registry answer to an error; bodies that do not parse
/// count as a plain rejection.
fn registration_failure(city: &City, status: u16, body: &str) -> RegistrationError {
    let failure: AddCityFailure = serde_json::from_str(body).unwrap_or_default();
    if failure.has_city_already {
        RegistrationError::AlreadyPresent(city.name.clone())
    } else {
        RegistrationError::Rejected { status }
    }
}

#[async_trait]
impl CityRegistry for HttpRegistry {
    async fn add(&self, city: &City) -> Result<City, RegistrationError> {
        let url = format!("{}/cities", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(url)
            .json(&AddCityRequest { city })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(registration_failure(city, status.as_u16(), &body));
        }

        let data: AddCityResponse = response.json().await?;
        Ok(data.city)
    }
}
