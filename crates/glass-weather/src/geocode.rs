//! City search and reverse geocoding against the OpenWeatherMap geocoder.

use std::collections::HashMap;
use std::collections::HashSet;

use glass_core::{CoordinateId, WeatherError};
use serde::{Deserialize, Serialize};

use crate::client::WeatherClient;

/// Queries shorter than this (after trimming) never hit the network.
pub const MIN_QUERY_LEN: usize = 2;
pub const SEARCH_LIMIT: u32 = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitySearchResult {
    pub name: String,
    #[serde(default)]
    pub local_names: Option<HashMap<String, String>>,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub state: Option<String>,
}

/// A search hit ready for display, keyed like a favorite.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityCandidate {
    pub id: CoordinateId,
    pub name: String,
    pub state: Option<String>,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    pub display_name: String,
}

impl From<CitySearchResult> for CityCandidate {
    fn from(city: CitySearchResult) -> Self {
        let display_name = match &city.state {
            Some(state) => format!("{}, {}, {}", city.name, state, city.country),
            None => format!("{}, {}", city.name, city.country),
        };
        Self {
            id: CoordinateId::new(city.lat, city.lon),
            name: city.name,
            state: city.state,
            country: city.country,
            lat: city.lat,
            lon: city.lon,
            display_name,
        }
    }
}

/// Format raw results and drop repeats of `(name, country)`, keeping the
/// first one seen.
pub fn candidates_from_results(results: Vec<CitySearchResult>) -> Vec<CityCandidate> {
    let mut seen = HashSet::new();
    results
        .into_iter()
        .map(CityCandidate::from)
        .filter(|city| seen.insert((city.name.clone(), city.country.clone())))
        .collect()
}

/// Trimmed query, or `None` when too short to search.
pub fn normalize_query(query: &str) -> Option<&str> {
    let trimmed = query.trim();
    (trimmed.chars().count() >= MIN_QUERY_LEN).then_some(trimmed)
}

#[derive(Debug, Clone, Deserialize)]
struct ReversePlace {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    country: Option<String>,
}

pub const UNKNOWN_LOCATION: &str = "Unknown Location";

fn place_label(places: &[ReversePlace]) -> String {
    let Some(place) = places.first() else {
        return UNKNOWN_LOCATION.to_string();
    };

    let mut label = place
        .name
        .as_deref()
        .filter(|n| !n.is_empty())
        .unwrap_or("Unknown")
        .to_string();
    for part in [&place.state, &place.country].into_iter().flatten() {
        if !part.is_empty() {
            label.push_str(", ");
            label.push_str(part);
        }
    }
    label
}

impl WeatherClient {
    /// Search cities by name. Short queries return no results without a request.
    #[tracing::instrument(skip(self))]
    pub async fn search_cities(&self, query: &str) -> Result<Vec<CityCandidate>, WeatherError> {
        let Some(query) = normalize_query(query) else {
            return Ok(Vec::new());
        };

        let results: Vec<CitySearchResult> = self
            .get_json(
                "City search",
                "geo/1.0/direct",
                &[("q", query.to_string()), ("limit", SEARCH_LIMIT.to_string())],
            )
            .await?;

        let candidates = candidates_from_results(results);
        tracing::debug!("City search {:?} -> {} candidates", query, candidates.len());
        Ok(candidates)
    }

    /// `"Name, State, Country"` for a coordinate, or `"Unknown Location"`.
    #[tracing::instrument(skip(self))]
    pub async fn reverse_geocode(&self, lat: f64, lon: f64) -> Result<String, WeatherError> {
        let places: Vec<ReversePlace> = self
            .get_json(
                "Reverse geocoding",
                "geo/1.0/reverse",
                &[
                    ("lat", lat.to_string()),
                    ("lon", lon.to_string()),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;

        let label = place_label(&places);
        tracing::info!("Reverse geocoded to: {}", label);
        Ok(label)
    }
}
