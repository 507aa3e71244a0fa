//! Cached queries over [`WeatherClient`], one cache per adapter.
//!
//! Each query is gated on its precondition (coordinates present, query long
//! enough) and reports [`QueryState::Idle`] until it holds.

use std::time::Duration;

use chrono::Utc;
use glass_core::{Coordinates, CoordinateId, WeatherError};

use crate::air_quality::{AirQualityReport, AirQualityResponse};
use crate::cache::{QueryCache, QueryState};
use crate::client::WeatherClient;
use crate::geocode::{normalize_query, CityCandidate};
use crate::radar::{PrecipitationIntensity, RadarData, RadarSettings, RadarState};
use crate::weather::OneCallResponse;

pub const WEATHER_FRESHNESS: Duration = Duration::from_secs(5 * 60);
pub const AIR_QUALITY_FRESHNESS: Duration = Duration::from_secs(30 * 60);
pub const CITY_SEARCH_FRESHNESS: Duration = Duration::from_secs(5 * 60);
pub const CITY_NAME_FRESHNESS: Duration = Duration::from_secs(5 * 60);
pub const PRECIPITATION_FRESHNESS: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_RADAR_FRESHNESS: Duration = Duration::from_secs(10 * 60);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RadarKey {
    place: CoordinateId,
    zoom: u8,
    animate: bool,
    visible_layers: Vec<&'static str>,
}

pub struct WeatherService {
    client: WeatherClient,
    weather: QueryCache<CoordinateId, OneCallResponse>,
    air_quality: QueryCache<CoordinateId, AirQualityResponse>,
    city_search: QueryCache<String, Vec<CityCandidate>>,
    city_name: QueryCache<CoordinateId, String>,
    precipitation: QueryCache<CoordinateId, PrecipitationIntensity>,
    radar: QueryCache<RadarKey, RadarData>,
}

impl WeatherService {
    pub fn new(client: WeatherClient) -> Self {
        Self::with_radar_refresh(client, DEFAULT_RADAR_FRESHNESS)
    }

    pub fn with_radar_refresh(client: WeatherClient, radar_refresh: Duration) -> Self {
        Self {
            client,
            weather: QueryCache::new("weather", WEATHER_FRESHNESS),
            air_quality: QueryCache::new("air-quality", AIR_QUALITY_FRESHNESS),
            city_search: QueryCache::new("city-search", CITY_SEARCH_FRESHNESS),
            city_name: QueryCache::new("city-name", CITY_NAME_FRESHNESS),
            precipitation: QueryCache::new("precipitation", PRECIPITATION_FRESHNESS),
            radar: QueryCache::new("radar", radar_refresh),
        }
    }

    pub fn client(&self) -> &WeatherClient {
        &self.client
    }

    pub async fn weather(
        &self,
        at: Option<Coordinates>,
    ) -> Result<QueryState<OneCallResponse>, WeatherError> {
        let Some(c) = at else {
            return Ok(QueryState::Idle);
        };
        self.weather
            .get_or_fetch(c.id(), true, || self.client.one_call(c.latitude, c.longitude))
            .await
    }

    pub async fn air_quality(
        &self,
        at: Option<Coordinates>,
    ) -> Result<QueryState<AirQualityResponse>, WeatherError> {
        let Some(c) = at else {
            return Ok(QueryState::Idle);
        };
        self.air_quality
            .get_or_fetch(c.id(), true, || self.client.air_pollution(c.latitude, c.longitude))
            .await
    }

    /// Air quality shaped for display; `None` when idle or empty.
    pub async fn air_quality_report(
        &self,
        at: Option<Coordinates>,
    ) -> Result<Option<AirQualityReport>, WeatherError> {
        let state = self.air_quality(at).await?;
        Ok(state.data().and_then(AirQualityReport::from_response))
    }

    pub async fn search_cities(
        &self,
        query: &str,
        enabled: bool,
    ) -> Result<QueryState<Vec<CityCandidate>>, WeatherError> {
        let trimmed = normalize_query(query);
        let key = trimmed.unwrap_or_default().to_string();
        self.city_search
            .get_or_fetch(key, enabled && trimmed.is_some(), || {
                self.client.search_cities(query)
            })
            .await
    }

    pub async fn city_name(
        &self,
        at: Option<Coordinates>,
    ) -> Result<QueryState<String>, WeatherError> {
        let Some(c) = at else {
            return Ok(QueryState::Idle);
        };
        self.city_name
            .get_or_fetch(c.id(), true, || self.client.reverse_geocode(c.latitude, c.longitude))
            .await
    }

    pub async fn precipitation(
        &self,
        at: Option<Coordinates>,
    ) -> Result<QueryState<PrecipitationIntensity>, WeatherError> {
        let Some(c) = at else {
            return Ok(QueryState::Idle);
        };
        self.precipitation
            .get_or_fetch(c.id(), true, || {
                self.client.precipitation_intensity(c.latitude, c.longitude)
            })
            .await
    }

    pub async fn radar(
        &self,
        at: Option<Coordinates>,
        state: &RadarState,
        zoom: u8,
        animate: bool,
        settings: &RadarSettings,
    ) -> Result<QueryState<RadarData>, WeatherError> {
        let Some(c) = at else {
            return Ok(QueryState::Idle);
        };
        let key = RadarKey {
            place: c.id(),
            zoom,
            animate,
            visible_layers: state.visible_layers().map(|l| l.id).collect(),
        };
        self.radar
            .get_or_fetch(key, true, || async {
                self.client.radar(state, c, zoom, animate, settings, Utc::now())
            })
            .await
    }

    /// Forget cached results for a place so the next read refetches.
    pub fn invalidate_place(&self, at: Coordinates) {
        let id = at.id();
        self.weather.invalidate(&id);
        self.air_quality.invalidate(&id);
        self.city_name.invalidate(&id);
        self.precipitation.invalidate(&id);
    }
}
