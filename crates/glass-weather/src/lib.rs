//! Weather data for Weather Glass.
//!
//! Provides OpenWeatherMap adapters (one-call weather, air quality, city
//! search, reverse geocoding, radar tiles, precipitation), a keyed query
//! cache, location polling and display formatting.
//!
//! Fetch errors always surface to the caller as [`WeatherError`] once the
//! retry budget is spent.

pub mod air_quality;
pub mod cache;
pub mod client;
pub mod format;
pub mod geocode;
pub mod location;
pub mod radar;
pub mod rain;
pub mod random;
pub mod retry;
pub mod service;
pub mod ticker;
pub mod weather;

pub use air_quality::{AirQualityReport, AirQualityResponse, AqiInfo, Pollutant, PollutantLevel};
pub use cache::{QueryCache, QueryState};
pub use client::WeatherClient;
pub use geocode::CityCandidate;
pub use glass_core::WeatherError;
pub use location::{FixedLocationSource, LocationPoller, LocationSource, LocationState, Position};
pub use radar::{
    CoverageStatus, PrecipitationIntensity, PrecipitationKind, RadarData, RadarSettings, RadarState,
};
pub use rain::RainForecast;
pub use random::{RandomSource, SeededRandom, ThreadRandom};
pub use retry::RetryConfig;
pub use service::WeatherService;
pub use ticker::FrameTicker;
pub use weather::OneCallResponse;
