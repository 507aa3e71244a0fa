//! One-call weather: current conditions, minutely precipitation, hourly and
//! daily forecasts, and active alerts, in imperial units.

use chrono::{DateTime, Utc};
use glass_core::WeatherError;
use serde::{Deserialize, Serialize};

use crate::client::WeatherClient;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherCondition {
    pub id: u32,
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub dt: i64,
    #[serde(default)]
    pub sunrise: Option<i64>,
    #[serde(default)]
    pub sunset: Option<i64>,
    pub temp: f64,
    pub feels_like: f64,
    pub pressure: f64,
    pub humidity: f64,
    #[serde(default)]
    pub dew_point: f64,
    #[serde(default)]
    pub uvi: f64,
    #[serde(default)]
    pub clouds: f64,
    #[serde(default)]
    pub visibility: Option<f64>,
    pub wind_speed: f64,
    pub wind_deg: f64,
    #[serde(default)]
    pub wind_gust: Option<f64>,
    #[serde(default)]
    pub weather: Vec<WeatherCondition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinutelyPrecipitation {
    pub dt: i64,
    pub precipitation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyForecast {
    pub dt: i64,
    pub temp: f64,
    pub feels_like: f64,
    pub pressure: f64,
    pub humidity: f64,
    #[serde(default)]
    pub dew_point: f64,
    #[serde(default)]
    pub uvi: f64,
    #[serde(default)]
    pub clouds: f64,
    #[serde(default)]
    pub visibility: Option<f64>,
    pub wind_speed: f64,
    pub wind_deg: f64,
    #[serde(default)]
    pub wind_gust: Option<f64>,
    #[serde(default)]
    pub weather: Vec<WeatherCondition>,
    /// Probability of precipitation, 0..=1
    #[serde(default)]
    pub pop: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTemperature {
    pub day: f64,
    pub min: f64,
    pub max: f64,
    pub night: f64,
    pub eve: f64,
    pub morn: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyFeelsLike {
    pub day: f64,
    pub night: f64,
    pub eve: f64,
    pub morn: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    pub dt: i64,
    pub sunrise: i64,
    pub sunset: i64,
    #[serde(default)]
    pub moonrise: i64,
    #[serde(default)]
    pub moonset: i64,
    #[serde(default)]
    pub moon_phase: f64,
    #[serde(default)]
    pub summary: Option<String>,
    pub temp: DailyTemperature,
    pub feels_like: DailyFeelsLike,
    pub pressure: f64,
    pub humidity: f64,
    #[serde(default)]
    pub dew_point: f64,
    pub wind_speed: f64,
    pub wind_deg: f64,
    #[serde(default)]
    pub wind_gust: Option<f64>,
    #[serde(default)]
    pub weather: Vec<WeatherCondition>,
    #[serde(default)]
    pub clouds: f64,
    #[serde(default)]
    pub pop: f64,
    #[serde(default)]
    pub rain: Option<f64>,
    #[serde(default)]
    pub uvi: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherAlert {
    pub sender_name: String,
    pub event: String,
    pub start: i64,
    pub end: i64,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl WeatherAlert {
    /// Whether the alert window covers `now`.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        let ts = now.timestamp();
        self.start <= ts && ts <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneCallResponse {
    pub lat: f64,
    pub lon: f64,
    pub timezone: String,
    pub timezone_offset: i32,
    pub current: CurrentConditions,
    #[serde(default)]
    pub minutely: Vec<MinutelyPrecipitation>,
    #[serde(default)]
    pub hourly: Vec<HourlyForecast>,
    #[serde(default)]
    pub daily: Vec<DailyForecast>,
    #[serde(default)]
    pub alerts: Vec<WeatherAlert>,
}

impl OneCallResponse {
    /// Night when `now` is before sunrise or after sunset.
    pub fn is_night_at(&self, now: DateTime<Utc>) -> bool {
        let ts = now.timestamp();
        match (self.current.sunrise, self.current.sunset) {
            (Some(sunrise), Some(sunset)) => ts < sunrise || ts > sunset,
            _ => false,
        }
    }

    pub fn primary_condition(&self) -> Option<&WeatherCondition> {
        self.current.weather.first()
    }

    /// The next `hours` hourly entries.
    pub fn next_hours(&self, hours: usize) -> &[HourlyForecast] {
        &self.hourly[..self.hourly.len().min(hours)]
    }
}

impl WeatherClient {
    #[tracing::instrument(skip(self))]
    pub async fn one_call(&self, lat: f64, lon: f64) -> Result<OneCallResponse, WeatherError> {
        self.get_json(
            "Weather data fetch",
            "data/3.0/onecall",
            &[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("units", "imperial".to_string()),
            ],
        )
        .await
    }
}
