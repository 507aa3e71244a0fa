//! Air pollution: the 1-5 index mapped to display tiers, and pollutant
//! concentrations bucketed against WHO-derived thresholds.

use chrono::{DateTime, Utc};
use glass_core::WeatherError;
use serde::{Deserialize, Serialize};

use crate::client::WeatherClient;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirQualityResponse {
    #[serde(default)]
    pub coord: Option<AirQualityCoord>,
    #[serde(default)]
    pub list: Vec<AirQualitySample>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AirQualityCoord {
    pub lon: f64,
    pub lat: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirQualitySample {
    pub main: AqiMain,
    pub components: PollutantConcentrations,
    pub dt: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AqiMain {
    pub aqi: u8,
}

/// Concentrations in μg/m³.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PollutantConcentrations {
    pub co: f64,
    #[serde(default)]
    pub no: f64,
    pub no2: f64,
    pub o3: f64,
    pub so2: f64,
    pub pm2_5: f64,
    pub pm10: f64,
    #[serde(default)]
    pub nh3: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AqiInfo {
    /// 1..=5, or 0 when unknown
    pub index: u8,
    pub level: &'static str,
    pub description: &'static str,
    pub color: &'static str,
    pub bg_color: &'static str,
    pub health_recommendations: &'static [&'static str],
    pub icon: &'static str,
}

impl AqiInfo {
    pub fn for_index(aqi: u8) -> Self {
        match aqi {
            1 => Self::tier(
                1,
                "Good",
                "Air quality is excellent",
                "text-green-600",
                "bg-green-100 dark:bg-green-900/20 border-green-200 dark:border-green-800",
                &[
                    "Perfect day for outdoor activities",
                    "Ideal for exercise and sports",
                    "All groups can enjoy outdoor activities",
                ],
                "😊",
            ),
            2 => Self::tier(
                2,
                "Fair",
                "Air quality is acceptable",
                "text-yellow-600",
                "bg-yellow-100 dark:bg-yellow-900/20 border-yellow-200 dark:border-yellow-800",
                &[
                    "Good day for most outdoor activities",
                    "Sensitive individuals should limit prolonged exposure",
                    "Consider reducing outdoor exercise intensity",
                ],
                "🙂",
            ),
            3 => Self::tier(
                3,
                "Moderate",
                "Air quality is moderate",
                "text-orange-600",
                "bg-orange-100 dark:bg-orange-900/20 border-orange-200 dark:border-orange-800",
                &[
                    "Sensitive groups should reduce outdoor activities",
                    "Consider wearing a mask during outdoor exercise",
                    "Limit prolonged outdoor exertion",
                ],
                "😐",
            ),
            4 => Self::tier(
                4,
                "Poor",
                "Air quality is poor",
                "text-red-600",
                "bg-red-100 dark:bg-red-900/20 border-red-200 dark:border-red-800",
                &[
                    "Avoid outdoor activities",
                    "Stay indoors with windows closed",
                    "Use air purifiers if available",
                    "Wear N95 masks if you must go outside",
                ],
                "😷",
            ),
            5 => Self::tier(
                5,
                "Very Poor",
                "Air quality is hazardous",
                "text-purple-600",
                "bg-purple-100 dark:bg-purple-900/20 border-purple-200 dark:border-purple-800",
                &[
                    "Stay indoors at all times",
                    "Keep windows and doors closed",
                    "Use high-efficiency air purifiers",
                    "Seek medical attention if experiencing symptoms",
                    "Avoid all outdoor activities",
                ],
                "☠️",
            ),
            _ => Self::tier(
                0,
                "Unknown",
                "Air quality data unavailable",
                "text-gray-600",
                "bg-gray-100 dark:bg-gray-900/20 border-gray-200 dark:border-gray-800",
                &["Air quality data is currently unavailable"],
                "❓",
            ),
        }
    }

    const fn tier(
        index: u8,
        level: &'static str,
        description: &'static str,
        color: &'static str,
        bg_color: &'static str,
        health_recommendations: &'static [&'static str],
        icon: &'static str,
    ) -> Self {
        Self {
            index,
            level,
            description,
            color,
            bg_color,
            health_recommendations,
            icon,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Pollutant {
    Pm2_5,
    Pm10,
    O3,
    No2,
    So2,
    Co,
}

impl Pollutant {
    pub const ALL: [Pollutant; 6] = [
        Pollutant::Pm2_5,
        Pollutant::Pm10,
        Pollutant::O3,
        Pollutant::No2,
        Pollutant::So2,
        Pollutant::Co,
    ];

    /// Upper bounds (inclusive) of the first four levels.
    pub fn thresholds(&self) -> [f64; 4] {
        match self {
            Pollutant::Pm2_5 => [12.0, 35.0, 55.0, 150.0],
            Pollutant::Pm10 => [25.0, 50.0, 90.0, 180.0],
            Pollutant::O3 => [60.0, 100.0, 140.0, 180.0],
            Pollutant::No2 => [40.0, 80.0, 180.0, 280.0],
            Pollutant::So2 => [20.0, 80.0, 250.0, 500.0],
            Pollutant::Co => [4000.0, 9000.0, 15000.0, 30000.0],
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Pollutant::Pm2_5 => "PM2.5",
            Pollutant::Pm10 => "PM10",
            Pollutant::O3 => "Ozone",
            Pollutant::No2 => "NO₂",
            Pollutant::So2 => "SO₂",
            Pollutant::Co => "CO",
        }
    }

    pub fn value_in(&self, components: &PollutantConcentrations) -> f64 {
        match self {
            Pollutant::Pm2_5 => components.pm2_5,
            Pollutant::Pm10 => components.pm10,
            Pollutant::O3 => components.o3,
            Pollutant::No2 => components.no2,
            Pollutant::So2 => components.so2,
            Pollutant::Co => components.co,
        }
    }

    /// First level whose threshold the value does not exceed.
    pub fn level(&self, value: f64) -> PollutantLevel {
        self.thresholds()
            .iter()
            .position(|t| value <= *t)
            .map_or(PollutantLevel::ExtremelyHigh, |i| PollutantLevel::ORDERED[i])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum PollutantLevel {
    Low,
    Moderate,
    High,
    VeryHigh,
    ExtremelyHigh,
}

impl PollutantLevel {
    const ORDERED: [PollutantLevel; 5] = [
        PollutantLevel::Low,
        PollutantLevel::Moderate,
        PollutantLevel::High,
        PollutantLevel::VeryHigh,
        PollutantLevel::ExtremelyHigh,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PollutantLevel::Low => "Low",
            PollutantLevel::Moderate => "Moderate",
            PollutantLevel::High => "High",
            PollutantLevel::VeryHigh => "Very High",
            PollutantLevel::ExtremelyHigh => "Extremely High",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollutantReading {
    pub pollutant: Pollutant,
    pub name: &'static str,
    pub value: f64,
    pub level: PollutantLevel,
    pub unit: &'static str,
}

/// The current air-quality sample with its display tier and pollutant levels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirQualityReport {
    pub sample: AirQualitySample,
    pub aqi: AqiInfo,
    pub pollutants: Vec<PollutantReading>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl AirQualityReport {
    /// `None` when the response carries no samples.
    pub fn from_response(response: &AirQualityResponse) -> Option<Self> {
        let sample = response.list.first()?.clone();
        let pollutants = Pollutant::ALL
            .iter()
            .map(|p| {
                let value = p.value_in(&sample.components);
                PollutantReading {
                    pollutant: *p,
                    name: p.display_name(),
                    value,
                    level: p.level(value),
                    unit: "μg/m³",
                }
            })
            .collect();

        Some(Self {
            aqi: AqiInfo::for_index(sample.main.aqi),
            last_updated: DateTime::from_timestamp(sample.dt, 0),
            pollutants,
            sample,
        })
    }
}

impl WeatherClient {
    #[tracing::instrument(skip(self))]
    pub async fn air_pollution(&self, lat: f64, lon: f64) -> Result<AirQualityResponse, WeatherError> {
        self.get_json(
            "Air quality data fetch",
            "data/2.5/air_pollution",
            &[("lat", lat.to_string()), ("lon", lon.to_string())],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pm25_boundary_is_inclusive() {
        assert_eq!(Pollutant::Pm2_5.level(12.0), PollutantLevel::Low);
        assert_eq!(Pollutant::Pm2_5.level(12.01), PollutantLevel::Moderate);
        assert_eq!(Pollutant::Pm2_5.level(150.0), PollutantLevel::VeryHigh);
        assert_eq!(Pollutant::Pm2_5.level(150.5), PollutantLevel::ExtremelyHigh);
    }

    #[test]
    fn test_co_thresholds() {
        assert_eq!(Pollutant::Co.level(0.0), PollutantLevel::Low);
        assert_eq!(Pollutant::Co.level(9000.0), PollutantLevel::Moderate);
        assert_eq!(Pollutant::Co.level(14_999.0), PollutantLevel::High);
        assert_eq!(PollutantLevel::ExtremelyHigh.label(), "Extremely High");
    }

    #[test]
    fn test_aqi_tiers() {
        assert_eq!(AqiInfo::for_index(1).level, "Good");
        assert_eq!(AqiInfo::for_index(4).health_recommendations.len(), 4);
        assert_eq!(AqiInfo::for_index(5).icon, "☠️");

        let unknown = AqiInfo::for_index(9);
        assert_eq!(unknown.index, 0);
        assert_eq!(unknown.level, "Unknown");
    }

    #[test]
    fn test_report_from_response() {
        let response: AirQualityResponse = serde_json::from_value(serde_json::json!({
            "coord": { "lon": -74.0, "lat": 40.7 },
            "list": [{
                "main": { "aqi": 2 },
                "components": {
                    "co": 230.31, "no": 0.1, "no2": 13.2, "o3": 61.0,
                    "so2": 2.1, "pm2_5": 5.4, "pm10": 8.0, "nh3": 0.9
                },
                "dt": 1_700_000_000
            }]
        }))
        .unwrap();

        let report = AirQualityReport::from_response(&response).unwrap();
        assert_eq!(report.aqi.level, "Fair");
        assert_eq!(report.pollutants.len(), 6);
        let ozone = report
            .pollutants
            .iter()
            .find(|r| r.pollutant == Pollutant::O3)
            .unwrap();
        assert_eq!(ozone.level, PollutantLevel::Moderate);
        assert_eq!(report.last_updated.map(|t| t.timestamp()), Some(1_700_000_000));
    }

    #[test]
    fn test_empty_response_has_no_report() {
        let response = AirQualityResponse {
            coord: None,
            list: Vec::new(),
        };
        assert!(AirQualityReport::from_response(&response).is_none());
    }
}
