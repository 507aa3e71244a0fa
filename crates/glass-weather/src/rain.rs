//! Next-hour rain forecast in five-minute steps, with a demo mode that
//! simulates a passing shower.

use std::fmt;

use chrono::{DateTime, Duration, TimeZone};
use serde::Serialize;

use crate::random::RandomSource;

pub const POINTS: usize = 12;
pub const STEP_MINUTES: i64 = 5;
/// Demo rain falls on these point indices.
const DEMO_SHOWER: std::ops::RangeInclusive<usize> = 2..=8;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RainDataPoint {
    /// Local `HH:MM`
    pub time: String,
    /// mm/h
    pub precipitation: f64,
    /// Epoch milliseconds
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RainForecast {
    pub points: Vec<RainDataPoint>,
    pub demo: bool,
}

impl RainForecast {
    /// Simulated shower: `0.5 + 2r` mm/h (to 0.1) in the middle of the hour.
    pub fn demo<Tz>(now: &DateTime<Tz>, rng: &mut dyn RandomSource) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let points = timeline(now, |i| {
            if DEMO_SHOWER.contains(&i) {
                let mm = rng.next_f64() * 2.0 + 0.5;
                (mm * 10.0).round() / 10.0
            } else {
                0.0
            }
        });
        Self { points, demo: true }
    }

    /// Live mode. No minute-level source is wired in, so it reports dry.
    pub fn live<Tz>(now: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        Self {
            points: timeline(now, |_| 0.0),
            demo: false,
        }
    }

    pub fn build<Tz>(demo: bool, now: &DateTime<Tz>, rng: &mut dyn RandomSource) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        if demo {
            Self::demo(now, rng)
        } else {
            Self::live(now)
        }
    }

    pub fn has_rain(&self) -> bool {
        self.points.iter().any(|p| p.precipitation > 0.0)
    }

    /// Chart scale: the largest value, never below 1 mm/h.
    pub fn max_precipitation(&self) -> f64 {
        self.points
            .iter()
            .map(|p| p.precipitation)
            .fold(1.0, f64::max)
    }

    /// Live mode with no rain is hidden entirely.
    pub fn should_display(&self) -> bool {
        self.demo || self.has_rain()
    }
}

fn timeline<Tz>(now: &DateTime<Tz>, mut precipitation: impl FnMut(usize) -> f64) -> Vec<RainDataPoint>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    (0..POINTS)
        .map(|i| {
            let at = now.clone() + Duration::minutes(STEP_MINUTES * i as i64);
            RainDataPoint {
                time: at.format("%H:%M").to_string(),
                precipitation: precipitation(i),
                timestamp: at.timestamp_millis(),
            }
        })
        .collect()
}

pub fn intensity_text(precipitation: f64) -> &'static str {
    if precipitation <= 0.0 {
        "No rain"
    } else if precipitation < 0.5 {
        "Light"
    } else if precipitation < 1.0 {
        "Moderate"
    } else if precipitation < 2.0 {
        "Heavy"
    } else {
        "Very heavy"
    }
}

pub fn intensity_color(precipitation: f64) -> &'static str {
    if precipitation <= 0.0 {
        "bg-gray-200 dark:bg-gray-700"
    } else if precipitation < 0.5 {
        "bg-blue-200 dark:bg-blue-800"
    } else if precipitation < 1.0 {
        "bg-blue-400 dark:bg-blue-600"
    } else if precipitation < 2.0 {
        "bg-blue-600 dark:bg-blue-500"
    } else {
        "bg-blue-800 dark:bg-blue-400"
    }
}
