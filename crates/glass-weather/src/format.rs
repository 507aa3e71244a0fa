//! Display formatting for weather values.

use chrono::{DateTime, FixedOffset};

use crate::random::RandomSource;

const COMPASS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// 16-point compass label for a bearing in degrees.
pub fn wind_direction(degrees: f64) -> &'static str {
    let normalized = degrees.rem_euclid(360.0);
    let index = ((normalized / 22.5).round() as usize) % COMPASS.len();
    COMPASS[index]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UvInfo {
    pub level: &'static str,
    pub color: &'static str,
}

pub fn uv_description(uvi: f64) -> UvInfo {
    let (level, color) = if uvi < 3.0 {
        ("Low", "text-green-500")
    } else if uvi < 6.0 {
        ("Moderate", "text-yellow-500")
    } else if uvi < 8.0 {
        ("High", "text-orange-500")
    } else if uvi < 11.0 {
        ("Very High", "text-red-500")
    } else {
        ("Extreme", "text-purple-500")
    };
    UvInfo { level, color }
}

/// Drop the first `.<digits>` run, e.g. `"72.46°"` becomes `"72°"`.
pub fn remove_trailing_numbers(input: &str) -> String {
    let bytes = input.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b != b'.' {
            continue;
        }
        let digits = bytes[i + 1..].iter().take_while(|c| c.is_ascii_digit()).count();
        if digits > 0 {
            let mut out = String::with_capacity(input.len());
            out.push_str(&input[..i]);
            out.push_str(&input[i + 1 + digits..]);
            return out;
        }
    }
    input.to_string()
}

/// Emoji for a condition description such as `"light rain"`.
pub fn weather_emoji(description: &str, is_night: bool) -> &'static str {
    let d = description.to_lowercase();
    if d.contains("thunder") {
        "⛈️"
    } else if d.contains("snow") || d.contains("sleet") {
        "❄️"
    } else if d.contains("drizzle") {
        "🌦️"
    } else if d.contains("rain") {
        "🌧️"
    } else if d.contains("mist") || d.contains("fog") || d.contains("haze") || d.contains("smoke") {
        "🌫️"
    } else if d.contains("overcast") || d.contains("broken clouds") {
        "☁️"
    } else if d.contains("cloud") {
        if is_night {
            "☁️"
        } else {
            "⛅"
        }
    } else if d.contains("clear") {
        if is_night {
            "🌙"
        } else {
            "☀️"
        }
    } else if is_night {
        "🌙"
    } else {
        "🌤️"
    }
}

/// Local clock time (`"3:05 PM"`) for a unix timestamp at a UTC offset.
pub fn format_time(timestamp: i64, utc_offset_secs: i32) -> String {
    local_time(timestamp, utc_offset_secs)
        .map(|t| t.format("%-I:%M %p").to_string())
        .unwrap_or_default()
}

/// Short weekday and date (`"Mon, Jan 5"`).
pub fn format_date(timestamp: i64, utc_offset_secs: i32) -> String {
    local_time(timestamp, utc_offset_secs)
        .map(|t| t.format("%a, %b %-d").to_string())
        .unwrap_or_default()
}

fn local_time(timestamp: i64, utc_offset_secs: i32) -> Option<DateTime<FixedOffset>> {
    let offset = FixedOffset::east_opt(utc_offset_secs)?;
    DateTime::from_timestamp(timestamp, 0).map(|t| t.with_timezone(&offset))
}

const THUNDER_QUIPS: &[&str] = &[
    "Thunder and lightning. Very, very frightening. Stay inside.",
    "The sky is throwing a tantrum. Unplug something expensive.",
    "Storms overhead. Your golf game can wait.",
];
const SNOW_QUIPS: &[&str] = &[
    "Snow is falling. Time to pretend you know how to drive in it.",
    "It's a winter wonderland, if you like shoveling.",
    "Fresh powder. Your car is now a snowbank.",
];
const RAIN_QUIPS: &[&str] = &[
    "It's wet out there. Groundbreaking, I know.",
    "Bring an umbrella, or embrace the drowned-rat look.",
    "The sky is leaking again. Someone call a plumber.",
];
const HOT_QUIPS: &[&str] = &[
    "It's hot enough to fry an egg on the sidewalk. Please don't.",
    "The sun has chosen violence today.",
    "Stay hydrated. Your houseplants are judging you.",
];
const WARM_QUIPS: &[&str] = &[
    "Warm and pleasant. Don't get used to it.",
    "Shorts weather. Your legs have been warned.",
    "Perfect day to pretend you'll go for a run.",
];
const MILD_QUIPS: &[&str] = &[
    "Mild and forgettable, like elevator music.",
    "Not too hot, not too cold. Goldilocks approves.",
    "Light jacket weather. Or not. Live your truth.",
];
const CHILLY_QUIPS: &[&str] = &[
    "Chilly enough to regret leaving the hoodie at home.",
    "Crisp air. Great for pretending you're in a sweater ad.",
    "Cold-ish. Your nose will notice first.",
];
const FREEZING_QUIPS: &[&str] = &[
    "It's freezing. Even the penguins are filing complaints.",
    "Cold enough to see your breath and question your life choices.",
    "Layers. All of them. Now.",
];

/// The quips eligible for a temperature (°F) and condition description.
///
/// Conditions take precedence over the temperature band.
pub fn comment_candidates(temp_f: f64, description: &str) -> &'static [&'static str] {
    let d = description.to_lowercase();
    if d.contains("thunder") {
        THUNDER_QUIPS
    } else if d.contains("snow") {
        SNOW_QUIPS
    } else if d.contains("rain") || d.contains("drizzle") {
        RAIN_QUIPS
    } else if temp_f >= 90.0 {
        HOT_QUIPS
    } else if temp_f >= 75.0 {
        WARM_QUIPS
    } else if temp_f >= 55.0 {
        MILD_QUIPS
    } else if temp_f >= 35.0 {
        CHILLY_QUIPS
    } else {
        FREEZING_QUIPS
    }
}

/// One quip for the conditions, chosen through `rng`.
pub fn weather_comment(temp_f: f64, description: &str, rng: &mut dyn RandomSource) -> &'static str {
    let candidates = comment_candidates(temp_f, description);
    candidates[rng.pick_index(candidates.len())]
}
