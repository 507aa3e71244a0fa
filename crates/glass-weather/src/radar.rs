//! Weather radar: layer catalog state, slippy-map tile math, animation
//! frames, and the precipitation intensity at a point.

use std::collections::BTreeSet;
use std::f64::consts::PI;

use chrono::{DateTime, Utc};
use glass_core::{Coordinates, WeatherError};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::client::WeatherClient;

pub const MIN_ZOOM: u8 = 4;
pub const MAX_ZOOM: u8 = 12;
const FRAME_SPACING_SECS: i64 = 60 * 60;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarLayer {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub opacity: f64,
    pub visible: bool,
    pub z_index: u8,
}

const fn layer(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    opacity: f64,
    visible: bool,
    z_index: u8,
) -> RadarLayer {
    RadarLayer {
        id,
        name,
        description,
        opacity,
        visible,
        z_index,
    }
}

/// Layer visibility and opacity for one radar view.
///
/// Mutations return a new state; the receiver is left untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarState {
    layers: Vec<RadarLayer>,
}

impl Default for RadarState {
    fn default() -> Self {
        Self {
            layers: vec![
                layer("precipitation_new", "Precipitation", "Live precipitation intensity", 0.8, true, 2),
                layer("clouds_new", "Clouds", "Cloud coverage", 0.6, false, 1),
                layer("pressure_new", "Pressure", "Sea level pressure", 0.7, false, 1),
                layer("wind_new", "Wind", "Wind speed and direction", 0.7, false, 1),
                layer("temp_new", "Temperature", "Surface temperature", 0.7, false, 1),
            ],
        }
    }
}

impl RadarState {
    pub fn layers(&self) -> &[RadarLayer] {
        &self.layers
    }

    pub fn layer(&self, id: &str) -> Option<&RadarLayer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn visible_layers(&self) -> impl Iterator<Item = &RadarLayer> {
        self.layers.iter().filter(|l| l.visible)
    }

    /// Unknown ids yield an identical state.
    #[must_use]
    pub fn toggle_layer(&self, id: &str) -> Self {
        self.with_layer(id, |l| l.visible = !l.visible)
    }

    /// Opacity is clamped to `0.0..=1.0`.
    #[must_use]
    pub fn set_layer_opacity(&self, id: &str, opacity: f64) -> Self {
        self.with_layer(id, |l| l.opacity = opacity.clamp(0.0, 1.0))
    }

    fn with_layer(&self, id: &str, change: impl FnOnce(&mut RadarLayer)) -> Self {
        let mut next = self.clone();
        if let Some(layer) = next.layers.iter_mut().find(|l| l.id == id) {
            change(layer);
        }
        next
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarSettings {
    pub auto_play: bool,
    /// Frames per second
    pub play_speed: u32,
    pub show_timestamps: bool,
    pub loop_animation: bool,
    pub max_frames: usize,
}

impl Default for RadarSettings {
    fn default() -> Self {
        Self {
            auto_play: false,
            play_speed: 2,
            show_timestamps: true,
            loop_animation: true,
            max_frames: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TileCoord {
    pub x: i64,
    pub y: i64,
    pub z: u8,
}

pub fn clamp_zoom(zoom: u8) -> u8 {
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

/// Web-mercator tile containing a point.
pub fn tile_for(lat: f64, lon: f64, zoom: u8) -> TileCoord {
    let n = 2f64.powi(i32::from(zoom));
    let lat_rad = lat * PI / 180.0;
    let x = ((lon + 180.0) / 360.0 * n).floor() as i64;
    let y = ((1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * n).floor() as i64;
    TileCoord { x, y, z: zoom }
}

/// The tile containing the point and its eight neighbours, column-major.
pub fn neighborhood(center: TileCoord) -> Vec<TileCoord> {
    let mut tiles = Vec::with_capacity(9);
    for dx in -1..=1 {
        for dy in -1..=1 {
            tiles.push(TileCoord {
                x: center.x + dx,
                y: center.y + dy,
                z: center.z,
            });
        }
    }
    tiles
}

/// `frames` hourly timestamps (unix seconds) ending at `now`, oldest first.
pub fn frame_timestamps(frames: usize, now: DateTime<Utc>) -> Vec<i64> {
    let now = now.timestamp();
    (0..frames as i64)
        .rev()
        .map(|i| now - i * FRAME_SPACING_SECS)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarTile {
    pub layer: String,
    pub url: String,
    pub x: i64,
    pub y: i64,
    pub z: u8,
    /// Unix seconds of the frame
    pub timestamp: i64,
}

pub fn tile_url(
    tile_base: &Url,
    layer: &str,
    tile: TileCoord,
    api_key: &str,
    frame: Option<i64>,
) -> Result<String, WeatherError> {
    let mut url = tile_base.join(&format!("map/{}/{}/{}/{}.png", layer, tile.z, tile.x, tile.y))?;
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("appid", api_key);
        if let Some(ts) = frame {
            query.append_pair("date", &ts.to_string());
        }
    }
    Ok(url.into())
}

/// Tiles for one layer: the 3x3 neighbourhood once per frame, or once at
/// `now` when there are no frames.
pub fn layer_tiles(
    tile_base: &Url,
    api_key: &str,
    center: Coordinates,
    zoom: u8,
    layer: &str,
    frames: &[i64],
    now: DateTime<Utc>,
) -> Result<Vec<RadarTile>, WeatherError> {
    let origin = tile_for(center.latitude, center.longitude, zoom);
    let mut tiles = Vec::with_capacity(9 * frames.len().max(1));

    for coord in neighborhood(origin) {
        if frames.is_empty() {
            tiles.push(RadarTile {
                layer: layer.to_string(),
                url: tile_url(tile_base, layer, coord, api_key, None)?,
                x: coord.x,
                y: coord.y,
                z: coord.z,
                timestamp: now.timestamp(),
            });
        }
        for &ts in frames {
            tiles.push(RadarTile {
                layer: layer.to_string(),
                url: tile_url(tile_base, layer, coord, api_key, Some(ts))?,
                x: coord.x,
                y: coord.y,
                z: coord.z,
                timestamp: ts,
            });
        }
    }
    Ok(tiles)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RadarBounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl RadarBounds {
    /// `0.1 * 2^(10 - zoom)` degrees either side of the center.
    pub fn around(center: Coordinates, zoom: u8) -> Self {
        let range = 0.1 * 2f64.powi(10 - i32::from(zoom));
        Self {
            north: center.latitude + range,
            south: center.latitude - range,
            east: center.longitude + range,
            west: center.longitude - range,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CoverageStatus {
    Unknown,
    NoData,
    Partial,
    Full,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarData {
    pub tiles: Vec<RadarTile>,
    pub layers: Vec<RadarLayer>,
    pub bounds: RadarBounds,
    pub center: Coordinates,
    pub zoom: u8,
    pub last_updated: DateTime<Utc>,
}

impl RadarData {
    pub fn tiles_for_layer(&self, layer_id: &str, timestamp: Option<i64>) -> Vec<&RadarTile> {
        self.tiles
            .iter()
            .filter(|t| t.layer == layer_id && timestamp.map_or(true, |ts| t.timestamp == ts))
            .collect()
    }

    /// Distinct frame timestamps, ascending.
    pub fn animation_timestamps(&self) -> Vec<i64> {
        self.tiles
            .iter()
            .map(|t| t.timestamp)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn is_available(&self) -> bool {
        !self.tiles.is_empty()
    }
}

/// How much of the fetched tile set belongs to layers visible in `state`.
pub fn coverage_status(data: Option<&RadarData>, state: &RadarState) -> CoverageStatus {
    let Some(data) = data else {
        return CoverageStatus::Unknown;
    };
    let visible = data
        .tiles
        .iter()
        .filter(|t| state.layer(&t.layer).is_some_and(|l| l.visible))
        .count();

    if visible == 0 {
        CoverageStatus::NoData
    } else if visible * 2 < data.tiles.len() {
        CoverageStatus::Partial
    } else {
        CoverageStatus::Full
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrecipitationKind {
    None,
    Light,
    Moderate,
    Heavy,
    Extreme,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrecipitationIntensity {
    /// Rain plus snow over the last hour, mm
    pub intensity: f64,
    pub kind: PrecipitationKind,
    pub description: &'static str,
}

impl PrecipitationIntensity {
    pub fn classify(total: f64) -> Self {
        let (kind, description) = if total <= 0.0 {
            (PrecipitationKind::None, "No precipitation")
        } else if total < 0.5 {
            (PrecipitationKind::Light, "Light precipitation")
        } else if total < 2.5 {
            (PrecipitationKind::Moderate, "Moderate precipitation")
        } else if total < 10.0 {
            (PrecipitationKind::Heavy, "Heavy precipitation")
        } else {
            (PrecipitationKind::Extreme, "Extreme precipitation")
        };
        Self {
            intensity: total,
            kind,
            description,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct HourlyVolume {
    #[serde(rename = "1h", default)]
    one_hour: f64,
}

#[derive(Debug, Deserialize)]
struct CurrentPrecipitation {
    #[serde(default)]
    rain: Option<HourlyVolume>,
    #[serde(default)]
    snow: Option<HourlyVolume>,
}

impl WeatherClient {
    /// Assemble tiles for every visible layer around `center`.
    ///
    /// No request is made; the tile URLs are for the caller to load.
    pub fn radar(
        &self,
        state: &RadarState,
        center: Coordinates,
        zoom: u8,
        animate: bool,
        settings: &RadarSettings,
        now: DateTime<Utc>,
    ) -> Result<RadarData, WeatherError> {
        let api_key = self.api_key()?;
        let zoom = clamp_zoom(zoom);
        let frames = if animate {
            frame_timestamps(settings.max_frames, now)
        } else {
            Vec::new()
        };

        let mut tiles = Vec::new();
        for layer in state.visible_layers() {
            tiles.extend(layer_tiles(
                self.tile_base_url(),
                api_key,
                center,
                zoom,
                layer.id,
                &frames,
                now,
            )?);
        }
        tracing::debug!("Radar: {} tiles at zoom {}", tiles.len(), zoom);

        Ok(RadarData {
            tiles,
            layers: state.layers().to_vec(),
            bounds: RadarBounds::around(center, zoom),
            center,
            zoom,
            last_updated: now,
        })
    }

    #[tracing::instrument(skip(self))]
    pub async fn precipitation_intensity(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<PrecipitationIntensity, WeatherError> {
        let current: CurrentPrecipitation = self
            .get_json(
                "Precipitation data fetch",
                "data/2.5/weather",
                &[
                    ("lat", lat.to_string()),
                    ("lon", lon.to_string()),
                    ("units", "metric".to_string()),
                ],
            )
            .await?;

        let rain = current.rain.unwrap_or_default().one_hour;
        let snow = current.snow.unwrap_or_default().one_hour;
        Ok(PrecipitationIntensity::classify(rain + snow))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_tile_for_known_points() {
        assert_eq!(tile_for(0.0, 0.0, 1), TileCoord { x: 1, y: 1, z: 1 });
        // London at zoom 10
        let london = tile_for(51.5074, -0.1278, 10);
        assert_eq!((london.x, london.y), (511, 340));
    }

    #[test]
    fn test_neighborhood_is_three_by_three() {
        let tiles = neighborhood(TileCoord { x: 10, y: 20, z: 6 });
        assert_eq!(tiles.len(), 9);
        assert_eq!(tiles[0], TileCoord { x: 9, y: 19, z: 6 });
        assert_eq!(tiles[4], TileCoord { x: 10, y: 20, z: 6 });
        assert_eq!(tiles[8], TileCoord { x: 11, y: 21, z: 6 });
    }

    #[test]
    fn test_frames_are_hourly_oldest_first() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let frames = frame_timestamps(3, now);
        assert_eq!(
            frames,
            vec![now.timestamp() - 7200, now.timestamp() - 3600, now.timestamp()]
        );
    }

    #[test]
    fn test_tile_url_template() {
        let base = Url::parse("https://tile.openweathermap.org").unwrap();
        let coord = TileCoord { x: 75, y: 96, z: 8 };
        assert_eq!(
            tile_url(&base, "clouds_new", coord, "KEY", None).unwrap(),
            "https://tile.openweathermap.org/map/clouds_new/8/75/96.png?appid=KEY"
        );
        assert_eq!(
            tile_url(&base, "clouds_new", coord, "KEY", Some(1700000000)).unwrap(),
            "https://tile.openweathermap.org/map/clouds_new/8/75/96.png?appid=KEY&date=1700000000"
        );
    }

    #[test]
    fn test_state_mutations_return_new_snapshot() {
        let state = RadarState::default();
        let toggled = state.toggle_layer("clouds_new");

        assert!(!state.layer("clouds_new").unwrap().visible);
        assert!(toggled.layer("clouds_new").unwrap().visible);
        assert_eq!(toggled.visible_layers().count(), 2);

        let dimmed = toggled.set_layer_opacity("clouds_new", 1.7);
        assert_eq!(dimmed.layer("clouds_new").unwrap().opacity, 1.0);
        assert_eq!(toggled.layer("clouds_new").unwrap().opacity, 0.6);

        assert_eq!(state.toggle_layer("nope"), state);
    }

    #[test]
    fn test_bounds_and_zoom_clamp() {
        let bounds = RadarBounds::around(Coordinates::new(40.0, -75.0), 8);
        assert!((bounds.north - 40.4).abs() < 1e-9);
        assert!((bounds.west + 75.4).abs() < 1e-9);
        assert_eq!(clamp_zoom(2), 4);
        assert_eq!(clamp_zoom(15), 12);
    }

    #[test]
    fn test_radar_assembly_and_coverage() {
        let client =
            WeatherClient::new_with_base_url(Some("KEY".into()), "https://tile.example.com").unwrap();
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let state = RadarState::default();
        let settings = RadarSettings::default();

        let data = client
            .radar(&state, Coordinates::new(40.7, -74.0), 8, true, &settings, now)
            .unwrap();
        assert_eq!(data.tiles.len(), 9 * 10);
        assert_eq!(data.animation_timestamps().len(), 10);
        assert_eq!(data.tiles_for_layer("precipitation_new", Some(now.timestamp())).len(), 9);
        assert_eq!(coverage_status(Some(&data), &state), CoverageStatus::Full);

        let hidden = state.toggle_layer("precipitation_new");
        assert_eq!(coverage_status(Some(&data), &hidden), CoverageStatus::NoData);
        assert_eq!(coverage_status(None, &state), CoverageStatus::Unknown);
    }

    #[test]
    fn test_radar_requires_key() {
        let client = WeatherClient::new_with_base_url(None, "https://tile.example.com").unwrap();
        let result = client.radar(
            &RadarState::default(),
            Coordinates::new(0.0, 0.0),
            8,
            false,
            &RadarSettings::default(),
            Utc::now(),
        );
        assert!(matches!(result, Err(WeatherError::MissingApiKey)));
    }

    #[test]
    fn test_precipitation_buckets() {
        assert_eq!(PrecipitationIntensity::classify(0.0).kind, PrecipitationKind::None);
        assert_eq!(PrecipitationIntensity::classify(0.4).kind, PrecipitationKind::Light);
        assert_eq!(PrecipitationIntensity::classify(0.5).kind, PrecipitationKind::Moderate);
        assert_eq!(PrecipitationIntensity::classify(2.5).kind, PrecipitationKind::Heavy);
        assert_eq!(PrecipitationIntensity::classify(10.0).kind, PrecipitationKind::Extreme);
    }
}
