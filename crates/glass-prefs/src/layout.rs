//! Widget layout engine: a fixed widget catalog merged with stored overrides.

use std::collections::BTreeMap;
use std::sync::Arc;

use glass_core::PersistenceError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::overlay::overlay;
use crate::result::MutationResult;
use crate::storage::{persist, read_json, KeyValueStore, WIDGET_LAYOUT_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetCategory {
    Weather,
    Forecast,
    Data,
    Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WidgetSize {
    Small,
    #[default]
    Medium,
    Large,
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    #[default]
    Grid,
    List,
    Masonry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Spacing {
    Compact,
    Normal,
    #[default]
    Spacious,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WidgetPosition {
    pub x: f64,
    pub y: f64,
}

/// Every widget the dashboard knows how to render.
///
/// Render dispatch matches on this enum, so a new widget cannot be
/// added to the catalog without a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    CurrentWeather,
    FavoriteCities,
    WeatherAlerts,
    AirQuality,
    HourlyForecast,
    DailyForecast,
    RainForecast,
    WeatherRadar,
    HistoricalWeather,
    WeatherStats,
}

impl WidgetKind {
    /// Catalog order.
    pub const ALL: [WidgetKind; 10] = [
        WidgetKind::CurrentWeather,
        WidgetKind::FavoriteCities,
        WidgetKind::WeatherAlerts,
        WidgetKind::AirQuality,
        WidgetKind::HourlyForecast,
        WidgetKind::DailyForecast,
        WidgetKind::RainForecast,
        WidgetKind::WeatherRadar,
        WidgetKind::HistoricalWeather,
        WidgetKind::WeatherStats,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            WidgetKind::CurrentWeather => "current-weather",
            WidgetKind::FavoriteCities => "favorite-cities",
            WidgetKind::WeatherAlerts => "weather-alerts",
            WidgetKind::AirQuality => "air-quality",
            WidgetKind::HourlyForecast => "hourly-forecast",
            WidgetKind::DailyForecast => "daily-forecast",
            WidgetKind::RainForecast => "rain-forecast",
            WidgetKind::WeatherRadar => "weather-radar",
            WidgetKind::HistoricalWeather => "historical-weather",
            WidgetKind::WeatherStats => "weather-stats",
        }
    }

    /// `None` for ids stored by older or newer builds.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.id() == id)
    }

    pub fn default_config(&self) -> WidgetConfig {
        use WidgetCategory as C;
        use WidgetSize as S;

        let (name, description, category, icon, enabled, size) = match self {
            WidgetKind::CurrentWeather => (
                "Current Weather",
                "Main weather display with temperature and conditions",
                C::Weather,
                "🌤️",
                true,
                S::Large,
            ),
            WidgetKind::FavoriteCities => (
                "Favorite Cities",
                "Quick weather overview for your saved cities",
                C::Location,
                "❤️",
                true,
                S::Full,
            ),
            WidgetKind::WeatherAlerts => (
                "Weather Alerts",
                "Severe weather warnings and advisories",
                C::Weather,
                "⚠️",
                true,
                S::Full,
            ),
            WidgetKind::AirQuality => (
                "Air Quality",
                "Air quality index and pollutant levels",
                C::Data,
                "🌬️",
                true,
                S::Medium,
            ),
            WidgetKind::HourlyForecast => (
                "Hourly Forecast",
                "Next 12 hours weather forecast",
                C::Forecast,
                "⏰",
                true,
                S::Full,
            ),
            WidgetKind::DailyForecast => (
                "7-Day Forecast",
                "Extended daily weather forecast",
                C::Forecast,
                "📅",
                true,
                S::Full,
            ),
            WidgetKind::RainForecast => (
                "Rain Forecast",
                "60-minute precipitation forecast with demo mode",
                C::Forecast,
                "🌧️",
                true,
                S::Medium,
            ),
            WidgetKind::WeatherRadar => (
                "Weather Radar",
                "Live precipitation and storm tracking",
                C::Weather,
                "🌦️",
                false,
                S::Large,
            ),
            WidgetKind::HistoricalWeather => (
                "Historical Data",
                "Weather trends and historical comparisons",
                C::Data,
                "📊",
                false,
                S::Medium,
            ),
            WidgetKind::WeatherStats => (
                "Weather Statistics",
                "Detailed weather metrics and measurements",
                C::Data,
                "📈",
                false,
                S::Medium,
            ),
        };

        let order = Self::ALL.iter().position(|k| k == self).unwrap_or_default() as i64;
        WidgetConfig {
            id: self.id().to_string(),
            name: name.to_string(),
            description: description.to_string(),
            category,
            icon: icon.to_string(),
            enabled,
            order,
            size,
            position: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: WidgetCategory,
    #[serde(default)]
    pub icon: String,
    pub enabled: bool,
    pub order: i64,
    #[serde(default)]
    pub size: WidgetSize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<WidgetPosition>,
}

impl WidgetConfig {
    pub fn kind(&self) -> Option<WidgetKind> {
        WidgetKind::from_id(&self.id)
    }

    /// Display sort key: `order`, then catalog position, unknown ids last.
    pub fn display_rank(&self) -> (i64, usize) {
        let catalog_index = WidgetKind::ALL
            .iter()
            .position(|k| k.id() == self.id)
            .unwrap_or(usize::MAX);
        (self.order, catalog_index)
    }
}

/// Partial widget update; `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WidgetPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub enabled: Option<bool>,
    pub order: Option<i64>,
    pub size: Option<WidgetSize>,
    pub position: Option<WidgetPosition>,
}

/// Partial update of the layout settings (widgets excluded).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutPatch {
    pub layout: Option<LayoutMode>,
    pub columns: Option<u32>,
    pub spacing: Option<Spacing>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    pub widgets: Vec<WidgetConfig>,
    pub layout: LayoutMode,
    pub columns: u32,
    pub spacing: Spacing,
    /// Epoch milliseconds of the last persisted write; 0 when never saved.
    pub last_modified: i64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            widgets: default_widgets(),
            layout: LayoutMode::Grid,
            columns: 2,
            spacing: Spacing::Spacious,
            last_modified: 0,
        }
    }
}

pub fn default_widgets() -> Vec<WidgetConfig> {
    WidgetKind::ALL.iter().map(WidgetKind::default_config).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("Invalid widget indices")]
    Index,
}

/// Merge a stored layout document with the current catalog.
///
/// Catalog widgets take their stored overrides per id; stored widgets
/// missing from the catalog are kept after them; the result is sorted
/// by [`WidgetConfig::display_rank`].
pub fn merge_stored_layout(stored: &Value) -> Result<LayoutConfig, PersistenceError> {
    let stored_widgets: Vec<&Value> = stored
        .get("widgets")
        .and_then(Value::as_array)
        .map(|ws| ws.iter().collect())
        .unwrap_or_default();

    let find_stored = |id: &str| {
        stored_widgets
            .iter()
            .copied()
            .find(|w| w.get("id").and_then(Value::as_str) == Some(id))
    };

    let mut widgets = Vec::with_capacity(WidgetKind::ALL.len() + stored_widgets.len());
    for kind in WidgetKind::ALL {
        let default = kind.default_config();
        let merged = match find_stored(kind.id()) {
            Some(over) => overlay(&default, &[over]).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable widget override {}: {}", kind.id(), e);
                default
            }),
            None => default,
        };
        widgets.push(merged);
    }

    for raw in stored_widgets {
        let id = raw.get("id").and_then(Value::as_str).unwrap_or_default();
        if WidgetKind::from_id(id).is_some() {
            continue;
        }
        match serde_json::from_value::<WidgetConfig>(raw.clone()) {
            Ok(widget) => widgets.push(widget),
            Err(e) => tracing::warn!("Dropping unreadable stored widget {:?}: {}", id, e),
        }
    }

    widgets.sort_by_key(WidgetConfig::display_rank);

    let mut settings = stored.clone();
    if let Value::Object(map) = &mut settings {
        map.remove("widgets");
    }
    let mut config: LayoutConfig = overlay(&LayoutConfig::default(), &[&settings])?;
    config.widgets = widgets;
    Ok(config)
}

pub struct LayoutStore {
    kv: Arc<dyn KeyValueStore>,
    config: LayoutConfig,
}

impl LayoutStore {
    pub fn open(kv: Arc<dyn KeyValueStore>) -> Self {
        let mut store = Self {
            kv,
            config: LayoutConfig::default(),
        };
        store.config = store.load();
        store
    }

    pub fn try_load(&self) -> Result<LayoutConfig, PersistenceError> {
        match read_json::<Value>(self.kv.as_ref(), WIDGET_LAYOUT_KEY)? {
            Some(stored) => merge_stored_layout(&stored),
            None => Ok(LayoutConfig::default()),
        }
    }

    /// Read and merge the stored layout, falling back to defaults.
    pub fn load(&self) -> LayoutConfig {
        self.try_load().unwrap_or_else(|e| {
            tracing::error!("Error reading layout from storage: {}", e);
            LayoutConfig::default()
        })
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn widget(&self, id: &str) -> Option<&WidgetConfig> {
        self.config.widgets.iter().find(|w| w.id == id)
    }

    pub fn is_widget_enabled(&self, id: &str) -> bool {
        self.widget(id).is_some_and(|w| w.enabled)
    }

    /// Enabled widgets in display order.
    pub fn enabled_widgets(&self) -> Vec<&WidgetConfig> {
        let mut enabled: Vec<&WidgetConfig> =
            self.config.widgets.iter().filter(|w| w.enabled).collect();
        enabled.sort_by_key(|w| w.display_rank());
        enabled
    }

    pub fn total_widgets(&self) -> usize {
        self.config.widgets.len()
    }

    pub fn enabled_count(&self) -> usize {
        self.config.widgets.iter().filter(|w| w.enabled).count()
    }

    pub fn widgets_by_category(&self) -> BTreeMap<WidgetCategory, Vec<&WidgetConfig>> {
        let mut categories: BTreeMap<WidgetCategory, Vec<&WidgetConfig>> = [
            WidgetCategory::Weather,
            WidgetCategory::Forecast,
            WidgetCategory::Data,
            WidgetCategory::Location,
        ]
        .into_iter()
        .map(|c| (c, Vec::new()))
        .collect();

        for widget in &self.config.widgets {
            categories.entry(widget.category).or_default().push(widget);
        }
        categories
    }

    /// Flip `enabled` on one widget. Unknown ids succeed without a change.
    pub fn toggle_widget(&mut self, id: &str) -> MutationResult {
        if let Some(widget) = self.config.widgets.iter_mut().find(|w| w.id == id) {
            widget.enabled = !widget.enabled;
            self.save();
        }
        MutationResult::ok(format!("Widget {} toggled", id))
    }

    /// Move an enabled widget within the enabled, order-sorted subset and
    /// renumber the enabled widgets 0..k. Disabled widgets keep their order.
    pub fn try_reorder_widgets(&mut self, from: usize, to: usize) -> Result<(), LayoutError> {
        let mut enabled: Vec<String> = self
            .enabled_widgets()
            .into_iter()
            .map(|w| w.id.clone())
            .collect();
        if from >= enabled.len() || to >= enabled.len() {
            return Err(LayoutError::Index);
        }

        let moved = enabled.remove(from);
        enabled.insert(to, moved);

        for widget in self.config.widgets.iter_mut().filter(|w| w.enabled) {
            if let Some(position) = enabled.iter().position(|id| *id == widget.id) {
                widget.order = position as i64;
            }
        }
        self.save();
        Ok(())
    }

    pub fn reorder_widgets(&mut self, from: usize, to: usize) -> MutationResult {
        MutationResult::from_outcome(
            self.try_reorder_widgets(from, to)
                .map(|()| "Widgets reordered".to_string()),
        )
    }

    pub fn update_widget(&mut self, id: &str, patch: WidgetPatch) -> MutationResult {
        if let Some(widget) = self.config.widgets.iter_mut().find(|w| w.id == id) {
            if let Some(name) = patch.name {
                widget.name = name;
            }
            if let Some(description) = patch.description {
                widget.description = description;
            }
            if let Some(enabled) = patch.enabled {
                widget.enabled = enabled;
            }
            if let Some(order) = patch.order {
                widget.order = order;
            }
            if let Some(size) = patch.size {
                widget.size = size;
            }
            if patch.position.is_some() {
                widget.position = patch.position;
            }
            self.save();
        }
        MutationResult::ok(format!("Widget {} updated", id))
    }

    pub fn update_layout(&mut self, patch: LayoutPatch) -> MutationResult {
        if let Some(layout) = patch.layout {
            self.config.layout = layout;
        }
        if let Some(columns) = patch.columns {
            self.config.columns = columns.max(1);
        }
        if let Some(spacing) = patch.spacing {
            self.config.spacing = spacing;
        }
        self.save();
        MutationResult::ok("Layout updated")
    }

    pub fn reset_layout(&mut self) -> MutationResult {
        self.config = LayoutConfig::default();
        self.save();
        MutationResult::ok("Layout reset to defaults")
    }

    /// Container classes for the configured layout.
    pub fn layout_classes(&self) -> String {
        layout_classes(&self.config)
    }

    fn save(&mut self) {
        self.config.last_modified = chrono::Utc::now().timestamp_millis();
        persist(self.kv.as_ref(), WIDGET_LAYOUT_KEY, &self.config);
    }
}

pub fn layout_classes(config: &LayoutConfig) -> String {
    let gap = match config.spacing {
        Spacing::Compact => "4",
        Spacing::Normal => "6",
        Spacing::Spacious => "8",
    };
    let columns = config.columns;
    let md_columns = columns.min(2);

    let layout = match config.layout {
        LayoutMode::Grid => format!(
            "grid gap-{gap} grid-cols-1 md:grid-cols-{md_columns} lg:grid-cols-{columns}"
        ),
        LayoutMode::List => format!("space-y-{gap}"),
        LayoutMode::Masonry => format!(
            "columns-1 md:columns-{md_columns} lg:columns-{columns} gap-{gap}"
        ),
    };
    format!("w-full {layout}")
}

pub fn widget_size_classes(size: WidgetSize) -> &'static str {
    match size {
        WidgetSize::Small => "col-span-1",
        WidgetSize::Medium => "col-span-1 md:col-span-1",
        WidgetSize::Large => "col-span-1 md:col-span-2",
        WidgetSize::Full => "col-span-full",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{write_json, MemoryStore};
    use serde_json::json;

    fn store_with(doc: Option<Value>) -> (Arc<dyn KeyValueStore>, LayoutStore) {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        if let Some(doc) = doc {
            write_json(kv.as_ref(), WIDGET_LAYOUT_KEY, &doc).unwrap();
        }
        let store = LayoutStore::open(kv.clone());
        (kv, store)
    }

    fn enabled_ids(store: &LayoutStore) -> Vec<String> {
        store.enabled_widgets().iter().map(|w| w.id.clone()).collect()
    }

    #[test]
    fn test_catalog_kinds_round_trip_ids() {
        for kind in WidgetKind::ALL {
            assert_eq!(WidgetKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(WidgetKind::from_id("retired-widget"), None);
    }

    #[test]
    fn test_defaults_without_storage() {
        let (_, store) = store_with(None);
        assert_eq!(store.total_widgets(), 10);
        assert_eq!(store.enabled_count(), 7);
        assert_eq!(store.config().columns, 2);
        assert_eq!(store.config().spacing, Spacing::Spacious);
    }

    #[test]
    fn test_stored_overrides_win_and_unknown_widgets_survive() {
        let (_, store) = store_with(Some(json!({
            "layout": "list",
            "widgets": [
                { "id": "weather-radar", "enabled": true, "order": 0, "size": "full" },
                { "id": "retired-widget", "name": "Retired", "category": "data",
                  "enabled": false, "order": 42 }
            ]
        })));

        let radar = store.widget("weather-radar").unwrap();
        assert!(radar.enabled);
        assert_eq!(radar.size, WidgetSize::Full);
        assert_eq!(radar.name, "Weather Radar");
        assert!(store.widget("retired-widget").is_some());
        assert_eq!(store.config().layout, LayoutMode::List);
        assert_eq!(store.config().columns, 2);
        assert_eq!(store.total_widgets(), 11);
    }

    #[test]
    fn test_merge_sorts_by_order_with_catalog_tie_break() {
        let (_, store) = store_with(Some(json!({
            "widgets": [ { "id": "weather-stats", "order": 0 } ]
        })));
        let ids: Vec<_> = store.config().widgets.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids[0], "current-weather");
        assert_eq!(ids[1], "weather-stats");
    }

    #[test]
    fn test_order_ties_follow_catalog_after_reload() {
        let (kv, mut store) = store_with(Some(json!({
            "widgets": [ { "id": "weather-stats", "order": 5 } ]
        })));

        // rain-forecast drops to order 5, tying with weather-stats which
        // sits ahead of it in memory.
        store.try_reorder_widgets(5, 6).unwrap();
        assert_eq!(store.widget("rain-forecast").unwrap().order, 5);
        store.toggle_widget("weather-stats");

        let live = enabled_ids(&store);
        let reloaded = enabled_ids(&LayoutStore::open(kv));
        assert_eq!(live, reloaded);

        let rain = live.iter().position(|id| id == "rain-forecast").unwrap();
        let stats = live.iter().position(|id| id == "weather-stats").unwrap();
        assert_eq!(stats, rain + 1);
    }

    #[test]
    fn test_unknown_widgets_rank_after_catalog_ties() {
        let custom = WidgetConfig {
            id: "custom".to_string(),
            ..WidgetKind::CurrentWeather.default_config()
        };
        assert_eq!(custom.display_rank(), (0, usize::MAX));
        assert!(WidgetKind::CurrentWeather.default_config().display_rank() < custom.display_rank());
    }

    #[test]
    fn test_load_is_idempotent() {
        let (_, store) = store_with(Some(json!({
            "columns": 3,
            "widgets": [ { "id": "air-quality", "enabled": false } ]
        })));
        assert_eq!(store.load(), store.load());
    }

    #[test]
    fn test_toggle_flips_only_target() {
        let (_, mut store) = store_with(None);
        let before = store.config().widgets.clone();
        assert!(store.toggle_widget("weather-radar").success);

        for (old, new) in before.iter().zip(&store.config().widgets) {
            if old.id == "weather-radar" {
                assert_ne!(old.enabled, new.enabled);
            } else {
                assert_eq!(old, new);
            }
        }
    }

    #[test]
    fn test_toggle_unknown_is_noop_success() {
        let (kv, mut store) = store_with(None);
        assert!(store.toggle_widget("nope").success);
        assert_eq!(kv.get(WIDGET_LAYOUT_KEY).unwrap(), None);
    }

    #[test]
    fn test_reorder_rewrites_enabled_orders_only() {
        let (_, mut store) = store_with(Some(json!({
            "widgets": [
                { "id": "current-weather", "enabled": true, "order": 0 },
                { "id": "favorite-cities", "enabled": true, "order": 1 },
                { "id": "weather-alerts", "enabled": true, "order": 2 },
                { "id": "air-quality", "enabled": true, "order": 3 },
                { "id": "hourly-forecast", "enabled": false, "order": 4 },
                { "id": "daily-forecast", "enabled": false, "order": 5 },
                { "id": "rain-forecast", "enabled": false, "order": 6 }
            ]
        })));
        assert_eq!(store.enabled_count(), 4);

        store.try_reorder_widgets(0, 2).unwrap();

        assert_eq!(
            enabled_ids(&store),
            vec!["favorite-cities", "weather-alerts", "current-weather", "air-quality"]
        );
        let orders: Vec<i64> = store.enabled_widgets().iter().map(|w| w.order).collect();
        assert_eq!(orders, vec![0, 1, 2, 3]);
        assert_eq!(store.widget("current-weather").unwrap().order, 2);
        assert_eq!(store.widget("hourly-forecast").unwrap().order, 4);
        assert_eq!(store.widget("weather-stats").unwrap().order, 9);
    }

    #[test]
    fn test_reorder_rejects_disabled_index_space() {
        let (kv, mut store) = store_with(None);
        let result = store.reorder_widgets(0, 7);
        assert!(!result.success);
        assert_eq!(result.message, "Invalid widget indices");
        assert_eq!(kv.get(WIDGET_LAYOUT_KEY).unwrap(), None);
    }

    #[test]
    fn test_toggle_and_reorder_preserve_ids_and_contiguous_orders() {
        let (_, mut store) = store_with(None);
        let mut ids_before: Vec<_> = store.config().widgets.iter().map(|w| w.id.clone()).collect();
        ids_before.sort();

        store.toggle_widget("weather-radar");
        store.toggle_widget("air-quality");
        store.try_reorder_widgets(6, 0).unwrap();
        store.try_reorder_widgets(1, 3).unwrap();

        let mut ids_after: Vec<_> = store.config().widgets.iter().map(|w| w.id.clone()).collect();
        ids_after.sort();
        assert_eq!(ids_before, ids_after);

        let orders: Vec<i64> = store.enabled_widgets().iter().map(|w| w.order).collect();
        assert_eq!(orders, (0..store.enabled_count() as i64).collect::<Vec<_>>());
    }

    #[test]
    fn test_update_widget_and_persist_last_modified() {
        let (kv, mut store) = store_with(None);
        store.update_widget(
            "air-quality",
            WidgetPatch {
                size: Some(WidgetSize::Large),
                ..Default::default()
            },
        );
        assert_eq!(store.widget("air-quality").unwrap().size, WidgetSize::Large);
        assert!(store.config().last_modified > 0);

        let reopened = LayoutStore::open(kv);
        assert_eq!(reopened.widget("air-quality").unwrap().size, WidgetSize::Large);
        assert_eq!(reopened.config().last_modified, store.config().last_modified);
    }

    #[test]
    fn test_update_layout_and_reset() {
        let (_, mut store) = store_with(None);
        store.update_layout(LayoutPatch {
            layout: Some(LayoutMode::Masonry),
            columns: Some(3),
            spacing: Some(Spacing::Compact),
        });
        assert_eq!(
            store.layout_classes(),
            "w-full columns-1 md:columns-2 lg:columns-3 gap-4"
        );

        store.reset_layout();
        assert_eq!(
            store.layout_classes(),
            "w-full grid gap-8 grid-cols-1 md:grid-cols-2 lg:grid-cols-2"
        );
    }

    #[test]
    fn test_widget_size_classes() {
        assert_eq!(widget_size_classes(WidgetSize::Full), "col-span-full");
        assert_eq!(widget_size_classes(WidgetSize::Large), "col-span-1 md:col-span-2");
    }

    #[test]
    fn test_widgets_by_category() {
        let (_, store) = store_with(None);
        let categories = store.widgets_by_category();
        assert_eq!(categories[&WidgetCategory::Location].len(), 1);
        assert_eq!(categories[&WidgetCategory::Forecast].len(), 3);
    }
}
