//! Preference stores: typed records overlaid on stored partial documents.

use std::sync::Arc;
use std::time::Duration;

use glass_core::PersistenceError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::overlay::{merge_shallow, overlay};
use crate::storage::{persist, read_json, KeyValueStore, USER_PREFERENCES_KEY};

/// A record persisted as one JSON document under a fixed key.
pub trait Preferences: Serialize + DeserializeOwned + Clone + Default + Send + 'static {
    const STORAGE_KEY: &'static str;
}

/// Callback run with the new record after every load or mutation.
pub type ApplyHook<T> = Box<dyn Fn(&T) + Send + Sync>;

/// Generic get/update/reset over a [`Preferences`] record.
///
/// Storage errors never reach callers: reads fall back to defaults and
/// failed writes keep the in-memory record.
pub struct PreferenceStore<T: Preferences> {
    kv: Arc<dyn KeyValueStore>,
    record: T,
    /// Signals captured from the environment when the store was opened.
    environment: Value,
    on_apply: Option<ApplyHook<T>>,
}

impl<T: Preferences> PreferenceStore<T> {
    pub fn open(kv: Arc<dyn KeyValueStore>) -> Self {
        Self::open_with_environment(kv, Value::Object(Map::new()))
    }

    /// Open with an environment overlay applied over stored values on load
    /// and over defaults on reset.
    pub fn open_with_environment(kv: Arc<dyn KeyValueStore>, environment: Value) -> Self {
        let mut store = Self {
            kv,
            record: T::default(),
            environment,
            on_apply: None,
        };
        store.record = store.load();
        store
    }

    /// Register the side-effect hook and run it once with the current record.
    pub fn with_on_apply(mut self, hook: impl Fn(&T) + Send + Sync + 'static) -> Self {
        hook(&self.record);
        self.on_apply = Some(Box::new(hook));
        self
    }

    /// Read the stored document and overlay it on defaults.
    pub fn try_load(&self) -> Result<T, PersistenceError> {
        let stored: Option<Value> = read_json(self.kv.as_ref(), T::STORAGE_KEY)?;
        let stored = stored.unwrap_or_else(|| Value::Object(Map::new()));
        overlay(&T::default(), &[&stored, &self.environment])
    }

    /// Like [`try_load`](Self::try_load), substituting defaults on any error.
    pub fn load(&self) -> T {
        match self.try_load() {
            Ok(record) => record,
            Err(e) => {
                tracing::error!("Error reading {} from storage: {}", T::STORAGE_KEY, e);
                self.defaults()
            }
        }
    }

    pub fn get(&self) -> &T {
        &self.record
    }

    /// Apply a typed change in one write.
    pub fn update(&mut self, change: impl FnOnce(&mut T)) -> &T {
        let mut next = self.record.clone();
        change(&mut next);
        self.commit(next)
    }

    /// Set one field by its stored key.
    pub fn set(&mut self, key: &str, value: impl Serialize) -> Result<&T, PersistenceError> {
        let mut patch = Map::new();
        patch.insert(key.to_string(), serde_json::to_value(value)?);
        self.update_many(&Value::Object(patch))
    }

    /// Overlay a partial object in a single write.
    ///
    /// Fails without writing when the patch does not fit the record.
    pub fn update_many(&mut self, patch: &Value) -> Result<&T, PersistenceError> {
        let next = overlay(&self.record, &[patch])?;
        Ok(self.commit(next))
    }

    /// Restore defaults (plus environment signals) and write them back.
    pub fn reset(&mut self) -> &T {
        let defaults = self.defaults();
        self.commit(defaults)
    }

    fn defaults(&self) -> T {
        let mut base = match serde_json::to_value(T::default()) {
            Ok(Value::Object(map)) => map,
            _ => return T::default(),
        };
        merge_shallow(&mut base, &self.environment);
        serde_json::from_value(Value::Object(base)).unwrap_or_default()
    }

    fn commit(&mut self, next: T) -> &T {
        persist(self.kv.as_ref(), T::STORAGE_KEY, &next);
        if let Some(hook) = &self.on_apply {
            hook(&next);
        }
        self.record = next;
        &self.record
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AnimationSpeed {
    Slow,
    #[default]
    Normal,
    Fast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    Celsius,
    #[default]
    Fahrenheit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WindUnit {
    #[default]
    Mph,
    Kph,
    Ms,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PressureUnit {
    #[default]
    #[serde(rename = "hPa")]
    HPa,
    #[serde(rename = "inHg")]
    InHg,
    #[serde(rename = "mmHg")]
    MmHg,
}

/// Display, accessibility and behavior settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    // Motion
    pub reduced_motion: bool,
    pub disable_animations: bool,
    pub animation_speed: AnimationSpeed,

    // Accessibility
    pub high_contrast: bool,
    pub large_text: bool,
    pub screen_reader_optimized: bool,

    // Units
    pub temperature_unit: TemperatureUnit,
    pub wind_unit: WindUnit,
    pub pressure_unit: PressureUnit,

    // Refresh behavior
    pub compact_mode: bool,
    pub show_seconds: bool,
    pub auto_refresh: bool,
    /// Minutes
    pub refresh_interval: u32,

    // Notifications
    pub weather_alerts: bool,
    pub sound_enabled: bool,

    // Privacy
    pub save_location: bool,
    pub share_usage_data: bool,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            reduced_motion: false,
            disable_animations: false,
            animation_speed: AnimationSpeed::Normal,
            high_contrast: false,
            large_text: false,
            screen_reader_optimized: false,
            temperature_unit: TemperatureUnit::Fahrenheit,
            wind_unit: WindUnit::Mph,
            pressure_unit: PressureUnit::HPa,
            compact_mode: false,
            show_seconds: false,
            auto_refresh: true,
            refresh_interval: 10,
            weather_alerts: true,
            sound_enabled: true,
            save_location: true,
            share_usage_data: false,
        }
    }
}

impl Preferences for UserPreferences {
    const STORAGE_KEY: &'static str = USER_PREFERENCES_KEY;
}

/// Values derived from preferences for the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedValues {
    pub animation_class: &'static str,
    pub animation_duration: f64,
    pub text_size_multiplier: f64,
    /// `None` when auto refresh is off
    pub refresh_interval: Option<Duration>,
}

/// Units to request from the weather API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiUnits {
    pub units: &'static str,
    pub wind_speed: WindUnit,
    pub pressure: PressureUnit,
}

/// Document-level flags toggled alongside preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DocumentFlags {
    pub reduce_motion: bool,
    pub slow_animations: bool,
    pub fast_animations: bool,
    pub high_contrast: bool,
    pub large_text: bool,
    pub compact_mode: bool,
}

impl DocumentFlags {
    /// Class names to set on the document root.
    pub fn class_names(&self) -> Vec<&'static str> {
        [
            (self.reduce_motion, "reduce-motion"),
            (self.slow_animations, "slow-animations"),
            (self.fast_animations, "fast-animations"),
            (self.high_contrast, "high-contrast"),
            (self.large_text, "large-text"),
            (self.compact_mode, "compact-mode"),
        ]
        .into_iter()
        .filter_map(|(on, class)| on.then_some(class))
        .collect()
    }
}

impl UserPreferences {
    pub fn should_reduce_motion(&self) -> bool {
        self.reduced_motion || self.disable_animations
    }

    pub fn should_show_animations(&self) -> bool {
        !self.should_reduce_motion()
    }

    pub fn is_accessibility_mode(&self) -> bool {
        self.high_contrast || self.large_text || self.screen_reader_optimized
    }

    pub fn derived(&self) -> DerivedValues {
        let animation_class = if self.disable_animations {
            "no-animations"
        } else if self.reduced_motion {
            "reduced-motion"
        } else {
            ""
        };
        let animation_duration = match self.animation_speed {
            AnimationSpeed::Slow => 1.5,
            AnimationSpeed::Normal => 1.0,
            AnimationSpeed::Fast => 0.5,
        };
        DerivedValues {
            animation_class,
            animation_duration,
            text_size_multiplier: if self.large_text { 1.2 } else { 1.0 },
            refresh_interval: self
                .auto_refresh
                .then(|| Duration::from_secs(u64::from(self.refresh_interval) * 60)),
        }
    }

    pub fn api_units(&self) -> ApiUnits {
        ApiUnits {
            units: match self.temperature_unit {
                TemperatureUnit::Celsius => "metric",
                TemperatureUnit::Fahrenheit => "imperial",
            },
            wind_speed: self.wind_unit,
            pressure: self.pressure_unit,
        }
    }

    pub fn document_flags(&self) -> DocumentFlags {
        DocumentFlags {
            reduce_motion: self.should_reduce_motion(),
            slow_animations: self.animation_speed == AnimationSpeed::Slow,
            fast_animations: self.animation_speed == AnimationSpeed::Fast,
            high_contrast: self.high_contrast,
            large_text: self.large_text,
            compact_mode: self.compact_mode,
        }
    }
}

/// Accessibility signals reported by the host environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SystemPreferences {
    pub reduced_motion: bool,
    pub high_contrast: bool,
}

impl SystemPreferences {
    pub const REDUCED_MOTION_ENV: &'static str = "WEATHER_GLASS_REDUCED_MOTION";
    pub const HIGH_CONTRAST_ENV: &'static str = "WEATHER_GLASS_HIGH_CONTRAST";

    pub fn detect() -> Self {
        fn flag(name: &str) -> bool {
            std::env::var(name)
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false)
        }
        Self {
            reduced_motion: flag(Self::REDUCED_MOTION_ENV),
            high_contrast: flag(Self::HIGH_CONTRAST_ENV),
        }
    }

    /// Only signals that are on are overlaid; absent signals never clear a stored choice.
    pub fn as_overlay(&self) -> Value {
        let mut map = Map::new();
        if self.reduced_motion {
            map.insert("reducedMotion".to_string(), Value::Bool(true));
        }
        if self.high_contrast {
            map.insert("highContrast".to_string(), Value::Bool(true));
        }
        Value::Object(map)
    }
}

/// Store for [`UserPreferences`], aware of system accessibility signals.
pub type UserPreferenceStore = PreferenceStore<UserPreferences>;

impl PreferenceStore<UserPreferences> {
    pub fn open_user(kv: Arc<dyn KeyValueStore>, system: SystemPreferences) -> Self {
        Self::open_with_environment(kv, system.as_overlay())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{write_json, MemoryStore};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn memory() -> Arc<dyn KeyValueStore> {
        Arc::new(MemoryStore::new())
    }

    #[test]
    fn test_empty_storage_yields_defaults() {
        let store = UserPreferenceStore::open(memory());
        assert_eq!(store.get(), &UserPreferences::default());
    }

    #[test]
    fn test_missing_refresh_interval_filled_from_defaults() {
        let kv = memory();
        write_json(
            kv.as_ref(),
            USER_PREFERENCES_KEY,
            &json!({ "highContrast": true, "windUnit": "kph", "autoRefresh": false }),
        )
        .unwrap();

        let store = UserPreferenceStore::open(kv);
        let prefs = store.get();
        assert_eq!(prefs.refresh_interval, 10);
        assert!(prefs.high_contrast);
        assert_eq!(prefs.wind_unit, WindUnit::Kph);
        assert!(!prefs.auto_refresh);
    }

    #[test]
    fn test_corrupt_storage_yields_defaults() {
        let kv = memory();
        kv.set(USER_PREFERENCES_KEY, "not json").unwrap();
        let store = UserPreferenceStore::open(kv);
        assert!(store.try_load().is_err());
        assert_eq!(store.get(), &UserPreferences::default());
    }

    #[test]
    fn test_update_persists_full_record() {
        let kv = memory();
        let mut store = UserPreferenceStore::open(kv.clone());
        store.update(|p| p.large_text = true);

        let raw: Value = read_json(kv.as_ref(), USER_PREFERENCES_KEY).unwrap().unwrap();
        assert_eq!(raw["largeText"], json!(true));
        assert_eq!(raw["refreshInterval"], json!(10));
    }

    #[test]
    fn test_set_by_key_and_reject_bad_type() {
        let mut store = UserPreferenceStore::open(memory());
        store.set("temperatureUnit", "celsius").unwrap();
        assert_eq!(store.get().temperature_unit, TemperatureUnit::Celsius);

        assert!(store.set("refreshInterval", "soon").is_err());
        assert_eq!(store.get().refresh_interval, 10);
    }

    #[test]
    fn test_update_many_applies_once() {
        let writes = Arc::new(AtomicUsize::new(0));
        let counter = writes.clone();
        let mut store = UserPreferenceStore::open(memory())
            .with_on_apply(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        let before = writes.load(Ordering::SeqCst);

        store
            .update_many(&json!({ "compactMode": true, "showSeconds": true }))
            .unwrap();

        assert_eq!(writes.load(Ordering::SeqCst), before + 1);
        assert!(store.get().compact_mode && store.get().show_seconds);
    }

    #[test]
    fn test_system_signals_overlay_and_survive_reset() {
        let system = SystemPreferences {
            reduced_motion: true,
            high_contrast: false,
        };
        let mut store = UserPreferenceStore::open_user(memory(), system);
        assert!(store.get().reduced_motion);

        store.update(|p| p.large_text = true);
        let reset = store.reset();
        assert!(reset.reduced_motion);
        assert!(!reset.large_text);
    }

    #[test]
    fn test_derived_values() {
        let mut prefs = UserPreferences::default();
        let derived = prefs.derived();
        assert_eq!(derived.animation_class, "");
        assert_eq!(derived.refresh_interval, Some(Duration::from_secs(600)));

        prefs.disable_animations = true;
        prefs.animation_speed = AnimationSpeed::Slow;
        prefs.large_text = true;
        prefs.auto_refresh = false;
        let derived = prefs.derived();
        assert_eq!(derived.animation_class, "no-animations");
        assert_eq!(derived.animation_duration, 1.5);
        assert_eq!(derived.text_size_multiplier, 1.2);
        assert_eq!(derived.refresh_interval, None);
    }

    #[test]
    fn test_api_units_and_flags() {
        let mut prefs = UserPreferences::default();
        assert_eq!(prefs.api_units().units, "imperial");
        prefs.temperature_unit = TemperatureUnit::Celsius;
        prefs.reduced_motion = true;
        prefs.animation_speed = AnimationSpeed::Fast;
        assert_eq!(prefs.api_units().units, "metric");
        assert_eq!(
            prefs.document_flags().class_names(),
            vec!["reduce-motion", "fast-animations"]
        );
    }

    #[test]
    fn test_pressure_unit_wire_names() {
        assert_eq!(serde_json::to_value(PressureUnit::InHg).unwrap(), json!("inHg"));
        assert_eq!(serde_json::to_value(WindUnit::Ms).unwrap(), json!("ms"));
    }
}
