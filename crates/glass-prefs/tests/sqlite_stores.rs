//! Stores backed by an on-disk SQLite file survive reopening.

use std::sync::Arc;

use glass_prefs::storage::{FAVORITE_CITIES_KEY, USER_PREFERENCES_KEY};
use glass_prefs::{
    FavoritesRegistry, KeyValueStore, LayoutStore, NewFavorite, SqliteStore, SystemPreferences,
    ThemeManager, UserPreferenceStore,
};
use tempfile::TempDir;

fn open_store(dir: &TempDir) -> Arc<dyn KeyValueStore> {
    Arc::new(SqliteStore::open(&dir.path().join("storage.db")).unwrap())
}

#[test]
fn test_state_survives_reopen() {
    let dir = TempDir::new().unwrap();

    {
        let kv = open_store(&dir);
        let mut favorites = FavoritesRegistry::open(kv.clone());
        favorites.add(NewFavorite {
            name: "Lisbon".to_string(),
            state: None,
            country: "PT".to_string(),
            lat: 38.7223,
            lon: -9.1393,
        });

        let mut layout = LayoutStore::open(kv.clone());
        layout.toggle_widget("weather-radar");

        let mut themes = ThemeManager::open(kv.clone());
        themes.set_enhanced_theme("winter");

        let mut prefs = UserPreferenceStore::open_user(kv, SystemPreferences::default());
        prefs.update(|p| p.compact_mode = true);
    }

    let kv = open_store(&dir);
    assert!(FavoritesRegistry::open(kv.clone()).is_favorite(38.7223, -9.1393));
    assert!(LayoutStore::open(kv.clone()).is_widget_enabled("weather-radar"));
    assert_eq!(ThemeManager::open(kv.clone()).current_theme().id, "winter");
    assert!(
        UserPreferenceStore::open_user(kv, SystemPreferences::default())
            .get()
            .compact_mode
    );
}

#[test]
fn test_stored_preferences_missing_keys_take_defaults() {
    let dir = TempDir::new().unwrap();
    let kv = open_store(&dir);
    kv.set(
        USER_PREFERENCES_KEY,
        r#"{"compactMode":true,"temperatureUnit":"celsius"}"#,
    )
    .unwrap();

    let prefs = UserPreferenceStore::open_user(kv, SystemPreferences::default());
    assert_eq!(prefs.get().refresh_interval, 10);
    assert!(prefs.get().compact_mode);
}

#[test]
fn test_corrupt_document_degrades_to_defaults() {
    let dir = TempDir::new().unwrap();
    let kv = open_store(&dir);
    kv.set(FAVORITE_CITIES_KEY, "not json").unwrap();

    assert!(FavoritesRegistry::try_load(kv.as_ref()).is_err());
    assert!(FavoritesRegistry::open(kv).is_empty());
}
