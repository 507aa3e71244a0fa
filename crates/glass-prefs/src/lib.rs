//! Persisted dashboard state: user preferences, enhanced themes, favorite
//! cities, widget layout and the rain demo flag.
//!
//! Every store reads through an explicit `try_load` and absorbs failures
//! into defaults at `open`/`load`; writes are logged on failure and never
//! propagated. Validation failures come back as [`MutationResult`].

pub mod demo_mode;
pub mod favorites;
pub mod layout;
pub mod overlay;
pub mod preferences;
pub mod result;
pub mod storage;
pub mod theme;

pub use demo_mode::DemoModeStore;
pub use favorites::{FavoriteCity, FavoritesError, FavoritesRegistry, NewFavorite, MAX_FAVORITES};
pub use layout::{
    layout_classes, widget_size_classes, LayoutConfig, LayoutError, LayoutMode, LayoutPatch,
    LayoutStore, Spacing, WidgetCategory, WidgetConfig, WidgetKind, WidgetPatch, WidgetPosition,
    WidgetSize,
};
pub use preferences::{
    AnimationSpeed, ApiUnits, DerivedValues, DocumentFlags, PreferenceStore, Preferences,
    PressureUnit, SystemPreferences, TemperatureUnit, UserPreferenceStore, UserPreferences,
    WindUnit,
};
pub use result::MutationResult;
pub use storage::{KeyValueStore, MemoryStore, SqliteStore};
pub use theme::{
    find_theme, themes_by_category, EnhancedThemePreferences, Season, ThemeCategory, ThemeConfig,
    ThemeManager, THEMES,
};
