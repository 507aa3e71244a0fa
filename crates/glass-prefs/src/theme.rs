//! Theme catalog and the enhanced theme preference record.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::preferences::{PreferenceStore, Preferences};
use crate::result::MutationResult;
use crate::storage::{KeyValueStore, ENHANCED_THEME_KEY};

pub const FALLBACK_THEME_ID: &str = "light";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeCategory {
    Seasonal,
    Style,
    Accessibility,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThemeColors {
    pub primary: &'static str,
    pub secondary: &'static str,
    pub accent: &'static str,
    pub background: &'static str,
}

/// A code-defined theme. The catalog is immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeConfig {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: ThemeCategory,
    pub preview: &'static str,
    pub colors: ThemeColors,
    pub is_dark: bool,
    pub is_minimal: bool,
    pub is_high_contrast: bool,
    pub css_class: &'static str,
}

impl ThemeConfig {
    /// Modifier classes layered on top of `css_class`.
    pub fn modifier_classes(&self) -> Vec<&'static str> {
        let mut classes = Vec::new();
        if self.is_minimal {
            classes.push("minimal-theme");
        }
        if self.is_high_contrast {
            classes.push("high-contrast-theme");
        }
        classes
    }

    /// CSS custom properties for dynamic theming.
    pub fn css_variables(&self) -> [(&'static str, &'static str); 4] {
        [
            ("--theme-primary", self.colors.primary),
            ("--theme-secondary", self.colors.secondary),
            ("--theme-accent", self.colors.accent),
            ("--theme-background", self.colors.background),
        ]
    }
}

const fn theme(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    category: ThemeCategory,
    preview: &'static str,
    colors: [&'static str; 4],
    flags: (bool, bool, bool),
    css_class: &'static str,
) -> ThemeConfig {
    ThemeConfig {
        id,
        name,
        description,
        category,
        preview,
        colors: ThemeColors {
            primary: colors[0],
            secondary: colors[1],
            accent: colors[2],
            background: colors[3],
        },
        is_dark: flags.0,
        is_minimal: flags.1,
        is_high_contrast: flags.2,
        css_class,
    }
}

pub static THEMES: &[ThemeConfig] = &[
    theme(
        "light",
        "Light",
        "Clean and bright default theme",
        ThemeCategory::Style,
        "☀️",
        ["#1f2937", "#6b7280", "#3b82f6", "#f8fafc"],
        (false, false, false),
        "theme-light",
    ),
    theme(
        "dark",
        "Dark",
        "Sleek dark mode for low-light environments",
        ThemeCategory::Style,
        "🌙",
        ["#f9fafb", "#d1d5db", "#60a5fa", "#0f172a"],
        (true, false, false),
        "theme-dark",
    ),
    theme(
        "spring",
        "Spring Bloom",
        "Fresh greens and soft pastels of spring",
        ThemeCategory::Seasonal,
        "🌸",
        ["#052e16", "#166534", "#16a34a", "#f7fee7"],
        (false, false, false),
        "theme-spring",
    ),
    theme(
        "summer",
        "Summer Vibes",
        "Bright blues and warm sunshine colors",
        ThemeCategory::Seasonal,
        "🏖️",
        ["#0c4a6e", "#0369a1", "#0284c7", "#f8fafc"],
        (false, false, false),
        "theme-summer",
    ),
    theme(
        "autumn",
        "Autumn Leaves",
        "Warm oranges and deep reds of fall",
        ThemeCategory::Seasonal,
        "🍁",
        ["#7c2d12", "#a16207", "#ea580c", "#fffbeb"],
        (false, false, false),
        "theme-autumn",
    ),
    theme(
        "winter",
        "Winter Frost",
        "Cool blues and crisp whites of winter",
        ThemeCategory::Seasonal,
        "❄️",
        ["#1e3a8a", "#1e40af", "#3b82f6", "#f8fafc"],
        (false, false, false),
        "theme-winter",
    ),
    theme(
        "minimal-light",
        "Minimal Light",
        "Clean and distraction-free light theme",
        ThemeCategory::Style,
        "⚪",
        ["#374151", "#9ca3af", "#6b7280", "#ffffff"],
        (false, true, false),
        "theme-minimal-light",
    ),
    theme(
        "minimal-dark",
        "Minimal Dark",
        "Clean and distraction-free dark theme",
        ThemeCategory::Style,
        "⚫",
        ["#e5e7eb", "#6b7280", "#9ca3af", "#111827"],
        (true, true, false),
        "theme-minimal-dark",
    ),
    theme(
        "high-contrast-light",
        "High Contrast Light",
        "Maximum contrast for better visibility",
        ThemeCategory::Accessibility,
        "🔆",
        ["#000000", "#333333", "#0066cc", "#ffffff"],
        (false, false, true),
        "theme-high-contrast-light",
    ),
    theme(
        "high-contrast-dark",
        "High Contrast Dark",
        "High contrast dark theme for accessibility",
        ThemeCategory::Accessibility,
        "🔅",
        ["#ffffff", "#cccccc", "#66b3ff", "#000000"],
        (true, false, true),
        "theme-high-contrast-dark",
    ),
];

pub fn find_theme(id: &str) -> Option<&'static ThemeConfig> {
    THEMES.iter().find(|t| t.id == id)
}

pub fn themes_by_category() -> BTreeMap<ThemeCategory, Vec<&'static ThemeConfig>> {
    let mut categories: BTreeMap<ThemeCategory, Vec<&'static ThemeConfig>> = [
        ThemeCategory::Seasonal,
        ThemeCategory::Style,
        ThemeCategory::Accessibility,
        ThemeCategory::Custom,
    ]
    .into_iter()
    .map(|c| (c, Vec::new()))
    .collect();

    for theme in THEMES {
        categories.entry(theme.category).or_default().push(theme);
    }
    categories
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    /// Meteorological season for a calendar month (1-12).
    pub fn from_month(month: u32) -> Self {
        match month {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Autumn,
            _ => Season::Winter,
        }
    }

    pub fn theme_id(&self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
            Season::Winter => "winter",
        }
    }
}

/// `"light"` from 06:00 until 18:00, `"dark"` otherwise.
pub fn time_based_theme(hour: u32) -> &'static str {
    if (6..18).contains(&hour) {
        "light"
    } else {
        "dark"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedThemePreferences {
    pub selected_theme: String,
    pub auto_seasonal: bool,
    pub auto_time_of_day: bool,
    pub custom_overrides: BTreeMap<String, String>,
}

impl Default for EnhancedThemePreferences {
    fn default() -> Self {
        Self {
            selected_theme: FALLBACK_THEME_ID.to_string(),
            auto_seasonal: false,
            auto_time_of_day: false,
            custom_overrides: BTreeMap::new(),
        }
    }
}

impl Preferences for EnhancedThemePreferences {
    const STORAGE_KEY: &'static str = ENHANCED_THEME_KEY;
}

impl EnhancedThemePreferences {
    /// Resolve the effective theme at local time `now`.
    ///
    /// Auto-seasonal replaces the selection, auto time-of-day then swaps in
    /// a dark variant at night; an unknown id falls back to `light`, then to
    /// the first catalog entry.
    pub fn effective_theme(&self, now: NaiveDateTime) -> &'static ThemeConfig {
        let mut theme_id = self.selected_theme.clone();

        if self.auto_seasonal {
            let season = Season::from_month(now.month()).theme_id();
            if find_theme(season).is_some() {
                theme_id = season.to_string();
            }
        }

        if self.auto_time_of_day
            && time_based_theme(now.hour()) == "dark"
            && !theme_id.contains("dark")
        {
            let variant = format!("{}-dark", theme_id);
            if let Some(dark) = THEMES
                .iter()
                .find(|t| t.id == variant || (t.is_dark && t.category == ThemeCategory::Style))
            {
                theme_id = dark.id.to_string();
            }
        }

        find_theme(&theme_id)
            .or_else(|| find_theme(FALLBACK_THEME_ID))
            .unwrap_or(&THEMES[0])
    }
}

/// Enhanced theme selection on top of a [`PreferenceStore`].
pub struct ThemeManager {
    prefs: PreferenceStore<EnhancedThemePreferences>,
}

impl ThemeManager {
    pub fn open(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            prefs: PreferenceStore::open(kv),
        }
    }

    pub fn with_on_apply(
        self,
        hook: impl Fn(&EnhancedThemePreferences) + Send + Sync + 'static,
    ) -> Self {
        Self {
            prefs: self.prefs.with_on_apply(hook),
        }
    }

    pub fn preferences(&self) -> &EnhancedThemePreferences {
        self.prefs.get()
    }

    pub fn current_theme(&self) -> &'static ThemeConfig {
        self.current_theme_at(chrono::Local::now().naive_local())
    }

    pub fn current_theme_at(&self, now: NaiveDateTime) -> &'static ThemeConfig {
        self.prefs.get().effective_theme(now)
    }

    /// Manually select a theme. A manual choice switches off both automatic modes.
    pub fn set_enhanced_theme(&mut self, theme_id: &str) -> MutationResult {
        if find_theme(theme_id).is_none() {
            tracing::error!("Theme not found: {}", theme_id);
            return MutationResult::failed(format!("Theme not found: {}", theme_id));
        }
        self.prefs.update(|p| {
            p.selected_theme = theme_id.to_string();
            p.auto_seasonal = false;
            p.auto_time_of_day = false;
        });
        MutationResult::ok("Theme updated")
    }

    pub fn update_preference(
        &mut self,
        change: impl FnOnce(&mut EnhancedThemePreferences),
    ) -> MutationResult {
        self.prefs.update(change);
        MutationResult::ok("Theme preference updated")
    }

    pub fn toggle_auto_seasonal(&mut self) -> MutationResult {
        self.update_preference(|p| p.auto_seasonal = !p.auto_seasonal)
    }

    pub fn toggle_auto_time_of_day(&mut self) -> MutationResult {
        self.update_preference(|p| p.auto_time_of_day = !p.auto_time_of_day)
    }

    pub fn reset(&mut self) -> MutationResult {
        self.prefs.reset();
        MutationResult::ok("Theme preferences reset")
    }
}
