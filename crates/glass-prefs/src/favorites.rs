//! Favorite cities: a bounded, deduplicated, most-recent-first list.

use std::sync::Arc;

use glass_core::{CoordinateId, PersistenceError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::result::MutationResult;
use crate::storage::{persist, read_json, KeyValueStore, FAVORITE_CITIES_KEY};

pub const MAX_FAVORITES: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteCity {
    pub id: CoordinateId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    /// Epoch milliseconds
    pub added_at: i64,
}

/// A city to add; identity and timestamp are assigned on insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFavorite {
    pub name: String,
    pub state: Option<String>,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FavoritesError {
    #[error("City already in favorites")]
    Duplicate,

    #[error("Maximum 10 cities allowed")]
    Capacity,

    #[error("Invalid indices for reordering")]
    Index,
}

pub struct FavoritesRegistry {
    kv: Arc<dyn KeyValueStore>,
    favorites: Vec<FavoriteCity>,
}

impl FavoritesRegistry {
    pub fn open(kv: Arc<dyn KeyValueStore>) -> Self {
        let favorites = match Self::try_load(kv.as_ref()) {
            Ok(favorites) => favorites,
            Err(e) => {
                tracing::error!("Error reading favorites from storage: {}", e);
                Vec::new()
            }
        };
        Self { kv, favorites }
    }

    pub fn try_load(kv: &dyn KeyValueStore) -> Result<Vec<FavoriteCity>, PersistenceError> {
        Ok(read_json(kv, FAVORITE_CITIES_KEY)?.unwrap_or_default())
    }

    pub fn favorites(&self) -> &[FavoriteCity] {
        &self.favorites
    }

    pub fn len(&self) -> usize {
        self.favorites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty()
    }

    pub fn can_add_more(&self) -> bool {
        self.favorites.len() < MAX_FAVORITES
    }

    pub fn is_favorite(&self, lat: f64, lon: f64) -> bool {
        let id = CoordinateId::new(lat, lon);
        self.favorites.iter().any(|f| f.id == id)
    }

    /// Insert at the front. Duplicates are checked before capacity.
    pub fn try_add(&mut self, city: NewFavorite) -> Result<&FavoriteCity, FavoritesError> {
        let id = CoordinateId::new(city.lat, city.lon);
        if self.favorites.iter().any(|f| f.id == id) {
            return Err(FavoritesError::Duplicate);
        }
        if self.favorites.len() >= MAX_FAVORITES {
            return Err(FavoritesError::Capacity);
        }

        let entry = FavoriteCity {
            id,
            name: city.name,
            state: city.state,
            country: city.country,
            lat: city.lat,
            lon: city.lon,
            added_at: chrono::Utc::now().timestamp_millis(),
        };
        tracing::info!("Adding favorite city: {} ({})", entry.name, entry.id);
        self.favorites.insert(0, entry);
        self.save();
        Ok(&self.favorites[0])
    }

    pub fn add(&mut self, city: NewFavorite) -> MutationResult {
        MutationResult::from_outcome(
            self.try_add(city)
                .map(|_| "City added to favorites".to_string()),
        )
    }

    /// Remove by id; absent ids are a successful no-op.
    pub fn remove(&mut self, id: &CoordinateId) -> MutationResult {
        self.favorites.retain(|f| &f.id != id);
        self.save();
        MutationResult::ok("City removed from favorites")
    }

    pub fn clear_all(&mut self) -> MutationResult {
        self.favorites.clear();
        self.save();
        MutationResult::ok("All favorites cleared")
    }

    /// Move one entry from `from` to `to`, shifting the entries between.
    pub fn try_reorder(&mut self, from: usize, to: usize) -> Result<(), FavoritesError> {
        let len = self.favorites.len();
        if from >= len || to >= len {
            return Err(FavoritesError::Index);
        }
        let moved = self.favorites.remove(from);
        self.favorites.insert(to, moved);
        self.save();
        Ok(())
    }

    pub fn reorder(&mut self, from: usize, to: usize) -> MutationResult {
        MutationResult::from_outcome(
            self.try_reorder(from, to)
                .map(|()| "Favorites reordered".to_string()),
        )
    }

    fn save(&self) {
        persist(self.kv.as_ref(), FAVORITE_CITIES_KEY, &self.favorites);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn city(name: &str, lat: f64, lon: f64) -> NewFavorite {
        NewFavorite {
            name: name.to_string(),
            state: None,
            country: "US".to_string(),
            lat,
            lon,
        }
    }

    fn registry() -> (Arc<dyn KeyValueStore>, FavoritesRegistry) {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let registry = FavoritesRegistry::open(kv.clone());
        (kv, registry)
    }

    #[test]
    fn test_add_prepends_and_persists() {
        let (kv, mut favs) = registry();
        assert!(favs.add(city("Austin", 30.2672, -97.7431)).success);
        assert!(favs.add(city("Denver", 39.7392, -104.9903)).success);

        assert_eq!(favs.favorites()[0].name, "Denver");
        assert_eq!(favs.favorites()[1].name, "Austin");
        assert!(favs.favorites()[0].added_at > 0);

        let stored = FavoritesRegistry::try_load(kv.as_ref()).unwrap();
        assert_eq!(stored, favs.favorites());
    }

    #[test]
    fn test_duplicate_by_rounded_coordinates() {
        let (_, mut favs) = registry();
        favs.add(city("New York", 40.71280, -74.00600));
        let result = favs.add(city("NYC", 40.712804, -74.006001));
        assert!(!result.success);
        assert_eq!(result.message, "City already in favorites");
        assert_eq!(favs.len(), 1);
    }

    #[test]
    fn test_capacity_limit_leaves_storage_unchanged() {
        let (kv, mut favs) = registry();
        for i in 0..MAX_FAVORITES {
            assert!(favs.add(city(&format!("City {i}"), i as f64, 0.0)).success);
        }
        let before = kv.get(FAVORITE_CITIES_KEY).unwrap();

        assert_eq!(
            favs.try_add(city("Overflow", 50.0, 50.0)).unwrap_err(),
            FavoritesError::Capacity
        );
        assert!(!favs.can_add_more());
        assert_eq!(kv.get(FAVORITE_CITIES_KEY).unwrap(), before);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (_, mut favs) = registry();
        favs.add(city("Austin", 30.2672, -97.7431));
        let id = CoordinateId::new(30.2672, -97.7431);
        assert!(favs.remove(&id).success);
        assert!(favs.remove(&id).success);
        assert!(favs.is_empty());
    }

    #[test]
    fn test_is_favorite_uses_rounding() {
        let (_, mut favs) = registry();
        favs.add(city("Austin", 30.2672, -97.7431));
        assert!(favs.is_favorite(30.26721, -97.74309));
        assert!(!favs.is_favorite(30.2673, -97.7431));
    }

    #[test]
    fn test_reorder_moves_single_entry() {
        let (_, mut favs) = registry();
        for name in ["D", "C", "B", "A"] {
            let lat = name.as_bytes()[0] as f64;
            favs.add(city(name, lat, 0.0));
        }
        // A B C D
        favs.try_reorder(0, 2).unwrap();
        let names: Vec<_> = favs.favorites().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["B", "C", "A", "D"]);
    }

    #[test]
    fn test_reorder_rejects_out_of_range() {
        let (_, mut favs) = registry();
        favs.add(city("Austin", 30.2672, -97.7431));
        let result = favs.reorder(0, 1);
        assert!(!result.success);
        assert_eq!(result.message, "Invalid indices for reordering");
    }

    #[test]
    fn test_clear_all() {
        let (kv, mut favs) = registry();
        favs.add(city("Austin", 30.2672, -97.7431));
        assert!(favs.clear_all().success);
        assert!(FavoritesRegistry::try_load(kv.as_ref()).unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_storage_opens_empty() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        kv.set(FAVORITE_CITIES_KEY, "[{\"broken\":").unwrap();
        let favs = FavoritesRegistry::open(kv);
        assert!(favs.is_empty());
    }
}
