//! Saved favourite locations.
//!
//! JSON file store, de-duplicated by exact `(city, country)` match. Every
//! operation is synchronous and persists immediately; read or write failures
//! are logged and degrade to an empty list / `false`, since favourites are
//! non-critical.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A saved location. Coordinates may be absent when the location was saved
/// from a city search that never resolved them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteLocation {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub city: String,
    pub country: String,
}

/// JSON-file-backed favourites store.
#[derive(Debug)]
pub struct FavoritesStore {
    path: PathBuf,
}

impl FavoritesStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// All saved locations, in insertion order. Missing or unreadable data
    /// yields an empty list.
    pub fn list(&self) -> Vec<FavoriteLocation> {
        if !self.path.exists() {
            return Vec::new();
        }
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("favourites file is corrupt, treating as empty: {}", e);
                Vec::new()
            }),
            Err(e) => {
                tracing::warn!("failed to read favourites: {}", e);
                Vec::new()
            }
        }
    }

    /// Save a location. Returns `false` when a location with the same
    /// `(city, country)` already exists or the write fails.
    pub fn save(
        &self,
        lat: Option<f64>,
        lon: Option<f64>,
        city: &str,
        country: &str,
    ) -> bool {
        let mut favorites = self.list();
        if favorites.iter().any(|f| f.city == city && f.country == country) {
            return false;
        }
        favorites.push(FavoriteLocation {
            lat,
            lon,
            city: city.to_string(),
            country: country.to_string(),
        });
        self.write(&favorites)
    }

    /// Remove a location by `(city, country)`. Returns `false` when not
    /// found.
    pub fn remove(&self, city: &str, country: &str) -> bool {
        let mut favorites = self.list();
        let before = favorites.len();
        favorites.retain(|f| !(f.city == city && f.country == country));
        if favorites.len() == before {
            return false;
        }
        self.write(&favorites)
    }

    pub fn is_saved(&self, city: &str, country: &str) -> bool {
        self.list().iter().any(|f| f.city == city && f.country == country)
    }

    /// Remove all saved locations.
    pub fn clear(&self) -> bool {
        match std::fs::remove_file(&self.path) {
            Ok(()) => true,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
            Err(e) => {
                tracing::warn!("failed to clear favourites: {}", e);
                false
            }
        }
    }

    fn write(&self, favorites: &[FavoriteLocation]) -> bool {
        let contents = match serde_json::to_string(favorites) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!("failed to serialize favourites: {}", e);
                return false;
            }
        };
        if let Err(e) = std::fs::write(&self.path, contents) {
            tracing::warn!("failed to write favourites: {}", e);
            return false;
        }
        true
    }
}
