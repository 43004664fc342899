//! Immutable data snapshot: both taxonomies plus the listing set.
//!
//! Taxonomies change rarely and are shared between versions; refreshing the
//! listings produces a new snapshot with a bumped version.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;

use crate::coerce::collect_lenient;
use crate::error::CoreError;
use crate::listing::Listing;
use crate::taxonomy::{category_tree_from_value, location_tree_from_value, CategoryTree, LocationTree};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotPaths {
    pub categories: PathBuf,
    pub locations: PathBuf,
    pub listings: PathBuf,
}

#[derive(Debug, Clone)]
pub struct Snapshot {
    pub categories: Arc<CategoryTree>,
    pub locations: Arc<LocationTree>,
    pub listings: Vec<Listing>,
    pub version: u64,
}

impl Snapshot {
    #[must_use]
    pub fn new(categories: CategoryTree, locations: LocationTree, listings: Vec<Listing>) -> Self {
        Self {
            categories: Arc::new(categories),
            locations: Arc::new(locations),
            listings,
            version: 1,
        }
    }

    /// Next version of this snapshot with a replaced listing set.
    #[must_use]
    pub fn with_listings(&self, listings: Vec<Listing>) -> Self {
        Self {
            categories: Arc::clone(&self.categories),
            locations: Arc::clone(&self.locations),
            listings,
            version: self.version + 1,
        }
    }
}

/// Loads all three snapshot files.
///
/// Files ending in `.yaml`/`.yml` are read as YAML, anything else as JSON.
/// Malformed taxonomy nodes and listings are skipped, not rejected.
///
/// # Errors
///
/// Returns [`CoreError::SnapshotIo`] if a file cannot be read and
/// [`CoreError::SnapshotParse`] if it is not valid JSON/YAML or the listing
/// file is not an array.
pub fn load_snapshot(paths: &SnapshotPaths) -> Result<Snapshot, CoreError> {
    let categories = load_categories(&paths.categories)?;
    let locations = load_locations(&paths.locations)?;
    let listings = load_listings(&paths.listings)?;

    tracing::info!(
        domains = categories.domains().len(),
        provinces = locations.provinces().len(),
        listings = listings.len(),
        "snapshot loaded"
    );

    Ok(Snapshot::new(categories, locations, listings))
}

/// Reads the category taxonomy file on its own.
///
/// # Errors
///
/// Same as [`load_snapshot`], for the one file.
pub fn load_categories(path: &Path) -> Result<CategoryTree, CoreError> {
    read_value(path).map(category_tree_from_value)
}

/// Reads the location taxonomy file on its own.
///
/// # Errors
///
/// Same as [`load_snapshot`], for the one file.
pub fn load_locations(path: &Path) -> Result<LocationTree, CoreError> {
    read_value(path).map(location_tree_from_value)
}

/// Reads a listing file on its own, for refreshing an existing snapshot.
///
/// # Errors
///
/// Same as [`load_snapshot`], for the one file.
pub fn load_listings(path: &Path) -> Result<Vec<Listing>, CoreError> {
    listings_from_value(path, read_value(path)?)
}

fn listings_from_value(path: &Path, payload: Value) -> Result<Vec<Listing>, CoreError> {
    match payload {
        Value::Array(entries) => Ok(collect_lenient(entries)),
        _ => Err(CoreError::SnapshotParse {
            path: path.display().to_string(),
            reason: "expected an array of listings".to_string(),
        }),
    }
}

fn read_value(path: &Path) -> Result<Value, CoreError> {
    let raw = fs::read_to_string(path).map_err(|source| CoreError::SnapshotIo {
        path: path.display().to_string(),
        source,
    })?;

    let parsed = if is_yaml(path) {
        serde_yaml::from_str::<Value>(&raw).map_err(|e| e.to_string())
    } else {
        serde_json::from_str::<Value>(&raw).map_err(|e| e.to_string())
    };

    parsed.map_err(|reason| CoreError::SnapshotParse {
        path: path.display().to_string(),
        reason,
    })
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
}
