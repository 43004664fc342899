pub mod app_config;
pub mod coerce;
pub mod config;
pub mod counts;
pub mod error;
pub mod facets;
pub mod listing;
pub mod pipeline;
pub mod refs;
pub mod resolve;
pub mod selection;
pub mod snapshot;
pub mod taxonomy;

#[cfg(test)]
mod test_support;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use counts::{
    count_category, count_category_ref, count_composite, count_location, count_location_target,
    CategoryMatcher, LocationMatcher,
};
pub use error::{ConfigError, CoreError};
pub use facets::{build_facets, category_facets, location_facets, CategoryFacet, FacetTrees, LocationFacet};
pub use listing::Listing;
pub use pipeline::{apply, candidates, ListingPage, ListingQuery, SortKey, DEFAULT_PAGE_SIZE};
pub use refs::{
    CategoryLevel, CategoryLookup, CategoryRef, CompositeLocationRef, LocationLevel, LocationRef,
    LocationTarget,
};
pub use resolve::{explain_category, resolve_category, Resolution, ResolveRule};
pub use selection::{CategorySelection, CheckState, LocationSelection, SelectionAction, SelectionState};
pub use snapshot::{
    load_categories, load_listings, load_locations, load_snapshot, Snapshot, SnapshotPaths,
};
pub use taxonomy::{category_tree_from_value, location_tree_from_value, CategoryTree, LocationTree};
