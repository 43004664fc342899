use std::net::SocketAddr;
use std::path::PathBuf;

use crate::snapshot::SnapshotPaths;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub categories_path: PathBuf,
    pub locations_path: PathBuf,
    pub listings_path: PathBuf,
    /// Default page size for API searches that do not name one.
    pub page_size: usize,
}

impl AppConfig {
    #[must_use]
    pub fn snapshot_paths(&self) -> SnapshotPaths {
        SnapshotPaths {
            categories: self.categories_path.clone(),
            locations: self.locations_path.clone(),
            listings: self.listings_path.clone(),
        }
    }
}
