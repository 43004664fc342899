use crate::app_config::{AppConfig, Environment};
use crate::pipeline::DEFAULT_PAGE_SIZE;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it from a
/// `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_positive = |var: &str, default: usize| -> Result<usize, ConfigError> {
        let raw = or_default(var, &default.to_string());
        let value = raw.trim().parse::<usize>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })?;
        if value == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(value)
    };

    let listings_path = PathBuf::from(require("MANDI_LISTINGS_PATH")?);
    let categories_path =
        PathBuf::from(or_default("MANDI_CATEGORIES_PATH", "./data/categories.json"));
    let locations_path = PathBuf::from(or_default("MANDI_LOCATIONS_PATH", "./data/locations.json"));

    let env = parse_environment(&or_default("MANDI_ENV", "development"));
    let bind_addr = parse_addr("MANDI_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("MANDI_LOG_LEVEL", "info");

    let page_size = parse_positive("MANDI_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        categories_path,
        locations_path,
        listings_path,
        page_size,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s.trim() {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
