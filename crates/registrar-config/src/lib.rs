//! # Registrar Config
//!
//! Configuration types for the Registrar API, loaded from environment
//! variables:
//!
//! - [`server`]: listen address
//! - [`database`]: PostgreSQL pool settings
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`observability`]: logging and metrics switches
//!
//! # Example
//!
//! ```ignore
//! use registrar_config::AppConfig;
//!
//! dotenvy::dotenv().ok();
//! let config = AppConfig::from_env()?;
//! println!("listening on {}", config.server.bind_address());
//! ```

use std::str::FromStr;

pub mod cors;
pub mod database;
pub mod observability;
pub mod server;

pub use cors::CorsConfig;
pub use database::DatabaseConfig;
pub use observability::ObservabilityConfig;
pub use server::ServerConfig;

/// Everything the service reads from its environment at startup.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env()?,
            cors: CorsConfig::from_env(),
            observability: ObservabilityConfig::from_env(),
        })
    }
}

pub(crate) fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

pub(crate) fn env_flag(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| parse_flag(&v))
        .unwrap_or(default)
}

pub(crate) fn env_list(key: &str, default: &str) -> Vec<String> {
    parse_list(&std::env::var(key).unwrap_or_else(|_| default.to_string()))
}

fn parse_flag(value: &str) -> bool {
    let value = value.trim().to_lowercase();
    value != "false" && value != "0" && value != "no" && value != "off"
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
