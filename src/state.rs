use registrar_config::{AppConfig, CorsConfig};
use sqlx::PgPool;

/// Shared application context handed to every handler through axum's `State`.
#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub cors_config: CorsConfig,
}

impl AppState {
    pub fn new(db: PgPool, config: &AppConfig) -> Self {
        Self {
            db,
            cors_config: config.cors.clone(),
        }
    }
}
