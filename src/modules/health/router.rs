use crate::modules::health::controller::health_check;
use crate::state::AppState;
use axum::{Router, routing::get};

pub fn init_health_router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
