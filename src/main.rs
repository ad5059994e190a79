use dotenvy::dotenv;
use tracing::info;

use registrar::db::run_migrations;
use registrar::logging::init_tracing;
use registrar::metrics::{init_metrics, metrics_app};
use registrar::router::init_router;
use registrar::state::AppState;
use registrar_config::AppConfig;
use registrar_db::init_db_pool;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = AppConfig::from_env()?;
    init_tracing(&config.observability)?;

    let db = init_db_pool(&config.database).await?;
    if config.database.run_migrations {
        run_migrations(&db).await?;
    }

    let state = AppState::new(db, &config);
    let mut app = init_router(state);

    if config.observability.enabled {
        let handle = init_metrics()?;
        app = app.merge(metrics_app(handle));
    }

    let address = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!(address = %address, "Server running");
    info!("Swagger UI available at http://{}/swagger-ui", address);
    info!("Scalar UI available at http://{}/scalar", address);

    axum::serve(listener, app).await?;

    Ok(())
}
