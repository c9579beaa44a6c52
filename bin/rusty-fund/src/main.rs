//! # Rusty-Fund Binary
//!
//! The entry point that assembles the application based on compile-time features.

use actix_web::{web, App, HttpServer};
use rf_api::handlers::AppState;
use rf_api::middleware::{cors_policy, standard_middleware};
use rf_config::AppConfig;
use rf_core::traits::ProjectRepo;
use tracing_subscriber::EnvFilter;

// Feature-gated imports: the storage backend is chosen at compile time
#[cfg(feature = "db-sqlite")]
use rf_db_sqlite::SqliteProjectRepo;

#[cfg(not(feature = "db-sqlite"))]
compile_error!("rusty-fund needs a storage backend; enable the `db-sqlite` feature");

fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.log.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[cfg(feature = "db-sqlite")]
async fn open_repo(config: &AppConfig) -> anyhow::Result<Box<dyn ProjectRepo>> {
    let repo = SqliteProjectRepo::new(&config.database.url, config.database.max_connections).await?;
    Ok(Box::new(repo))
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // 1. Configuration and logging
    let config = AppConfig::load()?;
    init_logging(&config);

    // 2. Initialize Database Implementation
    let repo = open_repo(&config).await?;
    tracing::info!(url = %config.database.url, "storage ready");

    // 3. Wrap in AppState (dynamic dispatch keeps handlers backend-agnostic)
    let state = web::Data::new(AppState { repo });

    let (host, port) = config.bind_address();
    tracing::info!("Rusty-Fund starting on http://{host}:{port}");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(standard_middleware())
            .wrap(cors_policy())
            .configure(rf_api::configure_routes)
    })
    .bind((host.as_str(), port))?
    .run()
    .await?;

    Ok(())
}
