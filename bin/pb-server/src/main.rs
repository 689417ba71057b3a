//! Pushbridge Server
//!
//! Serves the application lifecycle API:
//! - `POST /application`, `DELETE /application/:id`, `GET /application`
//! - `GET /health`
//!
//! Configuration is read from TOML (`PUSHBRIDGE_CONFIG` or the standard
//! search paths) with `PUSHBRIDGE_*` environment overrides. `RUST_LOG` and
//! `LOG_FORMAT` control logging.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{response::Json, routing::get, Extension, Router};
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::info;

use pb_config::{AppConfig, ConfigLoader};
use pb_platform::shared::initialize_indexes;
use pb_platform::{
    applications_router, AdminSeed, AdminSeeder, ApplicationsState, Argon2Config, AuthState,
    MatrixDispatcher, MatrixDispatcherConfig, MongoApplicationRepository, MongoUserRepository,
    PasswordService, TokenPolicy, UserRepository,
};

#[tokio::main]
async fn main() -> Result<()> {
    pb_common::logging::init_logging("pb-server");

    info!("Starting Pushbridge Server");

    let config = ConfigLoader::new().load().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    // Connect to MongoDB
    info!("Connecting to MongoDB: {}", config.mongodb.database);
    let mongo_client = mongodb::Client::with_uri_str(&config.mongodb.uri).await?;
    let db = mongo_client.database(&config.mongodb.database);

    initialize_indexes(&db).await?;

    let passwords = Arc::new(PasswordService::new(Argon2Config::default())?);
    let users: Arc<dyn UserRepository> = Arc::new(MongoUserRepository::new(&db));

    AdminSeeder::new(users.clone(), passwords.clone())
        .seed(&AdminSeed {
            name: config.admin.name.clone(),
            password: config.admin.password.clone(),
            matrix_id: config.admin.matrix_id.clone(),
        })
        .await
        .context("Failed to seed admin user")?;

    let dispatcher = Arc::new(MatrixDispatcher::new(MatrixDispatcherConfig {
        homeserver: config.matrix.homeserver.clone(),
        access_token: config.matrix.access_token.clone(),
        request_timeout: config.matrix.request_timeout(),
    })?);

    let applications = ApplicationsState::new(
        Arc::new(MongoApplicationRepository::new(&db)),
        dispatcher,
        token_policy(&config),
    );

    let app = Router::new()
        .route("/health", get(health_handler))
        .merge(applications_router(applications))
        .layer(Extension(AuthState { users, passwords }))
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.http.host, config.http.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("API server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Pushbridge Server shutdown complete");
    Ok(())
}

fn token_policy(config: &AppConfig) -> TokenPolicy {
    TokenPolicy {
        length: config.tokens.length,
        max_attempts: config.tokens.max_attempts,
        persist_attempts: config.tokens.persist_attempts,
    }
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "UP"
    }))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received...");
}
