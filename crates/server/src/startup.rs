use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use axum::Router;
use common::{env::ensure_env, utils::logging::init_logging_from_env};
use configs::AppConfig;
use dotenvy::dotenv;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use service::auth::{repo::SeaOrmAuthRepository, service::AuthConfig, AuthService};
use service::settings_service::SettingsStore;
use service::storage::{BlobStore, LocalBlobStore};

use crate::errors::StartupError;
use crate::routes::{self, ServerState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address: {e}")))
}

/// Wire every shared dependency into handler state.
pub fn build_state(cfg: &AppConfig, db: DatabaseConnection) -> ServerState {
    let store = LocalBlobStore::new(&cfg.storage.root, &cfg.storage.public_base_url, cfg.storage.max_upload_bytes);
    let auth = AuthService::new(
        Arc::new(SeaOrmAuthRepository::new(db.clone())),
        AuthConfig::new(cfg.auth.jwt_secret.clone(), cfg.auth.token_ttl_hours),
    );
    ServerState {
        settings: SettingsStore::new(db.clone()),
        db,
        store: Arc::new(store),
        storage_root: PathBuf::from(&cfg.storage.root),
        max_upload_bytes: cfg.storage.max_upload_bytes,
        auth: Arc::new(auth),
    }
}

/// Full application router for the given state.
pub fn build_app(state: ServerState) -> Router {
    routes::build_router(state, build_cors())
}

/// Load config, prepare storage and database, then serve until the task is dropped.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging_from_env();

    let cfg = AppConfig::load_and_validate().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    if cfg.auth.jwt_secret == configs::DEV_JWT_SECRET {
        warn!("JWT_SECRET not set; using the development secret");
    }

    ensure_env(&cfg.storage.root)
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;

    let db = models::db::connect_with_config(&cfg.database).await?;
    migration::Migrator::up(&db, None).await?;
    info!("migrations applied");

    let state = build_state(&cfg, db);
    state.store.ensure_buckets().await?;

    if let (Some(email), Some(password)) = (&cfg.auth.bootstrap_admin_email, &cfg.auth.bootstrap_admin_password) {
        if let Some(user) = state.auth.ensure_bootstrap_admin(email, password).await? {
            info!(user_id = %user.id, email = %user.email, "bootstrap admin ready");
        }
    }

    let app = build_app(state);
    let addr = bind_addr(&cfg)?;
    info!(%addr, "starting batik storefront server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
