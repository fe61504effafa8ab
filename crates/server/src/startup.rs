use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use migration::{Migrator, MigratorTrait};
use tower_http::cors::CorsLayer;
use tracing::info;

use configs::AppConfig;
use service::{auth::AuthPolicy, gist::repo::SeaOrmGistRepository};

use crate::errors::StartupError;
use crate::routes::{self, auth::ServerState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server address: {e}")))
}

/// Connect, migrate if configured, and build the application router.
pub async fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    cfg.database.validate().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;

    let db = models::db::connect_with_config(&cfg.database)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;

    // 按配置执行迁移（默认开启）
    if cfg.database.run_migrations {
        Migrator::up(&db, None).await.map_err(|e| StartupError::Migration(e.to_string()))?;
        info!(event = "migrations_applied", "database schema is up to date");
    }

    let policy = AuthPolicy { verify_passwords: cfg.auth.verify_passwords };
    let state = ServerState::new(Arc::new(SeaOrmGistRepository::new(db)), policy);
    Ok(routes::build_router(state, build_cors()))
}

/// Public entry: build the app and run the HTTP server
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let app = build_app(&cfg).await?;

    // 绑定并启动服务
    let addr = bind_addr(&cfg)?;
    info!(%addr, verify_passwords = cfg.auth.verify_passwords, "starting gists server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
