//! Backend entry-point: loads settings, prepares storage and serves the REST API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use uuid::Uuid;

use packwise::inbound::http::health::HealthState;
use packwise::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use packwise::outbound::security::JwtSecret;
use packwise::settings::AppSettings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        AppSettings::load().map_err(|err| eyre!("failed to load configuration: {err}"))?;
    let token_ttl = settings.token_ttl().wrap_err("invalid configuration")?;
    let config = ServerConfig::new(settings.bind_addr(), jwt_secret(&settings)?)
        .with_token_ttl(token_ttl)
        .with_bcrypt_cost(settings.bcrypt_cost)
        .with_cors_origins(settings.cors_origins());
    let config = match &settings.database_url {
        Some(url) => config.with_db_pool(connect(&settings, url).await?),
        None => {
            warn!("no database configured; users and trips are kept in memory");
            config
        }
    };

    info!(addr = %config.bind_addr(), "starting PackWise API");
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config).wrap_err("failed to start HTTP server")?;
    server.await.wrap_err("HTTP server terminated abnormally")
}

/// Resolve the token signing secret.
///
/// Debug builds fall back to a random per-process secret so local runs work
/// without configuration; release builds refuse to start without one.
fn jwt_secret(settings: &AppSettings) -> Result<JwtSecret> {
    match settings.jwt_secret.as_deref() {
        Some(secret) if !secret.is_empty() => Ok(JwtSecret::new(secret)),
        _ if cfg!(debug_assertions) => {
            warn!("PACKWISE_JWT_SECRET unset; using an ephemeral secret (dev only)");
            Ok(JwtSecret::new(Uuid::new_v4().as_bytes().to_vec()))
        }
        _ => Err(eyre!("PACKWISE_JWT_SECRET must be set")),
    }
}

async fn connect(settings: &AppSettings, database_url: &str) -> Result<DbPool> {
    if settings.run_migrations() {
        run_pending_migrations(database_url)
            .await
            .wrap_err("failed to apply database migrations")?;
    }
    let mut pool_config = PoolConfig::new(database_url);
    if let Some(size) = settings.db_pool_size {
        pool_config = pool_config.with_max_size(size);
    }
    DbPool::new(pool_config)
        .await
        .wrap_err("failed to create database pool")
}
