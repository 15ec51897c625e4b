//! Application configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `PACKWISE_*` environment variables and an
//! optional configuration file, in that order of precedence.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use chrono::TimeDelta;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

/// Port the API listens on when none is configured.
pub const DEFAULT_PORT: u16 = 5000;

/// Origins allowed to call the API from a browser when none are configured.
pub const DEFAULT_CORS_ORIGINS: [&str; 2] =
    ["http://localhost:5173", "https://pack-wise-tau.vercel.app"];

/// Longest token lifetime accepted, in days.
pub const MAX_TOKEN_TTL_DAYS: i64 = 365;

/// Settings that load but cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("token_ttl_days must be between 1 and {MAX_TOKEN_TTL_DAYS}, got {0}")]
    TokenTtlOutOfRange(i64),
}

/// Runtime settings for the PackWise server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PACKWISE")]
pub struct AppSettings {
    /// Interface address to bind.
    pub host: Option<IpAddr>,
    /// TCP port to bind.
    pub port: Option<u16>,
    /// PostgreSQL connection string. In-memory storage is used when unset.
    pub database_url: Option<String>,
    /// Secret used to sign bearer tokens.
    pub jwt_secret: Option<String>,
    /// Token lifetime in days.
    #[ortho_config(default = 7)]
    pub token_ttl_days: i64,
    /// bcrypt work factor for new password hashes.
    #[ortho_config(default = 10)]
    pub bcrypt_cost: u32,
    /// Maximum number of pooled database connections.
    pub db_pool_size: Option<u32>,
    /// Apply embedded migrations before serving traffic. Defaults to on.
    pub run_migrations: Option<bool>,
    /// Browser origins allowed by CORS. The environment variable takes a
    /// comma-separated list.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl AppSettings {
    /// Socket address assembled from the configured host and port.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.host.unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
            self.port.unwrap_or(DEFAULT_PORT),
        )
    }

    /// Token lifetime as a duration.
    ///
    /// # Errors
    /// Returns [`SettingsError::TokenTtlOutOfRange`] unless the configured
    /// value lies within `1..=MAX_TOKEN_TTL_DAYS`.
    pub fn token_ttl(&self) -> Result<TimeDelta, SettingsError> {
        if !(1..=MAX_TOKEN_TTL_DAYS).contains(&self.token_ttl_days) {
            return Err(SettingsError::TokenTtlOutOfRange(self.token_ttl_days));
        }
        TimeDelta::try_days(self.token_ttl_days)
            .ok_or(SettingsError::TokenTtlOutOfRange(self.token_ttl_days))
    }

    /// Whether pending migrations run at startup.
    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }

    /// Allowed CORS origins, falling back to [`DEFAULT_CORS_ORIGINS`].
    pub fn cors_origins(&self) -> Vec<String> {
        let origins: Vec<String> = self
            .cors_origins
            .iter()
            .map(|origin| origin.trim())
            .filter(|origin| !origin.is_empty())
            .map(str::to_owned)
            .collect();
        if origins.is_empty() {
            DEFAULT_CORS_ORIGINS.iter().map(|o| (*o).to_owned()).collect()
        } else {
            origins
        }
    }
}
