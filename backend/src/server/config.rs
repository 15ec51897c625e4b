//! HTTP server configuration object and helpers.

use chrono::TimeDelta;
use packwise::outbound::persistence::DbPool;
use packwise::outbound::security::{DEFAULT_BCRYPT_COST, DEFAULT_TOKEN_TTL_DAYS, JwtSecret};
use packwise::settings::DEFAULT_CORS_ORIGINS;
use std::net::SocketAddr;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) jwt_secret: JwtSecret,
    pub(crate) token_ttl: TimeDelta,
    pub(crate) bcrypt_cost: u32,
    pub(crate) cors_origins: Vec<String>,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a server configuration with default token and CORS settings.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, jwt_secret: JwtSecret) -> Self {
        Self {
            bind_addr,
            jwt_secret,
            token_ttl: TimeDelta::days(DEFAULT_TOKEN_TTL_DAYS),
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            cors_origins: DEFAULT_CORS_ORIGINS
                .iter()
                .map(|origin| (*origin).to_owned())
                .collect(),
            db_pool: None,
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// Without a pool the server keeps users and trips in process memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Override how long issued bearer tokens stay valid.
    #[must_use]
    pub fn with_token_ttl(mut self, ttl: TimeDelta) -> Self {
        self.token_ttl = ttl;
        self
    }

    /// Override the bcrypt work factor.
    #[must_use]
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    /// Replace the browser origins allowed by CORS.
    #[must_use]
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = origins;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
