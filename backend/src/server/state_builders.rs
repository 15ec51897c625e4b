//! Builders for HTTP state ports backed by repository adapters.

use std::sync::Arc;

use actix_web::web;
use mockable::Clock;

use packwise::domain::ports::{TripRepository, UserRepository};
use packwise::domain::{AccountService, BearerAuthenticator, TripService};
use packwise::inbound::http::state::HttpState;
use packwise::outbound::memory::{InMemoryTripRepository, InMemoryUserRepository};
use packwise::outbound::persistence::{DieselTripRepository, DieselUserRepository};
use packwise::outbound::security::{BcryptPasswordHasher, JwtTokenService};

use super::ServerConfig;

/// Wire the account, authentication and trip services over one pair of
/// repositories.
fn wire_services<U, T>(
    config: &ServerConfig,
    users: Arc<U>,
    trips: Arc<T>,
    clock: Arc<dyn Clock>,
) -> std::io::Result<HttpState>
where
    U: UserRepository + 'static,
    T: TripRepository + 'static,
{
    let hasher = BcryptPasswordHasher::new(config.bcrypt_cost)
        .map(Arc::new)
        .map_err(|err| std::io::Error::other(format!("invalid bcrypt cost: {err}")))?;
    let tokens = Arc::new(JwtTokenService::new(
        &config.jwt_secret,
        config.token_ttl,
        clock.clone(),
    ));

    let accounts = AccountService::new(users.clone(), hasher, tokens.clone(), clock.clone());
    let authenticator = BearerAuthenticator::new(tokens, users.clone());
    let trips = Arc::new(TripService::new(trips, users, clock));

    Ok(HttpState::new(
        Arc::new(accounts),
        Arc::new(authenticator),
        trips.clone(),
        trips,
    ))
}

/// Build the HTTP state from configuration.
///
/// Uses Diesel-backed repositories when a pool is configured, otherwise
/// in-memory repositories that live as long as the process.
///
/// # Errors
/// Returns [`std::io::Error`] when the bcrypt cost is outside the supported
/// range.
pub fn build_http_state(
    config: &ServerConfig,
    clock: Arc<dyn Clock>,
) -> std::io::Result<web::Data<HttpState>> {
    let state = match &config.db_pool {
        Some(pool) => wire_services(
            config,
            Arc::new(DieselUserRepository::new(pool.clone())),
            Arc::new(DieselTripRepository::new(pool.clone())),
            clock,
        )?,
        None => wire_services(
            config,
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryTripRepository::new()),
            clock,
        )?,
    };
    Ok(web::Data::new(state))
}
