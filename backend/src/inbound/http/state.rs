//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, BearerAuthentication, FixtureAccountCommand, FixtureBearerAuthentication,
    FixtureTripCommand, FixtureTripQuery, TripCommand, TripQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountCommand>,
    pub authenticator: Arc<dyn BearerAuthentication>,
    pub trips: Arc<dyn TripCommand>,
    pub trips_query: Arc<dyn TripQuery>,
}

impl HttpState {
    /// Construct state from explicit port implementations.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use packwise::domain::ports::{
    ///     FixtureAccountCommand, FixtureBearerAuthentication, FixtureTripCommand,
    ///     FixtureTripQuery,
    /// };
    /// use packwise::inbound::http::state::HttpState;
    ///
    /// let state = HttpState::new(
    ///     Arc::new(FixtureAccountCommand),
    ///     Arc::new(FixtureBearerAuthentication),
    ///     Arc::new(FixtureTripCommand),
    ///     Arc::new(FixtureTripQuery),
    /// );
    /// let _trips = state.trips.clone();
    /// ```
    pub fn new(
        accounts: Arc<dyn AccountCommand>,
        authenticator: Arc<dyn BearerAuthentication>,
        trips: Arc<dyn TripCommand>,
        trips_query: Arc<dyn TripQuery>,
    ) -> Self {
        Self {
            accounts,
            authenticator,
            trips,
            trips_query,
        }
    }

    /// State backed entirely by fixture ports.
    pub fn fixtures() -> Self {
        Self::new(
            Arc::new(FixtureAccountCommand),
            Arc::new(FixtureBearerAuthentication),
            Arc::new(FixtureTripCommand),
            Arc::new(FixtureTripQuery),
        )
    }
}
