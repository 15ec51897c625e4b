//! Port for trip aggregate persistence.

use async_trait::async_trait;

use crate::domain::{Trip, TripId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by trip repository adapters.
    pub enum TripRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "trip repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "trip repository query failed: {message}",
    }
}

/// Stores whole trip aggregates; items travel with their trip.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TripRepository: Send + Sync {
    /// Insert a new trip.
    async fn create(&self, trip: &Trip) -> Result<(), TripRepositoryError>;

    /// Overwrite a stored trip. Last write wins. Returns whether a row
    /// matched; a trip deleted since it was loaded is never re-inserted.
    async fn update(&self, trip: &Trip) -> Result<bool, TripRepositoryError>;

    /// Find a trip by id.
    async fn find_by_id(&self, id: &TripId) -> Result<Option<Trip>, TripRepositoryError>;

    /// Trips owned by `owner`, newest first.
    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Trip>, TripRepositoryError>;

    /// Delete a trip and its items. Returns whether a row was removed.
    async fn delete(&self, id: &TripId) -> Result<bool, TripRepositoryError>;
}

/// Fixture implementation for tests that do not exercise trip storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTripRepository;

#[async_trait]
impl TripRepository for FixtureTripRepository {
    async fn create(&self, _trip: &Trip) -> Result<(), TripRepositoryError> {
        Ok(())
    }

    async fn update(&self, _trip: &Trip) -> Result<bool, TripRepositoryError> {
        Ok(false)
    }

    async fn find_by_id(&self, _id: &TripId) -> Result<Option<Trip>, TripRepositoryError> {
        Ok(None)
    }

    async fn list_for_owner(&self, _owner: &UserId) -> Result<Vec<Trip>, TripRepositoryError> {
        Ok(Vec::new())
    }

    async fn delete(&self, _id: &TripId) -> Result<bool, TripRepositoryError> {
        Ok(false)
    }
}
