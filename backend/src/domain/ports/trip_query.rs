//! Driving port for trip reads.

use async_trait::async_trait;

use crate::domain::{AuthenticatedUser, Error, Trip};

use super::TripTarget;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TripQuery: Send + Sync {
    /// Trips owned by `actor`, newest first.
    async fn list_trips(&self, actor: AuthenticatedUser) -> Result<Vec<Trip>, Error>;

    /// One owned trip with its items.
    async fn get_trip(&self, target: TripTarget) -> Result<Trip, Error>;
}

/// Query double with no stored trips.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTripQuery;

#[async_trait]
impl TripQuery for FixtureTripQuery {
    async fn list_trips(&self, _actor: AuthenticatedUser) -> Result<Vec<Trip>, Error> {
        Ok(Vec::new())
    }

    async fn get_trip(&self, _target: TripTarget) -> Result<Trip, Error> {
        Err(Error::not_found("Trip not found"))
    }
}
