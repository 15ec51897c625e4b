//! Trip access service.
//!
//! Implements both trip driving ports on top of the trip and user
//! repositories. Each mutation is load, check owner, mutate, save. There is
//! no optimistic versioning, so two concurrent writers to the same trip race
//! and the last save wins. Saves only update existing rows, so a mutation
//! racing a delete fails with "Trip not found".

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    ItemTarget, NewTrip, TripCommand, TripQuery, TripRepository, TripRepositoryError, TripTarget,
    UserRepository,
};
use crate::domain::{
    AuthenticatedUser, Error, ItemDraft, ItemMutationError, ItemPatch, Trip, TripId, TripPatch,
    TripValidationError,
};

fn map_repository_error(error: TripRepositoryError) -> Error {
    match error {
        TripRepositoryError::Connection { message } => {
            Error::internal(format!("trip repository unavailable: {message}"))
        }
        TripRepositoryError::Query { message } => {
            Error::internal(format!("trip repository error: {message}"))
        }
    }
}

fn map_validation_error(error: TripValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": error.field(),
        "code": "invalid_trip",
    }))
}

fn map_item_error(error: ItemMutationError) -> Error {
    match error {
        ItemMutationError::NotFound { item_id } => {
            Error::not_found("Item not found").with_details(json!({ "itemId": item_id }))
        }
        ItemMutationError::Invalid(reason) => map_validation_error(reason),
    }
}

fn trip_not_found(trip_id: TripId) -> Error {
    Error::not_found("Trip not found").with_details(json!({ "tripId": trip_id }))
}

/// Domain service implementing [`TripCommand`] and [`TripQuery`].
#[derive(Clone)]
pub struct TripService<T, U> {
    trips: Arc<T>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<T, U> TripService<T, U> {
    /// Create a new trip service.
    pub fn new(trips: Arc<T>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            trips,
            users,
            clock,
        }
    }
}

impl<T, U> TripService<T, U>
where
    T: TripRepository,
    U: UserRepository,
{
    /// Load a trip and confirm the actor owns it. Absence is reported
    /// before ownership.
    async fn load_owned(&self, target: &TripTarget) -> Result<Trip, Error> {
        let trip = self
            .trips
            .find_by_id(&target.trip_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| trip_not_found(target.trip_id))?;

        if !trip.is_owned_by(target.actor.id()) {
            warn!(
                trip_id = %target.trip_id,
                user_id = %target.actor.id(),
                "rejected access to another user's trip"
            );
            return Err(Error::forbidden("Unauthorized access"));
        }
        Ok(trip)
    }

    /// Write back a loaded trip. A trip deleted since it was loaded stays
    /// deleted and the caller sees it as missing.
    async fn persist(&self, trip: Trip) -> Result<Trip, Error> {
        let updated = self
            .trips
            .update(&trip)
            .await
            .map_err(map_repository_error)?;
        if !updated {
            warn!(trip_id = %trip.id(), "trip vanished before its update was written");
            return Err(trip_not_found(trip.id()));
        }
        Ok(trip)
    }

    /// Apply an item mutation to an owned trip and save it.
    async fn mutate_item<F>(&self, target: ItemTarget, mutate: F) -> Result<Trip, Error>
    where
        F: FnOnce(&mut Trip) -> Result<(), ItemMutationError> + Send,
    {
        let mut trip = self.load_owned(&target.trip()).await?;
        mutate(&mut trip).map_err(map_item_error)?;
        self.persist(trip).await
    }
}

#[async_trait]
impl<T, U> TripCommand for TripService<T, U>
where
    T: TripRepository,
    U: UserRepository,
{
    async fn create_trip(&self, actor: AuthenticatedUser, trip: NewTrip) -> Result<Trip, Error> {
        let trip =
            Trip::new(trip.into_draft(&actor, self.clock.utc())).map_err(map_validation_error)?;
        self.trips
            .create(&trip)
            .await
            .map_err(map_repository_error)?;

        if let Err(error) = self.users.link_trip(actor.id(), &trip.id()).await {
            warn!(trip_id = %trip.id(), user_id = %actor.id(), %error, "failed to link trip to owner");
        }
        info!(trip_id = %trip.id(), user_id = %actor.id(), "created trip");
        Ok(trip)
    }

    async fn update_trip(&self, target: TripTarget, patch: TripPatch) -> Result<Trip, Error> {
        let mut trip = self.load_owned(&target).await?;
        trip.apply_patch(patch, self.clock.utc())
            .map_err(map_validation_error)?;
        self.persist(trip).await
    }

    async fn delete_trip(&self, target: TripTarget) -> Result<(), Error> {
        let trip = self.load_owned(&target).await?;
        let removed = self
            .trips
            .delete(&target.trip_id)
            .await
            .map_err(map_repository_error)?;
        if !removed {
            return Err(trip_not_found(target.trip_id));
        }

        if let Err(error) = self.users.unlink_trip(trip.owner(), &trip.id()).await {
            warn!(trip_id = %trip.id(), %error, "failed to unlink trip from owner");
        }
        info!(trip_id = %trip.id(), "deleted trip");
        Ok(())
    }

    async fn add_item(&self, target: TripTarget, item: ItemDraft) -> Result<Trip, Error> {
        let mut trip = self.load_owned(&target).await?;
        let draft = ItemDraft {
            id: None,
            packed: Some(false),
            ..item
        };
        trip.add_item(draft, self.clock.utc())
            .map_err(map_validation_error)?;
        self.persist(trip).await
    }

    async fn update_item(&self, target: ItemTarget, patch: ItemPatch) -> Result<Trip, Error> {
        let item_id = target.item_id;
        let now = self.clock.utc();
        self.mutate_item(target, move |trip| {
            trip.update_item(item_id, patch, now).map(drop)
        })
        .await
    }

    async fn remove_item(&self, target: ItemTarget) -> Result<Trip, Error> {
        let item_id = target.item_id;
        let now = self.clock.utc();
        self.mutate_item(target, move |trip| {
            trip.remove_item(item_id, now);
            Ok(())
        })
        .await
    }

    async fn toggle_packed(&self, target: ItemTarget) -> Result<Trip, Error> {
        let item_id = target.item_id;
        let now = self.clock.utc();
        self.mutate_item(target, move |trip| {
            trip.toggle_packed(item_id, now).map(drop)
        })
        .await
    }
}

#[async_trait]
impl<T, U> TripQuery for TripService<T, U>
where
    T: TripRepository,
    U: UserRepository,
{
    async fn list_trips(&self, actor: AuthenticatedUser) -> Result<Vec<Trip>, Error> {
        self.trips
            .list_for_owner(actor.id())
            .await
            .map_err(map_repository_error)
    }

    async fn get_trip(&self, target: TripTarget) -> Result<Trip, Error> {
        self.load_owned(&target).await
    }
}

#[cfg(test)]
#[path = "trip_service_tests.rs"]
mod tests;
