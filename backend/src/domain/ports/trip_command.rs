//! Driving port for trip and packing-item mutations.
//!
//! Every request names the acting user explicitly. Implementations check
//! ownership before touching the aggregate and return the full updated trip
//! from each item mutation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    AuthenticatedUser, Error, ItemDraft, ItemId, ItemPatch, Trip, TripDraft, TripId, TripPatch,
};

/// Fields supplied when creating a trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTrip {
    pub title: String,
    pub destination: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub items: Vec<ItemDraft>,
}

impl NewTrip {
    /// Turn the request into a draft owned by `actor`.
    pub fn into_draft(self, actor: &AuthenticatedUser, now: DateTime<Utc>) -> TripDraft {
        TripDraft {
            id: TripId::random(),
            owner: actor.id().clone(),
            title: self.title,
            destination: self.destination,
            start_date: self.start_date,
            end_date: self.end_date,
            items: self.items,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A trip addressed on behalf of a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripTarget {
    pub actor: AuthenticatedUser,
    pub trip_id: TripId,
}

/// An item addressed on behalf of a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemTarget {
    pub actor: AuthenticatedUser,
    pub trip_id: TripId,
    pub item_id: ItemId,
}

impl ItemTarget {
    /// The enclosing trip address.
    pub fn trip(&self) -> TripTarget {
        TripTarget {
            actor: self.actor.clone(),
            trip_id: self.trip_id,
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TripCommand: Send + Sync {
    /// Create a trip owned by `actor`.
    async fn create_trip(&self, actor: AuthenticatedUser, trip: NewTrip) -> Result<Trip, Error>;

    /// Merge a partial update into an owned trip.
    async fn update_trip(&self, target: TripTarget, patch: TripPatch) -> Result<Trip, Error>;

    /// Delete an owned trip together with its items.
    async fn delete_trip(&self, target: TripTarget) -> Result<(), Error>;

    /// Append an unpacked item.
    async fn add_item(&self, target: TripTarget, item: ItemDraft) -> Result<Trip, Error>;

    /// Apply a partial update to one item.
    async fn update_item(&self, target: ItemTarget, patch: ItemPatch) -> Result<Trip, Error>;

    /// Remove an item; absent ids are ignored.
    async fn remove_item(&self, target: ItemTarget) -> Result<Trip, Error>;

    /// Flip an item between packed and unpacked.
    async fn toggle_packed(&self, target: ItemTarget) -> Result<Trip, Error>;
}

/// Stateless command double: builds trips from requests without storing
/// them, and reports every addressed trip as missing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTripCommand;

fn missing(trip_id: TripId) -> Error {
    Error::not_found("Trip not found").with_details(serde_json::json!({ "tripId": trip_id }))
}

#[async_trait]
impl TripCommand for FixtureTripCommand {
    async fn create_trip(&self, actor: AuthenticatedUser, trip: NewTrip) -> Result<Trip, Error> {
        Trip::new(trip.into_draft(&actor, Utc::now()))
            .map_err(|err| Error::invalid_request(err.to_string()))
    }

    async fn update_trip(&self, target: TripTarget, _patch: TripPatch) -> Result<Trip, Error> {
        Err(missing(target.trip_id))
    }

    async fn delete_trip(&self, target: TripTarget) -> Result<(), Error> {
        Err(missing(target.trip_id))
    }

    async fn add_item(&self, target: TripTarget, _item: ItemDraft) -> Result<Trip, Error> {
        Err(missing(target.trip_id))
    }

    async fn update_item(&self, target: ItemTarget, _patch: ItemPatch) -> Result<Trip, Error> {
        Err(missing(target.trip_id))
    }

    async fn remove_item(&self, target: ItemTarget) -> Result<Trip, Error> {
        Err(missing(target.trip_id))
    }

    async fn toggle_packed(&self, target: ItemTarget) -> Result<Trip, Error> {
        Err(missing(target.trip_id))
    }
}
