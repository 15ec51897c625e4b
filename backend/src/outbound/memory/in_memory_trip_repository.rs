//! Mutex-guarded trip store.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{TripRepository, TripRepositoryError};
use crate::domain::{Trip, TripId, UserId};

#[derive(Debug, Default)]
pub struct InMemoryTripRepository {
    trips: Mutex<HashMap<TripId, Trip>>,
}

impl InMemoryTripRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<TripId, Trip>>, TripRepositoryError> {
        self.trips
            .lock()
            .map_err(|_| TripRepositoryError::query("trip store lock poisoned"))
    }
}

#[async_trait]
impl TripRepository for InMemoryTripRepository {
    async fn create(&self, trip: &Trip) -> Result<(), TripRepositoryError> {
        let mut trips = self.lock()?;
        if trips.contains_key(&trip.id()) {
            return Err(TripRepositoryError::query(format!(
                "trip {} already exists",
                trip.id()
            )));
        }
        trips.insert(trip.id(), trip.clone());
        Ok(())
    }

    async fn update(&self, trip: &Trip) -> Result<bool, TripRepositoryError> {
        match self.lock()?.get_mut(&trip.id()) {
            Some(stored) => {
                *stored = trip.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_by_id(&self, id: &TripId) -> Result<Option<Trip>, TripRepositoryError> {
        Ok(self.lock()?.get(id).cloned())
    }

    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Trip>, TripRepositoryError> {
        let mut owned: Vec<Trip> = self
            .lock()?
            .values()
            .filter(|trip| trip.is_owned_by(owner))
            .cloned()
            .collect();
        owned.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id().cmp(&a.id()))
        });
        Ok(owned)
    }

    async fn delete(&self, id: &TripId) -> Result<bool, TripRepositoryError> {
        Ok(self.lock()?.remove(id).is_some())
    }
}
