//! Mutex-guarded credential store.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{TripId, User, UserId};

#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<UserId, User>>, UserRepositoryError> {
        self.users
            .lock()
            .map_err(|_| UserRepositoryError::query("user store lock poisoned"))
    }

    fn update_trips<F>(&self, user_id: &UserId, edit: F) -> Result<(), UserRepositoryError>
    where
        F: FnOnce(&mut Vec<TripId>),
    {
        let mut users = self.lock()?;
        let Some(user) = users.remove(user_id) else {
            return Ok(());
        };
        let mut draft = user.into_draft();
        edit(&mut draft.trip_ids);
        users.insert(user_id.clone(), User::new(draft));
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut users = self.lock()?;
        for existing in users.values() {
            if existing.email() == user.email() {
                return Err(UserRepositoryError::duplicate("email"));
            }
            if existing.username() == user.username() {
                return Err(UserRepositoryError::duplicate("username"));
            }
        }
        users.insert(user.id().clone(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(self.lock()?.get(id).cloned())
    }

    async fn find_by_email_or_username(
        &self,
        key: &str,
    ) -> Result<Option<User>, UserRepositoryError> {
        let email_key = key.to_lowercase();
        let users = self.lock()?;
        let found = users
            .values()
            .find(|user| user.email().as_ref() == email_key)
            .or_else(|| users.values().find(|user| user.username().as_ref() == key));
        Ok(found.cloned())
    }

    async fn link_trip(
        &self,
        user_id: &UserId,
        trip_id: &TripId,
    ) -> Result<(), UserRepositoryError> {
        self.update_trips(user_id, |trips| {
            if !trips.contains(trip_id) {
                trips.push(*trip_id);
            }
        })
    }

    async fn unlink_trip(
        &self,
        user_id: &UserId,
        trip_id: &TripId,
    ) -> Result<(), UserRepositoryError> {
        self.update_trips(user_id, |trips| trips.retain(|id| id != trip_id))
    }
}
