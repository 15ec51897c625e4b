//! Port abstraction for the credential store and its errors.
use async_trait::async_trait;

use crate::domain::{TripId, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Email or username is already taken.
        Duplicate { field: String } => "user repository duplicate {field}",
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
    }
}

/// Credential store keyed by user id with unique email and username.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user. Fails with [`UserRepositoryError::Duplicate`] when
    /// the email or username is already registered.
    async fn create(&self, user: &User) -> Result<(), UserRepositoryError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch a user whose email matches `key` case-insensitively, or whose
    /// username matches it exactly.
    async fn find_by_email_or_username(
        &self,
        key: &str,
    ) -> Result<Option<User>, UserRepositoryError>;

    /// Append `trip_id` to the user's trip list if not already present.
    async fn link_trip(&self, user_id: &UserId, trip_id: &TripId)
    -> Result<(), UserRepositoryError>;

    /// Remove `trip_id` from the user's trip list.
    async fn unlink_trip(
        &self,
        user_id: &UserId,
        trip_id: &TripId,
    ) -> Result<(), UserRepositoryError>;
}

/// Fixture implementation for tests that never touch stored users.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserRepository;

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn create(&self, _user: &User) -> Result<(), UserRepositoryError> {
        Ok(())
    }

    async fn find_by_id(&self, _id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(None)
    }

    async fn find_by_email_or_username(
        &self,
        _key: &str,
    ) -> Result<Option<User>, UserRepositoryError> {
        Ok(None)
    }

    async fn link_trip(
        &self,
        _user_id: &UserId,
        _trip_id: &TripId,
    ) -> Result<(), UserRepositoryError> {
        Ok(())
    }

    async fn unlink_trip(
        &self,
        _user_id: &UserId,
        _trip_id: &TripId,
    ) -> Result<(), UserRepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn fixture_lookups_return_none() {
        let repo = FixtureUserRepository;
        assert!(
            repo.find_by_id(&UserId::random())
                .await
                .expect("fixture lookup")
                .is_none()
        );
        assert!(
            repo.find_by_email_or_username("ada")
                .await
                .expect("fixture lookup")
                .is_none()
        );
    }

    #[rstest]
    fn duplicate_error_names_the_field() {
        let err = UserRepositoryError::duplicate("email");
        assert_eq!(err.to_string(), "user repository duplicate email");
    }
}
