//! Driving port that turns a bearer token into an authenticated identity.

use async_trait::async_trait;

use crate::domain::{AuthenticatedUser, Error, Role, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BearerAuthentication: Send + Sync {
    /// Resolve `token` (without the `Bearer ` prefix) to a user.
    async fn authenticate(&self, token: &str) -> Result<AuthenticatedUser, Error>;
}

/// Treats the token itself as a user id and grants the member role.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureBearerAuthentication;

#[async_trait]
impl BearerAuthentication for FixtureBearerAuthentication {
    async fn authenticate(&self, token: &str) -> Result<AuthenticatedUser, Error> {
        let id = UserId::new(token).map_err(|_| Error::unauthorized("Invalid or expired token"))?;
        Ok(AuthenticatedUser::new(id, Role::Member))
    }
}
