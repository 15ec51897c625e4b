//! Account registration and login.
//!
//! The service owns the ordering of the account use-cases: uniqueness is
//! checked before the comparatively expensive bcrypt hash, and the store's
//! own unique constraint is still trusted as the final arbiter.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::ports::{
    AccountCommand, AuthSession, PasswordHashError, PasswordHasher, TokenError, TokenService,
    UserRepository, UserRepositoryError,
};
use crate::domain::{Error, LoginCredentials, RegistrationDraft, User};

pub(crate) fn map_user_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Duplicate { field } => duplicate_user(&field),
        UserRepositoryError::Connection { message } => {
            Error::internal(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

fn duplicate_user(field: &str) -> Error {
    Error::duplicate_key("User already exists").with_details(json!({
        "field": field,
        "code": "duplicate",
    }))
}

fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(error.to_string())
}

fn map_token_error(error: TokenError) -> Error {
    Error::internal(format!("token issuance failed: {error}"))
}

/// Account service implementing the [`AccountCommand`] driving port.
#[derive(Clone)]
pub struct AccountService<U, H, T> {
    users: Arc<U>,
    hasher: Arc<H>,
    tokens: Arc<T>,
    clock: Arc<dyn Clock>,
}

impl<U, H, T> AccountService<U, H, T> {
    /// Create a new account service.
    pub fn new(users: Arc<U>, hasher: Arc<H>, tokens: Arc<T>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            hasher,
            tokens,
            clock,
        }
    }
}

impl<U, H, T> AccountService<U, H, T>
where
    U: UserRepository,
    T: TokenService,
{
    async fn ensure_unclaimed(&self, draft: &RegistrationDraft) -> Result<(), Error> {
        let claims = [
            ("email", draft.email().as_ref()),
            ("username", draft.username().as_ref()),
        ];
        for (field, key) in claims {
            let taken = self
                .users
                .find_by_email_or_username(key)
                .await
                .map_err(map_user_repository_error)?;
            if taken.is_some() {
                return Err(duplicate_user(field));
            }
        }
        Ok(())
    }

    fn session_for(&self, user: User) -> Result<AuthSession, Error> {
        let issued = self.tokens.issue(user.id()).map_err(map_token_error)?;
        Ok(AuthSession {
            token: issued.token,
            expires_at: issued.expires_at,
            user,
        })
    }
}

#[async_trait]
impl<U, H, T> AccountCommand for AccountService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: TokenService,
{
    async fn register(&self, draft: RegistrationDraft) -> Result<AuthSession, Error> {
        self.ensure_unclaimed(&draft).await?;

        let password_hash = self
            .hasher
            .hash(draft.password())
            .await
            .map_err(map_hash_error)?;
        let user = User::register(
            draft.name().clone(),
            draft.email().clone(),
            draft.username().clone(),
            password_hash,
            self.clock.utc(),
        );

        self.users
            .create(&user)
            .await
            .map_err(map_user_repository_error)?;
        info!(user_id = %user.id(), "registered user");

        self.session_for(user)
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<AuthSession, Error> {
        let Some(user) = self
            .users
            .find_by_email_or_username(credentials.login())
            .await
            .map_err(map_user_repository_error)?
        else {
            return Err(Error::not_found("User not found"));
        };

        let matches = self
            .hasher
            .verify(credentials.password(), user.password_hash())
            .await
            .map_err(map_hash_error)?;
        if !matches {
            debug!(user_id = %user.id(), "password mismatch");
            return Err(Error::unauthorized("Invalid credentials"));
        }

        self.session_for(user)
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
