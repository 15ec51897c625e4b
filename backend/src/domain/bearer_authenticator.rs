//! Resolves bearer tokens into authenticated users.
//!
//! Every rejection collapses to one `401` message so clients cannot tell a
//! forged token from an expired one or a deleted account. The precise reason
//! is logged at debug level.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::account_service::map_user_repository_error;
use crate::domain::ports::{BearerAuthentication, TokenService, UserRepository};
use crate::domain::{AuthenticatedUser, Error};

/// Message returned for every rejected token.
pub const REJECTED_TOKEN_MESSAGE: &str = "Invalid or expired token";

fn rejected() -> Error {
    Error::unauthorized(REJECTED_TOKEN_MESSAGE)
}

/// Domain service implementing [`BearerAuthentication`].
#[derive(Clone)]
pub struct BearerAuthenticator<T, U> {
    tokens: Arc<T>,
    users: Arc<U>,
}

impl<T, U> BearerAuthenticator<T, U> {
    pub fn new(tokens: Arc<T>, users: Arc<U>) -> Self {
        Self { tokens, users }
    }
}

#[async_trait]
impl<T, U> BearerAuthentication for BearerAuthenticator<T, U>
where
    T: TokenService,
    U: UserRepository,
{
    async fn authenticate(&self, token: &str) -> Result<AuthenticatedUser, Error> {
        let user_id = self.tokens.verify(token).map_err(|err| {
            debug!(error = %err, "bearer token rejected");
            rejected()
        })?;

        let user = self
            .users
            .find_by_id(&user_id)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| {
                debug!(user_id = %user_id, "bearer token names an unknown user");
                rejected()
            })?;

        Ok(AuthenticatedUser::new(user.id().clone(), user.role()))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{
        FixtureTokenService, MockTokenService, MockUserRepository, TokenError,
        UserRepositoryError,
    };
    use crate::domain::{
        DisplayName, Email, ErrorCode, PasswordHash, Role, User, UserDraft, UserId, Username,
    };
    use crate::test_support::fixture_timestamp;
    use rstest::rstest;

    fn admin(id: UserId) -> User {
        User::new(UserDraft {
            id,
            name: DisplayName::new("Root").expect("name"),
            email: Email::new("root@example.com").expect("email"),
            username: Username::new("root").expect("username"),
            password_hash: PasswordHash::new("hash").expect("hash"),
            profile_picture: String::new(),
            role: Role::Admin,
            trip_ids: Vec::new(),
            created_at: fixture_timestamp(),
            updated_at: fixture_timestamp(),
        })
    }

    #[rstest]
    #[tokio::test]
    async fn resolves_stored_user_with_role() {
        let id = UserId::random();
        let token = format!("fixture-token:{id}");
        let stored = admin(id.clone());
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(stored)));

        let user = BearerAuthenticator::new(Arc::new(FixtureTokenService), Arc::new(users))
            .authenticate(&token)
            .await
            .expect("authenticated");

        assert_eq!(user.id(), &id);
        assert_eq!(user.role(), Role::Admin);
    }

    #[rstest]
    #[case(TokenError::expired())]
    #[case(TokenError::tampered_signature())]
    #[case(TokenError::invalid("not a jwt"))]
    #[tokio::test]
    async fn token_failures_share_one_message(#[case] failure: TokenError) {
        let mut tokens = MockTokenService::new();
        tokens.expect_verify().return_once(move |_| Err(failure));
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().times(0);

        let err = BearerAuthenticator::new(Arc::new(tokens), Arc::new(users))
            .authenticate("whatever")
            .await
            .expect_err("rejected");

        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), REJECTED_TOKEN_MESSAGE);
    }

    #[rstest]
    #[tokio::test]
    async fn deleted_user_is_unauthenticated() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().return_once(|_| Ok(None));

        let err = BearerAuthenticator::new(Arc::new(FixtureTokenService), Arc::new(users))
            .authenticate(&format!("fixture-token:{}", UserId::random()))
            .await
            .expect_err("unknown user");

        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[tokio::test]
    async fn store_failure_is_internal() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .return_once(|_| Err(UserRepositoryError::query("timeout")));

        let err = BearerAuthenticator::new(Arc::new(FixtureTokenService), Arc::new(users))
            .authenticate(&format!("fixture-token:{}", UserId::random()))
            .await
            .expect_err("store failure");

        assert_eq!(err.code(), ErrorCode::InternalError);
    }
}
