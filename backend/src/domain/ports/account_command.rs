//! Driving port for registration and login.
//!
//! Inbound adapters call it to create accounts and exchange credentials for
//! a bearer token without knowing which hasher, token signer or store sits
//! behind it. Handler tests substitute a double instead of wiring any of them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    DisplayName, Email, Error, LoginCredentials, PasswordHash, RegistrationDraft, User, UserDraft,
    UserId, Username,
};

/// Token plus the account it was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

/// Domain use-case port for account creation and authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create an account and sign the caller in.
    async fn register(&self, draft: RegistrationDraft) -> Result<AuthSession, Error>;

    /// Validate credentials and issue a token.
    async fn login(&self, credentials: LoginCredentials) -> Result<AuthSession, Error>;
}

/// Id of the only account [`FixtureAccountCommand`] knows about.
pub const FIXTURE_USER_ID: &str = "123e4567-e89b-12d3-a456-426614174000";

/// In-memory stand-in used when handler tests only need the wire shape.
///
/// `register` always succeeds. `login` accepts any known login with the
/// password `password` and returns the fixture account.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAccountCommand;

impl FixtureAccountCommand {
    fn fixture_user(
        id: UserId,
        name: DisplayName,
        email: Email,
        username: Username,
    ) -> Result<User, Error> {
        let password_hash = PasswordHash::new("fixture")
            .map_err(|err| Error::internal(format!("invalid fixture hash: {err}")))?;
        let now = Utc::now();
        Ok(User::new(UserDraft {
            id,
            name,
            email,
            username,
            password_hash,
            profile_picture: String::new(),
            role: Default::default(),
            trip_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }))
    }

    fn session_for(user: User) -> AuthSession {
        AuthSession {
            token: format!("fixture-token:{}", user.id()),
            expires_at: DateTime::<Utc>::MAX_UTC,
            user,
        }
    }
}

#[async_trait]
impl AccountCommand for FixtureAccountCommand {
    async fn register(&self, draft: RegistrationDraft) -> Result<AuthSession, Error> {
        let user = Self::fixture_user(
            UserId::random(),
            draft.name().clone(),
            draft.email().clone(),
            draft.username().clone(),
        )?;
        Ok(Self::session_for(user))
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<AuthSession, Error> {
        if credentials.password() != "password" {
            return Err(Error::unauthorized("Invalid credentials"));
        }
        let invalid = |err: crate::domain::UserValidationError| {
            Error::internal(format!("invalid fixture user: {err}"))
        };
        let user = Self::fixture_user(
            UserId::new(FIXTURE_USER_ID).map_err(invalid)?,
            DisplayName::new("Fixture Traveller").map_err(invalid)?,
            Email::new("fixture@packwise.test").map_err(invalid)?,
            Username::new("fixture").map_err(invalid)?,
        )?;
        Ok(Self::session_for(user))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case("fixture", "password", true)]
    #[case("fixture", "wrong", false)]
    #[tokio::test]
    async fn fixture_login_accepts_only_the_fixture_password(
        #[case] login: &str,
        #[case] password: &str,
        #[case] should_succeed: bool,
    ) {
        let creds = LoginCredentials::try_from_parts(login, password).expect("credentials shape");
        let result = FixtureAccountCommand.login(creds).await;
        match (should_succeed, result) {
            (true, Ok(session)) => assert_eq!(session.user.id().as_ref(), FIXTURE_USER_ID),
            (false, Err(err)) => assert_eq!(err.code(), ErrorCode::Unauthorized),
            (true, Err(err)) => panic!("expected success, got error: {err:?}"),
            (false, Ok(session)) => panic!("expected failure, got session for {}", session.user.id()),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_register_echoes_identity() {
        let draft = RegistrationDraft::try_from_parts("Ada", "ada@example.com", "ada", "hunter22")
            .expect("valid draft");
        let session = FixtureAccountCommand
            .register(draft)
            .await
            .expect("fixture register");
        assert_eq!(session.user.username().as_ref(), "ada");
        assert!(session.token.starts_with("fixture-token:"));
    }
}
