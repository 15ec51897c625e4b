//! Port for issuing and verifying bearer tokens.
//!
//! Implementations sign a user id claim with an expiry. Callers treat every
//! verification failure the same way; the variants exist for logging.

use chrono::{DateTime, Utc};

use crate::domain::UserId;

use super::define_port_error;

define_port_error! {
    /// Reasons a token could not be issued or verified.
    pub enum TokenError {
        /// Token was malformed or its claims did not parse.
        Invalid { message: String } => "token invalid: {message}",
        /// Token expiry is in the past.
        Expired => "token expired",
        /// Signature did not match the configured secret.
        TamperedSignature => "token signature mismatch",
        /// Signing a fresh token failed.
        Signing { message: String } => "token signing failed: {message}",
    }
}

/// A freshly signed token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Sign a token whose subject is `user_id`.
    fn issue(&self, user_id: &UserId) -> Result<IssuedToken, TokenError>;

    /// Verify `token` and return the subject it names.
    fn verify(&self, token: &str) -> Result<UserId, TokenError>;
}

const FIXTURE_PREFIX: &str = "fixture-token:";

/// Unsigned tokens of the form `fixture-token:<user id>` for tests that do
/// not care about cryptography.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTokenService;

impl TokenService for FixtureTokenService {
    fn issue(&self, user_id: &UserId) -> Result<IssuedToken, TokenError> {
        Ok(IssuedToken {
            token: format!("{FIXTURE_PREFIX}{user_id}"),
            expires_at: DateTime::<Utc>::MAX_UTC,
        })
    }

    fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        let raw = token
            .strip_prefix(FIXTURE_PREFIX)
            .ok_or_else(|| TokenError::invalid("missing fixture prefix"))?;
        UserId::new(raw).map_err(|err| TokenError::invalid(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn fixture_tokens_name_their_subject() {
        let service = FixtureTokenService;
        let user = UserId::random();
        let issued = service.issue(&user).expect("issue");
        assert_eq!(service.verify(&issued.token).expect("verify"), user);
    }

    #[rstest]
    #[case("")]
    #[case("fixture-token:not-a-uuid")]
    #[case("Bearer something")]
    fn fixture_rejects_foreign_tokens(#[case] token: &str) {
        assert!(matches!(
            FixtureTokenService.verify(token),
            Err(TokenError::Invalid { .. })
        ));
    }
}
