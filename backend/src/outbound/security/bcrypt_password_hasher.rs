//! bcrypt implementation of [`PasswordHasher`].
//!
//! Hashing is CPU bound, so both operations run on the blocking pool with the
//! request's trace identifier carried across.

use async_trait::async_trait;
use tracing::warn;
use zeroize::Zeroizing;

use crate::domain::ports::{PasswordHashError, PasswordHasher};
use crate::domain::{Password, PasswordHash, TraceId};

/// Work factor used when configuration does not override it.
pub const DEFAULT_BCRYPT_COST: u32 = 10;

#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// Build a hasher with the given work factor (4..=31).
    pub fn new(cost: u32) -> Result<Self, PasswordHashError> {
        if !(4..=31).contains(&cost) {
            return Err(PasswordHashError::backend(format!(
                "bcrypt cost must be between 4 and 31, got {cost}"
            )));
        }
        Ok(Self { cost })
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self {
            cost: DEFAULT_BCRYPT_COST,
        }
    }
}

fn join_error(err: tokio::task::JoinError) -> PasswordHashError {
    PasswordHashError::backend(format!("hashing task failed: {err}"))
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHashError> {
        let plain = Zeroizing::new(password.expose().to_owned());
        let cost = self.cost;
        let hashed = TraceId::run_blocking(move || bcrypt::hash(plain.as_bytes(), cost))
            .await
            .map_err(join_error)?
            .map_err(|err| PasswordHashError::backend(err.to_string()))?;
        PasswordHash::new(hashed).map_err(|err| PasswordHashError::backend(err.to_string()))
    }

    async fn verify(
        &self,
        candidate: &str,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHashError> {
        let plain = Zeroizing::new(candidate.to_owned());
        let stored = hash.as_ref().to_owned();
        TraceId::run_blocking(move || {
            bcrypt::verify(plain.as_bytes(), &stored).inspect_err(|err| {
                warn!(
                    trace_id = ?TraceId::current(),
                    error = %err,
                    "stored password hash could not be verified"
                );
            })
        })
        .await
        .map_err(join_error)?
        .map_err(|err| PasswordHashError::backend(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn hasher() -> BcryptPasswordHasher {
        BcryptPasswordHasher::new(4).expect("minimum cost")
    }

    #[rstest]
    #[tokio::test]
    async fn hashes_verify_only_the_original_password(hasher: BcryptPasswordHasher) {
        let password = Password::new("hunter22").expect("valid password");

        let hash = hasher.hash(&password).await.expect("hash");

        assert!(hash.as_ref().starts_with("$2b$04$"));
        assert!(hasher.verify("hunter22", &hash).await.expect("verify"));
        assert!(!hasher.verify("hunter23", &hash).await.expect("verify"));
    }

    #[rstest]
    #[tokio::test]
    async fn hashes_are_salted(hasher: BcryptPasswordHasher) {
        let password = Password::new("hunter22").expect("valid password");
        let first = hasher.hash(&password).await.expect("hash");
        let second = hasher.hash(&password).await.expect("hash");
        assert_ne!(first, second);
    }

    #[rstest]
    #[tokio::test]
    async fn corrupt_hashes_are_backend_errors(hasher: BcryptPasswordHasher) {
        let corrupt = PasswordHash::new("not-a-bcrypt-hash").expect("non-empty");
        let err = hasher
            .verify("hunter22", &corrupt)
            .await
            .expect_err("unparseable hash");
        assert!(matches!(err, PasswordHashError::Backend { .. }));
    }

    #[rstest]
    #[case(3)]
    #[case(32)]
    fn out_of_range_costs_are_rejected(#[case] cost: u32) {
        assert!(BcryptPasswordHasher::new(cost).is_err());
    }
}
