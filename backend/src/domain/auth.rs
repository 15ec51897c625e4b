//! Authentication primitives: login credentials, registration input and the
//! authenticated identity handed to trip operations.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use zeroize::Zeroizing;

use super::user::{DisplayName, Email, Role, UserId, UserValidationError, Username};

/// Minimum password length in characters.
pub const PASSWORD_MIN_CHARS: usize = 6;
/// Maximum password length in bytes; bcrypt ignores anything beyond this.
pub const PASSWORD_MAX_BYTES: usize = 72;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email or username was missing or blank once trimmed.
    EmptyLogin,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyLogin => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by the account service.
///
/// ## Invariants
/// - `login` is trimmed and must not be empty. It may hold an email address
///   or a username.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use packwise::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" ada@example.com ", "secret").unwrap();
/// assert_eq!(creds.login(), "ada@example.com");
/// assert_eq!(creds.password(), "secret");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    login: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw login/password inputs.
    pub fn try_from_parts(login: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = login.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyLogin);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            login: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email address or username used for the lookup.
    pub fn login(&self) -> &str {
        self.login.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validation failures for registration payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationValidationError {
    /// One of the identity fields failed validation.
    Identity {
        field: &'static str,
        reason: UserValidationError,
    },
    PasswordTooShort { min: usize },
    PasswordTooLong { max: usize },
}

impl RegistrationValidationError {
    /// Name of the offending request field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Identity { field, .. } => field,
            Self::PasswordTooShort { .. } | Self::PasswordTooLong { .. } => "password",
        }
    }
}

impl fmt::Display for RegistrationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identity { reason, .. } => write!(f, "{reason}"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
            Self::PasswordTooLong { max } => write!(f, "password must be at most {max} bytes"),
        }
    }
}

impl std::error::Error for RegistrationValidationError {}

fn identity_error(
    field: &'static str,
) -> impl Fn(UserValidationError) -> RegistrationValidationError {
    move |reason| RegistrationValidationError::Identity { field, reason }
}

/// Plaintext password held only long enough to hash it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Validate password length bounds.
    pub fn new(raw: &str) -> Result<Self, RegistrationValidationError> {
        if raw.chars().count() < PASSWORD_MIN_CHARS {
            return Err(RegistrationValidationError::PasswordTooShort {
                min: PASSWORD_MIN_CHARS,
            });
        }
        if raw.len() > PASSWORD_MAX_BYTES {
            return Err(RegistrationValidationError::PasswordTooLong {
                max: PASSWORD_MAX_BYTES,
            });
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

/// Validated registration input.
///
/// # Examples
/// ```
/// use packwise::domain::RegistrationDraft;
///
/// let draft = RegistrationDraft::try_from_parts("Ada", "Ada@Example.com", "ada", "hunter22")
///     .unwrap();
/// assert_eq!(draft.email().as_ref(), "ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationDraft {
    name: DisplayName,
    email: Email,
    username: Username,
    password: Password,
}

impl RegistrationDraft {
    /// Validate each registration field in request order.
    pub fn try_from_parts(
        name: &str,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<Self, RegistrationValidationError> {
        Ok(Self {
            name: DisplayName::new(name).map_err(identity_error("name"))?,
            email: Email::new(email).map_err(identity_error("email"))?,
            username: Username::new(username).map_err(identity_error("username"))?,
            password: Password::new(password)?,
        })
    }

    pub fn name(&self) -> &DisplayName {
        &self.name
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn password(&self) -> &Password {
        &self.password
    }
}

/// Identity resolved from a verified bearer token.
///
/// Handlers receive this explicitly; trip operations never consult ambient
/// state to decide who is calling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    id: UserId,
    role: Role,
}

impl AuthenticatedUser {
    pub fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyLogin)]
    #[case("   ", "pw", LoginValidationError::EmptyLogin)]
    #[case("user", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] login: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(login, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("  ada@example.com  ", "secret")]
    #[case("trekker", "correct horse battery staple")]
    fn valid_credentials_trim_login(#[case] login: &str, #[case] password: &str) {
        let creds = LoginCredentials::try_from_parts(login, password)
            .expect("valid inputs should succeed");
        assert_eq!(creds.login(), login.trim());
        assert_eq!(creds.password(), password);
    }

    #[rstest]
    #[case("12345", RegistrationValidationError::PasswordTooShort { min: PASSWORD_MIN_CHARS })]
    fn short_passwords_are_rejected(
        #[case] raw: &str,
        #[case] expected: RegistrationValidationError,
    ) {
        assert_eq!(Password::new(raw).expect_err("too short"), expected);
    }

    #[rstest]
    fn overlong_passwords_are_rejected() {
        let raw = "p".repeat(PASSWORD_MAX_BYTES + 1);
        assert_eq!(
            Password::new(&raw).expect_err("too long"),
            RegistrationValidationError::PasswordTooLong {
                max: PASSWORD_MAX_BYTES
            }
        );
    }

    #[rstest]
    #[case("", "ada@example.com", "ada", "secret", "name")]
    #[case("Ada", "nope", "ada", "secret", "email")]
    #[case("Ada", "ada@example.com", "a", "secret", "username")]
    #[case("Ada", "ada@example.com", "ada", "123", "password")]
    fn registration_reports_offending_field(
        #[case] name: &str,
        #[case] email: &str,
        #[case] username: &str,
        #[case] password: &str,
        #[case] field: &str,
    ) {
        let err = RegistrationDraft::try_from_parts(name, email, username, password)
            .expect_err("invalid registration");
        assert_eq!(err.field(), field);
    }

    #[rstest]
    fn registration_normalises_identity_fields() {
        let draft =
            RegistrationDraft::try_from_parts(" Ada ", " ADA@example.com", " ada ", "secret")
                .expect("valid registration");
        assert_eq!(draft.name().as_ref(), "Ada");
        assert_eq!(draft.email().as_ref(), "ada@example.com");
        assert_eq!(draft.username().as_ref(), "ada");
        assert_eq!(draft.password().expose(), "secret");
    }
}
