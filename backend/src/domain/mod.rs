//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers. Keep types immutable outside their own mutation
//! methods and document invariants in each type's Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - User (alias to `user::User`): registered account.
//! - Trip / Item (from `trip`): trip aggregate and its packing list.
//! - AccountService, BearerAuthenticator, TripService: driving port
//!   implementations.

pub mod account_service;
pub mod auth;
pub mod bearer_authenticator;
pub mod error;
pub mod ports;
pub mod trace_id;
pub mod trip;
pub mod trip_service;
pub mod user;

pub use self::account_service::AccountService;
pub use self::auth::{
    AuthenticatedUser, LoginCredentials, LoginValidationError, PASSWORD_MAX_BYTES,
    PASSWORD_MIN_CHARS, Password, RegistrationDraft, RegistrationValidationError,
};
pub use self::bearer_authenticator::{BearerAuthenticator, REJECTED_TOKEN_MESSAGE};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::trace_id::TraceId;
pub use self::trip::{
    DEFAULT_ITEM_QUANTITY, Item, ItemDraft, ItemId, ItemList, ItemMutationError, ItemPatch, Trip,
    TripDraft, TripId, TripPatch, TripValidationError,
};
pub use self::trip_service::TripService;
pub use self::user::{
    DISPLAY_NAME_MAX, DisplayName, Email, PasswordHash, Role, USERNAME_MAX, USERNAME_MIN, User,
    UserDraft, UserId, UserValidationError, Username,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use packwise::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
