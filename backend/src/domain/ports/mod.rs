//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod bearer_authentication;
mod password_hasher;
mod token_service;
mod trip_command;
mod trip_query;
mod trip_repository;
mod user_repository;

#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use account_command::{AccountCommand, AuthSession, FIXTURE_USER_ID, FixtureAccountCommand};
#[cfg(test)]
pub use bearer_authentication::MockBearerAuthentication;
pub use bearer_authentication::{BearerAuthentication, FixtureBearerAuthentication};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{FixturePasswordHasher, PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use token_service::MockTokenService;
pub use token_service::{FixtureTokenService, IssuedToken, TokenError, TokenService};
#[cfg(test)]
pub use trip_command::MockTripCommand;
pub use trip_command::{FixtureTripCommand, ItemTarget, NewTrip, TripCommand, TripTarget};
#[cfg(test)]
pub use trip_query::MockTripQuery;
pub use trip_query::{FixtureTripQuery, TripQuery};
#[cfg(test)]
pub use trip_repository::MockTripRepository;
pub use trip_repository::{FixtureTripRepository, TripRepository, TripRepositoryError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{FixtureUserRepository, UserRepository, UserRepositoryError};
