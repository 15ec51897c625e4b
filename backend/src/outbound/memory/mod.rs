//! Process-local repositories used when no database is configured.
//!
//! State lives behind a `Mutex` and disappears on restart. The server falls
//! back to these adapters in development, and integration tests use them to
//! run the full HTTP stack without PostgreSQL.

mod in_memory_trip_repository;
mod in_memory_user_repository;

pub use in_memory_trip_repository::InMemoryTripRepository;
pub use in_memory_user_repository::InMemoryUserRepository;
