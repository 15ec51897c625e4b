//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use std::str::FromStr;

use async_trait::async_trait;
use diesel::pg::sql_types::Array;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::Uuid as SqlUuid;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{
    DisplayName, Email, PasswordHash, Role, TripId, User, UserDraft, UserId, Username,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

diesel::define_sql_function! {
    fn array_append(list: Array<SqlUuid>, element: SqlUuid) -> Array<SqlUuid>;
}

diesel::define_sql_function! {
    fn array_remove(list: Array<SqlUuid>, element: SqlUuid) -> Array<SqlUuid>;
}

const EMAIL_CONSTRAINT: &str = "users_email_key";
const USERNAME_CONSTRAINT: &str = "users_username_key";

/// Diesel-backed credential store.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    map_basic_pool_error(error, UserRepositoryError::connection)
}

fn map_diesel_error(error: DieselError) -> UserRepositoryError {
    map_basic_diesel_error(
        error,
        UserRepositoryError::query,
        UserRepositoryError::connection,
    )
}

/// Name the column behind a unique violation so callers can report it.
fn duplicate_field(constraint: Option<&str>, message: &str) -> &'static str {
    match constraint {
        Some(EMAIL_CONSTRAINT) => "email",
        Some(USERNAME_CONSTRAINT) => "username",
        _ if message.contains(USERNAME_CONSTRAINT) => "username",
        _ => "email",
    }
}

fn map_insert_error(error: DieselError) -> UserRepositoryError {
    match &error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            let field = duplicate_field(info.constraint_name(), info.message());
            debug!(field, "user insert hit a unique constraint");
            UserRepositoryError::duplicate(field)
        }
        _ => map_diesel_error(error),
    }
}

fn corrupt(field: &str) -> impl Fn(crate::domain::UserValidationError) -> UserRepositoryError {
    let field = field.to_owned();
    move |err| UserRepositoryError::query(format!("stored user has invalid {field}: {err}"))
}

fn row_to_user(row: UserRow) -> Result<User, UserRepositoryError> {
    let UserRow {
        id,
        name,
        email,
        username,
        password_hash,
        profile_picture,
        role,
        trip_ids,
        created_at,
        updated_at,
    } = row;

    Ok(User::new(UserDraft {
        id: UserId::from_uuid(id),
        name: DisplayName::new(name).map_err(corrupt("name"))?,
        email: Email::new(email).map_err(corrupt("email"))?,
        username: Username::new(username).map_err(corrupt("username"))?,
        password_hash: PasswordHash::new(password_hash).map_err(corrupt("password hash"))?,
        profile_picture,
        role: Role::from_str(&role).map_err(corrupt("role"))?,
        trip_ids: trip_ids.into_iter().map(TripId::from_uuid).collect(),
        created_at,
        updated_at,
    }))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            id: *user.id().as_uuid(),
            name: user.name().as_ref(),
            email: user.email().as_ref(),
            username: user.username().as_ref(),
            password_hash: user.password_hash().as_ref(),
            profile_picture: user.profile_picture(),
            role: user.role().as_str(),
            trip_ids: user.trip_ids().iter().map(|id| *id.as_uuid()).collect(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        };

        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_insert_error)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn find_by_email_or_username(
        &self,
        key: &str,
    ) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Emails are stored lowercased; usernames cannot contain `@`, so at
        // most one column can match.
        let row = users::table
            .filter(
                users::email
                    .eq(key.to_lowercase())
                    .or(users::username.eq(key)),
            )
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn link_trip(
        &self,
        user_id: &UserId,
        trip_id: &TripId,
    ) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let trip: Uuid = *trip_id.as_uuid();

        diesel::update(
            users::table
                .filter(users::id.eq(user_id.as_uuid()))
                .filter(diesel::dsl::not(users::trip_ids.contains(vec![trip]))),
        )
        .set(users::trip_ids.eq(array_append(users::trip_ids, trip)))
        .execute(&mut conn)
        .await
        .map(|_| ())
        .map_err(map_diesel_error)
    }

    async fn unlink_trip(
        &self,
        user_id: &UserId,
        trip_id: &TripId,
    ) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::update(users::table.filter(users::id.eq(user_id.as_uuid())))
            .set(users::trip_ids.eq(array_remove(users::trip_ids, *trip_id.as_uuid())))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}
