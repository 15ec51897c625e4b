//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly; regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts. `email` and `username` carry unique constraints
    /// named `users_email_key` and `users_username_key`.
    users (id) {
        id -> Uuid,
        name -> Varchar,
        email -> Varchar,
        username -> Varchar,
        password_hash -> Text,
        profile_picture -> Text,
        role -> Varchar,
        /// Denormalized list of created trips; not authoritative.
        trip_ids -> Array<Uuid>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Trips with their packing list embedded as a JSONB array.
    trips (id) {
        id -> Uuid,
        user_id -> Uuid,
        title -> Text,
        destination -> Text,
        start_date -> Timestamptz,
        end_date -> Timestamptz,
        items -> Jsonb,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(trips -> users (user_id));
diesel::allow_tables_to_appear_in_same_query!(users, trips);
