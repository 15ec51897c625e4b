//! PostgreSQL-backed `TripRepository` implementation using Diesel ORM.
//!
//! Each trip is one row; its packing list is a JSONB array on that row, so
//! updating or deleting a trip touches its items atomically. Updates never
//! insert, so a trip deleted mid-mutation stays deleted.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{TripRepository, TripRepositoryError};
use crate::domain::{Item, ItemDraft, ItemId, Trip, TripDraft, TripId, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewTripRow, StoredItem, TripRow, TripUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::trips;

/// Diesel-backed trip store.
#[derive(Clone)]
pub struct DieselTripRepository {
    pool: DbPool,
}

impl DieselTripRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TripRepositoryError {
    map_basic_pool_error(error, TripRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> TripRepositoryError {
    map_basic_diesel_error(
        error,
        TripRepositoryError::query,
        TripRepositoryError::connection,
    )
}

fn stored_item(item: &Item) -> StoredItem {
    StoredItem {
        id: *item.id().as_uuid(),
        name: item.name().to_owned(),
        quantity: i64::from(item.quantity()),
        packed: item.packed(),
    }
}

fn encode_items(trip: &Trip) -> Result<serde_json::Value, TripRepositoryError> {
    let items: Vec<StoredItem> = trip.items().iter().map(stored_item).collect();
    serde_json::to_value(items)
        .map_err(|err| TripRepositoryError::query(format!("serialise items: {err}")))
}

fn decode_items(items: serde_json::Value) -> Result<Vec<ItemDraft>, TripRepositoryError> {
    let stored: Vec<StoredItem> = serde_json::from_value(items)
        .map_err(|err| TripRepositoryError::query(format!("decode items: {err}")))?;
    Ok(stored
        .into_iter()
        .map(|item| ItemDraft {
            id: Some(ItemId::from_uuid(item.id)),
            name: item.name,
            quantity: Some(item.quantity),
            packed: Some(item.packed),
        })
        .collect())
}

/// Convert a database row into a validated trip.
fn row_to_trip(row: TripRow) -> Result<Trip, TripRepositoryError> {
    let TripRow {
        id,
        user_id,
        title,
        destination,
        start_date,
        end_date,
        items,
        created_at,
        updated_at,
    } = row;

    Trip::new(TripDraft {
        id: TripId::from_uuid(id),
        owner: UserId::from_uuid(user_id),
        title,
        destination,
        start_date,
        end_date,
        items: decode_items(items)?,
        created_at,
        updated_at,
    })
    .map_err(|err| TripRepositoryError::query(format!("stored trip {id} is invalid: {err}")))
}

#[async_trait]
impl TripRepository for DieselTripRepository {
    async fn create(&self, trip: &Trip) -> Result<(), TripRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let items = encode_items(trip)?;

        let new_row = NewTripRow {
            id: *trip.id().as_uuid(),
            user_id: *trip.owner().as_uuid(),
            title: trip.title(),
            destination: trip.destination(),
            start_date: trip.start_date(),
            end_date: trip.end_date(),
            items: &items,
            created_at: trip.created_at(),
            updated_at: trip.updated_at(),
        };

        diesel::insert_into(trips::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn update(&self, trip: &Trip) -> Result<bool, TripRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let items = encode_items(trip)?;

        let changes = TripUpdate {
            title: trip.title(),
            destination: trip.destination(),
            start_date: trip.start_date(),
            end_date: trip.end_date(),
            items: &items,
            updated_at: trip.updated_at(),
        };

        diesel::update(trips::table.filter(trips::id.eq(trip.id().as_uuid())))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map(|updated| updated > 0)
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &TripId) -> Result<Option<Trip>, TripRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = trips::table
            .filter(trips::id.eq(id.as_uuid()))
            .select(TripRow::as_select())
            .first::<TripRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_trip).transpose()
    }

    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Trip>, TripRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<TripRow> = trips::table
            .filter(trips::user_id.eq(owner.as_uuid()))
            .order((trips::created_at.desc(), trips::id.desc()))
            .select(TripRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_trip).collect()
    }

    async fn delete(&self, id: &TripId) -> Result<bool, TripRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(trips::table.filter(trips::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map(|removed| removed > 0)
            .map_err(map_diesel_error)
    }
}
