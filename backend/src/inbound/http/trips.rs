//! Trip and packing-item handlers.
//!
//! ```text
//! POST   /api/trips                                     create
//! GET    /api/trips                                     list own trips
//! GET    /api/trips/{id}                                fetch one
//! PUT    /api/trips/{id}                                partial update
//! DELETE /api/trips/{id}                                delete
//! PUT    /api/trips/items/{tripId}                      add item
//! PUT    /api/trips/items/{tripId}/update/{itemId}      update item
//! DELETE /api/trips/items/{tripId}/{itemId}             remove item
//! PATCH  /api/trips/items/{tripId}/{itemId}/toggle      toggle packed
//! ```
//!
//! Every handler requires a bearer token; ownership is enforced by the
//! [`TripCommand`](crate::domain::ports::TripCommand) and
//! [`TripQuery`](crate::domain::ports::TripQuery) ports.

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{ItemTarget, NewTrip, TripTarget};
use crate::domain::{
    AuthenticatedUser, Error, Item, ItemDraft, ItemId, ItemPatch, Trip, TripId, TripPatch,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_optional_trip_date, parse_trip_date, parse_uuid, require,
};

const TITLE: FieldName = FieldName::new("title");
const DESTINATION: FieldName = FieldName::new("destination");
const START_DATE: FieldName = FieldName::new("startDate");
const END_DATE: FieldName = FieldName::new("endDate");
const ITEM_NAME: FieldName = FieldName::new("name");

/// Message returned by `DELETE /api/trips/{id}`.
pub const TRIP_DELETED_MESSAGE: &str = "Trip deleted successfully";

/// Packing item as sent by clients.
#[derive(Debug, Default, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemRequest {
    /// Existing id to keep when replacing a list; ignored when adding.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: Option<String>,
    #[schema(example = "Passport")]
    pub name: Option<String>,
    /// Defaults to 1.
    #[schema(example = 1)]
    pub quantity: Option<i64>,
    /// Defaults to `false`.
    pub packed: Option<bool>,
}

impl TryFrom<ItemRequest> for ItemDraft {
    type Error = Error;

    fn try_from(value: ItemRequest) -> Result<Self, Self::Error> {
        let id = value
            .id
            .map(|raw| parse_uuid(&raw, FieldName::new("id")).map(ItemId::from_uuid))
            .transpose()?;
        Ok(Self {
            id,
            name: require(value.name, ITEM_NAME)?,
            quantity: value.quantity,
            packed: value.packed,
        })
    }
}

fn item_drafts(items: Vec<ItemRequest>) -> Result<Vec<ItemDraft>, Error> {
    items.into_iter().map(ItemDraft::try_from).collect()
}

/// Request body for `POST /api/trips`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTripRequest {
    #[schema(example = "Peru")]
    pub title: Option<String>,
    #[schema(example = "Lima")]
    pub destination: Option<String>,
    /// `YYYY-MM-DD` or RFC 3339.
    #[schema(example = "2025-01-01")]
    pub start_date: Option<String>,
    #[schema(example = "2025-01-10")]
    pub end_date: Option<String>,
    pub items: Option<Vec<ItemRequest>>,
}

impl TryFrom<CreateTripRequest> for NewTrip {
    type Error = Error;

    fn try_from(value: CreateTripRequest) -> Result<Self, Self::Error> {
        let title = require(value.title, TITLE)?;
        let destination = require(value.destination, DESTINATION)?;
        let start_date = require(value.start_date, START_DATE)?;
        let end_date = require(value.end_date, END_DATE)?;
        Ok(Self {
            title,
            destination,
            start_date: parse_trip_date(&start_date, START_DATE)?,
            end_date: parse_trip_date(&end_date, END_DATE)?,
            items: item_drafts(value.items.unwrap_or_default())?,
        })
    }
}

/// Request body for `PUT /api/trips/{id}`. Absent fields stay unchanged;
/// `items`, when present, replaces the whole list.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTripRequest {
    pub title: Option<String>,
    pub destination: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub items: Option<Vec<ItemRequest>>,
}

impl TryFrom<UpdateTripRequest> for TripPatch {
    type Error = Error;

    fn try_from(value: UpdateTripRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            title: value.title,
            destination: value.destination,
            start_date: parse_optional_trip_date(value.start_date.as_deref(), START_DATE)?,
            end_date: parse_optional_trip_date(value.end_date.as_deref(), END_DATE)?,
            items: value.items.map(item_drafts).transpose()?,
        })
    }
}

/// Request body for `PUT /api/trips/items/{tripId}/update/{itemId}`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatchRequest {
    pub name: Option<String>,
    pub quantity: Option<i64>,
    pub packed: Option<bool>,
}

impl From<ItemPatchRequest> for ItemPatch {
    fn from(value: ItemPatchRequest) -> Self {
        Self {
            name: value.name,
            quantity: value.quantity,
            packed: value.packed,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    pub id: String,
    pub name: String,
    pub quantity: u32,
    pub packed: bool,
}

impl From<&Item> for ItemResponse {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id().to_string(),
            name: item.name().to_owned(),
            quantity: item.quantity(),
            packed: item.packed(),
        }
    }
}

/// Trip with its embedded packing list.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TripResponse {
    pub id: String,
    pub title: String,
    pub destination: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub items: Vec<ItemResponse>,
    /// Owner id.
    pub user: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Trip> for TripResponse {
    fn from(trip: &Trip) -> Self {
        Self {
            id: trip.id().to_string(),
            title: trip.title().to_owned(),
            destination: trip.destination().to_owned(),
            start_date: trip.start_date(),
            end_date: trip.end_date(),
            items: trip.items().iter().map(ItemResponse::from).collect(),
            user: trip.owner().to_string(),
            created_at: trip.created_at(),
            updated_at: trip.updated_at(),
        }
    }
}

impl From<Trip> for TripResponse {
    fn from(trip: Trip) -> Self {
        Self::from(&trip)
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Trip deleted successfully")]
    pub message: String,
}

fn trip_target(actor: AuthenticatedUser, raw_trip_id: &str) -> Result<TripTarget, Error> {
    let trip_id = parse_uuid(raw_trip_id, FieldName::new("tripId"))?;
    Ok(TripTarget {
        actor,
        trip_id: TripId::from_uuid(trip_id),
    })
}

fn item_target(
    actor: AuthenticatedUser,
    raw_trip_id: &str,
    raw_item_id: &str,
) -> Result<ItemTarget, Error> {
    let TripTarget { actor, trip_id } = trip_target(actor, raw_trip_id)?;
    let item_id = parse_uuid(raw_item_id, FieldName::new("itemId"))?;
    Ok(ItemTarget {
        actor,
        trip_id,
        item_id: ItemId::from_uuid(item_id),
    })
}

/// Create a trip owned by the caller.
#[utoipa::path(
    post,
    path = "/api/trips",
    request_body = CreateTripRequest,
    responses(
        (status = 201, description = "Trip created", body = TripResponse),
        (status = 400, description = "Invalid trip", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["trips"],
    operation_id = "createTrip",
    security(("BearerAuth" = []))
)]
#[post("")]
pub async fn create_trip(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<CreateTripRequest>,
) -> ApiResult<HttpResponse> {
    let new_trip = NewTrip::try_from(payload.into_inner())?;
    let trip = state.trips.create_trip(user, new_trip).await?;
    Ok(HttpResponse::Created().json(TripResponse::from(trip)))
}

/// List the caller's trips, newest first.
#[utoipa::path(
    get,
    path = "/api/trips",
    responses(
        (status = 200, description = "Trips owned by the caller", body = [TripResponse]),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["trips"],
    operation_id = "listTrips",
    security(("BearerAuth" = []))
)]
#[get("")]
pub async fn list_trips(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<TripResponse>>> {
    let trips = state.trips_query.list_trips(user).await?;
    Ok(web::Json(trips.iter().map(TripResponse::from).collect()))
}

/// Fetch one trip with its items.
#[utoipa::path(
    get,
    path = "/api/trips/{id}",
    params(("id" = String, Path, description = "Trip id")),
    responses(
        (status = 200, description = "Trip", body = TripResponse),
        (status = 400, description = "Malformed trip id", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 403, description = "Trip belongs to another user", body = ErrorSchema),
        (status = 404, description = "Trip not found", body = ErrorSchema)
    ),
    tags = ["trips"],
    operation_id = "getTrip",
    security(("BearerAuth" = []))
)]
#[get("/{id}")]
pub async fn get_trip(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<TripResponse>> {
    let target = trip_target(user, &path.into_inner())?;
    let trip = state.trips_query.get_trip(target).await?;
    Ok(web::Json(TripResponse::from(trip)))
}

/// Merge the supplied fields into a trip.
#[utoipa::path(
    put,
    path = "/api/trips/{id}",
    params(("id" = String, Path, description = "Trip id")),
    request_body = UpdateTripRequest,
    responses(
        (status = 200, description = "Updated trip", body = TripResponse),
        (status = 400, description = "Invalid update", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 403, description = "Trip belongs to another user", body = ErrorSchema),
        (status = 404, description = "Trip not found", body = ErrorSchema)
    ),
    tags = ["trips"],
    operation_id = "updateTrip",
    security(("BearerAuth" = []))
)]
#[put("/{id}")]
pub async fn update_trip(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<UpdateTripRequest>,
) -> ApiResult<web::Json<TripResponse>> {
    let target = trip_target(user, &path.into_inner())?;
    let patch = TripPatch::try_from(payload.into_inner())?;
    let trip = state.trips.update_trip(target, patch).await?;
    Ok(web::Json(TripResponse::from(trip)))
}

/// Delete a trip and its packing list.
#[utoipa::path(
    delete,
    path = "/api/trips/{id}",
    params(("id" = String, Path, description = "Trip id")),
    responses(
        (status = 200, description = "Trip deleted", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 403, description = "Trip belongs to another user", body = ErrorSchema),
        (status = 404, description = "Trip not found", body = ErrorSchema)
    ),
    tags = ["trips"],
    operation_id = "deleteTrip",
    security(("BearerAuth" = []))
)]
#[delete("/{id}")]
pub async fn delete_trip(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let target = trip_target(user, &path.into_inner())?;
    state.trips.delete_trip(target).await?;
    Ok(web::Json(MessageResponse {
        message: TRIP_DELETED_MESSAGE.to_owned(),
    }))
}

/// Append an unpacked item and return the whole trip.
#[utoipa::path(
    put,
    path = "/api/trips/items/{tripId}",
    params(("tripId" = String, Path, description = "Trip id")),
    request_body = ItemRequest,
    responses(
        (status = 200, description = "Trip with the new item", body = TripResponse),
        (status = 400, description = "Invalid item", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 403, description = "Trip belongs to another user", body = ErrorSchema),
        (status = 404, description = "Trip not found", body = ErrorSchema)
    ),
    tags = ["items"],
    operation_id = "addItem",
    security(("BearerAuth" = []))
)]
#[put("/items/{trip_id}")]
pub async fn add_item(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<ItemRequest>,
) -> ApiResult<web::Json<TripResponse>> {
    let target = trip_target(user, &path.into_inner())?;
    let draft = ItemDraft::try_from(payload.into_inner())?;
    let trip = state.trips.add_item(target, draft).await?;
    Ok(web::Json(TripResponse::from(trip)))
}

/// Update an item's name, quantity or packed flag.
#[utoipa::path(
    put,
    path = "/api/trips/items/{tripId}/update/{itemId}",
    params(
        ("tripId" = String, Path, description = "Trip id"),
        ("itemId" = String, Path, description = "Item id")
    ),
    request_body = ItemPatchRequest,
    responses(
        (status = 200, description = "Trip with the updated item", body = TripResponse),
        (status = 400, description = "Invalid item", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 403, description = "Trip belongs to another user", body = ErrorSchema),
        (status = 404, description = "Trip or item not found", body = ErrorSchema)
    ),
    tags = ["items"],
    operation_id = "updateItem",
    security(("BearerAuth" = []))
)]
#[put("/items/{trip_id}/update/{item_id}")]
pub async fn update_item(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<(String, String)>,
    payload: web::Json<ItemPatchRequest>,
) -> ApiResult<web::Json<TripResponse>> {
    let (trip_id, item_id) = path.into_inner();
    let target = item_target(user, &trip_id, &item_id)?;
    let trip = state
        .trips
        .update_item(target, ItemPatch::from(payload.into_inner()))
        .await?;
    Ok(web::Json(TripResponse::from(trip)))
}

/// Remove an item. Unknown item ids leave the trip unchanged.
#[utoipa::path(
    delete,
    path = "/api/trips/items/{tripId}/{itemId}",
    params(
        ("tripId" = String, Path, description = "Trip id"),
        ("itemId" = String, Path, description = "Item id")
    ),
    responses(
        (status = 200, description = "Trip without the item", body = TripResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 403, description = "Trip belongs to another user", body = ErrorSchema),
        (status = 404, description = "Trip not found", body = ErrorSchema)
    ),
    tags = ["items"],
    operation_id = "removeItem",
    security(("BearerAuth" = []))
)]
#[delete("/items/{trip_id}/{item_id}")]
pub async fn remove_item(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<TripResponse>> {
    let (trip_id, item_id) = path.into_inner();
    let target = item_target(user, &trip_id, &item_id)?;
    let trip = state.trips.remove_item(target).await?;
    Ok(web::Json(TripResponse::from(trip)))
}

/// Flip an item between packed and unpacked.
#[utoipa::path(
    patch,
    path = "/api/trips/items/{tripId}/{itemId}/toggle",
    params(
        ("tripId" = String, Path, description = "Trip id"),
        ("itemId" = String, Path, description = "Item id")
    ),
    responses(
        (status = 200, description = "Trip with the toggled item", body = TripResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 403, description = "Trip belongs to another user", body = ErrorSchema),
        (status = 404, description = "Trip or item not found", body = ErrorSchema)
    ),
    tags = ["items"],
    operation_id = "togglePacked",
    security(("BearerAuth" = []))
)]
#[patch("/items/{trip_id}/{item_id}/toggle")]
pub async fn toggle_packed(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<TripResponse>> {
    let (trip_id, item_id) = path.into_inner();
    let target = item_target(user, &trip_id, &item_id)?;
    let trip = state.trips.toggle_packed(target).await?;
    Ok(web::Json(TripResponse::from(trip)))
}

/// Register every trip handler on a scope mounted at `/api/trips`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_trip)
        .service(list_trips)
        .service(add_item)
        .service(update_item)
        .service(remove_item)
        .service(toggle_packed)
        .service(get_trip)
        .service(update_trip)
        .service(delete_trip);
}

#[cfg(test)]
#[path = "trips_tests.rs"]
mod tests;
