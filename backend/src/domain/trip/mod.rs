//! Trip aggregate: a dated journey owned by exactly one user, with its packing
//! list embedded.
//!
//! Every mutation is all-or-nothing. A candidate state is built and checked
//! before anything is written back, so a rejected update never leaves the
//! aggregate half-changed.

mod item;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserId;

pub use item::{DEFAULT_ITEM_QUANTITY, Item, ItemDraft, ItemId, ItemList, ItemPatch};

/// Identifier of a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TripId(Uuid);

impl TripId {
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Validation errors raised while building or mutating a trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TripValidationError {
    EmptyTitle,
    EmptyDestination,
    EndBeforeStart {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    EmptyItemName,
    InvalidQuantity {
        value: i64,
    },
    DuplicateItemId {
        id: ItemId,
    },
}

impl TripValidationError {
    /// Request field the error refers to, in wire naming.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyTitle => "title",
            Self::EmptyDestination => "destination",
            Self::EndBeforeStart { .. } => "endDate",
            Self::EmptyItemName => "name",
            Self::InvalidQuantity { .. } => "quantity",
            Self::DuplicateItemId { .. } => "items",
        }
    }
}

impl fmt::Display for TripValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::EmptyDestination => write!(f, "destination must not be empty"),
            Self::EndBeforeStart { start, end } => write!(
                f,
                "endDate ({}) must not be before startDate ({})",
                end.to_rfc3339(),
                start.to_rfc3339()
            ),
            Self::EmptyItemName => write!(f, "item name must not be empty"),
            Self::InvalidQuantity { value } => {
                write!(f, "item quantity must be at least 1 (got {value})")
            }
            Self::DuplicateItemId { id } => write!(f, "item id {id} appears more than once"),
        }
    }
}

impl std::error::Error for TripValidationError {}

/// Failures of item-level mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemMutationError {
    NotFound { item_id: ItemId },
    Invalid(TripValidationError),
}

impl fmt::Display for ItemMutationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { item_id } => write!(f, "item {item_id} not found"),
            Self::Invalid(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for ItemMutationError {}

impl From<TripValidationError> for ItemMutationError {
    fn from(value: TripValidationError) -> Self {
        Self::Invalid(value)
    }
}

/// Input for [`Trip::new`].
#[derive(Debug, Clone)]
pub struct TripDraft {
    pub id: TripId,
    pub owner: UserId,
    pub title: String,
    pub destination: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub items: Vec<ItemDraft>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial trip update. `None` leaves the field unchanged; `items`, when
/// present, replaces the whole packing list.
#[derive(Debug, Clone, Default)]
pub struct TripPatch {
    pub title: Option<String>,
    pub destination: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub items: Option<Vec<ItemDraft>>,
}

impl TripPatch {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.destination.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.items.is_none()
    }
}

/// A validated trip.
///
/// ## Invariants
/// - `title` and `destination` are trimmed and non-empty.
/// - `end_date >= start_date`.
/// - Item ids are unique within the trip.
/// - `owner` never changes after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trip {
    id: TripId,
    owner: UserId,
    title: String,
    destination: String,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    items: ItemList,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn validate_text(
    raw: &str,
    empty: TripValidationError,
) -> Result<String, TripValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(empty);
    }
    Ok(trimmed.to_owned())
}

fn validate_dates(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<(), TripValidationError> {
    if end < start {
        return Err(TripValidationError::EndBeforeStart { start, end });
    }
    Ok(())
}

impl Trip {
    /// Validate a draft into a trip.
    ///
    /// # Examples
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use packwise::domain::{Trip, TripDraft, TripId, UserId};
    ///
    /// let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    /// let end = Utc.with_ymd_and_hms(2025, 1, 10, 0, 0, 0).unwrap();
    /// let trip = Trip::new(TripDraft {
    ///     id: TripId::random(),
    ///     owner: UserId::random(),
    ///     title: "Peru".into(),
    ///     destination: "Lima".into(),
    ///     start_date: start,
    ///     end_date: end,
    ///     items: Vec::new(),
    ///     created_at: start,
    ///     updated_at: start,
    /// })
    /// .unwrap();
    /// assert!(trip.items().is_empty());
    /// ```
    pub fn new(draft: TripDraft) -> Result<Self, TripValidationError> {
        let TripDraft {
            id,
            owner,
            title,
            destination,
            start_date,
            end_date,
            items,
            created_at,
            updated_at,
        } = draft;

        let title = validate_text(&title, TripValidationError::EmptyTitle)?;
        let destination = validate_text(&destination, TripValidationError::EmptyDestination)?;
        validate_dates(start_date, end_date)?;
        let items = ItemList::from_drafts(items)?;

        Ok(Self {
            id,
            owner,
            title,
            destination,
            start_date,
            end_date,
            items,
            created_at,
            updated_at,
        })
    }

    pub fn id(&self) -> TripId {
        self.id
    }

    /// Owning user.
    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    /// True when `user` owns this trip.
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.owner == user
    }

    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    pub fn destination(&self) -> &str {
        self.destination.as_str()
    }

    pub fn start_date(&self) -> DateTime<Utc> {
        self.start_date
    }

    pub fn end_date(&self) -> DateTime<Utc> {
        self.end_date
    }

    pub fn items(&self) -> &ItemList {
        &self.items
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Merge a partial update and re-check every invariant on the result.
    pub fn apply_patch(
        &mut self,
        patch: TripPatch,
        now: DateTime<Utc>,
    ) -> Result<(), TripValidationError> {
        let TripPatch {
            title,
            destination,
            start_date,
            end_date,
            items,
        } = patch;

        let title = title
            .map(|raw| validate_text(&raw, TripValidationError::EmptyTitle))
            .transpose()?;
        let destination = destination
            .map(|raw| validate_text(&raw, TripValidationError::EmptyDestination))
            .transpose()?;
        let start_date = start_date.unwrap_or(self.start_date);
        let end_date = end_date.unwrap_or(self.end_date);
        validate_dates(start_date, end_date)?;
        let items = items.map(ItemList::from_drafts).transpose()?;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(destination) = destination {
            self.destination = destination;
        }
        self.start_date = start_date;
        self.end_date = end_date;
        if let Some(items) = items {
            self.items = items;
        }
        self.updated_at = now;
        Ok(())
    }

    /// Append a new item built from `draft`.
    pub fn add_item(
        &mut self,
        draft: ItemDraft,
        now: DateTime<Utc>,
    ) -> Result<&Item, TripValidationError> {
        let item = Item::new(draft)?;
        self.updated_at = now;
        self.items.push(item)
    }

    /// Apply a partial update to one item.
    pub fn update_item(
        &mut self,
        item_id: ItemId,
        patch: ItemPatch,
        now: DateTime<Utc>,
    ) -> Result<&Item, ItemMutationError> {
        let item = self
            .items
            .get_mut(item_id)
            .ok_or(ItemMutationError::NotFound { item_id })?;
        item.apply(patch)?;
        self.updated_at = now;
        self.item_or_missing(item_id)
    }

    /// Remove an item if present. Returns whether anything was removed.
    pub fn remove_item(&mut self, item_id: ItemId, now: DateTime<Utc>) -> bool {
        let removed = self.items.remove(item_id);
        if removed {
            self.updated_at = now;
        }
        removed
    }

    /// Flip an item's packed flag.
    pub fn toggle_packed(
        &mut self,
        item_id: ItemId,
        now: DateTime<Utc>,
    ) -> Result<&Item, ItemMutationError> {
        self.items
            .get_mut(item_id)
            .ok_or(ItemMutationError::NotFound { item_id })?
            .toggle_packed();
        self.updated_at = now;
        self.item_or_missing(item_id)
    }

    fn item_or_missing(&self, item_id: ItemId) -> Result<&Item, ItemMutationError> {
        self.items
            .get(item_id)
            .ok_or(ItemMutationError::NotFound { item_id })
    }
}

#[cfg(test)]
mod tests;
