//! Packing items embedded in a trip.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::TripValidationError;

/// Quantity applied when a draft omits one.
pub const DEFAULT_ITEM_QUANTITY: u32 = 1;

/// Identifier of an item, unique within its parent trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
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

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unvalidated item input with every optional field spelled out.
///
/// | field      | default when `None`        |
/// |------------|----------------------------|
/// | `id`       | freshly generated          |
/// | `quantity` | [`DEFAULT_ITEM_QUANTITY`]  |
/// | `packed`   | `false`                    |
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemDraft {
    pub id: Option<ItemId>,
    pub name: String,
    pub quantity: Option<i64>,
    pub packed: Option<bool>,
}

impl ItemDraft {
    /// Draft for a brand new, unpacked item.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Partial update for an existing item. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub quantity: Option<i64>,
    pub packed: Option<bool>,
}

/// A validated packing item.
///
/// ## Invariants
/// - `name` is trimmed and non-empty.
/// - `quantity` is at least one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    id: ItemId,
    name: String,
    quantity: u32,
    packed: bool,
}

fn validate_name(raw: &str) -> Result<String, TripValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TripValidationError::EmptyItemName);
    }
    Ok(trimmed.to_owned())
}

fn validate_quantity(raw: i64) -> Result<u32, TripValidationError> {
    u32::try_from(raw)
        .ok()
        .filter(|quantity| *quantity >= 1)
        .ok_or(TripValidationError::InvalidQuantity { value: raw })
}

impl Item {
    /// Validate a draft, filling in defaults for omitted fields.
    pub fn new(draft: ItemDraft) -> Result<Self, TripValidationError> {
        let ItemDraft {
            id,
            name,
            quantity,
            packed,
        } = draft;
        Ok(Self {
            id: id.unwrap_or_else(ItemId::random),
            name: validate_name(&name)?,
            quantity: quantity
                .map(validate_quantity)
                .transpose()?
                .unwrap_or(DEFAULT_ITEM_QUANTITY),
            packed: packed.unwrap_or(false),
        })
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn packed(&self) -> bool {
        self.packed
    }

    /// Apply a patch atomically: on error the item is left untouched.
    pub(crate) fn apply(&mut self, patch: ItemPatch) -> Result<(), TripValidationError> {
        let name = patch.name.as_deref().map(validate_name).transpose()?;
        let quantity = patch.quantity.map(validate_quantity).transpose()?;
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(quantity) = quantity {
            self.quantity = quantity;
        }
        if let Some(packed) = patch.packed {
            self.packed = packed;
        }
        Ok(())
    }

    /// Flip between packed and unpacked.
    pub(crate) fn toggle_packed(&mut self) {
        self.packed = !self.packed;
    }
}

/// Ordered item collection with an id index for direct lookup.
#[derive(Debug, Clone, Default)]
pub struct ItemList {
    items: Vec<Item>,
    index: HashMap<ItemId, usize>,
}

impl PartialEq for ItemList {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Eq for ItemList {}

impl ItemList {
    /// Build a list, rejecting repeated item ids.
    pub fn from_items(items: Vec<Item>) -> Result<Self, TripValidationError> {
        let mut index = HashMap::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            if index.insert(item.id(), position).is_some() {
                return Err(TripValidationError::DuplicateItemId { id: item.id() });
            }
        }
        Ok(Self { items, index })
    }

    /// Validate every draft and build the list.
    pub fn from_drafts(drafts: Vec<ItemDraft>) -> Result<Self, TripValidationError> {
        let items = drafts
            .into_iter()
            .map(Item::new)
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_items(items)
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.index
            .get(&id)
            .and_then(|position| self.items.get(*position))
    }

    pub(crate) fn get_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        let position = *self.index.get(&id)?;
        self.items.get_mut(position)
    }

    /// Append an item. Fails if its id is already present.
    pub(crate) fn push(&mut self, item: Item) -> Result<&Item, TripValidationError> {
        let id = item.id();
        if self.index.contains_key(&id) {
            return Err(TripValidationError::DuplicateItemId { id });
        }
        let position = self.items.len();
        self.items.push(item);
        self.index.insert(id, position);
        self.items
            .get(position)
            .ok_or(TripValidationError::DuplicateItemId { id })
    }

    /// Remove by id. Returns `false` when no such item exists.
    pub(crate) fn remove(&mut self, id: ItemId) -> bool {
        let Some(position) = self.index.remove(&id) else {
            return false;
        };
        self.items.remove(position);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
