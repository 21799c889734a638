//! Grocery list service.
//!
//! Owns the in-memory list and its [`ListStore`]. Every successful mutation
//! is followed by a full save; reads never touch storage.

use crate::models::ItemRecord;
use crate::storage::ListStore;
use crate::{Error, Result};
use serde_json::Value;
use tracing::instrument;

/// Service for listing, creating, updating and removing grocery items.
pub struct GroceryService {
    items: Vec<ItemRecord>,
    store: Box<dyn ListStore>,
}

impl GroceryService {
    /// Opens the service, loading the current list from `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored list cannot be read or parsed.
    pub fn open(store: Box<dyn ListStore>) -> Result<Self> {
        let items = store.load()?;
        tracing::info!(
            items = items.len(),
            store = %store.describe(),
            "Grocery list loaded"
        );
        Ok(Self { items, store })
    }

    /// Returns the current list.
    #[must_use]
    pub fn items(&self) -> &[ItemRecord] {
        &self.items
    }

    /// Returns the current list and records the view.
    pub fn list(&self) -> &[ItemRecord] {
        tracing::info!(items = self.items.len(), "Grocery list viewed");
        &self.items
    }

    /// Validates a create payload, appends the item and persists the list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the payload fails validation (the
    /// list is left untouched), or [`Error::OperationFailed`] if the save fails.
    #[instrument(skip_all)]
    pub fn create(&mut self, payload: &Value) -> Result<ItemRecord> {
        let record = ItemRecord::from_payload(payload)?;

        self.items.push(record.clone());
        self.persist()?;

        tracing::info!(name = %record.display_name(), index = self.items.len() - 1, "Item added");
        metrics::counter!("grocery_items_mutated_total", "op" => "create").increment(1);
        Ok(record)
    }

    /// Resolves a requested index to a position in the list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ItemNotFound`] if `index` is absent, negative or not
    /// smaller than the list length.
    pub fn locate(&self, index: Option<i64>) -> Result<usize> {
        index
            .and_then(|i| usize::try_from(i).ok())
            .filter(|&position| position < self.items.len())
            .ok_or_else(|| {
                Error::ItemNotFound(index.map_or_else(
                    || "no index given".to_string(),
                    |i| format!("index {i} (list has {} items)", self.items.len()),
                ))
            })
    }

    /// Shallow-merges `patch` onto the item at `index` and persists the list.
    ///
    /// Fields are copied verbatim; no coercion is applied. See
    /// [`ItemRecord::merge`] for how non-object patches spread.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ItemNotFound`] for an out-of-range index, or
    /// [`Error::OperationFailed`] if the save fails.
    #[instrument(skip(self, patch))]
    pub fn update(&mut self, index: Option<i64>, patch: &Value) -> Result<ItemRecord> {
        let position = self.locate(index)?;

        self.items[position].merge(patch);
        self.persist()?;

        let record = self.items[position].clone();
        tracing::info!(name = %record.display_name(), index = position, "Item updated");
        metrics::counter!("grocery_items_mutated_total", "op" => "update").increment(1);
        Ok(record)
    }

    /// Removes the item at `index` and persists the list.
    ///
    /// Later items shift down by one position.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ItemNotFound`] for an out-of-range index, or
    /// [`Error::OperationFailed`] if the save fails.
    #[instrument(skip(self))]
    pub fn remove(&mut self, index: Option<i64>) -> Result<ItemRecord> {
        let position = self.locate(index)?;

        let removed = self.items.remove(position);
        self.persist()?;

        tracing::info!(name = %removed.display_name(), index = position, "Item removed");
        metrics::counter!("grocery_items_mutated_total", "op" => "delete").increment(1);
        Ok(removed)
    }

    fn persist(&self) -> Result<()> {
        self.store.save(&self.items).inspect_err(|e| {
            tracing::error!(error = %e, store = %self.store.describe(), "Failed to persist grocery list");
        })
    }
}
