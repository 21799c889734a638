//! Persistence backend trait.

use crate::Result;
use crate::models::ItemRecord;

/// Trait for list persistence backends.
///
/// The whole list is the unit of persistence: `load` returns every record
/// and `save` replaces everything previously stored.
pub trait ListStore: Send + Sync {
    /// Loads the stored list, or an empty list if nothing was saved yet.
    fn load(&self) -> Result<Vec<ItemRecord>>;

    /// Replaces the stored list with `items`.
    fn save(&self, items: &[ItemRecord]) -> Result<()>;

    /// Returns a short human-readable description of where the list lives.
    fn describe(&self) -> String;
}
