//! Data models for the grocery tracker.
//!
//! [`Item`] is the typed record; [`ItemRecord`] is the JSON object form kept
//! in the persisted list. The [`coerce`] helpers turn loosely typed input
//! into item fields.

pub mod coerce;
mod item;

pub use item::{Item, ItemRecord};
