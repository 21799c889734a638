//! Storage layer abstraction.
//!
//! A [`ListStore`] maps the in-memory item list to durable (or not) storage:
//! - [`FileStore`]: one pretty-printed JSON file, rewritten on every save
//! - [`MemoryStore`]: an in-process snapshot for tests and ephemeral runs

mod filesystem;
mod memory;
mod traits;

pub use filesystem::FileStore;
pub use memory::MemoryStore;
pub use traits::ListStore;
