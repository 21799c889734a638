//! # Grocery Tracker
//!
//! A small shopping-list tracker with two front-ends:
//!
//! - an interactive console menu ([`console::ConsoleSession`]) that keeps its
//!   list in memory only, and
//! - a JSON-over-HTTP service ([`http::HttpServer`]) whose list is rewritten
//!   to a JSON file after every change.
//!
//! Items have no identifier; the HTTP routes address them by their position
//! in the list.
//!
//! ## Example
//!
//! ```rust,ignore
//! use grocery_tracker::services::GroceryService;
//! use grocery_tracker::storage::FileStore;
//!
//! let mut service = GroceryService::open(Box::new(FileStore::new("data.json")))?;
//! service.create(&serde_json::json!({"name": "Apples", "price": 1.99, "quantity": 5}))?;
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

pub mod config;
pub mod console;
pub mod http;
pub mod models;
pub mod observability;
pub mod services;
pub mod storage;

pub use config::TrackerConfig;
pub use models::{Item, ItemRecord};
pub use services::GroceryService;
pub use storage::{FileStore, ListStore, MemoryStore};

/// Error type for grocery tracker operations.
///
/// | Variant | Raised When | HTTP status |
/// |---------|-------------|-------------|
/// | `InvalidInput` | Create payload fails validation | 400 |
/// | `ItemNotFound` | Index is missing, negative or past the end of the list | 404 |
/// | `MalformedUpdate` | Update body is not valid JSON | 404 |
/// | `RouteNotFound` | No route matches the method and request target | 404 |
/// | `OperationFailed` | File I/O, JSON encoding, lock poisoning, socket errors | 500 |
#[derive(Debug, ThisError)]
pub enum Error {
    /// The request payload was rejected.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No item exists at the requested position.
    #[error("item not found: {0}")]
    ItemNotFound(String),

    /// An update body could not be parsed. Carries the parser message.
    #[error("malformed update body: {0}")]
    MalformedUpdate(String),

    /// No route matched the request.
    #[error("route not found: {method} {target}")]
    RouteNotFound {
        /// The HTTP method of the request.
        method: String,
        /// The raw request target (path and query).
        target: String,
    },

    /// An operation failed.
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

impl Error {
    /// Builds an [`Error::OperationFailed`] from an operation name and any displayable cause.
    pub fn operation(operation: &str, cause: impl std::fmt::Display) -> Self {
        Self::OperationFailed {
            operation: operation.to_string(),
            cause: cause.to_string(),
        }
    }
}

/// Result type alias for grocery tracker operations.
pub type Result<T> = std::result::Result<T, Error>;
