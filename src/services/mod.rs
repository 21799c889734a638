//! Business logic services.
//!
//! [`GroceryService`] is the process-scoped owner of the HTTP front-end's
//! list. Handlers receive it explicitly instead of reaching for a global.

mod grocery;

pub use grocery::GroceryService;
