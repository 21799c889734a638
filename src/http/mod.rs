//! JSON-over-HTTP front-end.
//!
//! | Method | Path | Success | Failure |
//! |--------|------|---------|---------|
//! | `GET` | `/groceries` | 200, item array | |
//! | `POST` | `/groceries` | 201, created item | 400 invalid input |
//! | `PUT` | `/groceries/{i}` | 200, updated item | 404 not found or malformed body |
//! | `DELETE` | `/groceries/{i}` | 200, `{message}` | 404 not found |
//! | any | other | | 404 `{"message":"Route not found"}` |

mod error;
mod routes;
mod server;

pub use error::ApiError;
pub use routes::{COLLECTION_PATH, Route};
pub use server::{DEFAULT_PORT, HttpServer, SharedService, router};
