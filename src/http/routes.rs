//! Request dispatch.
//!
//! Collection routes match the request target exactly; item routes match the
//! `/groceries/` prefix and read the index from the third path segment.

use crate::models::coerce::parse_leading_int;
use axum::http::Method;

/// Collection path.
pub const COLLECTION_PATH: &str = "/groceries";

/// Prefix shared by item routes.
const ITEM_PREFIX: &str = "/groceries/";

/// A resolved route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `GET /groceries`
    List,
    /// `POST /groceries`
    Create,
    /// `PUT /groceries/{index}`; `None` when the segment has no leading integer.
    Update(Option<i64>),
    /// `DELETE /groceries/{index}`; `None` when the segment has no leading integer.
    Delete(Option<i64>),
    /// Anything else.
    NotFound,
}

impl Route {
    /// Resolves a method and raw request target (path plus query) to a route.
    ///
    /// The target is not normalised or percent-decoded, so
    /// `GET /groceries?all=1` and `GET /groceries/` do not match the list route.
    #[must_use]
    pub fn resolve(method: &Method, target: &str) -> Self {
        if target == COLLECTION_PATH {
            if method == Method::GET {
                return Self::List;
            }
            if method == Method::POST {
                return Self::Create;
            }
        } else if target.starts_with(ITEM_PREFIX) {
            if method == Method::PUT {
                return Self::Update(item_index(target));
            }
            if method == Method::DELETE {
                return Self::Delete(item_index(target));
            }
        }
        Self::NotFound
    }

    /// Returns a stable label for logs and metrics.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Create => "create",
            Self::Update(_) => "update",
            Self::Delete(_) => "delete",
            Self::NotFound => "not_found",
        }
    }
}

/// Parses the index from the third `/`-separated segment of an item target.
fn item_index(target: &str) -> Option<i64> {
    target.split('/').nth(2).and_then(parse_leading_int)
}
