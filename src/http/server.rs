//! HTTP server setup and lifecycle.
//!
//! Every request goes through a single fallback handler that resolves the
//! [`Route`] itself, so unmatched methods and paths share one JSON 404.
//! List mutation and the follow-up file write happen under one lock with no
//! `.await` in between, so requests never interleave their changes.

use super::error::ApiError;
use super::routes::Route;
use crate::services::GroceryService;
use crate::{Error, Result};
use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderValue, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 3000;

/// Shared handler state.
pub type SharedService = Arc<Mutex<GroceryService>>;

/// HTTP front-end for a [`GroceryService`].
pub struct HttpServer {
    service: GroceryService,
    addr: SocketAddr,
}

impl HttpServer {
    /// Creates a server bound to `0.0.0.0:3000`.
    #[must_use]
    pub fn new(service: GroceryService) -> Self {
        Self {
            service,
            addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT),
        }
    }

    /// Sets the listening port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.addr.set_port(port);
        self
    }

    /// Sets the listening address.
    #[must_use]
    pub fn with_host(mut self, host: IpAddr) -> Self {
        self.addr.set_ip(host);
        self
    }

    /// Returns the address the server will bind.
    #[must_use]
    pub const fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Runs the server on a fresh tokio runtime until Ctrl-C.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime cannot be created, the address cannot
    /// be bound, or the server fails while running.
    pub fn run(self) -> Result<()> {
        let rt = tokio::runtime::Runtime::new().map_err(|e| Error::OperationFailed {
            operation: "create_runtime".to_string(),
            cause: e.to_string(),
        })?;

        rt.block_on(self.serve())
    }

    /// Binds the listener and serves requests until Ctrl-C.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound or the server fails.
    pub async fn serve(self) -> Result<()> {
        let listener =
            tokio::net::TcpListener::bind(self.addr)
                .await
                .map_err(|e| Error::OperationFailed {
                    operation: "bind".to_string(),
                    cause: format!("{}: {e}", self.addr),
                })?;

        tracing::info!(addr = %self.addr, "Server started");

        let app = router(Arc::new(Mutex::new(self.service)));
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| Error::OperationFailed {
                operation: "serve".to_string(),
                cause: e.to_string(),
            })?;

        tracing::info!("Server stopped");
        Ok(())
    }
}

/// Builds the application router around shared service state.
pub fn router(state: SharedService) -> Router {
    Router::new()
        .fallback(dispatch)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Resolves the route and runs the matching handler.
async fn dispatch(
    State(state): State<SharedService>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    let target = uri
        .path_and_query()
        .map_or_else(|| uri.path(), axum::http::uri::PathAndQuery::as_str);
    let route = Route::resolve(&method, target);
    metrics::counter!("grocery_requests_total", "route" => route.label()).increment(1);
    tracing::debug!(%method, %target, route = route.label(), "Dispatching request");

    let result = match route {
        Route::List => handle_list(&state),
        Route::Create => handle_create(&state, &body),
        Route::Update(index) => handle_update(&state, index, &body),
        Route::Delete(index) => handle_delete(&state, index),
        Route::NotFound => Err(Error::RouteNotFound {
            method: method.to_string(),
            target: target.to_string(),
        }),
    };

    result.unwrap_or_else(|e| ApiError(e).into_response())
}

fn handle_list(state: &SharedService) -> Result<Response> {
    with_service(state, |service| {
        Ok((StatusCode::OK, Json(service.list())).into_response())
    })
}

fn handle_create(state: &SharedService, body: &[u8]) -> Result<Response> {
    let payload = parse_body(body)?;
    with_service(state, |service| {
        let created = service.create(&payload)?;
        Ok((StatusCode::CREATED, Json(created)).into_response())
    })
}

fn handle_update(state: &SharedService, index: Option<i64>, body: &[u8]) -> Result<Response> {
    with_service(state, |service| {
        service.locate(index)?;
        let patch = serde_json::from_slice(body).map_err(|e| Error::MalformedUpdate(e.to_string()))?;
        let updated = service.update(index, &patch)?;
        Ok((StatusCode::OK, Json(updated)).into_response())
    })
}

fn handle_delete(state: &SharedService, index: Option<i64>) -> Result<Response> {
    with_service(state, |service| {
        let removed = service.remove(index)?;
        let message = format!("Item removed: {}", removed.display_name());
        Ok((StatusCode::OK, Json(json!({ "message": message }))).into_response())
    })
}

/// Runs `f` with the service locked for its whole duration.
fn with_service<T>(
    state: &SharedService,
    f: impl FnOnce(&mut GroceryService) -> Result<T>,
) -> Result<T> {
    let mut service = state
        .lock()
        .map_err(|e| Error::operation("lock_service", e))?;
    f(&mut service)
}

fn parse_body(body: &[u8]) -> Result<Value> {
    serde_json::from_slice(body).map_err(|e| Error::InvalidInput(format!("malformed JSON body: {e}")))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Item, ItemRecord};
    use crate::storage::MemoryStore;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    fn app_with(items: Vec<ItemRecord>) -> Router {
        let service = GroceryService::open(Box::new(MemoryStore::with_items(items))).unwrap();
        router(Arc::new(Mutex::new(service)))
    }

    async fn send(app: Router, method: &str, uri: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_list_empty() {
        let (status, body) = send(app_with(Vec::new()), "GET", "/groceries", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_create_returns_created_item() {
        let (status, body) = send(
            app_with(Vec::new()),
            "POST",
            "/groceries",
            r#"{"name":"Apples","price":1.99,"quantity":5,"bought":false}"#,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            body,
            json!({"name": "Apples", "price": 1.99, "quantity": 5, "bought": false})
        );
    }

    #[tokio::test]
    async fn test_create_malformed_json() {
        let (status, body) = send(app_with(Vec::new()), "POST", "/groceries", "{name:").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"message": "Invalid input data"}));
    }

    #[tokio::test]
    async fn test_update_out_of_range_wins_over_bad_body() {
        let app = app_with(vec![ItemRecord::from(Item::new("Apples", 1.99, 5))]);
        let (status, body) = send(app, "PUT", "/groceries/4", "not json").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"message": "Item not found"}));
    }

    #[tokio::test]
    async fn test_update_in_range_malformed_body() {
        let app = app_with(vec![ItemRecord::from(Item::new("Apples", 1.99, 5))]);

        for body in ["not json", ""] {
            let (status, reply) = send(app.clone(), "PUT", "/groceries/0", body).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{body:?}");
            let message = reply["message"].as_str().unwrap();
            assert!(!message.is_empty());
            assert_ne!(message, "Item not found");
        }

        let (_, items) = send(app, "GET", "/groceries", "").await;
        assert_eq!(items[0]["name"], json!("Apples"));
    }

    #[tokio::test]
    async fn test_update_null_body_keeps_item() {
        let app = app_with(vec![ItemRecord::from(Item::new("Apples", 1.99, 5))]);
        let (status, body) = send(app, "PUT", "/groceries/0", "null").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"name": "Apples", "price": 1.99, "quantity": 5, "bought": false})
        );
    }

    #[tokio::test]
    async fn test_delete_message() {
        let app = app_with(vec![ItemRecord::from(Item::new("Apples", 1.99, 5))]);
        let (status, body) = send(app, "DELETE", "/groceries/0", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Item removed: Apples"}));
    }

    #[tokio::test]
    async fn test_unmatched_route() {
        let (status, body) = send(app_with(Vec::new()), "PATCH", "/groceries/0", "{}").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"message": "Route not found"}));

        let (status, _) = send(app_with(Vec::new()), "GET", "/groceries?page=2", "").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_nosniff_header() {
        let request = Request::builder()
            .uri("/groceries")
            .body(Body::empty())
            .unwrap();
        let response = app_with(Vec::new()).oneshot(request).await.unwrap();
        assert_eq!(
            response.headers().get(header::X_CONTENT_TYPE_OPTIONS).unwrap(),
            "nosniff"
        );
    }

    #[test]
    fn test_server_address_builder() {
        let service = GroceryService::open(Box::new(MemoryStore::new())).unwrap();
        let server = HttpServer::new(service)
            .with_port(8080)
            .with_host(IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(server.addr(), SocketAddr::from(([127, 0, 0, 1], 8080)));
    }
}
