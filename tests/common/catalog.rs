//! Scripted catalog API served over HTTP.

use super::constants::TEST_TOKEN;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

#[derive(Clone)]
enum Route {
    Page(Value),
    Failure {
        status: StatusCode,
        retry_after: Option<u64>,
    },
}

#[derive(Default)]
struct CatalogState {
    routes: Mutex<HashMap<String, Route>>,
    requests: Mutex<Vec<String>>,
}

/// Test catalog instance bound to a random local port.
///
/// When dropped, the server shuts down.
pub struct TestCatalog {
    /// Base URL of the API (e.g., "http://127.0.0.1:12345/v1")
    pub api_base_url: String,

    state: Arc<CatalogState>,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

async fn serve(State(state): State<Arc<CatalogState>>, headers: HeaderMap, uri: Uri) -> Response {
    let key = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_default();
    state.requests.lock().unwrap().push(key.clone());

    let expected = format!("Bearer {}", TEST_TOKEN);
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(expected.as_str());
    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": {"status": 401, "message": "Invalid access token"}})),
        )
            .into_response();
    }

    let route = state.routes.lock().unwrap().get(&key).cloned();
    match route {
        Some(Route::Page(body)) => Json(body).into_response(),
        Some(Route::Failure {
            status,
            retry_after: Some(secs),
        }) => (status, [(header::RETRY_AFTER, secs.to_string())], "try later").into_response(),
        Some(Route::Failure { status, .. }) => (status, "scripted failure").into_response(),
        None => (StatusCode::NOT_FOUND, format!("nothing at {}", key)).into_response(),
    }
}

impl TestCatalog {
    /// Spawns a catalog with no routes on a random port.
    pub async fn spawn() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let state = Arc::new(CatalogState::default());
        let app = Router::new().fallback(serve).with_state(state.clone());

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Catalog server failed");
        });

        Self {
            api_base_url: format!("http://127.0.0.1:{}/v1", port),
            state,
            _shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Absolute URL of a path (and query) on this catalog.
    pub fn url(&self, path_and_query: &str) -> String {
        format!(
            "{}{}",
            self.api_base_url.trim_end_matches("/v1"),
            path_and_query
        )
    }

    /// Serves `body` at `path_and_query`, replacing whatever was there.
    pub fn set_page(&self, path_and_query: &str, body: Value) {
        self.state
            .routes
            .lock()
            .unwrap()
            .insert(path_and_query.to_string(), Route::Page(body));
    }

    pub fn set_failure(&self, path_and_query: &str, status: StatusCode) {
        self.state.routes.lock().unwrap().insert(
            path_and_query.to_string(),
            Route::Failure {
                status,
                retry_after: None,
            },
        );
    }

    pub fn set_rate_limited(&self, path_and_query: &str, retry_after: u64) {
        self.state.routes.lock().unwrap().insert(
            path_and_query.to_string(),
            Route::Failure {
                status: StatusCode::TOO_MANY_REQUESTS,
                retry_after: Some(retry_after),
            },
        );
    }

    /// Path-and-query of every request received, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.state.requests.lock().unwrap().clone()
    }
}
