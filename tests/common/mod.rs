#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::get,
    Router,
};
use tokio::net::TcpListener;

pub const API_CREDS: &str = "alice:s3cret";
// base64("alice:s3cret")
const EXPECTED_AUTH: &str = "Basic YWxpY2U6czNjcmV0";

/// In-process stand-in for the structured scopes endpoint.
#[derive(Clone)]
pub struct MockApi {
    bodies: Arc<HashMap<String, String>>,
    hits: Arc<Mutex<Vec<String>>>,
}

impl MockApi {
    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }
}

async fn structured_scopes(
    State(api): State<MockApi>,
    Path(handle): Path<String>,
    headers: HeaderMap,
) -> (StatusCode, String) {
    api.hits.lock().unwrap().push(handle.clone());

    let auth = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    if auth != Some(EXPECTED_AUTH) {
        return (
            StatusCode::UNAUTHORIZED,
            r#"{"errors":["unauthorized"]}"#.to_string(),
        );
    }

    match api.bodies.get(&handle) {
        Some(body) => (StatusCode::OK, body.clone()),
        None => (StatusCode::NOT_FOUND, r#"{"errors":["not found"]}"#.to_string()),
    }
}

/// Serves `bodies` (handle -> response body) on a random local port.
/// Returns the base URL and a handle to inspect requests.
pub async fn spawn_mock_api(bodies: &[(&str, &str)]) -> (String, MockApi) {
    let api = MockApi {
        bodies: Arc::new(
            bodies
                .iter()
                .map(|(h, b)| (h.to_string(), b.to_string()))
                .collect(),
        ),
        hits: Arc::default(),
    };
    let app = Router::new()
        .route(
            "/v1/hackers/programs/{handle}/structured_scopes",
            get(structured_scopes),
        )
        .with_state(api.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), api)
}

/// A base URL nothing listens on.
pub fn dead_api_base() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    format!("http://127.0.0.1:{port}")
}
