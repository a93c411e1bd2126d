//! Mock Convex deployment for integration tests

#![allow(dead_code)]

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

// ============================================================================
// Fixtures
// ============================================================================

/// Organization the mock accepts
pub const VALID_ORG: &str = "org_valid";

/// Organization the mock rejects with a reason
pub const DISABLED_ORG: &str = "org_disabled";

/// Organization whose validation hangs
pub const SLOW_ORG: &str = "org_slow";

/// Contact session the mock accepts
pub const VALID_SESSION: &str = "sess_valid";

/// Bearer token the mock treats as a signed-in dashboard user
pub const DASHBOARD_TOKEN: &str = "dashboard-token";

/// Bearer token for a user whose organization has no active subscription
pub const UNSUBSCRIBED_TOKEN: &str = "unsubscribed-token";

// ============================================================================
// Mock server
// ============================================================================

/// One recorded function call
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub kind: String,
    pub path: String,
    pub args: Value,
    pub authorization: Option<String>,
}

/// State for the mock deployment
#[derive(Default)]
pub struct MockConvexState {
    /// Every call received, in order
    pub calls: RwLock<Vec<RecordedCall>>,
    /// Saved widget settings by organization
    pub settings: RwLock<HashMap<String, Value>>,
}

impl MockConvexState {
    pub async fn calls_to(&self, path: &str) -> usize {
        self.calls
            .read()
            .await
            .iter()
            .filter(|c| c.path == path)
            .count()
    }
}

/// Start a mock deployment on an ephemeral port
pub async fn start_mock_convex() -> (String, Arc<MockConvexState>) {
    let state = Arc::new(MockConvexState::default());

    let app = Router::new()
        .route("/api/query", post(query))
        .route("/api/mutation", post(mutation))
        .route("/api/action", post(action))
        .with_state(state.clone());

    let addr = SocketAddr::from(([127, 0, 0, 1], 0));
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    let actual_addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", actual_addr), state)
}

fn success(value: Value) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "success", "value": value })),
    )
}

fn convex_error(code: &str, message: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "status": "error",
            "errorMessage": format!("Uncaught ConvexError: {}", message),
            "errorData": { "code": code, "message": message }
        })),
    )
}

async fn record(state: &MockConvexState, kind: &str, headers: &HeaderMap, body: &Value) -> (String, Value) {
    let path = body["path"].as_str().unwrap_or_default().to_string();
    let args = body["args"].clone();
    state.calls.write().await.push(RecordedCall {
        kind: kind.to_string(),
        path: path.clone(),
        args: args.clone(),
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });
    (path, args)
}

/// Organization of the signed-in caller, keyed off the bearer token
fn caller_org(headers: &HeaderMap) -> Option<&'static str> {
    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
        Some(h) if h == format!("Bearer {}", DASHBOARD_TOKEN) => Some(VALID_ORG),
        Some(h) if h == format!("Bearer {}", UNSUBSCRIBED_TOKEN) => Some(DISABLED_ORG),
        _ => None,
    }
}

async fn query(
    State(state): State<Arc<MockConvexState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let (path, args) = record(&state, "query", &headers, &body).await;
    match path.as_str() {
        "public/widgetSettings:getByOrganizationId" => {
            let org = args["organizationId"].as_str().unwrap_or_default();
            let settings = state.settings.read().await.get(org).cloned();
            success(settings.unwrap_or(Value::Null))
        }
        "private/widgetSettings:getOne" => match caller_org(&headers) {
            Some(org) => {
                let settings = state.settings.read().await.get(org).cloned();
                success(settings.unwrap_or(Value::Null))
            }
            None => convex_error("UNAUTHORIZED", "Identity not found"),
        },
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({ "status": "error", "errorMessage": format!("Could not find function {}", path) })),
        ),
    }
}

async fn mutation(
    State(state): State<Arc<MockConvexState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let (path, args) = record(&state, "mutation", &headers, &body).await;
    match path.as_str() {
        "public/contactSessions:validate" => {
            let valid = args["contactSessionId"].as_str() == Some(VALID_SESSION);
            success(json!({ "valid": valid }))
        }
        "private/widgetSettings:upsert" => match caller_org(&headers) {
            Some(VALID_ORG) => {
                let mut settings = args.clone();
                settings["organizationId"] = json!(VALID_ORG);
                settings["_id"] = json!("ws_1");
                state.settings.write().await.insert(VALID_ORG.to_string(), settings);
                success(Value::Null)
            }
            Some(_) => convex_error("BAD_REQUEST", "Subscription is not active"),
            None => convex_error("UNAUTHORIZED", "Identity not found"),
        },
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({ "status": "error", "errorMessage": format!("Could not find function {}", path) })),
        ),
    }
}

async fn action(
    State(state): State<Arc<MockConvexState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let (path, args) = record(&state, "action", &headers, &body).await;
    if path != "public/organizations:validate" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "status": "error", "errorMessage": format!("Could not find function {}", path) })),
        );
    }

    match args["organizationId"].as_str() {
        Some(VALID_ORG) => success(json!({ "valid": true })),
        Some(DISABLED_ORG) => success(json!({ "valid": false, "reason": "Widget is disabled" })),
        Some(SLOW_ORG) => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            success(json!({ "valid": true }))
        }
        _ => success(json!({ "valid": false, "reason": "Organization not found" })),
    }
}
