//! Convex HTTP function client
//!
//! Every backend function is called with
//! `POST {url}/api/{query|mutation|action}` and a body of
//! `{"path": ..., "args": ..., "format": "json"}`. The response is an
//! envelope tagged by `status`:
//!
//! ```json
//! {"status": "success", "value": ...}
//! {"status": "error", "errorMessage": "...", "errorData": {"code": "...", "message": "..."}}
//! ```

use parley_core::{ParleyError, Result, WidgetConfig};
use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default HTTP timeout when none is configured
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Convex configuration
#[derive(Debug, Clone)]
pub struct ConvexConfig {
    /// Deployment URL (e.g. https://happy-otter-123.convex.cloud)
    pub url: String,
    /// Bearer token for private (dashboard) functions
    pub auth_token: Option<String>,
    /// Timeout for a single HTTP round trip
    pub request_timeout: Duration,
}

impl ConvexConfig {
    /// Create a configuration for a deployment URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            auth_token: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Authenticate private function calls with a bearer token
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Set the HTTP timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl From<&WidgetConfig> for ConvexConfig {
    fn from(config: &WidgetConfig) -> Self {
        let mut convex = ConvexConfig::new(config.backend_url.trim())
            .with_request_timeout(config.validation_timeout);
        if let Some(token) = &config.auth_token {
            convex = convex.with_auth_token(token.clone());
        }
        convex
    }
}

/// Kind of Convex function, which selects the endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    /// Read-only, cached
    Query,
    /// Transactional write
    Mutation,
    /// May call third-party services
    Action,
}

impl FunctionKind {
    fn endpoint(&self) -> &'static str {
        match self {
            FunctionKind::Query => "query",
            FunctionKind::Mutation => "mutation",
            FunctionKind::Action => "action",
        }
    }
}

impl fmt::Display for FunctionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint())
    }
}

#[derive(Serialize)]
struct FunctionRequest<'a> {
    path: &'a str,
    args: Value,
    format: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum Envelope {
    Success {
        #[serde(default)]
        value: Value,
    },
    Error {
        #[serde(rename = "errorMessage", default)]
        error_message: String,
        #[serde(rename = "errorData", default)]
        error_data: Option<Value>,
    },
}

/// Map an error envelope onto the workspace error type
fn function_error(path: &str, error_message: String, error_data: Option<Value>) -> ParleyError {
    let code = error_data
        .as_ref()
        .and_then(|data| data.get("code"))
        .and_then(Value::as_str)
        .map(str::to_string);
    let message = error_data
        .as_ref()
        .and_then(|data| data.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or(error_message);

    match code.as_deref() {
        Some("UNAUTHORIZED") => ParleyError::auth(message),
        Some("BAD_REQUEST") => ParleyError::validation(message),
        _ => ParleyError::backend(path, code, message),
    }
}

/// Client for one Convex deployment
#[derive(Clone)]
pub struct ConvexClient {
    config: ConvexConfig,
    client: Client,
}

impl ConvexClient {
    /// Create a new client
    pub fn new(config: ConvexConfig) -> Result<Self> {
        if !(config.url.starts_with("http://") || config.url.starts_with("https://")) {
            return Err(ParleyError::config(format!(
                "Convex URL '{}' must start with http:// or https://",
                config.url
            )));
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        if let Some(token) = &config.auth_token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|e| ParleyError::config(format!("Invalid auth token: {}", e)))?,
            );
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ParleyError::config(format!("Failed to create HTTP client: {}", e)))?;

        info!("Using Convex deployment: {}", config.url);

        Ok(Self { config, client })
    }

    /// Create a client from the widget configuration
    pub fn from_widget_config(config: &WidgetConfig) -> Result<Self> {
        Self::new(ConvexConfig::from(config))
    }

    /// Active configuration
    pub fn config(&self) -> &ConvexConfig {
        &self.config
    }

    /// Whether private functions can be called
    pub fn is_authenticated(&self) -> bool {
        self.config.auth_token.is_some()
    }

    pub(crate) fn require_auth(&self, path: &str) -> Result<()> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(ParleyError::auth(format!(
                "'{}' requires an authenticated client",
                path
            )))
        }
    }

    fn function_url(&self, kind: FunctionKind) -> String {
        format!("{}/api/{}", self.config.url, kind.endpoint())
    }

    /// Call a function and decode its value
    pub async fn call<T: DeserializeOwned>(
        &self,
        kind: FunctionKind,
        path: &str,
        args: Value,
    ) -> Result<T> {
        debug!("Calling Convex {} {}", kind, path);

        let response = self
            .client
            .post(self.function_url(kind))
            .json(&FunctionRequest {
                path,
                args,
                format: "json",
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        match (status.is_success(), serde_json::from_str::<Envelope>(&body)) {
            (
                _,
                Ok(Envelope::Error {
                    error_message,
                    error_data,
                }),
            ) => {
                let err = function_error(path, error_message, error_data);
                warn!("Convex {} {} failed: {}", kind, path, err);
                Err(err)
            }
            (true, Ok(Envelope::Success { value })) => Ok(serde_json::from_value(value)?),
            (false, _) => Err(ParleyError::backend(
                path,
                None,
                format!("HTTP {}: {}", status, body),
            )),
            (true, Err(e)) => Err(ParleyError::backend(
                path,
                None,
                format!("Malformed response envelope: {}", e),
            )),
        }
    }

    /// Call a query function
    pub async fn query<T: DeserializeOwned>(&self, path: &str, args: Value) -> Result<T> {
        self.call(FunctionKind::Query, path, args).await
    }

    /// Call a mutation function
    pub async fn mutation<T: DeserializeOwned>(&self, path: &str, args: Value) -> Result<T> {
        self.call(FunctionKind::Mutation, path, args).await
    }

    /// Call an action function
    pub async fn action<T: DeserializeOwned>(&self, path: &str, args: Value) -> Result<T> {
        self.call(FunctionKind::Action, path, args).await
    }
}

impl fmt::Debug for ConvexClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConvexClient")
            .field("url", &self.config.url)
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
