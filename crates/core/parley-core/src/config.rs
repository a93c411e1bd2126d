//! Configuration management and environment variable loading

use crate::{ParleyError, Result};
use std::env;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Backend deployment URL
pub const BACKEND_URL_VAR: &str = "PARLEY_BACKEND_URL";
/// Optional bearer token for dashboard (private) backend functions
pub const AUTH_TOKEN_VAR: &str = "PARLEY_AUTH_TOKEN";
/// Organization the widget is embedded for
pub const ORGANIZATION_ID_VAR: &str = "PARLEY_ORGANIZATION_ID";
/// Per-validator timeout in milliseconds
pub const VALIDATION_TIMEOUT_VAR: &str = "PARLEY_VALIDATION_TIMEOUT_MS";

/// Default bound on a single validator round trip
pub const DEFAULT_VALIDATION_TIMEOUT_MS: u64 = 10_000;

/// Load a `.env` file from the current directory or one of its parents
///
/// A missing file is fine; a malformed one is a configuration error.
///
/// ```no_run
/// parley_core::load_env().ok();
/// ```
pub fn load_env() -> Result<()> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!("Environment loaded from {}", path.display());
            Ok(())
        }
        Err(dotenvy::Error::Io(_)) => Ok(()),
        Err(e) => Err(env_file_error(".env", e)),
    }
}

/// Load an explicit environment file, which must exist
pub fn load_env_from_path<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    dotenvy::from_path(path).map_err(|e| env_file_error(&path.display().to_string(), e))?;
    tracing::debug!("Environment loaded from {}", path.display());
    Ok(())
}

fn env_file_error(name: &str, e: dotenvy::Error) -> ParleyError {
    match e {
        dotenvy::Error::LineParse(line, pos) => ParleyError::config(format!(
            "{}: cannot parse '{}' at position {}",
            name, line, pos
        )),
        other => ParleyError::config(format!("{}: {}", name, other)),
    }
}

/// Read a variable that must be set
pub fn get_required_env(key: &str) -> Result<String> {
    get_env_opt(key).ok_or_else(|| ParleyError::config(format!("{} is not set", key)))
}

/// Read a variable, treating empty values as unset
pub fn get_env_opt(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read and parse a variable; a value that does not parse is an error
pub fn get_env_parsed<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    get_env_opt(key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| ParleyError::config(format!("{}='{}': {}", key, raw, e)))
        })
        .transpose()
}

/// Widget runtime configuration
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetConfig {
    /// Backend deployment URL (e.g. https://happy-otter-123.convex.cloud)
    pub backend_url: String,
    /// Bearer token for private backend functions
    pub auth_token: Option<String>,
    /// Organization the widget is embedded for
    pub organization_id: Option<String>,
    /// Bound on each validator call
    pub validation_timeout: Duration,
}

impl WidgetConfig {
    /// Create a configuration for a backend URL with defaults for everything else
    pub fn new(backend_url: impl Into<String>) -> Self {
        Self {
            backend_url: backend_url.into(),
            auth_token: None,
            organization_id: None,
            validation_timeout: Duration::from_millis(DEFAULT_VALIDATION_TIMEOUT_MS),
        }
    }

    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_env_with_backend(None)
    }

    /// Read the configuration from the environment, preferring an explicit backend URL
    pub fn from_env_with_backend(backend_url: Option<String>) -> Result<Self> {
        let backend_url = match backend_url {
            Some(url) => url.trim().to_string(),
            None => get_required_env(BACKEND_URL_VAR)?,
        };
        let timeout_ms = get_env_parsed::<u64>(VALIDATION_TIMEOUT_VAR)?
            .unwrap_or(DEFAULT_VALIDATION_TIMEOUT_MS);

        let config = Self {
            backend_url,
            auth_token: get_env_opt(AUTH_TOKEN_VAR),
            organization_id: get_env_opt(ORGANIZATION_ID_VAR),
            validation_timeout: Duration::from_millis(timeout_ms),
        };
        config.validate()?;
        Ok(config)
    }

    /// Set the organization id
    pub fn with_organization_id(mut self, organization_id: impl Into<String>) -> Self {
        self.organization_id = Some(organization_id.into());
        self
    }

    /// Set the bearer token used for private functions
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Set the validator timeout
    pub fn with_validation_timeout(mut self, timeout: Duration) -> Self {
        self.validation_timeout = timeout;
        self
    }

    /// Check that the configuration is usable
    pub fn validate(&self) -> Result<()> {
        let url = self.backend_url.trim();
        if url.is_empty() {
            return Err(ParleyError::config("Backend URL must not be empty"));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ParleyError::config(format!(
                "Backend URL '{}' must start with http:// or https://",
                url
            )));
        }
        if self.validation_timeout.is_zero() {
            return Err(ParleyError::config(
                "Validation timeout must be greater than zero",
            ));
        }
        Ok(())
    }
}
