//! Collaborator interfaces the bootstrap depends on
//!
//! Both calls normally cross the network and may fail with a transport
//! error; the bootstrap treats such failures as data, never as a fault.

use async_trait::async_trait;
use parley_core::{ContactSessionId, OrganizationId, Result};
use serde::{Deserialize, Serialize};

/// Result of checking an organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationValidation {
    /// Whether the organization exists and has the widget enabled
    pub valid: bool,
    /// Human-readable explanation when invalid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl OrganizationValidation {
    /// A passing validation
    pub fn valid() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    /// A failing validation with an optional reason
    pub fn invalid(reason: Option<String>) -> Self {
        Self {
            valid: false,
            reason,
        }
    }
}

/// Result of checking a contact session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionValidation {
    /// Whether the session exists and has not expired
    pub valid: bool,
}

/// Confirms that an organization may serve the widget
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrganizationValidator: Send + Sync {
    /// Validate an organization id
    async fn validate_organization(
        &self,
        organization_id: &OrganizationId,
    ) -> Result<OrganizationValidation>;
}

/// Confirms that a cached contact session is still usable
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Validate a contact session id
    async fn validate_session(&self, session_id: &ContactSessionId) -> Result<SessionValidation>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_organization_validation_wire_format() {
        let parsed: OrganizationValidation =
            serde_json::from_str(r#"{"valid": false, "reason": "Organization not found"}"#)
                .unwrap();
        assert_eq!(
            parsed,
            OrganizationValidation::invalid(Some("Organization not found".to_string()))
        );

        let parsed: OrganizationValidation = serde_json::from_str(r#"{"valid": true}"#).unwrap();
        assert_eq!(parsed, OrganizationValidation::valid());
    }
}
