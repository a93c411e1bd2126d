//! Bootstrap validators backed by public Convex functions

use crate::convex::ConvexClient;
use async_trait::async_trait;
use parley_core::{ContactSessionId, OrganizationId, Result};
use parley_widget::{
    OrganizationValidation, OrganizationValidator, SessionValidation, SessionValidator,
};
use serde_json::json;

/// Action confirming an organization may serve the widget
pub const VALIDATE_ORGANIZATION: &str = "public/organizations:validate";
/// Mutation checking a contact session has not expired
pub const VALIDATE_CONTACT_SESSION: &str = "public/contactSessions:validate";

impl ConvexClient {
    /// Validate an organization id
    pub async fn validate_organization(
        &self,
        organization_id: &OrganizationId,
    ) -> Result<OrganizationValidation> {
        self.action(
            VALIDATE_ORGANIZATION,
            json!({ "organizationId": organization_id }),
        )
        .await
    }

    /// Validate a contact session id
    pub async fn validate_contact_session(
        &self,
        session_id: &ContactSessionId,
    ) -> Result<SessionValidation> {
        self.mutation(
            VALIDATE_CONTACT_SESSION,
            json!({ "contactSessionId": session_id }),
        )
        .await
    }
}

#[async_trait]
impl OrganizationValidator for ConvexClient {
    async fn validate_organization(
        &self,
        organization_id: &OrganizationId,
    ) -> Result<OrganizationValidation> {
        ConvexClient::validate_organization(self, organization_id).await
    }
}

#[async_trait]
impl SessionValidator for ConvexClient {
    async fn validate_session(&self, session_id: &ContactSessionId) -> Result<SessionValidation> {
        self.validate_contact_session(session_id).await
    }
}
