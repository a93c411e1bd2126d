//! Widget customization settings

use crate::convex::ConvexClient;
use parley_core::{OrganizationId, Result, WidgetSettings, WidgetSettingsInput};
use serde_json::json;
use tracing::info;

/// Public query used by the widget itself
pub const GET_BY_ORGANIZATION: &str = "public/widgetSettings:getByOrganizationId";
/// Private query for the signed-in dashboard organization
pub const GET_ONE: &str = "private/widgetSettings:getOne";
/// Private mutation creating or updating the dashboard organization's settings
pub const UPSERT: &str = "private/widgetSettings:upsert";

impl ConvexClient {
    /// Settings for an organization, if it has saved any
    pub async fn widget_settings_by_organization(
        &self,
        organization_id: &OrganizationId,
    ) -> Result<Option<WidgetSettings>> {
        self.query(GET_BY_ORGANIZATION, json!({ "organizationId": organization_id }))
            .await
    }

    /// Settings of the signed-in organization
    pub async fn widget_settings(&self) -> Result<Option<WidgetSettings>> {
        self.require_auth(GET_ONE)?;
        self.query(GET_ONE, json!({})).await
    }

    /// Create or update the signed-in organization's settings
    ///
    /// Input is checked locally first. The backend rejects callers without an
    /// identity or organization (auth error) and organizations without an
    /// active subscription (validation error).
    pub async fn upsert_widget_settings(&self, input: &WidgetSettingsInput) -> Result<()> {
        input.validate()?;
        self.require_auth(UPSERT)?;

        let args = serde_json::to_value(input)?;
        let _: serde_json::Value = self.mutation(UPSERT, args).await?;
        info!("Widget settings saved");
        Ok(())
    }
}
