//! Widget customization settings

use super::primitives::OrganizationId;
use crate::{ParleyError, Result};
use serde::{Deserialize, Serialize};

/// Three suggested opening messages shown in the chat screen
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultSuggestions {
    /// First suggestion
    pub suggestion1: String,
    /// Second suggestion
    pub suggestion2: String,
    /// Third suggestion
    pub suggestion3: String,
}

impl DefaultSuggestions {
    /// Non-empty suggestions, in order
    pub fn non_empty(&self) -> Vec<&str> {
        [&self.suggestion1, &self.suggestion2, &self.suggestion3]
            .into_iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Stored settings for one organization's widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetSettings {
    /// Owning organization
    pub organization_id: OrganizationId,
    /// Greeting shown when a chat opens
    pub greet_message: String,
    /// Suggested opening messages
    pub default_suggestions: DefaultSuggestions,
}

/// Dashboard-submitted settings, before the backend attaches the organization
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetSettingsInput {
    /// Greeting shown when a chat opens
    pub greet_message: String,
    /// Suggested opening messages
    pub default_suggestions: DefaultSuggestions,
}

impl WidgetSettingsInput {
    /// Reject input the backend would refuse
    pub fn validate(&self) -> Result<()> {
        if self.greet_message.trim().is_empty() {
            return Err(ParleyError::validation("Greet message is required"));
        }
        Ok(())
    }
}

impl From<&WidgetSettings> for WidgetSettingsInput {
    fn from(settings: &WidgetSettings) -> Self {
        Self {
            greet_message: settings.greet_message.clone(),
            default_suggestions: settings.default_suggestions.clone(),
        }
    }
}
