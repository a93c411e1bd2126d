//! Contact sessions: short-lived identities for anonymous widget visitors

use super::primitives::{ContactSessionId, OrganizationId};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Browser details captured when a visitor starts a contact session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSessionMetadata {
    /// Browser user agent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Preferred language
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// All accepted languages, comma separated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub languages: Option<String>,
    /// Operating system platform
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    /// Browser vendor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    /// Screen resolution, e.g. `1920x1080`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screen_resolution: Option<String>,
    /// Viewport size, e.g. `1280x720`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewport_size: Option<String>,
    /// IANA timezone name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    /// Offset from UTC in minutes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone_offset: Option<i32>,
    /// Whether cookies are enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookie_enabled: Option<bool>,
    /// Referring page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
    /// Page the widget is embedded in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_url: Option<String>,
}

/// A visitor's contact session as stored by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSession {
    /// Session id
    #[serde(rename = "_id")]
    pub id: ContactSessionId,
    /// Visitor name
    pub name: String,
    /// Visitor email
    pub email: String,
    /// Owning organization
    pub organization_id: OrganizationId,
    /// Expiry, milliseconds since the Unix epoch
    pub expires_at: i64,
    /// Optional browser details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ContactSessionMetadata>,
}

impl ContactSession {
    /// Expiry as a timestamp; `None` if the stored value is out of range
    pub fn expires_at_utc(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.expires_at).single()
    }

    /// Whether the session has expired at `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at_utc() {
            Some(expires_at) => expires_at <= now,
            None => true,
        }
    }
}
