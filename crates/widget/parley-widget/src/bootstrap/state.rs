//! Bootstrap state, progress updates and the final outcome

use parley_core::OrganizationId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Step the bootstrap is in; steps are only ever visited in this order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BootstrapState {
    /// Checking the organization the widget was embedded for
    #[default]
    ResolvingOrganization,
    /// Checking the cached contact session
    ResolvingSession,
    /// Computing the screen to route to
    Finalizing,
    /// Finished; the screen selection is available
    Done,
}

impl fmt::Display for BootstrapState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BootstrapState::ResolvingOrganization => "resolving-organization",
            BootstrapState::ResolvingSession => "resolving-session",
            BootstrapState::Finalizing => "finalizing",
            BootstrapState::Done => "done",
        };
        f.write_str(name)
    }
}

/// Screen chosen by the bootstrap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenSelection {
    /// Configuration problem; show the error screen
    Error,
    /// No usable contact session; ask the visitor to identify
    Auth,
    /// Valid contact session; show the conversation selection
    Selection,
}

/// Result of one validator call, as seen by the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome<Id> {
    /// Confirmed identifier
    Valid(Id),
    /// Rejected, with an optional explanation
    Invalid(Option<String>),
    /// No answer: the call failed in transport or timed out
    Unverified,
}

impl<Id> ValidationOutcome<Id> {
    /// Whether the identifier was confirmed
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid(_))
    }
}

/// Loading text shown to the visitor
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusMessage(String);

impl StatusMessage {
    /// Wrap a message
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    /// Borrow the text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether no message has been set yet
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StatusMessage {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Terminal result of a bootstrap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapOutcome {
    /// Screen to route to
    pub screen: ScreenSelection,
    /// Message for the error screen; set only when `screen` is `Error`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_reason: Option<String>,
    /// Organization confirmed during bootstrap
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<OrganizationId>,
    /// The session validator answered that the cached session is invalid
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub session_rejected: bool,
}

/// One item of the bootstrap progress stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapUpdate {
    /// State at the time of the update
    pub state: BootstrapState,
    /// Current loading text
    pub status: StatusMessage,
    /// Present only on the final update, whose state is `Done`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<BootstrapOutcome>,
}

impl BootstrapUpdate {
    /// Whether this is the final update
    pub fn is_final(&self) -> bool {
        self.outcome.is_some()
    }
}
