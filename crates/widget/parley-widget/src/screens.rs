//! Widget screens and the navigation state shared between them

use crate::bootstrap::{messages, BootstrapOutcome, ScreenSelection};
use parley_core::{ConversationId, OrganizationId};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Every screen the widget can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetScreen {
    /// Bootstrap in progress
    #[default]
    Loading,
    /// Configuration problem
    Error,
    /// Visitor must identify before chatting
    Auth,
    /// Voice call
    Voice,
    /// Past conversations
    Inbox,
    /// Start page offering chat, voice or contact
    Selection,
    /// One open conversation
    Chat,
    /// Phone contact details
    Contact,
}

impl WidgetScreen {
    /// Lowercase screen name
    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetScreen::Loading => "loading",
            WidgetScreen::Error => "error",
            WidgetScreen::Auth => "auth",
            WidgetScreen::Voice => "voice",
            WidgetScreen::Inbox => "inbox",
            WidgetScreen::Selection => "selection",
            WidgetScreen::Chat => "chat",
            WidgetScreen::Contact => "contact",
        }
    }
}

impl fmt::Display for WidgetScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ScreenSelection> for WidgetScreen {
    fn from(selection: ScreenSelection) -> Self {
        match selection {
            ScreenSelection::Error => WidgetScreen::Error,
            ScreenSelection::Auth => WidgetScreen::Auth,
            ScreenSelection::Selection => WidgetScreen::Selection,
        }
    }
}

/// Navigation state of one mounted widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetState {
    screen: WidgetScreen,
    error_message: Option<String>,
    loading_message: String,
    organization_id: Option<OrganizationId>,
    conversation_id: Option<ConversationId>,
}

impl Default for WidgetState {
    fn default() -> Self {
        Self {
            screen: WidgetScreen::Loading,
            error_message: None,
            loading_message: messages::DEFAULT_LOADING.to_string(),
            organization_id: None,
            conversation_id: None,
        }
    }
}

impl WidgetState {
    /// Fresh state on the loading screen
    pub fn new() -> Self {
        Self::default()
    }

    /// Screen currently shown
    pub fn screen(&self) -> WidgetScreen {
        self.screen
    }

    /// Message for the error screen
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Text for the loading screen
    pub fn loading_message(&self) -> &str {
        &self.loading_message
    }

    /// Organization the widget is bound to
    pub fn organization_id(&self) -> Option<&OrganizationId> {
        self.organization_id.as_ref()
    }

    /// Conversation open in the chat screen
    pub fn conversation_id(&self) -> Option<&ConversationId> {
        self.conversation_id.as_ref()
    }

    /// Update the text shown on the loading screen
    pub fn set_loading_message(&mut self, message: impl Into<String>) {
        self.loading_message = message.into();
    }

    /// Route to the screen picked by the bootstrap
    pub fn apply_outcome(&mut self, outcome: &BootstrapOutcome) {
        self.screen = outcome.screen.into();
        self.error_message = outcome.error_reason.clone();
        if let Some(id) = &outcome.organization_id {
            self.retain_organization(id.clone());
        }
        debug!("Widget routed to {}", self.screen);
    }

    /// Record the organization; the first value wins
    pub fn retain_organization(&mut self, organization_id: OrganizationId) {
        match &self.organization_id {
            None => self.organization_id = Some(organization_id),
            Some(existing) if *existing == organization_id => {}
            Some(existing) => warn!(
                "Ignoring organization {}; widget already bound to {}",
                organization_id, existing
            ),
        }
    }

    /// Leave auth for the selection screen once the visitor has a session
    pub fn enter_selection(&mut self) {
        self.error_message = None;
        self.screen = WidgetScreen::Selection;
    }

    /// Open a conversation
    pub fn open_chat(&mut self, conversation_id: ConversationId) {
        self.conversation_id = Some(conversation_id);
        self.screen = WidgetScreen::Chat;
    }

    /// Show phone contact details
    pub fn open_contact(&mut self) {
        self.screen = WidgetScreen::Contact;
    }

    /// Start a voice call
    pub fn open_voice(&mut self) {
        self.screen = WidgetScreen::Voice;
    }

    /// List past conversations
    pub fn open_inbox(&mut self) {
        self.screen = WidgetScreen::Inbox;
    }

    /// Close the open conversation and return to selection
    pub fn back_from_chat(&mut self) {
        self.conversation_id = None;
        self.screen = WidgetScreen::Selection;
    }

    /// Return to selection from contact
    pub fn back_from_contact(&mut self) {
        self.screen = WidgetScreen::Selection;
    }

    /// Return to selection from voice
    pub fn back_from_voice(&mut self) {
        self.screen = WidgetScreen::Selection;
    }

    /// Return to selection from inbox
    pub fn back_from_inbox(&mut self) {
        self.screen = WidgetScreen::Selection;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(screen: ScreenSelection, reason: Option<&str>, org: Option<&str>) -> BootstrapOutcome {
        BootstrapOutcome {
            screen,
            error_reason: reason.map(str::to_string),
            organization_id: org.and_then(|id| OrganizationId::parse(id)),
            session_rejected: false,
        }
    }

    #[test]
    fn test_initial_state() {
        let state = WidgetState::new();
        assert_eq!(state.screen(), WidgetScreen::Loading);
        assert_eq!(state.loading_message(), "Loading...");
        assert!(state.error_message().is_none());
        assert!(state.organization_id().is_none());
    }

    #[test]
    fn test_apply_error_outcome() {
        let mut state = WidgetState::new();
        state.apply_outcome(&outcome(
            ScreenSelection::Error,
            Some("Organization ID is required"),
            None,
        ));
        assert_eq!(state.screen(), WidgetScreen::Error);
        assert_eq!(state.error_message(), Some("Organization ID is required"));
        assert!(state.organization_id().is_none());
    }

    #[test]
    fn test_apply_selection_retains_org() {
        let mut state = WidgetState::new();
        state.apply_outcome(&outcome(ScreenSelection::Selection, None, Some("org_1")));
        assert_eq!(state.screen(), WidgetScreen::Selection);
        assert_eq!(state.organization_id().unwrap().as_str(), "org_1");

        state.retain_organization(OrganizationId::parse("org_2").unwrap());
        assert_eq!(state.organization_id().unwrap().as_str(), "org_1");
    }

    #[test]
    fn test_chat_round_trip_clears_conversation() {
        let mut state = WidgetState::new();
        state.apply_outcome(&outcome(ScreenSelection::Selection, None, Some("org_1")));

        state.open_chat(ConversationId::parse("conv_1").unwrap());
        assert_eq!(state.screen(), WidgetScreen::Chat);
        assert_eq!(state.conversation_id().unwrap().as_str(), "conv_1");

        state.back_from_chat();
        assert_eq!(state.screen(), WidgetScreen::Selection);
        assert!(state.conversation_id().is_none());
    }

    #[test]
    fn test_secondary_screens_return_to_selection() {
        let mut state = WidgetState::new();
        state.open_contact();
        assert_eq!(state.screen(), WidgetScreen::Contact);
        state.back_from_contact();
        assert_eq!(state.screen(), WidgetScreen::Selection);

        state.open_voice();
        state.back_from_voice();
        state.open_inbox();
        assert_eq!(state.screen(), WidgetScreen::Inbox);
        state.back_from_inbox();
        assert_eq!(state.screen(), WidgetScreen::Selection);
    }

    #[test]
    fn test_screen_serialization() {
        assert_eq!(serde_json::to_string(&WidgetScreen::Selection).unwrap(), "\"selection\"");
        assert_eq!(WidgetScreen::from(ScreenSelection::Auth).to_string(), "auth");
    }
}
