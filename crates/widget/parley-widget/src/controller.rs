//! Widget controller
//!
//! Ties one mount together: runs the bootstrap, feeds its progress into the
//! loading screen and routes to the first real screen. Afterwards it owns the
//! navigation state and the remembered contact sessions.

use crate::bootstrap::{BootstrapSequencer, BootstrapUpdate};
use crate::mount::WidgetMount;
use crate::screens::{WidgetScreen, WidgetState};
use crate::session_store::ContactSessionStore;
use parley_core::{ContactSessionId, OrganizationId, ParleyError, Result};
use tokio_stream::StreamExt;
use tracing::{debug, info};

/// Drives one mounted widget
pub struct WidgetController {
    sequencer: BootstrapSequencer,
    mount: WidgetMount,
    state: WidgetState,
    sessions: ContactSessionStore,
}

impl WidgetController {
    /// Create a controller with a fresh mount
    pub fn new(sequencer: BootstrapSequencer, sessions: ContactSessionStore) -> Self {
        Self::with_mount(sequencer, sessions, WidgetMount::new())
    }

    /// Create a controller bound to an existing mount
    pub fn with_mount(
        sequencer: BootstrapSequencer,
        sessions: ContactSessionStore,
        mount: WidgetMount,
    ) -> Self {
        Self {
            sequencer,
            mount,
            state: WidgetState::new(),
            sessions,
        }
    }

    /// Navigation state
    pub fn state(&self) -> &WidgetState {
        &self.state
    }

    /// Navigation state, for screen transitions driven by the visitor
    pub fn state_mut(&mut self) -> &mut WidgetState {
        &mut self.state
    }

    /// Mount handle shared with the bootstrap
    pub fn mount(&self) -> &WidgetMount {
        &self.mount
    }

    /// Remembered contact sessions
    pub fn sessions(&self) -> &ContactSessionStore {
        &self.sessions
    }

    /// Run the bootstrap for the organization the widget was embedded for
    ///
    /// Returns the screen routed to. If the widget unmounts first the state
    /// stays on the loading screen.
    pub async fn bootstrap(&mut self, organization_id: Option<&str>) -> Result<WidgetScreen> {
        self.bootstrap_with(organization_id, |_| {}).await
    }

    /// Like [`Self::bootstrap`], also passing every progress update to `on_update`
    pub async fn bootstrap_with<F>(
        &mut self,
        organization_id: Option<&str>,
        mut on_update: F,
    ) -> Result<WidgetScreen>
    where
        F: FnMut(&BootstrapUpdate),
    {
        let organization_id = OrganizationId::parse_optional(organization_id);
        let session_id = organization_id
            .as_ref()
            .and_then(|id| self.sessions.get(id))
            .cloned();

        debug!(
            "Bootstrapping widget: organization={} cached_session={}",
            organization_id.as_ref().map(|id| id.as_str()).unwrap_or("-"),
            session_id.is_some()
        );

        let mut stream = self
            .sequencer
            .start(&self.mount, organization_id.clone(), session_id.clone())?;

        while let Some(update) = stream.next().await {
            on_update(&update);
            self.state.set_loading_message(update.status.as_str());
            let Some(outcome) = update.outcome else {
                continue;
            };

            if outcome.session_rejected {
                if let Some(id) = &outcome.organization_id {
                    debug!("Forgetting stale contact session for {}", id);
                    self.sessions.clear(id);
                }
            }
            self.state.apply_outcome(&outcome);
            info!("Widget ready on {} screen", self.state.screen());
            break;
        }

        Ok(self.state.screen())
    }

    /// Finish the auth screen with a newly created contact session
    pub fn complete_auth(&mut self, session_id: ContactSessionId) -> Result<()> {
        let organization_id = self
            .state
            .organization_id()
            .cloned()
            .ok_or_else(|| ParleyError::runtime("no organization bound to this widget"))?;

        self.sessions.set(organization_id, session_id);
        self.state.enter_selection();
        Ok(())
    }

    /// Unmount the widget; any bootstrap still running is abandoned
    pub fn unmount(&self) {
        self.mount.unmount();
    }
}
