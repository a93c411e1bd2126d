//! Widget mount lifetime
//!
//! A `WidgetMount` lives as long as one mounted widget. The bootstrap checks
//! it before applying any validator result, so nothing is emitted or retained
//! once the widget is gone. It also holds the organization id confirmed
//! during bootstrap, which downstream screens read.

use once_cell::sync::OnceCell;
use parley_core::OrganizationId;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

struct MountInner {
    alive: watch::Sender<bool>,
    organization_id: OnceCell<OrganizationId>,
}

/// Handle to one widget mount; clones share the same lifetime
#[derive(Clone)]
pub struct WidgetMount {
    inner: Arc<MountInner>,
}

impl WidgetMount {
    /// Create a live mount
    pub fn new() -> Self {
        let (alive, _) = watch::channel(true);
        Self {
            inner: Arc::new(MountInner {
                alive,
                organization_id: OnceCell::new(),
            }),
        }
    }

    /// Whether the widget is still mounted
    pub fn is_alive(&self) -> bool {
        *self.inner.alive.borrow()
    }

    /// Mark the widget as unmounted; wakes anything waiting in [`Self::unmounted`]
    pub fn unmount(&self) {
        if self.inner.alive.send_replace(false) {
            debug!("Widget unmounted");
        }
    }

    /// Resolves once the widget is unmounted
    pub async fn unmounted(&self) {
        let mut rx = self.inner.alive.subscribe();
        // The sender lives in `inner`, which we hold, so this cannot close.
        let _ = rx.wait_for(|alive| !*alive).await;
    }

    /// Organization confirmed during bootstrap, if any
    pub fn organization_id(&self) -> Option<&OrganizationId> {
        self.inner.organization_id.get()
    }

    /// Record the confirmed organization; only the first write sticks
    pub(crate) fn retain_organization(&self, organization_id: OrganizationId) -> bool {
        match self.inner.organization_id.set(organization_id) {
            Ok(()) => true,
            Err(rejected) => {
                warn!(
                    "Organization {} already retained for this mount; ignoring {}",
                    self.organization_id().map(|id| id.as_str()).unwrap_or_default(),
                    rejected
                );
                false
            }
        }
    }
}

impl Default for WidgetMount {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for WidgetMount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetMount")
            .field("alive", &self.is_alive())
            .field("organization_id", &self.organization_id())
            .finish()
    }
}
