//! Contact sessions remembered per organization
//!
//! The embedding page keeps one contact session per organization so that a
//! returning visitor skips the auth screen. The store can be persisted as a
//! small JSON document.

use parley_core::{ContactSessionId, OrganizationId, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Contact session ids keyed by organization
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactSessionStore {
    sessions: HashMap<OrganizationId, ContactSessionId>,
}

impl ContactSessionStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Session remembered for an organization
    pub fn get(&self, organization_id: &OrganizationId) -> Option<&ContactSessionId> {
        self.sessions.get(organization_id)
    }

    /// Remember a session, returning the one it replaced
    pub fn set(
        &mut self,
        organization_id: OrganizationId,
        session_id: ContactSessionId,
    ) -> Option<ContactSessionId> {
        self.sessions.insert(organization_id, session_id)
    }

    /// Forget the session for an organization
    pub fn clear(&mut self, organization_id: &OrganizationId) -> Option<ContactSessionId> {
        self.sessions.remove(organization_id)
    }

    /// Number of organizations with a remembered session
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether nothing is remembered
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Load a store from a JSON file; a missing file yields an empty store
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No session store at {}; starting empty", path.display());
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        let store: Self = serde_json::from_str(&raw)?;
        debug!(
            "Loaded {} contact session(s) from {}",
            store.len(),
            path.display()
        );
        Ok(store)
    }

    /// Write the store as JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let raw = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), raw)?;
        Ok(())
    }
}
