//! Conversation records

use super::primitives::{ContactSessionId, ConversationId, OrganizationId};
use serde::{Deserialize, Serialize};

/// Conversation lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationStatus {
    /// Waiting on an answer
    Unresolved,
    /// Closed out
    Resolved,
    /// Handed to a human operator
    Escalated,
}

/// A visitor conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    /// Conversation id
    #[serde(rename = "_id")]
    pub id: ConversationId,
    /// Agent thread backing the conversation
    pub thread_id: String,
    /// Owning organization
    pub organization_id: OrganizationId,
    /// Visitor session that opened the conversation
    pub contact_session_id: ContactSessionId,
    /// Current status
    pub status: ConversationStatus,
}
