//! Pick workflow — claim an unassigned contact for the current operator.
//!
//! Resolve identity, then `POST` the claim. No retries and no client-side
//! locking: the endpoint decides which of two competing claims wins.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::identity::{IdentityError, IdentityProvider, SessionHandle};
use crate::queue::{PickRequest, QueueError, QueueItem, QueueService};

/// Shown when a claimed contact's pick action is used.
pub const ALREADY_CLAIMED_MESSAGE: &str = "Contacts with agents cannot be picked";
/// Shown after the endpoint accepted a claim.
pub const PICK_SUCCESS_MESSAGE: &str = "Contact picked successfully!";
/// Shown for every other pick failure.
pub const PICK_FAILURE_MESSAGE: &str = "Oh No! There was an error picking the contact.";

#[derive(Debug, Error)]
pub enum PickError {
    #[error("contact {contact_id} already has an agent")]
    AlreadyClaimed { contact_id: String },

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error("pick task aborted: {0}")]
    Aborted(String),
}

impl PickError {
    /// The single message the operator sees for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            PickError::AlreadyClaimed { .. } => ALREADY_CLAIMED_MESSAGE,
            _ => PICK_FAILURE_MESSAGE,
        }
    }
}

/// A claim the endpoint accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickReceipt {
    pub contact_id: String,
    pub agent_name: String,
}

/// Precondition check: only unclaimed contacts can be picked.
pub fn ensure_pickable(item: &QueueItem) -> Result<(), PickError> {
    if item.is_claimed() {
        return Err(PickError::AlreadyClaimed {
            contact_id: item.contact_id.clone(),
        });
    }
    Ok(())
}

/// Submits claims on behalf of the session's operator.
#[derive(Clone)]
pub struct PickWorkflow {
    queue: Arc<dyn QueueService>,
    identity: Arc<dyn IdentityProvider>,
    session: SessionHandle,
}

impl PickWorkflow {
    pub fn new(
        queue: Arc<dyn QueueService>,
        identity: Arc<dyn IdentityProvider>,
        session: SessionHandle,
    ) -> Self {
        Self {
            queue,
            identity,
            session,
        }
    }

    /// Resolve the operator and submit the claim.
    pub async fn pick(&self, contact_id: &str) -> Result<PickReceipt, PickError> {
        let identity = self.identity.resolve_identity(&self.session).await.map_err(|e| {
            warn!(contact_id, error = %e, "identity resolution failed");
            e
        })?;

        let request = PickRequest::new(contact_id, &identity);
        if let Err(e) = self.queue.submit_pick(&request).await {
            warn!(contact_id, error = %e, "pick rejected");
            return Err(e.into());
        }

        info!(contact_id, agent = %identity.agent_name, "contact picked");
        Ok(PickReceipt {
            contact_id: contact_id.to_string(),
            agent_name: identity.agent_name,
        })
    }
}
