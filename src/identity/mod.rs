//! Operator identity — who is picking.
//!
//! The agent desktop owns the real identity; this crate only sees it
//! through `IdentityProvider`. `ConfiguredIdentity` is the provider used
//! by the binary: it takes the agent ARN and name from configuration.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

/// Display name used when the provider has no name for the agent.
pub const UNKNOWN_AGENT: &str = "Unknown Agent";

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("agent session is not initialized")]
    NotInitialized,

    #[error("agent identity unavailable: {0}")]
    Unavailable(String),

    #[error("failed to initialize agent session: {0}")]
    Session(String),
}

/// Proof that `initialize_session` succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionHandle {
    pub id: Uuid,
}

/// The operator a claim is made for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub agent_arn: String,
    pub agent_name: String,
}

impl Identity {
    /// Build an identity, falling back to [`UNKNOWN_AGENT`] for a missing
    /// or blank name.
    pub fn new(agent_arn: impl Into<String>, agent_name: Option<String>) -> Self {
        let agent_name = agent_name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_AGENT.to_string());
        Self {
            agent_arn: agent_arn.into(),
            agent_name,
        }
    }
}

/// Source of the current operator's identity.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Initialize once, before any pick.
    async fn initialize_session(&self) -> Result<SessionHandle, IdentityError>;

    /// Resolve the operator for an initialized session. Called per pick.
    async fn resolve_identity(&self, session: &SessionHandle) -> Result<Identity, IdentityError>;
}

/// Identity taken from configuration (`agent.arn`, `agent.name`).
#[derive(Debug)]
pub struct ConfiguredIdentity {
    agent_arn: Option<String>,
    agent_name: Option<String>,
    session: Mutex<Option<Uuid>>,
}

impl ConfiguredIdentity {
    pub fn new(agent_arn: Option<String>, agent_name: Option<String>) -> Self {
        Self {
            agent_arn,
            agent_name,
            session: Mutex::new(None),
        }
    }
}

#[async_trait]
impl IdentityProvider for ConfiguredIdentity {
    async fn initialize_session(&self) -> Result<SessionHandle, IdentityError> {
        let id = Uuid::new_v4();
        *self.session.lock().await = Some(id);
        info!(session = %id, "agent session initialized");
        Ok(SessionHandle { id })
    }

    async fn resolve_identity(&self, session: &SessionHandle) -> Result<Identity, IdentityError> {
        if *self.session.lock().await != Some(session.id) {
            return Err(IdentityError::NotInitialized);
        }
        let arn = self
            .agent_arn
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .ok_or_else(|| IdentityError::Unavailable("agent ARN is not configured".into()))?;
        Ok(Identity::new(arn, self.agent_name.clone()))
    }
}
