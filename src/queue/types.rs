//! Wire types for the queue-status endpoint.
//!
//! Field names match the endpoint's JSON exactly. Internal code goes
//! through the accessor methods so absent and blank values are handled
//! in one place.

use serde::{Deserialize, Deserializer, Serialize};

use crate::identity::Identity;

/// One pending or assigned contact in a queue snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueItem {
    #[serde(rename = "ContactID")]
    pub contact_id: String,
    #[serde(rename = "ANI", default, skip_serializing_if = "Option::is_none")]
    pub ani: Option<String>,
    #[serde(rename = "DNIS", default, skip_serializing_if = "Option::is_none")]
    pub dnis: Option<String>,
    #[serde(rename = "Queue", default, skip_serializing_if = "Option::is_none")]
    pub queue: Option<String>,
    #[serde(rename = "Agent", default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    /// Display form of the start time (already formatted by the endpoint).
    #[serde(rename = "startTime", default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    /// Numeric start time used for ordering.
    /// Missing or null sorts as 0.
    #[serde(rename = "startTimeRAW", default, deserialize_with = "null_as_zero")]
    pub start_time_raw: f64,
    #[serde(
        rename = "ContactDetails",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub contact_details: Option<String>,
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

impl QueueItem {
    /// Minimal item, mostly useful for tests and fixtures.
    pub fn new(contact_id: impl Into<String>, start_time_raw: f64) -> Self {
        Self {
            contact_id: contact_id.into(),
            ani: None,
            dnis: None,
            queue: None,
            agent: None,
            start_time: None,
            start_time_raw,
            contact_details: None,
        }
    }

    /// The assigned agent, treating an empty string as unassigned.
    pub fn assigned_agent(&self) -> Option<&str> {
        self.agent.as_deref().filter(|a| !a.is_empty())
    }

    /// Whether an agent already owns this contact.
    pub fn is_claimed(&self) -> bool {
        self.assigned_agent().is_some()
    }

    /// True when ANI or DNIS carries something other than whitespace.
    pub fn has_caller_info(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        present(&self.ani) || present(&self.dnis)
    }
}

/// Body of the claim request (`POST <endpoint>`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickRequest {
    #[serde(rename = "ContactID")]
    pub contact_id: String,
    #[serde(rename = "AgentARN")]
    pub agent_arn: String,
    #[serde(rename = "AgentName")]
    pub agent_name: String,
}

impl PickRequest {
    pub fn new(contact_id: &str, identity: &Identity) -> Self {
        Self {
            contact_id: contact_id.to_string(),
            agent_arn: identity.agent_arn.clone(),
            agent_name: identity.agent_name.clone(),
        }
    }
}
