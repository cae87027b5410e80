//! Queue endpoint access — snapshot reads, claim writes, filtering.
//!
//! `QueueService` is the seam the dashboard talks to. `QueueClient` is
//! the HTTP implementation; tests swap in in-memory fakes.

pub mod client;
pub mod filter;
pub mod types;

use async_trait::async_trait;

pub use client::{QueueClient, QueueError};
pub use filter::{apply_filters, sort_by_start_time, FilterSpec};
pub use types::{PickRequest, QueueItem};

/// Remote queue operations.
#[async_trait]
pub trait QueueService: Send + Sync {
    /// Current snapshot, ascending by `startTimeRAW`.
    async fn fetch_snapshot(&self) -> Result<Vec<QueueItem>, QueueError>;

    /// Claim a contact for an agent.
    async fn submit_pick(&self, request: &PickRequest) -> Result<(), QueueError>;
}
