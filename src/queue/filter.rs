//! Ordering and filtering of queue snapshots. Pure functions only.

use super::types::QueueItem;

/// Operator-controlled filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    /// Case-insensitive substring matched against the Queue field.
    pub queue_substring: String,
    /// Keep only contacts without an agent.
    pub no_agent_only: bool,
}

impl FilterSpec {
    pub fn apply(&self, items: &[QueueItem]) -> Vec<QueueItem> {
        apply_filters(items, &self.queue_substring, self.no_agent_only)
    }

    pub fn is_active(&self) -> bool {
        !self.queue_substring.is_empty() || self.no_agent_only
    }
}

/// Stable ascending sort by `startTimeRAW`. Equal timestamps keep their
/// original relative order.
pub fn sort_by_start_time(items: &mut [QueueItem]) {
    items.sort_by(|a, b| a.start_time_raw.total_cmp(&b.start_time_raw));
}

/// Filter a snapshot.
///
/// Rows without ANI and DNIS (after trimming) are always dropped.
pub fn apply_filters(
    items: &[QueueItem],
    queue_substring: &str,
    no_agent_only: bool,
) -> Vec<QueueItem> {
    let needle = queue_substring.to_lowercase();
    items
        .iter()
        .filter(|item| {
            let matches_queue = needle.is_empty()
                || item
                    .queue
                    .as_deref()
                    .is_some_and(|q| q.to_lowercase().contains(&needle));
            let matches_agent = !no_agent_only || !item.is_claimed();
            matches_queue && matches_agent && item.has_caller_info()
        })
        .cloned()
        .collect()
}
