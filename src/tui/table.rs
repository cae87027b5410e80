//! Table rows — snapshot + selection → row view models.
//!
//! Rows are rebuilt from scratch on every render. The selection set is
//! the only state that survives a refresh.

use std::collections::BTreeSet;

use crate::queue::QueueItem;

/// ContactIDs the operator has checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: BTreeSet<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, contact_id: &str) -> bool {
        self.ids.contains(contact_id)
    }

    pub fn remove(&mut self, contact_id: &str) -> bool {
        self.ids.remove(contact_id)
    }

    /// Flip membership. Returns whether the id is now selected.
    pub fn toggle(&mut self, contact_id: &str) -> bool {
        if self.ids.remove(contact_id) {
            false
        } else {
            self.ids.insert(contact_id.to_string());
            true
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// One rendered table row. Absent fields are empty strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub contact_id: String,
    /// ContactDetails URL the contact label links to.
    pub link: String,
    pub ani: String,
    pub queue: String,
    pub start_time: String,
    pub agent: String,
    /// Checkbox state.
    pub checked: bool,
    /// False once an agent owns the contact.
    pub pick_enabled: bool,
    /// The pick action shows only for checked rows.
    pub pick_visible: bool,
}

impl RowView {
    pub fn build(item: &QueueItem, selection: &SelectionSet) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        let checked = selection.contains(&item.contact_id);
        Self {
            contact_id: item.contact_id.clone(),
            link: text(&item.contact_details),
            ani: text(&item.ani),
            queue: text(&item.queue),
            start_time: text(&item.start_time),
            agent: item.assigned_agent().unwrap_or_default().to_string(),
            checked,
            pick_enabled: !item.is_claimed(),
            pick_visible: checked,
        }
    }
}

/// Build the full table body.
pub fn render(items: &[QueueItem], selection: &SelectionSet) -> Vec<RowView> {
    items
        .iter()
        .map(|item| RowView::build(item, selection))
        .collect()
}
