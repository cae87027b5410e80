//! DashboardApp — the TEA model.
//!
//! All session state lives here: selection, timers, modals, fetch
//! bookkeeping. `update` receives TuiMessages, mutates state, and returns
//! the commands the runner should execute. No I/O happens in here.

use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::config::DashboardConfig;
use crate::pick::{ensure_pickable, PICK_SUCCESS_MESSAGE};
use crate::queue::{FilterSpec, QueueItem};
use crate::session::{SessionPhase, SessionTimer, TimerEvent};

use super::event::{Command, TuiMessage};
use super::table::{self, RowView, SelectionSet};

/// Current input mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing into the queue filter field.
    EditingQueueFilter,
}

/// Why the dashboard stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// Operator quit.
    Quit,
    /// Operator chose "exit" on the inactivity modal.
    Logout,
}

/// The dashboard state (TEA model).
pub struct DashboardApp {
    /// Refresh and inactivity timers.
    pub session: SessionTimer,
    /// Queue substring and no-agent toggle.
    pub filters: FilterSpec,
    /// Checked ContactIDs; survives refreshes.
    pub selection: SelectionSet,
    /// Rows currently on screen, rebuilt on every change.
    pub rows: Vec<RowView>,
    /// Cursor row index into `rows`.
    pub cursor: usize,
    /// Confirmation modal message. Some = modal open.
    pub confirm: Option<String>,
    /// Contact being picked. Some = loading overlay up.
    pub picking: Option<String>,
    /// Fetches dispatched but not yet answered.
    pub fetches_in_flight: usize,
    /// When the table last rendered a snapshot.
    pub last_updated: Option<Instant>,
    pub input_mode: InputMode,
    pub should_quit: bool,
    pub exit_reason: Option<ExitReason>,
    /// Last sorted snapshot, unfiltered.
    snapshot: Vec<QueueItem>,
    next_fetch_seq: u64,
    last_rendered_seq: u64,
}

impl DashboardApp {
    /// Create the model. The session timer starts in `Refreshing` at `now`.
    pub fn new(config: &DashboardConfig, now: Instant) -> Self {
        Self {
            session: SessionTimer::start(config.refresh_interval, config.inactivity_timeout, now),
            filters: FilterSpec::default(),
            selection: SelectionSet::new(),
            rows: Vec::new(),
            cursor: 0,
            confirm: None,
            picking: None,
            fetches_in_flight: 0,
            last_updated: None,
            input_mode: InputMode::Normal,
            should_quit: false,
            exit_reason: None,
            snapshot: Vec::new(),
            next_fetch_seq: 0,
            last_rendered_seq: 0,
        }
    }

    /// Commands to run right after startup: one immediate fetch.
    pub fn start(&mut self) -> Vec<Command> {
        self.request_fetch().into_iter().collect()
    }

    /// Handle a message (TEA update).
    pub fn update(&mut self, msg: TuiMessage, now: Instant) -> Vec<Command> {
        match msg {
            TuiMessage::Input(key) => {
                self.session.record_input(now);
                super::input::handle_key(self, key, now)
            }
            TuiMessage::PointerMoved => {
                self.session.record_input(now);
                Vec::new()
            }
            TuiMessage::Tick => match self.session.poll(now) {
                Some(TimerEvent::Refresh) => self.request_fetch().into_iter().collect(),
                Some(TimerEvent::InactivityElapsed) | None => Vec::new(),
            },
            TuiMessage::FetchCompleted { seq, result } => {
                self.on_fetch_completed(seq, result, now);
                Vec::new()
            }
            TuiMessage::PickCompleted { contact_id, result } => {
                // Overlay comes down whatever the outcome.
                self.picking = None;
                match result {
                    Ok(receipt) => {
                        info!(
                            contact_id = %receipt.contact_id,
                            agent = %receipt.agent_name,
                            "pick confirmed"
                        );
                        self.selection.remove(&contact_id);
                        self.rebuild_rows();
                        // A failed background fetch may already hold the modal.
                        if let Some(pending) = self.confirm.take() {
                            warn!(message = %pending, "notice replaced by pick confirmation");
                        }
                        let fetch = self.issue_fetch();
                        self.show_confirm(PICK_SUCCESS_MESSAGE);
                        vec![fetch]
                    }
                    Err(e) => {
                        warn!(contact_id = %contact_id, error = %e, "pick failed");
                        self.show_confirm(e.user_message());
                        Vec::new()
                    }
                }
            }
            TuiMessage::Quit => {
                self.quit();
                Vec::new()
            }
        }
    }

    /// Whether a blocking modal is open.
    pub fn modal_open(&self) -> bool {
        self.confirm.is_some() || self.session.phase() == SessionPhase::InactivityWarning
    }

    /// Issue a fetch unless a modal is open.
    pub fn request_fetch(&mut self) -> Option<Command> {
        if self.modal_open() {
            debug!("fetch skipped while a modal is open");
            return None;
        }
        Some(self.issue_fetch())
    }

    /// Allocate the next fetch sequence number, bypassing the modal gate.
    fn issue_fetch(&mut self) -> Command {
        self.next_fetch_seq += 1;
        self.fetches_in_flight += 1;
        Command::Fetch {
            seq: self.next_fetch_seq,
        }
    }

    /// Manual refresh. Ignored while a fetch is still loading.
    pub fn manual_refresh(&mut self) -> Vec<Command> {
        if self.fetches_in_flight > 0 {
            return Vec::new();
        }
        self.request_fetch().into_iter().collect()
    }

    fn on_fetch_completed(&mut self, seq: u64, result: Result<Vec<QueueItem>, String>, now: Instant) {
        self.fetches_in_flight = self.fetches_in_flight.saturating_sub(1);
        if seq <= self.last_rendered_seq {
            debug!(seq, rendered = self.last_rendered_seq, "dropping stale fetch result");
            return;
        }
        match result {
            Ok(items) => {
                self.last_rendered_seq = seq;
                self.snapshot = items;
                self.last_updated = Some(now);
                self.rebuild_rows();
            }
            Err(message) => {
                error!(seq, "error fetching data: {message}");
                self.show_confirm(message);
            }
        }
    }

    /// Replace the whole table body from the snapshot. The cursor stays on
    /// the same contact when it is still listed.
    pub fn rebuild_rows(&mut self) {
        let focused = self.rows.get(self.cursor).map(|r| r.contact_id.clone());
        let filtered = self.filters.apply(&self.snapshot);
        self.rows = table::render(&filtered, &self.selection);

        self.cursor = focused
            .and_then(|id| self.rows.iter().position(|r| r.contact_id == id))
            .unwrap_or(self.cursor)
            .min(self.rows.len().saturating_sub(1));
    }

    /// Row under the cursor.
    pub fn focused_row(&self) -> Option<&RowView> {
        self.rows.get(self.cursor)
    }

    pub fn shown_count(&self) -> usize {
        self.rows.len()
    }

    pub fn snapshot_len(&self) -> usize {
        self.snapshot.len()
    }

    pub fn show_confirm(&mut self, message: impl Into<String>) {
        self.confirm = Some(message.into());
    }

    /// Close the confirmation modal and fetch again.
    pub fn dismiss_confirm(&mut self) -> Vec<Command> {
        self.confirm = None;
        self.request_fetch().into_iter().collect()
    }

    /// Check or uncheck the focused row.
    pub fn toggle_focused(&mut self) {
        let Some(id) = self.focused_row().map(|r| r.contact_id.clone()) else {
            return;
        };
        self.selection.toggle(&id);
        self.rebuild_rows();
    }

    /// Use the focused row's pick action, if it is showing.
    pub fn activate_pick(&mut self) -> Vec<Command> {
        if self.picking.is_some() {
            return Vec::new();
        }
        let Some(row) = self.focused_row() else {
            return Vec::new();
        };
        if !row.pick_visible {
            return Vec::new();
        }
        let contact_id = row.contact_id.clone();

        if let Some(item) = self.snapshot.iter().find(|i| i.contact_id == contact_id) {
            if let Err(e) = ensure_pickable(item) {
                self.show_confirm(e.user_message());
                return Vec::new();
            }
        }

        self.picking = Some(contact_id.clone());
        vec![Command::Pick { contact_id }]
    }

    pub fn set_queue_filter(&mut self, value: String) {
        self.filters.queue_substring = value;
        self.rebuild_rows();
    }

    pub fn toggle_no_agent_filter(&mut self) {
        self.filters.no_agent_only = !self.filters.no_agent_only;
        self.rebuild_rows();
    }

    /// "resume" on the inactivity modal.
    pub fn resume(&mut self, now: Instant) {
        self.session.resume(now);
    }

    /// "exit" on the inactivity modal: end the session.
    pub fn exit(&mut self) {
        self.selection.clear();
        self.exit_reason = Some(ExitReason::Logout);
        self.should_quit = true;
    }

    pub fn quit(&mut self) {
        self.selection.clear();
        self.exit_reason.get_or_insert(ExitReason::Quit);
        self.should_quit = true;
    }

    pub fn move_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.rows.len() {
            self.cursor += 1;
        }
    }
}
