//! Messages into the dashboard model, commands out of it.
//!
//! The runner multiplexes terminal input, the tick interval, and finished
//! network tasks into `TuiMessage`s. `DashboardApp::update` answers with
//! `Command`s the runner turns into spawned tasks.

use crossterm::event::KeyEvent;

use crate::pick::{PickError, PickReceipt};
use crate::queue::QueueItem;

/// Messages that drive the dashboard update loop.
#[derive(Debug)]
pub enum TuiMessage {
    /// Keyboard input.
    Input(KeyEvent),
    /// Mouse pointer moved (counts as activity).
    PointerMoved,
    /// Tick: advance the session timer.
    Tick,
    /// A snapshot fetch finished. `seq` orders overlapping fetches.
    FetchCompleted {
        seq: u64,
        result: Result<Vec<QueueItem>, String>,
    },
    /// A pick finished, successfully or not.
    PickCompleted {
        contact_id: String,
        result: Result<PickReceipt, PickError>,
    },
    /// Quit the dashboard.
    Quit,
}

/// Side effects requested by the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fetch a snapshot, tagged with its sequence number.
    Fetch { seq: u64 },
    /// Claim a contact.
    Pick { contact_id: String },
}
