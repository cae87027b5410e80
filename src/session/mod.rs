//! Session timer — refresh cadence and inactivity interruption.
//!
//! Two states: `Refreshing` → `InactivityWarning` → `Refreshing`.
//! The timer owns no real clocks; callers pass `Instant`s and poll it,
//! so every transition is deterministic under test.

use std::time::{Duration, Instant};

use tracing::info;

/// Default refresh cadence.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(7);
/// Default idle period before the inactivity modal opens.
pub const DEFAULT_INACTIVITY_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Auto-refresh running.
    Refreshing,
    /// Refresh suspended, inactivity modal open.
    InactivityWarning,
}

/// What a poll found due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// A refresh tick fired.
    Refresh,
    /// The inactivity deadline elapsed; refresh is now suspended.
    InactivityElapsed,
}

#[derive(Debug, Clone)]
pub struct SessionTimer {
    phase: SessionPhase,
    refresh_interval: Duration,
    inactivity_timeout: Duration,
    /// `None` while refresh is cancelled.
    next_refresh: Option<Instant>,
    inactivity_deadline: Instant,
}

impl SessionTimer {
    /// Start in `Refreshing`: first tick one interval from `now`.
    pub fn start(refresh_interval: Duration, inactivity_timeout: Duration, now: Instant) -> Self {
        Self {
            phase: SessionPhase::Refreshing,
            refresh_interval,
            inactivity_timeout,
            next_refresh: Some(now + refresh_interval),
            inactivity_deadline: now + inactivity_timeout,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn refresh_active(&self) -> bool {
        self.next_refresh.is_some()
    }

    /// Time left before the inactivity modal opens.
    pub fn idle_remaining(&self, now: Instant) -> Duration {
        self.inactivity_deadline.saturating_duration_since(now)
    }

    /// Key press or pointer movement. Ignored while the modal is open;
    /// only "resume" leaves `InactivityWarning`.
    pub fn record_input(&mut self, now: Instant) {
        if self.phase == SessionPhase::Refreshing {
            self.inactivity_deadline = now + self.inactivity_timeout;
        }
    }

    /// Advance to `now`. Inactivity wins over a refresh due at the same time.
    pub fn poll(&mut self, now: Instant) -> Option<TimerEvent> {
        if self.phase != SessionPhase::Refreshing {
            return None;
        }

        if now >= self.inactivity_deadline {
            self.phase = SessionPhase::InactivityWarning;
            self.next_refresh = None;
            info!("inactivity timeout reached, auto-refresh suspended");
            return Some(TimerEvent::InactivityElapsed);
        }

        match self.next_refresh {
            Some(due) if now >= due => {
                // Missed ticks collapse into one.
                self.next_refresh = Some(now + self.refresh_interval);
                Some(TimerEvent::Refresh)
            }
            _ => None,
        }
    }

    /// Leave `InactivityWarning`: restart refresh and reset the deadline.
    pub fn resume(&mut self, now: Instant) {
        if self.phase == SessionPhase::InactivityWarning {
            info!("session resumed");
        }
        self.phase = SessionPhase::Refreshing;
        self.next_refresh = Some(now + self.refresh_interval);
        self.inactivity_deadline = now + self.inactivity_timeout;
    }
}
