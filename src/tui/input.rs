//! Key binding dispatch for the dashboard.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::session::SessionPhase;

use super::app::{DashboardApp, InputMode};
use super::event::Command;

/// Handle a key event, mutating app state. Returns commands to run.
pub fn handle_key(app: &mut DashboardApp, key: KeyEvent, now: Instant) -> Vec<Command> {
    if key.kind == KeyEventKind::Release {
        return Vec::new();
    }

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return Vec::new();
    }

    // Modal layers, innermost first.
    if app.session.phase() == SessionPhase::InactivityWarning {
        match key.code {
            KeyCode::Char('r') | KeyCode::Enter => app.resume(now),
            KeyCode::Char('x') | KeyCode::Esc => app.exit(),
            _ => {}
        }
        return Vec::new();
    }
    if app.picking.is_some() {
        return Vec::new();
    }
    if app.confirm.is_some() {
        return match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => app.dismiss_confirm(),
            _ => Vec::new(),
        };
    }

    if app.input_mode == InputMode::EditingQueueFilter {
        let mut value = app.filters.queue_substring.clone();
        match key.code {
            KeyCode::Enter | KeyCode::Esc => app.input_mode = InputMode::Normal,
            KeyCode::Backspace => {
                value.pop();
                app.set_queue_filter(value);
            }
            KeyCode::Char(c) => {
                value.push(c);
                app.set_queue_filter(value);
            }
            _ => {}
        }
        return Vec::new();
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('j') | KeyCode::Down => app.move_down(),
        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Char(' ') => app.toggle_focused(),
        KeyCode::Char('p') | KeyCode::Enter => return app.activate_pick(),
        KeyCode::Char('R') | KeyCode::F(5) => return app.manual_refresh(),
        KeyCode::Char('/') => app.input_mode = InputMode::EditingQueueFilter,
        KeyCode::Char('a') => app.toggle_no_agent_filter(),
        _ => {}
    }
    Vec::new()
}
