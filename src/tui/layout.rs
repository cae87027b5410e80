//! Single-screen layout with modal overlays.
//!
//! ```text
//! ┌─ Filters ───────────────────────────────────────┐
//! │ Queue: [bill_]  No agent only: [x]  3 of 10 ... │
//! ├─ Live Queue ────────────────────────────────────┤
//! │ Contact  ANI  Queue  Start  Agent  Sel  Pick    │
//! │ ...                                             │
//! ├─────────────────────────────────────────────────┤
//! │ Details: https://...                            │
//! │ [live] updated 3s ago  idle in 1:52  keys...    │
//! └─────────────────────────────────────────────────┘
//! ```

use std::time::Instant;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;

use crate::session::SessionPhase;

use super::app::{DashboardApp, InputMode};
use super::dashboard;
use super::table::RowView;

/// Draw the full dashboard.
pub fn draw(f: &mut Frame, app: &DashboardApp, now: Instant) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // filter bar
            Constraint::Min(5),    // table
            Constraint::Length(1), // details line
            Constraint::Length(1), // status bar
        ])
        .split(f.area());

    draw_filters(f, app, outer[0]);
    draw_table(f, app, outer[1]);
    draw_details(f, app, outer[2]);
    draw_status(f, app, outer[3], now);

    // Overlays, lowest first.
    if let Some(message) = &app.confirm {
        draw_confirm_modal(f, message);
    }
    if let Some(contact_id) = &app.picking {
        draw_loading_overlay(f, contact_id);
    }
    if app.session.phase() == SessionPhase::InactivityWarning {
        draw_inactivity_modal(f);
    }
}

fn draw_filters(f: &mut Frame, app: &DashboardApp, area: Rect) {
    let editing = app.input_mode == InputMode::EditingQueueFilter;
    let field_style = if editing {
        Style::default().fg(Color::Black).bg(Color::Cyan)
    } else {
        Style::default().fg(Color::Cyan)
    };
    let cursor = if editing { "_" } else { "" };
    let no_agent = if app.filters.no_agent_only { "[x]" } else { "[ ]" };

    let line = Line::from(vec![
        Span::styled("Queue: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("[{}{cursor}]", app.filters.queue_substring),
            field_style,
        ),
        Span::raw("  "),
        Span::styled("No agent only: ", Style::default().fg(Color::DarkGray)),
        Span::styled(no_agent, Style::default().fg(Color::Cyan)),
        Span::raw("  "),
        Span::styled(
            dashboard::format_row_count(app.shown_count(), app.snapshot_len()),
            Style::default().fg(Color::Yellow),
        ),
        Span::raw("  "),
        Span::styled(
            format!("{} selected", app.selection.len()),
            Style::default().fg(Color::Green),
        ),
    ]);

    let title = if app.filters.is_active() {
        " Filters (active) "
    } else {
        " Filters "
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    f.render_widget(Paragraph::new(line).block(block), area);
}

fn pick_cell(row: &RowView) -> Cell<'static> {
    if !row.pick_visible {
        return Cell::from("");
    }
    if row.pick_enabled {
        Cell::from("[Pick]").style(
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Cell::from("[Pick]").style(
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::CROSSED_OUT),
        )
    }
}

fn draw_table(f: &mut Frame, app: &DashboardApp, area: Rect) {
    let header = Row::new(["Contact", "ANI", "Queue", "Start", "Agent", "Sel", "Pick"]).style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = app
        .rows
        .iter()
        .map(|row| {
            let checkbox = if row.checked { "[x]" } else { "[ ]" };
            let agent_style = if row.agent.is_empty() {
                Style::default()
            } else {
                Style::default().fg(Color::Yellow)
            };
            Row::new(vec![
                Cell::from(row.contact_id.clone()).style(
                    Style::default()
                        .fg(Color::Blue)
                        .add_modifier(Modifier::UNDERLINED),
                ),
                Cell::from(row.ani.clone()),
                Cell::from(row.queue.clone()),
                Cell::from(row.start_time.clone()),
                Cell::from(row.agent.clone()).style(agent_style),
                Cell::from(checkbox),
                pick_cell(row),
            ])
        })
        .collect();

    let widths = [
        Constraint::Min(12),
        Constraint::Length(16),
        Constraint::Length(16),
        Constraint::Length(20),
        Constraint::Length(16),
        Constraint::Length(4),
        Constraint::Length(7),
    ];

    let refreshing = if app.fetches_in_flight > 0 {
        " Live Queue (Refreshing...) "
    } else {
        " Live Queue "
    };
    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(refreshing)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .row_highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");

    let mut state = TableState::default();
    if !app.rows.is_empty() {
        state.select(Some(app.cursor));
    }
    f.render_stateful_widget(table, area, &mut state);
}

fn draw_details(f: &mut Frame, app: &DashboardApp, area: Rect) {
    let link = app
        .focused_row()
        .map(|r| r.link.as_str())
        .filter(|l| !l.is_empty())
        .unwrap_or("-");
    let line = Line::from(vec![
        Span::styled(" Details: ", Style::default().fg(Color::DarkGray)),
        Span::styled(link.to_string(), Style::default().fg(Color::Blue)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn draw_status(f: &mut Frame, app: &DashboardApp, area: Rect, now: Instant) {
    let state = if app.fetches_in_flight > 0 {
        Span::styled("Refreshing...", Style::default().fg(Color::Yellow))
    } else if app.session.refresh_active() {
        Span::styled("live", Style::default().fg(Color::Green))
    } else {
        Span::styled("paused", Style::default().fg(Color::Red))
    };

    let updated = app
        .last_updated
        .map(|t| format!("updated {}", dashboard::format_age(now.saturating_duration_since(t))))
        .unwrap_or_else(|| "waiting for data".into());

    let spans = vec![
        Span::styled(" [", Style::default().fg(Color::DarkGray)),
        state,
        Span::styled("]", Style::default().fg(Color::DarkGray)),
        Span::raw("  "),
        Span::styled(updated, Style::default().fg(Color::Cyan)),
        Span::raw("  "),
        Span::styled(
            format!(
                "idle in {}",
                dashboard::format_countdown(app.session.idle_remaining(now))
            ),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw("  "),
        Span::styled(
            "j/k:Move  Space:Select  p:Pick  /:Queue  a:No agent  R:Refresh  q:Quit",
            Style::default().fg(Color::DarkGray),
        ),
    ];
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Rect of `width` x `height` centered in `area`, clamped to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn draw_modal(f: &mut Frame, title: &str, border: Color, lines: Vec<Line<'_>>) {
    let area = centered(f.area(), 56, lines.len() as u16 + 2);
    f.render_widget(Clear, area);
    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(Color::Black));
    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn draw_confirm_modal(f: &mut Frame, message: &str) {
    draw_modal(
        f,
        " Notice ",
        Color::Yellow,
        vec![
            Line::from(message.to_string()),
            Line::from(""),
            Line::from(Span::styled(
                "Enter: OK",
                Style::default().fg(Color::DarkGray),
            )),
        ],
    );
}

fn draw_loading_overlay(f: &mut Frame, contact_id: &str) {
    draw_modal(
        f,
        " Picking ",
        Color::Cyan,
        vec![Line::from(format!("Picking {contact_id}..."))],
    );
}

fn draw_inactivity_modal(f: &mut Frame) {
    draw_modal(
        f,
        " Are you still there? ",
        Color::Red,
        vec![
            Line::from("Auto-refresh is paused because of inactivity."),
            Line::from(""),
            Line::from(vec![
                Span::styled("r", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
                Span::raw(": Resume   "),
                Span::styled("x", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
                Span::raw(": Exit"),
            ]),
        ],
    );
}
