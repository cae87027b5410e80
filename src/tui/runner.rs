//! TUI runner — main loop that wires everything together.
//!
//! Initializes the agent session, sets up the terminal, then runs the
//! TEA loop. Network work runs in spawned tasks that report back over
//! an mpsc channel; only this loop touches the model.

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, MouseEventKind,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::time::interval;
use tracing::{error, info};

use crate::config::DashboardConfig;
use crate::identity::IdentityProvider;
use crate::pick::{PickError, PickWorkflow};
use crate::queue::QueueService;

use super::app::{DashboardApp, ExitReason};
use super::event::{Command, TuiMessage};
use super::layout;

/// Restores the terminal on drop, including while unwinding.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        io::stdout().execute(EnterAlternateScreen)?;
        io::stdout().execute(EnableMouseCapture)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = io::stdout().execute(DisableMouseCapture);
        let _ = io::stdout().execute(LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

/// Panics are logged, never printed over the dashboard.
fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        error!("uncaught panic: {info}");
    }));
}

/// Execute one model command as a background task.
pub fn dispatch(
    cmd: Command,
    tx: &UnboundedSender<TuiMessage>,
    queue: &Arc<dyn QueueService>,
    workflow: &PickWorkflow,
) {
    let tx = tx.clone();
    match cmd {
        Command::Fetch { seq } => {
            let queue = queue.clone();
            tokio::spawn(async move {
                let task = tokio::spawn(async move { queue.fetch_snapshot().await });
                let result = match task.await {
                    Ok(result) => result.map_err(|e| e.to_string()),
                    Err(e) => {
                        error!(seq, "fetch task aborted: {e}");
                        Err(format!("fetch aborted: {e}"))
                    }
                };
                let _ = tx.send(TuiMessage::FetchCompleted { seq, result });
            });
        }
        Command::Pick { contact_id } => {
            let workflow = workflow.clone();
            tokio::spawn(async move {
                let id = contact_id.clone();
                let task = tokio::spawn(async move { workflow.pick(&id).await });
                let result = match task.await {
                    Ok(result) => result,
                    Err(e) => {
                        error!(contact_id = %contact_id, "pick task aborted: {e}");
                        Err(PickError::Aborted(e.to_string()))
                    }
                };
                let _ = tx.send(TuiMessage::PickCompleted { contact_id, result });
            });
        }
    }
}

/// Forward terminal input into the channel until the receiver goes away.
fn spawn_input_reader(tx: UnboundedSender<TuiMessage>) {
    tokio::task::spawn_blocking(move || {
        while !tx.is_closed() {
            if !event::poll(Duration::from_millis(100)).unwrap_or(false) {
                continue;
            }
            let msg = match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => TuiMessage::Input(key),
                Ok(Event::Mouse(m)) if m.kind == MouseEventKind::Moved => TuiMessage::PointerMoved,
                Ok(_) => continue,
                Err(e) => {
                    error!("terminal input error: {e}");
                    continue;
                }
            };
            if tx.send(msg).is_err() {
                break;
            }
        }
    });
}

/// Run the dashboard. Blocks until quit or logout.
pub async fn run_dashboard(
    config: &DashboardConfig,
    queue: Arc<dyn QueueService>,
    identity: Arc<dyn IdentityProvider>,
) -> anyhow::Result<ExitReason> {
    let session = identity
        .initialize_session()
        .await
        .context("failed to initialize agent session")?;
    let workflow = PickWorkflow::new(queue.clone(), identity, session);

    install_panic_hook();
    let guard = TerminalGuard::enter()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    spawn_input_reader(tx.clone());

    let mut app = DashboardApp::new(config, Instant::now());
    for cmd in app.start() {
        dispatch(cmd, &tx, &queue, &workflow);
    }
    info!(endpoint = %config.endpoint, "dashboard started");

    let mut tick_interval = interval(Duration::from_millis(250)); // 4Hz
    let mut render_interval = interval(Duration::from_millis(33)); // ~30fps

    loop {
        let cmds = tokio::select! {
            _ = tick_interval.tick() => app.update(TuiMessage::Tick, Instant::now()),
            _ = render_interval.tick() => {
                terminal.draw(|f| layout::draw(f, &app, Instant::now()))?;
                Vec::new()
            }
            Some(msg) = rx.recv() => app.update(msg, Instant::now()),
        };
        for cmd in cmds {
            dispatch(cmd, &tx, &queue, &workflow);
        }

        if app.should_quit {
            break;
        }
    }

    drop(rx);
    drop(guard);
    let _ = std::panic::take_hook();

    let reason = app.exit_reason.unwrap_or(ExitReason::Quit);
    info!(?reason, "dashboard stopped");
    Ok(reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::ConfiguredIdentity;
    use crate::queue::{PickRequest, QueueError, QueueItem};
    use async_trait::async_trait;

    struct StaticQueue;

    #[async_trait]
    impl QueueService for StaticQueue {
        async fn fetch_snapshot(&self) -> Result<Vec<QueueItem>, QueueError> {
            Ok(vec![QueueItem::new("C1", 1.0)])
        }

        async fn submit_pick(&self, _request: &PickRequest) -> Result<(), QueueError> {
            Ok(())
        }
    }

    struct PanickingQueue;

    #[async_trait]
    impl QueueService for PanickingQueue {
        async fn fetch_snapshot(&self) -> Result<Vec<QueueItem>, QueueError> {
            panic!("boom");
        }

        async fn submit_pick(&self, _request: &PickRequest) -> Result<(), QueueError> {
            panic!("boom");
        }
    }

    async fn workflow(queue: Arc<dyn QueueService>) -> PickWorkflow {
        let identity: Arc<dyn IdentityProvider> =
            Arc::new(ConfiguredIdentity::new(Some("arn".into()), None));
        let session = identity.initialize_session().await.unwrap();
        PickWorkflow::new(queue, identity, session)
    }

    #[tokio::test]
    async fn fetch_command_reports_back() {
        let queue: Arc<dyn QueueService> = Arc::new(StaticQueue);
        let wf = workflow(queue.clone()).await;
        let (tx, mut rx) = mpsc::unbounded_channel();

        dispatch(Command::Fetch { seq: 4 }, &tx, &queue, &wf);
        match rx.recv().await.unwrap() {
            TuiMessage::FetchCompleted { seq, result } => {
                assert_eq!(seq, 4);
                assert_eq!(result.unwrap().len(), 1);
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[tokio::test]
    async fn panicking_pick_still_completes() {
        let queue: Arc<dyn QueueService> = Arc::new(PanickingQueue);
        let wf = workflow(queue.clone()).await;
        let (tx, mut rx) = mpsc::unbounded_channel();

        dispatch(
            Command::Pick {
                contact_id: "C1".into(),
            },
            &tx,
            &queue,
            &wf,
        );
        match rx.recv().await.unwrap() {
            TuiMessage::PickCompleted { contact_id, result } => {
                assert_eq!(contact_id, "C1");
                assert!(matches!(result, Err(PickError::Aborted(_))));
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[tokio::test]
    async fn panicking_fetch_reports_error() {
        let queue: Arc<dyn QueueService> = Arc::new(PanickingQueue);
        let wf = workflow(queue.clone()).await;
        let (tx, mut rx) = mpsc::unbounded_channel();

        dispatch(Command::Fetch { seq: 1 }, &tx, &queue, &wf);
        match rx.recv().await.unwrap() {
            TuiMessage::FetchCompleted { result, .. } => {
                assert!(result.unwrap_err().contains("fetch aborted"));
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }
}
