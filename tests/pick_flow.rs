//! End-to-end: dashboard model + dispatch + HTTP client + identity.

use std::sync::Arc;
use std::time::Instant;

use livequeue::config::{AgentSection, DashboardConfig, FileConfig};
use livequeue::identity::{ConfiguredIdentity, IdentityProvider};
use livequeue::pick::{PickWorkflow, PICK_SUCCESS_MESSAGE};
use livequeue::queue::{QueueClient, QueueService};
use livequeue::tui::app::DashboardApp;
use livequeue::tui::event::{Command, TuiMessage};
use livequeue::tui::runner::dispatch;
use serde_json::json;
use tokio::sync::mpsc;
use wiremock::matchers::{body_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Harness {
    app: DashboardApp,
    queue: Arc<dyn QueueService>,
    workflow: PickWorkflow,
    tx: mpsc::UnboundedSender<TuiMessage>,
    rx: mpsc::UnboundedReceiver<TuiMessage>,
}

impl Harness {
    async fn new(server: &MockServer) -> Self {
        let config = DashboardConfig::resolve(FileConfig {
            endpoint: Some(server.uri()),
            agent: AgentSection {
                arn: Some("arn:agent/1".into()),
                name: Some("Jo".into()),
            },
            ..Default::default()
        })
        .unwrap();

        let queue: Arc<dyn QueueService> = Arc::new(QueueClient::new(config.endpoint.clone()));
        let identity: Arc<dyn IdentityProvider> = Arc::new(ConfiguredIdentity::new(
            config.agent_arn.clone(),
            config.agent_name.clone(),
        ));
        let session = identity.initialize_session().await.unwrap();
        let workflow = PickWorkflow::new(queue.clone(), identity, session);
        let (tx, rx) = mpsc::unbounded_channel();

        Self {
            app: DashboardApp::new(&config, Instant::now()),
            queue,
            workflow,
            tx,
            rx,
        }
    }

    fn run(&self, cmds: Vec<Command>) -> usize {
        let n = cmds.len();
        for cmd in cmds {
            dispatch(cmd, &self.tx, &self.queue, &self.workflow);
        }
        n
    }

    /// Deliver one finished task to the model; returns follow-up commands.
    async fn step(&mut self) -> Vec<Command> {
        let msg = self.rx.recv().await.unwrap();
        self.app.update(msg, Instant::now())
    }
}

#[tokio::test]
async fn pick_flow_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"ContactID": "C1", "ANI": "555", "Queue": "Billing", "startTimeRAW": 20,
             "ContactDetails": "https://example.com/C1"},
            {"ContactID": "C2", "ANI": "", "DNIS": "", "startTimeRAW": 10}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_json(json!({"ContactID": "C1", "AgentARN": "arn:agent/1", "AgentName": "Jo"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut h = Harness::new(&server).await;

    let start = h.app.start();
    assert_eq!(h.run(start), 1);
    assert!(h.step().await.is_empty());
    let ids: Vec<_> = h.app.rows.iter().map(|r| r.contact_id.as_str()).collect();
    assert_eq!(ids, vec!["C1"]);
    assert_eq!(h.app.rows[0].link, "https://example.com/C1");

    h.app.toggle_focused();
    let pick = h.app.activate_pick();
    assert_eq!(h.run(pick), 1);
    assert!(h.app.picking.is_some());

    let follow_up = h.step().await;
    assert_eq!(follow_up.len(), 1);
    assert!(h.app.picking.is_none());
    assert!(!h.app.selection.contains("C1"));
    assert_eq!(h.app.confirm.as_deref(), Some(PICK_SUCCESS_MESSAGE));

    h.run(follow_up);
    h.step().await;
    assert_eq!(h.app.fetches_in_flight, 0);
    assert_eq!(h.app.rows.len(), 1);
}

#[tokio::test]
async fn rejected_pick_keeps_selection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"ContactID": "C1", "ANI": "555", "startTimeRAW": 1}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(409))
        .mount(&server)
        .await;

    let mut h = Harness::new(&server).await;
    let start = h.app.start();
    h.run(start);
    h.step().await;

    h.app.toggle_focused();
    let pick = h.app.activate_pick();
    h.run(pick);
    assert!(h.step().await.is_empty());

    assert!(h.app.picking.is_none());
    assert!(h.app.selection.contains("C1"));
    assert_eq!(
        h.app.confirm.as_deref(),
        Some("Oh No! There was an error picking the contact.")
    );
}

#[tokio::test]
async fn claimed_contact_never_hits_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"ContactID": "C1", "ANI": "555", "Agent": "Jane", "startTimeRAW": 1}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut h = Harness::new(&server).await;
    let start = h.app.start();
    h.run(start);
    h.step().await;

    h.app.toggle_focused();
    assert!(h.app.activate_pick().is_empty());
    assert_eq!(
        h.app.confirm.as_deref(),
        Some("Contacts with agents cannot be picked")
    );
}
