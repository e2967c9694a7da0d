//! End-to-end runtime tests: real coordinator, channel gateway and popup
//! against a mock auth service.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use aegis_core::{
    Config, Coordinator, Database, Notification, Notifier, TabDescriptor, TabId,
};
use aegis_runtime::{spawn_background, BackgroundHandle, ChannelTabs, Popup, PopupView, PASSWORD_POLICY_ERROR};

#[derive(Default)]
struct RecordingNotifier {
    notes: Mutex<Vec<Notification>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notes.lock().push(notification);
    }
}

fn start_runtime(
    server_uri: &str,
) -> (BackgroundHandle, Arc<ChannelTabs>, Arc<RecordingNotifier>) {
    let config = Config {
        database_path: PathBuf::from("unused"),
        api_base_url: Url::parse(server_uri).unwrap(),
        injection_settle: Duration::from_millis(1),
    };
    let tabs = Arc::new(ChannelTabs::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let coordinator = Coordinator::with_database(
        &config,
        Database::open_in_memory().unwrap(),
        tabs.clone(),
        notifier.clone(),
    );
    (spawn_background(coordinator), tabs, notifier)
}

async fn mock_auth_service(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/signin"))
        .and(body_json(json!({"email": "a@b.com", "password": "Valid1!x"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": {"token": "T1", "email": "a@b.com", "name": "Dr. A", "role": "doctor"}
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/verifytoken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "user": {"email": "a@b.com", "name": "Dr. A"}
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_login_and_logout_flow() {
    let server = MockServer::start().await;
    mock_auth_service(&server).await;
    let (background, _tabs, _notifier) = start_runtime(&server.uri());

    let mut popup = Popup::new(background.clone());
    assert_eq!(*popup.view(), PopupView::Loading);

    popup.open().await;
    assert_eq!(*popup.view(), PopupView::Login { error: None });

    popup.submit_login("a@b.com", "Valid1!x", None).await;
    match popup.view() {
        PopupView::Protected { user } => {
            assert_eq!(user.email, "a@b.com");
            assert_eq!(user.name, "Dr. A");
            assert_eq!(user.role, "doctor");
        }
        other => panic!("expected protected view, got {other:?}"),
    }

    popup.logout().await;
    assert_eq!(*popup.view(), PopupView::Login { error: None });

    // The session is gone for every later context, not just this popup.
    let reply = background.check_auth().await.unwrap();
    assert!(!reply.is_logged_in);
    assert!(reply.success);
}

#[tokio::test]
async fn test_password_gate_blocks_before_network() {
    let server = MockServer::start().await;
    let (background, _tabs, _notifier) = start_runtime(&server.uri());

    let mut popup = Popup::new(background);
    popup.open().await;

    popup.submit_login("a@b.com", "abc12345", None).await;
    assert_eq!(
        *popup.view(),
        PopupView::Login {
            error: Some(PASSWORD_POLICY_ERROR.to_string())
        }
    );

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_rejected_credentials_show_remote_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/signin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "message": "Invalid credentials"
        })))
        .mount(&server)
        .await;
    let (background, _tabs, _notifier) = start_runtime(&server.uri());

    let mut popup = Popup::new(background);
    popup.open().await;

    popup.submit_login("a@b.com", "Wrong1!pw", None).await;
    assert_eq!(
        *popup.view(),
        PopupView::Login {
            error: Some("Invalid credentials".to_string())
        }
    );
}

#[tokio::test]
async fn test_check_auth_without_token_is_offline() {
    let server = MockServer::start().await;
    let (background, _tabs, _notifier) = start_runtime(&server.uri());

    let mut popup = Popup::new(background);
    popup.open().await;
    assert_eq!(*popup.view(), PopupView::Login { error: None });

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_icon_click_injects_and_toggles_panel() {
    let server = MockServer::start().await;
    let (background, tabs, _notifier) = start_runtime(&server.uri());

    let tab = TabDescriptor {
        id: TabId(1),
        url: "https://example.com".to_string(),
    };
    tabs.open_tab(tab.id, &tab.url);
    assert!(!tabs.has_bridge(tab.id));

    background.icon_clicked(tab.clone()).await.unwrap();
    // Commands run in order; this reply means the click is fully handled.
    background.check_auth().await.unwrap();

    let status = tabs.bridge_status(tab.id).await.unwrap();
    assert!(status.panel_open);

    // Second click reuses the live bridge and closes the panel cleanly.
    background.icon_clicked(tab.clone()).await.unwrap();
    background.check_auth().await.unwrap();

    let status = tabs.bridge_status(tab.id).await.unwrap();
    assert!(!status.panel_open);
    assert_eq!(status.listener_count, 0);
    assert_eq!(status.container_node_count, 0);
}

#[tokio::test]
async fn test_icon_click_on_restricted_tab_notifies() {
    let server = MockServer::start().await;
    let (background, tabs, notifier) = start_runtime(&server.uri());

    let tab = TabDescriptor {
        id: TabId(2),
        url: "chrome://settings".to_string(),
    };
    tabs.open_tab(tab.id, &tab.url);

    background.icon_clicked(tab.clone()).await.unwrap();
    background.check_auth().await.unwrap();

    assert!(!tabs.has_bridge(tab.id));
    let notes = notifier.notes.lock();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0], Notification::inject_error());
}
