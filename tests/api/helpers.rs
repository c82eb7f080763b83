use std::time::Duration;

use ghost_signup::configuration::get_configuration;
use ghost_signup::domain::{SubscribeOptions, SubscriptionResult};
use ghost_signup::signup::SignupWidget;
use ghost_signup::startup::Application;
use ghost_signup::storage::{Flag, FlagStorage};
use ghost_signup::telemetry::{get_subscriber, init_subscriber};
use once_cell::sync::Lazy;
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const DISPLAY_DURATION: Duration = Duration::from_millis(100);

// Tracing is initialised once for the whole test binary.
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info";
    let subscriber_name = "test";

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

pub struct TestApp {
    pub application: Application,
    // Stands in for the newsletter platform.
    pub ghost_server: MockServer,
}

impl TestApp {
    pub fn widget(&self) -> &SignupWidget {
        self.application.widget()
    }

    pub fn storage(&self) -> &FlagStorage {
        self.widget().controller().storage()
    }

    pub fn session_flag(&self) -> bool {
        self.storage().is_set(Flag::SubscribedThisSession)
    }

    pub async fn subscribe(&self, email: &str) -> SubscriptionResult {
        self.subscribe_with(email, &SubscribeOptions::default()).await
    }

    pub async fn subscribe_with(
        &self,
        email: &str,
        options: &SubscribeOptions,
    ) -> SubscriptionResult {
        self.widget()
            .subscribe(email, &self.ghost_server.uri(), options)
            .await
    }

    pub async fn mount_token(&self, token: &str) {
        Mock::given(path("/members/api/integrity-token/"))
            .and(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(token))
            .named("Integrity token")
            .mount(&self.ghost_server)
            .await;
    }

    pub async fn mount_magic_link(&self, response: ResponseTemplate) {
        Mock::given(path("/members/api/send-magic-link"))
            .and(method("POST"))
            .respond_with(response)
            .named("Send magic link")
            .mount(&self.ghost_server)
            .await;
    }

    pub fn magic_link_bodies(&self, requests: &[wiremock::Request]) -> Vec<serde_json::Value> {
        requests
            .iter()
            .filter(|r| r.url.path() == "/members/api/send-magic-link")
            .map(|r| serde_json::from_slice(&r.body).unwrap())
            .collect()
    }
}

pub async fn spawn_app() -> TestApp {
    Lazy::force(&TRACING);

    let ghost_server = MockServer::start().await;
    let configuration = {
        let mut config = get_configuration().expect("Failed to read configuration.");
        config.ghost.base_url = ghost_server.uri();
        config.ghost.timeout_milliseconds = 2000;
        config.ui.display_duration_milliseconds = DISPLAY_DURATION.as_millis() as u64;
        config.storage.enabled = true;
        config.storage.permanent_path = std::env::temp_dir()
            .join(format!("ghost-signup-{}", Uuid::new_v4()))
            .join("permanent.json");
        config
    };

    let application = Application::build(&configuration).expect("Failed to build application.");

    TestApp {
        application,
        ghost_server,
    }
}

/// An address nothing is listening on.
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", address)
}
