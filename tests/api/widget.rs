use std::sync::Arc;

use ghost_signup::signup::SignupWidget;
use ghost_signup::storage::{FileStore, Flag, FlagStorage, MemoryStore};
use ghost_signup::ui::{ElementId, HiddenReason, Page, UiController, UiState};
use wiremock::ResponseTemplate;

use crate::helpers::{DISPLAY_DURATION, spawn_app};

#[tokio::test]
async fn first_visit_shows_the_form() {
    let app = spawn_app().await;

    assert_eq!(app.widget().load(), UiState::FormVisible);
    assert!(app.application.page().is_visible(ElementId::Form));
}

#[tokio::test]
async fn dismissing_twice_keeps_the_flag_set() {
    let app = spawn_app().await;

    app.widget().dismiss();
    app.widget().dismiss();

    assert!(app.storage().is_set(Flag::PermanentlyDismissed));
    assert!(!app.application.page().is_visible(ElementId::Wrapper));
    assert_eq!(
        app.widget().load(),
        UiState::Hidden(HiddenReason::Dismissed)
    );
}

#[tokio::test]
async fn marking_subscribed_hides_the_form_until_reset() {
    let app = spawn_app().await;
    assert!(app.widget().should_show_form());

    app.widget().mark_subscribed();
    assert!(!app.widget().should_show_form());

    app.widget().reset();
    assert!(app.widget().should_show_form());
}

#[tokio::test]
async fn a_successful_signup_hides_the_form_on_the_next_page_load() {
    let app = spawn_app().await;
    app.mount_token("tok").await;
    app.mount_magic_link(ResponseTemplate::new(201)).await;

    app.subscribe("user@example.com").await;

    assert_eq!(
        app.widget().load(),
        UiState::Hidden(HiddenReason::AlreadySubscribed)
    );
}

fn widget_over(storage: FlagStorage) -> (SignupWidget, Arc<Page>) {
    let page = Arc::new(Page::new(true));
    let controller = UiController::new(storage, page.clone(), DISPLAY_DURATION);
    let ghost_client = ghost_signup::ghost_client::GhostClient::new(
        "6.0".into(),
        std::time::Duration::from_secs(2),
    )
    .unwrap();
    (SignupWidget::new(ghost_client, controller), page)
}

#[test]
fn dismissal_survives_a_new_session_but_a_signup_does_not() {
    let path = std::env::temp_dir()
        .join(format!("ghost-signup-{}", uuid::Uuid::new_v4()))
        .join("permanent.json");
    let permanent = Arc::new(FileStore::new(&path));

    let (first_session, _) = widget_over(FlagStorage::new(
        Arc::new(MemoryStore::new()),
        permanent.clone(),
    ));
    first_session.mark_subscribed();
    assert!(!first_session.should_show_form());

    let (second_session, _) = widget_over(FlagStorage::new(
        Arc::new(MemoryStore::new()),
        permanent.clone(),
    ));
    assert!(second_session.should_show_form());
    second_session.dismiss();

    let (third_session, page) = widget_over(FlagStorage::new(
        Arc::new(MemoryStore::new()),
        Arc::new(FileStore::new(&path)),
    ));
    assert!(third_session.load().is_hidden());
    assert!(!page.is_visible(ElementId::Wrapper));
}

#[tokio::test]
async fn disabled_storage_still_lets_readers_subscribe() {
    let app = spawn_app().await;
    app.mount_token("tok").await;
    app.mount_magic_link(ResponseTemplate::new(201)).await;

    let (widget, _page) = widget_over(FlagStorage::unavailable());
    widget.dismiss();
    assert!(widget.should_show_form());

    let result = widget
        .subscribe(
            "user@example.com",
            &app.ghost_server.uri(),
            &Default::default(),
        )
        .await;

    assert!(result.success);
    assert_eq!(widget.load(), UiState::FormVisible);
}
