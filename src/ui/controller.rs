use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use crate::{
    storage::{Flag, FlagStorage},
    ui::{
        render::{Renderer, render},
        state::{HiddenReason, UiState},
    },
};

/// Owns what the page currently shows and moves it between states.
///
/// Timed messages revert through a spawned task that is never cancelled.
/// A new action taken while a message is up can be overwritten when the
/// old timer fires.
#[derive(Clone)]
pub struct UiController {
    storage: FlagStorage,
    renderer: Arc<dyn Renderer>,
    display_duration: Duration,
    state: Arc<Mutex<UiState>>,
}

impl UiController {
    pub fn new(
        storage: FlagStorage,
        renderer: Arc<dyn Renderer>,
        display_duration: Duration,
    ) -> Self {
        Self {
            storage,
            renderer,
            display_duration,
            state: Arc::new(Mutex::new(UiState::FormVisible)),
        }
    }

    pub fn storage(&self) -> &FlagStorage {
        &self.storage
    }

    pub fn state(&self) -> UiState {
        self.state
            .lock()
            .map(|s| s.clone())
            .unwrap_or(UiState::FormVisible)
    }

    pub fn should_show_form(&self) -> bool {
        !self.storage.is_set(Flag::SubscribedThisSession)
            && !self.storage.is_set(Flag::PermanentlyDismissed)
    }

    /// Page-load decision.
    #[tracing::instrument(name = "Deciding initial widget visibility", skip(self))]
    pub fn load(&self) -> UiState {
        let state = UiState::initial(
            self.storage.is_set(Flag::SubscribedThisSession),
            self.storage.is_set(Flag::PermanentlyDismissed),
        );
        tracing::info!(?state, "Widget loaded");
        self.apply(state.clone());
        state
    }

    pub fn show_inline_error(&self, message: &str) {
        self.apply_timed(UiState::InlineError(message.to_string()));
    }

    pub fn show_success(&self, message: &str) {
        self.storage.raise(Flag::SubscribedThisSession);
        self.apply_timed(UiState::SuccessVisible(message.to_string()));
    }

    pub fn show_error(&self, message: &str) {
        self.apply_timed(UiState::ErrorVisible(message.to_string()));
    }

    pub fn dismiss(&self) {
        self.storage.raise(Flag::PermanentlyDismissed);
        self.apply(UiState::Hidden(HiddenReason::Dismissed));
    }

    fn apply(&self, state: UiState) {
        render(&state, self.renderer.as_ref());
        match self.state.lock() {
            Ok(mut current) => *current = state,
            Err(_) => tracing::warn!("Widget state lock is poisoned"),
        }
    }

    fn apply_timed(&self, state: UiState) {
        let next = state.after_display();
        self.apply(state);

        let Some(next) = next else {
            return;
        };
        let controller = self.clone();
        let delay = self.display_duration;
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    tokio::time::sleep(delay).await;
                    controller.apply(next);
                });
            }
            Err(_) => {
                tracing::warn!("No async runtime to time the message, reverting at once");
                controller.apply(next);
            }
        }
    }
}
