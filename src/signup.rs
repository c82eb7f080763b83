use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use crate::{
    domain::{SubscribeOptions, SubscriberEmail, SubscriptionResult},
    error::{SUCCESS_MESSAGE, SubscribeError},
    ghost_client::{GhostClient, SubmitOutcome},
    storage::Flag,
    ui::{UiController, UiState},
};

/// Public face of the widget: the page-load check, the signup flow and the
/// dismiss action.
#[derive(Clone)]
pub struct SignupWidget {
    ghost_client: GhostClient,
    controller: UiController,
    in_flight: Arc<AtomicBool>,
}

/// Released on drop so an early return cannot leave the widget locked.
struct InFlightGuard(Arc<AtomicBool>);

impl InFlightGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag.clone()))
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl SignupWidget {
    pub fn new(ghost_client: GhostClient, controller: UiController) -> Self {
        Self {
            ghost_client,
            controller,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn controller(&self) -> &UiController {
        &self.controller
    }

    pub fn load(&self) -> UiState {
        self.controller.load()
    }

    pub fn should_show_form(&self) -> bool {
        self.controller.should_show_form()
    }

    #[tracing::instrument(name = "Dismissing the signup widget", skip(self))]
    pub fn dismiss(&self) {
        self.controller.dismiss();
    }

    pub fn mark_subscribed(&self) {
        self.controller.storage().raise(Flag::SubscribedThisSession);
    }

    /// Clears both flags. Meant for debugging and tests.
    #[tracing::instrument(name = "Resetting stored signup flags", skip(self))]
    pub fn reset(&self) {
        let storage = self.controller.storage();
        storage.lower(Flag::SubscribedThisSession);
        storage.lower(Flag::PermanentlyDismissed);
    }

    #[tracing::instrument(
        name = "Subscribing a reader",
        skip_all,
        fields(subscriber_email = %email, base_url = %base_url)
    )]
    pub async fn subscribe(
        &self,
        email: &str,
        base_url: &str,
        options: &SubscribeOptions,
    ) -> SubscriptionResult {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            tracing::warn!("Ignoring a subscription while another one is running");
            return SubscriptionResult::failed(SubscribeError::InFlight.user_message());
        };

        match self.attempt(email, base_url, options).await {
            Ok(()) => {
                tracing::info!("Subscription accepted");
                self.controller.show_success(SUCCESS_MESSAGE);
                SubscriptionResult::succeeded(SUCCESS_MESSAGE)
            }
            Err(e) => {
                let message = e.user_message();
                match &e {
                    SubscribeError::InvalidInput(_) => {
                        tracing::info!("Rejected a malformed email address");
                        self.controller.show_inline_error(&message);
                    }
                    _ => {
                        tracing::error!(error = ?e, "Subscription failed");
                        self.controller.show_error(&message);
                    }
                }
                SubscriptionResult::failed(message)
            }
        }
    }

    async fn attempt(
        &self,
        email: &str,
        base_url: &str,
        options: &SubscribeOptions,
    ) -> Result<(), SubscribeError> {
        let email =
            SubscriberEmail::parse(email.to_string()).map_err(SubscribeError::InvalidInput)?;
        let token = self.ghost_client.fetch_integrity_token(base_url).await?;

        match self
            .ghost_client
            .submit(base_url, &email, token, options)
            .await
        {
            SubmitOutcome::Accepted => Ok(()),
            SubmitOutcome::Rejected(message) => Err(SubscribeError::Rejected(message)),
            SubmitOutcome::NetworkFailure(e) => Err(SubscribeError::Network(e)),
        }
    }
}
