use reqwest::StatusCode;

pub const INVALID_EMAIL_MESSAGE: &str = "Please enter a valid email address";
pub const NETWORK_ERROR_MESSAGE: &str =
    "Unable to connect. Please check your connection and try again.";
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong, please try again.";
pub const SUCCESS_MESSAGE: &str = "Success! Check your inbox to confirm your subscription.";
pub const IN_FLIGHT_MESSAGE: &str = "A subscription request is already in progress.";

/// Everything that can stop a signup attempt short of a 201.
///
/// None of these escape `SignupWidget::subscribe`; they are folded into a
/// `SubscriptionResult` there.
#[derive(thiserror::Error)]
pub enum SubscribeError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("The integrity token endpoint answered with {status}.")]
    TokenFetch { status: StatusCode },
    #[error("Failed to reach the newsletter platform.")]
    Network(#[source] reqwest::Error),
    #[error("The subscription was rejected: {0}")]
    Rejected(String),
    #[error("Another subscription request is still running.")]
    InFlight,
}

impl SubscribeError {
    /// Text shown in the error element.
    pub fn user_message(&self) -> String {
        match self {
            SubscribeError::InvalidInput(msg) => msg.clone(),
            SubscribeError::TokenFetch { .. } => GENERIC_ERROR_MESSAGE.to_string(),
            SubscribeError::Network(_) => NETWORK_ERROR_MESSAGE.to_string(),
            SubscribeError::Rejected(msg) => msg.clone(),
            SubscribeError::InFlight => IN_FLIGHT_MESSAGE.to_string(),
        }
    }
}

impl std::fmt::Debug for SubscribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<TokenFetchError> for SubscribeError {
    fn from(e: TokenFetchError) -> Self {
        match e {
            TokenFetchError::Status(status) => SubscribeError::TokenFetch { status },
            TokenFetchError::Network(e) => SubscribeError::Network(e),
        }
    }
}

#[derive(thiserror::Error)]
pub enum TokenFetchError {
    #[error("Integrity token request failed with status {0}.")]
    Status(StatusCode),
    #[error("Integrity token request never got a response.")]
    Network(#[source] reqwest::Error),
}

impl std::fmt::Debug for TokenFetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}
