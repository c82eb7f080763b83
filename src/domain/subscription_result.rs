use serde::Serialize;

/// What `subscribe` hands back to the caller.
///
/// Exactly one of `message` and `error` is set, matching `success`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubscriptionResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubscriptionResult {
    pub fn succeeded(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
        }
    }
}
