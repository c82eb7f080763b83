use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::{
    domain::{IntegrityToken, SubscribeOptions, SubscriberEmail, SubscriptionRequest},
    error::{GENERIC_ERROR_MESSAGE, TokenFetchError},
};

/// How the platform answered a signup submission.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// 201: the magic link is on its way.
    Accepted,
    Rejected(String),
    /// No response at all.
    NetworkFailure(reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<ErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    message: Option<String>,
}

/// Talks to the members API of the newsletter platform.
#[derive(Debug, Clone)]
pub struct GhostClient {
    http_client: Client,
    client_version: String,
}

impl GhostClient {
    pub fn new(
        client_version: String,
        timeout: std::time::Duration,
    ) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            client_version,
        })
    }

    #[tracing::instrument(name = "Fetching an integrity token", skip(self))]
    pub async fn fetch_integrity_token(
        &self,
        base_url: &str,
    ) -> Result<IntegrityToken, TokenFetchError> {
        let url = format!("{}/members/api/integrity-token/", trim_base(base_url));
        let response = self
            .http_client
            .get(url)
            .header("app-pragma", "no-cache")
            .header("x-ghost-version", &self.client_version)
            .send()
            .await
            .map_err(TokenFetchError::Network)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "Integrity token request was refused");
            return Err(TokenFetchError::Status(status));
        }

        let raw = response.text().await.map_err(TokenFetchError::Network)?;
        Ok(IntegrityToken::new(raw))
    }

    #[tracing::instrument(
        name = "Submitting a subscription",
        skip(self, token, options),
        fields(subscriber_email = %email)
    )]
    pub async fn submit(
        &self,
        base_url: &str,
        email: &SubscriberEmail,
        token: IntegrityToken,
        options: &SubscribeOptions,
    ) -> SubmitOutcome {
        let url = format!("{}/members/api/send-magic-link", trim_base(base_url));
        let response = match self
            .http_client
            .post(url)
            .header("Content-Type", "application/json; charset=utf-8")
            .json(&SubscriptionRequest::new(email, &token, options))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return SubmitOutcome::NetworkFailure(e),
        };

        let status = response.status();
        if status == StatusCode::CREATED {
            return SubmitOutcome::Accepted;
        }

        let text = response.text().await.unwrap_or_default();
        let message = rejection_message(&text);
        tracing::warn!(%status, %message, "Subscription was rejected");
        SubmitOutcome::Rejected(message)
    }
}

fn trim_base(base_url: &str) -> &str {
    base_url.trim_end_matches('/')
}

/// First `errors[].message` of an error body, or the generic text when the
/// body is not the expected JSON.
fn rejection_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.errors.into_iter().next())
        .and_then(|e| e.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string())
}
