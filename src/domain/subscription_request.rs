use serde::Serialize;

use crate::domain::{IntegrityToken, SubscriberEmail};

/// Optional extras a host page may attach to a signup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubscribeOptions {
    pub name: Option<String>,
    pub newsletters: Vec<String>,
}

impl SubscribeOptions {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_newsletter(mut self, id: impl Into<String>) -> Self {
        self.newsletters.push(id.into());
        self
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct NewsletterRef<'a> {
    pub id: &'a str,
}

/// Body of `POST /members/api/send-magic-link`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRequest<'a> {
    email: &'a str,
    email_type: &'static str,
    integrity_token: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    newsletters: Option<Vec<NewsletterRef<'a>>>,
}

impl<'a> SubscriptionRequest<'a> {
    pub fn new(
        email: &'a SubscriberEmail,
        token: &'a IntegrityToken,
        options: &'a SubscribeOptions,
    ) -> Self {
        let name = options
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty());
        let newsletters: Vec<NewsletterRef<'a>> = options
            .newsletters
            .iter()
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
            .map(|id| NewsletterRef { id })
            .collect();

        Self {
            email: email.as_ref(),
            email_type: "subscribe",
            integrity_token: token.expose(),
            name,
            newsletters: if newsletters.is_empty() {
                None
            } else {
                Some(newsletters)
            },
        }
    }
}
