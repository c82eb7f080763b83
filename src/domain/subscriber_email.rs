use crate::error::INVALID_EMAIL_MESSAGE;

/// An address the platform will be asked to subscribe.
///
/// Only the presence of an `@` is checked here; real validation happens
/// server side and a bad address comes back as a rejection.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriberEmail(String);

impl SubscriberEmail {
    pub fn parse(s: String) -> Result<Self, String> {
        let s = s.trim().to_string();
        if s.contains('@') {
            Ok(Self(s))
        } else {
            Err(INVALID_EMAIL_MESSAGE.to_string())
        }
    }
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriberEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
