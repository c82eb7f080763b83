use secrecy::{ExposeSecret, SecretString};

/// Short-lived credential handed out by the integrity-token endpoint.
///
/// The client never looks inside it. It is good for exactly one
/// subsequent submission and is never persisted.
#[derive(Debug)]
pub struct IntegrityToken(SecretString);

impl IntegrityToken {
    pub fn new(raw: String) -> Self {
        Self(SecretString::new(raw.into()))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}
