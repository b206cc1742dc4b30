//! Client configuration for the remote gateway.
//!
//! The endpoint and credential live in an explicit state holder handed to
//! the gateway rather than a process-wide store, keeping the pipeline free
//! of ambient globals and unit-testable.

use crate::error::{Error, Result};

/// Endpoint and credential for the hosted mailbox backend.
#[derive(Debug, Clone, Default)]
pub struct ClientSettings {
    api_base_url: Option<String>,
    auth_token: Option<String>,
}

impl ClientSettings {
    /// Creates settings with both values present.
    pub fn new(api_base_url: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            api_base_url: Some(api_base_url.into()),
            auth_token: Some(auth_token.into()),
        }
    }

    /// Creates empty settings; every gateway call will fail fast with a
    /// configuration error until both values are set.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self::default()
    }

    /// Sets the API base URL.
    pub fn set_api_base_url(&mut self, url: impl Into<String>) {
        self.api_base_url = Some(url.into());
    }

    /// Sets the auth token.
    pub fn set_auth_token(&mut self, token: impl Into<String>) {
        self.auth_token = Some(token.into());
    }

    /// Whether both the base URL and the token are present.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.require().is_ok()
    }

    /// Returns `(base_url, token)`, with any trailing slash on the base
    /// URL stripped.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when either value is missing or
    /// empty. This is checked before any network attempt.
    pub fn require(&self) -> Result<(&str, &str)> {
        let base = self
            .api_base_url
            .as_deref()
            .map(|s| s.trim_end_matches('/'))
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::Config("API base URL is not configured".to_string()))?;

        let token = self
            .auth_token
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::Config("auth token is not configured".to_string()))?;

        Ok((base, token))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_require_configured() {
        let settings = ClientSettings::new("https://mail.example.com/", "secret");
        let (base, token) = settings.require().unwrap();
        assert_eq!(base, "https://mail.example.com");
        assert_eq!(token, "secret");
    }

    #[test]
    fn test_require_missing_url() {
        let mut settings = ClientSettings::unconfigured();
        settings.set_auth_token("secret");
        let err = settings.require().unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_require_empty_token() {
        let settings = ClientSettings::new("https://mail.example.com", "");
        assert!(!settings.is_configured());
    }
}
