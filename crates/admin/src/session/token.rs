//! The backend API token.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Token issued by the backend's token-auth endpoint.
///
/// Sent as `Authorization: Token <value>` on authenticated calls. `Debug`
/// never prints the value.
#[derive(Clone)]
pub struct ApiToken(SecretString);

impl ApiToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// The raw token string.
    #[must_use]
    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }

    /// Value for the `Authorization` header.
    pub(crate) fn authorization(&self) -> String {
        format!("Token {}", self.0.expose_secret())
    }
}

impl std::fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiToken([REDACTED])")
    }
}

impl Serialize for ApiToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0.expose_secret())
    }
}

impl<'de> Deserialize<'de> for ApiToken {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_value() {
        let token = ApiToken::new("abc123");
        let debug = format!("{token:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("abc123"));
    }

    #[test]
    fn test_authorization_header_value() {
        assert_eq!(ApiToken::new("abc").authorization(), "Token abc");
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let token = ApiToken::new("abc");
        assert_eq!(serde_json::to_string(&token).unwrap(), "\"abc\"");

        let back: ApiToken = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(back.expose_secret(), "abc");
    }
}
