//! Credentials held in configuration
//!
//! The PostgreSQL connection string and the extraction API key are wrapped in
//! [`SecretString`] as soon as they are parsed. The value is zeroed on drop,
//! redacted in `Debug` output, and only readable through `expose_secret()`.
//!
//! ```rust
//! use curator::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let dsn = secret_string("postgresql://curator:pw@db:5432/curator".to_string());
//! assert!(!format!("{dsn:?}").contains("pw"));
//! assert_eq!(dsn.expose_secret().redacted_host(), "***@db:5432/curator");
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// String payload of a [`SecretString`]
#[derive(Clone, Zeroize, Serialize, Deserialize)]
#[serde(transparent)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}

impl std::fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as DebugSecret>::debug_secret(f)
    }
}
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl SecretValue {
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }

    /// Everything after the last `@`, safe to print for connection strings
    pub fn redacted_host(&self) -> String {
        match self.0.rsplit_once('@') {
            Some((_, host)) => format!("***@{host}"),
            None => "***".to_string(),
        }
    }
}

/// A configuration value that must not end up in logs
pub type SecretString = Secret<SecretValue>;

/// Wraps a plain string read from the environment or a config file
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_debug_is_redacted() {
        let key = secret_string("sk-extraction-key".to_string());
        let debug_output = format!("{key:?}");
        assert!(!debug_output.contains("sk-extraction-key"));
        assert!(debug_output.contains("REDACTED"));
    }

    #[test]
    fn test_blank_value_is_empty() {
        assert!(secret_string("  ".to_string()).expose_secret().is_empty());
        assert!(!secret_string("x".to_string()).expose_secret().is_empty());
    }

    #[test]
    fn test_redacted_host() {
        let value = SecretValue::from("postgresql://user:pw@db:5432/curator".to_string());
        assert_eq!(value.redacted_host(), "***@db:5432/curator");
        assert_eq!(SecretValue::from("opaque".to_string()).redacted_host(), "***");
    }

    #[test]
    fn test_deserializes_from_plain_string() {
        #[derive(Deserialize)]
        struct Section {
            api_key: SecretString,
        }

        let section: Section = toml::from_str("api_key = \"k-123\"").unwrap();
        assert_eq!(section.api_key.expose_secret(), "k-123");
    }
}
