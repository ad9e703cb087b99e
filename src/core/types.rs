//! Domain types passed between workflow steps.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A secret's logical name (e.g., `apiKey`).
pub type SecretName = String;

/// Plaintext secrets in exactly one of the two accepted shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretsBundle {
    /// URLs of externally hosted secrets documents.
    Urls(Vec<String>),
    /// Named plaintext values.
    Named(BTreeMap<SecretName, String>),
}

impl SecretsBundle {
    /// Bundle holding a single URL.
    pub fn url(url: impl Into<String>) -> Self {
        Self::Urls(vec![url.into()])
    }

    /// Bundle holding a single named value.
    pub fn named(name: impl Into<String>, value: impl Into<String>) -> Self {
        let mut map = BTreeMap::new();
        map.insert(name.into(), value.into());
        Self::Named(map)
    }

    /// Number of entries in the bundle.
    pub fn len(&self) -> usize {
        match self {
            Self::Urls(urls) => urls.len(),
            Self::Named(map) => map.len(),
        }
    }

    /// Whether the bundle has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Inline secrets payload as consumed by a Functions request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedSecrets {
    #[serde(rename = "encryptedSecrets")]
    pub encrypted_secrets: String,
}

/// Opaque encryption output, forwarded as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncryptedPayload {
    /// `0x`-prefixed hex of the encrypted URL list.
    Urls(String),
    /// Threshold-encrypted named secrets.
    Secrets(EncryptedSecrets),
}

impl EncryptedPayload {
    /// JSON text suitable for hosting as a document.
    pub fn to_json(&self) -> serde_json::Result<String> {
        match self {
            Self::Urls(hex) => serde_json::to_string(hex),
            Self::Secrets(secrets) => serde_json::to_string(secrets),
        }
    }
}

impl fmt::Display for EncryptedPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Urls(hex) => f.write_str(hex),
            Self::Secrets(secrets) => f.write_str(&secrets.encrypted_secrets),
        }
    }
}
