//! Secrets encryption.
//!
//! Provides the encryptor abstraction and the network-backed implementation.
//!
//! ## Formats
//!
//! - **Secrets URLs**: space-joined URL list, ECIES-encrypted to the DON
//!   public key.
//! - **Inline secrets**: JSON map signed by the wallet, ECIES-encrypted to the
//!   DON public key, then TDH2-encrypted to the DON threshold key.
//!
//! ## Adding a New Encryptor
//!
//! 1. Implement the `SecretsEncryptor` trait
//! 2. Pass it to `workflow::encrypt` or `workflow::encrypt_and_publish`

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::core::constants;
use crate::core::types::{EncryptedPayload, EncryptedSecrets, SecretsBundle};
use crate::error::{CipherError, Result};

pub mod ecies;
mod manager;
pub mod tdh2;

pub use manager::SecretsManager;

/// Encryption backend trait.
///
/// Implementations are bound to a router address and DON id at construction
/// and must be initialized before encrypting.
#[async_trait]
pub trait SecretsEncryptor: Send + Sync {
    /// Resolve whatever network state is needed before encrypting.
    ///
    /// # Errors
    ///
    /// Returns an error if the router or DON cannot be resolved.
    async fn initialize(&mut self) -> Result<()>;

    /// Encrypt a list of hosted secrets URLs.
    ///
    /// # Returns
    ///
    /// `0x`-prefixed hex string.
    async fn encrypt_secrets_urls(&self, urls: &[String]) -> Result<String>;

    /// Encrypt a map of named plaintext values.
    async fn encrypt_secrets(&self, secrets: &BTreeMap<String, String>) -> Result<EncryptedSecrets>;

    /// Encrypt a bundle, dispatching on its shape.
    async fn encrypt(&self, bundle: &SecretsBundle) -> Result<EncryptedPayload> {
        match bundle {
            SecretsBundle::Urls(urls) => self.encrypt_secrets_urls(urls).await.map(EncryptedPayload::Urls),
            SecretsBundle::Named(secrets) => {
                self.encrypt_secrets(secrets).await.map(EncryptedPayload::Secrets)
            }
        }
    }
}

/// Build a URL-list bundle from an optional configured URL.
///
/// # Errors
///
/// Returns `CipherError::InvalidSecrets` if the URL is not set.
pub fn urls_bundle(url: Option<&str>) -> Result<SecretsBundle> {
    let url = url.ok_or_else(|| {
        CipherError::InvalidSecrets(format!("{} is not set", constants::SECRETS_URL_VAR))
    })?;
    Ok(SecretsBundle::url(url))
}

/// Build a named bundle holding the configured secret under its fixed name.
///
/// # Errors
///
/// Returns `CipherError::InvalidSecrets` if the value is not set.
pub fn named_bundle(value: Option<&str>) -> Result<SecretsBundle> {
    let value = value.ok_or_else(|| {
        CipherError::InvalidSecrets(format!("{} is not set", constants::SECRET_VALUE_VAR))
    })?;
    Ok(SecretsBundle::named(constants::SECRET_NAME, value))
}
