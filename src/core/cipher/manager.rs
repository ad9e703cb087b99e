//! Router-bound secrets manager.
//!
//! Resolves the DON coordinator through the Functions router, fetches the
//! DON's encryption keys from it and encrypts secrets for that DON.

use std::collections::BTreeMap;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use serde::Serialize;
use tracing::{debug, trace};

use super::{ecies, tdh2, SecretsEncryptor};
use crate::core::abi;
use crate::core::constants;
use crate::core::signer::Wallet;
use crate::core::types::EncryptedSecrets;
use crate::core::validation;
use crate::error::{CipherError, Result};

const GET_CONTRACT_BY_ID: &str = "getContractById(bytes32)";
const GET_DON_PUBLIC_KEY: &str = "getDONPublicKey()";
const GET_THRESHOLD_PUBLIC_KEY: &str = "getThresholdPublicKey()";

const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Encryption keys published by a DON coordinator.
struct DonKeys {
    don_public_key: k256::PublicKey,
    threshold_public_key: tdh2::PublicKey,
}

#[derive(Serialize)]
struct SignedSecrets<'a> {
    message: &'a str,
    signature: &'a str,
}

/// Secrets manager bound to a wallet, router and DON.
pub struct SecretsManager {
    wallet: Wallet,
    router_address: String,
    don_id: String,
    coordinator: Option<String>,
}

impl SecretsManager {
    /// Create an uninitialized manager.
    pub fn new(wallet: Wallet, router_address: impl Into<String>, don_id: impl Into<String>) -> Self {
        Self {
            wallet,
            router_address: router_address.into(),
            don_id: don_id.into(),
            coordinator: None,
        }
    }

    /// Coordinator address resolved by `initialize`.
    pub fn coordinator(&self) -> Option<&str> {
        self.coordinator.as_deref()
    }

    /// Wallet used for signing.
    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    fn require_coordinator(&self) -> Result<&str> {
        self.coordinator
            .as_deref()
            .ok_or_else(|| CipherError::NotInitialized.into())
    }

    async fn fetch_don_public_key(&self, coordinator: &str) -> Result<k256::PublicKey> {
        let data = self
            .wallet
            .provider()
            .call(coordinator, &abi::encode_call(GET_DON_PUBLIC_KEY))
            .await?;
        ecies::parse_public_key(&abi::decode_bytes(&data)?)
    }

    async fn fetch_keys(&self) -> Result<DonKeys> {
        let coordinator = self.require_coordinator()?;

        let don_public_key = self.fetch_don_public_key(coordinator).await?;

        let data = self
            .wallet
            .provider()
            .call(coordinator, &abi::encode_call(GET_THRESHOLD_PUBLIC_KEY))
            .await?;
        let threshold_public_key = tdh2::PublicKey::from_json(&abi::decode_bytes(&data)?)?;

        trace!(coordinator, "fetched DON keys");
        Ok(DonKeys {
            don_public_key,
            threshold_public_key,
        })
    }
}

#[async_trait]
impl SecretsEncryptor for SecretsManager {
    async fn initialize(&mut self) -> Result<()> {
        if self.coordinator.is_some() {
            return Ok(());
        }

        let don_id = abi::bytes32_string(&self.don_id)?;
        let data = self
            .wallet
            .provider()
            .call(
                &self.router_address,
                &abi::encode_call_bytes32(GET_CONTRACT_BY_ID, &don_id),
            )
            .await?;

        let coordinator = abi::decode_address(&data)?;
        if coordinator == ZERO_ADDRESS {
            return Err(CipherError::UnknownDon(self.don_id.clone()).into());
        }

        debug!(
            router = %self.router_address,
            don_id = %self.don_id,
            coordinator = %coordinator,
            "secrets manager initialized"
        );
        self.coordinator = Some(coordinator);
        Ok(())
    }

    async fn encrypt_secrets_urls(&self, urls: &[String]) -> Result<String> {
        let coordinator = self.require_coordinator()?;

        if urls.is_empty() {
            return Err(CipherError::InvalidSecrets("must provide at least one secrets URL".into()).into());
        }
        for url in urls {
            validation::validate_secrets_url(url)?;
        }

        let don_public_key = self.fetch_don_public_key(coordinator).await?;
        let encrypted = ecies::encrypt(&don_public_key, urls.join(" ").as_bytes())?;

        debug!(urls = urls.len(), "encrypted secrets URLs");
        Ok(format!("0x{}", hex::encode(encrypted.to_bytes())))
    }

    async fn encrypt_secrets(&self, secrets: &BTreeMap<String, String>) -> Result<EncryptedSecrets> {
        self.require_coordinator()?;

        if secrets.is_empty() {
            return Err(CipherError::InvalidSecrets("secrets are empty".into()).into());
        }

        let keys = self.fetch_keys().await?;

        let message = serde_json::to_string(secrets)
            .map_err(|e| CipherError::EncryptionFailed(e.to_string()))?;
        let signature = self.wallet.sign_message(message.as_bytes())?;
        let signed = serde_json::to_string(&SignedSecrets {
            message: &message,
            signature: &signature,
        })
        .map_err(|e| CipherError::EncryptionFailed(e.to_string()))?;

        let don_encrypted = ecies::encrypt(&keys.don_public_key, signed.as_bytes())?;

        let mut slots = BTreeMap::new();
        slots.insert(constants::DON_KEY_SLOT, B64.encode(don_encrypted.to_bytes()));
        let wrapped = serde_json::to_vec(&slots)
            .map_err(|e| CipherError::EncryptionFailed(e.to_string()))?;

        let threshold_encrypted = tdh2::encrypt(&keys.threshold_public_key, &wrapped)?;

        debug!(secrets = secrets.len(), "encrypted inline secrets");
        Ok(EncryptedSecrets {
            encrypted_secrets: format!("0x{}", hex::encode(threshold_encrypted)),
        })
    }
}
