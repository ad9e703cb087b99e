//! Wallet bound to an RPC provider.
//!
//! The wallet is the authentication context for encryption: it signs the
//! inline secrets so the DON can attribute them to the request owner.

use k256::ecdsa::SigningKey;
use tracing::debug;

use crate::core::abi::keccak256;
use crate::core::rpc::RpcProvider;
use crate::error::{Result, SignerError};

/// secp256k1 signing key connected to a network.
pub struct Wallet {
    key: SigningKey,
    address: [u8; 20],
    provider: RpcProvider,
}

impl Wallet {
    /// Bind a hex private key (with or without `0x`) to a provider.
    ///
    /// # Errors
    ///
    /// Returns `SignerError::InvalidKey` if the key is not valid hex or not a
    /// valid secp256k1 scalar.
    pub fn connect(private_key: &str, provider: RpcProvider) -> Result<Self> {
        let raw = private_key.trim();
        let raw = raw.strip_prefix("0x").unwrap_or(raw);

        let bytes = zeroize::Zeroizing::new(
            hex::decode(raw).map_err(|e| SignerError::InvalidKey(e.to_string()))?,
        );
        let key =
            SigningKey::from_slice(&bytes).map_err(|e| SignerError::InvalidKey(e.to_string()))?;

        let address = address_of(&key);
        debug!(address = %checksum(&address), rpc = %provider.url(), "wallet connected");

        Ok(Self {
            key,
            address,
            provider,
        })
    }

    /// EIP-55 checksummed address.
    pub fn address(&self) -> String {
        checksum(&self.address)
    }

    /// Provider this wallet is bound to.
    pub fn provider(&self) -> &RpcProvider {
        &self.provider
    }

    /// Sign a message with the Ethereum personal-message prefix.
    ///
    /// Returns `0x` followed by the 65-byte `r || s || v` signature.
    pub fn sign_message(&self, message: &[u8]) -> Result<String> {
        let digest = hash_message(message);
        let (signature, recovery_id) = self
            .key
            .sign_prehash_recoverable(&digest)
            .map_err(|e| SignerError::SigningFailed(e.to_string()))?;

        let mut bytes = signature.to_bytes().to_vec();
        bytes.push(27 + recovery_id.to_byte());
        Ok(format!("0x{}", hex::encode(bytes)))
    }
}

/// EIP-191 hash of a personal message.
pub fn hash_message(message: &[u8]) -> [u8; 32] {
    let mut data = format!("\x19Ethereum Signed Message:\n{}", message.len()).into_bytes();
    data.extend_from_slice(message);
    keccak256(&data)
}

fn address_of(key: &SigningKey) -> [u8; 20] {
    let point = key.verifying_key().to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    address
}

/// EIP-55 mixed-case encoding of an address.
pub fn checksum(address: &[u8; 20]) -> String {
    let lower = hex::encode(address);
    let hash = keccak256(lower.as_bytes());

    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, ch) in lower.chars().enumerate() {
        let nibble = (hash[i / 2] >> (if i % 2 == 0 { 4 } else { 0 })) & 0x0f;
        if nibble >= 8 {
            out.push(ch.to_ascii_uppercase());
        } else {
            out.push(ch);
        }
    }
    out
}
