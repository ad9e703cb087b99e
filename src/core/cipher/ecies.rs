//! ECIES encryption to the DON public key.
//!
//! Wire-compatible with the `eth-crypto` cipher format used by Functions
//! nodes: secp256k1 ECDH, SHA-512 key derivation, AES-256-CBC and an
//! HMAC-SHA256 tag.
//!
//! Serialized layout: `iv (16) || ephemeral key, compressed (33) || mac (32) || ciphertext`.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use hmac::{Hmac, Mac};
use k256::ecdh::diffie_hellman;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::{PublicKey, SecretKey};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256, Sha512};
use tracing::trace;

use crate::error::{CipherError, Result};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;
type HmacSha256 = Hmac<Sha256>;

const IV_LEN: usize = 16;
const COMPRESSED_KEY_LEN: usize = 33;
const MAC_LEN: usize = 32;
const HEADER_LEN: usize = IV_LEN + COMPRESSED_KEY_LEN + MAC_LEN;

/// An ECIES ciphertext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encrypted {
    pub iv: [u8; IV_LEN],
    pub ephemeral_public_key: PublicKey,
    pub ciphertext: Vec<u8>,
    pub mac: [u8; MAC_LEN],
}

impl Encrypted {
    /// Serialize to the compact wire layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + self.ciphertext.len());
        out.extend_from_slice(&self.iv);
        out.extend_from_slice(self.ephemeral_public_key.to_encoded_point(true).as_bytes());
        out.extend_from_slice(&self.mac);
        out.extend_from_slice(&self.ciphertext);
        out
    }

    /// Parse the compact wire layout.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() <= HEADER_LEN {
            return Err(CipherError::DecryptionFailed(format!(
                "ciphertext too short: {} bytes",
                bytes.len()
            ))
            .into());
        }

        let (iv, rest) = bytes.split_at(IV_LEN);
        let (key, rest) = rest.split_at(COMPRESSED_KEY_LEN);
        let (mac, ciphertext) = rest.split_at(MAC_LEN);

        let ephemeral_public_key = PublicKey::from_sec1_bytes(key)
            .map_err(|e| CipherError::DecryptionFailed(format!("bad ephemeral key: {}", e)))?;

        let mut iv_arr = [0u8; IV_LEN];
        iv_arr.copy_from_slice(iv);
        let mut mac_arr = [0u8; MAC_LEN];
        mac_arr.copy_from_slice(mac);

        Ok(Self {
            iv: iv_arr,
            ephemeral_public_key,
            ciphertext: ciphertext.to_vec(),
            mac: mac_arr,
        })
    }
}

/// Parse a DON public key.
///
/// Accepts the raw 64-byte `x || y` form stored on-chain as well as SEC1
/// encodings.
pub fn parse_public_key(raw: &[u8]) -> Result<PublicKey> {
    let parsed = if raw.len() == 64 {
        let mut sec1 = Vec::with_capacity(65);
        sec1.push(0x04);
        sec1.extend_from_slice(raw);
        PublicKey::from_sec1_bytes(&sec1)
    } else {
        PublicKey::from_sec1_bytes(raw)
    };
    parsed.map_err(|e| CipherError::InvalidPublicKey(e.to_string()).into())
}

/// Encrypt `plaintext` to `recipient`.
pub fn encrypt(recipient: &PublicKey, plaintext: &[u8]) -> Result<Encrypted> {
    trace!(plaintext_len = plaintext.len(), "ecies encrypting");

    let ephemeral = SecretKey::random(&mut OsRng);
    let ephemeral_public_key = ephemeral.public_key();
    let (enc_key, mac_key) = derive_keys(&ephemeral, recipient);

    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut iv);

    let ciphertext = Aes256CbcEnc::new_from_slices(&enc_key, &iv)
        .map_err(|e| CipherError::EncryptionFailed(e.to_string()))?
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    let mac = compute_mac(&mac_key, &iv, &ephemeral_public_key, &ciphertext)?;

    trace!(ciphertext_len = ciphertext.len(), "ecies encrypted");
    Ok(Encrypted {
        iv,
        ephemeral_public_key,
        ciphertext,
        mac,
    })
}

/// Decrypt a ciphertext with the recipient's secret key.
pub fn decrypt(secret: &SecretKey, encrypted: &Encrypted) -> Result<Vec<u8>> {
    let (enc_key, mac_key) = derive_keys(secret, &encrypted.ephemeral_public_key);

    let expected = compute_mac(
        &mac_key,
        &encrypted.iv,
        &encrypted.ephemeral_public_key,
        &encrypted.ciphertext,
    )?;
    if expected != encrypted.mac {
        return Err(CipherError::DecryptionFailed("bad MAC".to_string()).into());
    }

    Aes256CbcDec::new_from_slices(&enc_key, &encrypted.iv)
        .map_err(|e| CipherError::DecryptionFailed(e.to_string()))?
        .decrypt_padded_vec_mut::<Pkcs7>(&encrypted.ciphertext)
        .map_err(|e| CipherError::DecryptionFailed(e.to_string()).into())
}

/// Split SHA-512 of the shared x-coordinate into (encryption key, MAC key).
fn derive_keys(secret: &SecretKey, public: &PublicKey) -> ([u8; 32], [u8; 32]) {
    let shared = diffie_hellman(secret.to_nonzero_scalar(), public.as_affine());
    let hash = Sha512::digest(shared.raw_secret_bytes());

    let mut enc_key = [0u8; 32];
    let mut mac_key = [0u8; 32];
    enc_key.copy_from_slice(&hash[..32]);
    mac_key.copy_from_slice(&hash[32..]);
    (enc_key, mac_key)
}

fn compute_mac(
    key: &[u8],
    iv: &[u8],
    ephemeral_public_key: &PublicKey,
    ciphertext: &[u8],
) -> Result<[u8; MAC_LEN]> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(key)
        .map_err(|e| CipherError::EncryptionFailed(e.to_string()))?;
    mac.update(iv);
    mac.update(ephemeral_public_key.to_encoded_point(false).as_bytes());
    mac.update(ciphertext);

    let mut out = [0u8; MAC_LEN];
    out.copy_from_slice(&mac.finalize().into_bytes());
    Ok(out)
}
