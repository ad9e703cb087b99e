//! TDH2 threshold encryption over P-256.
//!
//! A fresh 32-byte key encrypts the message with AES-256-GCM; the key itself
//! is encrypted under the DON's threshold public key so that a quorum of
//! nodes must cooperate to recover it. Serialization follows the JSON layout
//! of the `tdh2` library shipped with Functions nodes, with base64 byte
//! fields.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use p256::elliptic_curve::ops::Reduce;
use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::elliptic_curve::{Field, PrimeField};
use p256::{FieldBytes, ProjectivePoint, Scalar, U256};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::trace;

use crate::error::{CipherError, Result};

const GROUP: &str = "P256";
const INPUT_SIZE: usize = 32;
const NONCE_LEN: usize = 12;

/// Threshold public key published by the DON coordinator.
#[derive(Debug, Clone)]
pub struct PublicKey {
    g_bar: ProjectivePoint,
    h: ProjectivePoint,
}

#[derive(Deserialize)]
struct PublicKeyRaw {
    #[serde(rename = "Group")]
    group: String,
    #[serde(rename = "G_bar")]
    g_bar: String,
    #[serde(rename = "H")]
    h: String,
}

#[derive(Serialize)]
struct CiphertextRaw {
    #[serde(rename = "Group")]
    group: &'static str,
    #[serde(rename = "C")]
    c: String,
    #[serde(rename = "Label")]
    label: String,
    #[serde(rename = "U")]
    u: String,
    #[serde(rename = "U_bar")]
    u_bar: String,
    #[serde(rename = "E")]
    e: String,
    #[serde(rename = "F")]
    f: String,
}

#[derive(Serialize)]
struct EnvelopeRaw {
    #[serde(rename = "TDH2Ctxt")]
    tdh2_ctxt: String,
    #[serde(rename = "SymCtxt")]
    sym_ctxt: String,
    #[serde(rename = "Nonce")]
    nonce: String,
}

impl PublicKey {
    /// Parse the JSON form returned by the coordinator.
    pub fn from_json(json: &[u8]) -> Result<Self> {
        let raw: PublicKeyRaw = serde_json::from_slice(json)
            .map_err(|e| CipherError::InvalidThresholdKey(e.to_string()))?;

        if raw.group != GROUP {
            return Err(CipherError::InvalidThresholdKey(format!(
                "unsupported group '{}'",
                raw.group
            ))
            .into());
        }

        Ok(Self {
            g_bar: decode_point(&raw.g_bar)?,
            h: decode_point(&raw.h)?,
        })
    }

    /// Build a key from its points.
    pub fn from_points(g_bar: ProjectivePoint, h: ProjectivePoint) -> Self {
        Self { g_bar, h }
    }
}

/// Encrypt `msg` under the threshold key.
///
/// Returns the JSON envelope bytes.
pub fn encrypt(public_key: &PublicKey, msg: &[u8]) -> Result<Vec<u8>> {
    trace!(msg_len = msg.len(), "tdh2 encrypting");

    let mut key = zeroize::Zeroizing::new([0u8; INPUT_SIZE]);
    OsRng.fill_bytes(&mut key[..]);

    let tdh2_ctxt = encrypt_key(public_key, &key, &[0u8; INPUT_SIZE])?;

    let cipher = Aes256Gcm::new_from_slice(&key[..])
        .map_err(|e| CipherError::EncryptionFailed(e.to_string()))?;
    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);
    let sym_ctxt = cipher
        .encrypt(Nonce::from_slice(&nonce), msg)
        .map_err(|e| CipherError::EncryptionFailed(e.to_string()))?;

    let envelope = EnvelopeRaw {
        tdh2_ctxt: B64.encode(tdh2_ctxt),
        sym_ctxt: B64.encode(sym_ctxt),
        nonce: B64.encode(nonce),
    };

    serde_json::to_vec(&envelope).map_err(|e| CipherError::EncryptionFailed(e.to_string()).into())
}

/// TDH2-encrypt a 32-byte key with a 32-byte label.
fn encrypt_key(public_key: &PublicKey, key: &[u8; INPUT_SIZE], label: &[u8; INPUT_SIZE]) -> Result<Vec<u8>> {
    let r = Scalar::random(&mut OsRng);
    let s = Scalar::random(&mut OsRng);

    let mask = hash1(&(public_key.h * r));
    let c: Vec<u8> = mask.iter().zip(key.iter()).map(|(a, b)| a ^ b).collect();

    let u = ProjectivePoint::GENERATOR * r;
    let w = ProjectivePoint::GENERATOR * s;
    let u_bar = public_key.g_bar * r;
    let w_bar = public_key.g_bar * s;

    let e = hash2(&c, label, &[&u, &w, &u_bar, &w_bar]);
    let f = s + r * e;

    let raw = CiphertextRaw {
        group: GROUP,
        c: B64.encode(&c),
        label: B64.encode(label),
        u: B64.encode(encode_point(&u)),
        u_bar: B64.encode(encode_point(&u_bar)),
        e: B64.encode(e.to_repr()),
        f: B64.encode(f.to_repr()),
    };

    serde_json::to_vec(&raw).map_err(|e| CipherError::EncryptionFailed(e.to_string()).into())
}

fn hash1(point: &ProjectivePoint) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(b"tdh2hash1");
    hasher.update(encode_point(point));
    hasher.finalize().into()
}

fn hash2(c: &[u8], label: &[u8], points: &[&ProjectivePoint]) -> Scalar {
    let mut hasher = Sha256::new();
    hasher.update(b"tdh2hash2");
    hasher.update(c);
    hasher.update(label);
    for point in points {
        hasher.update(encode_point(point));
    }
    let digest: FieldBytes = hasher.finalize();
    <Scalar as Reduce<U256>>::reduce_bytes(&digest)
}

fn encode_point(point: &ProjectivePoint) -> Vec<u8> {
    point.to_affine().to_encoded_point(false).as_bytes().to_vec()
}

fn decode_point(encoded: &str) -> Result<ProjectivePoint> {
    let bytes = B64
        .decode(encoded)
        .map_err(|e| CipherError::InvalidThresholdKey(format!("point is not base64: {}", e)))?;
    let key = p256::PublicKey::from_sec1_bytes(&bytes)
        .map_err(|e| CipherError::InvalidThresholdKey(format!("invalid point: {}", e)))?;
    Ok(key.to_projective())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn keypair() -> (Scalar, PublicKey) {
        let x = Scalar::random(&mut OsRng);
        let g_bar = ProjectivePoint::GENERATOR * Scalar::random(&mut OsRng);
        (x, PublicKey::from_points(g_bar, ProjectivePoint::GENERATOR * x))
    }

    fn field(value: &Value, name: &str) -> Vec<u8> {
        B64.decode(value[name].as_str().unwrap()).unwrap()
    }

    /// Recover the plaintext with the full (non-shared) secret `x`.
    fn open(x: &Scalar, envelope: &[u8]) -> Vec<u8> {
        let envelope: Value = serde_json::from_slice(envelope).unwrap();
        let ctxt: Value = serde_json::from_slice(&field(&envelope, "TDH2Ctxt")).unwrap();

        let u = p256::PublicKey::from_sec1_bytes(&field(&ctxt, "U"))
            .unwrap()
            .to_projective();
        let mask = hash1(&(u * x));
        let key: Vec<u8> = mask
            .iter()
            .zip(field(&ctxt, "C"))
            .map(|(a, b)| a ^ b)
            .collect();

        let cipher = Aes256Gcm::new_from_slice(&key).unwrap();
        cipher
            .decrypt(
                Nonce::from_slice(&field(&envelope, "Nonce")),
                field(&envelope, "SymCtxt").as_slice(),
            )
            .unwrap()
    }

    #[test]
    fn test_encrypt_opens_with_secret() {
        let (x, public_key) = keypair();
        let envelope = encrypt(&public_key, br#"{"0x0":"abc"}"#).unwrap();
        assert_eq!(open(&x, &envelope), br#"{"0x0":"abc"}"#);
    }

    #[test]
    fn test_ciphertext_proof_verifies() {
        let (_, public_key) = keypair();
        let envelope: Value = serde_json::from_slice(&encrypt(&public_key, b"m").unwrap()).unwrap();
        let ctxt: Value = serde_json::from_slice(&field(&envelope, "TDH2Ctxt")).unwrap();

        assert_eq!(ctxt["Group"], "P256");
        assert_eq!(field(&ctxt, "Label"), vec![0u8; 32]);

        let point = |name: &str| {
            p256::PublicKey::from_sec1_bytes(&field(&ctxt, name))
                .unwrap()
                .to_projective()
        };
        let scalar = |name: &str| {
            let bytes = FieldBytes::clone_from_slice(&field(&ctxt, name));
            Option::<Scalar>::from(Scalar::from_repr(bytes)).unwrap()
        };

        let (u, u_bar, e, f) = (point("U"), point("U_bar"), scalar("E"), scalar("F"));
        let w = ProjectivePoint::GENERATOR * f - u * e;
        let w_bar = public_key.g_bar * f - u_bar * e;

        assert_eq!(hash2(&field(&ctxt, "C"), &[0u8; 32], &[&u, &w, &u_bar, &w_bar]), e);
    }

    #[test]
    fn test_public_key_json() {
        let (_, public_key) = keypair();
        let json = serde_json::json!({
            "Group": "P256",
            "G_bar": B64.encode(encode_point(&public_key.g_bar)),
            "H": B64.encode(encode_point(&public_key.h)),
            "HArray": [],
        });
        let parsed = PublicKey::from_json(json.to_string().as_bytes()).unwrap();
        assert_eq!(parsed.h, public_key.h);

        let wrong_group = serde_json::json!({ "Group": "ED25519", "G_bar": "", "H": "" });
        assert!(PublicKey::from_json(wrong_group.to_string().as_bytes()).is_err());
        assert!(PublicKey::from_json(b"not json").is_err());
    }
}
