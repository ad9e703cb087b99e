//! Fake DON and mock JSON-RPC node.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::elliptic_curve::Field;
use rand::rngs::OsRng;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use wiremock::matchers::{body_string_contains, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fnsecrets::core::abi;
use fnsecrets::core::cipher::ecies;
use fnsecrets::core::signer::{checksum, hash_message};

/// Coordinator address returned by the mock router.
pub const COORDINATOR: &str = "0x1111111111111111111111111111111111111111";

/// A DON with real encryption keys.
pub struct Don {
    pub secret: k256::SecretKey,
    pub threshold_secret: p256::Scalar,
    pub threshold_public_key_json: String,
}

impl Don {
    pub fn new() -> Self {
        let secret = k256::SecretKey::random(&mut OsRng);

        let threshold_secret = p256::Scalar::random(&mut OsRng);
        let g_bar = p256::ProjectivePoint::GENERATOR * p256::Scalar::random(&mut OsRng);
        let h = p256::ProjectivePoint::GENERATOR * threshold_secret;
        let encode = |p: p256::ProjectivePoint| B64.encode(p.to_affine().to_encoded_point(false).as_bytes());

        let threshold_public_key_json = json!({
            "Group": "P256",
            "G_bar": encode(g_bar),
            "H": encode(h),
            "HArray": [encode(h)],
        })
        .to_string();

        Self {
            secret,
            threshold_secret,
            threshold_public_key_json,
        }
    }

    /// On-chain form of the DON public key: 64 bytes, no SEC1 tag.
    pub fn raw_public_key(&self) -> Vec<u8> {
        self.secret.public_key().to_encoded_point(false).as_bytes()[1..].to_vec()
    }

    /// Decrypt a `0x`-prefixed ECIES payload addressed to this DON.
    pub fn decrypt_hex(&self, payload: &str) -> String {
        let bytes = hex::decode(payload.trim_start_matches("0x")).expect("payload is not hex");
        let encrypted = ecies::Encrypted::from_bytes(&bytes).expect("malformed ECIES payload");
        String::from_utf8(ecies::decrypt(&self.secret, &encrypted).expect("decryption failed"))
            .expect("plaintext is not UTF-8")
    }

    /// Open an inline `encryptedSecrets` value down to the signed message.
    ///
    /// Recovers the symmetric key with the full threshold secret, opens the
    /// AES-GCM body, then decrypts the `0x0` slot with the DON key. Returns
    /// `(message, signature)`.
    pub fn open_inline(&self, encrypted_secrets: &str) -> (String, String) {
        let bytes = hex::decode(encrypted_secrets.trim_start_matches("0x"))
            .expect("encryptedSecrets is not hex");
        let envelope: Value = serde_json::from_slice(&bytes).expect("envelope is not JSON");
        let ctxt: Value =
            serde_json::from_slice(&b64_field(&envelope, "TDH2Ctxt")).expect("TDH2Ctxt is not JSON");

        let u = p256::PublicKey::from_sec1_bytes(&b64_field(&ctxt, "U"))
            .expect("bad U point")
            .to_projective();
        let shared = (u * self.threshold_secret).to_affine().to_encoded_point(false);
        let mut hasher = Sha256::new();
        hasher.update(b"tdh2hash1");
        hasher.update(shared.as_bytes());
        let mask = hasher.finalize();
        let key: Vec<u8> = mask
            .iter()
            .zip(b64_field(&ctxt, "C"))
            .map(|(a, b)| a ^ b)
            .collect();

        let body = Aes256Gcm::new_from_slice(&key)
            .expect("bad symmetric key")
            .decrypt(
                Nonce::from_slice(&b64_field(&envelope, "Nonce")),
                b64_field(&envelope, "SymCtxt").as_slice(),
            )
            .expect("symmetric decryption failed");

        let slots: Value = serde_json::from_slice(&body).expect("slots are not JSON");
        let don_bytes = b64_field(&slots, "0x0");
        let encrypted = ecies::Encrypted::from_bytes(&don_bytes).expect("malformed ECIES slot");
        let signed: Value = serde_json::from_slice(
            &ecies::decrypt(&self.secret, &encrypted).expect("DON decryption failed"),
        )
        .expect("signed secrets are not JSON");

        (
            signed["message"].as_str().expect("no message").to_string(),
            signed["signature"].as_str().expect("no signature").to_string(),
        )
    }
}

fn b64_field(value: &Value, name: &str) -> Vec<u8> {
    let text = value[name]
        .as_str()
        .unwrap_or_else(|| panic!("missing field {}", name));
    B64.decode(text).unwrap_or_else(|e| panic!("{} is not base64: {}", name, e))
}

/// Checksummed address that produced a personal-message `signature`.
pub fn recover_signer(message: &str, signature: &str) -> String {
    let bytes = hex::decode(signature.trim_start_matches("0x")).expect("signature is not hex");
    assert_eq!(bytes.len(), 65, "signature must be r || s || v");

    let sig = Signature::from_slice(&bytes[..64]).expect("bad signature");
    let recid = RecoveryId::from_byte(bytes[64] - 27).expect("bad recovery id");
    let key = VerifyingKey::recover_from_prehash(&hash_message(message.as_bytes()), &sig, recid)
        .expect("signature does not recover");

    let point = key.to_encoded_point(false);
    let hash = abi::keccak256(&point.as_bytes()[1..]);
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    checksum(&address)
}

/// Selector of `signature` as lowercase hex.
pub fn selector_hex(signature: &str) -> String {
    hex::encode(abi::selector(signature))
}

/// JSON-RPC success response carrying `data`.
pub fn rpc_result(data: &[u8]) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "result": format!("0x{}", hex::encode(data)),
    }))
}

/// JSON-RPC error response.
pub fn rpc_error(code: i64, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "error": { "code": code, "message": message },
    }))
}

/// Mount router and coordinator responses for `don`.
pub async fn mount_node(server: &MockServer, don: &Don) {
    mount_router(server, COORDINATOR).await;

    Mock::given(method("POST"))
        .and(body_string_contains(selector_hex("getDONPublicKey()")))
        .respond_with(rpc_result(&abi::encode_bytes(&don.raw_public_key())))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(body_string_contains(selector_hex("getThresholdPublicKey()")))
        .respond_with(rpc_result(&abi::encode_bytes(
            don.threshold_public_key_json.as_bytes(),
        )))
        .mount(server)
        .await;
}

/// Mount only the router lookup, resolving to `coordinator`.
pub async fn mount_router(server: &MockServer, coordinator: &str) {
    Mock::given(method("POST"))
        .and(body_string_contains(selector_hex("getContractById(bytes32)")))
        .respond_with(rpc_result(
            &abi::encode_address(coordinator).expect("bad coordinator address"),
        ))
        .mount(server)
        .await;
}
