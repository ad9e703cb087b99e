//! Encrypt / publish / re-encrypt pipeline.
//!
//! Every step's output is the next step's input; the first error ends the run.

use tracing::debug;

use crate::core::cipher::SecretsEncryptor;
use crate::core::gist::Publisher;
use crate::core::types::{EncryptedPayload, SecretsBundle};
use crate::error::Result;

/// Final result of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Payload produced by a single encryption pass.
    Encrypted(EncryptedPayload),
    /// Payload published as a gist, then the gist URL encrypted.
    Published {
        gist_url: String,
        payload: EncryptedPayload,
    },
}

/// Initialize the encryptor and encrypt `bundle` once.
pub async fn encrypt(encryptor: &mut dyn SecretsEncryptor, bundle: &SecretsBundle) -> Result<Outcome> {
    encryptor.initialize().await?;

    debug!(entries = bundle.len(), "encrypting bundle");
    let payload = encryptor.encrypt(bundle).await?;
    Ok(Outcome::Encrypted(payload))
}

/// Encrypt `bundle`, publish the result and encrypt the published URL.
///
/// The second encryption pass always receives exactly one URL: the one the
/// publisher returned.
pub async fn encrypt_and_publish(
    encryptor: &mut dyn SecretsEncryptor,
    publisher: &dyn Publisher,
    bundle: &SecretsBundle,
) -> Result<Outcome> {
    encryptor.initialize().await?;

    debug!(entries = bundle.len(), "encrypting bundle");
    let first = encryptor.encrypt(bundle).await?;

    let document = first
        .to_json()
        .map_err(|e| crate::error::CipherError::EncryptionFailed(e.to_string()))?;
    let gist_url = publisher.publish(&document).await?;

    debug!(url = %gist_url, "encrypting published URL");
    let payload = encryptor.encrypt(&SecretsBundle::url(gist_url.clone())).await?;

    Ok(Outcome::Published { gist_url, payload })
}
