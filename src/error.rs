//! Error types.
//!
//! Every failure aborts the run, so errors carry enough context to be
//! printed directly to the user.

use thiserror::Error;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Signer(#[from] SignerError),

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    Publish(#[from] PublishError),
}

impl Error {
    /// Messages of the source chain that the top-level message leaves out.
    pub fn causes(&self) -> Vec<String> {
        let mut seen = self.to_string();
        let mut out = Vec::new();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            let text = cause.to_string();
            if !seen.contains(&text) {
                seen.push('\n');
                seen.push_str(&text);
                out.push(text);
            }
            source = cause.source();
        }
        out
    }
}

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} not provided - check your environment variables")]
    MissingVar(&'static str),

    #[error("failed to load .env file: {0}")]
    DotEnv(String),
}

/// Input validation errors, raised before any network call.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("invalid router address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("invalid DON id '{0}': must be at most 31 bytes")]
    DonIdTooLong(String),

    #[error("invalid secrets URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Signing key errors.
#[derive(Error, Debug)]
pub enum SignerError {
    #[error("invalid private key: {0}")]
    InvalidKey(String),

    #[error("signing failed: {0}")]
    SigningFailed(String),
}

/// JSON-RPC transport and decoding errors.
#[derive(Error, Debug)]
pub enum RpcError {
    #[error("invalid RPC URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("RPC request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("RPC endpoint returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("RPC error {code}: {message}")]
    Node { code: i64, message: String },

    #[error("malformed RPC response: {0}")]
    Malformed(String),
}

/// Secrets encryption errors.
#[derive(Error, Debug)]
pub enum CipherError {
    #[error("secrets manager is not initialized: call initialize() first")]
    NotInitialized,

    #[error("no coordinator registered for DON id '{0}'")]
    UnknownDon(String),

    #[error("invalid secrets: {0}")]
    InvalidSecrets(String),

    #[error("invalid DON public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid threshold public key: {0}")]
    InvalidThresholdKey(String),

    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("decryption failed: {0}")]
    DecryptionFailed(String),
}

/// Gist publishing errors.
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("GitHub request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("GitHub token is not authorized: HTTP {0}")]
    Unauthorized(reqwest::StatusCode),

    #[error("GitHub token does not have the 'gist' scope (scopes: {0})")]
    MissingScope(String),

    #[error("gist creation failed: HTTP {status}: {body}")]
    CreateFailed {
        status: reqwest::StatusCode,
        body: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
