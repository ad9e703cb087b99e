//! Environment configuration.
//!
//! Reads signing and network parameters from the process environment. The
//! signing key and RPC URL are mandatory; everything else is passed through
//! as-is for the downstream step that needs it.

use std::fmt;
use std::path::PathBuf;

use tracing::debug;
use zeroize::Zeroizing;

use crate::core::constants;
use crate::core::validation;
use crate::error::{ConfigError, Result};

/// Run configuration.
pub struct Config {
    /// Hex-encoded secp256k1 signing key
    pub private_key: Zeroizing<String>,
    /// JSON-RPC endpoint
    pub rpc_url: String,
    /// Functions router contract address
    pub router_address: String,
    /// DON identifier
    pub don_id: String,
    /// URL of a hosted secrets document
    pub secrets_url: Option<String>,
    /// Plaintext secret value
    pub secret_value: Option<String>,
    /// GitHub token used for gist publishing
    pub github_token: Option<String>,
    /// GitHub API base URL override
    pub github_api_url: Option<String>,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingVar` if the signing key or RPC URL is
    /// absent or empty.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Mandatory values are checked in order: signing key first, then RPC URL.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let private_key = Zeroizing::new(required(&lookup, constants::PRIVATE_KEY_VAR)?);
        let rpc_url = required(&lookup, constants::RPC_URL_VAR)?;

        let config = Self {
            private_key,
            rpc_url,
            router_address: constants::DEFAULT_ROUTER_ADDRESS.to_string(),
            don_id: constants::DEFAULT_DON_ID.to_string(),
            secrets_url: lookup(constants::SECRETS_URL_VAR),
            secret_value: lookup(constants::SECRET_VALUE_VAR),
            github_token: lookup(constants::GITHUB_TOKEN_VAR),
            github_api_url: lookup(constants::GITHUB_API_URL_VAR),
        };

        debug!(
            secrets_url = config.secrets_url.is_some(),
            secret_value = config.secret_value.is_some(),
            github_token = config.github_token.is_some(),
            "config loaded"
        );

        Ok(config)
    }

    /// Override the router address and DON id.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if either value is malformed.
    pub fn with_network(mut self, router_address: Option<String>, don_id: Option<String>) -> Result<Self> {
        if let Some(router_address) = router_address {
            self.router_address = router_address;
        }
        if let Some(don_id) = don_id {
            self.don_id = don_id;
        }
        self.validate()?;
        Ok(self)
    }

    /// Validate the network parameters.
    pub fn validate(&self) -> Result<()> {
        validation::validate_address(&self.router_address)?;
        validation::validate_don_id(&self.don_id)?;
        Ok(())
    }

    /// GitHub token, required for publishing.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingVar` if the token is absent or empty.
    pub fn github_token(&self) -> Result<&str> {
        match self.github_token.as_deref() {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(ConfigError::MissingVar(constants::GITHUB_TOKEN_VAR).into()),
        }
    }

    /// GitHub API base URL.
    pub fn github_api_url(&self) -> &str {
        self.github_api_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(constants::GITHUB_API_URL)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("private_key", &"<redacted>")
            .field("rpc_url", &self.rpc_url)
            .field("router_address", &self.router_address)
            .field("don_id", &self.don_id)
            .field("secrets_url", &self.secrets_url)
            .field("secret_value", &self.secret_value.as_ref().map(|_| "<redacted>"))
            .field("github_token", &self.github_token.as_ref().map(|_| "<redacted>"))
            .field("github_api_url", &self.github_api_url)
            .finish()
    }
}

fn required<F>(lookup: &F, name: &'static str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar(name).into()),
    }
}

/// Load a `.env` file from the current directory into the process environment.
///
/// Variables already present in the environment are not overridden.
/// Returns the path that was loaded, or `None` when no file exists.
///
/// # Errors
///
/// Returns `ConfigError::DotEnv` if the file exists but cannot be parsed.
pub fn load_dotenv() -> Result<Option<PathBuf>> {
    match dotenvy::dotenv() {
        Ok(path) => {
            debug!(path = %path.display(), "loaded .env");
            Ok(Some(path))
        }
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(ConfigError::DotEnv(e.to_string()).into()),
    }
}
