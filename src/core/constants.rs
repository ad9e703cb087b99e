//! Constants used throughout fnsecrets.
//!
//! Centralizes environment variable names and network defaults.

/// Signing key environment variable.
pub const PRIVATE_KEY_VAR: &str = "PRIVATE_KEY";

/// RPC endpoint environment variable.
pub const RPC_URL_VAR: &str = "ETHEREUM_SEPOLIA_RPC_URL";

/// Hosted secrets URL environment variable.
pub const SECRETS_URL_VAR: &str = "OPENWEATHER_API_KEY_GIST";

/// Inline secret value environment variable.
pub const SECRET_VALUE_VAR: &str = "OPENWEATHER_API_KEY";

/// GitHub access token environment variable.
pub const GITHUB_TOKEN_VAR: &str = "GITHUB_API_TOKEN";

/// GitHub API base URL override.
pub const GITHUB_API_URL_VAR: &str = "GITHUB_API_URL";

/// Log filter environment variable.
pub const LOG_VAR: &str = "FNSECRETS_LOG";

/// Functions router on Ethereum Sepolia.
pub const DEFAULT_ROUTER_ADDRESS: &str = "0xb83E47C2bC239B3bf370bc41e1459A34b41238D0";

/// DON serving Ethereum Sepolia.
pub const DEFAULT_DON_ID: &str = "fun-ethereum-sepolia-1";

/// Logical name the inline secret is stored under.
pub const SECRET_NAME: &str = "apiKey";

/// Public GitHub REST API.
pub const GITHUB_API_URL: &str = "https://api.github.com";

/// Prefix of the file name given to published gists.
pub const GIST_FILE_PREFIX: &str = "encrypted-functions-request-data";

/// Key under which the DON-key ciphertext is wrapped before threshold encryption.
pub const DON_KEY_SLOT: &str = "0x0";
