//! Input validation for fnsecrets operations.
//!
//! Validates network parameters and secrets URLs before anything is sent.

use crate::error::{Result, ValidationError};

/// Validate a contract address.
///
/// Addresses must be `0x` followed by exactly 40 hex digits. Checksum casing
/// is not enforced.
///
/// # Errors
///
/// Returns `ValidationError::InvalidAddress` if the address is malformed.
pub fn validate_address(address: &str) -> Result<()> {
    let invalid = |reason: &str| ValidationError::InvalidAddress {
        address: address.to_string(),
        reason: reason.to_string(),
    };

    let digits = address
        .strip_prefix("0x")
        .ok_or_else(|| invalid("missing 0x prefix"))?;

    if digits.len() != 40 {
        return Err(invalid(&format!("expected 40 hex digits, got {}", digits.len())).into());
    }

    if let Some((i, ch)) = digits.char_indices().find(|(_, c)| !c.is_ascii_hexdigit()) {
        return Err(invalid(&format!("invalid character '{}' at position {}", ch, i + 3)).into());
    }

    Ok(())
}

/// Validate a DON id.
///
/// The id is passed on-chain as a right-padded `bytes32` string, so it must
/// leave room for a terminating zero byte.
///
/// # Errors
///
/// Returns `ValidationError::DonIdTooLong` if the id exceeds 31 bytes.
pub fn validate_don_id(don_id: &str) -> Result<()> {
    if don_id.len() > 31 {
        return Err(ValidationError::DonIdTooLong(don_id.to_string()).into());
    }
    Ok(())
}

/// Validate a secrets URL.
///
/// # Errors
///
/// Returns `ValidationError::InvalidUrl` if the string does not parse as an
/// absolute URL.
pub fn validate_secrets_url(raw: &str) -> Result<()> {
    url::Url::parse(raw).map_err(|e| ValidationError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    Ok(())
}
