//! Result rendering.

use crate::core::types::EncryptedPayload;
use crate::core::workflow::Outcome;

/// Text form of an encrypted payload.
pub fn render_payload(payload: &EncryptedPayload) -> String {
    match payload {
        EncryptedPayload::Urls(hex) => format!("Encrypted Secrets url result: {}", hex),
        EncryptedPayload::Secrets(secrets) => serde_json::to_string_pretty(secrets)
            .unwrap_or_else(|_| format!("{{ encryptedSecrets: {} }}", secrets.encrypted_secrets)),
    }
}

/// Lines to print for a finished run.
pub fn render(outcome: &Outcome) -> Vec<String> {
    match outcome {
        Outcome::Encrypted(payload) => vec![render_payload(payload)],
        Outcome::Published { gist_url, payload } => vec![
            format!("Gist created: {}", gist_url),
            render_payload(payload),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::EncryptedSecrets;

    #[test]
    fn test_render_urls_payload() {
        let outcome = Outcome::Encrypted(EncryptedPayload::Urls("0xabc".into()));
        assert_eq!(render(&outcome), vec!["Encrypted Secrets url result: 0xabc"]);
    }

    #[test]
    fn test_render_secrets_payload_as_object() {
        let outcome = Outcome::Encrypted(EncryptedPayload::Secrets(EncryptedSecrets {
            encrypted_secrets: "0xdef".into(),
        }));
        let lines = render(&outcome);
        assert_eq!(lines.len(), 1);
        let parsed: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(parsed["encryptedSecrets"], "0xdef");
    }

    #[test]
    fn test_render_published() {
        let outcome = Outcome::Published {
            gist_url: "https://gist.github.com/u/1/raw".into(),
            payload: EncryptedPayload::Urls("0x01".into()),
        };
        assert_eq!(
            render(&outcome),
            vec![
                "Gist created: https://gist.github.com/u/1/raw".to_string(),
                "Encrypted Secrets url result: 0x01".to_string(),
            ]
        );
    }
}
