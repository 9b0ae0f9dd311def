//! API key format rules.

use serde::{Deserialize, Serialize};

use super::SecretString;

/// Exact length of a well-formed API key.
pub const API_KEY_LENGTH: usize = 64;

/// Why an API key failed the format check.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyFormatError {
    /// Key was empty after trimming.
    #[error("API key must be a non-empty string")]
    Empty,
    /// Key does not have exactly [`API_KEY_LENGTH`] characters.
    #[error("API key must be exactly {API_KEY_LENGTH} characters")]
    WrongLength {
        /// Observed length.
        actual: usize,
    },
    /// Key contains characters outside `[0-9a-fA-F]`.
    #[error("API key must contain only hexadecimal characters (0-9, a-f)")]
    NotHex,
    /// Key matches a known placeholder pattern.
    #[error("API key appears to be a test/placeholder value")]
    Placeholder,
}

/// Validate the format of an API key.
///
/// The key is trimmed, must be exactly 64 hexadecimal characters and must
/// not look like a placeholder (all zeros, all ones, or starting with
/// `abc123`, `test` or `demo`).
///
/// # Errors
///
/// Returns the first [`KeyFormatError`] rule the key violates.
pub fn validate_api_key_format(key: &str) -> Result<(), KeyFormatError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(KeyFormatError::Empty);
    }

    let length = key.chars().count();
    if length != API_KEY_LENGTH {
        return Err(KeyFormatError::WrongLength { actual: length });
    }

    if !key.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(KeyFormatError::NotHex);
    }

    let lower = key.to_ascii_lowercase();
    let placeholder = key.chars().all(|c| c == '0')
        || key.chars().all(|c| c == '1')
        || lower.starts_with("abc123")
        || lower.starts_with("test")
        || lower.starts_with("demo");
    if placeholder {
        return Err(KeyFormatError::Placeholder);
    }

    Ok(())
}

/// Summary of the supplied API key, as shown in reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialCheck {
    /// Whether an API key was supplied at all.
    pub provided: bool,
    /// Character count of the key (0 when absent).
    pub length: usize,
    /// Human-readable format verdict.
    pub format: String,
}

impl CredentialCheck {
    /// Inspect an optional API key.
    #[must_use]
    pub fn inspect(api_key: Option<&SecretString>) -> Self {
        match api_key {
            None => Self {
                provided: false,
                length: 0,
                format: "Not provided".to_string(),
            },
            Some(key) => {
                let length = key.len();
                let format = if length == API_KEY_LENGTH {
                    format!("Valid ({API_KEY_LENGTH} chars)")
                } else {
                    format!("Invalid ({length} chars)")
                };
                Self {
                    provided: true,
                    length,
                    format,
                }
            }
        }
    }
}
