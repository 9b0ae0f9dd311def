//! Secret string wrapper for sensitive data.
//!
//! This module provides a wrapper type that prevents accidental logging
//! of credentials, plus the masking rules used when a credential has to
//! appear in a report.

use std::fmt;

/// Placeholder printed instead of a secret value.
pub const REDACTED: &str = "<REDACTED>";

/// Masked form used for secrets too short to show a prefix and suffix.
pub const SHORT_SECRET_MASK: &str = "[REDACTED]";

/// Number of characters kept on each side by [`SecretString::masked`].
const MASK_KEEP: usize = 8;

/// A wrapper for sensitive strings that redacts the value in Debug/Display output.
///
/// # Example
///
/// ```
/// use nilai_diagnostics::config::SecretString;
///
/// let secret = SecretString::new("0123456789abcdef0123456789abcdef");
/// assert_eq!(format!("{:?}", secret), "<REDACTED>");
/// assert_eq!(secret.masked(), "01234567...89abcdef");
/// ```
#[derive(Clone)]
pub struct SecretString(String);

impl SecretString {
    /// Creates a new `SecretString` from any string-like value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Exposes the underlying secret value.
    ///
    /// Use this method only when you need to actually use the secret,
    /// such as when building an `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns true if the secret is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the length of the secret in characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    /// Masked form showing the first and last eight characters.
    ///
    /// Secrets of sixteen characters or fewer are fully replaced by
    /// [`SHORT_SECRET_MASK`].
    #[must_use]
    pub fn masked(&self) -> String {
        let count = self.len();
        if count <= MASK_KEEP * 2 {
            return SHORT_SECRET_MASK.to_string();
        }
        let head: String = self.0.chars().take(MASK_KEEP).collect();
        let tail: String = self.0.chars().skip(count - MASK_KEEP).collect();
        format!("{head}...{tail}")
    }

    /// Masked form showing only a prefix of up to eight characters.
    #[must_use]
    pub fn prefix_masked(&self) -> String {
        let head: String = self.0.chars().take(MASK_KEEP).collect();
        format!("{head}...")
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl PartialEq for SecretString {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for SecretString {}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
