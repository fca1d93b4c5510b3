use crate::error::ServiceError;
use std::fmt;

/// Number of digits in a canonical CEP
pub const POSTAL_CODE_LEN: usize = 8;

/// A normalized Brazilian postal code (CEP)
///
/// Can only be built through [`normalize`], so every value holds exactly
/// eight ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PostalCode(String);

impl PostalCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PostalCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Remove the separators users commonly type (`01310-100`, `01310 100`)
#[inline]
fn strip_separators(raw: &str) -> String {
    raw.chars().filter(|c| *c != '-' && *c != ' ').collect()
}

#[inline]
fn is_canonical(candidate: &str) -> bool {
    candidate.len() == POSTAL_CODE_LEN && candidate.bytes().all(|b| b.is_ascii_digit())
}

/// Check whether `raw` is a valid postal code once hyphens and spaces are removed
pub fn validate(raw: &str) -> bool {
    is_canonical(&strip_separators(raw))
}

/// Normalize `raw` into its canonical 8-digit form
///
/// # Errors
/// Returns [`ServiceError::InvalidFormat`] when the stripped value is not
/// exactly eight ASCII digits.
pub fn normalize(raw: &str) -> Result<PostalCode, ServiceError> {
    let stripped = strip_separators(raw);
    if is_canonical(&stripped) {
        Ok(PostalCode(stripped))
    } else {
        Err(ServiceError::InvalidFormat)
    }
}
