//! Reset-code records and verdicts.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Verdict for checking a submitted code against a stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeCheck {
    /// The code matches and has not expired.
    Valid,
    /// The code matches but its expiry has passed.
    Expired,
    /// The code does not match.
    Mismatch,
}

impl CodeCheck {
    /// Returns true when the check passed.
    pub fn is_valid(&self) -> bool {
        matches!(self, CodeCheck::Valid)
    }
}

/// Returns true when `code` has the shape of a reset code: exactly
/// `length` ASCII digits. Shape failures never touch storage.
pub fn is_code_shape(code: &str, length: usize) -> bool {
    code.len() == length && code.bytes().all(|b| b.is_ascii_digit())
}

/// A reset code at rest: the digits, the owning account, and the expiry.
///
/// One record exists per account at most; issuing a new code overwrites
/// the previous record, which is what invalidates in-flight codes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetCodeRecord {
    /// The code digits.
    pub code: String,
    /// The account this code was issued for.
    pub account_id: String,
    /// When this code expires.
    pub expires_at: DateTime<Utc>,
}

impl ResetCodeRecord {
    /// Creates a new record expiring `expires_in` from now.
    pub fn new(
        code: impl Into<String>,
        account_id: impl Into<String>,
        expires_in: Duration,
    ) -> Self {
        Self {
            code: code.into(),
            account_id: account_id.into(),
            expires_at: Utc::now() + expires_in,
        }
    }

    /// Checks if the record has expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Checks if the record has expired at the given time.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Checks a submitted code against this record.
    pub fn check(&self, provided: &str) -> CodeCheck {
        self.check_at(provided, Utc::now())
    }

    /// Checks a submitted code against this record at the given time.
    ///
    /// Expiry is only reported for a matching code; a mismatch stays a
    /// mismatch so callers can keep the indistinct failure message.
    pub fn check_at(&self, provided: &str, now: DateTime<Utc>) -> CodeCheck {
        if self.code != provided {
            CodeCheck::Mismatch
        } else if self.is_expired_at(now) {
            CodeCheck::Expired
        } else {
            CodeCheck::Valid
        }
    }
}
