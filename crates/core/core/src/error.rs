//! Error types for the ZipFood auth service.
//!
//! This module defines the `AuthError` enum which represents all possible
//! errors that can occur within the password-reset flow.
//!
//! Expected conditions (bad input, rate limits, unknown codes) are typed
//! variants with stable user-facing messages; handlers surface them
//! directly. Anything else is converted to the generic internal-error
//! message at the layer boundary.

use thiserror::Error;

/// The main error type for auth operations.
#[derive(Debug, Error)]
pub enum AuthError {
    // ==================== Validation Errors ====================
    /// The phone number could not be normalized.
    #[error("Invalid phone number. Use the format: (11) 98765-4321")]
    InvalidPhoneNumber,

    /// The submitted code is not a 6-digit string.
    #[error("Code must be 6 digits")]
    InvalidCodeFormat,

    /// The password does not meet requirements.
    #[error("Password does not meet requirements: {reason}")]
    WeakPassword { reason: String },

    /// A required field is missing.
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    // ==================== Verification Errors ====================
    /// The code matched but its expiry has passed.
    #[error("Verification code expired")]
    CodeExpired,

    /// No live code matched. Deliberately indistinct: callers cannot tell
    /// a wrong code from a request that never existed or was consumed.
    #[error("Code is invalid, expired, or already used")]
    CodeInvalid,

    /// No account exists for the given phone number.
    #[error("No account found with this phone number")]
    AccountNotFound,

    // ==================== Rate Limiting ====================
    /// Too many code sends for this phone within the window.
    #[error("Too many attempts. Try again in 1 hour")]
    RateLimitExceeded { retry_after_seconds: u64 },

    // ==================== Transport Errors ====================
    /// The SMS gateway refused or failed the send. The issued code stays
    /// valid; a resend overwrites rather than duplicates it.
    #[error("Could not send SMS. Try again")]
    SmsDeliveryFailed,

    // ==================== Storage Errors ====================
    /// A database operation failed.
    #[error("Database error: {message}")]
    DatabaseError { message: String },

    /// The requested record was not found.
    #[error("Record not found: {entity} with {key}={value}")]
    NotFound {
        entity: String,
        key: String,
        value: String,
    },

    /// A unique constraint was violated (e.g., duplicate phone).
    #[error("Duplicate entry: {entity} with {field}={value} already exists")]
    DuplicateEntry {
        entity: String,
        field: String,
        value: String,
    },

    // ==================== Configuration Errors ====================
    /// The configuration is invalid.
    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    /// A required configuration value is missing.
    #[error("Missing configuration: {key}")]
    MissingConfiguration { key: String },

    // ==================== Internal Errors ====================
    /// An internal error occurred.
    #[error("Internal error. Try again")]
    InternalError { message: String },

    /// Serialization/deserialization failed.
    #[error("Serialization error: {message}")]
    SerializationError { message: String },
}

impl AuthError {
    /// Creates a new database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::DatabaseError {
            message: message.into(),
        }
    }

    /// Creates a new not found error.
    pub fn not_found(
        entity: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::NotFound {
            entity: entity.into(),
            key: key.into(),
            value: value.into(),
        }
    }

    /// Creates a new duplicate entry error.
    pub fn duplicate(
        entity: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::DuplicateEntry {
            entity: entity.into(),
            field: field.into(),
            value: value.into(),
        }
    }

    /// Creates a new internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }

    /// Creates a new configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    /// Returns true if this is a user-facing error whose message can be
    /// shown verbatim (vs an internal failure to mask).
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidPhoneNumber
                | Self::InvalidCodeFormat
                | Self::WeakPassword { .. }
                | Self::MissingField { .. }
                | Self::CodeExpired
                | Self::CodeInvalid
                | Self::AccountNotFound
                | Self::RateLimitExceeded { .. }
                | Self::SmsDeliveryFailed
        )
    }

    /// Returns an HTTP status code appropriate for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::CodeExpired | Self::CodeInvalid => 400,
            Self::AccountNotFound | Self::NotFound { .. } => 404,
            Self::DuplicateEntry { .. } => 409,
            Self::InvalidPhoneNumber
            | Self::InvalidCodeFormat
            | Self::WeakPassword { .. }
            | Self::MissingField { .. } => 422,
            Self::RateLimitExceeded { .. } => 429,
            Self::SmsDeliveryFailed => 502,
            _ => 500,
        }
    }

    /// Returns a stable machine-readable code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidPhoneNumber => "INVALID_PHONE_NUMBER",
            Self::InvalidCodeFormat => "INVALID_CODE_FORMAT",
            Self::WeakPassword { .. } => "WEAK_PASSWORD",
            Self::MissingField { .. } => "MISSING_FIELD",
            Self::CodeExpired => "CODE_EXPIRED",
            Self::CodeInvalid => "CODE_INVALID",
            Self::AccountNotFound => "ACCOUNT_NOT_FOUND",
            Self::RateLimitExceeded { .. } => "RATE_LIMITED",
            Self::SmsDeliveryFailed => "SMS_DELIVERY_FAILED",
            Self::DatabaseError { .. } => "DATABASE_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::DuplicateEntry { .. } => "DUPLICATE_ENTRY",
            Self::ConfigurationError { .. } => "CONFIGURATION_ERROR",
            Self::MissingConfiguration { .. } => "MISSING_CONFIGURATION",
            Self::InternalError { .. } => "INTERNAL_ERROR",
            Self::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

/// A Result type alias using AuthError.
pub type AuthResult<T> = Result<T, AuthError>;

impl From<serde_json::Error> for AuthError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AuthError::CodeInvalid;
        assert_eq!(err.to_string(), "Code is invalid, expired, or already used");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AuthError::InvalidPhoneNumber.status_code(), 422);
        assert_eq!(AuthError::AccountNotFound.status_code(), 404);
        assert_eq!(
            AuthError::RateLimitExceeded {
                retry_after_seconds: 3600
            }
            .status_code(),
            429
        );
    }

    #[test]
    fn test_is_user_error() {
        assert!(AuthError::CodeExpired.is_user_error());
        assert!(!AuthError::internal("db unreachable").is_user_error());
    }

    #[test]
    fn test_internal_message_is_masked() {
        let err = AuthError::internal("connection pool exhausted");
        assert_eq!(err.to_string(), "Internal error. Try again");
    }
}
