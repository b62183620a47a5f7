//! The server surface the reset flow talks to.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zip_auth_core::error::AuthResult;

/// Outcome of a successful request-code call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeRequested {
    /// User-facing confirmation message.
    pub message: String,
    /// Raw code disclosed outside production builds.
    #[serde(rename = "devCode", skip_serializing_if = "Option::is_none")]
    pub dev_code: Option<String>,
}

/// Send-rate window snapshot shown on the phone step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitSnapshot {
    /// Sends left in the current window.
    pub remaining: u32,
    /// Whether another send would be accepted.
    #[serde(rename = "canSend")]
    pub can_send: bool,
    /// When the current window resets, if one is open.
    #[serde(rename = "resetAt")]
    pub reset_at: Option<DateTime<Utc>>,
}

/// Abstract client for the phone-reset endpoints.
///
/// The production binding goes over HTTP; tests and the demo binary bind
/// directly to the service.
#[async_trait]
pub trait ResetApi: Send + Sync {
    /// Requests a reset code for the phone number.
    async fn request_code(&self, phone: &str) -> AuthResult<CodeRequested>;

    /// Checks a code without consuming it.
    async fn check_code(&self, phone: &str, code: &str) -> AuthResult<()>;

    /// Consumes the code and sets the new password.
    async fn reset_password(&self, phone: &str, code: &str, new_password: &str) -> AuthResult<()>;

    /// Reads the current send-rate window for display.
    async fn rate_limit(&self, phone: &str) -> AuthResult<RateLimitSnapshot>;
}
