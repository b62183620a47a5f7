//! Twilio REST gateway transport.

use async_trait::async_trait;
use zip_auth_core::error::{AuthError, AuthResult};
use zip_auth_core::traits::SmsTransport;

const TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01";

/// Credentials and sender number for the Twilio gateway.
///
/// All three values come from environment configuration; none has a
/// sensible default.
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    /// Twilio account SID.
    pub account_sid: String,
    /// Twilio auth token.
    pub auth_token: String,
    /// Sender phone number in `+…` form.
    pub from_number: String,
}

impl TwilioConfig {
    /// Creates a new config from explicit values.
    pub fn new(
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
        from_number: impl Into<String>,
    ) -> Self {
        Self {
            account_sid: account_sid.into(),
            auth_token: auth_token.into(),
            from_number: from_number.into(),
        }
    }

    /// Loads the config from `TWILIO_ACCOUNT_SID`, `TWILIO_AUTH_TOKEN`,
    /// and `TWILIO_FROM_NUMBER`.
    pub fn from_env() -> AuthResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AuthResult<Self> {
        let var = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or(AuthError::MissingConfiguration {
                    key: key.to_string(),
                })
        };

        Ok(Self {
            account_sid: var("TWILIO_ACCOUNT_SID")?,
            auth_token: var("TWILIO_AUTH_TOKEN")?,
            from_number: var("TWILIO_FROM_NUMBER")?,
        })
    }
}

/// SMS transport backed by the Twilio Messages API.
///
/// Sends are authenticated with account-SID basic auth. Any non-success
/// response maps to [`AuthError::SmsDeliveryFailed`]; the caller treats
/// that as retriable and keeps the issued code.
pub struct TwilioTransport {
    config: TwilioConfig,
    http: reqwest::Client,
}

impl TwilioTransport {
    /// Creates a new transport with the given config.
    pub fn new(config: TwilioConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/Accounts/{}/Messages.json",
            TWILIO_API_BASE, self.config.account_sid
        )
    }
}

#[async_trait]
impl SmsTransport for TwilioTransport {
    async fn send(&self, to: &str, body: &str) -> AuthResult<()> {
        let params = [
            ("From", self.config.from_number.as_str()),
            ("To", to),
            ("Body", body),
        ];

        let response = self
            .http
            .post(self.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&params)
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => {
                tracing::debug!(to, "sms dispatched via twilio");
                Ok(())
            }
            Ok(resp) => {
                tracing::warn!(to, status = %resp.status(), "twilio rejected sms send");
                Err(AuthError::SmsDeliveryFailed)
            }
            Err(err) => {
                tracing::warn!(to, error = %err, "twilio request failed");
                Err(AuthError::SmsDeliveryFailed)
            }
        }
    }
}
