//! Development transport that logs instead of sending.

use async_trait::async_trait;
use std::time::Duration;
use zip_auth_core::error::AuthResult;
use zip_auth_core::traits::SmsTransport;

/// Simulated SMS transport for development and tests.
///
/// Logs the message, waits a beat to imitate gateway latency, and always
/// reports success.
#[derive(Debug, Clone)]
pub struct MockTransport {
    latency: Duration,
}

impl MockTransport {
    /// Creates a mock with the default ~1s simulated latency.
    pub fn new() -> Self {
        Self {
            latency: Duration::from_millis(1000),
        }
    }

    /// Overrides the simulated latency (tests use zero).
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SmsTransport for MockTransport {
    async fn send(&self, to: &str, body: &str) -> AuthResult<()> {
        tracing::info!(to, body, "[mock sms]");
        tokio::time::sleep(self.latency).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_always_succeeds() {
        let transport = MockTransport::new().with_latency(Duration::ZERO);
        assert!(transport.send("+5511987654321", "code 123456").await.is_ok());
    }
}
