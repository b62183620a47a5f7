//! Configuration for the phone reset plugin.

/// Configuration for the phone-based password reset flow.
#[derive(Debug, Clone)]
pub struct PhoneResetConfig {
    /// Number of digits in the reset code. Default: 6.
    pub code_length: u32,
    /// Code expiration time in seconds. Default: 900 (15 minutes).
    pub expires_in: u64,
    /// Client-side resend cooldown in seconds. Default: 60.
    pub resend_cooldown: u64,
    /// Maximum code sends per phone per window. Default: 5.
    pub max_sends: u32,
    /// Send-rate window in seconds. Default: 3600 (1 hour).
    pub send_window: u64,
    /// Minimum accepted password length. Default: 6.
    pub min_password_length: usize,
    /// Brand name prepended to the SMS template.
    pub brand: String,
    /// Whether responses include the raw code for local testing.
    /// Must stay off in production configuration.
    pub expose_dev_code: bool,
}

impl Default for PhoneResetConfig {
    fn default() -> Self {
        Self {
            code_length: 6,
            expires_in: 15 * 60,
            resend_cooldown: 60,
            max_sends: 5,
            send_window: 60 * 60,
            min_password_length: 6,
            brand: "ZipFood".to_string(),
            expose_dev_code: false,
        }
    }
}

impl PhoneResetConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the code length.
    pub fn code_length(mut self, length: u32) -> Self {
        self.code_length = length;
        self
    }

    /// Sets the code expiration time in seconds.
    pub fn expires_in(mut self, seconds: u64) -> Self {
        self.expires_in = seconds;
        self
    }

    /// Sets the client resend cooldown in seconds.
    pub fn resend_cooldown(mut self, seconds: u64) -> Self {
        self.resend_cooldown = seconds;
        self
    }

    /// Sets the send quota per window.
    pub fn max_sends(mut self, max: u32) -> Self {
        self.max_sends = max;
        self
    }

    /// Sets the send-rate window in seconds.
    pub fn send_window(mut self, seconds: u64) -> Self {
        self.send_window = seconds;
        self
    }

    /// Sets the minimum password length.
    pub fn min_password_length(mut self, length: usize) -> Self {
        self.min_password_length = length;
        self
    }

    /// Sets the SMS brand name.
    pub fn brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = brand.into();
        self
    }

    /// Enables raw-code disclosure in responses (local testing only).
    pub fn expose_dev_code(mut self) -> Self {
        self.expose_dev_code = true;
        self
    }

    /// Renders the SMS body for a reset code.
    pub fn reset_message(&self, code: &str) -> String {
        format!(
            "{}: Your password reset code is {}. Valid for {} minutes. Do not share this code.",
            self.brand,
            code,
            self.expires_in / 60
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PhoneResetConfig::default();
        assert_eq!(config.code_length, 6);
        assert_eq!(config.expires_in, 900);
        assert_eq!(config.max_sends, 5);
        assert!(!config.expose_dev_code);
    }

    #[test]
    fn test_reset_message() {
        let config = PhoneResetConfig::new().brand("TestBrand");
        let message = config.reset_message("123456");
        assert!(message.starts_with("TestBrand:"));
        assert!(message.contains("123456"));
        assert!(message.contains("15 minutes"));
        assert!(message.contains("Do not share"));
    }
}
