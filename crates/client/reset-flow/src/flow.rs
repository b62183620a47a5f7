//! The four-step reset flow state machine.

use zip_auth_core::error::AuthError;

use crate::api::{RateLimitSnapshot, ResetApi};

/// The screen the user is currently on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetStep {
    /// Collecting the phone number.
    Phone,
    /// Collecting the 6-digit code.
    Code,
    /// Collecting the new password and confirmation.
    Password,
    /// Terminal; offers navigation to sign-in.
    Success,
}

/// Formats raw input for display as the user types: `(11) 98765-4321`.
///
/// Display-only grouping; the canonical form is derived server-side.
pub fn format_phone_display(input: &str) -> String {
    let digits: String = input
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(11)
        .collect();

    match digits.len() {
        0..=2 => digits,
        3..=7 => format!("({}) {}", &digits[..2], &digits[2..]),
        _ => format!("({}) {}-{}", &digits[..2], &digits[2..7], &digits[7..]),
    }
}

/// Maps an API error onto the message the user sees.
///
/// User-facing errors surface verbatim; anything unexpected collapses
/// into the generic connection message and leaves the step unchanged.
fn user_message(err: &AuthError) -> String {
    if err.is_user_error() {
        err.to_string()
    } else {
        "Connection error. Try again.".to_string()
    }
}

/// The reset flow: form fields, current step, cooldown, and messages.
///
/// Forward transitions only follow successful server responses; `back`
/// is user-initiated and leaves server state alone. At most one error
/// and one notice are displayed at a time, and editing any input clears
/// the error.
pub struct ResetFlow<A: ResetApi> {
    api: A,
    step: ResetStep,
    phone: String,
    code: String,
    new_password: String,
    confirm_password: String,
    error: Option<String>,
    notice: Option<String>,
    dev_code: Option<String>,
    rate_limit: Option<RateLimitSnapshot>,
    countdown: u64,
    resend_cooldown: u64,
    busy: bool,
}

impl<A: ResetApi> ResetFlow<A> {
    /// Creates a new flow on the phone step.
    pub fn new(api: A) -> Self {
        Self {
            api,
            step: ResetStep::Phone,
            phone: String::new(),
            code: String::new(),
            new_password: String::new(),
            confirm_password: String::new(),
            error: None,
            notice: None,
            dev_code: None,
            rate_limit: None,
            countdown: 0,
            resend_cooldown: 60,
            busy: false,
        }
    }

    /// Overrides the resend cooldown (seconds).
    pub fn with_resend_cooldown(mut self, seconds: u64) -> Self {
        self.resend_cooldown = seconds;
        self
    }

    // ==================== Read accessors ====================

    pub fn step(&self) -> ResetStep {
        self.step
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Raw code disclosed by the server outside production.
    pub fn dev_code(&self) -> Option<&str> {
        self.dev_code.as_deref()
    }

    pub fn rate_limit(&self) -> Option<&RateLimitSnapshot> {
        self.rate_limit.as_ref()
    }

    /// Seconds until the resend control re-enables.
    pub fn countdown(&self) -> u64 {
        self.countdown
    }

    /// True while a server call is in flight; submit controls disable.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Whether the resend control is enabled.
    pub fn can_resend(&self) -> bool {
        self.step == ResetStep::Code && self.countdown == 0 && !self.busy
    }

    /// Whether the current step's submit control is enabled.
    pub fn can_submit(&self) -> bool {
        if self.busy {
            return false;
        }
        match self.step {
            ResetStep::Phone => {
                !self.phone.is_empty()
                    && self.rate_limit.as_ref().map_or(true, |rl| rl.can_send)
            }
            ResetStep::Code => self.code.len() == 6,
            ResetStep::Password => {
                !self.new_password.is_empty() && !self.confirm_password.is_empty()
            }
            ResetStep::Success => false,
        }
    }

    // ==================== Input handlers ====================

    /// Updates the phone field, live-formatting for display.
    pub fn set_phone(&mut self, input: &str) {
        self.phone = format_phone_display(input);
        self.error = None;
    }

    /// Updates the code field; non-digits and overflow are discarded.
    pub fn set_code(&mut self, input: &str) {
        self.code = input
            .chars()
            .filter(|c| c.is_ascii_digit())
            .take(6)
            .collect();
        self.error = None;
    }

    pub fn set_new_password(&mut self, input: &str) {
        self.new_password = input.to_string();
        self.error = None;
    }

    pub fn set_confirm_password(&mut self, input: &str) {
        self.confirm_password = input.to_string();
        self.error = None;
    }

    /// One-second timer tick from the host; drives the resend countdown.
    pub fn tick(&mut self) {
        self.countdown = self.countdown.saturating_sub(1);
    }

    /// User-initiated back navigation. Does not invalidate server state.
    pub fn back(&mut self) {
        self.error = None;
        self.notice = None;
        match self.step {
            ResetStep::Code => self.step = ResetStep::Phone,
            ResetStep::Password => self.step = ResetStep::Code,
            ResetStep::Phone | ResetStep::Success => {}
        }
    }

    // ==================== Submission ====================

    /// Submits the current step.
    pub async fn submit(&mut self) {
        if self.busy {
            return;
        }
        match self.step {
            ResetStep::Phone => self.submit_phone().await,
            ResetStep::Code => self.submit_code().await,
            ResetStep::Password => self.submit_password().await,
            ResetStep::Success => {}
        }
    }

    /// Re-sends the code; disabled while the countdown runs.
    pub async fn resend(&mut self) {
        if self.countdown > 0 || self.busy {
            return;
        }
        self.submit_phone().await;
    }

    async fn submit_phone(&mut self) {
        self.busy = true;
        self.error = None;
        self.notice = None;

        let digit_count = self.phone.chars().filter(|c| c.is_ascii_digit()).count();
        if !matches!(digit_count, 10 | 11 | 13) {
            self.error = Some(AuthError::InvalidPhoneNumber.to_string());
            self.busy = false;
            return;
        }

        // Pre-check the window for display; a failed read never blocks
        // the attempt.
        if let Ok(snapshot) = self.api.rate_limit(&self.phone).await {
            let blocked = !snapshot.can_send;
            self.rate_limit = Some(snapshot);
            if blocked {
                self.error = Some("Too many attempts. Try again in 1 hour".to_string());
                self.busy = false;
                return;
            }
        }

        match self.api.request_code(&self.phone).await {
            Ok(requested) => {
                self.notice = Some(requested.message);
                self.dev_code = requested.dev_code;
                self.step = ResetStep::Code;
                self.countdown = self.resend_cooldown;
            }
            Err(err) => {
                self.error = Some(user_message(&err));
            }
        }
        self.busy = false;
    }

    async fn submit_code(&mut self) {
        self.busy = true;
        self.error = None;

        if self.code.len() != 6 {
            self.error = Some(AuthError::InvalidCodeFormat.to_string());
            self.busy = false;
            return;
        }

        match self.api.check_code(&self.phone, &self.code).await {
            Ok(()) => {
                self.notice = Some("Code verified successfully!".to_string());
                self.step = ResetStep::Password;
            }
            Err(err) => {
                self.error = Some(user_message(&err));
            }
        }
        self.busy = false;
    }

    async fn submit_password(&mut self) {
        self.busy = true;
        self.error = None;

        if self.new_password.chars().count() < 6 {
            self.error = Some("New password must be at least 6 characters".to_string());
            self.busy = false;
            return;
        }
        if self.new_password != self.confirm_password {
            self.error = Some("Passwords do not match".to_string());
            self.busy = false;
            return;
        }

        match self
            .api
            .reset_password(&self.phone, &self.code, &self.new_password)
            .await
        {
            Ok(()) => {
                self.notice = Some("Password reset successfully!".to_string());
                self.step = ResetStep::Success;
            }
            Err(err) => {
                self.error = Some(user_message(&err));
            }
        }
        self.busy = false;
    }
}
