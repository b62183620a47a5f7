//! The verification orchestrator.
//!
//! Owns the send/check/verify/reset pipeline: phone normalization, the
//! send-rate limiter, code issuance and persistence (with the in-memory
//! fallback), SMS dispatch, and single-use verification. Constructed once
//! at application start and shared as an `Arc`; the store and transport
//! are injected traits.

use chrono::{Duration, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use zip_auth_core::error::{AuthError, AuthResult};
use zip_auth_core::traits::{AccountStore, SmsTransport};
use zip_auth_otp_utils::{
    is_code_shape, CodeCheck, CodeConfig, CodeGenerator, RateLimitConfig, RateLimitResult,
    RateLimitStats, RateLimiter, ResetCodeRecord,
};

use crate::config::PhoneResetConfig;
use crate::password;
use crate::phone;
use crate::schema::{self, ResetAccountExt, PASSWORD_HASH};

/// Result of a successful code send.
#[derive(Debug, Clone, Serialize)]
pub struct CodeIssued {
    /// User-facing confirmation message.
    pub message: String,
    /// The raw code, present only when dev-code disclosure is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dev_code: Option<String>,
}

/// Result of a successful (consuming) verification.
#[derive(Debug, Clone, Serialize)]
pub struct CodeVerified {
    /// The account the code was issued for.
    pub account_id: String,
}

/// Phone-based password reset service.
pub struct PhoneResetService {
    config: PhoneResetConfig,
    store: Arc<dyn AccountStore>,
    transport: Arc<dyn SmsTransport>,
    generator: CodeGenerator,
    limiter: Mutex<RateLimiter>,
    /// Codes that could not be persisted, keyed by normalized phone.
    /// Process-lifetime only; entries are consumed or overwritten like
    /// their persistent counterparts.
    fallback: RwLock<HashMap<String, ResetCodeRecord>>,
}

impl PhoneResetService {
    /// Creates a new service with injected store and transport.
    pub fn new(
        config: PhoneResetConfig,
        store: Arc<dyn AccountStore>,
        transport: Arc<dyn SmsTransport>,
    ) -> Self {
        let generator = CodeGenerator::new(CodeConfig::new(config.code_length));
        let limiter = RateLimiter::new(RateLimitConfig::new(
            config.max_sends,
            Duration::seconds(config.send_window as i64),
        ));

        Self {
            config,
            store,
            transport,
            generator,
            limiter: Mutex::new(limiter),
            fallback: RwLock::new(HashMap::new()),
        }
    }

    /// Gets the service configuration.
    pub fn config(&self) -> &PhoneResetConfig {
        &self.config
    }

    /// Issues a reset code for the given phone and dispatches it by SMS.
    ///
    /// The new code overwrites any previously issued one for the account,
    /// so only the latest code can ever verify. A failed SMS dispatch
    /// leaves the persisted code in place for a later resend.
    pub async fn send_reset_code(&self, phone: &str) -> AuthResult<CodeIssued> {
        let normalized = phone::normalize(phone).ok_or(AuthError::InvalidPhoneNumber)?;

        {
            let mut limiter = self.limiter.lock().await;
            if let RateLimitResult::Limited { retry_after_ms, .. } = limiter.check(&normalized) {
                tracing::info!(phone = %normalized, "reset code send rate limited");
                return Err(AuthError::RateLimitExceeded {
                    retry_after_seconds: (retry_after_ms / 1000).max(0) as u64,
                });
            }
        }

        let account = self
            .store
            .get_account_by_phone(&normalized)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        let code = self.generator.generate();
        let expires_at = Utc::now() + Duration::seconds(self.config.expires_in as i64);

        // Persist the code; fall back to process memory when the write fails
        // so the flow can still complete within this instance's uptime.
        let fields = schema::reset_code_fields(&code, expires_at);
        match self.store.merge_fields(&account.id, fields).await {
            Ok(_) => {
                // A stale fallback entry must not outlive the code that
                // just superseded it.
                self.fallback.write().await.remove(&normalized);
            }
            Err(err) => {
                tracing::warn!(
                    account_id = %account.id,
                    error = %err,
                    "storing reset code failed, keeping it in memory"
                );
                self.fallback.write().await.insert(
                    normalized.clone(),
                    ResetCodeRecord {
                        code: code.clone(),
                        account_id: account.id.clone(),
                        expires_at,
                    },
                );
            }
        }

        let body = self.config.reset_message(&code);
        if self.transport.send(&normalized, &body).await.is_err() {
            return Err(AuthError::SmsDeliveryFailed);
        }

        tracing::info!(phone = %normalized, "reset code sent");
        Ok(CodeIssued {
            message: "Code sent successfully!".to_string(),
            dev_code: self.config.expose_dev_code.then_some(code),
        })
    }

    /// Checks a submitted code without consuming it.
    ///
    /// The client's code step uses this so the final reset performs the
    /// single consuming verification.
    pub async fn check_code(&self, phone: &str, code: &str) -> AuthResult<()> {
        let normalized = self.validate_submission(phone, code)?;

        let mut expired = false;
        for record in self.candidate_records(&normalized).await {
            match record.check(code) {
                CodeCheck::Valid => return Ok(()),
                CodeCheck::Expired => expired = true,
                CodeCheck::Mismatch => {}
            }
        }

        if expired {
            Err(AuthError::CodeExpired)
        } else {
            Err(AuthError::CodeInvalid)
        }
    }

    /// Verifies a submitted code, consuming it on success.
    ///
    /// An expired match is cleared and reported as expired; any other
    /// failure collapses into the indistinct invalid-code error.
    pub async fn verify_code(&self, phone: &str, code: &str) -> AuthResult<CodeVerified> {
        let normalized = self.validate_submission(phone, code)?;

        // Persistent store first
        match self.store.get_account_by_phone(&normalized).await {
            Ok(Some(account)) => {
                if let Some(record) = account.reset_code_record() {
                    match record.check(code) {
                        CodeCheck::Valid => {
                            self.store
                                .merge_fields(&account.id, schema::cleared_reset_code_fields())
                                .await?;
                            tracing::info!(account_id = %account.id, "reset code verified");
                            return Ok(CodeVerified {
                                account_id: account.id,
                            });
                        }
                        CodeCheck::Expired => {
                            self.store
                                .merge_fields(&account.id, schema::cleared_reset_code_fields())
                                .await?;
                            return Err(AuthError::CodeExpired);
                        }
                        CodeCheck::Mismatch => {}
                    }
                }
            }
            Ok(None) => {}
            Err(err) => {
                // The fallback map may still hold the code this instance issued.
                tracing::warn!(error = %err, "store lookup failed during verification");
            }
        }

        // Ephemeral fallback
        let mut fallback = self.fallback.write().await;
        if let Some(record) = fallback.get(&normalized) {
            match record.check(code) {
                CodeCheck::Valid => {
                    let account_id = record.account_id.clone();
                    fallback.remove(&normalized);
                    tracing::info!(account_id = %account_id, "reset code verified from fallback");
                    return Ok(CodeVerified { account_id });
                }
                CodeCheck::Expired => {
                    fallback.remove(&normalized);
                    return Err(AuthError::CodeExpired);
                }
                CodeCheck::Mismatch => {}
            }
        }

        Err(AuthError::CodeInvalid)
    }

    /// Resets the account password after consuming a valid code.
    pub async fn reset_password(
        &self,
        phone: &str,
        code: &str,
        new_password: &str,
    ) -> AuthResult<()> {
        if new_password.chars().count() < self.config.min_password_length {
            return Err(AuthError::WeakPassword {
                reason: format!(
                    "must be at least {} characters",
                    self.config.min_password_length
                ),
            });
        }

        let verified = self.verify_code(phone, code).await?;
        let hash = password::hash_password(new_password)?;

        let mut fields = HashMap::new();
        fields.insert(PASSWORD_HASH.to_string(), serde_json::json!(hash));
        self.store.merge_fields(&verified.account_id, fields).await?;

        tracing::info!(account_id = %verified.account_id, "password reset completed");
        Ok(())
    }

    /// Administrative clear of any stored code for a phone.
    ///
    /// Silently ignores phones that do not normalize, like the callers
    /// that invoke it on teardown paths expect.
    pub async fn clear_reset_code(&self, phone: &str) -> AuthResult<()> {
        let Some(normalized) = phone::normalize(phone) else {
            return Ok(());
        };

        if let Some(account) = self.store.get_account_by_phone(&normalized).await? {
            if account.reset_code_record().is_some() {
                self.store
                    .merge_fields(&account.id, schema::cleared_reset_code_fields())
                    .await?;
            }
        }

        self.fallback.write().await.remove(&normalized);
        Ok(())
    }

    /// Returns the current send-rate window for a phone, for UI display.
    ///
    /// `None` when the phone does not normalize.
    pub async fn rate_limit_stats(&self, phone: &str) -> Option<RateLimitStats> {
        let normalized = phone::normalize(phone)?;
        Some(self.limiter.lock().await.stats(&normalized))
    }

    /// Administrative reset of the send-rate window for a phone.
    pub async fn clear_rate_limit(&self, phone: &str) {
        if let Some(normalized) = phone::normalize(phone) {
            self.limiter.lock().await.reset(&normalized);
        }
    }

    /// One-time backfill rewriting stored phones to canonical form.
    ///
    /// Returns the number of accounts updated. Rows that cannot be
    /// normalized are left alone and logged.
    pub async fn normalize_stored_phones(&self) -> AuthResult<usize> {
        const PAGE: usize = 100;
        let mut updated = 0;
        let mut offset = 0;

        loop {
            let page = self.store.list_accounts(offset, PAGE).await?;
            if page.is_empty() {
                break;
            }
            offset += page.len();

            for mut account in page {
                match phone::normalize(&account.phone) {
                    Some(canonical) if canonical != account.phone => {
                        account.phone = canonical;
                        self.store.update_account(&account).await?;
                        updated += 1;
                    }
                    Some(_) => {}
                    None => {
                        tracing::warn!(account_id = %account.id, "stored phone cannot be normalized");
                    }
                }
            }
        }

        if updated > 0 {
            tracing::info!(updated, "stored phones normalized");
        }
        Ok(updated)
    }

    /// Validates a phone/code submission shape, returning the normalized
    /// phone. Shape failures never reach storage.
    fn validate_submission(&self, phone: &str, code: &str) -> AuthResult<String> {
        let normalized = phone::normalize(phone).ok_or(AuthError::InvalidPhoneNumber)?;
        if !is_code_shape(code, self.config.code_length as usize) {
            return Err(AuthError::InvalidCodeFormat);
        }
        Ok(normalized)
    }

    /// Collects the active code records for a normalized phone: the
    /// persistent one first, then any fallback entry.
    async fn candidate_records(&self, normalized: &str) -> Vec<ResetCodeRecord> {
        let mut records = Vec::new();

        match self.store.get_account_by_phone(normalized).await {
            Ok(Some(account)) => {
                if let Some(record) = account.reset_code_record() {
                    records.push(record);
                }
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(error = %err, "store lookup failed during code check");
            }
        }

        if let Some(record) = self.fallback.read().await.get(normalized) {
            records.push(record.clone());
        }

        records
    }
}
