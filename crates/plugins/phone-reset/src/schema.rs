//! Schema definitions and account accessors for the phone reset plugin.

use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::collections::HashMap;
use zip_auth_core::schema::{Field, FieldType};
use zip_auth_core::traits::ExtensionProvider;
use zip_auth_core::types::Account;
use zip_auth_otp_utils::ResetCodeRecord;

/// Extension key holding the active reset code.
pub const VERIFICATION_CODE: &str = "verification_code";
/// Extension key holding the reset code expiry.
pub const VERIFICATION_EXPIRES: &str = "verification_expires";
/// Extension key holding the argon2 password hash.
pub const PASSWORD_HASH: &str = "password_hash";

/// Account extension fields owned by this plugin.
pub struct ResetFieldsExt;

impl ExtensionProvider for ResetFieldsExt {
    fn extends() -> &'static str {
        "account"
    }

    fn fields() -> Vec<Field> {
        vec![
            Field::optional(VERIFICATION_CODE, FieldType::String(10)).private(),
            Field::optional(VERIFICATION_EXPIRES, FieldType::Timestamp).private(),
            Field::optional(PASSWORD_HASH, FieldType::Text).private(),
        ]
    }
}

/// Builds the merge fields that persist a freshly issued code.
///
/// Persisting a new code overwrites the previous pair, which is what
/// invalidates any code still in flight.
pub fn reset_code_fields(code: &str, expires_at: DateTime<Utc>) -> HashMap<String, Value> {
    let mut fields = HashMap::new();
    fields.insert(VERIFICATION_CODE.to_string(), json!(code));
    fields.insert(VERIFICATION_EXPIRES.to_string(), json!(expires_at));
    fields
}

/// Builds the merge fields that clear a consumed or expired code.
pub fn cleared_reset_code_fields() -> HashMap<String, Value> {
    let mut fields = HashMap::new();
    fields.insert(VERIFICATION_CODE.to_string(), Value::Null);
    fields.insert(VERIFICATION_EXPIRES.to_string(), Value::Null);
    fields
}

/// Trait for reset-flow operations on accounts.
pub trait ResetAccountExt {
    /// Gets the active reset-code record, if both code and expiry are set.
    fn reset_code_record(&self) -> Option<ResetCodeRecord>;
    /// Gets the stored password hash.
    fn password_hash(&self) -> Option<String>;
    /// Checks if the account has a password set.
    fn has_password(&self) -> bool;
}

impl ResetAccountExt for Account {
    fn reset_code_record(&self) -> Option<ResetCodeRecord> {
        let code: String = self.get_extension(VERIFICATION_CODE)?;
        let expires_at: DateTime<Utc> = self.get_extension(VERIFICATION_EXPIRES)?;
        Some(ResetCodeRecord {
            code,
            account_id: self.id.clone(),
            expires_at,
        })
    }

    fn password_hash(&self) -> Option<String> {
        self.get_extension(PASSWORD_HASH)
    }

    fn has_password(&self) -> bool {
        self.password_hash().is_some()
    }
}
