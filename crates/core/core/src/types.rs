//! Core data types for the ZipFood auth service.
//!
//! This module defines the canonical `Account` struct that the password-reset
//! flow operates on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Represents a customer, restaurant, or courier account in the system.
///
/// The `Account` struct contains the base fields that are always present,
/// plus an `extensions` map that holds plugin-specific data (verification
/// codes, password hashes, and the like). Plugins provide trait-based
/// accessors to interact with their extension fields in a type-safe manner.
///
/// The phone number is the primary lookup key for the reset flow and is
/// stored in canonical `+55…` form; callers are expected to normalize
/// before constructing or querying.
///
/// # Example
///
/// ```rust
/// use zip_auth_core::Account;
///
/// let account = Account::new("acc_123".to_string(), "+5511987654321".to_string());
/// assert!(account.email.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier for the account (typically a UUID)
    pub id: String,

    /// The account's phone number in canonical form
    pub phone: String,

    /// Optional email address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Optional display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Timestamp when the account was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the account was last updated
    pub updated_at: DateTime<Utc>,

    /// Extension data from plugins.
    ///
    /// This map holds arbitrary key-value pairs that plugins can use to
    /// store additional account data. Writes go through merge-style
    /// updates so one plugin's fields never clobber another's.
    #[serde(default, flatten)]
    pub extensions: HashMap<String, Value>,
}

impl Account {
    /// Creates a new account with the given ID and phone number.
    pub fn new(id: String, phone: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            phone,
            email: None,
            name: None,
            created_at: now,
            updated_at: now,
            extensions: HashMap::new(),
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the email address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Gets an extension value by key, deserializing it to the requested type.
    ///
    /// Returns `None` if the key doesn't exist, holds JSON null, or
    /// deserialization fails.
    pub fn get_extension<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        self.extensions
            .get(key)
            .filter(|v| !v.is_null())
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Sets an extension value by key.
    ///
    /// The value is serialized to JSON before storage.
    pub fn set_extension<T: Serialize>(&mut self, key: &str, value: T) {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.extensions.insert(key.to_string(), json_value);
            self.updated_at = Utc::now();
        }
    }

    /// Removes an extension value by key.
    ///
    /// Returns the removed value if it existed.
    pub fn remove_extension(&mut self, key: &str) -> Option<Value> {
        let result = self.extensions.remove(key);
        if result.is_some() {
            self.updated_at = Utc::now();
        }
        result
    }

    /// Merges a set of fields into the extensions map.
    ///
    /// A `Value::Null` removes the key, matching the partial-update
    /// semantics the storage layer exposes.
    pub fn merge_extensions(&mut self, fields: HashMap<String, Value>) {
        for (key, value) in fields {
            if value.is_null() {
                self.extensions.remove(&key);
            } else {
                self.extensions.insert(key, value);
            }
        }
        self.updated_at = Utc::now();
    }
}

impl Default for Account {
    fn default() -> Self {
        Self::new(uuid::Uuid::new_v4().to_string(), String::new())
    }
}
