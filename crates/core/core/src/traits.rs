//! Core traits for the ZipFood auth service.
//!
//! This module defines the trait interfaces that plugins, storage adapters,
//! and SMS transports must implement to integrate with the service.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

use crate::error::AuthResult;
use crate::router::Router;
use crate::schema::{ModelDefinition, SchemaBuilder};
use crate::types::Account;

/// Trait for providing schema definitions.
///
/// Plugins and models implement this trait to declare their database
/// schema requirements. The schema engine aggregates these definitions
/// so adapters can materialize them.
pub trait SchemaProvider {
    /// Returns the model definitions required by this provider.
    fn schema() -> Vec<ModelDefinition>;
}

/// Trait for providing extension fields to existing models.
///
/// Plugins implement this trait to declare additional fields they
/// need on existing models (like Account).
pub trait ExtensionProvider {
    /// Returns the model name being extended (e.g., "account").
    fn extends() -> &'static str;

    /// Returns the additional fields to add to the model.
    fn fields() -> Vec<crate::schema::Field>;
}

/// Trait for auth plugins.
///
/// Plugins implement this trait to declare their schema requirements and
/// register their request handlers with the router.
pub trait AuthPlugin: Send + Sync {
    /// Returns the unique identifier for this plugin.
    fn id(&self) -> &'static str;

    /// Returns a human-readable name for this plugin.
    fn name(&self) -> &'static str;

    /// Defines the schema requirements for this plugin.
    fn define_schema(&self, _builder: &mut SchemaBuilder) {}

    /// Registers routes for this plugin.
    fn register_routes(&self, _router: &mut Router) {}
}

/// Trait for storage adapters (database backends).
///
/// Adapters implement this trait to provide persistence for accounts.
/// `merge_fields` must implement partial-update semantics: writing one
/// plugin's extension fields leaves every other field untouched, and a
/// JSON null clears the key.
#[async_trait]
pub trait AccountStore: Send + Sync {
    // ==================== Account Operations ====================

    /// Creates a new account.
    async fn create_account(&self, account: &Account) -> AuthResult<Account>;

    /// Gets an account by ID.
    async fn get_account_by_id(&self, id: &str) -> AuthResult<Option<Account>>;

    /// Gets an account by its canonical phone number.
    async fn get_account_by_phone(&self, phone: &str) -> AuthResult<Option<Account>>;

    /// Updates an existing account.
    async fn update_account(&self, account: &Account) -> AuthResult<Account>;

    /// Merges extension fields onto an account without touching other
    /// fields. A `Value::Null` clears the key.
    async fn merge_fields(&self, id: &str, fields: HashMap<String, Value>) -> AuthResult<Account>;

    /// Deletes an account by ID.
    async fn delete_account(&self, id: &str) -> AuthResult<()>;

    /// Lists accounts with pagination.
    async fn list_accounts(&self, offset: usize, limit: usize) -> AuthResult<Vec<Account>> {
        // Default implementation - adapters can override for efficiency
        let _ = (offset, limit);
        Ok(Vec::new())
    }

    /// Counts total accounts.
    async fn count_accounts(&self) -> AuthResult<usize> {
        Ok(0)
    }

    // ==================== Schema Operations ====================

    /// Runs schema migrations.
    async fn migrate(&self, models: &[ModelDefinition]) -> AuthResult<()>;

    /// Checks if a table exists.
    async fn table_exists(&self, table_name: &str) -> AuthResult<bool>;
}

/// Trait for SMS transports.
///
/// The production binding calls a carrier gateway; the development binding
/// logs and simulates success. A send failure is non-fatal to callers: an
/// already-persisted code stays valid for a later resend.
#[async_trait]
pub trait SmsTransport: Send + Sync {
    /// Sends `body` to the given phone number (canonical form).
    async fn send(&self, to: &str, body: &str) -> AuthResult<()>;
}
