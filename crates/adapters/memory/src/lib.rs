//! # ZipFood Auth Memory Adapter
//!
//! An in-memory account store, primarily intended for testing and
//! development purposes.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use zip_auth_adapter_memory::MemoryStore;
//!
//! let store = MemoryStore::new();
//! let service = PhoneResetService::new(config, Arc::new(store), transport);
//! ```

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use zip_auth_core::error::{AuthError, AuthResult};
use zip_auth_core::schema::ModelDefinition;
use zip_auth_core::traits::AccountStore;
use zip_auth_core::types::Account;

/// In-memory account store.
///
/// This adapter stores all data in memory and is suitable for testing and
/// development. Data is lost when the process exits.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    accounts: Arc<RwLock<HashMap<String, Account>>>,
    tables: Arc<RwLock<Vec<String>>>,
}

impl MemoryStore {
    /// Creates a new in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all stored data.
    pub async fn clear(&self) {
        self.accounts.write().await.clear();
        self.tables.write().await.clear();
    }

    /// Returns the number of accounts stored.
    pub async fn account_count(&self) -> usize {
        self.accounts.read().await.len()
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn create_account(&self, account: &Account) -> AuthResult<Account> {
        let mut accounts = self.accounts.write().await;

        // Check for duplicate phone
        if accounts.values().any(|a| a.phone == account.phone) {
            return Err(AuthError::duplicate("account", "phone", &account.phone));
        }

        accounts.insert(account.id.clone(), account.clone());
        Ok(account.clone())
    }

    async fn get_account_by_id(&self, id: &str) -> AuthResult<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(id).cloned())
    }

    async fn get_account_by_phone(&self, phone: &str) -> AuthResult<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().find(|a| a.phone == phone).cloned())
    }

    async fn update_account(&self, account: &Account) -> AuthResult<Account> {
        let mut accounts = self.accounts.write().await;

        if !accounts.contains_key(&account.id) {
            return Err(AuthError::not_found("account", "id", &account.id));
        }

        accounts.insert(account.id.clone(), account.clone());
        Ok(account.clone())
    }

    async fn merge_fields(&self, id: &str, fields: HashMap<String, Value>) -> AuthResult<Account> {
        let mut accounts = self.accounts.write().await;

        let account = accounts
            .get_mut(id)
            .ok_or_else(|| AuthError::not_found("account", "id", id))?;

        account.merge_extensions(fields);
        Ok(account.clone())
    }

    async fn delete_account(&self, id: &str) -> AuthResult<()> {
        let mut accounts = self.accounts.write().await;
        accounts.remove(id);
        Ok(())
    }

    async fn list_accounts(&self, offset: usize, limit: usize) -> AuthResult<Vec<Account>> {
        let accounts = self.accounts.read().await;
        let mut all: Vec<Account> = accounts.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(all.into_iter().skip(offset).take(limit).collect())
    }

    async fn count_accounts(&self) -> AuthResult<usize> {
        Ok(self.accounts.read().await.len())
    }

    async fn migrate(&self, models: &[ModelDefinition]) -> AuthResult<()> {
        let mut tables = self.tables.write().await;
        for model in models {
            if !tables.contains(&model.name) {
                tables.push(model.name.clone());
            }
        }
        Ok(())
    }

    async fn table_exists(&self, table_name: &str) -> AuthResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables.contains(&table_name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_and_get_account() {
        let store = MemoryStore::new();
        let account = Account::new("acc_1".to_string(), "+5511987654321".to_string());

        let created = store.create_account(&account).await.unwrap();
        assert_eq!(created.id, "acc_1");

        let fetched = store.get_account_by_id("acc_1").await.unwrap();
        assert!(fetched.is_some());
        assert_eq!(fetched.unwrap().phone, "+5511987654321");
    }

    #[tokio::test]
    async fn test_duplicate_phone_rejected() {
        let store = MemoryStore::new();
        let first = Account::new("acc_1".to_string(), "+5511987654321".to_string());
        let second = Account::new("acc_2".to_string(), "+5511987654321".to_string());

        store.create_account(&first).await.unwrap();
        let result = store.create_account(&second).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_lookup_by_phone() {
        let store = MemoryStore::new();
        let account = Account::new("acc_1".to_string(), "+5521912345678".to_string());
        store.create_account(&account).await.unwrap();

        let found = store
            .get_account_by_phone("+5521912345678")
            .await
            .unwrap();
        assert_eq!(found.unwrap().id, "acc_1");

        let missing = store.get_account_by_phone("+5511900000000").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_merge_fields_preserves_other_fields() {
        let store = MemoryStore::new();
        let mut account = Account::new("acc_1".to_string(), "+5511987654321".to_string());
        account.set_extension("password_hash", "argon2-hash");
        store.create_account(&account).await.unwrap();

        let mut fields = HashMap::new();
        fields.insert("verification_code".to_string(), json!("123456"));
        let merged = store.merge_fields("acc_1", fields).await.unwrap();

        assert_eq!(
            merged.get_extension::<String>("verification_code"),
            Some("123456".to_string())
        );
        assert_eq!(
            merged.get_extension::<String>("password_hash"),
            Some("argon2-hash".to_string())
        );

        // Null clears the key
        let mut fields = HashMap::new();
        fields.insert("verification_code".to_string(), Value::Null);
        let cleared = store.merge_fields("acc_1", fields).await.unwrap();
        assert_eq!(cleared.get_extension::<String>("verification_code"), None);
    }

    #[tokio::test]
    async fn test_merge_fields_unknown_account() {
        let store = MemoryStore::new();
        let result = store.merge_fields("missing", HashMap::new()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_migrate_records_tables() {
        let store = MemoryStore::new();
        store
            .migrate(&zip_auth_core::schema::core_schema())
            .await
            .unwrap();
        assert!(store.table_exists("account").await.unwrap());
        assert!(!store.table_exists("session").await.unwrap());
    }
}
