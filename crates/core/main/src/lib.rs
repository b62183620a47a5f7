//! # ZipFood Auth
//!
//! A phone-based account verification and password reset service.
//!
//! This facade re-exports the core types and provides the top-level
//! configuration struct.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use zip_auth::prelude::*;
//! use zip_auth_adapter_memory::MemoryStore;
//! use zip_auth_plugin_phone_reset::{PhoneResetConfig, PhoneResetService};
//! use zip_auth_sms::MockTransport;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AuthError> {
//!     let store = Arc::new(MemoryStore::new());
//!     store.migrate(&zip_auth_core::schema::core_schema()).await?;
//!
//!     let service = PhoneResetService::new(
//!         PhoneResetConfig::default(),
//!         store,
//!         Arc::new(MockTransport::new()),
//!     );
//!
//!     let issued = service.send_reset_code("(11) 98765-4321").await?;
//!     Ok(())
//! }
//! ```

// Re-export core types
pub use zip_auth_core::*;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use zip_auth_core::error::{AuthError, AuthResult};
    pub use zip_auth_core::router::{Method, Request, RequestHandler, Response, Route, Router};
    pub use zip_auth_core::schema::{Field, FieldType, ModelDefinition, SchemaBuilder};
    pub use zip_auth_core::traits::{
        AccountStore, AuthPlugin, ExtensionProvider, SchemaProvider, SmsTransport,
    };
    pub use zip_auth_core::types::Account;
}

/// Configuration for the auth system.
pub mod config {
    use serde::{Deserialize, Serialize};

    /// Main configuration struct for the auth service.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct AuthConfig {
        /// Base path for auth routes (default: "/api/auth")
        pub base_path: String,
        /// Whether responses may disclose raw reset codes (never in
        /// production)
        pub expose_dev_codes: bool,
    }

    impl Default for AuthConfig {
        fn default() -> Self {
            Self {
                base_path: "/api/auth".to_string(),
                expose_dev_codes: false,
            }
        }
    }
}
