//! # ZipFood Auth Core
//!
//! This crate provides the foundational types and traits for the ZipFood
//! authentication service. It defines the core `Account` record, error types,
//! and the trait interfaces that plugins, storage adapters, and SMS transports
//! must implement.

pub mod error;
pub mod router;
pub mod schema;
pub mod traits;
pub mod types;

// Re-export commonly used items at the crate root
pub use error::{AuthError, AuthResult};
pub use schema::{
    core_schema, Field, FieldType, IndexDefinition, ModelDefinition, ReferentialAction,
    SchemaBuilder, SchemaDefinition, SqlDialect,
};
pub use traits::{AccountStore, AuthPlugin, ExtensionProvider, SchemaProvider, SmsTransport};
pub use types::Account;

// Re-export router types
pub use router::{Method, Request, RequestHandler, Response, Route, Router};
