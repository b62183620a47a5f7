//! # ZipFood Auth Phone Reset Plugin
//!
//! Phone-based password reset: a 6-digit code is sent by SMS, checked,
//! and consumed by the password change. The plugin wires the
//! [`PhoneResetService`] orchestrator into the router and declares the
//! account fields it stores.

pub mod config;
pub mod handlers;
pub mod password;
pub mod phone;
pub mod schema;
pub mod service;

pub use config::PhoneResetConfig;
pub use schema::{ResetAccountExt, ResetFieldsExt};
pub use service::{CodeIssued, CodeVerified, PhoneResetService};

use std::sync::Arc;
use zip_auth_core::router::{Method, Route, Router};
use zip_auth_core::schema::SchemaBuilder;
use zip_auth_core::traits::{AuthPlugin, ExtensionProvider};

/// The phone reset plugin.
pub struct PhoneResetPlugin {
    service: Arc<PhoneResetService>,
}

impl PhoneResetPlugin {
    /// Creates a new plugin around an already-constructed service.
    pub fn new(service: Arc<PhoneResetService>) -> Self {
        Self { service }
    }

    /// Gets the underlying service.
    pub fn service(&self) -> Arc<PhoneResetService> {
        Arc::clone(&self.service)
    }
}

impl AuthPlugin for PhoneResetPlugin {
    fn id(&self) -> &'static str {
        "phone_reset"
    }

    fn name(&self) -> &'static str {
        "Phone Password Reset"
    }

    fn define_schema(&self, builder: &mut SchemaBuilder) {
        for field in ResetFieldsExt::fields() {
            builder.add_field_mut("account", field);
        }
    }

    fn register_routes(&self, router: &mut Router) {
        // POST /phone-reset/request-code
        router.route(
            Route::new(
                Method::POST,
                "/phone-reset/request-code",
                handlers::RequestCodeHandler::new(self.service()),
            )
            .summary("Request a reset code")
            .description("Sends a password reset code by SMS to the account's phone number.")
            .tag("phone-reset"),
        );

        // POST /phone-reset/verify-code
        router.route(
            Route::new(
                Method::POST,
                "/phone-reset/verify-code",
                handlers::VerifyCodeHandler::new(self.service()),
            )
            .summary("Check a reset code")
            .description("Checks a reset code without consuming it.")
            .tag("phone-reset"),
        );

        // POST /phone-reset/reset-password
        router.route(
            Route::new(
                Method::POST,
                "/phone-reset/reset-password",
                handlers::ResetPasswordHandler::new(self.service()),
            )
            .summary("Reset password")
            .description("Consumes a reset code and sets the new password.")
            .tag("phone-reset"),
        );

        // GET /phone-reset/rate-limit
        router.route(
            Route::new(
                Method::GET,
                "/phone-reset/rate-limit",
                handlers::RateLimitHandler::new(self.service()),
            )
            .summary("Send-rate window")
            .description("Returns the remaining sends in the current window for a phone.")
            .tag("phone-reset"),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plugin_registers_routes() {
        use zip_auth_adapter_memory::MemoryStore;

        struct NoopTransport;

        #[async_trait::async_trait]
        impl zip_auth_core::traits::SmsTransport for NoopTransport {
            async fn send(&self, _to: &str, _body: &str) -> zip_auth_core::AuthResult<()> {
                Ok(())
            }
        }

        let service = Arc::new(PhoneResetService::new(
            PhoneResetConfig::default(),
            Arc::new(MemoryStore::new()),
            Arc::new(NoopTransport),
        ));
        let plugin = PhoneResetPlugin::new(service);
        assert_eq!(plugin.id(), "phone_reset");

        let mut router = Router::default();
        plugin.register_routes(&mut router);
        assert_eq!(router.len(), 4);

        let mut builder = SchemaBuilder::with_core();
        plugin.define_schema(&mut builder);
        let schema = builder.build();
        let account = schema.get_model("account").unwrap();
        assert!(account.get_field("verification_code").is_some());
        assert!(account.get_field("password_hash").is_some());
    }
}
