//! # ZipFood Auth Server
//!
//! Standalone phone-reset service: wires the account store, the
//! environment-selected SMS transport, and the phone-reset plugin into a
//! router the host HTTP layer dispatches into.

mod config;

pub use config::{
    load_config, AppConfig, ConfigError, Environment, ResetSettings, ServerConfig,
};

use async_trait::async_trait;
use std::sync::Arc;
use zip_auth_adapter_memory::MemoryStore;
use zip_auth_core::error::AuthResult;
use zip_auth_core::router::Router;
use zip_auth_core::schema::SchemaBuilder;
use zip_auth_core::traits::{AccountStore, AuthPlugin, SmsTransport};
use zip_auth_plugin_phone_reset::{PhoneResetPlugin, PhoneResetService};
use zip_auth_reset_flow::{CodeRequested, RateLimitSnapshot, ResetApi};
use zip_auth_sms::{MockTransport, TwilioConfig, TwilioTransport};

/// The assembled phone-reset server.
pub struct ResetServer {
    /// Server configuration.
    pub config: ServerConfig,
    service: Arc<PhoneResetService>,
    router: Router,
}

impl ResetServer {
    /// Builds a server over a fresh in-memory store.
    pub async fn build(server: ServerConfig, app: AppConfig) -> AuthResult<Self> {
        let store: Arc<dyn AccountStore> = Arc::new(MemoryStore::new());
        Self::build_with_store(server, app, store).await
    }

    /// Builds a server over an injected store.
    ///
    /// The environment picks the transport: Twilio (credentials from the
    /// environment) in production, the logging mock otherwise.
    pub async fn build_with_store(
        server: ServerConfig,
        app: AppConfig,
        store: Arc<dyn AccountStore>,
    ) -> AuthResult<Self> {
        let transport: Arc<dyn SmsTransport> = if app.environment.is_production() {
            Arc::new(TwilioTransport::new(TwilioConfig::from_env()?))
        } else {
            Arc::new(MockTransport::new())
        };

        let service = Arc::new(PhoneResetService::new(
            app.reset_config(),
            Arc::clone(&store),
            transport,
        ));
        let plugin = PhoneResetPlugin::new(Arc::clone(&service));

        // Materialize the core schema plus plugin extensions
        let mut builder = SchemaBuilder::with_core();
        plugin.define_schema(&mut builder);
        let schema = builder.build();
        store.migrate(&schema.models).await?;

        let mut router = Router::new(app.base_path.clone());
        plugin.register_routes(&mut router);

        Ok(Self {
            config: server,
            service,
            router,
        })
    }

    /// Gets the underlying service.
    pub fn service(&self) -> Arc<PhoneResetService> {
        Arc::clone(&self.service)
    }

    /// Gets the assembled router.
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Starts the server.
    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        tracing::info!(
            host = %self.config.host,
            port = self.config.port,
            "starting zip-auth server"
        );
        for route in self.router.routes() {
            tracing::info!(method = %route.method, path = %route.path, "route registered");
        }
        tracing::info!("server ready");

        Ok(())
    }
}

/// In-process [`ResetApi`] binding straight to the service.
///
/// Used by the demo binary and tests; a browser client would implement
/// the same trait over HTTP.
pub struct ServiceApi {
    service: Arc<PhoneResetService>,
}

impl ServiceApi {
    /// Creates a new binding.
    pub fn new(service: Arc<PhoneResetService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl ResetApi for ServiceApi {
    async fn request_code(&self, phone: &str) -> AuthResult<CodeRequested> {
        let issued = self.service.send_reset_code(phone).await?;
        Ok(CodeRequested {
            message: issued.message,
            dev_code: issued.dev_code,
        })
    }

    async fn check_code(&self, phone: &str, code: &str) -> AuthResult<()> {
        self.service.check_code(phone, code).await
    }

    async fn reset_password(&self, phone: &str, code: &str, new_password: &str) -> AuthResult<()> {
        self.service.reset_password(phone, code, new_password).await
    }

    async fn rate_limit(&self, phone: &str) -> AuthResult<RateLimitSnapshot> {
        let stats = self
            .service
            .rate_limit_stats(phone)
            .await
            .ok_or(zip_auth_core::error::AuthError::InvalidPhoneNumber)?;
        Ok(RateLimitSnapshot {
            remaining: stats.remaining,
            can_send: stats.remaining > 0,
            reset_at: stats.reset_at,
        })
    }
}
