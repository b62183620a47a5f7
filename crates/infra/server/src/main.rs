//! ZipFood auth server binary.

use zip_auth_server::{load_config, AppConfig, Environment, ResetServer, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing with RUST_LOG support
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load configuration; a missing file runs on defaults
    let path = std::env::args().nth(1).unwrap_or_else(|| "zip-auth.toml".to_string());
    let (server_config, mut app_config) = match load_config(&path) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(path = %path, error = %err, "config not loaded, using defaults");
            (ServerConfig::default(), AppConfig::default())
        }
    };

    // The process environment wins over the file
    if Environment::from_env().is_production() {
        app_config.environment = Environment::Production;
    }

    // Create and run server
    let server = ResetServer::build(server_config, app_config).await?;
    server.run().await?;

    Ok(())
}
