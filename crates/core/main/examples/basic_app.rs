//! Basic example demonstrating the phone reset flow.
//!
//! Run with: cargo run --example basic_app

use std::sync::Arc;
use zip_auth::prelude::*;
use zip_auth_adapter_memory::MemoryStore;
use zip_auth_plugin_phone_reset::{PhoneResetConfig, PhoneResetService};
use zip_auth_sms::MockTransport;

#[tokio::main]
async fn main() -> Result<(), AuthError> {
    // Initialize the service with an in-memory store and the mock transport
    let store = Arc::new(MemoryStore::new());
    store.migrate(&zip_auth::schema::core_schema()).await?;

    let service = PhoneResetService::new(
        PhoneResetConfig::new().expose_dev_code(),
        store.clone(),
        Arc::new(MockTransport::new()),
    );

    // Register an account the reset flow can find
    let account = Account::new("acc_001".to_string(), "+5511987654321".to_string())
        .with_name("Alice");
    store.create_account(&account).await?;
    println!("Created account: {} ({})", account.id, account.phone);

    // Request a reset code; the dev config echoes it back
    let issued = service.send_reset_code("(11) 98765-4321").await?;
    let code = issued.dev_code.expect("dev codes enabled above");
    println!("Issued reset code: {code}");

    // Verify and set the new password
    service
        .reset_password("(11) 98765-4321", &code, "new-password")
        .await?;
    println!("Password reset complete");

    Ok(())
}
