//! Whole-stack tests: the client flow driving the real service through
//! the in-process API, and HTTP-shaped dispatch through the router.

use std::sync::Arc;
use zip_auth_adapter_memory::MemoryStore;
use zip_auth_core::router::{Method, Request};
use zip_auth_core::traits::AccountStore;
use zip_auth_core::types::Account;
use zip_auth_plugin_phone_reset::password::verify_password;
use zip_auth_plugin_phone_reset::ResetAccountExt;
use zip_auth_server::{AppConfig, ResetServer, ServerConfig, ServiceApi};
use zip_auth_reset_flow::{ResetFlow, ResetStep};

const PHONE_DISPLAY: &str = "(11) 98765-4321";
const PHONE_CANONICAL: &str = "+5511987654321";

async fn dev_server_with_account() -> (ResetServer, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    store
        .create_account(&Account::new(
            "acc_1".to_string(),
            PHONE_CANONICAL.to_string(),
        ))
        .await
        .unwrap();

    let server = ResetServer::build_with_store(
        ServerConfig::default(),
        AppConfig::default(),
        store.clone(),
    )
    .await
    .unwrap();

    (server, store)
}

#[tokio::test]
async fn flow_resets_password_end_to_end() {
    let (server, store) = dev_server_with_account().await;

    let mut flow = ResetFlow::new(ServiceApi::new(server.service()));

    flow.set_phone("11987654321");
    flow.submit().await;
    assert_eq!(flow.step(), ResetStep::Code);
    assert_eq!(flow.countdown(), 60);

    // Development config discloses the code; type it in
    let code = flow.dev_code().expect("dev code expected").to_string();
    flow.set_code(&code);
    flow.submit().await;
    assert_eq!(flow.step(), ResetStep::Password);

    flow.set_new_password("hunter22");
    flow.set_confirm_password("hunter22");
    flow.submit().await;
    assert_eq!(flow.step(), ResetStep::Success);

    // The hash landed on the account and the code is spent
    let account = store.get_account_by_id("acc_1").await.unwrap().unwrap();
    let hash = account.password_hash().unwrap();
    assert!(verify_password("hunter22", &hash).unwrap());
    assert!(account.reset_code_record().is_none());
}

#[tokio::test]
async fn flow_surfaces_unknown_account() {
    let server = ResetServer::build_with_store(
        ServerConfig::default(),
        AppConfig::default(),
        Arc::new(MemoryStore::new()),
    )
    .await
    .unwrap();

    let mut flow = ResetFlow::new(ServiceApi::new(server.service()));
    flow.set_phone("11987654321");
    flow.submit().await;

    assert_eq!(flow.step(), ResetStep::Phone);
    assert_eq!(
        flow.error(),
        Some("No account found with this phone number")
    );
}

#[tokio::test]
async fn router_dispatches_reset_endpoints() {
    let (server, _store) = dev_server_with_account().await;
    let router = server.router();

    // Request a code over the wire shape
    let req = Request::new(Method::POST, "/api/auth/phone-reset/request-code")
        .with_json(&serde_json::json!({ "phoneNumber": PHONE_DISPLAY }));
    let res = router.dispatch(req).await;
    assert_eq!(res.status, 200);

    let body = res.body.unwrap();
    assert_eq!(body["success"], true);
    let code = body["devCode"].as_str().expect("dev code in dev env").to_string();

    // Check the code without consuming it
    let req = Request::new(Method::POST, "/api/auth/phone-reset/verify-code")
        .with_json(&serde_json::json!({ "phoneNumber": PHONE_DISPLAY, "code": code }));
    let res = router.dispatch(req).await;
    assert_eq!(res.status, 200);

    // Reset the password
    let req = Request::new(Method::POST, "/api/auth/phone-reset/reset-password")
        .with_json(&serde_json::json!({
            "phoneNumber": PHONE_DISPLAY,
            "code": code,
            "newPassword": "hunter22"
        }));
    let res = router.dispatch(req).await;
    assert_eq!(res.status, 200);

    // The consumed code now fails with the generic message
    let req = Request::new(Method::POST, "/api/auth/phone-reset/verify-code")
        .with_json(&serde_json::json!({ "phoneNumber": PHONE_DISPLAY, "code": code }));
    let res = router.dispatch(req).await;
    assert_eq!(res.status, 400);
    let body = res.body.unwrap();
    assert_eq!(body["error"]["code"], "CODE_INVALID");
}

#[tokio::test]
async fn router_rejects_malformed_bodies() {
    let (server, _store) = dev_server_with_account().await;
    let router = server.router();

    let req = Request::new(Method::POST, "/api/auth/phone-reset/request-code")
        .with_json(&serde_json::json!({ "phone": PHONE_DISPLAY }));
    let res = router.dispatch(req).await;
    assert_eq!(res.status, 400);
    assert_eq!(res.body.unwrap()["error"]["code"], "INVALID_REQUEST");
}

#[tokio::test]
async fn rate_limit_endpoint_reports_window() {
    let (server, _store) = dev_server_with_account().await;
    let router = server.router();

    let req = Request::new(Method::GET, "/api/auth/phone-reset/rate-limit")
        .with_query("phoneNumber", PHONE_DISPLAY);
    let res = router.dispatch(req).await;
    assert_eq!(res.status, 200);

    let body = res.body.unwrap();
    assert_eq!(body["remaining"], 5);
    assert_eq!(body["canSend"], true);
}
