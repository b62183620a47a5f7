//! Integration tests for the auth core crate.
//!
//! Covers the pieces plugins compose: the account type, the schema
//! system, the router, and error classification.

use async_trait::async_trait;
use zip_auth_core::router::{Method, Request, RequestHandler, Response, Router};
use zip_auth_core::schema::{Field, FieldType, SchemaBuilder};
use zip_auth_core::types::Account;
use zip_auth_core::AuthError;

mod schema_tests {
    use super::*;

    #[test]
    fn test_plugin_fields_extend_core_account() {
        let schema = SchemaBuilder::with_core()
            .add_field(
                "account",
                Field::optional("verification_code", FieldType::String(10)).private(),
            )
            .add_field(
                "account",
                Field::optional("verification_expires", FieldType::Timestamp).private(),
            )
            .build();

        let account = schema.get_model("account").unwrap();
        assert!(account.get_field("verification_code").unwrap().private);
        assert!(account.get_field("verification_expires").is_some());
        // Core fields survive the extension
        assert!(account.get_field("phone").is_some());
    }

    #[test]
    fn test_duplicate_extension_fields_collapse() {
        let schema = SchemaBuilder::with_core()
            .add_field("account", Field::optional("extra", FieldType::Text))
            .add_field("account", Field::optional("extra", FieldType::Text))
            .build();

        let account = schema.get_model("account").unwrap();
        let count = account.fields.iter().filter(|f| f.name == "extra").count();
        assert_eq!(count, 1);
    }
}

mod account_tests {
    use super::*;

    #[test]
    fn test_extension_roundtrip_through_json() {
        let mut account = Account::new("acc_1".to_string(), "+5511987654321".to_string());
        account.set_extension("verification_code", "123456");

        // Extensions flatten onto the wire shape
        let value = serde_json::to_value(&account).unwrap();
        assert_eq!(value["verification_code"], "123456");
        assert_eq!(value["phone"], "+5511987654321");

        let parsed: Account = serde_json::from_value(value).unwrap();
        assert_eq!(
            parsed.get_extension::<String>("verification_code"),
            Some("123456".to_string())
        );
    }
}

mod router_tests {
    use super::*;

    struct StatusHandler(u16);

    #[async_trait]
    impl RequestHandler for StatusHandler {
        async fn handle(&self, _req: Request) -> Response {
            Response::new(self.0).json(serde_json::json!({ "status": self.0 }))
        }
    }

    #[tokio::test]
    async fn test_merge_and_dispatch() {
        let mut plugin_routes = Router::new("");
        plugin_routes.post("/phone-reset/request-code", StatusHandler(200));

        let mut router = Router::default();
        router.merge(plugin_routes);
        assert_eq!(router.len(), 1);

        let res = router
            .dispatch(Request::new(
                Method::POST,
                "/api/auth/phone-reset/request-code",
            ))
            .await;
        assert_eq!(res.status, 200);

        let res = router
            .dispatch(Request::new(Method::POST, "/api/auth/unknown"))
            .await;
        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn test_request_body_deserialization() {
        #[derive(serde::Deserialize, serde::Serialize)]
        struct Body {
            code: String,
        }

        let req = Request::new(Method::POST, "/x").with_json(&serde_json::json!({
            "code": "123456"
        }));
        let body: Body = req.json().unwrap();
        assert_eq!(body.code, "123456");

        let req = Request::new(Method::POST, "/x");
        assert!(req.json::<Body>().is_none());
    }
}

mod error_tests {
    use super::*;

    #[test]
    fn test_user_errors_keep_their_messages() {
        for err in [
            AuthError::InvalidPhoneNumber,
            AuthError::InvalidCodeFormat,
            AuthError::CodeExpired,
            AuthError::CodeInvalid,
            AuthError::AccountNotFound,
            AuthError::SmsDeliveryFailed,
        ] {
            assert!(err.is_user_error());
            assert!(!err.to_string().is_empty());
        }
    }

    #[test]
    fn test_internal_errors_are_masked() {
        for err in [
            AuthError::database("pool exhausted"),
            AuthError::internal("stacktrace"),
        ] {
            assert!(!err.is_user_error());
            assert_eq!(err.status_code(), 500);
        }
    }

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(AuthError::CodeInvalid.error_code(), "CODE_INVALID");
        assert_eq!(AuthError::AccountNotFound.error_code(), "ACCOUNT_NOT_FOUND");
        assert_eq!(
            AuthError::RateLimitExceeded {
                retry_after_seconds: 60
            }
            .error_code(),
            "RATE_LIMITED"
        );
    }
}
