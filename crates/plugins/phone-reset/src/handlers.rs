//! Request handlers for the phone reset plugin.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use zip_auth_core::error::AuthError;
use zip_auth_core::router::{Request, RequestHandler, Response};

use crate::service::PhoneResetService;

/// Maps a service error onto the wire error shape.
///
/// User-facing errors surface their own message; everything else is
/// logged and masked behind the generic internal message.
fn error_response(err: AuthError) -> Response {
    let (code, message) = if err.is_user_error() {
        (err.error_code(), err.to_string())
    } else {
        tracing::error!(error = ?err, "request failed");
        ("INTERNAL_ERROR", AuthError::internal("").to_string())
    };

    Response::new(err.status_code()).json(serde_json::json!({
        "error": {
            "code": code,
            "message": message
        }
    }))
}

fn invalid_request() -> Response {
    Response::bad_request().json(serde_json::json!({
        "error": {
            "code": "INVALID_REQUEST",
            "message": "Invalid request body"
        }
    }))
}

/// Request body for requesting a reset code.
#[derive(Debug, Deserialize)]
pub struct RequestCodeRequest {
    /// Phone number to send the code to.
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
}

/// Response for a successful code request.
#[derive(Debug, Serialize)]
pub struct RequestCodeResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "devCode", skip_serializing_if = "Option::is_none")]
    pub dev_code: Option<String>,
}

/// Handler for POST /phone-reset/request-code
pub struct RequestCodeHandler {
    service: Arc<PhoneResetService>,
}

impl RequestCodeHandler {
    pub fn new(service: Arc<PhoneResetService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl RequestHandler for RequestCodeHandler {
    async fn handle(&self, req: Request) -> Response {
        let Some(body) = req.json::<RequestCodeRequest>() else {
            return invalid_request();
        };

        match self.service.send_reset_code(&body.phone_number).await {
            Ok(issued) => Response::ok().json(RequestCodeResponse {
                success: true,
                message: issued.message,
                dev_code: issued.dev_code,
            }),
            Err(err) => error_response(err),
        }
    }
}

/// Request body for checking a code.
#[derive(Debug, Deserialize)]
pub struct VerifyCodeRequest {
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
    pub code: String,
}

/// Handler for POST /phone-reset/verify-code
///
/// Non-consuming: the code stays live for the reset-password call.
pub struct VerifyCodeHandler {
    service: Arc<PhoneResetService>,
}

impl VerifyCodeHandler {
    pub fn new(service: Arc<PhoneResetService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl RequestHandler for VerifyCodeHandler {
    async fn handle(&self, req: Request) -> Response {
        let Some(body) = req.json::<VerifyCodeRequest>() else {
            return invalid_request();
        };

        match self.service.check_code(&body.phone_number, &body.code).await {
            Ok(()) => Response::ok().json(serde_json::json!({
                "success": true,
                "message": "Code verified successfully!"
            })),
            Err(err) => error_response(err),
        }
    }
}

/// Request body for resetting the password.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
    pub code: String,
    #[serde(rename = "newPassword")]
    pub new_password: String,
}

/// Handler for POST /phone-reset/reset-password
pub struct ResetPasswordHandler {
    service: Arc<PhoneResetService>,
}

impl ResetPasswordHandler {
    pub fn new(service: Arc<PhoneResetService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl RequestHandler for ResetPasswordHandler {
    async fn handle(&self, req: Request) -> Response {
        let Some(body) = req.json::<ResetPasswordRequest>() else {
            return invalid_request();
        };

        if body.new_password.is_empty() {
            return error_response(AuthError::MissingField {
                field: "newPassword".to_string(),
            });
        }

        match self
            .service
            .reset_password(&body.phone_number, &body.code, &body.new_password)
            .await
        {
            Ok(()) => Response::ok().json(serde_json::json!({
                "success": true,
                "message": "Password reset successfully!"
            })),
            Err(err) => error_response(err),
        }
    }
}

/// Handler for GET /phone-reset/rate-limit?phoneNumber=…
///
/// Read-only window view the client shows before sending.
pub struct RateLimitHandler {
    service: Arc<PhoneResetService>,
}

impl RateLimitHandler {
    pub fn new(service: Arc<PhoneResetService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl RequestHandler for RateLimitHandler {
    async fn handle(&self, req: Request) -> Response {
        let Some(phone_number) = req.query_param("phoneNumber") else {
            return error_response(AuthError::MissingField {
                field: "phoneNumber".to_string(),
            });
        };

        match self.service.rate_limit_stats(phone_number).await {
            Some(stats) => Response::ok().json(serde_json::json!({
                "remaining": stats.remaining,
                "resetAt": stats.reset_at,
                "canSend": stats.remaining > 0
            })),
            None => error_response(AuthError::InvalidPhoneNumber),
        }
    }
}
