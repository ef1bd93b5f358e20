use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::Response,
    Json,
};
use tracing::error;

use crate::config;
use crate::models::ErrorResponse;
use crate::services::auth_service::get_admin_token;

/// Guards the admin surface with the shared token from configuration.
/// Accepts the token as a bearer header or as the `admin_session` cookie.
pub async fn admin_middleware(
    req: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {

    // 1. Get the admin token from the request
    let token = match get_admin_token(&req) {
        Ok(token) => token,
        Err(_) => {
            let status = StatusCode::UNAUTHORIZED;
            return Err((status, Json(ErrorResponse::new(status, "Missing admin credentials"))));
        }
    };

    // 2. Compare against the configured secret
    let config = config::get_config();
    let expected = match &config.admin_token {
        Some(expected) => expected,
        None => {
            error!("Admin token not configured");
            let status = StatusCode::INTERNAL_SERVER_ERROR;
            return Err((status, Json(ErrorResponse::new(status, "Admin token not configured"))));
        }
    };
    if token != *expected {
        error!("Admin token mismatch");
        let status = StatusCode::UNAUTHORIZED;
        return Err((status, Json(ErrorResponse::new(status, "Invalid admin credentials"))));
    }

    // Token is valid, proceed to next middleware/handler
    Ok(next.run(req).await)
}
