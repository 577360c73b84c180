//! Request middleware: admin token guard and body size limit

use crate::error::ApiError;
use crate::server::AppState;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Body size limit middleware
///
/// Checks Content-Length header and rejects requests exceeding the configured maximum
pub async fn body_size_limit(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let max = state.config.server.max_body_bytes;

    let length = request
        .headers()
        .get("content-length")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<usize>().ok());

    if let Some(length) = length {
        if length > max {
            warn!("Request body too large: {} bytes (max: {})", length, max);
            return Err(StatusCode::PAYLOAD_TOO_LARGE);
        }
    }

    Ok(next.run(request).await)
}

/// Admin guard
///
/// Requires `Authorization: Bearer <token>` matching the configured admin token.
/// With no token configured every admin request is refused.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(expected) = state.config.admin.token.as_deref() else {
        warn!("Admin request refused: no admin token configured");
        return Err(ApiError::Unauthorized);
    };

    match extract_auth_token(&request) {
        Some(token) if token == expected => {
            debug!("Admin token OK: {}", mask_token(&token));
            Ok(next.run(request).await)
        }
        Some(token) => {
            warn!("Admin request with wrong token: {}", mask_token(&token));
            Err(ApiError::Unauthorized)
        }
        None => Err(ApiError::Unauthorized),
    }
}

/// Extract bearer token from Authorization header
fn extract_auth_token(request: &Request) -> Option<String> {
    let auth_header = request.headers().get("authorization")?;
    let auth_str = auth_header.to_str().ok()?;

    let token = auth_str.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// First eight characters only, for logs
pub fn mask_token(token: &str) -> String {
    if token.chars().count() <= 8 {
        "***".to_string()
    } else {
        format!("{}...", token.chars().take(8).collect::<String>())
    }
}
