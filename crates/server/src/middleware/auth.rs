//! Static bearer token check for the data routes.
//!
//! When `DISPENSA_API_TOKEN` is unset the API is open, as the browser client
//! expects. When set, every products/shopping request must carry
//! `Authorization: Bearer <token>`. Health checks are mounted outside this
//! layer and CORS preflight is answered before it runs.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use secrecy::ExposeSecret;

use crate::error::AppError;
use crate::state::AppState;

/// Reject requests without the configured bearer token.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` if a token is configured and the request
/// does not present it.
pub async fn require_bearer_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = state.config().api_token.as_ref() else {
        return Ok(next.run(request).await);
    };

    let presented = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim);

    if presented == Some(expected.expose_secret()) {
        Ok(next.run(request).await)
    } else {
        tracing::warn!(uri = %request.uri(), "Rejected request without valid bearer token");
        Err(AppError::Unauthorized)
    }
}
