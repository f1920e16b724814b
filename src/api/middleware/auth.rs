//! Session-cookie authentication middleware.
//!
//! Resolves the session cookie to a stored token hash, checks expiry,
//! loads the user, and injects `AuthedUser` into request extensions for
//! downstream handlers. Role checks stay in the handlers.

use axum::http::{header, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, AuthedUser};
use crate::auth::{hash_session_token, token_from_cookie_header};
use crate::db::repository::{delete_session, get_session, get_user};

/// Require a valid session cookie.
///
/// Accesses `ApiContext` from request extensions (injected by the
/// Extension layer). On success: injects `AuthedUser` and marks the
/// response uncacheable.
pub async fn require_auth(req: Request<axum::body::Body>, next: Next) -> Response {
    match require_auth_inner(req, next).await {
        Ok(resp) => resp,
        Err(err) => err.into_response(),
    }
}

async fn require_auth_inner(
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let ctx: ApiContext = req
        .extensions()
        .get::<ApiContext>()
        .cloned()
        .ok_or(ApiError::Internal("missing API context".into()))?;

    let token = req
        .headers()
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(token_from_cookie_header)
        .ok_or(ApiError::Unauthorized)?
        .to_string();

    let token_hash = hash_session_token(&token);

    let user = {
        let conn = ctx
            .db
            .lock()
            .map_err(|_| ApiError::Internal("db lock".into()))?;

        let session = get_session(&conn, &token_hash)?.ok_or(ApiError::Unauthorized)?;

        if session.expires_at < chrono::Utc::now().naive_utc() {
            // Stale rows are removed as they are seen.
            delete_session(&conn, &token_hash)?;
            return Err(ApiError::Unauthorized);
        }

        let user = get_user(&conn, &session.user_id)?.ok_or(ApiError::Unauthorized)?;
        if !user.is_active {
            return Err(ApiError::Unauthorized);
        }
        user
    }; // MutexGuard dropped here, before any .await

    req.extensions_mut().insert(AuthedUser::from_user(&user));

    let mut response = next.run(req).await;
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));

    Ok(response)
}
