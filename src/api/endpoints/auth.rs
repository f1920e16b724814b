//! Authentication endpoints: login per role, logout, session introspection,
//! and the doctor roster.

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::json;

use crate::api::endpoints::lock_db;
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, AuthedUser};
use crate::auth::{
    clear_session_cookie, generate_session_token, hash_session_token, session_cookie,
    session_expiry, token_from_cookie_header, verify_password,
};
use crate::db::repository::{
    count_doctors, delete_session, get_user_by_email, insert_session, list_active_doctors,
};
use crate::models::Role;

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// `POST /auth/login` — doctor login.
pub async fn login(
    State(ctx): State<ApiContext>,
    Json(payload): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    login_with_role(&ctx, payload, Role::Doctor)
}

/// `POST /auth/receptionist/login` — receptionist login.
pub async fn receptionist_login(
    State(ctx): State<ApiContext>,
    Json(payload): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    login_with_role(&ctx, payload, Role::Receptionist)
}

fn login_with_role(
    ctx: &ApiContext,
    payload: LoginRequest,
    role: Role,
) -> Result<Response, ApiError> {
    let email = payload.email.trim();
    let password = payload.password.trim();
    if email.is_empty() || password.is_empty() {
        return Err(ApiError::BadRequest("Email and password are required".into()));
    }

    let conn = lock_db(ctx)?;

    let user = get_user_by_email(&conn, email)?
        .filter(|u| u.is_active && u.role == role)
        .filter(|u| verify_password(password, &u.password_hash))
        .ok_or(ApiError::Unauthorized)?;

    let token = generate_session_token();
    insert_session(
        &conn,
        &hash_session_token(&token),
        &user.id,
        role,
        &session_expiry(),
    )?;
    drop(conn);

    tracing::info!(email = %user.email, role = role.as_str(), "login");

    let body = json!({ "ok": true, "user": user.to_public() });
    let mut response = Json(body).into_response();
    response.headers_mut().insert(
        header::SET_COOKIE,
        session_cookie(&token, ctx.config.cookie_secure)
            .parse()
            .map_err(|_| ApiError::Internal("cookie header".into()))?,
    );
    Ok(response)
}

/// `POST /auth/logout` — delete the session and clear the cookie.
pub async fn logout(
    State(ctx): State<ApiContext>,
    headers: axum::http::HeaderMap,
) -> Result<Response, ApiError> {
    if let Some(token) = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(token_from_cookie_header)
    {
        let conn = lock_db(&ctx)?;
        delete_session(&conn, &hash_session_token(token))?;
    }

    let mut response = Json(json!({ "ok": true })).into_response();
    response.headers_mut().insert(
        header::SET_COOKIE,
        clear_session_cookie()
            .parse()
            .map_err(|_| ApiError::Internal("cookie header".into()))?,
    );
    Ok(response)
}

/// `GET /auth/me` — who is behind this session cookie.
pub async fn me(Extension(user): Extension<AuthedUser>) -> Json<serde_json::Value> {
    Json(json!({
        "authenticated": true,
        "user": user.to_public(),
    }))
}

/// `GET /auth/doctors` — active doctor roster.
pub async fn doctors(State(ctx): State<ApiContext>) -> Result<Json<serde_json::Value>, ApiError> {
    let conn = lock_db(&ctx)?;
    let doctors: Vec<_> = list_active_doctors(&conn)?
        .iter()
        .map(|d| {
            json!({
                "id": d.id,
                "email": d.email,
                "full_name": d.full_name,
                "specialty": d.specialty,
                "department": d.department,
                "status": "active",
            })
        })
        .collect();
    Ok(Json(json!({ "doctors": doctors })))
}

/// `GET /auth/doctors/count`
pub async fn doctor_count(
    State(ctx): State<ApiContext>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let conn = lock_db(&ctx)?;
    let (active, total) = count_doctors(&conn)?;
    Ok(Json(json!({
        "active_doctors": active,
        "total_doctors": total,
    })))
}
