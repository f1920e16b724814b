//! Application router.
//!
//! Two route groups: a small unprotected set (health, logins) and the
//! protected surface behind the session-cookie middleware. Stored uploads
//! are served read-only under `/uploads`.
//!
//! Layer order (outermost to innermost): CORS, Extension(ApiContext),
//! auth middleware, handler. Extension sits outside the middleware so the
//! middleware can reach the context.

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::pipeline::extraction::MAX_UPLOAD_BYTES;

pub fn app_router(ctx: ApiContext) -> Router {
    let protected = Router::new()
        .route("/auth/logout", post(endpoints::auth::logout))
        .route("/auth/me", get(endpoints::auth::me))
        .route("/auth/doctors", get(endpoints::auth::doctors))
        .route("/auth/doctors/count", get(endpoints::auth::doctor_count))
        .route("/api/intake", post(endpoints::intake::create))
        .route("/api/intake/:patient_id", get(endpoints::intake::detail))
        .route(
            "/api/patients",
            get(endpoints::patients::list).post(endpoints::patients::create),
        )
        .route("/api/patients/search", get(endpoints::patients::search_by_ref))
        .route("/api/patients/:id", get(endpoints::patients::detail))
        .route("/api/reports", post(endpoints::reports::create))
        .route("/api/reports/compare", post(endpoints::reports::compare))
        .route(
            "/api/reports/:id",
            get(endpoints::reports::detail).put(endpoints::reports::update),
        )
        .route(
            "/api/reports/patient/:patient_id",
            get(endpoints::reports::for_patient),
        )
        .route("/api/upload", post(endpoints::upload::upload))
        .route("/api/segment", post(endpoints::segment::segment))
        .route("/api/export-report", post(endpoints::export::export))
        .route("/api/dashboard/stats", get(endpoints::dashboard::stats))
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::auth::require_auth))
        .layer(axum::Extension(ctx.clone()));

    let unprotected = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/auth/login", post(endpoints::auth::login))
        .route(
            "/auth/receptionist/login",
            post(endpoints::auth::receptionist_login),
        )
        .with_state(ctx.clone());

    let uploads = Router::new().nest_service("/uploads", ServeDir::new(&ctx.config.uploads_dir));

    Router::new()
        .merge(protected)
        .merge(unprotected)
        .merge(uploads)
        // Uploads get the 10 MB cap plus multipart framing headroom.
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 64 * 1024))
        .layer(cors_layer())
}

/// Credentialed CORS for the browser frontend.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
        ])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}
