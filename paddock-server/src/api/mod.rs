//! API routes for paddock-server

pub mod admin;
pub mod deals;
pub mod health;
pub mod members;
pub mod register;
pub mod verify;

use axum::routing::{delete, get, post, put};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::rate_limit::{login_rate_limit, register_rate_limit};
use crate::auth::session::{auth_middleware, require_admin};
use crate::state::AppState;

pub type ApiResult<T> = Result<axum::Json<T>, shared::error::AppError>;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    // Public intake, rate limited per IP
    let registration = Router::new()
        .route("/api/register", post(register::register))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            register_rate_limit,
        ));

    let login = Router::new()
        .route("/api/login", post(members::login))
        .layer(middleware::from_fn_with_state(state.clone(), login_rate_limit));

    // Public, no auth: verification flows and the QR validity lookup
    let public = Router::new()
        .route("/api/verify-email", post(register::verify_email))
        .route(
            "/api/resend-verification",
            post(register::resend_verification),
        )
        .route("/api/verify-member", get(verify::verify_member));

    // Member self-service (session required)
    let profile = Router::new()
        .route(
            "/api/profile",
            get(members::get_profile).put(members::update_profile),
        )
        .route("/api/profile/vehicles", post(members::add_vehicle))
        .route(
            "/api/profile/vehicles/{id}",
            delete(members::remove_vehicle),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Staff dashboard and vendor till (session + admin tier)
    let staff = Router::new()
        .route("/api/admin/members", get(admin::list_members))
        .route("/api/admin/members/{id}", get(admin::get_member))
        .route("/api/admin/members/{id}/status", put(admin::set_status))
        .route("/api/admin/members/{id}/tier", put(admin::set_tier))
        .route("/api/admin/audit-log", get(admin::audit_log))
        .route("/api/vendor/members/{code}", get(deals::member_by_code))
        .route(
            "/api/vendor/deals",
            get(deals::list_deals).post(deals::record_deal),
        )
        .route("/api/vendor/deals/summary", get(deals::deal_summary))
        .route("/api/vendor/deals/{id}", get(deals::deal_detail))
        // Inner layer runs second: admin check needs the identity extension
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(registration)
        .merge(login)
        .merge(public)
        .merge(profile)
        .merge(staff)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
