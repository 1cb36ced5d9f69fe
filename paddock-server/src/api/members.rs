//! Member session and self-service endpoints
//!
//! POST /api/login                     — email + password, 24 h session token
//! GET  /api/profile                   — own profile + vehicles
//! PUT  /api/profile                   — contact edits
//! POST /api/profile/vehicles          — add a vehicle
//! DELETE /api/profile/vehicles/{id}   — remove one (never the last)

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use shared::error::{AppError, ErrorCode};
use shared::models::{Member, MemberStatus, MemberUpdate, Vehicle, VehicleCreate};
use shared::util::{now_millis, snowflake_id};

use crate::auth::MemberIdentity;
use crate::auth::session::create_token;
use crate::state::AppState;
use crate::util::verify_password;
use crate::{db, validation};

use super::ApiResult;

// ── POST /api/login ──

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub member_id: String,
    pub member_code: String,
    pub tier: String,
    pub status: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let email_addr = req.email.trim().to_lowercase();

    let account = db::accounts::find_by_email(&state.pool, &email_addr)
        .await
        .map_err(|e| {
            tracing::error!("DB error during login: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(|| AppError::new(ErrorCode::InvalidCredentials))?;

    if !verify_password(&req.password, &account.hashed_password) {
        return Err(AppError::new(ErrorCode::InvalidCredentials));
    }

    let member = db::members::find_by_account(&state.pool, &account.id)
        .await
        .map_err(|e| {
            tracing::error!("DB error during login: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(|| {
            tracing::error!(account_id = %account.id, "Account has no member profile");
            AppError::new(ErrorCode::InternalError)
        })?;

    match MemberStatus::from_db(&member.status) {
        Some(status) if status.can_login() => {}
        Some(MemberStatus::Pending) => return Err(AppError::new(ErrorCode::EmailNotVerified)),
        Some(_) => return Err(AppError::new(ErrorCode::AccountDisabled)),
        None => {
            tracing::error!(member_id = %member.id, status = %member.status, "Unknown status in storage");
            return Err(AppError::new(ErrorCode::InternalError));
        }
    }

    let token = create_token(
        &member.id,
        &member.member_code,
        &member.tier,
        &state.jwt_secret,
    )
    .map_err(|e| {
        tracing::error!("JWT creation failed: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    let now = now_millis();
    let _ = db::audit::log(&state.pool, &member.id, "login", &member.id, None, now).await;

    Ok(Json(LoginResponse {
        token,
        member_id: member.id,
        member_code: member.member_code,
        tier: member.tier,
        status: member.status,
    }))
}

// ── GET /api/profile ──

#[derive(Serialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub member: Member,
    pub vehicles: Vec<Vehicle>,
}

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(identity): Extension<MemberIdentity>,
) -> ApiResult<ProfileResponse> {
    let member = db::members::find_by_id(&state.pool, &identity.member_id)
        .await
        .map_err(|e| {
            tracing::error!("Profile query error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(|| AppError::new(ErrorCode::MemberNotFound))?;

    let vehicles = db::vehicles::list_for_member(&state.pool, &member.id)
        .await
        .map_err(|e| {
            tracing::error!("Vehicle query error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?;

    Ok(Json(ProfileResponse { member, vehicles }))
}

// ── PUT /api/profile ──

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(identity): Extension<MemberIdentity>,
    Json(req): Json<MemberUpdate>,
) -> ApiResult<Member> {
    // Provided fields must be valid; absent fields keep their stored value
    if let Some(ref phone) = req.phone {
        validation::validate_required_text(phone, "phone", validation::MAX_SHORT_TEXT_LEN)?;
    }
    if let Some(ref street) = req.street {
        validation::validate_required_text(street, "street", validation::MAX_ADDRESS_LEN)?;
    }
    if let Some(ref city) = req.city {
        validation::validate_required_text(city, "city", validation::MAX_SHORT_TEXT_LEN)?;
    }
    if let Some(ref postal_code) = req.postal_code {
        validation::validate_postal_code(postal_code)?;
    }

    let member = db::members::update_contact(
        &state.pool,
        &identity.member_id,
        req.phone.as_deref(),
        req.street.as_deref(),
        req.city.as_deref(),
        req.postal_code.as_deref(),
    )
    .await
    .map_err(|e| {
        tracing::error!("Profile update error: {e}");
        AppError::new(ErrorCode::DatabaseError)
    })?
    .ok_or_else(|| AppError::new(ErrorCode::MemberNotFound))?;

    tracing::info!(member_id = %member.id, "Profile updated");

    Ok(Json(member))
}

// ── POST /api/profile/vehicles ──

pub async fn add_vehicle(
    State(state): State<AppState>,
    Extension(identity): Extension<MemberIdentity>,
    Json(req): Json<VehicleCreate>,
) -> ApiResult<Vehicle> {
    validation::validate_vehicle(&req)?;

    let vehicle = Vehicle {
        id: snowflake_id(),
        member_id: identity.member_id.clone(),
        make: req.make.trim().to_string(),
        model: req.model.trim().to_string(),
        year: req.year,
        plate: req.plate,
        created_at: now_millis(),
    };

    db::vehicles::create(&state.pool, &vehicle)
        .await
        .map_err(|e| {
            tracing::error!("Failed to store vehicle: {e}");
            AppError::new(ErrorCode::DatabaseError)
        })?;

    tracing::info!(member_id = %identity.member_id, vehicle_id = vehicle.id, "Vehicle added");

    Ok(Json(vehicle))
}

// ── DELETE /api/profile/vehicles/{id} ──

pub async fn remove_vehicle(
    State(state): State<AppState>,
    Extension(identity): Extension<MemberIdentity>,
    Path(id): Path<i64>,
) -> ApiResult<serde_json::Value> {
    let count = db::vehicles::count_for_member(&state.pool, &identity.member_id)
        .await
        .map_err(|e| {
            tracing::error!("Vehicle count error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?;

    // A membership always keeps at least one vehicle on file
    if count <= 1 {
        return Err(AppError::new(ErrorCode::LastVehicle));
    }

    let removed = db::vehicles::delete(&state.pool, id, &identity.member_id)
        .await
        .map_err(|e| {
            tracing::error!("Vehicle delete error: {e}");
            AppError::new(ErrorCode::DatabaseError)
        })?;

    if !removed {
        return Err(AppError::new(ErrorCode::VehicleNotFound));
    }

    tracing::info!(member_id = %identity.member_id, vehicle_id = id, "Vehicle removed");

    Ok(Json(json!({ "message": "Vehicle removed" })))
}
