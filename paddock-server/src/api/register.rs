//! Registration and email verification handlers
//!
//! POST /api/register            — validate, allocate a member code, create
//!                                 account + profile + vehicles, email a link
//! POST /api/verify-email        — redeem a verification token (single use)
//! POST /api/resend-verification — rotate the token and email a fresh link

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use serde_json::json;
use shared::error::{AppError, ErrorCode};
use shared::models::{Member, MemberStatus, MemberTier, Vehicle, VehicleCreate};
use shared::util::{now_millis, snowflake_id};

use crate::state::AppState;
use crate::util::{generate_verification_token, hash_password};
use crate::{db, email, membercode, validation};

use super::ApiResult;

// ── Request / Response types ──

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    /// ISO date (YYYY-MM-DD)
    pub date_of_birth: String,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub vehicles: Vec<VehicleCreate>,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub member_id: String,
    pub member_code: String,
    pub status: String,
    pub message: String,
}

#[derive(Deserialize)]
pub struct VerifyEmailRequest {
    pub token: String,
}

#[derive(Deserialize)]
pub struct ResendRequest {
    pub email: String,
}

/// Run every field check and collect the failures, so the applicant sees
/// all problems in one round trip. Nothing is written until this passes.
fn validate_registration(req: &RegisterRequest) -> Result<(), AppError> {
    let mut field_errors: Vec<(String, String)> = Vec::new();
    let mut check = |field: &str, result: Result<(), AppError>| {
        if let Err(e) = result {
            field_errors.push((field.to_string(), e.message));
        }
    };

    check(
        "full_name",
        validation::validate_required_text(&req.full_name, "full_name", validation::MAX_NAME_LEN),
    );
    check("email", validation::validate_email(&req.email));
    check("password", validation::validate_password(&req.password));
    check(
        "phone",
        validation::validate_required_text(&req.phone, "phone", validation::MAX_SHORT_TEXT_LEN),
    );
    check(
        "date_of_birth",
        validation::validate_date_of_birth(&req.date_of_birth),
    );
    check(
        "street",
        validation::validate_required_text(&req.street, "street", validation::MAX_ADDRESS_LEN),
    );
    check(
        "city",
        validation::validate_required_text(&req.city, "city", validation::MAX_SHORT_TEXT_LEN),
    );
    check(
        "postal_code",
        validation::validate_postal_code(&req.postal_code),
    );

    if req.vehicles.is_empty() {
        field_errors.push((
            "vehicles".to_string(),
            ErrorCode::VehicleRequired.message().to_string(),
        ));
    }
    for (i, vehicle) in req.vehicles.iter().enumerate() {
        if let Err(e) = validation::validate_vehicle(vehicle) {
            field_errors.push((format!("vehicles[{i}]"), e.message));
        }
    }

    if field_errors.is_empty() {
        return Ok(());
    }

    let mut err = AppError::new(ErrorCode::ValidationFailed);
    for (field, message) in field_errors {
        err = err.with_detail(field, message);
    }
    Err(err)
}

// ── POST /api/register ──

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<RegisterResponse> {
    validate_registration(&req)?;

    let email_addr = req.email.trim().to_lowercase();

    // Duplicate email pre-check; the unique constraint backstops the race
    match db::members::find_by_email(&state.pool, &email_addr).await {
        Ok(Some(_)) => return Err(AppError::new(ErrorCode::EmailAlreadyRegistered)),
        Ok(None) => {}
        Err(e) => {
            tracing::error!("DB error checking email: {e}");
            return Err(AppError::new(ErrorCode::InternalError));
        }
    }

    let hashed_password = hash_password(&req.password).map_err(|e| {
        tracing::error!("Password hash error: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    let now = now_millis();
    let account_id = uuid::Uuid::new_v4().to_string();
    let member_id = uuid::Uuid::new_v4().to_string();

    let member_code = membercode::allocate(&state.pool, &state.member_code_prefix)
        .await
        .map_err(|e| {
            tracing::error!("Member code allocation failed: {e}");
            AppError::new(ErrorCode::InternalError)
        })?;

    // Identity first, then profile. No transaction spans the two inserts:
    // a profile failure below leaves the account row behind as a logged
    // inconsistency for manual reconciliation.
    db::accounts::create(
        &state.pool,
        &account_id,
        &email_addr,
        &hashed_password,
        &member_code,
        now,
    )
    .await
    .map_err(|e| {
        if db::violated_constraint(&e) == Some("accounts_email_key") {
            return AppError::new(ErrorCode::EmailAlreadyRegistered);
        }
        tracing::error!("Failed to create account: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    let verification_token = generate_verification_token();
    let mut member = Member {
        id: member_id.clone(),
        account_id: account_id.clone(),
        member_code,
        full_name: req.full_name.trim().to_string(),
        email: email_addr.clone(),
        phone: req.phone.trim().to_string(),
        date_of_birth: req.date_of_birth.trim().to_string(),
        street: req.street.trim().to_string(),
        city: req.city.trim().to_string(),
        postal_code: req.postal_code.trim().to_string(),
        tier: MemberTier::Regular.as_db().to_string(),
        status: MemberStatus::Pending.as_db().to_string(),
        verification_token: Some(verification_token.clone()),
        created_at: now,
        verified_at: None,
    };

    let mut attempt = 1;
    loop {
        match db::members::create(&state.pool, &member).await {
            Ok(()) => break,
            Err(e)
                if db::violated_constraint(&e) == Some("members_member_code_key")
                    && attempt < membercode::ALLOCATION_ATTEMPTS =>
            {
                attempt += 1;
                tracing::warn!(
                    code = %member.member_code,
                    attempt,
                    "Member code raced, reallocating"
                );
                member.member_code = membercode::allocate(&state.pool, &state.member_code_prefix)
                    .await
                    .map_err(|e| {
                        tracing::error!("Member code reallocation failed: {e}");
                        AppError::new(ErrorCode::InternalError)
                    })?;
                let _ =
                    db::accounts::set_member_code(&state.pool, &account_id, &member.member_code)
                        .await;
            }
            Err(e) if db::violated_constraint(&e) == Some("members_member_code_key") => {
                tracing::error!(
                    account_id = %account_id,
                    "Member code allocation exhausted after {attempt} attempts; \
                     account row left for reconciliation"
                );
                return Err(AppError::new(ErrorCode::MemberCodeConflict));
            }
            Err(e) if db::violated_constraint(&e) == Some("members_email_key") => {
                tracing::warn!(
                    account_id = %account_id,
                    email = %email_addr,
                    "Duplicate email raced past the pre-check; account row left for reconciliation"
                );
                return Err(AppError::new(ErrorCode::EmailAlreadyRegistered));
            }
            Err(e) => {
                tracing::error!(
                    account_id = %account_id,
                    "Failed to create member profile: {e}; account row left for reconciliation"
                );
                return Err(AppError::new(ErrorCode::InternalError));
            }
        }
    }

    // Vehicle failures after the profile exists are logged, not unwound
    for vehicle in &req.vehicles {
        let row = Vehicle {
            id: snowflake_id(),
            member_id: member_id.clone(),
            make: vehicle.make.trim().to_string(),
            model: vehicle.model.trim().to_string(),
            year: vehicle.year,
            plate: vehicle.plate.clone(),
            created_at: now,
        };
        if let Err(e) = db::vehicles::create(&state.pool, &row).await {
            tracing::error!(member_id = %member_id, "Failed to store vehicle: {e}");
        }
    }

    // Email dispatch is non-fatal: the profile stands and the link can be
    // resent through /api/resend-verification
    let link = format!("{}?token={}", state.verify_base_url, verification_token);
    if let Err(e) = email::send_verification_link(
        &state.ses,
        &state.ses_from_email,
        &email_addr,
        &member.full_name,
        &link,
    )
    .await
    {
        tracing::warn!(member_id = %member_id, "Verification email failed: {e}");
    }

    tracing::info!(
        member_id = %member_id,
        member_code = %member.member_code,
        "Member registered, verification pending"
    );

    Ok(Json(RegisterResponse {
        member_id,
        member_code: member.member_code,
        status: member.status,
        message: "Registration received. Check your inbox to confirm your email address."
            .to_string(),
    }))
}

// ── POST /api/verify-email ──

pub async fn verify_email(
    State(state): State<AppState>,
    Json(req): Json<VerifyEmailRequest>,
) -> ApiResult<serde_json::Value> {
    let token = req.token.trim();
    if token.is_empty() {
        return Err(AppError::new(ErrorCode::VerificationTokenInvalid));
    }

    let now = now_millis();

    // One conditional UPDATE: whoever redeems the token first wins, and the
    // caller cannot tell a consumed token from one that never existed.
    let member = db::members::consume_verification_token(&state.pool, token, now)
        .await
        .map_err(|e| {
            tracing::error!("DB error consuming verification token: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(|| AppError::new(ErrorCode::VerificationTokenInvalid))?;

    if let Err(e) = email::send_welcome(
        &state.ses,
        &state.ses_from_email,
        &member.email,
        &member.full_name,
        &member.member_code,
    )
    .await
    {
        tracing::warn!(member_id = %member.id, "Welcome email failed: {e}");
    }

    tracing::info!(
        member_id = %member.id,
        member_code = %member.member_code,
        "Email verified, membership active"
    );

    Ok(Json(json!({
        "member_code": member.member_code,
        "status": member.status,
        "message": "Email verified. Welcome to the club!",
    })))
}

// ── POST /api/resend-verification ──

pub async fn resend_verification(
    State(state): State<AppState>,
    Json(req): Json<ResendRequest>,
) -> ApiResult<serde_json::Value> {
    let email_addr = req.email.trim().to_lowercase();

    let member = db::members::find_by_email(&state.pool, &email_addr)
        .await
        .map_err(|e| {
            tracing::error!("DB error finding member: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(|| AppError::new(ErrorCode::MemberNotFound))?;

    match MemberStatus::from_db(&member.status) {
        Some(MemberStatus::Pending) => {}
        Some(MemberStatus::Active) => return Err(AppError::new(ErrorCode::AlreadyVerified)),
        Some(_) => return Err(AppError::new(ErrorCode::NotPendingVerification)),
        None => {
            tracing::error!(member_id = %member.id, status = %member.status, "Unknown status in storage");
            return Err(AppError::new(ErrorCode::InternalError));
        }
    }

    // Fresh token invalidates the previously emailed link
    let token = generate_verification_token();
    let rotated = db::members::rotate_verification_token(&state.pool, &member.id, &token)
        .await
        .map_err(|e| {
            tracing::error!("DB error rotating verification token: {e}");
            AppError::new(ErrorCode::InternalError)
        })?;
    if !rotated {
        // Raced with a verify or an admin action between the read and the update
        return Err(AppError::new(ErrorCode::NotPendingVerification));
    }

    // Unlike registration, the email is the whole point here, so a dispatch
    // failure is the caller's problem to retry
    let link = format!("{}?token={}", state.verify_base_url, token);
    email::send_verification_link(
        &state.ses,
        &state.ses_from_email,
        &member.email,
        &member.full_name,
        &link,
    )
    .await
    .map_err(|e| {
        tracing::error!(member_id = %member.id, "Verification email failed: {e}");
        AppError::new(ErrorCode::EmailDispatchFailed)
    })?;

    tracing::info!(member_id = %member.id, "Verification email resent");

    Ok(Json(json!({ "message": "Verification email resent" })))
}
