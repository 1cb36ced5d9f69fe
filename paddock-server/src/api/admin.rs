//! Staff dashboard endpoints: member management and the audit trail
//!
//! GET /api/admin/members             — list, optional q= substring filter
//! GET /api/admin/members/{id}        — profile + vehicles
//! PUT /api/admin/members/{id}/status — edge-checked lifecycle transition
//! PUT /api/admin/members/{id}/tier   — tier change, renumbers the code
//! GET /api/admin/audit-log           — paginated audit trail

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::json;
use shared::error::{AppError, ErrorCode};
use shared::models::{Member, MemberStatus, MemberTier};
use shared::util::now_millis;

use crate::auth::MemberIdentity;
use crate::state::AppState;
use crate::{db, membercode};

use super::ApiResult;

// ── GET /api/admin/members ──

#[derive(Deserialize)]
pub struct MemberListQuery {
    pub q: Option<String>,
    pub page: Option<i32>,
    pub per_page: Option<i32>,
}

pub async fn list_members(
    State(state): State<AppState>,
    Query(query): Query<MemberListQuery>,
) -> ApiResult<Vec<Member>> {
    let per_page = query.per_page.unwrap_or(50).min(200);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    let q = query.q.as_deref().map(str::trim).filter(|s| !s.is_empty());

    let members = db::members::list(&state.pool, q, per_page, offset)
        .await
        .map_err(|e| {
            tracing::error!("Member list query error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?;

    Ok(Json(members))
}

// ── GET /api/admin/members/{id} ──

pub async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<serde_json::Value> {
    let member = db::members::find_by_id(&state.pool, &id)
        .await
        .map_err(|e| {
            tracing::error!("Member query error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(|| AppError::new(ErrorCode::MemberNotFound))?;

    let vehicles = db::vehicles::list_for_member(&state.pool, &member.id)
        .await
        .map_err(|e| {
            tracing::error!("Vehicle query error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?;

    Ok(Json(json!({ "member": member, "vehicles": vehicles })))
}

// ── PUT /api/admin/members/{id}/status ──

#[derive(Deserialize)]
pub struct SetStatusRequest {
    pub status: MemberStatus,
}

pub async fn set_status(
    State(state): State<AppState>,
    Extension(identity): Extension<MemberIdentity>,
    Path(id): Path<String>,
    Json(req): Json<SetStatusRequest>,
) -> ApiResult<Member> {
    let member = db::members::find_by_id(&state.pool, &id)
        .await
        .map_err(|e| {
            tracing::error!("Member query error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(|| AppError::new(ErrorCode::MemberNotFound))?;

    let current = MemberStatus::from_db(&member.status).ok_or_else(|| {
        tracing::error!(member_id = %member.id, status = %member.status, "Unknown status in storage");
        AppError::new(ErrorCode::InternalError)
    })?;

    if !current.can_transition_to(req.status) {
        return Err(AppError::new(ErrorCode::InvalidStatusTransition)
            .with_detail("from", current.as_db())
            .with_detail("to", req.status.as_db()));
    }

    let now = now_millis();
    let result = if req.status == MemberStatus::Active {
        // Override activation burns any outstanding verification token
        db::members::activate(&state.pool, &id, now).await
    } else {
        db::members::set_status(&state.pool, &id, req.status.as_db()).await
    };
    result.map_err(|e| {
        tracing::error!("Status update failed: {e}");
        AppError::new(ErrorCode::DatabaseError)
    })?;

    let detail = json!({ "from": current.as_db(), "to": req.status.as_db() });
    let _ = db::audit::log(
        &state.pool,
        &identity.member_id,
        "member_status_change",
        &id,
        Some(&detail),
        now,
    )
    .await;

    tracing::info!(
        member_id = %id,
        from = current.as_db(),
        to = req.status.as_db(),
        "Member status changed"
    );

    let updated = db::members::find_by_id(&state.pool, &id)
        .await
        .map_err(|e| {
            tracing::error!("Member re-read error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(|| AppError::new(ErrorCode::MemberNotFound))?;

    Ok(Json(updated))
}

// ── PUT /api/admin/members/{id}/tier ──

#[derive(Deserialize)]
pub struct SetTierRequest {
    pub tier: MemberTier,
}

pub async fn set_tier(
    State(state): State<AppState>,
    Extension(identity): Extension<MemberIdentity>,
    Path(id): Path<String>,
    Json(req): Json<SetTierRequest>,
) -> ApiResult<Member> {
    let member = db::members::find_by_id(&state.pool, &id)
        .await
        .map_err(|e| {
            tracing::error!("Member query error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(|| AppError::new(ErrorCode::MemberNotFound))?;

    let current = MemberTier::from_db(&member.tier).ok_or_else(|| {
        tracing::error!(member_id = %member.id, tier = %member.tier, "Unknown tier in storage");
        AppError::new(ErrorCode::InternalError)
    })?;

    if current == req.tier {
        return Err(AppError::with_message(
            ErrorCode::InvalidRequest,
            "Member already has this tier",
        ));
    }

    let now = now_millis();

    // Tier moves renumber the member under the tier's own prefix; admins
    // keep whatever code they already hold
    if let Some(prefix) = req.tier.code_prefix() {
        let mut attempt = 1;
        loop {
            let code = membercode::allocate(&state.pool, prefix).await.map_err(|e| {
                tracing::error!("Member code allocation failed: {e}");
                AppError::new(ErrorCode::InternalError)
            })?;

            match db::members::set_tier_and_code(&state.pool, &id, req.tier.as_db(), &code).await {
                Ok(()) => {
                    let _ =
                        db::accounts::set_member_code(&state.pool, &member.account_id, &code)
                            .await;
                    break;
                }
                Err(e)
                    if db::violated_constraint(&e) == Some("members_member_code_key")
                        && attempt < membercode::ALLOCATION_ATTEMPTS =>
                {
                    attempt += 1;
                    tracing::warn!(code = %code, attempt, "Member code raced, reallocating");
                }
                Err(e) if db::violated_constraint(&e) == Some("members_member_code_key") => {
                    tracing::error!("Member code allocation exhausted after {attempt} attempts");
                    return Err(AppError::new(ErrorCode::MemberCodeConflict));
                }
                Err(e) => {
                    tracing::error!("Tier update failed: {e}");
                    return Err(AppError::new(ErrorCode::DatabaseError));
                }
            }
        }
    } else {
        db::members::set_tier(&state.pool, &id, req.tier.as_db())
            .await
            .map_err(|e| {
                tracing::error!("Tier update failed: {e}");
                AppError::new(ErrorCode::DatabaseError)
            })?;
    }

    let updated = db::members::find_by_id(&state.pool, &id)
        .await
        .map_err(|e| {
            tracing::error!("Member re-read error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(|| AppError::new(ErrorCode::MemberNotFound))?;

    let detail = json!({
        "from": member.tier,
        "to": req.tier.as_db(),
        "member_code": updated.member_code,
    });
    let _ = db::audit::log(
        &state.pool,
        &identity.member_id,
        "member_tier_change",
        &id,
        Some(&detail),
        now,
    )
    .await;

    tracing::info!(
        member_id = %id,
        tier = req.tier.as_db(),
        member_code = %updated.member_code,
        "Member tier changed"
    );

    Ok(Json(updated))
}

// ── GET /api/admin/audit-log ──

#[derive(Deserialize)]
pub struct AuditQuery {
    pub page: Option<i32>,
    pub per_page: Option<i32>,
}

pub async fn audit_log(
    State(state): State<AppState>,
    Query(query): Query<AuditQuery>,
) -> ApiResult<Vec<db::audit::AuditEntry>> {
    let per_page = query.per_page.unwrap_or(20).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    let entries = db::audit::query(&state.pool, per_page, offset)
        .await
        .map_err(|e| {
            tracing::error!("Audit log query error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?;

    Ok(Json(entries))
}
