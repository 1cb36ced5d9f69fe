//! Vendor deal endpoints
//!
//! The partner till flow: look the member up by code, record the deal.
//! Deals are immutable; a correction is a new deal.
//!
//! GET  /api/vendor/members/{code}  — member snapshot for the till screen
//! POST /api/vendor/deals           — record a deal (items, server-side total)
//! GET  /api/vendor/deals           — newest first, optional vendor= filter
//! GET  /api/vendor/deals/{id}      — deal detail with line items
//! GET  /api/vendor/deals/summary   — per-vendor count + revenue

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    DealItem, DealItemCreate, DealWithItems, MemberStatus, VendorDeal, VendorSummary, deal_total,
};
use shared::util::{now_millis, snowflake_id};

use crate::auth::MemberIdentity;
use crate::state::AppState;
use crate::{db, validation};

use super::ApiResult;

// ── GET /api/vendor/members/{code} ──

/// Member snapshot by code. Deliberately excludes address and date of
/// birth; vendors only need identity, tier and standing.
pub async fn member_by_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<serde_json::Value> {
    let member = db::members::find_by_code(&state.pool, code.trim())
        .await
        .map_err(|e| {
            tracing::error!("Member lookup error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(|| AppError::new(ErrorCode::MemberNotFound))?;

    Ok(Json(json!({
        "member_id": member.id,
        "member_code": member.member_code,
        "full_name": member.full_name,
        "tier": member.tier,
        "status": member.status,
    })))
}

// ── POST /api/vendor/deals ──

#[derive(Deserialize)]
pub struct RecordDealRequest {
    pub vendor: String,
    pub member_code: String,
    pub items: Vec<DealItemCreate>,
}

pub async fn record_deal(
    State(state): State<AppState>,
    Extension(identity): Extension<MemberIdentity>,
    Json(req): Json<RecordDealRequest>,
) -> ApiResult<DealWithItems> {
    validation::validate_required_text(&req.vendor, "vendor", validation::MAX_SHORT_TEXT_LEN)?;

    if req.items.is_empty() {
        return Err(AppError::new(ErrorCode::DealEmpty));
    }
    for item in &req.items {
        validation::validate_required_text(&item.label, "label", validation::MAX_SHORT_TEXT_LEN)?;
        if item.amount <= Decimal::ZERO {
            return Err(
                AppError::new(ErrorCode::DealInvalidAmount).with_detail("label", item.label.clone())
            );
        }
    }

    let member = db::members::find_by_code(&state.pool, req.member_code.trim())
        .await
        .map_err(|e| {
            tracing::error!("Member lookup error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(|| AppError::new(ErrorCode::MemberNotFound))?;

    if MemberStatus::from_db(&member.status) != Some(MemberStatus::Active) {
        return Err(
            AppError::new(ErrorCode::MemberNotActive).with_detail("status", member.status.clone())
        );
    }

    let now = now_millis();
    let deal_id = snowflake_id();
    let deal = VendorDeal {
        id: deal_id,
        vendor: req.vendor.trim().to_string(),
        member_id: member.id.clone(),
        member_code: member.member_code.clone(),
        // Client-sent totals are ignored; the stored total is ours
        total: deal_total(&req.items),
        created_by: identity.member_id.clone(),
        created_at: now,
    };
    let items: Vec<DealItem> = req
        .items
        .iter()
        .map(|item| DealItem {
            id: snowflake_id(),
            deal_id,
            label: item.label.trim().to_string(),
            amount: item.amount,
            custom: item.custom,
        })
        .collect();

    db::deals::create(&state.pool, &deal, &items)
        .await
        .map_err(|e| {
            tracing::error!("Failed to record deal: {e}");
            AppError::new(ErrorCode::DatabaseError)
        })?;

    let detail = json!({
        "vendor": deal.vendor,
        "total": deal.total,
        "items": items.len(),
    });
    let _ = db::audit::log(
        &state.pool,
        &identity.member_id,
        "deal_recorded",
        &member.id,
        Some(&detail),
        now,
    )
    .await;

    tracing::info!(
        deal_id,
        vendor = %deal.vendor,
        member_code = %deal.member_code,
        total = %deal.total,
        "Deal recorded"
    );

    Ok(Json(DealWithItems { deal, items }))
}

// ── GET /api/vendor/deals ──

#[derive(Deserialize)]
pub struct DealListQuery {
    pub vendor: Option<String>,
    pub page: Option<i32>,
    pub per_page: Option<i32>,
}

pub async fn list_deals(
    State(state): State<AppState>,
    Query(query): Query<DealListQuery>,
) -> ApiResult<Vec<VendorDeal>> {
    let per_page = query.per_page.unwrap_or(50).min(200);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    let vendor = query
        .vendor
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty());

    let deals = db::deals::list(&state.pool, vendor, per_page, offset)
        .await
        .map_err(|e| {
            tracing::error!("Deal list query error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?;

    Ok(Json(deals))
}

// ── GET /api/vendor/deals/{id} ──

pub async fn deal_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<DealWithItems> {
    let deal = db::deals::find(&state.pool, id)
        .await
        .map_err(|e| {
            tracing::error!("Deal query error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(|| AppError::new(ErrorCode::DealNotFound))?;

    let items = db::deals::items_for_deal(&state.pool, id)
        .await
        .map_err(|e| {
            tracing::error!("Deal items query error: {e}");
            AppError::new(ErrorCode::InternalError)
        })?;

    Ok(Json(DealWithItems { deal, items }))
}

// ── GET /api/vendor/deals/summary ──

pub async fn deal_summary(State(state): State<AppState>) -> ApiResult<Vec<VendorSummary>> {
    let summary = db::deals::summary(&state.pool).await.map_err(|e| {
        tracing::error!("Deal summary query error: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    Ok(Json(summary))
}
