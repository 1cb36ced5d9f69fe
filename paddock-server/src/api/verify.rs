//! Public member-validity lookup (the QR flow)
//!
//! Scanning a member card's QR code hits this endpoint with the opaque
//! member id. The response is always 200 with a verdict; it discloses
//! nothing beyond what the card itself shows.

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;
use shared::error::AppError;
use shared::models::MemberVerification;

use crate::db;
use crate::state::AppState;

use super::ApiResult;

#[derive(Deserialize)]
pub struct VerifyMemberQuery {
    /// Opaque member id embedded in the QR payload
    pub member: Option<String>,
}

/// GET /api/verify-member?member=<id>
pub async fn verify_member(
    State(state): State<AppState>,
    Query(query): Query<VerifyMemberQuery>,
) -> ApiResult<MemberVerification> {
    // Garbage or missing ids are a not-found verdict, not an error
    let Some(member_id) = query.member.filter(|m| !m.trim().is_empty()) else {
        return Ok(Json(MemberVerification::not_found()));
    };

    let member = match db::members::find_by_id(&state.pool, member_id.trim()).await {
        Ok(Some(m)) => m,
        Ok(None) => return Ok(Json(MemberVerification::not_found())),
        Err(e) => {
            tracing::error!("DB error in member lookup: {e}");
            return Err(AppError::database("member lookup failed"));
        }
    };

    let vehicles = match db::vehicles::list_for_member(&state.pool, &member.id).await {
        Ok(v) => v,
        Err(e) => {
            // A verdict without the vehicle list still answers the question
            tracing::error!(member_id = %member.id, "DB error listing vehicles: {e}");
            Vec::new()
        }
    };

    Ok(Json(MemberVerification::for_member(&member, vehicles)))
}
