//! Member JWT sessions
//!
//! Login issues a 24-hour HS256 token; `auth_middleware` verifies it and
//! injects a [`MemberIdentity`] extension for downstream handlers.
//! `require_admin` layers on top for staff-only routes.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::MemberTier;

use crate::state::AppState;

/// JWT claims for a member session
#[derive(Debug, Serialize, Deserialize)]
pub struct MemberClaims {
    /// Member ID
    pub sub: String,
    /// Member code (printed on the card)
    pub code: String,
    /// Tier at login time
    pub tier: String,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

/// Authenticated member identity extracted from the session token
#[derive(Debug, Clone)]
pub struct MemberIdentity {
    pub member_id: String,
    pub member_code: String,
    pub tier: MemberTier,
}

const JWT_EXPIRY_HOURS: i64 = 24;

/// Create a session token for a member
pub fn create_token(
    member_id: &str,
    member_code: &str,
    tier: &str,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = MemberClaims {
        sub: member_id.to_string(),
        code: member_code.to_string(),
        tier: tier.to_string(),
        exp: (now + chrono::Duration::hours(JWT_EXPIRY_HOURS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Middleware that extracts and verifies the member JWT from the
/// Authorization header
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::not_authenticated().into_response())?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::not_authenticated().into_response())?;

    let token_data = jsonwebtoken::decode::<MemberClaims>(
        token,
        &DecodingKey::from_secret(state.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        tracing::debug!("Session token rejected: {e}");
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                AppError::token_expired().into_response()
            }
            _ => AppError::new(ErrorCode::TokenInvalid).into_response(),
        }
    })?;

    let claims = token_data.claims;
    let tier = MemberTier::from_db(&claims.tier)
        .ok_or_else(|| AppError::new(ErrorCode::TokenInvalid).into_response())?;

    request.extensions_mut().insert(MemberIdentity {
        member_id: claims.sub,
        member_code: claims.code,
        tier,
    });

    Ok(next.run(request).await)
}

/// Guard for staff routes; must run after [`auth_middleware`].
pub async fn require_admin(request: Request, next: Next) -> Result<Response, Response> {
    let is_admin = request
        .extensions()
        .get::<MemberIdentity>()
        .is_some_and(|identity| identity.tier.is_admin());

    if !is_admin {
        return Err(AppError::new(ErrorCode::AdminRequired).into_response());
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_token_round_trip() {
        let token = create_token("member-1", "BTC0042", "premium", SECRET).unwrap();

        let data = jsonwebtoken::decode::<MemberClaims>(
            &token,
            &DecodingKey::from_secret(SECRET.as_bytes()),
            &Validation::default(),
        )
        .unwrap();

        assert_eq!(data.claims.sub, "member-1");
        assert_eq!(data.claims.code, "BTC0042");
        assert_eq!(data.claims.tier, "premium");
        assert!(data.claims.exp > data.claims.iat);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = create_token("member-1", "BTC0042", "regular", SECRET).unwrap();

        let result = jsonwebtoken::decode::<MemberClaims>(
            &token,
            &DecodingKey::from_secret(b"other-secret"),
            &Validation::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let now = chrono::Utc::now();
        let claims = MemberClaims {
            sub: "member-1".to_string(),
            code: "BTC0042".to_string(),
            tier: "regular".to_string(),
            // Well past the default decode leeway
            exp: (now - chrono::Duration::hours(2)).timestamp() as usize,
            iat: (now - chrono::Duration::hours(3)).timestamp() as usize,
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let err = jsonwebtoken::decode::<MemberClaims>(
            &token,
            &DecodingKey::from_secret(SECRET.as_bytes()),
            &Validation::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err.kind(),
            jsonwebtoken::errors::ErrorKind::ExpiredSignature
        ));
    }
}
