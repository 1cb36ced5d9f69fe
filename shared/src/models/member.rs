//! Member profile model and lifecycle types

use serde::{Deserialize, Serialize};

use super::vehicle::Vehicle;

/// Membership lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberStatus {
    /// Registered, awaiting email verification
    Pending,
    /// Email verified, membership in good standing
    Active,
    /// Administratively suspended
    Suspended,
    /// Membership lapsed
    Expired,
}

impl MemberStatus {
    /// Parse from database string value (lowercase)
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "pending_verification" => Some(Self::Pending),
            "active" => Some(Self::Active),
            "suspended" => Some(Self::Suspended),
            "expired" => Some(Self::Expired),
            _ => None,
        }
    }

    /// Database string representation (lowercase)
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Pending => "pending_verification",
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::Expired => "expired",
        }
    }

    /// Can a member in this status log in?
    pub fn can_login(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Does this status count as a valid membership (QR checks, vendor perks)?
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Admin-driven lifecycle edges. Email verification activates a pending
    /// profile separately, through the token-consume path.
    pub fn can_transition_to(&self, next: Self) -> bool {
        match (self, next) {
            (Self::Pending, Self::Active | Self::Suspended | Self::Expired) => true,
            (Self::Active, Self::Suspended | Self::Expired) => true,
            (Self::Suspended, Self::Active) => true,
            (Self::Expired, Self::Active) => true,
            _ => false,
        }
    }
}

/// Membership tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberTier {
    Regular,
    Premium,
    Admin,
}

impl MemberTier {
    /// Parse from database string value (lowercase)
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "regular" => Some(Self::Regular),
            "premium" => Some(Self::Premium),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Database string representation (lowercase)
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Premium => "premium",
            Self::Admin => "admin",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Code prefix used when a tier change reallocates the member code.
    /// Admins keep whatever code they already hold.
    pub fn code_prefix(&self) -> Option<&'static str> {
        match self {
            Self::Regular => Some("REG-"),
            Self::Premium => Some("VIP-"),
            Self::Admin => None,
        }
    }
}

/// Member profile (one row per club member)
///
/// The verification token is write-only from the API's point of view:
/// it goes out inside the emailed link, never inside a JSON body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Member {
    pub id: String,
    pub account_id: String,
    pub member_code: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    /// ISO date (YYYY-MM-DD)
    pub date_of_birth: String,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub tier: String,
    pub status: String,
    #[serde(skip_serializing, default)]
    pub verification_token: Option<String>,
    pub created_at: i64,
    pub verified_at: Option<i64>,
}

/// Member self-service contact update payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberUpdate {
    pub phone: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
}

/// Outcome of a public membership check (QR lookup)
///
/// A missing profile and an inactive one both come back non-valid, with
/// `reason` telling the kiosk which card to render.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberVerification {
    pub valid: bool,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
    #[serde(default)]
    pub vehicles: Vec<Vehicle>,
}

impl MemberVerification {
    /// Result for an unknown or malformed member id
    pub fn not_found() -> Self {
        Self {
            valid: false,
            reason: "not_found".to_string(),
            full_name: None,
            member_code: None,
            tier: None,
            vehicles: Vec::new(),
        }
    }

    /// Classify an existing profile
    pub fn for_member(member: &Member, vehicles: Vec<Vehicle>) -> Self {
        let valid = MemberStatus::from_db(&member.status).is_some_and(|s| s.is_valid());
        Self {
            valid,
            reason: member.status.clone(),
            full_name: Some(member.full_name.clone()),
            member_code: Some(member.member_code.clone()),
            tier: Some(member.tier.clone()),
            vehicles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_member(status: &str) -> Member {
        Member {
            id: "m-1".to_string(),
            account_id: "a-1".to_string(),
            member_code: "BTC0001".to_string(),
            full_name: "Jo Driver".to_string(),
            email: "jo@example.com".to_string(),
            phone: "+44 1234 567890".to_string(),
            date_of_birth: "1990-04-01".to_string(),
            street: "1 Pit Lane".to_string(),
            city: "Silverstone".to_string(),
            postal_code: "NN12 8TN".to_string(),
            tier: "regular".to_string(),
            status: status.to_string(),
            verification_token: None,
            created_at: 0,
            verified_at: None,
        }
    }

    #[test]
    fn test_status_db_roundtrip() {
        for status in [
            MemberStatus::Pending,
            MemberStatus::Active,
            MemberStatus::Suspended,
            MemberStatus::Expired,
        ] {
            assert_eq!(MemberStatus::from_db(status.as_db()), Some(status));
        }
        assert_eq!(MemberStatus::from_db("deleted"), None);
        assert_eq!(MemberStatus::from_db(""), None);
    }

    #[test]
    fn test_status_can_login() {
        assert!(MemberStatus::Active.can_login());
        assert!(!MemberStatus::Pending.can_login());
        assert!(!MemberStatus::Suspended.can_login());
        assert!(!MemberStatus::Expired.can_login());
    }

    #[test]
    fn test_status_transitions_allowed() {
        use MemberStatus::*;

        // Pending can be activated (admin override) or closed out
        assert!(Pending.can_transition_to(Active));
        assert!(Pending.can_transition_to(Suspended));
        assert!(Pending.can_transition_to(Expired));

        // Active memberships can only be suspended or expired
        assert!(Active.can_transition_to(Suspended));
        assert!(Active.can_transition_to(Expired));

        // Reinstatement
        assert!(Suspended.can_transition_to(Active));
        assert!(Expired.can_transition_to(Active));
    }

    #[test]
    fn test_status_transitions_rejected() {
        use MemberStatus::*;

        // No self-transitions
        assert!(!Pending.can_transition_to(Pending));
        assert!(!Active.can_transition_to(Active));
        assert!(!Suspended.can_transition_to(Suspended));

        // Nothing goes back to pending
        assert!(!Active.can_transition_to(Pending));
        assert!(!Suspended.can_transition_to(Pending));
        assert!(!Expired.can_transition_to(Pending));

        // Closed states do not swap between themselves
        assert!(!Suspended.can_transition_to(Expired));
        assert!(!Expired.can_transition_to(Suspended));
    }

    #[test]
    fn test_tier_db_roundtrip() {
        for tier in [MemberTier::Regular, MemberTier::Premium, MemberTier::Admin] {
            assert_eq!(MemberTier::from_db(tier.as_db()), Some(tier));
        }
        assert_eq!(MemberTier::from_db("gold"), None);
    }

    #[test]
    fn test_tier_code_prefix() {
        assert_eq!(MemberTier::Regular.code_prefix(), Some("REG-"));
        assert_eq!(MemberTier::Premium.code_prefix(), Some("VIP-"));
        assert_eq!(MemberTier::Admin.code_prefix(), None);
        assert!(MemberTier::Admin.is_admin());
        assert!(!MemberTier::Premium.is_admin());
    }

    #[test]
    fn test_member_serialization_hides_token() {
        let mut member = sample_member("pending_verification");
        member.verification_token = Some("deadbeef".to_string());

        let json = serde_json::to_string(&member).unwrap();
        assert!(!json.contains("deadbeef"));
        assert!(!json.contains("verification_token"));
        assert!(json.contains("BTC0001"));
    }

    #[test]
    fn test_verification_for_active_member() {
        let member = sample_member("active");
        let result = MemberVerification::for_member(&member, Vec::new());

        assert!(result.valid);
        assert_eq!(result.reason, "active");
        assert_eq!(result.member_code.as_deref(), Some("BTC0001"));
        assert_eq!(result.full_name.as_deref(), Some("Jo Driver"));
    }

    #[test]
    fn test_verification_for_suspended_member() {
        let member = sample_member("suspended");
        let result = MemberVerification::for_member(&member, Vec::new());

        assert!(!result.valid);
        assert_eq!(result.reason, "suspended");
        // Identity still surfaced so staff can see who the card belongs to
        assert_eq!(result.member_code.as_deref(), Some("BTC0001"));
    }

    #[test]
    fn test_verification_not_found() {
        let result = MemberVerification::not_found();
        assert!(!result.valid);
        assert_eq!(result.reason, "not_found");
        assert!(result.member_code.is_none());
        assert!(result.vehicles.is_empty());
    }
}
