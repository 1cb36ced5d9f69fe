//! Unified error codes for the Paddock membership platform
//!
//! This module defines all error codes used across the membership server and
//! its clients (member portal, admin dashboard, vendor kiosks).
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Member, registration and verification errors
//! - 4xxx: Vendor deal errors
//! - 5xxx: Vehicle errors
//! - 9xxx: System errors
//!
//! Ranges 6xxx-8xxx are reserved for future surfaces.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Session has expired
    SessionExpired = 1005,
    /// Account is disabled
    AccountDisabled = 1006,
    /// Too many requests from this client
    RateLimited = 1007,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin tier required
    AdminRequired = 2002,

    // ==================== 3xxx: Member ====================
    /// Member not found
    MemberNotFound = 3001,
    /// Email already registered
    EmailAlreadyRegistered = 3002,
    /// Member code allocation conflict (retries exhausted)
    MemberCodeConflict = 3003,
    /// Verification token invalid or already consumed
    VerificationTokenInvalid = 3004,
    /// Membership is not awaiting verification
    NotPendingVerification = 3005,
    /// Email already verified
    AlreadyVerified = 3006,
    /// Email not verified yet
    EmailNotVerified = 3007,
    /// Requested status transition is not allowed
    InvalidStatusTransition = 3008,
    /// Membership is suspended or expired
    MemberNotActive = 3009,
    /// Password does not meet minimum rules
    PasswordTooWeak = 3010,
    /// Applicant below minimum age
    UnderMinimumAge = 3011,

    // ==================== 4xxx: Deal ====================
    /// Vendor deal not found
    DealNotFound = 4001,
    /// Deal has no line items
    DealEmpty = 4002,
    /// Deal item amount is not positive
    DealInvalidAmount = 4003,

    // ==================== 5xxx: Vehicle ====================
    /// Vehicle not found
    VehicleNotFound = 5001,
    /// At least one vehicle is required
    VehicleRequired = 5002,
    /// Cannot remove a member's last vehicle
    LastVehicle = 5003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
    /// Outbound email dispatch failed
    EmailDispatchFailed = 9101,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::SessionExpired => "Session has expired",
            ErrorCode::AccountDisabled => "Account is disabled",
            ErrorCode::RateLimited => "Too many requests, please try again later",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Administrator tier is required",

            // Member
            ErrorCode::MemberNotFound => "Member not found",
            ErrorCode::EmailAlreadyRegistered => "Email is already registered",
            ErrorCode::MemberCodeConflict => "Could not allocate a member code",
            ErrorCode::VerificationTokenInvalid => "Verification link is invalid or has expired",
            ErrorCode::NotPendingVerification => "Membership is not awaiting verification",
            ErrorCode::AlreadyVerified => "Email is already verified",
            ErrorCode::EmailNotVerified => "Email is not verified",
            ErrorCode::InvalidStatusTransition => "Membership status transition is not allowed",
            ErrorCode::MemberNotActive => "Membership is not active",
            ErrorCode::PasswordTooWeak => {
                "Password must be at least 8 characters and contain letters and digits"
            }
            ErrorCode::UnderMinimumAge => "Applicants must be at least 16 years old",

            // Deal
            ErrorCode::DealNotFound => "Deal not found",
            ErrorCode::DealEmpty => "Deal has no items",
            ErrorCode::DealInvalidAmount => "Deal item amount must be greater than zero",

            // Vehicle
            ErrorCode::VehicleNotFound => "Vehicle not found",
            ErrorCode::VehicleRequired => "At least one vehicle is required",
            ErrorCode::LastVehicle => "Cannot remove the only vehicle on a membership",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::EmailDispatchFailed => "Failed to send email",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::SessionExpired),
            1006 => Ok(ErrorCode::AccountDisabled),
            1007 => Ok(ErrorCode::RateLimited),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::AdminRequired),

            // Member
            3001 => Ok(ErrorCode::MemberNotFound),
            3002 => Ok(ErrorCode::EmailAlreadyRegistered),
            3003 => Ok(ErrorCode::MemberCodeConflict),
            3004 => Ok(ErrorCode::VerificationTokenInvalid),
            3005 => Ok(ErrorCode::NotPendingVerification),
            3006 => Ok(ErrorCode::AlreadyVerified),
            3007 => Ok(ErrorCode::EmailNotVerified),
            3008 => Ok(ErrorCode::InvalidStatusTransition),
            3009 => Ok(ErrorCode::MemberNotActive),
            3010 => Ok(ErrorCode::PasswordTooWeak),
            3011 => Ok(ErrorCode::UnderMinimumAge),

            // Deal
            4001 => Ok(ErrorCode::DealNotFound),
            4002 => Ok(ErrorCode::DealEmpty),
            4003 => Ok(ErrorCode::DealInvalidAmount),

            // Vehicle
            5001 => Ok(ErrorCode::VehicleNotFound),
            5002 => Ok(ErrorCode::VehicleRequired),
            5003 => Ok(ErrorCode::LastVehicle),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),
            9101 => Ok(ErrorCode::EmailDispatchFailed),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
