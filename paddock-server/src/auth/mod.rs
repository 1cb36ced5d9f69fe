//! Session tokens and request guards for the member-facing API

pub mod rate_limit;
pub mod session;

pub use rate_limit::RateLimiter;
pub use session::MemberIdentity;
