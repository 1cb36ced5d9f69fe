//! Database access layer

pub mod accounts;
pub mod audit;
pub mod deals;
pub mod members;
pub mod vehicles;

/// Name of the unique constraint a database error violated, if any.
///
/// The registration and tier-change paths dispatch on this: a
/// `members_member_code_key` hit means an allocation race (retry with a
/// fresh code), a `members_email_key` / `accounts_email_key` hit means a
/// duplicate registration.
pub fn violated_constraint(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db_err) => db_err.constraint(),
        _ => None,
    }
}
