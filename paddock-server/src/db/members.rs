//! Member profile queries
//!
//! Status strings in storage are lowercase (`pending_verification`, `active`,
//! `suspended`, `expired`); [`shared::models::MemberStatus`] maps them.

use shared::models::Member;
use sqlx::PgPool;

pub async fn create(pool: &PgPool, member: &Member) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO members (
            id, account_id, member_code, full_name, email, phone,
            date_of_birth, street, city, postal_code, tier, status,
            verification_token, created_at, verified_at
         ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)",
    )
    .bind(&member.id)
    .bind(&member.account_id)
    .bind(&member.member_code)
    .bind(&member.full_name)
    .bind(&member.email)
    .bind(&member.phone)
    .bind(&member.date_of_birth)
    .bind(&member.street)
    .bind(&member.city)
    .bind(&member.postal_code)
    .bind(&member.tier)
    .bind(&member.status)
    .bind(&member.verification_token)
    .bind(member.created_at)
    .bind(member.verified_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Member>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM members WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Member>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM members WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_code(pool: &PgPool, code: &str) -> Result<Option<Member>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM members WHERE member_code = $1")
        .bind(code)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_account(
    pool: &PgPool,
    account_id: &str,
) -> Result<Option<Member>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM members WHERE account_id = $1")
        .bind(account_id)
        .fetch_optional(pool)
        .await
}

/// Atomically redeem a verification token: activate the profile, clear the
/// token and stamp `verified_at` in one conditional UPDATE. Returns the
/// activated member, or `None` when the token matched nothing. Unknown and
/// already-consumed tokens are indistinguishable here on purpose.
pub async fn consume_verification_token(
    pool: &PgPool,
    token: &str,
    now: i64,
) -> Result<Option<Member>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE members
         SET status = 'active', verification_token = NULL, verified_at = $2
         WHERE verification_token = $1 AND status = 'pending_verification'
         RETURNING *",
    )
    .bind(token)
    .bind(now)
    .fetch_optional(pool)
    .await
}

/// Replace the verification token on a still-pending profile, invalidating
/// the previously emailed link. Returns false when the member is no longer
/// pending (raced with a verify or an admin override).
pub async fn rotate_verification_token(
    pool: &PgPool,
    id: &str,
    token: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE members SET verification_token = $1
         WHERE id = $2 AND status = 'pending_verification'",
    )
    .bind(token)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Administrative activation override: same effect as token redemption,
/// keyed by id instead of token.
pub async fn activate(pool: &PgPool, id: &str, now: i64) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE members
         SET status = 'active', verification_token = NULL, verified_at = $2
         WHERE id = $1",
    )
    .bind(id)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn set_status(pool: &PgPool, id: &str, status: &str) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE members SET status = $1 WHERE id = $2")
        .bind(status)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn set_tier(pool: &PgPool, id: &str, tier: &str) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE members SET tier = $1 WHERE id = $2")
        .bind(tier)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Tier change with code reallocation (`REG-`/`VIP-` numbering).
pub async fn set_tier_and_code(
    pool: &PgPool,
    id: &str,
    tier: &str,
    code: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE members SET tier = $1, member_code = $2 WHERE id = $3")
        .bind(tier)
        .bind(code)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Self-service contact edits; absent fields keep their stored value.
pub async fn update_contact(
    pool: &PgPool,
    id: &str,
    phone: Option<&str>,
    street: Option<&str>,
    city: Option<&str>,
    postal_code: Option<&str>,
) -> Result<Option<Member>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE members SET
            phone = COALESCE($2, phone),
            street = COALESCE($3, street),
            city = COALESCE($4, city),
            postal_code = COALESCE($5, postal_code)
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(phone)
    .bind(street)
    .bind(city)
    .bind(postal_code)
    .fetch_optional(pool)
    .await
}

/// Admin listing with an optional substring filter over name, email and code.
pub async fn list(
    pool: &PgPool,
    q: Option<&str>,
    limit: i32,
    offset: i32,
) -> Result<Vec<Member>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT * FROM members
        WHERE ($1::TEXT IS NULL
            OR full_name ILIKE '%' || $1 || '%'
            OR email ILIKE '%' || $1 || '%'
            OR member_code ILIKE '%' || $1 || '%')
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(q)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}
