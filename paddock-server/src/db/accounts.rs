use sqlx::PgPool;

#[derive(sqlx::FromRow)]
pub struct Account {
    pub id: String,
    pub email: String,
    pub hashed_password: String,
    pub member_code: String,
    pub created_at: i64,
}

pub async fn create(
    pool: &PgPool,
    id: &str,
    email: &str,
    hashed_password: &str,
    member_code: &str,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO accounts (id, email, hashed_password, member_code, created_at)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(id)
    .bind(email)
    .bind(hashed_password)
    .bind(member_code)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM accounts WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

/// Keep the denormalised code tag in step when the member's code is
/// reallocated (registration retry, tier change).
pub async fn set_member_code(pool: &PgPool, id: &str, code: &str) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE accounts SET member_code = $1 WHERE id = $2")
        .bind(code)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
