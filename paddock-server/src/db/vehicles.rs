use shared::models::Vehicle;
use sqlx::PgPool;

pub async fn create(pool: &PgPool, vehicle: &Vehicle) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO vehicles (id, member_id, make, model, year, plate, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(vehicle.id)
    .bind(&vehicle.member_id)
    .bind(&vehicle.make)
    .bind(&vehicle.model)
    .bind(vehicle.year)
    .bind(&vehicle.plate)
    .bind(vehicle.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn list_for_member(
    pool: &PgPool,
    member_id: &str,
) -> Result<Vec<Vehicle>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM vehicles WHERE member_id = $1 ORDER BY created_at")
        .bind(member_id)
        .fetch_all(pool)
        .await
}

pub async fn count_for_member(pool: &PgPool, member_id: &str) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM vehicles WHERE member_id = $1")
        .bind(member_id)
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}

/// Scoped by owner so a member can only remove their own vehicles.
/// Returns false when no row matched.
pub async fn delete(pool: &PgPool, id: i64, member_id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM vehicles WHERE id = $1 AND member_id = $2")
        .bind(id)
        .bind(member_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
