//! Vendor deal queries
//!
//! Deals are immutable once recorded: inserts only, no update path.

use shared::models::{DealItem, VendorDeal, VendorSummary};
use sqlx::PgPool;

/// Insert a deal and its line items in one transaction.
pub async fn create(
    pool: &PgPool,
    deal: &VendorDeal,
    items: &[DealItem],
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO vendor_deals (id, vendor, member_id, member_code, total, created_by, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(deal.id)
    .bind(&deal.vendor)
    .bind(&deal.member_id)
    .bind(&deal.member_code)
    .bind(deal.total)
    .bind(&deal.created_by)
    .bind(deal.created_at)
    .execute(&mut *tx)
    .await?;

    for item in items {
        sqlx::query(
            "INSERT INTO deal_items (id, deal_id, label, amount, custom)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(item.id)
        .bind(item.deal_id)
        .bind(&item.label)
        .bind(item.amount)
        .bind(item.custom)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

pub async fn find(pool: &PgPool, id: i64) -> Result<Option<VendorDeal>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM vendor_deals WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn items_for_deal(pool: &PgPool, deal_id: i64) -> Result<Vec<DealItem>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM deal_items WHERE deal_id = $1 ORDER BY id")
        .bind(deal_id)
        .fetch_all(pool)
        .await
}

/// Newest first, optionally filtered to a single vendor.
pub async fn list(
    pool: &PgPool,
    vendor: Option<&str>,
    limit: i32,
    offset: i32,
) -> Result<Vec<VendorDeal>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT * FROM vendor_deals
        WHERE ($1::TEXT IS NULL OR vendor = $1)
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(vendor)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

/// Per-vendor deal count and revenue, largest revenue first.
pub async fn summary(pool: &PgPool) -> Result<Vec<VendorSummary>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT vendor, COUNT(*) AS deal_count, COALESCE(SUM(total), 0) AS revenue
        FROM vendor_deals
        GROUP BY vendor
        ORDER BY revenue DESC
        "#,
    )
    .fetch_all(pool)
    .await
}
