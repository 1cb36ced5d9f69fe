//! Vendor deal models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Recorded vendor deal (one per till transaction)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct VendorDeal {
    pub id: i64,
    pub vendor: String,
    pub member_id: String,
    pub member_code: String,
    pub total: Decimal,
    /// Staff member who recorded the deal
    pub created_by: String,
    pub created_at: i64,
}

/// Line item on a recorded deal
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DealItem {
    pub id: i64,
    pub deal_id: i64,
    pub label: String,
    pub amount: Decimal,
    pub custom: bool,
}

/// Line item payload when recording a deal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealItemCreate {
    pub label: String,
    pub amount: Decimal,
    /// Free-form item typed at the till instead of picked from the vendor's list
    #[serde(default)]
    pub custom: bool,
}

/// Deal with its line items (detail view)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealWithItems {
    #[serde(flatten)]
    pub deal: VendorDeal,
    pub items: Vec<DealItem>,
}

/// Per-vendor aggregate for the deal dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct VendorSummary {
    pub vendor: String,
    pub deal_count: i64,
    pub revenue: Decimal,
}

/// Sum of line item amounts. The stored total is always computed server-side;
/// totals sent by clients are ignored.
pub fn deal_total(items: &[DealItemCreate]) -> Decimal {
    items.iter().map(|item| item.amount).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(label: &str, cents: i64, custom: bool) -> DealItemCreate {
        DealItemCreate {
            label: label.to_string(),
            amount: Decimal::new(cents, 2),
            custom,
        }
    }

    #[test]
    fn test_deal_total_sums_items() {
        let items = vec![
            item("Track day voucher", 12_50, false),
            item("Club lanyard", 4_99, false),
            item("Custom detailing", 80_00, true),
        ];

        assert_eq!(deal_total(&items), Decimal::new(97_49, 2));
    }

    #[test]
    fn test_deal_total_empty() {
        assert_eq!(deal_total(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_deal_total_exact_cents() {
        // 0.10 + 0.20 must be exactly 0.30 (no float drift)
        let items = vec![item("A", 10, false), item("B", 20, false)];
        assert_eq!(deal_total(&items), Decimal::new(30, 2));
    }

    #[test]
    fn test_deal_item_create_custom_defaults_false() {
        let parsed: DealItemCreate =
            serde_json::from_str(r#"{"label":"Sticker pack","amount":"3.50"}"#).unwrap();
        assert!(!parsed.custom);
        assert_eq!(parsed.amount, Decimal::new(350, 2));
    }
}
