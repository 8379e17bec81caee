//! Inventory: warehouses, product master, stock levels, movements

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// Inventory transaction types
pub mod transaction_type {
    pub const RECEIPT: &str = "receipt";
    pub const ISSUE: &str = "issue";
    pub const TRANSFER: &str = "transfer";
    pub const ADJUSTMENT: &str = "adjustment";
    pub const RETURN: &str = "return";
    pub const SCRAP: &str = "scrap";
}

/// An inventory warehouse (`inv.warehouses`)
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Warehouse {
    pub warehouse_code: String,
    pub name: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub warehouse_type: Option<String>,
    pub address: Option<String>,
    pub manager: Option<String>,
    pub capacity: Option<i32>,
    pub current_occupancy: Option<i32>,
    pub is_active: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
}

/// A master catalog product (`inv.product_master`), keyed by internal SKU
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProductMaster {
    pub internal_sku: String,
    pub group_code: String,
    pub name: String,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub oem_ref: Option<String>,
    pub oem_code: Option<String>,
    pub source_code: String,
    pub condition_code: String,
    pub uom_code: String,
    pub barcode: Option<String>,
    pub supplier_mpn: Option<String>,
    pub min_stock: Option<i32>,
    pub max_stock: Option<i32>,
    pub reorder_point: Option<i32>,
    pub lead_time_days: Option<i32>,
    pub warranty_days: Option<i32>,
    pub standard_cost: Option<Decimal>,
    pub avg_cost: Option<Decimal>,
    pub is_active: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// A per-warehouse stock row (`inv.stock`), unique on (warehouse, product)
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Stock {
    pub stock_id: i64,
    pub warehouse_code: String,
    pub internal_sku: String,
    pub qty_on_hand: i32,
    pub qty_reserved: i32,
    pub qty_available: Option<i32>,
    pub qty_on_order: Option<i32>,
    pub batch_number: Option<String>,
    pub expiration_date: Option<NaiveDate>,
    pub unit_cost: Option<Decimal>,
    pub status: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Stock {
    pub fn is_below_minimum(&self, min_stock: i32) -> bool {
        self.qty_available.unwrap_or(0) < min_stock
    }

    pub fn needs_reorder(&self, reorder_point: i32) -> bool {
        self.qty_available.unwrap_or(0) <= reorder_point
    }
}

/// An inventory movement (`inv.transactions`), append-only
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Transaction {
    pub transaction_id: i64,
    pub transaction_date: DateTime<Utc>,
    pub transaction_type: String,
    pub warehouse_code: String,
    pub internal_sku: String,
    pub quantity: i32,
    pub unit_cost: Option<Decimal>,
    pub total_cost: Option<Decimal>,
    pub reference_type: Option<String>,
    pub reference_id: Option<i64>,
    pub reference_number: Option<String>,
    pub notes: Option<String>,
    pub created_by: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stock(available: i32) -> Stock {
        Stock {
            stock_id: 1,
            warehouse_code: "MAIN".into(),
            internal_sku: "FLT-00017".into(),
            qty_on_hand: available + 2,
            qty_reserved: 2,
            qty_available: Some(available),
            qty_on_order: None,
            batch_number: None,
            expiration_date: None,
            unit_cost: None,
            status: Some("AVAILABLE".into()),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_below_minimum() {
        assert!(stock(3).is_below_minimum(5));
        assert!(!stock(5).is_below_minimum(5));
    }

    #[test]
    fn test_needs_reorder_is_inclusive() {
        assert!(stock(5).needs_reorder(5));
        assert!(!stock(6).needs_reorder(5));
    }
}
