//! OEM part catalog: brands, catalog items, equivalences

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// OEM brand categories
pub mod brand_type {
    pub const VEHICLE_MFG: &str = "VEHICLE_MFG";
    pub const EQUIPMENT_MFG: &str = "EQUIPMENT_MFG";
    pub const PARTS_SUPPLIER: &str = "PARTS_SUPPLIER";
    pub const MIXED: &str = "MIXED";
}

/// Catalog item kinds
pub mod item_type {
    pub const VEHICLE_MODEL: &str = "VEHICLE_MODEL";
    pub const EQUIPMENT_MODEL: &str = "EQUIPMENT_MODEL";
    pub const PART: &str = "PART";
}

/// Equivalence strength between an OEM part and an aftermarket SKU
pub mod equivalence_type {
    pub const DIRECT: &str = "DIRECT";
    pub const COMPATIBLE: &str = "COMPATIBLE";
    pub const UPGRADE: &str = "UPGRADE";
    pub const DOWNGRADE: &str = "DOWNGRADE";
}

/// An OEM manufacturer or parts supplier (`oem.brands`)
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OemBrand {
    pub brand_id: i64,
    pub oem_code: String,
    pub name: String,
    pub brand_type: String,
    pub country: Option<String>,
    pub website: Option<String>,
    pub is_active: bool,
    pub display_order: i32,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A catalog entry: vehicle model, equipment model, or part
/// (`oem.catalog_items`), unique on (oem_code, part_number)
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OemCatalogItem {
    pub catalog_id: i64,
    pub oem_code: String,
    pub brand_name: Option<String>,
    pub item_type: String,
    pub part_number: String,
    pub description_es: Option<String>,
    pub description_en: Option<String>,
    pub year_start: Option<i16>,
    pub year_end: Option<i16>,
    pub list_price: Option<Decimal>,
    pub net_price: Option<Decimal>,
    pub currency_code: String,
    pub is_discontinued: bool,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl OemCatalogItem {
    /// Prefer the Spanish description, falling back to English
    pub fn description(&self) -> &str {
        self.description_es
            .as_deref()
            .or(self.description_en.as_deref())
            .unwrap_or("")
    }
}

/// An OEM-to-aftermarket part mapping (`oem.equivalences`),
/// unique on (oem_part_number, oem_code, aftermarket_sku)
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OemEquivalence {
    pub equivalence_id: i64,
    pub oem_part_number: String,
    pub oem_code: String,
    pub brand_name: Option<String>,
    pub aftermarket_sku: Option<String>,
    pub equivalence_type: Option<String>,
    pub confidence_score: Option<i32>,
    pub notes: Option<String>,
    pub verified_by: Option<i64>,
    pub verified_date: Option<NaiveDate>,
    pub created_at: Option<DateTime<Utc>>,
}

impl OemEquivalence {
    pub fn is_verified(&self) -> bool {
        self.verified_date.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_fallback() {
        let item = OemCatalogItem {
            catalog_id: 1,
            oem_code: "TOY".into(),
            brand_name: Some("Toyota".into()),
            item_type: item_type::PART.into(),
            part_number: "90915-YZZD2".into(),
            description_es: None,
            description_en: Some("Oil filter".into()),
            year_start: None,
            year_end: None,
            list_price: None,
            net_price: None,
            currency_code: "USD".into(),
            is_discontinued: false,
            is_active: true,
            created_at: None,
            updated_at: None,
        };
        assert_eq!(item.description(), "Oil filter");
    }

    #[test]
    fn test_equivalence_verified() {
        let eq = OemEquivalence {
            equivalence_id: 1,
            oem_part_number: "90915-YZZD2".into(),
            oem_code: "TOY".into(),
            brand_name: None,
            aftermarket_sku: Some("FLT-00017".into()),
            equivalence_type: Some(equivalence_type::DIRECT.into()),
            confidence_score: Some(95),
            notes: None,
            verified_by: None,
            verified_date: None,
            created_at: None,
        };
        assert!(!eq.is_verified());
    }
}
