//! Client vehicles and equipment

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Equipment status values. The active/inactive pair is stored in Spanish
/// in the legacy schema.
pub mod status {
    pub const ACTIVE: &str = "ACTIVO";
    pub const INACTIVE: &str = "INACTIVO";
    pub const SOLD: &str = "sold";
    pub const SCRAPPED: &str = "scrapped";
}

/// A client vehicle or machine (`app.equipment`)
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Equipment {
    pub equipment_id: i64,
    pub uuid: Uuid,
    pub equipment_code: String,
    pub brand: String,
    pub model: String,
    pub year: Option<i16>,
    pub serial_number: Option<String>,
    pub vin: Option<String>,
    pub license_plate: Option<String>,
    pub color: Option<String>,
    pub engine_desc: Option<String>,
    pub client_id: Option<i64>,
    pub purchase_date: Option<NaiveDate>,
    pub last_service_date: Option<NaiveDate>,
    pub next_service_date: Option<NaiveDate>,
    pub total_service_cost: Option<Decimal>,
    pub current_mileage_hours: Option<i32>,
    pub status: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl Equipment {
    /// Display label: "2019 Volvo FH16 (EQ-0042)"
    pub fn display_label(&self) -> String {
        let year = self
            .year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        format!(
            "{} {} {} ({})",
            year, self.brand, self.model, self.equipment_code
        )
    }

    pub fn is_active(&self) -> bool {
        self.status.as_deref() == Some(status::ACTIVE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_label() {
        let eq = Equipment {
            equipment_id: 42,
            uuid: Uuid::new_v4(),
            equipment_code: "EQ-0042".into(),
            brand: "Volvo".into(),
            model: "FH16".into(),
            year: Some(2019),
            serial_number: None,
            vin: None,
            license_plate: None,
            color: None,
            engine_desc: None,
            client_id: Some(7),
            purchase_date: None,
            last_service_date: None,
            next_service_date: None,
            total_service_cost: None,
            current_mileage_hours: Some(120_000),
            status: Some(status::ACTIVE.into()),
            created_at: None,
            updated_at: None,
            notes: None,
        };
        assert_eq!(eq.display_label(), "2019 Volvo FH16 (EQ-0042)");
        assert!(eq.is_active());
    }
}
