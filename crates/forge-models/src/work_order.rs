//! Service work orders

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// Work order lifecycle states
pub mod status {
    pub const DRAFT: &str = "DRAFT";
    pub const SCHEDULED: &str = "SCHEDULED";
    pub const IN_PROGRESS: &str = "IN_PROGRESS";
    pub const WAITING_PARTS: &str = "WAITING_PARTS";
    pub const WAITING_APPROVAL: &str = "WAITING_APPROVAL";
    pub const COMPLETED: &str = "COMPLETED";
    pub const INVOICED: &str = "INVOICED";
    pub const CANCELLED: &str = "CANCELLED";

    pub const ALL: &[&str] = &[
        DRAFT,
        SCHEDULED,
        IN_PROGRESS,
        WAITING_PARTS,
        WAITING_APPROVAL,
        COMPLETED,
        INVOICED,
        CANCELLED,
    ];
}

/// Work order priorities
pub mod priority {
    pub const LOW: &str = "LOW";
    pub const NORMAL: &str = "NORMAL";
    pub const HIGH: &str = "HIGH";
    pub const URGENT: &str = "URGENT";
}

/// Service types
pub mod service_type {
    pub const MAINTENANCE: &str = "MAINTENANCE";
    pub const REPAIR: &str = "REPAIR";
    pub const DIAGNOSIS: &str = "DIAGNOSIS";
    pub const INSPECTION: &str = "INSPECTION";
}

/// A service work order (`svc.work_orders`)
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkOrder {
    pub wo_id: i64,
    pub wo_number: String,
    pub equipment_id: i64,
    pub client_id: i64,
    pub service_type: String,
    pub appointment_date: Option<DateTime<Utc>>,
    pub reception_date: Option<DateTime<Utc>>,
    pub actual_start_date: Option<DateTime<Utc>>,
    pub estimated_completion_date: Option<DateTime<Utc>>,
    pub actual_completion_date: Option<DateTime<Utc>>,
    pub delivery_date: Option<DateTime<Utc>>,
    pub customer_complaints: Option<String>,
    pub initial_findings: Option<String>,
    pub technician_notes: Option<String>,
    pub estimated_hours: Option<Decimal>,
    pub actual_hours: Option<Decimal>,
    pub labor_rate: Option<Decimal>,
    pub labor_cost: Option<Decimal>,
    pub parts_cost: Option<Decimal>,
    pub total_cost: Option<Decimal>,
    pub quoted_price: Option<Decimal>,
    pub final_price: Option<Decimal>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub advisor_id: Option<i64>,
    pub technician_id: Option<i64>,
    pub mileage_in: Option<i32>,
    pub mileage_out: Option<i32>,
    pub created_by: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl WorkOrder {
    pub fn is_open(&self) -> bool {
        !matches!(
            self.status.as_deref(),
            Some(status::COMPLETED) | Some(status::INVOICED) | Some(status::CANCELLED)
        )
    }
}

/// A part line on a work order (`svc.wo_items`)
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkOrderItem {
    pub item_id: i64,
    pub wo_id: i64,
    pub internal_sku: Option<String>,
    pub qty_ordered: Decimal,
    pub qty_used: Decimal,
    pub qty_returned: Decimal,
    pub unit_price: Decimal,
    pub discount_percent: Decimal,
    pub tax_percent: Decimal,
    pub reserved_stock_id: Option<i64>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wo(state: &str) -> WorkOrder {
        WorkOrder {
            wo_id: 1,
            wo_number: "WO-000001".into(),
            equipment_id: 42,
            client_id: 7,
            service_type: service_type::REPAIR.into(),
            appointment_date: None,
            reception_date: None,
            actual_start_date: None,
            estimated_completion_date: None,
            actual_completion_date: None,
            delivery_date: None,
            customer_complaints: None,
            initial_findings: None,
            technician_notes: None,
            estimated_hours: None,
            actual_hours: None,
            labor_rate: None,
            labor_cost: None,
            parts_cost: None,
            total_cost: None,
            quoted_price: None,
            final_price: None,
            status: Some(state.into()),
            priority: Some(priority::NORMAL.into()),
            advisor_id: None,
            technician_id: None,
            mileage_in: None,
            mileage_out: None,
            created_by: None,
            created_at: None,
            updated_at: None,
            closed_at: None,
            notes: None,
        }
    }

    #[test]
    fn test_is_open() {
        assert!(wo(status::DRAFT).is_open());
        assert!(wo(status::WAITING_PARTS).is_open());
        assert!(!wo(status::COMPLETED).is_open());
        assert!(!wo(status::CANCELLED).is_open());
    }

    #[test]
    fn test_all_statuses_listed() {
        assert_eq!(status::ALL.len(), 8);
        assert!(status::ALL.contains(&status::WAITING_APPROVAL));
    }
}
