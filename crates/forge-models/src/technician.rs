//! Workshop technicians

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// Technician status values
pub mod status {
    pub const ACTIVE: &str = "ACTIVE";
    pub const INACTIVE: &str = "INACTIVE";
    pub const SUSPENDED: &str = "SUSPENDED";
}

/// A workshop technician (`cat.technicians`)
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Technician {
    pub technician_id: i64,
    pub employee_code: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub specialization: Option<Vec<String>>,
    pub certification_level: Option<String>,
    pub hourly_rate: Option<Decimal>,
    pub efficiency_avg: Option<Decimal>,
    pub quality_score: Option<Decimal>,
    pub jobs_completed: Option<i32>,
    pub status: Option<String>,
    pub is_active: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl Technician {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Active means the status column says so; the legacy `is_active` flag
    /// is kept in sync by the database but is not authoritative.
    pub fn is_active(&self) -> bool {
        self.status.as_deref() == Some(status::ACTIVE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn technician(status: &str) -> Technician {
        Technician {
            technician_id: 1,
            employee_code: "TEC001".into(),
            first_name: "Ana".into(),
            last_name: "Morales".into(),
            email: Some("ana@forge.example".into()),
            phone: None,
            hire_date: None,
            specialization: Some(vec!["engine".into()]),
            certification_level: None,
            hourly_rate: None,
            efficiency_avg: None,
            quality_score: None,
            jobs_completed: Some(12),
            status: Some(status.into()),
            is_active: Some(true),
            created_at: None,
            updated_at: None,
            notes: None,
        }
    }

    #[test]
    fn test_full_name() {
        assert_eq!(technician(status::ACTIVE).full_name(), "Ana Morales");
    }

    #[test]
    fn test_is_active_follows_status() {
        assert!(technician(status::ACTIVE).is_active());
        assert!(!technician(status::SUSPENDED).is_active());
    }
}
