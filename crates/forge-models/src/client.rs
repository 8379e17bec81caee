//! Workshop clients and customers

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Client status values
pub mod status {
    pub const ACTIVE: &str = "ACTIVE";
    pub const INACTIVE: &str = "INACTIVE";
    pub const BLOCKED: &str = "BLOCKED";
}

/// Client type values
pub mod client_type {
    pub const INDIVIDUAL: &str = "INDIVIDUAL";
    pub const BUSINESS: &str = "EMPRESA";
    pub const GOVERNMENT: &str = "GOVERNMENT";
}

/// A workshop client (`app.clients`)
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Client {
    pub client_id: i64,
    pub uuid: Uuid,
    pub client_code: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub client_type: String,
    pub name: String,
    pub legal_name: Option<String>,
    pub tax_id: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub credit_limit: Option<Decimal>,
    pub credit_used: Option<Decimal>,
    pub payment_days: Option<i32>,
    pub status: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl Client {
    /// Remaining credit, or None when no limit is set
    pub fn available_credit(&self) -> Option<Decimal> {
        self.credit_limit
            .map(|limit| limit - self.credit_used.unwrap_or_default())
    }

    pub fn is_blocked(&self) -> bool {
        self.status.as_deref() == Some(status::BLOCKED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn client(limit: Option<i64>, used: Option<i64>) -> Client {
        Client {
            client_id: 1,
            uuid: Uuid::new_v4(),
            client_code: "CLI001".into(),
            client_type: client_type::BUSINESS.into(),
            name: "Transportes Norte".into(),
            legal_name: None,
            tax_id: None,
            email: None,
            phone: None,
            mobile: None,
            address: None,
            city: None,
            country: None,
            credit_limit: limit.map(Decimal::from),
            credit_used: used.map(Decimal::from),
            payment_days: Some(30),
            status: Some(status::ACTIVE.into()),
            created_at: None,
            updated_at: None,
            notes: None,
        }
    }

    #[test]
    fn test_available_credit() {
        assert_eq!(
            client(Some(1000), Some(350)).available_credit(),
            Some(Decimal::from(650))
        );
        assert_eq!(
            client(Some(1000), None).available_credit(),
            Some(Decimal::from(1000))
        );
        assert_eq!(client(None, Some(350)).available_credit(), None);
    }
}
