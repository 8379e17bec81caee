//! User accounts backing technician logins

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// A login account (`app.user_accounts`). Accounts are auto-provisioned for
/// technicians on first login; `username` is the technician's employee code.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserAccount {
    pub account_id: i64,
    pub username: String,
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
    /// Linked technician, None for pure staff/admin accounts
    pub technician_id: Option<i64>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserAccount {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Role label used in login responses
    pub fn role(&self) -> &'static str {
        if self.is_superuser {
            "admin"
        } else if self.is_staff {
            "staff"
        } else if self.technician_id.is_some() {
            "technician"
        } else {
            "user"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(staff: bool, superuser: bool, technician: Option<i64>) -> UserAccount {
        UserAccount {
            account_id: 1,
            username: "TEC001".into(),
            email: Some("ana@forge.example".into()),
            first_name: "Ana".into(),
            last_name: "Morales".into(),
            technician_id: technician,
            password_hash: "x".into(),
            is_active: true,
            is_staff: staff,
            is_superuser: superuser,
            last_login: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_role_precedence() {
        assert_eq!(account(true, true, None).role(), "admin");
        assert_eq!(account(true, false, None).role(), "staff");
        assert_eq!(account(false, false, Some(3)).role(), "technician");
        assert_eq!(account(false, false, None).role(), "user");
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let json = serde_json::to_value(account(false, false, Some(3))).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "TEC001");
    }
}
