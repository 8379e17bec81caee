//! Role and permission model
//!
//! Permissions are coarse role-derived flags surfaced in login responses
//! and enforced by handlers, not a per-object ACL.

use forge_models::UserAccount;
use serde::Serialize;

/// Permission flags derived from account roles
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Permissions {
    pub is_workshop_admin: bool,
    pub can_manage_inventory: bool,
    pub can_manage_clients: bool,
    pub can_view_reports: bool,
}

impl Permissions {
    pub fn for_account(account: &UserAccount) -> Self {
        let admin = account.is_superuser;
        let staff = account.is_staff || admin;
        Self {
            is_workshop_admin: admin,
            can_manage_inventory: staff,
            can_manage_clients: staff,
            can_view_reports: staff || account.technician_id.is_some(),
        }
    }
}

/// The authenticated caller, as resolved from a bearer token
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUser {
    pub user_id: i64,
    pub username: String,
    pub employee_code: Option<String>,
    pub email: Option<String>,
    pub full_name: String,
    pub role: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub technician_id: Option<i64>,
    pub permissions: Permissions,
}

impl CurrentUser {
    pub fn from_account(account: &UserAccount) -> Self {
        Self {
            user_id: account.account_id,
            username: account.username.clone(),
            employee_code: account.technician_id.map(|_| account.username.clone()),
            email: account.email.clone(),
            full_name: account.full_name(),
            role: account.role().to_string(),
            is_staff: account.is_staff,
            is_superuser: account.is_superuser,
            technician_id: account.technician_id,
            permissions: Permissions::for_account(account),
        }
    }

    pub fn can_manage_inventory(&self) -> bool {
        self.permissions.can_manage_inventory
    }

    pub fn can_manage_clients(&self) -> bool {
        self.permissions.can_manage_clients
    }

    pub fn can_view_reports(&self) -> bool {
        self.permissions.can_view_reports
    }

    pub fn is_workshop_admin(&self) -> bool {
        self.permissions.is_workshop_admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(staff: bool, superuser: bool, technician: Option<i64>) -> UserAccount {
        UserAccount {
            account_id: 1,
            username: "TEC001".into(),
            email: None,
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
    fn test_technician_permissions() {
        let perms = Permissions::for_account(&account(false, false, Some(3)));
        assert!(!perms.is_workshop_admin);
        assert!(!perms.can_manage_inventory);
        assert!(perms.can_view_reports);
    }

    #[test]
    fn test_staff_permissions() {
        let perms = Permissions::for_account(&account(true, false, None));
        assert!(!perms.is_workshop_admin);
        assert!(perms.can_manage_inventory);
        assert!(perms.can_manage_clients);
        assert!(perms.can_view_reports);
    }

    #[test]
    fn test_superuser_implies_everything() {
        let perms = Permissions::for_account(&account(false, true, None));
        assert!(perms.is_workshop_admin);
        assert!(perms.can_manage_inventory);
        assert!(perms.can_view_reports);
    }

    #[test]
    fn test_plain_user_sees_nothing() {
        let perms = Permissions::for_account(&account(false, false, None));
        assert!(!perms.can_view_reports);
    }

    #[test]
    fn test_current_user_from_account() {
        let user = CurrentUser::from_account(&account(false, false, Some(3)));
        assert_eq!(user.role, "technician");
        assert_eq!(user.employee_code.as_deref(), Some("TEC001"));
        assert_eq!(user.full_name, "Ana Morales");
    }
}
