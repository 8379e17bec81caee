//! Technician-backed authentication
//!
//! Logins are keyed by employee code. The technician catalog is the source
//! of truth; user accounts are provisioned lazily on first login and kept
//! in sync with the catalog afterwards.

use forge_db::accounts::CreateAccountDto;
use forge_db::{RepositoryError, TechnicianRepository, UserAccountRepository};
use forge_models::{Technician, UserAccount};
use thiserror::Error;
use tracing::{info, warn};

use crate::password::{self, PasswordError};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Password(#[from] PasswordError),
}

/// A user account together with its technician catalog entry
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount {
    pub account: UserAccount,
    pub technician: Technician,
}

/// Authenticates technicians against the catalog, provisioning accounts
/// on first login
pub struct TechnicianAuthBackend {
    technicians: TechnicianRepository,
    accounts: UserAccountRepository,
}

impl TechnicianAuthBackend {
    pub fn new(technicians: TechnicianRepository, accounts: UserAccountRepository) -> Self {
        Self {
            technicians,
            accounts,
        }
    }

    /// Authenticate by employee code and password. Returns `Ok(None)` for
    /// unknown codes, inactive technicians and bad passwords alike, so the
    /// API cannot leak which one failed.
    pub async fn authenticate(
        &self,
        employee_code: &str,
        supplied_password: &str,
    ) -> Result<Option<AuthenticatedAccount>, AuthError> {
        let technician = match self
            .technicians
            .find_active_by_employee_code(employee_code)
            .await?
        {
            Some(technician) => technician,
            None => {
                warn!(employee_code, "login attempt for unknown or inactive technician");
                return Ok(None);
            }
        };

        let (account, created) = self
            .accounts
            .get_or_create(CreateAccountDto {
                username: technician.employee_code.clone(),
                email: technician.email.clone(),
                first_name: technician.first_name.clone(),
                last_name: technician.last_name.clone(),
                technician_id: Some(technician.technician_id),
                password_hash: password::hash_password(&password::default_password(
                    &technician.employee_code,
                ))?,
            })
            .await?;

        if created {
            info!(employee_code, account_id = account.account_id, "account provisioned");
        }

        if !account.is_active {
            return Ok(None);
        }

        if !password::verify_password(supplied_password, &account.password_hash) {
            return Ok(None);
        }

        // Catalog email wins over a stale account email
        if let Some(ref email) = technician.email {
            if account.email.as_deref() != Some(email.as_str()) {
                self.accounts.update_email(account.account_id, email).await?;
            }
        }

        self.accounts.update_last_login(account.account_id).await?;

        let mut account = account;
        account.email = technician.email.clone().or(account.email);

        Ok(Some(AuthenticatedAccount { account, technician }))
    }

    /// Change a password after re-verifying the current one
    pub async fn change_password(
        &self,
        account: &UserAccount,
        old_password: &str,
        new_password: &str,
        min_length: usize,
    ) -> Result<bool, AuthError> {
        if !password::verify_password(old_password, &account.password_hash) {
            return Ok(false);
        }
        password::validate_password(new_password, min_length)?;

        let new_hash = password::hash_password(new_password)?;
        self.accounts
            .update_password(account.account_id, &new_hash)
            .await?;

        Ok(true)
    }
}
