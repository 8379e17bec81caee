//! Login account repository. Accounts back technician authentication and
//! are auto-provisioned on first login.

use forge_core::types::Id;
use forge_models::account::UserAccount;
use sqlx::PgPool;

use crate::repository::{RepositoryError, RepositoryResult};

const COLUMNS: &str = "account_id, username, email, first_name, last_name, technician_id, \
     password_hash, is_active, is_staff, is_superuser, last_login, created_at, updated_at";

/// DTO for provisioning a new account
#[derive(Debug, Clone)]
pub struct CreateAccountDto {
    pub username: String,
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub technician_id: Option<Id>,
    pub password_hash: String,
}

/// Provisioning insert that backs off when another request created the
/// account first; returns no row on a username conflict.
fn provision_statement() -> String {
    format!(
        r#"
        INSERT INTO app.user_accounts (
            username, email, first_name, last_name, technician_id, password_hash,
            is_active, is_staff, is_superuser, created_at, updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, true, false, false, NOW(), NOW())
        ON CONFLICT (username) DO NOTHING
        RETURNING {}
        "#,
        COLUMNS
    )
}

/// User account repository implementation
pub struct UserAccountRepository {
    pool: PgPool,
}

impl UserAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<UserAccount>> {
        let row = sqlx::query_as::<_, UserAccount>(&format!(
            "SELECT {} FROM app.user_accounts WHERE account_id = $1",
            COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn find_by_username(
        &self,
        username: &str,
    ) -> RepositoryResult<Option<UserAccount>> {
        let row = sqlx::query_as::<_, UserAccount>(&format!(
            "SELECT {} FROM app.user_accounts WHERE username = $1",
            COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Fetch the account for a username, provisioning one when missing.
    /// Returns the account and whether it was freshly created. Concurrent
    /// first logins are safe: the insert yields no row when another request
    /// won the username, and the winner's account is fetched instead.
    pub async fn get_or_create(
        &self,
        dto: CreateAccountDto,
    ) -> RepositoryResult<(UserAccount, bool)> {
        if let Some(existing) = self.find_by_username(&dto.username).await? {
            return Ok((existing, false));
        }

        let inserted = sqlx::query_as::<_, UserAccount>(&provision_statement())
            .bind(&dto.username)
            .bind(&dto.email)
            .bind(&dto.first_name)
            .bind(&dto.last_name)
            .bind(dto.technician_id)
            .bind(&dto.password_hash)
            .fetch_optional(&self.pool)
            .await?;

        match inserted {
            Some(account) => Ok((account, true)),
            None => {
                let existing =
                    self.find_by_username(&dto.username).await?.ok_or_else(|| {
                        RepositoryError::NotFound(format!(
                            "Account {} missing after conflicting insert",
                            dto.username
                        ))
                    })?;
                Ok((existing, false))
            }
        }
    }

    pub async fn update_password(&self, id: Id, password_hash: &str) -> RepositoryResult<()> {
        let result = sqlx::query(
            "UPDATE app.user_accounts SET password_hash = $1, updated_at = NOW() \
             WHERE account_id = $2",
        )
        .bind(password_hash)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!(
                "Account with id {} not found",
                id
            )));
        }

        Ok(())
    }

    /// Partial profile update; untouched fields keep their values
    pub async fn update_profile(
        &self,
        id: Id,
        first_name: Option<&str>,
        last_name: Option<&str>,
        email: Option<&str>,
    ) -> RepositoryResult<UserAccount> {
        let row = sqlx::query_as::<_, UserAccount>(&format!(
            r#"
            UPDATE app.user_accounts SET
                first_name = COALESCE($1, first_name),
                last_name = COALESCE($2, last_name),
                email = COALESCE($3, email),
                updated_at = NOW()
            WHERE account_id = $4
            RETURNING {}
            "#,
            COLUMNS
        ))
        .bind(first_name)
        .bind(last_name)
        .bind(email)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            RepositoryError::NotFound(format!("Account with id {} not found", id))
        })?;

        Ok(row)
    }

    /// Sync the account email when the technician catalog entry changed
    pub async fn update_email(&self, id: Id, email: &str) -> RepositoryResult<()> {
        sqlx::query(
            "UPDATE app.user_accounts SET email = $1, updated_at = NOW() WHERE account_id = $2",
        )
        .bind(email)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn update_last_login(&self, id: Id) -> RepositoryResult<()> {
        sqlx::query("UPDATE app.user_accounts SET last_login = NOW() WHERE account_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provisioning_backs_off_on_username_conflict() {
        let stmt = provision_statement();
        assert!(stmt.contains("ON CONFLICT (username) DO NOTHING"));
        assert!(stmt.contains("RETURNING"));
    }
}
