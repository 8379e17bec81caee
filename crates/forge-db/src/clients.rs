//! Client repository

use serde::Deserialize;
use async_trait::async_trait;
use forge_core::types::Id;
use forge_models::client::Client;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::repository::{
    PaginatedResult, Pagination, Repository, RepositoryError, RepositoryResult,
};
use crate::sql;

const COLUMNS: &str = "client_id, uuid, client_code, type, name, legal_name, tax_id, email, \
     phone, mobile, address, city, country, credit_limit, credit_used, payment_days, \
     status, created_at, updated_at, notes";

/// DTO for creating a client
#[derive(Debug, Clone, Deserialize)]
pub struct CreateClientDto {
    pub client_code: String,
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
    pub payment_days: Option<i32>,
    pub notes: Option<String>,
}

/// DTO for updating a client
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateClientDto {
    pub client_type: Option<String>,
    pub name: Option<String>,
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
    pub notes: Option<String>,
}

/// List filters for clients
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientFilter {
    pub status: Option<String>,
    pub client_type: Option<String>,
    pub city: Option<String>,
    /// Free-text match against code, name, tax id and email
    pub search: Option<String>,
    /// Comma-separated sort fields, `-` prefix for descending
    pub ordering: Option<String>,
}

const ORDERABLE: &[&str] = &["client_code", "name", "city", "status", "created_at"];

impl ClientFilter {
    fn where_clause(&self) -> String {
        let mut conditions = Vec::new();
        if let Some(ref status) = self.status {
            conditions.push(sql::eq_string("status", status));
        }
        if let Some(ref client_type) = self.client_type {
            conditions.push(sql::eq_string("type", client_type));
        }
        if let Some(ref city) = self.city {
            conditions.push(sql::eq_string("city", city));
        }
        if let Some(ref term) = self.search {
            conditions.push(sql::any_column_contains(
                &["client_code", "name", "legal_name", "tax_id", "email"],
                term,
            ));
        }
        if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        }
    }
}

/// Client repository implementation
pub struct ClientRepository {
    pool: PgPool,
}

impl ClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_code(&self, client_code: &str) -> RepositoryResult<Option<Client>> {
        let row = sqlx::query_as::<_, Client>(&format!(
            "SELECT {} FROM app.clients WHERE client_code = $1",
            COLUMNS
        ))
        .bind(client_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list(
        &self,
        filter: &ClientFilter,
        pagination: Pagination,
    ) -> RepositoryResult<PaginatedResult<Client>> {
        let where_clause = filter.where_clause();
        let order = sql::order_clause(filter.ordering.as_deref(), ORDERABLE, "name");

        let items = sqlx::query_as::<_, Client>(&format!(
            "SELECT {} FROM app.clients {} ORDER BY {} LIMIT $1 OFFSET $2",
            COLUMNS, where_clause, order
        ))
        .bind(pagination.limit)
        .bind(pagination.offset)
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM app.clients {}",
            where_clause
        ))
        .fetch_one(&self.pool)
        .await?;

        Ok(PaginatedResult::new(items, total, pagination))
    }

    pub async fn is_code_unique(
        &self,
        client_code: &str,
        exclude_id: Option<Id>,
    ) -> RepositoryResult<bool> {
        let unique = match exclude_id {
            Some(id) => {
                sqlx::query_scalar::<_, bool>(
                    "SELECT NOT EXISTS(SELECT 1 FROM app.clients \
                     WHERE client_code = $1 AND client_id != $2)",
                )
                .bind(client_code)
                .bind(id)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_scalar::<_, bool>(
                    "SELECT NOT EXISTS(SELECT 1 FROM app.clients WHERE client_code = $1)",
                )
                .bind(client_code)
                .fetch_one(&self.pool)
                .await?
            }
        };

        Ok(unique)
    }
}

#[async_trait]
impl Repository<Client, CreateClientDto, UpdateClientDto> for ClientRepository {
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<Client>> {
        let row = sqlx::query_as::<_, Client>(&format!(
            "SELECT {} FROM app.clients WHERE client_id = $1",
            COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn count(&self) -> RepositoryResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM app.clients")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn create(&self, dto: CreateClientDto) -> RepositoryResult<Client> {
        let row = sqlx::query_as::<_, Client>(&format!(
            r#"
            INSERT INTO app.clients (
                uuid, client_code, type, name, legal_name, tax_id, email, phone,
                mobile, address, city, country, credit_limit, credit_used,
                payment_days, status, notes, created_at, updated_at
            ) VALUES (
                gen_random_uuid(), $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11,
                $12, 0, $13, 'ACTIVE', $14, NOW(), NOW()
            )
            RETURNING {}
            "#,
            COLUMNS
        ))
        .bind(&dto.client_code)
        .bind(&dto.client_type)
        .bind(&dto.name)
        .bind(&dto.legal_name)
        .bind(&dto.tax_id)
        .bind(&dto.email)
        .bind(&dto.phone)
        .bind(&dto.mobile)
        .bind(&dto.address)
        .bind(&dto.city)
        .bind(&dto.country)
        .bind(dto.credit_limit)
        .bind(dto.payment_days)
        .bind(&dto.notes)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update(&self, id: Id, dto: UpdateClientDto) -> RepositoryResult<Client> {
        let row = sqlx::query_as::<_, Client>(&format!(
            r#"
            UPDATE app.clients SET
                type = COALESCE($1, type),
                name = COALESCE($2, name),
                legal_name = COALESCE($3, legal_name),
                tax_id = COALESCE($4, tax_id),
                email = COALESCE($5, email),
                phone = COALESCE($6, phone),
                mobile = COALESCE($7, mobile),
                address = COALESCE($8, address),
                city = COALESCE($9, city),
                country = COALESCE($10, country),
                credit_limit = COALESCE($11, credit_limit),
                credit_used = COALESCE($12, credit_used),
                payment_days = COALESCE($13, payment_days),
                status = COALESCE($14, status),
                notes = COALESCE($15, notes),
                updated_at = NOW()
            WHERE client_id = $16
            RETURNING {}
            "#,
            COLUMNS
        ))
        .bind(&dto.client_type)
        .bind(&dto.name)
        .bind(&dto.legal_name)
        .bind(&dto.tax_id)
        .bind(&dto.email)
        .bind(&dto.phone)
        .bind(&dto.mobile)
        .bind(&dto.address)
        .bind(&dto.city)
        .bind(&dto.country)
        .bind(dto.credit_limit)
        .bind(dto.credit_used)
        .bind(dto.payment_days)
        .bind(&dto.status)
        .bind(&dto.notes)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepositoryError::NotFound(format!("Client with id {} not found", id)))?;

        Ok(row)
    }

    async fn delete(&self, id: Id) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM app.clients WHERE client_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!(
                "Client with id {} not found",
                id
            )));
        }

        Ok(())
    }

    async fn exists(&self, id: Id) -> RepositoryResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM app.clients WHERE client_id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_combines_conditions() {
        let filter = ClientFilter {
            status: Some("ACTIVE".into()),
            client_type: Some("EMPRESA".into()),
            city: None,
            search: Some("norte".into()),
            ordering: None,
        };
        let clause = filter.where_clause();
        assert!(clause.contains("status = 'ACTIVE'"));
        assert!(clause.contains("type = 'EMPRESA'"));
        assert!(clause.contains("name ILIKE '%norte%'"));
        assert_eq!(clause.matches(" AND ").count(), 2);
    }
}
