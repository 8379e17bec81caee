//! Technician repository

use serde::Deserialize;
use async_trait::async_trait;
use forge_core::types::Id;
use forge_models::technician::{status, Technician};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::repository::{
    PaginatedResult, Pagination, Repository, RepositoryError, RepositoryResult,
};
use crate::sql;

const COLUMNS: &str = "technician_id, employee_code, first_name, last_name, email, phone, \
     hire_date, specialization, certification_level, hourly_rate, efficiency_avg, \
     quality_score, jobs_completed, status, is_active, created_at, updated_at, notes";

/// DTO for creating a technician
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTechnicianDto {
    pub employee_code: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub specialization: Option<Vec<String>>,
    pub certification_level: Option<String>,
    pub hourly_rate: Option<Decimal>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

/// DTO for updating a technician
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTechnicianDto {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub specialization: Option<Vec<String>>,
    pub certification_level: Option<String>,
    pub hourly_rate: Option<Decimal>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

/// List filters for technicians
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TechnicianFilter {
    pub status: Option<String>,
    /// Free-text match against employee code and names
    pub search: Option<String>,
    /// Comma-separated sort fields, `-` prefix for descending
    pub ordering: Option<String>,
}

const ORDERABLE: &[&str] = &[
    "employee_code",
    "last_name",
    "first_name",
    "hire_date",
    "efficiency_avg",
    "jobs_completed",
];

impl TechnicianFilter {
    fn where_clause(&self) -> String {
        let mut conditions = Vec::new();
        if let Some(ref status) = self.status {
            conditions.push(sql::eq_string("status", status));
        }
        if let Some(ref term) = self.search {
            conditions.push(sql::any_column_contains(
                &["employee_code", "first_name", "last_name"],
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

/// Technician repository implementation
pub struct TechnicianRepository {
    pool: PgPool,
}

impl TechnicianRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a technician by employee code
    pub async fn find_by_employee_code(
        &self,
        employee_code: &str,
    ) -> RepositoryResult<Option<Technician>> {
        let row = sqlx::query_as::<_, Technician>(&format!(
            "SELECT {} FROM cat.technicians WHERE employee_code = $1",
            COLUMNS
        ))
        .bind(employee_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Find an active technician by employee code. Used by the auth
    /// backend: inactive and suspended technicians must not authenticate.
    pub async fn find_active_by_employee_code(
        &self,
        employee_code: &str,
    ) -> RepositoryResult<Option<Technician>> {
        let row = sqlx::query_as::<_, Technician>(&format!(
            "SELECT {} FROM cat.technicians WHERE employee_code = $1 AND status = $2",
            COLUMNS
        ))
        .bind(employee_code)
        .bind(status::ACTIVE)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// List technicians with filters and pagination
    pub async fn list(
        &self,
        filter: &TechnicianFilter,
        pagination: Pagination,
    ) -> RepositoryResult<PaginatedResult<Technician>> {
        let where_clause = filter.where_clause();
        let order =
            sql::order_clause(filter.ordering.as_deref(), ORDERABLE, "last_name, first_name");

        let items = sqlx::query_as::<_, Technician>(&format!(
            "SELECT {} FROM cat.technicians {} ORDER BY {} LIMIT $1 OFFSET $2",
            COLUMNS, where_clause, order
        ))
        .bind(pagination.limit)
        .bind(pagination.offset)
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM cat.technicians {}",
            where_clause
        ))
        .fetch_one(&self.pool)
        .await?;

        Ok(PaginatedResult::new(items, total, pagination))
    }

    /// Check if an employee code is unused
    pub async fn is_employee_code_unique(
        &self,
        employee_code: &str,
        exclude_id: Option<Id>,
    ) -> RepositoryResult<bool> {
        let unique = match exclude_id {
            Some(id) => {
                sqlx::query_scalar::<_, bool>(
                    "SELECT NOT EXISTS(SELECT 1 FROM cat.technicians \
                     WHERE employee_code = $1 AND technician_id != $2)",
                )
                .bind(employee_code)
                .bind(id)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_scalar::<_, bool>(
                    "SELECT NOT EXISTS(SELECT 1 FROM cat.technicians WHERE employee_code = $1)",
                )
                .bind(employee_code)
                .fetch_one(&self.pool)
                .await?
            }
        };

        Ok(unique)
    }
}

#[async_trait]
impl Repository<Technician, CreateTechnicianDto, UpdateTechnicianDto> for TechnicianRepository {
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<Technician>> {
        let row = sqlx::query_as::<_, Technician>(&format!(
            "SELECT {} FROM cat.technicians WHERE technician_id = $1",
            COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn count(&self) -> RepositoryResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM cat.technicians")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn create(&self, dto: CreateTechnicianDto) -> RepositoryResult<Technician> {
        let row = sqlx::query_as::<_, Technician>(&format!(
            r#"
            INSERT INTO cat.technicians (
                employee_code, first_name, last_name, email, phone,
                specialization, certification_level, hourly_rate, status, notes,
                is_active, created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, COALESCE($9, 'ACTIVE'), $10,
                true, NOW(), NOW()
            )
            RETURNING {}
            "#,
            COLUMNS
        ))
        .bind(&dto.employee_code)
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(&dto.email)
        .bind(&dto.phone)
        .bind(&dto.specialization)
        .bind(&dto.certification_level)
        .bind(dto.hourly_rate)
        .bind(&dto.status)
        .bind(&dto.notes)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update(&self, id: Id, dto: UpdateTechnicianDto) -> RepositoryResult<Technician> {
        let row = sqlx::query_as::<_, Technician>(&format!(
            r#"
            UPDATE cat.technicians SET
                first_name = COALESCE($1, first_name),
                last_name = COALESCE($2, last_name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                specialization = COALESCE($5, specialization),
                certification_level = COALESCE($6, certification_level),
                hourly_rate = COALESCE($7, hourly_rate),
                status = COALESCE($8, status),
                notes = COALESCE($9, notes),
                updated_at = NOW()
            WHERE technician_id = $10
            RETURNING {}
            "#,
            COLUMNS
        ))
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(&dto.email)
        .bind(&dto.phone)
        .bind(&dto.specialization)
        .bind(&dto.certification_level)
        .bind(dto.hourly_rate)
        .bind(&dto.status)
        .bind(&dto.notes)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            RepositoryError::NotFound(format!("Technician with id {} not found", id))
        })?;

        Ok(row)
    }

    async fn delete(&self, id: Id) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM cat.technicians WHERE technician_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!(
                "Technician with id {} not found",
                id
            )));
        }

        Ok(())
    }

    async fn exists(&self, id: Id) -> RepositoryResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM cat.technicians WHERE technician_id = $1)",
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
    fn test_filter_where_clause() {
        let filter = TechnicianFilter {
            status: Some("ACTIVE".into()),
            search: Some("TEC".into()),
            ordering: None,
        };
        let clause = filter.where_clause();
        assert!(clause.starts_with("WHERE "));
        assert!(clause.contains("status = 'ACTIVE'"));
        assert!(clause.contains("employee_code ILIKE '%TEC%'"));
    }

    #[test]
    fn test_empty_filter() {
        assert_eq!(TechnicianFilter::default().where_clause(), "");
    }
}
