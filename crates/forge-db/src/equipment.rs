//! Equipment repository

use serde::Deserialize;
use async_trait::async_trait;
use chrono::NaiveDate;
use forge_core::types::Id;
use forge_models::equipment::Equipment;
use sqlx::PgPool;

use crate::repository::{
    PaginatedResult, Pagination, Repository, RepositoryError, RepositoryResult,
};
use crate::sql;

const COLUMNS: &str = "equipment_id, uuid, equipment_code, brand, model, year, serial_number, \
     vin, license_plate, color, engine_desc, client_id, purchase_date, last_service_date, \
     next_service_date, total_service_cost, current_mileage_hours, status, created_at, \
     updated_at, notes";

/// DTO for registering equipment
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEquipmentDto {
    pub equipment_code: String,
    pub brand: String,
    pub model: String,
    pub year: Option<i16>,
    pub serial_number: Option<String>,
    pub vin: Option<String>,
    pub license_plate: Option<String>,
    pub color: Option<String>,
    pub engine_desc: Option<String>,
    pub client_id: Option<Id>,
    pub purchase_date: Option<NaiveDate>,
    pub current_mileage_hours: Option<i32>,
    pub notes: Option<String>,
}

/// DTO for updating equipment
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEquipmentDto {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i16>,
    pub serial_number: Option<String>,
    pub vin: Option<String>,
    pub license_plate: Option<String>,
    pub color: Option<String>,
    pub engine_desc: Option<String>,
    pub client_id: Option<Id>,
    pub last_service_date: Option<NaiveDate>,
    pub next_service_date: Option<NaiveDate>,
    pub current_mileage_hours: Option<i32>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

/// List filters for equipment
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EquipmentFilter {
    pub client_id: Option<Id>,
    pub status: Option<String>,
    pub brand: Option<String>,
    /// Free-text match against code, brand, model, VIN and plate
    pub search: Option<String>,
    /// Comma-separated sort fields, `-` prefix for descending
    pub ordering: Option<String>,
}

const ORDERABLE: &[&str] = &["equipment_code", "brand", "model", "year", "status", "created_at"];

impl EquipmentFilter {
    fn where_clause(&self) -> String {
        let mut conditions = Vec::new();
        if let Some(client_id) = self.client_id {
            conditions.push(format!("client_id = {}", client_id));
        }
        if let Some(ref status) = self.status {
            conditions.push(sql::eq_string("status", status));
        }
        if let Some(ref brand) = self.brand {
            conditions.push(sql::eq_string("brand", brand));
        }
        if let Some(ref term) = self.search {
            conditions.push(sql::any_column_contains(
                &["equipment_code", "brand", "model", "vin", "license_plate"],
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

/// Equipment repository implementation
pub struct EquipmentRepository {
    pool: PgPool,
}

impl EquipmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_code(&self, equipment_code: &str) -> RepositoryResult<Option<Equipment>> {
        let row = sqlx::query_as::<_, Equipment>(&format!(
            "SELECT {} FROM app.equipment WHERE equipment_code = $1",
            COLUMNS
        ))
        .bind(equipment_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list(
        &self,
        filter: &EquipmentFilter,
        pagination: Pagination,
    ) -> RepositoryResult<PaginatedResult<Equipment>> {
        let where_clause = filter.where_clause();
        let order = sql::order_clause(filter.ordering.as_deref(), ORDERABLE, "equipment_code");

        let items = sqlx::query_as::<_, Equipment>(&format!(
            "SELECT {} FROM app.equipment {} ORDER BY {} LIMIT $1 OFFSET $2",
            COLUMNS, where_clause, order
        ))
        .bind(pagination.limit)
        .bind(pagination.offset)
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM app.equipment {}",
            where_clause
        ))
        .fetch_one(&self.pool)
        .await?;

        Ok(PaginatedResult::new(items, total, pagination))
    }

    /// All equipment belonging to one client, unpaginated
    pub async fn list_for_client(&self, client_id: Id) -> RepositoryResult<Vec<Equipment>> {
        let rows = sqlx::query_as::<_, Equipment>(&format!(
            "SELECT {} FROM app.equipment WHERE client_id = $1 ORDER BY equipment_code",
            COLUMNS
        ))
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

#[async_trait]
impl Repository<Equipment, CreateEquipmentDto, UpdateEquipmentDto> for EquipmentRepository {
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<Equipment>> {
        let row = sqlx::query_as::<_, Equipment>(&format!(
            "SELECT {} FROM app.equipment WHERE equipment_id = $1",
            COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn count(&self) -> RepositoryResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM app.equipment")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn create(&self, dto: CreateEquipmentDto) -> RepositoryResult<Equipment> {
        let row = sqlx::query_as::<_, Equipment>(&format!(
            r#"
            INSERT INTO app.equipment (
                uuid, equipment_code, brand, model, year, serial_number, vin,
                license_plate, color, engine_desc, client_id, purchase_date,
                current_mileage_hours, status, notes, created_at, updated_at
            ) VALUES (
                gen_random_uuid(), $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11,
                $12, 'ACTIVO', $13, NOW(), NOW()
            )
            RETURNING {}
            "#,
            COLUMNS
        ))
        .bind(&dto.equipment_code)
        .bind(&dto.brand)
        .bind(&dto.model)
        .bind(dto.year)
        .bind(&dto.serial_number)
        .bind(&dto.vin)
        .bind(&dto.license_plate)
        .bind(&dto.color)
        .bind(&dto.engine_desc)
        .bind(dto.client_id)
        .bind(dto.purchase_date)
        .bind(dto.current_mileage_hours)
        .bind(&dto.notes)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update(&self, id: Id, dto: UpdateEquipmentDto) -> RepositoryResult<Equipment> {
        let row = sqlx::query_as::<_, Equipment>(&format!(
            r#"
            UPDATE app.equipment SET
                brand = COALESCE($1, brand),
                model = COALESCE($2, model),
                year = COALESCE($3, year),
                serial_number = COALESCE($4, serial_number),
                vin = COALESCE($5, vin),
                license_plate = COALESCE($6, license_plate),
                color = COALESCE($7, color),
                engine_desc = COALESCE($8, engine_desc),
                client_id = COALESCE($9, client_id),
                last_service_date = COALESCE($10, last_service_date),
                next_service_date = COALESCE($11, next_service_date),
                current_mileage_hours = COALESCE($12, current_mileage_hours),
                status = COALESCE($13, status),
                notes = COALESCE($14, notes),
                updated_at = NOW()
            WHERE equipment_id = $15
            RETURNING {}
            "#,
            COLUMNS
        ))
        .bind(&dto.brand)
        .bind(&dto.model)
        .bind(dto.year)
        .bind(&dto.serial_number)
        .bind(&dto.vin)
        .bind(&dto.license_plate)
        .bind(&dto.color)
        .bind(&dto.engine_desc)
        .bind(dto.client_id)
        .bind(dto.last_service_date)
        .bind(dto.next_service_date)
        .bind(dto.current_mileage_hours)
        .bind(&dto.status)
        .bind(&dto.notes)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepositoryError::NotFound(format!("Equipment with id {} not found", id)))?;

        Ok(row)
    }

    async fn delete(&self, id: Id) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM app.equipment WHERE equipment_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!(
                "Equipment with id {} not found",
                id
            )));
        }

        Ok(())
    }

    async fn exists(&self, id: Id) -> RepositoryResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM app.equipment WHERE equipment_id = $1)",
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
    fn test_filter_client_and_search() {
        let filter = EquipmentFilter {
            client_id: Some(7),
            status: None,
            brand: None,
            search: Some("volvo".into()),
            ordering: None,
        };
        let clause = filter.where_clause();
        assert!(clause.contains("client_id = 7"));
        assert!(clause.contains("brand ILIKE '%volvo%'"));
    }
}
