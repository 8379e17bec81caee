//! Work order repository

use serde::Deserialize;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use forge_core::types::Id;
use forge_models::work_order::{status, WorkOrder, WorkOrderItem};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::repository::{
    PaginatedResult, Pagination, Repository, RepositoryError, RepositoryResult,
};
use crate::sql;

const COLUMNS: &str = "wo_id, wo_number, equipment_id, client_id, service_type, \
     appointment_date, reception_date, actual_start_date, estimated_completion_date, \
     actual_completion_date, delivery_date, customer_complaints, initial_findings, \
     technician_notes, estimated_hours, actual_hours, labor_rate, labor_cost, parts_cost, \
     total_cost, quoted_price, final_price, status, priority, advisor_id, technician_id, \
     mileage_in, mileage_out, created_by, created_at, updated_at, closed_at, notes";

const ITEM_COLUMNS: &str = "item_id, wo_id, internal_sku, qty_ordered, qty_used, \
     qty_returned, unit_price, discount_percent, tax_percent, reserved_stock_id, status, \
     notes, created_at";

/// DTO for opening a work order
#[derive(Debug, Clone, Deserialize)]
pub struct CreateWorkOrderDto {
    pub equipment_id: Id,
    pub client_id: Id,
    pub service_type: String,
    pub appointment_date: Option<DateTime<Utc>>,
    pub customer_complaints: Option<String>,
    pub estimated_hours: Option<Decimal>,
    pub labor_rate: Option<Decimal>,
    pub quoted_price: Option<Decimal>,
    pub priority: Option<String>,
    pub advisor_id: Option<Id>,
    pub technician_id: Option<Id>,
    pub mileage_in: Option<i32>,
    pub created_by: Option<Id>,
    pub notes: Option<String>,
}

/// DTO for updating a work order
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateWorkOrderDto {
    pub service_type: Option<String>,
    pub appointment_date: Option<DateTime<Utc>>,
    pub estimated_completion_date: Option<DateTime<Utc>>,
    pub customer_complaints: Option<String>,
    pub initial_findings: Option<String>,
    pub technician_notes: Option<String>,
    pub estimated_hours: Option<Decimal>,
    pub actual_hours: Option<Decimal>,
    pub labor_rate: Option<Decimal>,
    pub quoted_price: Option<Decimal>,
    pub final_price: Option<Decimal>,
    pub priority: Option<String>,
    pub advisor_id: Option<Id>,
    pub technician_id: Option<Id>,
    pub mileage_out: Option<i32>,
    pub notes: Option<String>,
}

/// List filters for work orders
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkOrderFilter {
    pub status: Option<String>,
    pub client_id: Option<Id>,
    pub equipment_id: Option<Id>,
    pub technician_id: Option<Id>,
    pub priority: Option<String>,
    /// Free-text match against the WO number
    pub search: Option<String>,
    /// Comma-separated sort fields, `-` prefix for descending
    pub ordering: Option<String>,
}

const ORDERABLE: &[&str] = &[
    "wo_id",
    "wo_number",
    "status",
    "priority",
    "reception_date",
    "appointment_date",
];

impl WorkOrderFilter {
    fn where_clause(&self) -> String {
        let mut conditions = Vec::new();
        if let Some(ref status) = self.status {
            conditions.push(sql::eq_string("status", status));
        }
        if let Some(client_id) = self.client_id {
            conditions.push(format!("client_id = {}", client_id));
        }
        if let Some(equipment_id) = self.equipment_id {
            conditions.push(format!("equipment_id = {}", equipment_id));
        }
        if let Some(technician_id) = self.technician_id {
            conditions.push(format!("technician_id = {}", technician_id));
        }
        if let Some(ref priority) = self.priority {
            conditions.push(sql::eq_string("priority", priority));
        }
        if let Some(ref term) = self.search {
            conditions.push(sql::ilike_contains("wo_number", term));
        }
        if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        }
    }
}

/// The id and the WO number both come from one sequence draw, so concurrent
/// creates can never claim the same number.
fn insert_statement() -> String {
    format!(
        r#"
        INSERT INTO svc.work_orders (
            wo_id, wo_number, equipment_id, client_id, service_type,
            appointment_date, reception_date, customer_complaints, estimated_hours,
            labor_rate, quoted_price, status, priority, advisor_id, technician_id,
            mileage_in, created_by, notes, created_at, updated_at
        )
        SELECT
            seq.next_id, 'WO-' || LPAD(seq.next_id::text, 6, '0'),
            $1, $2, $3, $4, NOW(), $5, $6, $7, $8, 'DRAFT',
            COALESCE($9, 'NORMAL'), $10, $11, $12, $13, $14, NOW(), NOW()
        FROM (
            SELECT nextval(pg_get_serial_sequence('svc.work_orders', 'wo_id')) AS next_id
        ) seq
        RETURNING {}
        "#,
        COLUMNS
    )
}

/// Work order repository implementation
pub struct WorkOrderRepository {
    pool: PgPool,
}

impl WorkOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_number(&self, wo_number: &str) -> RepositoryResult<Option<WorkOrder>> {
        let row = sqlx::query_as::<_, WorkOrder>(&format!(
            "SELECT {} FROM svc.work_orders WHERE wo_number = $1",
            COLUMNS
        ))
        .bind(wo_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list(
        &self,
        filter: &WorkOrderFilter,
        pagination: Pagination,
    ) -> RepositoryResult<PaginatedResult<WorkOrder>> {
        let where_clause = filter.where_clause();
        let order = sql::order_clause(filter.ordering.as_deref(), ORDERABLE, "wo_id DESC");

        let items = sqlx::query_as::<_, WorkOrder>(&format!(
            "SELECT {} FROM svc.work_orders {} ORDER BY {} LIMIT $1 OFFSET $2",
            COLUMNS, where_clause, order
        ))
        .bind(pagination.limit)
        .bind(pagination.offset)
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM svc.work_orders {}",
            where_clause
        ))
        .fetch_one(&self.pool)
        .await?;

        Ok(PaginatedResult::new(items, total, pagination))
    }

    /// Part lines for a work order
    pub async fn list_items(&self, wo_id: Id) -> RepositoryResult<Vec<WorkOrderItem>> {
        let rows = sqlx::query_as::<_, WorkOrderItem>(&format!(
            "SELECT {} FROM svc.wo_items WHERE wo_id = $1 ORDER BY item_id",
            ITEM_COLUMNS
        ))
        .bind(wo_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Counts per status, used by the dashboard summary
    pub async fn count_by_status(&self) -> RepositoryResult<Vec<(String, i64)>> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            "SELECT status, COUNT(*) FROM svc.work_orders \
             WHERE status IS NOT NULL GROUP BY status ORDER BY status",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

#[async_trait]
impl Repository<WorkOrder, CreateWorkOrderDto, UpdateWorkOrderDto> for WorkOrderRepository {
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<WorkOrder>> {
        let row = sqlx::query_as::<_, WorkOrder>(&format!(
            "SELECT {} FROM svc.work_orders WHERE wo_id = $1",
            COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn count(&self) -> RepositoryResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM svc.work_orders")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn create(&self, dto: CreateWorkOrderDto) -> RepositoryResult<WorkOrder> {
        let row = sqlx::query_as::<_, WorkOrder>(&insert_statement())
        .bind(dto.equipment_id)
        .bind(dto.client_id)
        .bind(&dto.service_type)
        .bind(dto.appointment_date)
        .bind(&dto.customer_complaints)
        .bind(dto.estimated_hours)
        .bind(dto.labor_rate)
        .bind(dto.quoted_price)
        .bind(&dto.priority)
        .bind(dto.advisor_id)
        .bind(dto.technician_id)
        .bind(dto.mileage_in)
        .bind(dto.created_by)
        .bind(&dto.notes)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update(&self, id: Id, dto: UpdateWorkOrderDto) -> RepositoryResult<WorkOrder> {
        let row = sqlx::query_as::<_, WorkOrder>(&format!(
            r#"
            UPDATE svc.work_orders SET
                service_type = COALESCE($1, service_type),
                appointment_date = COALESCE($2, appointment_date),
                estimated_completion_date = COALESCE($3, estimated_completion_date),
                customer_complaints = COALESCE($4, customer_complaints),
                initial_findings = COALESCE($5, initial_findings),
                technician_notes = COALESCE($6, technician_notes),
                estimated_hours = COALESCE($7, estimated_hours),
                actual_hours = COALESCE($8, actual_hours),
                labor_rate = COALESCE($9, labor_rate),
                quoted_price = COALESCE($10, quoted_price),
                final_price = COALESCE($11, final_price),
                priority = COALESCE($12, priority),
                advisor_id = COALESCE($13, advisor_id),
                technician_id = COALESCE($14, technician_id),
                mileage_out = COALESCE($15, mileage_out),
                notes = COALESCE($16, notes),
                updated_at = NOW()
            WHERE wo_id = $17
            RETURNING {}
            "#,
            COLUMNS
        ))
        .bind(&dto.service_type)
        .bind(dto.appointment_date)
        .bind(dto.estimated_completion_date)
        .bind(&dto.customer_complaints)
        .bind(&dto.initial_findings)
        .bind(&dto.technician_notes)
        .bind(dto.estimated_hours)
        .bind(dto.actual_hours)
        .bind(dto.labor_rate)
        .bind(dto.quoted_price)
        .bind(dto.final_price)
        .bind(&dto.priority)
        .bind(dto.advisor_id)
        .bind(dto.technician_id)
        .bind(dto.mileage_out)
        .bind(&dto.notes)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            RepositoryError::NotFound(format!("Work order with id {} not found", id))
        })?;

        Ok(row)
    }

    async fn delete(&self, id: Id) -> RepositoryResult<()> {
        // Only drafts may be removed; anything further along is cancelled
        // through the status procedure instead.
        let current = self.find_by_id(id).await?.ok_or_else(|| {
            RepositoryError::NotFound(format!("Work order with id {} not found", id))
        })?;

        if current.status.as_deref() != Some(status::DRAFT) {
            return Err(RepositoryError::Validation(format!(
                "Work order {} is not a draft and cannot be deleted",
                current.wo_number
            )));
        }

        sqlx::query("DELETE FROM svc.work_orders WHERE wo_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn exists(&self, id: Id) -> RepositoryResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM svc.work_orders WHERE wo_id = $1)",
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
    fn test_insert_draws_number_and_id_from_one_sequence_value() {
        let stmt = insert_statement();
        assert!(stmt.contains("pg_get_serial_sequence('svc.work_orders', 'wo_id')"));
        assert_eq!(stmt.matches("seq.next_id").count(), 2);
        assert!(!stmt.contains("MAX(wo_id)"));
    }

    #[test]
    fn test_filter_renders_numeric_ids_unquoted() {
        let filter = WorkOrderFilter {
            status: Some("IN_PROGRESS".into()),
            client_id: Some(7),
            ..Default::default()
        };
        let clause = filter.where_clause();
        assert!(clause.contains("status = 'IN_PROGRESS'"));
        assert!(clause.contains("client_id = 7"));
    }
}
