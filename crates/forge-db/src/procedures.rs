//! Thin wrappers around the database-side procedures. Business rules for
//! reservations, status transitions and KPI reports live in PL/pgSQL; these
//! calls relay arguments and surface the returned payloads untouched.

use chrono::NaiveDate;
use forge_core::types::Id;
use serde_json::Value;
use sqlx::PgPool;
use tracing::debug;

use crate::repository::RepositoryResult;

/// Executes stored procedures in the `inv`, `svc` and `kpi` schemas
pub struct ProcedureRunner {
    pool: PgPool,
}

impl ProcedureRunner {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Reserve stock for a work order line. The procedure picks the batch,
    /// bumps `qty_reserved` and returns a JSON result describing the
    /// reservation or the shortage.
    pub async fn reserve_stock_for_wo(
        &self,
        wo_id: Id,
        internal_sku: &str,
        quantity: i32,
        warehouse_code: &str,
    ) -> RepositoryResult<Value> {
        debug!(wo_id, internal_sku, quantity, warehouse_code, "reserving stock");

        let result = sqlx::query_scalar::<_, Value>(
            "SELECT inv.reserve_stock_for_wo($1, $2, $3, $4)",
        )
        .bind(wo_id)
        .bind(internal_sku)
        .bind(quantity)
        .bind(warehouse_code)
        .fetch_one(&self.pool)
        .await?;

        Ok(result)
    }

    /// Release a previously made reservation
    pub async fn release_reserved_stock(
        &self,
        wo_id: Id,
        internal_sku: &str,
        warehouse_code: &str,
    ) -> RepositoryResult<Value> {
        debug!(wo_id, internal_sku, warehouse_code, "releasing reserved stock");

        let result = sqlx::query_scalar::<_, Value>(
            "SELECT inv.release_reserved_stock($1, $2, $3)",
        )
        .bind(wo_id)
        .bind(internal_sku)
        .bind(warehouse_code)
        .fetch_one(&self.pool)
        .await?;

        Ok(result)
    }

    /// Advance a work order along its lifecycle. Transition validation is
    /// enforced in the procedure, which raises on an illegal move.
    pub async fn advance_wo_status(
        &self,
        wo_id: Id,
        new_status: &str,
        changed_by: Option<Id>,
    ) -> RepositoryResult<Value> {
        debug!(wo_id, new_status, "advancing work order status");

        let result = sqlx::query_scalar::<_, Value>(
            "SELECT svc.advance_wo_status($1, $2, $3)",
        )
        .bind(wo_id)
        .bind(new_status)
        .bind(changed_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(result)
    }

    /// ABC classification of inventory by consumption value
    pub async fn abc_inventory_analysis(&self) -> RepositoryResult<Value> {
        let result = sqlx::query_scalar::<_, Value>("SELECT kpi.abc_inventory_analysis()")
            .fetch_one(&self.pool)
            .await?;

        Ok(result)
    }

    /// Productivity report per technician over a date range
    pub async fn technician_productivity_report(
        &self,
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> RepositoryResult<Value> {
        debug!(%date_from, %date_to, "generating technician productivity report");

        let result = sqlx::query_scalar::<_, Value>(
            "SELECT kpi.generate_technician_productivity_report($1, $2)",
        )
        .bind(date_from)
        .bind(date_to)
        .fetch_one(&self.pool)
        .await?;

        Ok(result)
    }
}
