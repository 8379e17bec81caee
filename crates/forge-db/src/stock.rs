//! Stock, warehouse and inventory movement repositories

use forge_core::types::Id;
use forge_models::inventory::{Stock, Transaction, Warehouse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::repository::{
    PaginatedResult, Pagination, RepositoryError, RepositoryResult,
};
use crate::sql;

const STOCK_COLUMNS: &str = "stock_id, warehouse_code, internal_sku, qty_on_hand, qty_reserved, \
     qty_available, qty_on_order, batch_number, expiration_date, unit_cost, status, \
     created_at, updated_at";

const TRANSACTION_COLUMNS: &str = "transaction_id, transaction_date, transaction_type, \
     warehouse_code, internal_sku, quantity, unit_cost, total_cost, reference_type, \
     reference_id, reference_number, notes, created_by";

const WAREHOUSE_COLUMNS: &str = "warehouse_code, name, type, address, manager, capacity, \
     current_occupancy, is_active, created_at";

/// List filters for stock rows
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StockFilter {
    pub warehouse_code: Option<String>,
    pub internal_sku: Option<String>,
    /// Only rows at or below the product's reorder point
    #[serde(default)]
    pub low_stock_only: bool,
}

impl StockFilter {
    fn where_clause(&self) -> String {
        let mut conditions = Vec::new();
        if let Some(ref warehouse) = self.warehouse_code {
            conditions.push(sql::eq_string("s.warehouse_code", warehouse));
        }
        if let Some(ref sku) = self.internal_sku {
            conditions.push(sql::eq_string("s.internal_sku", sku));
        }
        if self.low_stock_only {
            conditions.push(
                "COALESCE(s.qty_available, 0) <= COALESCE(p.reorder_point, 0)".to_string(),
            );
        }
        if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        }
    }
}

/// A stock row joined with its product for low-stock reports
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct StockAlert {
    pub warehouse_code: String,
    pub internal_sku: String,
    pub product_name: String,
    pub qty_available: Option<i32>,
    pub min_stock: Option<i32>,
    pub reorder_point: Option<i32>,
}

/// Stock level repository implementation
pub struct StockRepository {
    pool: PgPool,
}

impl StockRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<Stock>> {
        let row = sqlx::query_as::<_, Stock>(&format!(
            "SELECT {} FROM inv.stock WHERE stock_id = $1",
            STOCK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// All warehouse rows holding one product
    pub async fn list_for_product(&self, sku: &str) -> RepositoryResult<Vec<Stock>> {
        let rows = sqlx::query_as::<_, Stock>(&format!(
            "SELECT {} FROM inv.stock WHERE internal_sku = $1 ORDER BY warehouse_code",
            STOCK_COLUMNS
        ))
        .bind(sku)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn list(
        &self,
        filter: &StockFilter,
        pagination: Pagination,
    ) -> RepositoryResult<PaginatedResult<Stock>> {
        let where_clause = filter.where_clause();

        let items = sqlx::query_as::<_, Stock>(&format!(
            "SELECT {} FROM inv.stock s \
             JOIN inv.product_master p ON p.internal_sku = s.internal_sku \
             {} ORDER BY s.warehouse_code, s.internal_sku LIMIT $1 OFFSET $2",
            sql::prefix_columns(STOCK_COLUMNS, "s"),
            where_clause
        ))
        .bind(pagination.limit)
        .bind(pagination.offset)
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM inv.stock s \
             JOIN inv.product_master p ON p.internal_sku = s.internal_sku {}",
            where_clause
        ))
        .fetch_one(&self.pool)
        .await?;

        Ok(PaginatedResult::new(items, total, pagination))
    }

    /// Products at or below their reorder point, across all warehouses
    pub async fn low_stock_alerts(&self) -> RepositoryResult<Vec<StockAlert>> {
        let rows = sqlx::query_as::<_, StockAlert>(
            "SELECT s.warehouse_code, s.internal_sku, p.name AS product_name, \
                    s.qty_available, p.min_stock, p.reorder_point \
             FROM inv.stock s \
             JOIN inv.product_master p ON p.internal_sku = s.internal_sku \
             WHERE p.is_active = true \
               AND COALESCE(s.qty_available, 0) <= COALESCE(p.reorder_point, 0) \
             ORDER BY s.qty_available NULLS FIRST",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

/// List filters for inventory movements
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionFilter {
    pub warehouse_code: Option<String>,
    pub internal_sku: Option<String>,
    pub transaction_type: Option<String>,
}

impl TransactionFilter {
    fn where_clause(&self) -> String {
        let mut conditions = Vec::new();
        if let Some(ref warehouse) = self.warehouse_code {
            conditions.push(sql::eq_string("warehouse_code", warehouse));
        }
        if let Some(ref sku) = self.internal_sku {
            conditions.push(sql::eq_string("internal_sku", sku));
        }
        if let Some(ref kind) = self.transaction_type {
            conditions.push(sql::eq_string("transaction_type", kind));
        }
        if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        }
    }
}

/// DTO for recording an inventory movement
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTransactionDto {
    pub transaction_type: String,
    pub warehouse_code: String,
    pub internal_sku: String,
    pub quantity: i32,
    pub unit_cost: Option<Decimal>,
    pub reference_type: Option<String>,
    pub reference_id: Option<Id>,
    pub reference_number: Option<String>,
    pub notes: Option<String>,
    pub created_by: Option<Id>,
}

/// Inventory movement repository. The ledger is append-only; movements are
/// created but never updated or deleted.
pub struct TransactionRepository {
    pool: PgPool,
}

impl TransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<Transaction>> {
        let row = sqlx::query_as::<_, Transaction>(&format!(
            "SELECT {} FROM inv.transactions WHERE transaction_id = $1",
            TRANSACTION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list(
        &self,
        filter: &TransactionFilter,
        pagination: Pagination,
    ) -> RepositoryResult<PaginatedResult<Transaction>> {
        let where_clause = filter.where_clause();

        let items = sqlx::query_as::<_, Transaction>(&format!(
            "SELECT {} FROM inv.transactions {} \
             ORDER BY transaction_date DESC, transaction_id DESC LIMIT $1 OFFSET $2",
            TRANSACTION_COLUMNS, where_clause
        ))
        .bind(pagination.limit)
        .bind(pagination.offset)
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM inv.transactions {}",
            where_clause
        ))
        .fetch_one(&self.pool)
        .await?;

        Ok(PaginatedResult::new(items, total, pagination))
    }

    pub async fn create(&self, dto: CreateTransactionDto) -> RepositoryResult<Transaction> {
        let row = sqlx::query_as::<_, Transaction>(&format!(
            r#"
            INSERT INTO inv.transactions (
                transaction_date, transaction_type, warehouse_code, internal_sku,
                quantity, unit_cost, total_cost, reference_type, reference_id,
                reference_number, notes, created_by
            ) VALUES (
                NOW(), $1, $2, $3, $4, $5, $5 * $4, $6, $7, $8, $9, $10
            )
            RETURNING {}
            "#,
            TRANSACTION_COLUMNS
        ))
        .bind(&dto.transaction_type)
        .bind(&dto.warehouse_code)
        .bind(&dto.internal_sku)
        .bind(dto.quantity)
        .bind(dto.unit_cost)
        .bind(&dto.reference_type)
        .bind(dto.reference_id)
        .bind(&dto.reference_number)
        .bind(&dto.notes)
        .bind(dto.created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }
}

/// Warehouse repository implementation
pub struct WarehouseRepository {
    pool: PgPool,
}

impl WarehouseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_code(&self, code: &str) -> RepositoryResult<Option<Warehouse>> {
        let row = sqlx::query_as::<_, Warehouse>(&format!(
            "SELECT {} FROM inv.warehouses WHERE warehouse_code = $1",
            WAREHOUSE_COLUMNS
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_active(&self) -> RepositoryResult<Vec<Warehouse>> {
        let rows = sqlx::query_as::<_, Warehouse>(&format!(
            "SELECT {} FROM inv.warehouses WHERE is_active = true ORDER BY warehouse_code",
            WAREHOUSE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn exists(&self, code: &str) -> RepositoryResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM inv.warehouses WHERE warehouse_code = $1)",
        )
        .bind(code)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Guard used before recording movements against a warehouse
    pub async fn require_active(&self, code: &str) -> RepositoryResult<Warehouse> {
        let warehouse = self.find_by_code(code).await?.ok_or_else(|| {
            RepositoryError::NotFound(format!("Warehouse {} not found", code))
        })?;

        if warehouse.is_active != Some(true) {
            return Err(RepositoryError::Validation(format!(
                "Warehouse {} is inactive",
                code
            )));
        }

        Ok(warehouse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_filter_low_stock_clause() {
        let filter = StockFilter {
            warehouse_code: Some("MAIN".into()),
            internal_sku: None,
            low_stock_only: true,
        };
        let clause = filter.where_clause();
        assert!(clause.contains("s.warehouse_code = 'MAIN'"));
        assert!(clause.contains("p.reorder_point"));
    }

    #[test]
    fn test_transaction_filter_empty() {
        assert_eq!(TransactionFilter::default().where_clause(), "");
    }
}
