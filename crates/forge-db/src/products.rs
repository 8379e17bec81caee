//! Product master repository. Products are keyed by internal SKU, so this
//! does not implement the id-keyed [`Repository`](crate::Repository) trait.

use serde::Deserialize;
use forge_models::inventory::ProductMaster;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::repository::{
    PaginatedResult, Pagination, RepositoryError, RepositoryResult,
};
use crate::sql;

const COLUMNS: &str = "internal_sku, group_code, name, description, brand, oem_ref, oem_code, \
     source_code, condition_code, uom_code, barcode, supplier_mpn, min_stock, max_stock, \
     reorder_point, lead_time_days, warranty_days, standard_cost, avg_cost, is_active, \
     created_at, updated_at, notes";

/// DTO for creating a product
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductDto {
    pub internal_sku: String,
    pub group_code: String,
    pub name: String,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub oem_ref: Option<String>,
    pub oem_code: Option<String>,
    pub source_code: String,
    pub condition_code: String,
    pub uom_code: String,
    pub barcode: Option<String>,
    pub supplier_mpn: Option<String>,
    pub min_stock: Option<i32>,
    pub max_stock: Option<i32>,
    pub reorder_point: Option<i32>,
    pub lead_time_days: Option<i32>,
    pub warranty_days: Option<i32>,
    pub standard_cost: Option<Decimal>,
    pub notes: Option<String>,
}

/// DTO for updating a product
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProductDto {
    pub group_code: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub oem_ref: Option<String>,
    pub oem_code: Option<String>,
    pub barcode: Option<String>,
    pub supplier_mpn: Option<String>,
    pub min_stock: Option<i32>,
    pub max_stock: Option<i32>,
    pub reorder_point: Option<i32>,
    pub lead_time_days: Option<i32>,
    pub warranty_days: Option<i32>,
    pub standard_cost: Option<Decimal>,
    pub avg_cost: Option<Decimal>,
    pub is_active: Option<bool>,
    pub notes: Option<String>,
}

/// List filters for products
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
    pub group_code: Option<String>,
    pub brand: Option<String>,
    pub is_active: Option<bool>,
    /// Free-text match against SKU, name, OEM references and barcode
    pub search: Option<String>,
    /// Comma-separated sort fields, `-` prefix for descending
    pub ordering: Option<String>,
}

const ORDERABLE: &[&str] = &["internal_sku", "name", "brand", "group_code", "created_at"];

impl ProductFilter {
    fn where_clause(&self) -> String {
        let mut conditions = Vec::new();
        if let Some(ref group) = self.group_code {
            conditions.push(sql::eq_string("group_code", group));
        }
        if let Some(ref brand) = self.brand {
            conditions.push(sql::eq_string("brand", brand));
        }
        if let Some(active) = self.is_active {
            conditions.push(format!("is_active = {}", active));
        }
        if let Some(ref term) = self.search {
            conditions.push(sql::any_column_contains(
                &["internal_sku", "name", "oem_ref", "oem_code", "barcode"],
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

/// Product master repository implementation
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_sku(&self, sku: &str) -> RepositoryResult<Option<ProductMaster>> {
        let row = sqlx::query_as::<_, ProductMaster>(&format!(
            "SELECT {} FROM inv.product_master WHERE internal_sku = $1",
            COLUMNS
        ))
        .bind(sku)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn exists(&self, sku: &str) -> RepositoryResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM inv.product_master WHERE internal_sku = $1)",
        )
        .bind(sku)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    pub async fn count(&self) -> RepositoryResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM inv.product_master")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    pub async fn list(
        &self,
        filter: &ProductFilter,
        pagination: Pagination,
    ) -> RepositoryResult<PaginatedResult<ProductMaster>> {
        let where_clause = filter.where_clause();
        let order = sql::order_clause(filter.ordering.as_deref(), ORDERABLE, "internal_sku");

        let items = sqlx::query_as::<_, ProductMaster>(&format!(
            "SELECT {} FROM inv.product_master {} ORDER BY {} LIMIT $1 OFFSET $2",
            COLUMNS, where_clause, order
        ))
        .bind(pagination.limit)
        .bind(pagination.offset)
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM inv.product_master {}",
            where_clause
        ))
        .fetch_one(&self.pool)
        .await?;

        Ok(PaginatedResult::new(items, total, pagination))
    }

    pub async fn create(&self, dto: CreateProductDto) -> RepositoryResult<ProductMaster> {
        if self.exists(&dto.internal_sku).await? {
            return Err(RepositoryError::Conflict(format!(
                "Product with SKU {} already exists",
                dto.internal_sku
            )));
        }

        let row = sqlx::query_as::<_, ProductMaster>(&format!(
            r#"
            INSERT INTO inv.product_master (
                internal_sku, group_code, name, description, brand, oem_ref, oem_code,
                source_code, condition_code, uom_code, barcode, supplier_mpn, min_stock,
                max_stock, reorder_point, lead_time_days, warranty_days, standard_cost,
                is_active, notes, created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                $16, $17, $18, true, $19, NOW(), NOW()
            )
            RETURNING {}
            "#,
            COLUMNS
        ))
        .bind(&dto.internal_sku)
        .bind(&dto.group_code)
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(&dto.brand)
        .bind(&dto.oem_ref)
        .bind(&dto.oem_code)
        .bind(&dto.source_code)
        .bind(&dto.condition_code)
        .bind(&dto.uom_code)
        .bind(&dto.barcode)
        .bind(&dto.supplier_mpn)
        .bind(dto.min_stock)
        .bind(dto.max_stock)
        .bind(dto.reorder_point)
        .bind(dto.lead_time_days)
        .bind(dto.warranty_days)
        .bind(dto.standard_cost)
        .bind(&dto.notes)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn update(
        &self,
        sku: &str,
        dto: UpdateProductDto,
    ) -> RepositoryResult<ProductMaster> {
        let row = sqlx::query_as::<_, ProductMaster>(&format!(
            r#"
            UPDATE inv.product_master SET
                group_code = COALESCE($1, group_code),
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                brand = COALESCE($4, brand),
                oem_ref = COALESCE($5, oem_ref),
                oem_code = COALESCE($6, oem_code),
                barcode = COALESCE($7, barcode),
                supplier_mpn = COALESCE($8, supplier_mpn),
                min_stock = COALESCE($9, min_stock),
                max_stock = COALESCE($10, max_stock),
                reorder_point = COALESCE($11, reorder_point),
                lead_time_days = COALESCE($12, lead_time_days),
                warranty_days = COALESCE($13, warranty_days),
                standard_cost = COALESCE($14, standard_cost),
                avg_cost = COALESCE($15, avg_cost),
                is_active = COALESCE($16, is_active),
                notes = COALESCE($17, notes),
                updated_at = NOW()
            WHERE internal_sku = $18
            RETURNING {}
            "#,
            COLUMNS
        ))
        .bind(&dto.group_code)
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(&dto.brand)
        .bind(&dto.oem_ref)
        .bind(&dto.oem_code)
        .bind(&dto.barcode)
        .bind(&dto.supplier_mpn)
        .bind(dto.min_stock)
        .bind(dto.max_stock)
        .bind(dto.reorder_point)
        .bind(dto.lead_time_days)
        .bind(dto.warranty_days)
        .bind(dto.standard_cost)
        .bind(dto.avg_cost)
        .bind(dto.is_active)
        .bind(&dto.notes)
        .bind(sku)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            RepositoryError::NotFound(format!("Product with SKU {} not found", sku))
        })?;

        Ok(row)
    }

    /// Soft-delete: products referenced by stock and transactions are
    /// deactivated instead of removed.
    pub async fn deactivate(&self, sku: &str) -> RepositoryResult<()> {
        let result = sqlx::query(
            "UPDATE inv.product_master SET is_active = false, updated_at = NOW() \
             WHERE internal_sku = $1",
        )
        .bind(sku)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!(
                "Product with SKU {} not found",
                sku
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_active_flag_renders_bare_boolean() {
        let filter = ProductFilter {
            is_active: Some(true),
            ..Default::default()
        };
        assert_eq!(filter.where_clause(), "WHERE is_active = true");
    }
}
