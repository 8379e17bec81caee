//! OEM catalog repositories: brands, catalog items, equivalences

use serde::Deserialize;
use async_trait::async_trait;
use forge_core::types::Id;
use forge_models::oem::{OemBrand, OemCatalogItem, OemEquivalence};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::repository::{
    PaginatedResult, Pagination, Repository, RepositoryError, RepositoryResult,
};
use crate::sql;

const BRAND_COLUMNS: &str = "brand_id, oem_code, name, brand_type, country, website, \
     is_active, display_order, created_at, updated_at";

// brand_name comes from the joined brands table on read paths
const CATALOG_COLUMNS: &str = "c.catalog_id, c.oem_code, b.name AS brand_name, c.item_type, \
     c.part_number, c.description_es, c.description_en, c.year_start, c.year_end, \
     c.list_price, c.net_price, c.currency_code, c.is_discontinued, c.is_active, \
     c.created_at, c.updated_at";

const EQUIVALENCE_COLUMNS: &str = "e.equivalence_id, e.oem_part_number, e.oem_code, \
     b.name AS brand_name, e.aftermarket_sku, e.equivalence_type, e.confidence_score, \
     e.notes, e.verified_by, e.verified_date, e.created_at";

/// DTO for creating a brand
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBrandDto {
    pub oem_code: String,
    pub name: String,
    pub brand_type: String,
    pub country: Option<String>,
    pub website: Option<String>,
    pub display_order: Option<i32>,
}

/// DTO for updating a brand
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBrandDto {
    pub name: Option<String>,
    pub brand_type: Option<String>,
    pub country: Option<String>,
    pub website: Option<String>,
    pub is_active: Option<bool>,
    pub display_order: Option<i32>,
}

/// OEM brand repository implementation
pub struct OemBrandRepository {
    pool: PgPool,
}

impl OemBrandRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_code(&self, oem_code: &str) -> RepositoryResult<Option<OemBrand>> {
        let row = sqlx::query_as::<_, OemBrand>(&format!(
            "SELECT {} FROM oem.brands WHERE oem_code = $1",
            BRAND_COLUMNS
        ))
        .bind(oem_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_active(&self) -> RepositoryResult<Vec<OemBrand>> {
        let rows = sqlx::query_as::<_, OemBrand>(&format!(
            "SELECT {} FROM oem.brands WHERE is_active = true \
             ORDER BY display_order, name",
            BRAND_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn list(
        &self,
        pagination: Pagination,
    ) -> RepositoryResult<PaginatedResult<OemBrand>> {
        let items = sqlx::query_as::<_, OemBrand>(&format!(
            "SELECT {} FROM oem.brands ORDER BY display_order, name LIMIT $1 OFFSET $2",
            BRAND_COLUMNS
        ))
        .bind(pagination.limit)
        .bind(pagination.offset)
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM oem.brands")
            .fetch_one(&self.pool)
            .await?;

        Ok(PaginatedResult::new(items, total, pagination))
    }
}

#[async_trait]
impl Repository<OemBrand, CreateBrandDto, UpdateBrandDto> for OemBrandRepository {
    async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<OemBrand>> {
        let row = sqlx::query_as::<_, OemBrand>(&format!(
            "SELECT {} FROM oem.brands WHERE brand_id = $1",
            BRAND_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn count(&self) -> RepositoryResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM oem.brands")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn create(&self, dto: CreateBrandDto) -> RepositoryResult<OemBrand> {
        let row = sqlx::query_as::<_, OemBrand>(&format!(
            r#"
            INSERT INTO oem.brands (
                oem_code, name, brand_type, country, website, is_active,
                display_order, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, true, COALESCE($6, 0), NOW(), NOW())
            RETURNING {}
            "#,
            BRAND_COLUMNS
        ))
        .bind(&dto.oem_code)
        .bind(&dto.name)
        .bind(&dto.brand_type)
        .bind(&dto.country)
        .bind(&dto.website)
        .bind(dto.display_order)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update(&self, id: Id, dto: UpdateBrandDto) -> RepositoryResult<OemBrand> {
        let row = sqlx::query_as::<_, OemBrand>(&format!(
            r#"
            UPDATE oem.brands SET
                name = COALESCE($1, name),
                brand_type = COALESCE($2, brand_type),
                country = COALESCE($3, country),
                website = COALESCE($4, website),
                is_active = COALESCE($5, is_active),
                display_order = COALESCE($6, display_order),
                updated_at = NOW()
            WHERE brand_id = $7
            RETURNING {}
            "#,
            BRAND_COLUMNS
        ))
        .bind(&dto.name)
        .bind(&dto.brand_type)
        .bind(&dto.country)
        .bind(&dto.website)
        .bind(dto.is_active)
        .bind(dto.display_order)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepositoryError::NotFound(format!("Brand with id {} not found", id)))?;

        Ok(row)
    }

    async fn delete(&self, id: Id) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM oem.brands WHERE brand_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!(
                "Brand with id {} not found",
                id
            )));
        }

        Ok(())
    }

    async fn exists(&self, id: Id) -> RepositoryResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM oem.brands WHERE brand_id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}

/// List filters for catalog items
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogFilter {
    pub oem_code: Option<String>,
    pub item_type: Option<String>,
    /// Free-text match against part number and both descriptions
    pub search: Option<String>,
}

impl CatalogFilter {
    fn where_clause(&self) -> String {
        let mut conditions = Vec::new();
        if let Some(ref code) = self.oem_code {
            conditions.push(sql::eq_string("c.oem_code", code));
        }
        if let Some(ref kind) = self.item_type {
            conditions.push(sql::eq_string("c.item_type", kind));
        }
        if let Some(ref term) = self.search {
            conditions.push(sql::any_column_contains(
                &["c.part_number", "c.description_es", "c.description_en"],
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

/// DTO for creating a catalog item
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCatalogItemDto {
    pub oem_code: String,
    pub item_type: String,
    pub part_number: String,
    pub description_es: Option<String>,
    pub description_en: Option<String>,
    pub year_start: Option<i16>,
    pub year_end: Option<i16>,
    pub list_price: Option<Decimal>,
    pub net_price: Option<Decimal>,
    pub currency_code: Option<String>,
}

/// OEM catalog item repository. Read paths join `oem.brands` so responses
/// carry the brand display name.
pub struct OemCatalogRepository {
    pool: PgPool,
}

impl OemCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<OemCatalogItem>> {
        let row = sqlx::query_as::<_, OemCatalogItem>(&format!(
            "SELECT {} FROM oem.catalog_items c \
             LEFT JOIN oem.brands b ON b.oem_code = c.oem_code \
             WHERE c.catalog_id = $1",
            CATALOG_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list(
        &self,
        filter: &CatalogFilter,
        pagination: Pagination,
    ) -> RepositoryResult<PaginatedResult<OemCatalogItem>> {
        let where_clause = filter.where_clause();

        let items = sqlx::query_as::<_, OemCatalogItem>(&format!(
            "SELECT {} FROM oem.catalog_items c \
             LEFT JOIN oem.brands b ON b.oem_code = c.oem_code \
             {} ORDER BY c.oem_code, c.part_number LIMIT $1 OFFSET $2",
            CATALOG_COLUMNS, where_clause
        ))
        .bind(pagination.limit)
        .bind(pagination.offset)
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM oem.catalog_items c \
             LEFT JOIN oem.brands b ON b.oem_code = c.oem_code {}",
            where_clause
        ))
        .fetch_one(&self.pool)
        .await?;

        Ok(PaginatedResult::new(items, total, pagination))
    }

    pub async fn create(&self, dto: CreateCatalogItemDto) -> RepositoryResult<OemCatalogItem> {
        let duplicate = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM oem.catalog_items \
             WHERE oem_code = $1 AND part_number = $2)",
        )
        .bind(&dto.oem_code)
        .bind(&dto.part_number)
        .fetch_one(&self.pool)
        .await?;

        if duplicate {
            return Err(RepositoryError::Conflict(format!(
                "Catalog item {}/{} already exists",
                dto.oem_code, dto.part_number
            )));
        }

        let id: Id = sqlx::query_scalar(
            r#"
            INSERT INTO oem.catalog_items (
                oem_code, item_type, part_number, description_es, description_en,
                year_start, year_end, list_price, net_price, currency_code,
                is_discontinued, is_active, created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, COALESCE($10, 'USD'),
                false, true, NOW(), NOW()
            )
            RETURNING catalog_id
            "#,
        )
        .bind(&dto.oem_code)
        .bind(&dto.item_type)
        .bind(&dto.part_number)
        .bind(&dto.description_es)
        .bind(&dto.description_en)
        .bind(dto.year_start)
        .bind(dto.year_end)
        .bind(dto.list_price)
        .bind(dto.net_price)
        .bind(&dto.currency_code)
        .fetch_one(&self.pool)
        .await?;

        self.find_by_id(id).await?.ok_or_else(|| {
            RepositoryError::NotFound(format!("Catalog item with id {} not found", id))
        })
    }

    pub async fn delete(&self, id: Id) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM oem.catalog_items WHERE catalog_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!(
                "Catalog item with id {} not found",
                id
            )));
        }

        Ok(())
    }
}

/// List filters for equivalences
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EquivalenceFilter {
    pub oem_code: Option<String>,
    pub aftermarket_sku: Option<String>,
    #[serde(default)]
    pub verified_only: bool,
    /// Free-text match against the OEM part number
    pub search: Option<String>,
}

impl EquivalenceFilter {
    fn where_clause(&self) -> String {
        let mut conditions = Vec::new();
        if let Some(ref code) = self.oem_code {
            conditions.push(sql::eq_string("e.oem_code", code));
        }
        if let Some(ref sku) = self.aftermarket_sku {
            conditions.push(sql::eq_string("e.aftermarket_sku", sku));
        }
        if self.verified_only {
            conditions.push("e.verified_date IS NOT NULL".to_string());
        }
        if let Some(ref term) = self.search {
            conditions.push(sql::ilike_contains("e.oem_part_number", term));
        }
        if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        }
    }
}

/// DTO for creating an equivalence
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEquivalenceDto {
    pub oem_part_number: String,
    pub oem_code: String,
    pub aftermarket_sku: Option<String>,
    pub equivalence_type: Option<String>,
    pub confidence_score: Option<i32>,
    pub notes: Option<String>,
}

/// OEM equivalence repository implementation
pub struct OemEquivalenceRepository {
    pool: PgPool,
}

impl OemEquivalenceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<OemEquivalence>> {
        let row = sqlx::query_as::<_, OemEquivalence>(&format!(
            "SELECT {} FROM oem.equivalences e \
             LEFT JOIN oem.brands b ON b.oem_code = e.oem_code \
             WHERE e.equivalence_id = $1",
            EQUIVALENCE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list(
        &self,
        filter: &EquivalenceFilter,
        pagination: Pagination,
    ) -> RepositoryResult<PaginatedResult<OemEquivalence>> {
        let where_clause = filter.where_clause();

        let items = sqlx::query_as::<_, OemEquivalence>(&format!(
            "SELECT {} FROM oem.equivalences e \
             LEFT JOIN oem.brands b ON b.oem_code = e.oem_code \
             {} ORDER BY e.oem_part_number LIMIT $1 OFFSET $2",
            EQUIVALENCE_COLUMNS, where_clause
        ))
        .bind(pagination.limit)
        .bind(pagination.offset)
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM oem.equivalences e \
             LEFT JOIN oem.brands b ON b.oem_code = e.oem_code {}",
            where_clause
        ))
        .fetch_one(&self.pool)
        .await?;

        Ok(PaginatedResult::new(items, total, pagination))
    }

    /// Equivalences for one OEM part number, most confident first
    pub async fn find_for_part(
        &self,
        oem_code: &str,
        part_number: &str,
    ) -> RepositoryResult<Vec<OemEquivalence>> {
        let rows = sqlx::query_as::<_, OemEquivalence>(&format!(
            "SELECT {} FROM oem.equivalences e \
             LEFT JOIN oem.brands b ON b.oem_code = e.oem_code \
             WHERE e.oem_code = $1 AND e.oem_part_number = $2 \
             ORDER BY e.confidence_score DESC NULLS LAST",
            EQUIVALENCE_COLUMNS
        ))
        .bind(oem_code)
        .bind(part_number)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn create(&self, dto: CreateEquivalenceDto) -> RepositoryResult<OemEquivalence> {
        let id: Id = sqlx::query_scalar(
            r#"
            INSERT INTO oem.equivalences (
                oem_part_number, oem_code, aftermarket_sku, equivalence_type,
                confidence_score, notes, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, NOW())
            RETURNING equivalence_id
            "#,
        )
        .bind(&dto.oem_part_number)
        .bind(&dto.oem_code)
        .bind(&dto.aftermarket_sku)
        .bind(&dto.equivalence_type)
        .bind(dto.confidence_score)
        .bind(&dto.notes)
        .fetch_one(&self.pool)
        .await?;

        self.find_by_id(id).await?.ok_or_else(|| {
            RepositoryError::NotFound(format!("Equivalence with id {} not found", id))
        })
    }

    /// Mark an equivalence as verified by an account
    pub async fn verify(&self, id: Id, verified_by: Id) -> RepositoryResult<OemEquivalence> {
        let result = sqlx::query(
            "UPDATE oem.equivalences SET verified_by = $1, verified_date = CURRENT_DATE \
             WHERE equivalence_id = $2",
        )
        .bind(verified_by)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!(
                "Equivalence with id {} not found",
                id
            )));
        }

        self.find_by_id(id).await?.ok_or_else(|| {
            RepositoryError::NotFound(format!("Equivalence with id {} not found", id))
        })
    }

    pub async fn delete(&self, id: Id) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM oem.equivalences WHERE equivalence_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!(
                "Equivalence with id {} not found",
                id
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_filter_aliases_columns() {
        let filter = CatalogFilter {
            oem_code: Some("TOY".into()),
            item_type: None,
            search: Some("filtro".into()),
        };
        let clause = filter.where_clause();
        assert!(clause.contains("c.oem_code = 'TOY'"));
        assert!(clause.contains("c.description_es ILIKE '%filtro%'"));
    }

    #[test]
    fn test_equivalence_filter_verified_only() {
        let filter = EquivalenceFilter {
            verified_only: true,
            ..Default::default()
        };
        assert_eq!(filter.where_clause(), "WHERE e.verified_date IS NOT NULL");
    }
}
