//! Unified cross-catalog search
//!
//! Runs independent per-category queries over products, the OEM catalog,
//! OEM equivalences and equipment, each capped at the requested limit.
//! There is no cross-category ranking or dedup.

use std::collections::BTreeMap;
use std::time::Duration;

use forge_db::sql;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use thiserror::Error;
use tracing::{debug, info};

use crate::cache::TtlCache;
use crate::highlight::{highlight_first, highlight_match};

pub const MIN_QUERY_LENGTH: usize = 2;
pub const DEFAULT_LIMIT: i64 = 50;
pub const DEFAULT_SUGGESTION_LIMIT: i64 = 5;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Query must be at least {MIN_QUERY_LENGTH} characters")]
    QueryTooShort,
    #[error("Unknown search type: {0}")]
    UnknownSearchType(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Which catalogs a search touches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    All,
    Products,
    Oem,
    Equivalences,
    Equipment,
}

impl SearchType {
    pub fn parse(s: &str) -> Result<Self, SearchError> {
        match s {
            "all" => Ok(Self::All),
            "products" => Ok(Self::Products),
            "oem" => Ok(Self::Oem),
            "equivalences" => Ok(Self::Equivalences),
            "equipment" => Ok(Self::Equipment),
            other => Err(SearchError::UnknownSearchType(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Products => "products",
            Self::Oem => "oem",
            Self::Equivalences => "equivalences",
            Self::Equipment => "equipment",
        }
    }

    fn includes(&self, other: Self) -> bool {
        *self == Self::All || *self == other
    }
}

/// Optional per-category filters
#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    pub brand: Option<String>,
    pub group_code: Option<String>,
    pub source_code: Option<String>,
    pub has_stock: Option<bool>,
    pub oem_code: Option<String>,
    pub item_type: Option<String>,
    pub equivalence_type: Option<String>,
    pub min_confidence: Option<i32>,
    pub year: Option<i16>,
    pub status: Option<String>,
}

impl SearchFilters {
    pub fn is_empty(&self) -> bool {
        self.brand.is_none()
            && self.group_code.is_none()
            && self.source_code.is_none()
            && self.has_stock.is_none()
            && self.oem_code.is_none()
            && self.item_type.is_none()
            && self.equivalence_type.is_none()
            && self.min_confidence.is_none()
            && self.year.is_none()
            && self.status.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StockSummary {
    pub total: i64,
    pub available: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductHit {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub id: String,
    pub sku: String,
    pub name: String,
    pub brand: Option<String>,
    pub oem_ref: Option<String>,
    pub group_code: String,
    pub stock: StockSummary,
    pub price: Option<String>,
    pub url: String,
    pub search_highlight: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OemHit {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub id: i64,
    pub part_number: String,
    pub brand: String,
    pub brand_code: String,
    pub description: String,
    pub item_type: String,
    pub year_start: Option<i16>,
    pub year_end: Option<i16>,
    pub list_price: Option<String>,
    pub url: String,
    pub search_highlight: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EquivalenceHit {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub id: i64,
    pub oem_part_number: String,
    pub oem_brand: String,
    pub aftermarket_sku: Option<String>,
    pub equivalence_type: Option<String>,
    pub confidence_score: Option<i32>,
    pub verified: bool,
    pub url: String,
    pub search_highlight: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientSummary {
    pub id: i64,
    pub name: String,
    pub code: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EquipmentHit {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub id: i64,
    pub code: String,
    pub brand: String,
    pub model: String,
    pub year: Option<i16>,
    pub vin: Option<String>,
    pub license_plate: Option<String>,
    pub status: Option<String>,
    pub client: Option<ClientSummary>,
    pub url: String,
    pub search_highlight: String,
}

/// Per-category result buckets; absent categories were not searched
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchResults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<ProductHit>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oem_items: Option<Vec<OemHit>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equivalences: Option<Vec<EquivalenceHit>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipment: Option<Vec<EquipmentHit>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub search_type: &'static str,
    pub total_count: usize,
    pub results: SearchResults,
}

#[derive(Debug, Clone, Serialize)]
pub struct Suggestion {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SuggestionResponse {
    pub query: String,
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchStatistics {
    pub products_count: i64,
    pub oem_items_count: i64,
    pub equivalences_count: i64,
    pub equipment_count: i64,
    pub categories: BTreeMap<&'static str, &'static str>,
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    internal_sku: String,
    name: String,
    brand: Option<String>,
    oem_ref: Option<String>,
    group_code: String,
    standard_cost: Option<Decimal>,
    total_qty: i64,
    available_qty: i64,
}

#[derive(sqlx::FromRow)]
struct OemRow {
    catalog_id: i64,
    part_number: String,
    brand_name: Option<String>,
    oem_code: String,
    description_es: Option<String>,
    description_en: Option<String>,
    item_type: String,
    year_start: Option<i16>,
    year_end: Option<i16>,
    list_price: Option<Decimal>,
}

#[derive(sqlx::FromRow)]
struct EquivalenceRow {
    equivalence_id: i64,
    oem_part_number: String,
    brand_name: Option<String>,
    aftermarket_sku: Option<String>,
    equivalence_type: Option<String>,
    confidence_score: Option<i32>,
    verified_date: Option<chrono::NaiveDate>,
}

#[derive(sqlx::FromRow)]
struct EquipmentRow {
    equipment_id: i64,
    equipment_code: String,
    brand: String,
    model: String,
    year: Option<i16>,
    vin: Option<String>,
    license_plate: Option<String>,
    status: Option<String>,
    client_id: Option<i64>,
    client_name: Option<String>,
    client_code: Option<String>,
}

#[derive(sqlx::FromRow)]
struct SuggestionRow {
    key: String,
    label: Option<String>,
    url: String,
}

/// Search service over the four catalogs with a TTL response cache
pub struct UnifiedSearchService {
    pool: PgPool,
    cache: TtlCache<SearchResponse>,
    default_limit: i64,
}

impl UnifiedSearchService {
    pub fn new(pool: PgPool, cache_ttl: Duration, default_limit: i64) -> Self {
        Self {
            pool,
            cache: TtlCache::new(cache_ttl),
            default_limit,
        }
    }

    /// Search the selected catalogs. Only unfiltered `all` searches hit the
    /// cache; anything else goes to the database every time.
    pub async fn search(
        &self,
        query: &str,
        search_type: SearchType,
        filters: &SearchFilters,
        limit: Option<i64>,
    ) -> Result<SearchResponse, SearchError> {
        if query.chars().count() < MIN_QUERY_LENGTH {
            return Err(SearchError::QueryTooShort);
        }

        let limit = limit.unwrap_or(self.default_limit);
        let cacheable = filters.is_empty() && search_type == SearchType::All;

        if cacheable {
            if let Some(cached) = self.cache.get(query) {
                debug!(query, "search cache hit");
                return Ok(cached);
            }
        }

        let mut results = SearchResults::default();

        if search_type.includes(SearchType::Products) {
            results.products = Some(self.search_products(query, filters, limit).await?);
        }
        if search_type.includes(SearchType::Oem) {
            results.oem_items = Some(self.search_oem_catalog(query, filters, limit).await?);
        }
        if search_type.includes(SearchType::Equivalences) {
            results.equivalences = Some(self.search_equivalences(query, filters, limit).await?);
        }
        if search_type.includes(SearchType::Equipment) {
            results.equipment = Some(self.search_equipment(query, filters, limit).await?);
        }

        let total_count = results.products.as_ref().map_or(0, Vec::len)
            + results.oem_items.as_ref().map_or(0, Vec::len)
            + results.equivalences.as_ref().map_or(0, Vec::len)
            + results.equipment.as_ref().map_or(0, Vec::len);

        let response = SearchResponse {
            query: query.to_string(),
            search_type: search_type.as_str(),
            total_count,
            results,
        };

        if cacheable {
            self.cache.insert(query.to_string(), response.clone());
        }

        Ok(response)
    }

    async fn search_products(
        &self,
        query: &str,
        filters: &SearchFilters,
        limit: i64,
    ) -> Result<Vec<ProductHit>, SearchError> {
        let mut conditions = vec![
            "p.is_active = true".to_string(),
            sql::any_column_contains(
                &[
                    "p.internal_sku",
                    "p.name",
                    "p.description",
                    "p.brand",
                    "p.oem_ref",
                    "p.barcode",
                    "p.supplier_mpn",
                ],
                query,
            ),
        ];

        if let Some(ref brand) = filters.brand {
            conditions.push(sql::ilike_contains("p.brand", brand));
        }
        if let Some(ref group) = filters.group_code {
            conditions.push(sql::eq_string("p.group_code", group));
        }
        if let Some(ref source) = filters.source_code {
            conditions.push(sql::eq_string("p.source_code", source));
        }
        if filters.has_stock == Some(true) {
            conditions.push("COALESCE(s.total_qty, 0) > 0".to_string());
        }

        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT p.internal_sku, p.name, p.brand, p.oem_ref, p.group_code, p.standard_cost, \
                    COALESCE(s.total_qty, 0) AS total_qty, \
                    COALESCE(s.available_qty, 0) AS available_qty \
             FROM inv.product_master p \
             LEFT JOIN ( \
                 SELECT internal_sku, SUM(qty_on_hand) AS total_qty, \
                        SUM(qty_available) AS available_qty \
                 FROM inv.stock GROUP BY internal_sku \
             ) s ON s.internal_sku = p.internal_sku \
             WHERE {} ORDER BY p.internal_sku LIMIT $1",
            conditions.join(" AND ")
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let highlight_source = if row.name.is_empty() {
                    row.internal_sku.clone()
                } else {
                    row.name.clone()
                };
                ProductHit {
                    kind: "product",
                    id: row.internal_sku.clone(),
                    url: format!("/inventory/products/{}/", row.internal_sku),
                    sku: row.internal_sku,
                    name: row.name,
                    brand: row.brand,
                    oem_ref: row.oem_ref,
                    group_code: row.group_code,
                    stock: StockSummary {
                        total: row.total_qty,
                        available: row.available_qty,
                    },
                    price: row.standard_cost.map(|cost| cost.to_string()),
                    search_highlight: highlight_match(query, &highlight_source),
                }
            })
            .collect())
    }

    async fn search_oem_catalog(
        &self,
        query: &str,
        filters: &SearchFilters,
        limit: i64,
    ) -> Result<Vec<OemHit>, SearchError> {
        let mut conditions = vec![
            "c.is_active = true".to_string(),
            sql::any_column_contains(
                &["c.part_number", "c.description_es", "c.description_en", "b.name"],
                query,
            ),
        ];

        if let Some(ref code) = filters.oem_code {
            conditions.push(sql::eq_string("c.oem_code", code));
        }
        if let Some(ref kind) = filters.item_type {
            conditions.push(sql::eq_string("c.item_type", kind));
        }

        let rows = sqlx::query_as::<_, OemRow>(&format!(
            "SELECT c.catalog_id, c.part_number, b.name AS brand_name, c.oem_code, \
                    c.description_es, c.description_en, c.item_type, c.year_start, \
                    c.year_end, c.list_price \
             FROM oem.catalog_items c \
             LEFT JOIN oem.brands b ON b.oem_code = c.oem_code \
             WHERE {} ORDER BY c.part_number LIMIT $1",
            conditions.join(" AND ")
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| OemHit {
                kind: "oem",
                id: row.catalog_id,
                url: format!("/oem/catalog/{}/", row.catalog_id),
                search_highlight: highlight_match(query, &row.part_number),
                description: row
                    .description_es
                    .or(row.description_en)
                    .unwrap_or_default(),
                part_number: row.part_number,
                brand: row.brand_name.unwrap_or_default(),
                brand_code: row.oem_code,
                item_type: row.item_type,
                year_start: row.year_start,
                year_end: row.year_end,
                list_price: row.list_price.map(|price| price.to_string()),
            })
            .collect())
    }

    async fn search_equivalences(
        &self,
        query: &str,
        filters: &SearchFilters,
        limit: i64,
    ) -> Result<Vec<EquivalenceHit>, SearchError> {
        let mut conditions = vec![sql::any_column_contains(
            &["e.oem_part_number", "e.aftermarket_sku", "b.name", "e.notes"],
            query,
        )];

        if let Some(ref code) = filters.oem_code {
            conditions.push(sql::eq_string("e.oem_code", code));
        }
        if let Some(ref kind) = filters.equivalence_type {
            conditions.push(sql::eq_string("e.equivalence_type", kind));
        }
        if let Some(min) = filters.min_confidence {
            conditions.push(format!("e.confidence_score >= {}", min));
        }

        let rows = sqlx::query_as::<_, EquivalenceRow>(&format!(
            "SELECT e.equivalence_id, e.oem_part_number, b.name AS brand_name, \
                    e.aftermarket_sku, e.equivalence_type, e.confidence_score, \
                    e.verified_date \
             FROM oem.equivalences e \
             LEFT JOIN oem.brands b ON b.oem_code = e.oem_code \
             WHERE {} ORDER BY e.oem_part_number LIMIT $1",
            conditions.join(" AND ")
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| EquivalenceHit {
                kind: "equivalence",
                id: row.equivalence_id,
                url: format!("/oem/equivalences/{}/", row.equivalence_id),
                search_highlight: highlight_first(
                    query,
                    &[row.aftermarket_sku.as_deref(), Some(&row.oem_part_number)],
                ),
                oem_part_number: row.oem_part_number,
                oem_brand: row.brand_name.unwrap_or_default(),
                aftermarket_sku: row.aftermarket_sku,
                equivalence_type: row.equivalence_type,
                confidence_score: row.confidence_score,
                verified: row.verified_date.is_some(),
            })
            .collect())
    }

    async fn search_equipment(
        &self,
        query: &str,
        filters: &SearchFilters,
        limit: i64,
    ) -> Result<Vec<EquipmentHit>, SearchError> {
        let mut conditions = vec![sql::any_column_contains(
            &[
                "eq.equipment_code",
                "eq.brand",
                "eq.model",
                "eq.vin",
                "eq.license_plate",
                "eq.serial_number",
            ],
            query,
        )];

        if let Some(ref brand) = filters.brand {
            conditions.push(sql::ilike_contains("eq.brand", brand));
        }
        if let Some(year) = filters.year {
            conditions.push(format!("eq.year = {}", year));
        }
        if let Some(ref status) = filters.status {
            conditions.push(sql::eq_string("eq.status", status));
        }

        let rows = sqlx::query_as::<_, EquipmentRow>(&format!(
            "SELECT eq.equipment_id, eq.equipment_code, eq.brand, eq.model, eq.year, \
                    eq.vin, eq.license_plate, eq.status, eq.client_id, \
                    cl.name AS client_name, cl.client_code AS client_code \
             FROM app.equipment eq \
             LEFT JOIN app.clients cl ON cl.client_id = eq.client_id \
             WHERE {} ORDER BY eq.equipment_code LIMIT $1",
            conditions.join(" AND ")
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let highlight_source = if !row.brand.is_empty() && !row.model.is_empty() {
                    format!("{} {}", row.brand, row.model)
                } else {
                    row.equipment_code.clone()
                };
                let client = match (row.client_id, row.client_name, row.client_code) {
                    (Some(id), Some(name), Some(code)) => Some(ClientSummary {
                        id,
                        name,
                        code,
                    }),
                    _ => None,
                };
                EquipmentHit {
                    kind: "equipment",
                    id: row.equipment_id,
                    url: format!("/equipment/{}/", row.equipment_id),
                    search_highlight: highlight_match(query, &highlight_source),
                    code: row.equipment_code,
                    brand: row.brand,
                    model: row.model,
                    year: row.year,
                    vin: row.vin,
                    license_plate: row.license_plate,
                    status: row.status,
                    client,
                }
            })
            .collect())
    }

    /// Autocomplete over product SKUs and OEM part numbers. Queries are
    /// uppercased because both key spaces are stored uppercase.
    pub async fn suggestions(
        &self,
        query: &str,
        limit: Option<i64>,
    ) -> Result<SuggestionResponse, SearchError> {
        if query.chars().count() < MIN_QUERY_LENGTH {
            return Ok(SuggestionResponse {
                query: query.to_string(),
                suggestions: Vec::new(),
            });
        }

        let limit = limit.unwrap_or(DEFAULT_SUGGESTION_LIMIT);
        let prefix = query.to_uppercase();
        let mut suggestions = Vec::new();

        let products = sqlx::query_as::<_, SuggestionRow>(&format!(
            "SELECT internal_sku AS key, name AS label, \
                    '/inventory/products/' || internal_sku || '/' AS url \
             FROM inv.product_master \
             WHERE is_active = true AND {} \
             ORDER BY internal_sku LIMIT $1",
            sql::ilike_starts_with("internal_sku", &prefix)
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        for row in products {
            let name: String = row.label.unwrap_or_default().chars().take(30).collect();
            suggestions.push(Suggestion {
                kind: "product",
                text: format!("{} - {}", row.key, name),
                url: row.url,
            });
        }

        let oem_parts = sqlx::query_as::<_, SuggestionRow>(&format!(
            "SELECT c.part_number AS key, b.name AS label, \
                    '/oem/catalog/' || c.catalog_id || '/' AS url \
             FROM oem.catalog_items c \
             LEFT JOIN oem.brands b ON b.oem_code = c.oem_code \
             WHERE c.is_active = true AND {} \
             ORDER BY c.part_number LIMIT $1",
            sql::ilike_starts_with("c.part_number", &prefix)
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        for row in oem_parts {
            suggestions.push(Suggestion {
                kind: "oem",
                text: format!("{} - {}", row.key, row.label.unwrap_or_default()),
                url: row.url,
            });
        }

        Ok(SuggestionResponse {
            query: query.to_string(),
            suggestions,
        })
    }

    /// Catalog size counters shown on the search landing page
    pub async fn statistics(&self) -> Result<SearchStatistics, SearchError> {
        let products_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM inv.product_master WHERE is_active = true",
        )
        .fetch_one(&self.pool)
        .await?;

        let oem_items_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM oem.catalog_items WHERE is_active = true",
        )
        .fetch_one(&self.pool)
        .await?;

        let equivalences_count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM oem.equivalences")
                .fetch_one(&self.pool)
                .await?;

        let equipment_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM app.equipment WHERE status = 'ACTIVO'",
        )
        .fetch_one(&self.pool)
        .await?;

        let mut categories = BTreeMap::new();
        categories.insert("products", "Inventario de productos");
        categories.insert("oem_items", "Catálogo OEM");
        categories.insert("equivalences", "Equivalencias OEM ↔ Aftermarket");
        categories.insert("equipment", "Equipos/Vehículos");

        Ok(SearchStatistics {
            products_count,
            oem_items_count,
            equivalences_count,
            equipment_count,
            categories,
        })
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
        info!("search cache cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_type_parse() {
        assert_eq!(SearchType::parse("all").unwrap(), SearchType::All);
        assert_eq!(SearchType::parse("oem").unwrap(), SearchType::Oem);
        assert!(matches!(
            SearchType::parse("parts"),
            Err(SearchError::UnknownSearchType(_))
        ));
    }

    #[test]
    fn test_search_type_includes() {
        assert!(SearchType::All.includes(SearchType::Equipment));
        assert!(SearchType::Products.includes(SearchType::Products));
        assert!(!SearchType::Products.includes(SearchType::Oem));
    }

    #[test]
    fn test_filters_is_empty() {
        assert!(SearchFilters::default().is_empty());
        let filters = SearchFilters {
            has_stock: Some(false),
            ..Default::default()
        };
        assert!(!filters.is_empty());
    }

    #[test]
    fn test_absent_categories_not_serialized() {
        let response = SearchResponse {
            query: "fil".into(),
            search_type: "products",
            total_count: 0,
            results: SearchResults {
                products: Some(Vec::new()),
                ..Default::default()
            },
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json["results"].get("products").is_some());
        assert!(json["results"].get("oem_items").is_none());
    }
}
