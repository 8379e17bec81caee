//! # forge-search
//!
//! Unified cross-catalog search over products, OEM catalog items, OEM
//! equivalences and equipment, with match highlighting, autocomplete
//! suggestions and a TTL response cache.

pub mod cache;
pub mod highlight;
pub mod service;

pub use cache::TtlCache;
pub use highlight::highlight_match;
pub use service::{
    SearchError, SearchFilters, SearchResponse, SearchStatistics, SearchType,
    SuggestionResponse, UnifiedSearchService, DEFAULT_LIMIT, MIN_QUERY_LENGTH,
};
