//! # forge-db
//!
//! Database layer for ForgeDB RS: connection pool, per-entity repositories,
//! and thin wrappers over the PL/pgSQL stored procedures that carry the
//! heavy business logic (stock reservation, work order transitions,
//! analytics reports).

pub mod accounts;
pub mod clients;
pub mod equipment;
pub mod oem;
pub mod pool;
pub mod procedures;
pub mod products;
pub mod repository;
pub mod sql;
pub mod stock;
pub mod technicians;
pub mod work_orders;

pub use accounts::UserAccountRepository;
pub use clients::ClientRepository;
pub use equipment::EquipmentRepository;
pub use oem::{OemBrandRepository, OemCatalogRepository, OemEquivalenceRepository};
pub use pool::{Database, DatabaseConfig};
pub use procedures::ProcedureRunner;
pub use products::ProductRepository;
pub use repository::{
    PaginatedResult, Pagination, Repository, RepositoryError, RepositoryResult,
};
pub use stock::{StockRepository, TransactionRepository, WarehouseRepository};
pub use technicians::TechnicianRepository;
pub use work_orders::WorkOrderRepository;
