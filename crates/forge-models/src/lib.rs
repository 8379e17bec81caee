//! # forge-models
//!
//! Domain entities mapped 1:1 to the ForgeDB relational schema. Each struct
//! derives `sqlx::FromRow` for the database layer and `Serialize` for the
//! API layer; status values live in `*::status` constant modules next to
//! their entity.

pub mod account;
pub mod client;
pub mod equipment;
pub mod inventory;
pub mod oem;
pub mod technician;
pub mod work_order;

pub use account::UserAccount;
pub use client::Client;
pub use equipment::Equipment;
pub use inventory::{ProductMaster, Stock, Transaction, Warehouse};
pub use oem::{OemBrand, OemCatalogItem, OemEquivalence};
pub use technician::Technician;
pub use work_order::{WorkOrder, WorkOrderItem};
