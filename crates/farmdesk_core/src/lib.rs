//! Core domain logic for farmdesk, a farm record keeper.
//! Services, mappings and aggregation all live here; front ends stay thin.

pub mod config;
pub mod db;
pub mod logging;
pub mod mapping;
pub mod model;
pub mod page;
pub mod service;
pub mod store;

pub use config::{AppConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::field::{CropStage, Field, FieldPatch, FieldStatus, NewField};
pub use model::finance::{Expense, ExpensePatch, Harvest, HarvestPatch, NewExpense, NewHarvest};
pub use model::inventory::{InventoryItem, InventoryPatch, NewInventoryItem, StockStatus};
pub use model::task::{NewTask, Task, TaskPatch, TaskPriority, TaskStatus};
pub use model::weather::WeatherReport;
pub use service::dashboard_service::{
    DashboardData, DashboardError, DashboardService, DashboardStats, RevenueBaseline,
};
pub use service::record_service::{RecordService, ServiceError, ServiceResult};
pub use service::{
    Clock, ExpenseService, FieldService, FixedClock, HarvestService, InventoryService,
    SystemClock, TaskService,
};
pub use store::memory_store::MemoryRecordStore;
pub use store::sqlite_store::SqliteRecordStore;
pub use store::{RecordId, RecordStore, StoreError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
