//! Core data-access layer for employee records.
//! This crate is the single source of truth for employee invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, CoreConfig, StoreConfig, StoreKind};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::employee::{
    Department, Employee, EmployeeId, EmployeeValidationError, UNASSIGNED_ID,
};
pub use repo::employee_repo::{
    EmployeeRepository, EmployeeSummary, RepoError, RepoResult, SqliteEmployeeRepository,
    StorageError,
};
pub use repo::memory_repo::InMemoryEmployeeRepository;
pub use repo::open::{open_repository, DynEmployeeRepository};
pub use service::employee_service::EmployeeService;

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
