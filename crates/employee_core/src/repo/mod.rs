//! Repository layer: the sole mutation path for employee records.
//!
//! # Responsibility
//! - Define the storage-agnostic contract callers depend on.
//! - Provide interchangeable in-memory and SQLite backends.
//!
//! # Invariants
//! - Repository writes enforce `Employee::validate()` before persistence.
//! - Missing ids surface as `RepoError::NotFound`, never as storage faults.

pub mod employee_repo;
pub mod memory_repo;
pub mod open;
