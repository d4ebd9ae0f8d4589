//! Employee domain model.
//!
//! # Responsibility
//! - Define the record shape shared by every repository backend.
//!
//! # Invariants
//! - Records are validated before they reach storage.

pub mod employee;
