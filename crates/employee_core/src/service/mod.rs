//! Core use-case services.
//!
//! # Responsibility
//! - Expose repository operations at the level a presentation layer needs.
//! - Keep presentation code decoupled from storage details.

pub mod employee_service;
