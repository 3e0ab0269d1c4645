//! Core application modules for ebsaudit.
//!
//! # Module Organization
//!
//! - [`inventory`] - Instance, volume, snapshot and backup job discovery, correlation and
//!   report emission

pub mod inventory;

pub use inventory::{run_report, AuditReport, ReportConfig};
