//! ebsaudit - EBS Backup Coverage Auditor
//!
//! ebsaudit lists the classified EC2 instances of an account, the EBS volumes attached to
//! them and the snapshots of those volumes, and logs the result as one instance-rooted JSON
//! tree next to a list of failed AWS Backup jobs. Operations teams use it to check which
//! volumes of a data classification have recent snapshots.
//!
//! # Architecture Overview
//!
//! - **Transport** ([`app::inventory::aws_client`]): the `ResourceApi` seam and its AWS SDK
//!   implementation, returning raw pages in the provider's wire shape
//! - **Pagination** ([`app::inventory::pagination`]): one lazy page sequence over native
//!   cursors and manual `NextToken` loops
//! - **Fetchers** ([`app::inventory::normalizers`]): raw pages flattened into
//!   identifier-keyed records
//! - **Correlation** ([`app::inventory::correlation`]): instance → volume → snapshot join
//! - **Report** ([`app::inventory::report`]): JSON rendering into the log
//!
//! The pass is single-threaded and sequential; each fetch stage is filtered by the
//! identifiers found in the previous one.

#![warn(clippy::all, rust_2018_idioms)]

// Include logging macros first
#[macro_use]
pub mod logging_macros;

pub mod app;
pub use app::{run_report, AuditReport, ReportConfig};
