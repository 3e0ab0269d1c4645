//! Backup coverage inventory.
//!
//! One pass lists the failed AWS Backup jobs, then walks classified EC2 instances down to
//! their EBS volumes and the snapshots of those volumes, and logs both as JSON reports.
//!
//! The provider is reached through [`ResourceApi`]; [`AwsResourceApi`] talks to AWS and
//! [`mock::MockResourceApi`] serves scripted pages.

pub mod aws_client;
pub mod aws_services;
pub mod config;
pub mod correlation;
pub mod error;
pub mod mock;
pub mod normalizers;
pub mod pagination;
pub mod report;
pub mod state;
pub mod tags;

pub use aws_client::{AwsResourceApi, Filter, ListOperation, ListParams, Page, ResourceApi};
pub use config::ReportConfig;
pub use correlation::{build_inventory, correlate, Inventory};
pub use error::{ErrorCategory, InventoryError};
pub use normalizers::{fetch_backup_jobs, fetch_instances, fetch_snapshots, fetch_volumes};
pub use pagination::{paginate, Pages, PaginationStrategy};
pub use state::{
    BackupJobRecord, InstanceRecord, ResourceMap, SnapshotRecord, SnapshotRef, VolumeRecord,
    VolumeRef,
};
pub use tags::{resolve_tag, Tag, TagLookup};

use anyhow::{Context, Result};

/// Everything one audit pass produced
#[derive(Debug, Clone, PartialEq)]
pub struct AuditReport {
    pub backup_jobs: ResourceMap<BackupJobRecord>,
    pub inventory: Inventory,
}

/// Run the full audit pass and emit both report sections
pub async fn run_report(api: &dyn ResourceApi, config: &ReportConfig) -> Result<AuditReport> {
    let params = ListParams::new().by_state(config.backup_job_state.clone());
    let backup_jobs = fetch_backup_jobs(api, Some(&params))
        .await
        .with_context(|| format!("Failed to list {} backup jobs", config.backup_job_state))?;
    report::emit_backup_jobs(&backup_jobs).context("Failed to render backup jobs")?;

    let inventory = build_inventory(api, config)
        .await
        .context("Failed to build instance/volume/snapshot inventory")?;
    report::emit_inventory(&inventory).context("Failed to render inventory")?;

    Ok(AuditReport {
        backup_jobs,
        inventory,
    })
}
