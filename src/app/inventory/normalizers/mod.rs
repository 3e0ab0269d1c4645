//! Resource fetchers: page sweeps flattened into identifier-keyed records.
//!
//! Every fetcher has the same shape. It opens the page sequence of its listing operation,
//! walks the records of each page, and normalizes each raw record with best-effort key
//! lookups into a typed record stored under the record's own identifier.

pub mod backup;
pub mod ec2;

pub use backup::BackupJobNormalizer;
pub use ec2::{EC2InstanceNormalizer, EC2SnapshotNormalizer, EC2VolumeNormalizer};

use super::aws_client::{ListOperation, ListParams, Page, ResourceApi};
use super::error::InventoryError;
use super::pagination::{paginate, PaginationStrategy};
use super::state::{BackupJobRecord, InstanceRecord, ResourceMap, SnapshotRecord, VolumeRecord};

/// Turns raw records of one listing operation into typed records
pub trait ResourceNormalizer {
    type Record;

    /// Resource name used in log lines and errors
    const RESOURCE: &'static str;
    const OPERATION: ListOperation;

    /// Raw records carried by a page
    fn records<'p>(&self, page: &'p Page) -> Vec<&'p serde_json::Value> {
        page.get(Self::OPERATION.result_key())
            .and_then(|v| v.as_array())
            .map(|records| records.iter().collect())
            .unwrap_or_default()
    }

    /// Normalize one raw record into `(identifier, record)`
    fn normalize(&self, raw: &serde_json::Value) -> Result<(String, Self::Record), InventoryError>;
}

/// Sweep every page of `N::OPERATION` and collect the normalized records.
///
/// A repeated identifier replaces the earlier record.
pub async fn fetch_records<N: ResourceNormalizer>(
    api: &dyn ResourceApi,
    normalizer: &N,
    strategy: PaginationStrategy,
    params: Option<&ListParams>,
) -> Result<ResourceMap<N::Record>, InventoryError> {
    let params = params.cloned().unwrap_or_default();
    let mut pages = paginate(api, N::OPERATION, strategy, params);
    let mut records = ResourceMap::new();
    let mut seen = 0usize;

    while let Some(page) = pages.try_next().await? {
        for raw in normalizer.records(&page) {
            let (id, record) = normalizer.normalize(raw)?;
            seen += 1;
            if records.insert(id.clone(), record).is_some() {
                log_debug!("{} {} listed more than once, keeping the latest", N::RESOURCE, id);
            }
        }
    }

    tracing::debug!(
        "{}: {} {} records over {} pages, {} unique",
        N::OPERATION,
        seen,
        N::RESOURCE,
        pages.pages_served(),
        records.len()
    );

    Ok(records)
}

/// Describe instances through the EC2 native paginator
pub async fn fetch_instances(
    api: &dyn ResourceApi,
    params: Option<&ListParams>,
) -> Result<ResourceMap<InstanceRecord>, InventoryError> {
    fetch_records(
        api,
        &EC2InstanceNormalizer::default(),
        PaginationStrategy::CursorPaginated,
        params,
    )
    .await
}

pub async fn fetch_volumes(
    api: &dyn ResourceApi,
    params: Option<&ListParams>,
) -> Result<ResourceMap<VolumeRecord>, InventoryError> {
    fetch_records(
        api,
        &EC2VolumeNormalizer::default(),
        PaginationStrategy::CursorPaginated,
        params,
    )
    .await
}

pub async fn fetch_snapshots(
    api: &dyn ResourceApi,
    params: Option<&ListParams>,
) -> Result<ResourceMap<SnapshotRecord>, InventoryError> {
    fetch_records(
        api,
        &EC2SnapshotNormalizer,
        PaginationStrategy::CursorPaginated,
        params,
    )
    .await
}

/// List backup jobs by looping on `NextToken`
pub async fn fetch_backup_jobs(
    api: &dyn ResourceApi,
    params: Option<&ListParams>,
) -> Result<ResourceMap<BackupJobRecord>, InventoryError> {
    fetch_records(
        api,
        &BackupJobNormalizer,
        PaginationStrategy::ManualTokenPaginated,
        params,
    )
    .await
}

/// Helper functions for common normalization tasks
pub mod utils {
    use super::InventoryError;
    use chrono::{DateTime, Utc};

    pub fn optional_str<'r>(raw: &'r serde_json::Value, field: &str) -> Option<&'r str> {
        raw.get(field).and_then(|v| v.as_str())
    }

    pub fn required_str<'r>(
        raw: &'r serde_json::Value,
        resource: &'static str,
        field: &'static str,
    ) -> Result<&'r str, InventoryError> {
        optional_str(raw, field).ok_or_else(|| InventoryError::missing_field(resource, field))
    }

    /// Parse an RFC 3339 timestamp field
    pub fn parse_timestamp(raw: &serde_json::Value, field: &str) -> Option<DateTime<Utc>> {
        optional_str(raw, field)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }
}
