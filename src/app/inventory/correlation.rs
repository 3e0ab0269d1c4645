//! Instance → volume → snapshot correlation.
//!
//! Each stage is filtered by the identifiers of the previous one, so the stages run strictly
//! one after the other. The join itself ([`correlate`]) only appends derived lists: volumes
//! that no instance claims stay in the volume map without appearing in the tree, and
//! snapshots of volumes outside the map are dropped from the tree.

use super::aws_client::{ListParams, ResourceApi};
use super::config::{ReportConfig, SNAPSHOT_DATE_FORMAT, SNAPSHOT_OWNER_SELF};
use super::error::InventoryError;
use super::normalizers::ec2::TagKeys;
use super::normalizers::{
    fetch_records, fetch_snapshots, EC2InstanceNormalizer, EC2VolumeNormalizer,
};
use super::pagination::PaginationStrategy;
use super::state::{InstanceRecord, ResourceMap, SnapshotRecord, SnapshotRef, VolumeRecord, VolumeRef};

/// Correlated view of one audit pass
#[derive(Debug, Clone, PartialEq)]
pub struct Inventory {
    /// Instance-rooted tree, each instance carrying its volumes and their snapshots
    pub instances: ResourceMap<InstanceRecord>,
    /// Every fetched volume with its snapshots, attached or not
    pub volumes: ResourceMap<VolumeRecord>,
    pub snapshots: ResourceMap<SnapshotRecord>,
}

/// Fetch instances, volumes and snapshots for the configured classifications and join them
pub async fn build_inventory(
    api: &dyn ResourceApi,
    config: &ReportConfig,
) -> Result<Inventory, InventoryError> {
    let tag_keys = TagKeys {
        name: config.name_tag_key.clone(),
        classification: config.classification_tag_key.clone(),
    };

    let params = ListParams::new().filter(
        format!("tag:{}", config.classification_tag_key),
        config.classification_allow_list.iter().cloned(),
    );
    let instances = fetch_records(
        api,
        &EC2InstanceNormalizer {
            tag_keys: tag_keys.clone(),
        },
        PaginationStrategy::CursorPaginated,
        Some(&params),
    )
    .await?;
    log_info!(
        "Found {} instances classified {:?}",
        instances.len(),
        config.classification_allow_list
    );

    let volumes = if instances.is_empty() {
        log_warn!("No instances matched, skipping volume lookup");
        ResourceMap::new()
    } else {
        let params = ListParams::new().filter("attachment.instance-id", instances.keys().cloned());
        fetch_records(
            api,
            &EC2VolumeNormalizer { tag_keys },
            PaginationStrategy::CursorPaginated,
            Some(&params),
        )
        .await?
    };

    let snapshots = if volumes.is_empty() {
        log_debug!("No volumes attached, skipping snapshot lookup");
        ResourceMap::new()
    } else {
        let params = ListParams::new()
            .filter("volume-id", volumes.keys().cloned())
            .owner_id(SNAPSHOT_OWNER_SELF);
        fetch_snapshots(api, Some(&params)).await?
    };

    log_info!(
        "Correlating {} instances, {} volumes, {} snapshots",
        instances.len(),
        volumes.len(),
        snapshots.len()
    );

    Ok(correlate(instances, volumes, snapshots))
}

/// Attach snapshots to volumes and volumes to instances.
///
/// Derived lists follow the insertion order of the map they are drawn from.
pub fn correlate(
    mut instances: ResourceMap<InstanceRecord>,
    mut volumes: ResourceMap<VolumeRecord>,
    snapshots: ResourceMap<SnapshotRecord>,
) -> Inventory {
    for (volume_id, volume) in volumes.iter_mut() {
        volume.snapshots = snapshots
            .iter()
            .filter(|(_, snapshot)| snapshot.volume_id == *volume_id)
            .map(|(snapshot_id, snapshot)| SnapshotRef {
                start_date: snapshot.start_time.format(SNAPSHOT_DATE_FORMAT).to_string(),
                status: snapshot.state.clone(),
                snapshot_id: snapshot_id.clone(),
                volume_id: volume_id.clone(),
            })
            .collect();
    }

    for (instance_id, instance) in instances.iter_mut() {
        instance.volumes = volumes
            .iter()
            .filter(|(_, volume)| volume.is_attached_to(instance_id))
            .map(|(volume_id, volume)| VolumeRef {
                volume_id: volume_id.clone(),
                volume_details: volume.clone(),
            })
            .collect();
    }

    Inventory {
        instances,
        volumes,
        snapshots,
    }
}
