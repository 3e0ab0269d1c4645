use super::utils::*;
use super::ResourceNormalizer;
use crate::app::inventory::aws_client::{ListOperation, Page};
use crate::app::inventory::config::{CLASSIFICATION_TAG_KEY, NAME_TAG_KEY};
use crate::app::inventory::error::InventoryError;
use crate::app::inventory::state::{InstanceRecord, SnapshotRecord, VolumeRecord};
use crate::app::inventory::tags::{extract_tags, resolve_tag, TagLookup};

/// Tag keys resolved into a record's name and classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagKeys {
    pub name: String,
    pub classification: String,
}

impl Default for TagKeys {
    fn default() -> Self {
        Self {
            name: NAME_TAG_KEY.to_string(),
            classification: CLASSIFICATION_TAG_KEY.to_string(),
        }
    }
}

impl TagKeys {
    /// Resolve `(name, classification)`; both unresolved when the record has no tag list
    fn resolve(
        &self,
        raw: &serde_json::Value,
        resource: &str,
        id: &str,
    ) -> (Option<TagLookup>, Option<TagLookup>) {
        match extract_tags(raw) {
            Some(tags) => (
                Some(resolve_tag(&tags, &self.name)),
                Some(resolve_tag(&tags, &self.classification)),
            ),
            None => {
                log_debug!("{} has no tags {}", resource, id);
                (None, None)
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EC2InstanceNormalizer {
    pub tag_keys: TagKeys,
}

impl ResourceNormalizer for EC2InstanceNormalizer {
    type Record = InstanceRecord;

    const RESOURCE: &'static str = "instance";
    const OPERATION: ListOperation = ListOperation::DescribeInstances;

    /// Instances are nested one level down, under their reservations
    fn records<'p>(&self, page: &'p Page) -> Vec<&'p serde_json::Value> {
        page.get(Self::OPERATION.result_key())
            .and_then(|v| v.as_array())
            .into_iter()
            .flatten()
            .filter_map(|reservation| reservation.get("Instances").and_then(|v| v.as_array()))
            .flatten()
            .collect()
    }

    fn normalize(&self, raw: &serde_json::Value) -> Result<(String, InstanceRecord), InventoryError> {
        let instance_id = required_str(raw, Self::RESOURCE, "InstanceId")?.to_string();
        let (name, data_type) = self.tag_keys.resolve(raw, Self::RESOURCE, &instance_id);

        Ok((
            instance_id.clone(),
            InstanceRecord {
                instance_id,
                name,
                data_type,
                volumes: Vec::new(),
            },
        ))
    }
}

#[derive(Debug, Clone, Default)]
pub struct EC2VolumeNormalizer {
    pub tag_keys: TagKeys,
}

impl ResourceNormalizer for EC2VolumeNormalizer {
    type Record = VolumeRecord;

    const RESOURCE: &'static str = "volume";
    const OPERATION: ListOperation = ListOperation::DescribeVolumes;

    fn normalize(&self, raw: &serde_json::Value) -> Result<(String, VolumeRecord), InventoryError> {
        let volume_id = required_str(raw, Self::RESOURCE, "VolumeId")?.to_string();
        let state = required_str(raw, Self::RESOURCE, "State")?.to_string();
        let (name, data_type) = self.tag_keys.resolve(raw, Self::RESOURCE, &volume_id);

        let attachments: Vec<String> = raw
            .get("Attachments")
            .and_then(|v| v.as_array())
            .map(|attachments| {
                attachments
                    .iter()
                    .filter_map(|attachment| optional_str(attachment, "InstanceId"))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok((
            volume_id.clone(),
            VolumeRecord {
                volume_id,
                name,
                state,
                data_type,
                attachments,
                snapshots: Vec::new(),
            },
        ))
    }
}

pub struct EC2SnapshotNormalizer;

impl ResourceNormalizer for EC2SnapshotNormalizer {
    type Record = SnapshotRecord;

    const RESOURCE: &'static str = "snapshot";
    const OPERATION: ListOperation = ListOperation::DescribeSnapshots;

    fn normalize(&self, raw: &serde_json::Value) -> Result<(String, SnapshotRecord), InventoryError> {
        let snapshot_id = required_str(raw, Self::RESOURCE, "SnapshotId")?.to_string();
        let start_time = parse_timestamp(raw, "StartTime")
            .ok_or_else(|| InventoryError::missing_field(Self::RESOURCE, "StartTime"))?;
        let volume_id = required_str(raw, Self::RESOURCE, "VolumeId")?.to_string();
        let state = required_str(raw, Self::RESOURCE, "State")?.to_string();

        Ok((
            snapshot_id.clone(),
            SnapshotRecord {
                snapshot_id,
                start_time,
                volume_id,
                state,
            },
        ))
    }
}
