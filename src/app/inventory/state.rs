use super::tags::TagLookup;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};

/// Records keyed by their own identifier, in fetch order.
///
/// Inserting an identifier that is already present replaces the record in place, so a
/// repeated identifier keeps the position of its first occurrence and the value of its last.
pub type ResourceMap<R> = IndexMap<String, R>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstanceRecord {
    #[serde(skip)]
    pub instance_id: String,
    #[serde(rename = "Name")]
    pub name: Option<TagLookup>,
    #[serde(rename = "DataType")]
    pub data_type: Option<TagLookup>,
    #[serde(rename = "Volumes")]
    pub volumes: Vec<VolumeRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeRecord {
    #[serde(skip)]
    pub volume_id: String,
    #[serde(rename = "Name")]
    pub name: Option<TagLookup>,
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "DataType")]
    pub data_type: Option<TagLookup>,
    /// Instance identifiers this volume is attached to
    #[serde(rename = "Attachments")]
    pub attachments: Vec<String>,
    #[serde(rename = "Snapshots")]
    pub snapshots: Vec<SnapshotRef>,
}

impl VolumeRecord {
    pub fn is_attached_to(&self, instance_id: &str) -> bool {
        self.attachments.iter().any(|id| id == instance_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotRecord {
    #[serde(skip)]
    pub snapshot_id: String,
    #[serde(rename = "Date")]
    pub start_time: DateTime<Utc>,
    #[serde(rename = "VolumeId")]
    pub volume_id: String,
    #[serde(rename = "State")]
    pub state: String,
}

/// A backup job as listed by AWS Backup; any field may be empty when the provider omitted it
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BackupJobRecord {
    #[serde(skip)]
    pub backup_job_id: String,
    #[serde(rename = "ResourceArn")]
    pub resource_arn: String,
    #[serde(rename = "CreationDate", serialize_with = "serialize_optional_date")]
    pub creation_date: Option<DateTime<Utc>>,
    #[serde(rename = "State")]
    pub state: String,
}

/// Snapshot entry nested under a volume in the correlated view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotRef {
    #[serde(rename = "StartDate")]
    pub start_date: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "SnapshotId")]
    pub snapshot_id: String,
    #[serde(rename = "VolumeId")]
    pub volume_id: String,
}

/// Volume entry nested under an instance in the correlated view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeRef {
    #[serde(rename = "VolumeId")]
    pub volume_id: String,
    #[serde(rename = "VolumeDetails")]
    pub volume_details: VolumeRecord,
}

fn serialize_optional_date<S: Serializer>(
    date: &Option<DateTime<Utc>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match date {
        Some(date) => date.serialize(serializer),
        None => serializer.serialize_str(""),
    }
}
