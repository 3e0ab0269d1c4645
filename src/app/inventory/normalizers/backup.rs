use super::utils::*;
use super::ResourceNormalizer;
use crate::app::inventory::aws_client::ListOperation;
use crate::app::inventory::error::InventoryError;
use crate::app::inventory::state::BackupJobRecord;

/// Backup job records tolerate missing fields: each absent field is logged at error level
/// and left empty, and the sweep carries on with the next field and record.
pub struct BackupJobNormalizer;

impl BackupJobNormalizer {
    fn field_or_empty(raw: &serde_json::Value, field: &'static str) -> String {
        match required_str(raw, Self::RESOURCE, field) {
            Ok(value) => value.to_string(),
            Err(err) => {
                log_error!("Missing Key Error: {}", err);
                String::new()
            }
        }
    }
}

impl ResourceNormalizer for BackupJobNormalizer {
    type Record = BackupJobRecord;

    const RESOURCE: &'static str = "backup job";
    const OPERATION: ListOperation = ListOperation::ListBackupJobs;

    fn normalize(&self, raw: &serde_json::Value) -> Result<(String, BackupJobRecord), InventoryError> {
        let backup_job_id = Self::field_or_empty(raw, "BackupJobId");
        let resource_arn = Self::field_or_empty(raw, "ResourceArn");

        let creation_date = parse_timestamp(raw, "CreationDate");
        if creation_date.is_none() {
            log_error!(
                "Missing Key Error: {}",
                InventoryError::missing_field(Self::RESOURCE, "CreationDate")
            );
        }

        let state = Self::field_or_empty(raw, "State");

        Ok((
            backup_job_id.clone(),
            BackupJobRecord {
                backup_job_id,
                resource_arn,
                creation_date,
                state,
            },
        ))
    }
}
