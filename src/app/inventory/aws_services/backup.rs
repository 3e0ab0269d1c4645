use super::{insert_next_token, timestamp_to_json};
use aws_sdk_backup as backup;
use backup::operation::list_backup_jobs::ListBackupJobsOutput;

pub fn list_backup_jobs_to_page(output: &ListBackupJobsOutput) -> serde_json::Value {
    let mut page = serde_json::Map::new();
    let backup_jobs = output
        .backup_jobs
        .iter()
        .flatten()
        .map(backup_job_to_json)
        .collect();
    page.insert("BackupJobs".to_string(), serde_json::Value::Array(backup_jobs));
    insert_next_token(&mut page, &output.next_token);
    serde_json::Value::Object(page)
}

/// Fields the provider did not send are left out, the normalizer reports them as empty
fn backup_job_to_json(job: &backup::types::BackupJob) -> serde_json::Value {
    let mut json = serde_json::Map::new();

    if let Some(backup_job_id) = &job.backup_job_id {
        json.insert(
            "BackupJobId".to_string(),
            serde_json::Value::String(backup_job_id.clone()),
        );
    }

    if let Some(resource_arn) = &job.resource_arn {
        json.insert(
            "ResourceArn".to_string(),
            serde_json::Value::String(resource_arn.clone()),
        );
    }

    if let Some(resource_type) = &job.resource_type {
        json.insert(
            "ResourceType".to_string(),
            serde_json::Value::String(resource_type.clone()),
        );
    }

    if let Some(creation_date) = job.creation_date.as_ref().and_then(timestamp_to_json) {
        json.insert("CreationDate".to_string(), creation_date);
    }

    if let Some(state) = &job.state {
        json.insert(
            "State".to_string(),
            serde_json::Value::String(state.as_str().to_string()),
        );
    }

    if let Some(status_message) = &job.status_message {
        json.insert(
            "StatusMessage".to_string(),
            serde_json::Value::String(status_message.clone()),
        );
    }

    if let Some(backup_vault_name) = &job.backup_vault_name {
        json.insert(
            "BackupVaultName".to_string(),
            serde_json::Value::String(backup_vault_name.clone()),
        );
    }

    serde_json::Value::Object(json)
}
