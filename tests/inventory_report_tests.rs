//! End-to-end audit pass tests.
//!
//! Runs `run_report` and `build_inventory` against `MockResourceApi`, which serves scripted
//! pages for every listing operation. The mock does not evaluate filters, so these tests
//! check both the requests that were issued and how the correlation treats records that
//! a real provider would have filtered out.

use ebsaudit::app::inventory::error::ErrorCategory;
use ebsaudit::app::inventory::mock::MockResourceApi;
use ebsaudit::app::inventory::{
    build_inventory, Filter, InventoryError, ListOperation, ListParams, TagLookup,
};
use ebsaudit::{run_report, ReportConfig};
use pretty_assertions::assert_eq;
use serde_json::json;

fn scripted_backend() -> MockResourceApi {
    MockResourceApi::new()
        .with_pages(
            ListOperation::DescribeInstances,
            vec![
                json!({"Reservations": [{"Instances": [{
                    "InstanceId": "I1",
                    "Tags": [{"Key": "Name", "Value": "app-01"}, {"Key": "DataType", "Value": "NON_HIPAA"}]
                }]}]}),
                json!({"Reservations": [{"Instances": [{
                    "InstanceId": "I2",
                    "Tags": [{"Key": "DataType", "Value": "NON_HIPAA"}]
                }]}]}),
            ],
        )
        .with_pages(
            ListOperation::DescribeVolumes,
            vec![json!({"Volumes": [
                {"VolumeId": "V1", "State": "in-use", "Attachments": [{"InstanceId": "I1"}],
                 "Tags": [{"Key": "Name", "Value": "app-data"}]},
                {"VolumeId": "V2", "State": "available", "Attachments": []}
            ]})],
        )
        .with_pages(
            ListOperation::DescribeSnapshots,
            vec![
                json!({"Snapshots": [{
                    "SnapshotId": "S1", "VolumeId": "V1", "State": "completed",
                    "StartTime": "2024-09-01T03:00:00+00:00"
                }]}),
                json!({"Snapshots": [{
                    "SnapshotId": "S2", "VolumeId": "V3", "State": "completed",
                    "StartTime": "2024-09-02T03:00:00+00:00"
                }]}),
            ],
        )
        .with_pages(
            ListOperation::ListBackupJobs,
            vec![
                json!({"BackupJobs": [
                    {"BackupJobId": "job-1", "ResourceArn": "arn:aws:ec2:us-east-1:123456789012:volume/V1",
                     "CreationDate": "2024-09-03T00:00:00+00:00"},
                    {"BackupJobId": "job-2", "ResourceArn": "arn:aws:ec2:us-east-1:123456789012:volume/V2",
                     "CreationDate": "2024-09-03T01:00:00+00:00", "State": "FAILED"}
                ]}),
                json!({"BackupJobs": [
                    {"BackupJobId": "job-3", "ResourceArn": "arn:aws:ec2:us-east-1:123456789012:volume/V9",
                     "CreationDate": "2024-09-04T00:00:00+00:00", "State": "FAILED"}
                ]}),
            ],
        )
}

#[tokio::test]
async fn test_inventory_tree_for_classified_instances() {
    let api = scripted_backend();
    let inventory = build_inventory(&api, &ReportConfig::default()).await.unwrap();

    let i1 = &inventory.instances["I1"];
    assert_eq!(i1.name, Some(TagLookup::Found("app-01".to_string())));
    assert_eq!(i1.volumes.len(), 1);
    assert_eq!(i1.volumes[0].volume_id, "V1");
    let snapshots = &i1.volumes[0].volume_details.snapshots;
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].snapshot_id, "S1");
    assert_eq!(snapshots[0].start_date, "09/01/2024");

    let i2 = &inventory.instances["I2"];
    assert_eq!(i2.name, Some(TagLookup::NotFound("Name".to_string())));
    assert!(i2.volumes.is_empty());

    assert!(inventory.volumes.contains_key("V2"));
    assert!(inventory.volumes["V2"].snapshots.is_empty());

    let tree = serde_json::to_string(&inventory.instances).unwrap();
    assert!(!tree.contains("\"V2\""));
    assert!(!tree.contains("S2"));
}

#[tokio::test]
async fn test_each_stage_filtered_by_previous_identifiers() {
    let api = scripted_backend();
    build_inventory(&api, &ReportConfig::default()).await.unwrap();

    assert_eq!(
        api.cursors(ListOperation::DescribeInstances),
        vec![ListParams::new().filter("tag:DataType", ["NON_HIPAA"])]
    );
    assert_eq!(
        api.cursors(ListOperation::DescribeVolumes),
        vec![ListParams::new().filter("attachment.instance-id", ["I1", "I2"])]
    );

    let snapshot_params = api.cursors(ListOperation::DescribeSnapshots);
    assert_eq!(snapshot_params.len(), 1);
    assert_eq!(
        snapshot_params[0].filters,
        vec![Filter {
            name: "volume-id".to_string(),
            values: vec!["V1".to_string(), "V2".to_string()],
        }]
    );
    assert_eq!(snapshot_params[0].owner_ids, vec!["self".to_string()]);
}

#[tokio::test]
async fn test_allow_list_drives_instance_filter() {
    let api = scripted_backend();
    let config = ReportConfig::default().with_classifications(["HIPAA", "IRIS_HIPAA"]);
    build_inventory(&api, &config).await.unwrap();

    assert_eq!(
        api.cursors(ListOperation::DescribeInstances)[0].filters[0].values,
        vec!["HIPAA".to_string(), "IRIS_HIPAA".to_string()]
    );
}

#[tokio::test]
async fn test_no_instances_skips_volume_and_snapshot_calls() {
    let api = MockResourceApi::new();
    let inventory = build_inventory(&api, &ReportConfig::default()).await.unwrap();

    assert!(inventory.instances.is_empty());
    assert!(inventory.volumes.is_empty());
    assert!(inventory.snapshots.is_empty());
    assert_eq!(api.cursor_count(ListOperation::DescribeVolumes), 0);
    assert_eq!(api.cursor_count(ListOperation::DescribeSnapshots), 0);
}

#[tokio::test]
async fn test_backup_jobs_listed_by_state_with_manual_tokens() {
    let api = scripted_backend();
    let report = run_report(&api, &ReportConfig::default()).await.unwrap();

    let requests = api.requests(ListOperation::ListBackupJobs);
    assert_eq!(requests.len(), 2);
    assert!(requests
        .iter()
        .all(|params| params.by_state.as_deref() == Some("FAILED")));
    assert_eq!(requests[0].next_token, None);
    assert!(requests[1].next_token.is_some());

    let ids: Vec<&str> = report.backup_jobs.keys().map(String::as_str).collect();
    assert_eq!(ids, vec!["job-1", "job-2", "job-3"]);
    assert_eq!(report.backup_jobs["job-1"].state, "");
    assert_eq!(report.backup_jobs["job-2"].state, "FAILED");
}

#[tokio::test]
async fn test_report_pass_is_idempotent() {
    let api = scripted_backend();
    let config = ReportConfig::default();

    let first = run_report(&api, &config).await.unwrap();
    let second = run_report(&api, &config).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first.inventory.instances).unwrap(),
        serde_json::to_string(&second.inventory.instances).unwrap()
    );
    assert_eq!(
        serde_json::to_string(&first.backup_jobs).unwrap(),
        serde_json::to_string(&second.backup_jobs).unwrap()
    );
}

#[tokio::test]
async fn test_transport_failure_aborts_pass() {
    let api = scripted_backend().failing_at(ListOperation::DescribeVolumes, 0, ErrorCategory::Throttled);

    let err = run_report(&api, &ReportConfig::default()).await.unwrap_err();
    let cause = err
        .downcast_ref::<InventoryError>()
        .expect("inventory error in the chain");
    assert!(matches!(
        cause,
        InventoryError::Transport {
            operation: ListOperation::DescribeVolumes,
            category: ErrorCategory::Throttled,
            ..
        }
    ));
    assert_eq!(api.cursor_count(ListOperation::DescribeSnapshots), 0);
}

#[tokio::test]
async fn test_backup_failure_stops_before_inventory() {
    let api = scripted_backend().failing_at(ListOperation::ListBackupJobs, 1, ErrorCategory::Network);

    assert!(run_report(&api, &ReportConfig::default()).await.is_err());
    assert_eq!(api.cursor_count(ListOperation::DescribeInstances), 0);
}
