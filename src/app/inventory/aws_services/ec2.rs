use super::{insert_next_token, timestamp_to_json};
use aws_sdk_ec2 as ec2;
use ec2::operation::describe_instances::DescribeInstancesOutput;
use ec2::operation::describe_snapshots::DescribeSnapshotsOutput;
use ec2::operation::describe_volumes::DescribeVolumesOutput;

/// Convert a DescribeInstances page, keeping the reservation nesting
pub fn describe_instances_to_page(output: &DescribeInstancesOutput) -> serde_json::Value {
    let mut page = serde_json::Map::new();

    let reservations: Vec<serde_json::Value> = output
        .reservations
        .iter()
        .flatten()
        .map(|reservation| {
            let mut reservation_json = serde_json::Map::new();
            if let Some(reservation_id) = &reservation.reservation_id {
                reservation_json.insert(
                    "ReservationId".to_string(),
                    serde_json::Value::String(reservation_id.clone()),
                );
            }
            let instances: Vec<serde_json::Value> = reservation
                .instances
                .iter()
                .flatten()
                .map(instance_to_json)
                .collect();
            reservation_json.insert("Instances".to_string(), serde_json::Value::Array(instances));
            serde_json::Value::Object(reservation_json)
        })
        .collect();

    page.insert(
        "Reservations".to_string(),
        serde_json::Value::Array(reservations),
    );
    insert_next_token(&mut page, &output.next_token);

    serde_json::Value::Object(page)
}

pub fn describe_volumes_to_page(output: &DescribeVolumesOutput) -> serde_json::Value {
    let mut page = serde_json::Map::new();
    let volumes = output.volumes.iter().flatten().map(volume_to_json).collect();
    page.insert("Volumes".to_string(), serde_json::Value::Array(volumes));
    insert_next_token(&mut page, &output.next_token);
    serde_json::Value::Object(page)
}

pub fn describe_snapshots_to_page(output: &DescribeSnapshotsOutput) -> serde_json::Value {
    let mut page = serde_json::Map::new();
    let snapshots = output
        .snapshots
        .iter()
        .flatten()
        .map(snapshot_to_json)
        .collect();
    page.insert("Snapshots".to_string(), serde_json::Value::Array(snapshots));
    insert_next_token(&mut page, &output.next_token);
    serde_json::Value::Object(page)
}

fn instance_to_json(instance: &ec2::types::Instance) -> serde_json::Value {
    let mut json = serde_json::Map::new();

    if let Some(instance_id) = &instance.instance_id {
        json.insert(
            "InstanceId".to_string(),
            serde_json::Value::String(instance_id.clone()),
        );
    }

    if let Some(instance_type) = &instance.instance_type {
        json.insert(
            "InstanceType".to_string(),
            serde_json::Value::String(instance_type.as_str().to_string()),
        );
    }

    if let Some(state_name) = instance.state.as_ref().and_then(|s| s.name.as_ref()) {
        let mut state_json = serde_json::Map::new();
        state_json.insert(
            "Name".to_string(),
            serde_json::Value::String(state_name.as_str().to_string()),
        );
        json.insert("State".to_string(), serde_json::Value::Object(state_json));
    }

    if let Some(launch_time) = instance.launch_time.as_ref().and_then(timestamp_to_json) {
        json.insert("LaunchTime".to_string(), launch_time);
    }

    if let Some(tags) = &instance.tags {
        json.insert("Tags".to_string(), tags_to_json(tags));
    }

    serde_json::Value::Object(json)
}

fn volume_to_json(volume: &ec2::types::Volume) -> serde_json::Value {
    let mut json = serde_json::Map::new();

    if let Some(volume_id) = &volume.volume_id {
        json.insert(
            "VolumeId".to_string(),
            serde_json::Value::String(volume_id.clone()),
        );
    }

    if let Some(size) = volume.size {
        json.insert("Size".to_string(), serde_json::Value::Number(size.into()));
    }

    if let Some(volume_type) = &volume.volume_type {
        json.insert(
            "VolumeType".to_string(),
            serde_json::Value::String(volume_type.as_str().to_string()),
        );
    }

    if let Some(state) = &volume.state {
        json.insert(
            "State".to_string(),
            serde_json::Value::String(state.as_str().to_string()),
        );
    }

    if let Some(create_time) = volume.create_time.as_ref().and_then(timestamp_to_json) {
        json.insert("CreateTime".to_string(), create_time);
    }

    if let Some(attachments) = &volume.attachments {
        let attachments_json: Vec<serde_json::Value> = attachments
            .iter()
            .map(|attachment| {
                let mut attach_json = serde_json::Map::new();
                if let Some(instance_id) = &attachment.instance_id {
                    attach_json.insert(
                        "InstanceId".to_string(),
                        serde_json::Value::String(instance_id.clone()),
                    );
                }
                if let Some(device) = &attachment.device {
                    attach_json.insert(
                        "Device".to_string(),
                        serde_json::Value::String(device.clone()),
                    );
                }
                if let Some(state) = &attachment.state {
                    attach_json.insert(
                        "State".to_string(),
                        serde_json::Value::String(state.as_str().to_string()),
                    );
                }
                serde_json::Value::Object(attach_json)
            })
            .collect();
        json.insert(
            "Attachments".to_string(),
            serde_json::Value::Array(attachments_json),
        );
    }

    if let Some(tags) = &volume.tags {
        json.insert("Tags".to_string(), tags_to_json(tags));
    }

    serde_json::Value::Object(json)
}

fn snapshot_to_json(snapshot: &ec2::types::Snapshot) -> serde_json::Value {
    let mut json = serde_json::Map::new();

    if let Some(snapshot_id) = &snapshot.snapshot_id {
        json.insert(
            "SnapshotId".to_string(),
            serde_json::Value::String(snapshot_id.clone()),
        );
    }

    if let Some(volume_id) = &snapshot.volume_id {
        json.insert(
            "VolumeId".to_string(),
            serde_json::Value::String(volume_id.clone()),
        );
    }

    if let Some(state) = &snapshot.state {
        json.insert(
            "State".to_string(),
            serde_json::Value::String(state.as_str().to_string()),
        );
    }

    if let Some(start_time) = snapshot.start_time.as_ref().and_then(timestamp_to_json) {
        json.insert("StartTime".to_string(), start_time);
    }

    if let Some(description) = &snapshot.description {
        json.insert(
            "Description".to_string(),
            serde_json::Value::String(description.clone()),
        );
    }

    if let Some(volume_size) = snapshot.volume_size {
        json.insert(
            "VolumeSize".to_string(),
            serde_json::Value::Number(volume_size.into()),
        );
    }

    if let Some(tags) = &snapshot.tags {
        json.insert("Tags".to_string(), tags_to_json(tags));
    }

    serde_json::Value::Object(json)
}

fn tags_to_json(tags: &[ec2::types::Tag]) -> serde_json::Value {
    let tags_json = tags
        .iter()
        .map(|tag| {
            let mut tag_json = serde_json::Map::new();
            if let Some(key) = &tag.key {
                tag_json.insert("Key".to_string(), serde_json::Value::String(key.clone()));
            }
            if let Some(value) = &tag.value {
                tag_json.insert("Value".to_string(), serde_json::Value::String(value.clone()));
            }
            serde_json::Value::Object(tag_json)
        })
        .collect();
    serde_json::Value::Array(tags_json)
}
