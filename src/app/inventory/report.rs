use super::correlation::Inventory;
use super::state::{BackupJobRecord, ResourceMap};
use serde::Serialize;

/// Pretty-printed JSON in insertion order
pub fn render<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

pub fn emit_backup_jobs(backup_jobs: &ResourceMap<BackupJobRecord>) -> Result<(), serde_json::Error> {
    let rendered = render(backup_jobs)?;
    tracing::info!("{}", rendered);
    Ok(())
}

/// Log the instance-rooted tree with nested volumes and snapshots
pub fn emit_inventory(inventory: &Inventory) -> Result<(), serde_json::Error> {
    let rendered = render(&inventory.instances)?;
    tracing::info!("{}", rendered);
    Ok(())
}
