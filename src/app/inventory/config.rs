//! Source-level report configuration.
//!
//! The audit has no runtime configuration surface: which classification labels are audited
//! and which backup job state is listed are fixed here.

/// Tag carrying the data classification label of an instance or volume
pub const CLASSIFICATION_TAG_KEY: &str = "DataType";

/// Tag carrying the display name of a resource
pub const NAME_TAG_KEY: &str = "Name";

/// Classification labels in use across the fleet
pub const KNOWN_CLASSIFICATIONS: &[&str] = &["HIPAA", "IRIS_HIPAA", "IRIS_NON_HIPAA", "NON_HIPAA"];

/// Labels audited by default (non-regulated data only)
pub const DEFAULT_CLASSIFICATIONS: &[&str] = &["NON_HIPAA"];

/// Backup job state listed in the backup section of the report
pub const DEFAULT_BACKUP_JOB_STATE: &str = "FAILED";

/// Snapshot owner filter restricting snapshots to the caller's own account
pub const SNAPSHOT_OWNER_SELF: &str = "self";

/// Display format for snapshot start dates in the correlated report
pub const SNAPSHOT_DATE_FORMAT: &str = "%m/%d/%Y";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    pub classification_allow_list: Vec<String>,
    pub backup_job_state: String,
    pub classification_tag_key: String,
    pub name_tag_key: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            classification_allow_list: DEFAULT_CLASSIFICATIONS
                .iter()
                .map(|label| label.to_string())
                .collect(),
            backup_job_state: DEFAULT_BACKUP_JOB_STATE.to_string(),
            classification_tag_key: CLASSIFICATION_TAG_KEY.to_string(),
            name_tag_key: NAME_TAG_KEY.to_string(),
        }
    }
}

impl ReportConfig {
    /// Audit a different set of classification labels
    pub fn with_classifications<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.classification_allow_list = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_backup_job_state(mut self, state: impl Into<String>) -> Self {
        self.backup_job_state = state.into();
        self
    }
}
