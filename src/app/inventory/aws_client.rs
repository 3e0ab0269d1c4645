use super::aws_services::{backup as backup_pages, ec2 as ec2_pages};
use super::error::{transport_error, InventoryError};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_backup as backup;
use aws_sdk_ec2 as ec2;
use futures::stream::{self, BoxStream, StreamExt};
use serde::Serialize;
use std::fmt;

/// One batch of raw results in the provider's wire shape, e.g.
/// `{"Volumes": [...], "NextToken": "..."}`
pub type Page = serde_json::Value;

/// Native page cursor of a listing operation
pub type PageCursor<'a> = BoxStream<'a, Result<Page, InventoryError>>;

/// Page key carrying the continuation token
pub const NEXT_TOKEN_KEY: &str = "NextToken";

/// Read-only listing operations used by the audit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListOperation {
    DescribeInstances,
    DescribeVolumes,
    DescribeSnapshots,
    ListBackupJobs,
}

impl ListOperation {
    pub fn service(&self) -> &'static str {
        match self {
            ListOperation::DescribeInstances
            | ListOperation::DescribeVolumes
            | ListOperation::DescribeSnapshots => "ec2",
            ListOperation::ListBackupJobs => "backup",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ListOperation::DescribeInstances => "DescribeInstances",
            ListOperation::DescribeVolumes => "DescribeVolumes",
            ListOperation::DescribeSnapshots => "DescribeSnapshots",
            ListOperation::ListBackupJobs => "ListBackupJobs",
        }
    }

    /// Top-level page key holding the result collection
    pub fn result_key(&self) -> &'static str {
        match self {
            ListOperation::DescribeInstances => "Reservations",
            ListOperation::DescribeVolumes => "Volumes",
            ListOperation::DescribeSnapshots => "Snapshots",
            ListOperation::ListBackupJobs => "BackupJobs",
        }
    }
}

impl fmt::Display for ListOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.service(), self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Filter {
    pub name: String,
    pub values: Vec<String>,
}

/// Request parameters of a listing call.
///
/// Passed through to the provider as-is; nothing here is validated locally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListParams {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Filter>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub owner_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub by_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl ListParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters.push(Filter {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn owner_id(mut self, owner: impl Into<String>) -> Self {
        self.owner_ids.push(owner.into());
        self
    }

    pub fn by_state(mut self, state: impl Into<String>) -> Self {
        self.by_state = Some(state.into());
        self
    }

    /// Original params plus a continuation token
    pub fn with_next_token(&self, token: impl Into<String>) -> Self {
        Self {
            next_token: Some(token.into()),
            ..self.clone()
        }
    }
}

/// Read access to the provider's listing operations.
///
/// Implementations expose both a single request/response call and the native cursor of an
/// operation; which one is used is decided by the caller through
/// [`super::pagination::PaginationStrategy`].
#[async_trait]
pub trait ResourceApi: Send + Sync {
    /// Issue one listing request and return its page
    async fn list_page(&self, operation: ListOperation, params: &ListParams)
        -> Result<Page, InventoryError>;

    /// Open the native paginator of `operation`
    fn page_cursor(&self, operation: ListOperation, params: &ListParams) -> PageCursor<'_>;
}

/// [`ResourceApi`] backed by the AWS SDK clients
#[derive(Debug, Clone)]
pub struct AwsResourceApi {
    ec2: ec2::Client,
    backup: backup::Client,
}

impl AwsResourceApi {
    /// Build clients from the ambient AWS environment (profile, region, credentials chain)
    pub async fn from_env() -> Self {
        let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        Self::from_conf(&aws_config)
    }

    pub fn from_conf(aws_config: &aws_config::SdkConfig) -> Self {
        Self {
            ec2: ec2::Client::new(aws_config),
            backup: backup::Client::new(aws_config),
        }
    }
}

fn ec2_filters(params: &ListParams) -> Option<Vec<ec2::types::Filter>> {
    if params.filters.is_empty() {
        return None;
    }

    Some(
        params
            .filters
            .iter()
            .map(|filter| {
                ec2::types::Filter::builder()
                    .name(&filter.name)
                    .set_values(Some(filter.values.clone()))
                    .build()
            })
            .collect(),
    )
}

fn owner_ids(params: &ListParams) -> Option<Vec<String>> {
    (!params.owner_ids.is_empty()).then(|| params.owner_ids.clone())
}

/// Drive an SDK pagination stream as a futures `Stream`
macro_rules! sdk_cursor {
    ($operation:expr, $paginator:expr, $to_page:path) => {{
        let operation = $operation;
        stream::unfold($paginator, |mut pages| async move {
            pages.next().await.map(|page| (page, pages))
        })
        .map(move |page| {
            page.map(|output| $to_page(&output))
                .map_err(|err| transport_error(operation, err))
        })
        .boxed()
    }};
}

#[async_trait]
impl ResourceApi for AwsResourceApi {
    async fn list_page(
        &self,
        operation: ListOperation,
        params: &ListParams,
    ) -> Result<Page, InventoryError> {
        tracing::debug!("{} request: {:?}", operation, params);

        let page = match operation {
            ListOperation::DescribeInstances => {
                let output = self
                    .ec2
                    .describe_instances()
                    .set_filters(ec2_filters(params))
                    .set_next_token(params.next_token.clone())
                    .send()
                    .await
                    .map_err(|err| transport_error(operation, err))?;
                ec2_pages::describe_instances_to_page(&output)
            }
            ListOperation::DescribeVolumes => {
                let output = self
                    .ec2
                    .describe_volumes()
                    .set_filters(ec2_filters(params))
                    .set_next_token(params.next_token.clone())
                    .send()
                    .await
                    .map_err(|err| transport_error(operation, err))?;
                ec2_pages::describe_volumes_to_page(&output)
            }
            ListOperation::DescribeSnapshots => {
                let output = self
                    .ec2
                    .describe_snapshots()
                    .set_filters(ec2_filters(params))
                    .set_owner_ids(owner_ids(params))
                    .set_next_token(params.next_token.clone())
                    .send()
                    .await
                    .map_err(|err| transport_error(operation, err))?;
                ec2_pages::describe_snapshots_to_page(&output)
            }
            ListOperation::ListBackupJobs => {
                let output = self
                    .backup
                    .list_backup_jobs()
                    .set_by_state(
                        params
                            .by_state
                            .as_deref()
                            .map(backup::types::BackupJobState::from),
                    )
                    .set_next_token(params.next_token.clone())
                    .send()
                    .await
                    .map_err(|err| transport_error(operation, err))?;
                backup_pages::list_backup_jobs_to_page(&output)
            }
        };

        Ok(page)
    }

    fn page_cursor(&self, operation: ListOperation, params: &ListParams) -> PageCursor<'_> {
        tracing::debug!("{} paginator: {:?}", operation, params);

        match operation {
            ListOperation::DescribeInstances => sdk_cursor!(
                operation,
                self.ec2
                    .describe_instances()
                    .set_filters(ec2_filters(params))
                    .into_paginator()
                    .send(),
                ec2_pages::describe_instances_to_page
            ),
            ListOperation::DescribeVolumes => sdk_cursor!(
                operation,
                self.ec2
                    .describe_volumes()
                    .set_filters(ec2_filters(params))
                    .into_paginator()
                    .send(),
                ec2_pages::describe_volumes_to_page
            ),
            ListOperation::DescribeSnapshots => sdk_cursor!(
                operation,
                self.ec2
                    .describe_snapshots()
                    .set_filters(ec2_filters(params))
                    .set_owner_ids(owner_ids(params))
                    .into_paginator()
                    .send(),
                ec2_pages::describe_snapshots_to_page
            ),
            ListOperation::ListBackupJobs => sdk_cursor!(
                operation,
                self.backup
                    .list_backup_jobs()
                    .set_by_state(
                        params
                            .by_state
                            .as_deref()
                            .map(backup::types::BackupJobState::from),
                    )
                    .into_paginator()
                    .send(),
                backup_pages::list_backup_jobs_to_page
            ),
        }
    }
}
