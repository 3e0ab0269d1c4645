//! In-memory [`ResourceApi`] serving scripted pages.
//!
//! Each operation gets a list of pages. The mock chains them with `NextToken` values on the
//! request/response path and streams the same pages on the cursor path, so both pagination
//! strategies see identical data. Every call is recorded for assertions, and a transport
//! failure can be injected at a given page index.

use super::aws_client::{ListOperation, ListParams, Page, PageCursor, ResourceApi, NEXT_TOKEN_KEY};
use super::error::{ErrorCategory, InventoryError};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
pub struct MockResourceApi {
    pages: HashMap<ListOperation, Vec<Page>>,
    failures: HashMap<ListOperation, (usize, ErrorCategory)>,
    requests: Mutex<Vec<(ListOperation, ListParams)>>,
    cursors: Mutex<Vec<(ListOperation, ListParams)>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn page_token(operation: ListOperation, index: usize) -> String {
    format!("{}-page-{}", operation.name(), index)
}

impl MockResourceApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the pages served for `operation`, without continuation tokens
    pub fn with_pages(mut self, operation: ListOperation, pages: Vec<Page>) -> Self {
        self.pages.insert(operation, pages);
        self
    }

    /// Fail the call that would serve page `index` of `operation`
    pub fn failing_at(mut self, operation: ListOperation, index: usize, category: ErrorCategory) -> Self {
        self.failures.insert(operation, (index, category));
        self
    }

    /// Pages as the provider would return them, chained by `NextToken`.
    /// An unscripted operation serves a single empty page.
    pub fn served_pages(&self, operation: ListOperation) -> Vec<Page> {
        let scripted = match self.pages.get(&operation) {
            Some(pages) if !pages.is_empty() => pages.clone(),
            _ => {
                let mut empty = serde_json::Map::new();
                empty.insert(
                    operation.result_key().to_string(),
                    serde_json::Value::Array(Vec::new()),
                );
                vec![serde_json::Value::Object(empty)]
            }
        };

        let last = scripted.len() - 1;
        scripted
            .into_iter()
            .enumerate()
            .map(|(index, mut page)| {
                if index < last {
                    if let Some(map) = page.as_object_mut() {
                        map.insert(
                            NEXT_TOKEN_KEY.to_string(),
                            serde_json::Value::String(page_token(operation, index + 1)),
                        );
                    }
                }
                page
            })
            .collect()
    }

    /// Request/response calls made for `operation`, in order
    pub fn requests(&self, operation: ListOperation) -> Vec<ListParams> {
        lock(&self.requests)
            .iter()
            .filter(|(op, _)| *op == operation)
            .map(|(_, params)| params.clone())
            .collect()
    }

    pub fn request_count(&self, operation: ListOperation) -> usize {
        self.requests(operation).len()
    }

    /// Params each native paginator of `operation` was opened with
    pub fn cursors(&self, operation: ListOperation) -> Vec<ListParams> {
        lock(&self.cursors)
            .iter()
            .filter(|(op, _)| *op == operation)
            .map(|(_, params)| params.clone())
            .collect()
    }

    pub fn cursor_count(&self, operation: ListOperation) -> usize {
        self.cursors(operation).len()
    }

    /// Every listing made against the mock, whichever path it used
    pub fn total_calls(&self) -> usize {
        lock(&self.requests).len() + lock(&self.cursors).len()
    }

    fn failure_at(&self, operation: ListOperation, index: usize) -> Option<InventoryError> {
        match self.failures.get(&operation) {
            Some((fail_index, category)) if *fail_index == index => Some(InventoryError::transport(
                operation,
                *category,
                format!("injected failure on page {}", index),
            )),
            _ => None,
        }
    }
}

#[async_trait]
impl ResourceApi for MockResourceApi {
    async fn list_page(
        &self,
        operation: ListOperation,
        params: &ListParams,
    ) -> Result<Page, InventoryError> {
        lock(&self.requests).push((operation, params.clone()));

        let index = match &params.next_token {
            None => 0,
            Some(token) => token
                .strip_prefix(&format!("{}-page-", operation.name()))
                .and_then(|n| n.parse::<usize>().ok())
                .ok_or_else(|| {
                    InventoryError::transport(
                        operation,
                        ErrorCategory::Other,
                        format!("invalid NextToken {}", token),
                    )
                })?,
        };

        if let Some(err) = self.failure_at(operation, index) {
            return Err(err);
        }

        self.served_pages(operation)
            .into_iter()
            .nth(index)
            .ok_or_else(|| {
                InventoryError::transport(
                    operation,
                    ErrorCategory::Other,
                    format!("NextToken points past page {}", index),
                )
            })
    }

    fn page_cursor(&self, operation: ListOperation, params: &ListParams) -> PageCursor<'_> {
        lock(&self.cursors).push((operation, params.clone()));

        let mut items = Vec::new();
        for (index, page) in self.served_pages(operation).into_iter().enumerate() {
            if let Some(err) = self.failure_at(operation, index) {
                items.push(Err(err));
                break;
            }
            items.push(Ok(page));
        }

        stream::iter(items).boxed()
    }
}
