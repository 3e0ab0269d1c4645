//! One lazy page sequence over either pagination style.
//!
//! Operations with a native paginator are consumed through [`ResourceApi::page_cursor`];
//! everything else is driven by re-issuing the request with the `NextToken` of the previous
//! page. Callers choose the strategy per operation and consume pages with
//! [`Pages::try_next`], one outbound call per page pulled.

use super::aws_client::{ListOperation, ListParams, Page, PageCursor, ResourceApi, NEXT_TOKEN_KEY};
use super::error::InventoryError;
use futures::StreamExt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationStrategy {
    /// Forward the pages of the client's native paginator unchanged
    CursorPaginated,
    /// Loop on the continuation token by hand
    ManualTokenPaginated,
}

/// Lazy, finite sequence of raw pages for one operation and parameter set
pub struct Pages<'a> {
    operation: ListOperation,
    inner: PagesInner<'a>,
    served: usize,
}

enum PagesInner<'a> {
    Cursor(PageCursor<'a>),
    Manual {
        api: &'a dyn ResourceApi,
        params: ListParams,
        state: ManualState,
    },
}

enum ManualState {
    First,
    Continue(String),
    Done,
}

/// Open the page sequence of `operation`
pub fn paginate<'a>(
    api: &'a dyn ResourceApi,
    operation: ListOperation,
    strategy: PaginationStrategy,
    params: ListParams,
) -> Pages<'a> {
    let inner = match strategy {
        PaginationStrategy::CursorPaginated => PagesInner::Cursor(api.page_cursor(operation, &params)),
        PaginationStrategy::ManualTokenPaginated => PagesInner::Manual {
            api,
            params,
            state: ManualState::First,
        },
    };

    Pages {
        operation,
        inner,
        served: 0,
    }
}

impl<'a> Pages<'a> {
    /// Pull the next page; `Ok(None)` once the result set is exhausted.
    ///
    /// A failed call ends the sequence.
    pub async fn try_next(&mut self) -> Result<Option<Page>, InventoryError> {
        let next = match &mut self.inner {
            PagesInner::Cursor(cursor) => cursor.next().await.transpose(),
            PagesInner::Manual { api, params, state } => {
                let request = match std::mem::replace(state, ManualState::Done) {
                    ManualState::First => params.clone(),
                    ManualState::Continue(token) => params.with_next_token(token),
                    ManualState::Done => return Ok(None),
                };

                let page = api.list_page(self.operation, &request).await?;
                if let Some(token) = page.get(NEXT_TOKEN_KEY).and_then(|t| t.as_str()) {
                    *state = ManualState::Continue(token.to_string());
                }
                Ok(Some(page))
            }
        };

        match next {
            Ok(Some(page)) => {
                self.served += 1;
                Ok(Some(page))
            }
            Ok(None) => Ok(None),
            Err(err) => {
                self.finish();
                Err(err)
            }
        }
    }

    /// Number of pages handed out so far
    pub fn pages_served(&self) -> usize {
        self.served
    }

    pub fn operation(&self) -> ListOperation {
        self.operation
    }

    fn finish(&mut self) {
        match &mut self.inner {
            PagesInner::Cursor(cursor) => *cursor = futures::stream::empty().boxed(),
            PagesInner::Manual { state, .. } => *state = ManualState::Done,
        }
    }

    /// Drain every remaining page
    pub async fn collect_pages(mut self) -> Result<Vec<Page>, InventoryError> {
        let mut pages = Vec::new();
        while let Some(page) = self.try_next().await? {
            pages.push(page);
        }
        Ok(pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::inventory::error::ErrorCategory;
    use crate::app::inventory::mock::MockResourceApi;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn volume_pages(count: usize) -> Vec<Page> {
        (0..count)
            .map(|n| json!({"Volumes": [{"VolumeId": format!("vol-{}", n), "State": "in-use"}]}))
            .collect()
    }

    fn strip_tokens(pages: Vec<Page>) -> Vec<Page> {
        pages
            .into_iter()
            .map(|mut page| {
                if let Some(map) = page.as_object_mut() {
                    map.remove(NEXT_TOKEN_KEY);
                }
                page
            })
            .collect()
    }

    #[tokio::test]
    async fn test_manual_pagination_stops_after_last_token() {
        let api = MockResourceApi::new().with_pages(ListOperation::DescribeVolumes, volume_pages(3));

        let mut pages = paginate(
            &api,
            ListOperation::DescribeVolumes,
            PaginationStrategy::ManualTokenPaginated,
            ListParams::new(),
        );
        let mut count = 0;
        while pages.try_next().await.unwrap().is_some() {
            count += 1;
        }

        assert_eq!(count, 3);
        assert_eq!(pages.pages_served(), 3);
        assert_eq!(api.request_count(ListOperation::DescribeVolumes), 3);
        // exhausted sequences stay exhausted without further calls
        assert!(pages.try_next().await.unwrap().is_none());
        assert_eq!(api.request_count(ListOperation::DescribeVolumes), 3);
    }

    #[tokio::test]
    async fn test_manual_pagination_merges_token_with_original_params() {
        let api = MockResourceApi::new().with_pages(ListOperation::ListBackupJobs, vec![
            json!({"BackupJobs": []}),
            json!({"BackupJobs": []}),
        ]);

        let params = ListParams::new().by_state("FAILED");
        paginate(
            &api,
            ListOperation::ListBackupJobs,
            PaginationStrategy::ManualTokenPaginated,
            params.clone(),
        )
        .collect_pages()
        .await
        .unwrap();

        let requests = api.requests(ListOperation::ListBackupJobs);
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0], params);
        assert_eq!(requests[1].by_state.as_deref(), Some("FAILED"));
        assert!(requests[1].next_token.is_some());
    }

    #[tokio::test]
    async fn test_single_page_without_token() {
        let api = MockResourceApi::new().with_pages(ListOperation::DescribeSnapshots, volume_pages(1));
        let pages = paginate(
            &api,
            ListOperation::DescribeSnapshots,
            PaginationStrategy::ManualTokenPaginated,
            ListParams::new(),
        )
        .collect_pages()
        .await
        .unwrap();
        assert_eq!(pages.len(), 1);
    }

    #[tokio::test]
    async fn test_cursor_and_manual_yield_same_records() {
        let api = MockResourceApi::new().with_pages(ListOperation::DescribeVolumes, volume_pages(4));

        let cursor = paginate(
            &api,
            ListOperation::DescribeVolumes,
            PaginationStrategy::CursorPaginated,
            ListParams::new(),
        )
        .collect_pages()
        .await
        .unwrap();
        let manual = paginate(
            &api,
            ListOperation::DescribeVolumes,
            PaginationStrategy::ManualTokenPaginated,
            ListParams::new(),
        )
        .collect_pages()
        .await
        .unwrap();

        assert_eq!(strip_tokens(cursor), strip_tokens(manual));
    }

    #[tokio::test]
    async fn test_cursor_does_not_use_request_calls() {
        let api = MockResourceApi::new().with_pages(ListOperation::DescribeInstances, vec![
            json!({"Reservations": []}),
            json!({"Reservations": []}),
        ]);

        let pages = paginate(
            &api,
            ListOperation::DescribeInstances,
            PaginationStrategy::CursorPaginated,
            ListParams::new(),
        )
        .collect_pages()
        .await
        .unwrap();

        assert_eq!(pages.len(), 2);
        assert_eq!(api.cursor_count(ListOperation::DescribeInstances), 1);
        assert_eq!(api.request_count(ListOperation::DescribeInstances), 0);
    }

    #[tokio::test]
    async fn test_failure_propagates_and_ends_sequence() {
        let api = MockResourceApi::new()
            .with_pages(ListOperation::DescribeVolumes, volume_pages(3))
            .failing_at(ListOperation::DescribeVolumes, 1, ErrorCategory::Throttled);

        for strategy in [
            PaginationStrategy::ManualTokenPaginated,
            PaginationStrategy::CursorPaginated,
        ] {
            let mut pages = paginate(&api, ListOperation::DescribeVolumes, strategy, ListParams::new());
            assert!(pages.try_next().await.unwrap().is_some());

            let err = pages.try_next().await.unwrap_err();
            assert!(err.is_transport());
            assert!(pages.try_next().await.unwrap().is_none());
            assert_eq!(pages.pages_served(), 1);
        }
    }

    #[tokio::test]
    async fn test_empty_backend_yields_one_empty_page() {
        let api = MockResourceApi::new();
        let pages = paginate(
            &api,
            ListOperation::DescribeVolumes,
            PaginationStrategy::ManualTokenPaginated,
            ListParams::new(),
        )
        .collect_pages()
        .await
        .unwrap();
        assert_eq!(pages, vec![json!({"Volumes": []})]);
    }
}
