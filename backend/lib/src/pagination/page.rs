//! Page assembly over a record source.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tracing::debug;

use super::{
    error::PaginationError,
    filter::Filter,
    predicate::cursor_predicate,
    sort::SortSpec,
    token,
    value::FieldAccess,
};

const LOG_TARGET: &str = "pagination";

/// Anything able to run an ordered, filtered, limited read of `R` records.
///
/// Implementations must return records matching `filter`, ordered by
/// `order_by`, at most `limit` of them. The read is expected to be a single
/// atomic query; cancellation and timeouts surface as `Self::Error`.
#[async_trait]
pub trait RecordSource<R: Send>: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn find(
        &self,
        filter: Filter,
        order_by: &SortSpec,
        limit: i64,
    ) -> Result<Vec<R>, Self::Error>;
}

#[async_trait]
impl<R, S> RecordSource<R> for Arc<S>
where
    R: Send + 'static,
    S: RecordSource<R> + ?Sized,
{
    type Error = S::Error;

    async fn find(
        &self,
        filter: Filter,
        order_by: &SortSpec,
        limit: i64,
    ) -> Result<Vec<R>, Self::Error> {
        (**self).find(filter, order_by, limit).await
    }
}

/// One page of results.
///
/// `next_token` is present exactly when `has_next` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_token: Option<String>,
    pub has_next: bool,
}

impl<T> Page<T> {
    /// Converts the items, keeping the position information.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            next_token: self.next_token,
            has_next: self.has_next,
        }
    }
}

/// Bounds applied to every paginated query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    /// Largest accepted page size
    pub max_limit: i64,
    /// Deadline for the record source read, if any
    pub query_timeout: Option<Duration>,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            max_limit: 100,
            query_timeout: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("record source did not answer within {0:?}")]
struct QueryTimeout(Duration);

/// Runs paginated queries against a record source.
///
/// Stateless apart from its configuration: concurrent calls are independent and
/// every call is a single read of the source.
#[derive(Debug, Clone)]
pub struct PageAssembler<S> {
    source: S,
    limits: PageLimits,
}

impl<S> PageAssembler<S> {
    pub fn new(source: S, limits: PageLimits) -> Self {
        Self { source, limits }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn limits(&self) -> PageLimits {
        self.limits
    }

    /// Fetches the page after `token` (or the first page) under `sort`.
    ///
    /// `filter` restricts the records considered; it is combined with the cursor
    /// condition so it can narrow but never widen the page. Invalid limits and
    /// tokens are rejected before the source is queried.
    pub async fn fetch_page<R>(
        &self,
        sort: &SortSpec,
        filter: Filter,
        token: Option<&str>,
        limit: i64,
    ) -> Result<Page<R>, PaginationError>
    where
        S: RecordSource<R>,
        R: FieldAccess + Send,
    {
        let invalid_limit = || PaginationError::InvalidLimit {
            limit,
            max: self.limits.max_limit,
        };
        if limit < 1 || limit > self.limits.max_limit {
            return Err(invalid_limit());
        }
        // one extra record tells whether a next page exists
        let fetch_limit = limit.checked_add(1).ok_or_else(invalid_limit)?;

        let filter = match token {
            Some(encoded) => {
                let cursor = token::decode(sort, encoded)?;
                filter.and(cursor_predicate(sort, &cursor)?)
            }
            None => filter,
        };

        let query = self.source.find(filter, sort, fetch_limit);
        let mut items = match self.limits.query_timeout {
            Some(deadline) => tokio::time::timeout(deadline, query)
                .await
                .map_err(|_| PaginationError::record_source(QueryTimeout(deadline)))?,
            None => query.await,
        }
        .map_err(PaginationError::record_source)?;

        // a source returning more than asked for still yields a full page
        let has_next = items.len() > limit as usize;
        items.truncate(limit as usize);

        let next_token = match (has_next, items.last()) {
            (true, Some(last)) => Some(token::encode(sort, last)?),
            _ => None,
        };

        debug!(
            target: LOG_TARGET,
            sort = %sort.signature(),
            limit,
            cursor = token.is_some(),
            returned = items.len(),
            has_next,
            "Assembled page"
        );

        Ok(Page {
            items,
            next_token,
            has_next,
        })
    }
}
