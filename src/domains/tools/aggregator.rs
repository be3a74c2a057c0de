//! External Data Aggregator - concurrent independent reads.
//!
//! All fetches handed to one call are polled together; none waits for another
//! to finish before starting. Results always come back in input order.

use std::future::Future;
use std::time::Duration;

use futures::future::{join_all, try_join_all};
use thiserror::Error;

/// Outcome of one external read: a value or the cause of its failure.
pub type FetchResult<T, E> = Result<T, E>;

/// A fetch did not settle within its time limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("fetch timed out after {0:?}")]
pub struct FetchTimeout(pub Duration);

/// Run every fetch concurrently and collect each outcome, in input order.
pub async fn gather_all<I, F, T, E>(fetches: I) -> Vec<FetchResult<T, E>>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T, E>>,
{
    join_all(fetches).await
}

/// Run every fetch concurrently; fail as a whole with the first failure.
///
/// The first fetch to fail (by completion, not by position) decides the
/// error, and the fetches still pending are dropped. On success the values
/// are in input order.
pub async fn gather_all_or_fail<I, F, T, E>(fetches: I) -> Result<Vec<T>, E>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T, E>>,
{
    try_join_all(fetches).await
}

/// Bound a fetch by a time limit; an elapsed fetch settles to `E`.
pub async fn with_timeout<F, T, E>(fetch: F, limit: Duration) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: From<FetchTimeout>,
{
    match tokio::time::timeout(limit, fetch).await {
        Ok(result) => result,
        Err(_) => Err(FetchTimeout(limit).into()),
    }
}
