//! Reconciliation engine
//!
//! Two passes over freshly fetched episodes. Scheduled episodes are
//! synchronized against the task tracker (create missing tasks, patch
//! stale ones). Non-scheduled episodes are deduplicated against the
//! persisted seen state (create a task and a chat notification for each
//! genuinely new chapter, then rewrite the per-source snapshot).
//!
//! Both passes batch-fetch their lookups before deciding anything and
//! await every side effect before returning. Pure decision logic never
//! suspends.

use futures::future::join_all;
use std::future::Future;

use crate::error::Result;

pub mod non_scheduled;
pub mod scheduled;

pub use non_scheduled::reconcile_non_scheduled;
pub use scheduled::reconcile_scheduled;

/// Flags controlling one reconciliation pass
#[derive(Debug, Clone, Copy, Default)]
pub struct RunMode {
    /// Treat every episode as new and relax date filtering. Set by the
    /// single-source backfill; never notifies chat.
    pub assume_new: bool,
    /// Run the full decision logic and log intended actions, but
    /// suppress every external write
    pub dry_run: bool,
}

/// Await a concurrent batch of calls, yielding the collected results or
/// the first failure by batch order. Every call runs to completion: a
/// failure aborts the pass but never cancels siblings already in flight.
pub(crate) async fn join_batch<T>(
    calls: impl IntoIterator<Item = impl Future<Output = Result<T>>>,
) -> Result<Vec<T>> {
    join_all(calls).await.into_iter().collect()
}
