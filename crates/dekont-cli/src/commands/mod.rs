//! CLI subcommands.

pub mod batch;
pub mod check;
pub mod config;
pub mod detect;
pub mod rules;

use std::time::Duration;

/// Run blocking pipeline work off the async runtime, bounded by `timeout`.
///
/// Returns `Ok(None)` when the deadline passes first. The blocking task is
/// left to finish on its own thread.
pub(crate) async fn run_bounded<T, F>(timeout: Duration, task: F) -> anyhow::Result<Option<T>>
where
    F: FnOnce() -> dekont_core::Result<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::time::timeout(timeout, tokio::task::spawn_blocking(task)).await {
        Ok(joined) => Ok(Some(joined??)),
        Err(_) => Ok(None),
    }
}
