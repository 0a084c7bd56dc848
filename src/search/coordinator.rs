// src/search/coordinator.rs
use super::extractor::{extract_job, SelectorTable};
use super::JobRecord;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::warn;

/// Card extractions allowed in flight at once.
const MAX_WORKERS: usize = 5;

/// Runs the extractor over at most `limit` fragments on the blocking pool.
///
/// Truncation happens before extraction: broken cards inside the taken
/// slice reduce the final count, and later well-formed cards are not pulled
/// in to compensate. One bad card never disturbs its siblings, every
/// dispatched task is joined before returning, and output order follows
/// completion, not input order.
pub async fn extract_all(
    table: Arc<SelectorTable>,
    fragments: Vec<String>,
    limit: usize,
) -> Vec<JobRecord> {
    let workers = Arc::new(Semaphore::new(MAX_WORKERS));
    let mut tasks = JoinSet::new();

    for fragment in fragments.into_iter().take(limit) {
        let permit = match Arc::clone(&workers).acquire_owned().await {
            Ok(permit) => permit,
            // The semaphore is never closed; bail rather than panic if it
            // somehow is.
            Err(_) => break,
        };
        let table = Arc::clone(&table);
        tasks.spawn_blocking(move || {
            let _permit = permit;
            extract_job(&table, &fragment)
        });
    }

    let mut records = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Ok(record)) => records.push(record),
            Ok(Err(e)) => warn!("Dropping job card: {}", e),
            Err(e) => warn!("Extraction task did not complete: {}", e),
        }
    }
    records
}
