//! Sequential page walk for one task.

use std::time::Duration;

use super::error::FetchError;
use super::types::Record;
use super::PageSource;
use crate::task::Task;

/// Fetches every page for `task`, starting at page 1.
///
/// Stops when a page has no rows or the collected count reaches the
/// source-reported total. Sleeps `delay` between page requests. Any page
/// error aborts the task and discards the pages collected so far.
pub fn fetch_all(
    source: &dyn PageSource,
    task: &Task,
    delay: Duration,
) -> Result<Vec<Record>, FetchError> {
    let mut records: Vec<Record> = Vec::new();
    let mut page = 1u32;

    loop {
        let resp = source.fetch_page(task, page)?;
        if resp.rows.is_empty() {
            break;
        }

        records.extend(resp.rows);
        tracing::trace!(task = %task, page, collected = records.len(), total = resp.records, "page fetched");

        if records.len() as u64 >= resp.records {
            break;
        }

        page += 1;
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }

    Ok(records)
}
