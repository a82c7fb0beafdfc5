//! Rate-limited paginated fetch client.
//!
//! A [`PageSource`] returns one page of search results; [`fetch_all`] walks
//! pages in order for one task with a fixed delay between requests.
//! The production source is [`CurlSource`] (libcurl, blocking); call
//! `fetch_all` from `spawn_blocking` when used from async code.

mod classify;
mod curl_source;
mod error;
mod paginate;
mod types;

pub use classify::{classify, classify_curl_error, classify_http_status, ErrorKind};
pub use curl_source::CurlSource;
pub use error::FetchError;
pub use paginate::fetch_all;
pub use types::{PageRequest, PageResponse, Record};

use crate::task::Task;

/// One page of the remote search for a task. Page numbers are 1-based.
pub trait PageSource: Send + Sync {
    fn fetch_page(&self, task: &Task, page: u32) -> Result<PageResponse, FetchError>;
}
