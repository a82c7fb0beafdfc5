//! Production page source: JSON POST over libcurl.

use curl::easy::{Easy, List};

use super::error::FetchError;
use super::types::{PageRequest, PageResponse};
use super::PageSource;
use crate::config::SourceOptions;
use crate::task::Task;

/// Blocking HTTP source for the wage search endpoint.
/// A fresh `Easy` handle per page keeps the source `Sync` with no shared state.
#[derive(Debug, Clone)]
pub struct CurlSource {
    opts: SourceOptions,
}

impl CurlSource {
    pub fn new(opts: SourceOptions) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> &SourceOptions {
        &self.opts
    }
}

impl PageSource for CurlSource {
    fn fetch_page(&self, task: &Task, page: u32) -> Result<PageResponse, FetchError> {
        let request =
            PageRequest::search(&task.partition_key, task.period, page, self.opts.rows_per_page);
        let body = serde_json::to_vec(&request)?;

        let mut easy = Easy::new();
        easy.url(&self.opts.api_url)?;
        easy.post(true)?;
        easy.post_fields_copy(&body)?;
        easy.connect_timeout(self.opts.connect_timeout)?;
        easy.timeout(self.opts.timeout)?;

        let mut headers = List::new();
        headers.append("Content-Type: application/json")?;
        headers.append("Accept: application/json")?;
        easy.http_headers(headers)?;

        let mut response_body = Vec::new();
        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                response_body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(FetchError::Http(code));
        }

        Ok(serde_json::from_slice(&response_body)?)
    }
}
