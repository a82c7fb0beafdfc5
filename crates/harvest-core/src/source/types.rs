//! Wire types of the remote wage search endpoint.

use serde::{Deserialize, Serialize};

/// One opaque result row; passed through to snapshots untouched.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// JSON body POSTed for every page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub op: String,
    pub page: u32,
    pub rows: u32,
    pub sidx: String,
    pub sord: String,
    pub count: u32,
    pub year: String,
    pub firstname: String,
    pub location: String,
    pub lastname: String,
    pub title: String,
    pub start_sal: String,
    pub end_sal: String,
}

impl PageRequest {
    /// Search for every row of `location` in `year`, sorted by last name.
    pub fn search(location: &str, year: i32, page: u32, rows: u32) -> Self {
        Self {
            op: "search".to_string(),
            page,
            rows,
            sidx: "lastname".to_string(),
            sord: "asc".to_string(),
            count: 0,
            year: year.to_string(),
            firstname: String::new(),
            location: location.to_string(),
            lastname: String::new(),
            title: String::new(),
            start_sal: String::new(),
            end_sal: String::new(),
        }
    }
}

/// One page of results. `records` is the total available across all pages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageResponse {
    #[serde(default)]
    pub records: u64,
    #[serde(default)]
    pub page: u64,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub rows: Vec<Record>,
}
