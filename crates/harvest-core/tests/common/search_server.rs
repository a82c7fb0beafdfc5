//! Minimal HTTP/1.1 server imitating the wage search endpoint for integration tests.
//!
//! Accepts the JSON POST body, pages through a fixed number of synthetic rows
//! per location, and logs every (location, page) it served.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Debug, Clone, Default)]
pub struct SearchServerOptions {
    /// Total rows available per location (any year).
    pub rows_per_location: HashMap<String, usize>,
    /// Locations answered with this HTTP status instead of data.
    pub failing_locations: HashMap<String, u16>,
}

/// Handle returned by [`start`]: base URL plus the request log.
pub struct SearchServer {
    pub url: String,
    requests: Arc<Mutex<Vec<(String, u64)>>>,
}

impl SearchServer {
    /// Every (location, page) served so far, in arrival order.
    pub fn requests(&self) -> Vec<(String, u64)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_for(&self, location: &str) -> Vec<u64> {
        self.requests()
            .into_iter()
            .filter(|(l, _)| l == location)
            .map(|(_, p)| p)
            .collect()
    }
}

/// Starts the server in a background thread. It runs until the process exits.
pub fn start(opts: SearchServerOptions) -> SearchServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&requests);
    let opts = Arc::new(opts);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let opts = Arc::clone(&opts);
            let log = Arc::clone(&log);
            thread::spawn(move || handle(stream, &opts, &log));
        }
    });
    SearchServer {
        url: format!("http://127.0.0.1:{}/wage/search", port),
        requests,
    }
}

fn handle(
    mut stream: std::net::TcpStream,
    opts: &SearchServerOptions,
    log: &Mutex<Vec<(String, u64)>>,
) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));

    let Some(body) = read_body(&mut stream) else {
        return;
    };
    let Ok(req) = serde_json::from_slice::<serde_json::Value>(&body) else {
        let _ = stream.write_all(b"HTTP/1.1 400 Bad Request\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        return;
    };

    let location = req["location"].as_str().unwrap_or_default().to_string();
    let page = req["page"].as_u64().unwrap_or(1);
    let rows = req["rows"].as_u64().unwrap_or(100) as usize;
    log.lock().unwrap().push((location.clone(), page));

    if let Some(status) = opts.failing_locations.get(&location) {
        let response = format!(
            "HTTP/1.1 {} Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            status
        );
        let _ = stream.write_all(response.as_bytes());
        return;
    }

    let total = opts.rows_per_location.get(&location).copied().unwrap_or(0);
    let start = ((page.max(1) - 1) as usize * rows).min(total);
    let end = (start + rows).min(total);
    let page_rows: Vec<serde_json::Value> = (start..end)
        .map(|i| {
            serde_json::json!({
                "id": i,
                "location": location,
                "year": req["year"],
                "lastname": format!("Name{:05}", i),
            })
        })
        .collect();
    let payload = serde_json::json!({
        "records": total,
        "page": page,
        "total": total.div_ceil(rows.max(1)),
        "rows": page_rows,
    })
    .to_string();

    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        payload.len(),
        payload
    );
    let _ = stream.write_all(response.as_bytes());
}

/// Read headers, then exactly `Content-Length` body bytes.
fn read_body(stream: &mut std::net::TcpStream) -> Option<Vec<u8>> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let headers = std::str::from_utf8(&buf[..header_end]).ok()?;
    let content_length = headers
        .lines()
        .filter_map(|l| l.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    Some(buf[header_end..].to_vec())
}
