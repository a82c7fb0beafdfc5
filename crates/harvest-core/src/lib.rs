pub mod config;
pub mod logging;

pub mod ledger;
pub mod sanitize;
pub mod scheduler;
pub mod snapshot;
pub mod source;
pub mod storage;
pub mod task;
