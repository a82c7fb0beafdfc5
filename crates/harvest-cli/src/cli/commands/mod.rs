//! CLI command handlers. Each command is in its own file.

mod reset;
mod run;
mod status;

pub use reset::run_reset;
pub use run::{run_harvest, RunOverrides};
pub use status::run_status;

#[cfg(test)]
pub use run::pipeline_config;
