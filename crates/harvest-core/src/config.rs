use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Default search endpoint of the UC annual wage database.
pub const DEFAULT_API_URL: &str = "https://ucannualwage.ucop.edu/wage/search";

const DEFAULT_LOCATIONS: [&str; 13] = [
    "ASUCLA",
    "Berkeley",
    "Davis",
    "UC SF Law",
    "Irvine",
    "Los Angeles",
    "Merced",
    "Riverside",
    "San Diego",
    "San Francisco",
    "Santa Barbara",
    "Santa Cruz",
    "UCOP",
];

/// Global configuration loaded from `~/.config/harvest/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// Search endpoint receiving the paginated POST requests.
    pub api_url: String,
    /// Number of concurrent workers.
    pub workers: usize,
    /// Delay in seconds between page requests and between tasks, per worker.
    pub delay_secs: f64,
    /// Base output directory for snapshots and the progress ledger.
    pub data_dir: PathBuf,
    /// Rows requested per page.
    #[serde(default = "default_rows_per_page")]
    pub rows_per_page: u32,
    /// Whole-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Connect timeout in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Partition keys (campus locations) harvested when none are given on the command line.
    pub locations: Vec<String>,
    /// Periods (years) harvested when none are given on the command line.
    pub years: Vec<i32>,
    /// Lowest year accepted by `--years`.
    #[serde(default = "default_min_year")]
    pub min_year: i32,
    /// Highest year accepted by `--years`.
    #[serde(default = "default_max_year")]
    pub max_year: i32,
}

fn default_rows_per_page() -> u32 {
    100
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    15
}

fn default_min_year() -> i32 {
    2010
}

fn default_max_year() -> i32 {
    2024
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            workers: 5,
            delay_secs: 1.0,
            data_dir: PathBuf::from("data"),
            rows_per_page: default_rows_per_page(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            locations: DEFAULT_LOCATIONS.iter().map(|s| s.to_string()).collect(),
            years: (default_min_year()..=default_max_year()).rev().collect(),
            min_year: default_min_year(),
            max_year: default_max_year(),
        }
    }
}

impl HarvestConfig {
    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.api_url)
            .with_context(|| format!("invalid api_url: {}", self.api_url))?;
        if let Err(e) = Duration::try_from_secs_f64(self.delay_secs) {
            anyhow::bail!("invalid delay_secs {}: {}", self.delay_secs, e);
        }
        if self.rows_per_page == 0 {
            anyhow::bail!("rows_per_page must be at least 1");
        }
        if self.min_year > self.max_year {
            anyhow::bail!(
                "min_year ({}) is greater than max_year ({})",
                self.min_year,
                self.max_year
            );
        }
        Ok(())
    }

    /// Inter-request delay as a `Duration`. Values rejected by [`Self::validate`] map to zero.
    pub fn delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.delay_secs).unwrap_or(Duration::ZERO)
    }

    /// Settings for the HTTP page source.
    pub fn source_options(&self) -> SourceOptions {
        SourceOptions {
            api_url: self.api_url.clone(),
            rows_per_page: self.rows_per_page,
            timeout: Duration::from_secs(self.timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
        }
    }

    /// Build the scheduler's run configuration from this file-level config.
    pub fn pipeline(&self) -> PipelineConfig {
        PipelineConfig {
            workers: self.workers,
            delay: self.delay(),
            data_dir: self.data_dir.clone(),
            partition_keys: self.locations.clone(),
            periods: self.years.clone(),
        }
    }
}

/// Connection settings for [`crate::source::CurlSource`].
#[derive(Debug, Clone)]
pub struct SourceOptions {
    pub api_url: String,
    pub rows_per_page: u32,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for SourceOptions {
    fn default() -> Self {
        HarvestConfig::default().source_options()
    }
}

/// Explicit run configuration threaded into the scheduler.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Number of concurrent executors (clamped to at least 1 when the pool starts).
    pub workers: usize,
    /// Per-worker delay between page requests and between tasks.
    pub delay: Duration,
    /// Base output directory.
    pub data_dir: PathBuf,
    /// Partition keys to expand (outer loop).
    pub partition_keys: Vec<String>,
    /// Periods to expand (inner loop).
    pub periods: Vec<i32>,
}

impl PipelineConfig {
    /// Default ledger location inside the data directory.
    pub fn ledger_path(&self) -> PathBuf {
        self.data_dir.join(crate::ledger::LEDGER_FILE_NAME)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("harvest")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<HarvestConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = HarvestConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)
        .with_context(|| format!("read config: {}", path.display()))?;
    let cfg: HarvestConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}
