//! Tests for the run subcommand and its config overrides.

use super::parse;
use crate::cli::commands::{pipeline_config, RunOverrides};
use crate::cli::CliCommand;
use harvest_core::config::HarvestConfig;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[test]
fn cli_parse_run_defaults() {
    match parse(&["harvest", "run"]) {
        CliCommand::Run {
            workers,
            delay,
            data_dir,
            locations,
            years,
            reset,
        } => {
            assert!(workers.is_none());
            assert!(delay.is_none());
            assert!(data_dir.is_none());
            assert!(locations.is_none());
            assert!(years.is_none());
            assert!(!reset);
        }
        _ => panic!("expected Run"),
    }
}

#[test]
fn cli_parse_run_all_flags() {
    match parse(&[
        "harvest",
        "run",
        "--workers",
        "8",
        "--delay",
        "0.25",
        "--data-dir",
        "/tmp/wages",
        "--locations",
        "Davis,UC SF Law",
        "--years",
        "2020,2021",
        "--reset",
    ]) {
        CliCommand::Run {
            workers,
            delay,
            data_dir,
            locations,
            years,
            reset,
        } => {
            assert_eq!(workers, Some(8));
            assert_eq!(delay, Some(0.25));
            assert_eq!(data_dir.as_deref(), Some(Path::new("/tmp/wages")));
            assert_eq!(locations.as_deref(), Some("Davis,UC SF Law"));
            assert_eq!(years.as_deref(), Some("2020,2021"));
            assert!(reset);
        }
        _ => panic!("expected Run with flags"),
    }
}

#[test]
fn overrides_replace_config_values() {
    let cfg = HarvestConfig::default();
    let pipeline = pipeline_config(
        &cfg,
        RunOverrides {
            workers: Some(2),
            delay: Some(0.5),
            data_dir: Some(PathBuf::from("/tmp/out")),
            locations: Some("Davis, Merced".to_string()),
            years: Some("2020,2005,2021".to_string()),
        },
    )
    .unwrap();
    assert_eq!(pipeline.workers, 2);
    assert_eq!(pipeline.delay, Duration::from_millis(500));
    assert_eq!(pipeline.data_dir, PathBuf::from("/tmp/out"));
    assert_eq!(pipeline.partition_keys, vec!["Davis", "Merced"]);
    assert_eq!(pipeline.periods, vec![2020, 2021]);
}

#[test]
fn no_overrides_keep_config() {
    let cfg = HarvestConfig::default();
    let pipeline = pipeline_config(&cfg, RunOverrides::default()).unwrap();
    assert_eq!(pipeline.workers, cfg.workers);
    assert_eq!(pipeline.partition_keys, cfg.locations);
    assert_eq!(pipeline.periods, cfg.years);
    assert_eq!(pipeline.data_dir, cfg.data_dir);
}

#[test]
fn negative_delay_is_rejected() {
    let cfg = HarvestConfig::default();
    let overrides = RunOverrides {
        delay: Some(-1.0),
        ..RunOverrides::default()
    };
    assert!(pipeline_config(&cfg, overrides).is_err());
}

#[test]
fn oversized_delay_is_rejected() {
    let cfg = HarvestConfig::default();
    for delay in [1e20, f64::INFINITY, f64::NAN] {
        let overrides = RunOverrides {
            delay: Some(delay),
            ..RunOverrides::default()
        };
        assert!(pipeline_config(&cfg, overrides).is_err(), "delay {}", delay);
    }
}
