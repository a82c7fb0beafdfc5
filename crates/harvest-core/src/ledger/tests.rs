//! Tests for the progress ledger (file-backed, temp dirs).

use std::sync::Arc;

use crate::ledger::{LedgerFile, ProgressLedger, RECENT_LIMIT};
use crate::task::Task;

fn ledger_in(dir: &tempfile::TempDir) -> ProgressLedger {
    ProgressLedger::load(dir.path().join("progress.json"))
}

fn read_file(ledger: &ProgressLedger) -> LedgerFile {
    let bytes = std::fs::read(ledger.path()).unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[test]
fn missing_file_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = ledger_in(&dir);
    assert_eq!(ledger.completed_count(), 0);
    assert_eq!(ledger.total_tasks(), 0);
    assert!(!ledger.is_complete(&Task::new("Davis", 2020)));
    assert!(!ledger.path().exists());
}

#[test]
fn corrupt_file_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("progress.json");
    std::fs::write(&path, b"{\"completed_tasks\": {\"Davis-2020\": tr").unwrap();
    let ledger = ProgressLedger::load(&path);
    assert_eq!(ledger.completed_count(), 0);
}

#[test]
fn mark_complete_flushes_and_reloads() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = ledger_in(&dir);
    let task = Task::new("UC SF Law", 2021);

    assert!(ledger.mark_complete(&task).unwrap());
    assert!(ledger.is_complete(&task));

    let file = read_file(&ledger);
    assert_eq!(file.completed_count, 1);
    assert_eq!(file.completed_tasks.get("UC SF Law-2021"), Some(&true));

    let reloaded = ledger_in(&dir);
    assert!(reloaded.is_complete(&task));
    assert_eq!(reloaded.completed_count(), 1);
}

#[test]
fn mark_complete_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = ledger_in(&dir);
    let task = Task::new("Davis", 2020);
    assert!(ledger.mark_complete(&task).unwrap());
    assert!(!ledger.mark_complete(&task).unwrap());
    assert_eq!(ledger.completed_count(), 1);
    assert_eq!(read_file(&ledger).completed_count, 1);
}

#[test]
fn total_tasks_is_set_once() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = ledger_in(&dir);
    assert!(ledger.set_total_tasks_if_unset(195).unwrap());
    assert!(!ledger.set_total_tasks_if_unset(3).unwrap());
    assert_eq!(ledger.total_tasks(), 195);

    let reloaded = ledger_in(&dir);
    assert!(!reloaded.set_total_tasks_if_unset(7).unwrap());
    assert_eq!(reloaded.total_tasks(), 195);
}

#[test]
fn false_entries_do_not_count_and_count_is_rebuilt() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("progress.json");
    let json = r#"{
        "completed_tasks": {"A-2020": true, "A-2021": false, "B-2020": true},
        "start_time": "2024-01-01T00:00:00Z",
        "last_updated": "2024-01-01T00:10:00Z",
        "total_tasks": 4,
        "completed_count": 9
    }"#;
    std::fs::write(&path, json).unwrap();

    let ledger = ProgressLedger::load(&path);
    assert_eq!(ledger.completed_count(), 2);
    assert!(ledger.is_complete(&Task::new("A", 2020)));
    assert!(!ledger.is_complete(&Task::new("A", 2021)));
    assert_eq!(ledger.total_tasks(), 4);
}

#[test]
fn flush_updates_last_updated_and_keeps_start_time() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = ledger_in(&dir);
    ledger.flush().unwrap();
    let first = read_file(&ledger);
    std::thread::sleep(std::time::Duration::from_millis(5));
    ledger.mark_complete(&Task::new("A", 2020)).unwrap();
    let second = read_file(&ledger);
    assert_eq!(first.start_time, second.start_time);
    assert!(second.last_updated > first.last_updated);
}

#[test]
fn reset_clears_memory_and_file() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = ledger_in(&dir);
    ledger.set_total_tasks_if_unset(2).unwrap();
    ledger.mark_complete(&Task::new("A", 2020)).unwrap();
    assert!(ledger.path().exists());

    ledger.reset().unwrap();
    assert_eq!(ledger.completed_count(), 0);
    assert_eq!(ledger.total_tasks(), 0);
    assert!(!ledger.path().exists());

    // Resetting an already-empty ledger is fine.
    ledger.reset().unwrap();
}

#[test]
fn status_reports_percentage_and_sorted_tail() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = ledger_in(&dir);
    let status = ledger.status();
    assert_eq!(status.percent_complete, 0.0);
    assert!(status.recent.is_empty());

    ledger.set_total_tasks_if_unset(20).unwrap();
    for year in (2010..2022).rev() {
        ledger.mark_complete(&Task::new("Davis", year)).unwrap();
    }
    let status = ledger.status();
    assert_eq!(status.completed_count, 12);
    assert_eq!(status.total_tasks, 20);
    assert!((status.percent_complete - 60.0).abs() < 1e-9);
    assert_eq!(status.recent.len(), RECENT_LIMIT);
    assert_eq!(status.recent.first().map(String::as_str), Some("Davis-2012"));
    assert_eq!(status.recent.last().map(String::as_str), Some("Davis-2021"));
}

#[test]
fn crash_after_n_flushes_resumes_with_n() {
    let dir = tempfile::tempdir().unwrap();
    {
        let ledger = ledger_in(&dir);
        for year in [2020, 2021, 2022] {
            ledger.mark_complete(&Task::new("A", year)).unwrap();
        }
        // Task 4 was fetched but the process died before its flush.
    }
    let reloaded = ledger_in(&dir);
    assert_eq!(reloaded.completed_count(), 3);
    assert!(!reloaded.is_complete(&Task::new("A", 2023)));
}

#[test]
fn concurrent_mark_complete_loses_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = Arc::new(ledger_in(&dir));

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let ledger = Arc::clone(&ledger);
            std::thread::spawn(move || {
                for year in 2000..2025 {
                    // Every thread also marks a shared task to exercise idempotence.
                    ledger.mark_complete(&Task::new("shared", year)).unwrap();
                    ledger
                        .mark_complete(&Task::new(format!("w{}", t), year))
                        .unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(ledger.completed_count(), 25 + 8 * 25);
    let file = read_file(&ledger);
    assert_eq!(file.completed_count, file.completed_tasks.len());
    assert_eq!(file.completed_count, 225);
}
