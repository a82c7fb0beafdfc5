//! Harvest task model: one (partition key, period) pair per unit of work.

use std::fmt;

/// One unit of work: all records of a partition (campus location) for a period (year).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Task {
    pub partition_key: String,
    pub period: i32,
}

impl Task {
    pub fn new(partition_key: impl Into<String>, period: i32) -> Self {
        Self {
            partition_key: partition_key.into(),
            period,
        }
    }

    /// Ledger key, `"<partition_key>-<period>"`.
    pub fn key(&self) -> TaskKey {
        TaskKey(format!("{}-{}", self.partition_key, self.period))
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.partition_key, self.period)
    }
}

/// Deterministic string encoding of a task used as the ledger key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskKey(String);

impl TaskKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for TaskKey {
    fn from(s: String) -> Self {
        TaskKey(s)
    }
}

impl fmt::Display for TaskKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Cartesian product of partition keys (outer) and periods (inner).
pub fn expand(partition_keys: &[String], periods: &[i32]) -> Vec<Task> {
    let mut tasks = Vec::with_capacity(partition_keys.len() * periods.len());
    for key in partition_keys {
        for &period in periods {
            tasks.push(Task::new(key.clone(), period));
        }
    }
    tasks
}
