use std::path::PathBuf;

use serde::Deserialize;

/// Columns every timing CSV must carry. Extra columns are ignored.
pub const REQUIRED_COLUMNS: [&str; 11] = [
    "time", "host", "label", "testcase", "test", "fill", "entries", "branches", "elements", "ms",
    "cpu",
];

/// One timing measurement (one CSV row).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Observation {
    pub time: String,
    pub host: String,
    pub label: String,
    pub testcase: String,
    pub test: String,
    pub fill: char,
    pub entries: u64,
    pub branches: u64,
    pub elements: u64,
    pub ms: f64,
    pub cpu: f64,
}

impl Observation {
    /// Number of elements processed: `entries * branches * elements`,
    /// or `None` if the product does not fit in a `u64`.
    pub fn work_units(&self) -> Option<u64> {
        self.entries
            .checked_mul(self.branches)?
            .checked_mul(self.elements)
    }
}

/// Observations read from one or more files that share a legend entry.
#[derive(Debug, Clone)]
pub struct Series {
    pub name: String,
    pub sources: Vec<PathBuf>,
    /// Header of the first source file.
    pub columns: Vec<String>,
    pub observations: Vec<Observation>,
}

impl Series {
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn row_count(&self) -> usize {
        self.observations.len()
    }

    /// Distinct labels in first-seen order.
    pub fn distinct_labels(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.observations
            .iter()
            .map(|o| o.label.as_str())
            .filter(|l| seen.insert(*l))
            .collect()
    }

    /// Distinct hostnames in first-seen order.
    pub fn hosts(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.observations
            .iter()
            .map(|o| o.host.as_str())
            .filter(|h| seen.insert(*h))
            .collect()
    }
}
