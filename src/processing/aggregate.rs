use std::collections::HashMap;
use std::fmt;

use tracing::{debug, warn};

use crate::data::labels::LabelAxis;
use crate::data::observation::{Observation, Series};
use crate::processing::statistics::{BucketStats, RunningStats};

/// Why an observation was left out of aggregation.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    ZeroDenominator {
        entries: u64,
        branches: u64,
        elements: u64,
    },
    WorkOverflow {
        entries: u64,
        branches: u64,
        elements: u64,
    },
    UnknownLabel(String),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::ZeroDenominator {
                entries,
                branches,
                elements,
            } => write!(
                f,
                "cannot normalize: entries={entries} branches={branches} elements={elements}"
            ),
            Rejection::WorkOverflow {
                entries,
                branches,
                elements,
            } => write!(
                f,
                "work count overflows: entries={entries} branches={branches} elements={elements}"
            ),
            Rejection::UnknownLabel(label) => write!(f, "no bin for label `{label}`"),
        }
    }
}

/// `1e6 * ms / (entries * branches * elements)`: nanoseconds per element.
pub fn ns_per_element(obs: &Observation) -> Result<f64, Rejection> {
    match obs.work_units() {
        Some(0) => Err(Rejection::ZeroDenominator {
            entries: obs.entries,
            branches: obs.branches,
            elements: obs.elements,
        }),
        Some(n) => Ok(1_000_000.0 * obs.ms / n as f64),
        None => Err(Rejection::WorkOverflow {
            entries: obs.entries,
            branches: obs.branches,
            elements: obs.elements,
        }),
    }
}

/// Aggregated statistics of one series, one bucket per axis label.
#[derive(Debug, Clone)]
pub struct SeriesSummary {
    pub name: String,
    pub buckets: Vec<BucketStats>,
    /// Raw `ns_per_element` values per bucket, in input order.
    pub samples: Vec<Vec<f64>>,
}

#[derive(Debug, Clone)]
pub struct Aggregation {
    pub labels: Vec<String>,
    pub series: Vec<SeriesSummary>,
    /// Rows left out of every bucket.
    pub rejected: usize,
}

impl Aggregation {
    pub fn bucket(&self, series: usize, label: usize) -> Option<&BucketStats> {
        self.series.get(series)?.buckets.get(label)
    }

    /// Largest `mean + stderr` over all buckets, used for axis ranges.
    pub fn max_extent(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| &s.buckets)
            .filter_map(|b| Some(b.mean? + b.stderr.unwrap_or(0.0)))
            .fold(0.0, f64::max)
    }
}

/// Accumulate every series into (series, label) buckets.
pub fn aggregate(series: &[Series], axis: &LabelAxis) -> Aggregation {
    let mut accumulators: HashMap<(usize, usize), RunningStats> = HashMap::new();
    let mut samples: HashMap<(usize, usize), Vec<f64>> = HashMap::new();
    let mut rejected = 0usize;

    for (s_idx, s) in series.iter().enumerate() {
        for (row, obs) in s.observations.iter().enumerate() {
            let bucket = axis
                .index_of(&obs.label)
                .ok_or_else(|| Rejection::UnknownLabel(obs.label.clone()))
                .and_then(|l_idx| Ok((l_idx, ns_per_element(obs)?)));
            match bucket {
                Ok((l_idx, rate)) => {
                    debug!(
                        "{}:{l_idx} row {row} {} {} {:<20} {} {:<10} {} {} {} {} {} {} -> {rate:.5}",
                        s.name,
                        obs.time,
                        obs.host,
                        obs.label,
                        obs.testcase,
                        obs.test,
                        obs.fill,
                        obs.entries,
                        obs.branches,
                        obs.elements,
                        obs.ms,
                        obs.cpu,
                    );
                    let acc = accumulators.entry((s_idx, l_idx)).or_default();
                    *acc = acc.push(rate);
                    samples.entry((s_idx, l_idx)).or_default().push(rate);
                }
                Err(reason) => {
                    warn!("series `{}` row {row} skipped: {reason}", s.name);
                    rejected += 1;
                }
            }
        }
    }

    let series = series
        .iter()
        .enumerate()
        .map(|(s_idx, s)| SeriesSummary {
            name: s.name.clone(),
            buckets: (0..axis.len())
                .map(|l_idx| {
                    accumulators
                        .get(&(s_idx, l_idx))
                        .copied()
                        .unwrap_or_default()
                        .finish()
                })
                .collect(),
            samples: (0..axis.len())
                .map(|l_idx| samples.remove(&(s_idx, l_idx)).unwrap_or_default())
                .collect(),
        })
        .collect();

    Aggregation {
        labels: axis.labels().to_vec(),
        series,
        rejected,
    }
}
