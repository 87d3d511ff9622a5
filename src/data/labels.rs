//! Case-label axis shared by all series.

use std::collections::HashMap;

use clap::ValueEnum;

use crate::data::observation::Series;
use crate::error::{Error, Result};

/// How per-series label lists are merged into one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LabelOrder {
    /// Merge the series' own first-seen lists index by index.
    #[default]
    Positional,
    /// Global first appearance, series by series.
    FirstSeen,
    /// Only labels of the first series; other labels are rejected per row.
    FirstSeries,
}

/// Ordered distinct labels with a reverse index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelAxis {
    labels: Vec<String>,
    index: HashMap<String, usize>,
}

impl LabelAxis {
    fn push(&mut self, label: &str) {
        if !self.index.contains_key(label) {
            self.index.insert(label.to_string(), self.labels.len());
            self.labels.push(label.to_string());
        }
    }

    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for LabelAxis {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut axis = LabelAxis::default();
        for label in iter {
            axis.push(label.as_ref());
        }
        axis
    }
}

/// Build the label axis for `series` under the given ordering policy.
pub fn collect_labels(series: &[Series], order: LabelOrder) -> Result<LabelAxis> {
    if let Some(s) = series.iter().find(|s| !s.has_column("label")) {
        return Err(Error::NoLabelColumn {
            series: s.name.clone(),
        });
    }

    let per_series: Vec<Vec<&str>> = series.iter().map(Series::distinct_labels).collect();

    let axis: LabelAxis = match order {
        LabelOrder::Positional => {
            let depth = per_series.iter().map(Vec::len).max().unwrap_or(0);
            (0..depth)
                .flat_map(|i| per_series.iter().filter_map(move |labels| labels.get(i).copied()))
                .collect()
        }
        LabelOrder::FirstSeen => per_series.iter().flatten().copied().collect(),
        LabelOrder::FirstSeries => per_series.first().into_iter().flatten().copied().collect(),
    };

    if axis.is_empty() {
        return Err(Error::EmptyLabelAxis);
    }
    Ok(axis)
}
