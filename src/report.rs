//! Text and JSON summaries of the aggregated buckets.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::data::datetime::{time_span, TimeSpan};
use crate::data::observation::Series;
use crate::error::{Error, Result};
use crate::processing::aggregate::Aggregation;
use crate::processing::statistics::BucketStats;

#[derive(Debug, Serialize)]
pub struct Summary<'a> {
    pub labels: &'a [String],
    pub rejected: usize,
    pub series: Vec<SeriesReport<'a>>,
}

#[derive(Debug, Serialize)]
pub struct SeriesReport<'a> {
    pub name: &'a str,
    pub sources: &'a [PathBuf],
    pub rows: usize,
    pub hosts: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_span: Option<TimeSpan>,
    pub buckets: Vec<BucketReport<'a>>,
}

#[derive(Debug, Serialize)]
pub struct BucketReport<'a> {
    pub label: &'a str,
    #[serde(flatten)]
    pub stats: BucketStats,
}

pub fn summary<'a>(series: &'a [Series], aggregation: &'a Aggregation) -> Summary<'a> {
    let series = series
        .iter()
        .zip(&aggregation.series)
        .map(|(s, agg)| SeriesReport {
            name: &agg.name,
            sources: &s.sources,
            rows: s.row_count(),
            hosts: s.hosts(),
            time_span: time_span(s.observations.iter().map(|o| o.time.as_str())),
            buckets: aggregation
                .labels
                .iter()
                .zip(&agg.buckets)
                .map(|(label, stats)| BucketReport {
                    label,
                    stats: *stats,
                })
                .collect(),
        })
        .collect();

    Summary {
        labels: &aggregation.labels,
        rejected: aggregation.rejected,
        series,
    }
}

pub fn write_json(path: &Path, summary: &Summary) -> Result<()> {
    let err = |reason: String| Error::Summary {
        path: path.to_path_buf(),
        reason,
    };
    let json = serde_json::to_string_pretty(summary).map_err(|e| err(e.to_string()))?;
    std::fs::write(path, json + "\n").map_err(|e| err(e.to_string()))
}

/// One line per non-empty bucket: series, label, count, mean, standard error.
pub fn text_table(aggregation: &Aggregation) -> String {
    let name_w = aggregation
        .series
        .iter()
        .map(|s| s.name.len())
        .chain([6])
        .max()
        .unwrap_or(6);
    let label_w = aggregation
        .labels
        .iter()
        .map(String::len)
        .chain([5])
        .max()
        .unwrap_or(5);

    let header = format!(
        "{:<name_w$}  {:<label_w$}  {:>6}  {:>14}  {:>12}\n",
        "series", "label", "count", "ns/element", "std err"
    );
    let labels = &aggregation.labels;
    let rows = aggregation.series.iter().flat_map(move |summary| {
        labels
            .iter()
            .zip(&summary.buckets)
            .filter_map(move |(label, b)| {
                let mean = b.mean?;
                let err = b.stderr.map_or_else(|| "-".to_string(), |e| format!("{e:.3}"));
                Some(format!(
                    "{:<name_w$}  {:<label_w$}  {:>6}  {:>14.3}  {:>12}\n",
                    summary.name, label, b.count, mean, err
                ))
            })
    });
    std::iter::once(header).chain(rows).collect()
}
