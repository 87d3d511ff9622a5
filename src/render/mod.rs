//! Page layout shared by the document writer and the interactive viewer.

pub mod document;
pub mod style;

use std::path::Path;

use crate::error::{Error, Result};
use crate::processing::aggregate::Aggregation;
use crate::processing::histogram::{Binning, Histogram};
use style::RenderStyle;

/// One page of output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    /// Grouped bars, one group per label.
    Bars,
    /// Distribution of one (series, label) bucket.
    Distribution { series: usize, label: usize },
}

/// Bar chart first, then one distribution page per non-empty bucket.
pub fn plan_pages(aggregation: &Aggregation, distributions: bool) -> Vec<Page> {
    let mut pages = vec![Page::Bars];
    if distributions {
        for (series, summary) in aggregation.series.iter().enumerate() {
            for (label, samples) in summary.samples.iter().enumerate() {
                if !samples.is_empty() {
                    pages.push(Page::Distribution { series, label });
                }
            }
        }
    }
    pages
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageOptions {
    pub binning: Binning,
    pub distributions: bool,
    /// Series names were given explicitly.
    pub named: bool,
}

/// Everything needed to draw the pages of one run.
pub struct Figure<'a> {
    pub aggregation: &'a Aggregation,
    pub style: &'a RenderStyle,
    pub binning: Binning,
    pub legend: bool,
    pages: Vec<Page>,
}

impl<'a> Figure<'a> {
    pub fn new(aggregation: &'a Aggregation, style: &'a RenderStyle, options: PageOptions) -> Self {
        let legend = style
            .show_legend
            .unwrap_or(options.named || aggregation.series.len() > 1);
        Self {
            aggregation,
            style,
            binning: options.binning,
            legend,
            pages: plan_pages(aggregation, options.distributions),
        }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Width of one bar in label units.
    pub fn bar_width(&self) -> f64 {
        let n = self.aggregation.series.len().max(1) as f64;
        (0.55 / n).min(0.45)
    }

    /// Horizontal extent of the bar for `series` in the group of `label`.
    pub fn bar_span(&self, label: usize, series: usize) -> (f64, f64) {
        let w = self.bar_width();
        let x0 = label as f64 + 0.3 + 1.3 * w * series as f64;
        (x0, x0 + w)
    }

    /// Top of the value axis, with headroom for annotations.
    pub fn y_max(&self) -> f64 {
        let top = self.aggregation.max_extent();
        if top > 0.0 {
            top * 1.15
        } else {
            1.0
        }
    }

    pub fn histogram(&self, series: usize, label: usize) -> Histogram {
        let samples = self
            .aggregation
            .series
            .get(series)
            .and_then(|s| s.samples.get(label))
            .map(Vec::as_slice)
            .unwrap_or_default();
        Histogram::fill(samples, &self.binning)
    }

    pub fn page_title(&self, page: &Page) -> String {
        match *page {
            Page::Bars => self.style.title.clone(),
            Page::Distribution { series, label } => {
                let name = self
                    .aggregation
                    .series
                    .get(series)
                    .map_or("?", |s| s.name.as_str());
                let label = self
                    .aggregation
                    .labels
                    .get(label)
                    .map_or("?", String::as_str);
                format!("{name}: {label}")
            }
        }
    }
}

/// File formats the document writer can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            _ => Err(Error::render(format!(
                "unsupported output format `.{ext}` for {} (use .svg or .png)",
                path.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::labels::{collect_labels, LabelOrder};
    use crate::data::observation::fixtures::{obs, series};
    use crate::processing::aggregate::aggregate;

    fn two_series() -> Aggregation {
        let s = vec![
            series(
                "a.csv",
                vec![
                    obs("foo", 10.0, 1, 1, 1000),
                    obs("foo", 11.0, 1, 1, 1000),
                    obs("bar", 20.0, 1, 1, 1000),
                ],
            ),
            series("b.csv", vec![obs("foo", 15.0, 1, 1, 1000)]),
        ];
        let axis = collect_labels(&s, LabelOrder::Positional).unwrap();
        aggregate(&s, &axis)
    }

    fn options(distributions: bool) -> PageOptions {
        PageOptions {
            binning: Binning::default(),
            distributions,
            named: false,
        }
    }

    #[test]
    fn pages_skip_empty_buckets() {
        let agg = two_series();
        assert_eq!(plan_pages(&agg, false), vec![Page::Bars]);
        assert_eq!(
            plan_pages(&agg, true),
            vec![
                Page::Bars,
                Page::Distribution { series: 0, label: 0 },
                Page::Distribution { series: 0, label: 1 },
                Page::Distribution { series: 1, label: 0 },
            ]
        );
    }

    #[test]
    fn bars_stay_inside_their_group() {
        let agg = two_series();
        let style = RenderStyle::default();
        let fig = Figure::new(&agg, &style, options(false));
        assert!((fig.bar_width() - 0.275).abs() < 1e-12);
        let (a0, a1) = fig.bar_span(1, 0);
        let (b0, b1) = fig.bar_span(1, 1);
        assert!((a0 - 1.3).abs() < 1e-12);
        assert!(a1 < b0);
        assert!(b1 < 2.0);
    }

    #[test]
    fn single_series_bar_is_capped() {
        let s = vec![series("a", vec![obs("foo", 1.0, 1, 1, 1)])];
        let axis = collect_labels(&s, LabelOrder::Positional).unwrap();
        let agg = aggregate(&s, &axis);
        let style = RenderStyle::default();
        let fig = Figure::new(&agg, &style, options(false));
        assert_eq!(fig.bar_width(), 0.45);
        assert!(!fig.legend);
    }

    #[test]
    fn legend_follows_series_count_unless_styled() {
        let agg = two_series();
        let mut style = RenderStyle::default();
        assert!(Figure::new(&agg, &style, options(false)).legend);
        style.show_legend = Some(false);
        assert!(!Figure::new(&agg, &style, options(false)).legend);
    }

    #[test]
    fn distribution_titles_and_histograms() {
        let agg = two_series();
        let style = RenderStyle::default();
        let fig = Figure::new(&agg, &style, options(true));
        assert_eq!(fig.pages().len(), 4);
        let page = Page::Distribution { series: 0, label: 0 };
        assert_eq!(fig.page_title(&page), "a.csv: foo");
        let h = fig.histogram(0, 0);
        assert_eq!(h.entries(), 2);
        assert_eq!((h.low, h.high), (10000.0, 11000.0));
        assert!(fig.y_max() > 20000.0);
    }

    #[test]
    fn output_format_from_extension() {
        assert_eq!(OutputFormat::from_path(Path::new("x.svg")).unwrap(), OutputFormat::Svg);
        assert_eq!(OutputFormat::from_path(Path::new("x.PNG")).unwrap(), OutputFormat::Png);
        assert!(OutputFormat::from_path(Path::new("x.pdf")).is_err());
    }
}
