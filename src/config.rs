use std::path::{Path, PathBuf};

use tracing::warn;

use crate::cli::Cli;
use crate::data::labels::LabelOrder;
use crate::data::loader::SeriesSpec;
use crate::error::{Error, Result};
use crate::processing::histogram::Binning;
use crate::render::style::RenderStyle;
use crate::render::PageOptions;

/// Separator token between series on the command line.
pub const SERIES_SEPARATOR: &str = ":";

/// Resolved settings for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub series: Vec<SeriesSpec>,
    /// Display name per series, same length as `series`.
    pub names: Vec<String>,
    /// At least one name came from `--legends`.
    pub named: bool,
    /// Document to write, if any.
    pub output: Option<PathBuf>,
    pub interactive: bool,
    pub binning: Binning,
    pub distributions: bool,
    pub label_order: LabelOrder,
    pub style: RenderStyle,
    pub summary: Option<PathBuf>,
}

impl Config {
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let series = parse_series_specs(&cli.inputs);
        let Some(first) = series.first().and_then(|s| s.files.first()) else {
            return Err(Error::Usage("no input files given".to_string()));
        };

        if cli.legends.len() > series.len() {
            warn!(
                "{} legends for {} series; extra legends ignored",
                cli.legends.len(),
                series.len()
            );
        }
        let names = series
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                cli.legends
                    .get(i)
                    .filter(|l| !l.is_empty())
                    .cloned()
                    .unwrap_or_else(|| spec.default_name())
            })
            .collect();

        let output = if cli.no_plot {
            None
        } else if cli.interactive {
            cli.output
        } else {
            Some(cli.output.unwrap_or_else(|| default_output(first)))
        };

        let style = match &cli.style {
            Some(path) => RenderStyle::load(path)?,
            None => RenderStyle::default(),
        };

        Ok(Self {
            names,
            named: !cli.legends.is_empty(),
            output,
            interactive: cli.interactive,
            distributions: cli.distributions || cli.binning.is_some(),
            binning: cli.binning.unwrap_or_default(),
            label_order: cli.label_order,
            style,
            summary: cli.summary,
            series,
        })
    }

    pub fn page_options(&self) -> PageOptions {
        PageOptions {
            binning: self.binning,
            distributions: self.distributions,
            named: self.named,
        }
    }
}

/// Group positional arguments into series. With a `:` token present the
/// tokens delimit series; otherwise each argument is one series. Commas
/// inside an argument always join files into the same series.
pub fn parse_series_specs(args: &[String]) -> Vec<SeriesSpec> {
    let split = |arg: &String| -> Vec<PathBuf> {
        arg.split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(PathBuf::from)
            .collect()
    };

    let groups: Vec<Vec<PathBuf>> = if args.iter().any(|a| a == SERIES_SEPARATOR) {
        args.split(|a| a == SERIES_SEPARATOR)
            .map(|group| group.iter().flat_map(split).collect())
            .collect()
    } else {
        args.iter().map(split).collect()
    };

    groups
        .into_iter()
        .filter(|files| !files.is_empty())
        .map(SeriesSpec::new)
        .collect()
}

/// `dir/run.csv` -> `dir/run.svg`.
pub fn default_output(first_input: &Path) -> PathBuf {
    first_input.with_extension("svg")
}
