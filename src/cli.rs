//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use tracing::Level;

use crate::data::labels::LabelOrder;
use crate::processing::histogram::Binning;

/// Plot benchmark timing CSV files as grouped bar charts.
#[derive(Parser, Debug)]
#[command(name = "timeplot", version, about)]
pub struct Cli {
    /// Timing CSV files. Commas join files into one series; a lone `:`
    /// separates series, otherwise every argument is its own series.
    #[arg(required = true, value_name = "TIMING.CSV")]
    pub inputs: Vec<String>,

    /// Output document (.svg or .png). Defaults to the first input with an .svg extension.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Comma-separated legend text, one entry per series.
    #[arg(long, short = 'l', value_delimiter = ',')]
    pub legends: Vec<String>,

    /// Show the pages in a window, waiting for a key press between pages.
    #[arg(long, short = 'i')]
    pub interactive: bool,

    /// Distribution binning as nbins:low:high; low == high picks the range from the data.
    /// Implies --distributions.
    #[arg(long, short = 'b', value_name = "NBINS:LO:HI")]
    pub binning: Option<Binning>,

    /// Add one distribution page per series and label.
    #[arg(long, short = 'd')]
    pub distributions: bool,

    /// How labels of different series are merged into one axis.
    #[arg(long, value_enum, default_value_t = LabelOrder::Positional)]
    pub label_order: LabelOrder,

    /// JSON file with drawing options.
    #[arg(long, value_name = "STYLE.JSON")]
    pub style: Option<PathBuf>,

    /// Write the aggregated statistics as JSON.
    #[arg(long, value_name = "SUMMARY.JSON")]
    pub summary: Option<PathBuf>,

    /// Aggregate and report only; draw nothing.
    #[arg(long, conflicts_with = "interactive")]
    pub no_plot: bool,

    /// More diagnostics (-v per-row, -vv drawing detail).
    #[arg(long, short = 'v', action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only warnings and errors.
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

impl Cli {
    pub fn log_level(&self) -> Level {
        match (self.quiet, self.verbose) {
            (true, _) => Level::WARN,
            (false, 0) => Level::INFO,
            (false, 1) => Level::DEBUG,
            (false, _) => Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_command_line() {
        let cli = Cli::try_parse_from([
            "timeplot",
            "-o",
            "out.png",
            "--legends",
            "old,new",
            "-b",
            "10:0:500",
            "--label-order",
            "first-seen",
            "-vv",
            "a.csv,a2.csv",
            ":",
            "b.csv",
        ])
        .unwrap();
        assert_eq!(cli.inputs, vec!["a.csv,a2.csv", ":", "b.csv"]);
        assert_eq!(cli.output, Some(PathBuf::from("out.png")));
        assert_eq!(cli.legends, vec!["old", "new"]);
        assert_eq!(cli.binning.unwrap().nbins, 10);
        assert_eq!(cli.label_order, LabelOrder::FirstSeen);
        assert_eq!(cli.log_level(), Level::TRACE);
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["timeplot", "a.csv"]).unwrap();
        assert!(cli.legends.is_empty());
        assert!(cli.binning.is_none());
        assert_eq!(cli.label_order, LabelOrder::Positional);
        assert_eq!(cli.log_level(), Level::INFO);
    }

    #[test]
    fn rejects_bad_binning_and_missing_inputs() {
        assert!(Cli::try_parse_from(["timeplot", "-b", "25:0", "a.csv"]).is_err());
        assert!(Cli::try_parse_from(["timeplot"]).is_err());
        assert!(Cli::try_parse_from(["timeplot", "-q", "-v", "a.csv"]).is_err());
    }
}
