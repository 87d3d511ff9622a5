mod app;
mod cli;
mod config;
mod data;
mod error;
mod processing;
mod render;
mod report;
mod ui;

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};

use cli::Cli;
use config::Config;
use data::{labels, loader};
use error::Result;
use processing::aggregate::aggregate;
use render::{document, Figure};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::from_cli(cli)?;

    let series = loader::load_all(&config.series, &config.names)?;
    let axis = labels::collect_labels(&series, config.label_order)?;
    info!("{} labels: {}", axis.len(), axis.labels().join(", "));

    let aggregation = aggregate(&series, &axis);
    if aggregation.rejected > 0 {
        warn!("{} row(s) left out of the statistics", aggregation.rejected);
    }
    print!("{}", report::text_table(&aggregation));

    if let Some(path) = &config.summary {
        report::write_json(path, &report::summary(&series, &aggregation))?;
        info!("summary written to {}", path.display());
    }

    if let Some(path) = &config.output {
        let figure = Figure::new(&aggregation, &config.style, config.page_options());
        document::write_document(path, &figure)?;
    }

    if config.interactive {
        app::run_viewer(aggregation, config.style.clone(), config.page_options())?;
    }
    Ok(())
}
