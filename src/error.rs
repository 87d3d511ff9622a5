use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("usage: {0}")]
    Usage(String),
    #[error("cannot read {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("no rows read from {}", path.display())]
    EmptyInput { path: PathBuf },
    #[error("{} has no `{column}` column", path.display())]
    MissingColumn { path: PathBuf, column: String },
    #[error("series `{series}` has no `label` column")]
    NoLabelColumn { series: String },
    #[error("no case labels found in any series")]
    EmptyLabelAxis,
    #[error("style {}: {reason}", path.display())]
    Style { path: PathBuf, reason: String },
    #[error("summary {}: {reason}", path.display())]
    Summary { path: PathBuf, reason: String },
    #[error("render: {0}")]
    Render(String),
    #[error("viewer: {0}")]
    Viewer(String),
}

impl Error {
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Process exit code: 2 for usage errors and when the label axis cannot
    /// be built, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Usage(_) | Error::NoLabelColumn { .. } | Error::EmptyLabelAxis => 2,
            _ => 1,
        }
    }
}
