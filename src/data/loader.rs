use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::data::observation::{Observation, Series, REQUIRED_COLUMNS};
use crate::error::{Error, Result};

/// Files that together form one series. Only the first one is expected to
/// carry a usable header; the first line of every other file is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesSpec {
    pub files: Vec<PathBuf>,
}

impl SeriesSpec {
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self { files }
    }

    /// Legend text used when none is given: the first file's name.
    pub fn default_name(&self) -> String {
        self.files
            .first()
            .map(|p| {
                p.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| p.display().to_string())
            })
            .unwrap_or_default()
    }
}

/// Load every spec in order, naming series from `names` (same length as `specs`).
pub fn load_all(specs: &[SeriesSpec], names: &[String]) -> Result<Vec<Series>> {
    specs
        .iter()
        .zip(names)
        .map(|(spec, name)| load_series(spec, name))
        .collect()
}

/// Load one series. Fails when a file cannot be read, when the first file
/// lacks a required column, or when the first file yields no rows.
pub fn load_series(spec: &SeriesSpec, name: &str) -> Result<Series> {
    let Some((first, rest)) = spec.files.split_first() else {
        return Err(Error::EmptyInput {
            path: PathBuf::new(),
        });
    };

    let mut reader = reader_builder(true).from_reader(open(first)?);
    let headers = reader
        .headers()
        .map_err(|source| Error::Csv {
            path: first.clone(),
            source,
        })?
        .clone();
    if headers.is_empty() {
        return Err(Error::EmptyInput {
            path: first.clone(),
        });
    }
    let columns = check_schema(first, &headers, name)?;

    let mut observations = Vec::new();
    let n = read_rows(first, &mut reader, &headers, 0, &mut observations)?;
    info!("{n} rows from {} -> series `{name}`", first.display());
    if n == 0 {
        return Err(Error::EmptyInput {
            path: first.clone(),
        });
    }

    for path in rest {
        let mut input = BufReader::new(open(path)?);
        let mut header_line = Vec::new();
        input
            .read_until(b'\n', &mut header_line)
            .map_err(|source| Error::Load {
                path: path.clone(),
                source,
            })?;

        let mut reader = reader_builder(false).from_reader(input);
        let n = read_rows(path, &mut reader, &headers, 1, &mut observations)?;
        if n == 0 {
            warn!("no rows in {} (series `{name}`)", path.display());
        } else {
            info!("{n} rows from {} -> series `{name}`", path.display());
        }
    }

    Ok(Series {
        name: name.to_string(),
        sources: spec.files.clone(),
        columns,
        observations,
    })
}

fn reader_builder(has_headers: bool) -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .delimiter(b',')
        .has_headers(has_headers)
        .trim(csv::Trim::All);
    builder
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| Error::Load {
        path: path.to_path_buf(),
        source,
    })
}

fn check_schema(path: &Path, headers: &csv::StringRecord, series: &str) -> Result<Vec<String>> {
    let columns: Vec<String> = headers.iter().map(str::to_string).collect();
    let has = |name: &str| columns.iter().any(|c| c == name);

    if !has("label") {
        return Err(Error::NoLabelColumn {
            series: series.to_string(),
        });
    }
    if let Some(missing) = REQUIRED_COLUMNS.iter().find(|c| !has(c)) {
        return Err(Error::MissingColumn {
            path: path.to_path_buf(),
            column: missing.to_string(),
        });
    }
    Ok(columns)
}

/// Append the parsed rows of `reader` to `out`, returning how many were added.
/// Rows that do not convert are logged and skipped. `line_offset` accounts for
/// lines consumed before the reader was created.
fn read_rows<R: Read>(
    path: &Path,
    reader: &mut csv::Reader<R>,
    headers: &csv::StringRecord,
    line_offset: u64,
    out: &mut Vec<Observation>,
) -> Result<usize> {
    let before = out.len();
    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) if e.is_io_error() => {
                return Err(Error::Csv {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
            Err(e) => {
                let line = e.position().map_or(0, |p| p.line()) + line_offset;
                warn!("{}:{line}: skipping row: {e}", path.display());
                continue;
            }
        };
        match record.deserialize::<Observation>(Some(headers)) {
            Ok(obs) => out.push(obs),
            Err(e) => {
                let line = record.position().map_or(0, |p| p.line()) + line_offset;
                warn!("{}:{line}: skipping row: {e}", path.display());
            }
        }
    }
    Ok(out.len() - before)
}
