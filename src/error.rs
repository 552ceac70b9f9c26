//! Error types for the aggregation library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures while reading a traffic-count table.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("header has {found} columns, at least {required} required")]
    NarrowHeader { found: usize, required: usize },
    #[error("unable to read table: {0}")]
    Csv(#[from] csv::Error),
}

/// Errors surfaced by the aggregation pipeline. None of them are fatal to the
/// caller; a missing table can be treated as an empty one.
#[derive(Debug, Error)]
pub enum AggregatorError {
    #[error("traffic count file not found at `{0}`")]
    NotFound(PathBuf),
    #[error("unable to read `{path}`: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("invalid road geometry: {0}")]
    Geometry(#[from] serde_json::Error),
    #[error("invalid configuration in `{path}`: {reason}")]
    Config { path: PathBuf, reason: String },
}
