use std::io;
use thiserror::Error;

/// Errors raised while reducing primitive events.
///
/// None of these are "no match" outcomes. A fusion or folder move that
/// doesn't apply simply leaves the verbatim event in the store; these
/// variants mean the batch itself is unusable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReduceError {
    #[error("path is empty")]
    EmptyPath,

    #[error("path `{0}` has no segments")]
    MalformedPath(String),

    #[error("event at ts {ts} arrived after ts {last}")]
    OutOfOrder { ts: u64, last: u64 },

    #[error("delete of `{path}` with hash `{hash}` has no live index entry")]
    UntrackedDelete { path: String, hash: String },
}

/// Crate-level result for reduction.
pub type Result<T> = std::result::Result<T, ReduceError>;

/// Errors raised while reading a primitive event feed.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("line {line}: unknown operation `{op}`")]
    UnknownOperation { line: usize, op: String },

    #[error("line {line}: missing {field}")]
    MissingField { line: usize, field: &'static str },

    #[error("line {line}: unexpected trailing field `{value}`")]
    TrailingField { line: usize, value: String },

    #[error("line {line}: bad timestamp `{value}`")]
    BadTimestamp { line: usize, value: String },

    #[error("line {line}: bad event count `{value}`")]
    BadCount { line: usize, value: String },

    #[error("header announced {expected} events, found {found}")]
    CountMismatch { expected: usize, found: usize },

    #[error("line {line}: {source}")]
    Path {
        line: usize,
        #[source]
        source: ReduceError,
    },

    #[error("line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Errors raised while persisting or loading a reduced history.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}
