//! Error types for log parsing and timeline manipulation.
//!
//! Recoverable oddities inside a block (bad amounts, unknown effects) never
//! surface here; they are logged and skipped. What does surface:
//! - [`TimelineError`]: misuse of the timeline's public mutators/accessors
//! - [`ParseError`]: a block that cannot be interpreted at all, or I/O on
//!   the log, its block dump or its JSON output
//! - [`LogParseFailure`]: a `ParseError` tagged with the log and the last
//!   turn recorded before it, as collected by the batch driver

use std::path::PathBuf;

use thiserror::Error;

use crate::session_log::LogBlockType;

#[derive(Debug, Error)]
pub enum TimelineError {
    #[error("log summary has to be created first")]
    SummaryNotCreated,

    #[error("timeline is based on turn intervals, single turns cannot be added")]
    IntervalOnly,

    #[error("timeline is based on single turns, turn intervals cannot be added")]
    DetailedOnly,

    #[error("timeline has no turns")]
    NoTurns,

    #[error("invalid sub-interval [{start}, {end}]: end must be greater than start and zero")]
    InvalidRange { start: u32, end: u32 },
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed {block_type} block: {reason}")]
    MalformedBlock {
        block_type: LogBlockType,
        reason: String,
    },

    #[error("failed to write {path:?}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Timeline(#[from] TimelineError),
}

impl ParseError {
    pub(crate) fn malformed(block_type: LogBlockType, reason: impl Into<String>) -> Self {
        Self::MalformedBlock {
            block_type,
            reason: reason.into(),
        }
    }
}

/// A failed parse of a single log, reported by the batch driver.
#[derive(Debug, Error)]
#[error("failed to parse {log_name} after turn {last_turn}: {source}")]
pub struct LogParseFailure {
    pub log_name: String,
    pub last_turn: u32,
    #[source]
    pub source: ParseError,
}
