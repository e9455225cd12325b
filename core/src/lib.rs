//! Parsing engine for KoLmafia ascension session logs.
//!
//! A log is split into blocks ([`session_log`]), each block is interpreted
//! by a block or line parser ([`parser`]) into a [`Timeline`] of turns and
//! run-wide histories, and the finished timeline is aggregated into a
//! [`LogSummaryData`]. [`batch`] drives many logs in parallel.

pub mod batch;
pub mod config;
pub mod error;
pub mod game_data;
pub mod parser;
pub mod session_log;
pub mod summary;
pub mod timeline;

pub use alv_types::ParserSettings;
pub use batch::{BatchReport, ParsedLog, parse_logs};
pub use config::{SettingsError, default_settings_path, load_settings, save_settings};
pub use error::{LogParseFailure, ParseError, TimelineError};
pub use parser::MafiaLogParser;
pub use summary::LogSummaryData;
pub use timeline::{Timeline, Turn, TurnInterval};
