//! KoLmafia session logs as a stream of typed blocks.
//!
//! A block is a run of non-blank lines. Its first line decides its type:
//!
//! | type | first line |
//! |---|---|
//! | `ENCOUNTER` | `[N] Area` |
//! | `SERVICE` | `Took choice 1089/...` |
//! | `COMBING` | `Combing ...` |
//! | `BASTILLE` | mentions Bastille Battalion |
//! | `ASCENSION_DATA` | `Ascension #...` |
//! | `PLAYER_SNAPSHOT` | `Player Snapshot` |
//! | `HYBRID_DATA` | `Hybridizing yourself` / `Making a Gene Tonic` |
//! | `CONSUMABLE` | `eat|drink|chew|use N Name` |
//! | `OTHER` | anything else |

mod reader;

pub use reader::{BlockReader, read_session_log, split_lines};

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

pub(crate) static TURN_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[(\d+)\] (.+)$").expect("valid regex"));

pub(crate) static CONSUME_COMMAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(eat|drink|chew|use) (\d+) (.+)$").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LogBlockType {
    Encounter,
    Consumable,
    PlayerSnapshot,
    AscensionData,
    HybridData,
    Service,
    Combing,
    Bastille,
    Other,
}

impl LogBlockType {
    pub const fn name(self) -> &'static str {
        match self {
            LogBlockType::Encounter => "ENCOUNTER",
            LogBlockType::Consumable => "CONSUMABLE",
            LogBlockType::PlayerSnapshot => "PLAYER_SNAPSHOT",
            LogBlockType::AscensionData => "ASCENSION_DATA",
            LogBlockType::HybridData => "HYBRID_DATA",
            LogBlockType::Service => "SERVICE",
            LogBlockType::Combing => "COMBING",
            LogBlockType::Bastille => "BASTILLE",
            LogBlockType::Other => "OTHER",
        }
    }

    /// Classify a block by its first line. Never fails: unknown shapes are
    /// `Other`.
    pub fn classify(first_line: &str) -> LogBlockType {
        if TURN_MARKER.is_match(first_line) {
            LogBlockType::Encounter
        } else if first_line.starts_with("Took choice 1089/") {
            LogBlockType::Service
        } else if first_line.starts_with("Combing ") {
            LogBlockType::Combing
        } else if first_line.to_ascii_lowercase().contains("bastille battalion") {
            LogBlockType::Bastille
        } else if first_line.starts_with("Ascension #") {
            LogBlockType::AscensionData
        } else if first_line.trim() == "Player Snapshot" {
            LogBlockType::PlayerSnapshot
        } else if first_line.starts_with("Hybridizing yourself")
            || first_line.starts_with("Making a Gene Tonic")
        {
            LogBlockType::HybridData
        } else if CONSUME_COMMAND.is_match(first_line) {
            LogBlockType::Consumable
        } else {
            LogBlockType::Other
        }
    }
}

impl fmt::Display for LogBlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One classified block. `lines` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogBlock {
    pub block_type: LogBlockType,
    pub lines: Vec<String>,
}

impl LogBlock {
    pub fn new(lines: Vec<String>) -> Self {
        let block_type = lines
            .first()
            .map_or(LogBlockType::Other, |first| LogBlockType::classify(first));
        Self { block_type, lines }
    }

    pub fn first_line(&self) -> &str {
        self.line(0).unwrap_or_default()
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Debug dump form: a header naming the type, then the lines.
impl fmt::Display for LogBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "-------- BLOCK: {} --------", self.block_type)?;
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
