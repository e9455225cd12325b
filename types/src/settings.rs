use serde::{Deserialize, Serialize};

/// Flags consulted while parsing a session log.
///
/// Every field has a default, so a partial TOML table (or an empty file)
/// deserializes cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserSettings {
    /// Dump every classified block to a side file while parsing.
    pub debug: bool,

    /// Fold duplicate same-numbered turns the way KoLmafia iterates them
    /// (into the turn before the duplicate) instead of into the first
    /// occurrence.
    pub mafia_turn_iteration: bool,

    /// Disable all path-specific ascension-end detection.
    pub old_ascension_counting: bool,

    /// Parse `Note:` lines into per-turn notes.
    pub include_notes: bool,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            debug: false,
            mafia_turn_iteration: true,
            old_ascension_counting: false,
            include_notes: false,
        }
    }
}
