//! Parsers for structured blocks.
//!
//! A block parser consumes a whole block at once because the meaning of a
//! line depends on its neighbours: an encounter's outcome decides what the
//! turn is, a Bastille block's configuration is only known after all its
//! lines were seen.

mod ascension;
mod bastille;
mod combing;
mod consumable;
mod encounter;
mod service;
mod snapshot;

pub use ascension::{AscensionDataBlockParser, HybridDataBlockParser};
pub use bastille::BastilleBlockParser;
pub use combing::CombingBlockParser;
pub use consumable::ConsumableBlockParser;
pub use encounter::EncounterBlockParser;
pub use service::ServiceBlockParser;
pub(crate) use service::DONATE_BODY;
pub use snapshot::PlayerSnapshotBlockParser;

use super::ParseContext;
use crate::error::ParseError;
use crate::session_log::LogBlock;
use crate::timeline::Timeline;

pub trait BlockParser: Send + Sync {
    /// Apply a block of the type this parser is registered for.
    ///
    /// Unrecognized lines are skipped. Only a block missing a line its type
    /// guarantees is an error.
    fn parse_block(
        &self,
        block: &LogBlock,
        timeline: &mut Timeline,
        ctx: &mut ParseContext,
    ) -> Result<(), ParseError>;
}

#[cfg(test)]
pub(crate) fn make_block(lines: &[&str]) -> LogBlock {
    LogBlock::new(lines.iter().map(|line| line.to_string()).collect())
}
