//! KoLmafia session log parsing.
//!
//! [`MafiaLogParser`] streams classified blocks from a log into a
//! [`Timeline`]: structured blocks go to their [`BlockParser`], loose lines
//! to the line parsers in priority order. Parsing stops after the block that
//! ends the ascension, then the timeline is finalized (trailing fold,
//! histories rebuilt from the turns, summary built).

mod ascension_end;
pub mod block;
mod context;
pub mod line;

#[cfg(test)]
mod parser_tests;

pub use ascension_end::ends_ascension;
pub use context::ParseContext;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use alv_types::ParserSettings;

use self::block::{
    AscensionDataBlockParser, BastilleBlockParser, BlockParser, CombingBlockParser,
    ConsumableBlockParser, EncounterBlockParser, HybridDataBlockParser,
    PlayerSnapshotBlockParser, ServiceBlockParser,
};
use self::line::{DAY_CHANGE_NOTE, LineParsers, advance_day, dispatch, other_block_parsers};
use crate::error::{LogParseFailure, ParseError};
use crate::game_data::{Counter, StatGain};
use crate::session_log::{BlockReader, LogBlock, LogBlockType, read_session_log, split_lines};
use crate::timeline::Timeline;

const SUMMON_CLIP_ART: &str = "cast 1 Summon Clip Art";
const CLIP_ART_SKILL: &str = "summon clip art";
const CLIP_ART_MP_COST: u32 = 2;
const ACQUIRE_ITEM: &str = "You acquire an item: ";

/// Name a parsed log is reported under: the file stem.
pub fn log_name_of(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Side file receiving every block as it is parsed.
struct BlockDump {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl BlockDump {
    fn create(path: &Path) -> Result<Self, ParseError> {
        let file = File::create(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
        })
    }

    fn write(&mut self, block: &LogBlock) -> Result<(), ParseError> {
        write!(self.writer, "{block}").map_err(|source| self.io_error(source))
    }

    fn finish(mut self) -> Result<(), ParseError> {
        self.writer.flush().map_err(|source| self.io_error(source))
    }

    fn io_error(&self, source: std::io::Error) -> ParseError {
        ParseError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// Parser for one KoLmafia session log at a time. Holds no per-log state,
/// so one instance can serve many logs.
pub struct MafiaLogParser {
    settings: ParserSettings,
    line_parsers: LineParsers,
    encounter: EncounterBlockParser,
    consumable: ConsumableBlockParser,
}

impl MafiaLogParser {
    pub fn new(settings: ParserSettings) -> Self {
        Self {
            settings,
            line_parsers: other_block_parsers(settings.include_notes),
            encounter: EncounterBlockParser::new(),
            consumable: ConsumableBlockParser::new(),
        }
    }

    pub fn settings(&self) -> &ParserSettings {
        &self.settings
    }

    /// Parse a log file. With `dump_path`, every block is also written
    /// there.
    pub fn parse_file(
        &self,
        path: &Path,
        dump_path: Option<&Path>,
    ) -> Result<Timeline, LogParseFailure> {
        let log_name = log_name_of(path);
        let lines = read_session_log(path).map_err(|source| LogParseFailure {
            log_name: log_name.clone(),
            last_turn: 0,
            source,
        })?;
        self.parse_lines(&log_name, lines, dump_path)
    }

    /// Parse log text already in memory.
    pub fn parse_text(&self, log_name: &str, text: &str) -> Result<Timeline, LogParseFailure> {
        self.parse_lines(log_name, split_lines(text.as_bytes()), None)
    }

    fn parse_lines(
        &self,
        log_name: &str,
        lines: Vec<String>,
        dump_path: Option<&Path>,
    ) -> Result<Timeline, LogParseFailure> {
        let mut timeline = Timeline::detailed();
        timeline.set_log_name(log_name);
        timeline.set_mafia_turn_iteration(self.settings.mafia_turn_iteration);

        match self.parse_blocks(lines, dump_path, &mut timeline) {
            Ok(()) => {
                timeline.finish_parse();
                tracing::debug!(
                    log = %log_name,
                    turns = timeline.turns().len(),
                    last_turn = timeline.last_turn_number(),
                    "Session log parsed"
                );
                Ok(timeline)
            }
            Err(source) => Err(LogParseFailure {
                log_name: log_name.to_string(),
                last_turn: timeline.last_turn_number(),
                source,
            }),
        }
    }

    fn parse_blocks(
        &self,
        lines: Vec<String>,
        dump_path: Option<&Path>,
        timeline: &mut Timeline,
    ) -> Result<(), ParseError> {
        let mut dump = dump_path.map(BlockDump::create).transpose()?;
        let mut ctx = ParseContext::new();

        for block in BlockReader::new(lines.into_iter()) {
            let ends_run = !self.settings.old_ascension_counting && ends_ascension(&block);
            if let Some(dump) = dump.as_mut() {
                dump.write(&block)?;
            }
            self.parse_block(&block, timeline, &mut ctx)?;
            if ends_run {
                tracing::debug!(
                    turn = timeline.last_turn_number(),
                    "Ascension finished, ignoring the rest of the log"
                );
                break;
            }
        }

        match dump {
            Some(dump) => dump.finish(),
            None => Ok(()),
        }
    }

    fn parse_block(
        &self,
        block: &LogBlock,
        timeline: &mut Timeline,
        ctx: &mut ParseContext,
    ) -> Result<(), ParseError> {
        let parser: &dyn BlockParser = match block.block_type {
            LogBlockType::Encounter => &self.encounter,
            LogBlockType::Consumable => &self.consumable,
            LogBlockType::PlayerSnapshot => &PlayerSnapshotBlockParser,
            LogBlockType::AscensionData => &AscensionDataBlockParser,
            LogBlockType::HybridData => &HybridDataBlockParser,
            LogBlockType::Service => &ServiceBlockParser,
            LogBlockType::Combing => &CombingBlockParser,
            LogBlockType::Bastille => &BastilleBlockParser,
            LogBlockType::Other => return self.parse_other_block(block, timeline, ctx),
        };
        ctx.clear_date_change();
        parser.parse_block(block, timeline, ctx)
    }

    fn parse_other_block(
        &self,
        block: &LogBlock,
        timeline: &mut Timeline,
        ctx: &mut ParseContext,
    ) -> Result<(), ParseError> {
        if block.first_line().eq_ignore_ascii_case(SUMMON_CLIP_ART) {
            return parse_clip_art(block, timeline);
        }
        for line in &block.lines {
            if ctx.observe_date_line(line) {
                let day = timeline.current_day_number() + 1;
                advance_day(timeline, day);
                let turn = timeline.current_turn_mut()?;
                turn.data.notes.push(DAY_CHANGE_NOTE.to_string());
                continue;
            }
            dispatch(&self.line_parsers, line, timeline, ctx)?;
            ctx.clear_date_change();
        }
        Ok(())
    }
}

/// `cast 1 Summon Clip Art` followed by the item it made. A summon that
/// made nothing is not counted.
fn parse_clip_art(block: &LogBlock, timeline: &mut Timeline) -> Result<(), ParseError> {
    let Some(acquired) = block.line(1) else {
        return Ok(());
    };
    let Some(clip_art) = acquired.strip_prefix(ACQUIRE_ITEM).map(str::trim) else {
        tracing::warn!(line = %acquired, "Clip Art summon without an item, block skipped");
        return Ok(());
    };
    let turn = timeline.current_turn_mut()?;
    turn.data.dropped_items.add(clip_art, 1);
    turn.data.skills_cast.add(CLIP_ART_SKILL, 1);
    turn.data.mp_spent += CLIP_ART_MP_COST;
    timeline.add_limited_use(Counter::ClipArt, clip_art, StatGain::NONE)?;
    Ok(())
}
