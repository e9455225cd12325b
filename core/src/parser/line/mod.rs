//! Single-line parsers.
//!
//! Each parser recognizes one line shape and applies it to the timeline.
//! Parsers are tried in a fixed order and the first compatible one claims
//! the line; several patterns overlap on purpose (`You gain 5 Meat` vs.
//! `You gain 5 Moxie`), so order matters.

mod acquisition;
mod equipment;
mod progress;
mod resources;

pub use acquisition::{EffectAcquisitionParser, ItemAcquisitionParser, LearnedSkillParser, PullParser};
pub(crate) use acquisition::{DIABOLIC_PIZZA, parse_effect_line};
pub use equipment::{EquipmentChangeParser, FamiliarChangeParser};
pub use progress::{DayChangeParser, LevelParser, NotesParser, SkillCastParser, TookChoiceParser};
pub(crate) use progress::{DAY_CHANGE_NOTE, advance_day};
pub use resources::{MeatParser, MeatSpentParser, MpGainParser, StatParser, stat_gain_of};

use super::ParseContext;
use crate::error::ParseError;
use crate::session_log::LogBlockType;
use crate::timeline::{MeatSource, MpSource, Timeline};

/// Most times one line may repeat an action (casts, days, levels, service
/// turns). Larger counts only come from corrupt lines.
pub(crate) const MAX_REPEAT: u32 = 10_000;

pub trait LineParser: Send + Sync {
    /// Cheap check whether this parser handles `line`.
    fn is_compatible(&self, line: &str) -> bool;

    /// Apply a compatible line. Recoverable oddities are logged, not
    /// returned.
    fn apply_to(
        &self,
        line: &str,
        timeline: &mut Timeline,
        ctx: &mut ParseContext,
    ) -> Result<(), ParseError>;

    /// Apply `line` if compatible. Returns whether the line was claimed.
    fn parse_line(
        &self,
        line: &str,
        timeline: &mut Timeline,
        ctx: &mut ParseContext,
    ) -> Result<bool, ParseError> {
        if !self.is_compatible(line) {
            return Ok(false);
        }
        self.apply_to(line, timeline, ctx)?;
        Ok(true)
    }
}

pub type LineParsers = Vec<Box<dyn LineParser>>;

/// Offer `line` to each parser in order until one claims it.
pub fn dispatch(
    parsers: &[Box<dyn LineParser>],
    line: &str,
    timeline: &mut Timeline,
    ctx: &mut ParseContext,
) -> Result<bool, ParseError> {
    for parser in parsers {
        if parser.parse_line(line, timeline, ctx)? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Parsers for lines outside any structured block.
pub fn other_block_parsers(include_notes: bool) -> LineParsers {
    let mut parsers: LineParsers = vec![
        Box::new(ItemAcquisitionParser),
        Box::new(SkillCastParser),
        Box::new(FamiliarChangeParser),
        Box::new(MeatParser::new(MeatSource::Other)),
        Box::new(MeatSpentParser),
        Box::new(StatParser),
        Box::new(MpGainParser::new(MpSource::NotEncounter)),
        Box::new(EquipmentChangeParser),
        Box::new(PullParser),
        Box::new(EffectAcquisitionParser),
        Box::new(DayChangeParser),
        Box::new(LearnedSkillParser),
        Box::new(TookChoiceParser),
        Box::new(LevelParser),
    ];
    if include_notes {
        parsers.push(Box::new(NotesParser));
    }
    parsers
}

/// Parsers for the lines of an encounter block after the turn is created.
pub fn encounter_parsers() -> LineParsers {
    vec![
        Box::new(ItemAcquisitionParser),
        Box::new(MeatParser::new(MeatSource::Encounter)),
        Box::new(StatParser),
        Box::new(MpGainParser::new(MpSource::Encounter)),
        Box::new(EffectAcquisitionParser),
        Box::new(LearnedSkillParser),
        Box::new(TookChoiceParser),
        Box::new(LevelParser),
    ]
}

/// Parsers for the side effects of eating, drinking, chewing or using.
pub fn consumable_parsers() -> LineParsers {
    vec![
        Box::new(ItemAcquisitionParser),
        Box::new(MeatParser::new(MeatSource::Other)),
        Box::new(MpGainParser::new(MpSource::Consumable)),
        Box::new(EffectAcquisitionParser),
        Box::new(LearnedSkillParser),
        Box::new(LevelParser),
    ]
}

/// Reject a repeat count above [`MAX_REPEAT`].
pub(crate) fn bounded_count(
    block_type: LogBlockType,
    what: &str,
    count: u32,
) -> Result<u32, ParseError> {
    if count > MAX_REPEAT {
        return Err(ParseError::malformed(
            block_type,
            format!("{count} {what} exceeds the limit of {MAX_REPEAT}"),
        ));
    }
    Ok(count)
}

/// Parse a possibly comma-grouped amount (`1,250`).
pub(crate) fn parse_amount<T: std::str::FromStr>(text: &str) -> Option<T> {
    text.replace(',', "").parse().ok()
}
