use std::sync::LazyLock;

use regex::Regex;

use super::{LineParser, bounded_count, parse_amount};
use crate::error::ParseError;
use crate::game_data::{StatGain, lookup_limited_use};
use crate::parser::ParseContext;
use crate::session_log::LogBlockType;
use crate::timeline::{DayChange, LevelData, Timeline};

pub(crate) const DAY_CHANGE_NOTE: &str = "Day change occurred";

static SKILL_CAST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^cast (\d[\d,]*) (.+)$").expect("valid regex"));
static DAY_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^===Day (\d+)===$").expect("valid regex"));
static TOOK_CHOICE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Took choice (\d+/\d+):").expect("valid regex"));

/// `cast N SKILL`. Skills that spend a daily charge also record a limited
/// use per cast.
pub struct SkillCastParser;

impl LineParser for SkillCastParser {
    fn is_compatible(&self, line: &str) -> bool {
        line.starts_with("cast ") && SKILL_CAST.is_match(line)
    }

    fn apply_to(
        &self,
        line: &str,
        timeline: &mut Timeline,
        _ctx: &mut ParseContext,
    ) -> Result<(), ParseError> {
        let Some(caps) = SKILL_CAST.captures(line) else {
            return Ok(());
        };
        let Some(casts) = parse_amount::<u32>(&caps[1]) else {
            tracing::warn!(line = %line, "Unreadable cast count, line skipped");
            return Ok(());
        };
        let casts = bounded_count(LogBlockType::Other, "casts", casts)?;
        let skill = caps[2].to_lowercase();
        timeline.current_turn_mut()?.data.skills_cast.add(&skill, casts);
        if let Some((counter, sub_use)) = lookup_limited_use(&skill) {
            for _ in 0..casts {
                timeline.add_limited_use(counter, sub_use, StatGain::NONE)?;
            }
        }
        Ok(())
    }
}

/// Start the next day at the turn the next adventure will carry.
pub(crate) fn advance_day(timeline: &mut Timeline, day: u32) {
    let turn_number = timeline.next_turn_number();
    timeline.add_day_change(DayChange { day, turn_number });
}

/// `===Day N===` markers (backfilling skipped days) and `Day change
/// occurred` notices. A notice right after a date header the date watch
/// already counted is the same day change and is skipped.
pub struct DayChangeParser;

impl LineParser for DayChangeParser {
    fn is_compatible(&self, line: &str) -> bool {
        line == DAY_CHANGE_NOTE || DAY_MARKER.is_match(line)
    }

    fn apply_to(
        &self,
        line: &str,
        timeline: &mut Timeline,
        ctx: &mut ParseContext,
    ) -> Result<(), ParseError> {
        if line == DAY_CHANGE_NOTE && ctx.take_date_change() {
            return Ok(());
        }
        ctx.explicit_day_change();
        let current = timeline.current_day_number();
        let target = match DAY_MARKER.captures(line) {
            Some(caps) => match caps[1].parse::<u32>() {
                Ok(day) => day,
                Err(_) => {
                    tracing::warn!(line = %line, "Unreadable day number, line skipped");
                    return Ok(());
                }
            },
            None => current + 1,
        };
        bounded_count(LogBlockType::Other, "days", target.saturating_sub(current))?;
        for day in current + 1..=target {
            advance_day(timeline, day);
        }
        Ok(())
    }
}

/// `Took choice D/D:` for choices that spend a limited use.
pub struct TookChoiceParser;

impl TookChoiceParser {
    fn choice(line: &str) -> Option<&str> {
        TOOK_CHOICE.captures(line).and_then(|caps| caps.get(1)).map(|m| m.as_str())
    }
}

impl LineParser for TookChoiceParser {
    fn is_compatible(&self, line: &str) -> bool {
        Self::choice(line).is_some_and(|choice| lookup_limited_use(choice).is_some())
    }

    fn apply_to(
        &self,
        line: &str,
        timeline: &mut Timeline,
        _ctx: &mut ParseContext,
    ) -> Result<(), ParseError> {
        if let Some((counter, sub_use)) = Self::choice(line).and_then(lookup_limited_use) {
            timeline.add_limited_use(counter, sub_use, StatGain::NONE)?;
        }
        Ok(())
    }
}

/// `You gain a Level!` / `You gain some Levels!`
pub struct LevelParser;

impl LineParser for LevelParser {
    fn is_compatible(&self, line: &str) -> bool {
        line.starts_with("You gain a Level!") || line.starts_with("You gain some Levels!")
    }

    fn apply_to(
        &self,
        _line: &str,
        timeline: &mut Timeline,
        _ctx: &mut ParseContext,
    ) -> Result<(), ParseError> {
        let turn_number = timeline.current_turn_mut()?.turn_number;
        let level = timeline.last_level().map_or(1, |l| l.level) + 1;
        timeline.add_level(LevelData { level, turn_number });
        Ok(())
    }
}

/// `Note: TEXT`, only registered when notes are wanted.
pub struct NotesParser;

impl LineParser for NotesParser {
    fn is_compatible(&self, line: &str) -> bool {
        line.starts_with("Note: ")
    }

    fn apply_to(
        &self,
        line: &str,
        timeline: &mut Timeline,
        _ctx: &mut ParseContext,
    ) -> Result<(), ParseError> {
        let note = line.trim_start_matches("Note: ").trim();
        if !note.is_empty() {
            timeline.current_turn_mut()?.data.notes.push(note.to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_data::Counter;
    use crate::timeline::{Equipment, NO_FAMILIAR, Turn};

    fn apply(parser: &dyn LineParser, timeline: &mut Timeline, line: &str) -> bool {
        parser
            .parse_line(line, timeline, &mut ParseContext::new())
            .unwrap()
    }

    fn timeline_at(turn_number: u32) -> Timeline {
        let mut timeline = Timeline::detailed();
        timeline
            .add_turn(Turn::new(
                "The Spooky Forest",
                "The Spooky Forest",
                turn_number,
                1,
                Equipment::default(),
                NO_FAMILIAR,
            ))
            .unwrap();
        timeline
    }

    #[test]
    fn test_took_choice_limited_use() {
        let mut timeline = timeline_at(33);
        assert!(apply(&TookChoiceParser, &mut timeline, "Took choice 1395/4: whatever"));
        assert!(!apply(&TookChoiceParser, &mut timeline, "Took choice 1/1: Unlimited"));

        let uses: Vec<_> = timeline.limited_uses().collect();
        assert_eq!(uses.len(), 1);
        assert_eq!(uses[0].counter, Counter::Pillkeeper);
        assert_eq!(uses[0].sub_use, "Rainbowolin");
        assert_eq!(uses[0].turn_number, 33);
        assert_eq!(uses[0].day, 1);
    }

    #[test]
    fn test_skill_cast_counts_and_limited_uses() {
        let mut timeline = timeline_at(4);
        assert!(apply(&SkillCastParser, &mut timeline, "cast 3 The Ode to Booze"));
        assert!(apply(&SkillCastParser, &mut timeline, "cast 2 CHEAT CODE: Triple Size"));
        let turn = timeline.last_turn().unwrap();
        assert_eq!(turn.data.skills_cast.get("the ode to booze"), 3);
        assert_eq!(turn.data.limited_uses.len(), 2);
        assert_eq!(turn.data.limited_uses[0].counter, Counter::CheatCode);
    }

    #[test]
    fn test_day_marker_backfills() {
        let mut timeline = timeline_at(50);
        assert!(apply(&DayChangeParser, &mut timeline, "===Day 3==="));
        let days: Vec<_> = timeline.day_changes().map(|d| (d.day, d.turn_number)).collect();
        assert_eq!(days, vec![(1, 0), (2, 51), (3, 51)]);

        assert!(apply(&DayChangeParser, &mut timeline, DAY_CHANGE_NOTE));
        assert_eq!(timeline.current_day_number(), 4);
    }

    #[test]
    fn test_notice_after_counted_date_change_is_skipped() {
        let mut timeline = timeline_at(8);
        let mut ctx = ParseContext::new();
        ctx.observe_date_line("March 3, 2020 - Jarlsuary 4");
        assert!(ctx.observe_date_line("March 3, 2020 - Jarlsuary 5"));
        advance_day(&mut timeline, 2);

        assert!(DayChangeParser.parse_line(DAY_CHANGE_NOTE, &mut timeline, &mut ctx).unwrap());
        assert_eq!(timeline.current_day_number(), 2);

        DayChangeParser.parse_line(DAY_CHANGE_NOTE, &mut timeline, &mut ctx).unwrap();
        assert_eq!(timeline.current_day_number(), 3);
    }

    #[test]
    fn test_absurd_counts_are_malformed() {
        let mut timeline = timeline_at(5);
        let mut ctx = ParseContext::new();
        let err = SkillCastParser
            .parse_line("cast 4294967295 The Ode to Booze", &mut timeline, &mut ctx)
            .unwrap_err();
        assert!(matches!(err, ParseError::MalformedBlock { .. }));
        assert!(timeline.last_turn().unwrap().data.skills_cast.is_empty());

        let err = DayChangeParser
            .parse_line("===Day 4294967295===", &mut timeline, &mut ctx)
            .unwrap_err();
        assert!(matches!(err, ParseError::MalformedBlock { .. }));
        assert_eq!(timeline.current_day_number(), 1);
    }

    #[test]
    fn test_level_up_at_current_turn() {
        let mut timeline = timeline_at(12);
        assert!(apply(&LevelParser, &mut timeline, "You gain a Level!"));
        assert!(apply(&LevelParser, &mut timeline, "You gain some Levels!"));
        let levels: Vec<_> = timeline.levels().map(|l| (l.level, l.turn_number)).collect();
        assert_eq!(levels, vec![(1, 0), (2, 12), (3, 12)]);
    }

    #[test]
    fn test_notes() {
        let mut timeline = timeline_at(2);
        assert!(apply(&NotesParser, &mut timeline, "Note: remember the key"));
        assert_eq!(timeline.last_turn().unwrap().data.notes, vec!["remember the key"]);
    }
}
