use std::sync::LazyLock;

use regex::Regex;

use super::BlockParser;
use crate::error::ParseError;
use crate::game_data::StatGain;
use crate::parser::ParseContext;
use crate::parser::line::{
    DIABOLIC_PIZZA, LineParsers, consumable_parsers, dispatch, parse_amount, parse_effect_line,
    stat_gain_of,
};
use crate::session_log::{CONSUME_COMMAND, LogBlock};
use crate::timeline::{Consumable, ConsumableKind, Timeline};

static ADVENTURE_GAIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^You gain (\d[\d,]*) Adventures?$").expect("valid regex"));

/// `eat|drink|chew|use N NAME` and the lines the consumption produced.
///
/// Adventure and stat gains belong to the consumable itself; everything
/// else lands on the current turn like any other line.
pub struct ConsumableBlockParser {
    line_parsers: LineParsers,
}

impl ConsumableBlockParser {
    pub fn new() -> Self {
        Self {
            line_parsers: consumable_parsers(),
        }
    }
}

impl Default for ConsumableBlockParser {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockParser for ConsumableBlockParser {
    fn parse_block(
        &self,
        block: &LogBlock,
        timeline: &mut Timeline,
        ctx: &mut ParseContext,
    ) -> Result<(), ParseError> {
        let caps = CONSUME_COMMAND
            .captures(block.first_line())
            .ok_or_else(|| ParseError::malformed(block.block_type, "missing consume command"))?;
        let kind = ConsumableKind::from_verb(&caps[1])
            .ok_or_else(|| ParseError::malformed(block.block_type, "unknown consume verb"))?;
        let amount = parse_amount::<u32>(&caps[2])
            .ok_or_else(|| ParseError::malformed(block.block_type, "amount out of range"))?;
        let name = caps[3].trim().to_string();
        let is_pizza = kind == ConsumableKind::Food && name.eq_ignore_ascii_case(DIABOLIC_PIZZA);

        let (turn_number, day) = {
            let turn = timeline.current_turn_mut()?;
            (turn.turn_number, turn.day)
        };
        let mut consumable = Consumable {
            name,
            kind,
            amount,
            adventure_gain: 0,
            stat_gain: StatGain::NONE,
            day,
            turn_number,
        };

        for line in block.lines.iter().skip(1) {
            if let Some(caps) = ADVENTURE_GAIN.captures(line) {
                match parse_amount::<u32>(&caps[1]) {
                    Some(adventures) => consumable.adventure_gain += adventures,
                    None => tracing::warn!(line = %line, "Unreadable adventure gain, line skipped"),
                }
                continue;
            }
            if let Some(gain) = stat_gain_of(line) {
                consumable.stat_gain += gain;
                continue;
            }
            if is_pizza && let Some((effect, duration)) = parse_effect_line(line) {
                timeline.add_pizza_event(effect, duration)?;
            }
            dispatch(&self.line_parsers, line, timeline, ctx)?;
        }

        timeline.current_turn_mut()?.data.consumables_used.push(consumable);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_data::StatClass;
    use crate::parser::block::make_block;
    use crate::timeline::{Equipment, NO_FAMILIAR, Turn};

    fn timeline_at(turn_number: u32) -> Timeline {
        let mut timeline = Timeline::detailed();
        timeline
            .add_turn(Turn::new(
                "The Outskirts of Cobb's Knob",
                "Knob Goblin Embezzler",
                turn_number,
                1,
                Equipment::default(),
                NO_FAMILIAR,
            ))
            .unwrap();
        timeline
    }

    fn parse(timeline: &mut Timeline, lines: &[&str]) {
        ConsumableBlockParser::new()
            .parse_block(&make_block(lines), timeline, &mut ParseContext::new())
            .unwrap();
    }

    #[test]
    fn test_food_with_gains() {
        let mut timeline = timeline_at(30);
        parse(
            &mut timeline,
            &[
                "eat 1 hot hi mein",
                "You gain 17 Adventures",
                "You gain 30 Strongness",
                "You gain 4 Mana Points",
                "You gain 25 Meat",
            ],
        );
        let turn = timeline.last_turn().unwrap();
        let consumable = &turn.data.consumables_used[0];
        assert_eq!(consumable.name, "hot hi mein");
        assert_eq!(consumable.kind, ConsumableKind::Food);
        assert_eq!(consumable.amount, 1);
        assert_eq!(consumable.adventure_gain, 17);
        assert_eq!(consumable.stat_gain, StatGain::of(StatClass::Muscle, 30));
        assert_eq!(consumable.turn_number, 30);
        assert_eq!(turn.data.mp_gain.consumable, 4);
        assert_eq!(turn.data.meat.other, 25);
        assert!(turn.data.stat_gain.is_empty());
        assert_eq!(turn.data.total_stat_gain(), StatGain::of(StatClass::Muscle, 30));
    }

    #[test]
    fn test_kinds_by_verb() {
        let mut timeline = timeline_at(2);
        parse(&mut timeline, &["drink 2 Ice Island Long Tea", "You gain 3 Adventures"]);
        parse(&mut timeline, &["chew 1 agua de vida", "You gain 1 Adventure"]);
        parse(&mut timeline, &["use 1 milk of magnesium"]);
        let turn = timeline.last_turn().unwrap();
        let kinds: Vec<_> = turn.data.consumables_used.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![ConsumableKind::Booze, ConsumableKind::Spleen, ConsumableKind::Other]
        );
    }

    #[test]
    fn test_diabolic_pizza_effects() {
        let mut timeline = timeline_at(44);
        parse(
            &mut timeline,
            &[
                "eat 1 diabolic pizza",
                "You gain 12 Adventures",
                "You acquire an effect: Certainty (50)",
            ],
        );
        let events = &timeline.last_turn().unwrap().data.pizza_events;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].description, "Certainty");
        assert_eq!(events[0].duration, 50);
    }
}
