use std::sync::LazyLock;

use regex::Regex;

use super::{LineParser, parse_amount};
use crate::error::ParseError;
use crate::game_data::{StatClass, StatGain, stat_class};
use crate::parser::ParseContext;
use crate::timeline::{MeatGain, MeatSource, MpGain, MpSource, Timeline};

static MEAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^You (gain|lose) (\d[\d,]*) Meat").expect("valid regex"));
static MEAT_SPENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^You spent (\d[\d,]*) Meat").expect("valid regex"));
static BUY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^buy (\d[\d,]*) (.+?) for (\d[\d,]*) each").expect("valid regex")
});
static MP_GAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^You gain (\d[\d,]*) (?:Mana|Mojo|Muscularity) Points").expect("valid regex")
});

/// `You gain|lose N Meat`. Gains are credited to the configured source;
/// losses count as meat spent.
pub struct MeatParser {
    source: MeatSource,
}

impl MeatParser {
    pub fn new(source: MeatSource) -> Self {
        Self { source }
    }
}

impl LineParser for MeatParser {
    fn is_compatible(&self, line: &str) -> bool {
        MEAT.is_match(line)
    }

    fn apply_to(
        &self,
        line: &str,
        timeline: &mut Timeline,
        _ctx: &mut ParseContext,
    ) -> Result<(), ParseError> {
        let Some(caps) = MEAT.captures(line) else {
            return Ok(());
        };
        let Some(amount) = parse_amount::<i64>(&caps[2]) else {
            tracing::warn!(line = %line, "Unreadable meat amount, line skipped");
            return Ok(());
        };
        let gain = if &caps[1] == "lose" {
            MeatGain::spent(amount)
        } else {
            MeatGain::gained(self.source, amount)
        };
        timeline.current_turn_mut()?.data.meat += gain;
        Ok(())
    }
}

/// Meat paid at shops: `You spent N Meat` or `buy N ITEM for M each`.
pub struct MeatSpentParser;

impl MeatSpentParser {
    fn amount(line: &str) -> Option<i64> {
        if let Some(caps) = MEAT_SPENT.captures(line) {
            return parse_amount(&caps[1]);
        }
        let caps = BUY.captures(line)?;
        let count: i64 = parse_amount(&caps[1])?;
        let price: i64 = parse_amount(&caps[3])?;
        Some(count * price)
    }
}

impl LineParser for MeatSpentParser {
    fn is_compatible(&self, line: &str) -> bool {
        MEAT_SPENT.is_match(line) || BUY.is_match(line)
    }

    fn apply_to(
        &self,
        line: &str,
        timeline: &mut Timeline,
        _ctx: &mut ParseContext,
    ) -> Result<(), ParseError> {
        match Self::amount(line) {
            Some(amount) => timeline.current_turn_mut()?.data.meat += MeatGain::spent(amount),
            None => tracing::warn!(line = %line, "Unreadable meat amount, line skipped"),
        }
        Ok(())
    }
}

/// Split `[After Battle: ]You gain|lose N SUBSTAT` into its parts.
fn split_stat_line(line: &str) -> Option<(bool, &str, StatClass)> {
    let line = line.strip_prefix("After Battle: ").unwrap_or(line);
    let (lose, rest) = match line.strip_prefix("You gain ") {
        Some(rest) => (false, rest),
        None => (true, line.strip_prefix("You lose ")?),
    };
    let class = stat_class(rest.rsplit(' ').next()?)?;
    let (amount, _) = rest.split_once(' ')?;
    Some((lose, amount, class))
}

/// Stat change of a substat line, or `None` if the line is not one or its
/// amount is unreadable (logged).
pub fn stat_gain_of(line: &str) -> Option<StatGain> {
    let (lose, amount, class) = split_stat_line(line)?;
    let Some(amount) = parse_amount::<i32>(amount) else {
        tracing::warn!(line = %line, "Unreadable stat amount, line skipped");
        return None;
    };
    Some(StatGain::of(class, if lose { -amount } else { amount }))
}

pub struct StatParser;

impl LineParser for StatParser {
    fn is_compatible(&self, line: &str) -> bool {
        split_stat_line(line).is_some()
    }

    fn apply_to(
        &self,
        line: &str,
        timeline: &mut Timeline,
        _ctx: &mut ParseContext,
    ) -> Result<(), ParseError> {
        if let Some(gain) = stat_gain_of(line) {
            timeline.current_turn_mut()?.data.stat_gain += gain;
        }
        Ok(())
    }
}

/// `You gain N Mana|Mojo|Muscularity Points`.
pub struct MpGainParser {
    source: MpSource,
}

impl MpGainParser {
    pub fn new(source: MpSource) -> Self {
        Self { source }
    }
}

impl LineParser for MpGainParser {
    fn is_compatible(&self, line: &str) -> bool {
        MP_GAIN.is_match(line)
    }

    fn apply_to(
        &self,
        line: &str,
        timeline: &mut Timeline,
        _ctx: &mut ParseContext,
    ) -> Result<(), ParseError> {
        let Some(amount) = MP_GAIN.captures(line).and_then(|caps| parse_amount::<i32>(&caps[1])) else {
            tracing::warn!(line = %line, "Unreadable MP amount, line skipped");
            return Ok(());
        };
        timeline.current_turn_mut()?.data.mp_gain += MpGain::of(self.source, amount);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(parser: &dyn LineParser, timeline: &mut Timeline, line: &str) -> bool {
        parser
            .parse_line(line, timeline, &mut ParseContext::new())
            .unwrap()
    }

    #[test]
    fn test_meat_sources() {
        let mut timeline = Timeline::detailed();
        let encounter = MeatParser::new(MeatSource::Encounter);
        assert!(apply(&encounter, &mut timeline, "You gain 1,250 Meat"));
        assert!(apply(&encounter, &mut timeline, "You lose 40 Meat"));
        assert!(!apply(&encounter, &mut timeline, "You gain 12 Muscleboundness"));
        assert!(apply(&MeatSpentParser, &mut timeline, "buy 3 chewing gum on a string for 30 each from Market"));
        assert!(apply(&MeatSpentParser, &mut timeline, "You spent 500 Meat"));

        let meat = timeline.last_turn().unwrap().data.meat;
        assert_eq!(meat.encounter, 1250);
        assert_eq!(meat.other, 0);
        assert_eq!(meat.spent, 40 + 90 + 500);
    }

    #[test]
    fn test_stat_lines() {
        assert_eq!(stat_gain_of("You gain 5 Muscleboundness"), Some(StatGain::of(StatClass::Muscle, 5)));
        assert_eq!(stat_gain_of("You lose 2 Chutzpah"), Some(StatGain::of(StatClass::Moxie, -2)));
        assert_eq!(
            stat_gain_of("After Battle: You gain 1,024 Wizardliness"),
            Some(StatGain::of(StatClass::Mysticality, 1024))
        );
        assert_eq!(stat_gain_of("You gain 5 Meat"), None);
        assert_eq!(stat_gain_of("You gain a Level!"), None);
    }

    #[test]
    fn test_unreadable_stat_amount_is_claimed_and_skipped() {
        let mut timeline = Timeline::detailed();
        assert!(apply(&StatParser, &mut timeline, "You gain lots Strongness"));
        assert!(timeline.last_turn().unwrap().data.stat_gain.is_empty());
    }

    #[test]
    fn test_mp_gain_source() {
        let mut timeline = Timeline::detailed();
        let parser = MpGainParser::new(MpSource::NotEncounter);
        assert!(apply(&parser, &mut timeline, "You gain 25 Mojo Points"));
        assert!(!apply(&parser, &mut timeline, "You gain 25 Hit Points"));
        assert_eq!(timeline.last_turn().unwrap().data.mp_gain.out_of_encounter, 25);
    }
}
