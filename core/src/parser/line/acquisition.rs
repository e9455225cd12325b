use std::sync::LazyLock;

use regex::Regex;

use super::{LineParser, parse_amount};
use crate::error::ParseError;
use crate::game_data::{Counter, StatGain, lookup_limited_use};
use crate::parser::ParseContext;
use crate::timeline::{MpGain, MpSource, Pull, Timeline, TurnEntry};

pub(crate) const DIABOLIC_PIZZA: &str = "diabolic pizza";

static SINGLE_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^You acquire an item: (.+)$").expect("valid regex"));
static MULTIPLE_ITEMS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^You acquire (.+) \((\d[\d,]*)\)$").expect("valid regex"));
static EFFECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^You acquire an effect:\s*(.*?)\s*[(](\d+)[)]\s*$").expect("valid regex")
});
static YELLOW_RAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^Round \d+: .+? swings his eyestalk around and unleashes a massive ray of yellow energy, completely disintegrating your opponent\.$",
    )
    .expect("valid regex")
});
static PULL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^pull: (\d[\d,]*) (.+)$").expect("valid regex"));
static LEARNED_SKILL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^You learn(?:ed)? a new skill: (.+)$").expect("valid regex"));

/// Name and duration of an acquired effect, as written in the log.
pub(crate) fn parse_effect_line(line: &str) -> Option<(&str, u32)> {
    let caps = EFFECT.captures(line)?;
    let name = caps.get(1)?.as_str();
    let duration = caps.get(2)?.as_str().parse().ok()?;
    Some((name, duration))
}

fn parse_item_line(line: &str) -> Option<(&str, &str)> {
    if line.starts_with("You acquire an effect") || line.starts_with("You acquire an intrinsic") {
        return None;
    }
    if let Some(caps) = SINGLE_ITEM.captures(line) {
        return Some((caps.get(1)?.as_str(), "1"));
    }
    let caps = MULTIPLE_ITEMS.captures(line)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

/// `You acquire an item: X` / `You acquire X (N)`.
pub struct ItemAcquisitionParser;

impl LineParser for ItemAcquisitionParser {
    fn is_compatible(&self, line: &str) -> bool {
        line.starts_with("You acquire ") && parse_item_line(line).is_some()
    }

    fn apply_to(
        &self,
        line: &str,
        timeline: &mut Timeline,
        _ctx: &mut ParseContext,
    ) -> Result<(), ParseError> {
        let Some((name, amount)) = parse_item_line(line) else {
            return Ok(());
        };
        let Some(amount) = parse_amount::<u32>(amount) else {
            tracing::warn!(line = %line, "Unreadable item amount, line skipped");
            return Ok(());
        };
        timeline.current_turn_mut()?.data.dropped_items.add(name, amount);
        if name.eq_ignore_ascii_case(DIABOLIC_PIZZA) {
            timeline.add_pizza_event(DIABOLIC_PIZZA, 0)?;
        }
        Ok(())
    }
}

enum SpecialEffect {
    Disintegrated,
    Hunted,
    LimitedUse(Counter, &'static str),
    PoolMp,
}

fn special_effect(name: &str) -> Option<SpecialEffect> {
    let effect = match name {
        "everything looks yellow" => SpecialEffect::Disintegrated,
        "on the trail" => SpecialEffect::Hunted,
        "muddled" => SpecialEffect::LimitedUse(Counter::DaycareSpa, "Mud bath"),
        "ten out of ten" => SpecialEffect::LimitedUse(Counter::DaycareSpa, "Mani-pedi"),
        "uncucumbered" => SpecialEffect::LimitedUse(Counter::DaycareSpa, "Eye treatment"),
        "flagrantly fragrant" => SpecialEffect::LimitedUse(Counter::DaycareSpa, "Aromatherapy"),
        "a girl named sue" => SpecialEffect::LimitedUse(Counter::FortuneTeller, "Susie"),
        "there's no n in love" => SpecialEffect::LimitedUse(Counter::FortuneTeller, "Hagnk"),
        "meet the meat" => SpecialEffect::LimitedUse(Counter::FortuneTeller, "Meatsmith"),
        "gunther than thou" => SpecialEffect::LimitedUse(Counter::FortuneTeller, "Gunther"),
        "everybody calls him gorgon" => {
            SpecialEffect::LimitedUse(Counter::FortuneTeller, "Gorgonzola")
        }
        "they call him shifty because..." => {
            SpecialEffect::LimitedUse(Counter::FortuneTeller, "Shifty")
        }
        "mental a-cue-ity" => SpecialEffect::PoolMp,
        _ => {
            let (counter, sub_use) = lookup_limited_use(name)?;
            SpecialEffect::LimitedUse(counter, sub_use)
        }
    };
    Some(effect)
}

fn effect_of_line(line: &str) -> Option<SpecialEffect> {
    if let Some((name, _)) = parse_effect_line(line) {
        return special_effect(&name.to_lowercase());
    }
    YELLOW_RAY
        .is_match(line)
        .then_some(SpecialEffect::Disintegrated)
}

/// Effects with a bookkeeping consequence; all others are ignored.
pub struct EffectAcquisitionParser;

impl LineParser for EffectAcquisitionParser {
    fn is_compatible(&self, line: &str) -> bool {
        (line.starts_with("You acquire an effect:") || line.starts_with("Round "))
            && effect_of_line(line).is_some()
    }

    fn apply_to(
        &self,
        line: &str,
        timeline: &mut Timeline,
        _ctx: &mut ParseContext,
    ) -> Result<(), ParseError> {
        let Some(effect) = effect_of_line(line) else {
            return Ok(());
        };
        let turn = timeline.current_turn_mut()?;
        match effect {
            SpecialEffect::Disintegrated => turn.disintegrated = true,
            SpecialEffect::PoolMp => turn.data.mp_gain += MpGain::of(MpSource::Encounter, 100),
            SpecialEffect::Hunted => {
                let entry = TurnEntry::new(turn.encounter.clone(), turn.turn_number);
                timeline.add_hunted_combat(entry);
            }
            SpecialEffect::LimitedUse(counter, sub_use) => {
                timeline.add_limited_use(counter, sub_use, StatGain::NONE)?;
            }
        }
        Ok(())
    }
}

/// `pull: N ITEM` from Hagnk's.
pub struct PullParser;

impl LineParser for PullParser {
    fn is_compatible(&self, line: &str) -> bool {
        line.starts_with("pull: ") && PULL.is_match(line)
    }

    fn apply_to(
        &self,
        line: &str,
        timeline: &mut Timeline,
        _ctx: &mut ParseContext,
    ) -> Result<(), ParseError> {
        let Some(caps) = PULL.captures(line) else {
            return Ok(());
        };
        let Some(amount) = parse_amount::<u32>(&caps[1]) else {
            tracing::warn!(line = %line, "Unreadable pull amount, line skipped");
            return Ok(());
        };
        let pull = Pull {
            item: caps[2].to_string(),
            amount,
            turn_number: timeline.last_turn_number(),
            day: timeline.current_day_number(),
        };
        timeline.add_pull(pull);
        Ok(())
    }
}

pub struct LearnedSkillParser;

impl LineParser for LearnedSkillParser {
    fn is_compatible(&self, line: &str) -> bool {
        line.starts_with("You learn") && LEARNED_SKILL.is_match(line)
    }

    fn apply_to(
        &self,
        line: &str,
        timeline: &mut Timeline,
        _ctx: &mut ParseContext,
    ) -> Result<(), ParseError> {
        let Some(caps) = LEARNED_SKILL.captures(line) else {
            return Ok(());
        };
        let turn_number = timeline.current_turn_mut()?.turn_number;
        timeline.add_learned_skill(TurnEntry::new(&caps[1], turn_number));
        Ok(())
    }
}
