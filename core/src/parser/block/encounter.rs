use std::sync::LazyLock;

use regex::Regex;

use super::BlockParser;
use crate::error::ParseError;
use crate::game_data::{BANISH_SKILLS, StatGain, lookup_limited_use};
use crate::parser::ParseContext;
use crate::parser::line::{LineParsers, dispatch, encounter_parsers};
use crate::session_log::{LogBlock, TURN_MARKER};
use crate::timeline::{Timeline, Turn, TurnEntry};

const ENCOUNTER_PREFIX: &str = "Encounter: ";
const AFTER_BATTLE_PREFIX: &str = "After Battle: ";

static CASTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Round \d+: .+? casts (.+?)!$").expect("valid regex"));
static USES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Round \d+: .+? uses the (.+?)(?: and uses the (.+?))?!$").expect("valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Outcome {
    #[default]
    Undecided,
    Won,
    Lost,
}

/// What the `Round K:` lines of one fight say.
#[derive(Debug, Default)]
struct CombatRounds {
    outcome: Outcome,
    ran_away: bool,
    skills: Vec<String>,
    items: Vec<String>,
}

impl CombatRounds {
    fn read(lines: &[String]) -> Self {
        let mut rounds = Self::default();
        for line in lines.iter().filter(|l| l.starts_with("Round ")) {
            if line.ends_with("wins the fight!") {
                rounds.outcome = Outcome::Won;
            } else if line.ends_with("loses the fight!") {
                rounds.outcome = Outcome::Lost;
            } else if line.contains(" runs away") {
                rounds.ran_away = true;
            } else if let Some(caps) = CASTS.captures(line) {
                rounds.skills.push(caps[1].to_lowercase());
            } else if let Some(caps) = USES.captures(line) {
                rounds.items.extend(caps.iter().skip(1).flatten().map(|m| m.as_str().to_string()));
            }
        }
        if lines.iter().any(|l| l.contains("You lose. You slink away")) {
            rounds.outcome = Outcome::Lost;
        }
        rounds
    }

    fn banished(&self) -> bool {
        self.skills
            .iter()
            .any(|skill| BANISH_SKILLS.contains(&skill.as_str()))
    }
}

/// `[N] AREA` blocks: one adventure, fought or not.
pub struct EncounterBlockParser {
    line_parsers: LineParsers,
}

impl EncounterBlockParser {
    pub fn new() -> Self {
        Self {
            line_parsers: encounter_parsers(),
        }
    }
}

impl Default for EncounterBlockParser {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockParser for EncounterBlockParser {
    fn parse_block(
        &self,
        block: &LogBlock,
        timeline: &mut Timeline,
        ctx: &mut ParseContext,
    ) -> Result<(), ParseError> {
        let caps = TURN_MARKER
            .captures(block.first_line())
            .ok_or_else(|| ParseError::malformed(block.block_type, "missing turn marker"))?;
        let turn_number: u32 = caps[1]
            .parse()
            .map_err(|_| ParseError::malformed(block.block_type, "turn number out of range"))?;
        let area = caps[2].trim().to_string();
        let encounter = block
            .line(1)
            .and_then(|line| line.strip_prefix(ENCOUNTER_PREFIX))
            .map_or_else(|| area.clone(), |name| name.trim().to_string());

        let rounds = CombatRounds::read(&block.lines);
        let mut turn = Turn::new(
            area,
            encounter.clone(),
            turn_number,
            timeline.current_day_number(),
            timeline.last_equipment(),
            timeline.last_familiar(),
        );
        turn.ran_away = rounds.ran_away;
        turn.banished = rounds.banished();
        for skill in &rounds.skills {
            turn.data.skills_cast.add(skill, 1);
        }
        for item in &rounds.items {
            turn.data.combat_items_used.add(item, 1);
        }
        timeline.add_turn(turn)?;

        if rounds.outcome == Outcome::Lost {
            timeline.add_lost_combat(TurnEntry::new(encounter, turn_number));
        }
        for (counter, sub_use) in rounds.skills.iter().filter_map(|s| lookup_limited_use(s)) {
            timeline.add_limited_use(counter, sub_use, StatGain::NONE)?;
        }

        for line in block.lines.iter().skip(1) {
            if line.starts_with(ENCOUNTER_PREFIX) {
                continue;
            }
            let line = line.strip_prefix(AFTER_BATTLE_PREFIX).unwrap_or(line);
            dispatch(&self.line_parsers, line, timeline, ctx)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_data::{Counter, StatClass};
    use crate::parser::block::make_block;
    use crate::timeline::{EquipmentChange, EquipmentSlot};

    fn parse(timeline: &mut Timeline, lines: &[&str]) {
        EncounterBlockParser::new()
            .parse_block(&make_block(lines), timeline, &mut ParseContext::new())
            .unwrap();
    }

    #[test]
    fn test_won_fight() {
        let mut timeline = Timeline::detailed();
        parse(
            &mut timeline,
            &[
                "[5] The Haunted Pantry",
                "Encounter: possessed can of tomatoes",
                "Round 0: Hero wins initiative!",
                "Round 1: Hero casts SAUCY SALVE!",
                "Round 2: Hero uses the seal tooth!",
                "Round 3: Hero wins the fight!",
                "After Battle: You gain 12 Meat",
                "You acquire an item: tomato",
                "After Battle: You gain 3 Mysteriousness",
            ],
        );
        let turn = timeline.last_turn().unwrap();
        assert_eq!(turn.turn_number, 5);
        assert_eq!(turn.area, "The Haunted Pantry");
        assert_eq!(turn.encounter, "possessed can of tomatoes");
        assert_eq!(turn.data.skills_cast.get("saucy salve"), 1);
        assert_eq!(turn.data.combat_items_used.get("seal tooth"), 1);
        assert_eq!(turn.data.meat.encounter, 12);
        assert_eq!(turn.data.dropped_items.get("tomato"), 1);
        assert_eq!(turn.data.stat_gain, StatGain::of(StatClass::Mysticality, 3));
        assert!(timeline.lost_combats().is_empty());
    }

    #[test]
    fn test_noncombat_defaults_encounter_to_area() {
        let mut timeline = Timeline::detailed();
        parse(&mut timeline, &["[7] The Spooky Forest", "You acquire an item: bar skin"]);
        let turn = timeline.last_turn().unwrap();
        assert_eq!(turn.encounter, "The Spooky Forest");
        assert_eq!(turn.data.dropped_items.get("bar skin"), 1);
    }

    #[test]
    fn test_lost_fight_recorded() {
        let mut timeline = Timeline::detailed();
        parse(
            &mut timeline,
            &[
                "[9] The Castle in the Clouds in the Sky (Top Floor)",
                "Encounter: Goth Giant",
                "Round 1: Goth Giant hits you for 200 damage",
                "You lose. You slink away, dejected and defeated.",
            ],
        );
        assert_eq!(timeline.lost_combats(), &[TurnEntry::new("Goth Giant", 9)]);
    }

    #[test]
    fn test_banish_and_double_item_use() {
        let mut timeline = Timeline::detailed();
        parse(
            &mut timeline,
            &[
                "[11] The Hidden Park",
                "Encounter: pygmy janitor",
                "Round 1: Hero uses the spectre scepter and uses the seal tooth!",
                "Round 2: Hero casts SNOKEBOMB!",
            ],
        );
        let turn = timeline.last_turn().unwrap();
        assert!(turn.banished);
        assert_eq!(turn.data.combat_items_used.get("spectre scepter"), 1);
        assert_eq!(turn.data.combat_items_used.get("seal tooth"), 1);
    }

    #[test]
    fn test_combat_skill_limited_use() {
        let mut timeline = Timeline::detailed();
        parse(
            &mut timeline,
            &[
                "[14] The Defiled Nook",
                "Encounter: party skeleton",
                "Round 1: Hero casts CHEST X-RAY!",
                "Round 2: Hero wins the fight!",
            ],
        );
        let uses: Vec<_> = timeline.limited_uses().collect();
        assert_eq!(uses.len(), 1);
        assert_eq!(uses[0].counter, Counter::DoctorBagXray);
        assert_eq!(uses[0].turn_number, 14);
    }

    #[test]
    fn test_yellow_ray_disintegrates() {
        let mut timeline = Timeline::detailed();
        parse(
            &mut timeline,
            &[
                "[20] The Hippy Camp",
                "Encounter: Burnout",
                "Round 1: He-Boulder swings his eyestalk around and unleashes a massive ray of yellow energy, completely disintegrating your opponent.",
                "You acquire an effect: Everything Looks Yellow (100)",
            ],
        );
        assert!(timeline.last_turn().unwrap().disintegrated);
    }

    #[test]
    fn test_runaway_uses_current_equipment() {
        let mut timeline = Timeline::detailed();
        let mut equipment = timeline.last_equipment();
        equipment.set(EquipmentSlot::Pants, "Greatest American Pants");
        timeline.add_equipment_change(EquipmentChange {
            turn_number: 0,
            equipment,
        });
        parse(
            &mut timeline,
            &["[3] The Sleazy Back Alley", "Encounter: drunken half-orc hobo", "Round 1: Hero runs away!"],
        );
        let turn = timeline.last_turn().unwrap();
        assert!(turn.ran_away);
        assert!(turn.earned_free_runaway());
    }

    #[test]
    fn test_missing_turn_marker_is_malformed() {
        let mut timeline = Timeline::detailed();
        let result = EncounterBlockParser::new().parse_block(
            &make_block(&["Encounter: nobody"]),
            &mut timeline,
            &mut ParseContext::new(),
        );
        assert!(matches!(result, Err(ParseError::MalformedBlock { .. })));
    }
}
