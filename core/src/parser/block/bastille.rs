use super::BlockParser;
use crate::error::ParseError;
use crate::game_data::{Counter, StatGain};
use crate::parser::ParseContext;
use crate::parser::line::{parse_effect_line, stat_gain_of};
use crate::session_log::LogBlock;
use crate::timeline::{Consumable, ConsumableKind, Timeline};

const CONTROL_RIG: &str = "Bastille Battalion control rig";
const SINGLE_ITEM_PREFIX: &str = "You acquire an item: ";
const UNRESOLVED: &str = "?";

/// Bastille Battalion. The log never states the chosen configuration, so
/// it is read back from what the game handed out: the stat gained names
/// the barbican, the item the drawbridge and the effect the murder hole.
pub struct BastilleBlockParser;

#[derive(Debug)]
struct Configuration {
    barbican: &'static str,
    drawbridge: &'static str,
    murderhole: &'static str,
    stat_gain: StatGain,
}

impl Configuration {
    fn read(lines: &[String]) -> Self {
        let mut config = Configuration {
            barbican: UNRESOLVED,
            drawbridge: UNRESOLVED,
            murderhole: UNRESOLVED,
            stat_gain: StatGain::NONE,
        };
        for line in lines {
            if let Some((effect, _)) = parse_effect_line(line) {
                match effect.to_lowercase().as_str() {
                    "bastille braggadocio" => config.murderhole = "gesture",
                    "bastille budgeteer" => config.murderhole = "cannon",
                    "bastille bourgeoisie" => config.murderhole = "catapult",
                    _ => {}
                }
            } else if let Some(item) = line.strip_prefix(SINGLE_ITEM_PREFIX) {
                match item.trim().to_lowercase().as_str() {
                    "draftsman's driving gloves" => config.drawbridge = "draftsman",
                    "nouveau nosering" => config.drawbridge = "art",
                    "brutal brogues" => config.drawbridge = "brutalist",
                    _ => {}
                }
            } else if let Some(gain) = stat_gain_of(line) {
                config.stat_gain = gain;
                config.barbican = if gain.muscle != 0 {
                    "babar"
                } else if gain.mysticality != 0 {
                    "barbecue"
                } else {
                    "barbershop"
                };
            }
        }
        config
    }

    fn label(&self) -> String {
        format!("{} {} {}", self.barbican, self.drawbridge, self.murderhole)
    }

    fn is_complete(&self) -> bool {
        ![self.barbican, self.drawbridge, self.murderhole].contains(&UNRESOLVED)
    }
}

impl BlockParser for BastilleBlockParser {
    fn parse_block(
        &self,
        block: &LogBlock,
        timeline: &mut Timeline,
        _ctx: &mut ParseContext,
    ) -> Result<(), ParseError> {
        let config = Configuration::read(&block.lines);
        let label = config.label();
        if !config.is_complete() {
            tracing::warn!(configuration = %label, "Bastille configuration partly unresolved");
        }

        // The stats count through a pseudo-consumable on the current turn.
        let turn = timeline.current_turn_mut()?;
        let rig = Consumable {
            name: CONTROL_RIG.to_string(),
            kind: ConsumableKind::Other,
            amount: 1,
            adventure_gain: 0,
            stat_gain: config.stat_gain,
            day: turn.day,
            turn_number: turn.turn_number,
        };
        turn.data.consumables_used.push(rig);
        timeline.add_limited_use(Counter::Bastille, label, config.stat_gain)?;
        Ok(())
    }
}
