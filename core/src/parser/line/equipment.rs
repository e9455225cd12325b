use std::sync::LazyLock;

use regex::Regex;

use super::LineParser;
use crate::error::ParseError;
use crate::parser::ParseContext;
use crate::timeline::{EquipmentChange, EquipmentSlot, FamiliarChange, Timeline};

const OUTFIT_CHECKPOINT: &str = "outfit checkpoint";
const OUTFIT_RESTORE: &str = "outfit restore";

static EQUIP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^equip (\S+) (.+)$").expect("valid regex"));
static UNEQUIP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^unequip (\S+)$").expect("valid regex"));
static FAMILIAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^familiar (.+?)(?: \(\d+ lbs?\.?\))?$").expect("valid regex")
});

enum EquipCommand<'a> {
    Equip(EquipmentSlot, &'a str),
    Unequip(EquipmentSlot),
    Checkpoint,
    Restore,
}

fn equip_command(line: &str) -> Option<EquipCommand<'_>> {
    match line {
        OUTFIT_CHECKPOINT => return Some(EquipCommand::Checkpoint),
        OUTFIT_RESTORE => return Some(EquipCommand::Restore),
        _ => {}
    }
    if let Some(caps) = EQUIP.captures(line) {
        let slot = EquipmentSlot::from_log_name(caps.get(1)?.as_str())?;
        return Some(EquipCommand::Equip(slot, caps.get(2)?.as_str()));
    }
    let caps = UNEQUIP.captures(line)?;
    EquipmentSlot::from_log_name(caps.get(1)?.as_str()).map(EquipCommand::Unequip)
}

/// `equip SLOT ITEM`, `unequip SLOT` and outfit checkpoints.
pub struct EquipmentChangeParser;

impl LineParser for EquipmentChangeParser {
    fn is_compatible(&self, line: &str) -> bool {
        (line.starts_with("equip ") || line.starts_with("unequip ") || line.starts_with("outfit "))
            && equip_command(line).is_some()
    }

    fn apply_to(
        &self,
        line: &str,
        timeline: &mut Timeline,
        ctx: &mut ParseContext,
    ) -> Result<(), ParseError> {
        let Some(command) = equip_command(line) else {
            return Ok(());
        };
        let mut equipment = timeline.last_equipment();
        match command {
            EquipCommand::Equip(slot, item) => equipment.set(slot, item),
            EquipCommand::Unequip(slot) => equipment.clear(slot),
            EquipCommand::Checkpoint => {
                ctx.equipment_stack.push(equipment);
                return Ok(());
            }
            EquipCommand::Restore => match ctx.equipment_stack.pop() {
                Some(saved) => equipment = saved,
                None => {
                    tracing::warn!("Outfit restore without a checkpoint, ignored");
                    return Ok(());
                }
            },
        }
        timeline.add_equipment_change(EquipmentChange {
            turn_number: timeline.last_turn_number(),
            equipment,
        });
        Ok(())
    }
}

/// `familiar NAME (W lbs)`. Familiar-slot items follow their familiar: the
/// outgoing familiar keeps its item, the incoming one gets back whatever it
/// wore last.
pub struct FamiliarChangeParser;

impl LineParser for FamiliarChangeParser {
    fn is_compatible(&self, line: &str) -> bool {
        line.starts_with("familiar ") && FAMILIAR.is_match(line)
    }

    fn apply_to(
        &self,
        line: &str,
        timeline: &mut Timeline,
        ctx: &mut ParseContext,
    ) -> Result<(), ParseError> {
        let Some(caps) = FAMILIAR.captures(line) else {
            return Ok(());
        };
        let familiar = caps[1].to_string();
        let outgoing = timeline.last_familiar();
        let mut equipment = timeline.last_equipment();

        match equipment.get(EquipmentSlot::Familiar) {
            Some(item) => {
                ctx.familiar_equipment.insert(outgoing, item.to_string());
            }
            None => {
                ctx.familiar_equipment.remove(&outgoing);
            }
        }
        match ctx.familiar_equipment.get(&familiar) {
            Some(item) => equipment.set(EquipmentSlot::Familiar, item.clone()),
            None => equipment.clear(EquipmentSlot::Familiar),
        }

        let turn_number = timeline.last_turn_number();
        timeline.add_familiar_change(FamiliarChange::new(turn_number, familiar));
        timeline.add_equipment_change(EquipmentChange {
            turn_number,
            equipment,
        });
        Ok(())
    }
}
