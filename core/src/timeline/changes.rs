use serde::{Deserialize, Serialize};

use super::turn::{DayNumber, TurnNumber};
use crate::game_data::{Counter, StatGain};

pub const NO_FAMILIAR: &str = "none";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipmentSlot {
    Hat,
    Weapon,
    Offhand,
    Shirt,
    Pants,
    Acc1,
    Acc2,
    Acc3,
    Familiar,
}

impl EquipmentSlot {
    pub const COUNT: usize = 9;

    /// Slot names as KoLmafia writes them in `equip`/`unequip` commands.
    pub fn from_log_name(name: &str) -> Option<Self> {
        match name {
            "hat" => Some(Self::Hat),
            "weapon" => Some(Self::Weapon),
            "off-hand" | "offhand" => Some(Self::Offhand),
            "shirt" => Some(Self::Shirt),
            "pants" => Some(Self::Pants),
            "acc1" => Some(Self::Acc1),
            "acc2" => Some(Self::Acc2),
            "acc3" => Some(Self::Acc3),
            "familiar" | "familiarequip" => Some(Self::Familiar),
            _ => None,
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// Items worn at some point; empty slots are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    slots: [Option<String>; EquipmentSlot::COUNT],
}

impl Equipment {
    pub fn get(&self, slot: EquipmentSlot) -> Option<&str> {
        self.slots[slot.index()].as_deref()
    }

    pub fn set(&mut self, slot: EquipmentSlot, item: impl Into<String>) {
        self.slots[slot.index()] = Some(item.into());
    }

    pub fn clear(&mut self, slot: EquipmentSlot) {
        self.slots[slot.index()] = None;
    }

    pub fn contains_item(&self, item: &str) -> bool {
        self.slots
            .iter()
            .flatten()
            .any(|worn| worn.eq_ignore_ascii_case(item))
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentChange {
    pub turn_number: TurnNumber,
    pub equipment: Equipment,
}

impl EquipmentChange {
    pub fn no_equipment() -> Self {
        Self {
            turn_number: 0,
            equipment: Equipment::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamiliarChange {
    pub turn_number: TurnNumber,
    pub familiar: String,
}

impl FamiliarChange {
    pub fn new(turn_number: TurnNumber, familiar: impl Into<String>) -> Self {
        Self {
            turn_number,
            familiar: familiar.into(),
        }
    }

    pub fn no_familiar() -> Self {
        Self::new(0, NO_FAMILIAR)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayChange {
    pub day: DayNumber,
    pub turn_number: TurnNumber,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelData {
    pub level: u32,
    pub turn_number: TurnNumber,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub turn_number: TurnNumber,
    pub level: u32,
    pub muscle: u32,
    pub mysticality: u32,
    pub moxie: u32,
    pub adventures: u32,
    pub meat: i64,
    pub fullness: u32,
    pub drunkenness: u32,
    pub spleen: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pull {
    pub item: String,
    pub amount: u32,
    pub turn_number: TurnNumber,
    pub day: DayNumber,
}

/// One use of a daily-limited resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitedUse {
    pub day: DayNumber,
    pub turn_number: TurnNumber,
    pub counter: Counter,
    pub sub_use: String,
    pub stat_gain: StatGain,
}

/// Diabolic pizza creation (duration 0) or an effect gained from eating one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PizzaEvent {
    pub day: DayNumber,
    pub turn_number: TurnNumber,
    pub description: String,
    pub duration: u32,
}

/// A free-text fact pinned to a turn (learned skills, hybridization,
/// hunted and lost combats).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnEntry {
    pub text: String,
    pub turn_number: TurnNumber,
}

impl TurnEntry {
    pub fn new(text: impl Into<String>, turn_number: TurnNumber) -> Self {
        Self {
            text: text.into(),
            turn_number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_names() {
        assert_eq!(EquipmentSlot::from_log_name("off-hand"), Some(EquipmentSlot::Offhand));
        assert_eq!(EquipmentSlot::from_log_name("acc3"), Some(EquipmentSlot::Acc3));
        assert_eq!(EquipmentSlot::from_log_name("back"), None);
    }

    #[test]
    fn test_equipment_equality_ignores_turn() {
        let mut a = Equipment::default();
        a.set(EquipmentSlot::Hat, "helmet turtle");
        let b = a.clone();
        let first = EquipmentChange { turn_number: 3, equipment: a };
        let second = EquipmentChange { turn_number: 9, equipment: b };
        assert_eq!(first.equipment, second.equipment);
        assert_ne!(first, second);
    }

    #[test]
    fn test_clear_slot() {
        let mut e = Equipment::default();
        e.set(EquipmentSlot::Weapon, "seal-clubbing club");
        assert!(e.contains_item("Seal-Clubbing Club"));
        e.clear(EquipmentSlot::Weapon);
        assert!(e.is_empty());
    }
}
