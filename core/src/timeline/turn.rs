//! Turn records: plain data, no merge policy.
//!
//! The timeline decides *when* two turns fold together; this module only
//! knows *how* their payloads combine.

use std::collections::BTreeMap;
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

use super::changes::{Equipment, LimitedUse, PizzaEvent};
use crate::game_data::{RUNAWAY_EQUIPMENT, StatGain};

pub type TurnNumber = u32;
pub type DayNumber = u32;

/// Name → count multiset (item drops, skill casts, combat items).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountedSet(BTreeMap<String, u32>);

impl CountedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &str, amount: u32) {
        if amount == 0 {
            return;
        }
        *self.0.entry(name.to_string()).or_default() += amount;
    }

    pub fn merge(&mut self, other: &CountedSet) {
        for (name, amount) in &other.0 {
            self.add(name, *amount);
        }
    }

    pub fn get(&self, name: &str) -> u32 {
        self.0.get(name).copied().unwrap_or(0)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Sum of all counts.
    pub fn total(&self) -> u32 {
        self.0.values().sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(name, amount)| (name.as_str(), *amount))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeatSource {
    Encounter,
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeatGain {
    pub encounter: i64,
    pub other: i64,
    pub spent: i64,
}

impl MeatGain {
    pub fn gained(source: MeatSource, amount: i64) -> Self {
        match source {
            MeatSource::Encounter => Self {
                encounter: amount,
                ..Self::default()
            },
            MeatSource::Other => Self {
                other: amount,
                ..Self::default()
            },
        }
    }

    pub fn spent(amount: i64) -> Self {
        Self {
            spent: amount,
            ..Self::default()
        }
    }

    pub fn total_gain(&self) -> i64 {
        self.encounter + self.other
    }
}

impl AddAssign for MeatGain {
    fn add_assign(&mut self, rhs: Self) {
        self.encounter += rhs.encounter;
        self.other += rhs.other;
        self.spent += rhs.spent;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MpSource {
    Encounter,
    NotEncounter,
    Consumable,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MpGain {
    pub encounter: i32,
    pub out_of_encounter: i32,
    pub consumable: i32,
}

impl MpGain {
    pub fn of(source: MpSource, amount: i32) -> Self {
        let mut gain = Self::default();
        match source {
            MpSource::Encounter => gain.encounter = amount,
            MpSource::NotEncounter => gain.out_of_encounter = amount,
            MpSource::Consumable => gain.consumable = amount,
        }
        gain
    }

    pub fn total(&self) -> i32 {
        self.encounter + self.out_of_encounter + self.consumable
    }
}

impl AddAssign for MpGain {
    fn add_assign(&mut self, rhs: Self) {
        self.encounter += rhs.encounter;
        self.out_of_encounter += rhs.out_of_encounter;
        self.consumable += rhs.consumable;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConsumableKind {
    Food,
    Booze,
    Spleen,
    Other,
}

impl ConsumableKind {
    /// Kind implied by the command verb that used it.
    pub fn from_verb(verb: &str) -> Option<Self> {
        match verb {
            "eat" => Some(Self::Food),
            "drink" => Some(Self::Booze),
            "chew" => Some(Self::Spleen),
            "use" => Some(Self::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consumable {
    pub name: String,
    pub kind: ConsumableKind,
    pub amount: u32,
    pub adventure_gain: u32,
    pub stat_gain: StatGain,
    pub day: DayNumber,
    pub turn_number: TurnNumber,
}

/// Everything a turn accumulates while its lines are parsed. Folding two
/// turns together folds their payloads with [`TurnData::absorb`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnData {
    pub meat: MeatGain,
    pub stat_gain: StatGain,
    pub mp_gain: MpGain,
    pub mp_spent: u32,
    pub dropped_items: CountedSet,
    pub skills_cast: CountedSet,
    pub combat_items_used: CountedSet,
    pub consumables_used: Vec<Consumable>,
    pub limited_uses: Vec<LimitedUse>,
    pub pizza_events: Vec<PizzaEvent>,
    pub free_runaways: u32,
    pub notes: Vec<String>,
}

impl TurnData {
    pub fn absorb(&mut self, other: TurnData) {
        self.meat += other.meat;
        self.stat_gain += other.stat_gain;
        self.mp_gain += other.mp_gain;
        self.mp_spent += other.mp_spent;
        self.dropped_items.merge(&other.dropped_items);
        self.skills_cast.merge(&other.skills_cast);
        self.combat_items_used.merge(&other.combat_items_used);
        self.consumables_used.extend(other.consumables_used);
        self.limited_uses.extend(other.limited_uses);
        self.pizza_events.extend(other.pizza_events);
        self.free_runaways += other.free_runaways;
        self.notes.extend(other.notes);
    }

    /// Stat gains including those from consumables used this turn.
    pub fn total_stat_gain(&self) -> StatGain {
        let mut total = self.stat_gain;
        for consumable in &self.consumables_used {
            total += consumable.stat_gain;
        }
        total
    }
}

/// One adventure (or free action) as recorded in the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub area: String,
    pub encounter: String,
    /// Encounters of turns folded into this one, in fold order.
    pub folded_encounters: Vec<String>,
    pub turn_number: TurnNumber,
    pub day: DayNumber,
    pub free: bool,
    pub disintegrated: bool,
    pub banished: bool,
    pub ran_away: bool,
    pub used_equipment: Equipment,
    pub used_familiar: String,
    pub data: TurnData,
}

impl Turn {
    pub fn new(
        area: impl Into<String>,
        encounter: impl Into<String>,
        turn_number: TurnNumber,
        day: DayNumber,
        used_equipment: Equipment,
        used_familiar: impl Into<String>,
    ) -> Self {
        Self {
            area: area.into(),
            encounter: encounter.into(),
            folded_encounters: Vec::new(),
            turn_number,
            day,
            free: false,
            disintegrated: false,
            banished: false,
            ran_away: false,
            used_equipment,
            used_familiar: used_familiar.into(),
            data: TurnData::default(),
        }
    }

    pub fn is_runaway_equipment_equipped(&self) -> bool {
        RUNAWAY_EQUIPMENT
            .iter()
            .any(|item| self.used_equipment.contains_item(item))
    }

    /// Whether a runaway on this turn was free thanks to equipment.
    pub fn earned_free_runaway(&self) -> bool {
        self.ran_away && self.is_runaway_equipment_equipped()
    }

    pub fn encounters(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.encounter.as_str()).chain(self.folded_encounters.iter().map(String::as_str))
    }

    /// Fold `other` into this turn. The result is free only if both were.
    pub(crate) fn absorb(&mut self, other: Turn) {
        self.folded_encounters.push(other.encounter);
        self.folded_encounters.extend(other.folded_encounters);
        self.free = self.free && other.free;
        self.disintegrated |= other.disintegrated;
        self.banished |= other.banished;
        self.ran_away |= other.ran_away;
        self.data.absorb(other.data);
    }
}
