use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatClass {
    Muscle,
    Mysticality,
    Moxie,
}

/// Substat names as they appear in "You gain N <substat>" lines.
/// The main stat names map to themselves.
pub static SUBSTATS: phf::Map<&'static str, StatClass> = phf::phf_map! {
    "Beefiness" => StatClass::Muscle,
    "Fortitude" => StatClass::Muscle,
    "Muscleboundness" => StatClass::Muscle,
    "Strengthliness" => StatClass::Muscle,
    "Strongness" => StatClass::Muscle,
    "Muscle" => StatClass::Muscle,
    "Enchantedness" => StatClass::Mysticality,
    "Magicalness" => StatClass::Mysticality,
    "Mysteriousness" => StatClass::Mysticality,
    "Wizardliness" => StatClass::Mysticality,
    "Mysticality" => StatClass::Mysticality,
    "Cheek" => StatClass::Moxie,
    "Chutzpah" => StatClass::Moxie,
    "Roguishness" => StatClass::Moxie,
    "Sarcasm" => StatClass::Moxie,
    "Smarm" => StatClass::Moxie,
    "Moxie" => StatClass::Moxie,
};

pub fn stat_class(substat: &str) -> Option<StatClass> {
    SUBSTATS.get(substat).copied()
}

/// Substat gains split by stat class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatGain {
    pub muscle: i32,
    pub mysticality: i32,
    pub moxie: i32,
}

impl StatGain {
    pub const NONE: StatGain = StatGain {
        muscle: 0,
        mysticality: 0,
        moxie: 0,
    };

    pub fn of(class: StatClass, amount: i32) -> Self {
        let mut gain = Self::NONE;
        match class {
            StatClass::Muscle => gain.muscle = amount,
            StatClass::Mysticality => gain.mysticality = amount,
            StatClass::Moxie => gain.moxie = amount,
        }
        gain
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }

    pub fn total(&self) -> i32 {
        self.muscle + self.mysticality + self.moxie
    }
}

impl AddAssign for StatGain {
    fn add_assign(&mut self, rhs: Self) {
        self.muscle += rhs.muscle;
        self.mysticality += rhs.mysticality;
        self.moxie += rhs.moxie;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_substat_resolves() {
        for name in ["Beefiness", "Fortitude", "Muscleboundness", "Strengthliness", "Strongness"] {
            assert_eq!(stat_class(name), Some(StatClass::Muscle), "{name}");
        }
        for name in ["Enchantedness", "Magicalness", "Mysteriousness", "Wizardliness"] {
            assert_eq!(stat_class(name), Some(StatClass::Mysticality), "{name}");
        }
        for name in ["Cheek", "Chutzpah", "Roguishness", "Sarcasm", "Smarm"] {
            assert_eq!(stat_class(name), Some(StatClass::Moxie), "{name}");
        }
    }

    #[test]
    fn test_unknown_substat() {
        assert_eq!(stat_class("cheese!"), None);
        assert_eq!(stat_class("beefiness"), None);
    }

    #[test]
    fn test_stat_gain_accumulates() {
        let mut gain = StatGain::of(StatClass::Muscle, 5);
        gain += StatGain::of(StatClass::Moxie, -2);
        assert_eq!(gain.muscle, 5);
        assert_eq!(gain.moxie, -2);
        assert_eq!(gain.total(), 3);
    }
}
