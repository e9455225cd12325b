//! Daily-limited game mechanics and the lookup table that recognizes them.
//!
//! The table is keyed by three kinds of text, all lowercased:
//! - `choice/option` ids from "Took choice" lines (`1395/4`)
//! - skill names from casts (`cheat code: replace enemy`)
//! - effect names from acquisitions (`hot-headed`)

use std::fmt;

use serde::{Deserialize, Serialize};

/// One daily-limited mechanic. Variants are in alphabetical order of their
/// labels, which is also their sort order in summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Counter {
    #[serde(rename = "Bastille")]
    Bastille,
    #[serde(rename = "Beach Head/Cold")]
    BeachHeadCold,
    #[serde(rename = "Beach Head/Familiar Wt")]
    BeachHeadFamiliarWt,
    #[serde(rename = "Beach Head/Hot")]
    BeachHeadHot,
    #[serde(rename = "Beach Head/Initiative")]
    BeachHeadInitiative,
    #[serde(rename = "Beach Head/Moxie")]
    BeachHeadMoxie,
    #[serde(rename = "Beach Head/Muscle")]
    BeachHeadMuscle,
    #[serde(rename = "Beach Head/Mysticality")]
    BeachHeadMysticality,
    #[serde(rename = "Beach Head/Sleaze")]
    BeachHeadSleaze,
    #[serde(rename = "Beach Head/Spooky")]
    BeachHeadSpooky,
    #[serde(rename = "Beach Head/Stats")]
    BeachHeadStats,
    #[serde(rename = "Beach Head/Stench")]
    BeachHeadStench,
    #[serde(rename = "CHEAT CODE")]
    CheatCode,
    #[serde(rename = "Clip Art")]
    ClipArt,
    #[serde(rename = "Daycare Spa")]
    DaycareSpa,
    #[serde(rename = "Doctor Bag/Hammer")]
    DoctorBagHammer,
    #[serde(rename = "Doctor Bag/Otoscope")]
    DoctorBagOtoscope,
    #[serde(rename = "Doctor Bag/X-ray")]
    DoctorBagXray,
    #[serde(rename = "Fortune Teller")]
    FortuneTeller,
    #[serde(rename = "Pillkeeper")]
    Pillkeeper,
    #[serde(rename = "Saber/Upgrade")]
    SaberUpgrade,
    #[serde(rename = "Saber/Use the Force")]
    SaberUseForce,
    #[serde(rename = "Vampyric Cloake")]
    VampyricCloake,
}

/// Sub-use label of the cheat code that costs double.
pub const REPLACE_ENEMY: &str = "Replace Enemy";

impl Counter {
    pub const ALL: [Counter; 23] = [
        Counter::Bastille,
        Counter::BeachHeadCold,
        Counter::BeachHeadFamiliarWt,
        Counter::BeachHeadHot,
        Counter::BeachHeadInitiative,
        Counter::BeachHeadMoxie,
        Counter::BeachHeadMuscle,
        Counter::BeachHeadMysticality,
        Counter::BeachHeadSleaze,
        Counter::BeachHeadSpooky,
        Counter::BeachHeadStats,
        Counter::BeachHeadStench,
        Counter::CheatCode,
        Counter::ClipArt,
        Counter::DaycareSpa,
        Counter::DoctorBagHammer,
        Counter::DoctorBagOtoscope,
        Counter::DoctorBagXray,
        Counter::FortuneTeller,
        Counter::Pillkeeper,
        Counter::SaberUpgrade,
        Counter::SaberUseForce,
        Counter::VampyricCloake,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Counter::Bastille => "Bastille",
            Counter::BeachHeadCold => "Beach Head/Cold",
            Counter::BeachHeadFamiliarWt => "Beach Head/Familiar Wt",
            Counter::BeachHeadHot => "Beach Head/Hot",
            Counter::BeachHeadInitiative => "Beach Head/Initiative",
            Counter::BeachHeadMoxie => "Beach Head/Moxie",
            Counter::BeachHeadMuscle => "Beach Head/Muscle",
            Counter::BeachHeadMysticality => "Beach Head/Mysticality",
            Counter::BeachHeadSleaze => "Beach Head/Sleaze",
            Counter::BeachHeadSpooky => "Beach Head/Spooky",
            Counter::BeachHeadStats => "Beach Head/Stats",
            Counter::BeachHeadStench => "Beach Head/Stench",
            Counter::CheatCode => "CHEAT CODE",
            Counter::ClipArt => "Clip Art",
            Counter::DaycareSpa => "Daycare Spa",
            Counter::DoctorBagHammer => "Doctor Bag/Hammer",
            Counter::DoctorBagOtoscope => "Doctor Bag/Otoscope",
            Counter::DoctorBagXray => "Doctor Bag/X-ray",
            Counter::FortuneTeller => "Fortune Teller",
            Counter::Pillkeeper => "Pillkeeper",
            Counter::SaberUpgrade => "Saber/Upgrade",
            Counter::SaberUseForce => "Saber/Use the Force",
            Counter::VampyricCloake => "Vampyric Cloake",
        }
    }

    /// Daily cap, used for reporting only.
    pub const fn daily_limit(self) -> u32 {
        match self {
            Counter::CheatCode => 100,
            Counter::ClipArt
            | Counter::DoctorBagHammer
            | Counter::DoctorBagOtoscope
            | Counter::DoctorBagXray => 3,
            Counter::Pillkeeper => 6,
            Counter::SaberUseForce => 5,
            Counter::VampyricCloake => 10,
            _ => 1,
        }
    }

    /// Case-insensitive lookup by label.
    pub fn from_label(label: &str) -> Option<Counter> {
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Choice ids, skill names and effect names that consume a limited use,
/// mapped to their counter and sub-use label.
pub static LIMITED_USE_MAP: phf::Map<&'static str, (Counter, &'static str)> = phf::phf_map! {
    "1387/1" => (Counter::SaberUseForce, "Not the adventurer"),
    "1387/2" => (Counter::SaberUseForce, "Find friends"),
    "1387/3" => (Counter::SaberUseForce, "Drop things"),
    "1386/1" => (Counter::SaberUpgrade, "MP regen"),
    "1386/2" => (Counter::SaberUpgrade, "+20 ML"),
    "1386/3" => (Counter::SaberUpgrade, "+3 prismatic res"),
    "1386/4" => (Counter::SaberUpgrade, "+10 familiar wt"),
    "1395/1" => (Counter::Pillkeeper, "Explodinall"),
    "1395/2" => (Counter::Pillkeeper, "Extendicillin"),
    "1395/3" => (Counter::Pillkeeper, "Sneakisol"),
    "1395/4" => (Counter::Pillkeeper, "Rainbowolin"),
    "1395/5" => (Counter::Pillkeeper, "Hulkien"),
    "1395/6" => (Counter::Pillkeeper, "Fidoxene"),
    "1395/7" => (Counter::Pillkeeper, "Surprise Me"),
    "1395/8" => (Counter::Pillkeeper, "Telecybin"),
    "cheat code: replace enemy" => (Counter::CheatCode, REPLACE_ENEMY),
    "cheat code: triple size" => (Counter::CheatCode, "Triple Size"),
    "cheat code: invisible avatar" => (Counter::CheatCode, "Invisible Avatar"),
    "cheat code: shrink enemy" => (Counter::CheatCode, "Shrink Enemy"),
    "hot-headed" => (Counter::BeachHeadHot, ""),
    "cold as nice" => (Counter::BeachHeadCold, ""),
    "a brush with grossness" => (Counter::BeachHeadStench, ""),
    "does it have a skull in there??" => (Counter::BeachHeadSpooky, ""),
    "oiled, slick" => (Counter::BeachHeadSleaze, ""),
    "lack of body-building" => (Counter::BeachHeadMuscle, ""),
    "we're all made of starfish" => (Counter::BeachHeadMysticality, ""),
    "pomp & circumsands" => (Counter::BeachHeadMoxie, ""),
    "resting beach face" => (Counter::BeachHeadInitiative, ""),
    "do i know you from somewhere?" => (Counter::BeachHeadFamiliarWt, ""),
    "you learned something maybe!" => (Counter::BeachHeadStats, ""),
    "reflex hammer" => (Counter::DoctorBagHammer, ""),
    "otoscope" => (Counter::DoctorBagOtoscope, ""),
    "chest x-ray" => (Counter::DoctorBagXray, ""),
    "become a bat" => (Counter::VampyricCloake, "Bat"),
    "become a wolf" => (Counter::VampyricCloake, "Wolf"),
    "become a cloud of mist" => (Counter::VampyricCloake, "Mist"),
    "summon clip art" => (Counter::ClipArt, ""),
};

pub fn lookup_limited_use(key: &str) -> Option<(Counter, &'static str)> {
    LIMITED_USE_MAP.get(key).copied()
}
