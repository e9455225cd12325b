mod character;
mod counter;
mod stats;

pub use character::{AscensionPath, CharacterClass, GameMode};
pub use counter::{Counter, LIMITED_USE_MAP, REPLACE_ENEMY, lookup_limited_use};
pub use stats::{SUBSTATS, StatClass, StatGain, stat_class};

/// Equipment that turns a successful runaway into a free one.
pub const RUNAWAY_EQUIPMENT: [&str; 2] = ["navel ring of navel gazing", "greatest american pants"];

/// Combat skills (lowercased) that banish the current monster.
pub const BANISH_SKILLS: [&str; 10] = [
    "batter up!",
    "breathe out",
    "feel hatred",
    "kgb tranquilizer dart",
    "louder than bomb",
    "reflex hammer",
    "show them your ring",
    "snokebomb",
    "talk about politics",
    "throw latte on opponent",
];
