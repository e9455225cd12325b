//! Recognizing the block that finishes an ascension.
//!
//! Each path ends differently: a final boss beaten in the Sorceress'
//! chamber, the last Community Service donated, the MacGuffin returned in
//! Actually Ed the Undying, or King Ralph freed. The block that ends the run
//! is still parsed; everything after it is ignored.

use std::sync::LazyLock;

use regex::Regex;

use super::block::DONATE_BODY;
use crate::session_log::{LogBlock, LogBlockType};

const WINS_THE_FIGHT: &str = "wins the fight!";
const FINAL_BOSSES: [&str; 3] = ["Naughty Sorceress (3)", "The Rain King", "Avatar of Jarlsberg"];
const SORCERESS_CHAMBER: &str = "The Naughty Sorceress' Chamber";
const PLUMBER_BOSS: &str = "Encounter: Wa";
const MACGUFFIN_ENCOUNTER: &str = "Encounter: Returning the MacGuffin";
const MACGUFFIN_RETURNED: &str = "choice.php?pwd&whichchoice=1054&option=1";
const KING_FREED: &str = "Tower: Freeing King Ralph";

static INITIATIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Round 0: (.*?) +(?:wins|loses) initiative!").expect("valid regex")
});
static ENCOUNTER_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Encounter: (.*?) *$").expect("valid regex"));

/// Whether `block` is the last one of the ascension.
pub fn ends_ascension(block: &LogBlock) -> bool {
    match block.block_type {
        LogBlockType::Encounter => final_boss_beaten(block),
        LogBlockType::Service => block.first_line().starts_with(DONATE_BODY),
        LogBlockType::Other => king_freed(block),
        _ => false,
    }
}

fn fight_won(block: &LogBlock) -> bool {
    block.lines.iter().any(|line| line.ends_with(WINS_THE_FIGHT))
}

fn final_boss_beaten(block: &LogBlock) -> bool {
    let area = block.first_line();
    let encounter = block.line(1).unwrap_or_default();
    if FINAL_BOSSES
        .iter()
        .any(|boss| encounter.ends_with(boss) || area.ends_with(boss))
    {
        return fight_won(block);
    }
    if area.contains(SORCERESS_CHAMBER)
        && (is_dark_gyffte_finale(block) || encounter.contains(PLUMBER_BOSS))
    {
        return fight_won(block);
    }
    false
}

/// The Dark Gyffte final boss carries the player's name backwards.
fn is_dark_gyffte_finale(block: &LogBlock) -> bool {
    let (Some(encounter), Some(round_zero)) = (block.line(1), block.line(2)) else {
        return false;
    };
    let (Some(boss), Some(player)) = (
        ENCOUNTER_NAME.captures(encounter),
        INITIATIVE.captures(round_zero),
    ) else {
        return false;
    };
    let reversed: String = player[1].to_lowercase().chars().rev().collect();
    boss[1].to_lowercase() == reversed
}

/// Actually Ed returns the MacGuffin; every other path frees the king.
fn king_freed(block: &LogBlock) -> bool {
    let Some(second) = block.line(1) else {
        return false;
    };
    if block.len() > 2 && second.contains(MACGUFFIN_ENCOUNTER) {
        return block.lines.iter().any(|line| line == MACGUFFIN_RETURNED);
    }
    second.contains(KING_FREED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::block::make_block;

    #[test]
    fn test_sorceress_must_be_beaten() {
        let won = make_block(&[
            "[640] The Naughty Sorceress' Chamber",
            "Encounter: Naughty Sorceress (3)",
            "Round 1: Hero casts SAUCEGEYSER!",
            "Round 2: Hero wins the fight!",
        ]);
        assert!(ends_ascension(&won));

        let lost = make_block(&[
            "[640] The Naughty Sorceress' Chamber",
            "Encounter: Naughty Sorceress (3)",
            "Round 1: Naughty Sorceress hits you for 300 damage",
        ]);
        assert!(!ends_ascension(&lost));
    }

    #[test]
    fn test_dark_gyffte_reversed_name() {
        let block = make_block(&[
            "[700] The Naughty Sorceress' Chamber",
            "Encounter: Oreh",
            "Round 0: Hero wins initiative!",
            "Round 4: Hero wins the fight!",
        ]);
        assert!(ends_ascension(&block));

        let other = make_block(&[
            "[700] The Naughty Sorceress' Chamber",
            "Encounter: wall of bones",
            "Round 0: Hero wins initiative!",
            "Round 4: Hero wins the fight!",
        ]);
        assert!(!ends_ascension(&other));
    }

    #[test]
    fn test_plumber_boss() {
        let block = make_block(&[
            "[410] The Naughty Sorceress' Chamber",
            "Encounter: Wa%playername/lowercase%",
            "Round 3: Mario wins the fight!",
        ]);
        assert!(ends_ascension(&block));
    }

    #[test]
    fn test_community_service_donate_body() {
        assert!(ends_ascension(&make_block(&["Took choice 1089/30: Donate Body"])));
        assert!(!ends_ascension(&make_block(&[
            "Took choice 1089/1: Donate Blood",
            "You lose 60 Adventures"
        ])));
    }

    #[test]
    fn test_ed_and_king_ralph() {
        let ed = make_block(&[
            "visit_url.php",
            "Encounter: Returning the MacGuffin",
            "choice.php?pwd&whichchoice=1054&option=1",
        ]);
        assert!(ends_ascension(&ed));

        let ed_not_yet = make_block(&[
            "visit_url.php",
            "Encounter: Returning the MacGuffin",
            "choice.php?pwd&whichchoice=1054&option=2",
        ]);
        assert!(!ends_ascension(&ed_not_yet));

        let king = make_block(&["place.php?whichplace=nstower", "[999] Tower: Freeing King Ralph"]);
        assert!(ends_ascension(&king));
    }

    #[test]
    fn test_king_ralph_text_in_a_fight_does_not_end() {
        let fight = make_block(&[
            "[998] The Spooky Forest",
            "Encounter: Tower: Freeing King Ralph",
            "Round 1: Hero wins the fight!",
        ]);
        assert_eq!(fight.block_type, LogBlockType::Encounter);
        assert!(!ends_ascension(&fight));
    }

    #[test]
    fn test_ordinary_blocks() {
        assert!(!ends_ascension(&make_block(&["[5] The Spooky Forest", "Round 1: Hero wins the fight!"])));
        assert!(!ends_ascension(&make_block(&["eat 1 hot hi mein"])));
    }
}
