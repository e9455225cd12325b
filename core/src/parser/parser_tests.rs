//! End-to-end tests: session log text in, finished timeline out.

use std::fs;

use alv_types::ParserSettings;
use tempfile::TempDir;

use super::*;
use crate::game_data::{Counter, StatClass};
use crate::timeline::{EquipmentSlot, START_OF_DAY};

fn make_parser() -> MafiaLogParser {
    MafiaLogParser::new(ParserSettings::default())
}

fn make_log(blocks: &[&[&str]]) -> String {
    blocks
        .iter()
        .map(|block| block.join("\n"))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn parse(blocks: &[&[&str]]) -> Timeline {
    make_parser().parse_text("test", &make_log(blocks)).unwrap()
}

fn turn_summary(timeline: &Timeline) -> Vec<(u32, &str)> {
    timeline
        .turns()
        .iter()
        .map(|turn| (turn.turn_number, turn.area.as_str()))
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Turn stream
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_free_turns_merge_into_one_pantry_turn() {
    let timeline = parse(&[
        &["[9] Cobb's Knob Kitchens", "Encounter: Knob Goblin Chef"],
        &["[10] The Haunted Pantry", "You acquire an item: tomato"],
        &["[10] The Haunted Pantry", "You acquire an item: tomato"],
        &["[10] The Haunted Pantry", "You acquire an item: spices"],
        &["[10] The Haunted Pantry", "You acquire an item: tomato"],
        &["[11] The Haunted Billiards Room", "Encounter: pool cue"],
    ]);

    assert_eq!(
        turn_summary(&timeline),
        vec![
            (0, "Ascension Start"),
            (9, "Cobb's Knob Kitchens"),
            (10, "The Haunted Pantry"),
            (11, "The Haunted Billiards Room"),
        ]
    );
    let pantry = &timeline.turns()[2];
    assert_eq!(pantry.data.dropped_items.get("tomato"), 3);
    assert_eq!(pantry.data.dropped_items.get("spices"), 1);
    assert!(!pantry.free);

    let intervals = timeline.turn_intervals().unwrap();
    assert_eq!(intervals.len(), 4);
    assert_eq!(timeline.log_summary().unwrap().total_turns_spent, 3);
}

#[test]
fn test_other_block_lines_land_on_last_turn() {
    let timeline = parse(&[
        &["[3] The Spooky Forest", "Encounter: Arboreal Guardian"],
        &[
            "cast 2 Ode to Booze",
            "You gain 40 Meat",
            "pull: 1 Boris's key lime pie",
            "Took choice 1395/4: Rainbowolin",
        ],
    ]);
    let turn = timeline.last_turn().unwrap();
    assert_eq!(turn.turn_number, 3);
    assert_eq!(turn.data.skills_cast.get("ode to booze"), 2);
    assert_eq!(turn.data.meat.other, 40);
    assert_eq!(timeline.pulls()[0].item, "Boris's key lime pie");
    assert_eq!(timeline.pulls()[0].turn_number, 3);

    let summary = timeline.log_summary().unwrap();
    assert_eq!(summary.limited_uses.count(1, Counter::Pillkeeper), 1);
}

#[test]
fn test_equipment_follows_turns() {
    let timeline = parse(&[
        &["equip hat helmet turtle"],
        &["[1] The Sleazy Back Alley"],
        &["unequip hat"],
        &["[2] The Sleazy Back Alley"],
    ]);
    let turns = timeline.turns();
    assert_eq!(turns[1].used_equipment.get(EquipmentSlot::Hat), Some("helmet turtle"));
    assert_eq!(turns[2].used_equipment.get(EquipmentSlot::Hat), None);

    let changes: Vec<_> = timeline.equipment_changes().map(|c| c.turn_number).collect();
    assert_eq!(changes, vec![0, 1, 2]);
}

#[test]
fn test_bastille_block() {
    let timeline = parse(&[
        &["[5] The Outskirts of Cobb's Knob"],
        &[
            "use 1 Bastille Battalion control rig",
            "You acquire an item: Nouveau Nosering",
            "You acquire an effect: Bastille Budgeteer (5)",
            "You gain 5 Muscleboundness",
        ],
    ]);
    let uses: Vec<_> = timeline.limited_uses().collect();
    assert_eq!(uses.len(), 1);
    assert_eq!(uses[0].sub_use, "babar art cannon");
    assert_eq!(uses[0].turn_number, 5);

    let summary = timeline.log_summary().unwrap();
    assert_eq!(summary.total_stat_gain, StatGain::of(StatClass::Muscle, 5));
}

#[test]
fn test_clip_art() {
    let timeline = parse(&[
        &["[4] The Haunted Kitchen"],
        &["cast 1 Summon Clip Art", "You acquire an item: box of Familiar Jacks"],
        &["cast 1 summon clip art"],
    ]);
    let turn = timeline.last_turn().unwrap();
    assert_eq!(turn.data.dropped_items.get("box of Familiar Jacks"), 1);
    assert_eq!(turn.data.skills_cast.get("summon clip art"), 1);
    assert_eq!(turn.data.mp_spent, 2);

    let uses: Vec<_> = timeline.limited_uses().collect();
    assert_eq!(uses.len(), 1);
    assert_eq!(uses[0].counter, Counter::ClipArt);
    assert_eq!(uses[0].sub_use, "box of Familiar Jacks");
}

// ─────────────────────────────────────────────────────────────────────────────
// Days
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_date_change_without_marker_starts_new_day() {
    let timeline = parse(&[
        &["March 3, 2020 - Jarlsuary 4"],
        &["[1] The Spooky Forest"],
        &["March 4, 2020 - Jarlsuary 5"],
        &["[2] The Spooky Forest"],
    ]);
    let days: Vec<_> = timeline.day_changes().map(|d| (d.day, d.turn_number)).collect();
    assert_eq!(days, vec![(1, 0), (2, 2)]);

    let start = timeline
        .turns()
        .iter()
        .find(|turn| turn.area == START_OF_DAY)
        .unwrap();
    assert_eq!(start.day, 2);
    assert_eq!(start.data.notes, vec![DAY_CHANGE_NOTE]);
    assert_eq!(timeline.last_turn().unwrap().day, 2);
}

#[test]
fn test_explicit_marker_resets_date_watch() {
    let timeline = parse(&[
        &["March 3, 2020 - Jarlsuary 4"],
        &["[1] The Spooky Forest"],
        &["===Day 2==="],
        &["March 4, 2020 - Jarlsuary 5"],
        &["[2] The Spooky Forest"],
    ]);
    assert_eq!(timeline.current_day_number(), 2);
    let days: Vec<_> = timeline.day_changes().map(|d| d.day).collect();
    assert_eq!(days, vec![1, 2]);
}

#[test]
fn test_condensed_day_change_counts_once() {
    let timeline = parse(&[
        &["March 3, 2020 - Jarlsuary 4"],
        &["[1] The Spooky Forest"],
        &["March 3, 2020 - Jarlsuary 5", "Day change occurred"],
        &["[2] The Spooky Forest"],
    ]);
    let days: Vec<_> = timeline.day_changes().map(|d| (d.day, d.turn_number)).collect();
    assert_eq!(days, vec![(1, 0), (2, 2)]);
    assert_eq!(timeline.last_turn().unwrap().day, 2);

    let starts: Vec<_> = timeline
        .turns()
        .iter()
        .filter(|turn| turn.area == START_OF_DAY)
        .collect();
    assert_eq!(starts.len(), 1);
    assert_eq!(starts[0].data.notes, vec![DAY_CHANGE_NOTE]);
}

#[test]
fn test_day_change_notice_without_date_change() {
    let timeline = parse(&[
        &["March 3, 2020 - Jarlsuary 4"],
        &["[1] The Spooky Forest"],
        &["Day change occurred"],
        &["[2] The Spooky Forest"],
        &["March 3, 2020 - Jarlsuary 4", "Day change occurred"],
        &["[3] The Spooky Forest"],
    ]);
    let days: Vec<_> = timeline.day_changes().map(|d| (d.day, d.turn_number)).collect();
    assert_eq!(days, vec![(1, 0), (2, 2), (3, 3)]);
    assert_eq!(timeline.last_turn().unwrap().day, 3);
}

#[test]
fn test_notes_follow_setting() {
    let log = make_log(&[&["[1] The Spooky Forest"], &["Note: fought the tree"]]);

    let with_notes = MafiaLogParser::new(ParserSettings {
        include_notes: true,
        ..ParserSettings::default()
    });
    let timeline = with_notes.parse_text("notes", &log).unwrap();
    assert_eq!(timeline.last_turn().unwrap().data.notes, vec!["fought the tree"]);

    let timeline = make_parser().parse_text("notes", &log).unwrap();
    assert!(timeline.last_turn().unwrap().data.notes.is_empty());
}

// ─────────────────────────────────────────────────────────────────────────────
// Ascension end
// ─────────────────────────────────────────────────────────────────────────────

fn make_sorceress_log() -> String {
    make_log(&[
        &["[598] The Naughty Sorceress' Chamber", "Encounter: Naughty Sorceress"],
        &[
            "[599] The Naughty Sorceress' Chamber",
            "Encounter: Naughty Sorceress (3)",
            "Round 1: Hero casts SAUCEGEYSER!",
            "Round 2: Hero wins the fight!",
        ],
        &["[600] The Sleazy Back Alley", "You acquire an item: empty cup"],
    ])
}

#[test]
fn test_ascension_end_stops_parsing() {
    let timeline = make_parser().parse_text("end", &make_sorceress_log()).unwrap();
    assert_eq!(timeline.last_turn_number(), 599);
    assert!(!timeline.log_summary().unwrap().dropped_items.contains("empty cup"));
}

#[test]
fn test_old_ascension_counting_reads_everything() {
    let parser = MafiaLogParser::new(ParserSettings {
        old_ascension_counting: true,
        ..ParserSettings::default()
    });
    let timeline = parser.parse_text("end", &make_sorceress_log()).unwrap();
    assert_eq!(timeline.last_turn_number(), 600);
}

#[test]
fn test_community_service_ends_with_donated_body() {
    let timeline = parse(&[
        &["[1] The Spooky Forest"],
        &[
            "Took choice 1089/1: Donate Blood",
            "choice.php?whichchoice=1089&option=1",
            "You lose 2 Adventures",
        ],
        &["Took choice 1089/30: Donate Body"],
        &["[4] The Spooky Forest"],
    ]);
    assert_eq!(
        turn_summary(&timeline),
        vec![
            (0, "Ascension Start"),
            (1, "The Spooky Forest"),
            (2, "Community Service: Donate Blood"),
            (3, "Community Service: Donate Blood"),
        ]
    );
    assert_eq!(timeline.log_summary().unwrap().total_turns_spent, 3);
}

// ─────────────────────────────────────────────────────────────────────────────
// Failures and files
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_failure_reports_last_turn() {
    let log = make_log(&[&["[12] The Dire Warren"], &["Combing square 1,1"]]);
    let failure = make_parser().parse_text("broken", &log).unwrap_err();
    assert_eq!(failure.log_name, "broken");
    assert_eq!(failure.last_turn, 12);
    assert!(matches!(failure.source, ParseError::MalformedBlock { .. }));
}

#[test]
fn test_parse_file_with_block_dump() {
    let dir = TempDir::new().unwrap();
    let log_path = dir.path().join("Hero_20200303.txt");
    let dump_path = dir.path().join("Hero_20200303-BlockDump.txt");
    fs::write(&log_path, make_log(&[&["[1] The Spooky Forest"], &["eat 1 hot hi mein"]])).unwrap();

    let timeline = make_parser().parse_file(&log_path, Some(&dump_path)).unwrap();
    assert_eq!(timeline.log_name(), "Hero_20200303");

    let dump = fs::read_to_string(&dump_path).unwrap();
    assert_eq!(
        dump,
        "-------- BLOCK: ENCOUNTER --------\n[1] The Spooky Forest\n\
         -------- BLOCK: CONSUMABLE --------\neat 1 hot hi mein\n"
    );
}

#[test]
fn test_missing_file_fails_at_turn_zero() {
    let dir = TempDir::new().unwrap();
    let failure = make_parser()
        .parse_file(&dir.path().join("absent.txt"), None)
        .unwrap_err();
    assert_eq!(failure.log_name, "absent");
    assert_eq!(failure.last_turn, 0);
    assert!(matches!(failure.source, ParseError::Io { .. }));
}
