use super::BlockParser;
use crate::error::ParseError;
use crate::parser::ParseContext;
use crate::parser::line::{bounded_count, parse_amount};
use crate::session_log::LogBlock;
use crate::timeline::{LevelData, PlayerSnapshot, Timeline};

/// Leading number of a value such as `45 (40)` or `1,250`.
fn leading_number<T: std::str::FromStr>(value: &str) -> Option<T> {
    value.split_whitespace().next().and_then(parse_amount)
}

fn is_separator(line: &str) -> bool {
    !line.is_empty() && line.chars().all(|c| c == '-' || c == '=')
}

/// `Player Snapshot` followed by `Key: value` lines.
pub struct PlayerSnapshotBlockParser;

impl PlayerSnapshotBlockParser {
    fn read(lines: &[String], turn_number: u32) -> PlayerSnapshot {
        let mut snapshot = PlayerSnapshot {
            turn_number,
            ..PlayerSnapshot::default()
        };
        for line in lines.iter().skip(1).map(|l| l.trim()) {
            if is_separator(line) {
                continue;
            }
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();
            let parsed = match key.trim() {
                "Level" => leading_number(value).map(|v| snapshot.level = v),
                "Muscle" => leading_number(value).map(|v| snapshot.muscle = v),
                "Mysticality" => leading_number(value).map(|v| snapshot.mysticality = v),
                "Moxie" => leading_number(value).map(|v| snapshot.moxie = v),
                "Adventures" => leading_number(value).map(|v| snapshot.adventures = v),
                "Meat" => leading_number(value).map(|v| snapshot.meat = v),
                "Fullness" => leading_number(value).map(|v| snapshot.fullness = v),
                "Drunkenness" => leading_number(value).map(|v| snapshot.drunkenness = v),
                "Spleen" => leading_number(value).map(|v| snapshot.spleen = v),
                _ => Some(()),
            };
            if parsed.is_none() {
                tracing::warn!(line = %line, "Unreadable snapshot value, left at 0");
            }
        }
        snapshot
    }
}

impl BlockParser for PlayerSnapshotBlockParser {
    fn parse_block(
        &self,
        block: &LogBlock,
        timeline: &mut Timeline,
        _ctx: &mut ParseContext,
    ) -> Result<(), ParseError> {
        let turn_number = timeline.last_turn_number();
        let snapshot = Self::read(&block.lines, turn_number);
        let current_level = timeline.last_level().map_or(1, |l| l.level);
        bounded_count(block.block_type, "levels", snapshot.level.saturating_sub(current_level))?;
        for level in current_level + 1..=snapshot.level {
            timeline.add_level(LevelData { level, turn_number });
        }
        timeline.add_player_snapshot(snapshot);
        Ok(())
    }
}
