use std::sync::LazyLock;

use regex::Regex;

use super::BlockParser;
use crate::error::ParseError;
use crate::parser::ParseContext;
use crate::parser::line::{ItemAcquisitionParser, LineParser, bounded_count, parse_amount};
use crate::session_log::LogBlock;
use crate::timeline::{Timeline, Turn};

pub(crate) const DONATE_BODY: &str = "Took choice 1089/30";
const UNKNOWN_SERVICE: &str = "unknown";

static CHOICE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Took choice 1089/(\d+)").expect("valid regex"));
static ADVENTURES_LOST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"You lose (\d[\d,]*) Adventures?").expect("valid regex"));

static SERVICES: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "1" => "Donate Blood",
    "2" => "Feed the Children (But Not Too Much)",
    "3" => "Build Playground Mazes",
    "4" => "Feed Conspirators",
    "5" => "Breed More Collies",
    "6" => "Reduce Gazelle Population",
    "7" => "Make Sausage",
    "8" => "Be a Living Statue",
    "9" => "Make Margaritas",
    "10" => "Clean Steam Tunnels",
    "11" => "Coil Wire",
    "30" => "Donate Body",
};

fn service_name(choice: &str) -> &'static str {
    SERVICES.get(choice).copied().unwrap_or(UNKNOWN_SERVICE)
}

/// Community Service quests. A single block stands for as many turns as
/// the service cost; each is appended as its own turn.
pub struct ServiceBlockParser;

impl BlockParser for ServiceBlockParser {
    fn parse_block(
        &self,
        block: &LogBlock,
        timeline: &mut Timeline,
        ctx: &mut ParseContext,
    ) -> Result<(), ParseError> {
        let service = CHOICE
            .captures(block.first_line())
            .map(|caps| service_name(&caps[1]))
            .ok_or_else(|| ParseError::malformed(block.block_type, "missing service choice"))?;

        let adventures = if service == "Donate Body" || service == UNKNOWN_SERVICE {
            0
        } else {
            block
                .lines
                .iter()
                .find_map(|line| ADVENTURES_LOST.captures(line))
                .and_then(|caps| parse_amount::<u32>(&caps[1]))
                .ok_or_else(|| {
                    ParseError::malformed(block.block_type, format!("no adventure cost for {service}"))
                })?
        };
        let adventures = bounded_count(block.block_type, "adventures", adventures)?;

        let area = format!("Community Service: {service}");
        let day = timeline.current_day_number();
        let equipment = timeline.last_equipment();
        let familiar = timeline.last_familiar();
        let first = timeline.next_turn_number();
        let end = first
            .checked_add(adventures)
            .ok_or_else(|| ParseError::malformed(block.block_type, "turn number overflow"))?;
        for turn_number in first..end {
            let turn = Turn::new(
                area.clone(),
                service,
                turn_number,
                day,
                equipment.clone(),
                familiar.clone(),
            );
            timeline.add_turn(turn)?;
        }

        for line in block.lines.iter().skip(1) {
            ItemAcquisitionParser.parse_line(line, timeline, ctx)?;
        }
        Ok(())
    }
}
