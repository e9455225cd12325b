use super::BlockParser;
use crate::error::ParseError;
use crate::game_data::{AscensionPath, CharacterClass, GameMode};
use crate::parser::ParseContext;
use crate::parser::line::{ItemAcquisitionParser, LineParser};
use crate::session_log::LogBlock;
use crate::timeline::{Timeline, TurnEntry};

/// `Ascension #N:` followed by the mode and class line and the path name.
pub struct AscensionDataBlockParser;

impl BlockParser for AscensionDataBlockParser {
    fn parse_block(
        &self,
        block: &LogBlock,
        timeline: &mut Timeline,
        _ctx: &mut ParseContext,
    ) -> Result<(), ParseError> {
        let Some(declaration) = block.line(1) else {
            tracing::warn!(line = %block.first_line(), "Ascension data without class line");
            return Ok(());
        };
        timeline.set_game_mode(GameMode::from_declaration(declaration));
        timeline.set_character_class(CharacterClass::from_line_suffix(declaration));

        match block.line(2) {
            Some(path) => timeline.set_ascension_path(AscensionPath::from_name(path)),
            None => tracing::warn!(line = %block.first_line(), "Ascension data without path line"),
        }
        Ok(())
    }
}

const INTRINSIC_PREFIX: &str = "You acquire an intrinsic: ";
const GENE_TONIC_PREFIX: &str = "You acquire an item: Gene Tonic: ";

/// Hybridization through the DNA lab and Gene Tonic production.
pub struct HybridDataBlockParser;

impl HybridDataBlockParser {
    fn description(block: &LogBlock) -> Option<String> {
        let lines = || block.lines.iter().skip(1);
        if block.first_line().starts_with("Hybridizing yourself") {
            lines()
                .find_map(|l| l.strip_prefix(INTRINSIC_PREFIX))
                .map(|intrinsic| format!("Hybridized: {}", intrinsic.trim()))
        } else {
            lines()
                .find_map(|l| l.strip_prefix(GENE_TONIC_PREFIX))
                .map(|tonic| format!("Made Gene Tonic: {}", tonic.trim()))
        }
    }
}

impl BlockParser for HybridDataBlockParser {
    fn parse_block(
        &self,
        block: &LogBlock,
        timeline: &mut Timeline,
        ctx: &mut ParseContext,
    ) -> Result<(), ParseError> {
        if let Some(description) = Self::description(block) {
            let turn_number = timeline.last_turn_number();
            timeline.add_hybrid_content(TurnEntry::new(description, turn_number));
        }
        for line in block.lines.iter().skip(1) {
            ItemAcquisitionParser.parse_line(line, timeline, ctx)?;
        }
        Ok(())
    }
}
