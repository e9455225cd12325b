use super::BlockParser;
use crate::error::ParseError;
use crate::game_data::{StatGain, lookup_limited_use};
use crate::parser::ParseContext;
use crate::parser::line::parse_effect_line;
use crate::session_log::LogBlock;
use crate::timeline::Timeline;

/// Beach comb squares: `Combing ...` then the effect it gave.
pub struct CombingBlockParser;

impl BlockParser for CombingBlockParser {
    fn parse_block(
        &self,
        block: &LogBlock,
        timeline: &mut Timeline,
        _ctx: &mut ParseContext,
    ) -> Result<(), ParseError> {
        let line = block
            .line(1)
            .ok_or_else(|| ParseError::malformed(block.block_type, "missing combing result"))?;
        let Some((effect, _)) = parse_effect_line(line) else {
            return Ok(());
        };
        let effect = effect.to_lowercase();
        match lookup_limited_use(&effect) {
            Some((counter, sub_use)) => timeline.add_limited_use(counter, sub_use, StatGain::NONE)?,
            None => tracing::warn!(effect = %effect, "Combing gave an effect with no known counter"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_data::Counter;
    use crate::parser::block::make_block;

    fn parse(timeline: &mut Timeline, lines: &[&str]) -> Result<(), ParseError> {
        CombingBlockParser.parse_block(&make_block(lines), timeline, &mut ParseContext::new())
    }

    #[test]
    fn test_beach_head_effect() {
        let mut timeline = Timeline::detailed();
        parse(
            &mut timeline,
            &["Combing square 4,10", "You acquire an effect: Hot-Headed (50)"],
        )
        .unwrap();
        let uses: Vec<_> = timeline.limited_uses().collect();
        assert_eq!(uses.len(), 1);
        assert_eq!(uses[0].counter, Counter::BeachHeadHot);
    }

    #[test]
    fn test_unknown_effect_is_ignored() {
        let mut timeline = Timeline::detailed();
        parse(
            &mut timeline,
            &["Combing square 1,1", "You acquire an effect: Beaten Up (3)"],
        )
        .unwrap();
        assert_eq!(timeline.limited_uses().count(), 0);
    }

    #[test]
    fn test_single_line_is_malformed() {
        let mut timeline = Timeline::detailed();
        let result = parse(&mut timeline, &["Combing square 2,3"]);
        assert!(matches!(result, Err(ParseError::MalformedBlock { .. })));
    }
}
