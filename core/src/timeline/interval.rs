use std::fmt;

use alv_types::formatting::format_turn_range;
use serde::{Deserialize, Serialize};

use super::turn::{Turn, TurnData, TurnNumber};

/// A maximal run of consecutive turns in one area.
///
/// Detailed intervals keep their turns; interval-only timelines carry just
/// the range and the aggregated payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnInterval {
    pub area: String,
    pub start_turn: TurnNumber,
    pub end_turn: TurnNumber,
    /// No turn in the interval consumed an adventure.
    pub free: bool,
    pub turns: Vec<Turn>,
    pub data: TurnData,
}

impl TurnInterval {
    /// An interval known only by its range, as found in pre-summarized logs.
    pub fn summarized(
        area: impl Into<String>,
        start_turn: TurnNumber,
        end_turn: TurnNumber,
        data: TurnData,
    ) -> Self {
        Self {
            area: area.into(),
            start_turn,
            end_turn,
            free: end_turn <= start_turn,
            turns: Vec::new(),
            data,
        }
    }

    fn from_turn(turn: Turn) -> Self {
        Self {
            area: turn.area.clone(),
            start_turn: turn.turn_number,
            end_turn: turn.turn_number,
            free: turn.free,
            data: turn.data.clone(),
            turns: vec![turn],
        }
    }

    fn push(&mut self, turn: Turn) {
        self.end_turn = turn.turn_number;
        self.free &= turn.free;
        self.data.absorb(turn.data.clone());
        self.turns.push(turn);
    }

    pub fn is_detailed(&self) -> bool {
        !self.turns.is_empty()
    }

    /// Adventures consumed inside the interval.
    pub fn turns_spent(&self) -> u32 {
        if self.is_detailed() {
            self.turns.iter().filter(|t| !t.free).count() as u32
        } else {
            self.end_turn.saturating_sub(self.start_turn)
        }
    }

    pub fn free_turns(&self) -> u32 {
        self.turns.iter().filter(|t| t.free).count() as u32
    }

    pub fn overlaps(&self, start: TurnNumber, end: TurnNumber) -> bool {
        self.start_turn <= end && self.end_turn >= start
    }
}

/// Header form: `[12-15] The Haunted Pantry`.
impl fmt::Display for TurnInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", format_turn_range(self.start_turn, self.end_turn), self.area)
    }
}

/// Group consecutive same-area turns into intervals.
pub fn build_intervals(turns: &[Turn]) -> Vec<TurnInterval> {
    let mut intervals: Vec<TurnInterval> = Vec::new();
    for turn in turns {
        match intervals.last_mut() {
            Some(current) if current.area == turn.area => current.push(turn.clone()),
            _ => intervals.push(TurnInterval::from_turn(turn.clone())),
        }
    }
    intervals
}
