//! Aggregates computed once a timeline is complete.
//!
//! Everything here is derived from the interval list, so totals always equal
//! the sum of the same fields over [`TurnInterval`]s.

mod limited_use;

pub use limited_use::LimitedUseSummary;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::game_data::StatGain;
use crate::timeline::{
    ConsumableKind, CountedSet, DayNumber, MeatGain, MpGain, Timeline, TurnInterval, TurnNumber,
};

/// Totals for one consumable, keyed by name and kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsumableTotal {
    pub name: String,
    pub kind: ConsumableKind,
    pub amount: u32,
    pub adventure_gain: u32,
    pub stat_gain: StatGain,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AreaStatistic {
    pub area: String,
    pub turns_spent: u32,
    pub free_turns: u32,
    pub stat_gain: StatGain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayStatistic {
    pub day: DayNumber,
    pub start_turn: TurnNumber,
    pub turns_spent: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LogSummaryData {
    pub dropped_items: CountedSet,
    pub skills_cast: CountedSet,
    pub combat_items_used: CountedSet,
    pub consumables_used: Vec<ConsumableTotal>,

    // ─── Totals ──────────────────────────────────────────────────────────────
    pub total_stat_gain: StatGain,
    pub total_meat: MeatGain,
    pub total_mp_gain: MpGain,
    pub total_mp_spent: u32,
    pub total_turns_spent: u32,
    pub total_free_turns: u32,
    pub free_runaways: u32,

    // ─── Combat ──────────────────────────────────────────────────────────────
    pub disintegrated_combats: u32,
    pub banished_combats: u32,
    pub hunted_combats: usize,
    pub lost_combats: usize,

    // ─── Breakdowns ──────────────────────────────────────────────────────────
    /// Sorted by area name.
    pub areas: Vec<AreaStatistic>,
    pub days: Vec<DayStatistic>,
    pub limited_uses: LimitedUseSummary,
}

impl LogSummaryData {
    pub fn from_timeline(timeline: &Timeline) -> Self {
        let intervals = timeline.intervals();
        let mut summary = Self::from_intervals(intervals);
        summary.hunted_combats = timeline.hunted_combats().len();
        summary.lost_combats = timeline.lost_combats().len();
        summary.days = day_statistics(timeline, intervals);
        summary.limited_uses = LimitedUseSummary::from_uses(timeline.limited_uses());
        summary
    }

    /// Interval-derived totals. Timeline-level lists (hunted/lost combats,
    /// days, limited uses) are left empty.
    pub fn from_intervals(intervals: &[TurnInterval]) -> Self {
        let mut summary = Self::default();
        let mut areas: BTreeMap<&str, AreaStatistic> = BTreeMap::new();
        let mut consumables: BTreeMap<(&str, ConsumableKind), ConsumableTotal> = BTreeMap::new();

        for interval in intervals {
            let data = &interval.data;
            summary.dropped_items.merge(&data.dropped_items);
            summary.skills_cast.merge(&data.skills_cast);
            summary.combat_items_used.merge(&data.combat_items_used);
            summary.total_stat_gain += data.total_stat_gain();
            summary.total_meat += data.meat;
            summary.total_mp_gain += data.mp_gain;
            summary.total_mp_spent += data.mp_spent;
            summary.free_runaways += data.free_runaways;
            summary.total_turns_spent += interval.turns_spent();
            summary.total_free_turns += interval.free_turns();

            for turn in &interval.turns {
                summary.disintegrated_combats += u32::from(turn.disintegrated);
                summary.banished_combats += u32::from(turn.banished);
            }

            for consumable in &data.consumables_used {
                let total = consumables
                    .entry((consumable.name.as_str(), consumable.kind))
                    .or_insert_with(|| ConsumableTotal {
                        name: consumable.name.clone(),
                        kind: consumable.kind,
                        amount: 0,
                        adventure_gain: 0,
                        stat_gain: StatGain::NONE,
                    });
                total.amount += consumable.amount;
                total.adventure_gain += consumable.adventure_gain;
                total.stat_gain += consumable.stat_gain;
            }

            let area = areas.entry(interval.area.as_str()).or_insert_with(|| AreaStatistic {
                area: interval.area.clone(),
                ..AreaStatistic::default()
            });
            area.turns_spent += interval.turns_spent();
            area.free_turns += interval.free_turns();
            area.stat_gain += data.total_stat_gain();
        }

        summary.areas = areas.into_values().collect();
        summary.consumables_used = consumables.into_values().collect();
        summary
    }

    pub fn area(&self, name: &str) -> Option<&AreaStatistic> {
        self.areas.iter().find(|area| area.area == name)
    }

    pub fn turns_on_day(&self, day: DayNumber) -> u32 {
        self.days
            .iter()
            .find(|d| d.day == day)
            .map_or(0, |d| d.turns_spent)
    }
}

/// Turns spent between consecutive day changes; the last day runs to the
/// end of the last interval.
fn day_statistics(timeline: &Timeline, intervals: &[TurnInterval]) -> Vec<DayStatistic> {
    let last_turn = intervals.iter().map(|i| i.end_turn).max().unwrap_or(0);
    let changes: Vec<_> = timeline.day_changes().copied().collect();
    changes
        .iter()
        .enumerate()
        .map(|(index, change)| {
            let end = changes
                .get(index + 1)
                .map_or(last_turn, |next| next.turn_number);
            DayStatistic {
                day: change.day,
                start_turn: change.turn_number,
                turns_spent: end.saturating_sub(change.turn_number),
            }
        })
        .collect()
}
