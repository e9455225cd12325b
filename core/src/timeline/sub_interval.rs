//! Slicing a timeline down to a turn range.

use hashbrown::HashSet;

use super::{DayNumber, Timeline, TurnNumber};
use crate::error::TimelineError;

impl Timeline {
    /// A new timeline covering turns `start..=end`.
    ///
    /// Histories keep the last entry before `start` so the slice knows the
    /// state it begins in (day, level, equipment, familiar, snapshot).
    pub fn sub_interval(&self, start: TurnNumber, end: TurnNumber) -> Result<Timeline, TimelineError> {
        if end <= start || end == 0 {
            return Err(TimelineError::InvalidRange { start, end });
        }

        let mut sub = Timeline::empty(self.detailed);
        sub.subinterval = true;
        sub.mafia_turn_iteration = self.mafia_turn_iteration;
        sub.log_name = self.log_name.clone();
        sub.character_class = self.character_class;
        sub.ascension_path = self.ascension_path;
        sub.game_mode = self.game_mode;

        sub.day_changes.clear();
        sub.levels.clear();
        sub.equipment_changes.clear();
        sub.familiar_changes.clear();

        let in_range = |turn: TurnNumber| start <= turn && turn <= end;

        if self.detailed {
            sub.turns = self
                .turns
                .iter()
                .filter(|turn| in_range(turn.turn_number))
                .cloned()
                .collect();
        } else {
            sub.intervals = self
                .intervals
                .iter()
                .filter(|interval| interval.overlaps(start, end))
                .cloned()
                .collect();
        }

        // Day changes in [start, end), carrying the day already under way.
        let mut days: Vec<_> = self
            .day_changes
            .values()
            .filter(|day| start <= day.turn_number && day.turn_number < end)
            .copied()
            .collect();
        let needs_carry = days.first().is_none_or(|first| first.turn_number > start);
        if needs_carry
            && let Some(before) = self
                .day_changes
                .values()
                .filter(|day| day.turn_number < start)
                .next_back()
        {
            days.insert(0, *before);
        }
        for day in days {
            sub.add_day_change(day);
        }

        if let Some(before) = self
            .levels
            .values()
            .filter(|level| level.turn_number < start)
            .max_by_key(|level| level.turn_number)
        {
            sub.add_level(*before);
        }
        for level in self.levels.values().filter(|l| in_range(l.turn_number)) {
            sub.add_level(*level);
        }

        if let Some((_, before)) = self.equipment_changes.range(..start).next_back() {
            sub.equipment_changes.insert(before.turn_number, before.clone());
        }
        for (turn, change) in self.equipment_changes.range(start..=end) {
            sub.equipment_changes.insert(*turn, change.clone());
        }

        if let Some((_, before)) = self.familiar_changes.range(..start).next_back() {
            sub.familiar_changes.insert(before.turn_number, before.clone());
        }
        for (turn, change) in self.familiar_changes.range(start..=end) {
            sub.familiar_changes.insert(*turn, change.clone());
        }

        if let Some((_, before)) = self.player_snapshots.range(..start).next_back() {
            sub.add_player_snapshot(before.clone());
        }
        for (_, snapshot) in self.player_snapshots.range(start..end) {
            sub.add_player_snapshot(snapshot.clone());
        }

        let included_days: HashSet<DayNumber> = sub.day_changes.keys().copied().collect();
        sub.pulls = self
            .pulls
            .iter()
            .filter(|pull| in_range(pull.turn_number) && included_days.contains(&pull.day))
            .cloned()
            .collect();

        let entries_in_range = |entries: &[super::TurnEntry]| {
            entries
                .iter()
                .filter(|entry| in_range(entry.turn_number))
                .cloned()
                .collect::<Vec<_>>()
        };
        sub.hunted_combats = entries_in_range(&self.hunted_combats);
        sub.lost_combats = entries_in_range(&self.lost_combats);
        sub.learned_skills = entries_in_range(&self.learned_skills);
        sub.hybrid_content = entries_in_range(&self.hybrid_content);

        sub.create_log_summary();
        Ok(sub)
    }
}
