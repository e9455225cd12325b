//! The reconstructed ascension.
//!
//! A [`Timeline`] is fed turns in log order and keeps:
//! - the turn list (detailed mode) or pre-built intervals (interval-only)
//! - per-turn-keyed histories: day changes, levels, equipment, familiars,
//!   player snapshots
//! - flat lists: pulls, learned skills, hybridization, hunted/lost combats
//!
//! Turns are appended through a small state machine (see
//! [`Timeline::add_turn`]) that folds free actions into the adventure they
//! belong to. After parsing, [`Timeline::finish_parse`] rebuilds the derived
//! histories and computes the [`LogSummaryData`].

mod changes;
mod interval;
mod sub_interval;
mod turn;


use std::collections::BTreeMap;

use alv_types::formatting::{format_count_label, parse_count_label};
use serde::Serialize;

pub use changes::{
    DayChange, Equipment, EquipmentChange, EquipmentSlot, FamiliarChange, LevelData, LimitedUse,
    NO_FAMILIAR, PizzaEvent, PlayerSnapshot, Pull, TurnEntry,
};
pub use interval::{TurnInterval, build_intervals};
pub use turn::{
    Consumable, ConsumableKind, CountedSet, DayNumber, MeatGain, MeatSource, MpGain, MpSource, Turn,
    TurnData, TurnNumber,
};

use crate::error::TimelineError;
use crate::game_data::{AscensionPath, CharacterClass, Counter, GameMode, StatGain};
use crate::summary::LogSummaryData;

pub const ASCENSION_START: &str = "Ascension Start";
pub const START_OF_DAY: &str = "Start of Day";

/// Learned skills sharing one turn are joined until an entry holds this many
/// separators.
const MAX_SKILL_SEPARATORS: usize = 4;

#[derive(Debug, Clone, Serialize)]
pub struct Timeline {
    log_name: String,
    detailed: bool,
    mafia_turn_iteration: bool,
    subinterval: bool,

    character_class: CharacterClass,
    ascension_path: AscensionPath,
    game_mode: GameMode,

    turns: Vec<Turn>,
    intervals: Vec<TurnInterval>,

    day_changes: BTreeMap<DayNumber, DayChange>,
    levels: BTreeMap<u32, LevelData>,
    equipment_changes: BTreeMap<TurnNumber, EquipmentChange>,
    familiar_changes: BTreeMap<TurnNumber, FamiliarChange>,
    player_snapshots: BTreeMap<TurnNumber, PlayerSnapshot>,

    pulls: Vec<Pull>,
    learned_skills: Vec<TurnEntry>,
    hybrid_content: Vec<TurnEntry>,
    hunted_combats: Vec<TurnEntry>,
    lost_combats: Vec<TurnEntry>,

    summary: Option<LogSummaryData>,
}

impl Default for Timeline {
    fn default() -> Self {
        Self::detailed()
    }
}

impl Timeline {
    fn empty(detailed: bool) -> Self {
        let mut timeline = Self {
            log_name: String::new(),
            detailed,
            mafia_turn_iteration: true,
            subinterval: false,
            character_class: CharacterClass::NotDefined,
            ascension_path: AscensionPath::NotDefined,
            game_mode: GameMode::NotDefined,
            turns: Vec::new(),
            intervals: Vec::new(),
            day_changes: BTreeMap::new(),
            levels: BTreeMap::new(),
            equipment_changes: BTreeMap::new(),
            familiar_changes: BTreeMap::new(),
            player_snapshots: BTreeMap::new(),
            pulls: Vec::new(),
            learned_skills: Vec::new(),
            hybrid_content: Vec::new(),
            hunted_combats: Vec::new(),
            lost_combats: Vec::new(),
            summary: None,
        };
        timeline.add_day_change(DayChange { day: 1, turn_number: 0 });
        timeline.add_level(LevelData { level: 1, turn_number: 0 });
        timeline.add_equipment_change(EquipmentChange::no_equipment());
        timeline.add_familiar_change(FamiliarChange::no_familiar());
        timeline
    }

    /// A timeline built turn by turn, seeded with the `Ascension Start` turn.
    pub fn detailed() -> Self {
        let mut timeline = Self::empty(true);
        let mut start = Turn::new(
            ASCENSION_START,
            ASCENSION_START,
            0,
            1,
            Equipment::default(),
            NO_FAMILIAR,
        );
        start.free = true;
        timeline.turns.push(start);
        timeline
    }

    /// A timeline built from pre-summarized intervals.
    pub fn interval_only() -> Self {
        let mut timeline = Self::empty(false);
        timeline.intervals.push(TurnInterval::summarized(
            ASCENSION_START,
            0,
            0,
            TurnData::default(),
        ));
        timeline
    }

    // ─────────────────────────────────────────────────────────────────────
    // Identity
    // ─────────────────────────────────────────────────────────────────────

    pub fn log_name(&self) -> &str {
        &self.log_name
    }

    pub fn set_log_name(&mut self, name: impl Into<String>) {
        self.log_name = name.into();
    }

    pub fn is_detailed(&self) -> bool {
        self.detailed
    }

    pub fn is_subinterval(&self) -> bool {
        self.subinterval
    }

    /// Selects how same-number turns fold (see [`Timeline::add_turn`]).
    pub fn set_mafia_turn_iteration(&mut self, enabled: bool) {
        self.mafia_turn_iteration = enabled;
    }

    pub fn character_class(&self) -> CharacterClass {
        self.character_class
    }

    pub fn set_character_class(&mut self, class: CharacterClass) {
        self.character_class = class;
    }

    pub fn ascension_path(&self) -> AscensionPath {
        self.ascension_path
    }

    pub fn set_ascension_path(&mut self, path: AscensionPath) {
        self.ascension_path = path;
    }

    pub fn game_mode(&self) -> GameMode {
        self.game_mode
    }

    pub fn set_game_mode(&mut self, mode: GameMode) {
        self.game_mode = mode;
    }

    // ─────────────────────────────────────────────────────────────────────
    // Turns
    // ─────────────────────────────────────────────────────────────────────

    /// Append a turn.
    ///
    /// When the new turn repeats the last turn's number, the last turn was a
    /// free action and is marked free. With mafia turn iteration, that free
    /// turn is folded into the one before it if both share day and area;
    /// otherwise the new turn itself is folded into the last one when area,
    /// day and number all match. Either way a leftover pair sharing turn,
    /// area and day is folded before the push, so repeated appends of one
    /// turn always collapse to a single record.
    pub fn add_turn(&mut self, turn: Turn) -> Result<(), TimelineError> {
        if !self.detailed {
            return Err(TimelineError::IntervalOnly);
        }
        if self.mafia_turn_iteration {
            self.append_mafia(turn);
        } else {
            self.append_natural(turn);
        }
        Ok(())
    }

    fn append_mafia(&mut self, turn: Turn) {
        let repeats_last = self
            .turns
            .last()
            .is_some_and(|last| last.turn_number == turn.turn_number);
        if repeats_last {
            if let Some(last) = self.turns.last_mut() {
                last.free = true;
            }
            if self.last_pair_matches(|last, prev| last.day == prev.day && last.area == prev.area) {
                self.fold_last_into_previous();
            }
        } else if self.last_pair_matches(same_slot) {
            self.fold_last_into_previous();
        }
        self.turns.push(turn);
    }

    fn append_natural(&mut self, mut turn: Turn) {
        let Some(last) = self.turns.last_mut() else {
            self.turns.push(turn);
            return;
        };
        if last.turn_number == turn.turn_number {
            last.free = true;
        }
        if same_slot(last, &turn) {
            if turn.data.free_runaways == 0 && turn.earned_free_runaway() {
                turn.data.free_runaways += 1;
            }
            last.absorb(turn);
            return;
        }
        if self.last_pair_matches(same_slot) {
            self.fold_last_into_previous();
        }
        self.turns.push(turn);
    }

    fn last_pair_matches(&self, predicate: impl Fn(&Turn, &Turn) -> bool) -> bool {
        match self.turns.as_slice() {
            [.., prev, last] => predicate(last, prev),
            _ => false,
        }
    }

    fn fold_last_into_previous(&mut self) {
        let Some(last) = self.turns.pop() else {
            return;
        };
        let Some(prev) = self.turns.last_mut() else {
            self.turns.push(last);
            return;
        };
        let free_runaway = last.earned_free_runaway();
        prev.absorb(last);
        if free_runaway {
            prev.data.free_runaways += 1;
        }
    }

    /// Final fold of a trailing pair sharing turn number and area.
    pub fn handle_parse_finished(&mut self) {
        if self.last_pair_matches(|last, prev| {
            last.turn_number == prev.turn_number && last.area == prev.area
        }) {
            self.fold_last_into_previous();
        }
    }

    /// Add a pre-summarized interval to an interval-only timeline.
    pub fn add_turn_interval(&mut self, interval: TurnInterval) -> Result<(), TimelineError> {
        if self.detailed {
            return Err(TimelineError::DetailedOnly);
        }
        self.intervals.push(interval);
        Ok(())
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last_turn(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Number of the last recorded turn, or the end of the last interval.
    pub fn last_turn_number(&self) -> TurnNumber {
        match self.turns.last() {
            Some(turn) => turn.turn_number,
            None => self.intervals.last().map_or(0, |i| i.end_turn),
        }
    }

    /// Number the next adventure will carry.
    pub fn next_turn_number(&self) -> TurnNumber {
        match self.turns.last() {
            Some(last) if last.free => last.turn_number,
            Some(last) => last.turn_number + 1,
            None => self.last_turn_number(),
        }
    }

    /// The turn new data attaches to.
    ///
    /// When a day change was seen after the last turn, a free
    /// `Start of Day` turn is appended first so the data lands on the new
    /// day.
    pub fn current_turn_mut(&mut self) -> Result<&mut Turn, TimelineError> {
        if !self.detailed {
            return Err(TimelineError::IntervalOnly);
        }
        let current_day = self.current_day_number();
        let last = self.turns.last().ok_or(TimelineError::NoTurns)?;
        if current_day > last.day {
            let mut start = Turn::new(
                START_OF_DAY,
                START_OF_DAY,
                self.next_turn_number(),
                current_day,
                self.last_equipment(),
                self.last_familiar(),
            );
            start.free = true;
            self.turns.push(start);
        }
        self.turns.last_mut().ok_or(TimelineError::NoTurns)
    }

    /// Intervals, available once the summary exists (always, for
    /// interval-only timelines).
    pub fn turn_intervals(&self) -> Result<&[TurnInterval], TimelineError> {
        if self.detailed && self.summary.is_none() {
            return Err(TimelineError::SummaryNotCreated);
        }
        Ok(&self.intervals)
    }

    pub(crate) fn intervals(&self) -> &[TurnInterval] {
        &self.intervals
    }

    // ─────────────────────────────────────────────────────────────────────
    // Days and levels
    // ─────────────────────────────────────────────────────────────────────

    pub fn add_day_change(&mut self, change: DayChange) {
        self.day_changes.insert(change.day, change);
    }

    pub fn day_changes(&self) -> impl Iterator<Item = &DayChange> {
        self.day_changes.values()
    }

    pub fn current_day_number(&self) -> DayNumber {
        self.day_changes.keys().next_back().copied().unwrap_or(1)
    }

    pub fn last_day_change(&self) -> Option<&DayChange> {
        self.day_changes.values().next_back()
    }

    /// Day the given turn falls on.
    pub fn day_at(&self, turn_number: TurnNumber) -> DayNumber {
        self.day_changes
            .values()
            .take_while(|change| change.turn_number <= turn_number)
            .last()
            .map_or(1, |change| change.day)
    }

    pub fn add_level(&mut self, level: LevelData) {
        self.levels.insert(level.level, level);
    }

    pub fn levels(&self) -> impl Iterator<Item = &LevelData> {
        self.levels.values()
    }

    pub fn last_level(&self) -> Option<&LevelData> {
        self.levels.values().next_back()
    }

    /// Level the character was at during the given turn.
    pub fn level_at(&self, turn_number: TurnNumber) -> u32 {
        self.levels
            .values()
            .filter(|level| level.turn_number <= turn_number)
            .map(|level| level.level)
            .max()
            .unwrap_or(1)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Equipment and familiars
    // ─────────────────────────────────────────────────────────────────────

    /// Record an equipment change. An existing change on the same turn is
    /// replaced; a change that matches the latest equipment is dropped.
    pub fn add_equipment_change(&mut self, change: EquipmentChange) {
        self.equipment_changes.remove(&change.turn_number);
        let unchanged = self
            .equipment_changes
            .values()
            .next_back()
            .is_some_and(|last| last.equipment == change.equipment);
        if !unchanged {
            self.equipment_changes.insert(change.turn_number, change);
        }
    }

    /// Replace the equipment history with `changes`, deduplicated in turn
    /// order.
    pub fn set_equipment_changes(&mut self, mut changes: Vec<EquipmentChange>) {
        changes.sort_by_key(|change| change.turn_number);
        self.equipment_changes.clear();
        for change in changes {
            self.add_equipment_change(change);
        }
    }

    pub fn equipment_changes(&self) -> impl Iterator<Item = &EquipmentChange> {
        self.equipment_changes.values()
    }

    pub fn last_equipment_change(&self) -> Option<&EquipmentChange> {
        self.equipment_changes.values().next_back()
    }

    /// Equipment worn going into `turn_number`.
    pub fn last_equipment_change_before(&self, turn_number: TurnNumber) -> Option<&EquipmentChange> {
        self.equipment_changes.range(..turn_number).next_back().map(|(_, c)| c)
    }

    pub fn first_equipment_change_after(&self, turn_number: TurnNumber) -> Option<&EquipmentChange> {
        self.equipment_changes
            .range(turn_number.saturating_add(1)..)
            .next()
            .map(|(_, c)| c)
    }

    pub fn last_equipment(&self) -> Equipment {
        self.last_equipment_change()
            .map(|change| change.equipment.clone())
            .unwrap_or_default()
    }

    pub fn add_familiar_change(&mut self, change: FamiliarChange) {
        self.familiar_changes.remove(&change.turn_number);
        let unchanged = self
            .familiar_changes
            .values()
            .next_back()
            .is_some_and(|last| last.familiar == change.familiar);
        if !unchanged {
            self.familiar_changes.insert(change.turn_number, change);
        }
    }

    pub fn set_familiar_changes(&mut self, mut changes: Vec<FamiliarChange>) {
        changes.sort_by_key(|change| change.turn_number);
        self.familiar_changes.clear();
        for change in changes {
            self.add_familiar_change(change);
        }
    }

    pub fn familiar_changes(&self) -> impl Iterator<Item = &FamiliarChange> {
        self.familiar_changes.values()
    }

    pub fn last_familiar_change_before(&self, turn_number: TurnNumber) -> Option<&FamiliarChange> {
        self.familiar_changes.range(..turn_number).next_back().map(|(_, c)| c)
    }

    pub fn first_familiar_change_after(&self, turn_number: TurnNumber) -> Option<&FamiliarChange> {
        self.familiar_changes
            .range(turn_number.saturating_add(1)..)
            .next()
            .map(|(_, c)| c)
    }

    pub fn last_familiar(&self) -> String {
        self.familiar_changes
            .values()
            .next_back()
            .map_or_else(|| NO_FAMILIAR.to_string(), |change| change.familiar.clone())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Snapshots, pulls and per-turn records
    // ─────────────────────────────────────────────────────────────────────

    pub fn add_player_snapshot(&mut self, snapshot: PlayerSnapshot) {
        self.player_snapshots.insert(snapshot.turn_number, snapshot);
    }

    pub fn player_snapshots(&self) -> impl Iterator<Item = &PlayerSnapshot> {
        self.player_snapshots.values()
    }

    pub fn last_player_snapshot_before(&self, turn_number: TurnNumber) -> Option<&PlayerSnapshot> {
        self.player_snapshots.range(..turn_number).next_back().map(|(_, s)| s)
    }

    pub fn first_player_snapshot_after(&self, turn_number: TurnNumber) -> Option<&PlayerSnapshot> {
        self.player_snapshots
            .range(turn_number.saturating_add(1)..)
            .next()
            .map(|(_, s)| s)
    }

    pub fn add_pull(&mut self, pull: Pull) {
        self.pulls.push(pull);
    }

    pub fn pulls(&self) -> &[Pull] {
        &self.pulls
    }

    /// Record a limited use on the current turn.
    pub fn add_limited_use(
        &mut self,
        counter: Counter,
        sub_use: impl Into<String>,
        stat_gain: StatGain,
    ) -> Result<(), TimelineError> {
        let turn = self.current_turn_mut()?;
        let limited_use = LimitedUse {
            day: turn.day,
            turn_number: turn.turn_number,
            counter,
            sub_use: sub_use.into(),
            stat_gain,
        };
        turn.data.limited_uses.push(limited_use);
        Ok(())
    }

    /// Every limited use, in turn order.
    pub fn limited_uses(&self) -> impl Iterator<Item = &LimitedUse> {
        let from_turns = self.turns.iter().flat_map(|turn| turn.data.limited_uses.iter());
        let from_intervals = self
            .intervals
            .iter()
            .filter(|interval| !interval.is_detailed())
            .flat_map(|interval| interval.data.limited_uses.iter());
        from_turns.chain(from_intervals)
    }

    pub fn add_pizza_event(
        &mut self,
        description: impl Into<String>,
        duration: u32,
    ) -> Result<(), TimelineError> {
        let turn = self.current_turn_mut()?;
        let event = PizzaEvent {
            day: turn.day,
            turn_number: turn.turn_number,
            description: description.into(),
            duration,
        };
        turn.data.pizza_events.push(event);
        Ok(())
    }

    pub fn add_hunted_combat(&mut self, entry: TurnEntry) {
        self.hunted_combats.push(entry);
    }

    pub fn hunted_combats(&self) -> &[TurnEntry] {
        &self.hunted_combats
    }

    pub fn add_lost_combat(&mut self, entry: TurnEntry) {
        self.lost_combats.push(entry);
    }

    pub fn lost_combats(&self) -> &[TurnEntry] {
        &self.lost_combats
    }

    /// Record a learned skill. Skills learned on the same turn share one
    /// entry, joined with `"; "`, up to five per entry.
    pub fn add_learned_skill(&mut self, entry: TurnEntry) {
        let existing = self.learned_skills.iter_mut().find(|e| {
            e.turn_number == entry.turn_number
                && e.text.matches(';').count() < MAX_SKILL_SEPARATORS
        });
        match existing {
            Some(e) => {
                e.text.push_str("; ");
                e.text.push_str(&entry.text);
            }
            None => self.learned_skills.push(entry),
        }
    }

    pub fn learned_skills(&self) -> &[TurnEntry] {
        &self.learned_skills
    }

    /// Record hybridization content. Repeats on the same turn collapse into
    /// one counted entry: `X`, `X (2)`, `X (3)`...
    pub fn add_hybrid_content(&mut self, entry: TurnEntry) {
        let position = self.hybrid_content.iter().position(|e| {
            e.turn_number == entry.turn_number && e.text.starts_with(&entry.text)
        });
        let Some(position) = position else {
            self.hybrid_content.push(entry);
            return;
        };
        let existing = self.hybrid_content.remove(position);
        let text = match parse_count_label(&existing.text) {
            Some((base, count)) => format_count_label(base, count + 1),
            None => format_count_label(&existing.text, 2),
        };
        self.hybrid_content.push(TurnEntry::new(text, entry.turn_number));
    }

    pub fn hybrid_content(&self) -> &[TurnEntry] {
        &self.hybrid_content
    }

    // ─────────────────────────────────────────────────────────────────────
    // Post-parse
    // ─────────────────────────────────────────────────────────────────────

    /// Finish a parsed log: fold the trailing pair, rebuild day, equipment
    /// and familiar histories from the turns, then compute the summary.
    pub fn finish_parse(&mut self) {
        self.handle_parse_finished();
        if self.detailed {
            self.rebuild_day_changes();
            self.rebuild_equipment_and_familiars();
        }
        self.create_log_summary();
    }

    fn rebuild_day_changes(&mut self) {
        let mut current_day = 1;
        let mut rebuilt = Vec::new();
        for turn in &self.turns {
            while current_day < turn.day {
                current_day += 1;
                rebuilt.push(DayChange {
                    day: current_day,
                    turn_number: turn.turn_number,
                });
            }
        }
        for change in rebuilt {
            self.add_day_change(change);
        }
    }

    fn rebuild_equipment_and_familiars(&mut self) {
        let equipment = self
            .turns
            .iter()
            .map(|turn| EquipmentChange {
                turn_number: turn.turn_number,
                equipment: turn.used_equipment.clone(),
            })
            .collect();
        let familiars = self
            .turns
            .iter()
            .map(|turn| FamiliarChange::new(turn.turn_number, turn.used_familiar.clone()))
            .collect();
        self.set_equipment_changes(equipment);
        self.set_familiar_changes(familiars);
    }

    /// Build intervals (detailed mode) and the aggregate summary.
    pub fn create_log_summary(&mut self) {
        if self.detailed {
            self.intervals = build_intervals(&self.turns);
        }
        self.summary = Some(LogSummaryData::from_timeline(self));
    }

    pub fn log_summary(&self) -> Result<&LogSummaryData, TimelineError> {
        self.summary.as_ref().ok_or(TimelineError::SummaryNotCreated)
    }
}

/// Same turn number, area and day.
fn same_slot(a: &Turn, b: &Turn) -> bool {
    a.turn_number == b.turn_number && a.area == b.area && a.day == b.day
}
