use std::collections::BTreeMap;

use serde::Serialize;

use crate::game_data::{Counter, REPLACE_ENEMY};
use crate::timeline::{DayNumber, LimitedUse};

/// Powerful Glove charge spent per cheat code.
const CHEAT_CODE_CHARGE: u32 = 5;

/// Limited uses counted per day, then per counter.
///
/// Every day from 1 up to the latest day with a use is present, even when
/// nothing was used on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LimitedUseSummary(BTreeMap<DayNumber, BTreeMap<Counter, u32>>);

impl LimitedUseSummary {
    pub fn from_uses<'a>(uses: impl IntoIterator<Item = &'a LimitedUse>) -> Self {
        let mut days: BTreeMap<DayNumber, BTreeMap<Counter, u32>> = BTreeMap::new();
        let mut next_day = 1;
        for limited_use in uses {
            while next_day <= limited_use.day {
                days.entry(next_day).or_default();
                next_day += 1;
            }
            let count = days
                .entry(limited_use.day)
                .or_default()
                .entry(limited_use.counter)
                .or_default();
            *count += charge(limited_use);
        }
        Self(days)
    }

    pub fn days(&self) -> impl Iterator<Item = (DayNumber, &BTreeMap<Counter, u32>)> {
        self.0.iter().map(|(day, counters)| (*day, counters))
    }

    pub fn count(&self, day: DayNumber, counter: Counter) -> u32 {
        self.0
            .get(&day)
            .and_then(|counters| counters.get(&counter))
            .copied()
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn charge(limited_use: &LimitedUse) -> u32 {
    match limited_use.counter {
        Counter::CheatCode if limited_use.sub_use == REPLACE_ENEMY => 2 * CHEAT_CODE_CHARGE,
        Counter::CheatCode => CHEAT_CODE_CHARGE,
        _ => 1,
    }
}
