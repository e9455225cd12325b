//! Per-parse state shared by line and block parsers.

use std::sync::LazyLock;

use chrono::NaiveDate;
use hashbrown::HashMap;
use regex::Regex;

use crate::timeline::Equipment;

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

static DATE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Z][a-z]+ \d{1,2}, \d{4}) - (.+)$").expect("valid regex")
});

/// State one parse pass threads through every parser. Never shared between
/// logs.
#[derive(Debug, Default)]
pub struct ParseContext {
    /// Saved equipment for `outfit checkpoint` / `outfit restore`.
    pub equipment_stack: Vec<Equipment>,
    /// Familiar-slot item last worn by each familiar.
    pub familiar_equipment: HashMap<String, String>,
    date_watch: DateWatch,
    /// The date watch counted a day change on the line just read.
    date_change_pending: bool,
}

impl ParseContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a line to the date watch. Returns true when the in-game date
    /// moved on without an explicit day marker in between.
    pub fn observe_date_line(&mut self, line: &str) -> bool {
        let Some(kol_date) = parse_date_header(line) else {
            return false;
        };
        let changed = self.date_watch.observe(kol_date);
        self.date_change_pending = changed;
        changed
    }

    /// Whether the previous line was a date change the watch already
    /// counted. Consumes it, so a later notice counts on its own.
    pub fn take_date_change(&mut self) -> bool {
        std::mem::take(&mut self.date_change_pending)
    }

    /// Any line other than a date header ends the pending change.
    pub fn clear_date_change(&mut self) {
        self.date_change_pending = false;
    }

    /// An explicit day marker was parsed.
    pub fn explicit_day_change(&mut self) {
        self.date_watch.last_kol_date = None;
    }
}

#[derive(Debug, Default)]
struct DateWatch {
    last_kol_date: Option<String>,
}

impl DateWatch {
    fn observe(&mut self, kol_date: &str) -> bool {
        let changed = self
            .last_kol_date
            .as_deref()
            .is_some_and(|last| last != kol_date);
        self.last_kol_date = Some(kol_date.to_string());
        changed
    }
}

/// Extract the in-game date from a `MONTH D, YYYY - KOLDATE` header.
fn parse_date_header(line: &str) -> Option<&str> {
    if !MONTHS.iter().any(|month| line.starts_with(month)) || line.starts_with("April Fool's Day") {
        return None;
    }
    let caps = DATE_HEADER.captures(line)?;
    NaiveDate::parse_from_str(caps.get(1)?.as_str(), "%B %d, %Y").ok()?;
    let dash = line.rfind('-')?;
    line.get(dash + 2..).filter(|date| !date.is_empty())
}
