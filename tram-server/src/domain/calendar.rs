//! Service calendars: which dates a service operates on.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Set of weekdays, one bit per day with Monday as bit 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DaysOfWeek(u8);

impl DaysOfWeek {
    pub const NONE: DaysOfWeek = DaysOfWeek(0);
    pub const ALL: DaysOfWeek = DaysOfWeek(0b111_1111);

    /// Build from raw bits; bits above the seventh are discarded.
    pub fn from_bits(bits: u8) -> Self {
        Self(bits & Self::ALL.0)
    }

    pub fn from_bools(
        mon: bool,
        tue: bool,
        wed: bool,
        thu: bool,
        fri: bool,
        sat: bool,
        sun: bool,
    ) -> Self {
        let mut days = Self::NONE;
        for (runs, day) in [
            (mon, Weekday::Mon),
            (tue, Weekday::Tue),
            (wed, Weekday::Wed),
            (thu, Weekday::Thu),
            (fri, Weekday::Fri),
            (sat, Weekday::Sat),
            (sun, Weekday::Sun),
        ] {
            if runs {
                days.set(day);
            }
        }
        days
    }

    /// Build from a list of weekdays.
    pub fn of(days: &[Weekday]) -> Self {
        let mut result = Self::NONE;
        for day in days {
            result.set(*day);
        }
        result
    }

    pub fn set(&mut self, day: Weekday) {
        self.0 |= 1 << day.num_days_from_monday();
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & (1 << day.num_days_from_monday()) != 0
    }

    pub fn union(self, other: DaysOfWeek) -> DaysOfWeek {
        DaysOfWeek(self.0 | other.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn bits(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for DaysOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const LETTERS: [char; 7] = ['M', 'T', 'W', 'T', 'F', 'S', 'S'];
        for (bit, letter) in LETTERS.iter().enumerate() {
            if self.0 & (1 << bit) != 0 {
                write!(f, "{letter}")?;
            } else {
                write!(f, "-")?;
            }
        }
        Ok(())
    }
}

/// When a service operates: weekdays within an inclusive date range, adjusted
/// by exception dates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCalendar {
    pub days: DaysOfWeek,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Dates the service runs regardless of the weekly pattern.
    #[serde(default)]
    pub added: BTreeSet<NaiveDate>,
    /// Dates the service does not run even though the pattern says it does.
    #[serde(default)]
    pub removed: BTreeSet<NaiveDate>,
}

impl ServiceCalendar {
    pub fn new(days: DaysOfWeek, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            days,
            start,
            end,
            added: BTreeSet::new(),
            removed: BTreeSet::new(),
        }
    }

    pub fn with_added(mut self, date: NaiveDate) -> Self {
        self.removed.remove(&date);
        self.added.insert(date);
        self
    }

    pub fn with_removed(mut self, date: NaiveDate) -> Self {
        self.added.remove(&date);
        self.removed.insert(date);
        self
    }

    /// True if the service runs on `date`.
    ///
    /// The weekly pattern and date range are checked first; exceptions are
    /// applied afterwards.
    pub fn operates_on(&self, date: NaiveDate) -> bool {
        let base = date >= self.start && date <= self.end && self.days.contains(date.weekday());

        if self.added.contains(&date) {
            return true;
        }
        if self.removed.contains(&date) {
            return false;
        }
        base
    }

    /// True if the service runs on at least one date in `[from, to]`.
    pub fn overlaps(&self, from: NaiveDate, to: NaiveDate) -> bool {
        if self.added.range(from..=to).next().is_some() {
            return true;
        }
        let first = from.max(self.start);
        let last = to.min(self.end);
        first
            .iter_days()
            .take_while(|d| *d <= last)
            .take(7 * (self.removed.len() + 1))
            .any(|d| self.operates_on(d))
    }

    /// True if the calendar can never operate.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && !self.overlaps(self.start, self.end)
    }
}
