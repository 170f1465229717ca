//! Timetable time handling.
//!
//! Published timetables give times as "HH:MM" or "HH:MM:SS" strings, with
//! hours of 24 and above for trips that run past midnight on the same
//! service day. `TimePoint` keeps that day offset explicitly so that 00:10 on
//! the following day always sorts after 23:55 on the first.

use chrono::Duration;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Minutes in one day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Number of distinct hour buckets (two service days).
pub const HOUR_BUCKETS: usize = 48;

/// Error returned from time arithmetic that leaves the representable range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A minute-precision time of day with a day offset.
///
/// Day offset 0 is the service day itself and 1 is the following day.
/// Ordering is day offset first, then hour, then minute.
///
/// # Examples
///
/// ```
/// use tram_server::domain::TimePoint;
///
/// let late = TimePoint::parse("23:55").unwrap();
/// let after_midnight = TimePoint::parse("24:10").unwrap();
/// assert!(after_midnight.is_after(late));
/// assert_eq!(TimePoint::diff_minutes(late, after_midnight), 15);
/// assert_eq!(after_midnight.to_string(), "24:10");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimePoint {
    day_offset: u8,
    hour: u8,
    minute: u8,
}

impl TimePoint {
    /// Midnight at the start of the service day.
    pub const MIDNIGHT: TimePoint = TimePoint {
        day_offset: 0,
        hour: 0,
        minute: 0,
    };

    /// The last representable minute (47:59).
    pub const END_OF_NEXT_DAY: TimePoint = TimePoint {
        day_offset: 1,
        hour: 23,
        minute: 59,
    };

    /// Create a same-day time. Returns `None` for out of range components.
    pub fn of(hour: u32, minute: u32) -> Option<Self> {
        Self::with_offset(0, hour, minute)
    }

    /// Create a time on the day after the service day.
    pub fn next_day(hour: u32, minute: u32) -> Option<Self> {
        Self::with_offset(1, hour, minute)
    }

    fn with_offset(day_offset: u8, hour: u32, minute: u32) -> Option<Self> {
        if hour > 23 || minute > 59 || day_offset > 1 {
            return None;
        }
        Some(Self {
            day_offset,
            hour: hour as u8,
            minute: minute as u8,
        })
    }

    /// Create a time from minutes since midnight of the service day.
    pub fn from_minutes(total: u32) -> Option<Self> {
        if total >= 2 * MINUTES_PER_DAY {
            return None;
        }
        let day_offset = (total / MINUTES_PER_DAY) as u8;
        let of_day = total % MINUTES_PER_DAY;
        Some(Self {
            day_offset,
            hour: (of_day / 60) as u8,
            minute: (of_day % 60) as u8,
        })
    }

    /// Parse "HH:MM" or "HH:MM:SS".
    ///
    /// Hours 24 to 47 denote the following day. Seconds, when present, must be
    /// zero since a `TimePoint` cannot hold them.
    ///
    /// # Examples
    ///
    /// ```
    /// use tram_server::domain::TimePoint;
    ///
    /// assert!(TimePoint::parse("00:00").is_some());
    /// assert!(TimePoint::parse("10:05:00").is_some());
    /// assert_eq!(TimePoint::parse("25:30").unwrap().day_offset(), 1);
    ///
    /// assert!(TimePoint::parse("12:60").is_none());
    /// assert!(TimePoint::parse("ab:cd").is_none());
    /// assert!(TimePoint::parse("10:05:30").is_none());
    /// ```
    pub fn parse(text: &str) -> Option<Self> {
        let mut parts = text.trim().split(':');
        let hour_part = parts.next()?;
        let minute_part = parts.next()?;
        let second_part = parts.next();
        if parts.next().is_some() {
            return None;
        }

        if hour_part.is_empty() || hour_part.len() > 2 {
            return None;
        }
        let hours = parse_digits(hour_part)?;
        if minute_part.len() != 2 {
            return None;
        }
        let minute = parse_digits(minute_part)?;
        if minute > 59 {
            return None;
        }

        if let Some(seconds) = second_part {
            if seconds.len() != 2 {
                return None;
            }
            // Sub-minute precision would be lost
            if parse_digits(seconds)? != 0 {
                return None;
            }
        }

        match hours {
            0..=23 => Self::of(hours, minute),
            24..=47 => Self::next_day(hours - 24, minute),
            _ => None,
        }
    }

    /// Returns the day offset (0 or 1).
    pub fn day_offset(&self) -> u8 {
        self.day_offset
    }

    /// Returns the clock hour (0-23).
    pub fn hour(&self) -> u32 {
        self.hour as u32
    }

    /// Returns the minute (0-59).
    pub fn minute(&self) -> u32 {
        self.minute as u32
    }

    /// Minutes since midnight at the start of the service day.
    pub fn minutes_since_midnight(&self) -> u32 {
        self.day_offset as u32 * MINUTES_PER_DAY + self.hour as u32 * 60 + self.minute as u32
    }

    /// Hour bucket in `0..48`, counting next-day hours from 24.
    pub fn hour_bucket(&self) -> usize {
        self.day_offset as usize * 24 + self.hour as usize
    }

    pub fn is_before(&self, other: TimePoint) -> bool {
        *self < other
    }

    pub fn is_after(&self, other: TimePoint) -> bool {
        *self > other
    }

    /// True if `start <= self <= end`.
    pub fn between(&self, start: TimePoint, end: TimePoint) -> bool {
        start <= *self && *self <= end
    }

    /// Absolute difference in minutes, taking day offsets into account.
    pub fn diff_minutes(a: TimePoint, b: TimePoint) -> u32 {
        a.minutes_since_midnight()
            .abs_diff(b.minutes_since_midnight())
    }

    /// Add whole minutes, moving to the next day if needed.
    pub fn plus_minutes(&self, minutes: u32) -> Result<Self, TimeError> {
        let total = self
            .minutes_since_midnight()
            .checked_add(minutes)
            .ok_or_else(|| TimeError::new("minute overflow"))?;
        Self::from_minutes(total).ok_or_else(|| TimeError::new("past end of following day"))
    }

    /// Subtract whole minutes. Going before midnight of the service day is an error.
    pub fn minus_minutes(&self, minutes: u32) -> Result<Self, TimeError> {
        let total = self
            .minutes_since_midnight()
            .checked_sub(minutes)
            .ok_or_else(|| TimeError::new("before start of service day"))?;
        Self::from_minutes(total).ok_or_else(|| TimeError::new("invalid time"))
    }

    /// Add a duration, which must be a non-negative whole number of minutes.
    pub fn plus(&self, duration: Duration) -> Result<Self, TimeError> {
        if duration < Duration::zero() {
            return Err(TimeError::new("negative duration"));
        }
        if duration.num_seconds() % 60 != 0 || duration.subsec_nanos() != 0 {
            return Err(TimeError::new("duration is not a whole number of minutes"));
        }
        let minutes = u32::try_from(duration.num_minutes())
            .map_err(|_| TimeError::new("duration too large"))?;
        self.plus_minutes(minutes)
    }
}

impl fmt::Debug for TimePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TimePoint({:02}:{:02}+{})",
            self.hour, self.minute, self.day_offset
        )
    }
}

impl fmt::Display for TimePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.day_offset as u32 * 24 + self.hour as u32;
        write!(f, "{:02}:{:02}", hours, self.minute)
    }
}

impl Serialize for TimePoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimePoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        TimePoint::parse(&text)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid time '{text}'")))
    }
}

/// Parse an all-digit ASCII string.
fn parse_digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    prop_compose! {
        fn any_time()(offset in 0u32..2, hour in 0u32..24, minute in 0u32..60) -> TimePoint {
            if offset == 0 {
                TimePoint::of(hour, minute).unwrap()
            } else {
                TimePoint::next_day(hour, minute).unwrap()
            }
        }
    }

    proptest! {
        /// Display then parse gives back the same time
        #[test]
        fn parse_display_roundtrip(time in any_time()) {
            prop_assert_eq!(TimePoint::parse(&time.to_string()), Some(time));
        }

        #[test]
        fn diff_is_symmetric(a in any_time(), b in any_time()) {
            prop_assert_eq!(TimePoint::diff_minutes(a, b), TimePoint::diff_minutes(b, a));
        }

        /// Adding then subtracting the same minutes returns the original
        #[test]
        fn plus_minus_identity(time in any_time(), minutes in 0u32..1440) {
            if let Ok(later) = time.plus_minutes(minutes) {
                prop_assert_eq!(later.minus_minutes(minutes).unwrap(), time);
            }
        }

        /// Ordering agrees with minutes since midnight
        #[test]
        fn ordering_consistent(a in any_time(), b in any_time()) {
            prop_assert_eq!(
                a.cmp(&b),
                a.minutes_since_midnight().cmp(&b.minutes_since_midnight())
            );
        }

        #[test]
        fn next_day_always_after_same_clock(hour in 0u32..24, minute in 0u32..60) {
            let same = TimePoint::of(hour, minute).unwrap();
            let next = TimePoint::next_day(hour, minute).unwrap();
            prop_assert!(next.is_after(same));
            prop_assert_eq!(TimePoint::diff_minutes(same, next), MINUTES_PER_DAY);
        }

        #[test]
        fn invalid_minute_rejected(hour in 0u32..48, minute in 60u32..100) {
            let s = format!("{:02}:{:02}", hour, minute);
            prop_assert!(TimePoint::parse(&s).is_none());
        }
    }
}
