//! Wall-clock time-of-day helpers.
//!
//! Activity windows are stored as minutes since midnight. Windows may wrap
//! past midnight, so every conversion from an unbounded minute total goes
//! through [`normalize_minutes`].

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of minutes in a day.
pub const MINUTES_PER_DAY: u16 = 1440;

/// Wraps an arbitrary (possibly negative) minute total into `[0, 1439]`.
///
/// Uses Euclidean remainder so negative totals wrap backwards from
/// midnight instead of keeping their sign.
#[must_use]
pub const fn normalize_minutes(total: i32) -> u16 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let wrapped = total.rem_euclid(MINUTES_PER_DAY as i32) as u16;
    wrapped
}

/// A wall-clock time, serialized as `"HH:MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Midnight (`00:00`).
    pub const MIDNIGHT: Self = Self(0);

    /// Builds a time from any minute total, wrapping into the day.
    #[must_use]
    pub const fn from_minutes(total: i32) -> Self {
        Self(normalize_minutes(total))
    }

    /// Minutes since midnight, in `[0, 1439]`.
    #[must_use]
    pub const fn minutes(self) -> u16 {
        self.0
    }

    /// Hour of day, in `[0, 23]`.
    #[must_use]
    pub const fn hour(self) -> u8 {
        #[allow(clippy::cast_possible_truncation)]
        let hour = (self.0 / 60) as u8;
        hour
    }

    /// Minute within the hour, in `[0, 59]`.
    #[must_use]
    pub const fn minute(self) -> u8 {
        #[allow(clippy::cast_possible_truncation)]
        let minute = (self.0 % 60) as u8;
        minute
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Error returned when a string is not a valid `"HH:MM"` time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTimeError {
    /// The rejected input.
    pub value: String,
}

impl std::fmt::Display for InvalidTimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid time '{}': expected HH:MM", self.value)
    }
}

impl std::error::Error for InvalidTimeError {}

impl FromStr for TimeOfDay {
    type Err = InvalidTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || InvalidTimeError {
            value: s.to_string(),
        };

        let (h, m) = s.trim().split_once(':').ok_or_else(err)?;
        let hours: u16 = h.parse().map_err(|_| err())?;
        let minutes: u16 = m.parse().map_err(|_| err())?;

        if hours >= 24 || minutes >= 60 {
            return Err(err());
        }

        Ok(Self(hours * 60 + minutes))
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = InvalidTimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}
