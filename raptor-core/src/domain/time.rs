//! Time-of-day handling for scheduled timetables.
//!
//! Timetables express times as "HH:MM:SS" offsets into a service day, and
//! overnight trips legitimately run past 24:00:00 (e.g. "25:10:00" is ten
//! past one the following morning). This module provides a compact ordered
//! time type for those values.

use std::fmt;
use std::ops::Add;

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid time string.
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

/// A time of day within one service day, stored as seconds since the day's
/// origin.
///
/// Hours may exceed 23 to represent overnight trips that belong to the
/// previous service day. Values are totally ordered, so labels can be
/// compared directly.
///
/// # Examples
///
/// ```
/// use raptor_core::domain::TransitTime;
///
/// let t = TransitTime::parse("08:30:00").unwrap();
/// assert_eq!(t.to_string(), "08:30:00");
/// assert!(t < TransitTime::parse("25:00:00").unwrap());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TransitTime(i32);

impl TransitTime {
    /// Construct from a raw count of seconds since the service-day origin.
    pub fn from_seconds(secs: i32) -> Self {
        Self(secs)
    }

    /// Construct from hour/minute/second components. Hours past 23 are
    /// legal (overnight trips).
    pub fn from_hms(hour: u32, minute: u32, second: u32) -> Self {
        Self((hour * 3600 + minute * 60 + second) as i32)
    }

    /// Parse a time from "HH:MM:SS" format.
    ///
    /// # Examples
    ///
    /// ```
    /// use raptor_core::domain::TransitTime;
    ///
    /// assert!(TransitTime::parse("00:00:00").is_ok());
    /// assert!(TransitTime::parse("25:10:00").is_ok()); // overnight
    ///
    /// assert!(TransitTime::parse("8:30:00").is_err());
    /// assert!(TransitTime::parse("08:61:00").is_err());
    /// assert!(TransitTime::parse("083000").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        // Must be exactly 8 characters: HH:MM:SS
        if s.len() != 8 {
            return Err(TimeError::new("expected HH:MM:SS format"));
        }

        let bytes = s.as_bytes();

        if bytes[2] != b':' || bytes[5] != b':' {
            return Err(TimeError::new("expected colons at positions 2 and 5"));
        }

        let hour = parse_two_digits(&bytes[0..2])
            .ok_or_else(|| TimeError::new("invalid hour digits"))?;

        let minute = parse_two_digits(&bytes[3..5])
            .ok_or_else(|| TimeError::new("invalid minute digits"))?;
        if minute > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }

        let second = parse_two_digits(&bytes[6..8])
            .ok_or_else(|| TimeError::new("invalid second digits"))?;
        if second > 59 {
            return Err(TimeError::new("second must be 0-59"));
        }

        Ok(Self::from_hms(hour, minute, second))
    }

    /// Seconds since the service-day origin.
    pub fn seconds(self) -> i32 {
        self.0
    }

    /// Signed duration from `earlier` to `self`.
    pub fn signed_duration_since(self, earlier: TransitTime) -> Duration {
        Duration::seconds((self.0 - earlier.0) as i64)
    }
}

impl Add<Duration> for TransitTime {
    type Output = TransitTime;

    fn add(self, rhs: Duration) -> TransitTime {
        TransitTime(self.0 + rhs.num_seconds() as i32)
    }
}

impl fmt::Debug for TransitTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TransitTime({self})")
    }
}

impl fmt::Display for TransitTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.0;
        let (sign, total) = if total < 0 { ("-", -total) } else { ("", total) };
        write!(
            f,
            "{}{:02}:{:02}:{:02}",
            sign,
            total / 3600,
            (total % 3600) / 60,
            total % 60
        )
    }
}

/// Parse exactly two ASCII digits, returning None on any non-digit.
fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    let hi = (bytes[0] as char).to_digit(10)?;
    let lo = (bytes[1] as char).to_digit(10)?;
    Some(hi * 10 + lo)
}
