//! Wall-clock times within a working day.

use std::fmt;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Minutes since midnight.
///
/// Formats as "HH:MM". Plans that run past midnight keep counting hours
/// ("25:10") rather than wrapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(u32);

impl ClockTime {
    pub const fn from_minutes(minutes: u32) -> Self {
        Self(minutes)
    }

    pub const fn from_hm(hours: u32, minutes: u32) -> Self {
        Self(hours * 60 + minutes)
    }

    pub const fn minutes(self) -> u32 {
        self.0
    }

    /// Parse "HH:MM" (surrounding whitespace allowed). Blank or malformed input yields `None`.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        NaiveTime::parse_from_str(text, "%H:%M")
            .ok()
            .map(|time| Self(time.hour() * 60 + time.minute()))
    }

    pub fn add_minutes(self, minutes: u32) -> Self {
        Self(self.0.saturating_add(minutes))
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        let (hours, minutes) = text
            .trim()
            .split_once(':')
            .ok_or_else(|| serde::de::Error::custom(format!("expected HH:MM, got '{text}'")))?;
        let hours: u32 = hours.parse().map_err(serde::de::Error::custom)?;
        let minutes: u32 = minutes.parse().map_err(serde::de::Error::custom)?;
        if minutes > 59 {
            return Err(serde::de::Error::custom(format!("minutes out of range in '{text}'")));
        }
        hours
            .checked_mul(60)
            .and_then(|total| total.checked_add(minutes))
            .map(Self)
            .ok_or_else(|| serde::de::Error::custom(format!("hours out of range in '{text}'")))
    }
}

/// "1h 25m" style duration used in warnings.
pub fn format_duration(minutes: u32) -> String {
    match (minutes / 60, minutes % 60) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}
