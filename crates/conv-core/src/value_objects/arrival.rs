//! Volunteer arrival/departure slots
//!
//! Encoded on the wire and in the database as `YYYY-MM-DD_timeOfDay`,
//! e.g. `2025-07-10_afternoon`.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Coarse time of day a volunteer arrives or leaves
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimeOfDay {
    Morning,
    Noon,
    Afternoon,
    Evening,
}

impl TimeOfDay {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Noon => "noon",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
        }
    }
}

impl FromStr for TimeOfDay {
    type Err = ArrivalSlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "morning" => Ok(Self::Morning),
            "noon" => Ok(Self::Noon),
            "afternoon" => Ok(Self::Afternoon),
            "evening" => Ok(Self::Evening),
            other => Err(ArrivalSlotError::UnknownTimeOfDay(other.to_string())),
        }
    }
}

/// Errors raised while parsing an arrival slot string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArrivalSlotError {
    #[error("expected format YYYY-MM-DD_timeOfDay, got '{0}'")]
    Malformed(String),

    #[error("invalid date '{0}'")]
    InvalidDate(String),

    #[error("unknown time of day '{0}'")]
    UnknownTimeOfDay(String),
}

/// A date plus the time of day on that date
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArrivalSlot {
    pub date: NaiveDate,
    pub time_of_day: TimeOfDay,
}

impl ArrivalSlot {
    pub fn new(date: NaiveDate, time_of_day: TimeOfDay) -> Self {
        Self { date, time_of_day }
    }
}

impl FromStr for ArrivalSlot {
    type Err = ArrivalSlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (date, time) = s
            .split_once('_')
            .ok_or_else(|| ArrivalSlotError::Malformed(s.to_string()))?;

        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| ArrivalSlotError::InvalidDate(date.to_string()))?;

        Ok(Self {
            date,
            time_of_day: time.parse()?,
        })
    }
}

impl fmt::Display for ArrivalSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.date.format("%Y-%m-%d"), self.time_of_day.as_str())
    }
}

impl Serialize for ArrivalSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ArrivalSlot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_valid_slot() {
        let slot: ArrivalSlot = "2025-07-10_afternoon".parse().unwrap();
        assert_eq!(slot.date, date(2025, 7, 10));
        assert_eq!(slot.time_of_day, TimeOfDay::Afternoon);
        assert_eq!(slot.to_string(), "2025-07-10_afternoon");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            "2025-07-10".parse::<ArrivalSlot>(),
            Err(ArrivalSlotError::Malformed(_))
        ));
        assert!(matches!(
            "2025-13-40_morning".parse::<ArrivalSlot>(),
            Err(ArrivalSlotError::InvalidDate(_))
        ));
        assert_eq!(
            "2025-07-10_midnight".parse::<ArrivalSlot>(),
            Err(ArrivalSlotError::UnknownTimeOfDay("midnight".to_string()))
        );
    }

    #[test]
    fn test_ordering_follows_date_then_time() {
        let a: ArrivalSlot = "2025-07-10_evening".parse().unwrap();
        let b: ArrivalSlot = "2025-07-11_morning".parse().unwrap();
        let c: ArrivalSlot = "2025-07-11_noon".parse().unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_serde_as_string() {
        let slot: ArrivalSlot = serde_json::from_str("\"2025-07-12_noon\"").unwrap();
        assert_eq!(serde_json::to_string(&slot).unwrap(), "\"2025-07-12_noon\"");
        assert!(serde_json::from_str::<ArrivalSlot>("\"tomorrow\"").is_err());
    }
}
