use std::str::FromStr;

use chrono::{NaiveTime, Timelike};

/// Wall-clock time of day (hour:minute) at which the daily reminder fires.
/// Seconds and sub-second precision are dropped on construction so two
/// reminders parsed from the same "HH:MM" input always compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderTime(NaiveTime);

impl ReminderTime {
    pub fn new(inner: NaiveTime) -> Self {
        let normalized_time = inner
            .with_second(0)
            .and_then(|t| t.with_nanosecond(0))
            .expect("Will never fail.");
        Self(normalized_time)
    }

    pub fn time(&self) -> NaiveTime {
        self.0
    }
}

impl FromStr for ReminderTime {
    type Err = chrono::ParseError;

    /// Parses the 24-hour "HH:MM" format produced by a time picker.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let time = NaiveTime::parse_from_str(s, "%H:%M")?;
        Ok(Self::new(time))
    }
}

impl std::fmt::Display for ReminderTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_24h_input() {
        let parsed: ReminderTime = "07:45".parse().unwrap();
        assert_eq!(parsed.time(), NaiveTime::from_hms_opt(7, 45, 0).unwrap());
    }

    #[test]
    fn rejects_out_of_range_input() {
        assert!("24:00".parse::<ReminderTime>().is_err());
        assert!("12:60".parse::<ReminderTime>().is_err());
        assert!("noonish".parse::<ReminderTime>().is_err());
    }

    #[test]
    fn construction_drops_seconds() {
        let time = ReminderTime::new(NaiveTime::from_hms_milli_opt(9, 30, 17, 250).unwrap());
        assert_eq!(time.time(), NaiveTime::from_hms_opt(9, 30, 0).unwrap());
    }
}
