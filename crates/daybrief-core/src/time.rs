use crate::{DaybriefError, DaybriefResult};
use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A platform-native timestamp: fractional Unix seconds sent as a decimal
/// string (for example `"1712345678.000200"`).
///
/// The original string is kept so that formatting returns exactly what was
/// parsed. The numeric value is used for ordering and clock rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SlackTs {
    raw: String,
    seconds: f64,
}

impl SlackTs {
    /// Seconds since the Unix epoch.
    pub fn seconds(&self) -> f64 {
        self.seconds
    }

    /// The string exactly as received from the platform.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Orders two timestamps by their instant.
    pub fn cmp_instant(&self, other: &Self) -> Ordering {
        self.seconds.total_cmp(&other.seconds)
    }

    /// Converts to a UTC datetime, `None` if out of chrono's range.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        let secs = self.seconds.floor();
        let nanos = ((self.seconds - secs) * 1_000_000_000.0).round() as u32;
        DateTime::from_timestamp(secs as i64, nanos.min(999_999_999))
    }

    /// `HH:MM:SS` in the process's local timezone.
    pub fn clock_time(&self) -> String {
        self.clock_time_in(&Local)
    }

    /// `HH:MM:SS` in the given timezone, or `unknown time` when the
    /// timestamp cannot be represented.
    pub fn clock_time_in<Tz: TimeZone>(&self, tz: &Tz) -> String
    where
        Tz::Offset: fmt::Display,
    {
        match self.to_datetime() {
            Some(dt) => dt.with_timezone(tz).format("%H:%M:%S").to_string(),
            None => "unknown time".to_string(),
        }
    }
}

impl FromStr for SlackTs {
    type Err = DaybriefError;

    fn from_str(s: &str) -> DaybriefResult<Self> {
        let seconds: f64 = s
            .trim()
            .parse()
            .map_err(|_| DaybriefError::Platform(format!("Invalid timestamp '{s}'")))?;
        if !seconds.is_finite() {
            return Err(DaybriefError::Platform(format!("Invalid timestamp '{s}'")));
        }
        Ok(Self {
            raw: s.to_string(),
            seconds,
        })
    }
}

impl TryFrom<String> for SlackTs {
    type Error = DaybriefError;

    fn try_from(value: String) -> DaybriefResult<Self> {
        value.parse()
    }
}

impl From<SlackTs> for String {
    fn from(ts: SlackTs) -> Self {
        ts.raw
    }
}

impl fmt::Display for SlackTs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Closed interval `[oldest, latest]` in whole Unix seconds covering one
/// calendar day: from local midnight to one second before the next midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    /// First second of the day.
    pub oldest: i64,
    /// Last second of the day.
    pub latest: i64,
}

impl DayWindow {
    /// The window for today's date in the process's local timezone.
    pub fn today() -> DaybriefResult<Self> {
        Self::for_date(Local::now().date_naive(), &Local)
    }

    /// The window for `date` as observed in `tz`.
    pub fn for_date<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DaybriefResult<Self> {
        let next = date
            .succ_opt()
            .ok_or_else(|| DaybriefError::Config(format!("No day after {date}")))?;
        let oldest = local_midnight(date, tz)?;
        let latest = local_midnight(next, tz)? - 1;
        Ok(Self { oldest, latest })
    }

    /// Whether the timestamp falls inside the window, bounds included.
    pub fn contains(&self, ts: &SlackTs) -> bool {
        ts.seconds() >= self.oldest as f64 && ts.seconds() <= self.latest as f64
    }
}

fn local_midnight<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DaybriefResult<i64> {
    tz.from_local_datetime(&date.and_time(NaiveTime::MIN))
        .earliest()
        .map(|dt| dt.timestamp())
        .ok_or_else(|| DaybriefError::Config(format!("Local midnight of {date} does not exist")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_timestamp_keeps_original_text() {
        for raw in ["1712345678.000200", "1000.0", "1000", "1712345678.123456"] {
            let ts: SlackTs = raw.parse().unwrap();
            assert_eq!(ts.to_string(), raw);
            assert_eq!(String::from(ts), raw);
        }
    }

    #[test]
    fn test_timestamp_rejects_garbage() {
        assert!("abc".parse::<SlackTs>().is_err());
        assert!("".parse::<SlackTs>().is_err());
        assert!("NaN".parse::<SlackTs>().is_err());
        assert!("inf".parse::<SlackTs>().is_err());
    }

    #[test]
    fn test_timestamp_serde_as_string() {
        let ts: SlackTs = serde_json::from_str("\"1700000000.000100\"").unwrap();
        assert_eq!(ts.as_str(), "1700000000.000100");
        assert_eq!(serde_json::to_string(&ts).unwrap(), "\"1700000000.000100\"");
        assert!(serde_json::from_str::<SlackTs>("\"later\"").is_err());
    }

    #[test]
    fn test_cmp_instant_uses_numeric_value() {
        let a: SlackTs = "999.9".parse().unwrap();
        let b: SlackTs = "1000.0".parse().unwrap();
        let c: SlackTs = "1000".parse().unwrap();
        assert_eq!(a.cmp_instant(&b), Ordering::Less);
        assert_eq!(b.cmp_instant(&c), Ordering::Equal);
    }

    #[test]
    fn test_clock_time_in_timezone() {
        // 1970-01-01T01:02:03Z
        let ts: SlackTs = "3723.5".parse().unwrap();
        assert_eq!(ts.clock_time_in(&Utc), "01:02:03");
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        assert_eq!(ts.clock_time_in(&tokyo), "10:02:03");
    }

    #[test]
    fn test_day_window_utc() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let window = DayWindow::for_date(date, &Utc).unwrap();
        assert_eq!(window.oldest, 1_704_153_600);
        assert_eq!(window.latest, 1_704_153_600 + 86_400 - 1);
    }

    #[test]
    fn test_day_window_offset() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let window = DayWindow::for_date(date, &tokyo).unwrap();
        assert_eq!(window.oldest, 1_704_153_600 - 9 * 3600);
        assert_eq!(window.latest - window.oldest, 86_399);
    }

    #[test]
    fn test_day_window_is_closed() {
        let window = DayWindow {
            oldest: 100,
            latest: 200,
        };
        assert!(window.contains(&"100".parse().unwrap()));
        assert!(window.contains(&"200.0".parse().unwrap()));
        assert!(!window.contains(&"200.5".parse().unwrap()));
        assert!(!window.contains(&"99.999".parse().unwrap()));
    }
}
