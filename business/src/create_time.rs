//! Interpretation of the `createTime` parameter.

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone};
use serde::Serialize;
use std::fmt::Display;

use crate::params::ParameterMap;

/// Name of the one parameter that carries temporal meaning.
pub const CREATE_TIME_KEY: &str = "createTime";

/// Display format for interpreted instants.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f %:z",
    "%Y-%m-%d %H:%M:%S%.f %z",
    "%Y/%m/%d %H:%M:%S%.f%:z",
    "%Y/%m/%d %H:%M:%S%.f %:z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeParseError {
    #[error("unrecognized date-time: {0:?}")]
    Unrecognized(String),
    #[error("local time {0} does not exist in this time zone")]
    NonexistentLocalTime(NaiveDateTime),
}

/// A raw `createTime` value together with its interpretation.
///
/// `instant` and `formatted` are present exactly when the value is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedTime {
    original: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    instant: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    formatted: Option<String>,
    valid: bool,
}

impl ParsedTime {
    pub fn invalid(original: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            instant: None,
            formatted: None,
            valid: false,
        }
    }

    pub fn valid(original: impl Into<String>, instant: i64, formatted: String) -> Self {
        Self {
            original: original.into(),
            instant: Some(instant),
            formatted: Some(formatted),
            valid: true,
        }
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    /// Epoch milliseconds.
    pub fn instant(&self) -> Option<i64> {
        self.instant
    }

    pub fn formatted(&self) -> Option<&str> {
        self.formatted.as_deref()
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

/// Interprets `raw` in the local time zone.
pub fn interpret_time(raw: &str) -> ParsedTime {
    interpret_time_in(raw, &Local)
}

/// Interprets `raw` in `tz`.
///
/// Values without an explicit offset are taken as wall-clock time in `tz`.
/// Never fails; an unparseable value yields an invalid [`ParsedTime`].
pub fn interpret_time_in<Tz>(raw: &str, tz: &Tz) -> ParsedTime
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match parse_instant(raw, tz) {
        Ok(dt) => ParsedTime::valid(
            raw,
            dt.timestamp_millis(),
            dt.format(DISPLAY_FORMAT).to_string(),
        ),
        Err(e) => {
            log::debug!(target: "qrstamp_business::create_time", "invalid_create_time {e}");
            ParsedTime::invalid(raw)
        }
    }
}

/// Interprets the `createTime` entry of `params`, if there is one.
pub fn interpret_params(params: &ParameterMap) -> Option<ParsedTime> {
    interpret_params_in(params, &Local)
}

pub fn interpret_params_in<Tz>(params: &ParameterMap, tz: &Tz) -> Option<ParsedTime>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    params
        .get(CREATE_TIME_KEY)
        .map(|raw| interpret_time_in(raw, tz))
}

/// Parses `raw` into an instant expressed in `tz`.
pub fn parse_instant<Tz: TimeZone>(raw: &str, tz: &Tz) -> Result<DateTime<Tz>, TimeParseError> {
    let normalized = normalize(raw);

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::<FixedOffset>::parse_from_str(&normalized, format) {
            return Ok(dt.with_timezone(tz));
        }
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&normalized, format).ok())
        .ok_or_else(|| TimeParseError::Unrecognized(raw.to_owned()))?;

    tz.from_local_datetime(&naive)
        .earliest()
        .ok_or(TimeParseError::NonexistentLocalTime(naive))
}

/// `T` and `Z` become spaces; whitespace runs collapse to one space.
fn normalize(raw: &str) -> String {
    raw.replace(['T', 'Z'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{MappedLocalTime, NaiveDate, NaiveTime, TimeDelta, Utc};

    #[test]
    fn test_iso_t_separator_recovers_wall_clock() {
        let parsed = interpret_time_in("2024-03-15T10:30:00", &Utc);
        assert!(parsed.is_valid());
        assert_eq!(parsed.formatted(), Some("2024-03-15 10:30:00"));
        assert_eq!(parsed.instant(), Some(1_710_498_600_000));
        assert_eq!(parsed.original(), "2024-03-15T10:30:00");
    }

    #[test]
    fn test_naive_value_keeps_wall_clock() {
        let parsed = interpret_time_in("2024-03-15 10:30:00", &Utc);
        assert!(parsed.is_valid());
        assert_eq!(parsed.formatted(), Some("2024-03-15 10:30:00"));
    }

    #[test]
    fn test_trailing_z_is_treated_as_separator() {
        let parsed = interpret_time_in("2024-03-15T10:30:00Z", &Utc);
        assert_eq!(parsed.formatted(), Some("2024-03-15 10:30:00"));
    }

    #[test]
    fn test_explicit_offset_pins_instant() {
        let parsed = interpret_time_in("2024-03-15 18:30:00+08:00", &Utc);
        assert!(parsed.is_valid());
        assert_eq!(parsed.formatted(), Some("2024-03-15 10:30:00"));
    }

    #[test]
    fn test_minutes_only_and_slashes() {
        let a = interpret_time_in("2024/03/15 10:30", &Utc);
        let b = interpret_time_in(" 2024-03-15 10:30:00 ", &Utc);
        assert!(a.is_valid());
        assert_eq!(a.instant(), b.instant());
    }

    #[test]
    fn test_fractional_seconds() {
        let parsed = interpret_time_in("2024-03-15T10:30:00.250", &Utc);
        assert_eq!(parsed.instant(), Some(1_710_498_600_250));
    }

    #[test]
    fn test_invalid_values() {
        for raw in ["not-a-time", "", "2024-02-30 10:00:00", "2024-01-01 25:00:00", "2024-01-01"] {
            let parsed = interpret_time_in(raw, &Utc);
            assert!(!parsed.is_valid(), "{raw:?} should be invalid");
            assert!(parsed.instant().is_none());
            assert!(parsed.formatted().is_none());
            assert_eq!(parsed.original(), raw);
        }
    }

    #[test]
    fn test_interpret_params_requires_key() {
        let mut params = ParameterMap::new();
        params.insert("id", "1");
        assert!(interpret_params_in(&params, &Utc).is_none());

        params.insert(CREATE_TIME_KEY, "garbage");
        let parsed = interpret_params_in(&params, &Utc).expect("createTime present");
        assert!(!parsed.is_valid());
    }

    fn utc_naive(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
            .single()
            .expect("valid UTC time")
            .naive_utc()
    }

    /// +01:00 with +02:00 summer time from 2024-03-31 01:00 UTC to
    /// 2024-10-27 01:00 UTC.
    #[derive(Debug, Clone, Copy)]
    struct SummerTime;

    impl SummerTime {
        fn winter() -> FixedOffset {
            FixedOffset::east_opt(3600).expect("valid offset")
        }

        fn summer() -> FixedOffset {
            FixedOffset::east_opt(7200).expect("valid offset")
        }
    }

    impl TimeZone for SummerTime {
        type Offset = FixedOffset;

        fn from_offset(_offset: &FixedOffset) -> Self {
            Self
        }

        fn offset_from_local_date(&self, local: &NaiveDate) -> MappedLocalTime<FixedOffset> {
            self.offset_from_local_datetime(&local.and_time(NaiveTime::MIN))
        }

        fn offset_from_local_datetime(
            &self,
            local: &NaiveDateTime,
        ) -> MappedLocalTime<FixedOffset> {
            // Summer first, so a fold lists the earlier instant first.
            let candidates: Vec<FixedOffset> = [Self::summer(), Self::winter()]
                .into_iter()
                .filter(|offset| {
                    let utc = *local - TimeDelta::seconds(i64::from(offset.local_minus_utc()));
                    self.offset_from_utc_datetime(&utc) == *offset
                })
                .collect();
            match candidates[..] {
                [] => MappedLocalTime::None,
                [one] => MappedLocalTime::Single(one),
                [earlier, later, ..] => MappedLocalTime::Ambiguous(earlier, later),
            }
        }

        fn offset_from_utc_date(&self, utc: &NaiveDate) -> FixedOffset {
            self.offset_from_utc_datetime(&utc.and_time(NaiveTime::MIN))
        }

        fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
            let start = utc_naive(2024, 3, 31, 1, 0);
            let end = utc_naive(2024, 10, 27, 1, 0);
            if (start..end).contains(utc) {
                Self::summer()
            } else {
                Self::winter()
            }
        }
    }

    #[test]
    fn test_time_in_spring_gap_is_invalid() {
        let naive = NaiveDateTime::parse_from_str("2024-03-31 02:30:00", "%Y-%m-%d %H:%M:%S")
            .expect("valid naive");
        assert_eq!(
            parse_instant("2024-03-31 02:30:00", &SummerTime).unwrap_err(),
            TimeParseError::NonexistentLocalTime(naive)
        );

        let parsed = interpret_time_in("2024-03-31T02:30:00", &SummerTime);
        assert!(!parsed.is_valid());
        assert!(parsed.instant().is_none());
    }

    #[test]
    fn test_time_in_autumn_fold_takes_earliest() {
        let instant = parse_instant("2024-10-27 02:30:00", &SummerTime).expect("parses");
        assert_eq!(instant.naive_utc(), utc_naive(2024, 10, 27, 0, 30));

        let parsed = interpret_time_in("2024-10-27 02:30:00", &SummerTime);
        assert_eq!(parsed.formatted(), Some("2024-10-27 02:30:00"));
    }

    #[test]
    fn test_parse_error_kinds() {
        assert_eq!(
            parse_instant("nope", &Utc).unwrap_err(),
            TimeParseError::Unrecognized("nope".to_owned())
        );
    }
}
