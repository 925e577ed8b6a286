//! Hour bump for the `createTime=` field embedded in a payload.
//!
//! The field is recognized by a small fixed grammar:
//!
//! ```text
//! createTime= DDDD-DD-DD (' ' | 'T') HH ':' DD ':' DD
//! ```
//!
//! Only ASCII digits count as `D`/`H`. Text after the seconds is not part of
//! the field and is left untouched.

use std::ops::Range;

use serde::Serialize;

const FIELD_PREFIX: &str = "createTime=";
const DATE_LEN: usize = 10;
const HOUR_LEN: usize = 2;
const MINUTE_SECOND_LEN: usize = 6;
const FIELD_VALUE_LEN: usize = DATE_LEN + 1 + HOUR_LEN + MINUTE_SECOND_LEN;

/// A matched `createTime=` field, borrowing from the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateTimeField<'a> {
    /// Byte offset of the `c` in `createTime=`.
    start: usize,
    date: &'a str,
    separator: char,
    hour: u8,
    /// `:MM:SS`
    minute_second: &'a str,
}

impl<'a> CreateTimeField<'a> {
    /// Byte span of the whole field, prefix included.
    pub fn span(&self) -> Range<usize> {
        self.start..self.start + FIELD_PREFIX.len() + FIELD_VALUE_LEN
    }

    pub fn date(&self) -> &'a str {
        self.date
    }

    pub fn separator(&self) -> char {
        self.separator
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute_second(&self) -> &'a str {
        self.minute_second
    }

    /// Field text with `hour` substituted, as it would appear in the payload.
    pub fn render_with_hour(&self, hour: u8) -> String {
        format!(
            "{FIELD_PREFIX}{}{}{hour:02}{}",
            self.date, self.separator, self.minute_second
        )
    }

    /// Human display of the value with `hour` substituted (space separator).
    pub fn display_with_hour(&self, hour: u8) -> String {
        format!("{} {hour:02}{}", self.date, self.minute_second)
    }
}

/// Result of looking for a `createTime=` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateTimeScan<'a> {
    /// The text has no `createTime=` literal at all.
    Absent,
    /// `createTime=` occurs, but never followed by a recognizable value.
    Unrecognized,
    Found(CreateTimeField<'a>),
}

impl<'a> CreateTimeScan<'a> {
    pub fn field(self) -> Option<CreateTimeField<'a>> {
        match self {
            Self::Found(field) => Some(field),
            Self::Absent | Self::Unrecognized => None,
        }
    }
}

/// Finds the leftmost well-formed `createTime=` field in `text`.
pub fn scan_create_time(text: &str) -> CreateTimeScan<'_> {
    let mut seen_prefix = false;
    for (start, _) in text.match_indices(FIELD_PREFIX) {
        seen_prefix = true;
        let value_start = start + FIELD_PREFIX.len();
        if let Some(field) = parse_value(text, start, &text.as_bytes()[value_start..]) {
            return CreateTimeScan::Found(field);
        }
    }
    if seen_prefix {
        CreateTimeScan::Unrecognized
    } else {
        CreateTimeScan::Absent
    }
}

fn parse_value<'a>(text: &'a str, start: usize, value: &[u8]) -> Option<CreateTimeField<'a>> {
    let value = value.get(..FIELD_VALUE_LEN)?;
    let (date, rest) = value.split_at(DATE_LEN);
    let (separator, rest) = rest.split_first()?;
    let (hour, minute_second) = rest.split_at(HOUR_LEN);

    let date_ok = digits(&date[0..4]) && date[4] == b'-' && digits(&date[5..7]) && date[7] == b'-';
    let date_ok = date_ok && digits(&date[8..10]);
    let separator = match separator {
        b' ' => ' ',
        b'T' => 'T',
        _ => return None,
    };
    let ms_ok = minute_second[0] == b':'
        && digits(&minute_second[1..3])
        && minute_second[3] == b':'
        && digits(&minute_second[4..6]);
    if !(date_ok && digits(hour) && ms_ok) {
        return None;
    }

    // Every byte checked above is ASCII, so these offsets are char boundaries.
    let value_start = start + FIELD_PREFIX.len();
    let hour_start = value_start + DATE_LEN + 1;
    let ms_start = hour_start + HOUR_LEN;
    Some(CreateTimeField {
        start,
        date: &text[value_start..value_start + DATE_LEN],
        separator,
        hour: (hour[0] - b'0') * 10 + (hour[1] - b'0'),
        minute_second: &text[ms_start..ms_start + MINUTE_SECOND_LEN],
    })
}

fn digits(bytes: &[u8]) -> bool {
    bytes.iter().all(u8::is_ascii_digit)
}

/// Outcome of [`bump_create_time_hour`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BumpOutcome {
    pub text: String,
    pub changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_time_display: Option<String>,
    /// True when the new hour is smaller than the old one (23 -> 00). The
    /// date is not advanced.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub wrapped: bool,
}

impl BumpOutcome {
    fn unchanged(text: &str) -> Self {
        Self {
            text: text.to_owned(),
            changed: false,
            new_time_display: None,
            wrapped: false,
        }
    }
}

/// Adds one hour (mod 24) to the first `createTime=` field in `text`.
///
/// Only the field's span is rewritten. The date is never advanced, so
/// `23:xx` becomes `00:xx` on the same day. A payload without a
/// recognizable field comes back unchanged with `changed == false`.
pub fn bump_create_time_hour(text: &str) -> BumpOutcome {
    let Some(field) = scan_create_time(text).field() else {
        return BumpOutcome::unchanged(text);
    };

    let new_hour = (field.hour() + 1) % 24;
    let span = field.span();

    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..span.start]);
    out.push_str(&field.render_with_hour(new_hour));
    out.push_str(&text[span.end..]);

    log::debug!(
        target: "qrstamp_business::time_bump",
        "bumped_create_time hour={} new_hour={new_hour}",
        field.hour(),
    );

    BumpOutcome {
        text: out,
        changed: true,
        new_time_display: Some(field.display_with_hour(new_hour)),
        wrapped: new_hour < field.hour(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bump_simple() {
        let outcome = bump_create_time_hour("id=7&createTime=2024-01-01 05:00:00&sig=x");
        assert!(outcome.changed);
        assert_eq!(outcome.text, "id=7&createTime=2024-01-01 06:00:00&sig=x");
        assert_eq!(outcome.new_time_display.as_deref(), Some("2024-01-01 06:00:00"));
        assert!(!outcome.wrapped);
    }

    #[test]
    fn test_bump_twice() {
        let once = bump_create_time_hour("createTime=2024-01-01 05:00:00");
        let twice = bump_create_time_hour(&once.text);
        assert_eq!(once.text, "createTime=2024-01-01 06:00:00");
        assert_eq!(twice.text, "createTime=2024-01-01 07:00:00");
    }

    #[test]
    fn test_bump_wraps_without_date_rollover() {
        let outcome = bump_create_time_hour("createTime=2024-01-01 23:00:00");
        assert_eq!(outcome.text, "createTime=2024-01-01 00:00:00");
        assert!(outcome.wrapped);
    }

    #[test]
    fn test_bump_keeps_t_separator_but_displays_space() {
        let outcome = bump_create_time_hour("https://x.io/?createTime=2024-06-30T09:15:42");
        assert_eq!(outcome.text, "https://x.io/?createTime=2024-06-30T10:15:42");
        assert_eq!(outcome.new_time_display.as_deref(), Some("2024-06-30 10:15:42"));
    }

    #[test]
    fn test_no_field_is_unchanged() {
        let text = "no such field here";
        let outcome = bump_create_time_hour(text);
        assert!(!outcome.changed);
        assert_eq!(outcome.text, text);
        assert!(outcome.new_time_display.is_none());
        assert_eq!(scan_create_time(text), CreateTimeScan::Absent);
    }

    #[test]
    fn test_shape_deviations_do_not_match() {
        for text in [
            "createTime=2024-01-01 100:00:00",
            "createTime=2024-01-01 10:00",
            "createTime=2024/01/01 10:00:00",
            "createTime=2024-01-01_10:00:00",
            "createTime=2024-01-01%2010:00:00",
            "createTime=24-01-01 10:00:00",
            "createTime=",
        ] {
            assert_eq!(scan_create_time(text), CreateTimeScan::Unrecognized, "{text}");
            assert!(!bump_create_time_hour(text).changed, "{text}");
        }
    }

    #[test]
    fn test_leftmost_wellformed_occurrence_wins() {
        let text = "createTime=oops&createTime=2024-01-01 10:00:00&createTime=2024-01-01 20:00:00";
        let outcome = bump_create_time_hour(text);
        assert_eq!(
            outcome.text,
            "createTime=oops&createTime=2024-01-01 11:00:00&createTime=2024-01-01 20:00:00"
        );
    }

    #[test]
    fn test_trailing_text_after_seconds_is_kept() {
        let outcome = bump_create_time_hour("createTime=2024-01-01 10:00:001");
        assert_eq!(outcome.text, "createTime=2024-01-01 11:00:001");
    }

    #[test]
    fn test_out_of_range_hour_wraps() {
        let outcome = bump_create_time_hour("createTime=2024-01-01 25:00:00");
        assert_eq!(outcome.text, "createTime=2024-01-01 02:00:00");
    }

    #[test]
    fn test_non_ascii_surroundings() {
        let outcome = bump_create_time_hour("名前=太郎&createTime=2024-01-01 08:30:00&備考=é");
        assert_eq!(outcome.text, "名前=太郎&createTime=2024-01-01 09:30:00&備考=é");
    }

    #[test]
    fn test_non_ascii_in_value_position_does_not_match() {
        assert_eq!(
            scan_create_time("createTime=２０２４-01-01 10:00:00"),
            CreateTimeScan::Unrecognized
        );
    }

    #[test]
    fn test_field_accessors() {
        let field = scan_create_time("a=1&createTime=2024-01-01T23:59:58")
            .field()
            .expect("field present");
        assert_eq!(field.date(), "2024-01-01");
        assert_eq!(field.separator(), 'T');
        assert_eq!(field.hour(), 23);
        assert_eq!(field.minute_second(), ":59:58");
        assert_eq!(field.span(), 4..34);
    }
}
