//! Side-by-side comparison of the parameters of several records.
//!
//! The report has two parts:
//! - one [`ComparisonRow`] per parameter key seen in any record, with the
//!   values aligned to record order and a uniformity flag;
//! - the [`TimeDelta`]s between records that are adjacent once sorted by
//!   their `createTime` instant.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::record::Record;

const MILLIS_PER_MINUTE: i64 = 60_000;
const MILLIS_PER_HOUR: i64 = 3_600_000;

/// One parameter key across all records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonRow {
    pub key: String,
    /// One slot per record, in record order. `None` when the record lacks
    /// the key.
    pub values: Vec<Option<String>>,
    /// Whether every decoded record holds the same value (absence included).
    pub uniform: bool,
}

/// Rounded duration for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "unit", content = "amount", rename_all = "lowercase")]
pub enum DeltaDisplay {
    Hours(i64),
    Minutes(i64),
}

impl DeltaDisplay {
    /// Hours when they round to a nonzero amount, minutes otherwise.
    ///
    /// Both roundings are half-up, so 30 minutes is 1 hour and 150 minutes
    /// is 3 hours.
    pub fn from_millis(millis: i64) -> Self {
        let hours = round_half_up(millis, MILLIS_PER_HOUR);
        if hours != 0 {
            Self::Hours(hours)
        } else {
            Self::Minutes(round_half_up(millis, MILLIS_PER_MINUTE))
        }
    }
}

impl fmt::Display for DeltaDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hours(1) => write!(f, "1 hour"),
            Self::Hours(n) => write!(f, "{n} hours"),
            Self::Minutes(1) => write!(f, "1 minute"),
            Self::Minutes(n) => write!(f, "{n} minutes"),
        }
    }
}

fn round_half_up(value: i64, unit: i64) -> i64 {
    (value + unit / 2).div_euclid(unit)
}

/// Elapsed time between two records adjacent in `createTime` order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeDelta {
    /// Index of the earlier record.
    pub from: usize,
    /// Index of the later record.
    pub to: usize,
    pub millis: i64,
    pub display: DeltaDisplay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportStatus {
    Ready,
    /// Fewer than two records decoded successfully.
    InsufficientData { decoded: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonReport {
    pub status: ReportStatus,
    pub rows: Vec<ComparisonRow>,
    pub deltas: Vec<TimeDelta>,
}

impl ComparisonReport {
    fn insufficient(decoded: usize) -> Self {
        Self {
            status: ReportStatus::InsufficientData { decoded },
            rows: Vec::new(),
            deltas: Vec::new(),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == ReportStatus::Ready
    }

    /// Rows whose values differ between decoded records.
    pub fn differing_rows(&self) -> impl Iterator<Item = &ComparisonRow> {
        self.rows.iter().filter(|row| !row.uniform)
    }
}

/// Builds the comparison report for `records`.
///
/// Needs at least two decoded records; otherwise the report is empty and
/// marked [`ReportStatus::InsufficientData`].
pub fn build_comparison(records: &[Record]) -> ComparisonReport {
    let decoded = records.iter().filter(|r| r.is_decoded()).count();
    if decoded < 2 {
        log::debug!(
            target: "qrstamp_business::comparison",
            "insufficient_records total={} decoded={decoded}",
            records.len(),
        );
        return ComparisonReport::insufficient(decoded);
    }

    ComparisonReport {
        status: ReportStatus::Ready,
        rows: comparison_rows(records),
        deltas: time_deltas(records),
    }
}

fn comparison_rows(records: &[Record]) -> Vec<ComparisonRow> {
    let keys: BTreeSet<&str> = records.iter().flat_map(|r| r.params().keys()).collect();

    keys.into_iter()
        .map(|key| {
            let values: Vec<Option<String>> = records
                .iter()
                .map(|r| r.params().get(key).map(str::to_owned))
                .collect();

            let mut decoded_values = records
                .iter()
                .zip(&values)
                .filter(|(r, _)| r.is_decoded())
                .map(|(_, v)| v);
            let uniform = match decoded_values.next() {
                Some(first) => decoded_values.all(|v| v == first),
                None => true,
            };

            ComparisonRow {
                key: key.to_owned(),
                values,
                uniform,
            }
        })
        .collect()
}

/// Deltas between consecutive valid `createTime` instants.
///
/// The sort is stable, so records with equal instants keep their input order.
pub fn time_deltas(records: &[Record]) -> Vec<TimeDelta> {
    let mut timed: Vec<(usize, i64)> = records
        .iter()
        .enumerate()
        .filter_map(|(i, r)| r.instant().map(|instant| (i, instant)))
        .collect();
    timed.sort_by_key(|&(_, instant)| instant);

    timed
        .windows(2)
        .map(|pair| {
            let (from, start) = pair[0];
            let (to, end) = pair[1];
            let millis = end - start;
            TimeDelta {
                from,
                to,
                millis,
                display: DeltaDisplay::from_millis(millis),
            }
        })
        .collect()
}
