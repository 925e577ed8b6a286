//! End-to-end checks over realistic QR payloads using the public API.

use chrono::Utc;
use qrstamp_business::{
    CREATE_TIME_KEY, ComparisonReport, DeltaDisplay, Record, ReportStatus, build_comparison,
    bump_create_time_hour, extract, interpret_time_in,
};

const PASS_URL: &str = "https://gate.example.com/pass?uid=1001&room=A%2D12&createTime=2024-05-20%2009:45:10&sig=Zm9v";
const BARE_PAYLOAD: &str = "uid=1001&room=A-12&createTime=2024-05-20 09:45:10&sig=Zm9v";

fn utc_record(source: &str, text: &str) -> Record {
    Record::decoded_in(source, text, &Utc)
}

/// Tests for bump followed by extraction
mod bump_then_extract_tests {
    use super::*;

    #[test]
    fn test_bump_preserves_other_params() {
        let before = extract(BARE_PAYLOAD);
        let outcome = bump_create_time_hour(BARE_PAYLOAD);
        assert!(outcome.changed);

        let after = extract(&outcome.text);
        assert_eq!(after.len(), before.len());
        for (key, value) in &before {
            if key != CREATE_TIME_KEY {
                assert_eq!(after.get(key), Some(value), "param {key} changed");
            }
        }
        assert_eq!(after.get(CREATE_TIME_KEY), Some("2024-05-20 10:45:10"));
    }

    #[test]
    fn test_percent_encoded_url_field_is_not_bumped() {
        // The separator is `%20`, which the field grammar does not accept.
        let outcome = bump_create_time_hour(PASS_URL);
        assert!(!outcome.changed);
        assert_eq!(outcome.text, PASS_URL);
    }

    #[test]
    fn test_bumped_time_is_one_hour_later() {
        let outcome = bump_create_time_hour(BARE_PAYLOAD);
        let before = interpret_time_in("2024-05-20 09:45:10", &Utc);
        let new_time = outcome.new_time_display.as_deref().unwrap_or_default();
        let after = interpret_time_in(new_time, &Utc);
        let diff = after.instant().unwrap_or_default() - before.instant().unwrap_or_default();
        assert_eq!(diff, 3_600_000);
    }
}

/// Tests for batch comparison
mod comparison_tests {
    use super::*;

    fn batch() -> Vec<Record> {
        vec![
            utc_record("first.png", PASS_URL),
            Record::failed("blurry.jpg", "no QR code found"),
            utc_record("second.png", &bump_create_time_hour(BARE_PAYLOAD).text),
        ]
    }

    #[test]
    fn test_report_highlights_only_changed_fields() {
        let report = build_comparison(&batch());
        assert_eq!(report.status, ReportStatus::Ready);

        let differing: Vec<&str> = report.differing_rows().map(|r| r.key.as_str()).collect();
        assert_eq!(differing, vec![CREATE_TIME_KEY]);
        assert!(report.rows.iter().all(|r| r.values.len() == 3));
        assert!(report.rows.iter().all(|r| r.values[1].is_none()));
    }

    #[test]
    fn test_report_delta_between_original_and_bumped() {
        let report = build_comparison(&batch());
        assert_eq!(report.deltas.len(), 1);
        assert_eq!((report.deltas[0].from, report.deltas[0].to), (0, 2));
        assert_eq!(report.deltas[0].display, DeltaDisplay::Hours(1));
    }

    #[test]
    fn test_report_serializes_to_json() {
        let report: ComparisonReport = build_comparison(&batch());
        let json = serde_json::to_value(&report).expect("report serializes");
        assert_eq!(json["status"]["kind"], "ready");
        assert_eq!(json["deltas"][0]["display"]["unit"], "hours");
        assert_eq!(json["deltas"][0]["display"]["amount"], 1);
        assert!(json["rows"][0]["values"][1].is_null());
    }

    #[test]
    fn test_insufficient_report_serializes_decoded_count() {
        let report = build_comparison(&[Record::failed("a.png", "unreadable")]);
        let json = serde_json::to_value(&report).expect("report serializes");
        assert_eq!(json["status"]["kind"], "insufficient_data");
        assert_eq!(json["status"]["decoded"], 0);
    }
}
