use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use qrstamp_business::{ParsedTime, Record};
use qrstamp_input::{PayloadReader, RqrrDecoder, analyze_paths};
use tracing::instrument;

/// Fallback file name for QR codes generated from text input.
pub const DEFAULT_OUTPUT: &str = "qrcode.png";

pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{truncated}...")
    } else {
        s.to_owned()
    }
}

/// Records for image paths, or for stdin payloads (one per line).
#[instrument(skip_all, name = "collect_records", fields(images = images.len(), stdin = stdin))]
pub async fn collect_records<R: PayloadReader>(
    images: Vec<PathBuf>,
    stdin: bool,
    reader: &mut R,
) -> Result<Vec<Record>> {
    if stdin {
        let payloads = reader
            .read_payload_lines()
            .context("Failed to read payloads from stdin")?;
        Ok(records_from_payloads(&payloads))
    } else {
        Ok(analyze_paths(Arc::new(RqrrDecoder), images).await)
    }
}

pub fn records_from_payloads(payloads: &[String]) -> Vec<Record> {
    payloads
        .iter()
        .enumerate()
        .map(|(i, payload)| Record::decoded(format!("stdin:{}", i + 1), payload.as_str()))
        .collect()
}

/// `<dir>/<stem>_bumped.png` for an image input.
pub fn bumped_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "qrcode".to_owned());
    input.with_file_name(format!("{stem}_bumped.png"))
}

/// One-line description of a `createTime` interpretation.
pub fn describe_time(time: &ParsedTime) -> String {
    match time.formatted() {
        Some(formatted) => formatted.to_owned(),
        None => format!("{} (unrecognized)", time.original()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qrstamp_input::MockStdinReader;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("short", 10), "short");
        assert_eq!(truncate_str("abcdefghijkl", 8), "abcde...");
        assert_eq!(truncate_str("日本語の長いテキスト", 5), "日本...");
    }

    #[test]
    fn test_bumped_output_path() {
        assert_eq!(
            bumped_output_path(Path::new("/tmp/shots/pass.jpg")),
            PathBuf::from("/tmp/shots/pass_bumped.png")
        );
        assert_eq!(
            bumped_output_path(Path::new("pass.png")),
            PathBuf::from("pass_bumped.png")
        );
    }

    #[test]
    fn test_describe_time() {
        assert_eq!(describe_time(&ParsedTime::invalid("soon")), "soon (unrecognized)");
        assert_eq!(
            describe_time(&ParsedTime::valid("x", 0, "1970-01-01 00:00:00".to_owned())),
            "1970-01-01 00:00:00"
        );
    }

    #[tokio::test]
    async fn test_collect_records_from_stdin() {
        let mut reader = MockStdinReader::new("a=1\nnot a payload\n\nb=2\n");
        let records = collect_records(Vec::new(), true, &mut reader)
            .await
            .expect("reads stdin");
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].source(), "stdin:1");
        assert!(records[1].params().is_empty());
        assert_eq!(records[2].params().get("b"), Some("2"));
    }
}
