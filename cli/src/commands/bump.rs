//! Add one hour to `createTime` and regenerate the QR code.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, anyhow};
use qrstamp_business::{BumpOutcome, CreateTimeScan, bump_create_time_hour, scan_create_time};
use qrstamp_input::{EncodeOptions, PayloadReader, PngQrEncoder, QrEncoder, RqrrDecoder, decode_file};
use serde::Serialize;
use tracing::{info, instrument};

use crate::output::Output;
use crate::utils::{DEFAULT_OUTPUT, bumped_output_path};

/// Where the payload comes from.
pub enum BumpSource {
    Image(PathBuf),
    Text(String),
    Stdin,
}

#[derive(Serialize)]
struct BumpReport<'a> {
    original: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    previous_time: Option<String>,
    #[serde(flatten)]
    outcome: &'a BumpOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<&'a Path>,
}

#[instrument(skip_all, name = "bump")]
pub fn run_bump<R: PayloadReader>(
    source: BumpSource,
    reader: &mut R,
    output: Option<PathBuf>,
    options: &EncodeOptions,
    json: bool,
) -> Result<()> {
    let out = Output::new();

    let (text, default_output) = match source {
        BumpSource::Image(path) => {
            let text = decode_file(&RqrrDecoder, &path)
                .with_context(|| format!("Failed to decode {}", path.display()))?
                .ok_or_else(|| anyhow!("No QR code found in {}", path.display()))?;
            (text, bumped_output_path(&path))
        }
        BumpSource::Text(text) => (text, PathBuf::from(DEFAULT_OUTPUT)),
        BumpSource::Stdin => {
            let text = reader
                .read_payload()
                .context("Failed to read payload from stdin")?
                .ok_or_else(|| anyhow!("No payload on stdin"))?;
            (text, PathBuf::from(DEFAULT_OUTPUT))
        }
    };

    let scan = scan_create_time(&text);
    let previous_time = scan.field().map(|f| f.display_with_hour(f.hour()));
    let outcome = bump_create_time_hour(&text);

    let written = if outcome.changed {
        let path = output.unwrap_or(default_output);
        let png = PngQrEncoder
            .encode(&outcome.text, options)
            .context("Failed to generate QR code")?;
        fs::write(&path, png).with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), "wrote regenerated QR code");
        Some(path)
    } else {
        None
    };

    if json {
        return out.json(&BumpReport {
            original: &text,
            previous_time,
            outcome: &outcome,
            output: written.as_deref(),
        });
    }

    out.labeled_indent("Payload", &text, 0);
    match (scan, &outcome.new_time_display, &written) {
        (CreateTimeScan::Found(_), Some(new_time), Some(path)) => {
            out.change("createTime", previous_time.unwrap_or_default(), new_time);
            if outcome.wrapped {
                out.warning("Hour wrapped past midnight; the date was not advanced");
            }
            out.labeled_indent("New payload", &outcome.text, 0);
            out.success(format!("QR code written to {}", path.display()));
        }
        (CreateTimeScan::Unrecognized, ..) => {
            out.warning("createTime is present but not in YYYY-MM-DD HH:MM:SS form; nothing changed");
        }
        _ => out.warning("No createTime field found; nothing changed"),
    }
    Ok(())
}
