//! Decode QR codes and show their parameters.

use std::path::PathBuf;

use anyhow::{Result, bail};
use qrstamp_business::Record;
use qrstamp_input::PayloadReader;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing::instrument;

use crate::output::Output;
use crate::utils::{collect_records, describe_time, truncate_str};

#[derive(Tabled)]
struct ParamRow {
    #[tabled(rename = "Parameter")]
    key: String,
    #[tabled(rename = "Value")]
    value: String,
}

#[instrument(skip_all, name = "read", fields(images = images.len(), stdin = stdin))]
pub async fn run_read<R: PayloadReader>(
    images: Vec<PathBuf>,
    stdin: bool,
    reader: &mut R,
    json: bool,
) -> Result<()> {
    let out = Output::new();
    let records = collect_records(images, stdin, reader).await?;

    if json {
        out.json(&records)?;
    } else {
        for (index, record) in records.iter().enumerate() {
            print_record(&out, index, record);
        }
    }

    if !records.is_empty() && records.iter().all(|r| !r.is_decoded()) {
        bail!("No QR code could be decoded");
    }
    Ok(())
}

fn print_record(out: &Output, index: usize, record: &Record) {
    out.record_header(index, record.source());

    if let Some(error) = record.error() {
        out.error(error);
        return;
    }

    if let Some(text) = record.text() {
        out.labeled_indent("Text", text, 2);
    }

    if record.params().is_empty() {
        out.dim("  No parameters");
    } else {
        let rows: Vec<ParamRow> = record
            .params()
            .iter()
            .map(|(key, value)| ParamRow {
                key: key.to_owned(),
                value: truncate_str(value, 60),
            })
            .collect();
        let mut table = Table::new(&rows);
        table.with(Style::rounded());
        out.print(table);
    }

    if let Some(time) = record.time() {
        if time.is_valid() {
            out.labeled_indent("createTime", describe_time(time), 2);
        } else {
            out.warning(format!("createTime {}", describe_time(time)));
        }
    }
}
