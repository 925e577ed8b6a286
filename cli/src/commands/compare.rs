//! Compare the parameters of several QR codes.

use std::path::PathBuf;

use anyhow::Result;
use qrstamp_business::{ComparisonReport, Record, ReportStatus, TimeDelta, build_comparison};
use qrstamp_input::PayloadReader;
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing::instrument;

use crate::output::Output;
use crate::utils::{collect_records, describe_time, truncate_str};

const MISSING: &str = "-";
const CELL_WIDTH: usize = 24;

#[derive(Serialize)]
struct CompareOutput<'a> {
    records: &'a [Record],
    report: &'a ComparisonReport,
}

#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "createTime")]
    create_time: String,
}

#[instrument(skip_all, name = "compare", fields(images = images.len(), stdin = stdin))]
pub async fn run_compare<R: PayloadReader>(
    images: Vec<PathBuf>,
    stdin: bool,
    reader: &mut R,
    json: bool,
) -> Result<()> {
    let out = Output::new();
    let records = collect_records(images, stdin, reader).await?;
    let report = build_comparison(&records);

    if json {
        return out.json(&CompareOutput {
            records: &records,
            report: &report,
        });
    }

    out.header(format!("Analyzed {} QR code(s)", records.len()));
    out.print(records_table(&records));

    if let ReportStatus::InsufficientData { decoded } = report.status {
        out.warning(format!(
            "Need at least 2 decoded QR codes to compare, got {decoded}"
        ));
        return Ok(());
    }

    out.newline();
    out.header("Parameters");
    out.print(parameters_table(&records, &report));
    out.differing_keys(report.differing_rows().map(|row| row.key.as_str()));

    out.newline();
    out.header("Time differences");
    if report.deltas.is_empty() {
        out.dim("Fewer than 2 valid createTime values");
    }
    for delta in &report.deltas {
        out.print(describe_delta(&records, delta));
    }
    Ok(())
}

fn records_table(records: &[Record]) -> Table {
    let rows: Vec<RecordRow> = records
        .iter()
        .enumerate()
        .map(|(i, record)| RecordRow {
            index: i + 1,
            source: truncate_str(record.source(), CELL_WIDTH),
            status: record
                .error()
                .map_or_else(|| "ok".to_owned(), |e| truncate_str(e, 40)),
            create_time: record
                .time()
                .map(describe_time)
                .unwrap_or_else(|| MISSING.to_owned()),
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::rounded());
    table
}

/// Key column, one column per record, and a `*` marker on differing rows.
fn parameters_table(records: &[Record], report: &ComparisonReport) -> Table {
    let mut builder = Builder::default();

    let mut header = vec![String::new(), "Parameter".to_owned()];
    header.extend((1..=records.len()).map(|i| format!("#{i}")));
    builder.push_record(header);

    for row in &report.rows {
        let marker = if row.uniform { "" } else { "*" };
        let mut cells = vec![marker.to_owned(), row.key.clone()];
        cells.extend(row.values.iter().map(|value| {
            value
                .as_deref()
                .map_or_else(|| MISSING.to_owned(), |v| truncate_str(v, CELL_WIDTH))
        }));
        builder.push_record(cells);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table
}

pub fn describe_delta(records: &[Record], delta: &TimeDelta) -> String {
    let minutes = delta.millis as f64 / 60_000.0;
    format!(
        "#{} {} → #{} {}: {} ({minutes:.1} min)",
        delta.from + 1,
        records[delta.from].source(),
        delta.to + 1,
        records[delta.to].source(),
        delta.display,
    )
}
