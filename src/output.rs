//! Output formatting and persistence for dashboard views.
//!
//! Supports terminal tables, CSV and JSON, both to a writer and to files.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::analyzers::types::{BucketAggregate, LongRow, SelectionView};
use crate::chart::ChartSpec;
use csv::WriterBuilder;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const NO_DATA_MESSAGE: &str = "No data for the selected stations.";

/// How a view is printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
}

#[derive(Serialize)]
struct ViewDocument<'a> {
    aggregate: &'a [BucketAggregate],
    long: &'a [LongRow],
}

/// Logs a view using Rust's debug pretty-print format.
pub fn print_pretty(view: &SelectionView) {
    debug!("{:#?}", view);
}

/// Writes the selectable stop names, one per line.
pub fn render_stations<W: Write>(out: &mut W, names: &[String]) -> Result<()> {
    for name in names {
        writeln!(out, "{name}")?;
    }
    Ok(())
}

/// Writes a view in `format`. An empty view prints the no-data message in every format.
pub fn render_view<W: Write>(out: &mut W, view: &SelectionView, format: OutputFormat) -> Result<()> {
    let SelectionView::HasData { aggregate, long } = view else {
        writeln!(out, "{NO_DATA_MESSAGE}")?;
        return Ok(());
    };

    match format {
        OutputFormat::Table => {
            writeln!(out, "Aggregate results:")?;
            write_table(
                out,
                &["bucket_time", "distinct_bus_id_count", "warning_bus_id_count"],
                aggregate.iter().map(|r| {
                    vec![
                        r.bucket_time.clone(),
                        r.distinct_bus_id_count.to_string(),
                        r.warning_bus_id_count.to_string(),
                    ]
                }),
            )?;
            writeln!(out)?;
            writeln!(out, "Chart series:")?;
            write_table(
                out,
                &["bucket_time", "metric_label", "count"],
                long.iter().map(|r| {
                    vec![
                        r.bucket_time.clone(),
                        r.metric_label.to_string(),
                        r.count.to_string(),
                    ]
                }),
            )?;
        }
        OutputFormat::Csv => {
            write_csv_to(&mut *out, aggregate)?;
            writeln!(out)?;
            write_csv_to(&mut *out, long)?;
        }
        OutputFormat::Json => {
            let document = ViewDocument { aggregate, long };
            writeln!(out, "{}", serde_json::to_string_pretty(&document)?)?;
        }
    }

    Ok(())
}

/// Writes rows as a left-aligned, space-padded table.
fn write_table<W: Write>(
    out: &mut W,
    headers: &[&str],
    rows: impl Iterator<Item = Vec<String>>,
) -> Result<()> {
    let rows: Vec<Vec<String>> = rows.collect();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    writeln!(out, "{}", line(headers.to_vec()))?;
    for row in &rows {
        writeln!(out, "{}", line(row.iter().map(String::as_str).collect()))?;
    }

    Ok(())
}

fn write_csv_to<W: Write, T: Serialize>(out: W, rows: &[T]) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(out);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes `rows` to a CSV file at `path`, replacing any existing file.
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    debug!(path = %path.display(), rows = rows.len(), "Writing CSV");
    write_csv_to(fs::File::create(path)?, rows)
}

/// Writes `value` as pretty-printed JSON to `path`.
pub fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    debug!(path = %path.display(), "Writing JSON");
    fs::write(path, serde_json::to_vec_pretty(value)?)?;
    Ok(())
}

/// Writes `aggregate.csv`, `long.csv` and `chart.json` for a view into `dir`.
///
/// Returns the written paths; an empty view writes nothing.
pub fn export_view(dir: &Path, view: &SelectionView) -> Result<Vec<PathBuf>> {
    let SelectionView::HasData { aggregate, long } = view else {
        info!(dir = %dir.display(), "Empty view, nothing exported");
        return Ok(Vec::new());
    };

    fs::create_dir_all(dir)?;

    let aggregate_path = dir.join("aggregate.csv");
    let long_path = dir.join("long.csv");
    let chart_path = dir.join("chart.json");

    write_csv(&aggregate_path, aggregate)?;
    write_csv(&long_path, long)?;
    write_json(&chart_path, &ChartSpec::from_long(long))?;

    info!(dir = %dir.display(), buckets = aggregate.len(), "View exported");
    Ok(vec![aggregate_path, long_path, chart_path])
}
