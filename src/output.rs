//! Writing collected records to disk.

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use csv::{QuoteStyle, Terminator};
use std::fmt::Display;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::types::{FacilityRecord, OutputFormat};

const CSV_HEADERS: [&str; 14] = [
    "Name",
    "Address",
    "Latitude",
    "Longitude",
    "Rating",
    "Total Reviews",
    "Phone",
    "Website",
    "Place ID",
    "Province",
    "Regency",
    "District",
    "Village",
    "Scraped At",
];

/// `schools_<timestamp>.<ext>` with every non-alphanumeric character of the
/// ISO-8601 timestamp replaced by `-`
pub fn default_file_name(now: DateTime<Utc>, format: OutputFormat) -> String {
    let stamp: String = now
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    format!("schools_{}.{}", stamp, format.extension())
}

/// Where to write: `output` as given, or a timestamped file in `data_dir`
pub fn resolve_output_path(
    output: Option<&Path>,
    data_dir: &Path,
    format: OutputFormat,
    now: DateTime<Utc>,
) -> PathBuf {
    match output {
        Some(path) => path.to_path_buf(),
        None => data_dir.join(default_file_name(now, format)),
    }
}

/// Render records as a pretty-printed JSON array
pub fn to_json(records: &[FacilityRecord]) -> Result<String> {
    serde_json::to_string_pretty(records).context("Failed to serialize records")
}

fn optional<T: Display>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

fn csv_row(r: &FacilityRecord) -> [String; 14] {
    [
        r.name.clone(),
        r.address.clone(),
        r.coordinates.lat.to_string(),
        r.coordinates.lng.to_string(),
        optional(&r.rating),
        optional(&r.review_count),
        optional(&r.phone),
        optional(&r.website),
        r.place_id.clone(),
        r.province.clone(),
        r.regency.clone(),
        optional(&r.district),
        optional(&r.village),
        r.captured_at.to_rfc3339_opts(SecondsFormat::Millis, true),
    ]
}

/// Write records as CSV to `out`, every cell quoted
pub fn write_csv<W: io::Write>(out: W, records: &[FacilityRecord]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(out);

    writer.write_record(CSV_HEADERS)?;
    for record in records {
        writer.write_record(csv_row(record))?;
    }
    writer.flush()?;
    Ok(())
}

/// Render records as CSV, every cell quoted
pub fn to_csv(records: &[FacilityRecord]) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(&mut buf, records)?;
    String::from_utf8(buf).context("CSV output is not valid UTF-8")
}

/// Write `records` to `path`, creating parent directories as needed
pub fn write_records(path: &Path, records: &[FacilityRecord], format: OutputFormat) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    match format {
        OutputFormat::Json => fs::write(path, to_json(records)?)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        OutputFormat::Csv => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_csv(file, records)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
    }

    info!("Saved {} record(s) to {}", records.len(), path.display());
    Ok(())
}

#[cfg(test)]
#[path = "output_test.rs"]
mod output_test;
