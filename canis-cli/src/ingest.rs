// Canis CLI - CSV ingestion
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Reads collar exports into [`Sample`]s.
//!
//! Columns are found by header name, not position. Headers are compared
//! after dropping everything but ASCII letters and digits, so
//! `Body Temperature (°C)`, `body_temperature` and a mis-encoded degree sign
//! all match.

use canis::Sample;
use chrono::NaiveTime;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Ingestion errors.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing column: {0}")]
    MissingColumn(&'static str),

    #[error("Invalid time '{value}' on line {line}")]
    InvalidTimestamp { line: u64, value: String },

    #[error("Invalid {column} '{value}' on line {line}")]
    InvalidNumber {
        line: u64,
        column: &'static str,
        value: String,
    },

    #[error("Empty dataset")]
    EmptyDataset,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy)]
enum Column {
    Time,
    HeartRate,
    BodyTemperature,
    BarkingVolume,
}

impl Column {
    const ALL: [Column; 4] = [
        Column::Time,
        Column::HeartRate,
        Column::BodyTemperature,
        Column::BarkingVolume,
    ];

    fn name(self) -> &'static str {
        match self {
            Column::Time => "time",
            Column::HeartRate => "heart rate",
            Column::BodyTemperature => "body temperature",
            Column::BarkingVolume => "barking volume",
        }
    }

    /// Normalized header prefix.
    fn key(self) -> &'static str {
        match self {
            Column::Time => "time",
            Column::HeartRate => "heartrate",
            Column::BodyTemperature => "bodytemperature",
            Column::BarkingVolume => "barkingvolume",
        }
    }
}

fn normalize_header(raw: &[u8]) -> String {
    raw.iter()
        .filter(|b| b.is_ascii_alphanumeric())
        .map(|b| b.to_ascii_lowercase() as char)
        .collect()
}

fn parse_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok()
}

fn field(record: &csv::ByteRecord, index: usize) -> String {
    record
        .get(index)
        .map(|b| String::from_utf8_lossy(b).trim().to_string())
        .unwrap_or_default()
}

/// Parse samples from CSV text.
pub fn read_samples<R: Read>(reader: R) -> Result<Vec<Sample>, IngestError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers: Vec<String> = reader.byte_headers()?.iter().map(normalize_header).collect();
    let mut indices = [0usize; 4];
    for (slot, column) in indices.iter_mut().zip(Column::ALL) {
        *slot = headers
            .iter()
            .position(|h| h.starts_with(column.key()))
            .ok_or(IngestError::MissingColumn(column.name()))?;
    }
    let [time_idx, hr_idx, temp_idx, bark_idx] = indices;

    let mut samples = Vec::new();
    for result in reader.byte_records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        // skip blank trailing lines
        if record.iter().all(|f| f.iter().all(u8::is_ascii_whitespace)) {
            continue;
        }

        let raw_time = field(&record, time_idx);
        let time = parse_time(&raw_time).ok_or(IngestError::InvalidTimestamp {
            line,
            value: raw_time.clone(),
        })?;

        // f64::from_str also takes "NaN" and "inf", which are not readings
        let number = |index: usize, column: Column| -> Result<f64, IngestError> {
            let raw = field(&record, index);
            match raw.parse::<f64>() {
                Ok(value) if value.is_finite() => Ok(value),
                _ => Err(IngestError::InvalidNumber {
                    line,
                    column: column.name(),
                    value: raw,
                }),
            }
        };

        samples.push(Sample::new(
            time,
            number(hr_idx, Column::HeartRate)?,
            number(temp_idx, Column::BodyTemperature)?,
            number(bark_idx, Column::BarkingVolume)?,
        ));
    }

    if samples.is_empty() {
        return Err(IngestError::EmptyDataset);
    }
    debug!("Ingested {} samples", samples.len());
    Ok(samples)
}

/// Load samples from a CSV file.
pub fn load_samples(path: &Path) -> Result<Vec<Sample>, IngestError> {
    if !path.exists() {
        return Err(IngestError::FileNotFound(path.display().to_string()));
    }
    let file = std::fs::File::open(path)?;
    read_samples(file)
}
