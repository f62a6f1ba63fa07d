// Canis Testdata - CSV output
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Dataset serialization in the collar export format.

use canis::Sample;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Column headers, in order.
pub const CSV_HEADERS: [&str; 4] = [
    "Time",
    "Heart Rate (bpm)",
    "Body Temperature (°C)",
    "Barking Volume (dB)",
];

/// Errors that can occur during dataset output.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV writing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Write samples as CSV to any writer.
pub fn write_csv<W: Write>(samples: &[Sample], writer: W) -> Result<(), DatasetError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CSV_HEADERS)?;
    for s in samples {
        csv.write_record([
            s.time.format("%H:%M").to_string(),
            s.heart_rate.to_string(),
            format!("{:.1}", s.body_temperature),
            s.barking_volume.to_string(),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

/// Write samples as CSV to a file.
pub fn to_csv_file(samples: &[Sample], path: impl AsRef<Path>) -> Result<(), DatasetError> {
    let file = std::fs::File::create(path)?;
    write_csv(samples, file)
}
