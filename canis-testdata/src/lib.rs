// Canis Testdata - Synthetic vital-sign datasets
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! # Canis Testdata
//!
//! Synthetic day-long vital-sign datasets for canis.
//!
//! Three health profiles are provided:
//!
//! - **Fine**: normal temperature and resting heart rate
//! - **Sick**: fever with an elevated heart rate
//! - **Critical**: high fever and tachycardia
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use canis_testdata::{generate, to_csv_file, GeneratorConfig, Profile};
//!
//! // One reading every 15 minutes for a day
//! let config = GeneratorConfig::new()
//!     .with_interval_minutes(15)
//!     .with_seed(42);
//!
//! let samples = generate(Profile::Sick, &config);
//! to_csv_file(&samples, "sick_day.csv").unwrap();
//! ```

pub mod dataset;
pub mod generator;

// Re-exports for convenience
pub use dataset::{to_csv_file, write_csv, DatasetError, CSV_HEADERS};
pub use generator::{generate, GeneratorConfig, Profile, ProfileVitals, VitalSpec};
