// Canis - Fuzzy condition classifier for canine vital signs
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Vital-sign samples.

use crate::engine::Inputs;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Input variable name for body temperature (°C).
pub const BODY_TEMPERATURE: &str = "body_temperature";
/// Input variable name for heart rate (bpm).
pub const HEART_RATE: &str = "heart_rate";
/// Input variable name for barking volume (dB).
pub const BARKING_VOLUME: &str = "barking_volume";
/// Output variable name.
pub const CONDITION: &str = "condition";

/// One timestamped reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Time of day.
    pub time: NaiveTime,
    /// Heart rate in bpm, nominally [0, 190].
    pub heart_rate: f64,
    /// Body temperature in °C, nominally [34, 44].
    pub body_temperature: f64,
    /// Barking volume in dB, nominally [0, 113].
    pub barking_volume: f64,
}

impl Sample {
    pub fn new(time: NaiveTime, heart_rate: f64, body_temperature: f64, barking_volume: f64) -> Self {
        Self {
            time,
            heart_rate,
            body_temperature,
            barking_volume,
        }
    }

    /// Inputs keyed by variable name. All readings are assigned; the rule
    /// base ignores those it does not reference.
    pub fn inputs(&self) -> Inputs {
        [
            (BODY_TEMPERATURE.to_string(), self.body_temperature),
            (HEART_RATE.to_string(), self.heart_rate),
            (BARKING_VOLUME.to_string(), self.barking_volume),
        ]
        .into_iter()
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inputs() {
        let time = NaiveTime::from_hms_opt(8, 30, 0).unwrap();
        let sample = Sample::new(time, 95.0, 38.75, 40.0);
        let inputs = sample.inputs();
        assert_eq!(inputs.len(), 3);
        assert_eq!(inputs[BODY_TEMPERATURE], 38.75);
        assert_eq!(inputs[HEART_RATE], 95.0);
        assert_eq!(inputs[BARKING_VOLUME], 40.0);
    }
}
