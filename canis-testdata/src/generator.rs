// Canis Testdata - Day generator
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Core dataset generation logic.
//!
//! Each vital follows a slow daily sine around its profile mean plus
//! Gaussian noise, then is clamped to the sensor range and rounded to the
//! resolution of a real collar reading.

use canis::Sample;
use chrono::{Duration, NaiveTime, Timelike};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Health profile of the simulated dog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Healthy: normal temperature and resting heart rate.
    Fine,
    /// Fever with an elevated heart rate.
    Sick,
    /// High fever and tachycardia.
    Critical,
}

impl Profile {
    /// All profiles, healthiest first.
    pub const ALL: [Profile; 3] = [Profile::Fine, Profile::Sick, Profile::Critical];

    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Fine => "fine",
            Profile::Sick => "sick",
            Profile::Critical => "critical",
        }
    }

    /// Distribution of each vital for this profile.
    pub fn vitals(&self) -> ProfileVitals {
        match self {
            Profile::Fine => ProfileVitals {
                heart_rate: VitalSpec::new(92.0, 7.0, 6.0, 0.0, 190.0, 0),
                body_temperature: VitalSpec::new(38.6, 0.2, 0.15, 34.0, 44.0, 1),
                barking_volume: VitalSpec::new(35.0, 10.0, 8.0, 0.0, 113.0, 0),
            },
            Profile::Sick => ProfileVitals {
                heart_rate: VitalSpec::new(118.0, 9.0, 6.0, 0.0, 190.0, 0),
                body_temperature: VitalSpec::new(40.2, 0.35, 0.3, 34.0, 44.0, 1),
                barking_volume: VitalSpec::new(55.0, 15.0, 10.0, 0.0, 113.0, 0),
            },
            Profile::Critical => ProfileVitals {
                heart_rate: VitalSpec::new(152.0, 10.0, 6.0, 0.0, 190.0, 0),
                body_temperature: VitalSpec::new(42.2, 0.5, 0.3, 34.0, 44.0, 1),
                barking_volume: VitalSpec::new(80.0, 15.0, 10.0, 0.0, 113.0, 0),
            },
        }
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Distribution of one vital sign.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VitalSpec {
    /// Daily mean.
    pub mean: f64,
    /// Standard deviation of the per-sample noise.
    pub noise_std: f64,
    /// Amplitude of the daily sine.
    pub daily_amplitude: f64,
    /// Minimum valid value.
    pub min: f64,
    /// Maximum valid value.
    pub max: f64,
    /// Decimal places kept.
    pub decimals: u32,
}

impl VitalSpec {
    pub fn new(
        mean: f64,
        noise_std: f64,
        daily_amplitude: f64,
        min: f64,
        max: f64,
        decimals: u32,
    ) -> Self {
        Self {
            mean,
            noise_std,
            daily_amplitude,
            min,
            max,
            decimals,
        }
    }

    fn sample(&self, phase: f64, rng: &mut StdRng) -> f64 {
        let noise: f64 = rng.sample(StandardNormal);
        let value = self.mean + self.daily_amplitude * phase.sin() + self.noise_std * noise;
        let scale = 10f64.powi(self.decimals as i32);
        (value.clamp(self.min, self.max) * scale).round() / scale
    }
}

/// Vital-sign distributions of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileVitals {
    pub heart_rate: VitalSpec,
    pub body_temperature: VitalSpec,
    pub barking_volume: VitalSpec,
}

/// Generator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Time of the first sample.
    pub start: NaiveTime,
    /// Minutes between samples.
    pub interval_minutes: u32,
    /// Number of samples to generate.
    pub num_samples: usize,
    /// Random seed for reproducibility.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            start: NaiveTime::MIN,
            interval_minutes: 60,
            num_samples: 24, // one day
            seed: None,
        }
    }
}

impl GeneratorConfig {
    /// Create a new generator config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the time of the first sample.
    pub fn with_start(mut self, start: NaiveTime) -> Self {
        self.start = start;
        self
    }

    /// Set the interval and resize to cover one full day.
    pub fn with_interval_minutes(mut self, minutes: u32) -> Self {
        self.interval_minutes = minutes.max(1);
        self.num_samples =
            ((MINUTES_PER_DAY + self.interval_minutes - 1) / self.interval_minutes) as usize;
        self
    }

    /// Set number of samples.
    pub fn with_num_samples(mut self, n: usize) -> Self {
        self.num_samples = n;
        self
    }

    /// Set random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Time of the `index`-th sample; wraps past midnight.
    pub fn time_of(&self, index: usize) -> NaiveTime {
        let minutes = (index as u64 * self.interval_minutes as u64) % MINUTES_PER_DAY as u64;
        self.start + Duration::minutes(minutes as i64)
    }
}

/// Generate a day of samples for a profile.
pub fn generate(profile: Profile, config: &GeneratorConfig) -> Vec<Sample> {
    let mut rng = match config.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    let vitals = profile.vitals();

    (0..config.num_samples)
        .map(|i| {
            let time = config.time_of(i);
            let minute = time.num_seconds_from_midnight() / 60;
            let phase = TAU * minute as f64 / MINUTES_PER_DAY as f64;

            let heart_rate = vitals.heart_rate.sample(phase, &mut rng);
            let body_temperature = vitals.body_temperature.sample(phase, &mut rng);
            let barking_volume = vitals.barking_volume.sample(phase, &mut rng);
            Sample::new(time, heart_rate, body_temperature, barking_volume)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = GeneratorConfig::new();
        assert_eq!(config.interval_minutes, 60);
        assert_eq!(config.num_samples, 24);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_interval_covers_day() {
        assert_eq!(GeneratorConfig::new().with_interval_minutes(15).num_samples, 96);
        assert_eq!(GeneratorConfig::new().with_interval_minutes(7).num_samples, 206);
        assert_eq!(GeneratorConfig::new().with_interval_minutes(0).interval_minutes, 1);
    }

    #[test]
    fn test_times_wrap() {
        let config = GeneratorConfig::new()
            .with_start(NaiveTime::from_hms_opt(23, 0, 0).unwrap())
            .with_num_samples(3);
        assert_eq!(config.time_of(0), NaiveTime::from_hms_opt(23, 0, 0).unwrap());
        assert_eq!(config.time_of(1), NaiveTime::from_hms_opt(0, 0, 0).unwrap());
        assert_eq!(config.time_of(2), NaiveTime::from_hms_opt(1, 0, 0).unwrap());
    }

    #[test]
    fn test_seeded_determinism() {
        let config = GeneratorConfig::new().with_interval_minutes(30).with_seed(42);
        let a = generate(Profile::Sick, &config);
        let b = generate(Profile::Sick, &config);
        assert_eq!(a, b);
        assert_eq!(a.len(), 48);
    }

    #[test]
    fn test_values_in_range_and_rounded() {
        let config = GeneratorConfig::new().with_interval_minutes(10).with_seed(3);
        for profile in Profile::ALL {
            for s in generate(profile, &config) {
                assert!((0.0..=190.0).contains(&s.heart_rate));
                assert!((34.0..=44.0).contains(&s.body_temperature));
                assert!((0.0..=113.0).contains(&s.barking_volume));
                assert_eq!(s.heart_rate, s.heart_rate.round());
                let tenths = s.body_temperature * 10.0;
                assert!((tenths - tenths.round()).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_profiles_ordered_by_severity() {
        let config = GeneratorConfig::new().with_interval_minutes(15).with_seed(11);
        let mean_temperature = |p: Profile| {
            let samples = generate(p, &config);
            samples.iter().map(|s| s.body_temperature).sum::<f64>() / samples.len() as f64
        };
        let fine = mean_temperature(Profile::Fine);
        let sick = mean_temperature(Profile::Sick);
        let critical = mean_temperature(Profile::Critical);
        assert!(fine < sick && sick < critical);
    }

    #[test]
    fn test_profile_names() {
        let names: Vec<String> = Profile::ALL.iter().map(|p| p.to_string()).collect();
        assert_eq!(names, vec!["fine", "sick", "critical"]);
    }
}
