// Canis - Fuzzy condition classifier for canine vital signs
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Membership function library
//!
//! Each shape maps a crisp value to a degree in `[0, 1]`. Evaluation is pure
//! arithmetic on `f64`, so identical inputs give bit-identical degrees.

use crate::error::ConfigurationError;
use serde::{Deserialize, Serialize};

/// Shape of a fuzzy term.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum MembershipFunction {
    /// Linear ramp up from `left` to `peak`, down from `peak` to `right`.
    Triangular { left: f64, peak: f64, right: f64 },
    /// `exp(-(x - mean)^2 / (2 sigma^2))`
    Gaussian { mean: f64, sigma: f64 },
    /// `1 / (1 + |(x - center) / width|^(2 slope))`
    GeneralizedBell { width: f64, slope: f64, center: f64 },
}

impl MembershipFunction {
    /// Triangular term. Requires `left <= peak <= right`.
    pub fn triangular(left: f64, peak: f64, right: f64) -> Result<Self, ConfigurationError> {
        let mf = MembershipFunction::Triangular { left, peak, right };
        mf.validate()?;
        Ok(mf)
    }

    /// Gaussian term. Requires `sigma > 0`.
    pub fn gaussian(mean: f64, sigma: f64) -> Result<Self, ConfigurationError> {
        let mf = MembershipFunction::Gaussian { mean, sigma };
        mf.validate()?;
        Ok(mf)
    }

    /// Generalized bell term. Requires `width != 0` and `slope > 0`.
    pub fn generalized_bell(width: f64, slope: f64, center: f64) -> Result<Self, ConfigurationError> {
        let mf = MembershipFunction::GeneralizedBell {
            width,
            slope,
            center,
        };
        mf.validate()?;
        Ok(mf)
    }

    /// Short shape name used in messages.
    pub fn shape_name(&self) -> &'static str {
        match self {
            MembershipFunction::Triangular { .. } => "triangular",
            MembershipFunction::Gaussian { .. } => "gaussian",
            MembershipFunction::GeneralizedBell { .. } => "generalized_bell",
        }
    }

    /// Check parameters. Deserialized functions bypass the constructors, so
    /// configuration building calls this again.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let shape = self.shape_name();
        let invalid = |reason: String| Err(ConfigurationError::InvalidParameter { shape, reason });

        match *self {
            MembershipFunction::Triangular { left, peak, right } => {
                if !(left.is_finite() && peak.is_finite() && right.is_finite()) {
                    return invalid(format!("non-finite vertex in ({left}, {peak}, {right})"));
                }
                if !(left <= peak && peak <= right) {
                    return invalid(format!(
                        "vertices must satisfy left <= peak <= right, got ({left}, {peak}, {right})"
                    ));
                }
            }
            MembershipFunction::Gaussian { mean, sigma } => {
                if !mean.is_finite() {
                    return invalid(format!("non-finite mean {mean}"));
                }
                if !(sigma.is_finite() && sigma > 0.0) {
                    return invalid(format!("sigma must be positive, got {sigma}"));
                }
            }
            MembershipFunction::GeneralizedBell {
                width,
                slope,
                center,
            } => {
                if !(width.is_finite() && center.is_finite()) {
                    return invalid(format!("non-finite width {width} or center {center}"));
                }
                if width == 0.0 {
                    return invalid("width must be non-zero".to_string());
                }
                if !(slope.is_finite() && slope > 0.0) {
                    return invalid(format!("slope must be positive, got {slope}"));
                }
            }
        }
        Ok(())
    }

    /// Degree of membership of `x`, always within `[0, 1]`.
    pub fn evaluate(&self, x: f64) -> f64 {
        if x.is_nan() {
            return 0.0;
        }

        let degree = match *self {
            MembershipFunction::Triangular { left, peak, right } => {
                if x < left || x > right {
                    0.0
                } else if x == peak {
                    1.0
                } else if x < peak {
                    (x - left) / (peak - left)
                } else {
                    (right - x) / (right - peak)
                }
            }
            MembershipFunction::Gaussian { mean, sigma } => {
                (-(x - mean).powi(2) / (2.0 * sigma * sigma)).exp()
            }
            MembershipFunction::GeneralizedBell {
                width,
                slope,
                center,
            } => 1.0 / (1.0 + ((x - center) / width).abs().powf(2.0 * slope)),
        };

        degree.clamp(0.0, 1.0)
    }

    /// The point where the degree is exactly 1.
    pub fn peak(&self) -> f64 {
        match *self {
            MembershipFunction::Triangular { peak, .. } => peak,
            MembershipFunction::Gaussian { mean, .. } => mean,
            MembershipFunction::GeneralizedBell { center, .. } => center,
        }
    }

    /// Closed interval outside of which the degree is 0, if bounded.
    pub fn support(&self) -> Option<(f64, f64)> {
        match *self {
            MembershipFunction::Triangular { left, right, .. } => Some((left, right)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn shapes() -> Vec<MembershipFunction> {
        vec![
            MembershipFunction::triangular(34.0, 34.0, 38.3).unwrap(),
            MembershipFunction::triangular(37.75, 44.0, 44.0).unwrap(),
            MembershipFunction::triangular(20.0, 30.0, 50.0).unwrap(),
            MembershipFunction::gaussian(38.75, 0.6).unwrap(),
            MembershipFunction::gaussian(50.0, 20.0).unwrap(),
            MembershipFunction::generalized_bell(40.0, 3.0, 95.0).unwrap(),
            MembershipFunction::generalized_bell(-10.0, 0.5, 20.0).unwrap(),
        ]
    }

    #[test]
    fn test_degree_in_unit_interval() {
        let mut rng = StdRng::seed_from_u64(7);
        for mf in shapes() {
            for _ in 0..2_000 {
                let x: f64 = rng.gen_range(-1_000.0..1_000.0);
                let d = mf.evaluate(x);
                assert!((0.0..=1.0).contains(&d), "{:?} at {} gave {}", mf, x, d);
            }
        }
    }

    #[test]
    fn test_exactly_one_at_peak() {
        for mf in shapes() {
            assert_eq!(mf.evaluate(mf.peak()), 1.0, "{:?}", mf);
        }
    }

    #[test]
    fn test_triangular_ramps() {
        let mf = MembershipFunction::triangular(20.0, 30.0, 50.0).unwrap();
        assert_eq!(mf.evaluate(19.9), 0.0);
        assert_relative_eq!(mf.evaluate(25.0), 0.5);
        assert_relative_eq!(mf.evaluate(40.0), 0.5);
        assert_eq!(mf.evaluate(50.0), 0.0);
        assert_eq!(mf.evaluate(50.1), 0.0);
        assert_eq!(mf.support(), Some((20.0, 50.0)));
    }

    #[test]
    fn test_triangular_left_step() {
        // a == b: full membership at a, then linear down to c
        let mf = MembershipFunction::triangular(34.0, 34.0, 38.0).unwrap();
        assert_eq!(mf.evaluate(33.99), 0.0);
        assert_eq!(mf.evaluate(34.0), 1.0);
        assert_relative_eq!(mf.evaluate(36.0), 0.5);
        assert_eq!(mf.evaluate(38.0), 0.0);
    }

    #[test]
    fn test_triangular_right_step() {
        let mf = MembershipFunction::triangular(37.75, 44.0, 44.0).unwrap();
        assert_eq!(mf.evaluate(37.75), 0.0);
        assert_relative_eq!(mf.evaluate(38.75), 0.16, epsilon = 1e-12);
        assert_eq!(mf.evaluate(44.0), 1.0);
        assert_eq!(mf.evaluate(44.01), 0.0);
    }

    #[test]
    fn test_triangular_single_point() {
        let mf = MembershipFunction::triangular(5.0, 5.0, 5.0).unwrap();
        assert_eq!(mf.evaluate(5.0), 1.0);
        assert_eq!(mf.evaluate(5.001), 0.0);
    }

    #[test]
    fn test_gaussian_values() {
        let mf = MembershipFunction::gaussian(50.0, 20.0).unwrap();
        // one sigma away
        assert_relative_eq!(mf.evaluate(70.0), (-0.5f64).exp());
        assert_relative_eq!(mf.evaluate(30.0), mf.evaluate(70.0));
        // far tails underflow to exactly zero
        let narrow = MembershipFunction::gaussian(38.75, 0.6).unwrap();
        assert_eq!(narrow.evaluate(100.0), 0.0);
    }

    #[test]
    fn test_bell_values() {
        let mf = MembershipFunction::generalized_bell(40.0, 3.0, 95.0).unwrap();
        // at center +/- width the degree is always one half
        assert_relative_eq!(mf.evaluate(55.0), 0.5);
        assert_relative_eq!(mf.evaluate(135.0), 0.5);
        assert!(mf.evaluate(0.0) < 0.01);
    }

    #[test]
    fn test_nan_input() {
        for mf in shapes() {
            assert_eq!(mf.evaluate(f64::NAN), 0.0);
        }
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(matches!(
            MembershipFunction::gaussian(10.0, 0.0),
            Err(ConfigurationError::InvalidParameter { shape: "gaussian", .. })
        ));
        assert!(MembershipFunction::gaussian(10.0, -1.0).is_err());
        assert!(MembershipFunction::gaussian(f64::NAN, 1.0).is_err());
        assert!(MembershipFunction::triangular(3.0, 2.0, 4.0).is_err());
        assert!(MembershipFunction::triangular(1.0, 2.0, f64::INFINITY).is_err());
        assert!(MembershipFunction::generalized_bell(0.0, 3.0, 1.0).is_err());
        assert!(MembershipFunction::generalized_bell(1.0, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_deterministic() {
        let mf = MembershipFunction::generalized_bell(10.0, 3.0, 20.0).unwrap();
        let a = mf.evaluate(26.364586061962797);
        let b = mf.evaluate(26.364586061962797);
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn test_serde_tagged() {
        let mf = MembershipFunction::gaussian(10.0, 10.0).unwrap();
        let json = serde_json::to_string(&mf).unwrap();
        assert!(json.contains("\"shape\":\"gaussian\""));
        let parsed: MembershipFunction = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, mf);
    }
}
