// Canis - Fuzzy condition classifier for canine vital signs
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Linguistic variables and their discretized universes.
//!
//! A variable partitions its universe into named, overlapping terms. Output
//! (consequent) variables also aggregate clipped term distributions and reduce
//! them to a crisp value by centroid.

use crate::error::{CanisError, ConfigurationError, InferenceError};
use crate::membership::MembershipFunction;
use serde::{Deserialize, Serialize};

/// Index of a term within its variable, in declaration order.
pub type TermId = usize;

/// Largest number of sample points a universe may hold.
pub const MAX_UNIVERSE_POINTS: usize = 1_000_000;

/// Evenly spaced sample points over a closed interval.
#[derive(Debug, Clone, PartialEq)]
pub struct Universe {
    start: f64,
    end: f64,
    step: f64,
    points: Vec<f64>,
}

impl Universe {
    /// Sample `[start, end]` every `step`. `end` is included when it falls on
    /// the grid.
    pub fn new(start: f64, end: f64, step: f64) -> Result<Self, ConfigurationError> {
        if !(start.is_finite() && end.is_finite() && step.is_finite()) {
            return Err(ConfigurationError::InvalidUniverse {
                reason: format!("non-finite bound or step in [{start}, {end}] step {step}"),
            });
        }
        if step <= 0.0 {
            return Err(ConfigurationError::InvalidUniverse {
                reason: format!("step must be positive, got {step}"),
            });
        }
        if end < start {
            return Err(ConfigurationError::EmptyUniverse { start, end });
        }

        // tolerance absorbs representation error in e.g. 10.0 / 0.1
        let intervals = ((end - start) / step + 1e-9).floor();
        if !intervals.is_finite() || intervals >= MAX_UNIVERSE_POINTS as f64 {
            return Err(ConfigurationError::InvalidUniverse {
                reason: format!(
                    "[{start}, {end}] step {step} exceeds {MAX_UNIVERSE_POINTS} points"
                ),
            });
        }
        let intervals = intervals as usize;
        let points = (0..=intervals)
            .map(|i| (start + i as f64 * step).min(end))
            .collect();

        Ok(Self {
            start,
            end,
            step,
            points,
        })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Sample points, strictly increasing.
    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Position of a variable in the rule base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Rule input.
    Antecedent,
    /// Rule output.
    Consequent,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Antecedent => "antecedent",
            Role::Consequent => "consequent",
        }
    }
}

/// A named term and its membership function.
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    name: String,
    function: MembershipFunction,
}

impl Term {
    pub fn new(name: impl Into<String>, function: MembershipFunction) -> Self {
        Self {
            name: name.into(),
            function,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn function(&self) -> &MembershipFunction {
        &self.function
    }
}

/// One term sampled across the universe, for plotting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermCurve {
    pub term: String,
    pub points: Vec<(f64, f64)>,
}

/// A named dimension partitioned into graded terms.
#[derive(Debug, Clone, PartialEq)]
pub struct LinguisticVariable {
    name: String,
    role: Role,
    universe: Universe,
    terms: Vec<Term>,
}

impl LinguisticVariable {
    /// Build a variable. Term names must be unique and at least one term
    /// must be given.
    pub fn new(
        name: impl Into<String>,
        role: Role,
        universe: Universe,
        terms: Vec<Term>,
    ) -> Result<Self, ConfigurationError> {
        let name = name.into();
        if terms.is_empty() {
            return Err(ConfigurationError::NoTerms { variable: name });
        }
        for (i, term) in terms.iter().enumerate() {
            if terms[..i].iter().any(|t| t.name == term.name) {
                return Err(ConfigurationError::DuplicateTerm {
                    variable: name,
                    term: term.name.clone(),
                });
            }
            term.function.validate()?;
        }

        Ok(Self {
            name,
            role,
            universe,
            terms,
        })
    }

    /// Shorthand for an input variable.
    pub fn antecedent(
        name: impl Into<String>,
        universe: Universe,
        terms: Vec<Term>,
    ) -> Result<Self, ConfigurationError> {
        Self::new(name, Role::Antecedent, universe, terms)
    }

    /// Shorthand for an output variable.
    pub fn consequent(
        name: impl Into<String>,
        universe: Universe,
        terms: Vec<Term>,
    ) -> Result<Self, ConfigurationError> {
        Self::new(name, Role::Consequent, universe, terms)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Term names in declaration order.
    pub fn term_names(&self) -> Vec<&str> {
        self.terms.iter().map(|t| t.name.as_str()).collect()
    }

    /// Look up a term by name.
    pub fn term_id(&self, term: &str) -> Option<TermId> {
        self.terms.iter().position(|t| t.name == term)
    }

    /// Like [`term_id`](Self::term_id) but fails with a configuration error.
    pub fn resolve(&self, term: &str) -> Result<TermId, ConfigurationError> {
        self.term_id(term)
            .ok_or_else(|| ConfigurationError::UnknownTerm {
                variable: self.name.clone(),
                term: term.to_string(),
            })
    }

    /// Degree of `x` in the named term.
    pub fn membership_of(&self, term: &str, x: f64) -> Result<f64, ConfigurationError> {
        let id = self.resolve(term)?;
        Ok(self.membership_at(id, x))
    }

    /// Degree of `x` in a resolved term.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not obtained from this variable.
    pub fn membership_at(&self, id: TermId, x: f64) -> f64 {
        self.terms[id].function.evaluate(x)
    }

    /// Degree of `x` in every term, in declaration order.
    pub fn fuzzify(&self, x: f64) -> Vec<(&str, f64)> {
        self.terms
            .iter()
            .map(|t| (t.name.as_str(), t.function.evaluate(x)))
            .collect()
    }

    /// Every term sampled over the universe.
    pub fn curves(&self) -> Vec<TermCurve> {
        self.terms
            .iter()
            .map(|t| TermCurve {
                term: t.name.clone(),
                points: self
                    .universe
                    .points()
                    .iter()
                    .map(|&y| (y, t.function.evaluate(y)))
                    .collect(),
            })
            .collect()
    }

    /// A term's membership clipped at `strength` over the universe
    /// (Mamdani implication).
    pub fn clip(&self, id: TermId, strength: f64) -> Vec<f64> {
        let function = &self.terms[id].function;
        self.universe
            .points()
            .iter()
            .map(|&y| strength.min(function.evaluate(y)))
            .collect()
    }

    /// Combine clipped distributions by per-point maximum.
    pub fn aggregate(&self, clipped: &[Vec<f64>]) -> Result<Vec<f64>, ConfigurationError> {
        self.expect_consequent()?;

        let mut combined = vec![0.0_f64; self.universe.len()];
        for distribution in clipped {
            self.check_length(distribution)?;
            for (acc, &degree) in combined.iter_mut().zip(distribution) {
                *acc = acc.max(degree);
            }
        }
        Ok(combined)
    }

    /// Centroid of a distribution over the universe.
    ///
    /// Fails with [`InferenceError::DegenerateOutput`] when the distribution
    /// has no mass.
    pub fn defuzzify(&self, distribution: &[f64]) -> Result<f64, CanisError> {
        self.expect_consequent()?;
        self.check_length(distribution)?;

        let (moment, mass) = self
            .universe
            .points()
            .iter()
            .zip(distribution)
            .fold((0.0, 0.0), |(moment, mass), (&y, &degree)| {
                (moment + y * degree, mass + degree)
            });

        if mass == 0.0 {
            return Err(InferenceError::DegenerateOutput {
                variable: self.name.clone(),
            }
            .into());
        }
        Ok(moment / mass)
    }

    fn expect_consequent(&self) -> Result<(), ConfigurationError> {
        if self.role != Role::Consequent {
            return Err(ConfigurationError::WrongRole {
                variable: self.name.clone(),
                expected: Role::Consequent.as_str(),
            });
        }
        Ok(())
    }

    fn check_length(&self, distribution: &[f64]) -> Result<(), ConfigurationError> {
        if distribution.len() != self.universe.len() {
            return Err(ConfigurationError::DistributionLength {
                variable: self.name.clone(),
                expected: self.universe.len(),
                actual: distribution.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn output() -> LinguisticVariable {
        LinguisticVariable::consequent(
            "condition",
            Universe::new(0.0, 100.0, 1.0).unwrap(),
            vec![
                Term::new("low", MembershipFunction::triangular(0.0, 0.0, 50.0).unwrap()),
                Term::new("mid", MembershipFunction::triangular(25.0, 50.0, 75.0).unwrap()),
                Term::new("high", MembershipFunction::triangular(50.0, 100.0, 100.0).unwrap()),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_universe_points() {
        let u = Universe::new(0.0, 99.0, 1.0).unwrap();
        assert_eq!(u.len(), 100);
        assert_eq!(u.points()[0], 0.0);
        assert_eq!(u.points()[99], 99.0);

        let temp = Universe::new(34.0, 44.0, 0.1).unwrap();
        assert_eq!(temp.len(), 101);
        assert_eq!(*temp.points().last().unwrap(), 44.0);
        assert!(temp.points().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_universe_end_off_grid() {
        let u = Universe::new(0.0, 10.5, 2.0).unwrap();
        assert_eq!(u.points(), &[0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
    }

    #[test]
    fn test_universe_single_point() {
        let u = Universe::new(5.0, 5.0, 1.0).unwrap();
        assert_eq!(u.points(), &[5.0]);
    }

    #[test]
    fn test_universe_invalid() {
        assert!(matches!(
            Universe::new(10.0, 0.0, 1.0),
            Err(ConfigurationError::EmptyUniverse { .. })
        ));
        assert!(matches!(
            Universe::new(0.0, 10.0, 0.0),
            Err(ConfigurationError::InvalidUniverse { .. })
        ));
        assert!(Universe::new(0.0, f64::INFINITY, 1.0).is_err());
    }

    #[test]
    fn test_universe_too_many_points() {
        assert!(matches!(
            Universe::new(0.0, 1e300, 1e-300),
            Err(ConfigurationError::InvalidUniverse { .. })
        ));
        assert!(matches!(
            Universe::new(f64::MIN, f64::MAX, 1.0),
            Err(ConfigurationError::InvalidUniverse { .. })
        ));
        assert!(Universe::new(0.0, MAX_UNIVERSE_POINTS as f64, 1.0).is_err());

        let largest = Universe::new(0.0, (MAX_UNIVERSE_POINTS - 1) as f64, 1.0).unwrap();
        assert_eq!(largest.len(), MAX_UNIVERSE_POINTS);
    }

    #[test]
    fn test_term_lookup() {
        let var = output();
        assert_eq!(var.term_names(), vec!["low", "mid", "high"]);
        assert_eq!(var.term_id("mid"), Some(1));
        assert!(matches!(
            var.resolve("extreme"),
            Err(ConfigurationError::UnknownTerm { .. })
        ));
        assert_relative_eq!(var.membership_of("mid", 37.5).unwrap(), 0.5);
    }

    #[test]
    fn test_no_terms_rejected() {
        let result = LinguisticVariable::antecedent(
            "heart_rate",
            Universe::new(0.0, 190.0, 1.0).unwrap(),
            Vec::new(),
        );
        assert!(matches!(result, Err(ConfigurationError::NoTerms { .. })));
    }

    #[test]
    fn test_duplicate_term_rejected() {
        let mf = MembershipFunction::gaussian(50.0, 20.0).unwrap();
        let result = LinguisticVariable::antecedent(
            "heart_rate",
            Universe::new(0.0, 190.0, 1.0).unwrap(),
            vec![Term::new("low", mf), Term::new("low", mf)],
        );
        assert!(matches!(result, Err(ConfigurationError::DuplicateTerm { .. })));
    }

    #[test]
    fn test_invalid_function_rejected() {
        let bad = MembershipFunction::Gaussian {
            mean: 1.0,
            sigma: 0.0,
        };
        let result = LinguisticVariable::antecedent(
            "heart_rate",
            Universe::new(0.0, 190.0, 1.0).unwrap(),
            vec![Term::new("low", bad)],
        );
        assert!(matches!(
            result,
            Err(ConfigurationError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_fuzzify_order() {
        let var = output();
        let degrees = var.fuzzify(50.0);
        assert_eq!(degrees[0], ("low", 0.0));
        assert_eq!(degrees[1], ("mid", 1.0));
        assert_eq!(degrees[2], ("high", 0.0));
    }

    #[test]
    fn test_clip_and_aggregate() {
        let var = output();
        let low = var.clip(0, 0.4);
        let high = var.clip(2, 0.2);
        assert_eq!(low.len(), 101);
        assert!(low.iter().all(|&d| d <= 0.4));

        let combined = var.aggregate(&[low.clone(), high.clone()]).unwrap();
        for i in 0..combined.len() {
            assert_eq!(combined[i], low[i].max(high[i]));
        }
    }

    #[test]
    fn test_centroid_symmetric() {
        let var = output();
        let mid = var.clip(1, 1.0);
        let centroid = var.defuzzify(&mid).unwrap();
        assert_relative_eq!(centroid, 50.0, epsilon = 1e-9);
    }

    #[test]
    fn test_centroid_degenerate() {
        let var = output();
        let empty = vec![0.0; var.universe().len()];
        let err = var.defuzzify(&empty).unwrap_err();
        assert!(matches!(
            err,
            CanisError::Inference(InferenceError::DegenerateOutput { .. })
        ));
    }

    #[test]
    fn test_centroid_requires_consequent() {
        let input = LinguisticVariable::antecedent(
            "heart_rate",
            Universe::new(0.0, 10.0, 1.0).unwrap(),
            vec![Term::new(
                "low",
                MembershipFunction::gaussian(0.0, 2.0).unwrap(),
            )],
        )
        .unwrap();
        let distribution = vec![1.0; 11];
        assert!(matches!(
            input.defuzzify(&distribution),
            Err(CanisError::Configuration(ConfigurationError::WrongRole { .. }))
        ));
        assert!(input.aggregate(&[distribution]).is_err());
    }

    #[test]
    fn test_length_mismatch() {
        let var = output();
        assert!(matches!(
            var.aggregate(&[vec![0.5; 3]]),
            Err(ConfigurationError::DistributionLength { expected: 101, actual: 3, .. })
        ));
    }

    #[test]
    fn test_curves() {
        let var = output();
        let curves = var.curves();
        assert_eq!(curves.len(), 3);
        assert_eq!(curves[1].term, "mid");
        assert_eq!(curves[1].points.len(), 101);
        assert_eq!(curves[1].points[50], (50.0, 1.0));
    }
}
