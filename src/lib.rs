//! # Canis - Fuzzy condition classifier for canine vital signs
//!
//! Mamdani fuzzy inference over a dog's body temperature and heart rate,
//! producing a crisp condition score, a ranked human-readable label and a
//! colour-coded daily summary.
//!
//! ## Key Features
//!
//! - **Membership Functions**: Triangular, Gaussian and generalized bell
//! - **Validated Rule Bases**: Every rule reference is resolved at build time
//! - **Stateless Inference**: One shared rule base, no per-call mutation
//! - **Graded Labels**: `"urgent 58%, need help 15%"` instead of a single class
//!
//! ## Quick Start
//!
//! ```rust
//! use canis::{Classifier, Condition, FuzzyConfig, Sample};
//! use chrono::NaiveTime;
//!
//! // Build the reference rule base once
//! let rule_base = FuzzyConfig::default().build().unwrap();
//! let classifier = Classifier::new(&rule_base);
//!
//! // Classify a reading
//! let time = NaiveTime::from_hms_opt(14, 0, 0).unwrap();
//! let sample = Sample::new(time, 140.0, 44.0, 60.0);
//! let result = classifier.classify_sample(&sample).unwrap();
//!
//! assert_eq!(result.label, "urgent 58%, need help 15%");
//! assert_eq!(result.condition(), Condition::Urgent);
//! ```
//!
//! ## Modules
//!
//! - [`membership`]: Membership function shapes
//! - [`variable`]: Universes, terms and linguistic variables
//! - [`rule`]: Rules and the validated rule base
//! - [`engine`]: Mamdani inference and centroid defuzzification
//! - [`classifier`]: Term ranking and labels
//! - [`report`]: Conditions, per-sample outcomes and daily summaries
//! - [`config`]: Serde configuration and the reference system
//! - [`sample`]: Timestamped vital-sign readings

// Modules
pub mod classifier;
pub mod config;
pub mod engine;
pub mod error;
pub mod membership;
pub mod report;
pub mod rule;
pub mod sample;
pub mod variable;

// Re-exports for convenient access
pub use classifier::{classify, format_label, ClassificationResult, Classifier, RankedTerm};
pub use config::{FuzzyConfig, ReportConfig, RuleSpec, TermSpec, UniverseSpec, VariableSpec};
pub use engine::{infer, EvaluationContext, InferenceEngine, Inputs};
pub use error::{CanisError, ConfigurationError, InferenceError, Result};
pub use membership::MembershipFunction;
pub use report::{
    build_daily_summary, Condition, DailySummary, ReportTally, Reporter, SampleOutcome,
    SlotEntry, SlotSummary,
};
pub use rule::{Clause, Rule, RuleBase};
pub use sample::Sample;
pub use variable::{LinguisticVariable, Role, Term, TermCurve, TermId, Universe};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_reference_system_end_to_end() {
        let rule_base = FuzzyConfig::default().build().unwrap();
        let mut inputs = Inputs::new();
        inputs.insert(sample::BODY_TEMPERATURE.to_string(), 44.0);
        inputs.insert(sample::HEART_RATE.to_string(), 140.0);

        let crisp = infer(&rule_base, &inputs).unwrap();
        assert!((crisp - 69.5635).abs() < 1e-3);

        let ranked = classify(rule_base.consequent(), crisp);
        assert_eq!(ranked[0].term, "urgent");
        assert_eq!(ranked[1].term, "need help");
    }
}
