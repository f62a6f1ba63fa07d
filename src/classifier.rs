// Canis - Fuzzy condition classifier for canine vital signs
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Condition classification
//!
//! Turns a crisp output back into graded output terms: every term of the
//! consequent is evaluated at the crisp value and ranked, and the top terms
//! form a short label such as `"urgent 58%, need help 15%"`.

use crate::engine::{InferenceEngine, Inputs};
use crate::error::Result;
use crate::report::Condition;
use crate::rule::RuleBase;
use crate::sample::Sample;
use crate::variable::LinguisticVariable;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Number of ranked terms in a label by default.
pub const DEFAULT_LABEL_TERMS: usize = 2;

/// An output term and its degree at the crisp value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedTerm {
    pub term: String,
    pub degree: f64,
}

impl RankedTerm {
    /// Degree as a whole percentage, exact halves rounded to even.
    pub fn percent(&self) -> i64 {
        round_half_even(self.degree * 100.0) as i64
    }
}

fn round_half_even(x: f64) -> f64 {
    let rounded = x.round();
    if (rounded - x).abs() == 0.5 {
        2.0 * (x / 2.0).round()
    } else {
        rounded
    }
}

/// Rank every term of `consequent` at `crisp`, highest degree first.
///
/// Equal degrees keep the variable's declaration order.
pub fn classify(consequent: &LinguisticVariable, crisp: f64) -> Vec<RankedTerm> {
    let mut ranked: Vec<RankedTerm> = consequent
        .fuzzify(crisp)
        .into_iter()
        .map(|(term, degree)| RankedTerm {
            term: term.to_string(),
            degree,
        })
        .collect();

    // sort_by is stable
    ranked.sort_by(|a, b| {
        b.degree
            .partial_cmp(&a.degree)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked
}

/// `"<term> <percent>%"` for the first `count` terms, joined by `", "`.
pub fn format_label(ranked: &[RankedTerm], count: usize) -> String {
    ranked
        .iter()
        .take(count)
        .map(|r| format!("{} {}%", r.term, r.percent()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Classification of one sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub timestamp: NaiveTime,
    pub output: f64,
    pub ranked: Vec<RankedTerm>,
    pub label: String,
}

impl ClassificationResult {
    /// Build a result, deriving the label from the top `label_terms` terms.
    pub fn new(timestamp: NaiveTime, output: f64, ranked: Vec<RankedTerm>, label_terms: usize) -> Self {
        let label = format_label(&ranked, label_terms);
        Self {
            timestamp,
            output,
            ranked,
            label,
        }
    }

    /// Name of the highest-ranked term.
    pub fn primary_term(&self) -> Option<&str> {
        self.ranked.first().map(|r| r.term.as_str())
    }

    /// Primary term as a reporting category; unmapped names become
    /// [`Condition::Unknown`].
    pub fn condition(&self) -> Condition {
        self.primary_term()
            .map(Condition::from_term)
            .unwrap_or(Condition::Unknown)
    }
}

/// Inference plus ranking, bound to one rule base.
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'a> {
    engine: InferenceEngine<'a>,
    label_terms: usize,
}

impl<'a> Classifier<'a> {
    pub fn new(rule_base: &'a RuleBase) -> Self {
        Self {
            engine: InferenceEngine::new(rule_base),
            label_terms: DEFAULT_LABEL_TERMS,
        }
    }

    /// Use `count` ranked terms in labels.
    pub fn with_label_terms(mut self, count: usize) -> Self {
        self.label_terms = count;
        self
    }

    pub fn engine(&self) -> &InferenceEngine<'a> {
        &self.engine
    }

    /// Rank the output terms at a crisp value.
    pub fn rank(&self, crisp: f64) -> Vec<RankedTerm> {
        classify(self.engine.rule_base().consequent(), crisp)
    }

    /// Infer and rank one set of inputs.
    pub fn classify_inputs(&self, timestamp: NaiveTime, inputs: &Inputs) -> Result<ClassificationResult> {
        let output = self.engine.infer(inputs)?;
        Ok(ClassificationResult::new(
            timestamp,
            output,
            self.rank(output),
            self.label_terms,
        ))
    }

    /// Infer and rank one sample.
    pub fn classify_sample(&self, sample: &Sample) -> Result<ClassificationResult> {
        self.classify_inputs(sample.time, &sample.inputs())
    }
}
