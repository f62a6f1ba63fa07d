// Canis - Fuzzy condition classifier for canine vital signs
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Mamdani inference over a [`RuleBase`].
//!
//! Each call builds a fresh [`EvaluationContext`]: fuzzify the inputs, fire
//! the rules (minimum over clauses), clip every output term at the strongest
//! rule concluding on it, aggregate by per-point maximum and take the
//! centroid. Nothing survives between calls.

use crate::error::{ConfigurationError, Result};
use crate::rule::RuleBase;
use std::collections::HashMap;

/// Crisp input values keyed by antecedent variable name.
pub type Inputs = HashMap<String, f64>;

/// Trace of a single evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationContext {
    /// Inputs as assigned, for the referenced variables only.
    inputs: Vec<(String, f64)>,
    /// Firing strength per rule, in rule order.
    firing_strengths: Vec<f64>,
    /// Clip level per output term, in term declaration order.
    term_strengths: Vec<f64>,
    /// Aggregated output distribution over the consequent universe.
    aggregated: Vec<f64>,
    /// Centroid of `aggregated`.
    output: f64,
}

impl EvaluationContext {
    pub fn inputs(&self) -> &[(String, f64)] {
        &self.inputs
    }

    pub fn firing_strengths(&self) -> &[f64] {
        &self.firing_strengths
    }

    pub fn term_strengths(&self) -> &[f64] {
        &self.term_strengths
    }

    pub fn aggregated(&self) -> &[f64] {
        &self.aggregated
    }

    pub fn output(&self) -> f64 {
        self.output
    }

    /// Index of the rule with the highest firing strength (first on ties).
    pub fn dominant_rule(&self) -> Option<usize> {
        self.firing_strengths
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (i, &s)| match best {
                Some((_, top)) if top >= s => best,
                _ => Some((i, s)),
            })
            .map(|(i, _)| i)
    }
}

/// Stateless evaluator bound to a rule base.
#[derive(Debug, Clone, Copy)]
pub struct InferenceEngine<'a> {
    rule_base: &'a RuleBase,
}

impl<'a> InferenceEngine<'a> {
    pub fn new(rule_base: &'a RuleBase) -> Self {
        Self { rule_base }
    }

    pub fn rule_base(&self) -> &'a RuleBase {
        self.rule_base
    }

    /// Run the full pipeline and keep every intermediate result.
    pub fn evaluate(&self, inputs: &Inputs) -> Result<EvaluationContext> {
        let base = self.rule_base;
        let antecedents = base.antecedents();

        // assigned value per antecedent index, only for referenced variables
        let mut values = vec![0.0; antecedents.len()];
        let mut assigned = Vec::with_capacity(base.required_indices().len());
        for &index in base.required_indices() {
            let name = antecedents[index].name();
            let value = *inputs
                .get(name)
                .ok_or_else(|| ConfigurationError::MissingInput(name.to_string()))?;
            if !value.is_finite() {
                return Err(ConfigurationError::NonFiniteInput {
                    variable: name.to_string(),
                    value,
                }
                .into());
            }
            values[index] = value;
            assigned.push((name.to_string(), value));
        }

        let firing_strengths: Vec<f64> = base
            .resolved()
            .iter()
            .map(|rule| {
                let strength = rule
                    .clauses
                    .iter()
                    .map(|c| antecedents[c.variable].membership_at(c.term, values[c.variable]))
                    .fold(1.0, f64::min);
                strength * rule.weight
            })
            .collect();

        let consequent = base.consequent();
        let mut term_strengths = vec![0.0_f64; consequent.terms().len()];
        for (rule, &strength) in base.resolved().iter().zip(&firing_strengths) {
            let slot = &mut term_strengths[rule.term];
            *slot = slot.max(strength);
        }

        let clipped: Vec<Vec<f64>> = term_strengths
            .iter()
            .enumerate()
            .map(|(term, &strength)| consequent.clip(term, strength))
            .collect();
        let aggregated = consequent.aggregate(&clipped)?;
        let output = consequent.defuzzify(&aggregated)?;

        log::debug!(
            "inference: inputs={:?} strengths={:?} output={:.4}",
            assigned,
            firing_strengths,
            output
        );

        Ok(EvaluationContext {
            inputs: assigned,
            firing_strengths,
            term_strengths,
            aggregated,
            output,
        })
    }

    /// Crisp output for the given inputs.
    pub fn infer(&self, inputs: &Inputs) -> Result<f64> {
        self.evaluate(inputs).map(|ctx| ctx.output)
    }
}

/// Crisp output of `rule_base` for `inputs`.
pub fn infer(rule_base: &RuleBase, inputs: &Inputs) -> Result<f64> {
    InferenceEngine::new(rule_base).infer(inputs)
}
