// Canis - Fuzzy condition classifier for canine vital signs
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Fuzzy system configuration.
//!
//! [`FuzzyConfig`] is a plain serde description of variables and rules. It is
//! validated and compiled once by [`FuzzyConfig::build`] into an immutable
//! [`RuleBase`] that the entry point passes by reference to the engine and
//! the reporter.
//!
//! The default configuration is the reference canine system:
//!
//! ```rust
//! use canis::config::FuzzyConfig;
//!
//! let rule_base = FuzzyConfig::default().build().unwrap();
//! assert_eq!(rule_base.len(), 9);
//! assert_eq!(rule_base.required_inputs(), vec!["body_temperature", "heart_rate"]);
//! ```

use crate::classifier::DEFAULT_LABEL_TERMS;
use crate::error::ConfigurationError;
use crate::membership::MembershipFunction;
use crate::report::DEFAULT_SLOT_COUNT;
use crate::rule::{Clause, Rule, RuleBase};
use crate::sample::{BARKING_VOLUME, BODY_TEMPERATURE, CONDITION, HEART_RATE};
use crate::variable::{LinguisticVariable, Role, Term, Universe};
use serde::{Deserialize, Serialize};

/// Master configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzyConfig {
    /// Input and output variables.
    pub variables: Vec<VariableSpec>,

    /// Rules, all concluding on the single output variable.
    pub rules: Vec<RuleSpec>,

    /// Reporting settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Universe bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UniverseSpec {
    pub start: f64,
    pub end: f64,
    pub step: f64,
}

/// A term definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermSpec {
    pub name: String,
    pub function: MembershipFunction,
}

/// A variable definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableSpec {
    pub name: String,
    pub role: Role,
    pub universe: UniverseSpec,
    pub terms: Vec<TermSpec>,
}

/// A rule definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSpec {
    pub when: Vec<Clause>,
    pub then: Clause,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

/// Reporting settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Daily summary slots; must divide 1440.
    pub slot_count: usize,
    /// Ranked terms shown in a label.
    pub label_terms: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            slot_count: DEFAULT_SLOT_COUNT,
            label_terms: DEFAULT_LABEL_TERMS,
        }
    }
}

impl VariableSpec {
    fn build(&self) -> Result<LinguisticVariable, ConfigurationError> {
        let universe = Universe::new(self.universe.start, self.universe.end, self.universe.step)?;
        let terms = self
            .terms
            .iter()
            .map(|t| Term::new(t.name.clone(), t.function))
            .collect();
        LinguisticVariable::new(self.name.clone(), self.role, universe, terms)
    }
}

impl RuleSpec {
    fn to_rule(&self) -> Rule {
        Rule::new(self.when.clone(), self.then.clone()).with_weight(self.weight)
    }
}

impl FuzzyConfig {
    /// Validate everything and compile the rule base.
    pub fn build(&self) -> Result<RuleBase, ConfigurationError> {
        let mut antecedents = Vec::new();
        let mut consequents = Vec::new();
        for spec in &self.variables {
            let variable = spec.build()?;
            match variable.role() {
                Role::Antecedent => antecedents.push(variable),
                Role::Consequent => consequents.push(variable),
            }
        }

        if consequents.len() != 1 {
            return Err(ConfigurationError::ConsequentCount(consequents.len()));
        }
        let consequent = consequents.remove(0);

        let rules = self.rules.iter().map(RuleSpec::to_rule).collect();
        RuleBase::new(antecedents, consequent, rules)
    }

    /// Variable definition by name.
    pub fn variable(&self, name: &str) -> Option<&VariableSpec> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

fn term(name: &str, function: MembershipFunction) -> TermSpec {
    TermSpec {
        name: name.to_string(),
        function,
    }
}

fn tri(left: f64, peak: f64, right: f64) -> MembershipFunction {
    MembershipFunction::Triangular { left, peak, right }
}

fn gauss(mean: f64, sigma: f64) -> MembershipFunction {
    MembershipFunction::Gaussian { mean, sigma }
}

fn bell(width: f64, slope: f64, center: f64) -> MembershipFunction {
    MembershipFunction::GeneralizedBell {
        width,
        slope,
        center,
    }
}

fn rule(temperature: &str, heart_rate: &str, condition: &str) -> RuleSpec {
    RuleSpec {
        when: vec![
            Clause::new(BODY_TEMPERATURE, temperature),
            Clause::new(HEART_RATE, heart_rate),
        ],
        then: Clause::new(CONDITION, condition),
        weight: 1.0,
    }
}

impl Default for FuzzyConfig {
    fn default() -> Self {
        let variables = vec![
            VariableSpec {
                name: BODY_TEMPERATURE.to_string(),
                role: Role::Antecedent,
                universe: UniverseSpec {
                    start: 34.0,
                    end: 44.0,
                    step: 0.1,
                },
                terms: vec![
                    term("low", tri(34.0, 34.0, 38.3)),
                    term("normal", gauss(38.75, 0.6)),
                    term("high", tri(37.75, 44.0, 44.0)),
                ],
            },
            VariableSpec {
                name: HEART_RATE.to_string(),
                role: Role::Antecedent,
                universe: UniverseSpec {
                    start: 0.0,
                    end: 190.0,
                    step: 1.0,
                },
                terms: vec![
                    term("low", gauss(50.0, 20.0)),
                    term("normal", bell(40.0, 3.0, 95.0)),
                    term("high", gauss(140.0, 20.0)),
                ],
            },
            VariableSpec {
                name: BARKING_VOLUME.to_string(),
                role: Role::Antecedent,
                universe: UniverseSpec {
                    start: 0.0,
                    end: 113.0,
                    step: 1.0,
                },
                terms: vec![
                    term("quiet", gauss(0.0, 25.0)),
                    term("moderate", gauss(56.5, 20.0)),
                    term("loud", gauss(113.0, 25.0)),
                ],
            },
            VariableSpec {
                name: CONDITION.to_string(),
                role: Role::Consequent,
                universe: UniverseSpec {
                    start: 0.0,
                    end: 100.0,
                    step: 1.0,
                },
                terms: vec![
                    term("perfect", gauss(10.0, 10.0)),
                    term("normal", bell(10.0, 3.0, 20.0)),
                    term("need help", gauss(50.0, 10.0)),
                    term("urgent", gauss(80.0, 10.0)),
                ],
            },
        ];

        let rules = vec![
            rule("normal", "low", "normal"),
            rule("normal", "normal", "perfect"),
            rule("normal", "high", "need help"),
            rule("high", "low", "urgent"),
            rule("high", "high", "urgent"),
            rule("high", "normal", "need help"),
            rule("low", "low", "urgent"),
            rule("low", "normal", "need help"),
            rule("low", "high", "urgent"),
        ];

        Self {
            variables,
            rules,
            report: ReportConfig::default(),
        }
    }
}
