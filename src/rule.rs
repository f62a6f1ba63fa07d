// Canis - Fuzzy condition classifier for canine vital signs
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Rules and the validated rule base.
//!
//! Rules name variables and terms by string. [`RuleBase::new`] resolves every
//! reference to indices once, so evaluation never performs name lookups on
//! terms and never meets an unknown reference.

use crate::error::ConfigurationError;
use crate::variable::{LinguisticVariable, Role, TermId};
use serde::{Deserialize, Serialize};

/// A `(variable, term)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Clause {
    pub variable: String,
    pub term: String,
}

impl Clause {
    pub fn new(variable: impl Into<String>, term: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            term: term.into(),
        }
    }
}

/// Conjunction of antecedent clauses implying one consequent clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    antecedent: Vec<Clause>,
    consequent: Clause,
    weight: f64,
}

impl Rule {
    /// Create a rule with weight 1.0.
    pub fn new(antecedent: Vec<Clause>, consequent: Clause) -> Self {
        Self {
            antecedent,
            consequent,
            weight: 1.0,
        }
    }

    /// Start a rule from its first antecedent clause.
    ///
    /// ```rust
    /// use canis::Rule;
    ///
    /// let rule = Rule::when("body_temperature", "normal")
    ///     .and("heart_rate", "normal")
    ///     .then("condition", "perfect");
    /// assert_eq!(rule.antecedent().len(), 2);
    /// ```
    pub fn when(variable: impl Into<String>, term: impl Into<String>) -> RuleBuilder {
        RuleBuilder {
            antecedent: vec![Clause::new(variable, term)],
        }
    }

    /// Scale the firing strength. Must lie in `[0, 1]`.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn antecedent(&self) -> &[Clause] {
        &self.antecedent
    }

    pub fn consequent(&self) -> &Clause {
        &self.consequent
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }
}

/// Builder returned by [`Rule::when`].
#[derive(Debug, Clone)]
pub struct RuleBuilder {
    antecedent: Vec<Clause>,
}

impl RuleBuilder {
    /// Add another conjoined clause.
    pub fn and(mut self, variable: impl Into<String>, term: impl Into<String>) -> Self {
        self.antecedent.push(Clause::new(variable, term));
        self
    }

    /// Finish the rule with its consequent.
    pub fn then(self, variable: impl Into<String>, term: impl Into<String>) -> Rule {
        Rule::new(self.antecedent, Clause::new(variable, term))
    }
}

/// Antecedent clause resolved to indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ResolvedClause {
    /// Index into [`RuleBase::antecedents`].
    pub variable: usize,
    pub term: TermId,
}

/// Rule resolved to indices.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ResolvedRule {
    pub clauses: Vec<ResolvedClause>,
    pub term: TermId,
    pub weight: f64,
}

/// Immutable, validated set of rules with the variables they refer to.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleBase {
    antecedents: Vec<LinguisticVariable>,
    consequent: LinguisticVariable,
    rules: Vec<Rule>,
    resolved: Vec<ResolvedRule>,
    /// Antecedent indices referenced by at least one rule, ascending.
    required: Vec<usize>,
}

impl RuleBase {
    /// Validate and assemble a rule base.
    ///
    /// Every antecedent variable must have role `Antecedent`, the output must
    /// have role `Consequent`, and every rule must conclude on the output and
    /// reference only declared variables and terms.
    pub fn new(
        antecedents: Vec<LinguisticVariable>,
        consequent: LinguisticVariable,
        rules: Vec<Rule>,
    ) -> Result<Self, ConfigurationError> {
        if consequent.role() != Role::Consequent {
            return Err(ConfigurationError::WrongRole {
                variable: consequent.name().to_string(),
                expected: Role::Consequent.as_str(),
            });
        }
        for (i, var) in antecedents.iter().enumerate() {
            if var.role() != Role::Antecedent {
                return Err(ConfigurationError::WrongRole {
                    variable: var.name().to_string(),
                    expected: Role::Antecedent.as_str(),
                });
            }
            if var.name() == consequent.name()
                || antecedents[..i].iter().any(|v| v.name() == var.name())
            {
                return Err(ConfigurationError::DuplicateVariable(var.name().to_string()));
            }
        }
        if rules.is_empty() {
            return Err(ConfigurationError::EmptyRuleBase);
        }

        let mut resolved = Vec::with_capacity(rules.len());
        let mut required = Vec::new();

        // rules are numbered from 1 in messages
        for (index, rule) in rules.iter().enumerate() {
            let number = index + 1;
            if rule.antecedent.is_empty() {
                return Err(ConfigurationError::EmptyAntecedent(number));
            }
            if !(0.0..=1.0).contains(&rule.weight) {
                return Err(ConfigurationError::InvalidWeight {
                    rule: number,
                    weight: rule.weight,
                });
            }

            let mut clauses = Vec::with_capacity(rule.antecedent.len());
            for clause in &rule.antecedent {
                let variable = Self::find_antecedent(&antecedents, &consequent, &clause.variable)?;
                let term = antecedents[variable].resolve(&clause.term)?;
                if !required.contains(&variable) {
                    required.push(variable);
                }
                clauses.push(ResolvedClause { variable, term });
            }

            if rule.consequent.variable != consequent.name() {
                return Err(ConfigurationError::MixedConsequents {
                    rule: number,
                    expected: consequent.name().to_string(),
                    found: rule.consequent.variable.clone(),
                });
            }
            let term = consequent.resolve(&rule.consequent.term)?;

            resolved.push(ResolvedRule {
                clauses,
                term,
                weight: rule.weight,
            });
        }
        required.sort_unstable();

        Ok(Self {
            antecedents,
            consequent,
            rules,
            resolved,
            required,
        })
    }

    fn find_antecedent(
        antecedents: &[LinguisticVariable],
        consequent: &LinguisticVariable,
        name: &str,
    ) -> Result<usize, ConfigurationError> {
        if let Some(index) = antecedents.iter().position(|v| v.name() == name) {
            return Ok(index);
        }
        if consequent.name() == name {
            return Err(ConfigurationError::WrongRole {
                variable: name.to_string(),
                expected: Role::Antecedent.as_str(),
            });
        }
        Err(ConfigurationError::UnknownVariable(name.to_string()))
    }

    /// Input variables, including any no rule references.
    pub fn antecedents(&self) -> &[LinguisticVariable] {
        &self.antecedents
    }

    /// Input variable by name.
    pub fn antecedent(&self, name: &str) -> Option<&LinguisticVariable> {
        self.antecedents.iter().find(|v| v.name() == name)
    }

    /// The output variable.
    pub fn consequent(&self) -> &LinguisticVariable {
        &self.consequent
    }

    /// Rules in declaration order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Names of the inputs that must be assigned before inference.
    pub fn required_inputs(&self) -> Vec<&str> {
        self.required
            .iter()
            .map(|&i| self.antecedents[i].name())
            .collect()
    }

    /// Every variable, inputs first.
    pub fn variables(&self) -> impl Iterator<Item = &LinguisticVariable> {
        self.antecedents.iter().chain(std::iter::once(&self.consequent))
    }

    pub(crate) fn resolved(&self) -> &[ResolvedRule] {
        &self.resolved
    }

    pub(crate) fn required_indices(&self) -> &[usize] {
        &self.required
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::membership::MembershipFunction;
    use crate::variable::{Term, Universe};

    fn input(name: &str) -> LinguisticVariable {
        LinguisticVariable::antecedent(
            name,
            Universe::new(0.0, 10.0, 1.0).unwrap(),
            vec![
                Term::new("low", MembershipFunction::triangular(0.0, 0.0, 5.0).unwrap()),
                Term::new("high", MembershipFunction::triangular(5.0, 10.0, 10.0).unwrap()),
            ],
        )
        .unwrap()
    }

    fn output() -> LinguisticVariable {
        LinguisticVariable::consequent(
            "out",
            Universe::new(0.0, 10.0, 1.0).unwrap(),
            vec![
                Term::new("bad", MembershipFunction::triangular(0.0, 0.0, 10.0).unwrap()),
                Term::new("good", MembershipFunction::triangular(0.0, 10.0, 10.0).unwrap()),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_builder() {
        let rule = Rule::when("a", "low").and("b", "high").then("out", "bad");
        assert_eq!(rule.antecedent().len(), 2);
        assert_eq!(rule.consequent(), &Clause::new("out", "bad"));
        assert_eq!(rule.weight(), 1.0);
        assert_eq!(rule.with_weight(0.5).weight(), 0.5);
    }

    #[test]
    fn test_rule_base_resolves() {
        let base = RuleBase::new(
            vec![input("a"), input("b"), input("unused")],
            output(),
            vec![
                Rule::when("b", "high").then("out", "good"),
                Rule::when("a", "low").and("b", "low").then("out", "bad"),
            ],
        )
        .unwrap();

        assert_eq!(base.len(), 2);
        assert_eq!(base.required_inputs(), vec!["a", "b"]);
        assert_eq!(base.resolved()[0].clauses[0], ResolvedClause { variable: 1, term: 1 });
        assert_eq!(base.resolved()[1].term, 0);
        assert_eq!(base.variables().count(), 4);
    }

    #[test]
    fn test_unknown_variable() {
        let err = RuleBase::new(
            vec![input("a")],
            output(),
            vec![Rule::when("z", "low").then("out", "bad")],
        )
        .unwrap_err();
        assert_eq!(err, ConfigurationError::UnknownVariable("z".to_string()));
    }

    #[test]
    fn test_unknown_terms() {
        let err = RuleBase::new(
            vec![input("a")],
            output(),
            vec![Rule::when("a", "medium").then("out", "bad")],
        )
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownTerm { .. }));

        let err = RuleBase::new(
            vec![input("a")],
            output(),
            vec![Rule::when("a", "low").then("out", "awful")],
        )
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownTerm { .. }));
    }

    #[test]
    fn test_mixed_consequents() {
        let err = RuleBase::new(
            vec![input("a")],
            output(),
            vec![
                Rule::when("a", "low").then("out", "bad"),
                Rule::when("a", "high").then("other", "good"),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::MixedConsequents { rule: 2, .. }));
    }

    #[test]
    fn test_consequent_in_antecedent() {
        let err = RuleBase::new(
            vec![input("a")],
            output(),
            vec![Rule::when("out", "bad").then("out", "good")],
        )
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::WrongRole { .. }));
    }

    #[test]
    fn test_structural_errors() {
        assert_eq!(
            RuleBase::new(vec![input("a")], output(), Vec::new()).unwrap_err(),
            ConfigurationError::EmptyRuleBase
        );
        assert_eq!(
            RuleBase::new(
                vec![input("a")],
                output(),
                vec![Rule::new(Vec::new(), Clause::new("out", "bad"))]
            )
            .unwrap_err(),
            ConfigurationError::EmptyAntecedent(1)
        );
        assert!(matches!(
            RuleBase::new(
                vec![input("a")],
                output(),
                vec![Rule::when("a", "low").then("out", "bad").with_weight(1.5)]
            ),
            Err(ConfigurationError::InvalidWeight { rule: 1, .. })
        ));
        assert!(matches!(
            RuleBase::new(
                vec![input("a"), input("a")],
                output(),
                vec![Rule::when("a", "low").then("out", "bad")]
            ),
            Err(ConfigurationError::DuplicateVariable(_))
        ));
    }

    #[test]
    fn test_roles_checked() {
        let err = RuleBase::new(
            vec![input("a")],
            input("b"),
            vec![Rule::when("a", "low").then("b", "low")],
        )
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::WrongRole { expected: "consequent", .. }));
    }
}
