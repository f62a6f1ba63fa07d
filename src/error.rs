//! Error types for canis
//!
//! Configuration problems are fatal for a run; inference problems are scoped
//! to a single sample and are recovered by the reporter.

use thiserror::Error;

/// Result type alias for canis operations
pub type Result<T> = std::result::Result<T, CanisError>;

/// Main error type for canis operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CanisError {
    /// Invalid setup: variables, rules, inputs or report layout
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// A single sample could not be classified
    #[error("Inference error: {0}")]
    Inference(#[from] InferenceError),
}

impl CanisError {
    /// Whether this error only affects the sample that produced it.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CanisError::Inference(_))
    }
}

/// Malformed variable definitions, rule references or inputs
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// A membership function parameter is out of range
    #[error("Invalid {shape} parameter: {reason}")]
    InvalidParameter { shape: &'static str, reason: String },

    /// Universe bounds enclose no sample point
    #[error("Empty universe: [{start}, {end}]")]
    EmptyUniverse { start: f64, end: f64 },

    /// Universe bounds or step are unusable
    #[error("Invalid universe: {reason}")]
    InvalidUniverse { reason: String },

    /// Variable declared without terms
    #[error("Variable '{variable}' has no terms")]
    NoTerms { variable: String },

    /// Two terms share a name
    #[error("Duplicate term '{term}' in variable '{variable}'")]
    DuplicateTerm { variable: String, term: String },

    /// Two variables share a name
    #[error("Duplicate variable '{0}'")]
    DuplicateVariable(String),

    /// Rule references a variable nobody declared
    #[error("Unknown variable '{0}'")]
    UnknownVariable(String),

    /// Rule references a term the variable does not have
    #[error("Unknown term '{term}' for variable '{variable}'")]
    UnknownTerm { variable: String, term: String },

    /// Variable used in the wrong position of a rule
    #[error("Variable '{variable}' cannot be used as {expected}")]
    WrongRole {
        variable: String,
        expected: &'static str,
    },

    /// Rule concludes on a different output than the rest of the base
    #[error("Rule {rule} concludes on '{found}' but the rule base output is '{expected}'")]
    MixedConsequents {
        rule: usize,
        expected: String,
        found: String,
    },

    /// Configuration must declare exactly one output variable
    #[error("Expected exactly one consequent variable, found {0}")]
    ConsequentCount(usize),

    /// Rule base built from no rules
    #[error("Rule base has no rules")]
    EmptyRuleBase,

    /// Rule without antecedent clauses
    #[error("Rule {0} has no antecedent clauses")]
    EmptyAntecedent(usize),

    /// Rule weight outside [0, 1]
    #[error("Rule {rule} has invalid weight {weight}")]
    InvalidWeight { rule: usize, weight: f64 },

    /// A variable referenced by the rule base was not assigned
    #[error("missing input for variable '{0}'")]
    MissingInput(String),

    /// Input value is NaN or infinite
    #[error("Input for variable '{variable}' is not finite: {value}")]
    NonFiniteInput { variable: String, value: f64 },

    /// Distribution sampled on a different universe
    #[error("Distribution has {actual} points, universe of '{variable}' has {expected}")]
    DistributionLength {
        variable: String,
        expected: usize,
        actual: usize,
    },

    /// Daily summary slot count does not partition a day
    #[error("Slot count {0} must be a divisor of 1440")]
    InvalidSlotCount(usize),
}

/// Per-sample inference failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    /// No rule fired with nonzero strength
    #[error("degenerate output distribution for '{variable}'")]
    DegenerateOutput { variable: String },
}
