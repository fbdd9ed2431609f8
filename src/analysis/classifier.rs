//! Lifecycle state classification.
//!
//! Guards are matched textually against an ordered rule table. This is a
//! pattern matcher, not an expression evaluator: the pattern may appear
//! anywhere in a guard, including inside a larger boolean expression.

use serde_yaml::Value;

use super::model::LifecycleState;
use crate::loader::scalar_text;

/// One entry of the classification table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateRule {
    /// Literal text that must appear in a guard expression
    pub pattern: String,

    /// State assigned when the pattern matches
    pub state: LifecycleState,
}

impl StateRule {
    /// Create a rule.
    pub fn new(pattern: impl Into<String>, state: LifecycleState) -> Self {
        Self { pattern: pattern.into(), state }
    }

    /// Whether any guard expression contains this rule's pattern.
    pub fn matches<S: AsRef<str>>(&self, guards: &[S]) -> bool {
        guards.iter().any(|g| g.as_ref().contains(&self.pattern))
    }
}

/// Classifies guards into lifecycle states and extracts guard variables.
#[derive(Debug, Clone)]
pub struct StateClassifier {
    /// Rules evaluated in order; the first match wins
    rules: Vec<StateRule>,

    /// Marker identifying role variables in guards
    variable_prefix: String,
}

impl StateClassifier {
    /// Build the table for `<state_variable> == present` then
    /// `<state_variable> == absent`.
    pub fn new(state_variable: &str, variable_prefix: impl Into<String>) -> Self {
        let rules = LifecycleState::TRACKED
            .iter()
            .map(|&state| StateRule::new(format!("{state_variable} == {state}"), state))
            .collect();

        Self { rules, variable_prefix: variable_prefix.into() }
    }

    /// Build a classifier from an explicit rule table.
    pub fn with_rules(rules: Vec<StateRule>, variable_prefix: impl Into<String>) -> Self {
        Self { rules, variable_prefix: variable_prefix.into() }
    }

    /// The rule table in evaluation order.
    pub fn rules(&self) -> &[StateRule] {
        &self.rules
    }

    /// The variable prefix marker.
    pub fn variable_prefix(&self) -> &str {
        &self.variable_prefix
    }

    /// Classify a task from its normalized guard expressions.
    pub fn classify<S: AsRef<str>>(&self, guards: &[S]) -> LifecycleState {
        self.rules
            .iter()
            .find(|rule| rule.matches(guards))
            .map_or(LifecycleState::Unknown, |rule| rule.state)
    }

    /// Role variables named by the guards.
    ///
    /// Only the first whitespace-delimited token of each expression is
    /// considered, so `foo and influxdb_x == present` yields nothing.
    pub fn guard_variables<'a, S: AsRef<str>>(
        &'a self,
        guards: &'a [S],
    ) -> impl Iterator<Item = &'a str> + 'a {
        guards.iter().filter_map(move |guard| {
            let guard = guard.as_ref();
            if !guard.contains(self.variable_prefix.as_str()) {
                return None;
            }
            guard.split_whitespace().next().filter(|token| token.starts_with(&self.variable_prefix))
        })
    }
}

impl Default for StateClassifier {
    fn default() -> Self {
        Self::new("influxdb_state", "influxdb_")
    }
}

/// Normalize a raw `when` value into guard expressions.
///
/// A string becomes a single expression; a sequence contributes each scalar
/// item; anything else (including a missing field) yields no expressions.
pub fn normalize_guard(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Sequence(items)) => items.iter().filter_map(scalar_text).collect(),
        _ => Vec::new(),
    }
}
