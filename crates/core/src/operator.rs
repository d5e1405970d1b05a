//! Operator tags and operand shapes shared by the rule builders and parsers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PelError;

/// Logical operator of a grading rule.
///
/// The lowercase string form is what authoring surfaces store next to a
/// rule, so it must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleOperator {
    Gt,
    Gte,
    Lt,
    Lte,
    Eq,
    Neq,
    Contains,
    NotContains,
    Regex,
    Btw,
    Nbtw,
}

impl RuleOperator {
    pub const ALL: [RuleOperator; 11] = [
        RuleOperator::Gt,
        RuleOperator::Gte,
        RuleOperator::Lt,
        RuleOperator::Lte,
        RuleOperator::Eq,
        RuleOperator::Neq,
        RuleOperator::Contains,
        RuleOperator::NotContains,
        RuleOperator::Regex,
        RuleOperator::Btw,
        RuleOperator::Nbtw,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RuleOperator::Gt => "gt",
            RuleOperator::Gte => "gte",
            RuleOperator::Lt => "lt",
            RuleOperator::Lte => "lte",
            RuleOperator::Eq => "eq",
            RuleOperator::Neq => "neq",
            RuleOperator::Contains => "contains",
            RuleOperator::NotContains => "notcontains",
            RuleOperator::Regex => "regex",
            RuleOperator::Btw => "btw",
            RuleOperator::Nbtw => "nbtw",
        }
    }

    /// Range operators take a `(lower, upper)` pair; all others a single value.
    pub fn is_range(self) -> bool {
        matches!(self, RuleOperator::Btw | RuleOperator::Nbtw)
    }
}

impl fmt::Display for RuleOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleOperator {
    type Err = PelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RuleOperator::ALL
            .iter()
            .copied()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| PelError::unsupported(s, "any"))
    }
}

/// Operand(s) of a rule: one value, or the two bounds of a range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleInput {
    Single(String),
    Range(String, String),
}

impl RuleInput {
    pub fn single(value: impl Into<String>) -> Self {
        RuleInput::Single(value.into())
    }

    pub fn range(lower: impl Into<String>, upper: impl Into<String>) -> Self {
        RuleInput::Range(lower.into(), upper.into())
    }

    pub fn shape(&self) -> &'static str {
        match self {
            RuleInput::Single(_) => "single",
            RuleInput::Range(..) => "range",
        }
    }
}

impl fmt::Display for RuleInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleInput::Single(v) => f.write_str(v),
            RuleInput::Range(a, b) => write!(f, "{}, {}", a, b),
        }
    }
}

/// Result of classifying a rule string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedRule {
    pub operator: RuleOperator,
    pub input: RuleInput,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_names_round_trip() {
        for op in RuleOperator::ALL {
            assert_eq!(op.as_str().parse::<RuleOperator>().unwrap(), op);
        }
    }

    #[test]
    fn unknown_operator_name_is_unsupported() {
        let err = "equals".parse::<RuleOperator>().unwrap_err();
        assert!(matches!(err, PelError::UnsupportedOperator { .. }));
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&RuleOperator::NotContains).unwrap();
        assert_eq!(json, "\"notcontains\"");
    }

    #[test]
    fn input_serializes_as_string_or_pair() {
        assert_eq!(
            serde_json::to_value(RuleInput::single("3")).unwrap(),
            serde_json::json!("3")
        );
        assert_eq!(
            serde_json::to_value(RuleInput::range("1", "2")).unwrap(),
            serde_json::json!(["1", "2"])
        );
    }
}
