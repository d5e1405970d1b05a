/// Errors raised while building or classifying predicate expressions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PelError {
    /// The rule string matches none of the operator classifications,
    /// or carries no `{value}` fragment.
    #[error("unrecognized rule: '{rule}'")]
    UnrecognizedRule { rule: String },

    /// The operator name is unknown, or the input shape does not fit it
    /// (`btw`/`nbtw` need a pair, everything else a single value).
    #[error("unsupported operator '{operator}' for {shape} input")]
    UnsupportedOperator { operator: String, shape: String },
}

impl PelError {
    pub fn unrecognized(rule: &str) -> Self {
        PelError::UnrecognizedRule {
            rule: rule.to_owned(),
        }
    }

    pub fn unsupported(operator: &str, shape: &str) -> Self {
        PelError::UnsupportedOperator {
            operator: operator.to_owned(),
            shape: shape.to_owned(),
        }
    }

    /// Serialize to the JSON error object printed by the CLI.
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "error":   self.kind(),
            "message": self.to_string(),
        })
    }

    fn kind(&self) -> &'static str {
        match self {
            PelError::UnrecognizedRule { .. } => "unrecognized_rule",
            PelError::UnsupportedOperator { .. } => "unsupported_operator",
        }
    }
}

/// Errors raised while decoding a condition node from its stored JSON form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConditionError {
    #[error("condition group '{id}' has both 'all' and 'any' children")]
    AmbiguousGroup { id: String },

    #[error("condition '{id}' is neither a group ('all'/'any') nor a fact comparison")]
    NotACondition { id: String },

    #[error("condition '{id}' is missing required field '{field}'")]
    MissingField { id: String, field: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_operator_message_names_shape() {
        let e = PelError::unsupported("btw", "single");
        assert_eq!(e.to_string(), "unsupported operator 'btw' for single input");
    }

    #[test]
    fn json_value_carries_kind_and_message() {
        let v = PelError::unrecognized("foo").to_json_value();
        assert_eq!(v["error"], "unrecognized_rule");
        assert_eq!(v["message"], "unrecognized rule: 'foo'");
    }
}
