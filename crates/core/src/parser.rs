//! Rule classification: recover operator and operand(s) from a rule string.
//!
//! This is pattern classification over the string, not a grammar parser.
//! The operator tests run in a fixed priority order; reordering them
//! changes which operator a given string is classified as. The order is:
//!
//! | test                      | operator      |
//! |---------------------------|---------------|
//! | `!` and `contains`        | `notcontains` |
//! | `contains`                | `contains`    |
//! | `like`                    | `regex`       |
//! | `!`, `>`, `<`, `=`        | `nbtw`        |
//! | `>`, `<`, `=`             | `btw`         |
//! | `>` and `=`               | `gte`         |
//! | `>`                       | `gt`          |
//! | `<` and `=`               | `lte`         |
//! | `<`                       | `lt`          |
//! | `!` and `=`               | `neq`         |
//! | `=`                       | `eq`          |

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::PelError;
use crate::operator::{ParsedRule, RuleInput, RuleOperator};

/// A finite decimal literal as `btw_rule` accepts it: ASCII digits only,
/// optional sign, fraction and exponent, never a bare `.`.
const NUMBER: &str = r"[-+]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][-+]?[0-9]+)?";

lazy_static! {
    /// Two numeric equality fragments: the signature left by range rules.
    static ref RANGE_BOUNDS: Regex =
        Regex::new(&format!(r"= \{{({n})\}}.* = \{{({n})\}}", n = NUMBER))
            .expect("range pattern is valid");
}

pub fn parse_operator(rule: &str) -> Result<RuleOperator, PelError> {
    let has = |needle: &str| rule.contains(needle);
    let not = has("!");
    let gt = has(">");
    let lt = has("<");
    let eq = has("=");

    let op = if not && has("contains") {
        RuleOperator::NotContains
    } else if has("contains") {
        RuleOperator::Contains
    } else if has("like") {
        RuleOperator::Regex
    } else if not && gt && lt && eq {
        RuleOperator::Nbtw
    } else if gt && lt && eq {
        RuleOperator::Btw
    } else if gt && eq {
        RuleOperator::Gte
    } else if gt {
        RuleOperator::Gt
    } else if lt && eq {
        RuleOperator::Lte
    } else if lt {
        RuleOperator::Lt
    } else if not && eq {
        RuleOperator::Neq
    } else if eq {
        RuleOperator::Eq
    } else {
        return Err(PelError::unrecognized(rule));
    };
    Ok(op)
}

/// Extract the operand(s) of a rule.
///
/// Range rules yield both captured bounds in the order they appear in the
/// string (upper bound first for rules built by `btw_rule`). Anything else
/// yields the text between the first `{` and the next `}`.
pub fn parse_input(rule: &str) -> Result<RuleInput, PelError> {
    if let Some(caps) = RANGE_BOUNDS.captures(rule) {
        return Ok(RuleInput::range(&caps[1], &caps[2]));
    }
    let start = rule.find('{').ok_or_else(|| PelError::unrecognized(rule))? + 1;
    let len = rule[start..]
        .find('}')
        .ok_or_else(|| PelError::unrecognized(rule))?;
    Ok(RuleInput::single(&rule[start..start + len]))
}

pub fn parse_rule(rule: &str) -> Result<ParsedRule, PelError> {
    Ok(ParsedRule {
        operator: parse_operator(rule)?,
        input: parse_input(rule)?,
    })
}

pub fn is_text_rule(rule: &str) -> bool {
    rule.contains("contains") || rule.contains("like")
}
