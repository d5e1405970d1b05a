//! Rule builders: produce predicate expression strings.
//!
//! The produced string is the stored form of a grading rule, so these
//! functions fix the exact spelling (spacing, brace and parenthesis
//! placement) that `parser` classifies. Compound operators (lte, gte,
//! btw, nbtw) are composed from `=`, `<`, `>` and the combinators.

use crate::error::PelError;
use crate::operator::{RuleInput, RuleOperator};

// ── Combinators ──────────────────────────────────────────────────────

pub fn invert(rule: &str) -> String {
    format!("(!({}))", rule)
}

/// Conjunction, left-reduced: each further operand is prefixed in front of
/// the parenthesized accumulator. `and(&[a, b, c])` is `c && (b && (a))`.
pub fn and<S: AsRef<str>>(rules: &[S]) -> String {
    reduce(rules, "&&")
}

/// Disjunction, same shape as [`and`].
pub fn or<S: AsRef<str>>(rules: &[S]) -> String {
    reduce(rules, "||")
}

fn reduce<S: AsRef<str>>(rules: &[S], op: &str) -> String {
    let mut iter = rules.iter();
    let Some(first) = iter.next() else {
        return String::new();
    };
    iter.fold(first.as_ref().to_owned(), |acc, rule| {
        format!("{} {} ({})", rule.as_ref(), op, acc)
    })
}

// ── Text comparisons ─────────────────────────────────────────────────

pub fn match_rule(value: &str) -> String {
    format!("input like {{{}}}", value)
}

pub fn contains_rule(value: &str) -> String {
    format!("input contains {{{}}}", value)
}

pub fn not_contains_rule(value: &str) -> String {
    invert(&contains_rule(value))
}

// ── Numeric comparisons ──────────────────────────────────────────────

pub fn eq_rule(value: &str) -> String {
    format!("input = {{{}}}", value)
}

pub fn neq_rule(value: &str) -> String {
    invert(&eq_rule(value))
}

pub fn lt_rule(value: &str) -> String {
    format!("input < {{{}}}", value)
}

pub fn gt_rule(value: &str) -> String {
    format!("input > {{{}}}", value)
}

pub fn lte_rule(value: &str) -> String {
    or(&[lt_rule(value), eq_rule(value)])
}

pub fn gte_rule(value: &str) -> String {
    or(&[gt_rule(value), eq_rule(value)])
}

// ── Ranges ───────────────────────────────────────────────────────────

/// Inclusive range. The bound with the smaller numeric value comes first;
/// both are emitted exactly as given, so `"3.50"` stays `3.50`.
///
/// If either bound is not a finite number the rule degenerates to the
/// range `[0, 0]`; callers that care must validate bounds beforehand.
pub fn btw_rule(left: &str, right: &str) -> String {
    let (lo, hi) = match (parse_bound(left), parse_bound(right)) {
        (Some(a), Some(b)) if a < b => (left, right),
        (Some(_), Some(_)) => (right, left),
        _ => ("0", "0"),
    };
    and(&[
        or(&[gt_rule(lo), eq_rule(lo)]),
        or(&[lt_rule(hi), eq_rule(hi)]),
    ])
}

pub fn nbtw_rule(left: &str, right: &str) -> String {
    invert(&btw_rule(left, right))
}

fn parse_bound(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

// ── Dispatch ─────────────────────────────────────────────────────────

/// Build the rule for an operator name and its operand(s).
pub fn make_rule(operator: &str, input: &RuleInput) -> Result<String, PelError> {
    let op: RuleOperator = operator
        .parse()
        .map_err(|_| PelError::unsupported(operator, input.shape()))?;
    make_rule_for(op, input)
}

/// Typed variant of [`make_rule`].
pub fn make_rule_for(operator: RuleOperator, input: &RuleInput) -> Result<String, PelError> {
    let rule = match (operator, input) {
        (RuleOperator::Gt, RuleInput::Single(v)) => gt_rule(v),
        (RuleOperator::Gte, RuleInput::Single(v)) => gte_rule(v),
        (RuleOperator::Lt, RuleInput::Single(v)) => lt_rule(v),
        (RuleOperator::Lte, RuleInput::Single(v)) => lte_rule(v),
        (RuleOperator::Eq, RuleInput::Single(v)) => eq_rule(v),
        (RuleOperator::Neq, RuleInput::Single(v)) => neq_rule(v),
        (RuleOperator::Contains, RuleInput::Single(v)) => contains_rule(v),
        (RuleOperator::NotContains, RuleInput::Single(v)) => not_contains_rule(v),
        (RuleOperator::Regex, RuleInput::Single(v)) => match_rule(v),
        (RuleOperator::Btw, RuleInput::Range(a, b)) => btw_rule(a, b),
        (RuleOperator::Nbtw, RuleInput::Range(a, b)) => nbtw_rule(a, b),
        (op, input) => return Err(PelError::unsupported(op.as_str(), input.shape())),
    };
    Ok(rule)
}

// ── Choice lists ─────────────────────────────────────────────────────

/// Exact-set match: every id of `to_match` is matched and every other id
/// of `all` is explicitly not matched.
pub fn match_list_rule<S: AsRef<str>>(all: &[S], to_match: &[S]) -> String {
    let selected: Vec<&str> = to_match.iter().map(AsRef::as_ref).collect();
    let rules: Vec<String> = selected
        .iter()
        .map(|id| match_rule(id))
        .chain(
            all.iter()
                .map(AsRef::as_ref)
                .filter(|id| !selected.contains(id))
                .map(|id| invert(&match_rule(id))),
        )
        .collect();
    and(&rules)
}

/// Order-sensitive match of the space-joined ids.
pub fn match_in_order_rule<S: AsRef<str>>(ordered: &[S]) -> String {
    let joined: Vec<&str> = ordered.iter().map(AsRef::as_ref).collect();
    match_rule(&joined.join(" "))
}

pub fn is_catch_all(rule: &str) -> bool {
    rule == ".*"
}
