//! Replacement ids for duplicate or malformed parts.

use std::collections::BTreeSet;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

lazy_static! {
    static ref DISALLOWED: Regex = Regex::new(r"[^A-Za-z0-9_]").expect("id filter pattern is valid");
}

/// Derive an id from `id` that is not in `blacklist`.
///
/// Characters outside `[A-Za-z0-9_]` are dropped first. While the candidate
/// collides, a trailing digit is bumped by one (rendered in decimal, so `9`
/// becomes `10`) and any other trailing character gets a `1` appended.
/// Only the last digit is ever bumped: a colliding `a99` becomes `a910`.
pub fn suggest_id(id: &str, blacklist: &BTreeSet<String>) -> String {
    let mut candidate = DISALLOWED.replace_all(id, "").into_owned();
    while blacklist.contains(&candidate) {
        trace!(candidate = %candidate, "suggestion collides");
        match candidate.chars().last().and_then(|c| c.to_digit(10)) {
            Some(digit) => {
                candidate.pop();
                candidate.push_str(&(digit + 1).to_string());
            }
            None => candidate.push('1'),
        }
    }
    trace!(from = %id, to = %candidate, "suggested id");
    candidate
}
