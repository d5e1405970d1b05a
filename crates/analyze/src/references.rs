//! Reference checks over a screen's rules and initial state.
//!
//! State paths look like `stage.<part>.<property>`, `variables.<name>`,
//! `app.<app>.<property>` or `session.<key>`. A path is valid when its id
//! segment names something that exists in the deck.

use std::collections::BTreeSet;

use adaptivity_core::{visit_nodes, ConditionNode, ConditionValue};
use lazy_static::lazy_static;
use regex::Regex;

use crate::deck::{Action, AdaptivityRule, Screen};
use crate::hierarchy::Hierarchy;
use crate::report::{DiagnosticCheck, ReferenceProblem};

lazy_static! {
    static ref SCOPE: Regex = Regex::new(r"app|variables|stage|session").expect("scope pattern is valid");
}

const BROKEN_NAVIGATION_FIX: &str = "Screen does not exist, fix navigate to.";

/// Whether `target` names a state path that resolves against `known` ids.
///
/// Anything before the first scope keyword is ignored, so
/// `q1|stage.answer.value` validates as `stage.answer.value`.
pub fn validate_target(target: &str, known: &BTreeSet<String>) -> bool {
    let Some(found) = SCOPE.find(target) else {
        return false;
    };
    let mut segments = target[found.start()..].split('.');
    let scope = segments.next().unwrap_or("");
    let id = match segments.next() {
        Some(id) if !id.is_empty() => id,
        _ => return false,
    };
    match scope {
        "app" => id == "active" || known.contains(id),
        "variables" | "stage" => known.contains(id),
        "session" => true,
        _ => false,
    }
}

/// Reference problems on one screen for the selected `checks`.
///
/// Problems come out grouped by check, in [`DiagnosticCheck::ALL`] order,
/// and within a check in rule and condition order.
pub fn screen_problems(
    screen: &Screen,
    hierarchy: &Hierarchy,
    known: &BTreeSet<String>,
    checks: &BTreeSet<DiagnosticCheck>,
) -> Vec<ReferenceProblem> {
    let mut problems = Vec::new();
    for check in DiagnosticCheck::ALL {
        if !checks.contains(&check) {
            continue;
        }
        match check {
            DiagnosticCheck::BrokenNavigation => {
                broken_navigation(screen, hierarchy, &mut problems)
            }
            DiagnosticCheck::InvalidMutateTarget => invalid_mutations(screen, known, &mut problems),
            DiagnosticCheck::InvalidInitTarget => invalid_init_facts(screen, known, &mut problems),
            DiagnosticCheck::InvalidConditionTarget | DiagnosticCheck::InvalidConditionValue => {
                for rule in &screen.rules {
                    condition_problems(rule, check, known, &mut problems);
                }
            }
            DiagnosticCheck::Duplicate | DiagnosticCheck::Pattern => {}
        }
    }
    problems
}

fn rule_problem(check: DiagnosticCheck, rule: &AdaptivityRule) -> ReferenceProblem {
    ReferenceProblem {
        check,
        rule_id: Some(rule.id.clone()),
        condition_id: None,
        fact_id: None,
        target: None,
        suggested_fix: String::new(),
    }
}

fn broken_navigation(screen: &Screen, hierarchy: &Hierarchy, out: &mut Vec<ReferenceProblem>) {
    for rule in &screen.rules {
        for action in &rule.actions {
            let Action::Navigation { params } = action else {
                continue;
            };
            let Some(target) = params.target.as_deref() else {
                continue;
            };
            if target.is_empty() || target == "next" || hierarchy.contains(target) {
                continue;
            }
            out.push(ReferenceProblem {
                target: Some(target.to_string()),
                suggested_fix: BROKEN_NAVIGATION_FIX.to_string(),
                ..rule_problem(DiagnosticCheck::BrokenNavigation, rule)
            });
        }
    }
}

fn invalid_mutations(screen: &Screen, known: &BTreeSet<String>, out: &mut Vec<ReferenceProblem>) {
    for rule in &screen.rules {
        for action in &rule.actions {
            let Action::MutateState { params } = action else {
                continue;
            };
            let target = params.target.as_deref().unwrap_or("");
            if validate_target(target, known) {
                continue;
            }
            out.push(ReferenceProblem {
                target: Some(target.to_string()),
                ..rule_problem(DiagnosticCheck::InvalidMutateTarget, rule)
            });
        }
    }
}

fn invalid_init_facts(screen: &Screen, known: &BTreeSet<String>, out: &mut Vec<ReferenceProblem>) {
    for fact in &screen.facts {
        if validate_target(&fact.target, known) {
            continue;
        }
        out.push(ReferenceProblem {
            check: DiagnosticCheck::InvalidInitTarget,
            rule_id: None,
            condition_id: None,
            fact_id: Some(fact.id.clone()),
            target: Some(fact.target.clone()),
            suggested_fix: String::new(),
        });
    }
}

fn condition_problems(
    rule: &AdaptivityRule,
    check: DiagnosticCheck,
    known: &BTreeSet<String>,
    out: &mut Vec<ReferenceProblem>,
) {
    let Some(root) = rule.conditions.as_ref() else {
        return;
    };
    visit_nodes(std::slice::from_ref(root), |node| {
        let ConditionNode::Leaf(leaf) = node else {
            return;
        };
        let flagged = match check {
            DiagnosticCheck::InvalidConditionTarget => !validate_target(&leaf.fact, known),
            DiagnosticCheck::InvalidConditionValue => {
                matches!(leaf.value, Some(ConditionValue::Null))
            }
            _ => false,
        };
        if flagged {
            out.push(ReferenceProblem {
                condition_id: Some(leaf.id.clone()),
                target: Some(leaf.fact.clone()),
                ..rule_problem(check, rule)
            });
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::Deck;
    use serde_json::json;

    fn known() -> BTreeSet<String> {
        ["answer", "calculator", "score"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn stage_and_variables_need_known_ids() {
        assert!(validate_target("stage.answer.value", &known()));
        assert!(!validate_target("stage.missing.value", &known()));
        assert!(validate_target("variables.score", &known()));
        assert!(!validate_target("variables.bonus", &known()));
    }

    #[test]
    fn app_accepts_active() {
        assert!(validate_target("app.active.visible", &known()));
        assert!(validate_target("app.calculator.open", &known()));
        assert!(!validate_target("app.ghost.open", &known()));
    }

    #[test]
    fn session_accepts_any_key() {
        assert!(validate_target("session.tutorialScore", &known()));
        assert!(!validate_target("session", &known()));
        assert!(!validate_target("session.", &known()));
    }

    #[test]
    fn prefix_before_scope_is_ignored() {
        assert!(validate_target("q1|stage.answer.value", &known()));
    }

    #[test]
    fn unscoped_targets_are_invalid() {
        assert!(!validate_target("answer.value", &known()));
        assert!(!validate_target("", &known()));
    }

    fn screen_deck() -> Deck {
        Deck::from_json(&json!({
            "screens": [
                { "id": "q2" },
                {
                    "id": "q1",
                    "parts": [ { "id": "answer" } ],
                    "rules": [{
                        "id": "r1",
                        "conditions": { "any": [
                            { "id": "c1", "fact": "stage.answer.value", "operator": "equal", "value": null },
                            { "id": "g", "all": [
                                { "id": "c2", "fact": "stage.gone.value", "operator": "equal", "value": "x" }
                            ]}
                        ]},
                        "actions": [
                            { "type": "navigation", "params": { "target": "next" } },
                            { "type": "navigation", "params": { "target": "q2" } },
                            { "type": "navigation", "params": { "target": "q9" } },
                            { "type": "mutateState", "params": { "target": "variables.nope", "operator": "=", "value": 1 } }
                        ]
                    }],
                    "facts": [ { "id": "f1", "target": "stage.nothing.enabled", "value": true } ]
                }
            ],
            "variables": ["score"]
        }))
        .unwrap()
    }

    #[test]
    fn each_check_finds_its_problem() {
        let deck = screen_deck();
        let hierarchy = deck.hierarchy();
        let known = deck.known_ids();
        let screen = deck.screen("q1").unwrap();
        let all: BTreeSet<DiagnosticCheck> = DiagnosticCheck::ALL.into_iter().collect();

        let problems = screen_problems(screen, &hierarchy, &known, &all);
        let checks: Vec<DiagnosticCheck> = problems.iter().map(|p| p.check).collect();
        assert_eq!(
            checks,
            [
                DiagnosticCheck::BrokenNavigation,
                DiagnosticCheck::InvalidMutateTarget,
                DiagnosticCheck::InvalidInitTarget,
                DiagnosticCheck::InvalidConditionTarget,
                DiagnosticCheck::InvalidConditionValue,
            ]
        );
        assert_eq!(problems[0].target.as_deref(), Some("q9"));
        assert_eq!(problems[0].suggested_fix, BROKEN_NAVIGATION_FIX);
        assert_eq!(problems[2].fact_id.as_deref(), Some("f1"));
        assert_eq!(problems[3].condition_id.as_deref(), Some("c2"));
        assert_eq!(problems[4].condition_id.as_deref(), Some("c1"));
    }

    #[test]
    fn only_explicit_null_values_are_flagged() {
        let deck = Deck::from_json(&json!({
            "screens": [{
                "id": "q1",
                "parts": [ { "id": "answer" } ],
                "rules": [{
                    "id": "r1",
                    "conditions": { "all": [
                        { "id": "absent", "fact": "stage.answer.value", "operator": "equal" },
                        { "id": "null", "fact": "stage.answer.value", "operator": "equal", "value": null },
                        { "id": "object", "fact": "stage.answer.value", "operator": "equal", "value": { "k": 1 } },
                        { "id": "zero", "fact": "stage.answer.value", "operator": "equal", "value": 0 }
                    ]}
                }]
            }]
        }))
        .unwrap();
        let only: BTreeSet<DiagnosticCheck> =
            [DiagnosticCheck::InvalidConditionValue].into_iter().collect();
        let problems = screen_problems(
            deck.screen("q1").unwrap(),
            &deck.hierarchy(),
            &deck.known_ids(),
            &only,
        );
        let ids: Vec<&str> = problems
            .iter()
            .filter_map(|p| p.condition_id.as_deref())
            .collect();
        assert_eq!(ids, ["null"]);
    }

    #[test]
    fn unselected_checks_do_not_run() {
        let deck = screen_deck();
        let only: BTreeSet<DiagnosticCheck> = [DiagnosticCheck::InvalidInitTarget].into_iter().collect();
        let problems = screen_problems(
            deck.screen("q1").unwrap(),
            &deck.hierarchy(),
            &deck.known_ids(),
            &only,
        );
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].check, DiagnosticCheck::InvalidInitTarget);
    }
}
