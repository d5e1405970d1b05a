//! adaptivity-analyze: diagnostics over adaptive lesson decks.
//!
//! The analyzer consumes deck JSON, rebuilds the screen hierarchy from
//! `layer_ref` links, and runs two families of checks:
//!
//! - identifier checks (`duplicate`, `pattern`) that flag part ids needing a
//!   rename and suggest one that is safe within the screen's lineage;
//! - reference checks that flag navigation, state mutation, initial state
//!   and condition paths pointing at things the deck does not contain.
//!
//! Results are aggregated into a [`DiagnosticReport`].

pub mod deck;
pub mod hierarchy;
pub mod identifiers;
pub mod references;
pub mod report;
pub mod suggest;

use std::collections::BTreeSet;

use tracing::debug;

pub use deck::{
    Action, AdaptivityRule, AnalysisError, Deck, EverApp, InitFact, MutateParams,
    NavigationParams, PartRef, Screen,
};
pub use hierarchy::{blacklist, Hierarchy, HierarchyEntry, Part, PartCatalog};
pub use identifiers::{diagnose, find_duplicates, find_malformed};
pub use references::validate_target;
pub use report::{
    DiagnosticCheck, DiagnosticRecord, DiagnosticReport, Finding, FindingSeverity, Problem,
    ReferenceProblem,
};
pub use suggest::suggest_id;

/// Run every check on a deck JSON document.
pub fn analyze(deck: &serde_json::Value) -> Result<DiagnosticReport, AnalysisError> {
    let deck = Deck::from_json(deck)?;
    Ok(analyze_deck(&deck, &DiagnosticCheck::ALL))
}

/// Run the named checks on a deck JSON document.
///
/// Valid names: "duplicate", "pattern", "broken_navigation",
/// "invalid_mutate_target", "invalid_init_target",
/// "invalid_condition_target", "invalid_condition_value".
///
/// An empty list is an error rather than a clean report.
pub fn analyze_selected(
    deck: &serde_json::Value,
    checks: &[&str],
) -> Result<DiagnosticReport, AnalysisError> {
    if checks.iter().all(|name| name.trim().is_empty()) {
        return Err(AnalysisError::NoChecks {
            valid: DiagnosticCheck::valid_names(),
        });
    }
    let checks = checks
        .iter()
        .map(|name| name.trim().parse::<DiagnosticCheck>())
        .collect::<Result<Vec<_>, _>>()?;
    let deck = Deck::from_json(deck)?;
    Ok(analyze_deck(&deck, &checks))
}

/// Run `checks` on an already parsed deck. Never fails.
pub fn analyze_deck(deck: &Deck, checks: &[DiagnosticCheck]) -> DiagnosticReport {
    let selected: BTreeSet<DiagnosticCheck> = checks.iter().copied().collect();
    let hierarchy = deck.hierarchy();
    let catalog = deck.part_catalog();
    let known = deck.known_ids();
    let check_duplicates = selected.contains(&DiagnosticCheck::Duplicate);
    let check_pattern = selected.contains(&DiagnosticCheck::Pattern);
    let any_reference_check = selected.iter().any(|c| !c.is_identifier_check());

    let mut report = DiagnosticReport::new();
    report.checks_run = DiagnosticCheck::ALL
        .iter()
        .filter(|c| selected.contains(*c))
        .map(|c| c.as_str().to_string())
        .collect();

    for id in hierarchy.ids() {
        let mut record = DiagnosticRecord::new(id);
        let (duplicates, malformed) =
            identifiers::screen_problems(&hierarchy, &catalog, id, check_duplicates, check_pattern);
        record.duplicates = duplicates;
        record.malformed = malformed;
        if any_reference_check {
            if let Some(screen) = deck.screen(id) {
                record.references =
                    references::screen_problems(screen, &hierarchy, &known, &selected);
            }
        }
        if record.is_empty() {
            continue;
        }
        debug!(
            screen = id,
            duplicates = record.duplicates.len(),
            malformed = record.malformed.len(),
            references = record.references.len(),
            "screen has problems"
        );
        report.records.push(record);
    }

    report.extract_findings();
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_test_deck() -> serde_json::Value {
        json!({
            "screens": [
                {
                    "id": "layer",
                    "parts": [ { "id": "header", "type": "janus-text-flow" } ]
                },
                {
                    "id": "q1",
                    "layer_ref": "layer",
                    "parts": [
                        { "id": "header", "type": "janus-text-flow", "inherited": true, "owner": "layer" },
                        { "id": "input_1", "type": "janus-input-number" },
                        { "id": "input_1", "type": "janus-input-number" },
                        { "id": "bad id!", "type": "janus-mcq" }
                    ],
                    "rules": [{
                        "id": "r1",
                        "conditions": { "all": [
                            { "id": "c1", "fact": "stage.input_1.value", "operator": "greaterThan", "value": 3.5 }
                        ]},
                        "actions": [ { "type": "navigation", "params": { "target": "missing" } } ]
                    }]
                },
                { "id": "q2", "layer_ref": "layer", "parts": [ { "id": "ok" } ] }
            ]
        })
    }

    #[test]
    fn test_analyze_runs_all_checks() {
        let report = analyze(&make_test_deck()).unwrap();
        assert_eq!(report.checks_run.len(), DiagnosticCheck::ALL.len());
        assert_eq!(report.records.len(), 1);
        let record = &report.records[0];
        assert_eq!(record.node, "q1");
        assert_eq!(record.duplicates.len(), 2);
        assert_eq!(record.malformed.len(), 1);
        assert_eq!(record.malformed[0].suggested_fix, "badid");
        assert_eq!(record.references.len(), 1);
        assert_eq!(report.problem_count, 4);
        assert_eq!(report.findings.len(), 4);
    }

    #[test]
    fn test_analyze_selected_limits_checks() {
        let report = analyze_selected(&make_test_deck(), &["pattern"]).unwrap();
        assert_eq!(report.checks_run, vec!["pattern"]);
        assert_eq!(report.problem_count, 1);
        assert!(report.records[0].duplicates.is_empty());
        assert!(report.records[0].references.is_empty());
    }

    #[test]
    fn test_analyze_selected_unknown_check() {
        let err = analyze_selected(&make_test_deck(), &["duplicate", "spelling"]).unwrap_err();
        assert!(matches!(err, AnalysisError::UnknownCheck { ref name, .. } if name == "spelling"));
    }

    #[test]
    fn test_analyze_selected_rejects_empty_selection() {
        let err = analyze_selected(&make_test_deck(), &[]).unwrap_err();
        assert!(matches!(err, AnalysisError::NoChecks { .. }));
        let err = analyze_selected(&make_test_deck(), &[" "]).unwrap_err();
        assert!(err.to_string().starts_with("no checks selected"));
    }

    #[test]
    fn test_analyze_invalid_deck() {
        let err = analyze(&json!({ "pages": [] })).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidDeck(_)));
    }

    #[test]
    fn test_object_condition_value_is_accepted() {
        let deck = json!({
            "screens": [{
                "id": "q1",
                "parts": [ { "id": "dropdown" } ],
                "rules": [{
                    "id": "r1",
                    "conditions": { "any": [
                        { "id": "c1", "fact": "stage.dropdown.selected", "operator": "equal",
                          "value": { "id": "opt1", "label": "First" } }
                    ]}
                }]
            }]
        });
        let report = analyze(&deck).unwrap();
        assert!(report.records.is_empty(), "unexpected: {:?}", report.records);
    }

    #[test]
    fn test_checks_run_in_canonical_order() {
        let report =
            analyze_selected(&make_test_deck(), &["broken_navigation", "duplicate"]).unwrap();
        assert_eq!(report.checks_run, vec!["duplicate", "broken_navigation"]);
    }

    #[test]
    fn test_report_serializes() {
        let report = analyze(&make_test_deck()).unwrap();
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["problem_count"], json!(4));
        assert_eq!(value["records"][0]["node"], json!("q1"));
        assert_eq!(
            value["records"][0]["references"][0]["check"],
            json!("broken_navigation")
        );
    }
}
