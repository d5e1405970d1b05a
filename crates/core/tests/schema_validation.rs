//! Validates serialized condition trees against the stored-form schema at
//! schema/condition-tree.schema.json.

use std::path::{Path, PathBuf};

use adaptivity_core::{delete_by_id, for_each_node, ConditionNode};
use serde_json::json;

fn workspace_path(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..").join(relative)
}

fn load_validator() -> jsonschema::Validator {
    let schema_path = workspace_path("schema/condition-tree.schema.json");
    let schema_src = std::fs::read_to_string(&schema_path)
        .unwrap_or_else(|e| panic!("Failed to read schema at {}: {}", schema_path.display(), e));
    let schema_value: serde_json::Value = serde_json::from_str(&schema_src).unwrap();
    jsonschema::validator_for(&schema_value)
        .unwrap_or_else(|e| panic!("Failed to compile schema: {}", e))
}

/// Every rule's `conditions` block across the fixture decks.
fn fixture_conditions() -> Vec<(String, serde_json::Value)> {
    let dir = workspace_path("fixtures");
    let mut paths: Vec<_> = std::fs::read_dir(&dir)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", dir.display(), e))
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().map_or(false, |e| e == "json"))
        .collect();
    paths.sort();

    let mut out = Vec::new();
    for path in paths {
        let deck: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let screens = deck["screens"].as_array().cloned().unwrap_or_default();
        for screen in screens {
            let rules = screen["rules"].as_array().cloned().unwrap_or_default();
            for rule in rules {
                if let Some(conditions) = rule.get("conditions") {
                    let label = format!("{}#{}", path.display(), rule["id"]);
                    out.push((label, conditions.clone()));
                }
            }
        }
    }
    out
}

fn sample_tree() -> ConditionNode {
    ConditionNode::all(
        "root",
        vec![
            ConditionNode::leaf("c1", "stage.input_1.value", "greaterThan", 2.5),
            ConditionNode::any(
                "g1",
                vec![
                    ConditionNode::leaf("c2", "session.tutorialScore", "equal", "ok"),
                    ConditionNode::all(
                        "g2",
                        vec![ConditionNode::leaf("c3", "stage.mcq.selected", "equal", true)],
                    ),
                ],
            ),
        ],
    )
}

#[test]
fn serialized_tree_conforms_to_schema() {
    let validator = load_validator();
    let value = serde_json::to_value(sample_tree()).unwrap();
    if let Err(error) = validator.validate(&value) {
        panic!("sample tree failed schema validation: {}", error);
    }
}

#[test]
fn edited_trees_still_conform() {
    let validator = load_validator();
    let roots = vec![sample_tree()];
    let edited = for_each_node(&roots, |node| {
        if let ConditionNode::Leaf(leaf) = node {
            leaf.value = None;
        }
    });
    let pruned = delete_by_id("g2", &edited);
    for tree in edited.iter().chain(pruned.iter()) {
        let value = serde_json::to_value(tree).unwrap();
        assert!(validator.is_valid(&value), "invalid: {}", value);
    }
}

#[test]
fn leaf_values_of_every_json_kind_conform() {
    let validator = load_validator();
    for value in [json!(null), json!(3), json!(["a", 1]), json!({ "id": "opt1" })] {
        let stored = json!({ "id": "c", "fact": "stage.a.value", "operator": "equal", "value": value });
        let node: ConditionNode = serde_json::from_value(stored).unwrap();
        let back = serde_json::to_value(&node).unwrap();
        assert!(validator.is_valid(&back), "invalid: {}", back);
    }
}

#[test]
fn schema_rejects_group_with_both_keys() {
    let validator = load_validator();
    let bad = json!({ "id": "g", "all": [], "any": [] });
    assert!(!validator.is_valid(&bad));
}

#[test]
fn schema_rejects_leaf_without_operator() {
    let validator = load_validator();
    let bad = json!({ "id": "c", "fact": "stage.a.value", "value": 1 });
    assert!(!validator.is_valid(&bad));
}

#[test]
fn fixture_conditions_round_trip_into_schema() {
    let validator = load_validator();
    let conditions = fixture_conditions();
    assert!(!conditions.is_empty(), "No rule conditions found in fixtures");

    let mut failures = Vec::new();
    for (label, raw) in &conditions {
        let node: ConditionNode = match serde_json::from_value(raw.clone()) {
            Ok(node) => node,
            Err(e) => {
                failures.push(format!("{}: {}", label, e));
                continue;
            }
        };
        let stored = serde_json::to_value(&node).unwrap();
        if let Err(error) = validator.validate(&stored) {
            failures.push(format!("{}: {}", label, error));
        }
        let back: ConditionNode = serde_json::from_value(stored).unwrap();
        assert_eq!(back, node, "{} changed across a round trip", label);
    }

    assert!(
        failures.is_empty(),
        "Schema validation failed for {} of {} condition blocks:\n{}",
        failures.len(),
        conditions.len(),
        failures.join("\n")
    );
}
