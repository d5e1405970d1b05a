//! Condition tree node types and their stored JSON form.
//!
//! Stored shape (as persisted by the authoring store):
//!
//! ```json
//! { "id": "g1", "all": [ { "id": "c1", "fact": "stage.a.value", "operator": "equal", "value": 3 } ] }
//! ```
//!
//! A group carries its children under exactly one of `all` / `any`; a leaf
//! carries `fact`, `operator` and `value`.

use serde::{Deserialize, Serialize};

use crate::error::ConditionError;

/// How a group combines its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Combinator {
    All,
    Any,
}

/// Right-hand side of a fact comparison. Any JSON value is accepted and
/// kept as written, so `3` stays an integer and objects survive a round trip.
pub type ConditionValue = serde_json::Value;

/// A single fact comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionLeaf {
    pub id: String,
    pub fact: String,
    pub operator: String,
    /// `None` when the stored object has no `value` key; an explicit
    /// `null` is `Some(ConditionValue::Null)`.
    pub value: Option<ConditionValue>,
}

/// A boolean group of conditions.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionGroup {
    pub id: String,
    pub combinator: Combinator,
    pub children: Vec<ConditionNode>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "StoredCondition")]
pub enum ConditionNode {
    Leaf(ConditionLeaf),
    Group(ConditionGroup),
}

impl ConditionNode {
    pub fn id(&self) -> &str {
        match self {
            ConditionNode::Leaf(leaf) => &leaf.id,
            ConditionNode::Group(group) => &group.id,
        }
    }

    pub fn leaf(
        id: impl Into<String>,
        fact: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<ConditionValue>,
    ) -> Self {
        ConditionNode::Leaf(ConditionLeaf {
            id: id.into(),
            fact: fact.into(),
            operator: operator.into(),
            value: Some(value.into()),
        })
    }

    pub fn all(id: impl Into<String>, children: Vec<ConditionNode>) -> Self {
        ConditionNode::Group(ConditionGroup {
            id: id.into(),
            combinator: Combinator::All,
            children,
        })
    }

    pub fn any(id: impl Into<String>, children: Vec<ConditionNode>) -> Self {
        ConditionNode::Group(ConditionGroup {
            id: id.into(),
            combinator: Combinator::Any,
            children,
        })
    }

    pub fn as_leaf(&self) -> Option<&ConditionLeaf> {
        match self {
            ConditionNode::Leaf(leaf) => Some(leaf),
            ConditionNode::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&ConditionGroup> {
        match self {
            ConditionNode::Group(group) => Some(group),
            ConditionNode::Leaf(_) => None,
        }
    }

    /// Child list of a group; empty for a leaf.
    pub fn children(&self) -> &[ConditionNode] {
        match self {
            ConditionNode::Group(group) => &group.children,
            ConditionNode::Leaf(_) => &[],
        }
    }
}

// ── Stored form ──────────────────────────────────────────────────────

/// Flat mirror of the stored JSON object; every key optional.
#[derive(Debug, Deserialize)]
struct StoredCondition {
    #[serde(default)]
    id: String,
    all: Option<Vec<ConditionNode>>,
    any: Option<Vec<ConditionNode>>,
    fact: Option<String>,
    operator: Option<String>,
    #[serde(default, deserialize_with = "present")]
    value: Option<ConditionValue>,
}

/// Wraps whatever is under the key, `null` included, so only a missing key
/// falls back to `None`.
fn present<'de, D>(deserializer: D) -> Result<Option<ConditionValue>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    ConditionValue::deserialize(deserializer).map(Some)
}

impl TryFrom<StoredCondition> for ConditionNode {
    type Error = ConditionError;

    fn try_from(raw: StoredCondition) -> Result<Self, Self::Error> {
        match (raw.all, raw.any) {
            (Some(_), Some(_)) => Err(ConditionError::AmbiguousGroup { id: raw.id }),
            (Some(children), None) => Ok(ConditionNode::Group(ConditionGroup {
                id: raw.id,
                combinator: Combinator::All,
                children,
            })),
            (None, Some(children)) => Ok(ConditionNode::Group(ConditionGroup {
                id: raw.id,
                combinator: Combinator::Any,
                children,
            })),
            (None, None) => {
                let fact = raw
                    .fact
                    .ok_or_else(|| ConditionError::NotACondition { id: raw.id.clone() })?;
                let operator = raw.operator.ok_or_else(|| ConditionError::MissingField {
                    id: raw.id.clone(),
                    field: "operator".to_string(),
                })?;
                Ok(ConditionNode::Leaf(ConditionLeaf {
                    id: raw.id,
                    fact,
                    operator,
                    value: raw.value,
                }))
            }
        }
    }
}

impl Serialize for ConditionNode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        match self {
            ConditionNode::Leaf(leaf) => {
                let len = if leaf.value.is_some() { 4 } else { 3 };
                let mut map = serializer.serialize_map(Some(len))?;
                map.serialize_entry("id", &leaf.id)?;
                map.serialize_entry("fact", &leaf.fact)?;
                map.serialize_entry("operator", &leaf.operator)?;
                if let Some(value) = &leaf.value {
                    map.serialize_entry("value", value)?;
                }
                map.end()
            }
            ConditionNode::Group(group) => {
                let key = match group.combinator {
                    Combinator::All => "all",
                    Combinator::Any => "any",
                };
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("id", &group.id)?;
                map.serialize_entry(key, &group.children)?;
                map.end()
            }
        }
    }
}
