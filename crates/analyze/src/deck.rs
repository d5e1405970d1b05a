//! Deck JSON deserialization into typed analysis structs.
//!
//! A deck is the flat list of screens of an adaptive lesson. Screens point
//! at their parent layer through `layer_ref`; the analyzer rebuilds the
//! hierarchy from those links rather than trusting any nesting in the file.

use std::collections::{BTreeSet, HashSet};

use adaptivity_core::ConditionNode;
use serde::{Deserialize, Serialize};

use crate::hierarchy::{Hierarchy, HierarchyEntry, Part, PartCatalog};

/// Error type for analysis operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    /// The deck JSON does not have the expected shape.
    #[error("invalid deck: {0}")]
    InvalidDeck(String),
    /// A check name passed to `analyze_selected` is not known.
    #[error("unknown check '{name}'. Valid: {valid}")]
    UnknownCheck { name: String, valid: String },
    /// `analyze_selected` was given an empty check list.
    #[error("no checks selected. Valid: {valid}")]
    NoChecks { valid: String },
}

/// A part placed on a screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartRef {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub inherited: bool,
    /// Screen that owns the part; defaults to the screen listing it.
    #[serde(default)]
    pub owner: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NavigationParams {
    #[serde(default)]
    pub target: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MutateParams {
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub operator: Option<String>,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

/// Effect fired when a rule's conditions hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Action {
    Navigation {
        #[serde(default)]
        params: NavigationParams,
    },
    MutateState {
        #[serde(default)]
        params: MutateParams,
    },
    /// Feedback and any other action kind; not checked.
    #[serde(other)]
    Other,
}

/// An adaptivity rule: a condition tree plus the actions it triggers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptivityRule {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub conditions: Option<ConditionNode>,
    #[serde(default)]
    pub actions: Vec<Action>,
}

/// Initial state assignment applied when a screen loads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitFact {
    #[serde(default)]
    pub id: String,
    pub target: String,
    #[serde(default)]
    pub operator: Option<String>,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Screen {
    pub id: String,
    #[serde(default)]
    pub layer_ref: Option<String>,
    #[serde(default)]
    pub parts: Vec<PartRef>,
    #[serde(default)]
    pub rules: Vec<AdaptivityRule>,
    #[serde(default)]
    pub facts: Vec<InitFact>,
}

/// Lesson-wide app that can be targeted from any screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EverApp {
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub screens: Vec<Screen>,
    #[serde(default)]
    pub variables: Vec<String>,
    #[serde(default)]
    pub ever_apps: Vec<EverApp>,
}

impl Deck {
    pub fn from_json(value: &serde_json::Value) -> Result<Deck, AnalysisError> {
        Deck::deserialize(value).map_err(|e| AnalysisError::InvalidDeck(e.to_string()))
    }

    pub fn from_json_str(src: &str) -> Result<Deck, AnalysisError> {
        serde_json::from_str(src).map_err(|e| AnalysisError::InvalidDeck(e.to_string()))
    }

    /// First screen with `id`.
    pub fn screen(&self, id: &str) -> Option<&Screen> {
        self.screens.iter().find(|s| s.id == id)
    }

    pub fn hierarchy(&self) -> Hierarchy {
        Hierarchy::new(
            self.screens
                .iter()
                .map(|s| HierarchyEntry::new(&s.id, s.layer_ref.as_deref()))
                .collect(),
        )
    }

    /// Parts per screen. Later screens repeating an id are ignored, matching
    /// the hierarchy, which also keeps the first.
    pub fn part_catalog(&self) -> PartCatalog {
        let mut catalog = PartCatalog::new();
        let mut seen = HashSet::new();
        for screen in &self.screens {
            if !seen.insert(screen.id.as_str()) {
                continue;
            }
            let parts = screen
                .parts
                .iter()
                .map(|p| Part {
                    id: p.id.clone(),
                    owner: p.owner.clone().unwrap_or_else(|| screen.id.clone()),
                    inherited: p.inherited,
                })
                .collect();
            catalog.insert(&screen.id, parts);
        }
        catalog
    }

    /// Every id a state path may legally name: parts on any screen,
    /// lesson-wide apps, and lesson variables.
    pub fn known_ids(&self) -> BTreeSet<String> {
        self.screens
            .iter()
            .flat_map(|s| s.parts.iter().map(|p| p.id.clone()))
            .chain(self.ever_apps.iter().map(|a| a.id.clone()))
            .chain(self.variables.iter().cloned())
            .collect()
    }
}
