//! Screen hierarchy and per-screen part lists.
//!
//! The hierarchy is stored as a flat arena in declaration order with child
//! index lists derived from each entry's parent link. Links that name no
//! known screen make the entry a root; parent cycles are tolerated and cut
//! where the walk would revisit a node.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::Serialize;
use tracing::warn;

/// One screen in the hierarchy, before child links are derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyEntry {
    pub id: String,
    pub parent: Option<String>,
}

impl HierarchyEntry {
    pub fn new(id: &str, parent: Option<&str>) -> Self {
        HierarchyEntry {
            id: id.to_owned(),
            parent: parent.map(str::to_owned),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Hierarchy {
    entries: Vec<HierarchyEntry>,
    index: HashMap<String, usize>,
    parents: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
}

impl Hierarchy {
    pub fn new(entries: Vec<HierarchyEntry>) -> Self {
        let mut index = HashMap::new();
        for (i, entry) in entries.iter().enumerate() {
            if index.contains_key(&entry.id) {
                warn!(screen = %entry.id, "duplicate screen id; keeping the first");
                continue;
            }
            index.insert(entry.id.clone(), i);
        }

        let mut parents = vec![None; entries.len()];
        let mut children = vec![Vec::new(); entries.len()];
        for (i, entry) in entries.iter().enumerate() {
            if index.get(&entry.id) != Some(&i) {
                continue;
            }
            let Some(parent_id) = entry.parent.as_deref() else {
                continue;
            };
            match index.get(parent_id) {
                Some(&p) if p != i => {
                    parents[i] = Some(p);
                    children[p].push(i);
                }
                Some(_) => warn!(screen = %entry.id, "screen names itself as parent"),
                None => {
                    warn!(screen = %entry.id, parent = %parent_id, "parent screen not found")
                }
            }
        }

        Hierarchy {
            entries,
            index,
            parents,
            children,
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Screen ids in declaration order, duplicates removed.
    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter(|(i, e)| self.index.get(&e.id) == Some(i))
            .map(|(_, e)| e.id.as_str())
    }

    pub fn parent_of(&self, id: &str) -> Option<&str> {
        let i = *self.index.get(id)?;
        self.parents[i].map(|p| self.entries[p].id.as_str())
    }

    pub fn children_of(&self, id: &str) -> Vec<&str> {
        self.index
            .get(id)
            .map(|&i| {
                self.children[i]
                    .iter()
                    .map(|&c| self.entries[c].id.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Lineage above `id`, nearest parent first. Excludes `id` itself.
    pub fn ancestors(&self, id: &str) -> Vec<&str> {
        let mut out = Vec::new();
        let Some(&start) = self.index.get(id) else {
            return out;
        };
        let mut seen = HashSet::from([start]);
        let mut current = self.parents[start];
        while let Some(i) = current {
            if !seen.insert(i) {
                warn!(screen = %id, "parent cycle in screen hierarchy");
                break;
            }
            out.push(self.entries[i].id.as_str());
            current = self.parents[i];
        }
        out
    }

    /// Every screen below `id`, pre-order. Excludes `id` itself.
    pub fn descendants(&self, id: &str) -> Vec<&str> {
        let mut out = Vec::new();
        let Some(&start) = self.index.get(id) else {
            return out;
        };
        let mut seen = HashSet::from([start]);
        let mut stack: Vec<usize> = self.children[start].iter().rev().copied().collect();
        while let Some(i) = stack.pop() {
            if !seen.insert(i) {
                continue;
            }
            out.push(self.entries[i].id.as_str());
            stack.extend(self.children[i].iter().rev());
        }
        out
    }
}

/// A part as seen from the screen that lists it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Part {
    pub id: String,
    /// Screen that owns the part. Differs from the listing screen for
    /// parts inherited from a layer.
    pub owner: String,
    pub inherited: bool,
}

impl Part {
    pub fn owned(id: &str, owner: &str) -> Self {
        Part {
            id: id.to_owned(),
            owner: owner.to_owned(),
            inherited: false,
        }
    }

    pub fn inherited(id: &str, owner: &str) -> Self {
        Part {
            id: id.to_owned(),
            owner: owner.to_owned(),
            inherited: true,
        }
    }
}

/// Ordered part lists keyed by screen id.
#[derive(Debug, Clone, Default)]
pub struct PartCatalog {
    by_screen: HashMap<String, Vec<Part>>,
}

impl PartCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, screen: &str, parts: Vec<Part>) {
        self.by_screen.insert(screen.to_owned(), parts);
    }

    /// Parts listed on `screen`; empty when the screen has none.
    pub fn parts_of(&self, screen: &str) -> &[Part] {
        self.by_screen.get(screen).map(Vec::as_slice).unwrap_or(&[])
    }

    fn ids_of<'a>(&'a self, screen: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.parts_of(screen).iter().map(|p| p.id.as_str())
    }
}

/// Ids a replacement for a part on `screen` must avoid: the screen's own
/// part ids, those of every ancestor, and those of every descendant.
/// Screens in unrelated branches do not contribute.
pub fn blacklist(hierarchy: &Hierarchy, catalog: &PartCatalog, screen: &str) -> BTreeSet<String> {
    std::iter::once(screen)
        .chain(hierarchy.ancestors(screen))
        .chain(hierarchy.descendants(screen))
        .flat_map(|s| catalog.ids_of(s))
        .map(str::to_owned)
        .collect()
}
