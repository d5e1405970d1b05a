//! Duplicate and malformed part ids, with collision-free replacements.
//!
//! Each flagged part gets a suggested id that avoids every part id on the
//! screen itself, up its layer chain, and anywhere below it. Parts on
//! unrelated branches are never seen together at runtime, so their ids
//! stay available.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::hierarchy::{blacklist, Hierarchy, Part, PartCatalog};
use crate::report::{DiagnosticRecord, Problem};
use crate::suggest::suggest_id;

lazy_static! {
    static ref VALID_PART_ID: Regex =
        Regex::new(r"^[A-Za-z0-9_\-: ]+$").expect("part id pattern is valid");
}

/// Every part whose id occurs more than once in `parts`, in list order.
pub fn find_duplicates(parts: &[Part]) -> Vec<&Part> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for part in parts {
        *counts.entry(part.id.as_str()).or_default() += 1;
    }
    parts.iter().filter(|p| counts[p.id.as_str()] > 1).collect()
}

/// Owned parts whose id has characters outside `[A-Za-z0-9_\-: ]`.
/// Inherited parts are renamed on their owning layer, not here.
pub fn find_malformed(parts: &[Part]) -> Vec<&Part> {
    parts
        .iter()
        .filter(|p| !p.inherited && !VALID_PART_ID.is_match(&p.id))
        .collect()
}

/// Duplicate and malformed problems for a single screen.
///
/// The blacklist is only built when something was flagged.
pub fn screen_problems(
    hierarchy: &Hierarchy,
    catalog: &PartCatalog,
    screen: &str,
    check_duplicates: bool,
    check_pattern: bool,
) -> (Vec<Problem>, Vec<Problem>) {
    let parts = catalog.parts_of(screen);
    let duplicates = if check_duplicates {
        find_duplicates(parts)
    } else {
        Vec::new()
    };
    let malformed = if check_pattern {
        find_malformed(parts)
    } else {
        Vec::new()
    };
    if duplicates.is_empty() && malformed.is_empty() {
        return (Vec::new(), Vec::new());
    }

    let avoid = blacklist(hierarchy, catalog, screen);
    let annotate = |flagged: Vec<&Part>| -> Vec<Problem> {
        flagged
            .into_iter()
            .map(|part| Problem {
                part_id: part.id.clone(),
                owner: part.owner.clone(),
                suggested_fix: suggest_id(&part.id, &avoid),
            })
            .collect()
    };
    (annotate(duplicates), annotate(malformed))
}

/// Run both identifier checks over every screen, in hierarchy order.
/// Screens without problems produce no record.
pub fn diagnose(hierarchy: &Hierarchy, catalog: &PartCatalog) -> Vec<DiagnosticRecord> {
    let mut records = Vec::new();
    for screen in hierarchy.ids() {
        let (duplicates, malformed) = screen_problems(hierarchy, catalog, screen, true, true);
        if duplicates.is_empty() && malformed.is_empty() {
            continue;
        }
        debug!(
            screen,
            duplicates = duplicates.len(),
            malformed = malformed.len(),
            "identifier problems"
        );
        records.push(DiagnosticRecord {
            node: screen.to_string(),
            duplicates,
            malformed,
            references: Vec::new(),
        });
    }
    records
}
