//! adaptivity-core: the rule language and condition trees behind adaptive
//! lessons.
//!
//! # Public API
//!
//! - Rule builders ([`builder`]): produce predicate expression strings such
//!   as `input > {3}` or `(!(input contains {cat}))`.
//! - Rule parsers ([`parser`]): classify a stored rule back into its
//!   [`RuleOperator`] and [`RuleInput`].
//! - Condition trees ([`condition`], [`tree`]): nested `all`/`any` groups of
//!   fact comparisons, with copy-on-write find/edit/delete by id.

pub mod builder;
pub mod condition;
pub mod error;
pub mod operator;
pub mod parser;
pub mod tree;

// ── Convenience re-exports: key types ────────────────────────────────

pub use condition::{Combinator, ConditionGroup, ConditionLeaf, ConditionNode, ConditionValue};
pub use error::{ConditionError, PelError};
pub use operator::{ParsedRule, RuleInput, RuleOperator};

// ── Convenience re-exports: entry points ─────────────────────────────

pub use builder::{make_rule, make_rule_for};
pub use parser::{is_text_rule, parse_input, parse_operator, parse_rule};
pub use tree::{delete_by_id, find_by_id, for_each_node, update_by_id, visit_nodes};
