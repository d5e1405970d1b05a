//! Copy-on-write operations over a list of sibling condition nodes.
//!
//! Every function takes the roots by reference and, when it changes
//! anything, returns a fresh list. All walks are depth-first pre-order:
//! a node is seen before its children, and a node's whole subtree before
//! its next sibling.

use crate::condition::ConditionNode;

/// First node with `id`, or `None`.
pub fn find_by_id<'a>(id: &str, roots: &'a [ConditionNode]) -> Option<&'a ConditionNode> {
    for node in roots {
        if node.id() == id {
            return Some(node);
        }
        if let Some(found) = find_by_id(id, node.children()) {
            return Some(found);
        }
    }
    None
}

/// Rebuild the tree, handing a copy of every node to `visit`.
///
/// Edits made by `visit` are kept in the result. A group's children are
/// walked after `visit` ran on the group, so a visitor that replaces a
/// group's child list sees the new children next.
pub fn for_each_node<F>(roots: &[ConditionNode], mut visit: F) -> Vec<ConditionNode>
where
    F: FnMut(&mut ConditionNode),
{
    rebuild(roots, &mut visit)
}

fn rebuild<F>(nodes: &[ConditionNode], visit: &mut F) -> Vec<ConditionNode>
where
    F: FnMut(&mut ConditionNode),
{
    nodes
        .iter()
        .map(|node| {
            let mut copy = node.clone();
            visit(&mut copy);
            if let ConditionNode::Group(group) = &mut copy {
                group.children = rebuild(&group.children, visit);
            }
            copy
        })
        .collect()
}

/// Apply `edit` to the node with `id` only.
pub fn update_by_id<F>(id: &str, roots: &[ConditionNode], mut edit: F) -> Vec<ConditionNode>
where
    F: FnMut(&mut ConditionNode),
{
    for_each_node(roots, |node| {
        if node.id() == id {
            edit(node);
        }
    })
}

/// Tree without the first node matching `id` (and its subtree).
pub fn delete_by_id(id: &str, roots: &[ConditionNode]) -> Vec<ConditionNode> {
    let mut copy = roots.to_vec();
    remove_first(id, &mut copy);
    copy
}

fn remove_first(id: &str, nodes: &mut Vec<ConditionNode>) -> bool {
    for i in 0..nodes.len() {
        if nodes[i].id() == id {
            nodes.remove(i);
            return true;
        }
        if let ConditionNode::Group(group) = &mut nodes[i] {
            if remove_first(id, &mut group.children) {
                return true;
            }
        }
    }
    false
}

/// Read-only pre-order walk.
pub fn visit_nodes<'a, F>(roots: &'a [ConditionNode], mut visit: F)
where
    F: FnMut(&'a ConditionNode),
{
    walk(roots, &mut visit);
}

fn walk<'a, F>(nodes: &'a [ConditionNode], visit: &mut F)
where
    F: FnMut(&'a ConditionNode),
{
    for node in nodes {
        visit(node);
        walk(node.children(), visit);
    }
}
