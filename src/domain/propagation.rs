//! Toggle-and-propagate over a [`TreeArena`].
//!
//! A toggle writes the new state to the node, assimilates every descendant to
//! it, then walks up to the root recomputing each ancestor from its direct
//! children. Children are always correct before their parent is recomputed,
//! so only one level has to be inspected per ancestor.

use tracing::{debug, instrument, trace};

use crate::domain::arena::{NodeId, TreeArena};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::state::TriState;

/// Flip `node` and propagate the change through the tree.
///
/// Returns the node's new state. `Inconsistent` resolves to `Checked`.
#[instrument(level = "debug", skip(tree))]
pub fn toggle(tree: &mut TreeArena, node: NodeId) -> DomainResult<TriState> {
    let old_state = tree.state(node)?;
    let new_state = old_state.toggled();
    let label = tree.label(node)?;
    debug!(node = label, %old_state, %new_state, "toggle");

    tree.set_state(node, new_state)?;
    assimilate(tree, node, new_state)?;
    recompute_ancestors(tree, node)?;
    Ok(new_state)
}

/// Force every descendant of `node` to `state`.
///
/// Subtrees whose root already holds `state` are skipped: a uniform parent
/// implies uniform descendants.
#[instrument(level = "trace", skip(tree))]
pub fn assimilate(tree: &mut TreeArena, node: NodeId, state: TriState) -> DomainResult<()> {
    let mut stack: Vec<NodeId> = tree.children(node)?.to_vec();

    while let Some(child) = stack.pop() {
        if tree.state(child)? == state {
            continue;
        }
        tree.set_state(child, state)?;
        stack.extend_from_slice(tree.children(child)?);
    }
    Ok(())
}

/// Recompute every ancestor of `node`, nearest first, up to its root.
#[instrument(level = "trace", skip(tree))]
pub fn recompute_ancestors(tree: &mut TreeArena, node: NodeId) -> DomainResult<()> {
    let mut current = tree.parent(node)?;
    while let Some(parent) = current {
        let state = compute(tree, parent)?;
        let label = tree.label(parent)?;
        trace!(node = label, %state, "recomputed");
        tree.set_state(parent, state)?;
        current = tree.parent(parent)?;
    }
    Ok(())
}

/// State `node` should hold given its direct children.
pub fn compute(tree: &TreeArena, node: NodeId) -> DomainResult<TriState> {
    let children = tree.children(node)?;
    let states = children
        .iter()
        .map(|&child| tree.state(child))
        .collect::<DomainResult<Vec<_>>>()?;

    match TriState::from_children(states) {
        Some(state) => Ok(state),
        None => Err(DomainError::LeafHasNoChildren(tree.path_of(node)?)),
    }
}

/// Non-leaf nodes whose stored state disagrees with [`compute`].
pub fn violations(tree: &TreeArena) -> DomainResult<Vec<NodeId>> {
    let mut result = Vec::new();
    for (idx, node) in tree.iter() {
        if node.is_leaf() {
            continue;
        }
        if compute(tree, idx)? != node.data.state {
            result.push(idx);
        }
    }
    Ok(result)
}

impl TreeArena {
    /// See [`toggle`].
    pub fn toggle(&mut self, node: NodeId) -> DomainResult<TriState> {
        toggle(self, node)
    }

    /// Resolve `path` and toggle the node it names.
    pub fn toggle_path(&mut self, path: &str) -> DomainResult<TriState> {
        let node = self.find_by_path(path)?;
        toggle(self, node)
    }
}
