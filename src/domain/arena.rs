//! Arena-backed tree store holding labelled tri-state nodes.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use generational_arena::{Arena, Index};
use itertools::Itertools;
use tracing::instrument;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::state::TriState;

/// Handle of a node inside a [`TreeArena`].
///
/// Carries the id of the store that issued it next to the arena index, so a
/// handle from another store never resolves, even when its slot exists here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    store: u64,
    idx: Index,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.idx.into_raw_parts();
        write!(f, "store {} slot {}/{}", self.store, slot, generation)
    }
}

static NEXT_STORE: AtomicU64 = AtomicU64::new(0);

/// Separator between labels in a node path such as `Europe/England/London`.
pub const PATH_SEPARATOR: char = '/';

/// Data payload for tree nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    /// Display text, opaque to propagation
    pub label: String,
    /// Current check value
    pub state: TriState,
}

impl NodeData {
    pub fn new(label: impl Into<String>, state: TriState) -> Self {
        Self {
            label: label.into(),
            state,
        }
    }
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct TreeNode {
    pub data: NodeData,
    /// Index of parent node in the arena, None for root nodes
    pub parent: Option<NodeId>,
    /// Indices of child nodes in the arena, in insertion order
    pub children: Vec<NodeId>,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Arena-based store for one or more checkbox trees.
///
/// Nodes are owned by the arena; parent links are plain indices, so the only
/// owning direction is parent to child. Every state write is recorded in a
/// dirty list that a renderer drains with [`TreeArena::take_dirty`].
#[derive(Debug)]
pub struct TreeArena {
    store: u64,
    arena: Arena<TreeNode>,
    roots: Vec<NodeId>,
    dirty: Vec<NodeId>,
}

impl Default for TreeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeArena {
    pub fn new() -> Self {
        Self {
            store: NEXT_STORE.fetch_add(1, Ordering::Relaxed),
            arena: Arena::new(),
            roots: Vec::new(),
            dirty: Vec::new(),
        }
    }

    /// Append a node under `parent`, or as a new root when `parent` is None.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, data: NodeData, parent: Option<NodeId>) -> DomainResult<NodeId> {
        if let Some(parent_idx) = parent {
            self.get_node(parent_idx)?;
        }

        let node_idx = NodeId {
            store: self.store,
            idx: self.arena.insert(TreeNode {
                data,
                parent,
                children: Vec::new(),
            }),
        };

        match parent {
            Some(parent_idx) => self.get_node_mut(parent_idx)?.children.push(node_idx),
            None => self.roots.push(node_idx),
        }

        Ok(node_idx)
    }

    pub fn get_node(&self, idx: NodeId) -> DomainResult<&TreeNode> {
        self.lookup(idx)
            .ok_or(DomainError::InvalidNodeReference(idx))
    }

    fn get_node_mut(&mut self, idx: NodeId) -> DomainResult<&mut TreeNode> {
        if idx.store != self.store {
            return Err(DomainError::InvalidNodeReference(idx));
        }
        self.arena
            .get_mut(idx.idx)
            .ok_or(DomainError::InvalidNodeReference(idx))
    }

    // Handles issued by another store never reach the arena
    fn lookup(&self, idx: NodeId) -> Option<&TreeNode> {
        if idx.store != self.store {
            return None;
        }
        self.arena.get(idx.idx)
    }

    pub fn contains(&self, idx: NodeId) -> bool {
        self.lookup(idx).is_some()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.len() == 0
    }

    pub fn state(&self, idx: NodeId) -> DomainResult<TriState> {
        Ok(self.get_node(idx)?.data.state)
    }

    /// Overwrite a node's state and mark it dirty for re-rendering.
    #[instrument(level = "trace", skip(self))]
    pub fn set_state(&mut self, idx: NodeId, state: TriState) -> DomainResult<()> {
        self.get_node_mut(idx)?.data.state = state;
        if !self.dirty.contains(&idx) {
            self.dirty.push(idx);
        }
        Ok(())
    }

    pub fn label(&self, idx: NodeId) -> DomainResult<&str> {
        Ok(self.get_node(idx)?.data.label.as_str())
    }

    pub fn children(&self, idx: NodeId) -> DomainResult<&[NodeId]> {
        Ok(self.get_node(idx)?.children.as_slice())
    }

    pub fn parent(&self, idx: NodeId) -> DomainResult<Option<NodeId>> {
        Ok(self.get_node(idx)?.parent)
    }

    pub fn is_leaf(&self, idx: NodeId) -> DomainResult<bool> {
        Ok(self.get_node(idx)?.is_leaf())
    }

    /// Nodes written since the last [`TreeArena::take_dirty`], in first-write order.
    pub fn dirty(&self) -> &[NodeId] {
        &self.dirty
    }

    pub fn take_dirty(&mut self) -> Vec<NodeId> {
        std::mem::take(&mut self.dirty)
    }

    /// Ancestors of `idx`, nearest first.
    pub fn ancestors(&self, idx: NodeId) -> DomainResult<Vec<NodeId>> {
        let mut ancestors = Vec::new();
        let mut current = self.parent(idx)?;
        while let Some(parent_idx) = current {
            ancestors.push(parent_idx);
            current = self.parent(parent_idx)?;
        }
        Ok(ancestors)
    }

    /// All descendants of `idx` in pre-order, excluding `idx` itself.
    pub fn descendants(&self, idx: NodeId) -> DomainResult<Vec<NodeId>> {
        let mut result = Vec::new();
        let mut stack: Vec<NodeId> = self.children(idx)?.iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            result.push(current);
            stack.extend(self.children(current)?.iter().rev());
        }
        Ok(result)
    }

    /// Label path from the root down to `idx`, e.g. `Europe/England/London`.
    pub fn path_of(&self, idx: NodeId) -> DomainResult<String> {
        let mut labels = vec![self.label(idx)?];
        for ancestor in self.ancestors(idx)? {
            labels.push(self.label(ancestor)?);
        }
        Ok(labels.into_iter().rev().join(&PATH_SEPARATOR.to_string()))
    }

    /// Resolve a label path such as `Europe/France/Nice` to a node.
    #[instrument(level = "debug", skip(self))]
    pub fn find_by_path(&self, path: &str) -> DomainResult<NodeId> {
        let not_found = || DomainError::PathNotFound(path.to_string());
        let mut segments = path
            .trim_matches(PATH_SEPARATOR)
            .split(PATH_SEPARATOR)
            .filter(|s| !s.is_empty());

        let first = segments.next().ok_or_else(not_found)?;
        let mut current = self
            .find_child(&self.roots, first)
            .ok_or_else(not_found)?;

        for segment in segments {
            let children = self.children(current)?;
            current = self.find_child(children, segment).ok_or_else(not_found)?;
        }
        Ok(current)
    }

    fn find_child(&self, candidates: &[NodeId], label: &str) -> Option<NodeId> {
        candidates
            .iter()
            .copied()
            .find(|&idx| self.lookup(idx).is_some_and(|n| n.data.label == label))
    }

    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }

    /// Number of levels of the deepest tree in the store.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.roots
            .iter()
            .map(|&root| self.calculate_depth(root))
            .max()
            .unwrap_or(0)
    }

    fn calculate_depth(&self, node_idx: NodeId) -> usize {
        if let Some(node) = self.lookup(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// All leaf nodes, left to right.
    pub fn leaf_nodes(&self) -> Vec<NodeId> {
        self.iter()
            .filter(|(_, node)| node.is_leaf())
            .map(|(idx, _)| idx)
            .collect()
    }
}

/// Pre-order traversal over every root, children in insertion order.
pub struct TreeIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<NodeId>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a TreeArena) -> Self {
        let stack = arena.roots.iter().rev().copied().collect();
        Self { arena, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (NodeId, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.lookup(current_idx) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.children.iter().rev());
                return Some((current_idx, node));
            }
        }
        None
    }
}

/// Post-order traversal: every child is yielded before its parent.
pub struct PostOrderIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<(NodeId, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(arena: &'a TreeArena) -> Self {
        let stack = arena.roots.iter().rev().map(|&r| (r, false)).collect();
        Self { arena, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (NodeId, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.lookup(current_idx) {
                if visited {
                    return Some((current_idx, node));
                }
                self.stack.push((current_idx, true));
                for &child in node.children.iter().rev() {
                    self.stack.push((child, false));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (TreeArena, NodeId, NodeId, NodeId) {
        let mut tree = TreeArena::new();
        let root = tree
            .insert_node(NodeData::new("root", TriState::Unchecked), None)
            .unwrap();
        let a = tree
            .insert_node(NodeData::new("a", TriState::Unchecked), Some(root))
            .unwrap();
        let b = tree
            .insert_node(NodeData::new("b", TriState::Unchecked), Some(a))
            .unwrap();
        (tree, root, a, b)
    }

    #[test]
    fn given_inserted_nodes_when_querying_then_links_are_mutual() {
        let (tree, root, a, b) = sample();
        assert_eq!(tree.roots(), &[root]);
        assert_eq!(tree.children(root).unwrap(), &[a]);
        assert_eq!(tree.parent(a).unwrap(), Some(root));
        assert_eq!(tree.parent(b).unwrap(), Some(a));
        assert_eq!(tree.parent(root).unwrap(), None);
        assert!(tree.is_leaf(b).unwrap());
        assert_eq!(tree.depth(), 3);
    }

    #[test]
    fn given_set_state_when_writing_twice_then_dirty_lists_node_once() {
        let (mut tree, root, a, _) = sample();
        tree.set_state(a, TriState::Checked).unwrap();
        tree.set_state(root, TriState::Checked).unwrap();
        tree.set_state(a, TriState::Unchecked).unwrap();
        assert_eq!(tree.dirty(), &[a, root]);
        assert_eq!(tree.take_dirty(), vec![a, root]);
        assert!(tree.dirty().is_empty());
        assert_eq!(tree.state(a).unwrap(), TriState::Unchecked);
    }

    #[test]
    fn given_same_shaped_store_when_querying_foreign_id_then_invalid_node_reference() {
        let (mut tree, _, _, b) = sample();
        let (other, _, _, other_b) = sample();
        assert!(other.contains(other_b));
        assert!(!tree.contains(other_b));
        assert_ne!(b, other_b);
        assert_eq!(
            tree.state(other_b),
            Err(DomainError::InvalidNodeReference(other_b))
        );
        assert_eq!(
            tree.set_state(other_b, TriState::Checked),
            Err(DomainError::InvalidNodeReference(other_b))
        );
        assert_eq!(tree.state(b).unwrap(), TriState::Unchecked);
        assert!(tree.dirty().is_empty());
    }

    #[test]
    fn given_unknown_parent_when_inserting_then_error() {
        let (mut tree, ..) = sample();
        let (_, _, foreign, _) = sample();
        let result = tree.insert_node(NodeData::new("y", TriState::Unchecked), Some(foreign));
        assert_eq!(result, Err(DomainError::InvalidNodeReference(foreign)));
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn given_path_when_resolving_then_round_trips() {
        let (tree, _, _, b) = sample();
        assert_eq!(tree.path_of(b).unwrap(), "root/a/b");
        assert_eq!(tree.find_by_path("root/a/b").unwrap(), b);
        assert_eq!(tree.find_by_path("/root/a/b/").unwrap(), b);
        assert_eq!(
            tree.find_by_path("root/x"),
            Err(DomainError::PathNotFound("root/x".into()))
        );
        assert!(tree.find_by_path("").is_err());
    }

    #[test]
    fn given_tree_when_iterating_then_pre_and_post_order() {
        let (tree, root, a, b) = sample();
        let pre: Vec<_> = tree.iter().map(|(i, _)| i).collect();
        let post: Vec<_> = tree.iter_postorder().map(|(i, _)| i).collect();
        assert_eq!(pre, vec![root, a, b]);
        assert_eq!(post, vec![b, a, root]);
        assert_eq!(tree.descendants(root).unwrap(), vec![a, b]);
        assert_eq!(tree.ancestors(b).unwrap(), vec![a, root]);
        assert_eq!(tree.leaf_nodes(), vec![b]);
    }
}
