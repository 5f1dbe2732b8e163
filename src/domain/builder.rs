//! Build a [`TreeArena`] from a nested hierarchy description.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::arena::{NodeData, NodeId, TreeArena, PATH_SEPARATOR};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::propagation::compute;
use crate::domain::state::TriState;

/// Nested-list description of one node and its subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hierarchy {
    pub label: String,
    /// Start checked; applies to the whole subtree
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub checked: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Hierarchy>,
}

impl Hierarchy {
    pub fn leaf(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            checked: false,
            children: Vec::new(),
        }
    }

    pub fn node(label: impl Into<String>, children: Vec<Hierarchy>) -> Self {
        Self {
            label: label.into(),
            checked: false,
            children,
        }
    }

    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    /// Built-in sample: countries and cities, everything unchecked.
    pub fn europe() -> Self {
        Self::node(
            "Europe",
            vec![
                Self::node("England", vec![Self::leaf("London"), Self::leaf("Leicester")]),
                Self::node("France", vec![Self::leaf("Paris"), Self::leaf("Nice")]),
            ],
        )
    }
}

/// Constructs checkbox trees from [`Hierarchy`] descriptions.
#[derive(Debug, Default)]
pub struct TreeBuilder;

impl TreeBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build one store holding every root in `roots`.
    ///
    /// Parents are derived from their children after insertion, so the
    /// result is consistent and its dirty list is empty.
    #[instrument(level = "debug", skip(self, roots), fields(count = roots.len()))]
    pub fn build(&self, roots: &[Hierarchy]) -> DomainResult<TreeArena> {
        if roots.is_empty() {
            return Err(DomainError::EmptyHierarchy);
        }
        check_siblings("<root>", roots)?;

        let mut tree = TreeArena::new();
        let mut stack: Vec<(&Hierarchy, Option<NodeId>, bool)> =
            roots.iter().rev().map(|h| (h, None, false)).collect();

        while let Some((current, parent_idx, inherited)) = stack.pop() {
            check_label(&current.label)?;
            let checked = inherited || current.checked;
            let idx = tree.insert_node(
                NodeData::new(current.label.clone(), TriState::from(checked)),
                parent_idx,
            )?;

            if !current.children.is_empty() {
                check_siblings(&current.label, &current.children)?;
            }
            // Reverse so children are inserted in declaration order
            for child in current.children.iter().rev() {
                stack.push((child, Some(idx), checked));
            }
        }

        let parents: Vec<NodeId> = tree
            .iter_postorder()
            .filter(|(_, node)| !node.is_leaf())
            .map(|(idx, _)| idx)
            .collect();
        for idx in parents {
            let state = compute(&tree, idx)?;
            tree.set_state(idx, state)?;
        }
        tree.take_dirty();

        debug!(nodes = tree.len(), depth = tree.depth(), "tree built");
        Ok(tree)
    }
}

fn check_label(label: &str) -> DomainResult<()> {
    let invalid = |reason: &str| DomainError::InvalidLabel {
        label: label.to_string(),
        reason: reason.to_string(),
    };
    if label.trim().is_empty() {
        return Err(invalid("label is empty"));
    }
    if label.contains(PATH_SEPARATOR) {
        return Err(invalid("label contains the path separator '/'"));
    }
    Ok(())
}

fn check_siblings(parent: &str, siblings: &[Hierarchy]) -> DomainResult<()> {
    let mut seen = HashSet::new();
    for sibling in siblings {
        if !seen.insert(sibling.label.as_str()) {
            return Err(DomainError::DuplicateLabel {
                parent: parent.to_string(),
                label: sibling.label.clone(),
            });
        }
    }
    Ok(())
}
