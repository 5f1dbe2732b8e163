//! Text rendering of checkbox trees via `termtree`.

use serde::{Deserialize, Serialize};
use termtree::Tree;

use crate::domain::arena::{NodeId, TreeArena};
use crate::domain::error::DomainResult;
use crate::domain::state::TriState;

/// Checkbox glyph drawn in front of each label.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Glyphs {
    pub checked: String,
    pub unchecked: String,
    pub inconsistent: String,
}

impl Default for Glyphs {
    fn default() -> Self {
        Self {
            checked: "[x]".into(),
            unchecked: "[ ]".into(),
            inconsistent: "[-]".into(),
        }
    }
}

impl Glyphs {
    pub fn glyph(&self, state: TriState) -> &str {
        match state {
            TriState::Checked => &self.checked,
            TriState::Unchecked => &self.unchecked,
            TriState::Inconsistent => &self.inconsistent,
        }
    }
}

pub trait TreeNodeConvert {
    /// The subtree below `idx` with rows rendered as `<glyph> <label>`.
    fn to_subtree(&self, idx: NodeId, glyphs: &Glyphs) -> DomainResult<Tree<String>>;

    /// One `termtree` per root.
    fn to_tree_strings(&self, glyphs: &Glyphs) -> DomainResult<Vec<Tree<String>>>;
}

impl TreeNodeConvert for TreeArena {
    fn to_subtree(&self, idx: NodeId, glyphs: &Glyphs) -> DomainResult<Tree<String>> {
        let node = self.get_node(idx)?;
        let leaves = node
            .children
            .iter()
            .map(|&child| self.to_subtree(child, glyphs))
            .collect::<DomainResult<Vec<_>>>()?;
        let row = format!("{} {}", glyphs.glyph(node.data.state), node.data.label);
        Ok(Tree::new(row).with_leaves(leaves))
    }

    fn to_tree_strings(&self, glyphs: &Glyphs) -> DomainResult<Vec<Tree<String>>> {
        self.roots()
            .iter()
            .map(|&root| self.to_subtree(root, glyphs))
            .collect()
    }
}

/// Render every tree in the store, one after another.
pub fn render(tree: &TreeArena, glyphs: &Glyphs) -> DomainResult<String> {
    Ok(tree
        .to_tree_strings(glyphs)?
        .iter()
        .map(ToString::to_string)
        .collect())
}
