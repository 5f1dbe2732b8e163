//! Hierarchy description files (TOML) and tree loading.
//!
//! ```toml
//! [[roots]]
//! label = "Europe"
//!
//! [[roots.children]]
//! label = "England"
//!
//! [[roots.children.children]]
//! label = "London"
//! checked = true
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{Hierarchy, TreeArena, TreeBuilder};

/// Top-level layout of a hierarchy file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyFile {
    pub roots: Vec<Hierarchy>,
}

impl HierarchyFile {
    pub fn parse(content: &str, path: &Path) -> ApplicationResult<Self> {
        toml::from_str(content).map_err(|e| ApplicationError::HierarchyFormat {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    #[instrument(level = "debug")]
    pub fn load(path: &Path) -> ApplicationResult<Self> {
        let content = std::fs::read_to_string(path).with_path_context("read hierarchy", path)?;
        Self::parse(&content, path)
    }
}

/// Where the initial tree comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HierarchySource {
    /// Countries and cities sample compiled into the binary
    BuiltIn,
    File(PathBuf),
}

impl HierarchySource {
    /// Explicit file wins over configured file; otherwise the built-in sample.
    pub fn resolve(explicit: Option<&Path>, configured: Option<&Path>) -> Self {
        explicit
            .or(configured)
            .map(|p| HierarchySource::File(p.to_path_buf()))
            .unwrap_or(HierarchySource::BuiltIn)
    }

    pub fn roots(&self) -> ApplicationResult<Vec<Hierarchy>> {
        match self {
            HierarchySource::BuiltIn => Ok(vec![Hierarchy::europe()]),
            HierarchySource::File(path) => Ok(HierarchyFile::load(path)?.roots),
        }
    }
}

/// Build the checkbox tree described by `source`.
#[instrument(level = "debug")]
pub fn load_tree(source: &HierarchySource) -> ApplicationResult<TreeArena> {
    let roots = source.roots()?;
    let tree = TreeBuilder::new().build(&roots)?;
    debug!(nodes = tree.len(), "hierarchy loaded");
    Ok(tree)
}
