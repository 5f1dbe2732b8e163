//! Tri-state checkbox trees.
//!
//! A [`domain::TreeArena`] holds labelled nodes that are `Checked`, `Unchecked`
//! or `Inconsistent`. Toggling a node forces its subtree to the new state and
//! recomputes every ancestor from its children:
//!
//! ```
//! use checktree::domain::{Hierarchy, TreeBuilder, TriState};
//!
//! let mut tree = TreeBuilder::new().build(&[Hierarchy::europe()]).unwrap();
//! tree.toggle_path("Europe/England/London").unwrap();
//!
//! let england = tree.find_by_path("Europe/England").unwrap();
//! assert_eq!(tree.state(england).unwrap(), TriState::Inconsistent);
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;
