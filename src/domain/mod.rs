//! Domain layer: tri-state tree store and propagation
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod error;
pub mod propagation;
pub mod render;
pub mod state;

pub use arena::{NodeData, NodeId, TreeArena, TreeNode, PATH_SEPARATOR};
pub use builder::{Hierarchy, TreeBuilder};
pub use error::{DomainError, DomainResult};
pub use propagation::{compute, toggle, violations};
pub use render::{render, Glyphs, TreeNodeConvert};
pub use state::TriState;
