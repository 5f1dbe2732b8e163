//! Application layer: loading hierarchy descriptions into checkbox trees
//!
//! This layer reads files and hands the parsed descriptions to the domain builder.

pub mod error;
pub mod error_ext;
pub mod hierarchy;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use hierarchy::{load_tree, HierarchyFile, HierarchySource};
