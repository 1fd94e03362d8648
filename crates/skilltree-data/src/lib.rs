//! Data-driven skill tree definitions.
//!
//! A tree is described in a RON, TOML, or JSON file (detected from the
//! extension), loaded into a [`schema::TreeDefinition`], and wired into a
//! live [`skilltree_core::SkillTree`] by [`builder::build_tree`], which
//! resolves prerequisite names to node handles in declaration order.

pub mod builder;
pub mod loader;
pub mod schema;

pub use builder::{BuiltTree, build_tree, load_tree};
pub use loader::{DataLoadError, load_tree_definition};
pub use schema::{NodeDefinition, TreeDefinition};
