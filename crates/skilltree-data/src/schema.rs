//! Serde structs for skill tree definition files.
//!
//! A definition names nodes and refers to prerequisites by name. The builder
//! resolves those names into engine handles.

use serde::{Deserialize, Serialize};
use skilltree_core::VisualLayout;

/// A whole skill tree as written in a data file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeDefinition {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Nodes in declaration order. A node may only require nodes declared
    /// before it.
    pub nodes: Vec<NodeDefinition>,
}

/// One node of a tree definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDefinition {
    pub name: String,
    #[serde(default)]
    pub auto_unlock: bool,
    /// Names of prerequisite nodes, in progression order.
    #[serde(default)]
    pub requires: Vec<String>,
    #[serde(default)]
    pub visuals: VisualLayout,
    /// Free-form text for whatever renders the node.
    #[serde(default)]
    pub label: Option<String>,
}

impl TreeDefinition {
    pub fn node(&self, name: &str) -> Option<&NodeDefinition> {
        self.nodes.iter().find(|node| node.name == name)
    }
}
