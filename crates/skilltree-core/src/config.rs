use serde::{Deserialize, Serialize};

use crate::error::SkillTreeError;
use crate::id::NodeId;
use crate::visual::{VisualLayout, VisualSlot};

/// Construction-time configuration of a node. Immutable once the node is
/// added to a tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Display name, used in diagnostics and lookups.
    pub name: String,

    /// Unlock as soon as every prerequisite is unlocked, without a purchase.
    /// Links between nodes are auto-unlock nodes.
    #[serde(default)]
    pub auto_unlock: bool,

    /// Nodes that must be unlocked first. Order maps onto the progression
    /// visuals: the first satisfied prerequisite advances to slot 1, and so on.
    #[serde(default)]
    pub prerequisites: Vec<NodeId>,

    /// Display slots bound for this node.
    #[serde(default)]
    pub visuals: VisualLayout,
}

impl NodeConfig {
    /// A manual (purchase-to-unlock) node with no prerequisites and the
    /// default layout.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            auto_unlock: false,
            prerequisites: Vec::new(),
            visuals: VisualLayout::default(),
        }
    }

    pub fn auto_unlock(mut self, auto_unlock: bool) -> Self {
        self.auto_unlock = auto_unlock;
        self
    }

    pub fn requires(mut self, prerequisites: impl IntoIterator<Item = NodeId>) -> Self {
        self.prerequisites.extend(prerequisites);
        self
    }

    pub fn visuals(mut self, visuals: VisualLayout) -> Self {
        self.visuals = visuals;
        self
    }

    /// Check the visual bindings. The unlocked visual is always required;
    /// the purchasable visual only for nodes that can be purchased.
    pub(crate) fn validate_visuals(&self) -> Result<(), SkillTreeError> {
        if !self.visuals.unlocked {
            return Err(SkillTreeError::MissingVisual {
                node: self.name.clone(),
                slot: VisualSlot::Unlocked.label(),
            });
        }
        if !self.auto_unlock && !self.visuals.purchasable {
            return Err(SkillTreeError::MissingVisual {
                node: self.name.clone(),
                slot: VisualSlot::Purchasable.label(),
            });
        }
        Ok(())
    }
}
