//! Wire a [`TreeDefinition`] into a live [`SkillTree`].

use std::collections::HashMap;
use std::path::Path;

use skilltree_core::{NodeConfig, NodeId, SkillTree, VisualPresenter};
use tracing::{debug, info};

use crate::loader::{DataLoadError, load_tree_definition, resolve_name};
use crate::schema::{NodeDefinition, TreeDefinition};

/// A tree built from a definition, with its name-to-handle map.
#[derive(Debug)]
pub struct BuiltTree {
    pub tree: SkillTree,
    pub ids: HashMap<String, NodeId>,
    /// Handles in declaration order.
    pub order: Vec<NodeId>,
}

impl BuiltTree {
    pub fn id(&self, name: &str) -> Option<NodeId> {
        self.ids.get(name).copied()
    }
}

/// Build a tree from a definition.
///
/// Nodes are added in declaration order, so every `requires` entry must name
/// a node declared earlier. `presenters` supplies the presenter for each node.
pub fn build_tree<F>(
    definition: &TreeDefinition,
    mut presenters: F,
) -> Result<BuiltTree, DataLoadError>
where
    F: FnMut(&NodeDefinition) -> Box<dyn VisualPresenter>,
{
    let mut tree = SkillTree::new();
    let mut ids: HashMap<String, NodeId> = HashMap::with_capacity(definition.nodes.len());
    let mut order = Vec::with_capacity(definition.nodes.len());

    for node in &definition.nodes {
        if ids.contains_key(&node.name) {
            return Err(DataLoadError::DuplicateName {
                tree: definition.name.clone(),
                name: node.name.clone(),
            });
        }

        let prerequisites = node
            .requires
            .iter()
            .map(|name| resolve_name(&ids, name, &definition.name, &node.name).copied())
            .collect::<Result<Vec<_>, _>>()?;

        let config = NodeConfig::new(node.name.clone())
            .auto_unlock(node.auto_unlock)
            .requires(prerequisites)
            .visuals(node.visuals);
        let id = tree.add_node_boxed(config, presenters(node))?;
        debug!(tree = %definition.name, node = %node.name, "node wired");

        ids.insert(node.name.clone(), id);
        order.push(id);
    }

    info!(
        tree = %definition.name,
        nodes = order.len(),
        unlocked = tree.unlocked_count(),
        "tree built"
    );
    Ok(BuiltTree { tree, ids, order })
}

/// Load a definition file and build it.
pub fn load_tree<F>(path: &Path, presenters: F) -> Result<BuiltTree, DataLoadError>
where
    F: FnMut(&NodeDefinition) -> Box<dyn VisualPresenter>,
{
    let definition = load_tree_definition(path)?;
    build_tree(&definition, presenters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use skilltree_core::test_utils::SlotBoard;
    use skilltree_core::{NoVisuals, SkillTreeError, VisualLayout, VisualSlot};

    fn node(name: &str, requires: &[&str]) -> NodeDefinition {
        NodeDefinition {
            name: name.to_string(),
            auto_unlock: false,
            requires: requires.iter().map(|s| s.to_string()).collect(),
            visuals: VisualLayout::default(),
            label: None,
        }
    }

    fn link(name: &str, requires: &[&str]) -> NodeDefinition {
        NodeDefinition {
            auto_unlock: true,
            visuals: VisualLayout {
                progression_slots: 1,
                purchasable: false,
                unlocked: true,
            },
            ..node(name, requires)
        }
    }

    fn tree_of(nodes: Vec<NodeDefinition>) -> TreeDefinition {
        TreeDefinition {
            name: "test".to_string(),
            description: None,
            nodes,
        }
    }

    fn no_visuals(_: &NodeDefinition) -> Box<dyn VisualPresenter> {
        Box::new(NoVisuals)
    }

    // -----------------------------------------------------------------------
    // Wiring
    // -----------------------------------------------------------------------

    #[test]
    fn resolves_names_in_declaration_order() {
        let def = tree_of(vec![
            node("root", &[]),
            link("link", &["root"]),
            node("tip", &["link"]),
        ]);
        let built = build_tree(&def, no_visuals).unwrap();

        let root = built.id("root").unwrap();
        let link = built.id("link").unwrap();
        let tip = built.id("tip").unwrap();
        assert_eq!(built.order, vec![root, link, tip]);
        assert_eq!(built.tree.prerequisites(tip).unwrap(), &[link]);
        assert_eq!(built.tree.dependents(root).unwrap(), vec![link]);
    }

    #[test]
    fn built_tree_propagates_purchases() {
        let def = tree_of(vec![
            node("root", &[]),
            link("link", &["root"]),
            node("tip", &["link"]),
        ]);
        let mut built = build_tree(&def, no_visuals).unwrap();
        let (root, link, tip) = (
            built.id("root").unwrap(),
            built.id("link").unwrap(),
            built.id("tip").unwrap(),
        );

        assert!(built.tree.on_purchase_input(root).unwrap());
        assert!(built.tree.is_unlocked(link).unwrap());
        assert!(built.tree.can_purchase(tip).unwrap());
        assert!(!built.tree.is_unlocked(tip).unwrap());
    }

    #[test]
    fn presenter_factory_sees_each_node() {
        let def = tree_of(vec![node("a", &[]), node("b", &["a"])]);
        let mut boards = HashMap::new();
        let built = build_tree(&def, |node| {
            let board = SlotBoard::new(node.visuals);
            boards.insert(node.name.clone(), board.clone());
            Box::new(board)
        })
        .unwrap();

        assert_eq!(built.tree.node_count(), 2);
        assert_eq!(boards["a"].active(), Some(VisualSlot::Purchasable));
        assert_eq!(boards["b"].active(), None);
    }

    // -----------------------------------------------------------------------
    // Errors
    // -----------------------------------------------------------------------

    #[test]
    fn forward_reference_is_unresolved() {
        let def = tree_of(vec![node("a", &["b"]), node("b", &[])]);
        let err = build_tree(&def, no_visuals).unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::UnresolvedRef { ref node, ref name, .. } if node == "a" && name == "b"
        ));
    }

    #[test]
    fn self_reference_is_unresolved() {
        let def = tree_of(vec![node("a", &["a"])]);
        assert!(matches!(
            build_tree(&def, no_visuals),
            Err(DataLoadError::UnresolvedRef { .. })
        ));
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let def = tree_of(vec![node("a", &[]), node("a", &[])]);
        assert!(matches!(
            build_tree(&def, no_visuals),
            Err(DataLoadError::DuplicateName { ref name, .. }) if name == "a"
        ));
    }

    #[test]
    fn unbound_purchasable_on_manual_node_is_tree_error() {
        let mut bad = node("a", &[]);
        bad.visuals.purchasable = false;
        let def = tree_of(vec![bad]);
        assert!(matches!(
            build_tree(&def, no_visuals),
            Err(DataLoadError::Tree(SkillTreeError::MissingVisual { slot: "purchasable", .. }))
        ));
    }
}
