//! Shared test helpers for integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::NodeConfig;
use crate::id::NodeId;
use crate::tree::SkillTree;
use crate::visual::{VisualLayout, VisualPresenter, VisualSlot};

// ===========================================================================
// Config constructors
// ===========================================================================

/// A purchase-to-unlock node with `slots` progression visuals.
pub fn manual(name: &str, prerequisites: &[NodeId], slots: usize) -> NodeConfig {
    NodeConfig::new(name)
        .requires(prerequisites.iter().copied())
        .visuals(VisualLayout::with_progression(slots))
}

/// An auto-unlock node (a link) with `slots` progression visuals.
pub fn auto(name: &str, prerequisites: &[NodeId], slots: usize) -> NodeConfig {
    manual(name, prerequisites, slots).auto_unlock(true)
}

// ===========================================================================
// SlotBoard presenter
// ===========================================================================

#[derive(Debug)]
struct BoardState {
    layout: VisualLayout,
    active: Vec<VisualSlot>,
    history: Vec<VisualSlot>,
}

/// A presenter that keeps an on/off flag per configured slot, like a set of
/// scene objects toggled by `SetActive`. Clones share state, so a test keeps
/// one handle and moves the other into the tree.
#[derive(Debug, Clone)]
pub struct SlotBoard {
    state: Rc<RefCell<BoardState>>,
}

impl SlotBoard {
    pub fn new(layout: VisualLayout) -> Self {
        Self {
            state: Rc::new(RefCell::new(BoardState {
                layout,
                active: Vec::new(),
                history: Vec::new(),
            })),
        }
    }

    /// Every currently active slot. A correct engine never leaves more than
    /// one.
    pub fn active_slots(&self) -> Vec<VisualSlot> {
        self.state.borrow().active.clone()
    }

    /// The single active slot, or `None` if zero or several are active.
    pub fn active(&self) -> Option<VisualSlot> {
        match self.state.borrow().active.as_slice() {
            [slot] => Some(*slot),
            _ => None,
        }
    }

    /// Every activation, oldest first.
    pub fn history(&self) -> Vec<VisualSlot> {
        self.state.borrow().history.clone()
    }

    /// Slots that were activated without being bound by the layout.
    pub fn unbound_activations(&self) -> Vec<VisualSlot> {
        let state = self.state.borrow();
        state
            .history
            .iter()
            .copied()
            .filter(|slot| !state.layout.binds(*slot))
            .collect()
    }
}

impl VisualPresenter for SlotBoard {
    fn activate_exclusive(&mut self, slot: VisualSlot) {
        let mut state = self.state.borrow_mut();
        state.active.clear();
        state.active.push(slot);
        state.history.push(slot);
    }
}

// ===========================================================================
// Tree helpers
// ===========================================================================

/// Add a node with a fresh [`SlotBoard`] matching its layout. Panics if the
/// config is rejected.
pub fn add_with_board(tree: &mut SkillTree, config: NodeConfig) -> (NodeId, SlotBoard) {
    let board = SlotBoard::new(config.visuals);
    let id = tree
        .add_node(config, board.clone())
        .expect("test node config should be valid");
    (id, board)
}

/// Subscribe a listener that records every unlock notification of `node`.
pub fn record_unlocks(tree: &mut SkillTree, node: NodeId) -> Rc<RefCell<Vec<NodeId>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    tree.subscribe(node, move |unlocked| sink.borrow_mut().push(unlocked))
        .expect("node should exist");
    log
}

/// Build a linear chain: one manual root followed by `links` auto-unlock
/// nodes, each requiring the previous one. Returns ids in chain order.
pub fn build_link_chain(tree: &mut SkillTree, links: usize) -> Vec<NodeId> {
    let mut ids = Vec::with_capacity(links + 1);
    let root = tree
        .add_node(manual("root", &[], 0), crate::visual::NoVisuals)
        .expect("root config should be valid");
    ids.push(root);
    for i in 0..links {
        let prev = ids[ids.len() - 1];
        let link = tree
            .add_node(auto(&format!("link_{i}"), &[prev], 1), crate::visual::NoVisuals)
            .expect("link config should be valid");
        ids.push(link);
    }
    ids
}

/// Build a fan: one manual root and `width` auto-unlock children.
pub fn build_fan(tree: &mut SkillTree, width: usize) -> (NodeId, Vec<NodeId>) {
    let root = tree
        .add_node(manual("hub", &[], 0), crate::visual::NoVisuals)
        .expect("hub config should be valid");
    let children = (0..width)
        .map(|i| {
            tree.add_node(auto(&format!("spoke_{i}"), &[root], 0), crate::visual::NoVisuals)
                .expect("spoke config should be valid")
        })
        .collect();
    (root, children)
}
