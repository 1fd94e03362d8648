//! The skill tree: node arena, progression engine, and unlock propagation.
//!
//! Nodes are added with [`SkillTree::add_node`]. Each node subscribes to the
//! unlock notification of every prerequisite and evaluates its progression
//! once, so its display is correct before any input arrives. From then on
//! the tree is driven by two calls:
//!
//! - [`SkillTree::on_purchase_input`] -- the player clicked a node.
//! - [`SkillTree::attempt_unlock`] -- game code unlocks a node directly.
//!
//! # Propagation order
//!
//! An unlock notifies the node's subscribers in registration order. Each
//! dependent recomputes its progression and, if it auto-unlocks, notifies its
//! own subscribers before the next subscriber of the unlocking node is
//! visited (depth-first). The traversal runs on an explicit frame stack, so
//! arbitrarily long link chains do not grow the native stack.
//!
//! # Acyclicity
//!
//! Prerequisites must already exist when a node is added, so the dependency
//! graph cannot contain a cycle. No cycle detection is performed.

use slotmap::SlotMap;
use tracing::{debug, info, trace, warn};

use crate::config::NodeConfig;
use crate::error::SkillTreeError;
use crate::event::{EventLog, TreeEvent, UnlockListener};
use crate::id::{ListenerId, NodeId};
use crate::node::Node;
use crate::visual::{VisualPresenter, VisualSlot};

// ---------------------------------------------------------------------------
// Progression results
// ---------------------------------------------------------------------------

/// Which branch a progression evaluation took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressOutcome {
    /// Prerequisites are missing; this progression slot was activated.
    ShowProgress(VisualSlot),
    /// All prerequisites are unlocked; the purchasable slot was activated.
    Purchasable,
    /// All prerequisites are unlocked and the node unlocked itself.
    AutoUnlocked,
    /// No visual change: the node is already unlocked, or it has no
    /// progression slots and prerequisites are still missing.
    Unchanged,
}

/// Result of [`SkillTree::recompute_progression`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progression {
    /// Unlocked prerequisites, counted by a full scan.
    pub fulfilled: usize,
    /// Total prerequisites.
    pub required: usize,
    pub outcome: ProgressOutcome,
}

impl Progression {
    pub fn is_complete(&self) -> bool {
        self.fulfilled >= self.required
    }
}

// ---------------------------------------------------------------------------
// SkillTree
// ---------------------------------------------------------------------------

/// A skill tree. Owns every node, its presenter, and its subscribers.
///
/// The tree holds boxed callbacks and is not `Send`; keep it on the thread
/// that drives the UI.
#[derive(Debug, Default)]
pub struct SkillTree {
    nodes: SlotMap<NodeId, Node>,

    /// Owning node of each external listener, for `unsubscribe`.
    listeners: SlotMap<ListenerId, NodeId>,

    /// Events recorded since the last drain, bounded.
    events: EventLog,
}

impl SkillTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty tree whose event log keeps at most `capacity` events.
    /// Older events are dropped once the log is full.
    pub fn with_event_capacity(capacity: usize) -> Self {
        Self {
            events: EventLog::new(capacity),
            ..Self::default()
        }
    }

    // -- Construction --

    /// Add a node and wire it to its prerequisites.
    ///
    /// Fails fast if a prerequisite handle does not exist or a required
    /// visual is not bound. On success the node has subscribed to every
    /// prerequisite and evaluated its progression once; an auto-unlock node
    /// with no missing prerequisites is already unlocked when this returns.
    pub fn add_node(
        &mut self,
        config: NodeConfig,
        presenter: impl VisualPresenter + 'static,
    ) -> Result<NodeId, SkillTreeError> {
        self.add_node_boxed(config, Box::new(presenter))
    }

    /// Like [`add_node`](Self::add_node) for an already boxed presenter.
    pub fn add_node_boxed(
        &mut self,
        config: NodeConfig,
        presenter: Box<dyn VisualPresenter>,
    ) -> Result<NodeId, SkillTreeError> {
        for prereq in &config.prerequisites {
            if !self.nodes.contains_key(*prereq) {
                return Err(SkillTreeError::UnknownPrerequisite {
                    node: config.name.clone(),
                    prerequisite: *prereq,
                });
            }
        }
        config.validate_visuals()?;

        let prerequisites = config.prerequisites.clone();
        let id = self.nodes.insert(Node::new(config, presenter));
        for prereq in prerequisites {
            if let Some(node) = self.nodes.get_mut(prereq) {
                node.subscribers.push_dependent(id);
            }
        }

        debug!(node = %self.nodes[id].config.name, "node added");
        self.recompute_progression(id)?;
        Ok(id)
    }

    /// Remove a node, releasing its subscriptions on its prerequisites and
    /// dropping its external listeners. Returns the node's configuration.
    ///
    /// A node that other nodes still list as a prerequisite cannot be
    /// removed; remove the dependents first.
    pub fn remove_node(&mut self, id: NodeId) -> Result<NodeConfig, SkillTreeError> {
        let node = self.nodes.get(id).ok_or(SkillTreeError::NodeNotFound(id))?;

        let mut dependents: Vec<NodeId> = node.subscribers.dependents().collect();
        if !dependents.is_empty() {
            dependents.dedup();
            return Err(SkillTreeError::HasDependents {
                node: id,
                dependents,
            });
        }

        let prerequisites = node.config.prerequisites.clone();
        for prereq in prerequisites {
            if let Some(prereq_node) = self.nodes.get_mut(prereq) {
                prereq_node.subscribers.remove_dependent(id);
            }
        }
        self.listeners.retain(|_, owner| *owner != id);

        let node = self.nodes.remove(id).ok_or(SkillTreeError::NodeNotFound(id))?;
        debug!(node = %node.config.name, "node removed");
        Ok(node.config)
    }

    // -- Subscriptions --

    /// Register an external listener for a node's unlock. Listeners run in
    /// registration order, interleaved with dependent nodes.
    pub fn subscribe(
        &mut self,
        id: NodeId,
        callback: impl FnMut(NodeId) + 'static,
    ) -> Result<ListenerId, SkillTreeError> {
        let boxed: UnlockListener = Box::new(callback);
        let node = self
            .nodes
            .get_mut(id)
            .ok_or(SkillTreeError::NodeNotFound(id))?;
        let listener = self.listeners.insert(id);
        node.subscribers.push_listener(listener, boxed);
        Ok(listener)
    }

    /// Remove an external listener. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, listener: ListenerId) -> bool {
        let Some(owner) = self.listeners.remove(listener) else {
            return false;
        };
        self.nodes
            .get_mut(owner)
            .is_some_and(|node| node.subscribers.remove_listener(listener))
    }

    // -- Progression & unlock --

    /// Re-evaluate a node's progression and apply the resulting display or
    /// unlock decision. If the node auto-unlocks, the cascade through its
    /// dependents completes before this returns.
    pub fn recompute_progression(&mut self, id: NodeId) -> Result<Progression, SkillTreeError> {
        let progression = self.evaluate(id)?;
        if progression.outcome == ProgressOutcome::AutoUnlocked {
            self.propagate(id);
        }
        Ok(progression)
    }

    /// Unlock a node if it is locked and either auto-unlocks or has every
    /// prerequisite unlocked. Returns whether the node unlocked now.
    ///
    /// A rejected attempt is silent: `Ok(false)`, no state change, no
    /// notification.
    pub fn attempt_unlock(&mut self, id: NodeId) -> Result<bool, SkillTreeError> {
        if !self.unlock_transition(id)? {
            return Ok(false);
        }
        self.propagate(id);
        Ok(true)
    }

    /// Handle a purchase input (a click) on a node. Unlocks it when every
    /// prerequisite is unlocked; otherwise does nothing.
    pub fn on_purchase_input(&mut self, id: NodeId) -> Result<bool, SkillTreeError> {
        if !self.can_purchase(id)? {
            trace!(node = %self.nodes[id].config.name, "purchase ignored, prerequisites missing");
            return Ok(false);
        }
        self.attempt_unlock(id)
    }

    // -- Queries --

    /// Whether the node has unlocked.
    pub fn is_unlocked(&self, id: NodeId) -> Result<bool, SkillTreeError> {
        self.nodes
            .get(id)
            .map(|node| node.unlocked)
            .ok_or(SkillTreeError::NodeNotFound(id))
    }

    /// Number of unlocked prerequisites, counted now.
    pub fn progress_fulfilled(&self, id: NodeId) -> Result<usize, SkillTreeError> {
        let node = self.nodes.get(id).ok_or(SkillTreeError::NodeNotFound(id))?;
        Ok(self.count_fulfilled(node))
    }

    /// Whether every prerequisite is unlocked. True for a node without
    /// prerequisites. Says nothing about whether the node is already unlocked.
    pub fn can_purchase(&self, id: NodeId) -> Result<bool, SkillTreeError> {
        let node = self.nodes.get(id).ok_or(SkillTreeError::NodeNotFound(id))?;
        Ok(self.count_fulfilled(node) >= node.config.prerequisites.len())
    }

    /// The node's prerequisites, in configuration order.
    pub fn prerequisites(&self, id: NodeId) -> Result<&[NodeId], SkillTreeError> {
        self.nodes
            .get(id)
            .map(|node| node.prerequisites())
            .ok_or(SkillTreeError::NodeNotFound(id))
    }

    /// Nodes subscribed to this node's unlock, in registration order.
    pub fn dependents(&self, id: NodeId) -> Result<Vec<NodeId>, SkillTreeError> {
        self.nodes
            .get(id)
            .map(|node| node.subscribers.dependents().collect())
            .ok_or(SkillTreeError::NodeNotFound(id))
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// First node with the given name.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, node)| node.config.name == name)
            .map(|(id, _)| id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn unlocked_count(&self) -> usize {
        self.nodes.values().filter(|node| node.unlocked).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter()
    }

    // -- Event API --

    /// Drain all recorded events, oldest first.
    pub fn drain_events(&mut self) -> Vec<TreeEvent> {
        self.events.drain()
    }

    /// Read-only view of recorded events, with the log's drop counters.
    pub fn pending_events(&self) -> &EventLog {
        &self.events
    }

    // -- Internal helpers --

    fn count_fulfilled(&self, node: &Node) -> usize {
        node.config
            .prerequisites
            .iter()
            .filter(|prereq| self.nodes.get(**prereq).is_some_and(|p| p.unlocked))
            .count()
    }

    /// One progression evaluation without notifying subscribers. When the
    /// outcome is `AutoUnlocked` the caller owes the node a propagation.
    fn evaluate(&mut self, id: NodeId) -> Result<Progression, SkillTreeError> {
        let node = self.nodes.get(id).ok_or(SkillTreeError::NodeNotFound(id))?;
        let fulfilled = self.count_fulfilled(node);
        let required = node.config.prerequisites.len();

        let node = &mut self.nodes[id];
        node.progress_fulfilled = fulfilled;
        debug!(node = %node.config.name, fulfilled, required, "progression updated");
        self.events.push(TreeEvent::ProgressUpdated {
            node: id,
            fulfilled,
            required,
        });

        let progress_slot = node.config.visuals.progression_slot(fulfilled);
        let unlocked = node.unlocked;
        let auto_unlock = node.config.auto_unlock;

        let outcome = match progress_slot {
            Some(slot) if fulfilled < required => {
                show(&mut self.nodes[id], slot);
                ProgressOutcome::ShowProgress(slot)
            }
            _ if !unlocked && fulfilled == required && auto_unlock => {
                debug!(node = %self.nodes[id].config.name, "requirements met, auto-unlocking");
                if self.unlock_transition(id)? {
                    ProgressOutcome::AutoUnlocked
                } else {
                    ProgressOutcome::Unchanged
                }
            }
            _ if !unlocked && fulfilled == required => {
                show(&mut self.nodes[id], VisualSlot::Purchasable);
                self.events.push(TreeEvent::BecamePurchasable { node: id });
                ProgressOutcome::Purchasable
            }
            _ => ProgressOutcome::Unchanged,
        };

        Ok(Progression {
            fulfilled,
            required,
            outcome,
        })
    }

    /// The guarded locked -> unlocked transition, without notification.
    fn unlock_transition(&mut self, id: NodeId) -> Result<bool, SkillTreeError> {
        let node = self.nodes.get(id).ok_or(SkillTreeError::NodeNotFound(id))?;
        let fulfilled = self.count_fulfilled(node);
        let can_purchase = fulfilled >= node.config.prerequisites.len();

        if node.unlocked || !(node.config.auto_unlock || can_purchase) {
            trace!(node = %node.config.name, unlocked = node.unlocked, "unlock rejected");
            return Ok(false);
        }

        let node = &mut self.nodes[id];
        node.unlocked = true;
        node.progress_fulfilled = fulfilled;
        show(node, VisualSlot::Unlocked);
        info!(node = %node.config.name, "node unlocked");
        self.events.push(TreeEvent::Unlocked { node: id });
        Ok(true)
    }

    /// Notify the subscribers of a freshly unlocked node, depth-first.
    ///
    /// Each frame is (unlocked node, next subscriber index). A dependent that
    /// unlocks pushes its own frame, so its whole cascade finishes before the
    /// next subscriber of the frame below is visited.
    fn propagate(&mut self, root: NodeId) {
        let mut stack: Vec<(NodeId, usize)> = vec![(root, 0)];

        while let Some(frame) = stack.last_mut() {
            let (source, index) = *frame;
            frame.1 += 1;

            let Some(node) = self.nodes.get_mut(source) else {
                stack.pop();
                continue;
            };
            if index >= node.subscribers.len() {
                stack.pop();
                continue;
            }

            let Some(dependent) = node.subscribers.notify(index, source) else {
                continue;
            };
            match self.evaluate(dependent) {
                Ok(progression) if progression.outcome == ProgressOutcome::AutoUnlocked => {
                    stack.push((dependent, 0));
                }
                Ok(_) => {}
                Err(err) => warn!(%err, "dangling dependent skipped"),
            }
        }
    }
}

/// Activate `slot` as the node's only visible slot.
fn show(node: &mut Node, slot: VisualSlot) {
    debug!(node = %node.config.name, ?slot, "active visual set");
    node.presenter.activate_exclusive(slot);
}

// ===========================================================================
// Tests
// ===========================================================================
