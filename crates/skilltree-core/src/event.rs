//! Unlock notifications and the tree event log.
//!
//! Every node owns a [`SubscriberList`]. Two kinds of subscribers share it:
//!
//! - **Dependents**: nodes that listed this node as a prerequisite. They are
//!   registered when the dependent is constructed and recompute their
//!   progression when notified.
//! - **Listeners**: external callbacks (sound, tooltips, analytics) that only
//!   observe the unlock.
//!
//! Both are notified in registration order. Separately, the tree records a
//! [`TreeEvent`] log that game code drains once per frame. The log is
//! bounded: once full, the oldest event is dropped for each new one.

use std::collections::VecDeque;

use crate::id::{ListenerId, NodeId};

// ---------------------------------------------------------------------------
// Event log
// ---------------------------------------------------------------------------

/// A state change recorded by the tree, in occurrence order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEvent {
    /// A node re-evaluated its prerequisites.
    ProgressUpdated {
        node: NodeId,
        fulfilled: usize,
        required: usize,
    },
    /// A manual node has every prerequisite unlocked and can be purchased.
    BecamePurchasable { node: NodeId },
    /// A node unlocked. Recorded before its subscribers are notified.
    Unlocked { node: NodeId },
}

impl TreeEvent {
    /// The node the event is about.
    pub fn node(&self) -> NodeId {
        match self {
            TreeEvent::ProgressUpdated { node, .. }
            | TreeEvent::BecamePurchasable { node }
            | TreeEvent::Unlocked { node } => *node,
        }
    }
}

// ---------------------------------------------------------------------------
// EventLog -- bounded, drops oldest
// ---------------------------------------------------------------------------

/// Events a tree keeps by default before dropping the oldest.
pub const DEFAULT_EVENT_CAPACITY: usize = 4096;

/// A bounded FIFO of tree events. When full, pushing drops the oldest event.
#[derive(Debug, Clone)]
pub struct EventLog {
    events: VecDeque<TreeEvent>,
    capacity: usize,
    /// Total events ever pushed (including dropped).
    total_written: u64,
    dropped: u64,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

impl EventLog {
    /// Create a log holding at most `capacity` events. A capacity of 0 is
    /// clamped to 1.
    pub fn new(capacity: usize) -> Self {
        Self {
            events: VecDeque::new(),
            capacity: capacity.max(1),
            total_written: 0,
            dropped: 0,
        }
    }

    pub(crate) fn push(&mut self, event: TreeEvent) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
            self.dropped += 1;
        }
        self.events.push_back(event);
        self.total_written += 1;
    }

    /// Remove and return every stored event, oldest first.
    pub(crate) fn drain(&mut self) -> Vec<TreeEvent> {
        self.events.drain(..).collect()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Total events recorded since creation, including dropped ones.
    pub fn total_written(&self) -> u64 {
        self.total_written
    }

    /// Events dropped because the log was full.
    pub fn dropped_count(&self) -> u64 {
        self.dropped
    }

    /// Stored events, oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &TreeEvent> + '_ {
        self.events.iter()
    }

    /// The most recent event, if any.
    pub fn last(&self) -> Option<&TreeEvent> {
        self.events.back()
    }
}

// ---------------------------------------------------------------------------
// Subscribers
// ---------------------------------------------------------------------------

/// An external unlock listener. Receives the node that unlocked.
pub type UnlockListener = Box<dyn FnMut(NodeId)>;

pub(crate) enum Subscriber {
    Dependent(NodeId),
    Listener {
        id: ListenerId,
        callback: UnlockListener,
    },
}

impl std::fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Subscriber::Dependent(node) => write!(f, "Dependent({node:?})"),
            Subscriber::Listener { id, .. } => write!(f, "Listener({id:?}, <fn>)"),
        }
    }
}

/// Ordered subscribers of one node's unlock notification.
#[derive(Debug, Default)]
pub struct SubscriberList {
    entries: Vec<Subscriber>,
}

impl SubscriberList {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_dependent(&mut self, node: NodeId) {
        self.entries.push(Subscriber::Dependent(node));
    }

    pub(crate) fn push_listener(&mut self, id: ListenerId, callback: UnlockListener) {
        self.entries.push(Subscriber::Listener { id, callback });
    }

    /// Drop every dependent entry for `node`. Returns how many were removed.
    pub(crate) fn remove_dependent(&mut self, node: NodeId) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|entry| !matches!(entry, Subscriber::Dependent(n) if *n == node));
        before - self.entries.len()
    }

    /// Drop the listener with `id`. Returns whether it was present.
    pub(crate) fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries
            .retain(|entry| !matches!(entry, Subscriber::Listener { id: l, .. } if *l == id));
        before != self.entries.len()
    }

    /// Dependent nodes in registration order. A node that lists the same
    /// prerequisite twice appears twice.
    pub fn dependents(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.entries.iter().filter_map(|entry| match entry {
            Subscriber::Dependent(node) => Some(*node),
            Subscriber::Listener { .. } => None,
        })
    }

    /// Number of external listeners.
    pub fn listener_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| matches!(entry, Subscriber::Listener { .. }))
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Deliver the notification for `source` to entry `index`.
    ///
    /// Listeners are invoked in place. For a dependent, the dependent's id is
    /// returned so the caller can recompute it with the whole tree borrowed.
    pub(crate) fn notify(&mut self, index: usize, source: NodeId) -> Option<NodeId> {
        match self.entries.get_mut(index)? {
            Subscriber::Dependent(node) => Some(*node),
            Subscriber::Listener { callback, .. } => {
                callback(source);
                None
            }
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
