//! Skill tree core -- the unlock-propagation engine for game skill trees.
//!
//! A skill tree is a set of nodes, each naming the nodes that must be
//! unlocked before it. This crate keeps every node's unlock state, counts
//! satisfied prerequisites, picks what each node should display, and pushes
//! unlocks through the tree.
//!
//! # Flow
//!
//! 1. **Construction** -- [`tree::SkillTree::add_node`] subscribes the node to
//!    its prerequisites and evaluates its progression once.
//! 2. **Progression** -- when a prerequisite unlocks, each dependent recounts
//!    its unlocked prerequisites (full scan) and shows a progression slot, the
//!    purchasable slot, or unlocks itself if configured to auto-unlock.
//! 3. **Purchase** -- [`tree::SkillTree::on_purchase_input`] unlocks a node
//!    whose prerequisites are all unlocked.
//! 4. **Propagation** -- an unlock notifies subscribers in registration
//!    order, depth-first, within the same call.
//!
//! ```rust,ignore
//! let mut tree = SkillTree::new();
//! let root = tree.add_node(NodeConfig::new("root"), NoVisuals)?;
//! let link = tree.add_node(
//!     NodeConfig::new("link").auto_unlock(true).requires([root]),
//!     NoVisuals,
//! )?;
//! tree.on_purchase_input(root)?;
//! assert!(tree.is_unlocked(link)?);
//! ```
//!
//! # Key Types
//!
//! - [`tree::SkillTree`] -- node arena, progression engine, unlock action.
//! - [`config::NodeConfig`] -- immutable per-node configuration.
//! - [`visual::VisualPresenter`] -- exactly-one-of-N display contract.
//! - [`event::TreeEvent`] -- drained log of progression and unlock events.

pub mod config;
pub mod error;
pub mod event;
pub mod id;
pub mod node;
pub mod tree;
pub mod visual;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::NodeConfig;
pub use error::SkillTreeError;
pub use event::{DEFAULT_EVENT_CAPACITY, EventLog, TreeEvent};
pub use id::{ListenerId, NodeId};
pub use tree::{ProgressOutcome, Progression, SkillTree};
pub use visual::{NoVisuals, VisualLayout, VisualPresenter, VisualSlot};
