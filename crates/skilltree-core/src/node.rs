use crate::config::NodeConfig;
use crate::event::SubscriberList;
use crate::id::NodeId;
use crate::visual::{VisualLayout, VisualPresenter};

/// Runtime state of one node in a [`SkillTree`](crate::tree::SkillTree).
pub struct Node {
    pub(crate) config: NodeConfig,
    pub(crate) unlocked: bool,
    /// Satisfied prerequisites as of the last evaluation. Refreshed by a full
    /// scan on every evaluation; never adjusted incrementally.
    pub(crate) progress_fulfilled: usize,
    pub(crate) subscribers: SubscriberList,
    pub(crate) presenter: Box<dyn VisualPresenter>,
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.config.name)
            .field("unlocked", &self.unlocked)
            .field("progress_fulfilled", &self.progress_fulfilled)
            .field("prerequisites", &self.config.prerequisites)
            .field("subscribers", &self.subscribers)
            .finish_non_exhaustive()
    }
}

impl Node {
    pub(crate) fn new(config: NodeConfig, presenter: Box<dyn VisualPresenter>) -> Self {
        Self {
            config,
            unlocked: false,
            progress_fulfilled: 0,
            subscribers: SubscriberList::new(),
            presenter,
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    pub fn is_auto_unlock(&self) -> bool {
        self.config.auto_unlock
    }

    pub fn prerequisites(&self) -> &[NodeId] {
        &self.config.prerequisites
    }

    pub fn visuals(&self) -> &VisualLayout {
        &self.config.visuals
    }

    /// Progress cached by the last evaluation. Use
    /// [`SkillTree::progress_fulfilled`](crate::tree::SkillTree::progress_fulfilled)
    /// for a fresh count.
    pub fn cached_progress(&self) -> usize {
        self.progress_fulfilled
    }

    pub fn subscribers(&self) -> &SubscriberList {
        &self.subscribers
    }
}
