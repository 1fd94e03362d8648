//! Visual presenter contract.
//!
//! The engine never renders anything. It tells a per-node presenter which of
//! the node's display slots should be the single active one; the presenter
//! owns whatever scene objects back those slots.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Slots
// ---------------------------------------------------------------------------

/// One display slot of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisualSlot {
    /// Partial progress. The index is the number of satisfied prerequisites,
    /// clamped to the last configured progression slot.
    Progression(usize),
    /// All prerequisites satisfied; waiting for a purchase.
    Purchasable,
    /// The node has been unlocked.
    Unlocked,
}

impl VisualSlot {
    /// Short name used in diagnostics and error messages.
    pub fn label(self) -> &'static str {
        match self {
            VisualSlot::Progression(_) => "progression",
            VisualSlot::Purchasable => "purchasable",
            VisualSlot::Unlocked => "unlocked",
        }
    }
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Which display slots a node has bound. Fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualLayout {
    /// Number of partial-progress slots. Zero means no progress visuals.
    #[serde(default)]
    pub progression_slots: usize,
    /// Whether a purchasable visual is bound.
    #[serde(default = "default_bound")]
    pub purchasable: bool,
    /// Whether an unlocked visual is bound.
    #[serde(default = "default_bound")]
    pub unlocked: bool,
}

fn default_bound() -> bool {
    true
}

impl Default for VisualLayout {
    fn default() -> Self {
        Self {
            progression_slots: 0,
            purchasable: true,
            unlocked: true,
        }
    }
}

impl VisualLayout {
    /// A layout with `n` progression slots and both state visuals bound.
    pub fn with_progression(n: usize) -> Self {
        Self {
            progression_slots: n,
            ..Self::default()
        }
    }

    /// Every slot this layout binds, in display order.
    pub fn slots(&self) -> Vec<VisualSlot> {
        let mut slots: Vec<VisualSlot> = (0..self.progression_slots)
            .map(VisualSlot::Progression)
            .collect();
        if self.purchasable {
            slots.push(VisualSlot::Purchasable);
        }
        if self.unlocked {
            slots.push(VisualSlot::Unlocked);
        }
        slots
    }

    /// Whether `slot` is one of the slots this layout binds.
    pub fn binds(&self, slot: VisualSlot) -> bool {
        match slot {
            VisualSlot::Progression(i) => i < self.progression_slots,
            VisualSlot::Purchasable => self.purchasable,
            VisualSlot::Unlocked => self.unlocked,
        }
    }

    /// The progression slot to show for `fulfilled` satisfied prerequisites.
    /// Returns `None` when no progression slots are configured.
    pub fn progression_slot(&self, fulfilled: usize) -> Option<VisualSlot> {
        if self.progression_slots == 0 {
            return None;
        }
        Some(VisualSlot::Progression(
            fulfilled.min(self.progression_slots - 1),
        ))
    }
}

// ---------------------------------------------------------------------------
// Presenter
// ---------------------------------------------------------------------------

/// Receives display decisions for one node.
///
/// After `activate_exclusive` returns, `slot` must be the only active slot of
/// the node; every other slot is deactivated.
pub trait VisualPresenter {
    fn activate_exclusive(&mut self, slot: VisualSlot);
}

impl<F> VisualPresenter for F
where
    F: FnMut(VisualSlot),
{
    fn activate_exclusive(&mut self, slot: VisualSlot) {
        self(slot)
    }
}

/// A presenter that ignores every call. Useful for logic-only trees
/// (headless simulations, servers).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoVisuals;

impl VisualPresenter for NoVisuals {
    fn activate_exclusive(&mut self, _slot: VisualSlot) {}
}
