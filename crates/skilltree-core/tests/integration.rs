//! Integration tests for the skill tree engine.
//!
//! These tests exercise end-to-end behavior through the public API: wiring,
//! progression display, purchases, auto-unlock cascades, listeners, and
//! removal.

use std::cell::RefCell;
use std::rc::Rc;

use skilltree_core::test_utils::*;
use skilltree_core::*;

// ===========================================================================
// Test 1: Two-prerequisite node walks through every display state
// ===========================================================================

#[test]
fn two_prerequisite_node_walkthrough() {
    let mut tree = SkillTree::new();
    let (p1, _) = add_with_board(&mut tree, manual("p1", &[], 0));
    let (p2, _) = add_with_board(&mut tree, manual("p2", &[], 0));
    let (n, board) = add_with_board(&mut tree, manual("n", &[p1, p2], 2));
    let notified = record_unlocks(&mut tree, n);

    assert_eq!(board.active(), Some(VisualSlot::Progression(0)));

    tree.on_purchase_input(p1).unwrap();
    assert_eq!(board.active(), Some(VisualSlot::Progression(1)));

    tree.on_purchase_input(p2).unwrap();
    assert_eq!(board.active(), Some(VisualSlot::Purchasable));
    assert!(tree.can_purchase(n).unwrap());

    assert!(tree.on_purchase_input(n).unwrap());
    assert_eq!(board.active(), Some(VisualSlot::Unlocked));
    assert_eq!(*notified.borrow(), vec![n]);
    assert_eq!(
        board.history(),
        vec![
            VisualSlot::Progression(0),
            VisualSlot::Progression(1),
            VisualSlot::Purchasable,
            VisualSlot::Unlocked,
        ]
    );
}

// ===========================================================================
// Test 2: Link chain between two skills
// ===========================================================================
//
// fireball --link_a--> link_b --> meteor
// Links are auto-unlock nodes; meteor is manual and only becomes purchasable.

#[test]
fn links_carry_unlock_to_next_skill() {
    let mut tree = SkillTree::new();
    let (fireball, _) = add_with_board(&mut tree, manual("fireball", &[], 0));
    let (link_a, link_a_board) = add_with_board(&mut tree, auto("link_a", &[fireball], 1));
    let (link_b, _) = add_with_board(&mut tree, auto("link_b", &[link_a], 1));
    let (meteor, meteor_board) = add_with_board(&mut tree, manual("meteor", &[link_b], 1));

    assert_eq!(link_a_board.active(), Some(VisualSlot::Progression(0)));
    assert_eq!(meteor_board.active(), Some(VisualSlot::Progression(0)));

    assert!(tree.on_purchase_input(fireball).unwrap());

    assert!(tree.is_unlocked(link_a).unwrap());
    assert!(tree.is_unlocked(link_b).unwrap());
    assert!(!tree.is_unlocked(meteor).unwrap());
    assert_eq!(link_a_board.active(), Some(VisualSlot::Unlocked));
    assert_eq!(meteor_board.active(), Some(VisualSlot::Purchasable));

    assert!(tree.on_purchase_input(meteor).unwrap());
    assert_eq!(tree.unlocked_count(), 4);
}

// ===========================================================================
// Test 3: Diamond -- a node requiring two branches waits for both
// ===========================================================================

#[test]
fn diamond_requires_both_branches() {
    let mut tree = SkillTree::new();
    let (root, _) = add_with_board(&mut tree, manual("root", &[], 0));
    let (left, _) = add_with_board(&mut tree, manual("left", &[root], 0));
    let (right, _) = add_with_board(&mut tree, manual("right", &[root], 0));
    let (join, board) = add_with_board(&mut tree, auto("join", &[left, right], 2));

    tree.on_purchase_input(root).unwrap();
    tree.on_purchase_input(left).unwrap();
    assert_eq!(tree.progress_fulfilled(join).unwrap(), 1);
    assert!(!tree.is_unlocked(join).unwrap());
    assert_eq!(board.active(), Some(VisualSlot::Progression(1)));

    tree.on_purchase_input(right).unwrap();
    assert!(tree.is_unlocked(join).unwrap());
    assert_eq!(board.active(), Some(VisualSlot::Unlocked));
}

// ===========================================================================
// Test 4: Exactly one slot active after every call
// ===========================================================================

#[test]
fn visual_exclusivity_across_a_session() {
    let mut tree = SkillTree::new();
    let mut boards = Vec::new();

    let (a, board) = add_with_board(&mut tree, manual("a", &[], 1));
    boards.push(board);
    let (b, board) = add_with_board(&mut tree, manual("b", &[a], 1));
    boards.push(board);
    let (c, board) = add_with_board(&mut tree, auto("c", &[a, b], 2));
    boards.push(board);
    let (d, board) = add_with_board(&mut tree, manual("d", &[c], 3));
    boards.push(board);

    let check = |boards: &[SlotBoard]| {
        for board in boards {
            assert_eq!(board.active_slots().len(), 1, "history: {:?}", board.history());
            assert!(board.unbound_activations().is_empty());
        }
    };

    check(&boards);
    for id in [a, b, d, c] {
        tree.on_purchase_input(id).unwrap();
        check(&boards);
        tree.recompute_progression(id).unwrap();
        check(&boards);
    }
    assert_eq!(tree.unlocked_count(), 4);
}

// ===========================================================================
// Test 5: Premature purchases change nothing
// ===========================================================================

#[test]
fn premature_purchase_is_silent() {
    let mut tree = SkillTree::new();
    let (a, _) = add_with_board(&mut tree, manual("a", &[], 0));
    let (b, board) = add_with_board(&mut tree, manual("b", &[a], 1));
    let notified = record_unlocks(&mut tree, b);
    tree.drain_events();

    for _ in 0..3 {
        assert!(!tree.on_purchase_input(b).unwrap());
    }

    assert!(!tree.is_unlocked(b).unwrap());
    assert!(notified.borrow().is_empty());
    assert!(tree.drain_events().is_empty());
    assert_eq!(board.history(), vec![VisualSlot::Progression(0)]);
}

// ===========================================================================
// Test 6: Fan-out notifies children in construction order
// ===========================================================================

#[test]
fn fan_out_unlocks_children_in_order() {
    let mut tree = SkillTree::new();
    let (hub, spokes) = build_fan(&mut tree, 16);
    tree.drain_events();

    tree.on_purchase_input(hub).unwrap();

    let unlocked: Vec<NodeId> = tree
        .drain_events()
        .into_iter()
        .filter_map(|event| match event {
            TreeEvent::Unlocked { node } => Some(node),
            _ => None,
        })
        .collect();
    let mut expected = vec![hub];
    expected.extend(&spokes);
    assert_eq!(unlocked, expected);
}

// ===========================================================================
// Test 7: Long link chains do not overflow the stack
// ===========================================================================

#[test]
fn long_link_chain_unlocks_iteratively() {
    let mut tree = SkillTree::new();
    let chain = build_link_chain(&mut tree, 100_000);
    tree.drain_events();

    assert!(tree.on_purchase_input(chain[0]).unwrap());

    assert_eq!(tree.unlocked_count(), chain.len());
    assert!(tree.is_unlocked(chain[chain.len() - 1]).unwrap());
}

// ===========================================================================
// Test 8: Listener bookkeeping survives node removal
// ===========================================================================

#[test]
fn removing_leaf_keeps_rest_of_tree_working() {
    let mut tree = SkillTree::new();
    let (a, _) = add_with_board(&mut tree, manual("a", &[], 0));
    let (leaf, _) = add_with_board(&mut tree, auto("leaf", &[a], 0));
    let (other, _) = add_with_board(&mut tree, auto("other", &[a], 0));

    let calls = Rc::new(RefCell::new(Vec::new()));
    let calls_in = calls.clone();
    tree.subscribe(leaf, move |node| calls_in.borrow_mut().push(node))
        .unwrap();

    tree.remove_node(leaf).unwrap();
    assert_eq!(tree.dependents(a).unwrap(), vec![other]);

    tree.on_purchase_input(a).unwrap();
    assert!(tree.is_unlocked(other).unwrap());
    assert!(calls.borrow().is_empty());
}

// ===========================================================================
// Test 9: Cached progress matches a fresh count after every step
// ===========================================================================

#[test]
fn cached_progress_tracks_prerequisites() {
    let mut tree = SkillTree::new();
    let (a, _) = add_with_board(&mut tree, manual("a", &[], 0));
    let (b, _) = add_with_board(&mut tree, manual("b", &[], 0));
    let (c, _) = add_with_board(&mut tree, manual("c", &[], 0));
    let (n, _) = add_with_board(&mut tree, manual("n", &[a, b, c, a], 2));

    for (step, id) in [a, c, b].into_iter().enumerate() {
        tree.on_purchase_input(id).unwrap();
        let fresh = tree.progress_fulfilled(n).unwrap();
        let cached = tree.node(n).unwrap().cached_progress();
        assert_eq!(fresh, cached, "after step {step}");
    }
    // `a` is listed twice and counts twice.
    assert_eq!(tree.progress_fulfilled(n).unwrap(), 4);
    assert!(tree.can_purchase(n).unwrap());
}
