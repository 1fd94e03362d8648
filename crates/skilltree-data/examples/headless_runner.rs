//! Headless runner: loads the starter tree, purchases every node in
//! declaration order, and prints the resulting state.
//!
//! Run with: `cargo run --package skilltree-data --example headless_runner`
//! Set `RUST_LOG=debug` to see every progression update.

use std::path::Path;

use skilltree_core::{TreeEvent, VisualPresenter, VisualSlot};
use skilltree_data::load_tree;
use skilltree_data::loader::find_tree_file;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let trees_dir = Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/trees"));
    let path = find_tree_file(trees_dir, "starter").expect("starter tree should exist");

    let mut built = load_tree(&path, |node| {
        let name = node.name.clone();
        let presenter = move |slot: VisualSlot| info!(node = %name, ?slot, "visual activated");
        Box::new(presenter) as Box<dyn VisualPresenter>
    })
    .unwrap_or_else(|e| panic!("failed to build {}: {e}", path.display()));
    built.tree.drain_events();

    println!("=== {} nodes loaded from {} ===", built.order.len(), path.display());

    for id in built.order.clone() {
        let purchased = built
            .tree
            .on_purchase_input(id)
            .expect("handle from the builder is live");
        let cascade = built
            .tree
            .drain_events()
            .into_iter()
            .filter(|event| matches!(event, TreeEvent::Unlocked { .. }))
            .count();
        let name = built.tree.node(id).map(|n| n.name()).unwrap_or("?");
        println!("  purchase {name:<20} accepted={purchased:<5} unlocks={cascade}");
    }

    println!();
    for (id, node) in built.tree.iter() {
        println!(
            "  [{:>20}] unlocked={:<5} progress={}/{}",
            node.name(),
            node.is_unlocked(),
            built.tree.progress_fulfilled(id).unwrap_or(0),
            node.prerequisites().len()
        );
    }

    let total = built.tree.node_count();
    let unlocked = built.tree.unlocked_count();
    if unlocked == total {
        println!("\nAll {total} nodes unlocked.");
    } else {
        println!("\n{unlocked}/{total} nodes unlocked.");
        std::process::exit(1);
    }
}
