use slotmap::new_key_type;

new_key_type! {
    /// Identifies a node (skill or link) in the skill tree.
    pub struct NodeId;

    /// Identifies an external unlock listener registered on a node.
    pub struct ListenerId;
}
