use alloc::vec::Vec;

use crate::field::FieldElement;

pub const MERKLE_DEPTH: usize = 20;

/// Inclusion witness for one leaf at a specific snapshot root.
///
/// `indices[i]` is `true` when the running node is the right child at level `i`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MerkleProof {
    pub root: FieldElement,
    pub siblings: Vec<FieldElement>,
    pub indices: Vec<bool>,
    pub leaf_index: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MerkleRoot(pub FieldElement);
