// Copyright 2026 abhirupbanerjee
// Licensed under the Apache License, Version 2.0

//! Append-only sparse Merkle tree over note commitments.
//!
//! Depth [`MERKLE_DEPTH`], zero-valued empty leaves, nodes hashed with
//! `H(MERKLE_NODE, left, right)`. The same layout is used by the indexer and
//! by [`MemoryLedger`](crate::ledger::MemoryLedger), so roots computed here
//! can be compared directly against ledger roots.
//!
//! # Example
//!
//! ```rust
//! use shroud_sdk::merkle::{empty_root, verify_proof, SparseMerkleTree};
//! # use ark_bls12_381::Fr;
//!
//! let mut tree = SparseMerkleTree::new();
//! assert_eq!(tree.root().0, empty_root());
//!
//! let idx = tree.insert(Fr::from(7u64)).unwrap();
//! let proof = tree.proof(idx).unwrap();
//! assert!(verify_proof(Fr::from(7u64), &proof));
//! ```

use ark_bls12_381::Fr;
use ark_ff::AdditiveGroup;
use shroud_primitives::merkle_hash;
use shroud_types::{MerkleProof, MerkleRoot, MERKLE_DEPTH};

use crate::error::{SdkError, SdkResult};

/// Number of leaves a depth-[`MERKLE_DEPTH`] tree can hold.
pub const TREE_CAPACITY: u64 = 1 << MERKLE_DEPTH;

/// `zeros[i]` is the root of an empty subtree of height `i`.
pub fn zero_hashes() -> Vec<Fr> {
    let mut zeros = vec![Fr::ZERO; MERKLE_DEPTH + 1];
    for i in 1..=MERKLE_DEPTH {
        zeros[i] = merkle_hash(zeros[i - 1], zeros[i - 1]);
    }
    zeros
}

pub fn empty_root() -> Fr {
    zero_hashes()[MERKLE_DEPTH]
}

fn next_layer(layer: &[Fr], zero: Fr) -> Vec<Fr> {
    layer
        .chunks(2)
        .map(|pair| merkle_hash(pair[0], pair.get(1).copied().unwrap_or(zero)))
        .collect()
}

/// Root of a tree holding exactly `leaves` at indices `0..leaves.len()`.
pub fn compute_root_from_leaves(leaves: &[Fr]) -> Fr {
    let zeros = zero_hashes();
    if leaves.is_empty() {
        return zeros[MERKLE_DEPTH];
    }
    let mut layer = leaves.to_vec();
    for zero in zeros.iter().take(MERKLE_DEPTH) {
        layer = next_layer(&layer, *zero);
    }
    layer[0]
}

/// Fold a leaf up its authentication path.
pub fn compute_root_from_path(leaf: Fr, siblings: &[Fr], indices: &[bool]) -> Fr {
    siblings
        .iter()
        .zip(indices)
        .fold(leaf, |current, (sibling, is_right)| {
            if *is_right {
                merkle_hash(*sibling, current)
            } else {
                merkle_hash(current, *sibling)
            }
        })
}

/// Check `proof` for `leaf` against the root the proof claims. Path bits must
/// agree with `proof.leaf_index`.
pub fn verify_proof(leaf: Fr, proof: &MerkleProof) -> bool {
    if proof.siblings.len() != MERKLE_DEPTH || proof.indices.len() != MERKLE_DEPTH {
        return false;
    }
    let bits_match = proof
        .indices
        .iter()
        .enumerate()
        .all(|(level, bit)| ((proof.leaf_index >> level) & 1 == 1) == *bit);
    bits_match && compute_root_from_path(leaf, &proof.siblings, &proof.indices) == proof.root
}

#[derive(Clone, Debug)]
pub struct SparseMerkleTree {
    leaves: Vec<Fr>,
    zeros: Vec<Fr>,
    capacity: u64,
}

impl Default for SparseMerkleTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SparseMerkleTree {
    pub fn new() -> Self {
        Self::with_capacity(TREE_CAPACITY)
    }

    /// A tree that refuses leaves past `capacity`, itself clamped to
    /// [`TREE_CAPACITY`].
    pub fn with_capacity(capacity: u64) -> Self {
        Self {
            leaves: Vec::new(),
            zeros: zero_hashes(),
            capacity: capacity.min(TREE_CAPACITY),
        }
    }

    /// Append a leaf and return its index. Fails with [`SdkError::TreeFull`]
    /// once every position is taken.
    pub fn insert(&mut self, leaf: Fr) -> SdkResult<u64> {
        let idx = self.next_index();
        if idx >= self.capacity {
            return Err(SdkError::TreeFull {
                capacity: self.capacity,
            });
        }
        self.leaves.push(leaf);
        Ok(idx)
    }

    pub fn next_index(&self) -> u64 {
        self.leaves.len() as u64
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Positions still free.
    pub fn remaining(&self) -> u64 {
        self.capacity - self.next_index()
    }

    pub fn leaves(&self) -> &[Fr] {
        &self.leaves
    }

    pub fn position(&self, leaf: &Fr) -> Option<u64> {
        self.leaves.iter().position(|l| l == leaf).map(|i| i as u64)
    }

    pub fn root(&self) -> MerkleRoot {
        if self.leaves.is_empty() {
            return MerkleRoot(self.zeros[MERKLE_DEPTH]);
        }
        let mut layer = self.leaves.clone();
        for level in 0..MERKLE_DEPTH {
            layer = next_layer(&layer, self.zeros[level]);
        }
        MerkleRoot(layer[0])
    }

    /// Authentication path for the leaf at `index`, or `None` past the end.
    pub fn proof(&self, index: u64) -> Option<MerkleProof> {
        let index = usize::try_from(index).ok()?;
        if index >= self.leaves.len() {
            return None;
        }
        let mut siblings = Vec::with_capacity(MERKLE_DEPTH);
        let mut indices = Vec::with_capacity(MERKLE_DEPTH);
        let mut layer = self.leaves.clone();
        let mut idx = index;

        for level in 0..MERKLE_DEPTH {
            let zero = self.zeros[level];
            let is_right = idx & 1 == 1;
            indices.push(is_right);
            let sibling_idx = if is_right { idx - 1 } else { idx + 1 };
            siblings.push(layer.get(sibling_idx).copied().unwrap_or(zero));
            layer = next_layer(&layer, zero);
            idx /= 2;
        }

        Some(MerkleProof {
            root: layer[0],
            siblings,
            indices,
            leaf_index: index as u64,
        })
    }
}
