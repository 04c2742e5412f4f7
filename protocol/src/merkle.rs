//! Merkle commitments over leaf batches.
//!
//! Every level with an odd number of nodes is padded with one zero hash before adjacent nodes
//! are paired as `keccak256(left || right)`. At least one pairing round always happens, so
//! a single leaf `a` has root `keccak256(a || 0x00..00)`.

use crate::error::{Error, Result};
use alloy::primitives::{B256, keccak256};

pub const MAX_TREE_HEIGHT: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleProof {
    /// Index of the proven leaf, after any rightmost substitution.
    pub index: usize,
    /// Sibling hashes from the leaf level upwards.
    pub siblings: Vec<B256>,
    /// For each level, whether the tracked node was the left child.
    pub left_flags: Vec<bool>,
}

impl MerkleProof {
    /// Folds the proof over `leaf` and returns the resulting root.
    pub fn compute_root(&self, leaf: B256) -> Result<B256> {
        if self.siblings.len() > MAX_TREE_HEIGHT {
            return Err(Error::HeightOverflow(self.siblings.len()));
        }
        if self.left_flags.len() != self.siblings.len() {
            return Err(Error::InvalidFieldLength {
                field: "MerkleProof::leftFlags",
                length: self.left_flags.len(),
            });
        }
        Ok(self
            .siblings
            .iter()
            .zip(&self.left_flags)
            .fold(leaf, |node, (sibling, is_left)| {
                if *is_left {
                    hash_pair(&node, sibling)
                } else {
                    hash_pair(sibling, &node)
                }
            }))
    }

    pub fn verify(&self, leaf: B256, root: B256) -> Result<bool> {
        Ok(self.compute_root(leaf)? == root)
    }
}

pub fn hash_pair(left: &B256, right: &B256) -> B256 {
    let mut buffer = [0u8; 64];
    buffer[..32].copy_from_slice(left.as_slice());
    buffer[32..].copy_from_slice(right.as_slice());
    keccak256(buffer)
}

/// Index used when a proof is requested past the last leaf: the last leaf present.
pub fn rightmost_index(leaf_count: usize) -> Option<usize> {
    leaf_count.checked_sub(1)
}

/// Root over already hashed leaves. An empty batch commits to the zero hash.
pub fn merkle_root(leaves: &[B256]) -> Result<B256> {
    if leaves.is_empty() {
        return Ok(B256::ZERO);
    }
    let mut level = leaves.to_vec();
    let mut height = 0;
    loop {
        level = next_level(level);
        height += 1;
        if height > MAX_TREE_HEIGHT {
            return Err(Error::HeightOverflow(height));
        }
        if level.len() == 1 {
            return Ok(level[0]);
        }
    }
}

/// Inclusion proof for `index`, substituting [`rightmost_index`] when it is out of range.
pub fn merkle_proof(leaves: &[B256], index: usize) -> Result<MerkleProof> {
    let last = rightmost_index(leaves.len()).ok_or(Error::EmptyTree)?;
    let index = index.min(last);

    let mut level = leaves.to_vec();
    let mut tracked = index;
    let mut siblings = Vec::new();
    let mut left_flags = Vec::new();
    loop {
        if level.len() % 2 == 1 {
            level.push(B256::ZERO);
        }
        let is_left = tracked % 2 == 0;
        let sibling = if is_left { tracked + 1 } else { tracked - 1 };
        siblings.push(level[sibling]);
        left_flags.push(is_left);
        if siblings.len() > MAX_TREE_HEIGHT {
            return Err(Error::HeightOverflow(siblings.len()));
        }

        level = next_level(level);
        tracked /= 2;
        if level.len() == 1 {
            return Ok(MerkleProof {
                index,
                siblings,
                left_flags,
            });
        }
    }
}

fn next_level(mut level: Vec<B256>) -> Vec<B256> {
    if level.len() % 2 == 1 {
        level.push(B256::ZERO);
    }
    level
        .chunks_exact(2)
        .map(|pair| hash_pair(&pair[0], &pair[1]))
        .collect()
}
