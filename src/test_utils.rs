//! Shared helpers for the test suites: naive whole-tree recomputation and
//! independent path reconstruction to check the incremental engine against.

use crate::{
    bundle::MerkleBundle,
    digest::Digest256,
    hash::{hash_children, PathHasher, Sha256Eval},
    path::AuthPath,
};

/// All node digests of a full depth-`depth` tree over `leaves`. Empty
/// slots hold the zero digest, and so does every node whose whole subtree
/// is empty — an untouched subtree contributes the zero digest directly,
/// not a hash of zeros. `levels[0]` are the `2^depth` leaf slots,
/// `levels[depth]` is the single root.
pub(crate) fn naive_levels_256(depth: usize, leaves: &[Digest256]) -> Vec<Vec<Digest256>> {
    assert!(leaves.len() <= 1 << depth, "too many leaves for depth");

    let mut slots = vec![Digest256::ZERO; 1 << depth];
    slots[..leaves.len()].copy_from_slice(leaves);

    let mut levels = vec![slots];
    for height in 1..=depth {
        let below = levels.last().unwrap();
        let above = below
            .chunks_exact(2)
            .enumerate()
            .map(|(j, pair)| {
                // subtree of node j at this height spans leaves j*2^h..
                if j << height >= leaves.len() {
                    Digest256::ZERO
                } else {
                    hash_children::<Sha256Eval>(&pair[0], &pair[1]).unwrap()
                }
            })
            .collect();
        levels.push(above);
    }
    levels
}

/// Root of a full zero-padded tree over `leaves`.
pub(crate) fn naive_root_256(depth: usize, leaves: &[Digest256]) -> Digest256 {
    naive_levels_256(depth, leaves)[depth][0]
}

/// The authentication path of `leaves[index]` in the full zero-padded tree,
/// built from scratch with no incremental patching.
pub(crate) fn naive_path_256(
    depth: usize,
    leaves: &[Digest256],
    index: usize,
) -> AuthPath<Sha256Eval> {
    let levels = naive_levels_256(depth, leaves);

    let mut siblings = Vec::with_capacity(depth);
    let mut child_bits = Vec::with_capacity(depth);
    let mut root_path = Vec::with_capacity(depth);

    let mut pos = index;
    for level in levels.iter().take(depth) {
        siblings.push(level[pos ^ 1]);
        child_bits.push(pos & 1 == 1);
        pos >>= 1;
        root_path.push(levels[child_bits.len()][pos]);
    }

    AuthPath {
        depth,
        root_path,
        siblings,
        child_bits,
    }
}

/// Walk a path's siblings and child bits upward from `leaf`, hashing at
/// each level, and return the root this path authenticates.
pub(crate) fn reconstruct_root<H: PathHasher<Bit = bool>>(
    leaf: &H::Digest,
    path: &AuthPath<H>,
) -> Result<H::Digest, H::Error> {
    let mut dig = leaf.clone();
    for (sibling, &is_right) in path.siblings().iter().zip(path.child_bits()) {
        dig = if is_right {
            hash_children::<H>(sibling, &dig)?
        } else {
            hash_children::<H>(&dig, sibling)?
        };
    }
    Ok(dig)
}

/// Fill a depth-`depth` SHA-256 bundle with the counter leaves `0..2^depth`,
/// retaining those for which `keep` returns true.
pub(crate) fn fill_bundle_256(depth: usize, keep: impl Fn(u64) -> bool) -> MerkleBundle<Sha256Eval> {
    let mut bundle = MerkleBundle::new(depth);
    while !bundle.is_full() {
        let i = bundle.tree_size();
        bundle.add_leaf(&Digest256::from_count(i), keep(i)).unwrap();
    }
    bundle
}
