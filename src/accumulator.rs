//! Append-only Merkle accumulator: the single frontier path tracking the
//! next leaf slot to be filled.

use crate::{hash::PathHasher, path::AuthPath};

/// A binary Merkle tree reduced to its frontier: the authentication path of
/// the next-to-be-filled leaf, plus a fullness latch.
///
/// While not full, the frontier's child bits (read low-to-high) are the
/// index of the next leaf slot. Appending a leaf is a two-step protocol:
/// [`update_path`](MerkleAccumulator::update_path) hashes the new leaf into
/// the frontier, then [`update_siblings`](MerkleAccumulator::update_siblings)
/// advances the position counter and installs the new sibling. The order
/// matters — advancing first would snapshot a stale subtree root.
///
/// Storing only the frontier keeps state at O(depth) digests; the root it
/// caches equals a full recomputation of a tree whose empty slots hold the
/// zero digest.
pub struct MerkleAccumulator<H: PathHasher> {
    is_full: bool,
    frontier: AuthPath<H>,
}

impl<H: PathHasher> MerkleAccumulator<H> {
    /// Empty accumulator of height `depth`, positioned at leaf slot 0.
    pub fn new(depth: usize) -> Self {
        MerkleAccumulator {
            is_full: false,
            frontier: AuthPath::new(depth),
        }
    }

    /// True once `2^depth` leaves have been appended. Latches permanently;
    /// further appends are no-ops.
    pub fn is_full(&self) -> bool {
        self.is_full
    }

    /// The frontier authentication path.
    pub fn frontier(&self) -> &AuthPath<H> {
        &self.frontier
    }

    /// Hash `leaf` into the frontier, refreshing the cached root path.
    pub fn update_path(&mut self, leaf: &H::Digest) -> Result<(), H::Error> {
        self.frontier.update_path(leaf)
    }

    pub(crate) fn from_parts(is_full: bool, frontier: AuthPath<H>) -> Self {
        MerkleAccumulator { is_full, frontier }
    }
}

impl<H> MerkleAccumulator<H>
where
    H: PathHasher<Bit = bool>,
{
    /// Hash `leaf` into the frontier and patch the overlapping levels of
    /// every snapshot in `old_paths`. See
    /// [`AuthPath::update_path_with`].
    pub fn update_path_with(
        &mut self,
        leaf: &H::Digest,
        old_paths: &mut [AuthPath<H>],
    ) -> Result<(), H::Error> {
        self.frontier.update_path_with(leaf, old_paths)
    }

    /// Advance the frontier to the next leaf slot after `leaf` was hashed
    /// in by [`update_path`](MerkleAccumulator::update_path).
    ///
    /// Three cases on the lowest bit set by the counter increment:
    /// the counter wrapped (tree full, latch and stop); the next slot is a
    /// right child (`leaf` becomes its left sibling); or a subtree was
    /// completed (its root becomes the sibling at the carry level).
    pub fn update_siblings(&mut self, leaf: &H::Digest) {
        match self.frontier.inc_child_bits() {
            None => self.is_full = true,
            Some(0) => self.frontier.leaf_sibling(leaf),
            Some(index) => self.frontier.hash_sibling(index),
        }
    }
}

impl<H: PathHasher> Default for MerkleAccumulator<H> {
    /// The distinguished empty state produced by failed unmarshalling:
    /// full, with a depth-0 frontier. Not a usable accumulator.
    fn default() -> Self {
        MerkleAccumulator {
            is_full: true,
            frontier: AuthPath::default(),
        }
    }
}

impl<H: PathHasher> Clone for MerkleAccumulator<H> {
    fn clone(&self) -> Self {
        MerkleAccumulator {
            is_full: self.is_full,
            frontier: self.frontier.clone(),
        }
    }
}

impl<H: PathHasher> std::fmt::Debug for MerkleAccumulator<H>
where
    H::Digest: std::fmt::Debug,
    H::Bit: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("MerkleAccumulator")
            .field("is_full", &self.is_full)
            .field("frontier", &self.frontier)
            .finish()
    }
}

impl<H: PathHasher> PartialEq for MerkleAccumulator<H>
where
    H::Digest: PartialEq,
    H::Bit: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.is_full == other.is_full && self.frontier == other.frontier
    }
}
