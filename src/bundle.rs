//! Accumulator plus retained authentication-path snapshots.

use std::collections::BTreeSet;

use crate::{accumulator::MerkleAccumulator, hash::PathHasher, path::AuthPath};

/// A live [`MerkleAccumulator`] together with snapshots of selected past
/// leaves' authentication paths, all kept consistent as further leaves are
/// appended.
///
/// A snapshot is taken at insertion time and then patched in place on every
/// later append, so at any moment it is exactly the path an observer would
/// obtain by querying the current tree for that leaf's original position.
/// Snapshots are numeric; the circuit mirror is built from one on demand.
pub struct MerkleBundle<H: PathHasher> {
    tree: MerkleAccumulator<H>,
    tree_size: u64,
    auth_leaf: Vec<H::Digest>,
    auth_path: Vec<AuthPath<H>>,
}

impl<H: PathHasher> MerkleBundle<H> {
    /// Empty bundle over an accumulator of height `depth`.
    pub fn new(depth: usize) -> Self {
        MerkleBundle {
            tree: MerkleAccumulator::new(depth),
            tree_size: 0,
            auth_leaf: Vec::new(),
            auth_path: Vec::new(),
        }
    }

    /// True once the underlying accumulator holds `2^depth` leaves.
    pub fn is_full(&self) -> bool {
        self.tree.is_full()
    }

    /// Number of leaves appended so far.
    pub fn tree_size(&self) -> u64 {
        self.tree_size
    }

    /// The live accumulator.
    pub fn tree(&self) -> &MerkleAccumulator<H> {
        &self.tree
    }

    /// The current root digest.
    ///
    /// Panics on an empty-sentinel bundle (depth 0).
    pub fn root_hash(&self) -> &H::Digest {
        self.tree.frontier().root_hash()
    }

    /// Retained leaf digests, in insertion order.
    pub fn auth_leaf(&self) -> &[H::Digest] {
        &self.auth_leaf
    }

    /// Retained authentication-path snapshots; `auth_path()[i]` describes
    /// `auth_leaf()[i]` at its original position in the current tree.
    pub fn auth_path(&self) -> &[AuthPath<H>] {
        &self.auth_path
    }

    pub(crate) fn from_parts(
        tree: MerkleAccumulator<H>,
        tree_size: u64,
        auth_leaf: Vec<H::Digest>,
        auth_path: Vec<AuthPath<H>>,
    ) -> Self {
        MerkleBundle {
            tree,
            tree_size,
            auth_leaf,
            auth_path,
        }
    }
}

impl<H> MerkleBundle<H>
where
    H: PathHasher<Bit = bool>,
{
    /// Append a leaf; retain its authentication path if `keep` is set.
    ///
    /// Order is load-bearing: the frontier is rehashed and all retained
    /// snapshots patched first, then the snapshot is taken (so it carries
    /// the pre-increment position with a fully populated root path), and
    /// only then does the counter advance.
    ///
    /// Appending to a full bundle is a defined no-op; callers that care
    /// observe [`is_full`](MerkleBundle::is_full) beforehand.
    pub fn add_leaf(&mut self, leaf: &H::Digest, keep: bool) -> Result<(), H::Error> {
        if self.tree.is_full() {
            return Ok(());
        }

        self.tree.update_path_with(leaf, &mut self.auth_path)?;

        if keep {
            self.auth_leaf.push(leaf.clone());
            self.auth_path.push(self.tree.frontier().clone());
        }

        self.tree.update_siblings(leaf);
        self.tree_size += 1;

        Ok(())
    }

    /// Drop every retained snapshot whose leaf digest is not in
    /// `keep_set`, preserving the relative order of the survivors.
    pub fn auth_garbage_collect(&mut self, keep_set: &BTreeSet<H::Digest>)
    where
        H::Digest: Ord,
    {
        let mut keep_leaf = Vec::new();
        let mut keep_path = Vec::new();

        for (leaf, path) in self.auth_leaf.iter().zip(self.auth_path.iter()) {
            if keep_set.contains(leaf) {
                keep_leaf.push(leaf.clone());
                keep_path.push(path.clone());
            }
        }

        self.auth_leaf = keep_leaf;
        self.auth_path = keep_path;
    }
}

impl<H: PathHasher> Default for MerkleBundle<H> {
    /// The distinguished empty state produced by failed unmarshalling.
    fn default() -> Self {
        MerkleBundle {
            tree: MerkleAccumulator::default(),
            tree_size: 0,
            auth_leaf: Vec::new(),
            auth_path: Vec::new(),
        }
    }
}

impl<H: PathHasher> Clone for MerkleBundle<H> {
    fn clone(&self) -> Self {
        MerkleBundle {
            tree: self.tree.clone(),
            tree_size: self.tree_size,
            auth_leaf: self.auth_leaf.clone(),
            auth_path: self.auth_path.clone(),
        }
    }
}

impl<H: PathHasher> std::fmt::Debug for MerkleBundle<H>
where
    H::Digest: std::fmt::Debug,
    H::Bit: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("MerkleBundle")
            .field("tree", &self.tree)
            .field("tree_size", &self.tree_size)
            .field("auth_leaf", &self.auth_leaf)
            .field("auth_path", &self.auth_path)
            .finish()
    }
}

impl<H: PathHasher> PartialEq for MerkleBundle<H>
where
    H::Digest: PartialEq,
    H::Bit: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.tree == other.tree
            && self.tree_size == other.tree_size
            && self.auth_leaf == other.auth_leaf
            && self.auth_path == other.auth_path
    }
}
