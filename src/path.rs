//! Authentication path from one leaf slot of a binary Merkle tree to its
//! root.
//!
//! All three per-level vectors are indexed bottom-up: index 0 is the leaf
//! level, index `depth - 1` the level just below the root. The child bits,
//! read low-to-high as a little-endian integer, are the index of the leaf
//! slot the path describes.

use crate::hash::PathHasher;

/// One leaf-to-root path: per-level sibling digests, per-level
/// "am I the right child?" bits, and the cached digests of the path nodes
/// themselves.
///
/// After [`update_path`](AuthPath::update_path), every level `i` satisfies
///
/// ```text
/// root_path[i] = H(left || right)
///   where below   = leaf            if i == 0
///                 = root_path[i-1]  otherwise
///         (left, right) = (siblings[i], below)  if child_bits[i]
///                       = (below, siblings[i])  otherwise
/// ```
///
/// The default value (depth 0) is a marshalling sentinel, not a legal path.
pub struct AuthPath<H: PathHasher> {
    pub(crate) depth: usize,
    pub(crate) root_path: Vec<H::Digest>,
    pub(crate) siblings: Vec<H::Digest>,
    pub(crate) child_bits: Vec<H::Bit>,
}

impl<H: PathHasher> AuthPath<H> {
    /// Path for the first leaf slot of an empty tree of height `depth`:
    /// zero digests for every sibling, all child bits clear. The root-path
    /// digests are placeholders until the first
    /// [`update_path`](AuthPath::update_path).
    pub fn new(depth: usize) -> Self {
        AuthPath {
            depth,
            root_path: vec![H::zero_digest(); depth],
            siblings: vec![H::zero_digest(); depth],
            child_bits: vec![H::zero_bit(); depth],
        }
    }

    /// Height of the tree this path belongs to.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The root digest, i.e. the last cached root-path entry.
    ///
    /// Panics on the depth-0 sentinel.
    pub fn root_hash(&self) -> &H::Digest {
        self.root_path.last().expect("root_hash on a depth-0 path")
    }

    /// Cached node digests from leaf level up to the root.
    pub fn root_path(&self) -> &[H::Digest] {
        &self.root_path
    }

    /// Sibling digest at each level, bottom-up.
    pub fn siblings(&self) -> &[H::Digest] {
        &self.siblings
    }

    /// Bottom-up position bits of the leaf slot this path describes.
    pub fn child_bits(&self) -> &[H::Bit] {
        &self.child_bits
    }

    /// Recompute the cached root-path digests for `leaf`, ascending from
    /// the leaf level to the root. The hasher's message state is cleared at
    /// every level.
    pub fn update_path(&mut self, leaf: &H::Digest) -> Result<(), H::Error> {
        let mut hasher = H::new();
        let mut below = leaf.clone();

        for i in 0..self.depth {
            below = self.hash_level(&mut hasher, i, &below)?;
        }

        Ok(())
    }

    /// Hash level `i` with `below` as this path's node digest coming from
    /// underneath, store it in the root-path cache, and return it.
    fn hash_level(
        &mut self,
        hasher: &mut H,
        i: usize,
        below: &H::Digest,
    ) -> Result<H::Digest, H::Error> {
        hasher.clear_message();

        let is_right = &self.child_bits[i];
        let left = H::ternary(is_right, &self.siblings[i], below)?;
        let right = H::ternary(is_right, below, &self.siblings[i])?;

        hasher.msg_input(&left)?;
        hasher.msg_input(&right)?;
        hasher.compute_hash()?;

        let dig = hasher.digest();
        self.root_path[i] = dig.clone();
        Ok(dig)
    }

    /// The just-inserted leaf becomes this path's level-0 (left) sibling.
    ///
    /// Called when advancing the position counter lands the frontier on a
    /// right child.
    pub fn leaf_sibling(&mut self, leaf: &H::Digest) {
        self.siblings[0] = leaf.clone();
    }

    /// A subtree of height `index` has just been completed to the left:
    /// its root (the cached root-path digest one level down) becomes the
    /// sibling at `index`, and all siblings below are reset to the zero
    /// digest.
    ///
    /// Only valid after an [`update_path`](AuthPath::update_path) for the
    /// leaf that completed the subtree, since it reads the root-path cache.
    pub fn hash_sibling(&mut self, index: usize) {
        self.siblings[index] = self.root_path[index - 1].clone();

        for sibling in &mut self.siblings[..index] {
            *sibling = H::zero_digest();
        }
    }
}

impl<H> AuthPath<H>
where
    H: PathHasher<Bit = bool>,
{
    /// Recompute this path's digests for `leaf` and patch every snapshot in
    /// `old_paths` whose position overlaps, so each snapshot keeps
    /// describing its own leaf in the updated tree.
    ///
    /// A node freshly hashed at distance `path_len` from the root either
    /// lies on a snapshot's root path (`path_len <= overlap`), is the
    /// snapshot's sibling one level up (`path_len == overlap + 1`), or does
    /// not affect it. The loop never writes a level-0 sibling, so the case
    /// where the two positions differ only in their lowest bit is fixed up
    /// afterwards: the new leaf itself is the snapshot's leaf sibling.
    ///
    /// Panics if any snapshot has a different depth.
    pub fn update_path_with(
        &mut self,
        leaf: &H::Digest,
        old_paths: &mut [AuthPath<H>],
    ) -> Result<(), H::Error> {
        if self.depth == 0 {
            return Ok(());
        }

        let overlap: Vec<usize> = old_paths
            .iter()
            .map(|p| {
                assert_eq!(p.depth, self.depth, "snapshot depth mismatch");
                match_msb(&self.child_bits, &p.child_bits)
            })
            .collect();

        let mut hasher = H::new();
        let mut below = leaf.clone();

        for i in 0..self.depth {
            below = self.hash_level(&mut hasher, i, &below)?;

            // distance from the root to the node just hashed
            let path_len = self.depth - 1 - i;

            for (p, &overlap) in old_paths.iter_mut().zip(&overlap) {
                if path_len <= overlap {
                    p.root_path[i] = below.clone();
                } else if path_len == overlap + 1 {
                    p.siblings[i + 1] = below.clone();
                }
            }
        }

        for (p, &overlap) in old_paths.iter_mut().zip(&overlap) {
            if overlap == self.depth - 1 {
                p.siblings[0] = leaf.clone();
            }
        }

        Ok(())
    }

    /// Increment the child bits as a little-endian counter.
    ///
    /// Returns the index of the lowest bit set after the carry settles, or
    /// `None` when the counter wraps to all zeros (the tree just filled).
    pub fn inc_child_bits(&mut self) -> Option<usize> {
        for i in 0..self.depth {
            if !self.child_bits[i] {
                self.child_bits[i] = true;
                return Some(i);
            }
            self.child_bits[i] = false;
        }

        None
    }

    /// The child bits read as a little-endian integer: the index of the
    /// leaf slot this path describes.
    pub fn leaf_index(&self) -> u64 {
        self.child_bits
            .iter()
            .rev()
            .fold(0, |acc, &bit| (acc << 1) | bit as u64)
    }
}

/// Length of the longest common prefix of two equal-length position-bit
/// vectors, counted from the most-significant (root) end.
///
/// `depth - match_msb(a, b)` is the lowest tree level at which the two leaf
/// paths share a node.
pub(crate) fn match_msb(a: &[bool], b: &[bool]) -> usize {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count()
}

impl<H: PathHasher> Clone for AuthPath<H> {
    fn clone(&self) -> Self {
        AuthPath {
            depth: self.depth,
            root_path: self.root_path.clone(),
            siblings: self.siblings.clone(),
            child_bits: self.child_bits.clone(),
        }
    }
}

impl<H: PathHasher> Default for AuthPath<H> {
    fn default() -> Self {
        Self::new(0)
    }
}

impl<H: PathHasher> std::fmt::Debug for AuthPath<H>
where
    H::Digest: std::fmt::Debug,
    H::Bit: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("AuthPath")
            .field("depth", &self.depth)
            .field("root_path", &self.root_path)
            .field("siblings", &self.siblings)
            .field("child_bits", &self.child_bits)
            .finish()
    }
}

impl<H: PathHasher> PartialEq for AuthPath<H>
where
    H::Digest: PartialEq,
    H::Bit: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.depth == other.depth
            && self.root_path == other.root_path
            && self.siblings == other.siblings
            && self.child_bits == other.child_bits
    }
}

impl<H: PathHasher> Eq for AuthPath<H>
where
    H::Digest: Eq,
    H::Bit: Eq,
{
}
