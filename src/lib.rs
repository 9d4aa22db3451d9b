//! Append-only binary Merkle accumulator with zk-circuit-ready
//! authentication paths.
//!
//! The accumulator keeps only the frontier — the authentication path of
//! the next leaf slot — so state is O(depth) digests while the cached root
//! always equals a full recomputation of a tree whose empty slots hold the
//! zero digest. A [`MerkleBundle`] layers snapshotting on top: paths of
//! selected leaves are retained at insertion time and patched in place as
//! later leaves arrive, each one always authenticating its leaf against
//! the live root.
//!
//! Every structure is generic over a [`PathHasher`] family. The numeric
//! families ([`Sha256Eval`], [`Sha512Eval`]) hash word-array digests
//! directly; with the `circuit` feature, the symbolic families
//! ([`circuit::Sha256Var`], [`circuit::Sha512Var`]) run the same bit-level
//! computation inside an R1CS constraint system, so a blessed copy of a
//! retained path re-derives the root in-circuit and membership becomes a
//! provable statement ([`circuit::MerkleMembershipCircuit`]).

mod accumulator;
mod bundle;
mod digest;
mod error;
mod hash;
mod marshal;
mod path;

#[cfg(feature = "circuit")]
pub mod circuit;

#[cfg(test)]
pub(crate) mod test_utils;

pub use accumulator::MerkleAccumulator;
pub use bundle::MerkleBundle;
pub use digest::{Digest256, Digest512};
pub use error::{MerkleError, Result};
pub use hash::{hash_children, PathHasher, Sha256Eval, Sha512Eval};
pub use path::AuthPath;
