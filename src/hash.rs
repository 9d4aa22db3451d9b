//! The hash capability consumed by the Merkle layer, with the numeric
//! SHA-256 / SHA-512 families.
//!
//! A hasher follows a clear → input → finalise → retrieve protocol: message
//! state is cleared, two digest-sized chunks are fed in, the hash is
//! computed, and the resulting digest read back. Padding and message
//! scheduling belong to the hash family, not to the Merkle layer.

use sha2::{Digest as _, Sha256, Sha512};

use crate::digest::{Digest256, Digest512};

/// Hash capability parameterising the Merkle authentication path.
///
/// Implementations come in two flavours: numeric (digests are word arrays,
/// bits are `bool`, operations are infallible) and symbolic (digests and
/// bits are circuit variables and every operation may emit constraints and
/// fail with a synthesis error). The Merkle layer is written once against
/// this trait and propagates `Error` unchanged.
pub trait PathHasher {
    /// Fixed-width digest value.
    type Digest: Clone;
    /// Level-position indicator: zero = left child, one = right child.
    type Bit: Clone;
    /// Hash-family error; [`std::convert::Infallible`] for numeric families.
    type Error;

    /// Fresh hasher with empty message state.
    fn new() -> Self;

    /// Discard accumulated message state.
    fn clear_message(&mut self);

    /// Append one digest-sized chunk to the message.
    fn msg_input(&mut self, digest: &Self::Digest) -> Result<(), Self::Error>;

    /// Hash the accumulated message.
    fn compute_hash(&mut self) -> Result<(), Self::Error>;

    /// The digest produced by the last [`compute_hash`](Self::compute_hash).
    fn digest(&self) -> Self::Digest;

    /// The canonical zero digest filling empty tree slots.
    fn zero_digest() -> Self::Digest;

    /// The left-child bit value.
    fn zero_bit() -> Self::Bit;

    /// `on_one` when `bit` is set, `on_zero` otherwise.
    ///
    /// For symbolic families this is a constraint-level multiplexer over
    /// the digest bits.
    fn ternary(
        bit: &Self::Bit,
        on_one: &Self::Digest,
        on_zero: &Self::Digest,
    ) -> Result<Self::Digest, Self::Error>;
}

macro_rules! eval_hasher {
    ($name:ident, $algo:ty, $digest:ty, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Default)]
        pub struct $name {
            message: Vec<u8>,
            digest: $digest,
        }

        impl PathHasher for $name {
            type Digest = $digest;
            type Bit = bool;
            type Error = std::convert::Infallible;

            fn new() -> Self {
                Self::default()
            }

            fn clear_message(&mut self) {
                self.message.clear();
            }

            fn msg_input(&mut self, digest: &Self::Digest) -> Result<(), Self::Error> {
                self.message.extend_from_slice(&digest.to_bytes());
                Ok(())
            }

            fn compute_hash(&mut self) -> Result<(), Self::Error> {
                let out = <$algo>::digest(&self.message);
                self.digest = <$digest>::from_bytes(out.as_slice());
                Ok(())
            }

            fn digest(&self) -> Self::Digest {
                self.digest
            }

            fn zero_digest() -> Self::Digest {
                <$digest>::ZERO
            }

            fn zero_bit() -> Self::Bit {
                false
            }

            fn ternary(
                bit: &bool,
                on_one: &Self::Digest,
                on_zero: &Self::Digest,
            ) -> Result<Self::Digest, Self::Error> {
                Ok(if *bit { *on_one } else { *on_zero })
            }
        }
    };
}

eval_hasher!(
    Sha256Eval,
    Sha256,
    Digest256,
    "Numeric SHA-256 family over [`Digest256`] values."
);
eval_hasher!(
    Sha512Eval,
    Sha512,
    Digest512,
    "Numeric SHA-512 family over [`Digest512`] values."
);

/// Hash two digests as `H(left || right)`, the Merkle node combiner.
///
/// Convenience for tests and verifiers reconstructing a root from an
/// authentication path without driving the stateful protocol by hand.
pub fn hash_children<H: PathHasher>(
    left: &H::Digest,
    right: &H::Digest,
) -> Result<H::Digest, H::Error> {
    let mut hasher = H::new();
    hasher.clear_message();
    hasher.msg_input(left)?;
    hasher.msg_input(right)?;
    hasher.compute_hash()?;
    Ok(hasher.digest())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_matches_direct_hash() {
        let a = Digest256::from_count(1);
        let b = Digest256::from_count(2);

        let node = hash_children::<Sha256Eval>(&a, &b).unwrap();

        let mut concat = Vec::new();
        concat.extend_from_slice(&a.to_bytes());
        concat.extend_from_slice(&b.to_bytes());
        let expected = Digest256::from_bytes(Sha256::digest(&concat).as_slice());

        assert_eq!(node, expected);
    }

    #[test]
    fn test_sha512_matches_direct_hash() {
        let a = Digest512::from_count(3);
        let b = Digest512::ZERO;

        let node = hash_children::<Sha512Eval>(&a, &b).unwrap();

        let mut concat = Vec::new();
        concat.extend_from_slice(&a.to_bytes());
        concat.extend_from_slice(&b.to_bytes());
        let expected = Digest512::from_bytes(Sha512::digest(&concat).as_slice());

        assert_eq!(node, expected);
    }

    #[test]
    fn test_clear_message_discards_state() {
        let a = Digest256::from_count(9);
        let b = Digest256::from_count(10);

        let mut hasher = Sha256Eval::new();
        hasher.msg_input(&Digest256::from_count(99)).unwrap();
        hasher.clear_message();
        hasher.msg_input(&a).unwrap();
        hasher.msg_input(&b).unwrap();
        hasher.compute_hash().unwrap();

        assert_eq!(hasher.digest(), hash_children::<Sha256Eval>(&a, &b).unwrap());
    }

    #[test]
    fn test_ternary_selects() {
        let a = Digest256::from_count(1);
        let b = Digest256::from_count(2);
        assert_eq!(Sha256Eval::ternary(&true, &a, &b).unwrap(), a);
        assert_eq!(Sha256Eval::ternary(&false, &a, &b).unwrap(), b);
    }
}
