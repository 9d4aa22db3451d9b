//! Fixed-width word-array digests.
//!
//! Digests are arrays of machine words (8×u32 for the 256-bit family,
//! 8×u64 for the 512-bit family), the granularity the SHA-2 compression
//! functions work in. Byte views use big-endian word order, SHA's native
//! bit order, so concatenating two digests byte-wise matches the
//! `H(left || right)` node hash exactly.

use std::{fmt, str::FromStr};

use crate::error::MerkleError;

macro_rules! word_digest {
    ($name:ident, $word:ty, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name(pub [$word; 8]);

        impl $name {
            /// Number of words in the digest.
            pub const WORDS: usize = 8;

            /// Number of bytes in the digest.
            pub const BYTES: usize = 8 * std::mem::size_of::<$word>();

            /// The canonical zero digest used to fill empty tree slots.
            ///
            /// Whether this collides with a legitimate leaf digest is not
            /// checked; callers appending attacker-controlled leaves should
            /// be aware of the convention.
            pub const ZERO: Self = Self([0; 8]);

            /// Digest with `count` in the first word and the rest zero.
            ///
            /// This is the deterministic leaf encoding the demonstration
            /// scenarios use (leaf `i` is the digest seeded with `i`).
            pub fn from_count(count: u64) -> Self {
                let mut words = [0; 8];
                words[0] = count as $word;
                Self(words)
            }

            /// Big-endian byte view (word 0 first, each word big-endian).
            pub fn to_bytes(&self) -> [u8; Self::BYTES] {
                let mut out = [0u8; Self::BYTES];
                for (chunk, word) in
                    out.chunks_exact_mut(std::mem::size_of::<$word>()).zip(self.0.iter())
                {
                    chunk.copy_from_slice(&word.to_be_bytes());
                }
                out
            }

            /// Rebuild a digest from its big-endian byte view.
            ///
            /// Panics if `bytes` is not exactly [`Self::BYTES`] long.
            pub fn from_bytes(bytes: &[u8]) -> Self {
                assert_eq!(bytes.len(), Self::BYTES, "digest byte length");
                let mut words = [0; 8];
                for (word, chunk) in
                    words.iter_mut().zip(bytes.chunks_exact(std::mem::size_of::<$word>()))
                {
                    *word = <$word>::from_be_bytes(chunk.try_into().expect("chunk size"));
                }
                Self(words)
            }

            /// The digest's words, word 0 holding the most significant bytes.
            pub fn words(&self) -> &[$word; 8] {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str(&hex::encode(self.to_bytes()))
            }
        }

        impl FromStr for $name {
            type Err = MerkleError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let bytes = hex::decode(s)
                    .map_err(|e| MerkleError::InvalidData(format!("bad digest hex: {}", e)))?;
                if bytes.len() != Self::BYTES {
                    return Err(MerkleError::InvalidData(format!(
                        "digest is {} bytes, expected {}",
                        bytes.len(),
                        Self::BYTES
                    )));
                }
                Ok(Self::from_bytes(&bytes))
            }
        }
    };
}

word_digest!(Digest256, u32, "A 256-bit digest as eight 32-bit words.");
word_digest!(Digest512, u64, "A 512-bit digest as eight 64-bit words.");
