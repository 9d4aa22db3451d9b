//! Symbolic SHA-256 / SHA-512 families: the circuit mirror of the numeric
//! hashers, emitting the same bit-level computation as constraints.

use ark_ff::PrimeField;
use ark_r1cs_std::{boolean::Boolean, eq::EqGadget, select::CondSelectGadget};
use ark_relations::r1cs::SynthesisError;

use super::{
    sha2::{sha2_hash, Sha2Params, SHA256_PARAMS, SHA512_PARAMS},
    word::WordVar,
};
use crate::hash::PathHasher;

/// A digest as eight words of circuit bits.
#[derive(Clone, Debug)]
pub struct DigestVar<F: PrimeField>(pub(crate) Vec<WordVar<F>>);

impl<F: PrimeField> DigestVar<F> {
    /// The all-zero constant digest of `word_bits`-wide words.
    pub(crate) fn zero(word_bits: usize) -> Self {
        DigestVar((0..8).map(|_| WordVar::constant(word_bits, 0)).collect())
    }

    /// The digest's bits in message order: word 0 first, each word most
    /// significant bit first.
    pub fn to_bits(&self) -> Vec<Boolean<F>> {
        self.0.iter().flat_map(|word| word.bits().to_vec()).collect()
    }

    /// Constrain both digests to hold the same bit pattern.
    pub fn enforce_equal(&self, other: &Self) -> Result<(), SynthesisError> {
        for (a, b) in self.to_bits().iter().zip(other.to_bits().iter()) {
            a.enforce_equal(b)?;
        }
        Ok(())
    }

    /// Bit-wise multiplexer: `on_one` where `bit` is set, else `on_zero`.
    pub fn select(
        bit: &Boolean<F>,
        on_one: &Self,
        on_zero: &Self,
    ) -> Result<Self, SynthesisError> {
        let words = on_one
            .0
            .iter()
            .zip(&on_zero.0)
            .map(|(a, b)| {
                let bits = a
                    .bits()
                    .iter()
                    .zip(b.bits())
                    .map(|(x, y)| Boolean::conditionally_select(bit, x, y))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(WordVar::from_bits(bits))
            })
            .collect::<Result<Vec<_>, SynthesisError>>()?;
        Ok(DigestVar(words))
    }
}

macro_rules! circuit_hasher {
    ($name:ident, $params:expr, $doc:expr) => {
        #[doc = $doc]
        pub struct $name<F: PrimeField> {
            message: Vec<Boolean<F>>,
            digest: DigestVar<F>,
        }

        impl<F: PrimeField> $name<F> {
            pub(crate) const PARAMS: &'static Sha2Params = $params;
        }

        impl<F: PrimeField> PathHasher for $name<F> {
            type Digest = DigestVar<F>;
            type Bit = Boolean<F>;
            type Error = SynthesisError;

            fn new() -> Self {
                $name {
                    message: Vec::new(),
                    digest: DigestVar::zero(Self::PARAMS.word_bits),
                }
            }

            fn clear_message(&mut self) {
                self.message.clear();
            }

            fn msg_input(&mut self, digest: &Self::Digest) -> Result<(), Self::Error> {
                self.message.extend(digest.to_bits());
                Ok(())
            }

            fn compute_hash(&mut self) -> Result<(), Self::Error> {
                self.digest = DigestVar(sha2_hash(Self::PARAMS, &self.message)?);
                Ok(())
            }

            fn digest(&self) -> Self::Digest {
                self.digest.clone()
            }

            fn zero_digest() -> Self::Digest {
                DigestVar::zero(Self::PARAMS.word_bits)
            }

            fn zero_bit() -> Self::Bit {
                Boolean::constant(false)
            }

            fn ternary(
                bit: &Self::Bit,
                on_one: &Self::Digest,
                on_zero: &Self::Digest,
            ) -> Result<Self::Digest, Self::Error> {
                DigestVar::select(bit, on_one, on_zero)
            }
        }
    };
}

circuit_hasher!(
    Sha256Var,
    &SHA256_PARAMS,
    "Symbolic SHA-256 family over [`DigestVar`] words of circuit bits."
);
circuit_hasher!(
    Sha512Var,
    &SHA512_PARAMS,
    "Symbolic SHA-512 family over [`DigestVar`] words of circuit bits."
);
