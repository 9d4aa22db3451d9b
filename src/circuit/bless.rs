//! Blessing: materialising numeric values as fresh circuit variables.
//!
//! Each symbolic family names its numeric mirror and can bless that
//! mirror's digests and bits into witness (or public-input) variables,
//! read witnessed values back out, and enforce digest equality. The
//! constraint system is an explicit context threaded through every
//! constructor; there is no ambient singleton.

use ark_ff::PrimeField;
use ark_r1cs_std::{alloc::AllocVar, boolean::Boolean};
use ark_relations::r1cs::{ConstraintSystemRef, SynthesisError};

use super::{
    hasher::{DigestVar, Sha256Var, Sha512Var},
    word::WordVar,
};
use crate::{
    digest::{Digest256, Digest512},
    hash::{PathHasher, Sha256Eval, Sha512Eval},
    path::AuthPath,
};

/// A symbolic hash family tied to its numeric mirror `Self::Eval`.
pub trait WitnessHasher<F: PrimeField>:
    PathHasher<Digest = DigestVar<F>, Bit = Boolean<F>, Error = SynthesisError>
{
    /// The numeric family whose values this one blesses.
    type Eval: PathHasher<Bit = bool>;

    /// Bless a numeric digest as fresh witness variables carrying its bits.
    fn bless_digest(
        cs: ConstraintSystemRef<F>,
        value: &<Self::Eval as PathHasher>::Digest,
    ) -> Result<DigestVar<F>, SynthesisError>;

    /// Allocate a numeric digest as public-input variables, bit by bit.
    fn input_digest(
        cs: ConstraintSystemRef<F>,
        value: &<Self::Eval as PathHasher>::Digest,
    ) -> Result<DigestVar<F>, SynthesisError>;

    /// Bless a numeric child bit as a witness boolean.
    fn bless_bit(cs: ConstraintSystemRef<F>, value: bool) -> Result<Boolean<F>, SynthesisError> {
        Boolean::new_witness(cs, || Ok(value))
    }

    /// The witnessed value of a symbolic digest, read back numerically.
    fn value_of(
        digest: &DigestVar<F>,
    ) -> Result<<Self::Eval as PathHasher>::Digest, SynthesisError>;

    /// Constrain two digests to be equal.
    fn enforce_digest_equal(a: &DigestVar<F>, b: &DigestVar<F>) -> Result<(), SynthesisError> {
        a.enforce_equal(b)
    }

    /// The public-input field elements matching
    /// [`input_digest`](WitnessHasher::input_digest)'s allocation order.
    fn input_assignment(value: &<Self::Eval as PathHasher>::Digest) -> Vec<F>;
}

/// Allocate one digest's bits in message order, as public inputs or as
/// witnesses.
fn alloc_digest_bits<F: PrimeField>(
    cs: ConstraintSystemRef<F>,
    word_bits: usize,
    words: impl Iterator<Item = u64>,
    input: bool,
) -> Result<DigestVar<F>, SynthesisError> {
    let mut out = Vec::with_capacity(8);
    for word in words {
        let bits = (0..word_bits)
            .rev()
            .map(|i| {
                let bit = word >> i & 1 == 1;
                if input {
                    Boolean::new_input(cs.clone(), || Ok(bit))
                } else {
                    Boolean::new_witness(cs.clone(), || Ok(bit))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        out.push(WordVar::from_bits(bits));
    }
    Ok(DigestVar(out))
}

macro_rules! witness_hasher {
    ($name:ident, $eval:ty, $digest:ident, $word:ty) => {
        impl<F: PrimeField> WitnessHasher<F> for $name<F> {
            type Eval = $eval;

            fn bless_digest(
                cs: ConstraintSystemRef<F>,
                value: &$digest,
            ) -> Result<DigestVar<F>, SynthesisError> {
                alloc_digest_bits(
                    cs,
                    Self::PARAMS.word_bits,
                    value.words().iter().map(|&w| w as u64),
                    false,
                )
            }

            fn input_digest(
                cs: ConstraintSystemRef<F>,
                value: &$digest,
            ) -> Result<DigestVar<F>, SynthesisError> {
                alloc_digest_bits(
                    cs,
                    Self::PARAMS.word_bits,
                    value.words().iter().map(|&w| w as u64),
                    true,
                )
            }

            fn value_of(digest: &DigestVar<F>) -> Result<$digest, SynthesisError> {
                let mut words = [0; 8];
                for (word, var) in words.iter_mut().zip(&digest.0) {
                    *word = var.value()? as $word;
                }
                Ok($digest(words))
            }

            fn input_assignment(value: &$digest) -> Vec<F> {
                value
                    .words()
                    .iter()
                    .flat_map(|&word| {
                        (0..Self::PARAMS.word_bits)
                            .rev()
                            .map(move |i| F::from(word as u64 >> i & 1))
                    })
                    .collect()
            }
        }
    };
}

witness_hasher!(Sha256Var, Sha256Eval, Digest256, u32);
witness_hasher!(Sha512Var, Sha512Eval, Digest512, u64);

impl<Z: PathHasher> AuthPath<Z> {
    /// Build the symbolic mirror of a numeric path: same depth, every
    /// sibling digest and child bit blessed into the constraint system.
    /// The root-path cache is sized but holds placeholders until the first
    /// [`update_path`](AuthPath::update_path) recomputes it in-circuit.
    pub fn from_eval<F>(
        cs: ConstraintSystemRef<F>,
        other: &AuthPath<Z::Eval>,
    ) -> Result<Self, SynthesisError>
    where
        F: PrimeField,
        Z: WitnessHasher<F>,
    {
        let mut siblings = Vec::with_capacity(other.depth());
        for digest in other.siblings() {
            siblings.push(Z::bless_digest(cs.clone(), digest)?);
        }

        let mut child_bits = Vec::with_capacity(other.depth());
        for &bit in other.child_bits() {
            child_bits.push(Z::bless_bit(cs.clone(), bit)?);
        }

        Ok(AuthPath {
            depth: other.depth(),
            root_path: vec![Z::zero_digest(); other.depth()],
            siblings,
            child_bits,
        })
    }
}

#[cfg(test)]
mod tests {
    use ark_bn254::Fr;
    use ark_r1cs_std::R1CSVar;
    use ark_relations::r1cs::ConstraintSystem;

    use super::*;
    use crate::digest::Digest256;

    #[test]
    fn test_bless_value_round_trip() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        let digest = Digest256([7, 0, u32::MAX, 1, 2, 3, 4, 0x8000_0000]);

        let var = Sha256Var::bless_digest(cs.clone(), &digest).unwrap();
        assert_eq!(Sha256Var::value_of(&var).unwrap(), digest);
        assert!(cs.is_satisfied().unwrap());
    }

    #[test]
    fn test_input_assignment_matches_allocation() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        let digest = Digest256::from_count(0xabcd);

        Sha256Var::input_digest(cs.clone(), &digest).unwrap();
        let assignment = <Sha256Var<Fr> as WitnessHasher<Fr>>::input_assignment(&digest);

        // instance column carries One first, then our bits in order
        let cs_inner = cs.borrow().unwrap();
        assert_eq!(cs_inner.instance_assignment.len(), assignment.len() + 1);
        assert_eq!(&cs_inner.instance_assignment[1..], &assignment[..]);
    }

    #[test]
    fn test_mirror_path_copies_position_and_siblings() {
        let cs = ConstraintSystem::<Fr>::new_ref();

        let mut eval_path = AuthPath::<Sha256Eval>::new(3);
        eval_path.siblings[1] = Digest256::from_count(5);
        eval_path.child_bits[0] = true;

        let zk_path = AuthPath::<Sha256Var<Fr>>::from_eval(cs.clone(), &eval_path).unwrap();
        assert_eq!(zk_path.depth(), 3);
        assert_eq!(
            Sha256Var::value_of(&zk_path.siblings()[1]).unwrap(),
            Digest256::from_count(5)
        );
        assert!(zk_path.child_bits()[0].value().unwrap());
        assert!(!zk_path.child_bits()[1].value().unwrap());
        assert!(cs.is_satisfied().unwrap());
    }
}
