//! Provable statements: Merkle membership and SHA-256 preimage.
//!
//! Both circuits allocate their public digest first, so a verifier's input
//! assignment is exactly the digest's bits in message order (see
//! [`WitnessHasher::input_assignment`]).

use std::marker::PhantomData;

use ark_ff::PrimeField;
use ark_r1cs_std::{alloc::AllocVar, boolean::Boolean};
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};

use super::{
    bless::WitnessHasher,
    hasher::{DigestVar, Sha256Var},
    sha2::{sha2_hash, SHA256_PARAMS},
};
use crate::{digest::Digest256, hash::PathHasher, path::AuthPath};

/// "Leaf `L` is a member of the tree with public root `R`": the prover
/// knows an authentication path from `L` to `R` without revealing it.
///
/// The root is public input; the leaf, the sibling digests and the child
/// bits are witnesses. The circuit re-derives the root bottom-up through
/// the symbolic hash family `Z` and enforces equality.
pub struct MerkleMembershipCircuit<F, Z>
where
    F: PrimeField,
    Z: WitnessHasher<F>,
{
    leaf: <Z::Eval as PathHasher>::Digest,
    path: AuthPath<Z::Eval>,
    root: <Z::Eval as PathHasher>::Digest,
    _field: PhantomData<F>,
}

impl<F, Z> MerkleMembershipCircuit<F, Z>
where
    F: PrimeField,
    Z: WitnessHasher<F>,
{
    /// Statement for one retained snapshot. `path` must be a populated
    /// authentication path (depth > 0) and `root` the tree root it
    /// authenticates against.
    pub fn new(
        leaf: <Z::Eval as PathHasher>::Digest,
        path: AuthPath<Z::Eval>,
        root: <Z::Eval as PathHasher>::Digest,
    ) -> Self {
        assert!(path.depth() > 0, "membership statement over a depth-0 path");
        MerkleMembershipCircuit {
            leaf,
            path,
            root,
            _field: PhantomData,
        }
    }

    /// The verifier-side public-input assignment for `root`.
    pub fn public_inputs(root: &<Z::Eval as PathHasher>::Digest) -> Vec<F> {
        Z::input_assignment(root)
    }
}

impl<F, Z> Clone for MerkleMembershipCircuit<F, Z>
where
    F: PrimeField,
    Z: WitnessHasher<F>,
{
    fn clone(&self) -> Self {
        MerkleMembershipCircuit {
            leaf: self.leaf.clone(),
            path: self.path.clone(),
            root: self.root.clone(),
            _field: PhantomData,
        }
    }
}

impl<F, Z> ConstraintSynthesizer<F> for MerkleMembershipCircuit<F, Z>
where
    F: PrimeField,
    Z: WitnessHasher<F>,
{
    fn generate_constraints(self, cs: ConstraintSystemRef<F>) -> Result<(), SynthesisError> {
        let root = Z::input_digest(cs.clone(), &self.root)?;

        let leaf = Z::bless_digest(cs.clone(), &self.leaf)?;
        let mut path = AuthPath::<Z>::from_eval(cs, &self.path)?;
        path.update_path(&leaf)?;

        Z::enforce_digest_equal(path.root_hash(), &root)
    }
}

/// "This public digest is the SHA-256 of a message I know": the
/// demonstrator statement wiring the hash family to the proof system on
/// its own, without the Merkle layer.
pub struct Sha256PreimageCircuit<F: PrimeField> {
    message: Vec<u8>,
    digest: Digest256,
    _field: PhantomData<F>,
}

impl<F: PrimeField> Sha256PreimageCircuit<F> {
    pub fn new(message: Vec<u8>, digest: Digest256) -> Self {
        Sha256PreimageCircuit {
            message,
            digest,
            _field: PhantomData,
        }
    }

    /// The verifier-side public-input assignment for `digest`.
    pub fn public_inputs(digest: &Digest256) -> Vec<F> {
        <Sha256Var<F> as WitnessHasher<F>>::input_assignment(digest)
    }
}

impl<F: PrimeField> Clone for Sha256PreimageCircuit<F> {
    fn clone(&self) -> Self {
        Sha256PreimageCircuit {
            message: self.message.clone(),
            digest: self.digest,
            _field: PhantomData,
        }
    }
}

impl<F: PrimeField> ConstraintSynthesizer<F> for Sha256PreimageCircuit<F> {
    fn generate_constraints(self, cs: ConstraintSystemRef<F>) -> Result<(), SynthesisError> {
        let expected = Sha256Var::input_digest(cs.clone(), &self.digest)?;

        let message_bits = self
            .message
            .iter()
            .flat_map(|&byte| (0..8).rev().map(move |i| byte >> i & 1 == 1))
            .map(|bit| Boolean::new_witness(cs.clone(), || Ok(bit)))
            .collect::<Result<Vec<_>, _>>()?;

        let digest = DigestVar(sha2_hash(&SHA256_PARAMS, &message_bits)?);
        digest.enforce_equal(&expected)
    }
}

#[cfg(test)]
mod tests {
    use ark_bn254::Fr;
    use ark_relations::r1cs::ConstraintSystem;
    use sha2::{Digest as _, Sha256};

    use super::*;
    use crate::{hash::Sha256Eval, test_utils::fill_bundle_256};

    #[test]
    fn test_membership_statement_is_satisfiable() {
        let bundle = fill_bundle_256(3, |i| i == 5);
        let circuit = MerkleMembershipCircuit::<Fr, Sha256Var<Fr>>::new(
            bundle.auth_leaf()[0],
            bundle.auth_path()[0].clone(),
            *bundle.root_hash(),
        );

        let cs = ConstraintSystem::<Fr>::new_ref();
        circuit.generate_constraints(cs.clone()).unwrap();
        assert!(cs.is_satisfied().unwrap());
    }

    #[test]
    fn test_membership_statement_rejects_wrong_root() {
        let bundle = fill_bundle_256(3, |i| i == 2);
        let circuit = MerkleMembershipCircuit::<Fr, Sha256Var<Fr>>::new(
            bundle.auth_leaf()[0],
            bundle.auth_path()[0].clone(),
            crate::digest::Digest256::from_count(1234),
        );

        let cs = ConstraintSystem::<Fr>::new_ref();
        circuit.generate_constraints(cs.clone()).unwrap();
        assert!(!cs.is_satisfied().unwrap());
    }

    #[test]
    fn test_membership_statement_rejects_wrong_leaf() {
        let bundle = fill_bundle_256(3, |i| i == 2);
        let circuit = MerkleMembershipCircuit::<Fr, Sha256Var<Fr>>::new(
            crate::digest::Digest256::from_count(7),
            bundle.auth_path()[0].clone(),
            *bundle.root_hash(),
        );

        let cs = ConstraintSystem::<Fr>::new_ref();
        circuit.generate_constraints(cs.clone()).unwrap();
        assert!(!cs.is_satisfied().unwrap());
    }

    #[test]
    fn test_preimage_statement_accepts_abc() {
        let digest = Digest256::from_bytes(Sha256::digest(b"abc").as_slice());
        let circuit = Sha256PreimageCircuit::<Fr>::new(b"abc".to_vec(), digest);

        let cs = ConstraintSystem::<Fr>::new_ref();
        circuit.generate_constraints(cs.clone()).unwrap();
        assert!(cs.is_satisfied().unwrap());
    }

    #[test]
    fn test_preimage_statement_rejects_empty_message() {
        // claim the digest of "abc" while knowing only ""
        let digest = Digest256::from_bytes(Sha256::digest(b"abc").as_slice());
        let circuit = Sha256PreimageCircuit::<Fr>::new(Vec::new(), digest);

        let cs = ConstraintSystem::<Fr>::new_ref();
        circuit.generate_constraints(cs.clone()).unwrap();
        assert!(!cs.is_satisfied().unwrap());
    }

    #[test]
    #[should_panic(expected = "depth-0 path")]
    fn test_membership_rejects_sentinel_path() {
        let _ = MerkleMembershipCircuit::<Fr, Sha256Var<Fr>>::new(
            crate::digest::Digest256::ZERO,
            AuthPath::<Sha256Eval>::default(),
            crate::digest::Digest256::ZERO,
        );
    }
}
