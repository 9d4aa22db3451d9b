//! The symbolic side: authentication paths over circuit variables.
//!
//! Everything in the clear layer is generic over [`PathHasher`]; this
//! module supplies the hash families whose digests are words of R1CS
//! booleans ([`Sha256Var`], [`Sha512Var`]), the blessing capability that
//! builds them from numeric values ([`WitnessHasher`],
//! [`AuthPath::from_eval`](crate::AuthPath::from_eval)), and the provable
//! statements that downstream key generation, proving and verification
//! consume.
//!
//! The constraint system is an explicit [`ConstraintSystemRef`] context
//! object passed to every blessing constructor; variables remember their
//! system, so subsequent path updates need no extra threading.
//!
//! [`PathHasher`]: crate::PathHasher
//! [`ConstraintSystemRef`]: ark_relations::r1cs::ConstraintSystemRef

mod bless;
mod hasher;
mod membership;
mod sha2;
mod word;

pub use bless::WitnessHasher;
pub use hasher::{DigestVar, Sha256Var, Sha512Var};
pub use membership::{MerkleMembershipCircuit, Sha256PreimageCircuit};
pub use word::WordVar;
