//! Fixed-width machine words as vectors of circuit bit variables.
//!
//! Bits are stored most-significant first, the order in which digest words
//! render and concatenate on the message wire. Rotations and shifts are
//! pure rewiring and emit no constraints; bitwise operations emit one
//! constraint per non-constant bit pair; modular addition packs every
//! operand into one linear combination and decomposes the integer sum into
//! freshly allocated sum and carry bits, costing one linear constraint plus
//! the booleanity of the new bits.

use ark_ff::PrimeField;
use ark_r1cs_std::{alloc::AllocVar, boolean::Boolean, R1CSVar};
use ark_relations::{
    lc,
    r1cs::{ConstraintSystemRef, SynthesisError, Variable},
};

/// A `width`-bit word of [`Boolean`] variables, most significant bit first.
#[derive(Clone, Debug)]
pub struct WordVar<F: PrimeField> {
    bits: Vec<Boolean<F>>,
}

impl<F: PrimeField> WordVar<F> {
    /// Constant word from the low `width` bits of `value`.
    pub fn constant(width: usize, value: u64) -> Self {
        let bits = (0..width)
            .rev()
            .map(|i| Boolean::constant(value >> i & 1 == 1))
            .collect();
        WordVar { bits }
    }

    /// Word from most-significant-first bits.
    pub fn from_bits(bits: Vec<Boolean<F>>) -> Self {
        WordVar { bits }
    }

    /// The bits, most significant first.
    pub fn bits(&self) -> &[Boolean<F>] {
        &self.bits
    }

    /// Bit width of the word.
    pub fn width(&self) -> usize {
        self.bits.len()
    }

    /// Witnessed numeric value, low `width` bits of the result.
    pub fn value(&self) -> Result<u64, SynthesisError> {
        self.bits
            .iter()
            .try_fold(0u64, |acc, bit| Ok(acc << 1 | bit.value()? as u64))
    }

    /// Bitwise exclusive or.
    pub fn xor(&self, other: &Self) -> Result<Self, SynthesisError> {
        debug_assert_eq!(self.width(), other.width());
        let bits = self
            .bits
            .iter()
            .zip(&other.bits)
            .map(|(a, b)| a.xor(b))
            .collect::<Result<_, _>>()?;
        Ok(WordVar { bits })
    }

    /// Bitwise and.
    pub fn and(&self, other: &Self) -> Result<Self, SynthesisError> {
        debug_assert_eq!(self.width(), other.width());
        let bits = self
            .bits
            .iter()
            .zip(&other.bits)
            .map(|(a, b)| a.and(b))
            .collect::<Result<_, _>>()?;
        Ok(WordVar { bits })
    }

    /// Bitwise complement.
    pub fn not(&self) -> Self {
        let bits = self.bits.iter().map(|bit| bit.not()).collect();
        WordVar { bits }
    }

    /// Rotate right by `by` bit positions.
    pub fn rotr(&self, by: usize) -> Self {
        let width = self.width();
        let by = by % width;
        let bits = (0..width)
            .map(|i| self.bits[(i + width - by) % width].clone())
            .collect();
        WordVar { bits }
    }

    /// Logical shift right by `by` bit positions.
    pub fn shr(&self, by: usize) -> Self {
        let width = self.width();
        let bits = (0..width)
            .map(|i| {
                if i < by {
                    Boolean::constant(false)
                } else {
                    self.bits[i - by].clone()
                }
            })
            .collect();
        WordVar { bits }
    }

    /// Sum of all operands modulo `2^width`.
    ///
    /// The operands' bit-packings are summed in one linear combination and
    /// equated with the packing of freshly allocated sum and carry bits.
    /// Needs `width + ceil(log2 n)` bits of headroom in the field modulus.
    pub fn add_many(operands: &[&Self]) -> Result<Self, SynthesisError> {
        assert!(operands.len() >= 2, "add_many needs at least two operands");
        let width = operands[0].width();
        debug_assert!(operands.iter().all(|op| op.width() == width));

        let carry_width =
            usize::BITS as usize - (operands.len() - 1).leading_zeros() as usize;

        let cs = operands
            .iter()
            .flat_map(|op| op.bits.iter())
            .fold(ConstraintSystemRef::None, |cs, bit| cs.or(bit.cs()));

        // integer sum of the witnessed values; unavailable during setup
        let sum: Result<u128, SynthesisError> = operands
            .iter()
            .try_fold(0u128, |acc, op| Ok(acc + op.value()? as u128));

        if matches!(cs, ConstraintSystemRef::None) {
            // all-constant operands fold to a constant word
            return Ok(Self::constant(width, sum? as u64 & mask(width)));
        }

        let mut low_first = Vec::with_capacity(width + carry_width);
        for i in 0..width + carry_width {
            let bit = Boolean::new_witness(cs.clone(), || {
                sum.as_ref()
                    .map(|s| s >> i & 1 == 1)
                    .map_err(|_| SynthesisError::AssignmentMissing)
            })?;
            low_first.push(bit);
        }

        // sum of operand packings minus the packing of (sum bits || carries)
        let mut packed = lc!();
        for op in operands {
            let mut coeff = F::one();
            for bit in op.bits.iter().rev() {
                packed = packed + bit.lc() * coeff;
                coeff.double_in_place();
            }
        }
        let mut coeff = F::one();
        for bit in &low_first {
            packed = packed - bit.lc() * coeff;
            coeff.double_in_place();
        }
        cs.enforce_constraint(packed, lc!() + (F::one(), Variable::One), lc!())?;

        low_first.truncate(width);
        low_first.reverse();
        Ok(WordVar { bits: low_first })
    }
}

fn mask(width: usize) -> u64 {
    if width == 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

#[cfg(test)]
mod tests {
    use ark_bn254::Fr;
    use ark_relations::r1cs::ConstraintSystem;

    use super::*;

    fn witness_word(cs: &ConstraintSystemRef<Fr>, width: usize, value: u64) -> WordVar<Fr> {
        let bits = (0..width)
            .rev()
            .map(|i| Boolean::new_witness(cs.clone(), || Ok(value >> i & 1 == 1)).unwrap())
            .collect();
        WordVar::from_bits(bits)
    }

    #[test]
    fn test_constant_value_round_trip() {
        let word = WordVar::<Fr>::constant(32, 0xdeadbeef);
        assert_eq!(word.value().unwrap(), 0xdeadbeef);
        assert_eq!(word.width(), 32);
    }

    #[test]
    fn test_bitwise_ops_match_native() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        let a = 0x0123_4567_89ab_cdefu64;
        let b = 0xfedc_ba98_7654_3210u64;
        let wa = witness_word(&cs, 64, a);
        let wb = witness_word(&cs, 64, b);

        assert_eq!(wa.xor(&wb).unwrap().value().unwrap(), a ^ b);
        assert_eq!(wa.and(&wb).unwrap().value().unwrap(), a & b);
        assert_eq!(wa.not().value().unwrap(), !a);
        assert!(cs.is_satisfied().unwrap());
    }

    #[test]
    fn test_rotations_and_shifts_match_native() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        let a = 0x8000_0001u64;
        let wa = witness_word(&cs, 32, a);

        for by in [0usize, 1, 7, 13, 31] {
            assert_eq!(
                wa.rotr(by).value().unwrap(),
                (a as u32).rotate_right(by as u32) as u64,
                "rotr {}",
                by
            );
            assert_eq!(
                wa.shr(by).value().unwrap(),
                (a as u32 >> by) as u64,
                "shr {}",
                by
            );
        }
    }

    #[test]
    fn test_add_many_wraps_modulo_width() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        let a = u32::MAX as u64;
        let b = 5u64;
        let c = 0x9e3779b9u64;
        let wa = witness_word(&cs, 32, a);
        let wb = witness_word(&cs, 32, b);
        let wc = witness_word(&cs, 32, c);

        let sum = WordVar::add_many(&[&wa, &wb, &wc]).unwrap();
        let expected = (a as u32).wrapping_add(b as u32).wrapping_add(c as u32);
        assert_eq!(sum.value().unwrap(), expected as u64);
        assert!(cs.is_satisfied().unwrap());
    }

    #[test]
    fn test_add_many_constants_fold() {
        let wa = WordVar::<Fr>::constant(64, u64::MAX);
        let wb = WordVar::<Fr>::constant(64, 2);
        let sum = WordVar::add_many(&[&wa, &wb]).unwrap();
        assert_eq!(sum.value().unwrap(), 1);
    }
}
