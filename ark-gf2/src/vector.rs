use std::ops::{BitAnd, BitOr, BitXor, Not, Shl, Shr};

use num_bigint::BigUint;

use crate::error::{Error, Result};
use crate::expr::BitExpr;
use crate::system::LinearSystem;

/// Decompose `value` into `n` bits, LSB first, two's-complement: bits past
/// position 127 are the sign extension of the `i128`, matching
/// `_PyLong_AsByteArray`'s `is_signed` byte decomposition widened to an
/// arbitrary lane count.
fn literal_bits(value: i128, n: usize) -> Vec<bool> {
    (0..n).map(|i| if i < 128 { (value >> i) & 1 != 0 } else { value < 0 }).collect()
}

/// An ordered sequence of [`BitExpr`] lanes, least-significant lane first —
/// the symbolic analogue of a fixed-width unsigned integer.
///
/// Operators combine `BitVec`s lane-wise. Integer literals may be mixed into
/// any binary operation via [`Self::xor_literal`]/[`Self::and_literal`]/
/// [`Self::or_literal`] (or the `BitXor`/`BitAnd`/`BitOr` impls for `i128`):
/// the literal is expanded to a same-length constant by taking its
/// two's-complement bits low-to-high, truncating or sign-extending to the
/// operand's length — so a negative literal masks the same way `-1i64`
/// would in two's-complement arithmetic, not just nonnegative ones.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitVec {
    lanes: Vec<BitExpr>,
}

impl BitVec {
    pub(crate) fn from_lanes(lanes: Vec<BitExpr>) -> Self {
        Self { lanes }
    }

    /// Number of lanes (bit width) of this vector.
    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    /// `true` iff this vector has no lanes.
    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    /// The `LinearSystem` this vector's lanes are defined over.
    ///
    /// # Panics
    /// Panics if the vector has no lanes (a zero-length `BitVec` carries no
    /// system reference).
    pub fn system(&self) -> &LinearSystem {
        self.lanes[0].system()
    }

    /// Lane `i`, least-significant first.
    ///
    /// # Panics
    /// Panics if `i >= self.len()`.
    pub fn lane(&self, i: usize) -> &BitExpr {
        &self.lanes[i]
    }

    /// Lane `i`, or the system's constant `0` if `i >= self.len()` —
    /// zero-extension for mixed-length operations.
    pub(crate) fn lane_or_zero(&self, i: usize) -> Result<BitExpr> {
        if let Some(l) = self.lanes.get(i) {
            Ok(l.clone())
        } else if self.lanes.is_empty() {
            Err(Error::domain("cannot zero-extend an empty BitVec: no system to borrow a zero from"))
        } else {
            Ok(self.system().zero())
        }
    }

    /// Iterate over lanes, least-significant first.
    pub fn lanes(&self) -> impl Iterator<Item = &BitExpr> {
        self.lanes.iter()
    }

    /// A constant `BitVec` of `bits` lanes over `sys`, taking `value`'s bits
    /// low-to-high and zero-extending or truncating to fit.
    pub fn constant(sys: &LinearSystem, value: impl Into<BigUint>, bits: usize) -> Result<Self> {
        if bits == 0 {
            return Err(Error::domain("BitVec width must be at least 1"));
        }
        let mut value: BigUint = value.into();
        let mut lanes = Vec::with_capacity(bits);
        for _ in 0..bits {
            let bit = &value % 2u32 == BigUint::from(1u32);
            lanes.push(if bit { sys.one() } else { sys.zero() });
            value >>= 1u32;
        }
        Ok(Self { lanes })
    }

    /// A constant `BitVec` of `bits` lanes over `sys`, taking `value`'s
    /// two's-complement representation of width `bits` — the signed
    /// counterpart of [`Self::constant`], for literals like `-1i64` that
    /// have no `BigUint` representation at all.
    pub fn constant_signed(sys: &LinearSystem, value: i128, bits: usize) -> Result<Self> {
        if bits == 0 {
            return Err(Error::domain("BitVec width must be at least 1"));
        }
        let lanes = literal_bits(value, bits).into_iter().map(|b| if b { sys.one() } else { sys.zero() }).collect();
        Ok(Self { lanes })
    }

    fn zip_apply<F>(&self, other: &BitVec, f: F) -> Result<BitVec>
    where
        F: Fn(BitExpr, BitExpr) -> Result<BitExpr>,
    {
        let n = self.len().max(other.len());
        let mut lanes = Vec::with_capacity(n);
        for i in 0..n {
            lanes.push(f(self.lane_or_zero(i)?, other.lane_or_zero(i)?)?);
        }
        Ok(BitVec { lanes })
    }

    /// Lane-wise AND. See [`BitExpr::bitand`]'s affine-form restriction: every
    /// lane pair needs at least one constant operand.
    pub fn and(&self, other: &BitVec) -> Result<BitVec> {
        self.zip_apply(other, |a, b| a & b)
    }

    /// Lane-wise OR. Same restriction as [`Self::and`].
    pub fn or(&self, other: &BitVec) -> Result<BitVec> {
        self.zip_apply(other, |a, b| a | b)
    }

    /// Lane-wise XOR.
    pub fn xor(&self, other: &BitVec) -> Result<BitVec> {
        self.zip_apply(other, |a, b| a ^ b)
    }

    /// Lane-wise NOT.
    pub fn not(&self) -> BitVec {
        BitVec { lanes: self.lanes.iter().cloned().map(|l| !l).collect() }
    }

    /// XOR with an integer literal, mixed in by decomposing `value` into
    /// this vector's length, LSB first, two's-complement (so a negative
    /// literal is representable, unlike [`Self::constant`]).
    pub fn xor_literal(&self, value: i128) -> Result<BitVec> {
        let bits = literal_bits(value, self.len());
        let lanes = self.lanes.iter().cloned().zip(bits).map(|(l, b)| l ^ b).collect();
        Ok(BitVec { lanes })
    }

    /// AND with an integer literal. Lane `i` becomes `self[i]` where the
    /// literal's bit `i` is `1`, else canonical `0`.
    pub fn and_literal(&self, value: i128) -> Result<BitVec> {
        let bits = literal_bits(value, self.len());
        let zero = self.system().zero();
        let lanes = self.lanes.iter().cloned().zip(bits).map(|(l, b)| if b { l } else { zero.clone() }).collect();
        Ok(BitVec { lanes })
    }

    /// OR with an integer literal. Lane `i` becomes canonical `1` where the
    /// literal's bit `i` is `1`, else `self[i]`.
    pub fn or_literal(&self, value: i128) -> Result<BitVec> {
        let bits = literal_bits(value, self.len());
        let one = self.system().one();
        let lanes = self.lanes.iter().cloned().zip(bits).map(|(l, b)| if b { one.clone() } else { l }).collect();
        Ok(BitVec { lanes })
    }

    /// Decode a constant `BitVec` (every lane a known bit) into a `u64`.
    ///
    /// # Errors
    /// [`Error::Domain`] if the vector is wider than 64 lanes, or any lane
    /// is not constant.
    pub fn to_u64(&self) -> Result<u64> {
        if self.len() > 64 {
            return Err(Error::domain("BitVec width exceeds 64 bits for to_u64"));
        }
        let mut value: u64 = 0;
        for (i, lane) in self.lanes.iter().enumerate() {
            let bit = lane
                .as_constant()
                .ok_or_else(|| Error::domain("to_u64 requires every lane to be constant"))?;
            if bit {
                value |= 1u64 << i;
            }
        }
        Ok(value)
    }

    /// Logical shift left by `amount`, shifting zeros in at the low end and
    /// discarding overflow at the high end. `amount` must be `>= 0`.
    ///
    /// # Errors
    /// [`Error::Domain`] if `amount < 0`.
    pub fn shl(&self, amount: i64) -> Result<BitVec> {
        let amount = Self::normalize_shift(amount, self.len())?;
        let zero = self.system().zero();
        let lanes = (0..self.len())
            .map(|i| if i >= amount { self.lanes[i - amount].clone() } else { zero.clone() })
            .collect();
        Ok(BitVec { lanes })
    }

    /// Logical shift right by `amount`, shifting zeros in at the high end.
    ///
    /// # Errors
    /// [`Error::Domain`] if `amount < 0`.
    pub fn lshr(&self, amount: i64) -> Result<BitVec> {
        let amount = Self::normalize_shift(amount, self.len())?;
        let zero = self.system().zero();
        let n = self.len();
        let lanes = (0..n)
            .map(|i| if i + amount < n { self.lanes[i + amount].clone() } else { zero.clone() })
            .collect();
        Ok(BitVec { lanes })
    }

    /// Arithmetic shift right by `amount`: the vacated high bits are filled
    /// with copies of the original most-significant lane (sign extension).
    ///
    /// # Errors
    /// [`Error::Domain`] if `amount < 0`.
    pub fn sar(&self, amount: i64) -> Result<BitVec> {
        let amount = Self::normalize_shift(amount, self.len())?;
        let n = self.len();
        if n == 0 {
            return Err(Error::domain("cannot shift an empty BitVec"));
        }
        let sign = self.lanes[n - 1].clone();
        let lanes = (0..n)
            .map(|i| if i + amount < n { self.lanes[i + amount].clone() } else { sign.clone() })
            .collect();
        Ok(BitVec { lanes })
    }

    /// Rotate lanes left by `amount`, modulo the vector's length.
    ///
    /// # Errors
    /// [`Error::Domain`] if `amount < 0` or the vector is empty.
    pub fn rotl(&self, amount: i64) -> Result<BitVec> {
        self.rotate(amount, true)
    }

    /// Rotate lanes right by `amount`, modulo the vector's length.
    ///
    /// # Errors
    /// [`Error::Domain`] if `amount < 0` or the vector is empty.
    pub fn rotr(&self, amount: i64) -> Result<BitVec> {
        self.rotate(amount, false)
    }

    fn rotate(&self, amount: i64, left: bool) -> Result<BitVec> {
        let n = self.len();
        if n == 0 {
            return Err(Error::domain("cannot rotate an empty BitVec"));
        }
        if amount < 0 {
            return Err(Error::domain("rotate amount must be non-negative"));
        }
        let amount = (amount as usize) % n;
        let amount = if left { (n - amount) % n } else { amount };
        let lanes = (0..n).map(|i| self.lanes[(i + amount) % n].clone()).collect();
        Ok(BitVec { lanes })
    }

    /// The shift amount is normalized modulo the vector's length exactly
    /// once; a negative amount is a domain error rather than wrapping.
    fn normalize_shift(amount: i64, len: usize) -> Result<usize> {
        if amount < 0 {
            return Err(Error::domain("shift amount must be non-negative"));
        }
        if len == 0 {
            return Err(Error::domain("cannot shift an empty BitVec"));
        }
        Ok((amount as usize).min(len))
    }

    /// The XOR-parity of every lane, as a single [`BitExpr`].
    ///
    /// # Errors
    /// [`Error::Domain`] if the vector is empty.
    pub fn parity(&self) -> Result<BitExpr> {
        let mut iter = self.lanes.iter().cloned();
        let first = iter.next().ok_or_else(|| Error::domain("cannot take parity of an empty BitVec"))?;
        iter.try_fold(first, |acc, l| acc ^ l)
    }

    /// Broadcast a single [`BitExpr`] into an `n`-lane vector where every
    /// lane equals `bit`.
    pub fn broadcast(bit: &BitExpr, n: usize) -> Result<BitVec> {
        if n == 0 {
            return Err(Error::domain("BitVec width must be at least 1"));
        }
        Ok(BitVec { lanes: vec![bit.clone(); n] })
    }
}

impl BitXor<&BitVec> for &BitVec {
    type Output = Result<BitVec>;
    fn bitxor(self, rhs: &BitVec) -> Result<BitVec> {
        self.xor(rhs)
    }
}

impl BitAnd<&BitVec> for &BitVec {
    type Output = Result<BitVec>;
    fn bitand(self, rhs: &BitVec) -> Result<BitVec> {
        self.and(rhs)
    }
}

impl BitOr<&BitVec> for &BitVec {
    type Output = Result<BitVec>;
    fn bitor(self, rhs: &BitVec) -> Result<BitVec> {
        self.or(rhs)
    }
}

impl Not for &BitVec {
    type Output = BitVec;
    fn not(self) -> BitVec {
        BitVec::not(self)
    }
}

impl BitXor<i128> for &BitVec {
    type Output = Result<BitVec>;
    fn bitxor(self, rhs: i128) -> Result<BitVec> {
        self.xor_literal(rhs)
    }
}

impl BitAnd<i128> for &BitVec {
    type Output = Result<BitVec>;
    fn bitand(self, rhs: i128) -> Result<BitVec> {
        self.and_literal(rhs)
    }
}

impl BitOr<i128> for &BitVec {
    type Output = Result<BitVec>;
    fn bitor(self, rhs: i128) -> Result<BitVec> {
        self.or_literal(rhs)
    }
}

impl Shl<i64> for &BitVec {
    type Output = Result<BitVec>;
    fn shl(self, amount: i64) -> Result<BitVec> {
        self.shl(amount)
    }
}

impl Shr<i64> for &BitVec {
    type Output = Result<BitVec>;
    /// Logical (not arithmetic) shift right; use [`BitVec::sar`] explicitly
    /// for sign extension.
    fn shr(self, amount: i64) -> Result<BitVec> {
        self.lshr(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::LinearSystem;

    #[test]
    fn shl_zero_fills_low_end() {
        let sys = LinearSystem::new([("a", 4)]).unwrap();
        let a = sys.gen(0).unwrap();
        let shifted = a.shl(1).unwrap();
        assert_eq!(shifted.lane(0).as_constant(), Some(false));
        assert_eq!(shifted.lane(1), a.lane(0));
    }

    #[test]
    fn rotl_is_inverse_of_rotr() {
        let sys = LinearSystem::new([("a", 5)]).unwrap();
        let a = sys.gen(0).unwrap();
        let roundtrip = a.rotl(2).unwrap().rotr(2).unwrap();
        assert_eq!(roundtrip, a);
    }

    #[test]
    fn negative_shift_is_domain_error() {
        let sys = LinearSystem::new([("a", 4)]).unwrap();
        let a = sys.gen(0).unwrap();
        assert!(a.shl(-1).is_err());
    }

    #[test]
    fn parity_of_all_zero_constant_is_zero() {
        let sys = LinearSystem::new([("a", 1)]).unwrap();
        let zero = BitVec::constant(&sys, 0u8, 8).unwrap();
        assert_eq!(zero.parity().unwrap().as_constant(), Some(false));
    }

    #[test]
    fn negative_literal_masks_via_twos_complement() {
        let sys = LinearSystem::new([("a", 1)]).unwrap();
        // -1i128 in two's complement is all-ones at any width.
        let minus_one = BitVec::constant_signed(&sys, -1, 8).unwrap();
        assert_eq!(minus_one.to_u64().unwrap(), 0xff);

        // -2 masked to 4 bits is 0b1110.
        let minus_two = BitVec::constant_signed(&sys, -2, 4).unwrap();
        assert_eq!(minus_two.to_u64().unwrap(), 0b1110);
    }

    #[test]
    fn xor_literal_matches_constant_xor() {
        let sys = LinearSystem::new([("a", 8)]).unwrap();
        let a = sys.gen(0).unwrap();
        let lit = a.xor_literal(-1).unwrap();
        let constant = BitVec::constant_signed(&sys, -1, 8).unwrap();
        assert_eq!(lit, a.xor(&constant).unwrap());
    }

    #[test]
    fn and_or_literal_select_canonical_constants() {
        let sys = LinearSystem::new([("a", 4)]).unwrap();
        let a = sys.gen(0).unwrap();
        let anded = a.and_literal(0b0101).unwrap();
        assert_eq!(anded.lane(0), a.lane(0));
        assert_eq!(anded.lane(1).as_constant(), Some(false));

        let ored = a.or_literal(0b0101).unwrap();
        assert_eq!(ored.lane(0).as_constant(), Some(true));
        assert_eq!(ored.lane(1), a.lane(1));
    }

    #[test]
    fn broadcast_replicates_single_bit() {
        let sys = LinearSystem::new([("a", 1)]).unwrap();
        let bit = sys.gen(0).unwrap().lane(0).clone();
        let v = BitVec::broadcast(&bit, 4).unwrap();
        assert_eq!(v.len(), 4);
        assert!(v.lanes().all(|l| *l == bit));
    }
}
