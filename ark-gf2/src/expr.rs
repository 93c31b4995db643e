use std::fmt;
use std::ops::{BitAnd, BitOr, BitXor, Not};

use crate::bitset::BitSet;
use crate::constraint::Constraint;
use crate::error::{Error, Result};
use crate::system::LinearSystem;
use crate::variable::BitRef;

/// A single symbolic GF(2) value: an affine form `c ⊕ (⊕ mask_i * v_i)` over
/// the variables declared in a [`LinearSystem`] — a constant bit XORed with
/// the parity of a subset of the system's variable bits.
///
/// `BitExpr` is immutable and cheap to clone: the mask is the only
/// variable-sized payload, and systems are typically reused across many
/// expressions built from the same [`LinearSystem::gen`] calls.
#[derive(Clone, Debug)]
pub struct BitExpr {
    system: LinearSystem,
    mask: BitSet,
    /// The constant term `c`.
    constant: bool,
}

impl BitExpr {
    pub(crate) fn from_parts(system: LinearSystem, mask: BitSet, constant: bool) -> Self {
        Self { system, mask, constant }
    }

    /// The [`LinearSystem`] this expression is defined over.
    pub fn system(&self) -> &LinearSystem {
        &self.system
    }

    /// `true` iff this expression has no variable terms, i.e. it is a literal
    /// `0` or `1`.
    pub fn is_constant(&self) -> bool {
        self.mask.is_zero()
    }

    /// For a constant expression, its value. `None` if it has variable terms.
    pub fn as_constant(&self) -> Option<bool> {
        self.is_constant().then_some(self.constant)
    }

    /// The constant term `c` of the affine form, irrespective of whether any
    /// variable terms are present.
    pub(crate) fn constant_term(&self) -> bool {
        self.constant
    }

    /// The raw variable-term mask over the system's global bit coordinates.
    pub(crate) fn mask(&self) -> &BitSet {
        &self.mask
    }

    /// The [`BitRef`]s of the variable bits this expression XORs together,
    /// in ascending order of global coordinate.
    pub fn terms(&self) -> impl Iterator<Item = BitRef> + '_ {
        self.mask.iter_ones().map(|i| self.system.bit_ref(i))
    }

    fn check_system(&self, other: &BitExpr) -> Result<()> {
        if self.system == other.system {
            Ok(())
        } else {
            Err(Error::CrossSystem)
        }
    }

    /// Build the [`Constraint`] `self == other`, asserting the two
    /// expressions are equal under every later-found satisfying assignment.
    ///
    /// Named `eq_constraint` rather than overloading [`PartialEq`], which
    /// must return a plain `bool`.
    pub fn eq_constraint(&self, other: &BitExpr) -> Result<Constraint> {
        self.check_system(other)?;
        Ok(Constraint::new((self.clone() ^ other.clone())?))
    }
}

impl PartialEq for BitExpr {
    fn eq(&self, other: &Self) -> bool {
        self.system == other.system && self.mask == other.mask && self.constant == other.constant
    }
}
impl Eq for BitExpr {}

impl fmt::Display for BitExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_constant() {
            return write!(f, "{}", self.constant as u8);
        }
        let mut first = true;
        if self.constant {
            write!(f, "1")?;
            first = false;
        }
        for i in self.mask.iter_ones() {
            if !first {
                write!(f, " ^ ")?;
            }
            first = false;
            write!(f, "{}", self.system.bit_ref(i))?;
        }
        Ok(())
    }
}

impl BitXor for BitExpr {
    type Output = Result<BitExpr>;
    fn bitxor(self, rhs: BitExpr) -> Result<BitExpr> {
        self.check_system(&rhs)?;
        let mut mask = self.mask.clone();
        mask.xor_inplace(&rhs.mask);
        Ok(BitExpr { system: self.system, mask, constant: self.constant ^ rhs.constant })
    }
}

impl BitXor<bool> for BitExpr {
    type Output = BitExpr;
    fn bitxor(self, rhs: bool) -> BitExpr {
        BitExpr { constant: self.constant ^ rhs, ..self }
    }
}

impl Not for BitExpr {
    type Output = BitExpr;
    fn not(self) -> BitExpr {
        BitExpr { constant: !self.constant, ..self }
    }
}

impl BitAnd for BitExpr {
    type Output = Result<BitExpr>;

    /// AND of two affine forms is only affine itself when at least one
    /// operand is a known constant (otherwise the product introduces a
    /// quadratic cross term the GF(2) affine representation cannot carry).
    fn bitand(self, rhs: BitExpr) -> Result<BitExpr> {
        self.check_system(&rhs)?;
        match (self.as_constant(), rhs.as_constant()) {
            (Some(false), _) | (_, Some(false)) => Ok(self.system.zero()),
            (Some(true), _) => Ok(rhs),
            (_, Some(true)) => Ok(self),
            (None, None) => Err(Error::domain(
                "AND of two non-constant BitExprs is not representable as an affine form",
            )),
        }
    }
}

impl BitOr for BitExpr {
    type Output = Result<BitExpr>;

    /// `a | b = a ^ b ^ (a & b)`; like [`BitAnd`], only representable when at
    /// least one operand is constant.
    fn bitor(self, rhs: BitExpr) -> Result<BitExpr> {
        self.check_system(&rhs)?;
        match (self.as_constant(), rhs.as_constant()) {
            (Some(true), _) | (_, Some(true)) => Ok(self.system.one()),
            (Some(false), _) => Ok(rhs),
            (_, Some(false)) => Ok(self),
            (None, None) => Err(Error::domain(
                "OR of two non-constant BitExprs is not representable as an affine form",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::LinearSystem;

    #[test]
    fn xor_is_affine_combination() {
        let sys = LinearSystem::new([("a", 1), ("b", 1)]).unwrap();
        let a = sys.gen(0).unwrap().lane(0).clone();
        let b = sys.gen(1).unwrap().lane(0).clone();
        let c = (a ^ b).unwrap();
        assert!(!c.is_constant());
        assert_eq!(c.terms().map(|t| t.global_index()).collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn xor_self_is_zero() {
        let sys = LinearSystem::new([("a", 1)]).unwrap();
        let a = sys.gen(0).unwrap().lane(0).clone();
        let c = (a.clone() ^ a).unwrap();
        assert_eq!(c.as_constant(), Some(false));
    }

    #[test]
    fn and_requires_a_constant_operand() {
        let sys = LinearSystem::new([("a", 1), ("b", 1)]).unwrap();
        let a = sys.gen(0).unwrap().lane(0).clone();
        let b = sys.gen(1).unwrap().lane(0).clone();
        assert!((a.clone() & b.clone()).is_err());
        assert!((a & sys.one()).unwrap().as_constant().is_none());
    }

    #[test]
    fn cross_system_xor_errors() {
        let a_sys = LinearSystem::new([("a", 1)]).unwrap();
        let b_sys = LinearSystem::new([("a", 1)]).unwrap();
        let a = a_sys.gen(0).unwrap().lane(0).clone();
        let b = b_sys.gen(0).unwrap().lane(0).clone();
        assert_eq!((a ^ b).unwrap_err(), Error::CrossSystem);
    }

    #[test]
    fn display_formats_as_xor_chain() {
        let sys = LinearSystem::new([("a", 1), ("b", 1)]).unwrap();
        let a = sys.gen(0).unwrap().lane(0).clone();
        let b = sys.gen(1).unwrap().lane(0).clone();
        let c = (a ^ b).unwrap();
        assert_eq!(c.to_string(), "a ^ b");
    }
}
