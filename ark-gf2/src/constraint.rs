use smallvec::SmallVec;

use crate::expr::BitExpr;
use crate::vector::BitVec;

/// Most vector constraints come from byte- or word-sized `BitVec`s; inline
/// storage for 8 lanes avoids a heap allocation for those common widths.
type Residuals = SmallVec<[BitExpr; 8]>;

/// A single GF(2) equation, stored as the affine form that must evaluate to
/// `0` under any satisfying assignment (`lhs == rhs` is normalized to
/// `lhs ^ rhs == 0` at construction time).
#[derive(Clone, Debug)]
pub struct Constraint {
    residual: BitExpr,
}

impl Constraint {
    pub(crate) fn new(residual: BitExpr) -> Self {
        Self { residual }
    }

    /// The affine form that this constraint requires to equal `0`.
    pub(crate) fn residual(&self) -> &BitExpr {
        &self.residual
    }
}

/// A constraint over whole [`BitVec`]s, equivalent to one [`Constraint`] per
/// lane but built and reported as a unit.
#[derive(Clone, Debug)]
pub struct VecConstraint {
    residuals: Residuals,
}

impl VecConstraint {
    pub(crate) fn new(residuals: Residuals) -> Self {
        Self { residuals }
    }

    /// Flatten into one [`Constraint`] per lane, in lane order.
    pub fn zeros(&self) -> Vec<Constraint> {
        self.residuals.iter().cloned().map(Constraint::new).collect()
    }
}

impl BitVec {
    /// Build the constraint `self == other`, lane by lane. Shorter operand is
    /// zero-padded on the high end to match the longer one's length, matching
    /// the zero-extension rule used elsewhere when mixing vector widths.
    pub fn eq_constraint(&self, other: &BitVec) -> crate::error::Result<VecConstraint> {
        let n = self.len().max(other.len());
        let mut residuals = Residuals::with_capacity(n);
        for i in 0..n {
            let a = self.lane_or_zero(i)?;
            let b = other.lane_or_zero(i)?;
            residuals.push(a.eq_constraint(&b)?.residual);
        }
        Ok(VecConstraint::new(residuals))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::LinearSystem;

    #[test]
    fn vec_eq_constraint_has_one_residual_per_lane() {
        let sys = LinearSystem::new([("a", 4), ("b", 4)]).unwrap();
        let a = sys.gen(0).unwrap();
        let b = sys.gen(1).unwrap();
        let vc = a.eq_constraint(&b).unwrap();
        assert_eq!(vc.zeros().len(), 4);
    }

    #[test]
    fn mismatched_lengths_are_zero_padded() {
        let sys = LinearSystem::new([("a", 2)]).unwrap();
        let a = sys.gen(0).unwrap();
        let zero = BitVec::constant(&sys, 0u8, 6).unwrap();
        let vc = a.eq_constraint(&zero).unwrap();
        assert_eq!(vc.zeros().len(), 6);
    }
}
