use std::rc::Rc;

use num_bigint::BigUint;
use num_traits::Zero;
use tracing::info_span;

use crate::bitset::BitSet;
use crate::error::{Error, Result};
use crate::expr::BitExpr;
use crate::model::Model;
use crate::variable::{BitRef, VarInfo};
use crate::vector::BitVec;

/// The bound the matrix collaborator imposes on both equation count and
/// system width (`2^31 - 1`), mirroring `m4ri`'s `rci_t` range.
pub(crate) const MAX_WIDTH: usize = (1usize << 31) - 1;

#[derive(Debug)]
struct SystemInner {
    vars: Vec<VarInfo>,
    width: usize,
}

/// The root context: a registry of declared variables, each assigned a
/// contiguous half-open range of bits in a shared global coordinate space.
///
/// `LinearSystem` is a cheap, `Clone`-able handle (an `Rc` to the actual
/// variable table) — cloning it does not re-declare variables, it just
/// shares the same system, the same way `ConstraintSystemRef` shares one
/// `ConstraintSystem` across every gadget that builds on it.
#[derive(Clone, Debug)]
pub struct LinearSystem(Rc<SystemInner>);

impl PartialEq for LinearSystem {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
impl Eq for LinearSystem {}

impl LinearSystem {
    /// Declare a new system from an ordered sequence of `(name, bits)`
    /// pairs. Offsets are assigned in iteration order.
    ///
    /// # Errors
    /// Returns [`Error::Domain`] if any width is `0`, or [`Error::Overflow`]
    /// if the total width would exceed the matrix collaborator's bound.
    pub fn new<I, S>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, usize)>,
        S: Into<String>,
    {
        let mut builder = LinearSystemBuilder::new();
        for (name, bits) in vars {
            builder.var(name, bits)?;
        }
        builder.build()
    }

    /// This system's total bit width `B`.
    #[inline]
    pub fn width(&self) -> usize {
        self.0.width
    }

    /// The declared variables, in declaration order.
    #[inline]
    pub fn variables(&self) -> &[VarInfo] {
        &self.0.vars
    }

    /// The symbolic value of the `i`th declared variable: a `BitVec` whose
    /// lane `b` is the `BitExpr` for global bit `vars[i].offset() + b`.
    pub fn gen(&self, i: usize) -> Result<BitVec> {
        let var = self
            .0
            .vars
            .get(i)
            .ok_or_else(|| Error::index_out_of_range(i, self.0.vars.len()))?;
        Ok(self.gen_var(var))
    }

    /// Like [`Self::gen`], looked up by variable name.
    pub fn gen_named(&self, name: &str) -> Result<BitVec> {
        let var = self
            .0
            .vars
            .iter()
            .find(|v| v.name() == name)
            .ok_or_else(|| Error::domain(format!("no variable named '{name}'")))?;
        Ok(self.gen_var(var))
    }

    fn gen_var(&self, var: &VarInfo) -> BitVec {
        let lanes = (0..var.bits())
            .map(|b| {
                let mut mask = BitSet::zeros(self.0.width);
                mask.set(var.offset() + b, true);
                BitExpr::from_parts(self.clone(), mask, false)
            })
            .collect();
        // constructed lane-by-lane above, each already validated against
        // this system, so direct construction cannot fail.
        BitVec::from_lanes(lanes)
    }

    /// The symbolic value of every declared variable, in declaration order.
    pub fn gens(&self) -> Vec<BitVec> {
        self.0.vars.iter().map(|v| self.gen_var(v)).collect()
    }

    /// The canonical constant `0` expression bound to this system.
    pub fn zero(&self) -> BitExpr {
        BitExpr::from_parts(self.clone(), BitSet::zeros(self.0.width), false)
    }

    /// The canonical constant `1` expression bound to this system.
    pub fn one(&self) -> BitExpr {
        BitExpr::from_parts(self.clone(), BitSet::zeros(self.0.width), true)
    }

    /// Look up the [`BitRef`] for global coordinate `i`.
    ///
    /// # Panics
    /// Panics if `i >= self.width()`.
    pub fn bit_ref(&self, i: usize) -> BitRef {
        let var = self
            .0
            .vars
            .iter()
            .rfind(|v| v.offset() <= i)
            .expect("global index within system width must resolve to a variable");
        BitRef::new(var.clone(), i - var.offset())
    }

    /// Decode a raw assignment over the system's global coordinate space
    /// into a [`Model`], mapping each declared variable to the little-endian
    /// integer formed by its bits.
    pub(crate) fn decode(&self, y: &BitSet) -> Model {
        let mut model = Model::new();
        for var in &self.0.vars {
            let mut value = BigUint::zero();
            for b in (0..var.bits()).rev() {
                value <<= 1u32;
                if y.test(var.offset() + b) {
                    value += 1u32;
                }
            }
            model.insert(var.name().to_string(), value);
        }
        model
    }
}

/// Incrementally builds a [`LinearSystem`], one variable declaration at a
/// time. Equivalent to repeated calls to [`LinearSystem::new`] but useful
/// when the variable list is assembled dynamically.
#[derive(Debug, Default)]
pub struct LinearSystemBuilder {
    vars: Vec<VarInfo>,
    width: usize,
}

impl LinearSystemBuilder {
    /// An empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare one more variable, assigning it the next contiguous range of
    /// bits.
    ///
    /// # Errors
    /// [`Error::Domain`] if `bits == 0`; [`Error::Overflow`] if the running
    /// total width would exceed `2^31 - 1`.
    pub fn var(&mut self, name: impl Into<String>, bits: usize) -> Result<&mut Self> {
        if bits == 0 {
            return Err(Error::domain("variable width must be at least 1"));
        }
        let offset = self.width;
        let new_width = offset
            .checked_add(bits)
            .filter(|&w| w <= MAX_WIDTH)
            .ok_or_else(|| Error::Overflow("system bit width exceeds 2^31 - 1".into()))?;
        self.vars.push(VarInfo::new(name.into(), bits, offset));
        self.width = new_width;
        Ok(self)
    }

    /// Finalize the builder into an immutable [`LinearSystem`].
    pub fn build(self) -> Result<LinearSystem> {
        let span = info_span!("linear_system_build", vars = self.vars.len(), width = self.width);
        let _enter = span.enter();
        tracing::debug!(width = self.width, vars = self.vars.len(), "declared linear system");
        Ok(LinearSystem(Rc::new(SystemInner { vars: self.vars, width: self.width })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assigns_contiguous_offsets() {
        let sys = LinearSystem::new([("a", 8), ("b", 4)]).unwrap();
        assert_eq!(sys.width(), 12);
        assert_eq!(sys.variables()[0].offset(), 0);
        assert_eq!(sys.variables()[1].offset(), 8);
    }

    #[test]
    fn rejects_zero_width() {
        assert!(LinearSystem::new([("a", 0)]).is_err());
    }

    #[test]
    fn distinct_systems_are_not_equal() {
        let a = LinearSystem::new([("x", 1)]).unwrap();
        let b = LinearSystem::new([("x", 1)]).unwrap();
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn gen_named_matches_gen() {
        let sys = LinearSystem::new([("a", 2), ("b", 3)]).unwrap();
        assert_eq!(sys.gen_named("b").unwrap(), sys.gen(1).unwrap());
        assert!(sys.gen_named("nope").is_err());
    }
}
