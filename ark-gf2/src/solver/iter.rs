use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};

use crate::bitset::BitSet;
use crate::model::Model;
use crate::system::LinearSystem;

/// An iterator over every satisfying assignment of a solved constraint
/// system, returned by [`solve_all`](crate::solve_all).
///
/// Assignment `i` is the particular solution XORed with the combination of
/// kernel basis vectors selected by the set bits of `i`. The counter is a
/// [`BigUint`] rather than a native integer because the number of free
/// variables — and so the solution count `2^f` — is unbounded by any fixed
/// machine width.
pub struct SolveIter {
    system: LinearSystem,
    width: usize,
    particular: BitSet,
    kernel: Vec<BitSet>,
    next_index: BigUint,
    /// `2^kernel.len()`, the total number of assignments this iterator will
    /// produce.
    total: BigUint,
}

impl SolveIter {
    pub(crate) fn new(system: LinearSystem, width: usize, particular: BitSet, kernel: Vec<BitSet>) -> Self {
        let total = BigUint::from(1u32) << kernel.len();
        Self { system, width, particular, kernel, next_index: BigUint::zero(), total }
    }

    /// The number of free variables in the solved system (`log2` of the
    /// total solution count).
    pub fn free_count(&self) -> usize {
        self.kernel.len()
    }

    /// The total number of assignments this iterator will produce, `2^f`.
    pub fn solution_count(&self) -> &BigUint {
        &self.total
    }

    /// Decode every remaining assignment into a [`Model`], computing the
    /// solutions concurrently via `rayon`. Prefer this over collecting the
    /// iterator for systems with enough free variables that decoding
    /// dominates.
    ///
    /// # Panics
    /// Panics if the remaining solution count does not fit in a `usize`
    /// (i.e. more free variables than the platform's pointer width).
    #[cfg(feature = "parallel")]
    pub fn into_vec_parallel(self) -> Vec<Model> {
        use rayon::prelude::*;

        let remaining = (&self.total - &self.next_index)
            .to_usize()
            .expect("solution count exceeds usize::MAX; iterate with Iterator::next instead");
        (0..remaining)
            .into_par_iter()
            .map(|offset| {
                let index = &self.next_index + BigUint::from(offset);
                let y = self.assignment_for(index);
                self.system.decode(&y)
            })
            .collect()
    }

    fn assignment_for(&self, mut index: BigUint) -> BitSet {
        let mut y = self.particular.clone();
        for basis in &self.kernel {
            if &index % 2u32 == BigUint::from(1u32) {
                y.xor_inplace(basis);
            }
            index >>= 1u32;
        }
        y
    }
}

impl Iterator for SolveIter {
    type Item = Model;

    fn next(&mut self) -> Option<Model> {
        if self.next_index >= self.total {
            return None;
        }
        let y = self.assignment_for(self.next_index.clone());
        self.next_index += 1u32;
        debug_assert_eq!(y.width(), self.width);
        Some(self.system.decode(&y))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = &self.total - &self.next_index;
        match remaining.to_usize() {
            Some(n) => (n, Some(n)),
            None => (usize::MAX, None),
        }
    }
}
