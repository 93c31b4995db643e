mod iter;

pub use iter::SolveIter;

use gf2::{BitMatrix, BitVector};
use tracing::info_span;

use crate::bitset::BitSet;
use crate::constraint::Constraint;
use crate::error::{Error, Result};
use crate::model::Model;
use crate::system::{LinearSystem, MAX_WIDTH};

/// Tuning knobs for [`solve`] and [`solve_all`].
///
/// There is currently one knob; it exists as a struct (rather than a bare
/// parameter) so future options can be added without breaking callers, the
/// same way constraint-system configuration is threaded through as a value
/// rather than a growing parameter list.
#[derive(Clone, Debug)]
pub struct SolverOptions {
    /// Emit a `tracing` debug event summarizing rank/free-variable counts
    /// after elimination.
    pub trace_elimination: bool,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self { trace_elimination: true }
    }
}

/// The outcome of Gaussian elimination on the constraints' augmented matrix:
/// a system width, a particular solution, and a basis for the solution
/// space's kernel (one basis vector per free variable).
struct Elimination {
    width: usize,
    particular: BitSet,
    kernel: Vec<BitSet>,
}

fn eliminate(system: &LinearSystem, constraints: &[Constraint], opts: &SolverOptions) -> Result<Elimination> {
    let width = system.width();
    let rows = constraints.len();
    if rows == 0 {
        return Err(Error::domain("must contain at least one equation"));
    }
    if rows > MAX_WIDTH {
        return Err(Error::Overflow("equation count exceeds 2^31 - 1".into()));
    }

    let mut a = BitMatrix::zeros(rows, width);
    let mut b = BitVector::zeros(rows);
    for (r, c) in constraints.iter().enumerate() {
        let residual = c.residual();
        for i in residual.mask().iter_ones() {
            a.set(r, i, true);
        }
        b.set(r, residual.constant_term());
    }

    a.append_col(&b);
    let mut has_pivot = a.to_reduced_echelon_form();
    let b_ref = a.remove_col().expect("augmented column was just appended");
    has_pivot.pop();

    let rank = has_pivot.count_ones();
    has_pivot.flip_all();
    let free: Vec<usize> = has_pivot.set_bits().collect();

    for i in rank..a.rows() {
        if b_ref[i] {
            return Err(Error::Infeasible);
        }
    }

    if opts.trace_elimination {
        tracing::debug!(rank, free = free.len(), rows, width, "eliminated constraint system");
    }

    let particular = back_substitute(&a, &b_ref, rank, width, &[]);
    let kernel = free
        .iter()
        .map(|&f| {
            let assignment: Vec<(usize, bool)> = vec![(f, true)];
            back_substitute(&a, &b_ref, rank, width, &assignment)
        })
        .collect();

    Ok(Elimination { width, particular, kernel })
}

/// Solve for the non-free lanes given a fixed assignment of the free lanes
/// (`free_assignment` entries default every unnamed free lane to `0`).
fn back_substitute(
    a_ref: &BitMatrix,
    b_ref: &BitVector,
    rank: usize,
    width: usize,
    free_assignment: &[(usize, bool)],
) -> BitSet {
    let mut x = BitSet::zeros(width);
    for &(j, v) in free_assignment {
        x.set(j, v);
    }
    for i in (0..rank).rev() {
        let j = a_ref[i].first_set().expect("pivot row has a leading one");
        let mut v = b_ref[i];
        for k in (j + 1)..width {
            if a_ref[i][k] {
                v ^= x.test(k);
            }
        }
        x.set(j, v);
    }
    x
}

/// Find one satisfying assignment for `constraints`.
///
/// # Errors
/// [`Error::Infeasible`] if the constraints admit no solution;
/// [`Error::CrossSystem`] if constraints were not all built against the same
/// [`LinearSystem`].
pub fn solve(system: &LinearSystem, constraints: &[Constraint]) -> Result<Model> {
    solve_with_options(system, constraints, &SolverOptions::default())
}

/// [`solve`] with explicit [`SolverOptions`].
pub fn solve_with_options(system: &LinearSystem, constraints: &[Constraint], opts: &SolverOptions) -> Result<Model> {
    let span = info_span!("solve", constraints = constraints.len(), width = system.width());
    let _enter = span.enter();
    let elim = eliminate(system, constraints, opts)?;
    Ok(system.decode(&elim.particular))
}

/// Enumerate every satisfying assignment of `constraints` as a
/// [`SolveIter`].
///
/// # Errors
/// Same as [`solve`].
pub fn solve_all(system: &LinearSystem, constraints: &[Constraint]) -> Result<SolveIter> {
    solve_all_with_options(system, constraints, &SolverOptions::default())
}

/// [`solve_all`] with explicit [`SolverOptions`].
pub fn solve_all_with_options(
    system: &LinearSystem,
    constraints: &[Constraint],
    opts: &SolverOptions,
) -> Result<SolveIter> {
    let span = info_span!("solve_all", constraints = constraints.len(), width = system.width());
    let _enter = span.enter();
    let elim = eliminate(system, constraints, opts)?;
    Ok(SolveIter::new(system.clone(), elim.width, elim.particular, elim.kernel))
}
