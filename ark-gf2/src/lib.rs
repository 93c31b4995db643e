#![deny(unsafe_code)]
#![warn(missing_docs)]

//! A symbolic solver for systems of affine equations over `GF(2)`.
//!
//! Variables are declared on a [`LinearSystem`], combined into [`BitExpr`]
//! and [`BitVec`] terms with XOR/AND/OR/NOT and shift/rotate, asserted equal
//! with [`Constraint`]s, and solved by Gaussian elimination into a [`Model`]
//! — or enumerated in full via [`SolveIter`] when the system is
//! underdetermined.

mod bitset;
mod constraint;
mod error;
mod expr;
mod model;
mod solver;
mod system;
mod variable;
mod vector;

pub use constraint::{Constraint, VecConstraint};
pub use error::{Error, Result};
pub use expr::BitExpr;
pub use model::Model;
pub use solver::{solve, solve_all, solve_all_with_options, solve_with_options, SolveIter, SolverOptions};
pub use system::{LinearSystem, LinearSystemBuilder};
pub use variable::{BitRef, VarInfo};
pub use vector::BitVec;
