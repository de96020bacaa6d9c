//! Real roots of single-variable equations.
//!
//! Polynomials with rational coefficients are solved exactly (linear,
//! quadratic formula, rational-root deflation); everything else falls back
//! to sign-change bracketing over a fixed window.

pub mod numeric_roots;
pub mod poly;
pub mod quadratic_formula;
pub mod rational_roots;
pub mod solution_set;
pub mod solve;

pub use solution_set::{Root, SolutionSet};
pub use solve::{solve_univariate, SolveError};
