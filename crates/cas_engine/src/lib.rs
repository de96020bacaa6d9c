//! Simplification and symbolic calculus over [`cas_ast`] expressions.
//!
//! Everything here works on expressions owned by a caller-supplied
//! [`Context`](cas_ast::Context); results are new ids in the same arena.

pub mod calculus;
pub mod engine;
pub mod error;
mod normal_form;

pub use calculus::{antiderivative, derivative};
pub use engine::{simplify, Simplifier};
pub use error::CalculusError;
