//! Expression representation for the symbolic engine.
//!
//! Expressions live in a [`Context`] arena and are addressed by [`ExprId`].
//! Nodes are hash-consed, so two ids are equal exactly when the trees they
//! name are structurally equal.

pub mod builtin;
pub mod context;
pub mod display;
pub mod eq;
pub mod expression;
pub mod latex;
pub mod latex_core;
pub mod ordering;
pub mod symbol;

pub use builtin::BuiltinFn;
pub use context::Context;
pub use display::DisplayExpr;
pub use eq::Equation;
pub use expression::{Constant, Expr, ExprId};
pub use latex::LaTeXExpr;
pub use symbol::{SymbolId, SymbolTable};
