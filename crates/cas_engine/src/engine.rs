//! Simplifier entry point.
//!
//! Simplification converts an expression to the sum-of-terms normal form in
//! `normal_form` and rebuilds it, so equal polynomials and rational
//! constants come back as the same [`ExprId`].

use crate::normal_form::Normalizer;
use cas_ast::{Context, ExprId};
use tracing::trace;

/// Default cap on the number of terms a product may expand into.
pub const DEFAULT_EXPAND_LIMIT: usize = 64;

#[derive(Debug, Clone, Copy)]
pub struct Simplifier {
    /// Products of sums expand only while the result has at most this many
    /// terms; larger products stay factored.
    pub expand_limit: usize,
}

impl Default for Simplifier {
    fn default() -> Self {
        Self {
            expand_limit: DEFAULT_EXPAND_LIMIT,
        }
    }
}

impl Simplifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_expand_limit(expand_limit: usize) -> Self {
        Self { expand_limit }
    }

    /// Simplify `expr` in place in `ctx`.
    ///
    /// # Example
    ///
    /// ```
    /// use cas_ast::{Context, DisplayExpr};
    /// use cas_engine::Simplifier;
    /// use cas_parser::parse;
    ///
    /// let mut ctx = Context::new();
    /// let e = parse("2*x + 3*x - 1", &mut ctx).unwrap();
    /// let s = Simplifier::new().simplify(&mut ctx, e);
    /// assert_eq!(DisplayExpr { context: &ctx, id: s }.to_string(), "5 * x - 1");
    /// ```
    pub fn simplify(&self, ctx: &mut Context, expr: ExprId) -> ExprId {
        let before = ctx.node_count();
        let mut n = Normalizer::new(ctx, self.expand_limit);
        let sum = n.normalize(expr);
        let out = n.rebuild(&sum);
        trace!(
            terms = sum.len(),
            nodes_created = ctx.node_count() - before,
            "simplified"
        );
        out
    }
}

/// Simplify with the default settings.
pub fn simplify(ctx: &mut Context, expr: ExprId) -> ExprId {
    Simplifier::default().simplify(ctx, expr)
}
