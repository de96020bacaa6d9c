use crate::{Context, Expr, ExprId};

/// An equation `lhs = rhs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Equation {
    pub lhs: ExprId,
    pub rhs: ExprId,
}

impl Equation {
    pub fn new(lhs: ExprId, rhs: ExprId) -> Self {
        Self { lhs, rhs }
    }

    /// An expression read as `expr = 0`.
    pub fn from_expr(ctx: &mut Context, expr: ExprId) -> Self {
        let zero = ctx.num(0);
        Self::new(expr, zero)
    }

    /// Build the residual `lhs - rhs` (unsimplified).
    pub fn residual(&self, ctx: &mut Context) -> ExprId {
        ctx.add(Expr::Sub(self.lhs, self.rhs))
    }
}
