//! Build helpers for expression construction.
//!
//! The `*_raw` builders keep operand order and skip canonicalization, for
//! use inside recursive rules that control structure themselves.

use cas_ast::{Context, Expr, ExprId};

#[inline]
pub fn mul2_raw(ctx: &mut Context, a: ExprId, b: ExprId) -> ExprId {
    ctx.add_raw(Expr::Mul(a, b))
}

#[inline]
pub fn div2_raw(ctx: &mut Context, a: ExprId, b: ExprId) -> ExprId {
    ctx.add_raw(Expr::Div(a, b))
}

#[inline]
pub fn pow2_raw(ctx: &mut Context, base: ExprId, exp: ExprId) -> ExprId {
    ctx.add_raw(Expr::Pow(base, exp))
}

/// `base^n` for a small integer exponent.
pub fn pow_int(ctx: &mut Context, base: ExprId, n: i64) -> ExprId {
    let exp = ctx.num(n);
    ctx.add(Expr::Pow(base, exp))
}
