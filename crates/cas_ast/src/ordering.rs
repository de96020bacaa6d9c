//! Canonical ordering of expression nodes.

use crate::{Constant, Context, Expr, ExprId};
use std::cmp::Ordering;

/// Node kinds in sort order.
fn kind(expr: &Expr) -> u8 {
    match expr {
        Expr::Number(_) => 0,
        Expr::Constant(_) => 1,
        Expr::Variable(_) => 2,
        Expr::Function(_, _) => 3,
        Expr::Neg(_) => 4,
        Expr::Pow(_, _) => 5,
        Expr::Mul(_, _) => 6,
        Expr::Div(_, _) => 7,
        Expr::Add(_, _) => 8,
        Expr::Sub(_, _) => 9,
    }
}

fn constant_index(c: &Constant) -> u8 {
    match c {
        Constant::Pi => 0,
        Constant::E => 1,
        Constant::Undefined => 2,
    }
}

fn operands(expr: &Expr) -> Option<[ExprId; 2]> {
    match expr {
        Expr::Add(l, r) | Expr::Sub(l, r) | Expr::Mul(l, r) | Expr::Div(l, r) | Expr::Pow(l, r) => {
            Some([*l, *r])
        }
        _ => None,
    }
}

fn compare_seq(ctx: &Context, xs: &[ExprId], ys: &[ExprId]) -> Ordering {
    xs.iter()
        .zip(ys)
        .map(|(x, y)| compare_expr(ctx, *x, *y))
        .find(|ord| ord.is_ne())
        .unwrap_or_else(|| xs.len().cmp(&ys.len()))
}

/// Total order used to place factors and terms canonically: numbers first,
/// compound nodes last.
///
/// Variables and calls compare by name, so the result does not depend on
/// the order names were interned in.
pub fn compare_expr(ctx: &Context, a: ExprId, b: ExprId) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }
    let (ea, eb) = (ctx.get(a), ctx.get(b));
    kind(ea).cmp(&kind(eb)).then_with(|| match (ea, eb) {
        (Expr::Number(x), Expr::Number(y)) => x.cmp(y),
        (Expr::Constant(x), Expr::Constant(y)) => constant_index(x).cmp(&constant_index(y)),
        (Expr::Variable(x), Expr::Variable(y)) => ctx.sym_name(*x).cmp(ctx.sym_name(*y)),
        (Expr::Function(f, xs), Expr::Function(g, ys)) => ctx
            .sym_name(*f)
            .cmp(ctx.sym_name(*g))
            .then_with(|| compare_seq(ctx, xs, ys)),
        (Expr::Neg(x), Expr::Neg(y)) => compare_expr(ctx, *x, *y),
        _ => match (operands(ea), operands(eb)) {
            (Some(l), Some(r)) => compare_seq(ctx, &l, &r),
            _ => Ordering::Equal,
        },
    })
}
