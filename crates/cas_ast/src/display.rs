//! Plain-text display for expressions.
//!
//! The output re-parses to the same tree, which is what chart legends and
//! error messages rely on.

use crate::{Constant, Context, Expr, ExprId};
use num_rational::BigRational;
use num_traits::Signed;
use std::fmt;

pub struct DisplayExpr<'a> {
    pub context: &'a Context,
    pub id: ExprId,
}

const PREC_SUM: u8 = 1;
const PREC_PRODUCT: u8 = 2;
const PREC_POWER: u8 = 3;
const PREC_ATOM: u8 = 5;

fn is_half(n: &BigRational) -> bool {
    *n.numer() == 1.into() && *n.denom() == 2.into()
}

pub(crate) fn precedence(ctx: &Context, id: ExprId) -> u8 {
    match ctx.get(id) {
        Expr::Add(_, _) | Expr::Sub(_, _) => PREC_SUM,
        Expr::Mul(_, _) | Expr::Div(_, _) | Expr::Neg(_) => PREC_PRODUCT,
        Expr::Pow(_, e) if ctx.as_number(*e).is_some_and(is_half) => PREC_ATOM,
        Expr::Pow(_, _) => PREC_POWER,
        Expr::Number(n) if n.is_negative() || !n.is_integer() => PREC_PRODUCT,
        Expr::Number(_) | Expr::Constant(_) | Expr::Variable(_) | Expr::Function(_, _) => {
            PREC_ATOM
        }
    }
}

impl<'a> DisplayExpr<'a> {
    fn child(&self, id: ExprId) -> DisplayExpr<'a> {
        DisplayExpr {
            context: self.context,
            id,
        }
    }

    fn write_operand(&self, f: &mut fmt::Formatter<'_>, id: ExprId, wrap: bool) -> fmt::Result {
        if wrap {
            write!(f, "({})", self.child(id))
        } else {
            write!(f, "{}", self.child(id))
        }
    }
}

impl<'a> fmt::Display for DisplayExpr<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ctx = self.context;
        let prec = |id| precedence(ctx, id);
        match ctx.get(self.id) {
            Expr::Number(n) => write!(f, "{}", n),
            Expr::Constant(c) => match c {
                Constant::Pi => write!(f, "pi"),
                Constant::E => write!(f, "e"),
                Constant::Undefined => write!(f, "undefined"),
            },
            Expr::Variable(sym) => write!(f, "{}", ctx.sym_name(*sym)),
            Expr::Add(l, r) => {
                self.write_operand(f, *l, prec(*l) < PREC_SUM)?;
                write!(f, " + ")?;
                self.write_operand(f, *r, prec(*r) < PREC_SUM)
            }
            Expr::Sub(l, r) => {
                self.write_operand(f, *l, prec(*l) < PREC_SUM)?;
                write!(f, " - ")?;
                // a - (b - c) keeps its parentheses
                self.write_operand(f, *r, prec(*r) <= PREC_SUM)
            }
            Expr::Mul(l, r) => {
                self.write_operand(f, *l, prec(*l) < PREC_PRODUCT)?;
                write!(f, " * ")?;
                self.write_operand(f, *r, prec(*r) < PREC_PRODUCT)
            }
            Expr::Div(l, r) => {
                self.write_operand(f, *l, prec(*l) < PREC_PRODUCT)?;
                write!(f, " / ")?;
                self.write_operand(f, *r, prec(*r) <= PREC_PRODUCT)
            }
            Expr::Pow(b, e) => {
                if ctx.as_number(*e).is_some_and(is_half) {
                    return write!(f, "sqrt({})", self.child(*b));
                }
                self.write_operand(f, *b, prec(*b) <= PREC_POWER)?;
                write!(f, "^")?;
                self.write_operand(f, *e, prec(*e) < PREC_POWER)
            }
            Expr::Neg(e) => {
                write!(f, "-")?;
                self.write_operand(f, *e, prec(*e) <= PREC_PRODUCT)
            }
            Expr::Function(name, args) => {
                write!(f, "{}(", ctx.sym_name(*name))?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", self.child(*arg))?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn show(ctx: &Context, id: ExprId) -> String {
        DisplayExpr { context: ctx, id }.to_string()
    }

    #[test]
    fn test_display() {
        let mut ctx = Context::new();
        let one = ctx.num(1);
        let x = ctx.var("x");
        let two = ctx.num(2);
        let mul = ctx.add(Expr::Mul(x, two));
        let e = ctx.add(Expr::Add(one, mul));
        assert_eq!(show(&ctx, e), "1 + x * 2");
    }

    #[test]
    fn test_power_of_sum() {
        let mut ctx = Context::new();
        let a = ctx.var("a");
        let b = ctx.var("b");
        let two = ctx.num(2);
        let sum = ctx.add(Expr::Add(a, b));
        let e = ctx.add(Expr::Pow(sum, two));
        assert_eq!(show(&ctx, e), "(a + b)^2");
    }

    #[test]
    fn test_sub_keeps_right_grouping() {
        let mut ctx = Context::new();
        let a = ctx.var("a");
        let b = ctx.var("b");
        let c = ctx.var("c");
        let inner = ctx.add(Expr::Sub(b, c));
        let e = ctx.add(Expr::Sub(a, inner));
        assert_eq!(show(&ctx, e), "a - (b - c)");
    }

    #[test]
    fn test_rational_exponent_and_sqrt() {
        let mut ctx = Context::new();
        let x = ctx.var("x");
        let third = ctx.rational(1, 3);
        let half = ctx.rational(1, 2);
        let cbrt = ctx.add(Expr::Pow(x, third));
        let sqrt = ctx.add(Expr::Pow(x, half));
        assert_eq!(show(&ctx, cbrt), "x^(1/3)");
        assert_eq!(show(&ctx, sqrt), "sqrt(x)");
    }

    #[test]
    fn test_negative_base() {
        let mut ctx = Context::new();
        let m2 = ctx.num(-2);
        let two = ctx.num(2);
        let e = ctx.add(Expr::Pow(m2, two));
        assert_eq!(show(&ctx, e), "(-2)^2");
    }

    #[test]
    fn test_function_args() {
        let mut ctx = Context::new();
        let x = ctx.var("x");
        let y = ctx.var("y");
        let e = ctx.call("atan2", vec![y, x]);
        assert_eq!(show(&ctx, e), "atan2(y, x)");
    }
}
