//! Symbolic integration.
//!
//! Covers linearity, constant multiples, and the elementary antiderivatives
//! under a linear substitution `u = a*x + b`. Anything else yields `None`.

use cas_ast::{BuiltinFn, Constant, Context, Expr, ExprId};
use cas_math::build::{div2_raw, mul2_raw};
use cas_math::expr_predicates::{contains_named_var, is_one_expr};
use num_rational::BigRational;

pub(crate) fn integrate(ctx: &mut Context, expr: ExprId, var: &str) -> Option<ExprId> {
    // Extract variant info in one borrow, then process with owned ExprId values.
    enum IntKind {
        Add(ExprId, ExprId),
        Sub(ExprId, ExprId),
        Neg(ExprId),
        Mul(ExprId, ExprId),
        Div(ExprId, ExprId),
        Pow(ExprId, ExprId),
        Variable,
        Function(BuiltinFn, ExprId),
        Other,
    }
    let kind = match ctx.get(expr) {
        Expr::Add(l, r) => IntKind::Add(*l, *r),
        Expr::Sub(l, r) => IntKind::Sub(*l, *r),
        Expr::Neg(e) => IntKind::Neg(*e),
        Expr::Mul(l, r) => IntKind::Mul(*l, *r),
        Expr::Div(n, d) => IntKind::Div(*n, *d),
        Expr::Pow(b, e) => IntKind::Pow(*b, *e),
        Expr::Variable(_) => IntKind::Variable,
        Expr::Function(f, args) if args.len() == 1 => match ctx.builtin_of(*f) {
            Some(b) => IntKind::Function(b, args[0]),
            None => IntKind::Other,
        },
        _ => IntKind::Other,
    };

    // Constant: integrate(c) = c*x
    if !contains_named_var(ctx, expr, var) {
        let var_expr = ctx.var(var);
        return Some(mul2_raw(ctx, expr, var_expr));
    }

    match kind {
        // Linearity
        IntKind::Add(l, r) => {
            let int_l = integrate(ctx, l, var)?;
            let int_r = integrate(ctx, r, var)?;
            Some(ctx.add(Expr::Add(int_l, int_r)))
        }
        IntKind::Sub(l, r) => {
            let int_l = integrate(ctx, l, var)?;
            let int_r = integrate(ctx, r, var)?;
            Some(ctx.add(Expr::Sub(int_l, int_r)))
        }
        IntKind::Neg(e) => {
            let int_e = integrate(ctx, e, var)?;
            Some(ctx.add(Expr::Neg(int_e)))
        }
        // Constant multiple: integrate(c * f(x)) = c * integrate(f(x))
        IntKind::Mul(l, r) => {
            if !contains_named_var(ctx, l, var) {
                let int_r = integrate(ctx, r, var)?;
                return Some(mul2_raw(ctx, l, int_r));
            }
            if !contains_named_var(ctx, r, var) {
                let int_l = integrate(ctx, l, var)?;
                return Some(mul2_raw(ctx, r, int_l));
            }
            None
        }
        IntKind::Div(num, den) => integrate_quotient(ctx, num, den, var),
        IntKind::Pow(base, exp) => integrate_power(ctx, expr, base, exp, var),
        // integrate(x) = x^2/2
        IntKind::Variable => {
            let var_expr = ctx.var(var);
            let two = ctx.num(2);
            let pow_expr = ctx.add(Expr::Pow(var_expr, two));
            Some(div2_raw(ctx, pow_expr, two))
        }
        IntKind::Function(f, arg) => integrate_function(ctx, f, arg, var),
        IntKind::Other => None,
    }
}

fn integrate_quotient(ctx: &mut Context, num: ExprId, den: ExprId, var: &str) -> Option<ExprId> {
    // f(x) / c
    if !contains_named_var(ctx, den, var) {
        let int_num = integrate(ctx, num, var)?;
        return Some(div2_raw(ctx, int_num, den));
    }
    if contains_named_var(ctx, num, var) {
        return None;
    }

    // c / (ax+b) = c * ln(ax+b) / a
    if let Some((a, _)) = get_linear_coeffs(ctx, den, var) {
        let ln_den = ctx.call_builtin(BuiltinFn::Ln, vec![den]);
        let scaled = mul2_raw(ctx, num, ln_den);
        return Some(div2_raw(ctx, scaled, a));
    }

    // c / u^n = c * u^(-n)
    if let Expr::Pow(base, exp) = ctx.get(den) {
        let (base, exp) = (*base, *exp);
        if contains_named_var(ctx, exp, var) {
            return None;
        }
        let neg_exp = ctx.add(Expr::Neg(exp));
        let pow_expr = ctx.add(Expr::Pow(base, neg_exp));
        let integral = integrate(ctx, pow_expr, var)?;
        return Some(mul2_raw(ctx, num, integral));
    }
    None
}

fn integrate_power(
    ctx: &mut Context,
    expr: ExprId,
    base: ExprId,
    exp: ExprId,
    var: &str,
) -> Option<ExprId> {
    // u^n with u = ax+b: u^(n+1) / (a*(n+1)), or ln(u)/a for n = -1
    if contains_named_var(ctx, base, var) && !contains_named_var(ctx, exp, var) {
        let (a, _) = get_linear_coeffs(ctx, base, var)?;

        let minus_one = BigRational::from_integer((-1).into());
        if ctx.as_number(exp) == Some(&minus_one) {
            let ln_u = ctx.call_builtin(BuiltinFn::Ln, vec![base]);
            return Some(div2_raw(ctx, ln_u, a));
        }

        let one = ctx.num(1);
        let new_exp = ctx.add(Expr::Add(exp, one));
        let new_denom = if is_one_expr(ctx, a) {
            new_exp
        } else {
            mul2_raw(ctx, a, new_exp)
        };
        let pow_expr = ctx.add(Expr::Pow(base, new_exp));
        return Some(div2_raw(ctx, pow_expr, new_denom));
    }

    // c^u with u = ax+b: c^u / (a * ln(c)), and e^u / a
    if !contains_named_var(ctx, base, var) {
        let (a, _) = get_linear_coeffs(ctx, exp, var)?;
        let is_e = matches!(ctx.get(base), Expr::Constant(Constant::E));
        let denom = if is_e {
            a
        } else {
            let ln_c = ctx.call_builtin(BuiltinFn::Ln, vec![base]);
            if is_one_expr(ctx, a) {
                ln_c
            } else {
                mul2_raw(ctx, a, ln_c)
            }
        };
        if is_one_expr(ctx, denom) {
            return Some(expr);
        }
        return Some(div2_raw(ctx, expr, denom));
    }
    None
}

fn integrate_function(ctx: &mut Context, f: BuiltinFn, u: ExprId, var: &str) -> Option<ExprId> {
    let (a, _) = get_linear_coeffs(ctx, u, var)?;

    let integral = match f {
        // -cos(u)
        BuiltinFn::Sin => {
            let cos_u = ctx.call_builtin(BuiltinFn::Cos, vec![u]);
            ctx.add(Expr::Neg(cos_u))
        }
        BuiltinFn::Cos => ctx.call_builtin(BuiltinFn::Sin, vec![u]),
        // -ln(cos(u))
        BuiltinFn::Tan => {
            let cos_u = ctx.call_builtin(BuiltinFn::Cos, vec![u]);
            let ln_cos = ctx.call_builtin(BuiltinFn::Ln, vec![cos_u]);
            ctx.add(Expr::Neg(ln_cos))
        }
        BuiltinFn::Sinh => ctx.call_builtin(BuiltinFn::Cosh, vec![u]),
        BuiltinFn::Cosh => ctx.call_builtin(BuiltinFn::Sinh, vec![u]),
        // u*ln(u) - u
        BuiltinFn::Ln => {
            let ln_u = ctx.call_builtin(BuiltinFn::Ln, vec![u]);
            let u_ln_u = mul2_raw(ctx, u, ln_u);
            ctx.add(Expr::Sub(u_ln_u, u))
        }
        // sqrt(u) = u^(1/2)
        BuiltinFn::Sqrt => {
            let half = ctx.rational(1, 2);
            let pow_expr = ctx.add(Expr::Pow(u, half));
            return integrate_power(ctx, pow_expr, u, half, var);
        }
        _ => return None,
    };

    if is_one_expr(ctx, a) {
        Some(integral)
    } else {
        Some(div2_raw(ctx, integral, a))
    }
}

/// Returns `(a, b)` such that `expr = a*var + b`, with `a` and `b` free of
/// `var`. The coefficients are not simplified.
pub(crate) fn get_linear_coeffs(
    ctx: &mut Context,
    expr: ExprId,
    var: &str,
) -> Option<(ExprId, ExprId)> {
    if !contains_named_var(ctx, expr, var) {
        return Some((ctx.num(0), expr));
    }

    match ctx.get(expr).clone() {
        Expr::Variable(_) => Some((ctx.num(1), ctx.num(0))),
        Expr::Mul(l, r) => {
            // c * u or u * c with u linear
            let (c, u) = if !contains_named_var(ctx, l, var) {
                (l, r)
            } else if !contains_named_var(ctx, r, var) {
                (r, l)
            } else {
                return None;
            };
            let (a, b) = get_linear_coeffs(ctx, u, var)?;
            Some((mul2_raw(ctx, c, a), mul2_raw(ctx, c, b)))
        }
        Expr::Div(n, d) if !contains_named_var(ctx, d, var) => {
            let (a, b) = get_linear_coeffs(ctx, n, var)?;
            Some((div2_raw(ctx, a, d), div2_raw(ctx, b, d)))
        }
        Expr::Neg(e) => {
            let (a, b) = get_linear_coeffs(ctx, e, var)?;
            Some((ctx.add(Expr::Neg(a)), ctx.add(Expr::Neg(b))))
        }
        Expr::Add(l, r) => {
            let (a1, b1) = get_linear_coeffs(ctx, l, var)?;
            let (a2, b2) = get_linear_coeffs(ctx, r, var)?;
            Some((ctx.add(Expr::Add(a1, a2)), ctx.add(Expr::Add(b1, b2))))
        }
        Expr::Sub(l, r) => {
            let (a1, b1) = get_linear_coeffs(ctx, l, var)?;
            let (a2, b2) = get_linear_coeffs(ctx, r, var)?;
            Some((ctx.add(Expr::Sub(a1, a2)), ctx.add(Expr::Sub(b1, b2))))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::simplify;
    use cas_ast::DisplayExpr;
    use cas_parser::parse;

    fn show(ctx: &Context, id: ExprId) -> String {
        DisplayExpr { context: ctx, id }.to_string()
    }

    #[test]
    fn test_integrate_constant() {
        let mut ctx = Context::new();
        let expr = parse("5", &mut ctx).unwrap();
        let r = integrate(&mut ctx, expr, "x").unwrap();
        assert_eq!(show(&ctx, r), "5 * x");
    }

    #[test]
    fn test_integrate_power_raw() {
        let mut ctx = Context::new();
        let expr = parse("x^2", &mut ctx).unwrap();
        let r = integrate(&mut ctx, expr, "x").unwrap();
        assert_eq!(show(&ctx, r), "x^(2 + 1) / (2 + 1)");
    }

    #[test]
    fn test_integrate_linear_subst_log() {
        let mut ctx = Context::new();
        let expr = parse("1/(3*x)", &mut ctx).unwrap();
        let r = integrate(&mut ctx, expr, "x").unwrap();
        let r = simplify(&mut ctx, r);
        assert_eq!(show(&ctx, r), "ln(3 * x) / 3");
    }

    #[test]
    fn test_integrate_ln() {
        let mut ctx = Context::new();
        let expr = parse("ln(x)", &mut ctx).unwrap();
        let r = integrate(&mut ctx, expr, "x").unwrap();
        let r = simplify(&mut ctx, r);
        assert_eq!(show(&ctx, r), "x * ln(x) - x");
    }

    #[test]
    fn test_integrate_inverse_square() {
        let mut ctx = Context::new();
        let expr = parse("1/x^2", &mut ctx).unwrap();
        let r = integrate(&mut ctx, expr, "x").unwrap();
        let r = simplify(&mut ctx, r);
        assert_eq!(show(&ctx, r), "-1 / x");
    }

    #[test]
    fn test_linear_coeffs() {
        let mut ctx = Context::new();
        let expr = parse("(3*x - 1)/2", &mut ctx).unwrap();
        let (a, b) = get_linear_coeffs(&mut ctx, expr, "x").unwrap();
        let a = simplify(&mut ctx, a);
        let b = simplify(&mut ctx, b);
        assert_eq!(show(&ctx, a), "3/2");
        assert_eq!(show(&ctx, b), "-1/2");

        let sq = parse("x^2", &mut ctx).unwrap();
        assert!(get_linear_coeffs(&mut ctx, sq, "x").is_none());
    }
}
