//! Symbolic differentiation.
//!
//! Standard rules: constant, sum, product, quotient, power, chain. Results
//! are unsimplified; the caller runs the simplifier over them.

use crate::error::CalculusError;
use cas_ast::{BuiltinFn, Context, Expr, ExprId};
use cas_math::build::{div2_raw, mul2_raw, pow_int};
use cas_math::expr_predicates::contains_named_var;

pub(crate) fn differentiate(
    ctx: &mut Context,
    expr: ExprId,
    var: &str,
) -> Result<ExprId, CalculusError> {
    // Constant rule: diff(c, x) = 0
    if !contains_named_var(ctx, expr, var) {
        return Ok(ctx.num(0));
    }

    match ctx.get(expr).clone() {
        // Any variable reaching here is `var` itself.
        Expr::Variable(_) => Ok(ctx.num(1)),
        Expr::Add(l, r) => {
            let dl = differentiate(ctx, l, var)?;
            let dr = differentiate(ctx, r, var)?;
            Ok(ctx.add(Expr::Add(dl, dr)))
        }
        Expr::Sub(l, r) => {
            let dl = differentiate(ctx, l, var)?;
            let dr = differentiate(ctx, r, var)?;
            Ok(ctx.add(Expr::Sub(dl, dr)))
        }
        Expr::Neg(e) => {
            let de = differentiate(ctx, e, var)?;
            Ok(ctx.add(Expr::Neg(de)))
        }
        Expr::Mul(l, r) => {
            // (uv)' = u'v + uv'
            let dl = differentiate(ctx, l, var)?;
            let dr = differentiate(ctx, r, var)?;
            let term1 = mul2_raw(ctx, dl, r);
            let term2 = mul2_raw(ctx, l, dr);
            Ok(ctx.add(Expr::Add(term1, term2)))
        }
        Expr::Div(l, r) => {
            // (u/v)' = (u'v - uv') / v^2
            let dl = differentiate(ctx, l, var)?;
            let dr = differentiate(ctx, r, var)?;
            let term1 = mul2_raw(ctx, dl, r);
            let term2 = mul2_raw(ctx, l, dr);
            let num = ctx.add(Expr::Sub(term1, term2));
            let den = pow_int(ctx, r, 2);
            Ok(div2_raw(ctx, num, den))
        }
        Expr::Pow(base, exp) => {
            let db = differentiate(ctx, base, var)?;
            let de = differentiate(ctx, exp, var)?;

            if !contains_named_var(ctx, exp, var) {
                // n * u^(n-1) * u'
                let one = ctx.num(1);
                let n_minus_one = ctx.add(Expr::Sub(exp, one));
                let pow_term = ctx.add(Expr::Pow(base, n_minus_one));
                let term = mul2_raw(ctx, exp, pow_term);
                Ok(mul2_raw(ctx, term, db))
            } else if !contains_named_var(ctx, base, var) {
                // a^u * ln(a) * u'
                let ln_a = ctx.call_builtin(BuiltinFn::Ln, vec![base]);
                let term = mul2_raw(ctx, expr, ln_a);
                Ok(mul2_raw(ctx, term, de))
            } else {
                // u^v * (v' ln(u) + v u' / u)
                let ln_base = ctx.call_builtin(BuiltinFn::Ln, vec![base]);
                let term1 = mul2_raw(ctx, de, ln_base);
                let term2_num = mul2_raw(ctx, exp, db);
                let term2 = div2_raw(ctx, term2_num, base);
                let inner = ctx.add(Expr::Add(term1, term2));
                Ok(mul2_raw(ctx, expr, inner))
            }
        }
        Expr::Function(fn_id, args) => {
            let unsupported = || CalculusError::UnsupportedFunction(ctx.sym_name(fn_id).to_string());
            let (Some(builtin), [arg]) = (ctx.builtin_of(fn_id), args.as_slice()) else {
                return Err(unsupported());
            };
            let arg = *arg;
            let da = differentiate(ctx, arg, var)?;
            let outer = outer_derivative(ctx, builtin, arg, expr);
            Ok(mul2_raw(ctx, outer, da))
        }
        Expr::Number(_) | Expr::Constant(_) => Ok(ctx.num(0)),
    }
}

/// `f'(u)` for a builtin `f`, where `call` is `f(u)`.
fn outer_derivative(ctx: &mut Context, f: BuiltinFn, u: ExprId, call: ExprId) -> ExprId {
    let one = ctx.num(1);
    match f {
        BuiltinFn::Sin => ctx.call_builtin(BuiltinFn::Cos, vec![u]),
        BuiltinFn::Cos => {
            let sin_u = ctx.call_builtin(BuiltinFn::Sin, vec![u]);
            ctx.add(Expr::Neg(sin_u))
        }
        BuiltinFn::Tan => {
            // sec^2(u) = 1 / cos^2(u)
            let cos_u = ctx.call_builtin(BuiltinFn::Cos, vec![u]);
            let cos_sq = pow_int(ctx, cos_u, 2);
            div2_raw(ctx, one, cos_sq)
        }
        BuiltinFn::Asin | BuiltinFn::Acos => {
            // ±1 / sqrt(1 - u^2)
            let u_sq = pow_int(ctx, u, 2);
            let diff = ctx.add(Expr::Sub(one, u_sq));
            let root = ctx.call_builtin(BuiltinFn::Sqrt, vec![diff]);
            let d = div2_raw(ctx, one, root);
            if f == BuiltinFn::Acos {
                ctx.add(Expr::Neg(d))
            } else {
                d
            }
        }
        BuiltinFn::Atan => {
            let u_sq = pow_int(ctx, u, 2);
            let den = ctx.add(Expr::Add(one, u_sq));
            div2_raw(ctx, one, den)
        }
        BuiltinFn::Sinh => ctx.call_builtin(BuiltinFn::Cosh, vec![u]),
        BuiltinFn::Cosh => ctx.call_builtin(BuiltinFn::Sinh, vec![u]),
        BuiltinFn::Tanh => {
            let cosh_u = ctx.call_builtin(BuiltinFn::Cosh, vec![u]);
            let cosh_sq = pow_int(ctx, cosh_u, 2);
            div2_raw(ctx, one, cosh_sq)
        }
        BuiltinFn::Ln => div2_raw(ctx, one, u),
        BuiltinFn::Sqrt => {
            // 1 / (2 sqrt(u))
            let two = ctx.num(2);
            let den = mul2_raw(ctx, two, call);
            div2_raw(ctx, one, den)
        }
        // u / |u|
        BuiltinFn::Abs => div2_raw(ctx, u, call),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cas_ast::DisplayExpr;
    use cas_parser::parse;

    #[test]
    fn test_product_rule_is_unsimplified() {
        let mut ctx = Context::new();
        let e = parse("x*x", &mut ctx).unwrap();
        let d = differentiate(&mut ctx, e, "x").unwrap();
        assert_eq!(
            DisplayExpr { context: &ctx, id: d }.to_string(),
            "1 * x + x * 1"
        );
    }

    #[test]
    fn test_other_variable_is_constant() {
        let mut ctx = Context::new();
        let e = parse("y^2", &mut ctx).unwrap();
        let d = differentiate(&mut ctx, e, "x").unwrap();
        assert_eq!(d, ctx.num(0));
    }

    #[test]
    fn test_multi_arg_function_unsupported() {
        let mut ctx = Context::new();
        let x = ctx.var("x");
        let y = ctx.var("y");
        let e = ctx.call("atan2", vec![y, x]);
        assert_eq!(
            differentiate(&mut ctx, e, "x"),
            Err(CalculusError::UnsupportedFunction("atan2".to_string()))
        );
    }
}
