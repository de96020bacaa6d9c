//! Symbolic calculus: derivatives and antiderivatives.
//!
//! - `differentiation`: derivative rules (sum, product, quotient, power, chain)
//! - `integration`: antiderivatives by linearity and linear substitution
//!
//! Both entry points simplify the input before applying rules and simplify
//! the result afterwards.

mod differentiation;
mod integration;

use crate::engine::simplify;
use crate::error::CalculusError;
use cas_ast::{Context, DisplayExpr, ExprId};
use tracing::debug;

/// `d/d var` of `expr`, simplified.
pub fn derivative(ctx: &mut Context, expr: ExprId, var: &str) -> Result<ExprId, CalculusError> {
    let input = simplify(ctx, expr);
    let raw = differentiation::differentiate(ctx, input, var)?;
    let result = simplify(ctx, raw);
    debug!(
        input = %DisplayExpr { context: ctx, id: input },
        result = %DisplayExpr { context: ctx, id: result },
        var,
        "derivative"
    );
    Ok(result)
}

/// An antiderivative of `expr` with respect to `var`, simplified, without
/// the constant of integration.
pub fn antiderivative(
    ctx: &mut Context,
    expr: ExprId,
    var: &str,
) -> Result<ExprId, CalculusError> {
    let input = simplify(ctx, expr);
    let Some(raw) = integration::integrate(ctx, input, var) else {
        let shown = DisplayExpr {
            context: ctx,
            id: input,
        }
        .to_string();
        debug!(integrand = %shown, var, "no closed form");
        return Err(CalculusError::NoClosedForm(shown));
    };
    let result = simplify(ctx, raw);
    debug!(
        input = %DisplayExpr { context: ctx, id: input },
        result = %DisplayExpr { context: ctx, id: result },
        var,
        "antiderivative"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cas_ast::LaTeXExpr;
    use cas_parser::parse;

    fn d(input: &str) -> String {
        let mut ctx = Context::new();
        let e = parse(input, &mut ctx).unwrap();
        let r = derivative(&mut ctx, e, "x").unwrap();
        DisplayExpr { context: &ctx, id: r }.to_string()
    }

    fn i(input: &str) -> String {
        let mut ctx = Context::new();
        let e = parse(input, &mut ctx).unwrap();
        let r = antiderivative(&mut ctx, e, "x").unwrap();
        DisplayExpr { context: &ctx, id: r }.to_string()
    }

    #[test]
    fn test_derivative_polynomial() {
        assert_eq!(d("x^3 + 2*x"), "3 * x^2 + 2");
        assert_eq!(d("5"), "0");
    }

    #[test]
    fn test_derivative_chain_rule() {
        assert_eq!(d("sin(x^2)"), "2 * x * cos(x^2)");
        assert_eq!(d("e^(2*x)"), "2 * e^(2 * x)");
    }

    #[test]
    fn test_derivative_ln_and_sqrt() {
        assert_eq!(d("ln(x)"), "1 / x");
        assert_eq!(d("sqrt(x)"), "1 / (2 * sqrt(x))");
    }

    #[test]
    fn test_derivative_latex() {
        let mut ctx = Context::new();
        let e = parse("x^2", &mut ctx).unwrap();
        let r = derivative(&mut ctx, e, "x").unwrap();
        assert_eq!(LaTeXExpr { context: &ctx, id: r }.to_latex(), "2\\cdot x");
    }

    #[test]
    fn test_derivative_unknown_function() {
        let mut ctx = Context::new();
        let e = parse("gamma(x)", &mut ctx).unwrap();
        assert_eq!(
            derivative(&mut ctx, e, "x"),
            Err(CalculusError::UnsupportedFunction("gamma".to_string()))
        );
    }

    #[test]
    fn test_antiderivative_power_rule() {
        assert_eq!(i("x^2"), "x^3 / 3");
        assert_eq!(i("3*x^2 + 1"), "x^3 + x");
        assert_eq!(i("1/x"), "ln(x)");
    }

    #[test]
    fn test_antiderivative_linear_substitution() {
        assert_eq!(i("cos(2*x)"), "sin(2 * x) / 2");
        assert_eq!(i("e^(3*x)"), "e^(3 * x) / 3");
        assert_eq!(i("sin(x)"), "-cos(x)");
    }

    #[test]
    fn test_antiderivative_no_closed_form() {
        let mut ctx = Context::new();
        let e = parse("x*sin(x)", &mut ctx).unwrap();
        assert!(matches!(
            antiderivative(&mut ctx, e, "x"),
            Err(CalculusError::NoClosedForm(_))
        ));
    }
}
