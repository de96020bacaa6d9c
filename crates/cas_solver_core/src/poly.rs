//! Polynomial coefficient extraction.

use cas_ast::{Context, Expr, ExprId};
use cas_math::expr_predicates::contains_named_var;
use num_rational::BigRational;
use num_traits::{Signed, ToPrimitive, Zero};

/// Highest degree treated as a polynomial.
pub const MAX_POLY_DEGREE: usize = 32;

/// Rational coefficients `[a0, a1, ..., an]` with
/// `expr = a0 + a1*var + ... + an*var^n` and `an != 0` (an empty vector for
/// the zero polynomial).
///
/// Returns `None` if `expr` is not a polynomial in `var` with rational
/// coefficients, or its degree exceeds [`MAX_POLY_DEGREE`].
pub fn poly_coefficients(ctx: &Context, expr: ExprId, var: &str) -> Option<Vec<BigRational>> {
    let mut coeffs: Vec<BigRational> = Vec::new();
    let mut stack: Vec<(ExprId, bool)> = vec![(expr, true)];

    while let Some((curr, positive)) = stack.pop() {
        match ctx.get(curr) {
            Expr::Add(l, r) => {
                stack.push((*r, positive));
                stack.push((*l, positive));
            }
            Expr::Sub(l, r) => {
                stack.push((*r, !positive));
                stack.push((*l, positive));
            }
            _ => {
                let (c, degree) = analyze_term(ctx, curr, var)?;
                if degree > MAX_POLY_DEGREE {
                    return None;
                }
                if coeffs.len() <= degree {
                    coeffs.resize(degree + 1, BigRational::zero());
                }
                if positive {
                    coeffs[degree] += c;
                } else {
                    coeffs[degree] -= c;
                }
            }
        }
    }

    while coeffs.last().is_some_and(|c| c.is_zero()) {
        coeffs.pop();
    }
    Some(coeffs)
}

/// A single term as `(coefficient, degree)`.
fn analyze_term(ctx: &Context, term: ExprId, var: &str) -> Option<(BigRational, usize)> {
    if !contains_named_var(ctx, term, var) {
        return Some((get_rational(ctx, term)?, 0));
    }

    match ctx.get(term) {
        Expr::Variable(_) => Some((BigRational::from_integer(1.into()), 1)),
        Expr::Pow(base, exp) => {
            let n = ctx.as_number(*exp)?;
            if !n.is_integer() || !n.is_positive() {
                return None;
            }
            let k = n.to_integer().to_usize()?;
            if k > MAX_POLY_DEGREE {
                return None;
            }
            // (c * x^d)^k
            let (c, d) = analyze_term(ctx, *base, var)?;
            let ck = (0..k).fold(BigRational::from_integer(1.into()), |acc, _| acc * &c);
            Some((ck, d.checked_mul(k)?))
        }
        Expr::Mul(l, r) => {
            let (c1, d1) = analyze_term(ctx, *l, var)?;
            let (c2, d2) = analyze_term(ctx, *r, var)?;
            Some((c1 * c2, d1 + d2))
        }
        Expr::Div(l, r) => {
            if contains_named_var(ctx, *r, var) {
                return None;
            }
            let den = get_rational(ctx, *r)?;
            if den.is_zero() {
                return None;
            }
            let (c, d) = analyze_term(ctx, *l, var)?;
            Some((c / den, d))
        }
        Expr::Neg(inner) => {
            let (c, d) = analyze_term(ctx, *inner, var)?;
            Some((-c, d))
        }
        _ => None,
    }
}

/// Try to extract a rational number from a numeric expression.
pub fn get_rational(ctx: &Context, expr: ExprId) -> Option<BigRational> {
    match ctx.get(expr) {
        Expr::Number(n) => Some(n.clone()),
        Expr::Neg(inner) => get_rational(ctx, *inner).map(|n| -n),
        Expr::Div(l, r) => {
            let ln = get_rational(ctx, *l)?;
            let rn = get_rational(ctx, *r)?;
            if rn.is_zero() {
                None
            } else {
                Some(ln / rn)
            }
        }
        Expr::Add(l, r) => Some(get_rational(ctx, *l)? + get_rational(ctx, *r)?),
        Expr::Sub(l, r) => Some(get_rational(ctx, *l)? - get_rational(ctx, *r)?),
        Expr::Mul(l, r) => Some(get_rational(ctx, *l)? * get_rational(ctx, *r)?),
        _ => None,
    }
}

/// Evaluate a polynomial at `x` using Horner's method.
pub fn horner_eval(coeffs: &[BigRational], x: &BigRational) -> BigRational {
    let mut result = BigRational::zero();
    for c in coeffs.iter().rev() {
        result = result * x + c;
    }
    result
}

pub fn horner_eval_f64(coeffs: &[BigRational], x: f64) -> f64 {
    coeffs
        .iter()
        .rev()
        .fold(0.0, |acc, c| acc * x + c.to_f64().unwrap_or(f64::NAN))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cas_parser::parse;

    fn coeffs_of(input: &str) -> Option<Vec<BigRational>> {
        let mut ctx = Context::new();
        let e = parse(input, &mut ctx).unwrap();
        let s = cas_engine::simplify(&mut ctx, e);
        poly_coefficients(&ctx, s, "x")
    }

    fn ints(v: &[i64]) -> Vec<BigRational> {
        v.iter().map(|&n| BigRational::from_integer(n.into())).collect()
    }

    #[test]
    fn test_quadratic_coefficients() {
        assert_eq!(coeffs_of("x^2 - 4"), Some(ints(&[-4, 0, 1])));
        assert_eq!(coeffs_of("(x - 1)*(x + 3)"), Some(ints(&[-3, 2, 1])));
    }

    #[test]
    fn test_rational_coefficients() {
        assert_eq!(
            coeffs_of("x/2 + 1"),
            Some(vec![
                BigRational::from_integer(1.into()),
                BigRational::new(1.into(), 2.into())
            ])
        );
    }

    #[test]
    fn test_not_polynomial() {
        assert_eq!(coeffs_of("sin(x) + 1"), None);
        assert_eq!(coeffs_of("1/x + 1"), None);
        assert_eq!(coeffs_of("pi*x"), None);
    }

    #[test]
    fn test_huge_degree_is_rejected_before_expansion() {
        assert_eq!(coeffs_of("x^999999999"), None);
        assert_eq!(coeffs_of("(2*x)^1000000000 + 1"), None);
        assert!(coeffs_of("(2*x)^32").is_some());
    }

    #[test]
    fn test_zero_polynomial() {
        assert_eq!(coeffs_of("x - x"), Some(vec![]));
    }

    #[test]
    fn test_horner() {
        let c = ints(&[-4, 0, 1]);
        assert_eq!(
            horner_eval(&c, &BigRational::from_integer(2.into())),
            BigRational::zero()
        );
        assert_eq!(horner_eval_f64(&c, 3.0), 5.0);
    }
}
