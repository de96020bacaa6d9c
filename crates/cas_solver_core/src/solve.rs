//! Solve `f(var) = 0` over the reals.

use crate::numeric_roots::{bracket_roots, recover_rational, SEARCH_MAX, SEARCH_MIN};
use crate::poly::{horner_eval_f64, poly_coefficients};
use crate::quadratic_formula::{Quadratic, QuadraticRoots};
use crate::rational_roots::{find_rational_roots, MAX_CANDIDATES};
use crate::solution_set::{Root, SolutionSet};
use cas_ast::{Context, Expr, ExprId};
use cas_engine::simplify;
use cas_math::numeric::{eval_at, eval_const, rational_to_f64, EvalError};
use num_rational::BigRational;
use num_traits::Zero;
use std::convert::Infallible;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// Real solutions of `f = 0` in `var`. `f` should already be simplified.
pub fn solve_univariate(
    ctx: &mut Context,
    f: ExprId,
    var: &str,
) -> Result<SolutionSet, SolveError> {
    if let Some(coeffs) = poly_coefficients(ctx, f, var) {
        debug!(degree = coeffs.len().saturating_sub(1), "polynomial equation");
        return Ok(solve_polynomial(ctx, coeffs));
    }

    debug!("no polynomial form, bracketing numerically");
    let sampler = |x: f64| eval_at(ctx, f, var, x);
    let approx = bracket_roots(&sampler, SEARCH_MIN, SEARCH_MAX)?;
    let mut exact = Vec::with_capacity(approx.len());
    for x in approx {
        exact.push((x, recover_rational(&sampler, x)?));
    }

    let roots = exact
        .into_iter()
        .map(|(x, r)| match r {
            Some(r) => Root::exact(ctx.add(Expr::Number(r.clone())), rational_to_f64(&r)),
            None => Root::approx(x),
        })
        .collect();
    Ok(SolutionSet::from_roots(roots))
}

/// Coefficients are low-to-high with a non-zero leading entry.
pub fn solve_polynomial(ctx: &mut Context, coeffs: Vec<BigRational>) -> SolutionSet {
    match coeffs.len() {
        0 => SolutionSet::AllReals,
        1 => SolutionSet::Empty,
        2 | 3 => SolutionSet::from_roots(solve_degree_leq_two(ctx, &coeffs)),
        _ => {
            let (rational, residual) = find_rational_roots(coeffs, MAX_CANDIDATES);
            let mut roots: Vec<Root> = rational.iter().map(|r| rational_root(ctx, r)).collect();
            if residual.len() <= 3 {
                roots.extend(solve_degree_leq_two(ctx, &residual));
            } else {
                let f = |x: f64| Ok::<f64, Infallible>(horner_eval_f64(&residual, x));
                let found = match bracket_roots(f, SEARCH_MIN, SEARCH_MAX) {
                    Ok(found) => found,
                    Err(never) => match never {},
                };
                roots.extend(found.into_iter().map(Root::approx));
            }
            SolutionSet::from_roots(roots)
        }
    }
}

fn rational_root(ctx: &mut Context, r: &BigRational) -> Root {
    Root::exact(ctx.add(Expr::Number(r.clone())), rational_to_f64(r))
}

/// Linear or quadratic roots, exact.
fn solve_degree_leq_two(ctx: &mut Context, coeffs: &[BigRational]) -> Vec<Root> {
    match coeffs {
        [b, a] if !a.is_zero() => vec![rational_root(ctx, &(-b / a))],
        [c, b, a] => {
            let Some(quad) = Quadratic::new(a.clone(), b.clone(), c.clone()) else {
                return vec![];
            };
            match quad.roots() {
                QuadraticRoots::None => vec![],
                QuadraticRoots::Rational(lo, hi) => {
                    vec![rational_root(ctx, &lo), rational_root(ctx, &hi)]
                }
                QuadraticRoots::Surd { delta } => quad
                    .surd_exprs(ctx, &delta)
                    .into_iter()
                    .map(|x| {
                        let x = simplify(ctx, x);
                        let approx = eval_const(ctx, x).unwrap_or(f64::NAN);
                        Root::exact(x, approx)
                    })
                    .collect(),
            }
        }
        _ => vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cas_ast::LaTeXExpr;
    use cas_parser::parse;

    fn solve_str(input: &str) -> (Context, SolutionSet) {
        let mut ctx = Context::new();
        let e = parse(input, &mut ctx).unwrap();
        let f = simplify(&mut ctx, e);
        let set = solve_univariate(&mut ctx, f, "x").unwrap();
        (ctx, set)
    }

    fn latex_roots(ctx: &Context, set: &SolutionSet) -> Vec<String> {
        set.roots()
            .iter()
            .map(|r| LaTeXExpr { context: ctx, id: r.exact.unwrap() }.to_latex())
            .collect()
    }

    #[test]
    fn test_linear() {
        let (ctx, set) = solve_str("2*x - 3");
        assert_eq!(latex_roots(&ctx, &set), vec!["\\frac{3}{2}"]);
    }

    #[test]
    fn test_quadratic_rational_roots_sorted() {
        let (ctx, set) = solve_str("x^2 - 4");
        assert_eq!(latex_roots(&ctx, &set), vec!["-2", "2"]);
    }

    #[test]
    fn test_quadratic_surd_roots() {
        let (ctx, set) = solve_str("x^2 - 2");
        assert_eq!(latex_roots(&ctx, &set), vec!["-\\sqrt{2}", "\\sqrt{2}"]);
        assert!((set.roots()[1].approx - std::f64::consts::SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn test_double_root_once() {
        let (_, set) = solve_str("x^2 - 2*x + 1");
        assert_eq!(set.roots().len(), 1);
        assert_eq!(set.roots()[0].approx, 1.0);
    }

    #[test]
    fn test_negative_discriminant_is_empty() {
        let (_, set) = solve_str("x^2 + 1");
        assert_eq!(set, SolutionSet::Empty);
    }

    #[test]
    fn test_degenerate_equations() {
        let (_, set) = solve_str("x - x");
        assert_eq!(set, SolutionSet::AllReals);
        let (_, set) = solve_str("x - x + 1");
        assert_eq!(set, SolutionSet::Empty);
    }

    #[test]
    fn test_cubic_by_rational_roots() {
        let (ctx, set) = solve_str("x^3 - 6*x^2 + 11*x - 6");
        assert_eq!(latex_roots(&ctx, &set), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_transcendental_numeric() {
        let (_, set) = solve_str("cos(x) - x");
        assert_eq!(set.roots().len(), 1);
        assert!(set.roots()[0].exact.is_none());
        assert!((set.roots()[0].approx - 0.739_085_133_215).abs() < 1e-9);
    }

    #[test]
    fn test_numeric_recovers_rational() {
        let (ctx, set) = solve_str("ln(2*x)");
        assert_eq!(latex_roots(&ctx, &set), vec!["\\frac{1}{2}"]);
    }

    #[test]
    fn test_unknown_function_errors() {
        let mut ctx = Context::new();
        let e = parse("gamma(x) - 1", &mut ctx).unwrap();
        assert!(matches!(
            solve_univariate(&mut ctx, e, "x"),
            Err(SolveError::Eval(EvalError::UnknownFunction { .. }))
        ));
    }
}
