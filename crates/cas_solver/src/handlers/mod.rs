//! The six problem handlers. Each exposes `solve(&str) -> SolveOutcome`.

pub mod algebra;
pub mod calculus;
pub mod distance;
pub mod geometry;
pub mod physics;
pub mod spatial;

use cas_ast::{Context, ExprId};
use cas_engine::simplify;
use cas_math::build::pow2_raw;
use num_rational::BigRational;

/// `sqrt(radicand)` simplified to its exact normal form.
pub(crate) fn exact_sqrt(ctx: &mut Context, radicand: BigRational) -> ExprId {
    let base = ctx.number(radicand);
    let half = ctx.rational(1, 2);
    let raw = pow2_raw(ctx, base, half);
    simplify(ctx, raw)
}

/// Substituted operand text: negatives are parenthesized so `4-(-1)` reads right.
pub(crate) fn operand(text: &str) -> String {
    if text.starts_with('-') {
        format!("({})", text)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::latex;

    #[test]
    fn test_exact_sqrt_extracts_squares() {
        let mut ctx = Context::new();
        let five = exact_sqrt(&mut ctx, BigRational::from_integer(25.into()));
        assert_eq!(latex(&ctx, five), "5");
        let surd = exact_sqrt(&mut ctx, BigRational::from_integer(18.into()));
        assert_eq!(latex(&ctx, surd), "3\\cdot \\sqrt{2}");
    }

    #[test]
    fn test_operand_parenthesizes_negatives() {
        assert_eq!(operand("-1.5"), "(-1.5)");
        assert_eq!(operand("4"), "4");
    }
}
