//! `a x^2 + b x + c = 0` with rational coefficients.

use cas_ast::{Context, Expr, ExprId};
use cas_math::build::pow2_raw;
use cas_math::root_forms::rational_sqrt_exact;
use num_rational::BigRational;
use num_traits::{Signed, Zero};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quadratic {
    pub a: BigRational,
    pub b: BigRational,
    pub c: BigRational,
}

/// Real roots of a quadratic, smaller first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuadraticRoots {
    None,
    Rational(BigRational, BigRational),
    /// `(-b ∓ sqrt(delta)) / 2a` with an irrational square root.
    Surd { delta: BigRational },
}

impl Quadratic {
    /// `None` when `a` is zero.
    pub fn new(a: BigRational, b: BigRational, c: BigRational) -> Option<Self> {
        (!a.is_zero()).then_some(Self { a, b, c })
    }

    pub fn discriminant(&self) -> BigRational {
        &self.b * &self.b - BigRational::from_integer(4.into()) * &self.a * &self.c
    }

    pub fn roots(&self) -> QuadraticRoots {
        let delta = self.discriminant();
        if delta.is_negative() {
            return QuadraticRoots::None;
        }
        match rational_sqrt_exact(&delta) {
            Some(root) => {
                let two_a = &self.a * BigRational::from_integer(2.into());
                let lo = (-&self.b - &root) / &two_a;
                let hi = (-&self.b + &root) / &two_a;
                if lo <= hi {
                    QuadraticRoots::Rational(lo, hi)
                } else {
                    QuadraticRoots::Rational(hi, lo)
                }
            }
            None => QuadraticRoots::Surd { delta },
        }
    }

    /// Both surd roots as unsimplified trees, `-` branch first.
    pub fn surd_exprs(&self, ctx: &mut Context, delta: &BigRational) -> [ExprId; 2] {
        let radicand = ctx.number(delta.clone());
        let half = ctx.rational(1, 2);
        let root = pow2_raw(ctx, radicand, half);
        let minus_b = ctx.number(-self.b.clone());
        let denom = ctx.number(&self.a * BigRational::from_integer(2.into()));
        [Expr::Sub(minus_b, root), Expr::Add(minus_b, root)].map(|numer| {
            let numer = ctx.add(numer);
            ctx.add(Expr::Div(numer, denom))
        })
    }
}
