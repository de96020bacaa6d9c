//! Numeric root finding by sign-change bracketing and bisection.

use num_rational::BigRational;
use num_traits::ToPrimitive;

/// Search window for equations without a closed-form solver.
pub const SEARCH_MIN: f64 = -10.0;
pub const SEARCH_MAX: f64 = 10.0;
const SAMPLES: usize = 2001;
const BISECTION_STEPS: usize = 200;
/// A bracketed sign change whose midpoint value exceeds this is a pole.
const POLE_THRESHOLD: f64 = 1e-6;
/// Largest denominator tried when recovering an exact rational root.
const MAX_RECOVERY_DENOM: i64 = 100;
const RECOVERY_TOLERANCE: f64 = 1e-12;

/// All sign changes of `f` over `[lo, hi]`, refined by bisection.
///
/// Samples where `f` is exactly zero are roots too. Brackets around poles
/// (`1/x` at 0) are rejected by checking the refined value.
pub fn bracket_roots<F>(f: F, lo: f64, hi: f64) -> Result<Vec<f64>, F::Error>
where
    F: Sampler,
{
    let step = (hi - lo) / (SAMPLES - 1) as f64;
    let mut roots = Vec::new();
    let mut prev: Option<(f64, f64)> = None;

    for i in 0..SAMPLES {
        let x = lo + step * i as f64;
        let y = f.at(x)?;
        if !y.is_finite() {
            prev = None;
            continue;
        }
        if y == 0.0 {
            roots.push(x);
        } else if let Some((px, py)) = prev {
            if py != 0.0 && py.signum() != y.signum() {
                let root = bisect(&f, px, x, py)?;
                if f.at(root)?.abs() <= POLE_THRESHOLD {
                    roots.push(root);
                }
            }
        }
        prev = Some((x, y));
    }
    Ok(roots)
}

fn bisect<F: Sampler>(f: &F, mut lo: f64, mut hi: f64, mut f_lo: f64) -> Result<f64, F::Error> {
    for _ in 0..BISECTION_STEPS {
        let mid = 0.5 * (lo + hi);
        if mid <= lo || mid >= hi {
            break;
        }
        let f_mid = f.at(mid)?;
        if f_mid == 0.0 {
            return Ok(mid);
        }
        if f_mid.signum() == f_lo.signum() {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }
    Ok(0.5 * (lo + hi))
}

/// The simplest rational `p/q` (q up to 100) near `x` where `f` vanishes.
pub fn recover_rational<F: Sampler>(f: &F, x: f64) -> Result<Option<BigRational>, F::Error> {
    for q in 1..=MAX_RECOVERY_DENOM {
        let p = (x * q as f64).round();
        let candidate = p / q as f64;
        if (candidate - x).abs() > 1e-6 {
            continue;
        }
        if f.at(candidate)?.abs() < RECOVERY_TOLERANCE {
            let Some(p) = p.to_i64() else {
                return Ok(None);
            };
            return Ok(Some(BigRational::new(p.into(), q.into())));
        }
    }
    Ok(None)
}

/// A real function sampled by the root finder.
pub trait Sampler {
    type Error;
    fn at(&self, x: f64) -> Result<f64, Self::Error>;
}

impl<F, E> Sampler for F
where
    F: Fn(f64) -> Result<f64, E>,
{
    type Error = E;

    fn at(&self, x: f64) -> Result<f64, E> {
        self(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    fn ok(f: fn(f64) -> f64) -> impl Fn(f64) -> Result<f64, Infallible> {
        move |x| Ok(f(x))
    }

    #[test]
    fn test_bracket_cosine_roots() {
        let roots = bracket_roots(ok(f64::cos), 0.0, 4.0).unwrap();
        assert_eq!(roots.len(), 1);
        assert!((roots[0] - std::f64::consts::FRAC_PI_2).abs() < 1e-10);
    }

    #[test]
    fn test_pole_is_not_a_root() {
        let roots = bracket_roots(ok(|x| 1.0 / (x - 0.5)), -1.0, 1.0).unwrap();
        assert!(roots.is_empty());
    }

    #[test]
    fn test_exact_zero_sample() {
        let roots = bracket_roots(ok(|x| x), SEARCH_MIN, SEARCH_MAX).unwrap();
        assert_eq!(roots, vec![0.0]);
    }

    #[test]
    fn test_recover_rational() {
        let f = ok(|x| 3.0 * x - 1.0);
        let r = recover_rational(&f, 0.333_333_333_3).unwrap();
        assert_eq!(r, Some(BigRational::new(1.into(), 3.into())));
        let g = ok(|x| x * x - 2.0);
        assert_eq!(recover_rational(&g, std::f64::consts::SQRT_2).unwrap(), None);
    }
}
