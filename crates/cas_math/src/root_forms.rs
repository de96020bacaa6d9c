//! Integer and rational root extraction.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

/// Trial division stops at this divisor; larger cofactors are kept whole.
const TRIAL_LIMIT: u32 = 1_000_000;

/// `(prime, multiplicity)` pairs of `n > 0` up to [`TRIAL_LIMIT`], plus the
/// cofactor left unfactored (`1` when `n` factored completely).
fn trial_factor(mut n: BigInt) -> (Vec<(BigInt, u32)>, BigInt) {
    let mut factors = Vec::new();
    let mut p: u32 = 2;
    while p <= TRIAL_LIMIT && n.to_u64().map_or(true, |m| u64::from(p) * u64::from(p) <= m) {
        let mut mult = 0;
        while (&n % p).is_zero() {
            n /= p;
            mult += 1;
        }
        if mult > 0 {
            factors.push((BigInt::from(p), mult));
        }
        p += if p == 2 { 1 } else { 2 };
    }
    (factors, n)
}

/// Split `n` into `(outside, inside)` with `outside^k * inside == n`. `k`
/// must be at least 1.
///
/// Every `k`-th power of a prime below [`TRIAL_LIMIT`] moves outside, as
/// does a cofactor that is itself a perfect `k`-th power. Other large
/// cofactors stay inside. For negative `n`, odd `k` keeps the sign outside
/// and even `k` inside.
pub fn extract_root_factor(n: &BigInt, k: u32) -> (BigInt, BigInt) {
    if n.is_zero() {
        return (BigInt::zero(), BigInt::one());
    }
    let (factors, rest) = trial_factor(n.abs());
    let (mut outside, mut inside) = factors.into_iter().fold(
        (BigInt::one(), BigInt::one()),
        |(outside, inside), (p, mult)| (outside * p.pow(mult / k), inside * p.pow(mult % k)),
    );
    if !rest.is_one() {
        let root = rest.nth_root(k);
        if root.pow(k) == rest {
            outside *= root;
        } else {
            inside *= rest;
        }
    }
    if n.is_negative() {
        if k % 2 == 1 {
            outside = -outside;
        } else {
            inside = -inside;
        }
    }
    (outside, inside)
}

fn exact_isqrt(n: &BigInt) -> Option<BigInt> {
    let s = n.sqrt();
    (&s * &s == *n).then_some(s)
}

/// Exact square root of a non-negative rational, if it has one.
pub fn rational_sqrt_exact(r: &BigRational) -> Option<BigRational> {
    if r.is_negative() {
        return None;
    }
    Some(BigRational::new(exact_isqrt(r.numer())?, exact_isqrt(r.denom())?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn split(n: i64, k: u32) -> (i64, i64) {
        let (o, i) = extract_root_factor(&BigInt::from(n), k);
        (o.try_into().unwrap(), i.try_into().unwrap())
    }

    #[test]
    fn test_square_factors() {
        assert_eq!(split(18, 2), (3, 2));
        assert_eq!(split(9, 2), (3, 1));
        assert_eq!(split(72, 2), (6, 2));
        assert_eq!(split(7, 2), (1, 7));
    }

    #[test]
    fn test_cube_factors() {
        assert_eq!(split(54, 3), (3, 2));
        assert_eq!(split(-8, 3), (-2, 1));
    }

    #[test]
    fn test_even_root_keeps_sign_inside() {
        assert_eq!(split(-4, 2), (2, -1));
        assert_eq!(split(0, 2), (0, 1));
    }

    #[test]
    fn test_large_prime_radicand_is_bounded() {
        // 737250265^2 + 479875878^2, no factor below the trial limit
        let n: BigInt = "773818811528841109".parse().unwrap();
        let start = Instant::now();
        let (outside, inside) = extract_root_factor(&n, 2);
        assert!(start.elapsed() < Duration::from_secs(5));
        assert_eq!((outside, inside), (BigInt::one(), n));
    }

    #[test]
    fn test_square_of_large_prime_cofactor() {
        let p = BigInt::from(1_000_003u64);
        let n = &p * &p * 2;
        assert_eq!(extract_root_factor(&n, 2), (p, BigInt::from(2)));
    }

    #[test]
    fn test_rational_sqrt_exact() {
        let r = BigRational::new(9.into(), 4.into());
        assert_eq!(rational_sqrt_exact(&r), Some(BigRational::new(3.into(), 2.into())));
        assert_eq!(rational_sqrt_exact(&BigRational::from_integer(2.into())), None);
        assert_eq!(rational_sqrt_exact(&BigRational::from_integer((-4).into())), None);
    }
}
