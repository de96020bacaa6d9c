//! Rational roots of integer-scaled polynomials (rational root theorem).
//!
//! Coefficient vectors are low-to-high: `[a0, a1, ..., an]`.

use crate::poly::horner_eval;
use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

/// Polynomials whose `±p/q` candidate list would exceed this are skipped.
pub const MAX_CANDIDATES: usize = 400;
/// Coefficients above this magnitude are not factored for divisors.
const MAX_FACTORED: u64 = 1_000_000_000;

/// Scale by the lcm of the denominators so every coefficient is an integer.
pub fn integer_coefficients(coeffs: &[BigRational]) -> Vec<BigInt> {
    let lcm = coeffs
        .iter()
        .filter(|c| !c.is_zero())
        .fold(BigInt::one(), |acc, c| acc.lcm(c.denom()));
    coeffs
        .iter()
        .map(|c| (c.numer() * &lcm) / c.denom())
        .collect()
}

fn divisors(n: &BigInt) -> Option<Vec<u64>> {
    let n = n.abs().to_u64().filter(|n| (1..=MAX_FACTORED).contains(n))?;
    let mut small = Vec::new();
    let mut large = Vec::new();
    let mut i = 1;
    while i * i <= n {
        if n % i == 0 {
            small.push(i);
            if i * i != n {
                large.push(n / i);
            }
        }
        i += 1;
    }
    small.extend(large.into_iter().rev());
    Some(small)
}

/// Candidates `±p/q` with `p | a0` and `q | an`, smallest magnitude first.
///
/// Empty when either end coefficient is zero or too large, or there would
/// be more than `limit` candidates.
pub fn candidates(ints: &[BigInt], limit: usize) -> Vec<BigRational> {
    let (Some(a0), Some(an)) = (ints.first(), ints.last()) else {
        return Vec::new();
    };
    let (Some(ps), Some(qs)) = (divisors(a0), divisors(an)) else {
        return Vec::new();
    };
    if 2 * ps.len() * qs.len() > limit {
        return Vec::new();
    }

    let mut out: Vec<BigRational> = ps
        .iter()
        .flat_map(|&p| qs.iter().map(move |&q| BigRational::new(p.into(), q.into())))
        .collect();
    out.sort();
    out.dedup();
    out.into_iter()
        .flat_map(|r| [r.clone(), -r])
        .collect()
}

/// Quotient of `coeffs / (x - root)`; the remainder is dropped.
pub fn deflate(coeffs: &[BigRational], root: &BigRational) -> Vec<BigRational> {
    let Some((lead, rest)) = coeffs.split_last() else {
        return Vec::new();
    };
    let mut quotient = Vec::with_capacity(rest.len());
    let mut carry = lead.clone();
    for c in rest.iter().rev() {
        quotient.push(carry.clone());
        carry = c + root * &carry;
    }
    quotient.reverse();
    quotient
}

/// Peel off rational roots (with multiplicity) until the remaining factor
/// has degree two or less, or no candidate is a root.
///
/// Returns the roots found and the remaining coefficients.
pub fn find_rational_roots(
    mut coeffs: Vec<BigRational>,
    limit: usize,
) -> (Vec<BigRational>, Vec<BigRational>) {
    let mut roots = Vec::new();

    let zeros = coeffs.iter().take_while(|c| c.is_zero()).count();
    let zeros = zeros.min(coeffs.len().saturating_sub(1));
    if zeros > 0 {
        coeffs.drain(..zeros);
        roots.extend(std::iter::repeat(BigRational::zero()).take(zeros));
    }

    while coeffs.len() > 3 {
        let ints = integer_coefficients(&coeffs);
        let found = candidates(&ints, limit)
            .into_iter()
            .find(|c| horner_eval(&coeffs, c).is_zero());
        let Some(root) = found else {
            break;
        };
        coeffs = deflate(&coeffs, &root);
        roots.push(root);
    }

    (roots, coeffs)
}
