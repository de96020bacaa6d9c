//! Sum-of-terms normal form.
//!
//! A [`Sum`] maps each monomial (a factor map `base -> rational exponent`)
//! to its rational coefficient. Bases are canonical `ExprId`s, so collecting
//! like terms and merging powers is map arithmetic. Positive integers only
//! appear as bases with an exponent in `(0, 1)`; integer parts are folded
//! into the coefficient.

use cas_ast::ordering::compare_expr;
use cas_ast::{BuiltinFn, Constant, Context, Expr, ExprId};
use cas_math::expr_predicates::contains_variable;
use cas_math::numeric::rational_powi;
use cas_math::root_forms::extract_root_factor;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::collections::{BTreeMap, HashMap};

pub(crate) type Factors = BTreeMap<ExprId, BigRational>;

/// Largest integer power of a multi-term sum that is expanded.
const MAX_EXPAND_POWER: u32 = 8;
/// Radicals with a larger index are kept as opaque powers.
const MAX_ROOT_INDEX: u32 = 64;
/// Integer powers of numbers beyond this magnitude are not folded.
const MAX_FOLD_EXPONENT: u64 = 4096;
/// Subtrees below this depth are kept as opaque atoms.
const MAX_NORMALIZE_DEPTH: usize = 512;
/// Folded numeric powers stay below this many bits.
const MAX_FOLD_BITS: u64 = 1 << 16;

/// Whether `base^n` is small enough to fold into an exact coefficient.
/// Powers of `0` and `±1` always are.
fn fold_fits(base: &BigRational, n: i64) -> bool {
    let bits = base.numer().bits().max(base.denom().bits());
    bits <= 1
        || (n.unsigned_abs() <= MAX_FOLD_EXPONENT
            && bits.saturating_mul(n.unsigned_abs()) <= MAX_FOLD_BITS)
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct Sum {
    terms: BTreeMap<Factors, BigRational>,
}

impl Sum {
    pub(crate) fn zero() -> Self {
        Self::default()
    }

    pub(crate) fn constant(c: BigRational) -> Self {
        let mut s = Self::zero();
        s.push(Factors::new(), c);
        s
    }

    pub(crate) fn atom(id: ExprId) -> Self {
        let mut f = Factors::new();
        f.insert(id, BigRational::one());
        let mut s = Self::zero();
        s.push(f, BigRational::one());
        s
    }

    fn push(&mut self, factors: Factors, coef: BigRational) {
        if coef.is_zero() {
            return;
        }
        let slot = self.terms.entry(factors).or_insert_with(BigRational::zero);
        *slot += coef;
        if slot.is_zero() {
            self.terms.retain(|_, c| !c.is_zero());
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.terms.len()
    }

    pub(crate) fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// The value of a sum with no symbolic part.
    pub(crate) fn as_constant(&self) -> Option<BigRational> {
        match self.terms.len() {
            0 => Some(BigRational::zero()),
            1 => self
                .terms
                .iter()
                .next()
                .filter(|(f, _)| f.is_empty())
                .map(|(_, c)| c.clone()),
            _ => None,
        }
    }

    pub(crate) fn single_term(&self) -> Option<(&Factors, &BigRational)> {
        if self.terms.len() == 1 {
            self.terms.iter().next()
        } else {
            None
        }
    }

    /// The atom of `coef * atom^1`, if that is all this sum is.
    pub(crate) fn as_atom(&self) -> Option<ExprId> {
        let (f, c) = self.single_term()?;
        if !c.is_one() || f.len() != 1 {
            return None;
        }
        f.iter().next().filter(|(_, e)| e.is_one()).map(|(b, _)| *b)
    }

    pub(crate) fn add(mut self, other: &Sum) -> Sum {
        for (f, c) in &other.terms {
            self.push(f.clone(), c.clone());
        }
        self
    }

    pub(crate) fn scale(mut self, k: &BigRational) -> Sum {
        if k.is_zero() {
            return Sum::zero();
        }
        for c in self.terms.values_mut() {
            *c *= k;
        }
        self
    }
}

/// Builds and rebuilds normal forms inside one `Context`.
pub(crate) struct Normalizer<'a> {
    pub(crate) ctx: &'a mut Context,
    expand_limit: usize,
    memo: HashMap<ExprId, Sum>,
    depth: usize,
}

impl<'a> Normalizer<'a> {
    pub(crate) fn new(ctx: &'a mut Context, expand_limit: usize) -> Self {
        Self {
            ctx,
            expand_limit,
            memo: HashMap::new(),
            depth: 0,
        }
    }

    pub(crate) fn normalize(&mut self, id: ExprId) -> Sum {
        if let Some(s) = self.memo.get(&id) {
            return s.clone();
        }
        let leaf = matches!(
            self.ctx.get(id),
            Expr::Number(_) | Expr::Constant(_) | Expr::Variable(_)
        );
        if self.depth >= MAX_NORMALIZE_DEPTH && !leaf {
            return Sum::atom(id);
        }
        self.depth += 1;
        let s = self.normalize_uncached(id);
        self.depth -= 1;
        self.memo.insert(id, s.clone());
        s
    }

    fn normalize_uncached(&mut self, id: ExprId) -> Sum {
        match self.ctx.get(id).clone() {
            Expr::Number(n) => Sum::constant(n),
            Expr::Constant(_) | Expr::Variable(_) => Sum::atom(id),
            Expr::Add(l, r) => {
                let a = self.normalize(l);
                let b = self.normalize(r);
                a.add(&b)
            }
            Expr::Sub(l, r) => {
                let a = self.normalize(l);
                let b = self.normalize(r).scale(&-BigRational::one());
                a.add(&b)
            }
            Expr::Neg(e) => self.normalize(e).scale(&-BigRational::one()),
            Expr::Mul(l, r) => {
                let a = self.normalize(l);
                let b = self.normalize(r);
                self.mul(&a, &b)
            }
            Expr::Div(l, r) => {
                let a = self.normalize(l);
                let b = self.normalize(r);
                let inv = self.pow(&b, &Sum::constant(-BigRational::one()));
                self.mul(&a, &inv)
            }
            Expr::Pow(b, e) => {
                let base = self.normalize(b);
                let exp = self.normalize(e);
                self.pow(&base, &exp)
            }
            Expr::Function(name, args) => {
                let args: Vec<ExprId> = args
                    .iter()
                    .map(|a| {
                        let s = self.normalize(*a);
                        self.rebuild(&s)
                    })
                    .collect();
                self.function(name, args)
            }
        }
    }

    fn function(&mut self, name: cas_ast::SymbolId, args: Vec<ExprId>) -> Sum {
        let builtin = self.ctx.builtin_of(name);
        if let (Some(b), 1) = (builtin, args.len()) {
            let arg = args[0];
            if b == BuiltinFn::Sqrt {
                let s = self.normalize(arg);
                let half = Sum::constant(BigRational::new(1.into(), 2.into()));
                return self.pow(&s, &half);
            }
            if let Some(v) = self.special_value(b, arg) {
                return v;
            }
            let call = self.ctx.call_builtin(b, args);
            return Sum::atom(call);
        }
        let call = self.ctx.add(Expr::Function(name, args));
        Sum::atom(call)
    }

    /// Exact values at the points where the result is a rational or a
    /// simpler expression.
    fn special_value(&mut self, f: BuiltinFn, arg: ExprId) -> Option<Sum> {
        use BuiltinFn::*;
        let int = |n: i64| Some(Sum::constant(BigRational::from_integer(n.into())));
        match self.ctx.get(arg).clone() {
            Expr::Number(n) if n.is_zero() => match f {
                Sin | Tan | Sinh | Tanh | Asin | Atan | Abs => int(0),
                Cos | Cosh => int(1),
                _ => None,
            },
            Expr::Number(n) if n.is_one() => match f {
                Ln | Acos => int(0),
                Abs => int(1),
                _ => None,
            },
            Expr::Number(n) if f == Abs => Some(Sum::constant(n.abs())),
            Expr::Constant(Constant::E) if f == Ln => int(1),
            Expr::Constant(Constant::Pi) => match f {
                Sin | Tan => int(0),
                Cos => int(-1),
                _ => None,
            },
            Expr::Pow(b, e) if f == Ln && matches!(self.ctx.get(b), Expr::Constant(Constant::E)) => {
                Some(self.normalize(e))
            }
            _ => None,
        }
    }

    pub(crate) fn mul(&mut self, a: &Sum, b: &Sum) -> Sum {
        if a.is_zero() || b.is_zero() {
            return Sum::zero();
        }
        match (a.len(), b.len()) {
            (1, 1) => self.mul_distribute(a, b),
            (1, _) if has_symbolic_denominator(self.ctx, a) => {
                let atom = self.atomize(b);
                self.mul_distribute(a, &atom)
            }
            (_, 1) if has_symbolic_denominator(self.ctx, b) => {
                let atom = self.atomize(a);
                self.mul_distribute(&atom, b)
            }
            (n, m) if n.saturating_mul(m) <= self.expand_limit => self.mul_distribute(a, b),
            _ => {
                let a = self.atomize(a);
                let b = self.atomize(b);
                self.mul_distribute(&a, &b)
            }
        }
    }

    fn mul_distribute(&mut self, a: &Sum, b: &Sum) -> Sum {
        let mut out = Sum::zero();
        for (fa, ca) in &a.terms {
            for (fb, cb) in &b.terms {
                let mut f = fa.clone();
                for (base, e) in fb {
                    *f.entry(*base).or_insert_with(BigRational::zero) += e;
                }
                let (c, f) = self.normalize_term(ca * cb, f);
                out.push(f, c);
            }
        }
        out
    }

    /// A multi-term sum as a single opaque factor.
    fn atomize(&mut self, s: &Sum) -> Sum {
        if s.len() <= 1 {
            return s.clone();
        }
        let id = self.rebuild(s);
        Sum::atom(id)
    }

    pub(crate) fn pow(&mut self, base: &Sum, exp: &Sum) -> Sum {
        let Some(q) = exp.as_constant() else {
            return self.pow_symbolic(base, exp);
        };
        if q.is_zero() {
            return Sum::constant(BigRational::one());
        }
        if base.is_zero() {
            if q.is_positive() {
                return Sum::zero();
            }
            return Sum::atom(self.ctx.constant(Constant::Undefined));
        }
        if let Some((f, c)) = base.single_term() {
            let (f, c) = (f.clone(), c.clone());
            return self.pow_term(c, f, &q);
        }
        if q.is_integer() && q.is_positive() {
            if let Some(n) = q.to_integer().to_u32() {
                let fits = (base.len() as u128)
                    .checked_pow(n)
                    .is_some_and(|size| size <= self.expand_limit as u128);
                if n <= MAX_EXPAND_POWER && fits {
                    let mut acc = base.clone();
                    for _ in 1..n {
                        acc = self.mul_distribute(&acc, base);
                    }
                    return acc;
                }
            }
        }
        let b = self.rebuild(base);
        let mut f = Factors::new();
        f.insert(b, q);
        let (c, f) = self.normalize_term(BigRational::one(), f);
        let mut out = Sum::zero();
        out.push(f, c);
        out
    }

    fn pow_symbolic(&mut self, base: &Sum, exp: &Sum) -> Sum {
        // e^(ln u) = u
        if let (Some(b), Some(e)) = (base.as_atom(), exp.as_atom()) {
            if matches!(self.ctx.get(b), Expr::Constant(Constant::E)) {
                if let Expr::Function(name, args) = self.ctx.get(e) {
                    if self.ctx.builtin_of(*name) == Some(BuiltinFn::Ln) && args.len() == 1 {
                        let u = args[0];
                        return self.normalize(u);
                    }
                }
            }
        }
        let b = self.rebuild(base);
        let e = self.rebuild(exp);
        let p = self.ctx.add(Expr::Pow(b, e));
        Sum::atom(p)
    }

    fn pow_term(&mut self, coef: BigRational, factors: Factors, q: &BigRational) -> Sum {
        let mut out = Sum::zero();

        if q.is_integer() {
            let Some(n) = q.to_integer().to_i64().filter(|n| fold_fits(&coef, *n)) else {
                return self.opaque_power(coef, factors, q);
            };
            let Some(c) = rational_powi(&coef, n) else {
                return Sum::atom(self.ctx.constant(Constant::Undefined));
            };
            let f = factors.into_iter().map(|(b, e)| (b, e * q)).collect();
            let (c, f) = self.normalize_term(c, f);
            out.push(f, c);
            return out;
        }

        // Fractional powers: (x^2)^(1/2) is |x|, not x, so even powers of
        // symbolic bases stay under the radical.
        let two = BigRational::from_integer(2.into());
        let is_even = |r: &BigRational| r.is_integer() && (r / &two).is_integer();
        let unsafe_factor = factors.iter().any(|(b, e)| {
            let positive_base = matches!(self.ctx.get(*b), Expr::Number(_) | Expr::Constant(_));
            !positive_base && is_even(e) && !is_even(&(e * q))
        });
        if coef.is_negative() || unsafe_factor {
            return self.opaque_power(coef, factors, q);
        }

        let mut f: Factors = factors.into_iter().map(|(b, e)| (b, e * q)).collect();
        for (part, sign) in [(coef.numer().clone(), 1), (coef.denom().clone(), -1)] {
            if !part.is_one() {
                let id = self.ctx.add(Expr::Number(BigRational::from_integer(part)));
                let e = if sign > 0 { q.clone() } else { -q.clone() };
                *f.entry(id).or_insert_with(BigRational::zero) += e;
            }
        }
        let (c, f) = self.normalize_term(BigRational::one(), f);
        out.push(f, c);
        out
    }

    fn opaque_power(&mut self, coef: BigRational, factors: Factors, q: &BigRational) -> Sum {
        let mut term = Sum::zero();
        term.push(factors, coef);
        let b = self.rebuild(&term);
        let e = self.ctx.add(Expr::Number(q.clone()));
        let p = self.ctx.add(Expr::Pow(b, e));
        Sum::atom(p)
    }

    /// Fold integer parts of numeric powers into the coefficient, merge
    /// radicals with equal exponents and pull perfect powers out of them.
    fn normalize_term(&mut self, mut coef: BigRational, factors: Factors) -> (BigRational, Factors) {
        let mut out = Factors::new();
        let mut radicals: BTreeMap<BigRational, BigInt> = BTreeMap::new();

        for (base, exp) in factors {
            if exp.is_zero() {
                continue;
            }
            let numeric = match self.ctx.get(base) {
                Expr::Number(n) if n.is_integer() && n.is_positive() => Some(n.to_integer()),
                _ => None,
            };
            match numeric {
                Some(n) if n.is_one() => {}
                Some(n) => {
                    let whole = exp.floor();
                    let nr = BigRational::from_integer(n.clone());
                    let k = whole.to_integer().to_i64().filter(|k| fold_fits(&nr, *k));
                    let root_index = exp.denom().to_u32().filter(|d| *d <= MAX_ROOT_INDEX);
                    match (k, root_index) {
                        (Some(k), Some(_)) => {
                            if let Some(p) = rational_powi(&nr, k) {
                                coef *= p;
                            }
                            let frac = &exp - &whole;
                            if !frac.is_zero() {
                                *radicals.entry(frac).or_insert_with(BigInt::one) *= n;
                            }
                        }
                        _ => {
                            *out.entry(base).or_insert_with(BigRational::zero) += exp;
                        }
                    }
                }
                None => {
                    *out.entry(base).or_insert_with(BigRational::zero) += exp;
                }
            }
        }

        for (frac, n) in radicals {
            // n^(p/q) = (n^p)^(1/q), 0 < p < q
            let (Some(p), Some(q)) = (frac.numer().to_u32(), frac.denom().to_u32()) else {
                continue;
            };
            let (outside, inside) = extract_root_factor(&n.pow(p), q);
            coef *= BigRational::from_integer(outside);
            if !inside.is_one() {
                let id = self.ctx.add(Expr::Number(BigRational::from_integer(inside)));
                let e = BigRational::new(BigInt::one(), BigInt::from(q));
                *out.entry(id).or_insert_with(BigRational::zero) += e;
            }
        }

        out.retain(|_, e| !e.is_zero());
        (coef, out)
    }

    /// Turn a normal form back into an expression tree.
    ///
    /// Terms are ordered by descending degree with pure constants last;
    /// negative terms after the first become subtractions.
    pub(crate) fn rebuild(&mut self, s: &Sum) -> ExprId {
        let mut parts: Vec<(ExprId, bool, BigRational, bool)> = Vec::with_capacity(s.len());
        for (f, c) in &s.terms {
            let positive = self.rebuild_term(f, &c.abs());
            let degree = self.degree(f);
            parts.push((positive, c.is_negative(), degree, f.is_empty()));
        }

        let ctx = &*self.ctx;
        parts.sort_by(|a, b| {
            b.2.cmp(&a.2)
                .then(a.3.cmp(&b.3))
                .then_with(|| compare_expr(ctx, a.0, b.0))
        });

        let mut acc: Option<ExprId> = None;
        for (term, negative, _, _) in parts {
            acc = Some(match (acc, negative) {
                (None, false) => term,
                (None, true) => self.negate_leading(term),
                (Some(prev), false) => self.ctx.add(Expr::Add(prev, term)),
                (Some(prev), true) => self.ctx.add(Expr::Sub(prev, term)),
            });
        }
        acc.unwrap_or_else(|| self.ctx.num(0))
    }

    fn degree(&self, f: &Factors) -> BigRational {
        f.iter()
            .filter(|(b, _)| contains_variable(self.ctx, **b))
            .fold(BigRational::zero(), |acc, (_, e)| acc + e)
    }

    fn rebuild_term(&mut self, f: &Factors, coef: &BigRational) -> ExprId {
        // A bare rational constant stays a single number node.
        if f.is_empty() {
            return self.ctx.add(Expr::Number(coef.clone()));
        }

        let mut num_factors: Vec<(ExprId, BigRational)> = Vec::new();
        let mut den_factors: Vec<(ExprId, BigRational)> = Vec::new();
        for (b, e) in f {
            if e.is_negative() {
                den_factors.push((*b, -e.clone()));
            } else {
                num_factors.push((*b, e.clone()));
            }
        }
        let ctx = &*self.ctx;
        num_factors.sort_by(|a, b| compare_expr(ctx, a.0, b.0));
        den_factors.sort_by(|a, b| compare_expr(ctx, a.0, b.0));

        let mut numer: Vec<ExprId> = Vec::new();
        if !coef.numer().is_one() {
            numer.push(self.ctx.add(Expr::Number(BigRational::from_integer(coef.numer().clone()))));
        }
        for (b, e) in num_factors {
            numer.push(self.power(b, e));
        }

        let mut denom: Vec<ExprId> = Vec::new();
        if !coef.denom().is_one() {
            denom.push(self.ctx.add(Expr::Number(BigRational::from_integer(coef.denom().clone()))));
        }
        for (b, e) in den_factors {
            denom.push(self.power(b, e));
        }

        let n = self.product(&numer);
        if denom.is_empty() {
            n
        } else {
            let d = self.product(&denom);
            self.ctx.add(Expr::Div(n, d))
        }
    }

    fn power(&mut self, base: ExprId, e: BigRational) -> ExprId {
        if e.is_one() {
            return base;
        }
        let e = self.ctx.add(Expr::Number(e));
        self.ctx.add(Expr::Pow(base, e))
    }

    fn product(&mut self, items: &[ExprId]) -> ExprId {
        match items.split_first() {
            None => self.ctx.num(1),
            Some((&first, rest)) => rest
                .iter()
                .fold(first, |acc, &x| self.ctx.add(Expr::Mul(acc, x))),
        }
    }

    /// Put the sign of a leading negative term on its first factor:
    /// `-3 * x`, `-x * y`, `-x / 2`.
    fn negate_leading(&mut self, term: ExprId) -> ExprId {
        match self.ctx.get(term).clone() {
            Expr::Number(n) => self.ctx.add(Expr::Number(-n)),
            Expr::Div(n, d) => {
                let n = self.negate_leading(n);
                self.ctx.add(Expr::Div(n, d))
            }
            Expr::Mul(l, r) => {
                let l = self.negate_leading(l);
                self.ctx.add(Expr::Mul(l, r))
            }
            _ => self.ctx.add(Expr::Neg(term)),
        }
    }
}

/// Whether a single-term sum divides by something symbolic.
fn has_symbolic_denominator(ctx: &Context, s: &Sum) -> bool {
    s.single_term().is_some_and(|(f, _)| {
        f.iter()
            .any(|(b, e)| e.is_negative() && !matches!(ctx.get(*b), Expr::Number(_)))
    })
}
