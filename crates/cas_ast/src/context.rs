//! Hash-consed expression arena.

use crate::builtin::BuiltinFn;
use crate::expression::{Constant, Expr, ExprId};
use crate::symbol::{SymbolId, SymbolTable};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Signed;
use std::collections::HashMap;

/// Owns every expression node built while solving one problem.
///
/// `add` canonicalizes trivially (`Neg(Number(n))` becomes `Number(-n)`),
/// `add_raw` stores the node exactly as given. Both deduplicate, so building
/// the same tree twice yields the same [`ExprId`].
#[derive(Debug, Clone, Default)]
pub struct Context {
    nodes: Vec<Expr>,
    interned: HashMap<Expr, ExprId>,
    symbols: SymbolTable,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, expr: Expr) -> ExprId {
        let expr = match expr {
            Expr::Neg(inner) => match self.get(inner) {
                Expr::Number(n) => Expr::Number(-n.clone()),
                _ => Expr::Neg(inner),
            },
            other => other,
        };
        self.add_raw(expr)
    }

    pub fn add_raw(&mut self, expr: Expr) -> ExprId {
        if let Some(&id) = self.interned.get(&expr) {
            return id;
        }
        let id = ExprId::from_index(self.nodes.len());
        self.nodes.push(expr.clone());
        self.interned.insert(expr, id);
        id
    }

    /// # Panics
    /// Panics if `id` belongs to another context.
    #[inline]
    pub fn get(&self, id: ExprId) -> &Expr {
        &self.nodes[id.index()]
    }

    pub fn num(&mut self, n: i64) -> ExprId {
        self.add(Expr::Number(BigRational::from_integer(BigInt::from(n))))
    }

    pub fn rational(&mut self, numer: i64, denom: i64) -> ExprId {
        self.add(Expr::Number(BigRational::new(
            BigInt::from(numer),
            BigInt::from(denom),
        )))
    }

    pub fn number(&mut self, n: BigRational) -> ExprId {
        self.add(Expr::Number(n))
    }

    pub fn constant(&mut self, c: Constant) -> ExprId {
        self.add(Expr::Constant(c))
    }

    pub fn var(&mut self, name: &str) -> ExprId {
        let sym = self.symbols.intern(name);
        self.add(Expr::Variable(sym))
    }

    pub fn call(&mut self, name: &str, args: Vec<ExprId>) -> ExprId {
        let sym = self.symbols.intern(name);
        self.add(Expr::Function(sym, args))
    }

    pub fn call_builtin(&mut self, f: BuiltinFn, args: Vec<ExprId>) -> ExprId {
        self.call(f.name(), args)
    }

    pub fn intern_symbol(&mut self, name: &str) -> SymbolId {
        self.symbols.intern(name)
    }

    #[inline]
    pub fn sym_name(&self, sym: SymbolId) -> &str {
        self.symbols.resolve(sym)
    }

    pub fn builtin_of(&self, sym: SymbolId) -> Option<BuiltinFn> {
        BuiltinFn::from_name(self.sym_name(sym))
    }

    /// Rational value of a literal node, if it is one.
    pub fn as_number(&self, id: ExprId) -> Option<&BigRational> {
        match self.get(id) {
            Expr::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn is_number_negative(&self, id: ExprId) -> bool {
        self.as_number(id).is_some_and(|n| n.is_negative())
    }

    /// Number of distinct nodes stored so far.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_consing_shares_nodes() {
        let mut ctx = Context::new();
        let x1 = ctx.var("x");
        let x2 = ctx.var("x");
        assert_eq!(x1, x2);

        let two = ctx.num(2);
        let a = ctx.add(Expr::Pow(x1, two));
        let before = ctx.node_count();
        let b = ctx.add(Expr::Pow(x2, two));
        assert_eq!(a, b);
        assert_eq!(ctx.node_count(), before);
    }

    #[test]
    fn test_neg_number_is_folded() {
        let mut ctx = Context::new();
        let three = ctx.num(3);
        let neg = ctx.add(Expr::Neg(three));
        assert_eq!(neg, ctx.num(-3));

        let raw = ctx.add_raw(Expr::Neg(three));
        assert!(matches!(ctx.get(raw), Expr::Neg(_)));
    }

    #[test]
    fn test_builtin_lookup() {
        let mut ctx = Context::new();
        let x = ctx.var("x");
        let s = ctx.call_builtin(BuiltinFn::Sin, vec![x]);
        match ctx.get(s) {
            Expr::Function(sym, args) => {
                assert_eq!(ctx.builtin_of(*sym), Some(BuiltinFn::Sin));
                assert_eq!(args, &vec![x]);
            }
            other => panic!("expected function, got {:?}", other),
        }
    }
}
