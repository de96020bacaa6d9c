use crate::symbol::SymbolId;
use num_rational::BigRational;
use std::fmt;

/// Handle to a node stored in a [`Context`](crate::Context).
///
/// Ids are only meaningful for the context that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(u32);

impl ExprId {
    pub(crate) fn from_index(index: usize) -> Self {
        ExprId(index as u32)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constant {
    Pi,
    E,
    /// Result of a division by zero or another undefined operation.
    Undefined,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    /// Exact rational literal. Decimal input such as `8.2` is stored as `41/5`.
    Number(BigRational),
    Constant(Constant),
    Variable(SymbolId),
    Add(ExprId, ExprId),
    Sub(ExprId, ExprId),
    Mul(ExprId, ExprId),
    Div(ExprId, ExprId),
    Pow(ExprId, ExprId),
    Neg(ExprId),
    /// Function call; the name is interned in the context symbol table.
    Function(SymbolId, Vec<ExprId>),
}

impl Expr {
    /// Direct children in evaluation order.
    pub fn children(&self) -> Vec<ExprId> {
        match self {
            Expr::Number(_) | Expr::Constant(_) | Expr::Variable(_) => Vec::new(),
            Expr::Add(l, r)
            | Expr::Sub(l, r)
            | Expr::Mul(l, r)
            | Expr::Div(l, r)
            | Expr::Pow(l, r) => vec![*l, *r],
            Expr::Neg(e) => vec![*e],
            Expr::Function(_, args) => args.clone(),
        }
    }

    pub fn is_sum(&self) -> bool {
        matches!(self, Expr::Add(_, _) | Expr::Sub(_, _))
    }

    pub fn is_pow(&self) -> bool {
        matches!(self, Expr::Pow(_, _))
    }
}
