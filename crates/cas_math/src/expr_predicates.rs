//! Structural expression predicates.

use cas_ast::{Context, Expr, ExprId};
use num_traits::One;
use std::collections::BTreeSet;

/// Depth-first search for a node satisfying `pred`, without recursion.
fn any_node(ctx: &Context, root: ExprId, mut pred: impl FnMut(&Expr) -> bool) -> bool {
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        let node = ctx.get(id);
        if pred(node) {
            return true;
        }
        stack.extend(node.children());
    }
    false
}

pub fn contains_variable(ctx: &Context, root: ExprId) -> bool {
    any_node(ctx, root, |e| matches!(e, Expr::Variable(_)))
}

pub fn contains_named_var(ctx: &Context, root: ExprId, var: &str) -> bool {
    any_node(ctx, root, |e| match e {
        Expr::Variable(sym) => ctx.sym_name(*sym) == var,
        _ => false,
    })
}

/// Names of all free variables, sorted.
///
/// Function names are not variables: `sin(x)` yields only `x`.
pub fn free_variables(ctx: &Context, root: ExprId) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    any_node(ctx, root, |e| {
        if let Expr::Variable(sym) = e {
            found.insert(ctx.sym_name(*sym).to_string());
        }
        false
    });
    found
}

pub fn is_one_expr(ctx: &Context, id: ExprId) -> bool {
    ctx.as_number(id).is_some_and(|n| n.is_one())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cas_parser::parse;

    #[test]
    fn test_free_variables_skip_function_names() {
        let mut ctx = Context::new();
        let e = parse("sin(x) + a*y^2 + pi", &mut ctx).unwrap();
        let vars: Vec<String> = free_variables(&ctx, e).into_iter().collect();
        assert_eq!(vars, vec!["a", "x", "y"]);
    }

    #[test]
    fn test_contains_named_var() {
        let mut ctx = Context::new();
        let e = parse("3*t + 1", &mut ctx).unwrap();
        assert!(contains_named_var(&ctx, e, "t"));
        assert!(!contains_named_var(&ctx, e, "x"));
        assert!(contains_variable(&ctx, e));

        let c = parse("2*pi", &mut ctx).unwrap();
        assert!(!contains_variable(&ctx, c));
    }
}
