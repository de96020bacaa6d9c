//! LaTeX expression rendering for MathJax/KaTeX on the frontend.

use crate::latex_core::{render_constant, render_function, render_number, render_variable};
use crate::{Context, Expr, ExprId};
use num_traits::Signed;

/// Converts an expression to LaTeX format.
pub struct LaTeXExpr<'a> {
    pub context: &'a Context,
    pub id: ExprId,
}

impl<'a> LaTeXExpr<'a> {
    pub fn to_latex(&self) -> String {
        self.expr_to_latex(self.id, false)
    }

    fn expr_to_latex(&self, id: ExprId, parent_needs_parens: bool) -> String {
        let ctx = self.context;
        match ctx.get(id) {
            Expr::Number(n) => render_number(n),
            Expr::Constant(c) => render_constant(c),
            Expr::Variable(sym) => render_variable(ctx.sym_name(*sym)),
            Expr::Add(l, r) => {
                let left = self.expr_to_latex(*l, false);
                let out = match self.negated_term(*r) {
                    Some(positive) => format!("{} - {}", left, positive),
                    None => format!("{} + {}", left, self.expr_to_latex(*r, false)),
                };
                wrap(out, parent_needs_parens)
            }
            Expr::Sub(l, r) => {
                let left = self.expr_to_latex(*l, false);
                let right = self.expr_to_latex(*r, true);
                wrap(format!("{} - {}", left, right), parent_needs_parens)
            }
            Expr::Mul(l, r) => {
                // a leading negative coefficient reads as a sign: -3\cdot x
                let left = match ctx.as_number(*l) {
                    Some(n) if n.is_negative() => render_number(n),
                    _ => self.expr_to_latex_mul(*l),
                };
                let right = self.expr_to_latex_mul(*r);
                format!("{}\\cdot {}", left, right)
            }
            Expr::Div(l, r) => {
                let denom = self.expr_to_latex(*r, false);
                match ctx.get(*l) {
                    Expr::Neg(inner) => {
                        format!("-\\frac{{{}}}{{{}}}", self.expr_to_latex(*inner, false), denom)
                    }
                    Expr::Number(n) if n.is_negative() => {
                        format!("-\\frac{{{}}}{{{}}}", render_number(&-n), denom)
                    }
                    _ => format!("\\frac{{{}}}{{{}}}", self.expr_to_latex(*l, false), denom),
                }
            }
            Expr::Pow(base, exp) => {
                if let Some(e) = ctx.as_number(*exp) {
                    if *e.numer() == 1.into() && *e.denom() == 2.into() {
                        return format!("\\sqrt{{{}}}", self.expr_to_latex(*base, false));
                    }
                }
                let base_str = self.expr_to_latex_base(*base);
                let exp_str = self.expr_to_latex(*exp, false);
                format!("{{{}}}^{{{}}}", base_str, exp_str)
            }
            Expr::Neg(e) => {
                let inner = self.expr_to_latex(*e, true);
                format!("-{}", inner)
            }
            Expr::Function(name, args) => {
                let rendered: Vec<String> = args
                    .iter()
                    .map(|&arg| self.expr_to_latex(arg, false))
                    .collect();
                render_function(ctx.sym_name(*name), &rendered)
            }
        }
    }

    /// For a term that reads better as a subtraction, the LaTeX of its
    /// positive counterpart.
    fn negated_term(&self, id: ExprId) -> Option<String> {
        let ctx = self.context;
        match ctx.get(id) {
            Expr::Number(n) if n.is_negative() => Some(render_number(&-n)),
            Expr::Neg(inner) => Some(self.expr_to_latex(*inner, true)),
            Expr::Mul(l, r) => match ctx.as_number(*l) {
                Some(c) if c.is_negative() => {
                    let rest = self.expr_to_latex_mul(*r);
                    let positive = -c;
                    if positive == num_rational::BigRational::from_integer(1.into()) {
                        Some(rest)
                    } else {
                        Some(format!("{}\\cdot {}", render_number(&positive), rest))
                    }
                }
                _ => None,
            },
            _ => None,
        }
    }

    fn expr_to_latex_mul(&self, id: ExprId) -> String {
        match self.context.get(id) {
            Expr::Add(_, _) | Expr::Sub(_, _) => {
                format!("({})", self.expr_to_latex(id, false))
            }
            Expr::Number(n) if n.is_negative() => format!("({})", render_number(n)),
            _ => self.expr_to_latex(id, false),
        }
    }

    fn expr_to_latex_base(&self, id: ExprId) -> String {
        match self.context.get(id) {
            Expr::Add(_, _)
            | Expr::Sub(_, _)
            | Expr::Mul(_, _)
            | Expr::Div(_, _)
            | Expr::Pow(_, _)
            | Expr::Neg(_) => {
                format!("({})", self.expr_to_latex(id, false))
            }
            Expr::Number(n) if n.is_negative() || !n.is_integer() => {
                format!("({})", render_number(n))
            }
            _ => self.expr_to_latex(id, false),
        }
    }
}

fn wrap(s: String, parens: bool) -> String {
    if parens {
        format!("({})", s)
    } else {
        s
    }
}
