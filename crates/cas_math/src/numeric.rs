//! Numeric evaluation of expressions using f64 values.
//!
//! Domain problems (`ln(-1)`, `sqrt(-1)`, poles) are not errors: they
//! evaluate to NaN or ±∞ and chart sampling turns them into gaps.

use cas_ast::{Constant, Context, Expr, ExprId};
use num_rational::BigRational;
use num_traits::{ToPrimitive, Zero};
use std::collections::HashMap;
use thiserror::Error;

const MAX_DEPTH: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("cannot evaluate: unbound symbol '{name}'")]
    UnboundVariable { name: String },
    #[error("cannot evaluate: unknown function '{name}'")]
    UnknownFunction { name: String },
    #[error("cannot evaluate: expression nested too deeply")]
    DepthExceeded,
}

/// Try to extract an i64 value from an integer literal.
#[inline]
pub fn as_i64(ctx: &Context, id: ExprId) -> Option<i64> {
    match ctx.get(id) {
        Expr::Number(n) if n.is_integer() => n.to_integer().to_i64(),
        _ => None,
    }
}

pub fn rational_to_f64(n: &BigRational) -> f64 {
    n.to_f64().unwrap_or(f64::NAN)
}

/// Exact `r^n` for an integer exponent. `None` for `0^n` with `n < 0`.
pub fn rational_powi(r: &BigRational, n: i64) -> Option<BigRational> {
    if n < 0 && r.is_zero() {
        return None;
    }
    let k = u32::try_from(n.unsigned_abs()).ok()?;
    let raised = BigRational::new(r.numer().pow(k), r.denom().pow(k));
    if n < 0 {
        Some(raised.recip())
    } else {
        Some(raised)
    }
}

/// Evaluate `expr` with the variables bound in `var_map`.
pub fn eval_f64(
    ctx: &Context,
    expr: ExprId,
    var_map: &HashMap<String, f64>,
) -> Result<f64, EvalError> {
    eval_depth(ctx, expr, var_map, MAX_DEPTH)
}

/// Evaluate an expression that must not contain any variable.
pub fn eval_const(ctx: &Context, expr: ExprId) -> Result<f64, EvalError> {
    eval_f64(ctx, expr, &HashMap::new())
}

/// Evaluate with a single variable bound to `x`.
pub fn eval_at(ctx: &Context, expr: ExprId, var: &str, x: f64) -> Result<f64, EvalError> {
    let mut vars = HashMap::with_capacity(1);
    vars.insert(var.to_string(), x);
    eval_f64(ctx, expr, &vars)
}

fn eval_depth(
    ctx: &Context,
    expr: ExprId,
    var_map: &HashMap<String, f64>,
    depth: usize,
) -> Result<f64, EvalError> {
    if depth == 0 {
        return Err(EvalError::DepthExceeded);
    }
    let next = depth - 1;

    let value = match ctx.get(expr) {
        Expr::Number(n) => rational_to_f64(n),
        Expr::Constant(c) => match c {
            Constant::Pi => std::f64::consts::PI,
            Constant::E => std::f64::consts::E,
            Constant::Undefined => f64::NAN,
        },
        Expr::Variable(sym_id) => {
            let name = ctx.sym_name(*sym_id);
            *var_map
                .get(name)
                .ok_or_else(|| EvalError::UnboundVariable {
                    name: name.to_string(),
                })?
        }
        Expr::Add(l, r) => eval_depth(ctx, *l, var_map, next)? + eval_depth(ctx, *r, var_map, next)?,
        Expr::Sub(l, r) => eval_depth(ctx, *l, var_map, next)? - eval_depth(ctx, *r, var_map, next)?,
        Expr::Mul(l, r) => eval_depth(ctx, *l, var_map, next)? * eval_depth(ctx, *r, var_map, next)?,
        Expr::Div(l, r) => eval_depth(ctx, *l, var_map, next)? / eval_depth(ctx, *r, var_map, next)?,
        Expr::Pow(b, e) => {
            let base = eval_depth(ctx, *b, var_map, next)?;
            match as_i64(ctx, *e).and_then(|n| i32::try_from(n).ok()) {
                Some(n) => base.powi(n),
                None => base.powf(eval_depth(ctx, *e, var_map, next)?),
            }
        }
        Expr::Neg(e) => -eval_depth(ctx, *e, var_map, next)?,
        Expr::Function(fn_id, args) => {
            let name = ctx.sym_name(*fn_id);
            let arg_vals = args
                .iter()
                .map(|a| eval_depth(ctx, *a, var_map, next))
                .collect::<Result<Vec<f64>, _>>()?;
            eval_function(name, &arg_vals)?
        }
    };
    Ok(value)
}

#[inline(never)]
fn eval_function(name: &str, args: &[f64]) -> Result<f64, EvalError> {
    let unknown = || EvalError::UnknownFunction {
        name: name.to_string(),
    };
    let x = match args {
        [x] => *x,
        _ => return Err(unknown()),
    };
    let value = match name {
        "sin" => x.sin(),
        "cos" => x.cos(),
        "tan" => x.tan(),
        "asin" | "arcsin" => x.asin(),
        "acos" | "arccos" => x.acos(),
        "atan" | "arctan" => x.atan(),
        "sinh" => x.sinh(),
        "cosh" => x.cosh(),
        "tanh" => x.tanh(),
        // ln of a negative is NaN, ln(0) is -inf
        "ln" => x.ln(),
        "sqrt" => x.sqrt(),
        "abs" => x.abs(),
        _ => return Err(unknown()),
    };
    Ok(value)
}

/// `n` evenly spaced points over `[start, end]`, endpoints included.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Sample `expr` over `xs`; non-finite values become `None` (chart gaps).
pub fn sample(
    ctx: &Context,
    expr: ExprId,
    var: &str,
    xs: &[f64],
) -> Result<Vec<Option<f64>>, EvalError> {
    let mut vars = HashMap::with_capacity(1);
    let mut out = Vec::with_capacity(xs.len());
    for &x in xs {
        vars.insert(var.to_string(), x);
        let y = eval_f64(ctx, expr, &vars)?;
        out.push(y.is_finite().then_some(y));
    }
    Ok(out)
}
