//! Equations in one variable, and plain arithmetic.
//!
//! This is the fallback handler: text that does not parse, or that names a
//! single multi-letter symbol (most likely a word), is not treated as math.

use cas_api_models::{Line, Marker, PlotData, Series, Shape, SolutionResponse, Trace};
use cas_ast::{Context, Equation, ExprId};
use cas_engine::simplify;
use cas_math::expr_predicates::free_variables;
use cas_math::numeric::{eval_const, linspace, sample, EvalError};
use cas_parser::parse_equation;
use cas_solver_core::{solve_univariate, SolutionSet};
use num_traits::Zero;
use tracing::debug;

use crate::format::{exact_with_approx, fixed4, latex};
use crate::theme::dark_layout;
use crate::{SolveOutcome, SolverError};

const PLOT_MIN: f64 = -10.0;
const PLOT_MAX: f64 = 10.0;
const PLOT_SAMPLES: usize = 400;

/// Residuals below this count as zero when comparing constant sides.
const EQUALITY_TOLERANCE: f64 = 1e-9;

pub fn solve(text: &str) -> SolveOutcome {
    match algebra(text) {
        Ok(found) => found.into(),
        Err(e @ SolverError::Unsupported(_)) => SolveOutcome::Failed(e),
        Err(e) => {
            debug!(error = %e, "not an algebra problem");
            SolveOutcome::NoMatch
        }
    }
}

fn algebra(text: &str) -> Result<Option<SolutionResponse>, SolverError> {
    let mut ctx = Context::new();
    let eq = parse_equation(text, &mut ctx)?;
    let residual = eq.residual(&mut ctx);
    let vars = free_variables(&ctx, residual);

    match vars.len() {
        0 if text.contains('=') => Ok(Some(check_identity(&mut ctx, eq, residual))),
        0 => Ok(Some(evaluate(&mut ctx, eq.lhs))),
        1 => {
            let var = vars.into_iter().next().unwrap_or_default();
            if var.chars().count() > 1 {
                debug!(symbol = %var, "lone multi-letter symbol, not an equation");
                return Ok(None);
            }
            solve_for(&mut ctx, eq, residual, &var).map(Some)
        }
        _ => Err(SolverError::multiple_variables(&vars)),
    }
}

fn solve_for(
    ctx: &mut Context,
    eq: Equation,
    residual: ExprId,
    var: &str,
) -> Result<SolutionResponse, SolverError> {
    let f = simplify(ctx, residual);
    let solution = solve_univariate(ctx, f, var)?;
    debug!(var, roots = solution.roots().len(), "solved");

    let answer = match &solution {
        SolutionSet::AllReals => format!(r"{var} \in \mathbb{{R}}"),
        SolutionSet::Empty => r"\emptyset".to_string(),
        SolutionSet::Roots(roots) => roots
            .iter()
            .map(|root| match root.exact {
                Some(id) => format!("{var} = {}", latex(ctx, id)),
                None => format!(r"{var} \approx {}", fixed4(root.approx)),
            })
            .collect::<Vec<_>>()
            .join(r", \quad "),
    };

    let steps = vec![
        format!(
            r"**Step 1: Setup Equation**\\${} = {}$",
            latex(ctx, eq.lhs),
            latex(ctx, eq.rhs)
        ),
        format!(r"**Step 2: Isolate Variable**\\Move terms to solve for ${var}$."),
        format!(r"**Step 3: Solve**\\${answer}$"),
    ];

    let mut resp = SolutionResponse::new(answer, steps);
    match root_chart(ctx, f, var, &solution) {
        Ok(plot) => resp = resp.with_plot(plot),
        Err(e) => debug!(error = %e, "chart omitted"),
    }
    Ok(resp)
}

fn root_chart(
    ctx: &Context,
    f: ExprId,
    var: &str,
    solution: &SolutionSet,
) -> Result<PlotData, EvalError> {
    let xs = linspace(PLOT_MIN, PLOT_MAX, PLOT_SAMPLES);
    let ys = sample(ctx, f, var, &xs)?;

    let mut data = vec![Trace::scatter(Series::values(xs), Series::with_gaps(ys))
        .name(format!("f({var})"))
        .line(Line::color("purple"))];
    data.extend(solution.roots().iter().map(|root| {
        Trace::scatter(Series::values([root.approx]), Series::values([0.0]))
            .mode("markers")
            .marker(Marker::new("yellow", 10.0))
            .name("Root")
    }));

    let axis = Shape::segment(PLOT_MIN, 0.0, PLOT_MAX, 0.0).line(Line::color("white").width(1.0));
    Ok(PlotData::new(data, dark_layout("Solution").shape(axis)))
}

/// A bare expression without variables: report its value.
fn evaluate(ctx: &mut Context, expr: ExprId) -> SolutionResponse {
    let value = simplify(ctx, expr);
    let shown = exact_with_approx(ctx, value);
    let steps = vec![
        format!(r"**Step 1: Setup Expression**\\${}$", latex(ctx, expr)),
        format!(r"**Step 2: Simplify**\\${} = {shown}$", latex(ctx, expr)),
    ];
    SolutionResponse::new(shown, steps)
}

/// An equation without variables: report whether it holds.
fn check_identity(ctx: &mut Context, eq: Equation, residual: ExprId) -> SolutionResponse {
    let diff = simplify(ctx, residual);
    let holds = match ctx.as_number(diff) {
        Some(n) => n.is_zero(),
        None => eval_const(ctx, diff).is_ok_and(|v| v.abs() < EQUALITY_TOLERANCE),
    };
    let verdict = if holds { r"\text{True}" } else { r"\text{False}" };
    let steps = vec![
        format!(
            r"**Step 1: Setup Equation**\\${} = {}$",
            latex(ctx, eq.lhs),
            latex(ctx, eq.rhs)
        ),
        format!(
            r"**Step 2: Compare Sides**\\${} - ({}) = {}$",
            latex(ctx, eq.lhs),
            latex(ctx, eq.rhs),
            latex(ctx, diff)
        ),
        format!(r"**Step 3: Conclude**\\The equation is ${verdict}$."),
    ];
    SolutionResponse::new(verdict, steps)
}
