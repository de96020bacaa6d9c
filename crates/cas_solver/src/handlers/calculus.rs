//! Derivatives and indefinite integrals of a single-variable expression.

use cas_api_models::{Line, PlotData, Series, SolutionResponse, Trace};
use cas_ast::{Context, DisplayExpr, ExprId};
use cas_engine::{antiderivative, derivative};
use cas_math::expr_predicates::free_variables;
use cas_math::numeric::{linspace, sample, EvalError};
use cas_parser::parse;
use tracing::debug;

use crate::extract::strip_keywords;
use crate::format::latex;
use crate::theme::dark_layout;
use crate::{SolveOutcome, SolverError};

const DERIVATIVE_WORDS: &[&str] = &["derivative", "differentiate", "diff"];
const INTEGRAL_WORDS: &[&str] = &["integrate", "integral"];

const PLOT_MIN: f64 = -5.0;
const PLOT_MAX: f64 = 5.0;
const PLOT_SAMPLES: usize = 200;

/// Default variable when the input has none or has `x` among others.
const DEFAULT_VAR: &str = "x";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Derivative,
    Integral,
}

impl Operation {
    /// Differentiation keywords are checked first.
    pub fn detect(lower: &str) -> Option<Self> {
        if lower.contains("derivative") || lower.contains("diff") {
            Some(Operation::Derivative)
        } else if lower.contains("integrate") || lower.contains("integral") {
            Some(Operation::Integral)
        } else {
            None
        }
    }

    fn keywords(self) -> &'static [&'static str] {
        match self {
            Operation::Derivative => DERIVATIVE_WORDS,
            Operation::Integral => INTEGRAL_WORDS,
        }
    }
}

pub fn solve(text: &str) -> SolveOutcome {
    calculus(text).into()
}

fn calculus(text: &str) -> Result<Option<SolutionResponse>, SolverError> {
    let Some(op) = Operation::detect(&text.to_lowercase()) else {
        return Ok(None);
    };
    let body = strip_keywords(text, op.keywords());
    debug!(?op, input = %body, "calculus");

    let mut ctx = Context::new();
    let expr = parse(&body, &mut ctx)?;
    let var = pick_variable(&ctx, expr)?;
    let (top_sum, top_pow) = {
        let node = ctx.get(expr);
        (node.is_sum(), node.is_pow())
    };

    let result = match op {
        Operation::Derivative => derivative(&mut ctx, expr, &var)?,
        Operation::Integral => antiderivative(&mut ctx, expr, &var)?,
    };

    let f_latex = latex(&ctx, expr);
    let r_latex = latex(&ctx, result);
    let mut steps = vec![format!(
        r"**Step 1: Identify Function**\\$f({var}) = {f_latex}$"
    )];
    let solution_latex = match op {
        Operation::Derivative => {
            if top_sum {
                steps.push(r"**Step 2: Sum Rule**\\The derivative of a sum is the sum of the derivatives: $\frac{d}{dx}[f(x) + g(x)] = f'(x) + g'(x)$.".to_string());
            }
            if top_pow {
                steps.push(r"**Step 2: Power Rule**\\Apply $\frac{d}{dx}x^n = nx^{n-1}$.".to_string());
            }
            steps.push(format!(r"**Step 3: Compute**\\$f'({var}) = {r_latex}$"));
            r_latex
        }
        Operation::Integral => {
            steps.push(r"**Step 2: Find Antiderivative**\\Look for a function $F(x)$ such that $F'(x) = f(x)$.".to_string());
            steps.push(format!(
                r"**Step 3: Result**\\$\int f({var}) d{var} = {r_latex} + C$"
            ));
            format!("{r_latex} + C")
        }
    };

    let mut resp = SolutionResponse::new(solution_latex, steps);
    match comparison_chart(&ctx, op, expr, result, &var) {
        Ok(plot) => resp = resp.with_plot(plot),
        Err(e) => debug!(error = %e, "chart omitted"),
    }
    Ok(Some(resp))
}

/// `x` if present, else the single free symbol, else `x`.
fn pick_variable(ctx: &Context, expr: ExprId) -> Result<String, SolverError> {
    let vars = free_variables(ctx, expr);
    let others: Vec<&String> = vars.iter().filter(|v| *v != DEFAULT_VAR).collect();
    if others.len() > 1 {
        return Err(SolverError::multiple_variables(others));
    }
    if vars.contains(DEFAULT_VAR) {
        return Ok(DEFAULT_VAR.to_string());
    }
    Ok(others
        .first()
        .map_or_else(|| DEFAULT_VAR.to_string(), |v| v.to_string()))
}

fn comparison_chart(
    ctx: &Context,
    op: Operation,
    expr: ExprId,
    result: ExprId,
    var: &str,
) -> Result<PlotData, EvalError> {
    let xs = linspace(PLOT_MIN, PLOT_MAX, PLOT_SAMPLES);
    let f = sample(ctx, expr, var, &xs)?;
    let g = sample(ctx, result, var, &xs)?;
    let show = |id| DisplayExpr { context: ctx, id }.to_string();

    let (f_name, g_name, g_color, title) = match op {
        Operation::Derivative => (
            format!("f({var})={}", show(expr)),
            format!("f'({var})={}", show(result)),
            "red",
            "Derivative",
        ),
        Operation::Integral => (
            format!("f({var})"),
            "Int(f)".to_string(),
            "green",
            "Integration",
        ),
    };

    let original = Trace::scatter(Series::values(xs.iter().copied()), Series::with_gaps(f))
        .name(f_name)
        .line(Line::color("blue").dash("dash"));
    let transformed = Trace::scatter(Series::values(xs), Series::with_gaps(g))
        .name(g_name)
        .line(Line::color(g_color));
    Ok(PlotData::new(vec![original, transformed], dark_layout(title)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solved(text: &str) -> SolutionResponse {
        match solve(text) {
            SolveOutcome::Solved(resp) => resp,
            other => panic!("expected a solution for {text:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_derivative_of_square() {
        let resp = solved("derivative x^2");
        assert_eq!(resp.solution_latex, "2\\cdot x");
        assert_eq!(
            resp.steps,
            vec![
                r"**Step 1: Identify Function**\\$f(x) = {x}^{2}$".to_string(),
                r"**Step 2: Power Rule**\\Apply $\frac{d}{dx}x^n = nx^{n-1}$.".to_string(),
                r"**Step 3: Compute**\\$f'(x) = 2\cdot x$".to_string(),
            ]
        );
        let plot = resp.plot_data.unwrap();
        assert_eq!(plot.data.len(), 2);
        assert_eq!(plot.data[1].name.as_deref(), Some("f'(x)=2 * x"));
        assert_eq!(plot.layout.title(), Some("Derivative"));
    }

    #[test]
    fn test_sum_rule_step() {
        let resp = solved("Derivative of x^3 + 2*x");
        assert!(resp.steps[1].starts_with(r"**Step 2: Sum Rule**"));
        assert_eq!(resp.solution_latex, "3\\cdot {x}^{2} + 2");
    }

    #[test]
    fn test_integral_of_square() {
        let resp = solved("integrate x^2");
        assert_eq!(resp.solution_latex, "\\frac{{x}^{3}}{3} + C");
        assert_eq!(
            resp.steps[2],
            r"**Step 3: Result**\\$\int f(x) dx = \frac{{x}^{3}}{3} + C$"
        );
        assert_eq!(resp.plot_data.unwrap().layout.title(), Some("Integration"));
    }

    #[test]
    fn test_single_other_variable() {
        let resp = solved("diff t^2");
        assert_eq!(resp.solution_latex, "2\\cdot t");
        assert!(resp.steps[0].contains("f(t)"));
    }

    #[test]
    fn test_extra_symbol_omits_chart() {
        let resp = solved("derivative a*x^2");
        assert!(resp.plot_data.is_none());
        assert_eq!(resp.steps.len(), 2);
    }

    #[test]
    fn test_multiple_other_symbols_fail() {
        match solve("derivative a*b") {
            SolveOutcome::Failed(SolverError::Unsupported(msg)) => assert!(msg.contains("a, b")),
            other => panic!("expected unsupported, got {other:?}"),
        }
    }

    #[test]
    fn test_no_closed_form_fails() {
        assert!(matches!(
            solve("integral x*sin(x)"),
            SolveOutcome::Failed(SolverError::Calculus(_))
        ));
    }

    #[test]
    fn test_parse_failure_fails() {
        assert!(matches!(
            solve("derivative of x +* 2"),
            SolveOutcome::Failed(SolverError::Parse(_))
        ));
    }

    #[test]
    fn test_domain_gaps_keep_chart() {
        let resp = solved("derivative ln(x)");
        let plot = resp.plot_data.unwrap();
        let ys = plot.data[0].y.as_ref().unwrap().as_flat().unwrap();
        assert!(ys[0].is_none());
        assert!(ys[PLOT_SAMPLES - 1].is_some());
    }
}
