//! Right-triangle hypotenuse from two legs.

use cas_api_models::{Font, Line, PlotData, Series, SolutionResponse, Trace};
use cas_ast::Context;
use cas_math::numeric::eval_const;
use serde_json::json;
use tracing::debug;

use super::exact_sqrt;
use crate::extract::{decimal_text, triangle_sides, Num};
use crate::format::{exact_with_approx, float_text, latex, round_to};
use crate::theme::dark_layout;
use crate::SolveOutcome;

const FILL: &str = "rgba(0, 255, 255, 0.2)";

pub fn solve(text: &str) -> SolveOutcome {
    hypotenuse(&text.trim().to_lowercase()).into()
}

fn hypotenuse(lower: &str) -> Option<SolutionResponse> {
    let (a, b) = triangle_sides(lower)?;
    let a2 = &a.exact * &a.exact;
    let b2 = &b.exact * &b.exact;

    let mut ctx = Context::new();
    let c = exact_sqrt(&mut ctx, &a2 + &b2);
    let approx = eval_const(&ctx, c).ok()?;
    debug!(a = a.value, b = b.value, c = approx, "right triangle");

    let (a_text, b_text) = (a.text.as_str(), b.text.as_str());
    let (a2, b2) = (decimal_text(&a2), decimal_text(&b2));
    let exact = latex(&ctx, c);
    let steps = vec![
        format!(r"**Step 1: Identify Given Sides**\\Legs are $a={a_text}$ and $b={b_text}$."),
        r"**Step 2: Apply Pythagorean Theorem**\\For a right triangle, $a^2 + b^2 = c^2$."
            .to_string(),
        format!(
            r"**Step 3: Substitute & Solve**\\$c = \sqrt{{{a_text}^2 + {b_text}^2}} = \sqrt{{{a2} + {b2}}} = {exact}$."
        ),
    ];

    let result = format!("c = {}", exact_with_approx(&ctx, c));
    Some(SolutionResponse::new(result, steps).with_plot(chart(&a, &b, approx)))
}

fn chart(a: &Num, b: &Num, c: f64) -> PlotData {
    let (a_len, b_len) = (a.value, b.value);
    let outline = || {
        Trace::scatter(
            Series::values([0.0, b_len, 0.0, 0.0]),
            Series::values([0.0, 0.0, a_len, 0.0]),
        )
    };

    let edges = outline()
        .mode("lines")
        .line(Line::color("cyan").width(3.0))
        .name("Triangle");
    let interior = outline()
        .fill("toself", FILL)
        .line(Line::default().width(0.0))
        .show_legend(false);
    let labels = Trace::scatter(
        Series::values([b_len / 2.0, -0.1 * b_len, b_len / 2.0]),
        Series::values([-0.1 * a_len, a_len / 2.0, a_len / 2.0]),
    )
    .mode("text")
    .text([
        format!("b={}", b.text),
        format!("a={}", a.text),
        format!("c={}", float_text(round_to(c, 2))),
    ])
    .text_position("middle center")
    .text_font(Font::color("white"));

    let layout = dark_layout("Right Triangle")
        .set("xaxis", json!({ "scaleanchor": "y", "scaleratio": 1 }))
        .set("yaxis", json!({ "constrain": "domain" }));
    PlotData::new(vec![edges, interior, labels], layout)
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
    fn test_pythagorean_triple_is_exact() {
        let resp = solved("Find the hypotenuse of a right triangle with sides 3 and 4");
        assert_eq!(resp.solution_latex, "c = 5");
        assert_eq!(
            resp.steps[2],
            r"**Step 3: Substitute & Solve**\\$c = \sqrt{3^2 + 4^2} = \sqrt{9 + 16} = 5$."
        );
    }

    #[test]
    fn test_irrational_hypotenuse() {
        let resp = solved("triangle with sides 1 and 2");
        assert_eq!(resp.solution_latex, "c = \\sqrt{5} \\approx 2.236");
        let plot = resp.plot_data.unwrap();
        assert_eq!(plot.data.len(), 3);
        assert_eq!(plot.data[1].fillcolor.as_deref(), Some(FILL));
        assert_eq!(plot.data[1].showlegend, Some(false));
        assert_eq!(
            plot.data[2].text.as_ref().unwrap()[2],
            "c=2.24"
        );
    }

    #[test]
    fn test_decimal_legs() {
        let resp = solved("triangle sides 1.5 and 2");
        assert_eq!(resp.solution_latex, "c = \\frac{5}{2}");
        assert!(resp.steps[2].contains(r"\sqrt{2.25 + 4}"));
    }

    #[test]
    fn test_pattern_mismatch_is_no_match() {
        assert!(matches!(solve("triangle 3 4"), SolveOutcome::NoMatch));
    }
}
