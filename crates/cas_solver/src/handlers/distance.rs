//! Distance between two points in the plane under a chosen metric.

use cas_api_models::{Layout, Line, Marker, PlotData, Series, Shape, SolutionResponse, Trace};
use cas_ast::Context;
use cas_math::numeric::eval_const;
use num_rational::BigRational;
use num_traits::Signed;
use tracing::debug;

use super::{exact_sqrt, operand};
use crate::extract::{decimal_text, points_2d, Num};
use crate::format::{exact_with_approx, float_text, round_to};
use crate::theme::dark_layout;
use crate::SolveOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Euclidean,
    /// L1
    Taxicab,
    /// L∞
    Chebyshev,
}

impl Metric {
    /// "taxicab" wins over "chebyshev"; anything else is Euclidean.
    pub fn detect(lower: &str) -> Self {
        if lower.contains("taxicab") {
            Metric::Taxicab
        } else if lower.contains("chebyshev") {
            Metric::Chebyshev
        } else {
            Metric::Euclidean
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Metric::Euclidean => "Euclidean",
            Metric::Taxicab => "Taxicab",
            Metric::Chebyshev => "Chebyshev",
        }
    }
}

pub fn solve(text: &str) -> SolveOutcome {
    let lower = text.trim().to_lowercase();
    let points = points_2d(&lower);
    let [a, b] = points.as_slice() else {
        debug!(found = points.len(), "planar distance needs exactly two points");
        return SolveOutcome::NoMatch;
    };
    let metric = Metric::detect(&lower);
    debug!(?metric, "planar distance");

    let markers = Trace::scatter(
        Series::values([a[0].value, b[0].value]),
        Series::values([a[1].value, b[1].value]),
    )
    .mode("markers+text")
    .text(["A", "B"])
    .text_position("bottom center")
    .marker(Marker::new("white", 10.0));

    let solved = match metric {
        Metric::Euclidean => euclidean(a, b),
        Metric::Taxicab => Some(taxicab(a, b)),
        Metric::Chebyshev => Some(chebyshev(a, b)),
    };
    let Some(Solved {
        result,
        steps,
        trace,
        shape,
    }) = solved
    else {
        return SolveOutcome::NoMatch;
    };

    let mut layout: Layout = dark_layout(format!("{} Distance", metric.title()));
    if let Some(shape) = shape {
        layout = layout.shape(shape);
    }
    let plot = PlotData::new(vec![markers, trace], layout);
    SolveOutcome::Solved(SolutionResponse::new(format!("d = {result}"), steps).with_plot(plot))
}

/// Per-metric part of the answer.
struct Solved {
    result: String,
    steps: Vec<String>,
    trace: Trace,
    shape: Option<Shape>,
}

fn deltas(a: &[Num; 2], b: &[Num; 2]) -> (BigRational, BigRational) {
    (&b[0].exact - &a[0].exact, &b[1].exact - &a[1].exact)
}

fn segment(a: &[Num; 2], b: &[Num; 2]) -> (Series, Series) {
    (
        Series::values([a[0].value, b[0].value]),
        Series::values([a[1].value, b[1].value]),
    )
}

fn euclidean(a: &[Num; 2], b: &[Num; 2]) -> Option<Solved> {
    let (dx, dy) = deltas(a, b);
    let mut ctx = Context::new();
    let d = exact_sqrt(&mut ctx, &dx * &dx + &dy * &dy);
    let approx = eval_const(&ctx, d).ok()?;

    let (x1, y1) = (operand(&a[0].text), operand(&a[1].text));
    let (x2, y2) = (&b[0].text, &b[1].text);
    let steps = vec![
        r"**Step 1: Euclidean Distance Formula**\\$d = \sqrt{(x_2-x_1)^2 + (y_2-y_1)^2}$."
            .to_string(),
        format!(r"**Step 2: Substitute**\\$d = \sqrt{{({x2}-{x1})^2 + ({y2}-{y1})^2}}$."),
        format!(
            r"**Result**\\$d \approx {}$",
            float_text(round_to(approx, 4))
        ),
    ];

    let (xs, ys) = segment(a, b);
    let trace = Trace::scatter(xs, ys)
        .mode("lines")
        .line(Line::color("cyan").width(3.0))
        .name("Euclidean");
    Some(Solved {
        result: exact_with_approx(&ctx, d),
        steps,
        trace,
        shape: None,
    })
}

fn taxicab(a: &[Num; 2], b: &[Num; 2]) -> Solved {
    let (dx, dy) = deltas(a, b);
    let dist = decimal_text(&(dx.abs() + dy.abs()));

    let (x1, y1) = (operand(&a[0].text), operand(&a[1].text));
    let (x2, y2) = (&b[0].text, &b[1].text);
    let steps = vec![
        r"**Step 1: Taxicab (L1) Formula**\\$d = |x_2-x_1| + |y_2-y_1|$.".to_string(),
        format!(r"**Result**\\$d = |{x2}-{x1}| + |{y2}-{y1}| = {dist}$"),
    ];

    // right along y1, then up to the target
    let trace = Trace::scatter(
        Series::values([a[0].value, b[0].value, b[0].value]),
        Series::values([a[1].value, a[1].value, b[1].value]),
    )
    .mode("lines")
    .line(Line::color("red").width(3.0).shape("hv"))
    .name("Taxicab");
    Solved {
        result: dist,
        steps,
        trace,
        shape: None,
    }
}

fn chebyshev(a: &[Num; 2], b: &[Num; 2]) -> Solved {
    let (dx, dy) = deltas(a, b);
    let dist = decimal_text(&dx.abs().max(dy.abs()));

    let steps = vec![
        r"**Step 1: Chebyshev (L∞) Formula**\\$d = \max(|x_2-x_1|, |y_2-y_1|)$.".to_string(),
        format!(
            r"**Result**\\$d = \max(|{}|, |{}|) = {dist}$",
            decimal_text(&dx),
            decimal_text(&dy)
        ),
    ];

    let (xs, ys) = segment(a, b);
    let trace = Trace::scatter(xs, ys)
        .mode("lines")
        .line(Line::color("green").dash("dot"))
        .name("Chebyshev");
    let bounds = Shape::rect(a[0].value, a[1].value, b[0].value, b[1].value)
        .line(Line::color("green"))
        .fill("green", 0.2);
    Solved {
        result: dist,
        steps,
        trace,
        shape: Some(bounds),
    }
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
    fn test_metric_detection() {
        assert_eq!(Metric::detect("taxicab and chebyshev"), Metric::Taxicab);
        assert_eq!(Metric::detect("chebyshev distance"), Metric::Chebyshev);
        assert_eq!(Metric::detect("euclidean distance"), Metric::Euclidean);
        assert_eq!(Metric::detect("distance"), Metric::Euclidean);
    }

    #[test]
    fn test_euclidean_default() {
        let resp = solved("distance between (1, 2) and (4, 6)");
        assert_eq!(resp.solution_latex, "d = 5");
        assert_eq!(resp.steps.len(), 3);
        assert_eq!(
            resp.steps[1],
            r"**Step 2: Substitute**\\$d = \sqrt{(4-1)^2 + (6-2)^2}$."
        );
        let plot = resp.plot_data.unwrap();
        assert_eq!(plot.layout.title(), Some("Euclidean Distance"));
        assert_eq!(plot.data[0].text.as_deref(), Some(&["A".to_string(), "B".to_string()][..]));
    }

    #[test]
    fn test_euclidean_irrational() {
        let resp = solved("distance (0, 0) (1, 1)");
        assert_eq!(resp.solution_latex, "d = \\sqrt{2} \\approx 1.414");
        assert_eq!(resp.steps[2], r"**Result**\\$d \approx 1.4142$");
    }

    #[test]
    fn test_taxicab_is_exact_sum() {
        let resp = solved("taxicab distance between (-1, 2.5) and (3, -1)");
        assert_eq!(resp.solution_latex, "d = 7.5");
        assert_eq!(
            resp.steps[1],
            r"**Result**\\$d = |3-(-1)| + |-1-2.5| = 7.5$"
        );
        let plot = resp.plot_data.unwrap();
        assert_eq!(plot.data[1].x.as_ref().unwrap().len(), 3);
        assert_eq!(
            plot.data[1].line.as_ref().unwrap().shape.as_deref(),
            Some("hv")
        );
    }

    #[test]
    fn test_chebyshev_is_max() {
        let resp = solved("chebyshev distance (1, 1) (4, 9)");
        assert_eq!(resp.solution_latex, "d = 8");
        assert_eq!(resp.steps[1], r"**Result**\\$d = \max(|3|, |8|) = 8$");
        let plot = resp.plot_data.unwrap();
        assert_eq!(plot.layout.shapes.len(), 1);
        assert_eq!(plot.layout.shapes[0].kind, "rect");
    }

    #[test]
    fn test_large_coordinates_answer_quickly() {
        let start = std::time::Instant::now();
        let resp = solved("distance between (0, 0) and (737250265, 479875878)");
        assert!(start.elapsed() < std::time::Duration::from_secs(5));
        assert!(resp
            .solution_latex
            .starts_with(r"d = \sqrt{773818811528841109} \approx"));
    }

    #[test]
    fn test_requires_exactly_two_points() {
        assert!(matches!(solve("distance (1, 2)"), SolveOutcome::NoMatch));
        assert!(matches!(
            solve("distance (1, 2) (3, 4) (5, 6)"),
            SolveOutcome::NoMatch
        ));
    }
}
