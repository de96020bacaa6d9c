//! 3D problems: distance between two points and sphere measurements.

use cas_api_models::{Line, Marker, PlotData, Series, SolutionResponse, Trace};
use cas_ast::{Constant, Context, ExprId};
use cas_engine::simplify;
use cas_math::build::mul2_raw;
use cas_math::numeric::{eval_const, linspace};
use num_rational::BigRational;
use serde_json::json;
use std::f64::consts::PI;
use tracing::debug;

use super::exact_sqrt;
use crate::extract::{labelled_number, points_3d, Label, Num};
use crate::format::{exact_with_approx, float_text, round_to};
use crate::theme::{axis_title, dark_scene_layout};
use crate::SolveOutcome;

const SPHERE_GRID: usize = 50;

pub fn solve(text: &str) -> SolveOutcome {
    let lower = text.trim().to_lowercase();
    if lower.contains("distance") {
        if let Some(resp) = distance(&lower) {
            return SolveOutcome::Solved(resp);
        }
    }
    if lower.contains("sphere") {
        if let Some(resp) = sphere(&lower) {
            return SolveOutcome::Solved(resp);
        }
    }
    SolveOutcome::NoMatch
}

fn distance(lower: &str) -> Option<SolutionResponse> {
    let points = points_3d(lower);
    let [a, b] = points.as_slice() else {
        debug!(found = points.len(), "3d distance needs exactly two points");
        return None;
    };

    let squared = a
        .iter()
        .zip(b.iter())
        .map(|(p, q)| {
            let d = &q.exact - &p.exact;
            &d * &d
        })
        .fold(BigRational::from_integer(0.into()), |acc, sq| acc + sq);

    let mut ctx = Context::new();
    let d = exact_sqrt(&mut ctx, squared);
    let approx = eval_const(&ctx, d).ok()?;
    debug!(distance = approx, "3d distance");

    let [x1, y1, z1] = a.each_ref().map(|n| n.text.as_str());
    let [x2, y2, z2] = b.each_ref().map(|n| n.text.as_str());
    let steps = vec![
        format!(
            r"**Step 1: Identify Coordinates**\\Points $A({x1}, {y1}, {z1})$ and $B({x2}, {y2}, {z2})$."
        ),
        r"**Step 2: Distance Formula (3D)**\\$d = \sqrt{(x_2-x_1)^2 + (y_2-y_1)^2 + (z_2-z_1)^2}$."
            .to_string(),
        format!(
            r"**Step 3: Calculation**\\$d \approx {}$.",
            float_text(round_to(approx, 4))
        ),
    ];

    let latex = format!("d = {}", exact_with_approx(&ctx, d));
    Some(SolutionResponse::new(latex, steps).with_plot(distance_chart(a, b)))
}

fn distance_chart(a: &[Num; 3], b: &[Num; 3]) -> PlotData {
    let coord = |i: usize| Series::values([a[i].value, b[i].value]);
    let floor = a[2].value.min(b[2].value);

    let segment = Trace::scatter3d(coord(0), coord(1), coord(2))
        .mode("lines+markers")
        .marker(Marker::new("cyan", 5.0))
        .line(Line::color("cyan").width(5.0))
        .name("Distance");
    let shadow = Trace::scatter3d(coord(0), coord(1), Series::values([floor, floor]))
        .mode("lines")
        .line(Line::color("gray").dash("dash"))
        .name("Ground Projection");

    let layout = dark_scene_layout("3D Euclidean Distance").set(
        "scene",
        json!({
            "xaxis": axis_title("X"),
            "yaxis": axis_title("Y"),
            "zaxis": axis_title("Z"),
        }),
    );
    PlotData::new(vec![segment, shadow], layout)
}

/// Exact `coeff * pi`, simplified.
fn pi_multiple(ctx: &mut Context, coeff: BigRational) -> ExprId {
    let c = ctx.number(coeff);
    let pi = ctx.constant(Constant::Pi);
    let raw = mul2_raw(ctx, c, pi);
    simplify(ctx, raw)
}

fn sphere(lower: &str) -> Option<SolutionResponse> {
    let Some(radius) = labelled_number(lower, Label::Radius) else {
        debug!("sphere problem without a radius");
        return None;
    };
    debug!(radius = radius.value, "sphere");

    let r = &radius.exact;
    let r2 = r * r;
    let r3 = &r2 * r;
    let mut ctx = Context::new();
    let volume = pi_multiple(&mut ctx, BigRational::new(4.into(), 3.into()) * r3);
    let area = pi_multiple(&mut ctx, BigRational::from_integer(4.into()) * r2);

    let steps = vec![
        format!(r"**Step 1: Identify Radius**\\$r = {}$.", radius.text),
        r"**Step 2: Volume Formula**\\$V = \frac{4}{3}\pi r^3$.".to_string(),
        r"**Step 3: Surface Area Formula**\\$A = 4\pi r^2$.".to_string(),
    ];
    let latex = format!(
        r"V = {} \\ A = {}",
        exact_with_approx(&ctx, volume),
        exact_with_approx(&ctx, area)
    );
    Some(SolutionResponse::new(latex, steps).with_plot(sphere_chart(&radius)))
}

fn sphere_chart(radius: &Num) -> PlotData {
    let r = radius.value;
    let thetas = linspace(0.0, 2.0 * PI, SPHERE_GRID);
    let phis = linspace(0.0, PI, SPHERE_GRID);

    let grid = |f: &dyn Fn(f64, f64) -> f64| -> Series {
        Series::grid(
            thetas
                .iter()
                .map(|&t| phis.iter().map(|&p| f(t, p)).collect())
                .collect(),
        )
    };
    let x = grid(&|t, p| r * t.cos() * p.sin());
    let y = grid(&|t, p| r * t.sin() * p.sin());
    let z = grid(&|_, p| r * p.cos());

    let surface = Trace::surface(x, y, z).opacity(0.8).colorscale("Viridis");
    let layout = dark_scene_layout(format!("Sphere (r={})", radius.text))
        .set("scene", json!({ "aspectmode": "data" }));
    PlotData::new(vec![surface], layout)
}
