//! Projectile motion on flat ground without drag.

use cas_api_models::{Layout, Line, Marker, PlotData, Series, SolutionResponse, Trace};
use cas_math::numeric::linspace;
use num_rational::BigRational;
use tracing::debug;

use crate::extract::{decimal_text, labelled_number, Label};
use crate::format::{fixed4, float_text, round_to};
use crate::theme::{axis_title, dark_layout};
use crate::SolveOutcome;

/// Standard gravity in m/s².
pub const GRAVITY: f64 = 9.81;

const TRAJECTORY_SAMPLES: usize = 100;

/// Launch speed (m/s) and angle (radians).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    pub speed: f64,
    pub theta: f64,
}

impl Projectile {
    pub fn from_degrees(speed: f64, degrees: f64) -> Self {
        Self {
            speed,
            theta: degrees.to_radians(),
        }
    }

    pub fn time_of_flight(&self) -> f64 {
        2.0 * self.speed * self.theta.sin() / GRAVITY
    }

    pub fn max_height(&self) -> f64 {
        self.speed.powi(2) * self.theta.sin().powi(2) / (2.0 * GRAVITY)
    }

    pub fn range(&self) -> f64 {
        self.speed.powi(2) * (2.0 * self.theta).sin() / GRAVITY
    }

    /// `(x, y)` at time `t`.
    pub fn position(&self, t: f64) -> (f64, f64) {
        let x = self.speed * self.theta.cos() * t;
        let y = self.speed * self.theta.sin() * t - 0.5 * GRAVITY * t * t;
        (x, y)
    }
}

pub fn solve(text: &str) -> SolveOutcome {
    projectile(text).into()
}

fn projectile(text: &str) -> Option<SolutionResponse> {
    let lower = text.to_lowercase();
    let speed = labelled_number(&lower, Label::Velocity);
    let angle = labelled_number(&lower, Label::Angle);
    let (Some(speed), Some(angle)) = (speed, angle) else {
        debug!("projectile problem without velocity and angle");
        return None;
    };
    debug!(v0 = speed.value, angle = angle.value, "projectile parameters");

    let shot = Projectile::from_degrees(speed.value, angle.value);
    let range = shot.range();
    let height = shot.max_height();

    let v0 = speed.text.as_str();
    let deg = angle.text.as_str();
    let double = decimal_text(&(&angle.exact * BigRational::from_integer(2.into())));
    let range_text = fixed4(range);
    let height_text = fixed4(height);

    let steps = vec![
        format!(
            r"**Step 1: Identify Parameters**\\Initial Velocity $v_0 = {v0}$ m/s, Angle $\theta = {deg}^\circ$."
        ),
        r"**Step 2: Physics Principles**\\Decompose motion into horizontal (constant speed) and vertical (gravity affected) components.".to_string(),
        format!(
            r"**Step 3: Horizontal Range Formula**\\$R = \frac{{v_0^2 \sin(2\theta)}}{{g}} = \frac{{{v0}^2 \sin({double}^\circ)}}{{9.81}} \approx {range_text}$ m."
        ),
        format!(
            r"**Step 4: Max Height Formula**\\$H = \frac{{v_0^2 \sin^2(\theta)}}{{2g}} \approx {height_text}$ m."
        ),
    ];

    let latex = format!(r"R = {range_text}\,\text{{m}}, \quad H_{{max}} = {height_text}\,\text{{m}}");
    Some(SolutionResponse::new(latex, steps).with_plot(chart(&shot, v0, deg)))
}

fn chart(shot: &Projectile, v0: &str, deg: &str) -> PlotData {
    let range = shot.range();
    let height = shot.max_height();
    let times = linspace(0.0, shot.time_of_flight(), TRAJECTORY_SAMPLES);
    let (xs, ys): (Vec<f64>, Vec<f64>) = times.into_iter().map(|t| shot.position(t)).unzip();

    let trajectory = Trace::scatter(Series::values(xs), Series::values(ys))
        .mode("lines")
        .name("Trajectory")
        .line(Line::color("orange").width(3.0));
    let peak = Trace::scatter(Series::values([range / 2.0]), Series::values([height]))
        .mode("markers+text")
        .text([format!("Max Height: {}m", float_text(round_to(height, 2)))])
        .text_position("top center")
        .marker(Marker::new("red", 8.0))
        .name("Peak");
    let impact = Trace::scatter(Series::values([range]), Series::values([0.0]))
        .mode("markers+text")
        .text([format!("Range: {}m", float_text(round_to(range, 2)))])
        .text_position("bottom right")
        .marker(Marker::new("green", 8.0))
        .name("Impact");

    let layout: Layout = dark_layout(format!("Projectile Motion (v0={v0}m/s, θ={deg}°)"))
        .set("xaxis", axis_title("Distance (m)"))
        .set("yaxis", axis_title("Height (m)"));
    PlotData::new(vec![trajectory, peak, impact], layout)
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
    fn test_closed_form_values() {
        let shot = Projectile::from_degrees(50.0, 45.0);
        let resp = solved("A projectile is launched with velocity 50 at angle 45");
        let expected = format!(
            r"R = {:.4}\,\text{{m}}, \quad H_{{max}} = {:.4}\,\text{{m}}",
            2500.0 * (2.0 * 45f64.to_radians()).sin() / 9.81,
            2500.0 * 45f64.to_radians().sin().powi(2) / (2.0 * 9.81)
        );
        assert_eq!(resp.solution_latex, expected);
        assert!((shot.range() - 254.842).abs() < 1e-3);
    }

    #[test]
    fn test_steps_substitute_values() {
        let resp = solved("projectile velocity 20 angle 30");
        assert_eq!(resp.steps.len(), 4);
        assert_eq!(
            resp.steps[0],
            r"**Step 1: Identify Parameters**\\Initial Velocity $v_0 = 20$ m/s, Angle $\theta = 30^\circ$."
        );
        assert!(resp.steps[2].contains(r"\sin(60^\circ)"));
    }

    #[test]
    fn test_chart_shape() {
        let resp = solved("projectile velocity 20 angle 30");
        let plot = resp.plot_data.unwrap();
        assert_eq!(plot.data.len(), 3);
        assert_eq!(plot.data[0].x.as_ref().unwrap().len(), TRAJECTORY_SAMPLES);
        assert_eq!(plot.data[1].name.as_deref(), Some("Peak"));
        assert_eq!(plot.data[2].name.as_deref(), Some("Impact"));
        assert_eq!(
            plot.layout.title(),
            Some("Projectile Motion (v0=20m/s, θ=30°)")
        );
    }

    #[test]
    fn test_trajectory_lands_at_range() {
        let shot = Projectile::from_degrees(30.0, 60.0);
        let (x, y) = shot.position(shot.time_of_flight());
        assert!((x - shot.range()).abs() < 1e-9);
        assert!(y.abs() < 1e-9);
    }

    #[test]
    fn test_missing_angle_is_no_match() {
        assert!(matches!(
            solve("projectile with velocity 10"),
            SolveOutcome::NoMatch
        ));
    }
}
