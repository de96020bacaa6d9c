//! Chart descriptions in the trace/layout shape Plotly.js consumes.
//!
//! Traces are built with small chainable setters; unset optional fields are
//! omitted from the JSON so the browser applies its own defaults.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A complete chart: data traces plus layout.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct PlotData {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

impl PlotData {
    pub fn new(data: Vec<Trace>, layout: Layout) -> Self {
        Self { data, layout }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TraceKind {
    Scatter,
    Scatter3d,
    Surface,
}

/// Coordinate data for one axis.
///
/// `Flat` entries may be `null`, which the browser draws as a gap.
/// `Grid` is row-major and only used by surfaces.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Series {
    Flat(Vec<Option<f64>>),
    Grid(Vec<Vec<f64>>),
}

impl Series {
    /// Plain values; non-finite entries become gaps.
    pub fn values(values: impl IntoIterator<Item = f64>) -> Self {
        Series::Flat(
            values
                .into_iter()
                .map(|v| v.is_finite().then_some(v))
                .collect(),
        )
    }

    pub fn with_gaps(values: Vec<Option<f64>>) -> Self {
        Series::Flat(values)
    }

    pub fn grid(rows: Vec<Vec<f64>>) -> Self {
        Series::Grid(rows)
    }

    pub fn len(&self) -> usize {
        match self {
            Series::Flat(v) => v.len(),
            Series::Grid(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flat entries; `None` for grids.
    pub fn as_flat(&self) -> Option<&[Option<f64>]> {
        match self {
            Series::Flat(v) => Some(v),
            Series::Grid(_) => None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Marker {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
}

impl Marker {
    pub fn new(color: impl Into<String>, size: f64) -> Self {
        Self {
            color: Some(color.into()),
            size: Some(size),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Line {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// `"dash"`, `"dot"`, `"dashdot"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash: Option<String>,
    /// Step shape such as `"hv"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
}

impl Line {
    pub fn color(color: impl Into<String>) -> Self {
        Self {
            color: Some(color.into()),
            ..Self::default()
        }
    }

    pub fn width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn dash(mut self, dash: impl Into<String>) -> Self {
        self.dash = Some(dash.into());
        self
    }

    pub fn shape(mut self, shape: impl Into<String>) -> Self {
        self.shape = Some(shape.into());
        self
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Font {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Font {
    pub fn color(color: impl Into<String>) -> Self {
        Self {
            color: Some(color.into()),
        }
    }
}

/// One drawable series.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: TraceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<Series>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<Series>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z: Option<Series>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub textposition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub textfont: Option<Font>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fillcolor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showlegend: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colorscale: Option<String>,
}

impl Trace {
    fn empty(kind: TraceKind) -> Self {
        Self {
            kind,
            x: None,
            y: None,
            z: None,
            mode: None,
            name: None,
            text: None,
            textposition: None,
            textfont: None,
            marker: None,
            line: None,
            fill: None,
            fillcolor: None,
            showlegend: None,
            opacity: None,
            colorscale: None,
        }
    }

    pub fn scatter(x: Series, y: Series) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::empty(TraceKind::Scatter)
        }
    }

    pub fn scatter3d(x: Series, y: Series, z: Series) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            z: Some(z),
            ..Self::empty(TraceKind::Scatter3d)
        }
    }

    pub fn surface(x: Series, y: Series, z: Series) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            z: Some(z),
            ..Self::empty(TraceKind::Surface)
        }
    }

    pub fn mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn text<S: Into<String>>(mut self, labels: impl IntoIterator<Item = S>) -> Self {
        self.text = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    pub fn text_position(mut self, position: impl Into<String>) -> Self {
        self.textposition = Some(position.into());
        self
    }

    pub fn text_font(mut self, font: Font) -> Self {
        self.textfont = Some(font);
        self
    }

    pub fn marker(mut self, marker: Marker) -> Self {
        self.marker = Some(marker);
        self
    }

    pub fn line(mut self, line: Line) -> Self {
        self.line = Some(line);
        self
    }

    pub fn fill(mut self, fill: impl Into<String>, color: impl Into<String>) -> Self {
        self.fill = Some(fill.into());
        self.fillcolor = Some(color.into());
        self
    }

    pub fn show_legend(mut self, show: bool) -> Self {
        self.showlegend = Some(show);
        self
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn colorscale(mut self, scale: impl Into<String>) -> Self {
        self.colorscale = Some(scale.into());
        self
    }
}

/// A layout annotation drawn in data coordinates.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Shape {
    /// `"rect"` or `"line"`.
    #[serde(rename = "type")]
    pub kind: String,
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fillcolor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

impl Shape {
    pub fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self::new("rect", x0, y0, x1, y1)
    }

    pub fn segment(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self::new("line", x0, y0, x1, y1)
    }

    fn new(kind: &str, x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            kind: kind.to_string(),
            x0,
            y0,
            x1,
            y1,
            line: None,
            fillcolor: None,
            opacity: None,
        }
    }

    pub fn line(mut self, line: Line) -> Self {
        self.line = Some(line);
        self
    }

    pub fn fill(mut self, color: impl Into<String>, opacity: f64) -> Self {
        self.fillcolor = Some(color.into());
        self.opacity = Some(opacity);
        self
    }
}

/// Layout: free-form key/value settings plus typed shapes.
///
/// Keys serialize in sorted order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Layout {
    #[serde(flatten)]
    pub entries: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shapes: Vec<Shape>,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a layout key, replacing any previous value.
    pub fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.entries.insert(key.to_string(), value.into());
        self
    }

    pub fn shape(mut self, shape: Shape) -> Self {
        self.shapes.push(shape);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn title(&self) -> Option<&str> {
        self.get("title").and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scatter_omits_unset_fields() {
        let t = Trace::scatter(Series::values([0.0, 1.0]), Series::values([2.0, 3.0]))
            .mode("lines")
            .line(Line::color("orange").width(3.0));
        let v = serde_json::to_value(&t).unwrap();
        assert_eq!(
            v,
            json!({
                "type": "scatter",
                "x": [0.0, 1.0],
                "y": [2.0, 3.0],
                "mode": "lines",
                "line": {"color": "orange", "width": 3.0}
            })
        );
    }

    #[test]
    fn test_non_finite_values_become_null() {
        let s = Series::values([1.0, f64::NAN, f64::INFINITY, 2.0]);
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v, json!([1.0, null, null, 2.0]));
    }

    #[test]
    fn test_grid_series_roundtrip() {
        let s = Series::grid(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        let text = serde_json::to_string(&s).unwrap();
        let back: Series = serde_json::from_str(&text).unwrap();
        assert_eq!(back, s);
        assert_eq!(back.len(), 2);
        assert!(back.as_flat().is_none());
    }

    #[test]
    fn test_layout_flattens_entries_and_shapes() {
        let layout = Layout::new()
            .set("title", "Solution")
            .set("xaxis_title", "x")
            .shape(Shape::segment(-10.0, 0.0, 10.0, 0.0).line(Line::color("white").width(1.0)));
        let v = serde_json::to_value(&layout).unwrap();
        assert_eq!(v["title"], "Solution");
        assert_eq!(v["xaxis_title"], "x");
        assert_eq!(v["shapes"][0]["type"], "line");
        assert_eq!(v["shapes"][0]["x0"], -10.0);
        assert_eq!(layout.title(), Some("Solution"));
    }

    #[test]
    fn test_layout_without_shapes_has_no_shapes_key() {
        let v = serde_json::to_value(Layout::new().set("title", "t")).unwrap();
        assert!(v.get("shapes").is_none());
    }

    #[test]
    fn test_trace_kind_names() {
        let t = Trace::surface(
            Series::grid(vec![vec![0.0]]),
            Series::grid(vec![vec![0.0]]),
            Series::grid(vec![vec![0.0]]),
        );
        assert_eq!(serde_json::to_value(&t).unwrap()["type"], "surface");
        let t = Trace::scatter3d(
            Series::values([0.0]),
            Series::values([0.0]),
            Series::values([0.0]),
        );
        assert_eq!(serde_json::to_value(&t).unwrap()["type"], "scatter3d");
    }
}
