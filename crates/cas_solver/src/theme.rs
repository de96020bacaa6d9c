//! The dark chart theme shared by every handler.

use cas_api_models::Layout;
use serde_json::{json, Value};

const TRANSPARENT: &str = "rgba(0,0,0,0)";

/// 2D layout: dark template, transparent backgrounds, white font.
pub fn dark_layout(title: impl Into<String>) -> Layout {
    Layout::new()
        .set("title", title.into())
        .set("template", "plotly_dark")
        .set("paper_bgcolor", TRANSPARENT)
        .set("plot_bgcolor", TRANSPARENT)
        .set("font", json!({"color": "white"}))
}

/// 3D layout: dark template, transparent paper, tight margins.
pub fn dark_scene_layout(title: impl Into<String>) -> Layout {
    Layout::new()
        .set("title", title.into())
        .set("template", "plotly_dark")
        .set("paper_bgcolor", TRANSPARENT)
        .set("margin", json!({"l": 0, "r": 0, "b": 0, "t": 40}))
}

/// Axis settings carrying only a title.
pub fn axis_title(text: &str) -> Value {
    json!({ "title": { "text": text } })
}
