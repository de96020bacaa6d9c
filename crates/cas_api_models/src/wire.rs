//! Request and response bodies for the HTTP endpoints.

use serde::{Deserialize, Serialize};

use crate::PlotData;

/// Body of `POST /solve`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SolveRequest {
    pub problem: String,
}

/// A worked solution: LaTeX result, derivation steps and an optional chart.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SolutionResponse {
    pub solution_latex: String,
    pub steps: Vec<String>,
    /// Always present on the wire; `null` when there is no chart.
    #[serde(rename = "plotData")]
    pub plot_data: Option<PlotData>,
}

impl SolutionResponse {
    pub fn new(solution_latex: impl Into<String>, steps: Vec<String>) -> Self {
        Self {
            solution_latex: solution_latex.into(),
            steps,
            plot_data: None,
        }
    }

    pub fn with_plot(mut self, plot: PlotData) -> Self {
        self.plot_data = Some(plot);
        self
    }

    /// The generic failure payload; `message` is shown to the user as-is.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new("\\text{Error}", vec![message.into()])
    }

    /// The payload for input no handler recognizes.
    pub fn unrecognized() -> Self {
        Self::new(
            "\\text{Could not interpret query}",
            vec!["Try 'help' or check examples.".to_string()],
        )
    }
}

/// Body of `GET /`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
}

impl StatusResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unrecognized_payload_shape() {
        let v = serde_json::to_value(SolutionResponse::unrecognized()).unwrap();
        assert_eq!(
            v,
            json!({
                "solution_latex": "\\text{Could not interpret query}",
                "steps": ["Try 'help' or check examples."],
                "plotData": null
            })
        );
    }

    #[test]
    fn test_error_payload_shape() {
        let v = serde_json::to_value(SolutionResponse::error("boom")).unwrap();
        assert_eq!(
            v,
            json!({"solution_latex": "\\text{Error}", "steps": ["boom"], "plotData": null})
        );
    }

    #[test]
    fn test_request_roundtrip() {
        let req: SolveRequest = serde_json::from_str(r#"{"problem": "x^2 - 4 = 0"}"#).unwrap();
        assert_eq!(req.problem, "x^2 - 4 = 0");
    }
}
