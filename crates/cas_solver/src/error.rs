use cas_engine::CalculusError;
use cas_parser::ParseError;
use cas_solver_core::SolveError;
use thiserror::Error;

/// Handler-level failure. The `Display` text is shown to the user verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Calculus(#[from] CalculusError),

    #[error("Unsupported: {0}")]
    Unsupported(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<SolveError> for SolverError {
    fn from(e: SolveError) -> Self {
        SolverError::Internal(e.to_string())
    }
}

impl SolverError {
    /// More than one free symbol where a single variable is expected.
    pub fn multiple_variables<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let listed: Vec<String> = names
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect();
        SolverError::Unsupported(format!(
            "expected a single variable, found {}",
            listed.join(", ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiple_variables_message() {
        let e = SolverError::multiple_variables(["x", "y"]);
        assert_eq!(
            e.to_string(),
            "Unsupported: expected a single variable, found x, y"
        );
    }

    #[test]
    fn test_parse_error_is_transparent() {
        let e: SolverError = ParseError::Empty.into();
        assert_eq!(e.to_string(), "Empty expression");
    }
}
