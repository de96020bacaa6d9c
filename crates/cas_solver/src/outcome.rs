use cas_api_models::SolutionResponse;

use crate::SolverError;

/// What a handler made of the input.
#[derive(Debug)]
pub enum SolveOutcome {
    /// The handler recognized the problem and solved it.
    Solved(SolutionResponse),
    /// The problem is not for this handler; the router tries the next rule.
    NoMatch,
    /// The handler recognized the problem but could not solve it.
    Failed(SolverError),
}

impl From<Result<Option<SolutionResponse>, SolverError>> for SolveOutcome {
    fn from(result: Result<Option<SolutionResponse>, SolverError>) -> Self {
        match result {
            Ok(Some(resp)) => SolveOutcome::Solved(resp),
            Ok(None) => SolveOutcome::NoMatch,
            Err(e) => SolveOutcome::Failed(e),
        }
    }
}

impl From<Option<SolutionResponse>> for SolveOutcome {
    fn from(found: Option<SolutionResponse>) -> Self {
        match found {
            Some(resp) => SolveOutcome::Solved(resp),
            None => SolveOutcome::NoMatch,
        }
    }
}
