//! Word-problem solving: an ordered intent router over six handlers.
//!
//! [`solve`] is the single entry point used by the HTTP service. Every
//! handler is a plain `fn(&str) -> SolveOutcome`; the router decides which
//! one answers and converts failures into the error payload.

pub mod error;
pub mod extract;
pub mod format;
pub mod handlers;
pub mod outcome;
pub mod router;
pub mod theme;

pub use error::SolverError;
pub use outcome::SolveOutcome;
pub use router::{solve, Intent, IntentRouter, IntentRule, Query};
