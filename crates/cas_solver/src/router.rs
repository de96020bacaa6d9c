//! Ordered intent table: the first rule whose predicate applies and whose
//! handler produces an answer wins. A terminal rule that applies but finds
//! nothing ends routing with the unrecognized payload.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::LazyLock;

use cas_api_models::SolutionResponse;
use tracing::{debug, info, warn};

use crate::extract::triangle_sides;
use crate::handlers::{algebra, calculus, distance, geometry, physics, spatial};
use crate::{SolveOutcome, SolverError};

static STANDARD: LazyLock<IntentRouter> = LazyLock::new(IntentRouter::standard);

/// Route `text` through the standard intent table.
pub fn solve(text: &str) -> SolutionResponse {
    STANDARD.route(text)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Physics,
    PlanarDistance,
    Spatial,
    Calculus,
    Geometry,
    Algebra,
}

/// The input as seen by rule predicates.
#[derive(Debug, Clone)]
pub struct Query<'a> {
    pub raw: &'a str,
    pub lower: String,
}

impl<'a> Query<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self {
            raw,
            lower: raw.to_lowercase(),
        }
    }

    pub fn mentions(&self, word: &str) -> bool {
        self.lower.contains(word)
    }
}

#[derive(Clone, Copy)]
pub struct IntentRule {
    pub intent: Intent,
    pub applies: fn(&Query) -> bool,
    pub handler: fn(&str) -> SolveOutcome,
    /// `NoMatch` stops routing instead of trying later rules.
    pub terminal: bool,
}

impl std::fmt::Debug for IntentRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntentRule")
            .field("intent", &self.intent)
            .field("terminal", &self.terminal)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct IntentRouter {
    rules: Vec<IntentRule>,
}

impl Default for IntentRouter {
    fn default() -> Self {
        Self::standard()
    }
}

impl IntentRouter {
    pub fn new(rules: Vec<IntentRule>) -> Self {
        Self { rules }
    }

    /// Physics, planar distance, spatial, calculus, geometry, algebra.
    pub fn standard() -> Self {
        Self::new(vec![
            IntentRule {
                intent: Intent::Physics,
                applies: |q| q.mentions("projectile"),
                handler: physics::solve,
                terminal: true,
            },
            IntentRule {
                intent: Intent::PlanarDistance,
                applies: |q| q.mentions("distance") && !q.mentions("3d"),
                handler: distance::solve,
                terminal: false,
            },
            IntentRule {
                intent: Intent::Spatial,
                applies: |q| q.mentions("3d") || q.mentions("sphere"),
                handler: spatial::solve,
                terminal: false,
            },
            IntentRule {
                intent: Intent::Calculus,
                applies: |q| calculus::Operation::detect(&q.lower).is_some(),
                handler: calculus::solve,
                terminal: false,
            },
            IntentRule {
                intent: Intent::Geometry,
                applies: |q| triangle_sides(&q.lower).is_some(),
                handler: geometry::solve,
                terminal: false,
            },
            IntentRule {
                intent: Intent::Algebra,
                applies: |_| true,
                handler: algebra::solve,
                terminal: false,
            },
        ])
    }

    /// Intents whose predicates apply to `text`, in priority order.
    pub fn classify(&self, text: &str) -> Vec<Intent> {
        let query = Query::new(text);
        self.rules
            .iter()
            .filter(|rule| (rule.applies)(&query))
            .map(|rule| rule.intent)
            .collect()
    }

    pub fn route(&self, text: &str) -> SolutionResponse {
        let query = Query::new(text);
        let candidates: Vec<&IntentRule> = self
            .rules
            .iter()
            .filter(|rule| (rule.applies)(&query))
            .collect();
        debug!(
            intents = ?candidates.iter().map(|rule| rule.intent).collect::<Vec<_>>(),
            "classified"
        );

        for rule in candidates {
            debug!(intent = ?rule.intent, "trying handler");
            match run_guarded(rule.handler, text) {
                SolveOutcome::Solved(resp) => {
                    info!(intent = ?rule.intent, "solved");
                    return resp;
                }
                SolveOutcome::NoMatch if rule.terminal => {
                    info!(intent = ?rule.intent, "terminal rule found no parameters");
                    return SolutionResponse::unrecognized();
                }
                SolveOutcome::NoMatch => continue,
                SolveOutcome::Failed(err) => {
                    warn!(intent = ?rule.intent, error = %err, "handler failed");
                    return SolutionResponse::error(err.to_string());
                }
            }
        }
        info!("no handler recognized the query");
        SolutionResponse::unrecognized()
    }
}

fn run_guarded(handler: fn(&str) -> SolveOutcome, text: &str) -> SolveOutcome {
    catch_unwind(AssertUnwindSafe(|| handler(text))).unwrap_or_else(|payload| {
        let msg = panic_message(payload.as_ref());
        warn!(panic = %msg, "handler panicked");
        SolveOutcome::Failed(SolverError::Internal(msg))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boom(_: &str) -> SolveOutcome {
        panic!("kaboom")
    }

    fn pass(_: &str) -> SolveOutcome {
        SolveOutcome::NoMatch
    }

    #[test]
    fn test_classify_order() {
        let router = IntentRouter::standard();
        assert_eq!(
            router.classify("projectile distance problem"),
            vec![Intent::Physics, Intent::PlanarDistance, Intent::Algebra]
        );
        assert_eq!(
            router.classify("3d distance (0,0,0) (1,1,1)"),
            vec![Intent::Spatial, Intent::Algebra]
        );
        assert_eq!(router.classify("x^2 = 4"), vec![Intent::Algebra]);
    }

    #[test]
    fn test_panic_becomes_error_payload() {
        let router = IntentRouter::new(vec![IntentRule {
            intent: Intent::Algebra,
            applies: |_| true,
            handler: boom,
            terminal: false,
        }]);
        let resp = router.route("anything");
        assert_eq!(resp.solution_latex, "\\text{Error}");
        assert_eq!(resp.steps, vec!["Internal error: kaboom".to_string()]);
        assert!(resp.plot_data.is_none());
    }

    fn answer(_: &str) -> SolveOutcome {
        SolveOutcome::Solved(SolutionResponse::new("ok", vec!["done".to_string()]))
    }

    fn rule(intent: Intent, handler: fn(&str) -> SolveOutcome, terminal: bool) -> IntentRule {
        IntentRule {
            intent,
            applies: |_| true,
            handler,
            terminal,
        }
    }

    #[test]
    fn test_no_match_falls_through() {
        let router = IntentRouter::new(vec![rule(Intent::Physics, pass, false)]);
        assert_eq!(router.route("x"), SolutionResponse::unrecognized());

        let router = IntentRouter::new(vec![
            rule(Intent::PlanarDistance, pass, false),
            rule(Intent::Algebra, answer, false),
        ]);
        assert_eq!(router.route("x").solution_latex, "ok");
    }

    #[test]
    fn test_terminal_no_match_stops_routing() {
        let router = IntentRouter::new(vec![
            rule(Intent::Physics, pass, true),
            rule(Intent::Algebra, answer, false),
        ]);
        assert_eq!(router.route("x"), SolutionResponse::unrecognized());
    }

    #[test]
    fn test_projectile_without_parameters_is_unrecognized() {
        assert_eq!(solve("projectile"), SolutionResponse::unrecognized());
        assert_eq!(
            solve("projectile distance problem from (0, 0) to (3, 4)"),
            SolutionResponse::unrecognized()
        );
    }
}
