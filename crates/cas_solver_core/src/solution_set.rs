use cas_ast::ExprId;

/// A real root: the exact form when one was found, and its f64 value.
#[derive(Debug, Clone, PartialEq)]
pub struct Root {
    pub exact: Option<ExprId>,
    pub approx: f64,
}

impl Root {
    pub fn exact(id: ExprId, approx: f64) -> Self {
        Self {
            exact: Some(id),
            approx,
        }
    }

    pub fn approx(approx: f64) -> Self {
        Self {
            exact: None,
            approx,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SolutionSet {
    /// Every real number satisfies the equation.
    AllReals,
    /// No real solution.
    Empty,
    /// Finitely many real roots, ascending and distinct.
    Roots(Vec<Root>),
}

impl SolutionSet {
    /// Build from unordered roots; sorts and drops near-duplicates.
    pub fn from_roots(mut roots: Vec<Root>) -> Self {
        roots.retain(|r| r.approx.is_finite());
        roots.sort_by(|a, b| a.approx.total_cmp(&b.approx));
        roots.dedup_by(|b, a| (a.approx - b.approx).abs() < 1e-9 * (1.0 + a.approx.abs()));
        if roots.is_empty() {
            SolutionSet::Empty
        } else {
            SolutionSet::Roots(roots)
        }
    }

    pub fn roots(&self) -> &[Root] {
        match self {
            SolutionSet::Roots(r) => r,
            SolutionSet::AllReals | SolutionSet::Empty => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_roots_sorts_and_dedups() {
        let set = SolutionSet::from_roots(vec![
            Root::approx(2.0),
            Root::approx(-1.0),
            Root::approx(2.0 + 1e-12),
        ]);
        let values: Vec<f64> = set.roots().iter().map(|r| r.approx).collect();
        assert_eq!(values, vec![-1.0, 2.0]);
    }

    #[test]
    fn test_from_roots_empty() {
        assert_eq!(SolutionSet::from_roots(vec![]), SolutionSet::Empty);
    }
}
