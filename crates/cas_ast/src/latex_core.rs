//! Leaf rendering helpers shared by the LaTeX printer.

use crate::{BuiltinFn, Constant};
use num_rational::BigRational;
use num_traits::Signed;

const GREEK: &[&str] = &[
    "alpha", "beta", "gamma", "delta", "epsilon", "theta", "lambda", "mu", "rho", "sigma", "tau",
    "phi", "omega",
];

/// Render a rational number as LaTeX.
/// Negative fractions are rendered as `-\frac{a}{b}` instead of `\frac{-a}{b}`.
pub fn render_number(n: &BigRational) -> String {
    if n.is_integer() {
        format!("{}", n.numer())
    } else if n.is_negative() {
        let positive = -n;
        format!("-\\frac{{{}}}{{{}}}", positive.numer(), positive.denom())
    } else {
        format!("\\frac{{{}}}{{{}}}", n.numer(), n.denom())
    }
}

pub fn render_constant(c: &Constant) -> String {
    match c {
        Constant::Pi => "\\pi".to_string(),
        Constant::E => "e".to_string(),
        Constant::Undefined => "\\text{undefined}".to_string(),
    }
}

pub fn render_variable(name: &str) -> String {
    if GREEK.contains(&name) {
        format!("\\{}", name)
    } else {
        name.to_string()
    }
}

/// Render a function application given its already-rendered arguments.
pub fn render_function(name: &str, args: &[String]) -> String {
    let builtin = BuiltinFn::from_name(name);
    match (builtin, args) {
        (Some(BuiltinFn::Sqrt), [arg]) => format!("\\sqrt{{{}}}", arg),
        (Some(BuiltinFn::Abs), [arg]) => format!("|{}|", arg),
        (Some(BuiltinFn::Asin), [arg]) => format!("\\arcsin({})", arg),
        (Some(BuiltinFn::Acos), [arg]) => format!("\\arccos({})", arg),
        (Some(BuiltinFn::Atan), [arg]) => format!("\\arctan({})", arg),
        (Some(b), [arg]) => format!("\\{}({})", b.name(), arg),
        _ => format!("\\text{{{}}}({})", name, args.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    #[test]
    fn test_negative_fraction_sign_outside() {
        let n = BigRational::new(BigInt::from(-1), BigInt::from(2));
        assert_eq!(render_number(&n), "-\\frac{1}{2}");
    }

    #[test]
    fn test_function_names() {
        let x = vec!["x".to_string()];
        assert_eq!(render_function("sin", &x), "\\sin(x)");
        assert_eq!(render_function("arctan", &x), "\\arctan(x)");
        assert_eq!(render_function("abs", &x), "|x|");
        assert_eq!(render_function("gamma", &x), "\\text{gamma}(x)");
    }

    #[test]
    fn test_greek_variables() {
        assert_eq!(render_variable("theta"), "\\theta");
        assert_eq!(render_variable("t"), "t");
    }
}
