//! Number formatting for result LaTeX and step text.

use cas_ast::{Context, ExprId, LaTeXExpr};
use cas_math::numeric::eval_const;

/// Fixed four decimal places: `63.7105`.
pub fn fixed4(v: f64) -> String {
    format!("{:.4}", v)
}

/// Round half away from zero to `places` decimals.
pub fn round_to(v: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (v * scale).round() / scale
}

/// Shortest round-trip float text, always with a fractional part: `50.0`, `127.42`.
pub fn float_text(v: f64) -> String {
    format!("{:?}", v)
}

/// Four significant digits: `4.243`, `523.6`, `0.1235`.
pub fn sig4(v: f64) -> String {
    if v == 0.0 || !v.is_finite() {
        return format!("{}", v);
    }
    let magnitude = v.abs().log10().floor() as i32;
    let decimals = (3 - magnitude).max(0) as usize;
    format!("{:.*}", decimals, v)
}

pub fn latex(ctx: &Context, id: ExprId) -> String {
    LaTeXExpr { context: ctx, id }.to_latex()
}

/// The exact LaTeX of a constant expression, followed by `\approx` and four
/// significant digits unless the value is a plain rational.
pub fn exact_with_approx(ctx: &Context, id: ExprId) -> String {
    let exact = latex(ctx, id);
    if ctx.as_number(id).is_some() {
        return exact;
    }
    match eval_const(ctx, id) {
        Ok(v) if v.is_finite() => format!("{} \\approx {}", exact, sig4(v)),
        _ => exact,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cas_parser::parse;

    #[test]
    fn test_fixed_and_rounded() {
        assert_eq!(fixed4(63.710_499_9), "63.7105");
        assert_eq!(round_to(127.4235, 2), 127.42);
        assert_eq!(float_text(50.0), "50.0");
        assert_eq!(float_text(round_to(2.0 / 3.0, 2)), "0.67");
    }

    #[test]
    fn test_sig4() {
        assert_eq!(sig4(18f64.sqrt()), "4.243");
        assert_eq!(sig4(523.598_775), "523.6");
        assert_eq!(sig4(0.123_456), "0.1235");
        assert_eq!(sig4(12345.6), "12346");
        assert_eq!(sig4(0.0), "0");
    }

    #[test]
    fn test_exact_with_approx() {
        let mut ctx = Context::new();
        let three = ctx.num(3);
        assert_eq!(exact_with_approx(&ctx, three), "3");
        let root = parse("sqrt(2)", &mut ctx).unwrap();
        assert_eq!(exact_with_approx(&ctx, root), "\\sqrt{2} \\approx 1.414");
    }
}
