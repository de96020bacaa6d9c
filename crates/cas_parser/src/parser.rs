use cas_ast::{BuiltinFn, Constant, Context, Equation, Expr, ExprId};
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, char, digit0, multispace0},
    combinator::{map, opt, recognize, value},
    error::{Error, ErrorKind},
    multi::{many0, many0_count, separated_list0},
    sequence::{delimited, pair, preceded},
    IResult,
};
use num_bigint::BigInt;
use num_rational::BigRational;
use std::cell::Cell;

use crate::error::ParseError;

/// Deepest accepted nesting of brackets, bars, signs and exponents.
pub const MAX_NESTING: usize = 64;
/// Deepest accepted expression tree.
pub const MAX_TREE_DEPTH: usize = 256;

thread_local! {
    static NESTING: Cell<usize> = const { Cell::new(0) };
}

/// Run `parser` one nesting level down. Past [`MAX_NESTING`] the whole
/// parse fails instead of backtracking.
fn nested<'a, O, P>(mut parser: P) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    P: FnMut(&'a str) -> IResult<&'a str, O>,
{
    move |input| {
        let level = NESTING.with(|n| {
            n.set(n.get() + 1);
            n.get()
        });
        let result = if level > MAX_NESTING {
            Err(nom::Err::Failure(Error::new(input, ErrorKind::TooLarge)))
        } else {
            parser(input)
        };
        NESTING.with(|n| n.set(n.get().saturating_sub(1)));
        result
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinOp {
    fn build(self, l: ExprId, r: ExprId) -> Expr {
        match self {
            BinOp::Add => Expr::Add(l, r),
            BinOp::Sub => Expr::Sub(l, r),
            BinOp::Mul => Expr::Mul(l, r),
            BinOp::Div => Expr::Div(l, r),
            BinOp::Pow => Expr::Pow(l, r),
        }
    }
}

/// Parse tree, lowered into a [`Context`] once the whole input is accepted.
#[derive(Debug, Clone)]
enum Node {
    Num(BigRational),
    Const(Constant),
    Var(String),
    Bin(BinOp, Box<Node>, Box<Node>),
    Neg(Box<Node>),
    Call(String, Vec<Node>),
}

fn bin(op: BinOp, l: Node, r: Node) -> Node {
    Node::Bin(op, Box::new(l), Box::new(r))
}

fn neg(n: Node) -> Node {
    Node::Neg(Box::new(n))
}

impl Node {
    fn lower(self, ctx: &mut Context, depth: usize) -> Result<ExprId, ParseError> {
        if depth > MAX_TREE_DEPTH {
            return Err(ParseError::TooDeep(MAX_TREE_DEPTH));
        }
        Ok(match self {
            Node::Num(n) => ctx.number(n),
            Node::Const(c) => ctx.constant(c),
            Node::Var(name) => ctx.var(&name),
            Node::Bin(op, l, r) => {
                let l = l.lower(ctx, depth + 1)?;
                let r = r.lower(ctx, depth + 1)?;
                ctx.add(op.build(l, r))
            }
            Node::Neg(inner) => {
                let inner = inner.lower(ctx, depth + 1)?;
                ctx.add(Expr::Neg(inner))
            }
            Node::Call(name, args) => {
                let args = args
                    .into_iter()
                    .map(|a| a.lower(ctx, depth + 1))
                    .collect::<Result<Vec<_>, _>>()?;
                lower_call(ctx, &name, args)
            }
        })
    }

    /// Whether a factor glued to this node multiplies it: `2x`, `x^2(x+1)`.
    fn takes_implicit_factor(&self) -> bool {
        match self {
            Node::Num(_) | Node::Bin(BinOp::Pow, _, _) => true,
            Node::Bin(BinOp::Mul | BinOp::Div, _, r) => r.takes_implicit_factor(),
            Node::Neg(inner) => inner.takes_implicit_factor(),
            _ => false,
        }
    }
}

/// `exp(u)` is `e^u`; `log(u)` is `ln(u)`; `log(u, b)` is `ln(u) / ln(b)`.
fn lower_call(ctx: &mut Context, name: &str, args: Vec<ExprId>) -> ExprId {
    match (name, args.as_slice()) {
        ("exp", &[u]) => {
            let e = ctx.constant(Constant::E);
            ctx.add(Expr::Pow(e, u))
        }
        ("log", &[u]) => ctx.call_builtin(BuiltinFn::Ln, vec![u]),
        ("log", &[u, base]) => {
            let num = ctx.call_builtin(BuiltinFn::Ln, vec![u]);
            let den = ctx.call_builtin(BuiltinFn::Ln, vec![base]);
            ctx.add(Expr::Div(num, den))
        }
        _ => match BuiltinFn::from_name(name) {
            Some(f) => ctx.call_builtin(f, args),
            None => ctx.call(name, args),
        },
    }
}

fn fail<T>(input: &str, kind: ErrorKind) -> IResult<&str, T> {
    Err(nom::Err::Error(Error::new(input, kind)))
}

fn sym<'a>(s: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    preceded(multispace0, tag(s))
}

/// Decimal literal kept exact: `12`, `8.2`, `.5`, `8.`
fn number(input: &str) -> IResult<&str, Node> {
    let (rest, (whole, frac)) = pair(digit0, opt(preceded(char('.'), digit0)))(input)?;
    let frac = frac.unwrap_or("");
    if whole.is_empty() && frac.is_empty() {
        return fail(input, ErrorKind::Digit);
    }
    let numer: BigInt = format!("{whole}{frac}").parse().unwrap_or_default();
    let denom = BigInt::from(10u32).pow(frac.len() as u32);
    Ok((rest, Node::Num(BigRational::new(numer, denom))))
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0_count(alt((alphanumeric1, tag("_")))),
    ))(input)
}

/// `pi`, `π`, `e`, `E` as whole words only (`exact` is a variable).
fn constant(input: &str) -> IResult<&str, Node> {
    if let Some(rest) = input.strip_prefix('π') {
        return Ok((rest, Node::Const(Constant::Pi)));
    }
    let (rest, word) = identifier(input)?;
    match word {
        "pi" => Ok((rest, Node::Const(Constant::Pi))),
        "e" | "E" => Ok((rest, Node::Const(Constant::E))),
        _ => fail(input, ErrorKind::Tag),
    }
}

fn variable(input: &str) -> IResult<&str, Node> {
    map(identifier, |name: &str| Node::Var(name.to_string()))(input)
}

fn parens(input: &str) -> IResult<&str, Node> {
    delimited(sym("("), nested(expr), sym(")"))(input)
}

fn call(input: &str) -> IResult<&str, Node> {
    let (rest, (name, args)) = pair(
        identifier,
        delimited(sym("("), separated_list0(sym(","), nested(expr)), sym(")")),
    )(input)?;
    Ok((rest, Node::Call(name.to_string(), args)))
}

fn abs_bars(input: &str) -> IResult<&str, Node> {
    map(delimited(sym("|"), nested(expr), sym("|")), |inner| {
        Node::Call("abs".to_string(), vec![inner])
    })(input)
}

/// `√x`, `√(x+1)`, `∛8`
fn radical(input: &str) -> IResult<&str, Node> {
    let (rest, sign) = alt((char('√'), char('∛')))(input)?;
    let (rest, radicand) = alt((parens, nested(postfix)))(rest)?;
    let node = if sign == '√' {
        Node::Call("sqrt".to_string(), vec![radicand])
    } else {
        let third = BigRational::new(BigInt::from(1), BigInt::from(3));
        bin(BinOp::Pow, radicand, Node::Num(third))
    };
    Ok((rest, node))
}

fn atom(input: &str) -> IResult<&str, Node> {
    preceded(
        multispace0,
        alt((radical, number, call, constant, variable, parens, abs_bars)),
    )(input)
}

const SUPERSCRIPT_DIGITS: [char; 10] = ['⁰', '¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹'];

/// A run of superscript digits directly after an atom: `x²`, `r³`.
fn superscript(input: &str) -> Option<(u64, &str)> {
    let mut value = 0u64;
    let mut end = 0;
    for c in input.chars() {
        let Some(d) = SUPERSCRIPT_DIGITS.iter().position(|&s| s == c) else {
            break;
        };
        value = value.saturating_mul(10).saturating_add(d as u64);
        end += c.len_utf8();
    }
    (end > 0).then(|| (value, &input[end..]))
}

fn postfix(input: &str) -> IResult<&str, Node> {
    let (rest, base) = atom(input)?;
    match superscript(rest) {
        Some((n, rest)) => Ok((rest, bin(BinOp::Pow, base, Node::Num(BigRational::from_integer(n.into()))))),
        None => Ok((rest, base)),
    }
}

/// Right-associative `^` (or `**`).
fn power(input: &str) -> IResult<&str, Node> {
    let (rest, base) = postfix(input)?;
    let (rest, exp) = opt(preceded(alt((sym("**"), sym("^"))), nested(exponent)))(rest)?;
    Ok((rest, match exp {
        Some(exp) => bin(BinOp::Pow, base, exp),
        None => base,
    }))
}

/// Exponents may carry their own sign: `x^-2`.
fn exponent(input: &str) -> IResult<&str, Node> {
    preceded(
        multispace0,
        alt((
            map(preceded(char('-'), nested(exponent)), neg),
            preceded(char('+'), nested(exponent)),
            power,
        )),
    )(input)
}

fn unary(input: &str) -> IResult<&str, Node> {
    alt((
        map(preceded(sym("-"), nested(unary)), neg),
        preceded(sym("+"), nested(unary)),
        power,
    ))(input)
}

fn mul_op(input: &str) -> IResult<&str, BinOp> {
    alt((
        value(BinOp::Mul, sym("*")),
        value(BinOp::Mul, sym("·")),
        value(BinOp::Div, sym("/")),
    ))(input)
}

fn add_op(input: &str) -> IResult<&str, BinOp> {
    alt((value(BinOp::Add, sym("+")), value(BinOp::Sub, sym("-"))))(input)
}

/// A factor glued to the previous one with no space: `2x`, `3(x+1)`, `2π`.
fn starts_juxtaposed(input: &str) -> bool {
    input
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '_' | '(' | 'π' | '√'))
}

fn term(input: &str) -> IResult<&str, Node> {
    let (mut rest, first) = unary(input)?;
    let (after, ops) = many0(pair(mul_op, unary))(rest)?;
    rest = after;
    let mut acc = ops.into_iter().fold(first, |acc, (op, rhs)| bin(op, acc, rhs));

    while starts_juxtaposed(rest) && acc.takes_implicit_factor() {
        let Ok((after, factor)) = power(rest) else {
            break;
        };
        acc = bin(BinOp::Mul, acc, factor);
        rest = after;
    }
    Ok((rest, acc))
}

fn expr(input: &str) -> IResult<&str, Node> {
    let (rest, first) = term(input)?;
    let (rest, ops) = many0(pair(add_op, term))(rest)?;
    Ok((rest, ops.into_iter().fold(first, |acc, (op, rhs)| bin(op, acc, rhs))))
}

/// Parse an infix expression into `ctx`.
///
/// Accepts `+ - * / ^ **`, parentheses, `|x|`, function calls, decimals
/// (kept exact), `pi`/`π`/`e`, superscript exponents and implicit
/// multiplication after a number (`2x`, `3(x+1)`).
pub fn parse(input: &str, ctx: &mut Context) -> Result<ExprId, ParseError> {
    if input.trim().is_empty() {
        return Err(ParseError::Empty);
    }
    NESTING.with(|n| n.set(0));
    let (rest, tree) = expr(input).map_err(|e| match e {
        nom::Err::Failure(err) if err.code == ErrorKind::TooLarge => {
            ParseError::TooDeep(MAX_NESTING)
        }
        e => ParseError::NomError(e.to_string()),
    })?;
    let rest = rest.trim();
    if !rest.is_empty() {
        return Err(ParseError::UnconsumedInput(rest.to_string()));
    }
    tree.lower(ctx, 0)
}

/// Parse `lhs = rhs`, splitting at the first `=`.
/// Input without `=` is read as `expr = 0`.
pub fn parse_equation(input: &str, ctx: &mut Context) -> Result<Equation, ParseError> {
    match input.split_once('=') {
        Some((lhs, rhs)) => {
            let lhs = parse(lhs, ctx)?;
            let rhs = parse(rhs, ctx)?;
            Ok(Equation::new(lhs, rhs))
        }
        None => {
            let expr = parse(input, ctx)?;
            Ok(Equation::from_expr(ctx, expr))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cas_ast::DisplayExpr;

    fn show(input: &str) -> String {
        let mut ctx = Context::new();
        let id = parse(input, &mut ctx).unwrap();
        DisplayExpr { context: &ctx, id }.to_string()
    }

    #[test]
    fn test_numbers_stay_exact() {
        for (input, expected) in [("123", "123"), ("8.2", "41/5"), ("0.5", "1/2"), (".25", "1/4"), ("8.", "8")] {
            assert_eq!(show(input), expected, "input: {input}");
        }
    }

    #[test]
    fn test_precedence_and_grouping() {
        assert_eq!(show("1 + 2 * 3"), "1 + 2 * 3");
        assert_eq!(show("(1 + 2) * 3"), "(1 + 2) * 3");
        assert_eq!(show("a - b - c"), "a - b - c");
        assert_eq!(show("-x^2"), "-x^2");
    }

    #[test]
    fn test_power_spellings() {
        assert_eq!(show("x^2"), "x^2");
        assert_eq!(show("x**2"), "x^2");
        assert_eq!(show("x²"), "x^2");
        assert_eq!(show("2^3^4"), "2^3^4");
        assert_eq!(show("x^-2"), "x^(-2)");
    }

    #[test]
    fn test_implicit_multiplication() {
        assert_eq!(show("2x"), "2 * x");
        assert_eq!(show("3(x + 1)"), "3 * (x + 1)");
        assert_eq!(show("2sin(x)"), "2 * sin(x)");
        assert_eq!(show("2pi"), "2 * pi");
        assert_eq!(show("x1"), "x1");
    }

    #[test]
    fn test_constants_are_whole_words() {
        assert_eq!(show("pi"), "pi");
        assert_eq!(show("π"), "pi");
        assert_eq!(show("exact"), "exact");
    }

    #[test]
    fn test_call_lowering() {
        assert_eq!(show("exp(x)"), "e^x");
        assert_eq!(show("log(x)"), "ln(x)");
        assert_eq!(show("log(8, 2)"), "ln(8) / ln(2)");
        assert_eq!(show("arctan(x)"), "atan(x)");
        assert_eq!(show("|x|"), "abs(x)");
        assert_eq!(show("√x"), "sqrt(x)");
        assert_eq!(show("∛8"), "8^(1/3)");
        assert_eq!(show("f(x)"), "f(x)");
    }

    #[test]
    fn test_errors() {
        let mut ctx = Context::new();
        assert_eq!(parse("   ", &mut ctx), Err(ParseError::Empty));
        assert!(matches!(parse("x +", &mut ctx), Err(ParseError::UnconsumedInput(_))));
        assert!(parse("x $ 2", &mut ctx).is_err());
        assert!(parse(")", &mut ctx).is_err());
    }

    #[test]
    fn test_nesting_limit() {
        let mut ctx = Context::new();
        let ok = format!("{}x{}", "(".repeat(MAX_NESTING), ")".repeat(MAX_NESTING));
        assert!(parse(&ok, &mut ctx).is_ok());

        let deep = format!("{}x{}", "(".repeat(999), ")".repeat(999));
        assert_eq!(parse(&deep, &mut ctx), Err(ParseError::TooDeep(MAX_NESTING)));
        let signs = format!("{}x", "-".repeat(999));
        assert_eq!(parse(&signs, &mut ctx), Err(ParseError::TooDeep(MAX_NESTING)));
        let tower = vec!["2"; 500].join("^");
        assert_eq!(parse(&tower, &mut ctx), Err(ParseError::TooDeep(MAX_NESTING)));

        // the counter starts over for each parse
        assert!(parse(&ok, &mut ctx).is_ok());
    }

    #[test]
    fn test_long_flat_sums_hit_tree_depth_limit() {
        let mut ctx = Context::new();
        let short = vec!["1"; 100].join("+");
        assert!(parse(&short, &mut ctx).is_ok());
        let long = vec!["1"; 900].join("+");
        assert_eq!(parse(&long, &mut ctx), Err(ParseError::TooDeep(MAX_TREE_DEPTH)));
    }

    #[test]
    fn test_equation_split() {
        let mut ctx = Context::new();
        let eq = parse_equation("x^2 - 4 = 0", &mut ctx).unwrap();
        let lhs = DisplayExpr { context: &ctx, id: eq.lhs }.to_string();
        assert_eq!(lhs, "x^2 - 4");
        assert_eq!(eq.rhs, ctx.num(0));

        let eq = parse_equation("2x + 1", &mut ctx).unwrap();
        assert_eq!(eq.rhs, ctx.num(0));

        assert!(parse_equation("x = 1 = 2", &mut ctx).is_err());
    }
}
