//! Keyword and number extraction from free text.
//!
//! Numbers are plain decimal literals (`12`, `8.5`, `-3`); there are no
//! exponents, fractions or units. The first match wins.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Zero};
use regex::Regex;
use std::sync::LazyLock;

use cas_math::numeric::rational_to_f64;

const NUM: &str = r"(-?\d+\.?\d*)";

static VELOCITY: LazyLock<Regex> = LazyLock::new(|| labelled(r"velocity"));
static ANGLE: LazyLock<Regex> = LazyLock::new(|| labelled(r"angle"));
static RADIUS: LazyLock<Regex> = LazyLock::new(|| labelled(r"radius"));

static POINT_2D: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\(\s*{NUM}\s*,\s*{NUM}\s*\)")).expect("valid 2d point regex")
});

static POINT_3D: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\(\s*{NUM}\s*,\s*{NUM}\s*,\s*{NUM}\s*\)"))
        .expect("valid 3d point regex")
});

static TRIANGLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(hypotenuse|triangle).*sides.*?(\d+\.?\d*).*?(\d+\.?\d*)")
        .expect("valid triangle regex")
});

// labels take unsigned magnitudes
fn labelled(label: &str) -> Regex {
    Regex::new(&format!(r"{label}\s*(\d+\.?\d*)")).expect("valid labelled-number regex")
}

/// A number read from the input: the literal as written plus its exact
/// and floating values.
#[derive(Debug, Clone, PartialEq)]
pub struct Num {
    pub text: String,
    pub exact: BigRational,
    pub value: f64,
}

impl Num {
    pub fn parse(text: &str) -> Option<Self> {
        let exact = parse_decimal(text)?;
        Some(Self {
            text: text.to_string(),
            value: rational_to_f64(&exact),
            exact,
        })
    }
}

/// Exact value of a decimal literal such as `-8.25` or `3.`.
pub fn parse_decimal(text: &str) -> Option<BigRational> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let (whole, frac) = digits.split_once('.').unwrap_or((digits, ""));
    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let numer: BigInt = format!("{whole}{frac}").parse().ok()?;
    let mut denom = BigInt::one();
    for _ in 0..frac.len() {
        denom *= 10;
    }
    let value = BigRational::new(numer, denom);
    Some(if negative { -value } else { value })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Velocity,
    Angle,
    Radius,
}

/// The number following `label`, e.g. `velocity 20` or `radius5`.
pub fn labelled_number(text: &str, label: Label) -> Option<Num> {
    let re = match label {
        Label::Velocity => &*VELOCITY,
        Label::Angle => &*ANGLE,
        Label::Radius => &*RADIUS,
    };
    re.captures(text).and_then(|c| Num::parse(&c[1]))
}

/// Every `(a, b)` pair in order of appearance.
pub fn points_2d(text: &str) -> Vec<[Num; 2]> {
    POINT_2D
        .captures_iter(text)
        .filter_map(|c| Some([Num::parse(&c[1])?, Num::parse(&c[2])?]))
        .collect()
}

/// Every `(a, b, c)` triple in order of appearance.
pub fn points_3d(text: &str) -> Vec<[Num; 3]> {
    POINT_3D
        .captures_iter(text)
        .filter_map(|c| {
            Some([
                Num::parse(&c[1])?,
                Num::parse(&c[2])?,
                Num::parse(&c[3])?,
            ])
        })
        .collect()
}

/// The two legs of `"... triangle ... sides A ... B"`.
pub fn triangle_sides(text: &str) -> Option<(Num, Num)> {
    let caps = TRIANGLE.captures(text)?;
    Some((Num::parse(&caps[2])?, Num::parse(&caps[3])?))
}

/// Remove each of `words` (ASCII case-insensitive) together with the
/// whitespace after it, then a leading filler "of".
///
/// Longer words should come first when one is a prefix of another.
pub fn strip_keywords(text: &str, words: &[&str]) -> String {
    let mut out = text.to_string();
    for word in words {
        out = remove_word(&out, word);
    }
    let trimmed = out.trim();
    let lower = trimmed.to_ascii_lowercase();
    match lower.strip_prefix("of") {
        Some(rest) if rest.starts_with(char::is_whitespace) || rest.starts_with('(') => {
            trimmed[2..].trim_start().to_string()
        }
        _ => trimmed.to_string(),
    }
}

fn remove_word(text: &str, word: &str) -> String {
    if word.is_empty() {
        return text.to_string();
    }
    let lower = text.to_ascii_lowercase();
    let needle = word.to_ascii_lowercase();
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    while let Some(found) = lower[cursor..].find(&needle) {
        let start = cursor + found;
        out.push_str(&text[cursor..start]);
        let mut end = start + needle.len();
        while let Some(c) = text[end..].chars().next().filter(|c| c.is_whitespace()) {
            end += c.len_utf8();
        }
        cursor = end;
    }
    out.push_str(&text[cursor..]);
    out
}

/// Render an exact decimal-origin rational as a plain decimal string.
///
/// Integers print without a fractional part; values that do not terminate
/// within 30 digits fall back to the float rendering.
pub fn decimal_text(r: &BigRational) -> String {
    if r.is_integer() {
        return r.numer().to_string();
    }
    let mut scaled = r.clone();
    let ten = BigRational::from_integer(BigInt::from(10));
    for places in 1..=30usize {
        scaled *= &ten;
        if scaled.is_integer() {
            let digits = scaled.numer().magnitude().to_string();
            let digits = format!("{:0>width$}", digits, width = places + 1);
            let (whole, frac) = digits.split_at(digits.len() - places);
            let sign = if r < &BigRational::zero() { "-" } else { "" };
            return format!("{sign}{whole}.{frac}");
        }
    }
    format!("{:?}", rational_to_f64(r))
}
