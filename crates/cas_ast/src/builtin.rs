//! Builtin function identifiers.
//!
//! Rules match on [`BuiltinFn`] instead of comparing names, so an exhaustive
//! `match` shows every place a new builtin must be handled.

/// Functions the engine knows how to simplify, differentiate and evaluate.
///
/// `exp` and `log` are not listed: the parser lowers them to `e^u` and
/// `ln` respectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinFn {
    // Trigonometric
    Sin,
    Cos,
    Tan,

    // Inverse trigonometric
    Asin,
    Acos,
    Atan,

    // Hyperbolic
    Sinh,
    Cosh,
    Tanh,

    Ln,
    Sqrt,
    Abs,
}

impl BuiltinFn {
    pub const ALL: [BuiltinFn; 12] = [
        BuiltinFn::Sin,
        BuiltinFn::Cos,
        BuiltinFn::Tan,
        BuiltinFn::Asin,
        BuiltinFn::Acos,
        BuiltinFn::Atan,
        BuiltinFn::Sinh,
        BuiltinFn::Cosh,
        BuiltinFn::Tanh,
        BuiltinFn::Ln,
        BuiltinFn::Sqrt,
        BuiltinFn::Abs,
    ];

    /// Canonical surface name.
    pub const fn name(self) -> &'static str {
        match self {
            BuiltinFn::Sin => "sin",
            BuiltinFn::Cos => "cos",
            BuiltinFn::Tan => "tan",
            BuiltinFn::Asin => "asin",
            BuiltinFn::Acos => "acos",
            BuiltinFn::Atan => "atan",
            BuiltinFn::Sinh => "sinh",
            BuiltinFn::Cosh => "cosh",
            BuiltinFn::Tanh => "tanh",
            BuiltinFn::Ln => "ln",
            BuiltinFn::Sqrt => "sqrt",
            BuiltinFn::Abs => "abs",
        }
    }

    /// Look up a builtin by name. The `arc*` spellings are accepted as aliases.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "arcsin" => return Some(BuiltinFn::Asin),
            "arccos" => return Some(BuiltinFn::Acos),
            "arctan" => return Some(BuiltinFn::Atan),
            _ => {}
        }
        Self::ALL.iter().copied().find(|b| b.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_roundtrip() {
        for b in BuiltinFn::ALL {
            assert_eq!(BuiltinFn::from_name(b.name()), Some(b));
        }
    }

    #[test]
    fn test_aliases_and_unknown() {
        assert_eq!(BuiltinFn::from_name("arctan"), Some(BuiltinFn::Atan));
        assert_eq!(BuiltinFn::from_name("frobnicate"), None);
    }
}
