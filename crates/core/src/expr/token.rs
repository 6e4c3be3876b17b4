//! Scanner producing a tagged token stream from expression text.
//!
//! The scanner extracts decimal numbers, the six operator/grouping characters
//! and maximal runs of ASCII letters. Whitespace and any other character are
//! skipped. Identifiers are resolved once, here, against the fixed variable
//! and function tables so the evaluator never compares strings.

use std::fmt;

/// A bound variable of the vector field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Var {
    X,
    Y,
    A,
    B,
}

impl Var {
    /// Slot of this variable in [`Bindings`](super::Bindings).
    pub(crate) fn slot(self) -> usize {
        match self {
            Var::X => 0,
            Var::Y => 1,
            Var::A => 2,
            Var::B => 3,
        }
    }
}

/// A built-in unary function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Func {
    Sin,
    Cos,
    Tan,
    Exp,
    Sqrt,
}

impl Func {
    /// Applies the function to its argument.
    pub fn apply(self, v: f64) -> f64 {
        match self {
            Func::Sin => v.sin(),
            Func::Cos => v.cos(),
            Func::Tan => v.tan(),
            Func::Exp => v.exp(),
            Func::Sqrt => v.sqrt(),
        }
    }

    /// Name as written in an expression.
    pub fn name(self) -> &'static str {
        match self {
            Func::Sin => "sin",
            Func::Cos => "cos",
            Func::Tan => "tan",
            Func::Exp => "exp",
            Func::Sqrt => "sqrt",
        }
    }
}

/// Binary operator or grouping symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

impl Symbol {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Symbol::Plus),
            '-' => Some(Symbol::Minus),
            '*' => Some(Symbol::Star),
            '/' => Some(Symbol::Slash),
            '^' => Some(Symbol::Caret),
            '(' => Some(Symbol::LParen),
            ')' => Some(Symbol::RParen),
            _ => None,
        }
    }

    fn as_char(self) -> char {
        match self {
            Symbol::Plus => '+',
            Symbol::Minus => '-',
            Symbol::Star => '*',
            Symbol::Slash => '/',
            Symbol::Caret => '^',
            Symbol::LParen => '(',
            Symbol::RParen => ')',
        }
    }
}

/// A single scanned token.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Var(Var),
    Func(Func),
    Symbol(Symbol),
    /// Identifier that matched neither table. Reported when the parser reaches it.
    Unknown(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(v) => write!(f, "{v}"),
            Token::Var(v) => {
                let name = VARIABLES
                    .iter()
                    .find(|(_, var)| var == v)
                    .map_or("?", |(name, _)| *name);
                write!(f, "{name}")
            }
            Token::Func(func) => write!(f, "{}", func.name()),
            Token::Symbol(s) => write!(f, "{}", s.as_char()),
            Token::Unknown(name) => write!(f, "{name}"),
        }
    }
}

/// Variable names, checked before functions.
const VARIABLES: &[(&str, Var)] = &[("x", Var::X), ("y", Var::Y), ("a", Var::A), ("b", Var::B)];

const FUNCTIONS: &[(&str, Func)] = &[
    ("sin", Func::Sin),
    ("cos", Func::Cos),
    ("tan", Func::Tan),
    ("exp", Func::Exp),
    ("sqrt", Func::Sqrt),
];

fn resolve_identifier(name: &str) -> Token {
    if let Some((_, var)) = VARIABLES.iter().find(|(n, _)| *n == name) {
        return Token::Var(*var);
    }
    if let Some((_, func)) = FUNCTIONS.iter().find(|(n, _)| *n == name) {
        return Token::Func(*func);
    }
    Token::Unknown(name.to_string())
}

/// Scans `src` into tokens. Never fails; malformed input surfaces as a parse
/// error when the token stream is walked.
pub fn tokenize(src: &str) -> Vec<Token> {
    let bytes = src.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        if c.is_ascii_digit() {
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            if i < bytes.len() && bytes[i] == b'.' {
                i += 1;
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                }
            }
            // digits[.digits] always parses as f64
            let value = src[start..i].parse::<f64>().unwrap_or(0.0);
            tokens.push(Token::Number(value));
        } else if c.is_ascii_alphabetic() {
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_alphabetic() {
                i += 1;
            }
            tokens.push(resolve_identifier(&src[start..i]));
        } else {
            if let Some(sym) = Symbol::from_char(c as char) {
                tokens.push(Token::Symbol(sym));
            }
            i += 1;
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans_numbers_operators_and_identifiers() {
        let tokens = tokenize("2.5*x^2 - sin(y)");
        assert_eq!(
            tokens,
            vec![
                Token::Number(2.5),
                Token::Symbol(Symbol::Star),
                Token::Var(Var::X),
                Token::Symbol(Symbol::Caret),
                Token::Number(2.0),
                Token::Symbol(Symbol::Minus),
                Token::Func(Func::Sin),
                Token::Symbol(Symbol::LParen),
                Token::Var(Var::Y),
                Token::Symbol(Symbol::RParen),
            ]
        );
    }

    #[test]
    fn number_with_trailing_dot_is_one_token() {
        assert_eq!(tokenize("3."), vec![Token::Number(3.0)]);
    }

    #[test]
    fn leading_dot_is_skipped() {
        // ".5" scans as the number 5; the dot is not a recognized character
        assert_eq!(tokenize(".5"), vec![Token::Number(5.0)]);
    }

    #[test]
    fn letters_run_maximally() {
        assert_eq!(tokenize("xy"), vec![Token::Unknown("xy".into())]);
        assert_eq!(
            tokenize("sinx"),
            vec![Token::Unknown("sinx".into())],
            "identifiers are not split into known prefixes"
        );
    }

    #[test]
    fn digits_end_identifier_runs() {
        assert_eq!(
            tokenize("x2"),
            vec![Token::Var(Var::X), Token::Number(2.0)]
        );
    }

    #[test]
    fn whitespace_and_unknown_characters_are_skipped() {
        assert_eq!(
            tokenize("  x , % y "),
            vec![Token::Var(Var::X), Token::Var(Var::Y)]
        );
    }

    #[test]
    fn variable_lookup_is_case_sensitive() {
        assert_eq!(tokenize("X"), vec![Token::Unknown("X".into())]);
    }

    #[test]
    fn display_round_trips_symbols_and_names() {
        let rendered: Vec<String> = tokenize("sqrt(a)/b")
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(rendered, vec!["sqrt", "(", "a", ")", "/", "b"]);
    }

    #[test]
    fn func_apply_matches_std() {
        assert_eq!(Func::Sin.apply(0.0), 0.0);
        assert_eq!(Func::Cos.apply(0.0), 1.0);
        assert_eq!(Func::Exp.apply(0.0), 1.0);
        assert_eq!(Func::Sqrt.apply(9.0), 3.0);
        assert!(Func::Sqrt.apply(-1.0).is_nan());
    }
}
