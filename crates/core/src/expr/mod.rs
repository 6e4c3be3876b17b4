//! Arithmetic expression evaluator for user-typed field equations.
//!
//! An [`Expression`] keeps the cleaned source text and its token stream.
//! Every evaluation re-walks the tokens with a recursive-descent parser that
//! computes the value directly; no tree is built. Evaluation is pure and
//! bounded in depth, so it is safe to call for every particle on every tick.
//!
//! ```
//! use flowfield_core::expr::{evaluate, Bindings};
//!
//! let v = evaluate("x^2 + y^2", &Bindings::new(3.0, 4.0, 0.0, 0.0)).unwrap();
//! assert_eq!(v, 25.0);
//! ```

mod parse;
pub mod token;

pub use parse::MAX_DEPTH;
pub use token::{tokenize, Func, Token, Var};

use thiserror::Error;

/// Why an expression could not produce a finite value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    /// Nothing left after trimming whitespace and trailing semicolons.
    #[error("empty expression")]
    Empty,

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    /// A function name was the last token.
    #[error("function '{0}' is missing its operand")]
    MissingOperand(&'static str),

    #[error("mismatched parentheses")]
    MismatchedParentheses,

    /// An identifier that is neither a variable nor a known function.
    #[error("unknown token: {0}")]
    UnknownToken(String),

    /// An operator where an operand was expected.
    #[error("unexpected token: {0}")]
    UnexpectedToken(String),

    /// A complete expression was followed by more tokens.
    #[error("unexpected token after expression: {0}")]
    TrailingToken(String),

    #[error("expression nested deeper than {0} levels")]
    TooDeep(usize),

    #[error("division produced a non-finite value")]
    DivisionNotFinite,

    #[error("expression did not evaluate to a finite number")]
    NonFinite,
}

impl ExprError {
    /// True for malformed input, false for well-formed input that produced
    /// a non-finite number for the given bindings.
    pub fn is_parse_error(&self) -> bool {
        !matches!(self, ExprError::DivisionNotFinite | ExprError::NonFinite)
    }
}

/// Values for the four names an expression can reference.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bindings {
    values: [f64; 4],
}

impl Bindings {
    /// Binds the point `(x, y)` and the parameters `a`, `b`.
    pub fn new(x: f64, y: f64, a: f64, b: f64) -> Self {
        Self {
            values: [x, y, a, b],
        }
    }

    /// Same parameters, different point.
    pub fn at(self, x: f64, y: f64) -> Self {
        Self {
            values: [x, y, self.values[2], self.values[3]],
        }
    }

    /// Value bound to `var`.
    pub fn get(&self, var: Var) -> f64 {
        self.values[var.slot()]
    }
}

/// A user expression with its token stream.
///
/// Construction never fails: syntax errors are reported by [`Expression::eval`]
/// so that a half-typed equation can still be installed in a running field.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    source: String,
    tokens: Vec<Token>,
}

impl Expression {
    /// Trims the text, strips trailing semicolons and scans it.
    pub fn new(source: &str) -> Self {
        let cleaned = source.trim().trim_end_matches(';');
        Self {
            source: cleaned.to_string(),
            tokens: tokenize(cleaned),
        }
    }

    /// The cleaned source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The cached token stream, rebuilt only by constructing a new expression.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Evaluates the expression, returning a finite value or the first error met.
    pub fn eval(&self, bindings: &Bindings) -> Result<f64, ExprError> {
        if self.source.is_empty() {
            return Err(ExprError::Empty);
        }
        parse::walk(&self.tokens, bindings)
    }

    /// Total form of [`eval`](Self::eval): failures are logged, stored in
    /// `error`, and replaced by 0.
    pub fn eval_or_zero(&self, bindings: &Bindings, error: &mut Option<ExprError>) -> f64 {
        match self.eval(bindings) {
            Ok(v) => v,
            Err(e) => {
                log::trace!("evaluating {:?} failed: {e}", self.source);
                *error = Some(e);
                0.0
            }
        }
    }
}

/// Scans and evaluates `expr` in one call.
pub fn evaluate(expr: &str, bindings: &Bindings) -> Result<f64, ExprError> {
    Expression::new(expr).eval(bindings)
}

/// Scans and evaluates `expr`, substituting 0 on failure and recording the
/// failure in `error`.
pub fn evaluate_or_zero(expr: &str, bindings: &Bindings, error: &mut Option<ExprError>) -> f64 {
    Expression::new(expr).eval_or_zero(bindings, error)
}
