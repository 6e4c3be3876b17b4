//! Recursive-descent walk over a token stream, evaluating as it parses.
//!
//! ```text
//! expression := term (('+' | '-') term)*
//! term       := factor (('*' | '/') factor)*
//! factor     := base ('^' factor)?
//! base       := '(' expression ')' | '-' factor | NUMBER | IDENTIFIER
//! ```

use super::token::{Symbol, Token};
use super::{Bindings, ExprError};

/// Nesting limit for parentheses, unary minus, exponents and function calls.
pub const MAX_DEPTH: usize = 256;

pub(crate) fn walk(tokens: &[Token], bindings: &Bindings) -> Result<f64, ExprError> {
    let mut walker = Walker {
        tokens,
        pos: 0,
        depth: 0,
        bindings,
    };
    let value = walker.expression()?;
    if let Some(tok) = walker.peek() {
        return Err(ExprError::TrailingToken(tok.to_string()));
    }
    if !value.is_finite() {
        return Err(ExprError::NonFinite);
    }
    Ok(value)
}

struct Walker<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
    bindings: &'a Bindings,
}

impl Walker<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_symbol(&self) -> Option<Symbol> {
        match self.peek() {
            Some(Token::Symbol(s)) => Some(*s),
            _ => None,
        }
    }

    fn descend(&mut self) -> Result<(), ExprError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ExprError::TooDeep(MAX_DEPTH));
        }
        Ok(())
    }

    fn expression(&mut self) -> Result<f64, ExprError> {
        if self.peek().is_none() {
            return Err(ExprError::UnexpectedEnd);
        }
        let mut left = self.term()?;
        while let Some(op @ (Symbol::Plus | Symbol::Minus)) = self.peek_symbol() {
            self.pos += 1;
            let right = self.term()?;
            left = if op == Symbol::Plus {
                left + right
            } else {
                left - right
            };
        }
        Ok(left)
    }

    fn term(&mut self) -> Result<f64, ExprError> {
        let mut left = self.factor()?;
        while let Some(op @ (Symbol::Star | Symbol::Slash)) = self.peek_symbol() {
            self.pos += 1;
            let right = self.factor()?;
            left = if op == Symbol::Star {
                left * right
            } else {
                let quotient = left / right;
                if !quotient.is_finite() {
                    return Err(ExprError::DivisionNotFinite);
                }
                quotient
            };
        }
        Ok(left)
    }

    fn factor(&mut self) -> Result<f64, ExprError> {
        if self.peek().is_none() {
            return Err(ExprError::UnexpectedEnd);
        }
        self.descend()?;
        let base = self.base()?;
        let value = if self.peek_symbol() == Some(Symbol::Caret) {
            self.pos += 1;
            base.powf(self.factor()?)
        } else {
            base
        };
        self.depth -= 1;
        Ok(value)
    }

    fn base(&mut self) -> Result<f64, ExprError> {
        let tok = self.peek().cloned().ok_or(ExprError::UnexpectedEnd)?;
        self.pos += 1;
        match tok {
            Token::Number(v) => Ok(v),
            Token::Var(var) => Ok(self.bindings.get(var)),
            Token::Func(func) => {
                if self.peek().is_none() {
                    return Err(ExprError::MissingOperand(func.name()));
                }
                Ok(func.apply(self.factor()?))
            }
            Token::Symbol(Symbol::LParen) => {
                let inner = self.expression()?;
                if self.peek_symbol() == Some(Symbol::RParen) {
                    self.pos += 1;
                    Ok(inner)
                } else {
                    Err(ExprError::MismatchedParentheses)
                }
            }
            Token::Symbol(Symbol::Minus) => Ok(-self.factor()?),
            Token::Symbol(other) => Err(ExprError::UnexpectedToken(
                Token::Symbol(other).to_string(),
            )),
            Token::Unknown(name) => Err(ExprError::UnknownToken(name)),
        }
    }
}
