//! Pattern parsing.
//!
//! Grammar, high to low precedence: repetition (`*`), concatenation,
//! alternation (`|`). Parentheses group. Every other character is a
//! literal. The parser is a single left-to-right pass that keeps a run of
//! completed factors per nesting level; operators rewrite the tail of the
//! run. Parsing is all-or-nothing: the first error aborts and no partial
//! tree is returned.

use std::mem;
use std::str::Chars;
use thiserror::Error;

/// A parsed sub-pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A single literal character.
    Literal(char),
    /// Factors matched one after another. Empty means: match only the
    /// empty string.
    Concatenation(Vec<Expr>),
    /// Either of two alternatives. `a|b|c` folds left into
    /// `Alternation(Alternation(a, b), c)`.
    Alternation(Box<Expr>, Box<Expr>),
    /// Zero or more occurrences.
    Repetition(Box<Expr>),
}

/// A malformed pattern.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("expected an expression before '*'")]
    DanglingOperator,
    #[error("expected a closing parenthesis")]
    UnterminatedGroup,
    #[error("unexpected closing parenthesis")]
    UnexpectedClosingParenthesis,
}

/// The factors parsed so far at one nesting level, plus the alternative
/// accumulated by `|`.
#[derive(Default)]
struct Run {
    factors: Vec<Expr>,
    pending: Option<Expr>,
}

impl Run {
    fn push(&mut self, factor: Expr) {
        self.factors.push(factor);
    }

    /// `*`: wrap the most recent factor.
    fn repeat_last(&mut self) -> Result<(), SyntaxError> {
        let last = self.factors.pop().ok_or(SyntaxError::DanglingOperator)?;
        self.factors.push(Expr::Repetition(Box::new(last)));
        Ok(())
    }

    /// `|`: close the current factors as one alternative and start a fresh
    /// run. A second `|` folds the previous alternative in on the left, so
    /// repeated alternation stays left-associative.
    fn start_alternative(&mut self) {
        let left = close(mem::take(&mut self.factors));
        self.pending = Some(match self.pending.take() {
            Some(previous) => Expr::Alternation(Box::new(previous), Box::new(left)),
            None => left,
        });
    }

    fn finish(self) -> Expr {
        let last = close(self.factors);
        match self.pending {
            Some(left) => Expr::Alternation(Box::new(left), Box::new(last)),
            None => last,
        }
    }
}

/// A run of one factor is just that factor; anything else is a
/// concatenation, including the empty run.
fn close(mut factors: Vec<Expr>) -> Expr {
    if factors.len() == 1 {
        factors.swap_remove(0)
    } else {
        Expr::Concatenation(factors)
    }
}

fn parse_expression(input: &mut Chars<'_>, in_group: bool) -> Result<Expr, SyntaxError> {
    let mut run = Run::default();

    while let Some(c) = input.next() {
        match c {
            '*' => run.repeat_last()?,
            '(' => run.push(parse_expression(input, true)?),
            ')' if in_group => return Ok(run.finish()),
            ')' => return Err(SyntaxError::UnexpectedClosingParenthesis),
            '|' => run.start_alternative(),
            _ => run.push(Expr::Literal(c)),
        }
    }

    if in_group {
        return Err(SyntaxError::UnterminatedGroup);
    }
    Ok(run.finish())
}

/// Parse a pattern into an expression tree.
pub fn parse(pattern: &str) -> Result<Expr, SyntaxError> {
    parse_expression(&mut pattern.chars(), false)
}
