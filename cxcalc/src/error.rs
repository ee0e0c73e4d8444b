//! # Calculator Error Type
//!
//! This module defines [`CalcError`], the error returned for one line that
//! could not be evaluated. It distinguishes:
//!
//! - **lexical** errors (no token pattern matches),
//! - **syntax** errors (the tokens do not form a `Line`),
//! - **semantic** errors (an unbound identifier),
//! - **grammar** errors (the static tables themselves are broken).
//!
//! Conversions from the underlying error types are derived with `#[from]`,
//! so the lexer, the parser engine and the semantic actions all propagate
//! with `?`.
use crate::SemanticError;
use cxcalc_rt::{GrammarError, LexError, SyntaxError};
use thiserror::Error;

/// Represents all possible errors that can occur while evaluating a line.
///
/// # Examples
/// ```rust
/// # use cxcalc::{Bindings, CalcError, evaluate_line};
/// let mut env = Bindings::new();
/// let err = evaluate_line(&mut env, "1 +").unwrap_err();
/// assert!(matches!(err, CalcError::Syntax { found: "end", offset: 3 }));
/// assert_eq!(err.kind(), "syntax error");
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    /// No token pattern matched.
    #[error("{0}")]
    Lexical(#[from] LexError),

    /// The token stream does not reduce to a `Line`.
    #[error("unexpected {found} at offset {offset}")]
    Syntax {
        /// Label of the unexpected token.
        found: &'static str,
        /// Byte offset of the unexpected token.
        offset: usize,
    },

    /// A semantic action failed.
    #[error("{0}")]
    Semantic(#[from] SemanticError),

    /// Lexer or parser tables could not be built.
    #[error("{0}")]
    Grammar(#[from] GrammarError),
}

impl CalcError {
    /// The classification label printed in front of the message.
    pub fn kind(&self) -> &'static str {
        match self {
            CalcError::Lexical(_) => "lexical error",
            CalcError::Syntax { .. } => "syntax error",
            CalcError::Semantic(_) => "semantic error",
            CalcError::Grammar(_) => "grammar error",
        }
    }
}

impl From<SyntaxError> for CalcError {
    fn from(e: SyntaxError) -> Self {
        CalcError::Syntax {
            found: e.token,
            offset: e.span.map(|s| s.start).unwrap_or_default(),
        }
    }
}
