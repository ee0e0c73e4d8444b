//! Source-location and error types shared by the lexer and the parser.
//!
//! Input is scanned one line at a time, so positions are plain byte offsets
//! into that line. A [`Span`] is a half-open `[start, end)` range; the
//! [`span!`](crate::span) macro builds an `Option<Span>` inline, which is
//! handy in tests and when populating tokens.
//!
//! # Examples
//!
//! ```rust
//! # use cxcalc_rt::{Span, span};
//! let a = Span::new(2, 5);
//! let b = Span::new(7, 9);
//! assert_eq!(a.merge(&b), Span::new(2, 9));
//! assert_eq!(span!(0, 3), Some(Span::new(0, 3)));
//! ```

use smartstring::alias::String;
use thiserror::Error;

/// A half-open byte range `[start, end)` within one input line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Span {
    /// Starting offset (inclusive).
    pub start: usize,
    /// Ending offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Creates a new `Span`.
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Merge two spans into one that covers both.
    #[inline]
    pub fn merge(&self, other: &Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Is this span empty (start == end)?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Number of bytes covered.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }
}

/// No lexical rule matched at `offset`, or a matched literal could not be
/// converted to its value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unexpected {text:?} at offset {offset}")]
pub struct LexError {
    /// Byte offset of the offending input.
    pub offset: usize,
    /// The offending text (usually a single character).
    pub text: String,
}

impl LexError {
    pub fn new(offset: usize, text: impl AsRef<str>) -> Self {
        Self {
            offset,
            text: String::from(text.as_ref()),
        }
    }
}

/// The token stream does not reduce to the start symbol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unexpected token {token} at {span:?}")]
pub struct SyntaxError {
    /// Label of the offending token, as given by `ParserTokenID::label`.
    pub token: &'static str,
    /// Where the offending token was found.
    pub span: Option<Span>,
}

/// Construction of lexer or parser tables failed.
///
/// Tables are static data, so any of these indicates a bug in the rule or
/// production tables (or in a reduction hook) rather than in user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    /// A lexer rule pattern could not be compiled into the DFA.
    #[error("lexer rules do not compile: {0}")]
    Regex(String),

    /// A production is listed at a position that does not match its ID,
    /// or production 0 does not derive the start symbol.
    #[error("production {index} is malformed: {reason}")]
    Production {
        index: usize,
        reason: &'static str,
    },

    /// A table cell holds more than one action.
    #[error("grammar is not SLR(1): state {state} on {token} has actions {actions}")]
    Conflict {
        state: usize,
        token: &'static str,
        actions: String,
    },

    /// A reduction asked for more tokens than the parser stack holds.
    #[error("token stack underflow")]
    StackUnderflow,

    /// No goto entry exists for a reduced nonterminal.
    #[error("no goto on {token} from state {state}")]
    MissingGoto { state: usize, token: &'static str },
}

/// Build an `Option<Span>` inline from byte offsets.
///
/// # Examples
///
/// ```rust
/// # use cxcalc_rt::span;
/// let s = span!(1, 5);
/// assert_eq!(s.unwrap().len(), 4);
/// ```
#[macro_export]
macro_rules! span {
    ($start:expr, $end:expr) => {
        Some($crate::Span {
            start: $start,
            end: $end,
        })
    };
}
