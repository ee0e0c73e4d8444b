//! # Calculator Tokens
//!
//! This module defines the grammar alphabet and the concrete token type
//! shared by the lexer, the parser and the semantic actions:
//!
//! - [`TokenID`]: every grammar symbol, nonterminals first (with the
//!   augmented `Start` at 0), then terminals, then `End`;
//! - [`TokenValue`]: the payload a token carries;
//! - [`CalcToken`]: a token kind, its payload and its span.
//!
//! Numeric literals are converted to [`Complex`] once, by the lexer, so the
//! semantic actions never look at source text. Nonterminal tokens pushed by
//! reductions reuse the same type and carry the evaluated value.
use crate::Complex;
use cxcalc_rt::{ParserTokenID, Span, Token};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use smartstring::alias::String;

pub const N_NONTERMINALS: usize = 7;
pub const N_TERMINALS: usize = 15;
pub const N_TOKENS: usize = N_NONTERMINALS + N_TERMINALS;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(usize)]
pub enum TokenID {
    // Nonterminals:
    Start = 0,
    Line = 1,
    Expr = 2,
    Term = 3,
    Factor = 4,
    InnerFactor = 5,
    Unit = 6,

    // Terminals:
    Number = 7,
    Imaginary = 8,
    Ident = 9,
    Plus = 10,
    Minus = 11,
    Asterisk = 12,
    Slash = 13,
    Equals = 14,
    LeftParen = 15,
    RightParen = 16,
    Abs = 17,
    Arg = 18,
    Norm = 19,
    Conj = 20,
    End = 21,
}

pub const TOKEN_LABELS: [&str; N_TOKENS] = [
    "Start",       // 0
    "Line",        // 1
    "Expr",        // 2
    "Term",        // 3
    "Factor",      // 4
    "InnerFactor", // 5
    "Unit",        // 6
    "number",      // 7
    "imaginary",   // 8
    "ident",       // 9
    "plus",        // 10
    "minus",       // 11
    "asterisk",    // 12
    "slash",       // 13
    "equals",      // 14
    "lparen",      // 15
    "rparen",      // 16
    "abs",         // 17
    "arg",         // 18
    "norm",        // 19
    "conj",        // 20
    "end",         // 21
];

impl ParserTokenID for TokenID {
    const COUNT_NONTERMINALS: usize = N_NONTERMINALS;
    const COUNT_TERMINALS: usize = N_TERMINALS;
    const END: Self = TokenID::End;

    fn label(&self) -> &'static str {
        TOKEN_LABELS[usize::from(*self)]
    }
}

/// The payload carried by a [`CalcToken`].
///
/// # Example
/// ```rust
/// # use cxcalc::{Complex, TokenValue};
/// let value = TokenValue::Number(Complex::new(0.0, 2.5));
/// let TokenValue::Number(z) = value else {
///     panic!("expected a number");
/// };
/// assert_eq!(z.to_string(), "2.5i");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    /// No associated data (operators, parentheses, keywords, end).
    None,

    /// A literal, or the value of an evaluated nonterminal.
    Number(Complex),

    /// An identifier's name.
    Ident(String),
}

/// A lexical token, or a reduced nonterminal on the parser stack.
///
/// # Example
/// ```rust
/// # use cxcalc::{CalcToken, Complex, TokenID, TokenValue};
/// # use cxcalc_rt::{Token, span};
/// let tok = CalcToken {
///     token_id: TokenID::Number,
///     value: TokenValue::Number(Complex::new(99.0, 0.0)),
///     span: span!(0, 2),
/// };
///
/// assert_eq!(tok.token_id(), TokenID::Number);
/// assert_eq!(tok.span(), span!(0, 2));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CalcToken {
    /// The token's kind.
    pub token_id: TokenID,
    /// The associated value for the token, if applicable.
    pub value: TokenValue,
    /// Byte range of the token within its line.
    pub span: Option<Span>,
}

impl CalcToken {
    pub fn merge_span(&mut self, other_span: &Option<Span>) {
        match other_span {
            Some(other_span) => match &mut self.span {
                Some(my_span) => {
                    *my_span = my_span.merge(other_span);
                }
                None => {
                    self.span = Some(*other_span);
                }
            },
            None => (),
        }
    }

    /// The numeric value, if this token carries one.
    pub fn number(&self) -> Option<Complex> {
        match self.value {
            TokenValue::Number(z) => Some(z),
            _ => None,
        }
    }
}

impl Token for CalcToken {
    type TokenID = TokenID;

    fn token_id(&self) -> Self::TokenID {
        self.token_id
    }

    fn span(&self) -> Option<Span> {
        self.span
    }
}
