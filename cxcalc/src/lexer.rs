//! # Calculator Lexer
//!
//! The lexical rules of the calculator as a static table ([`CalcLexData`])
//! and the lexer that turns a line of bytes into [`CalcToken`]s
//! ([`CalcLexer`]).
//!
//! Rules are listed in priority order. When two rules match the same
//! longest prefix the earlier one wins, so:
//!
//! - `i` alone is the imaginary unit, not an identifier;
//! - `abs`, `arg`, `norm` and `conj` are keywords, not identifiers,
//!   while `absx` is an identifier because it is longer.
//!
//! Whitespace is skipped. Literals are converted to [`Complex`] here so the
//! parser never sees their text.

use crate::{CalcToken, Complex, TokenID, TokenValue};
use cxcalc_rt::{GrammarError, LexError, Lexer, LexerCtx, LexerData, LexerRule, LexerTable};
use once_cell::sync::Lazy;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalcRule {
    Number,
    Imaginary,
    Abs,
    Arg,
    Norm,
    Conj,
    Ident,
    Plus,
    Minus,
    Asterisk,
    Slash,
    Equals,
    LeftParen,
    RightParen,
    Space,
    End,
}

impl LexerRule for CalcRule {
    const END: Self = CalcRule::End;
}

pub struct CalcLexData;

impl LexerData for CalcLexData {
    type LexerRule = CalcRule;

    const RULES: &'static [(CalcRule, &'static str)] = &[
        (CalcRule::Number, r"[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?"),
        (CalcRule::Imaginary, r"([0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?)?i"),
        (CalcRule::Abs, r"abs"),
        (CalcRule::Arg, r"arg"),
        (CalcRule::Norm, r"norm"),
        (CalcRule::Conj, r"conj"),
        (CalcRule::Ident, r"[A-Za-z_][A-Za-z0-9_]*"),
        (CalcRule::Plus, r"\+"),
        (CalcRule::Minus, r"-"),
        (CalcRule::Asterisk, r"\*"),
        (CalcRule::Slash, r"/"),
        (CalcRule::Equals, r"="),
        (CalcRule::LeftParen, r"\("),
        (CalcRule::RightParen, r"\)"),
        (CalcRule::Space, r"[ \t\r\n\x0C]+"),
    ];
}

static LEXER_TABLE: Lazy<Result<LexerTable<CalcLexData>, GrammarError>> =
    Lazy::new(LexerTable::try_build);

/// Returns the compiled lexer table, building it on first use.
pub fn lexer_table() -> Result<&'static LexerTable<CalcLexData>, GrammarError> {
    match &*LEXER_TABLE {
        Ok(table) => Ok(table),
        Err(e) => Err(e.clone()),
    }
}

/// Lexer over a byte iterator, usually one input line.
///
/// # Example
/// ```rust
/// # use cxcalc::{CalcLexer, TokenID};
/// # use cxcalc_rt::{Lexer, Token};
/// let mut lexer = CalcLexer::try_new("x = 2i".bytes()).unwrap();
/// let ids: Vec<TokenID> = lexer
///     .try_collect()
///     .unwrap()
///     .iter()
///     .map(|t| t.token_id())
///     .collect();
/// assert_eq!(
///     ids,
///     [TokenID::Ident, TokenID::Equals, TokenID::Imaginary, TokenID::End]
/// );
/// ```
pub struct CalcLexer<I>
where
    I: Iterator<Item = u8>,
{
    ctx: LexerCtx<I, CalcLexData, CalcToken>,
}

impl<I> CalcLexer<I>
where
    I: Iterator<Item = u8>,
{
    pub fn try_new(input: I) -> Result<Self, GrammarError> {
        Ok(Self {
            ctx: LexerCtx::new(input, lexer_table()?),
        })
    }

    fn parse_real(&self, text: &str) -> Result<f64, LexError> {
        text.parse::<f64>()
            .map_err(|_| LexError::new(self.ctx.span().start, text))
    }
}

impl<I> Lexer for CalcLexer<I>
where
    I: Iterator<Item = u8>,
{
    type Input = I;
    type LexerData = CalcLexData;
    type Token = CalcToken;

    fn ctx(&self) -> &LexerCtx<I, CalcLexData, CalcToken> {
        &self.ctx
    }

    fn ctx_mut(&mut self) -> &mut LexerCtx<I, CalcLexData, CalcToken> {
        &mut self.ctx
    }

    fn action(&mut self, rule: CalcRule) -> Result<(), LexError> {
        let span = Some(self.ctx.span());
        let (token_id, value) = match rule {
            CalcRule::Space => return Ok(()),
            CalcRule::Number => {
                let s = self.ctx.take_str()?;
                let re = self.parse_real(&s)?;
                (TokenID::Number, TokenValue::Number(Complex::new(re, 0.0)))
            }
            CalcRule::Imaginary => {
                let s = self.ctx.take_str()?;
                let im = match s.strip_suffix('i') {
                    Some("") | None => 1.0,
                    Some(digits) => self.parse_real(digits)?,
                };
                (TokenID::Imaginary, TokenValue::Number(Complex::new(0.0, im)))
            }
            CalcRule::Ident => {
                let s = self.ctx.take_str()?;
                (TokenID::Ident, TokenValue::Ident(s))
            }
            CalcRule::Abs => (TokenID::Abs, TokenValue::None),
            CalcRule::Arg => (TokenID::Arg, TokenValue::None),
            CalcRule::Norm => (TokenID::Norm, TokenValue::None),
            CalcRule::Conj => (TokenID::Conj, TokenValue::None),
            CalcRule::Plus => (TokenID::Plus, TokenValue::None),
            CalcRule::Minus => (TokenID::Minus, TokenValue::None),
            CalcRule::Asterisk => (TokenID::Asterisk, TokenValue::None),
            CalcRule::Slash => (TokenID::Slash, TokenValue::None),
            CalcRule::Equals => (TokenID::Equals, TokenValue::None),
            CalcRule::LeftParen => (TokenID::LeftParen, TokenValue::None),
            CalcRule::RightParen => (TokenID::RightParen, TokenValue::None),
            CalcRule::End => (TokenID::End, TokenValue::None),
        };
        self.ctx.yield_token(CalcToken {
            token_id,
            value,
            span,
        });
        Ok(())
    }
}
