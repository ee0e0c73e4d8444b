//! # Calculator Parser
//!
//! This module couples the SLR(1) tables of [`CalcGrammar`] with the
//! calculator's semantic actions. It exposes:
//!
//! - [`CalcParserDriver`]: the reduction hook, which pops a production's
//!   children, hands them to [`actions::apply`] and pushes the result;
//! - [`CalcParser`]: a thin adapter that pulls tokens from [`CalcLexer`] and
//!   yields the evaluated `Line`.
//!
//! The parser uses a mutable [`Bindings`] as shared context.
//!
//! ## Behavior highlights
//! - **Operator precedence and associativity** come from the grammar's
//!   stratification; the tables have no conflicts to resolve.
//! - **Assignments** store the value in the environment and evaluate to the
//!   assigned value.
//! - **Evaluation order** is reduction order: children before parents, left
//!   to right.

use crate::grammar::{parse_table, CalcGrammar, PRODUCTIONS};
use crate::{actions, Bindings, CalcError, CalcLexer, CalcToken, ProdID, TokenValue};
use cxcalc_rt::{LexerStats, Parser, ParserDriver, ParserStats, TokenStack};

/// Semantic hooks for the calculator grammar.
///
/// Each reduction pops exactly the right-hand side of the production,
/// evaluates it with [`actions::apply`], and pushes one token for the
/// left-hand side whose value is the result and whose span covers its
/// children.
#[derive(Debug, Default)]
pub struct CalcParserDriver;

impl ParserDriver for CalcParserDriver {
    type Grammar = CalcGrammar;
    type Token = CalcToken;
    type Context = Bindings;
    type Error = CalcError;

    fn reduce(
        &mut self,
        stack: &mut TokenStack<CalcToken>,
        context: &mut Bindings,
        prod_id: ProdID,
        lookahead: &CalcToken,
    ) -> Result<(), CalcError> {
        let prod = &PRODUCTIONS[usize::from(prod_id)];
        let args = stack.pop_n(prod.rhs.len())?;
        let value = actions::apply(prod_id, &args, context)?;

        let mut token = CalcToken {
            token_id: prod.lhs,
            value: TokenValue::Number(value),
            span: None,
        };
        for arg in &args {
            token.merge_span(&arg.span);
        }
        log::trace!(
            "{} = {} before {:?}",
            prod_id.label(),
            value,
            lookahead.token_id
        );
        stack.push(token);
        Ok(())
    }
}

/// The calculator parser: [`CalcLexer`] feeding a shift-reduce [`Parser`]
/// driven by [`CalcParserDriver`].
///
/// One call to [`try_next`](CalcParser::try_next) parses and evaluates one
/// `Line` (the whole input), returning `None` once the input is used up.
///
/// # Example
///
/// ```rust
/// # use cxcalc::{Bindings, CalcParser, Complex, TokenID};
/// # use cxcalc_rt::span;
/// let mut env = Bindings::new();
/// let mut parser = CalcParser::try_new("a = 2 * (1 + i)".bytes()).unwrap();
/// let token = parser.try_next(&mut env).unwrap().unwrap();
/// assert_eq!(token.token_id, TokenID::Line);
/// assert_eq!(token.span, span!(0, 15));
/// assert_eq!(token.number(), Some(Complex::new(2.0, 2.0)));
/// assert_eq!(env.get("a"), Some(Complex::new(2.0, 2.0)));
/// assert!(parser.try_next(&mut env).unwrap().is_none());
/// ```
pub struct CalcParser<I>
where
    I: Iterator<Item = u8>,
{
    parser: Parser<CalcLexer<I>, CalcParserDriver>,
}

impl<I> CalcParser<I>
where
    I: Iterator<Item = u8>,
{
    pub fn try_new(input: I) -> Result<Self, CalcError> {
        let lexer = CalcLexer::try_new(input)?;
        let parser = Parser::new(lexer, CalcParserDriver, parse_table()?);
        Ok(Self { parser })
    }

    pub fn try_next(&mut self, env: &mut Bindings) -> Result<Option<CalcToken>, CalcError> {
        self.parser.try_next(env)
    }

    pub fn stats(&self) -> (LexerStats, ParserStats) {
        self.parser.stats()
    }
}
