//! Copyright (c) 2005–2025 IKH Software, Inc.
//!
//! Released under the terms of the GNU Lesser General Public License, version 3.0
//! or (at your option) any later version (LGPL-3.0-or-later).
//!
//! # cxcalc-rt
//!
//! Table-driven lexing and SLR(1) parsing engines.
//!
//! Both engines are configured with static data rather than generated code:
//!
//! - a lexer is an ordered table of `(rule, regex)` pairs ([`LexerData`]),
//!   compiled once into an anchored multi-pattern DFA ([`LexerTable`]) and
//!   scanned with maximal munch, the earliest rule winning ties;
//! - a parser is a table of [`Production`]s over a token-ID enumeration
//!   ([`Grammar`]), turned once into action/goto tables ([`ParseTable`]) and
//!   driven by a shift-reduce loop ([`Parser`]) that hands every reduction
//!   to a [`ParserDriver`].
//!
//! Table construction fails with [`GrammarError`] instead of panicking, so a
//! broken grammar surfaces as an ordinary error at the call site.
mod error;
pub mod lexer;
pub mod parser;
pub mod slr;

pub use crate::error::{GrammarError, LexError, Span, SyntaxError};
pub use crate::lexer::{Lexer, LexerCtx, LexerData, LexerRule, LexerStats, LexerTable, Token};
pub use crate::parser::{
    Grammar, ParseTable, Parser, ParserAction, ParserDriver, ParserProdID, ParserStats,
    ParserTokenID, Production, StateID, TokenStack,
};
