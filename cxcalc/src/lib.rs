//! Copyright (c) 2005–2025 IKH Software, Inc.
//!
//! Released under the terms of the GNU Lesser General Public License, version 3.0
//! or (at your option) any later version (LGPL-3.0-or-later).
//!
//! # cxcalc
//!
//! A calculator over complex numbers built on **cxcalc-rt**: one line of
//! text is lexed, parsed against an arithmetic grammar with a binding
//! statement, evaluated to a [`Complex`] and printed in canonical form.
//!
//! ## Overview
//!
//! - [`complex`]: the [`Complex`] value type and its operations.
//! - [`token`]: the grammar alphabet ([`TokenID`]) and [`CalcToken`].
//! - [`lexer`]: lexical rules as data and the [`CalcLexer`].
//! - [`grammar`]: productions as data ([`ProdID`], [`CalcGrammar`]).
//! - [`env`]: the binding environment ([`Bindings`]).
//! - [`actions`]: semantic actions, a pure dispatch over [`ProdID`].
//! - [`parser`]: the driver wiring actions into the parser engine.
//! - [`session`]: [`evaluate_line`] and [`Session`].
//!
//! ## Example
//!
//! ```rust
//! use cxcalc::{evaluate_line, Bindings, CalcError};
//!
//! let mut env = Bindings::new();
//! assert_eq!(evaluate_line(&mut env, "1 + 2i").unwrap().to_string(), "1 + 2i");
//! assert_eq!(evaluate_line(&mut env, "abs(3 + 4i)").unwrap().to_string(), "5");
//!
//! let err = evaluate_line(&mut env, "y").unwrap_err();
//! assert!(matches!(err, CalcError::Semantic(_)));
//! assert!(env.is_empty());
//! ```
pub mod actions;
pub mod complex;
pub mod env;
pub mod error;
pub mod grammar;
pub mod lexer;
pub mod parser;
pub mod session;
pub mod token;

pub use complex::Complex;
pub use env::{Bindings, SemanticError};
pub use error::CalcError;
pub use grammar::{CalcGrammar, ProdID};
pub use lexer::{CalcLexer, CalcRule};
pub use parser::{CalcParser, CalcParserDriver};
pub use session::{evaluate_line, Session};
pub use token::{CalcToken, TokenID, TokenValue};
