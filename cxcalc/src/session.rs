//! # Evaluating lines
//!
//! [`evaluate_line`] is the entry point a host calls once per input line,
//! threading the same [`Bindings`] through every call of a session.
//! [`Session`] bundles a `Bindings` with that call for hosts that run
//! several independent sessions.

use crate::{Bindings, CalcError, CalcParser, Complex, SemanticError};

/// Lexes, parses and evaluates one line.
///
/// On error nothing from this line is bound; earlier bindings remain.
///
/// # Examples
/// ```rust
/// # use cxcalc::{Bindings, evaluate_line};
/// let mut env = Bindings::new();
/// assert_eq!(evaluate_line(&mut env, "x = 3i").unwrap().to_string(), "3i");
/// assert_eq!(evaluate_line(&mut env, "x * x").unwrap().to_string(), "-9");
/// ```
pub fn evaluate_line(env: &mut Bindings, line: &str) -> Result<Complex, CalcError> {
    let mut parser = CalcParser::try_new(line.bytes())?;
    let result = parser.try_next(env);

    let (lexer_stats, parser_stats) = parser.stats();
    log::debug!("{:?} {:?}", lexer_stats, parser_stats);

    match result? {
        Some(token) => token.number().ok_or_else(|| {
            SemanticError::Operand {
                production: "start",
                index: 0,
            }
            .into()
        }),
        None => Err(CalcError::Syntax {
            found: "end",
            offset: line.len(),
        }),
    }
}

/// One evaluation session with its own bindings.
///
/// # Examples
/// ```rust
/// # use cxcalc::{Complex, Session};
/// let mut a = Session::new();
/// let mut b = Session::new();
/// a.evaluate("r = 2").unwrap();
/// assert_eq!(a.evaluate("r * i").unwrap(), Complex::new(0.0, 2.0));
/// assert!(b.evaluate("r").is_err());
/// ```
#[derive(Debug, Default)]
pub struct Session {
    env: Bindings,
}

impl Session {
    pub fn new() -> Self {
        Self {
            env: Bindings::new(),
        }
    }

    pub fn evaluate(&mut self, line: &str) -> Result<Complex, CalcError> {
        evaluate_line(&mut self.env, line)
    }

    pub fn bindings(&self) -> &Bindings {
        &self.env
    }
}
