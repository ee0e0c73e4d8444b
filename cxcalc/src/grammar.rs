//! # Calculator Grammar
//!
//! The productions of the calculator as plain data. Precedence and
//! associativity are encoded by stratification:
//!
//! ```text
//! Start       -> Line
//! Line        -> ident = Expr | Expr
//! Expr        -> Expr + Term | Expr - Term | Term
//! Term        -> Term * Factor | Term / Factor | Factor
//! Factor      -> InnerFactor | + InnerFactor | - InnerFactor
//! InnerFactor -> Unit | ( Expr ) | abs ( Expr ) | arg ( Expr )
//!              | norm ( Expr ) | conj ( Expr )
//! Unit        -> number | imaginary | ident
//! ```
//!
//! Every production has a [`ProdID`]; what a reduction computes is decided
//! by [`actions::apply`](crate::actions::apply), not stored in the table.

use crate::TokenID;
use crate::TokenID as T;
use cxcalc_rt::{Grammar, GrammarError, ParseTable, ParserProdID, Production};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use once_cell::sync::Lazy;

pub const N_PRODUCTIONS: usize = 21;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(usize)]
pub enum ProdID {
    Start = 0,
    Assign = 1,
    Eval = 2,
    Add = 3,
    Sub = 4,
    ExprTerm = 5,
    Mul = 6,
    Div = 7,
    TermFactor = 8,
    FactorInner = 9,
    Plus = 10,
    Neg = 11,
    InnerUnit = 12,
    Paren = 13,
    Abs = 14,
    Arg = 15,
    Norm = 16,
    Conj = 17,
    Number = 18,
    Imaginary = 19,
    Variable = 20,
}

pub const PRODUCTION_LABELS: [&str; N_PRODUCTIONS] = [
    "start",        // 0
    "assign",       // 1
    "eval",         // 2
    "add",          // 3
    "sub",          // 4
    "expr_term",    // 5
    "mul",          // 6
    "div",          // 7
    "term_factor",  // 8
    "factor_inner", // 9
    "plus",         // 10
    "neg",          // 11
    "inner_unit",   // 12
    "paren",        // 13
    "abs",          // 14
    "arg",          // 15
    "norm",         // 16
    "conj",         // 17
    "number",       // 18
    "imaginary",    // 19
    "variable",     // 20
];

impl ProdID {
    pub fn label(&self) -> &'static str {
        PRODUCTION_LABELS[usize::from(*self)]
    }
}

impl ParserProdID for ProdID {}

const fn prod(id: ProdID, lhs: TokenID, rhs: &'static [TokenID]) -> Production<TokenID, ProdID> {
    Production { id, lhs, rhs }
}

pub const PRODUCTIONS: [Production<TokenID, ProdID>; N_PRODUCTIONS] = [
    prod(ProdID::Start, T::Start, &[T::Line]),
    prod(ProdID::Assign, T::Line, &[T::Ident, T::Equals, T::Expr]),
    prod(ProdID::Eval, T::Line, &[T::Expr]),
    prod(ProdID::Add, T::Expr, &[T::Expr, T::Plus, T::Term]),
    prod(ProdID::Sub, T::Expr, &[T::Expr, T::Minus, T::Term]),
    prod(ProdID::ExprTerm, T::Expr, &[T::Term]),
    prod(ProdID::Mul, T::Term, &[T::Term, T::Asterisk, T::Factor]),
    prod(ProdID::Div, T::Term, &[T::Term, T::Slash, T::Factor]),
    prod(ProdID::TermFactor, T::Term, &[T::Factor]),
    prod(ProdID::FactorInner, T::Factor, &[T::InnerFactor]),
    prod(ProdID::Plus, T::Factor, &[T::Plus, T::InnerFactor]),
    prod(ProdID::Neg, T::Factor, &[T::Minus, T::InnerFactor]),
    prod(ProdID::InnerUnit, T::InnerFactor, &[T::Unit]),
    prod(
        ProdID::Paren,
        T::InnerFactor,
        &[T::LeftParen, T::Expr, T::RightParen],
    ),
    prod(
        ProdID::Abs,
        T::InnerFactor,
        &[T::Abs, T::LeftParen, T::Expr, T::RightParen],
    ),
    prod(
        ProdID::Arg,
        T::InnerFactor,
        &[T::Arg, T::LeftParen, T::Expr, T::RightParen],
    ),
    prod(
        ProdID::Norm,
        T::InnerFactor,
        &[T::Norm, T::LeftParen, T::Expr, T::RightParen],
    ),
    prod(
        ProdID::Conj,
        T::InnerFactor,
        &[T::Conj, T::LeftParen, T::Expr, T::RightParen],
    ),
    prod(ProdID::Number, T::Unit, &[T::Number]),
    prod(ProdID::Imaginary, T::Unit, &[T::Imaginary]),
    prod(ProdID::Variable, T::Unit, &[T::Ident]),
];

/// The calculator grammar.
pub struct CalcGrammar;

impl Grammar for CalcGrammar {
    type TokenID = TokenID;
    type ProdID = ProdID;

    const PRODUCTIONS: &'static [Production<TokenID, ProdID>] = &PRODUCTIONS;
}

static PARSE_TABLE: Lazy<Result<ParseTable<CalcGrammar>, GrammarError>> =
    Lazy::new(ParseTable::try_build);

/// Returns the SLR(1) tables for [`CalcGrammar`], building them on first use.
pub fn parse_table() -> Result<&'static ParseTable<CalcGrammar>, GrammarError> {
    match &*PARSE_TABLE {
        Ok(table) => Ok(table),
        Err(e) => Err(e.clone()),
    }
}
