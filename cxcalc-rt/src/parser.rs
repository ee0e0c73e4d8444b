//! Shift-reduce parser runtime.
//!
//! A grammar is static data: an enumeration of token IDs (nonterminals first,
//! then terminals), an enumeration of production IDs, and a table of
//! [`Production`]s ([`Grammar::PRODUCTIONS`]). [`ParseTable::try_build`] turns
//! that table into SLR(1) action/goto tables once; [`Parser`] then drives the
//! classic shift-reduce loop over tokens pulled from a [`Lexer`], calling the
//! [`ParserDriver::reduce`] hook exactly once per recognized production,
//! children before parents.

use crate::lexer::{Lexer, LexerStats, Token};
use crate::slr;
use crate::{GrammarError, LexError, SyntaxError};
use smartstring::alias::String;
use std::fmt::{Debug, Write as _};
use std::io;
use std::marker::PhantomData;

/// A parser state index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateID(pub usize);

impl From<StateID> for usize {
    fn from(s: StateID) -> Self {
        s.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParserAction<P>
where
    P: ParserProdID,
{
    Error,
    Accept,
    Shift(StateID),
    Reduce(P),
    Goto(StateID),
}

/// Grammar symbols. Nonterminals occupy `0..COUNT_NONTERMINALS` with the
/// augmented start symbol at 0; terminals follow.
pub trait ParserTokenID: Copy + Debug + Eq + Into<usize> + 'static {
    const COUNT_NONTERMINALS: usize;
    const COUNT_TERMINALS: usize;
    const COUNT: usize = Self::COUNT_NONTERMINALS + Self::COUNT_TERMINALS;

    /// The end-of-input terminal.
    const END: Self;

    fn label(&self) -> &'static str;

    #[inline]
    fn index(self) -> usize {
        self.into()
    }
}

pub trait ParserProdID: Copy + Debug + Eq + Into<usize> + 'static {
    #[inline]
    fn index(self) -> usize {
        self.into()
    }
}

/// One grammar rule, `lhs -> rhs`.
#[derive(Debug)]
pub struct Production<T, P>
where
    T: 'static,
{
    pub id: P,
    pub lhs: T,
    pub rhs: &'static [T],
}

/// A context-free grammar given as data.
///
/// `PRODUCTIONS[i].id` must convert to `i`, and production 0 must be
/// `Start -> S` where `Start` is token ID 0.
pub trait Grammar: 'static {
    type TokenID: ParserTokenID;
    type ProdID: ParserProdID;

    const PRODUCTIONS: &'static [Production<Self::TokenID, Self::ProdID>];

    /// Label of every symbol, indexed by token ID.
    fn labels() -> Vec<&'static str> {
        let mut labels = vec![""; Self::TokenID::COUNT];
        for prod in Self::PRODUCTIONS {
            for &t in std::iter::once(&prod.lhs).chain(prod.rhs) {
                labels[t.index()] = t.label();
            }
        }
        labels[Self::TokenID::END.index()] = Self::TokenID::END.label();
        labels
    }
}

fn encode<G: Grammar>() -> Vec<Vec<usize>> {
    G::PRODUCTIONS
        .iter()
        .map(|p| {
            std::iter::once(p.lhs.index())
                .chain(p.rhs.iter().map(|&t| t.index()))
                .collect()
        })
        .collect()
}

/// SLR(1) tables for a [`Grammar`].
pub struct ParseTable<G>
where
    G: Grammar,
{
    actions: Vec<Vec<ParserAction<G::ProdID>>>,
    _marker: PhantomData<fn() -> G>,
}

impl<G> ParseTable<G>
where
    G: Grammar,
{
    /// Builds the action/goto tables, rejecting malformed production tables
    /// and any cell with more than one action.
    pub fn try_build() -> Result<Self, GrammarError> {
        let n_nonterm = G::TokenID::COUNT_NONTERMINALS;
        let n_term = G::TokenID::COUNT_TERMINALS;
        let eos = G::TokenID::END.index();

        for (index, prod) in G::PRODUCTIONS.iter().enumerate() {
            if prod.id.index() != index {
                return Err(GrammarError::Production {
                    index,
                    reason: "listed out of order",
                });
            }
            if prod.lhs.index() >= n_nonterm {
                return Err(GrammarError::Production {
                    index,
                    reason: "left-hand side is a terminal",
                });
            }
        }
        match G::PRODUCTIONS.first() {
            Some(start) if start.lhs.index() == 0 && start.rhs.len() == 1 => {}
            _ => {
                return Err(GrammarError::Production {
                    index: 0,
                    reason: "must be Start -> S",
                });
            }
        }

        let prods = encode::<G>();
        let coll = slr::construct_collection(&prods, n_nonterm, n_term);
        let (first, nullable) = slr::first_sets(&prods, n_nonterm, n_term);
        let follow = slr::follow_sets(&prods, n_nonterm, eos, &first, &nullable);
        let tab = slr::construct_slr(&coll, &follow, &prods, n_nonterm, n_term, eos);
        let labels = G::labels();

        let mut actions = Vec::with_capacity(tab.len());
        for (state, row) in tab.iter().enumerate() {
            let mut out = Vec::with_capacity(row.len());
            for (sym, cell) in row.iter().enumerate() {
                let mut acts = cell.iter();
                let action = match (acts.next(), acts.next()) {
                    (None, _) => ParserAction::Error,
                    (Some(&act), None) => match act {
                        slr::Act::Accept => ParserAction::Accept,
                        slr::Act::Shift(s) => ParserAction::Shift(StateID(s)),
                        slr::Act::Goto(s) => ParserAction::Goto(StateID(s)),
                        slr::Act::Reduce(p) => ParserAction::Reduce(G::PRODUCTIONS[p].id),
                    },
                    _ => {
                        let mut actions = String::new();
                        for act in cell {
                            let _ = write!(actions, "{:?} ", act);
                        }
                        return Err(GrammarError::Conflict {
                            state,
                            token: labels[sym],
                            actions,
                        });
                    }
                };
                out.push(action);
            }
            actions.push(out);
        }

        log::debug!(
            "parse table: {} productions, {} states",
            prods.len(),
            actions.len()
        );
        Ok(Self {
            actions,
            _marker: PhantomData,
        })
    }

    #[inline]
    pub fn start_state(&self) -> StateID {
        StateID(0)
    }

    #[inline]
    pub fn lookup(&self, state: StateID, token_id: G::TokenID) -> ParserAction<G::ProdID> {
        self.actions[state.0][token_id.index()]
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Writes the productions, LR(0) item sets, and FIRST/FOLLOW sets the
    /// tables were built from.
    pub fn dump<W: io::Write>(out: &mut W) -> io::Result<()> {
        let n_nonterm = G::TokenID::COUNT_NONTERMINALS;
        let n_term = G::TokenID::COUNT_TERMINALS;
        let labels = G::labels();
        let prods = encode::<G>();
        slr::write_prods(out, &prods, &labels)?;
        writeln!(out)?;
        let coll = slr::construct_collection(&prods, n_nonterm, n_term);
        slr::write_states(out, &coll, &prods, &labels)?;
        let (first, nullable) = slr::first_sets(&prods, n_nonterm, n_term);
        slr::write_fstflw(out, &first, Some(&nullable), &labels)?;
        writeln!(out)?;
        let follow = slr::follow_sets(&prods, n_nonterm, G::TokenID::END.index(), &first, &nullable);
        slr::write_fstflw(out, &follow, None, &labels)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ParserStats {
    pub tokens: usize,
    pub shifts: usize,
    pub reductions: usize,
}

/// Semantic hooks invoked by [`Parser`].
pub trait ParserDriver {
    type Grammar: Grammar;
    type Token: Token<TokenID = <Self::Grammar as Grammar>::TokenID>;
    type Context;
    type Error: From<LexError> + From<SyntaxError> + From<GrammarError>;

    /// Called when the right-hand side of `prod_id` is on top of the token
    /// stack. Must pop exactly `rhs.len()` tokens and push one token for the
    /// left-hand side.
    fn reduce(
        &mut self,
        stack: &mut TokenStack<Self::Token>,
        context: &mut Self::Context,
        prod_id: <Self::Grammar as Grammar>::ProdID,
        lookahead: &Self::Token,
    ) -> Result<(), Self::Error>;
}

/// The parser's value stack.
#[derive(Debug)]
pub struct TokenStack<T> {
    tokens: Vec<T>,
}

impl<T> TokenStack<T> {
    fn new() -> Self {
        Self { tokens: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn push(&mut self, token: T) {
        self.tokens.push(token);
    }

    pub fn pop(&mut self) -> Result<T, GrammarError> {
        self.tokens.pop().ok_or(GrammarError::StackUnderflow)
    }

    /// Removes the top `n` tokens, returned bottom to top.
    pub fn pop_n(&mut self, n: usize) -> Result<Vec<T>, GrammarError> {
        let at = self
            .tokens
            .len()
            .checked_sub(n)
            .ok_or(GrammarError::StackUnderflow)?;
        Ok(self.tokens.split_off(at))
    }

    fn clear(&mut self) {
        self.tokens.clear();
    }
}

pub struct Parser<L, D>
where
    L: Lexer<Token = D::Token>,
    D: ParserDriver,
{
    lexer: L,
    driver: D,
    table: &'static ParseTable<D::Grammar>,
    tokens: TokenStack<D::Token>,
    states: Vec<StateID>,
    stats: ParserStats,
}

impl<L, D> Parser<L, D>
where
    L: Lexer<Token = D::Token>,
    D: ParserDriver,
{
    pub fn new(lexer: L, driver: D, table: &'static ParseTable<D::Grammar>) -> Self {
        Self {
            lexer,
            driver,
            table,
            tokens: TokenStack::new(),
            states: Vec::new(),
            stats: ParserStats::default(),
        }
    }

    pub fn stats(&self) -> (LexerStats, ParserStats) {
        (self.lexer.stats(), self.stats)
    }

    fn next_token(&mut self) -> Result<Option<D::Token>, D::Error> {
        let token = self.lexer.try_next()?;
        if token.is_some() {
            self.stats.tokens += 1;
        }
        Ok(token)
    }

    fn syntax_error(token: &D::Token) -> SyntaxError {
        SyntaxError {
            token: token.token_id().label(),
            span: token.span(),
        }
    }

    /// Parses one sentence and returns the token the start production was
    /// reduced to, or `None` if the lexer is already exhausted.
    pub fn try_next(&mut self, context: &mut D::Context) -> Result<Option<D::Token>, D::Error> {
        self.states.clear();
        self.tokens.clear();
        let Some(mut token) = self.next_token()? else {
            return Ok(None);
        };
        let mut state = self.table.start_state();
        self.states.push(state);
        self.dump_state(&token);

        loop {
            match self.table.lookup(state, token.token_id()) {
                ParserAction::Shift(new_state) => {
                    log::trace!("Shift {:?}", new_state);
                    self.tokens.push(token);
                    state = new_state;
                    self.states.push(state);
                    token = match self.next_token()? {
                        Some(t) => t,
                        None => {
                            let last = self.tokens.pop()?;
                            return Err(Self::syntax_error(&last).into());
                        }
                    };
                    self.stats.shifts += 1;
                }

                ParserAction::Reduce(prod_id) => {
                    let prod = &<D::Grammar as Grammar>::PRODUCTIONS[prod_id.index()];
                    log::trace!("Reduce {:?}", prod_id);
                    self.driver
                        .reduce(&mut self.tokens, context, prod_id, &token)?;
                    let depth = self
                        .states
                        .len()
                        .checked_sub(prod.rhs.len() + 1)
                        .ok_or(GrammarError::StackUnderflow)?;
                    self.states.truncate(depth + 1);
                    state = self.states[depth];
                    let ParserAction::Goto(new_state) = self.table.lookup(state, prod.lhs) else {
                        return Err(GrammarError::MissingGoto {
                            state: state.0,
                            token: prod.lhs.label(),
                        }
                        .into());
                    };
                    state = new_state;
                    self.states.push(state);
                    self.stats.reductions += 1;
                }

                ParserAction::Accept => {
                    log::trace!("Accept");
                    debug_assert_eq!(self.tokens.len(), 1);
                    return Ok(Some(self.tokens.pop()?));
                }

                ParserAction::Error => {
                    log::trace!("Error on {:?}", token);
                    return Err(Self::syntax_error(&token).into());
                }

                ParserAction::Goto(_) => {
                    return Err(GrammarError::MissingGoto {
                        state: state.0,
                        token: token.token_id().label(),
                    }
                    .into());
                }
            }
            self.dump_state(&token);
        }
    }

    fn dump_state(&self, incoming: &D::Token) {
        if !log::log_enabled!(log::Level::Trace) {
            return;
        }
        let mut output = std::string::String::new();
        for (token, state) in self.tokens.tokens.iter().zip(self.states.iter()) {
            let _ = write!(output, "<{}>  {:?}  ", state.0, token.token_id());
        }
        if let Some(state) = self.states.last() {
            let _ = write!(output, "<{}>  <-  {:?}", state.0, incoming.token_id());
        }
        log::trace!("{}", output);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{LexerCtx, LexerData, LexerRule, LexerTable};
    use crate::{Span, span};

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    // Start -> Sum ; Sum -> Sum + num | num
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum XTokenID {
        Start,
        Sum,
        Plus,
        Num,
        End,
    }

    impl From<XTokenID> for usize {
        fn from(t: XTokenID) -> usize {
            t as usize
        }
    }

    impl ParserTokenID for XTokenID {
        const COUNT_NONTERMINALS: usize = 2;
        const COUNT_TERMINALS: usize = 3;
        const END: Self = XTokenID::End;

        fn label(&self) -> &'static str {
            match self {
                XTokenID::Start => "Start",
                XTokenID::Sum => "Sum",
                XTokenID::Plus => "plus",
                XTokenID::Num => "num",
                XTokenID::End => "end",
            }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum XProdID {
        Start,
        Sum1,
        Sum2,
    }

    impl From<XProdID> for usize {
        fn from(p: XProdID) -> usize {
            p as usize
        }
    }

    impl ParserProdID for XProdID {}

    struct XGrammar;
    impl Grammar for XGrammar {
        type TokenID = XTokenID;
        type ProdID = XProdID;
        const PRODUCTIONS: &'static [Production<XTokenID, XProdID>] = &[
            Production {
                id: XProdID::Start,
                lhs: XTokenID::Start,
                rhs: &[XTokenID::Sum],
            },
            Production {
                id: XProdID::Sum1,
                lhs: XTokenID::Sum,
                rhs: &[XTokenID::Sum, XTokenID::Plus, XTokenID::Num],
            },
            Production {
                id: XProdID::Sum2,
                lhs: XTokenID::Sum,
                rhs: &[XTokenID::Num],
            },
        ];
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum XRule {
        Num,
        Plus,
        Space,
        End,
    }

    impl LexerRule for XRule {
        const END: Self = XRule::End;
    }

    struct XLexerData;
    impl LexerData for XLexerData {
        type LexerRule = XRule;
        const RULES: &'static [(XRule, &'static str)] =
            &[(XRule::Num, r"[0-9]+"), (XRule::Plus, r"\+"), (XRule::Space, r" +")];
    }

    #[derive(Debug, Clone)]
    struct XToken {
        token_id: XTokenID,
        value: i64,
        span: Option<Span>,
    }

    impl Token for XToken {
        type TokenID = XTokenID;
        fn token_id(&self) -> XTokenID {
            self.token_id
        }
        fn span(&self) -> Option<Span> {
            self.span
        }
    }

    struct XLexer<I: Iterator<Item = u8>> {
        ctx: LexerCtx<I, XLexerData, XToken>,
    }

    impl<I: Iterator<Item = u8>> Lexer for XLexer<I> {
        type Input = I;
        type LexerData = XLexerData;
        type Token = XToken;

        fn ctx(&self) -> &LexerCtx<I, XLexerData, XToken> {
            &self.ctx
        }
        fn ctx_mut(&mut self) -> &mut LexerCtx<I, XLexerData, XToken> {
            &mut self.ctx
        }

        fn action(&mut self, rule: XRule) -> Result<(), LexError> {
            let span = Some(self.ctx.span());
            let (token_id, value) = match rule {
                XRule::Space => return Ok(()),
                XRule::Num => {
                    let s = self.ctx.take_str()?;
                    let n = s
                        .parse::<i64>()
                        .map_err(|_| LexError::new(self.ctx.span().start, s.as_str()))?;
                    (XTokenID::Num, n)
                }
                XRule::Plus => (XTokenID::Plus, 0),
                XRule::End => (XTokenID::End, 0),
            };
            self.ctx.yield_token(XToken {
                token_id,
                value,
                span,
            });
            Ok(())
        }
    }

    #[derive(Debug, PartialEq)]
    enum XError {
        Lex(LexError),
        Syntax(SyntaxError),
        Grammar(GrammarError),
    }

    impl From<LexError> for XError {
        fn from(e: LexError) -> Self {
            XError::Lex(e)
        }
    }

    impl From<SyntaxError> for XError {
        fn from(e: SyntaxError) -> Self {
            XError::Syntax(e)
        }
    }

    impl From<GrammarError> for XError {
        fn from(e: GrammarError) -> Self {
            XError::Grammar(e)
        }
    }

    /// Sums numbers; the context counts reductions.
    struct XDriver;
    impl ParserDriver for XDriver {
        type Grammar = XGrammar;
        type Token = XToken;
        type Context = Vec<XProdID>;
        type Error = XError;

        fn reduce(
            &mut self,
            stack: &mut TokenStack<XToken>,
            context: &mut Vec<XProdID>,
            prod_id: XProdID,
            _lookahead: &XToken,
        ) -> Result<(), XError> {
            context.push(prod_id);
            match prod_id {
                XProdID::Start => unreachable!(),
                XProdID::Sum1 => {
                    let num = stack.pop()?;
                    stack.pop()?;
                    let mut sum = stack.pop()?;
                    sum.value += num.value;
                    sum.span = Some(sum.span.unwrap().merge(&num.span.unwrap()));
                    stack.push(sum);
                }
                XProdID::Sum2 => {
                    let mut num = stack.pop()?;
                    num.token_id = XTokenID::Sum;
                    stack.push(num);
                }
            }
            Ok(())
        }
    }

    fn parse(s: &str) -> (Result<Option<XToken>, XError>, Vec<XProdID>) {
        init_logger();
        let lexer_table: &'static LexerTable<XLexerData> =
            Box::leak(Box::new(LexerTable::try_build().unwrap()));
        let parse_table: &'static ParseTable<XGrammar> =
            Box::leak(Box::new(ParseTable::try_build().unwrap()));
        let lexer = XLexer {
            ctx: LexerCtx::new(s.bytes(), lexer_table),
        };
        let mut parser = Parser::new(lexer, XDriver, parse_table);
        let mut reductions = Vec::new();
        let result = parser.try_next(&mut reductions);
        (result, reductions)
    }

    #[test]
    fn reduces_left_to_right() {
        let (result, reductions) = parse("1 + 2 + 39");
        let tok = result.unwrap().unwrap();
        assert_eq!(tok.token_id, XTokenID::Sum);
        assert_eq!(tok.value, 42);
        assert_eq!(tok.span, span!(0, 10));
        assert_eq!(reductions, vec![XProdID::Sum2, XProdID::Sum1, XProdID::Sum1]);
    }

    #[test]
    fn unexpected_token_is_syntax_error() {
        let (result, _) = parse("1 + + 2");
        assert_eq!(
            result.unwrap_err(),
            XError::Syntax(SyntaxError {
                token: "plus",
                span: span!(4, 5),
            })
        );
    }

    #[test]
    fn premature_end_is_syntax_error() {
        let (result, _) = parse("1 +");
        assert_eq!(
            result.unwrap_err(),
            XError::Syntax(SyntaxError {
                token: "end",
                span: span!(3, 3),
            })
        );
    }

    #[test]
    fn lexical_error_propagates() {
        let (result, reductions) = parse("1 + x");
        assert_eq!(result.unwrap_err(), XError::Lex(LexError::new(4, "x")));
        assert_eq!(reductions, vec![XProdID::Sum2]);
    }

    #[test]
    fn table_is_deterministic() {
        let table = ParseTable::<XGrammar>::try_build().unwrap();
        assert!(!table.is_empty());
        assert!(matches!(
            table.lookup(table.start_state(), XTokenID::Num),
            ParserAction::Shift(_)
        ));
        assert_eq!(
            table.lookup(table.start_state(), XTokenID::Plus),
            ParserAction::Error
        );
    }

    #[test]
    fn dump_lists_productions() {
        let mut out = Vec::new();
        ParseTable::<XGrammar>::dump(&mut out).unwrap();
        let text = std::string::String::from_utf8(out).unwrap();
        assert!(text.contains("P,1,Sum -> Sum plus num"));
        assert!(text.contains("FOLLOW,Sum,{plus, end}"));
    }
}
