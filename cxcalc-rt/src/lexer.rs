//! Table-driven lexer runtime.
//!
//! A lexer is described by an ordered table of `(rule, pattern)` pairs
//! ([`LexerData::RULES`]). The table is compiled once into a single anchored,
//! multi-pattern DFA ([`LexerTable`]). Scanning is maximal munch: the DFA is
//! driven byte by byte until it dies, and the longest prefix that matched any
//! pattern wins. When several patterns match that same prefix, the one listed
//! first in the table wins, which is how keywords beat identifiers.
//!
//! Concrete lexers implement [`Lexer`], owning a [`LexerCtx`] and providing an
//! [`action`](Lexer::action) hook that turns each matched rule into zero or
//! more tokens.

use crate::{GrammarError, LexError, Span};
use regex_automata::{
    Anchored, HalfMatch, Input, MatchKind,
    dfa::{Automaton, StartKind, dense},
    nfa::thompson,
    util::syntax,
};
use smartstring::alias::String;
use std::collections::VecDeque;
use std::fmt::Debug;
use std::marker::PhantomData;
use std::mem;

/// A token produced by a lexer and consumed by a parser.
pub trait Token: Clone + Debug {
    type TokenID: Copy + Debug + Eq + Into<usize>;

    fn token_id(&self) -> Self::TokenID;
    fn span(&self) -> Option<Span>;
}

/// A lexer rule identifier.
///
/// `END` is never matched by the DFA; it is passed to [`Lexer::action`] once
/// the input is exhausted so the lexer can emit its end-of-input token.
pub trait LexerRule: Copy + Debug + Eq + 'static {
    const END: Self;
}

/// Static description of a lexer: its rules and their patterns.
pub trait LexerData {
    type LexerRule: LexerRule;

    /// Rules in priority order. Patterns use `regex-automata` syntax.
    const RULES: &'static [(Self::LexerRule, &'static str)];
}

/// The compiled form of a [`LexerData`] rule table.
pub struct LexerTable<D>
where
    D: LexerData,
{
    dfa: dense::DFA<Vec<u32>>,
    _marker: PhantomData<fn() -> D>,
}

impl<D> LexerTable<D>
where
    D: LexerData,
{
    /// Compiles every rule pattern into one anchored DFA.
    ///
    /// The DFA reports all matching patterns (`MatchKind::All`) so that a
    /// keyword and an identifier matching the same prefix are both visible;
    /// the tie is broken by rule order in [`LexerTable::rule`].
    pub fn try_build() -> Result<Self, GrammarError> {
        let patterns: Vec<&str> = D::RULES.iter().map(|(_, pattern)| *pattern).collect();
        let dfa = dense::Builder::new()
            .syntax(syntax::Config::new().utf8(false))
            .thompson(thompson::Config::new().utf8(false))
            .configure(
                dense::DFA::config()
                    .match_kind(MatchKind::All)
                    .start_kind(StartKind::Anchored),
            )
            .build_many(&patterns)
            .map_err(|e| GrammarError::Regex(String::from(e.to_string().as_str())))?;
        log::debug!(
            "lexer table: {} rules, {} bytes of DFA",
            D::RULES.len(),
            dfa.memory_usage()
        );
        Ok(Self {
            dfa,
            _marker: PhantomData,
        })
    }

    /// Maps a DFA match state to the highest-priority rule it accepts.
    fn rule(&self, state: regex_automata::util::primitives::StateID) -> (usize, D::LexerRule) {
        let index = (0..self.dfa.match_len(state))
            .map(|i| self.dfa.match_pattern(state, i).as_usize())
            .min()
            .unwrap_or_default();
        (index, D::RULES[index].0)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LexerStats {
    pub unreads: usize,
    pub chars: usize,
    pub matches: usize,
}

/// Scanning state shared by all lexers: input, pushback, the current match
/// buffer and its span, and the queue of tokens yielded by actions.
pub struct LexerCtx<I, D, T>
where
    D: LexerData + 'static,
{
    table: &'static LexerTable<D>,

    input: I,
    unread: Vec<u8>,

    pub buffer: Vec<u8>,
    span: Span,

    pub end_flag: bool,
    tokens: VecDeque<T>,

    stats: LexerStats,
}

impl<I, D, T> LexerCtx<I, D, T>
where
    I: Iterator<Item = u8>,
    D: LexerData + 'static,
    T: Token,
{
    pub fn new(input: I, table: &'static LexerTable<D>) -> Self {
        Self {
            table,
            input,
            unread: Vec::new(),
            buffer: Vec::new(),
            span: Span::default(),
            end_flag: false,
            tokens: VecDeque::new(),
            stats: LexerStats::default(),
        }
    }

    fn next_byte(&mut self) -> Option<u8> {
        let b = self.unread.pop().or_else(|| {
            let b = self.input.next();
            if b.is_some() {
                self.stats.chars += 1;
            }
            b
        })?;
        self.buffer.push(b);
        self.span.end += 1;
        Some(b)
    }

    fn unread_to(&mut self, len: usize) {
        while self.buffer.len() > len {
            if let Some(b) = self.buffer.pop() {
                self.unread.push(b);
                self.span.end -= 1;
                self.stats.unreads += 1;
            }
        }
    }

    /// Finds the longest rule match at the current position.
    ///
    /// Returns `Ok(None)` at end of input and a [`LexError`] when input
    /// remains but no rule matches any prefix of it.
    fn try_match(&mut self) -> Result<Option<D::LexerRule>, LexError> {
        self.stats.matches += 1;
        self.buffer.clear();
        self.span.start = self.span.end;

        let table = self.table;
        let dfa = &table.dfa;
        let mut state = dfa
            .start_state_forward(&Input::new(&[]).anchored(Anchored::Yes))
            .map_err(|e| LexError::new(self.span.start, e.to_string()))?;
        let mut last_match: Option<(HalfMatch, D::LexerRule)> = None;
        let mut eoi = true;
        let mut i = 0;

        while let Some(b) = self.next_byte() {
            state = dfa.next_state(state, b);
            if dfa.is_special_state(state) {
                if dfa.is_match_state(state) {
                    let (pattern, rule) = table.rule(state);
                    log::trace!(
                        "MATCH: i={}, b={:?}, n={}, p={}",
                        i,
                        b as char,
                        dfa.match_len(state),
                        pattern,
                    );
                    // Matches are reported one byte late: this state accepts
                    // the first `i` bytes.
                    last_match = Some((HalfMatch::must(pattern, i), rule));
                } else if dfa.is_dead_state(state) || dfa.is_quit_state(state) {
                    log::trace!("DEAD: i={}, b={:?}", i, b as char);
                    eoi = false;
                    break;
                }
            }
            i += 1;
        }

        if eoi {
            state = dfa.next_eoi_state(state);
            if dfa.is_match_state(state) {
                let (pattern, rule) = table.rule(state);
                last_match = Some((HalfMatch::must(pattern, i), rule));
            }
        }

        match last_match {
            Some((m, rule)) => {
                self.unread_to(m.offset());
                Ok(Some(rule))
            }
            None if self.buffer.is_empty() => Ok(None),
            None => {
                let offset = self.span.start;
                let text = match self.buffer.first() {
                    Some(b) if b.is_ascii() => {
                        let mut s = String::new();
                        s.push(*b as char);
                        s
                    }
                    _ => String::from(format!("0x{}", hex::encode(&self.buffer)).as_str()),
                };
                Err(LexError { offset, text })
            }
        }
    }

    pub fn yield_token(&mut self, token: T) {
        self.tokens.push_back(token);
    }

    /// Span of the current match.
    pub fn span(&self) -> Span {
        self.span
    }

    pub fn take_bytes(&mut self) -> Vec<u8> {
        mem::take(&mut self.buffer)
    }

    /// Takes the current match as text.
    pub fn take_str(&mut self) -> Result<String, LexError> {
        let offset = self.span.start;
        let bytes = self.take_bytes();
        let s = std::string::String::from_utf8(bytes)
            .map_err(|e| LexError::new(offset, format!("0x{}", hex::encode(e.as_bytes()))))?;
        Ok(String::from(s.as_str()))
    }

    pub fn stats(&self) -> LexerStats {
        self.stats
    }
}

pub trait Lexer {
    type Input: Iterator<Item = u8>;
    type LexerData: LexerData + 'static;
    type Token: Token;

    fn ctx(&self) -> &LexerCtx<Self::Input, Self::LexerData, Self::Token>;
    fn ctx_mut(&mut self) -> &mut LexerCtx<Self::Input, Self::LexerData, Self::Token>;

    /// Called for every matched rule, and once with `LexerRule::END`.
    fn action(
        &mut self,
        rule: <Self::LexerData as LexerData>::LexerRule,
    ) -> Result<(), LexError>;

    fn stats(&self) -> LexerStats {
        self.ctx().stats()
    }

    #[inline]
    fn try_next(&mut self) -> Result<Option<Self::Token>, LexError> {
        if let Some(t) = self.ctx_mut().tokens.pop_front() {
            return Ok(Some(t));
        }

        if self.ctx().end_flag {
            return Ok(None);
        }

        while let Some(rule) = self.ctx_mut().try_match()? {
            log::trace!(
                "MATCHED: LexerRule: {:?}, Span: {:?}, Buffer: {:?}",
                rule,
                self.ctx().span(),
                match std::str::from_utf8(&self.ctx().buffer) {
                    Ok(s) => s.to_owned(),
                    Err(_) => hex::encode(&self.ctx().buffer),
                },
            );

            self.action(rule)?;

            if let Some(t) = self.ctx_mut().tokens.pop_front() {
                return Ok(Some(t));
            }
        }
        self.ctx_mut().end_flag = true;
        let end = self.ctx().span.end;
        self.ctx_mut().span = Span::new(end, end);

        self.action(<Self::LexerData as LexerData>::LexerRule::END)?;

        Ok(self.ctx_mut().tokens.pop_front())
    }

    /// Drains the lexer, returning every token including the end token.
    fn try_collect(&mut self) -> Result<Vec<Self::Token>, LexError> {
        let mut tokens = Vec::new();
        while let Some(t) = self.try_next()? {
            tokens.push(t);
        }
        Ok(tokens)
    }
}
