//! # Binding environment
//!
//! [`Bindings`] maps identifier names to the last [`Complex`] value assigned
//! to them, built on [`indexmap::IndexMap`]. Reads never create entries;
//! writes overwrite.
//!
//! A host creates one `Bindings` per session and passes it to every
//! evaluation in that session; separate sessions use separate instances.
//!
//! ## Example
//! ```rust
//! # use cxcalc::{Bindings, Complex, SemanticError};
//! let mut env = Bindings::new();
//! assert!(env.set("x", Complex::I).is_none());
//! assert_eq!(env.lookup("x").unwrap(), Complex::I);
//! assert!(matches!(env.lookup("y"), Err(SemanticError::Unbound { .. })));
//! ```

use crate::Complex;
use indexmap::IndexMap;
use smartstring::alias::String;
use thiserror::Error;

/// Errors raised by semantic actions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticError {
    /// An identifier was read before any value was assigned to it.
    #[error("unbound identifier {name:?}")]
    Unbound {
        /// The identifier that was looked up.
        name: String,
    },

    /// A reduction found a child without the value its production needs.
    /// The grammar never produces this.
    #[error("operand {index} of {production} has no value")]
    Operand {
        production: &'static str,
        index: usize,
    },
}

/// Identifier to value bindings for one session.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    tab: IndexMap<String, Complex>,
}

impl Bindings {
    /// Creates a new, empty environment.
    pub fn new() -> Self {
        Self {
            tab: IndexMap::new(),
        }
    }

    /// Returns the number of bound identifiers.
    pub fn len(&self) -> usize {
        self.tab.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tab.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tab.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<Complex> {
        self.tab.get(name).copied()
    }

    /// Returns the value bound to `name`.
    ///
    /// # Errors
    /// [`SemanticError::Unbound`] if `name` has never been assigned.
    pub fn lookup(&self, name: &str) -> Result<Complex, SemanticError> {
        self.get(name).ok_or_else(|| SemanticError::Unbound {
            name: String::from(name),
        })
    }

    /// Binds `name` to `value`, returning the value it replaces.
    ///
    /// # Examples
    /// ```
    /// # use cxcalc::{Bindings, Complex};
    /// let mut env = Bindings::new();
    /// env.set("z", Complex::ONE);
    /// assert_eq!(env.set("z", Complex::ZERO), Some(Complex::ONE));
    /// assert_eq!(env.len(), 1);
    /// ```
    pub fn set(&mut self, name: impl AsRef<str>, value: Complex) -> Option<Complex> {
        let name = name.as_ref();
        log::debug!("bind {} = {}", name, value);
        self.tab.insert(String::from(name), value)
    }

    /// Iterates over bindings in first-assignment order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Complex)> + '_ {
        self.tab.iter().map(|(name, value)| (name.as_str(), *value))
    }
}
