//! Symbol module - String interning for identifiers and lexemes.
//!
//! A [`Symbol`] is a 4-byte handle to an interned string. Each unique
//! string is stored exactly once for the lifetime of the process, so
//! symbol comparison is a single integer compare and the same identifier
//! appearing thousands of times costs one allocation.
//!
//! The interner is fully thread-safe: concurrent compilations may intern
//! without blocking each other.
//!
//! # Examples
//!
//! ```
//! use hexc_util::symbol::Symbol;
//!
//! let a = Symbol::intern("main");
//! let b = Symbol::intern("main");
//! let c = Symbol::intern("helper");
//!
//! assert_eq!(a, b);
//! assert_ne!(a, c);
//! assert_eq!(a.as_str(), "main");
//! ```

use std::fmt;
use std::sync::{OnceLock, RwLock};

use dashmap::DashMap;

use crate::error::{UtilError, UtilResult};

/// A compact handle to an interned string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(u32);

impl Symbol {
    /// Intern a string, returning its stable handle.
    ///
    /// Interning the same string twice yields the same symbol.
    pub fn intern(string: &str) -> Symbol {
        interner().intern(string)
    }

    /// Look up the string this symbol refers to.
    ///
    /// # Panics
    ///
    /// Panics on a handle this interner never issued; such a handle
    /// can only come from a compiler bug. Use [`Symbol::try_as_str`]
    /// where a `Result` is preferred.
    pub fn as_str(self) -> &'static str {
        self.try_as_str()
            .expect("symbol from a foreign interner")
    }

    /// Fallible variant of [`Symbol::as_str`].
    pub fn try_as_str(self) -> UtilResult<&'static str> {
        interner().resolve(self)
    }

    /// Raw index of this symbol in the intern table.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:?})", self.as_str())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Global intern table.
///
/// Strings are leaked into `'static` storage; total usage is bounded by
/// the size of the source being compiled, and handles must stay valid
/// for the lifetime of every AST that references them.
struct Interner {
    map: DashMap<&'static str, u32, ahash::RandomState>,
    strings: RwLock<Vec<&'static str>>,
}

impl Interner {
    fn new() -> Self {
        Self {
            map: DashMap::with_hasher(ahash::RandomState::new()),
            strings: RwLock::new(Vec::new()),
        }
    }

    fn intern(&self, string: &str) -> Symbol {
        if let Some(existing) = self.map.get(string) {
            return Symbol(*existing);
        }

        // Leak once; the entry API keeps a racing intern of the same
        // string from producing two indices.
        let leaked: &'static str = Box::leak(string.to_owned().into_boxed_str());
        let entry = self.map.entry(leaked).or_insert_with(|| {
            let mut strings = self.strings.write().unwrap();
            let index = strings.len() as u32;
            strings.push(leaked);
            index
        });
        Symbol(*entry)
    }

    fn resolve(&self, symbol: Symbol) -> UtilResult<&'static str> {
        let strings = self.strings.read().unwrap();
        strings
            .get(symbol.0 as usize)
            .copied()
            .ok_or(UtilError::UnknownSymbol { index: symbol.0 })
    }
}

fn interner() -> &'static Interner {
    static INTERNER: OnceLock<Interner> = OnceLock::new();
    INTERNER.get_or_init(Interner::new)
}
