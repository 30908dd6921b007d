//! Identifier management using string interning for efficient storage and comparison
//!
//! Node and edge ids are opaque strings supplied by imports or generated by
//! edits. This module provides the [`Id`] type, a `Copy` handle onto an
//! interned string, so ids can be used freely as map keys and passed by value.

use std::{
    fmt,
    sync::{Mutex, OnceLock},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for efficient identifier storage.
///
/// # Thread Safety
///
/// This uses `Mutex` for thread-safe access to the string interner.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> std::sync::MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Efficient identifier type using string interning
///
/// # Examples
///
/// ```
/// use mindmap_core::identifier::Id;
///
/// let root = Id::new("root");
/// let child = Id::new("node_2");
///
/// assert_eq!(root, "root");
/// assert_ne!(root, child);
///
/// let edge = Id::edge(root, child);
/// assert_eq!(edge, "edge-root-node_2");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from &str.
    ///
    /// # Arguments
    ///
    /// * `name` - The string representation of the identifier
    pub fn new(name: &str) -> Self {
        Self(interner().get_or_intern(name))
    }

    /// Creates the deterministic id of the edge `source -> target`.
    ///
    /// The same pair always yields the same id, so re-laying out or
    /// re-importing a map never changes edge identity. `-` and `%` in the
    /// source are percent-escaped, so the first `-` after the prefix always
    /// separates source from target and distinct pairs never share an id.
    pub fn edge(source: Id, target: Id) -> Self {
        let mut interner = interner();
        let source = interner.resolve(source.0).unwrap_or_default();
        let mut name = String::with_capacity(source.len() + 16);
        name.push_str("edge-");
        for ch in source.chars() {
            match ch {
                '-' => name.push_str("%2D"),
                '%' => name.push_str("%25"),
                _ => name.push(ch),
            }
        }
        name.push('-');
        name.push_str(interner.resolve(target.0).unwrap_or_default());
        Self(interner.get_or_intern(name))
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = interner();
        let str_value = interner.resolve(self.0).unwrap_or_default();
        write!(f, "{str_value}")
    }
}

impl From<&str> for Id {
    /// Creates an `Id` from a string slice
    ///
    /// This is a convenience implementation that calls `Id::new`.
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    /// Allows direct comparison with string slices: `id == "string"`
    fn eq(&self, other: &str) -> bool {
        let interner = interner();
        interner.resolve(self.0) == Some(other)
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}
