//! Rename shorthand bookkeeping

use std::collections::HashMap;
use std::fmt;

use void_event::Listener;

/// Handler argument to `proxy`/`unproxy`
#[derive(Clone)]
pub enum HandlerArg {
    /// A listener supplied by the caller, passed to the host untouched
    Explicit(Listener),
    /// Target event type for a pure rename
    Rename(String),
}

impl From<Listener> for HandlerArg {
    fn from(listener: Listener) -> Self {
        Self::Explicit(listener)
    }
}

impl From<&Listener> for HandlerArg {
    fn from(listener: &Listener) -> Self {
        Self::Explicit(listener.clone())
    }
}

impl From<&str> for HandlerArg {
    fn from(target: &str) -> Self {
        Self::Rename(target.to_string())
    }
}

impl From<String> for HandlerArg {
    fn from(target: String) -> Self {
        Self::Rename(target)
    }
}

impl fmt::Debug for HandlerArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(_) => f.write_str("Explicit(..)"),
            Self::Rename(target) => f.debug_tuple("Rename").field(target).finish(),
        }
    }
}

/// Registry key: source event type, then target event type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HandlerKey {
    /// Event type the proxy listens for
    pub source: String,
    /// Event type the proxy re-publishes as
    pub target: String,
}

impl HandlerKey {
    /// Key for a (source, target) pair
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

impl fmt::Display for HandlerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.target)
    }
}

/// Most recent synthesized rename handler per (source, target) pair
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<HandlerKey, Listener>,
}

impl HandlerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a handler, returning the one it replaces
    pub fn insert(&mut self, key: HandlerKey, handler: Listener) -> Option<Listener> {
        self.handlers.insert(key, handler)
    }

    /// Look up a handler. Entries stay in place after lookup.
    pub fn get(&self, key: &HandlerKey) -> Option<Listener> {
        self.handlers.get(key).cloned()
    }

    /// Number of recorded pairs
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no pair has been recorded
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.handlers.keys()).finish()
    }
}
