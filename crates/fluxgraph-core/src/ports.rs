//! Ordered port → token maps.
//!
//! [`PortValues`] is used for node mailboxes, for the inputs handed to the
//! executor and for the outputs it produces. Iteration order is insertion
//! order; the scheduler inserts inputs in declared port order, so "the first
//! input" is always the first declared input port.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::graph::PortId;
use crate::token::Token;

/// Insertion-ordered map from port name to token.
///
/// Inserting on a port that already holds a token replaces it in place and
/// returns the previous token.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortValues {
    entries: Vec<(PortId, Token)>,
}

impl PortValues {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Creates an empty map with room for `capacity` ports.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Stores `token` on `port`, returning the token it replaced.
    pub fn insert(&mut self, port: impl Into<PortId>, token: Token) -> Option<Token> {
        let port = port.into();
        match self.entries.iter_mut().find(|(p, _)| *p == port) {
            Some((_, slot)) => Some(core::mem::replace(slot, token)),
            None => {
                self.entries.push((port, token));
                None
            }
        }
    }

    /// Returns the token on `port`.
    pub fn get(&self, port: &str) -> Option<&Token> {
        self.entries
            .iter()
            .find(|(p, _)| p == port)
            .map(|(_, t)| t)
    }

    /// Returns true if `port` holds a token.
    pub fn contains(&self, port: &str) -> bool {
        self.get(port).is_some()
    }

    /// Returns the first token in iteration order.
    pub fn first(&self) -> Option<&Token> {
        self.entries.first().map(|(_, t)| t)
    }

    /// Number of occupied ports.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no port holds a token.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every token.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterates `(port, token)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Token)> {
        self.entries.iter().map(|(p, t)| (p.as_str(), t))
    }

    /// Iterates port names in insertion order.
    pub fn ports(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(p, _)| p.as_str())
    }
}

impl FromIterator<(PortId, Token)> for PortValues {
    fn from_iter<I: IntoIterator<Item = (PortId, Token)>>(iter: I) -> Self {
        let mut values = PortValues::new();
        for (port, token) in iter {
            values.insert(port, token);
        }
        values
    }
}
