//! Per-edge channel buffers.
//!
//! A [`ChannelBuffer`] is an unbounded FIFO of tokens. The edge's delay gates
//! *when* the head may leave ([`pop_ready`](ChannelBuffer::pop_ready)); it never
//! reorders the queue, so tokens always leave in enqueue order even when a
//! later token would already be "ripe".

use alloc::collections::VecDeque;

use crate::time::Time;
use crate::token::Token;

/// FIFO queue of tokens owned by one edge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelBuffer {
    queue: VecDeque<Token>,
}

impl ChannelBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Appends a token at the tail.
    #[inline]
    pub fn push(&mut self, token: Token) {
        self.queue.push_back(token);
    }

    /// Returns the head without removing it.
    #[inline]
    pub fn peek(&self) -> Option<&Token> {
        self.queue.front()
    }

    /// Removes and returns the head.
    #[inline]
    pub fn pop(&mut self) -> Option<Token> {
        self.queue.pop_front()
    }

    /// Returns true if the head has spent at least `delay` in the channel.
    #[inline]
    pub fn is_head_ready(&self, now: Time, delay: Time) -> bool {
        self.peek().is_some_and(|t| now - t.arrival_time >= delay)
    }

    /// Pops the head if [`is_head_ready`](Self::is_head_ready).
    pub fn pop_ready(&mut self, now: Time, delay: Time) -> Option<Token> {
        if self.is_head_ready(now, delay) {
            self.pop()
        } else {
            None
        }
    }

    /// Number of queued tokens.
    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns true if nothing is queued.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drops every queued token.
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// Iterates queued tokens from head to tail.
    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.queue.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenId;

    fn tok(id: u64, arrival: Time) -> Token {
        Token::new(TokenId::new(id), 0.0, arrival)
    }

    #[test]
    fn fifo_order() {
        let mut buf = ChannelBuffer::new();
        buf.push(tok(0, 0.0));
        buf.push(tok(1, 0.0));
        buf.push(tok(2, 0.0));
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.peek().unwrap().id, TokenId::new(0));
        assert_eq!(buf.pop().unwrap().id, TokenId::new(0));
        assert_eq!(buf.pop().unwrap().id, TokenId::new(1));
        assert_eq!(buf.pop().unwrap().id, TokenId::new(2));
        assert!(buf.pop().is_none());
    }

    #[test]
    fn delay_gates_head_only() {
        let mut buf = ChannelBuffer::new();
        buf.push(tok(0, 10.0));
        buf.push(tok(1, 0.0));
        // The second token is older but must not overtake the head.
        assert!(buf.pop_ready(15.0, 10.0).is_none());
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.pop_ready(20.0, 10.0).unwrap().id, TokenId::new(0));
        assert_eq!(buf.pop_ready(20.0, 10.0).unwrap().id, TokenId::new(1));
    }

    #[test]
    fn delay_boundary_is_inclusive() {
        let mut buf = ChannelBuffer::new();
        buf.push(tok(0, 4.0));
        assert!(!buf.is_head_ready(8.999, 5.0));
        assert!(buf.is_head_ready(9.0, 5.0));
    }

    #[test]
    fn clear_drops_everything() {
        let mut buf = ChannelBuffer::new();
        buf.push(tok(0, 0.0));
        buf.push(tok(1, 0.0));
        buf.clear();
        assert!(buf.is_empty());
        assert!(!buf.is_head_ready(100.0, 0.0));
    }
}
