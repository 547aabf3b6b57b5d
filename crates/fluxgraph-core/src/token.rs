//! Tokens: immutable values in flight between nodes.
//!
//! A [`Token`] carries a [`Value`], the time it entered its current channel
//! (`arrival_time`) and the time its causal chain began (`origin_time`).
//! `origin_time` is copied forward from the first consumed input and is used
//! only for end-to-end latency measurement.

use core::fmt;
use core::ops::{Add, Mul};

use crate::complex::Complex;
use crate::time::Time;

/// Unique, strictly increasing token identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TokenId(u64);

impl TokenId {
    /// Wraps a raw value.
    #[inline]
    pub fn new(raw: u64) -> Self {
        TokenId(raw)
    }

    /// Returns the raw value.
    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T#{}", self.0)
    }
}

/// Deterministic token-id generator (monotonic counter).
///
/// Each scheduler owns exactly one, so two runs with the same inputs mint
/// the same ids in the same order.
#[derive(Debug, Clone, Default)]
pub struct TokenIdGen {
    next: u64,
}

impl TokenIdGen {
    /// Creates a generator starting at 0.
    pub fn new() -> Self {
        TokenIdGen { next: 0 }
    }

    /// Creates a generator starting at `start`.
    pub fn starting_at(start: u64) -> Self {
        TokenIdGen { next: start }
    }

    /// Mints the next id.
    pub fn next_id(&mut self) -> TokenId {
        let id = TokenId(self.next);
        self.next += 1;
        id
    }

    /// Returns the id the next call to [`next_id`](Self::next_id) will mint.
    pub fn peek(&self) -> TokenId {
        TokenId(self.next)
    }
}

/// Payload of a token: a real scalar or a complex pair.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    /// Real number.
    Scalar(f64),
    /// Complex pair.
    Complex(Complex),
}

impl Value {
    /// Views the value as a complex number (scalars get a zero imaginary part).
    #[inline]
    pub fn as_complex(self) -> Complex {
        match self {
            Value::Scalar(re) => Complex::new(re, 0.0),
            Value::Complex(c) => c,
        }
    }

    /// Returns the scalar, or `None` for complex values.
    #[inline]
    pub fn as_scalar(self) -> Option<f64> {
        match self {
            Value::Scalar(x) => Some(x),
            Value::Complex(_) => None,
        }
    }

    /// Returns true for complex values.
    #[inline]
    pub fn is_complex(self) -> bool {
        matches!(self, Value::Complex(_))
    }
}

/// Scalar + scalar stays scalar; any complex operand promotes the result.
impl Add for Value {
    type Output = Value;

    fn add(self, rhs: Value) -> Value {
        match (self, rhs) {
            (Value::Scalar(a), Value::Scalar(b)) => Value::Scalar(a + b),
            (a, b) => Value::Complex(a.as_complex() + b.as_complex()),
        }
    }
}

/// Scalar × scalar stays scalar; any complex operand promotes the result.
impl Mul for Value {
    type Output = Value;

    fn mul(self, rhs: Value) -> Value {
        match (self, rhs) {
            (Value::Scalar(a), Value::Scalar(b)) => Value::Scalar(a * b),
            (a, b) => Value::Complex(a.as_complex() * b.as_complex()),
        }
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Scalar(x)
    }
}

impl From<Complex> for Value {
    fn from(c: Complex) -> Self {
        Value::Complex(c)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(x) => write!(f, "{x}"),
            Value::Complex(c) => write!(f, "{c}"),
        }
    }
}

/// An immutable unit of data in flight.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    /// Unique identity.
    pub id: TokenId,
    /// Payload.
    pub value: Value,
    /// Time the token entered its current channel.
    pub arrival_time: Time,
    /// Time the causal chain that produced this token began.
    pub origin_time: Time,
}

impl Token {
    /// Creates a token born at `time` (`arrival_time == origin_time == time`).
    pub fn new(id: TokenId, value: impl Into<Value>, time: Time) -> Self {
        Self {
            id,
            value: value.into(),
            arrival_time: time,
            origin_time: time,
        }
    }

    /// Returns a copy stamped with a new arrival time; identity, value and
    /// origin are preserved.
    #[inline]
    pub fn arriving_at(mut self, arrival_time: Time) -> Self {
        self.arrival_time = arrival_time;
        self
    }

    /// Time elapsed since the causal chain began, measured at `now`.
    #[inline]
    pub fn age(&self, now: Time) -> Time {
        now - self.origin_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_gen_is_monotonic() {
        let mut ids = TokenIdGen::new();
        let a = ids.next_id();
        let b = ids.next_id();
        assert_eq!(a.raw(), 0);
        assert_eq!(b.raw(), 1);
        assert!(a < b);
        assert_eq!(ids.peek().raw(), 2);
        assert_eq!(TokenIdGen::starting_at(40).next_id(), TokenId::new(40));
    }

    #[test]
    fn scalar_arithmetic_stays_scalar() {
        assert_eq!(Value::Scalar(2.0) + Value::Scalar(3.0), Value::Scalar(5.0));
        assert_eq!(Value::Scalar(2.0) * Value::Scalar(3.0), Value::Scalar(6.0));
    }

    #[test]
    fn complex_operand_promotes() {
        let c = Value::Complex(Complex::new(1.0, 1.0));
        assert_eq!(Value::Scalar(2.0) + c, Value::Complex(Complex::new(3.0, 1.0)));
        assert_eq!(c * Value::Scalar(2.0), Value::Complex(Complex::new(2.0, 2.0)));
        assert!(c.is_complex());
        assert_eq!(c.as_scalar(), None);
    }

    #[test]
    fn arriving_at_preserves_origin() {
        let t = Token::new(TokenId::new(7), 1.5, 10.0).arriving_at(42.0);
        assert_eq!(t.id, TokenId::new(7));
        assert_eq!(t.arrival_time, 42.0);
        assert_eq!(t.origin_time, 10.0);
        assert_eq!(t.age(50.0), 40.0);
    }
}
