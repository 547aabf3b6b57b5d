//! fluxgraph Topology - FFT graph generators
//!
//! Builds immutable [`Graph`]s for the FFT factorizations fluxgraph
//! simulates:
//!
//! - [`radix2`] - `N`-point radix-2 decimation-in-frequency network
//! - [`dft4x4`] - 16-point DFT as row DFT4s, twiddles and column DFT4s
//! - [`butterfly_demo`] - a single butterfly between two sources and two sinks
//!
//! Every generator names its sources `src{i}` and its sinks `snk{k}` so that
//! sink `k` observes bin `X[k]` of the DFT of the source vector.
//!
//! # Example
//!
//! ```rust
//! use fluxgraph_topology::{TopologyKind, radix2};
//!
//! let g = radix2(8, 80.0).unwrap();
//! assert_eq!(g.source_count(), 8);
//!
//! let kind: TopologyKind = "dft4x4".parse().unwrap();
//! let g = kind.build(16, 80.0, 10.0).unwrap();
//! assert_eq!(g.sink_count(), 16);
//! ```

pub mod demo;
pub mod dft4x4;
pub mod radix2;

use std::fmt;
use std::str::FromStr;

use fluxgraph_core::{Graph, Time};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use demo::{butterfly_demo, butterfly_pair};
pub use dft4x4::dft4x4;
pub use radix2::{radix2, radix2_with_latency};

/// Errors from graph generators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    /// Radix-2 size is not a power of two ≥ 2.
    #[error("size {0} is not a power of two >= 2")]
    NotPowerOfTwo(usize),

    /// A fixed-size topology was asked for another size.
    #[error("{kind} topology has fixed size {expected}, got {size}")]
    UnsupportedSize {
        /// Topology name.
        kind: TopologyKind,
        /// Size it supports.
        expected: usize,
        /// Size requested.
        size: usize,
    },

    /// Unrecognized topology name.
    #[error("unknown topology '{0}' (expected one of: radix2, dft4x4, butterfly)")]
    UnknownKind(String),
}

/// Selectable graph generator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopologyKind {
    /// [`radix2`].
    #[default]
    Radix2,
    /// [`dft4x4`].
    Dft4x4,
    /// [`butterfly_pair`].
    Butterfly,
}

impl TopologyKind {
    /// Every kind, in display order.
    pub const ALL: [TopologyKind; 3] = [Self::Radix2, Self::Dft4x4, Self::Butterfly];

    /// Lowercase name used in config files and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Self::Radix2 => "radix2",
            Self::Dft4x4 => "dft4x4",
            Self::Butterfly => "butterfly",
        }
    }

    /// Size the generator is fixed to, if any.
    pub fn fixed_size(self) -> Option<usize> {
        match self {
            Self::Radix2 => None,
            Self::Dft4x4 => Some(dft4x4::SIZE),
            Self::Butterfly => Some(2),
        }
    }

    /// Builds the graph.
    ///
    /// `delay` applies to radix-2 and butterfly channels; the 4×4 network
    /// always uses [`dft4x4::EDGE_DELAY`]. `latency` is the butterfly or
    /// DFT4 latency.
    pub fn build(self, size: usize, delay: Time, latency: Time) -> Result<Graph, TopologyError> {
        if let Some(expected) = self.fixed_size() {
            if size != expected {
                return Err(TopologyError::UnsupportedSize {
                    kind: self,
                    expected,
                    size,
                });
            }
        }
        match self {
            Self::Radix2 => radix2_with_latency(size, delay, latency),
            Self::Dft4x4 => Ok(dft4x4(latency)),
            Self::Butterfly => Ok(butterfly_pair(delay, latency)),
        }
    }
}

impl fmt::Display for TopologyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TopologyKind {
    type Err = TopologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| TopologyError::UnknownKind(s.to_string()))
    }
}

/// Reverses the low `bits` bits of `i`.
///
/// ```rust
/// assert_eq!(fluxgraph_topology::bit_reverse(1, 3), 4);
/// assert_eq!(fluxgraph_topology::bit_reverse(6, 3), 3);
/// ```
pub fn bit_reverse(i: usize, bits: u32) -> usize {
    (0..bits).fold(0, |r, b| (r << 1) | ((i >> b) & 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_reverse_is_an_involution() {
        for bits in 1..6 {
            for i in 0..(1usize << bits) {
                assert_eq!(bit_reverse(bit_reverse(i, bits), bits), i);
            }
        }
        assert_eq!(bit_reverse(0b0011, 4), 0b1100);
    }

    #[test]
    fn kind_parsing() {
        assert_eq!("radix2".parse::<TopologyKind>(), Ok(TopologyKind::Radix2));
        assert_eq!("DFT4x4".parse::<TopologyKind>(), Ok(TopologyKind::Dft4x4));
        assert_eq!(
            "mesh".parse::<TopologyKind>(),
            Err(TopologyError::UnknownKind("mesh".into()))
        );
        for kind in TopologyKind::ALL {
            assert_eq!(kind.to_string().parse::<TopologyKind>(), Ok(kind));
        }
    }

    #[test]
    fn fixed_sizes_are_enforced() {
        assert!(TopologyKind::Dft4x4.build(16, 0.0, 1.0).is_ok());
        assert_eq!(
            TopologyKind::Dft4x4.build(8, 0.0, 1.0),
            Err(TopologyError::UnsupportedSize {
                kind: TopologyKind::Dft4x4,
                expected: 16,
                size: 8
            })
        );
        assert!(TopologyKind::Butterfly.build(2, 60.0, 1.0).is_ok());
        assert!(TopologyKind::Radix2.build(12, 60.0, 1.0).is_err());
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            TopologyError::NotPowerOfTwo(12).to_string(),
            "size 12 is not a power of two >= 2"
        );
    }
}
