//! Input presets for FFT graphs.
//!
//! Each preset produces one complex value per source `src0..src{N-1}`.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use fluxgraph_core::Complex;
use serde::{Deserialize, Serialize};

/// Named input vector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputPreset {
    /// `x[0] = 1`, zero elsewhere.
    #[default]
    #[serde(rename = "impulse")]
    Impulse,
    /// `x[0] = x[N/2] = 1`, zero elsewhere.
    #[serde(rename = "two-impulses")]
    TwoImpulses,
    /// Complex exponential at bin 1.
    #[serde(rename = "sin1")]
    Sin1,
    /// Complex exponential at bin 3.
    #[serde(rename = "sin3")]
    Sin3,
    /// Sum of the bin-1 and bin-3 exponentials.
    #[serde(rename = "sin1+3")]
    Sin1Plus3,
    /// `x[n] = n`.
    #[serde(rename = "ramp")]
    Ramp,
}

impl InputPreset {
    /// Every preset, in display order.
    pub const ALL: [InputPreset; 6] = [
        Self::Impulse,
        Self::TwoImpulses,
        Self::Sin1,
        Self::Sin3,
        Self::Sin1Plus3,
        Self::Ramp,
    ];

    /// Name used in config files and on the command line.
    pub fn label(self) -> &'static str {
        match self {
            Self::Impulse => "impulse",
            Self::TwoImpulses => "two-impulses",
            Self::Sin1 => "sin1",
            Self::Sin3 => "sin3",
            Self::Sin1Plus3 => "sin1+3",
            Self::Ramp => "ramp",
        }
    }

    /// One-line description.
    pub fn description(self) -> &'static str {
        match self {
            Self::Impulse => "unit impulse at n = 0 (flat spectrum)",
            Self::TwoImpulses => "impulses at n = 0 and n = N/2 (even bins only)",
            Self::Sin1 => "complex exponential e^{j2πn/N} (energy in bin 1)",
            Self::Sin3 => "complex exponential e^{j2π3n/N} (energy in bin 3)",
            Self::Sin1Plus3 => "sum of bin-1 and bin-3 exponentials",
            Self::Ramp => "linear ramp x[n] = n",
        }
    }

    /// Generates the `n`-point input vector.
    pub fn generate(self, n: usize) -> Vec<Complex> {
        (0..n).map(|i| self.sample(i, n)).collect()
    }

    fn sample(self, i: usize, n: usize) -> Complex {
        let tone = |bin: usize| {
            let angle = 2.0 * PI * (bin * i) as f64 / n as f64;
            Complex::new(angle.cos(), angle.sin())
        };
        match self {
            Self::Impulse => {
                if i == 0 {
                    Complex::ONE
                } else {
                    Complex::ZERO
                }
            }
            Self::TwoImpulses => {
                if i == 0 || i == n / 2 {
                    Complex::ONE
                } else {
                    Complex::ZERO
                }
            }
            Self::Sin1 => tone(1),
            Self::Sin3 => tone(3),
            Self::Sin1Plus3 => tone(1) + tone(3),
            Self::Ramp => Complex::new(i as f64, 0.0),
        }
    }
}

impl fmt::Display for InputPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error for an unrecognized preset name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPreset(pub String);

impl fmt::Display for UnknownPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown preset '{}'", self.0)
    }
}

impl std::error::Error for UnknownPreset {}

impl FromStr for InputPreset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.label() == s)
            .ok_or_else(|| UnknownPreset(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impulse_and_two_impulses() {
        let x = InputPreset::Impulse.generate(4);
        assert_eq!(x, [Complex::ONE, Complex::ZERO, Complex::ZERO, Complex::ZERO]);
        let x = InputPreset::TwoImpulses.generate(8);
        assert_eq!(x[0], Complex::ONE);
        assert_eq!(x[4], Complex::ONE);
        assert_eq!(x.iter().filter(|c| **c == Complex::ONE).count(), 2);
    }

    #[test]
    fn tones_are_unit_magnitude() {
        for v in InputPreset::Sin3.generate(16) {
            assert!((v.norm() - 1.0).abs() < 1e-12);
        }
        let x = InputPreset::Sin1.generate(4);
        assert!(x[1].approx_eq(Complex::new(0.0, 1.0), 1e-12));
    }

    #[test]
    fn ramp() {
        let x = InputPreset::Ramp.generate(3);
        assert_eq!(x, [Complex::ZERO, Complex::ONE, Complex::new(2.0, 0.0)]);
    }

    #[test]
    fn names_round_trip() {
        for p in InputPreset::ALL {
            assert_eq!(p.label().parse::<InputPreset>(), Ok(p));
        }
        assert!("square".parse::<InputPreset>().is_err());
    }

    #[test]
    fn serde_uses_labels() {
        let json = serde_json::to_string(&InputPreset::Sin1Plus3).unwrap();
        assert_eq!(json, r#""sin1+3""#);
    }
}
