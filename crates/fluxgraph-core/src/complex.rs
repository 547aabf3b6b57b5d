//! Complex arithmetic for FFT dataflow nodes.
//!
//! The butterfly, DFT4 and twiddle nodes operate on [`Complex`] values in
//! double precision. Multiplication by `j` is an exact rotation
//! `(re, im) → (−im, re)` and never touches a real multiplier, which keeps the
//! radix-4 decomposition bit-exact for integer inputs.

use core::f64::consts::PI;
use core::fmt;
use core::num::NonZeroU32;
use core::ops::{Add, Mul, Neg, Sub};

/// A complex number `re + j·im`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Complex {
    /// Real part.
    pub re: f64,
    /// Imaginary part.
    pub im: f64,
}

impl Complex {
    /// `0 + 0j`.
    pub const ZERO: Complex = Complex::new(0.0, 0.0);
    /// `1 + 0j`.
    pub const ONE: Complex = Complex::new(1.0, 0.0);
    /// `0 + 1j`.
    pub const J: Complex = Complex::new(0.0, 1.0);

    /// Creates a complex number from its parts.
    #[inline]
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// Multiplies by `j`: `(re, im) → (−im, re)`.
    #[inline]
    pub fn mul_j(self) -> Self {
        Self::new(-self.im, self.re)
    }

    /// Complex conjugate.
    #[inline]
    pub fn conj(self) -> Self {
        Self::new(self.re, -self.im)
    }

    /// Magnitude `|z|`.
    #[inline]
    pub fn norm(self) -> f64 {
        libm::hypot(self.re, self.im)
    }

    /// Phase angle in radians, in `(−π, π]`.
    #[inline]
    pub fn arg(self) -> f64 {
        libm::atan2(self.im, self.re)
    }

    /// Returns true if both components are within `eps` of `other`.
    #[inline]
    pub fn approx_eq(self, other: Complex, eps: f64) -> bool {
        libm::fabs(self.re - other.re) <= eps && libm::fabs(self.im - other.im) <= eps
    }
}

impl Add for Complex {
    type Output = Complex;

    #[inline]
    fn add(self, rhs: Complex) -> Complex {
        Complex::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl Sub for Complex {
    type Output = Complex;

    #[inline]
    fn sub(self, rhs: Complex) -> Complex {
        Complex::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl Mul for Complex {
    type Output = Complex;

    #[inline]
    fn mul(self, rhs: Complex) -> Complex {
        complex_multiply(self, rhs)
    }
}

impl Neg for Complex {
    type Output = Complex;

    #[inline]
    fn neg(self) -> Complex {
        Complex::new(-self.re, -self.im)
    }
}

impl From<f64> for Complex {
    fn from(re: f64) -> Self {
        Complex::new(re, 0.0)
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.im.is_sign_negative() {
            write!(f, "{}-{}j", self.re, -self.im)
        } else {
            write!(f, "{}+{}j", self.re, self.im)
        }
    }
}

/// `(a.re·b.re − a.im·b.im, a.re·b.im + a.im·b.re)`.
#[inline]
pub fn complex_multiply(a: Complex, b: Complex) -> Complex {
    Complex::new(a.re * b.re - a.im * b.im, a.re * b.im + a.im * b.re)
}

/// Twiddle factor `W_N^k = e^{−j·2π·(k mod N)/N}`.
///
/// The exponent is reduced modulo `n` before the angle is computed, so
/// `twiddle_factor(8, 9)` and `twiddle_factor(8, 1)` are bit-identical.
pub fn twiddle_factor(n: NonZeroU32, k: u32) -> Complex {
    let n = n.get();
    let angle = -2.0 * PI * f64::from(k % n) / f64::from(n);
    Complex::new(libm::cos(angle), libm::sin(angle))
}

/// Twiddle parameters `(N, k)` carried by butterfly and twiddle nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Twiddle {
    /// Transform size `N`.
    pub n: NonZeroU32,
    /// Exponent `k` (reduced modulo `N` when evaluated).
    pub k: u32,
}

impl Twiddle {
    /// Creates twiddle parameters. Returns `None` when `n == 0`.
    pub fn new(n: u32, k: u32) -> Option<Self> {
        NonZeroU32::new(n).map(|n| Self { n, k })
    }

    /// Identity rotation `W_1^0 = 1`.
    pub const IDENTITY: Twiddle = Twiddle {
        n: NonZeroU32::MIN,
        k: 0,
    };

    /// Evaluates the rotation constant.
    #[inline]
    pub fn factor(self) -> Complex {
        twiddle_factor(self.n, self.k)
    }
}

impl fmt::Display for Twiddle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "W{}^{}", self.n, self.k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn tw(n: u32, k: u32) -> Complex {
        Twiddle::new(n, k).unwrap().factor()
    }

    #[test]
    fn multiply_matches_textbook_identity() {
        let a = Complex::new(1.5, -2.0);
        let b = Complex::new(-0.5, 3.0);
        let p = complex_multiply(a, b);
        assert_eq!(p, Complex::new(1.5 * -0.5 - (-2.0 * 3.0), 1.5 * 3.0 + (-2.0 * -0.5)));
        assert_eq!(a * b, p);
    }

    #[test]
    fn mul_j_is_exact_rotation() {
        let z = Complex::new(3.25, -7.5);
        assert_eq!(z.mul_j(), Complex::new(7.5, 3.25));
        assert_eq!(z.mul_j().mul_j(), -z);
        assert_eq!(z.mul_j(), z * Complex::J);
    }

    #[test]
    fn twiddle_quarter_turns() {
        assert!(tw(4, 0).approx_eq(Complex::ONE, EPS));
        assert!(tw(4, 1).approx_eq(Complex::new(0.0, -1.0), EPS));
        assert!(tw(4, 2).approx_eq(Complex::new(-1.0, 0.0), EPS));
        assert!(tw(4, 3).approx_eq(Complex::new(0.0, 1.0), EPS));
    }

    #[test]
    fn twiddle_exponent_reduced_modulo_n() {
        assert_eq!(tw(8, 9), tw(8, 1));
        assert_eq!(tw(16, 32), tw(16, 0));
        assert_eq!(tw(16, 0), Complex::new(1.0, -0.0));
    }

    #[test]
    fn twiddle_rejects_zero_size() {
        assert!(Twiddle::new(0, 3).is_none());
        assert_eq!(Twiddle::IDENTITY.factor(), Complex::new(1.0, -0.0));
    }

    #[test]
    fn norm_and_arg() {
        let z = Complex::new(3.0, 4.0);
        assert!((z.norm() - 5.0).abs() < EPS);
        assert!((Complex::new(0.0, 1.0).arg() - PI / 2.0).abs() < EPS);
        assert_eq!(z.conj(), Complex::new(3.0, -4.0));
    }

    #[cfg(feature = "std")]
    #[test]
    fn display_formats() {
        assert_eq!(Complex::new(1.0, -2.0).to_string(), "1-2j");
        assert_eq!(Complex::new(0.5, 0.0).to_string(), "0.5+0j");
        assert_eq!(Twiddle::new(8, 3).unwrap().to_string(), "W8^3");
    }
}
