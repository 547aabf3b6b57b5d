//! Reference DFTs
//!
//! [`reference_dft`] is the ground truth sink values are checked against:
//! a forward, unnormalized rustfft transform in double precision.
//! [`naive_dft`] is the textbook `O(N²)` sum, kept for cross-checking the
//! reference itself.

use std::f64::consts::PI;
use std::sync::Arc;

use fluxgraph_core::Complex;
use rustfft::FftPlanner;
use rustfft::num_complex::Complex as FftComplex;

/// Cached forward FFT plan.
pub struct ReferenceFft {
    planner: FftPlanner<f64>,
    fft: Arc<dyn rustfft::Fft<f64>>,
    size: usize,
}

impl ReferenceFft {
    /// Plans a forward FFT of `size` points.
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);
        Self { planner, fft, size }
    }

    /// Planned size.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Re-plans for a new size if it changed.
    pub fn resize(&mut self, size: usize) {
        if size != self.size {
            self.fft = self.planner.plan_fft_forward(size);
            self.size = size;
        }
    }

    /// Transforms `input`, zero-padding or truncating it to the planned size.
    pub fn forward(&self, input: &[Complex]) -> Vec<Complex> {
        let mut buffer: Vec<FftComplex<f64>> = input
            .iter()
            .take(self.size)
            .map(|c| FftComplex::new(c.re, c.im))
            .collect();
        buffer.resize(self.size, FftComplex::new(0.0, 0.0));
        self.fft.process(&mut buffer);
        buffer.into_iter().map(|c| Complex::new(c.re, c.im)).collect()
    }
}

/// Forward, unnormalized DFT of `input` via rustfft.
pub fn reference_dft(input: &[Complex]) -> Vec<Complex> {
    if input.is_empty() {
        return Vec::new();
    }
    ReferenceFft::new(input.len()).forward(input)
}

/// `X[k] = Σ x[n]·e^{−j2πkn/N}`, evaluated directly.
pub fn naive_dft(input: &[Complex]) -> Vec<Complex> {
    let n = input.len();
    (0..n)
        .map(|k| {
            input.iter().enumerate().fold(Complex::ZERO, |acc, (i, &x)| {
                let angle = -2.0 * PI * ((k * i) % n) as f64 / n as f64;
                acc + x * Complex::new(angle.cos(), angle.sin())
            })
        })
        .collect()
}
