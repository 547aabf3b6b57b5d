//! Spectrum helpers

use fluxgraph_core::Complex;

/// Floor applied before taking logarithms.
pub const MAGNITUDE_FLOOR: f64 = 1e-12;

/// `|X[k]|` per bin.
pub fn magnitude(spectrum: &[Complex]) -> Vec<f64> {
    spectrum.iter().map(|c| c.norm()).collect()
}

/// `20·log10(|X[k]|)` per bin, floored at [`MAGNITUDE_FLOOR`].
pub fn magnitude_db(spectrum: &[Complex]) -> Vec<f64> {
    spectrum
        .iter()
        .map(|c| 20.0 * c.norm().max(MAGNITUDE_FLOOR).log10())
        .collect()
}

/// Magnitude in dB relative to the loudest bin, clamped to `floor_db`.
///
/// The peak bin is 0 dB; every value lies in `[floor_db, 0]`.
pub fn relative_db(spectrum: &[Complex], floor_db: f64) -> Vec<f64> {
    let mags = magnitude(spectrum);
    let peak = mags.iter().copied().fold(MAGNITUDE_FLOOR, f64::max);
    mags.into_iter()
        .map(|m| (20.0 * (m.max(MAGNITUDE_FLOOR) / peak).log10()).max(floor_db))
        .collect()
}

/// Phase in radians, `[-π, π]`.
pub fn phase(spectrum: &[Complex]) -> Vec<f64> {
    spectrum.iter().map(|c| c.arg()).collect()
}

/// Index of the largest-magnitude bin.
pub fn peak_bin(spectrum: &[Complex]) -> Option<usize> {
    magnitude(spectrum)
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(k, _)| k)
}
