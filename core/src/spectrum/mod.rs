//! Spectrum

mod rgb_spectrum;

// Re-export
pub use rgb_spectrum::*;

/// Rendering uses RGB tristimulus values.
pub type Spectrum = RGBSpectrum;
