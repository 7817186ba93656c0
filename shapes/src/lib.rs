//! Shapes

#[macro_use]
extern crate log;

mod quad;
mod sphere;

// Re-export.
pub use quad::*;
pub use sphere::*;
