//! Integrators

#[macro_use]
extern crate log;

mod mlt;
mod path;

#[cfg(test)]
mod test_scenes;

// Re-export.
pub use mlt::*;
pub use path::*;
