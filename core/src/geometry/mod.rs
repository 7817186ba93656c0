//! Geometry

mod bounds2;
mod bounds3;
mod common;
mod normal3;
mod point2;
mod point3;
mod ray;
mod shape;
mod vector2;
mod vector3;

// Re-export
pub use bounds2::*;
pub use bounds3::*;
pub use common::*;
pub use normal3::*;
pub use point2::*;
pub use point3::*;
pub use ray::*;
pub use shape::*;
pub use vector2::*;
pub use vector3::*;
