#![crate_type = "rlib"]
//! Hard-coded geometry and the small bits of per-frame state the lessons animate.

pub mod mesh;
pub mod oscillator;
pub mod projection;
pub mod vertex;

pub use mesh::Mesh;
pub use oscillator::Oscillator;
pub use vertex::Vertex;
