//! The rendering arm of the lessons.
//!
//! [`GlBackend`] is the seam to the driver, [`gl_wrappers`] own the GL objects,
//! and [`Renderer`] issues the draws.
extern crate world;

pub mod backend;
pub mod context;
pub mod gl_call;
pub mod gl_wrappers;
pub mod renderer;
pub mod shader_source;

#[cfg(any(test, feature = "fake"))]
pub mod fake;

pub use gl;
pub use glm;

pub use backend::{ErrorPolicy, GlBackend};
pub use context::GlContext;
pub use gl_call::gl_call;
pub use renderer::Renderer;
pub use shader_source::{parse_shader, parse_shader_file, ShaderParseError, ShaderProgramSource};
