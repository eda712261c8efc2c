//! Standalone functions and modules to wrap the nitty-gritty of
//! OpenGL objects with Rust structs.
//!
//! Every wrapper owns exactly one GL handle, created in its constructor and
//! deleted in its `Drop`, and borrows the backend so it can't outlive it.
pub mod index_buffer;
pub mod layout;
pub mod program;
pub mod shader;
pub mod texture;
pub mod vertex_array;
pub mod vertex_buffer;

pub use index_buffer::IndexBuffer;
pub use layout::{AttribType, VertexBufferElement, VertexBufferLayout, VertexLayout};
pub use program::Program;
pub use shader::{CompiledShader, Shader, ShaderError, ShaderStage};
pub use texture::{Texture, TextureError};
pub use vertex_array::VertexArray;
pub use vertex_buffer::VertexBuffer;
