//! Exports [`Shader`] and [`CompiledShader`].
use std::fmt;

use gl::types::{GLenum, GLuint};

use crate::{backend::GlBackend, gl_call::gl_call, shader_source::ShaderParseError};

/// Represents the stage a shader object runs at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderStage {
    /// This shader is a Vertex shader.
    Vertex,
    /// This shader is a Fragment shader.
    Fragment,
}

impl ShaderStage {
    pub const fn gl_enum(&self) -> GLenum {
        match *self {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        })
    }
}

/// Everything that can go wrong between a `.shader` file and a usable program.
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("failed to parse shader file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: ShaderParseError,
    },
    #[error("failed to compile {stage} shader: {log}")]
    Compile { stage: ShaderStage, log: String },
    #[error("failed to link program: {log}")]
    Link { log: String },
    #[error("failed to validate program: {log}")]
    Validate { log: String },
}

/// An uncompiled OpenGL shader.
/// Contains the source code necessary to compile it.
pub struct Shader<'gl, B: GlBackend + ?Sized> {
    gl: &'gl B,
    /// GL ID for this shader.
    inner: GLuint,
    stage: ShaderStage,
    source: String,
    /// Set once ownership of `inner` moved into a [`CompiledShader`].
    was_compiled: bool,
}

impl<'gl, B: GlBackend + ?Sized> Shader<'gl, B> {
    /// Wrap shader source code into a type-safe Rust struct.
    pub fn new(gl: &'gl B, stage: ShaderStage, source: impl Into<String>) -> Self {
        let inner = gl_call(gl, "glCreateShader", |gl| gl.create_shader(stage.gl_enum()));
        Self {
            gl,
            inner,
            stage,
            source: source.into(),
            was_compiled: false,
        }
    }
    /// Helper function for `Shader::new()` with vertex shaders.
    pub fn vertex(gl: &'gl B, source: impl Into<String>) -> Self {
        Self::new(gl, ShaderStage::Vertex, source)
    }
    /// Helper function for `Shader::new()` with fragment shaders.
    pub fn fragment(gl: &'gl B, source: impl Into<String>) -> Self {
        Self::new(gl, ShaderStage::Fragment, source)
    }

    /// Compile this shader.
    ///
    /// Returns a [`CompiledShader`], for use in [`Program`](super::Program)s.
    ///
    /// # Errors
    /// Errors if compilation was unsuccessful, with the response from OpenGL.
    /// The shader object is deleted either way once it is no longer needed.
    pub fn compile(mut self) -> Result<CompiledShader<'gl, B>, ShaderError> {
        let id = self.inner;
        gl_call(self.gl, "glShaderSource", |gl| gl.shader_source(id, &self.source));
        gl_call(self.gl, "glCompileShader", |gl| gl.compile_shader(id));

        let success = gl_call(self.gl, "glGetShaderiv", |gl| gl.shader_compile_status(id));
        if !success {
            let log = gl_call(self.gl, "glGetShaderInfoLog", |gl| gl.shader_info_log(id));
            log::error!("failed to compile {} shader:\n{log}", self.stage);
            return Err(ShaderError::Compile {
                stage: self.stage,
                log,
            });
        }

        self.was_compiled = true;
        Ok(CompiledShader {
            gl: self.gl,
            id,
            stage: self.stage,
        })
    }
}

impl<B: GlBackend + ?Sized> Drop for Shader<'_, B> {
    fn drop(&mut self) {
        if !self.was_compiled {
            gl_call(self.gl, "glDeleteShader", |gl| gl.delete_shader(self.inner));
        }
    }
}

/// A compiled shader object.
/// This can be linked and used in [`Program`](super::Program)s.
pub struct CompiledShader<'gl, B: GlBackend + ?Sized> {
    gl: &'gl B,
    /// GL ID for this compiled shader.
    id: GLuint,
    stage: ShaderStage,
}

impl<B: GlBackend + ?Sized> CompiledShader<'_, B> {
    /// Get the internal GL ID of this shader.
    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }
}

impl<B: GlBackend + ?Sized> Drop for CompiledShader<'_, B> {
    fn drop(&mut self) {
        gl_call(self.gl, "glDeleteShader", |gl| gl.delete_shader(self.id));
    }
}
