//! Exports [`Program`].
use std::{collections::HashMap, path::Path};

use gl::types::{GLint, GLuint};

use super::shader::{CompiledShader, Shader, ShaderError};
use crate::{
    backend::GlBackend,
    gl_call::gl_call,
    shader_source::{parse_shader_file, ShaderProgramSource},
};

/// Wrapper for a linked OpenGL program, plus a cache of its uniform locations.
///
/// <https://www.khronos.org/opengl/wiki/GLSL_Object#Program_objects>
pub struct Program<'gl, B: GlBackend + ?Sized> {
    gl: &'gl B,
    /// The internal OpenGL id for this object.
    id: GLuint,
    /// `None` records a name the driver doesn't know, so it is only looked up
    /// (and warned about) once.
    uniform_locations: HashMap<String, Option<GLint>>,
}

impl<'gl, B: GlBackend + ?Sized> Program<'gl, B> {
    /// Parse a `#shader` file and build a program from it.
    pub fn from_file(gl: &'gl B, path: impl AsRef<Path>) -> Result<Self, ShaderError> {
        let path = path.as_ref();
        let source = parse_shader_file(path).map_err(|source| ShaderError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_source(gl, &source)
    }

    /// Compile both stages, then link and validate them.
    ///
    /// A stage that fails to compile stops the build before anything is linked.
    pub fn from_source(gl: &'gl B, source: &ShaderProgramSource) -> Result<Self, ShaderError> {
        let vert_shader = Shader::vertex(gl, source.vertex.as_str()).compile()?;
        let frag_shader = Shader::fragment(gl, source.fragment.as_str()).compile()?;
        Self::link(gl, &vert_shader, &frag_shader)
        // the stage objects drop here; the linked program keeps its own copy
    }

    /// Create a new program directly from compiled stages.
    pub fn link(
        gl: &'gl B,
        vert_shader: &CompiledShader<'_, B>,
        frag_shader: &CompiledShader<'_, B>,
    ) -> Result<Self, ShaderError> {
        let id = gl_call(gl, "glCreateProgram", |gl| gl.create_program());
        // owned from here on, so an early return deletes it
        let program = Self {
            gl,
            id,
            uniform_locations: HashMap::new(),
        };

        gl_call(gl, "glAttachShader", |gl| gl.attach_shader(id, vert_shader.id()));
        gl_call(gl, "glAttachShader", |gl| gl.attach_shader(id, frag_shader.id()));

        gl_call(gl, "glLinkProgram", |gl| gl.link_program(id));
        if !gl_call(gl, "glGetProgramiv", |gl| gl.program_status(id, gl::LINK_STATUS)) {
            let log = program.info_log();
            log::error!("failed to link program {id}:\n{log}");
            return Err(ShaderError::Link { log });
        }

        gl_call(gl, "glValidateProgram", |gl| gl.validate_program(id));
        if !gl_call(gl, "glGetProgramiv", |gl| gl.program_status(id, gl::VALIDATE_STATUS)) {
            let log = program.info_log();
            log::error!("failed to validate program {id}:\n{log}");
            return Err(ShaderError::Validate { log });
        }

        log::debug!("program {id} linked");
        Ok(program)
    }

    fn info_log(&self) -> String {
        gl_call(self.gl, "glGetProgramInfoLog", |gl| gl.program_info_log(self.id))
    }

    /// Get the internal id of this program.
    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn bind(&self) {
        gl_call(self.gl, "glUseProgram", |gl| gl.use_program(self.id));
    }

    pub fn unbind(&self) {
        gl_call(self.gl, "glUseProgram", |gl| gl.use_program(0));
    }

    /// Get the location of a uniform in this program.
    ///
    /// The driver is asked only the first time a name is seen. `None` means the
    /// uniform doesn't exist or was optimized away; that is logged once and is
    /// otherwise harmless.
    pub fn uniform_location(&mut self, name: &str) -> Option<GLint> {
        if let Some(&location) = self.uniform_locations.get(name) {
            return location;
        }

        let id = self.id;
        let raw = gl_call(self.gl, "glGetUniformLocation", |gl| {
            gl.uniform_location(id, name)
        });
        let location = (raw >= 0).then_some(raw);
        if location.is_none() {
            log::warn!("uniform '{name}' doesn't exist in program {id}");
        }
        self.uniform_locations.insert(name.to_owned(), location);
        location
    }

    /// Sampler uniforms take the texture slot as an int.
    pub fn set_uniform_1i(&mut self, name: &str, value: i32) {
        if let Some(location) = self.uniform_location(name) {
            gl_call(self.gl, "glUniform1i", |gl| gl.uniform_1i(location, value));
        }
    }

    pub fn set_uniform_1f(&mut self, name: &str, value: f32) {
        if let Some(location) = self.uniform_location(name) {
            gl_call(self.gl, "glUniform1f", |gl| gl.uniform_1f(location, value));
        }
    }

    pub fn set_uniform_4f(&mut self, name: &str, v0: f32, v1: f32, v2: f32, v3: f32) {
        if let Some(location) = self.uniform_location(name) {
            gl_call(self.gl, "glUniform4f", |gl| {
                gl.uniform_4f(location, [v0, v1, v2, v3])
            });
        }
    }

    pub fn set_uniform_mat4f(&mut self, name: &str, matrix: &glm::Mat4) {
        if let Some(location) = self.uniform_location(name) {
            let mut columns = [0.0; 16];
            columns.copy_from_slice(matrix.as_slice());
            gl_call(self.gl, "glUniformMatrix4fv", |gl| {
                gl.uniform_matrix_4f(location, &columns)
            });
        }
    }
}

impl<B: GlBackend + ?Sized> Drop for Program<'_, B> {
    fn drop(&mut self) {
        gl_call(self.gl, "glDeleteProgram", |gl| gl.delete_program(self.id));
    }
}
