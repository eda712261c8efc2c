//! The seam between the wrappers and the graphics driver.
//!
//! Every native call the wrappers make goes through [`GlBackend`]. The real
//! implementation is [`GlContext`](crate::context::GlContext); tests drive the
//! same wrappers against a recording fake.
use gl::types::{GLbitfield, GLenum, GLint, GLsizei, GLuint};

/// What [`gl_call`](crate::gl_call::gl_call) does after it has logged an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Panic on the first reported error.
    Trap,
    /// Log and keep going.
    Log,
}

impl Default for ErrorPolicy {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::Trap
        } else {
            Self::Log
        }
    }
}

/// One method per OpenGL entry point the crate needs.
///
/// Handles are plain `GLuint`s and enums are the `gl` crate's constants, so an
/// implementation is a thin forwarding layer. All methods take `&self`: the
/// driver's bind state is the only mutable state and it lives behind the context.
pub trait GlBackend {
    fn error_policy(&self) -> ErrorPolicy {
        ErrorPolicy::default()
    }

    fn get_error(&self) -> GLenum;
    /// `glGetString(GL_VERSION)`.
    fn version_string(&self) -> Option<String>;

    fn viewport(&self, x: GLint, y: GLint, width: GLsizei, height: GLsizei);
    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32);
    fn clear(&self, mask: GLbitfield);
    fn enable(&self, cap: GLenum);
    fn blend_func(&self, src: GLenum, dst: GLenum);

    fn gen_buffer(&self) -> GLuint;
    fn delete_buffer(&self, buffer: GLuint);
    fn bind_buffer(&self, target: GLenum, buffer: GLuint);
    fn buffer_data(&self, target: GLenum, data: &[u8], usage: GLenum);

    fn gen_vertex_array(&self) -> GLuint;
    fn delete_vertex_array(&self, array: GLuint);
    fn bind_vertex_array(&self, array: GLuint);
    fn enable_vertex_attrib_array(&self, index: GLuint);
    fn vertex_attrib_pointer(
        &self,
        index: GLuint,
        size: GLint,
        ty: GLenum,
        normalized: bool,
        stride: GLsizei,
        offset: usize,
    );

    fn create_shader(&self, kind: GLenum) -> GLuint;
    fn shader_source(&self, shader: GLuint, source: &str);
    fn compile_shader(&self, shader: GLuint);
    fn shader_compile_status(&self, shader: GLuint) -> bool;
    fn shader_info_log(&self, shader: GLuint) -> String;
    fn delete_shader(&self, shader: GLuint);

    fn create_program(&self) -> GLuint;
    fn attach_shader(&self, program: GLuint, shader: GLuint);
    fn link_program(&self, program: GLuint);
    fn validate_program(&self, program: GLuint);
    /// `glGetProgramiv` for a boolean status such as `LINK_STATUS` or `VALIDATE_STATUS`.
    fn program_status(&self, program: GLuint, pname: GLenum) -> bool;
    fn program_info_log(&self, program: GLuint) -> String;
    fn delete_program(&self, program: GLuint);
    fn use_program(&self, program: GLuint);

    /// Returns -1 when the program has no active uniform called `name`.
    fn uniform_location(&self, program: GLuint, name: &str) -> GLint;
    fn uniform_1i(&self, location: GLint, value: i32);
    fn uniform_1f(&self, location: GLint, value: f32);
    fn uniform_4f(&self, location: GLint, value: [f32; 4]);
    /// Column-major, as glm stores it.
    fn uniform_matrix_4f(&self, location: GLint, value: &[f32; 16]);

    fn gen_texture(&self) -> GLuint;
    fn delete_texture(&self, texture: GLuint);
    fn active_texture(&self, unit: GLenum);
    fn bind_texture(&self, target: GLenum, texture: GLuint);
    fn tex_parameter_i(&self, target: GLenum, pname: GLenum, param: GLint);
    /// Upload tightly packed RGBA8 pixels to the bound `GL_TEXTURE_2D`.
    fn tex_image_2d_rgba8(&self, width: GLsizei, height: GLsizei, pixels: &[u8]);

    fn draw_arrays(&self, mode: GLenum, first: GLint, count: GLsizei);
    /// Indices are read from the bound element buffer, starting at offset 0.
    fn draw_elements(&self, mode: GLenum, count: GLsizei, index_type: GLenum);
}
