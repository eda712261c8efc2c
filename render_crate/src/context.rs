//! Exports [`GlContext`], the [`GlBackend`] that talks to a real driver.
use std::{
    cell::Cell,
    ffi::{c_char, c_void, CStr, CString},
    ptr::null,
};

use gl::types::{GLbitfield, GLenum, GLint, GLsizei, GLuint};
use sdl2::{
    video::{GLContext, Window},
    VideoSubsystem,
};

use crate::backend::{ErrorPolicy, GlBackend};

/// An OpenGL context made current on an SDL window, with function pointers loaded.
///
/// Resource wrappers borrow this, so they are always dropped before the context is.
pub struct GlContext {
    /// Kept alive for as long as any wrapper may issue calls.
    sdl_ctx: GLContext,
    policy: Cell<ErrorPolicy>,
}

extern "system" fn gl_debug_output(
    _source: GLenum,
    output_type: GLenum,
    id: GLuint,
    severity: GLenum,
    _length: GLsizei,
    message: *const c_char,
    _user_param: *mut c_void,
) {
    if message.is_null() {
        return;
    }
    // SAFETY:
    // the driver hands us a nul-terminated string that lives for the duration of the callback.
    let message = unsafe { CStr::from_ptr(message) }.to_string_lossy();
    match severity {
        gl::DEBUG_SEVERITY_HIGH => log::error!("GL debug ({output_type:#x}/{id}): {message}"),
        gl::DEBUG_SEVERITY_MEDIUM => log::warn!("GL debug ({output_type:#x}/{id}): {message}"),
        _ => log::trace!("GL debug ({output_type:#x}/{id}): {message}"),
    }
}

impl GlContext {
    /// Create a context for `window`, make it current and load every GL entry point.
    ///
    /// # Errors
    /// Errors with SDL's message if the context could not be created.
    pub fn new(video: &VideoSubsystem, window: &Window) -> Result<Self, String> {
        let sdl_ctx = window.gl_create_context()?;
        window.gl_make_current(&sdl_ctx)?;
        gl::load_with(|s| video.gl_get_proc_address(s).cast());

        if gl::DebugMessageCallback::is_loaded() {
            // SAFETY:
            // the callback is a plain fn with the GLDEBUGPROC signature and ignores user_param.
            unsafe {
                gl::Enable(gl::DEBUG_OUTPUT);
                gl::Enable(gl::DEBUG_OUTPUT_SYNCHRONOUS);
                gl::DebugMessageCallback(Some(gl_debug_output), null());
            }
            log::debug!("GL debug output enabled");
        }

        Ok(Self {
            sdl_ctx,
            policy: Cell::new(ErrorPolicy::default()),
        })
    }

    pub fn set_error_policy(&self, policy: ErrorPolicy) {
        self.policy.set(policy);
    }

    pub fn is_current(&self) -> bool {
        self.sdl_ctx.is_current()
    }
}

/// Read an info log of `log_len` bytes (as reported by `GL_INFO_LOG_LENGTH`).
///
/// # Safety
/// `fetch` must write at most the given capacity into the buffer it is handed.
unsafe fn read_info_log(
    log_len: GLint,
    fetch: impl FnOnce(GLsizei, *mut GLsizei, *mut c_char),
) -> String {
    let capacity = log_len.max(1);
    let mut infolog: Vec<u8> = vec![0; capacity as usize];
    let mut length = 0;
    fetch(capacity, &mut length, infolog.as_mut_ptr().cast());
    infolog.truncate(length.clamp(0, capacity) as usize);
    String::from_utf8_lossy(&infolog).into_owned()
}

// SAFETY (for every block below):
// the context is current on this thread for as long as `self` exists, and each
// pointer handed to GL points into a live Rust value of the size GL expects.
impl GlBackend for GlContext {
    fn error_policy(&self) -> ErrorPolicy {
        self.policy.get()
    }

    fn get_error(&self) -> GLenum {
        unsafe { gl::GetError() }
    }

    fn version_string(&self) -> Option<String> {
        unsafe {
            let ptr = gl::GetString(gl::VERSION);
            if ptr.is_null() {
                None
            } else {
                Some(CStr::from_ptr(ptr.cast()).to_string_lossy().into_owned())
            }
        }
    }

    fn viewport(&self, x: GLint, y: GLint, width: GLsizei, height: GLsizei) {
        unsafe { gl::Viewport(x, y, width, height) }
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        unsafe { gl::ClearColor(r, g, b, a) }
    }

    fn clear(&self, mask: GLbitfield) {
        unsafe { gl::Clear(mask) }
    }

    fn enable(&self, cap: GLenum) {
        unsafe { gl::Enable(cap) }
    }

    fn blend_func(&self, src: GLenum, dst: GLenum) {
        unsafe { gl::BlendFunc(src, dst) }
    }

    fn gen_buffer(&self) -> GLuint {
        let mut id = 0;
        unsafe { gl::GenBuffers(1, &mut id) };
        id
    }

    fn delete_buffer(&self, buffer: GLuint) {
        unsafe { gl::DeleteBuffers(1, &buffer) }
    }

    fn bind_buffer(&self, target: GLenum, buffer: GLuint) {
        unsafe { gl::BindBuffer(target, buffer) }
    }

    fn buffer_data(&self, target: GLenum, data: &[u8], usage: GLenum) {
        let Ok(size) = isize::try_from(data.len()) else {
            log::error!("buffer of {} bytes is too large to upload", data.len());
            return;
        };
        unsafe { gl::BufferData(target, size, data.as_ptr().cast(), usage) }
    }

    fn gen_vertex_array(&self) -> GLuint {
        let mut id = 0;
        unsafe { gl::GenVertexArrays(1, &mut id) };
        id
    }

    fn delete_vertex_array(&self, array: GLuint) {
        unsafe { gl::DeleteVertexArrays(1, &array) }
    }

    fn bind_vertex_array(&self, array: GLuint) {
        unsafe { gl::BindVertexArray(array) }
    }

    fn enable_vertex_attrib_array(&self, index: GLuint) {
        unsafe { gl::EnableVertexAttribArray(index) }
    }

    fn vertex_attrib_pointer(
        &self,
        index: GLuint,
        size: GLint,
        ty: GLenum,
        normalized: bool,
        stride: GLsizei,
        offset: usize,
    ) {
        let normalized = if normalized { gl::TRUE } else { gl::FALSE };
        unsafe { gl::VertexAttribPointer(index, size, ty, normalized, stride, offset as *const _) }
    }

    fn create_shader(&self, kind: GLenum) -> GLuint {
        unsafe { gl::CreateShader(kind) }
    }

    fn shader_source(&self, shader: GLuint, source: &str) {
        let Ok(length) = GLint::try_from(source.len()) else {
            log::error!("shader source of {} bytes is too large", source.len());
            return;
        };
        let ptr: *const c_char = source.as_ptr().cast();
        unsafe { gl::ShaderSource(shader, 1, &ptr, &length) }
    }

    fn compile_shader(&self, shader: GLuint) {
        unsafe { gl::CompileShader(shader) }
    }

    fn shader_compile_status(&self, shader: GLuint) -> bool {
        let mut success = 0;
        unsafe { gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut success) };
        success == GLint::from(gl::TRUE)
    }

    fn shader_info_log(&self, shader: GLuint) -> String {
        let mut log_len = 0;
        unsafe {
            gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut log_len);
            read_info_log(log_len, |cap, len, buf| {
                gl::GetShaderInfoLog(shader, cap, len, buf)
            })
        }
    }

    fn delete_shader(&self, shader: GLuint) {
        unsafe { gl::DeleteShader(shader) }
    }

    fn create_program(&self) -> GLuint {
        unsafe { gl::CreateProgram() }
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe { gl::AttachShader(program, shader) }
    }

    fn link_program(&self, program: GLuint) {
        unsafe { gl::LinkProgram(program) }
    }

    fn validate_program(&self, program: GLuint) {
        unsafe { gl::ValidateProgram(program) }
    }

    fn program_status(&self, program: GLuint, pname: GLenum) -> bool {
        let mut success = 0;
        unsafe { gl::GetProgramiv(program, pname, &mut success) };
        success == GLint::from(gl::TRUE)
    }

    fn program_info_log(&self, program: GLuint) -> String {
        let mut log_len = 0;
        unsafe {
            gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut log_len);
            read_info_log(log_len, |cap, len, buf| {
                gl::GetProgramInfoLog(program, cap, len, buf)
            })
        }
    }

    fn delete_program(&self, program: GLuint) {
        unsafe { gl::DeleteProgram(program) }
    }

    fn use_program(&self, program: GLuint) {
        unsafe { gl::UseProgram(program) }
    }

    fn uniform_location(&self, program: GLuint, name: &str) -> GLint {
        let Ok(name) = CString::new(name) else {
            log::warn!("uniform name {name:?} contains a nul byte");
            return -1;
        };
        unsafe { gl::GetUniformLocation(program, name.as_ptr()) }
    }

    fn uniform_1i(&self, location: GLint, value: i32) {
        unsafe { gl::Uniform1i(location, value) }
    }

    fn uniform_1f(&self, location: GLint, value: f32) {
        unsafe { gl::Uniform1f(location, value) }
    }

    fn uniform_4f(&self, location: GLint, [v0, v1, v2, v3]: [f32; 4]) {
        unsafe { gl::Uniform4f(location, v0, v1, v2, v3) }
    }

    fn uniform_matrix_4f(&self, location: GLint, value: &[f32; 16]) {
        unsafe { gl::UniformMatrix4fv(location, 1, gl::FALSE, value.as_ptr()) }
    }

    fn gen_texture(&self) -> GLuint {
        let mut id = 0;
        unsafe { gl::GenTextures(1, &mut id) };
        id
    }

    fn delete_texture(&self, texture: GLuint) {
        unsafe { gl::DeleteTextures(1, &texture) }
    }

    fn active_texture(&self, unit: GLenum) {
        unsafe { gl::ActiveTexture(unit) }
    }

    fn bind_texture(&self, target: GLenum, texture: GLuint) {
        unsafe { gl::BindTexture(target, texture) }
    }

    fn tex_parameter_i(&self, target: GLenum, pname: GLenum, param: GLint) {
        unsafe { gl::TexParameteri(target, pname, param) }
    }

    fn tex_image_2d_rgba8(&self, width: GLsizei, height: GLsizei, pixels: &[u8]) {
        debug_assert_eq!(pixels.len(), width as usize * height as usize * 4);
        unsafe {
            gl::TexImage2D(
                gl::TEXTURE_2D,
                0,
                gl::RGBA8 as GLint,
                width,
                height,
                0,
                gl::RGBA,
                gl::UNSIGNED_BYTE,
                pixels.as_ptr().cast(),
            )
        }
    }

    fn draw_arrays(&self, mode: GLenum, first: GLint, count: GLsizei) {
        unsafe { gl::DrawArrays(mode, first, count) }
    }

    fn draw_elements(&self, mode: GLenum, count: GLsizei, index_type: GLenum) {
        unsafe { gl::DrawElements(mode, count, index_type, null()) }
    }
}
