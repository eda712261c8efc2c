//! Exports [`VertexBuffer`].
use gl::types::GLuint;

use crate::{backend::GlBackend, gl_call::gl_call};

/// A `GL_ARRAY_BUFFER` holding vertex data, uploaded once at creation.
pub struct VertexBuffer<'gl, B: GlBackend + ?Sized> {
    gl: &'gl B,
    id: GLuint,
    byte_len: usize,
}

impl<'gl, B: GlBackend + ?Sized> VertexBuffer<'gl, B> {
    /// Create the buffer and upload `data` as `GL_STATIC_DRAW`.
    ///
    /// Leaves the buffer bound.
    pub fn new<T: bytemuck::Pod>(gl: &'gl B, data: &[T]) -> Self {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        let id = gl_call(gl, "glGenBuffers", |gl| gl.gen_buffer());
        gl_call(gl, "glBindBuffer", |gl| gl.bind_buffer(gl::ARRAY_BUFFER, id));
        gl_call(gl, "glBufferData", |gl| {
            gl.buffer_data(gl::ARRAY_BUFFER, bytes, gl::STATIC_DRAW)
        });
        log::debug!("vertex buffer {id}: {} bytes", bytes.len());
        Self {
            gl,
            id,
            byte_len: bytes.len(),
        }
    }

    pub fn bind(&self) {
        gl_call(self.gl, "glBindBuffer", |gl| {
            gl.bind_buffer(gl::ARRAY_BUFFER, self.id)
        });
    }

    pub fn unbind(&self) {
        gl_call(self.gl, "glBindBuffer", |gl| gl.bind_buffer(gl::ARRAY_BUFFER, 0));
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn byte_len(&self) -> usize {
        self.byte_len
    }
}

impl<B: GlBackend + ?Sized> Drop for VertexBuffer<'_, B> {
    fn drop(&mut self) {
        gl_call(self.gl, "glDeleteBuffers", |gl| gl.delete_buffer(self.id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{backend::ErrorPolicy, fake::FakeGl};

    #[test]
    fn uploads_on_creation_and_releases_on_drop() {
        let gl = FakeGl::new(ErrorPolicy::Trap);
        let id = {
            let vb = VertexBuffer::new(&gl, &[1.0f32, 2.0, 3.0]);
            assert_eq!(vb.byte_len(), 12);
            let state = gl.state();
            assert_eq!(state.buffer_contents[&vb.id()].len(), 12);
            assert_eq!(state.array_buffer, vb.id());
            vb.id()
        };
        let state = gl.state();
        assert!(state.buffers.is_empty());
        assert_eq!(state.deleted, vec![("delete_buffer", id)]);
    }

    #[test]
    fn bind_and_unbind() {
        let gl = FakeGl::new(ErrorPolicy::Trap);
        let vb = VertexBuffer::new(&gl, &[0u8; 4]);
        vb.unbind();
        assert_eq!(gl.state().array_buffer, 0);
        vb.bind();
        assert_eq!(gl.state().array_buffer, vb.id());
    }
}
