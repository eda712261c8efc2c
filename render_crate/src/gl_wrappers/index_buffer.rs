//! Exports [`IndexBuffer`].
use gl::types::{GLsizei, GLuint};

use crate::{backend::GlBackend, gl_call::gl_call};

/// A `GL_ELEMENT_ARRAY_BUFFER` of `u32` indices.
pub struct IndexBuffer<'gl, B: GlBackend + ?Sized> {
    gl: &'gl B,
    id: GLuint,
    /// Number of indices, not bytes.
    count: usize,
}

impl<'gl, B: GlBackend + ?Sized> IndexBuffer<'gl, B> {
    /// Create the buffer and upload `indices`. Leaves the buffer bound.
    pub fn new(gl: &'gl B, indices: &[u32]) -> Self {
        let id = gl_call(gl, "glGenBuffers", |gl| gl.gen_buffer());
        gl_call(gl, "glBindBuffer", |gl| {
            gl.bind_buffer(gl::ELEMENT_ARRAY_BUFFER, id)
        });
        gl_call(gl, "glBufferData", |gl| {
            gl.buffer_data(
                gl::ELEMENT_ARRAY_BUFFER,
                bytemuck::cast_slice(indices),
                gl::STATIC_DRAW,
            )
        });
        log::debug!("index buffer {id}: {} indices", indices.len());
        Self {
            gl,
            id,
            count: indices.len(),
        }
    }

    pub fn bind(&self) {
        gl_call(self.gl, "glBindBuffer", |gl| {
            gl.bind_buffer(gl::ELEMENT_ARRAY_BUFFER, self.id)
        });
    }

    pub fn unbind(&self) {
        gl_call(self.gl, "glBindBuffer", |gl| {
            gl.bind_buffer(gl::ELEMENT_ARRAY_BUFFER, 0)
        });
    }

    /// How many indices a draw call should read.
    pub fn count(&self) -> usize {
        self.count
    }

    pub(crate) fn gl_count(&self) -> GLsizei {
        GLsizei::try_from(self.count).unwrap_or(GLsizei::MAX)
    }

    pub fn id(&self) -> GLuint {
        self.id
    }
}

impl<B: GlBackend + ?Sized> Drop for IndexBuffer<'_, B> {
    fn drop(&mut self) {
        gl_call(self.gl, "glDeleteBuffers", |gl| gl.delete_buffer(self.id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{backend::ErrorPolicy, fake::FakeGl};

    #[test]
    fn count_is_elements_not_bytes() {
        let gl = FakeGl::new(ErrorPolicy::Trap);
        let ib = IndexBuffer::new(&gl, &[0, 1, 2, 2, 3, 0]);
        assert_eq!(ib.count(), 6);
        assert_eq!(gl.state().buffer_contents[&ib.id()].len(), 24);
        assert_eq!(gl.state().element_buffer, ib.id());
    }

    #[test]
    fn unbind_clears_the_element_binding() {
        let gl = FakeGl::new(ErrorPolicy::Trap);
        let ib = IndexBuffer::new(&gl, &[0, 1, 2]);
        ib.unbind();
        assert_eq!(gl.state().element_buffer, 0);
        drop(ib);
        assert!(gl.state().buffers.is_empty());
    }
}
