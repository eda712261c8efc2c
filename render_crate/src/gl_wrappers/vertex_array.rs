//! Exports [`VertexArray`].
use gl::types::{GLint, GLuint};

use super::{layout::VertexBufferLayout, vertex_buffer::VertexBuffer};
use crate::{backend::GlBackend, gl_call::gl_call};

/// A vertex array object: remembers which buffers feed which attributes.
pub struct VertexArray<'gl, B: GlBackend + ?Sized> {
    gl: &'gl B,
    id: GLuint,
}

impl<'gl, B: GlBackend + ?Sized> VertexArray<'gl, B> {
    pub fn new(gl: &'gl B) -> Self {
        let id = gl_call(gl, "glGenVertexArrays", |gl| gl.gen_vertex_array());
        log::debug!("vertex array {id}");
        Self { gl, id }
    }

    /// Point one attribute per layout element at `vb`.
    ///
    /// Attribute `i` is element `i`, offset by the bytes of the elements before it,
    /// with the layout's stride.
    pub fn add_buffer(&self, vb: &VertexBuffer<'_, B>, layout: &VertexBufferLayout) {
        self.bind();
        vb.bind();
        let stride = layout.gl_stride();
        for (index, element, offset) in layout.attributes() {
            gl_call(self.gl, "glEnableVertexAttribArray", |gl| {
                gl.enable_vertex_attrib_array(index)
            });
            gl_call(self.gl, "glVertexAttribPointer", |gl| {
                gl.vertex_attrib_pointer(
                    index,
                    element.count as GLint,
                    element.ty.gl_enum(),
                    element.normalized,
                    stride,
                    offset,
                )
            });
        }
    }

    pub fn bind(&self) {
        gl_call(self.gl, "glBindVertexArray", |gl| gl.bind_vertex_array(self.id));
    }

    pub fn unbind(&self) {
        gl_call(self.gl, "glBindVertexArray", |gl| gl.bind_vertex_array(0));
    }

    pub fn id(&self) -> GLuint {
        self.id
    }
}

impl<B: GlBackend + ?Sized> Drop for VertexArray<'_, B> {
    fn drop(&mut self) {
        gl_call(self.gl, "glDeleteVertexArrays", |gl| {
            gl.delete_vertex_array(self.id)
        });
    }
}
