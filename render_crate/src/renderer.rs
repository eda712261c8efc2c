//! Exports [`Renderer`].
use gl::types::GLsizei;

use crate::{
    backend::GlBackend,
    gl_call::gl_call,
    gl_wrappers::{IndexBuffer, Program, VertexArray},
};

/// Issues clears and draw calls against one backend.
pub struct Renderer<'gl, B: GlBackend + ?Sized> {
    gl: &'gl B,
    clear_color: [f32; 4],
}

impl<'gl, B: GlBackend + ?Sized> Renderer<'gl, B> {
    pub fn new(gl: &'gl B) -> Self {
        Self {
            gl,
            clear_color: [0.2, 0.2, 0.3, 1.0],
        }
    }

    pub fn set_clear_color(&mut self, rgba: [f32; 4]) {
        self.clear_color = rgba;
    }

    pub fn clear(&self) {
        let [r, g, b, a] = self.clear_color;
        gl_call(self.gl, "glClearColor", |gl| gl.clear_color(r, g, b, a));
        gl_call(self.gl, "glClear", |gl| gl.clear(gl::COLOR_BUFFER_BIT));
    }

    /// Update the viewport after the drawable changed size.
    pub fn set_viewport(&self, width: u32, height: u32) {
        let width = GLsizei::try_from(width).unwrap_or(GLsizei::MAX);
        let height = GLsizei::try_from(height).unwrap_or(GLsizei::MAX);
        gl_call(self.gl, "glViewport", |gl| gl.viewport(0, 0, width, height));
    }

    /// Standard "over" blending, for textures with an alpha channel.
    pub fn enable_blending(&self) {
        gl_call(self.gl, "glEnable", |gl| gl.enable(gl::BLEND));
        gl_call(self.gl, "glBlendFunc", |gl| {
            gl.blend_func(gl::SRC_ALPHA, gl::ONE_MINUS_SRC_ALPHA)
        });
    }

    /// Draw `ib.count()` indices as triangles.
    pub fn draw(&self, va: &VertexArray<'_, B>, ib: &IndexBuffer<'_, B>, program: &Program<'_, B>) {
        program.bind();
        va.bind();
        ib.bind();
        let count = ib.gl_count();
        gl_call(self.gl, "glDrawElements", |gl| {
            gl.draw_elements(gl::TRIANGLES, count, gl::UNSIGNED_INT)
        });
    }

    /// Draw `vertex_count` vertices straight from the vertex array, no index buffer.
    pub fn draw_arrays(&self, va: &VertexArray<'_, B>, program: &Program<'_, B>, vertex_count: usize) {
        program.bind();
        va.bind();
        let count = GLsizei::try_from(vertex_count).unwrap_or(GLsizei::MAX);
        gl_call(self.gl, "glDrawArrays", |gl| gl.draw_arrays(gl::TRIANGLES, 0, count));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        backend::ErrorPolicy,
        fake::FakeGl,
        gl_wrappers::{VertexBuffer, VertexLayout},
        shader_source::ShaderProgramSource,
    };

    fn quad_program(gl: &FakeGl) -> Program<'_, FakeGl> {
        let source = ShaderProgramSource {
            vertex: "void main() {}\n".into(),
            fragment: "void main() {}\n".into(),
        };
        Program::from_source(gl, &source).unwrap()
    }

    #[test]
    fn quad_draws_six_indices_from_four_vertices() {
        let gl = FakeGl::new(ErrorPolicy::Trap);
        let mesh = world::Mesh::quad();
        let va = VertexArray::new(&gl);
        let vb = VertexBuffer::new(&gl, &mesh.vertices);
        va.add_buffer(&vb, &world::Vertex::layout());
        let ib = IndexBuffer::new(&gl, &mesh.indices);
        let program = quad_program(&gl);

        // scramble the bindings; draw must not rely on them
        va.unbind();
        ib.unbind();
        program.unbind();

        let renderer = Renderer::new(&gl);
        renderer.clear();
        renderer.draw(&va, &ib, &program);

        let state = gl.state();
        assert_eq!(state.clears, 1);
        assert_eq!(state.draws.len(), 1);
        let draw = &state.draws[0];
        assert!(draw.indexed);
        assert_eq!(draw.mode, gl::TRIANGLES);
        assert_eq!(draw.count, 6);
        assert_eq!(draw.program, program.id());
        assert_eq!(draw.vertex_array, va.id());
        assert_eq!(draw.element_buffer, ib.id());
        assert_eq!(state.buffer_contents[&vb.id()].len(), 4 * size_of::<world::Vertex>());
    }

    #[test]
    fn draw_arrays_uses_no_index_buffer() {
        let gl = FakeGl::new(ErrorPolicy::Trap);
        let mesh = world::Mesh::triangle();
        let va = VertexArray::new(&gl);
        let vb = VertexBuffer::new(&gl, &mesh.vertices);
        va.add_buffer(&vb, &world::Vertex::layout());
        let program = quad_program(&gl);

        Renderer::new(&gl).draw_arrays(&va, &program, mesh.vertices.len());

        let state = gl.state();
        assert_eq!(state.draws.len(), 1);
        assert!(!state.draws[0].indexed);
        assert_eq!(state.draws[0].count, 3);
    }

    #[test]
    fn draw_error_is_logged_and_the_frame_goes_on() {
        let gl = FakeGl::new(ErrorPolicy::Log);
        gl.fail_call("draw_elements", gl::INVALID_OPERATION);
        let va = VertexArray::new(&gl);
        let ib = IndexBuffer::new(&gl, &[0, 1, 2]);
        let program = quad_program(&gl);

        let renderer = Renderer::new(&gl);
        renderer.draw(&va, &ib, &program);
        renderer.clear();
        assert_eq!(gl.state().clears, 1);
    }

    #[test]
    fn clear_color_viewport_and_blending() {
        let gl = FakeGl::new(ErrorPolicy::Trap);
        let mut renderer = Renderer::new(&gl);
        renderer.set_clear_color([0.1, 0.2, 0.3, 1.0]);
        renderer.clear();
        renderer.set_viewport(640, 480);
        renderer.enable_blending();

        let state = gl.state();
        assert_eq!(state.clear_color, [0.1, 0.2, 0.3, 1.0]);
        assert_eq!(state.viewport, (0, 0, 640, 480));
        assert!(state.enabled_caps.contains(&gl::BLEND));
        assert_eq!(
            state.blend_func,
            Some((gl::SRC_ALPHA, gl::ONE_MINUS_SRC_ALPHA))
        );
    }
}
