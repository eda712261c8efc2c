use bytemuck::{Pod, Zeroable};

/// One vertex as it is laid out in a vertex buffer.
///
/// `repr(C)` so the byte layout is exactly `[x, y, u, v]` as four `f32`s.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Position in normalized device coordinates (before any projection).
    pub pos: [f32; 2],
    /// Texture coordinate, (0,0) is the bottom left of the image.
    pub tex_coord: [f32; 2],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, u: f32, v: f32) -> Self {
        Self {
            pos: [x, y],
            tex_coord: [u, v],
        }
    }

    /// Position as a glm vector, handy for transforming on the CPU.
    pub fn position(&self) -> glm::Vec2 {
        glm::vec2(self.pos[0], self.pos[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_is_four_packed_floats() {
        assert_eq!(size_of::<Vertex>(), 4 * size_of::<f32>());
        let v = Vertex::new(1.0, 2.0, 3.0, 4.0);
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&v));
        assert_eq!(floats, &[1.0, 2.0, 3.0, 4.0]);
    }
}
