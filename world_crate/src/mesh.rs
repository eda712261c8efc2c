use crate::vertex::Vertex;

/// Vertices plus the indices that stitch them into triangles.
#[derive(Clone, Debug)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    /// The very first lesson: one triangle, no reuse of vertices.
    pub fn triangle() -> Self {
        Self {
            vertices: vec![
                // Left
                Vertex::new(-0.5, -0.5, 0.0, 0.0),
                // Up
                Vertex::new(0.0, 0.5, 0.5, 1.0),
                // Right
                Vertex::new(0.5, -0.5, 1.0, 0.0),
            ],
            indices: vec![0, 1, 2],
        }
    }

    /// A unit quad centered on the origin.
    ///
    /// Four vertices, six indices: the two triangles share the 2-0 diagonal.
    pub fn quad() -> Self {
        Self {
            vertices: vec![
                Vertex::new(-0.5, -0.5, 0.0, 0.0),
                Vertex::new(0.5, -0.5, 1.0, 0.0),
                Vertex::new(0.5, 0.5, 1.0, 1.0),
                Vertex::new(-0.5, 0.5, 0.0, 1.0),
            ],
            indices: vec![0, 1, 2, 2, 3, 0],
        }
    }

    /// Iterate the triangles described by the index list.
    ///
    /// Trailing indices that do not make up a full triangle are ignored.
    pub fn triangles(&self) -> impl Iterator<Item = [Vertex; 3]> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            [
                self.vertices[tri[0] as usize],
                self.vertices[tri[1] as usize],
                self.vertices[tri[2] as usize],
            ]
        })
    }

    /// Number of vertices a non-indexed draw of the same triangles would have to store.
    pub fn unindexed_vertex_count(&self) -> usize {
        self.indices.len() - self.indices.len() % 3
    }
}
