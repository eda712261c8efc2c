//! Describing how the bytes of one vertex map onto shader attributes.
use gl::types::{GLenum, GLsizei};

/// The component type of a vertex attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttribType {
    Float,        // f32
    UnsignedInt,  // u32
    UnsignedByte, // u8
}

impl AttribType {
    pub const fn get_size(&self) -> usize {
        match *self {
            AttribType::Float => size_of::<f32>(),
            AttribType::UnsignedInt => size_of::<u32>(),
            AttribType::UnsignedByte => size_of::<u8>(),
        }
    }

    pub const fn gl_enum(&self) -> GLenum {
        match *self {
            AttribType::Float => gl::FLOAT,
            AttribType::UnsignedInt => gl::UNSIGNED_INT,
            AttribType::UnsignedByte => gl::UNSIGNED_BYTE,
        }
    }
}

/// One attribute: `count` components of `ty`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexBufferElement {
    pub count: u32,
    pub ty: AttribType,
    pub normalized: bool,
}

impl VertexBufferElement {
    /// Bytes this attribute takes up in one vertex.
    pub const fn byte_size(&self) -> usize {
        self.count as usize * self.ty.get_size()
    }
}

/// Ordered attributes of one interleaved vertex.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VertexBufferLayout {
    elements: Vec<VertexBufferElement>,
    stride: usize,
}

impl VertexBufferLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, ty: AttribType, count: u32, normalized: bool) -> &mut Self {
        let element = VertexBufferElement {
            count,
            ty,
            normalized,
        };
        self.stride += element.byte_size();
        self.elements.push(element);
        self
    }

    pub fn push_f32(&mut self, count: u32) -> &mut Self {
        self.push(AttribType::Float, count, false)
    }

    pub fn push_u32(&mut self, count: u32) -> &mut Self {
        self.push(AttribType::UnsignedInt, count, false)
    }

    /// Bytes are read as normalized `[0, 1]` values, the usual case for colors.
    pub fn push_u8(&mut self, count: u32) -> &mut Self {
        self.push(AttribType::UnsignedByte, count, true)
    }

    pub fn elements(&self) -> &[VertexBufferElement] {
        &self.elements
    }

    /// Total bytes of one vertex.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// `(attribute index, element, byte offset)` for each element in order.
    pub fn attributes(&self) -> impl Iterator<Item = (u32, VertexBufferElement, usize)> + '_ {
        self.elements
            .iter()
            .scan(0usize, |offset, element| {
                let this_offset = *offset;
                *offset += element.byte_size();
                Some((*element, this_offset))
            })
            .zip(0u32..)
            .map(|((element, offset), index)| (index, element, offset))
    }

    pub(crate) fn gl_stride(&self) -> GLsizei {
        GLsizei::try_from(self.stride).unwrap_or(GLsizei::MAX)
    }
}

/// Ties a vertex type to the layout of its bytes.
///
/// # Safety
/// [`layout`](VertexLayout::layout) must describe the exact byte layout of `Self`:
/// the stride equals `size_of::<Self>()` and each element sits at the offset the
/// layout computes for it.
pub unsafe trait VertexLayout: bytemuck::Pod {
    fn layout() -> VertexBufferLayout;
}

// SAFETY:
// world::Vertex is repr(C) [f32; 2] position followed by [f32; 2] texture coordinate.
unsafe impl VertexLayout for world::Vertex {
    fn layout() -> VertexBufferLayout {
        let mut layout = VertexBufferLayout::new();
        layout.push_f32(2).push_f32(2);
        layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_accumulate_and_stride_is_the_total() {
        let mut layout = VertexBufferLayout::new();
        layout.push_f32(3).push_u8(4).push_f32(2).push_u32(1);

        let attrs: Vec<_> = layout.attributes().map(|(i, _, off)| (i, off)).collect();
        assert_eq!(attrs, vec![(0, 0), (1, 12), (2, 16), (3, 24)]);
        assert_eq!(layout.stride(), 28);
        assert!(layout.elements()[1].normalized);
        assert!(!layout.elements()[0].normalized);
    }

    #[test]
    fn deriving_twice_gives_the_same_answer() {
        let mut layout = VertexBufferLayout::new();
        layout.push_f32(2).push_f32(2).push_u8(4);

        let first: Vec<_> = layout.attributes().collect();
        let second: Vec<_> = layout.attributes().collect();
        assert_eq!(first, second);

        let rebuilt = {
            let mut l = VertexBufferLayout::new();
            for e in layout.elements() {
                l.push(e.ty, e.count, e.normalized);
            }
            l
        };
        assert_eq!(rebuilt, layout);
        assert_eq!(rebuilt.stride(), layout.stride());
    }

    #[test]
    fn empty_layout_has_no_stride() {
        let layout = VertexBufferLayout::new();
        assert_eq!(layout.stride(), 0);
        assert_eq!(layout.attributes().count(), 0);
    }

    #[test]
    fn world_vertex_layout_matches_its_size() {
        let layout = world::Vertex::layout();
        assert_eq!(layout.stride(), size_of::<world::Vertex>());
        let offsets: Vec<_> = layout.attributes().map(|(_, _, off)| off).collect();
        assert_eq!(offsets, vec![0, 8]);
    }
}
