//! A recording [`GlBackend`] for tests. No driver, no window.
use std::{
    cell::{Ref, RefCell},
    collections::{BTreeSet, HashMap, VecDeque},
};

use gl::types::{GLbitfield, GLenum, GLint, GLsizei, GLuint};

use crate::backend::{ErrorPolicy, GlBackend};

#[derive(Clone, Debug, PartialEq)]
pub struct AttribPointer {
    pub index: GLuint,
    pub size: GLint,
    pub ty: GLenum,
    pub normalized: bool,
    pub stride: GLsizei,
    pub offset: usize,
    /// Buffer bound to `GL_ARRAY_BUFFER` when the pointer was set.
    pub buffer: GLuint,
    pub vertex_array: GLuint,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DrawCall {
    pub mode: GLenum,
    pub count: GLsizei,
    pub indexed: bool,
    pub program: GLuint,
    pub vertex_array: GLuint,
    pub element_buffer: GLuint,
}

#[derive(Clone, Debug, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec4([f32; 4]),
    Mat4([f32; 16]),
}

#[derive(Default, Debug)]
pub struct FakeState {
    next_id: GLuint,
    pub buffers: BTreeSet<GLuint>,
    pub vertex_arrays: BTreeSet<GLuint>,
    pub shaders: BTreeSet<GLuint>,
    pub programs: BTreeSet<GLuint>,
    pub textures: BTreeSet<GLuint>,
    /// Every delete, in order, as (call name, handle).
    pub deleted: Vec<(&'static str, GLuint)>,

    pub array_buffer: GLuint,
    pub element_buffer: GLuint,
    pub vertex_array: GLuint,
    pub program: GLuint,
    pub texture_unit: GLenum,
    pub texture: GLuint,

    pub buffer_contents: HashMap<GLuint, Vec<u8>>,
    pub attribs: Vec<AttribPointer>,
    pub enabled_attribs: BTreeSet<GLuint>,

    pub shader_kinds: HashMap<GLuint, GLenum>,
    pub shader_sources: HashMap<GLuint, String>,
    pub attached: Vec<(GLuint, GLuint)>,
    pub linked: Vec<GLuint>,
    pub validated: Vec<GLuint>,
    /// Stage kind whose compile should fail.
    pub fail_compile: Option<GLenum>,
    pub fail_link: bool,
    pub fail_validate: bool,

    /// Uniforms every program pretends to have, name -> location.
    pub known_uniforms: HashMap<String, GLint>,
    pub uniform_lookups: Vec<String>,
    pub uniform_sets: Vec<(GLint, UniformValue)>,

    pub tex_params: Vec<(GLenum, GLint)>,
    /// texture -> (width, height, pixels)
    pub tex_images: HashMap<GLuint, (GLsizei, GLsizei, Vec<u8>)>,

    pub clear_color: [f32; 4],
    pub clears: usize,
    pub viewport: (GLint, GLint, GLsizei, GLsizei),
    pub enabled_caps: BTreeSet<GLenum>,
    pub blend_func: Option<(GLenum, GLenum)>,
    pub draws: Vec<DrawCall>,

    pub pending_errors: VecDeque<GLenum>,
    /// Raise this error when the named method runs.
    pub fail_calls: HashMap<&'static str, GLenum>,
}

impl FakeState {
    /// Handles that were created and not yet deleted, across every resource class.
    pub fn live_handles(&self) -> usize {
        self.buffers.len()
            + self.vertex_arrays.len()
            + self.shaders.len()
            + self.programs.len()
            + self.textures.len()
    }
}

pub struct FakeGl {
    state: RefCell<FakeState>,
    policy: ErrorPolicy,
}

impl FakeGl {
    pub fn new(policy: ErrorPolicy) -> Self {
        Self {
            state: RefCell::new(FakeState::default()),
            policy,
        }
    }

    pub fn state(&self) -> Ref<'_, FakeState> {
        self.state.borrow()
    }

    pub fn push_error(&self, code: GLenum) {
        self.state.borrow_mut().pending_errors.push_back(code);
    }

    pub fn fail_call(&self, method: &'static str, code: GLenum) {
        self.state.borrow_mut().fail_calls.insert(method, code);
    }

    pub fn fail_compile(&self, kind: GLenum) {
        self.state.borrow_mut().fail_compile = Some(kind);
    }

    pub fn fail_link(&self) {
        self.state.borrow_mut().fail_link = true;
    }

    pub fn fail_validate(&self) {
        self.state.borrow_mut().fail_validate = true;
    }

    pub fn add_uniform(&self, name: &str, location: GLint) {
        self.state
            .borrow_mut()
            .known_uniforms
            .insert(name.to_owned(), location);
    }

    fn call<T>(&self, method: &'static str, f: impl FnOnce(&mut FakeState) -> T) -> T {
        let mut state = self.state.borrow_mut();
        if let Some(&code) = state.fail_calls.get(method) {
            state.pending_errors.push_back(code);
        }
        f(&mut state)
    }

    fn new_id(state: &mut FakeState) -> GLuint {
        state.next_id += 1;
        state.next_id
    }

    fn delete(set: &mut BTreeSet<GLuint>, what: &'static str, id: GLuint) {
        assert!(set.remove(&id), "{what} {id} deleted but not live");
    }
}

impl GlBackend for FakeGl {
    fn error_policy(&self) -> ErrorPolicy {
        self.policy
    }

    fn get_error(&self) -> GLenum {
        self.state
            .borrow_mut()
            .pending_errors
            .pop_front()
            .unwrap_or(gl::NO_ERROR)
    }

    fn version_string(&self) -> Option<String> {
        Some("3.3.0 fake".to_owned())
    }

    fn viewport(&self, x: GLint, y: GLint, width: GLsizei, height: GLsizei) {
        self.call("viewport", |s| s.viewport = (x, y, width, height))
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        self.call("clear_color", |s| s.clear_color = [r, g, b, a])
    }

    fn clear(&self, _mask: GLbitfield) {
        self.call("clear", |s| s.clears += 1)
    }

    fn enable(&self, cap: GLenum) {
        self.call("enable", |s| {
            s.enabled_caps.insert(cap);
        })
    }

    fn blend_func(&self, src: GLenum, dst: GLenum) {
        self.call("blend_func", |s| s.blend_func = Some((src, dst)))
    }

    fn gen_buffer(&self) -> GLuint {
        self.call("gen_buffer", |s| {
            let id = Self::new_id(s);
            s.buffers.insert(id);
            id
        })
    }

    fn delete_buffer(&self, buffer: GLuint) {
        self.call("delete_buffer", |s| {
            Self::delete(&mut s.buffers, "buffer", buffer);
            s.deleted.push(("delete_buffer", buffer));
        })
    }

    fn bind_buffer(&self, target: GLenum, buffer: GLuint) {
        self.call("bind_buffer", |s| match target {
            gl::ARRAY_BUFFER => s.array_buffer = buffer,
            gl::ELEMENT_ARRAY_BUFFER => s.element_buffer = buffer,
            other => panic!("unexpected buffer target {other:#x}"),
        })
    }

    fn buffer_data(&self, target: GLenum, data: &[u8], _usage: GLenum) {
        self.call("buffer_data", |s| {
            let bound = match target {
                gl::ARRAY_BUFFER => s.array_buffer,
                gl::ELEMENT_ARRAY_BUFFER => s.element_buffer,
                other => panic!("unexpected buffer target {other:#x}"),
            };
            assert_ne!(bound, 0, "buffer_data with nothing bound");
            s.buffer_contents.insert(bound, data.to_vec());
        })
    }

    fn gen_vertex_array(&self) -> GLuint {
        self.call("gen_vertex_array", |s| {
            let id = Self::new_id(s);
            s.vertex_arrays.insert(id);
            id
        })
    }

    fn delete_vertex_array(&self, array: GLuint) {
        self.call("delete_vertex_array", |s| {
            Self::delete(&mut s.vertex_arrays, "vertex array", array);
            s.deleted.push(("delete_vertex_array", array));
        })
    }

    fn bind_vertex_array(&self, array: GLuint) {
        self.call("bind_vertex_array", |s| s.vertex_array = array)
    }

    fn enable_vertex_attrib_array(&self, index: GLuint) {
        self.call("enable_vertex_attrib_array", |s| {
            s.enabled_attribs.insert(index);
        })
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
        self.call("vertex_attrib_pointer", |s| {
            let pointer = AttribPointer {
                index,
                size,
                ty,
                normalized,
                stride,
                offset,
                buffer: s.array_buffer,
                vertex_array: s.vertex_array,
            };
            s.attribs.push(pointer);
        })
    }

    fn create_shader(&self, kind: GLenum) -> GLuint {
        self.call("create_shader", |s| {
            let id = Self::new_id(s);
            s.shaders.insert(id);
            s.shader_kinds.insert(id, kind);
            id
        })
    }

    fn shader_source(&self, shader: GLuint, source: &str) {
        self.call("shader_source", |s| {
            s.shader_sources.insert(shader, source.to_owned());
        })
    }

    fn compile_shader(&self, _shader: GLuint) {
        self.call("compile_shader", |_| ())
    }

    fn shader_compile_status(&self, shader: GLuint) -> bool {
        self.call("shader_compile_status", |s| {
            s.fail_compile != s.shader_kinds.get(&shader).copied()
        })
    }

    fn shader_info_log(&self, shader: GLuint) -> String {
        format!("0:1(1): error: shader {shader} is broken")
    }

    fn delete_shader(&self, shader: GLuint) {
        self.call("delete_shader", |s| {
            Self::delete(&mut s.shaders, "shader", shader);
            s.deleted.push(("delete_shader", shader));
        })
    }

    fn create_program(&self) -> GLuint {
        self.call("create_program", |s| {
            let id = Self::new_id(s);
            s.programs.insert(id);
            id
        })
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        self.call("attach_shader", |s| s.attached.push((program, shader)))
    }

    fn link_program(&self, program: GLuint) {
        self.call("link_program", |s| s.linked.push(program))
    }

    fn validate_program(&self, program: GLuint) {
        self.call("validate_program", |s| s.validated.push(program))
    }

    fn program_status(&self, _program: GLuint, pname: GLenum) -> bool {
        self.call("program_status", |s| match pname {
            gl::LINK_STATUS => !s.fail_link,
            gl::VALIDATE_STATUS => !s.fail_validate,
            other => panic!("unexpected program status {other:#x}"),
        })
    }

    fn program_info_log(&self, program: GLuint) -> String {
        format!("program {program}: undefined reference to main")
    }

    fn delete_program(&self, program: GLuint) {
        self.call("delete_program", |s| {
            Self::delete(&mut s.programs, "program", program);
            s.deleted.push(("delete_program", program));
        })
    }

    fn use_program(&self, program: GLuint) {
        self.call("use_program", |s| s.program = program)
    }

    fn uniform_location(&self, _program: GLuint, name: &str) -> GLint {
        self.call("uniform_location", |s| {
            s.uniform_lookups.push(name.to_owned());
            s.known_uniforms.get(name).copied().unwrap_or(-1)
        })
    }

    fn uniform_1i(&self, location: GLint, value: i32) {
        self.call("uniform_1i", |s| {
            s.uniform_sets.push((location, UniformValue::Int(value)))
        })
    }

    fn uniform_1f(&self, location: GLint, value: f32) {
        self.call("uniform_1f", |s| {
            s.uniform_sets.push((location, UniformValue::Float(value)))
        })
    }

    fn uniform_4f(&self, location: GLint, value: [f32; 4]) {
        self.call("uniform_4f", |s| {
            s.uniform_sets.push((location, UniformValue::Vec4(value)))
        })
    }

    fn uniform_matrix_4f(&self, location: GLint, value: &[f32; 16]) {
        self.call("uniform_matrix_4f", |s| {
            s.uniform_sets.push((location, UniformValue::Mat4(*value)))
        })
    }

    fn gen_texture(&self) -> GLuint {
        self.call("gen_texture", |s| {
            let id = Self::new_id(s);
            s.textures.insert(id);
            id
        })
    }

    fn delete_texture(&self, texture: GLuint) {
        self.call("delete_texture", |s| {
            Self::delete(&mut s.textures, "texture", texture);
            s.deleted.push(("delete_texture", texture));
        })
    }

    fn active_texture(&self, unit: GLenum) {
        self.call("active_texture", |s| s.texture_unit = unit)
    }

    fn bind_texture(&self, target: GLenum, texture: GLuint) {
        assert_eq!(target, gl::TEXTURE_2D);
        self.call("bind_texture", |s| s.texture = texture)
    }

    fn tex_parameter_i(&self, target: GLenum, pname: GLenum, param: GLint) {
        assert_eq!(target, gl::TEXTURE_2D);
        self.call("tex_parameter_i", |s| s.tex_params.push((pname, param)))
    }

    fn tex_image_2d_rgba8(&self, width: GLsizei, height: GLsizei, pixels: &[u8]) {
        self.call("tex_image_2d_rgba8", |s| {
            assert_ne!(s.texture, 0, "tex_image_2d with nothing bound");
            let bound = s.texture;
            s.tex_images.insert(bound, (width, height, pixels.to_vec()));
        })
    }

    fn draw_arrays(&self, mode: GLenum, _first: GLint, count: GLsizei) {
        self.call("draw_arrays", |s| {
            let draw = DrawCall {
                mode,
                count,
                indexed: false,
                program: s.program,
                vertex_array: s.vertex_array,
                element_buffer: s.element_buffer,
            };
            s.draws.push(draw);
        })
    }

    fn draw_elements(&self, mode: GLenum, count: GLsizei, index_type: GLenum) {
        assert_eq!(index_type, gl::UNSIGNED_INT);
        self.call("draw_elements", |s| {
            let draw = DrawCall {
                mode,
                count,
                indexed: true,
                program: s.program,
                vertex_array: s.vertex_array,
                element_buffer: s.element_buffer,
            };
            s.draws.push(draw);
        })
    }
}
