//! The GL objects one lesson draws, and what it does each frame.
use anyhow::{Context, Result};
use render::{
    gl_wrappers::{IndexBuffer, Program, Texture, VertexArray, VertexBuffer, VertexLayout},
    GlBackend, Renderer, ShaderProgramSource,
};
use world::{projection, Mesh, Oscillator, Vertex};

use crate::config::{AppConfig, Lesson};

const TRIANGLE_VERTEX_SHADER: &str = "#version 330 core

layout(location = 0) in vec4 position;

void main()
{
   gl_Position = position;
}
";

const TRIANGLE_FRAGMENT_SHADER: &str = "#version 330 core

layout(location = 0) out vec4 color;

void main()
{
   color = vec4(0.1, 0.9, 1.0, 1.0);
}
";

const COLOR_SHADER: &str = "color.shader";
const TEXTURED_SHADER: &str = "textured.shader";
const TEXTURE: &str = "checker.png";
const TEXTURE_SLOT: u32 = 0;

/// Everything one lesson uploads, dropped together when the lesson ends.
pub struct Scene<'gl, B: GlBackend + ?Sized> {
    lesson: Lesson,
    va: VertexArray<'gl, B>,
    // attached to `va`, kept alive with it
    _vb: VertexBuffer<'gl, B>,
    /// `None` for lessons that draw without an index buffer.
    ib: Option<IndexBuffer<'gl, B>>,
    vertex_count: usize,
    program: Program<'gl, B>,
    texture: Option<Texture<'gl, B>>,
    pulse: Oscillator,
}

impl<'gl, B: GlBackend + ?Sized> Scene<'gl, B> {
    /// Upload the geometry and build the program for `config.lesson`.
    pub fn build(gl: &'gl B, config: &AppConfig) -> Result<Self> {
        let lesson = config.lesson;
        let mesh = match lesson {
            Lesson::Triangle => Mesh::triangle(),
            Lesson::ColorQuad | Lesson::TexturedQuad => Mesh::quad(),
        };

        let va = VertexArray::new(gl);
        let vb = VertexBuffer::new(gl, &mesh.vertices);
        va.add_buffer(&vb, &Vertex::layout());
        let ib = match lesson {
            Lesson::Triangle => None,
            _ => Some(IndexBuffer::new(gl, &mesh.indices)),
        };

        let program = match lesson {
            Lesson::Triangle => {
                let source = ShaderProgramSource {
                    vertex: TRIANGLE_VERTEX_SHADER.to_owned(),
                    fragment: TRIANGLE_FRAGMENT_SHADER.to_owned(),
                };
                Program::from_source(gl, &source).context("building the triangle shader")?
            }
            Lesson::ColorQuad => {
                let path = config.shader_path(COLOR_SHADER);
                Program::from_file(gl, &path)
                    .with_context(|| format!("building {}", path.display()))?
            }
            Lesson::TexturedQuad => {
                let path = config.shader_path(TEXTURED_SHADER);
                Program::from_file(gl, &path)
                    .with_context(|| format!("building {}", path.display()))?
            }
        };

        let texture = match lesson {
            Lesson::TexturedQuad => {
                let path = config.texture_path(TEXTURE);
                let texture = Texture::from_file(gl, &path)
                    .with_context(|| format!("loading {}", path.display()))?;
                Some(texture)
            }
            _ => None,
        };

        // leave a clean slate, the frame binds what it needs
        va.unbind();
        vb.unbind();
        if let Some(ib) = &ib {
            ib.unbind();
        }

        let mut scene = Self {
            lesson,
            va,
            _vb: vb,
            ib,
            vertex_count: mesh.vertices.len(),
            program,
            texture,
            pulse: Oscillator::default(),
        };
        if scene.texture.is_some() {
            scene.program.bind();
            scene.program.set_uniform_1i("u_Texture", TEXTURE_SLOT as i32);
        }
        scene.resize(config.width, config.height);
        scene.program.unbind();
        Ok(scene)
    }

    /// Recompute anything that depends on the window size.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.lesson == Lesson::TexturedQuad {
            let proj = projection::ortho_for_window(width, height);
            let mvp = projection::mvp(&proj, glm::vec3(0.0, 0.0, 0.0));
            self.program.bind();
            self.program.set_uniform_mat4f("u_MVP", &mvp);
        }
    }

    /// Clear, update the per-frame uniform, draw once, then step the animation.
    pub fn frame(&mut self, renderer: &Renderer<'_, B>) {
        renderer.clear();

        self.program.bind();
        if self.lesson != Lesson::Triangle {
            let r = self.pulse.value();
            self.program.set_uniform_4f("u_Color", r, 0.3, 0.8, 1.0);
        }
        if let Some(texture) = &self.texture {
            texture.bind(TEXTURE_SLOT);
        }

        match &self.ib {
            Some(ib) => renderer.draw(&self.va, ib, &self.program),
            None => renderer.draw_arrays(&self.va, &self.program, self.vertex_count),
        }

        self.pulse.advance();
    }

    pub fn pulse(&self) -> &Oscillator {
        &self.pulse
    }
}
