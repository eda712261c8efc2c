//! Exports [`Texture`].
use std::path::Path;

use gl::types::{GLint, GLsizei, GLuint};

use crate::{backend::GlBackend, gl_call::gl_call};

#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to load image '{path}': {source}")]
    Image {
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error("{width}x{height} image is too large for a texture")]
    TooLarge { width: u32, height: u32 },
    #[error("expected {expected} bytes of RGBA8 pixels, got {actual}")]
    BadPixelData { expected: usize, actual: usize },
}

/// A 2D RGBA8 texture. The pixels live on the GPU only.
pub struct Texture<'gl, B: GlBackend + ?Sized> {
    gl: &'gl B,
    id: GLuint,
    width: u32,
    height: u32,
}

impl<'gl, B: GlBackend + ?Sized> Texture<'gl, B> {
    /// Decode the image at `path` and upload it.
    ///
    /// Rows are flipped so the first row uploaded is the bottom of the image,
    /// which is where OpenGL puts texture coordinate (0, 0).
    pub fn from_file(gl: &'gl B, path: impl AsRef<Path>) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let image = image::open(path)
            .map_err(|source| TextureError::Image {
                path: path.display().to_string(),
                source,
            })?
            .flipv()
            .to_rgba8();

        let texture = Self::from_rgba8(gl, image.width(), image.height(), image.as_raw())?;
        log::debug!(
            "texture {} loaded from {} ({}x{})",
            texture.id,
            path.display(),
            texture.width,
            texture.height
        );
        // the decoded pixels are dropped here, nothing is kept on the CPU
        Ok(texture)
    }

    /// Upload tightly packed, bottom-row-first RGBA8 pixels.
    ///
    /// Linear filtering, clamped to the edge on both axes. Leaves nothing bound.
    pub fn from_rgba8(
        gl: &'gl B,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<Self, TextureError> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(TextureError::BadPixelData {
                expected,
                actual: pixels.len(),
            });
        }
        let (Ok(gl_width), Ok(gl_height)) = (GLsizei::try_from(width), GLsizei::try_from(height))
        else {
            return Err(TextureError::TooLarge { width, height });
        };

        let id = gl_call(gl, "glGenTextures", |gl| gl.gen_texture());
        gl_call(gl, "glBindTexture", |gl| gl.bind_texture(gl::TEXTURE_2D, id));

        let params = [
            (gl::TEXTURE_MIN_FILTER, gl::LINEAR),
            (gl::TEXTURE_MAG_FILTER, gl::LINEAR),
            // no tiling on x
            (gl::TEXTURE_WRAP_S, gl::CLAMP_TO_EDGE),
            // or on y
            (gl::TEXTURE_WRAP_T, gl::CLAMP_TO_EDGE),
        ];
        for (pname, param) in params {
            gl_call(gl, "glTexParameteri", |gl| {
                gl.tex_parameter_i(gl::TEXTURE_2D, pname, param as GLint)
            });
        }

        gl_call(gl, "glTexImage2D", |gl| {
            gl.tex_image_2d_rgba8(gl_width, gl_height, pixels)
        });
        gl_call(gl, "glBindTexture", |gl| gl.bind_texture(gl::TEXTURE_2D, 0));

        Ok(Self {
            gl,
            id,
            width,
            height,
        })
    }

    /// Bind to texture unit `slot` (`GL_TEXTURE0 + slot`).
    pub fn bind(&self, slot: u32) {
        gl_call(self.gl, "glActiveTexture", |gl| {
            gl.active_texture(gl::TEXTURE0 + slot)
        });
        gl_call(self.gl, "glBindTexture", |gl| {
            gl.bind_texture(gl::TEXTURE_2D, self.id)
        });
    }

    pub fn unbind(&self) {
        gl_call(self.gl, "glBindTexture", |gl| gl.bind_texture(gl::TEXTURE_2D, 0));
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl<B: GlBackend + ?Sized> Drop for Texture<'_, B> {
    fn drop(&mut self) {
        gl_call(self.gl, "glDeleteTextures", |gl| gl.delete_texture(self.id));
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::{backend::ErrorPolicy, fake::FakeGl};

    fn temp_png(name: &str, img: &image::RgbaImage) -> PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{name}.png", std::process::id()));
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn upload_sets_filtering_and_clamping() {
        let gl = FakeGl::new(ErrorPolicy::Trap);
        let texture = Texture::from_rgba8(&gl, 2, 1, &[255; 8]).unwrap();

        let state = gl.state();
        assert_eq!(
            state.tex_params,
            vec![
                (gl::TEXTURE_MIN_FILTER, gl::LINEAR as GLint),
                (gl::TEXTURE_MAG_FILTER, gl::LINEAR as GLint),
                (gl::TEXTURE_WRAP_S, gl::CLAMP_TO_EDGE as GLint),
                (gl::TEXTURE_WRAP_T, gl::CLAMP_TO_EDGE as GLint),
            ]
        );
        let (width, height, pixels) = &state.tex_images[&texture.id()];
        assert_eq!((*width, *height, pixels.len()), (2, 1, 8));
        assert_eq!(state.texture, 0);
    }

    #[test]
    fn bind_selects_the_slot_first() {
        let gl = FakeGl::new(ErrorPolicy::Trap);
        let texture = Texture::from_rgba8(&gl, 1, 1, &[0; 4]).unwrap();
        texture.bind(3);
        assert_eq!(gl.state().texture_unit, gl::TEXTURE3);
        assert_eq!(gl.state().texture, texture.id());
        texture.unbind();
        assert_eq!(gl.state().texture, 0);
    }

    #[test]
    fn wrong_pixel_count_is_rejected_before_any_gl_call() {
        let gl = FakeGl::new(ErrorPolicy::Trap);
        let err = Texture::from_rgba8(&gl, 2, 2, &[0; 4]).err().unwrap();
        assert!(matches!(
            err,
            TextureError::BadPixelData {
                expected: 16,
                actual: 4
            }
        ));
        assert!(gl.state().textures.is_empty());
    }

    #[test]
    fn from_file_flips_rows_and_releases_on_drop() {
        let mut img = image::RgbaImage::new(3, 2);
        img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        let path = temp_png("decode", &img);

        let gl = FakeGl::new(ErrorPolicy::Trap);
        let texture = Texture::from_file(&gl, &path).unwrap();
        assert_eq!((texture.width(), texture.height()), (3, 2));
        {
            let state = gl.state();
            let (width, height, pixels) = &state.tex_images[&texture.id()];
            assert_eq!((*width, *height, pixels.len()), (3, 2, 24));
            // the top-left red pixel ends up in the last uploaded row
            assert_eq!(&pixels[12..16], &[255, 0, 0, 255]);
            assert_eq!(&pixels[0..4], &[0, 0, 0, 0]);
        }

        drop(texture);
        assert!(gl.state().textures.is_empty());
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn missing_image_is_an_error_not_an_empty_texture() {
        let gl = FakeGl::new(ErrorPolicy::Trap);
        let err = Texture::from_file(&gl, "no/such/image.png").err().unwrap();
        assert!(matches!(err, TextureError::Image { .. }));
        assert!(gl.state().textures.is_empty());
    }
}
