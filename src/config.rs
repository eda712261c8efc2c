//! Command line configuration.
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

pub const START_WIDTH: u32 = 640;
pub const START_HEIGHT: u32 = 480;

/// Which step of the progression to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Lesson {
    /// One triangle, shaders inline, drawn without an index buffer.
    Triangle,
    /// An indexed quad whose color pulses through a uniform.
    ColorQuad,
    /// A textured quad positioned with a model-view-projection matrix.
    TexturedQuad,
}

#[derive(Debug, Parser)]
#[command(version, about = "Small OpenGL lessons: buffers, shaders, uniforms, textures")]
pub struct AppConfig {
    /// Lesson to run.
    #[arg(long, value_enum, default_value_t = Lesson::TexturedQuad)]
    pub lesson: Lesson,

    #[arg(long, default_value_t = START_WIDTH)]
    pub width: u32,

    #[arg(long, default_value_t = START_HEIGHT)]
    pub height: u32,

    #[arg(long, default_value = "OpenGL Practice")]
    pub title: String,

    /// Directory holding `shaders/` and `textures/`.
    #[arg(long, default_value = "res")]
    pub assets: PathBuf,

    #[arg(long, default_value_t = 3)]
    pub gl_major: u8,

    #[arg(long, default_value_t = 3)]
    pub gl_minor: u8,

    /// Don't wait for vertical sync when presenting.
    #[arg(long)]
    pub no_vsync: bool,

    /// Log GL errors and keep going, even in debug builds.
    #[arg(long)]
    pub lenient_gl_errors: bool,

    /// `env_logger` filter, e.g. "debug" or "render=trace". Falls back to RUST_LOG.
    #[arg(long)]
    pub log_filter: Option<String>,
}

impl AppConfig {
    pub fn shader_path(&self, name: &str) -> PathBuf {
        self.assets.join("shaders").join(name)
    }

    pub fn texture_path(&self, name: &str) -> PathBuf {
        self.assets.join("textures").join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_original_window() {
        let config = AppConfig::try_parse_from(["learn_gl"]).unwrap();
        assert_eq!(config.lesson, Lesson::TexturedQuad);
        assert_eq!((config.width, config.height), (640, 480));
        assert_eq!((config.gl_major, config.gl_minor), (3, 3));
        assert!(!config.no_vsync);
        assert!(!config.lenient_gl_errors);
        assert_eq!(
            config.shader_path("basic.shader"),
            PathBuf::from("res/shaders/basic.shader")
        );
    }

    #[test]
    fn lessons_are_kebab_case() {
        let config =
            AppConfig::try_parse_from(["learn_gl", "--lesson", "color-quad", "--width", "800"])
                .unwrap();
        assert_eq!(config.lesson, Lesson::ColorQuad);
        assert_eq!(config.width, 800);
        assert!(AppConfig::try_parse_from(["learn_gl", "--lesson", "cube"]).is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        AppConfig::command().debug_assert();
    }
}
