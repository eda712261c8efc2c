//! Window setup and the frame loop.
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use render::{ErrorPolicy, GlBackend, GlContext, Renderer};
use sdl2::{
    event::{Event, WindowEvent},
    keyboard::Keycode,
    video::{self, SwapInterval},
};

use crate::{
    config::{AppConfig, Lesson},
    frame_stats::FrameStats,
    scene::Scene,
};

/// Whether the frame loop keeps going.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Closing,
}

impl LoopState {
    /// Fold one event in. Once closing, nothing reopens the loop.
    pub fn on_event(self, event: &Event) -> Self {
        match (self, event) {
            (Self::Closing, _) => Self::Closing,
            (
                _,
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::ESCAPE),
                    ..
                },
            ) => Self::Closing,
            _ => self,
        }
    }
}

/// The new drawable size, if `event` resized the window with id `main_id`.
pub fn resized_to(event: &Event, main_id: u32) -> Option<(u32, u32)> {
    match event {
        Event::Window {
            window_id,
            win_event: WindowEvent::Resized(width, height),
            ..
        } if *window_id == main_id => {
            let width = u32::try_from(*width).ok()?;
            let height = u32::try_from(*height).ok()?;
            Some((width, height))
        }
        _ => None,
    }
}

fn init_sdl(
    config: &AppConfig,
) -> Result<(sdl2::Sdl, sdl2::VideoSubsystem, video::Window), String> {
    let sdl_ctx = sdl2::init()?;

    let video_ctx = sdl_ctx.video()?;
    video_ctx.gl_load_library_default()?;

    let gl_attr = video_ctx.gl_attr();
    if cfg!(debug_assertions) {
        gl_attr.set_context_flags().forward_compatible().debug().set();
    } else {
        gl_attr.set_context_flags().forward_compatible().set();
    }
    gl_attr.set_context_major_version(config.gl_major);
    gl_attr.set_context_minor_version(config.gl_minor);
    gl_attr.set_context_profile(video::GLProfile::Core);

    let window = video_ctx
        .window(&config.title, config.width, config.height)
        .position_centered()
        .resizable()
        .opengl()
        .build()
        .map_err(|e| format!("error creating window: {e}"))?;

    Ok((sdl_ctx, video_ctx, window))
}

/// Open the window, run `config.lesson` until the user quits, then tear down.
pub fn run(config: &AppConfig) -> Result<()> {
    let (sdl_ctx, video_ctx, window) =
        init_sdl(config).map_err(|e| anyhow!(e)).context("initializing SDL")?;
    let main_id = window.id();

    let gl = GlContext::new(&video_ctx, &window)
        .map_err(|e| anyhow!(e))
        .context("creating the OpenGL context")?;
    if config.lenient_gl_errors {
        gl.set_error_policy(ErrorPolicy::Log);
    }
    match gl.version_string() {
        Some(version) => log::info!("OpenGL {version}"),
        None => log::warn!("driver didn't report a GL version"),
    }

    let interval = if config.no_vsync {
        SwapInterval::Immediate
    } else {
        SwapInterval::VSync
    };
    if let Err(e) = video_ctx.gl_set_swap_interval(interval) {
        log::warn!("couldn't set swap interval {interval:?}: {e}");
    }

    let mut event_pump = sdl_ctx
        .event_pump()
        .map_err(|e| anyhow!(e))
        .context("creating the event pump")?;

    // everything that borrows `gl` is dropped at the end of this scope
    {
        let renderer = Renderer::new(&gl);
        renderer.set_viewport(config.width, config.height);
        if config.lesson == Lesson::TexturedQuad {
            renderer.enable_blending();
        }

        let mut scene = Scene::build(&gl, config)?;
        log::info!("running lesson {:?}", config.lesson);

        let mut stats = FrameStats::new(Instant::now());
        let mut state = LoopState::Running;
        while state == LoopState::Running {
            let frame_start = Instant::now();
            for event in event_pump.poll_iter() {
                state = state.on_event(&event);
                if let Some((width, height)) = resized_to(&event, main_id) {
                    log::debug!("window resized to {width}x{height}");
                    renderer.set_viewport(width, height);
                    scene.resize(width, height);
                }
            }
            if state == LoopState::Closing {
                break;
            }

            scene.frame(&renderer);
            window.gl_swap_window();

            let now = Instant::now();
            if let Some(report) = stats.record(now.duration_since(frame_start), now) {
                log::debug!(
                    "frametime: {:0.8}, FPS: {:0.2}, frames counted: {:05}, pulse: {:.2}",
                    report.avg_frametime,
                    report.fps,
                    report.frames,
                    scene.pulse().value()
                );
            }
        }
    }

    log::info!("window closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use sdl2::keyboard::Mod;

    use super::*;

    fn key_down(keycode: Keycode) -> Event {
        Event::KeyDown {
            timestamp: 0,
            window_id: 1,
            keycode: Some(keycode),
            scancode: None,
            keymod: Mod::NOMOD,
            repeat: false,
        }
    }

    fn resize(window_id: u32, width: i32, height: i32) -> Event {
        Event::Window {
            timestamp: 0,
            window_id,
            win_event: WindowEvent::Resized(width, height),
        }
    }

    #[test]
    fn quit_and_escape_close_the_loop() {
        let quit = Event::Quit { timestamp: 0 };
        assert_eq!(LoopState::Running.on_event(&quit), LoopState::Closing);
        assert_eq!(
            LoopState::Running.on_event(&key_down(Keycode::ESCAPE)),
            LoopState::Closing
        );
    }

    #[test]
    fn other_input_keeps_running() {
        assert_eq!(
            LoopState::Running.on_event(&key_down(Keycode::SPACE)),
            LoopState::Running
        );
        assert_eq!(
            LoopState::Running.on_event(&resize(1, 10, 10)),
            LoopState::Running
        );
    }

    #[test]
    fn closing_is_final() {
        assert_eq!(
            LoopState::Closing.on_event(&key_down(Keycode::SPACE)),
            LoopState::Closing
        );
    }

    #[test]
    fn only_the_main_window_resizes() {
        assert_eq!(resized_to(&resize(1, 800, 600), 1), Some((800, 600)));
        assert_eq!(resized_to(&resize(2, 800, 600), 1), None);
        assert_eq!(resized_to(&resize(1, -1, 600), 1), None);
        assert_eq!(resized_to(&Event::Quit { timestamp: 0 }, 1), None);
    }
}
