//! Clear-then-check wrapping of individual GL calls.
use std::{fmt, panic::Location};

use gl::types::GLenum;

use crate::backend::{ErrorPolicy, GlBackend};

/// A drained error flag can keep coming back on a lost context; stop after this many.
const MAX_DRAINED_ERRORS: usize = 32;

/// A value returned by `glGetError`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlErrorCode(pub GLenum);

impl GlErrorCode {
    pub fn name(&self) -> &'static str {
        match self.0 {
            gl::INVALID_ENUM => "GL_INVALID_ENUM",
            gl::INVALID_VALUE => "GL_INVALID_VALUE",
            gl::INVALID_OPERATION => "GL_INVALID_OPERATION",
            gl::STACK_OVERFLOW => "GL_STACK_OVERFLOW",
            gl::STACK_UNDERFLOW => "GL_STACK_UNDERFLOW",
            gl::OUT_OF_MEMORY => "GL_OUT_OF_MEMORY",
            gl::INVALID_FRAMEBUFFER_OPERATION => "GL_INVALID_FRAMEBUFFER_OPERATION",
            _ => "unknown error",
        }
    }
}

impl fmt::Display for GlErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x} ({})", self.0, self.name())
    }
}

/// Pop every pending error flag off the context.
pub fn drain_errors<B: GlBackend + ?Sized>(gl: &B) -> Vec<GlErrorCode> {
    let mut errors = vec![];
    while errors.len() < MAX_DRAINED_ERRORS {
        match gl.get_error() {
            gl::NO_ERROR => break,
            code => errors.push(GlErrorCode(code)),
        }
    }
    errors
}

/// Run `op` against `gl`, reporting any error it raised.
///
/// Errors left over from earlier calls are discarded first so they can't be
/// blamed on `call`. Each error raised by `op` is logged together with `call`
/// and the caller's file and line; under [`ErrorPolicy::Trap`] the first report
/// panics.
#[track_caller]
pub fn gl_call<B, T>(gl: &B, call: &'static str, op: impl FnOnce(&B) -> T) -> T
where
    B: GlBackend + ?Sized,
{
    let site = Location::caller();
    let stale = drain_errors(gl);
    if !stale.is_empty() {
        log::trace!("discarded {} stale GL error(s) before {call}", stale.len());
    }

    let ret = op(gl);

    let errors = drain_errors(gl);
    for code in &errors {
        log::error!(
            "[OpenGL Error] {code}: {call} {}:{}",
            site.file(),
            site.line()
        );
    }
    if let Some(first) = errors.first() {
        if gl.error_policy() == ErrorPolicy::Trap {
            panic!(
                "OpenGL error {first} in {call} at {}:{}",
                site.file(),
                site.line()
            );
        }
    }
    ret
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeGl;

    #[test]
    fn stale_errors_are_not_blamed_on_the_next_call() {
        let gl = FakeGl::new(ErrorPolicy::Trap);
        gl.push_error(gl::INVALID_ENUM);
        gl.push_error(gl::INVALID_VALUE);

        let id = gl_call(&gl, "glGenBuffers", |gl| gl.gen_buffer());
        assert_ne!(id, 0);
        assert!(drain_errors(&gl).is_empty());
    }

    #[test]
    fn errors_raised_by_the_call_are_all_drained() {
        let gl = FakeGl::new(ErrorPolicy::Log);
        gl.fail_call("clear", gl::INVALID_VALUE);

        gl_call(&gl, "glClear", |gl| gl.clear(gl::COLOR_BUFFER_BIT));
        assert!(drain_errors(&gl).is_empty());
        assert_eq!(gl.state().clears, 1);
    }

    #[test]
    #[should_panic(expected = "GL_INVALID_OPERATION")]
    fn trap_policy_panics_with_call_site() {
        let gl = FakeGl::new(ErrorPolicy::Trap);
        gl.fail_call("use_program", gl::INVALID_OPERATION);
        gl_call(&gl, "glUseProgram", |gl| gl.use_program(42));
    }

    #[test]
    fn draining_is_bounded() {
        let gl = FakeGl::new(ErrorPolicy::Log);
        for _ in 0..100 {
            gl.push_error(gl::OUT_OF_MEMORY);
        }
        assert_eq!(drain_errors(&gl).len(), MAX_DRAINED_ERRORS);
    }

    #[test]
    fn error_code_names() {
        assert_eq!(
            GlErrorCode(gl::INVALID_OPERATION).to_string(),
            "0x0502 (GL_INVALID_OPERATION)"
        );
        assert_eq!(GlErrorCode(0x1234).name(), "unknown error");
    }
}
