//! The slice of the graphics driver the shell and the shader builder talk to.
//!
//! [`GlDriver`] is implemented for `glow::Context`.  Everything is called on
//! the thread that made the context current; the trait takes `&self` like
//! glow does, since GL state lives on the driver side.

use std::fmt;

use glow::HasContext;

use crate::shader::StageKind;

/// Literal reported in place of an empty info log.
pub const NO_INFO_LOG: &str = "No information log";

/// Driver identification strings, logged once at shell construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriverInfo {
    pub version: String,
    pub renderer: String,
    pub vendor: String,
    pub shading_language: String,
}

impl fmt::Display for DriverInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "OpenGL {} ({}, {}), GLSL {}",
            self.version, self.renderer, self.vendor, self.shading_language
        )
    }
}

pub trait GlDriver {
    type Shader: Copy + fmt::Debug;
    type Program: Copy + fmt::Debug;

    fn create_shader(&self, kind: StageKind) -> Result<Self::Shader, String>;
    fn shader_source(&self, shader: Self::Shader, source: &str);
    fn compile_shader(&self, shader: Self::Shader);
    fn shader_compile_status(&self, shader: Self::Shader) -> bool;
    /// Raw info log, possibly empty.
    fn raw_shader_info_log(&self, shader: Self::Shader) -> String;
    fn delete_shader(&self, shader: Self::Shader);

    fn create_program(&self) -> Result<Self::Program, String>;
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn link_program(&self, program: Self::Program);
    fn program_link_status(&self, program: Self::Program) -> bool;
    /// Raw info log, possibly empty.
    fn raw_program_info_log(&self, program: Self::Program) -> String;
    fn delete_program(&self, program: Self::Program);

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
    fn driver_info(&self) -> DriverInfo;

    /// Shader info log, never empty.
    fn shader_info_log(&self, shader: Self::Shader) -> String {
        non_empty_log(self.raw_shader_info_log(shader))
    }

    /// Program info log, never empty.
    fn program_info_log(&self, program: Self::Program) -> String {
        non_empty_log(self.raw_program_info_log(program))
    }
}

fn non_empty_log(log: String) -> String {
    // drivers pad logs with trailing newlines / NULs
    let trimmed = log.trim_end_matches(&['\0', '\n', '\r', ' '][..]);
    if trimmed.is_empty() {
        NO_INFO_LOG.to_string()
    } else {
        trimmed.to_string()
    }
}

// SAFETY (applies to every block below): glow entry points are unsafe
// because they require a current context on the calling thread and valid
// object names.  The shell makes its context current before handing the
// driver out and never moves it to another thread; object names come from
// this same context.
impl GlDriver for glow::Context {
    type Shader = glow::Shader;
    type Program = glow::Program;

    fn create_shader(&self, kind: StageKind) -> Result<Self::Shader, String> {
        unsafe { HasContext::create_shader(self, kind.gl_enum()) }
    }

    fn shader_source(&self, shader: Self::Shader, source: &str) {
        unsafe { HasContext::shader_source(self, shader, source) }
    }

    fn compile_shader(&self, shader: Self::Shader) {
        unsafe { HasContext::compile_shader(self, shader) }
    }

    fn shader_compile_status(&self, shader: Self::Shader) -> bool {
        unsafe { self.get_shader_compile_status(shader) }
    }

    fn raw_shader_info_log(&self, shader: Self::Shader) -> String {
        unsafe { self.get_shader_info_log(shader) }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        unsafe { HasContext::delete_shader(self, shader) }
    }

    fn create_program(&self) -> Result<Self::Program, String> {
        unsafe { HasContext::create_program(self) }
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { HasContext::attach_shader(self, program, shader) }
    }

    fn link_program(&self, program: Self::Program) {
        unsafe { HasContext::link_program(self, program) }
    }

    fn program_link_status(&self, program: Self::Program) -> bool {
        unsafe { self.get_program_link_status(program) }
    }

    fn raw_program_info_log(&self, program: Self::Program) -> String {
        unsafe { self.get_program_info_log(program) }
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe { HasContext::delete_program(self, program) }
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { HasContext::viewport(self, x, y, width, height) }
    }

    fn driver_info(&self) -> DriverInfo {
        unsafe {
            DriverInfo {
                version: self.get_parameter_string(glow::VERSION),
                renderer: self.get_parameter_string(glow::RENDERER),
                vendor: self.get_parameter_string(glow::VENDOR),
                shading_language: self.get_parameter_string(glow::SHADING_LANGUAGE_VERSION),
            }
        }
    }
}
