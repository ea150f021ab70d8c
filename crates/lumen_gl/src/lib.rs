//! lumen_gl: shader program builder and the driver interface it runs on.

pub mod driver;
pub mod error;
pub mod shader;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use driver::{DriverInfo, GlDriver, NO_INFO_LOG};
pub use error::{Result, ShaderError};
pub use shader::{
    compile_stage, create_shader_program, link_program, Program, ProgramSources, Stage, StageKind,
};

// glow is part of the public surface (`GlDriver` is implemented for
// `glow::Context`); re-export it so callers use the same version.
pub use glow;
