//! Shared plumbing for the demo binaries.

use std::path::PathBuf;
use std::process::ExitCode;

use log::LevelFilter;
use lumen_gl::ShaderError;

/// Path of a GLSL source shipped in this crate's `shaders/` directory.
pub fn shader_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("shaders").join(name)
}

/// Install the logger, run `demo`, and turn its outcome into an exit code.
///
/// A failure is reported as a single ERROR line, unless the shader builder
/// already logged it when it happened.
pub fn run_demo(demo: impl FnOnce() -> anyhow::Result<()>) -> ExitCode {
    if let Err(err) = lumen_core::logging::init(LevelFilter::Info) {
        eprintln!("[ERROR] lumen: {err}");
    }
    match demo() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if logged_by_builder(&err) {
                log::debug!(target: "lumen", "{err:#}");
            } else {
                log::error!(target: "lumen", "{err:#}");
            }
            ExitCode::FAILURE
        }
    }
}

/// Shader failures are logged by `lumen_gl` at the point of failure.
fn logged_by_builder(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| cause.is::<ShaderError>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shader_failures_are_not_reported_twice() {
        let shader = anyhow::Error::from(ShaderError::Link {
            log: "error: no main".to_string(),
        })
        .context("cube program");
        assert!(logged_by_builder(&shader));

        let window = anyhow::Error::from(lumen_app::ShellError::WindowCreation(
            "no display".to_string(),
        ));
        assert!(!logged_by_builder(&window));
    }

    #[test]
    fn bundled_shaders_exist() {
        for name in ["hello.vert.glsl", "hello.frag.glsl", "cube.vert.glsl", "cube.frag.glsl"] {
            assert!(shader_path(name).is_file(), "{name}");
        }
    }
}
