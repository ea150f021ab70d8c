//! Windowed OpenGL application shell.
//!
//! A [`Shell`] owns one window and its current GL context.  [`Shell::run`]
//! renders, presents and dispatches input to a [`LumenApp`] until the close
//! flag is set, either by a hook or by the window system.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use lumen_app::{App, AppContext, LumenApp};
//!
//! struct Clear;
//!
//! impl LumenApp for Clear {
//!     fn render(&mut self, ctx: &mut AppContext) {
//!         use lumen_gl::glow::HasContext;
//!         unsafe { ctx.gl.clear(lumen_gl::glow::COLOR_BUFFER_BIT) };
//!     }
//! }
//!
//! fn main() -> Result<(), lumen_app::ShellError> {
//!     let mut shell = App::new().with_title("Clear").with_size(640, 480).build()?;
//!     shell.run(&mut Clear);
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod platform;
pub mod shell;
pub mod traits;

#[cfg(not(any(target_arch = "wasm32", target_os = "android", target_os = "ios")))]
mod glutin_platform;

#[cfg(test)]
mod headless;

pub use builder::{App, AppConfig};
pub use context::AppContext;
pub use error::{Result, ShellError};
#[cfg(not(any(target_arch = "wasm32", target_os = "android", target_os = "ios")))]
pub use glutin_platform::GlutinPlatform;
pub use platform::{Platform, ShellEvent};
pub use shell::{Shell, ShellPhase};
pub use traits::{close_on_quit_key, LumenApp, QUIT_KEY};

// Users can write `use lumen_app::{KeyCode, Time};` without depending on
// lumen_core directly.
pub use lumen_core::{Action, InputState, KeyCode, KeyInput, Modifiers, Time, TimeClock};
