//! The windowing side of a shell: one window, its GL context, and the event
//! source.  [`GlutinPlatform`](crate::GlutinPlatform) is the desktop
//! implementation.

use lumen_core::KeyInput;
use lumen_gl::GlDriver;

use crate::error::Result;

/// A window-system notification, in the order the platform delivered it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShellEvent {
    Key(KeyInput),
    CursorPos { x: f64, y: f64 },
    FramebufferSize { width: u32, height: u32 },
    /// The user or the window manager asked the window to close.
    CloseRequested,
}

pub trait Platform {
    type Gl: GlDriver;

    /// Driver for the context this platform made current.
    fn gl(&self) -> &Self::Gl;

    /// Window system in use: `Win32`, `Cocoa`, `Wayland`, `X11` or `None`.
    fn name(&self) -> &str;

    /// Current framebuffer size in pixels.
    fn framebuffer_size(&self) -> (u32, u32);

    /// Block presentation on the display refresh when `vsync` is true.
    fn set_swap_interval(&mut self, vsync: bool) -> Result<()>;

    fn swap_buffers(&mut self) -> Result<()>;

    /// Collect pending events without blocking, appending them to `events`.
    fn poll_events(&mut self, events: &mut Vec<ShellEvent>);
}
