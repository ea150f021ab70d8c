use lumen_core::{InputState, Time};
use lumen_gl::GlDriver;

/// Shell state that hooks are allowed to change.
#[derive(Debug)]
pub(crate) struct FrameState {
    pub(crate) size: (u32, u32),
    pub(crate) close_requested: bool,
    /// applied by the shell as soon as the hook returns
    pub(crate) vsync_request: Option<bool>,
}

impl FrameState {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            close_requested: false,
            vsync_request: None,
        }
    }
}

/// Context passed to every [`LumenApp`](crate::LumenApp) hook.
///
/// ```rust,ignore
/// fn render(&mut self, ctx: &mut AppContext) {
///     let angle = ctx.time.elapsed as f32;
///     let aspect = ctx.aspect();
///     // draw with ctx.gl ...
/// }
/// ```
pub struct AppContext<'a, G: GlDriver = glow::Context> {
    /// The current GL context.
    pub gl: &'a G,

    /// Timing for this frame; `elapsed` counts from shell construction.
    pub time: Time,

    /// Keys held and cursor position, as of the event being dispatched.
    pub input: &'a InputState,

    pub(crate) state: &'a mut FrameState,
}

impl<'a, G: GlDriver> AppContext<'a, G> {
    #[inline]
    pub fn width(&self) -> u32 {
        self.state.size.0
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.state.size.1
    }

    /// Width / height. Returns 1.0 if height is zero.
    #[inline]
    pub fn aspect(&self) -> f32 {
        let (w, h) = self.state.size;
        if h == 0 {
            1.0
        } else {
            w as f32 / h as f32
        }
    }

    /// Set the close flag; the run loop stops before the next frame.
    pub fn request_close(&mut self) {
        self.state.close_requested = true;
    }

    pub fn close_requested(&self) -> bool {
        self.state.close_requested
    }

    /// Turn vsync on or off.  Takes effect when the current hook returns,
    /// before the next frame is presented.
    pub fn set_vsync(&mut self, enabled: bool) {
        self.state.vsync_request = Some(enabled);
    }

    /// Record the new framebuffer size and resize the viewport to cover it.
    ///
    /// This is what the default `on_framebuffer_size` does; overrides that
    /// want to keep the viewport in sync call it themselves.
    pub fn apply_framebuffer_size(&mut self, width: u32, height: u32) {
        self.state.size = (width, height);
        self.gl.viewport(0, 0, to_gl_int(width), to_gl_int(height));
    }
}

pub(crate) fn to_gl_int(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
