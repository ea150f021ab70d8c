use lumen_core::{KeyCode, KeyInput};
use lumen_gl::GlDriver;

use crate::context::AppContext;

/// Key that closes the window under the default `on_key`.
pub const QUIT_KEY: KeyCode = KeyCode::Escape;

/// The hooks a shell drives.  Every method has a default, so an app only
/// overrides what it needs; overriding a hook replaces its default entirely.
///
/// `G` is the driver the shell's platform provides, `glow::Context` for
/// real windows.
///
/// ```rust,ignore
/// struct Triangle { program: Program<glow::Program>, vao: glow::VertexArray }
///
/// impl LumenApp for Triangle {
///     fn render(&mut self, ctx: &mut AppContext) {
///         unsafe {
///             ctx.gl.clear(glow::COLOR_BUFFER_BIT);
///             ctx.gl.use_program(Some(self.program.raw()));
///             ctx.gl.bind_vertex_array(Some(self.vao));
///             ctx.gl.draw_arrays(glow::TRIANGLES, 0, 3);
///         }
///     }
/// }
/// ```
#[allow(unused_variables)]
pub trait LumenApp<G: GlDriver = glow::Context> {
    /// Draw one frame.  Called exactly once per loop iteration, before the
    /// frame is presented.
    fn render(&mut self, ctx: &mut AppContext<'_, G>) {}

    /// A key was pressed, released or auto-repeated.
    ///
    /// The default closes the window when [`QUIT_KEY`] is pressed.  An
    /// override that still wants that behaviour calls [`close_on_quit_key`].
    fn on_key(&mut self, ctx: &mut AppContext<'_, G>, input: KeyInput) {
        close_on_quit_key(ctx, &input);
    }

    /// The framebuffer was resized, in pixels.
    ///
    /// The default stores the size and resizes the viewport through
    /// [`AppContext::apply_framebuffer_size`].
    fn on_framebuffer_size(&mut self, ctx: &mut AppContext<'_, G>, width: u32, height: u32) {
        ctx.apply_framebuffer_size(width, height);
    }

    /// The cursor moved, in window coordinates.
    fn on_cursor_pos(&mut self, ctx: &mut AppContext<'_, G>, x: f64, y: f64) {}
}

/// Set the close flag if `input` is a press of [`QUIT_KEY`].
pub fn close_on_quit_key<G: GlDriver>(ctx: &mut AppContext<'_, G>, input: &KeyInput) {
    if input.pressed(QUIT_KEY) {
        ctx.request_close();
    }
}
