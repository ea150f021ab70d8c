use lumen_core::{InputState, Time, TimeClock};
use lumen_gl::GlDriver;

use crate::builder::AppConfig;
use crate::context::{to_gl_int, AppContext, FrameState};
use crate::error::Result;
use crate::platform::{Platform, ShellEvent};
use crate::traits::LumenApp;

/// Lifecycle of a shell.  Construction errors never produce a shell, so
/// callers only ever observe `Running` or `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellPhase {
    Constructing,
    Running,
    Closed,
}

/// Owns one window + GL context and drives an app's hooks until the close
/// flag is set.
pub struct Shell<P: Platform> {
    platform: P,
    state: FrameState,
    input: InputState,
    vsync: bool,
    clock: TimeClock,
    phase: ShellPhase,
    /// reused between polls
    events: Vec<ShellEvent>,
}

#[cfg(not(any(target_arch = "wasm32", target_os = "android", target_os = "ios")))]
impl Shell<crate::GlutinPlatform> {
    /// Open a window as described by `config`, with its context current on
    /// the calling thread.
    pub fn new(config: AppConfig) -> Result<Self> {
        // checked before any window is opened
        config.validate()?;
        let platform = crate::GlutinPlatform::new(&config)?;
        Self::with_platform(&config, platform)
    }
}

impl<P: Platform> Shell<P> {
    /// Build a shell over an already-created platform.
    ///
    /// Fails with [`ShellError::WindowCreation`](crate::ShellError) when
    /// `config` does not describe a usable window.
    pub fn with_platform(config: &AppConfig, platform: P) -> Result<Self> {
        config.validate()?;
        log::info!(target: "lumen::window", "platform: {}", platform.name());
        log::info!(target: "lumen::gl", "{}", platform.gl().driver_info());

        let (fb_width, fb_height) = platform.framebuffer_size();
        platform
            .gl()
            .viewport(0, 0, to_gl_int(fb_width), to_gl_int(fb_height));

        let mut shell = Self {
            platform,
            state: FrameState::new(config.width, config.height),
            input: InputState::new(),
            vsync: false,
            clock: TimeClock::new(),
            phase: ShellPhase::Constructing,
            events: Vec::new(),
        };
        shell.set_vsync(config.vsync);
        shell.phase = ShellPhase::Running;
        log::info!(
            target: "lumen::window",
            "window \"{}\" {}x{} (framebuffer {fb_width}x{fb_height})",
            config.title,
            config.width,
            config.height
        );
        Ok(shell)
    }

    /// Run frames until the close flag is set.
    ///
    /// Each iteration renders, presents, then polls and dispatches events.
    /// Does nothing on a closed shell.
    pub fn run<A: LumenApp<P::Gl>>(&mut self, app: &mut A) {
        if self.phase == ShellPhase::Closed {
            log::warn!(target: "lumen::window", "run() called on a closed shell");
            return;
        }
        while !self.state.close_requested {
            self.frame(app);
        }
        self.phase = ShellPhase::Closed;
        log::info!(
            target: "lumen::window",
            "closed after {} frame(s), {:.2}s",
            self.clock.peek().frame_count,
            self.clock.elapsed().as_secs_f64()
        );
    }

    /// One loop iteration: render, present, poll and dispatch.
    pub fn frame<A: LumenApp<P::Gl>>(&mut self, app: &mut A) {
        let time = self.clock.tick();
        self.with_context(time, |ctx| app.render(ctx));

        // a failed present is not fatal; the next frame tries again
        if let Err(err) = self.platform.swap_buffers() {
            log::error!(target: "lumen::window", "{err}");
        }

        let mut events = std::mem::take(&mut self.events);
        self.platform.poll_events(&mut events);
        for event in events.drain(..) {
            self.dispatch(app, event);
        }
        self.events = events;
    }

    /// Route one event to the matching hook.
    pub fn dispatch<A: LumenApp<P::Gl>>(&mut self, app: &mut A, event: ShellEvent) {
        let time = self.clock.peek();
        match event {
            ShellEvent::Key(input) => {
                self.input.update_key(&input);
                self.with_context(time, |ctx| app.on_key(ctx, input));
            }
            ShellEvent::CursorPos { x, y } => {
                self.input.set_cursor_position(x, y);
                self.with_context(time, |ctx| app.on_cursor_pos(ctx, x, y));
            }
            ShellEvent::FramebufferSize { width, height } => {
                self.with_context(time, |ctx| app.on_framebuffer_size(ctx, width, height));
            }
            ShellEvent::CloseRequested => self.state.close_requested = true,
        }
    }

    fn with_context<R>(&mut self, time: Time, hook: impl FnOnce(&mut AppContext<'_, P::Gl>) -> R) -> R {
        let mut ctx = AppContext {
            gl: self.platform.gl(),
            time,
            input: &self.input,
            state: &mut self.state,
        };
        let result = hook(&mut ctx);
        if let Some(enabled) = self.state.vsync_request.take() {
            self.set_vsync(enabled);
        }
        result
    }

    /// Turn vsync on or off; applied to the platform right away.  If the
    /// platform refuses, the previous setting stays in effect.
    pub fn set_vsync(&mut self, enabled: bool) {
        match self.platform.set_swap_interval(enabled) {
            Ok(()) => {
                self.vsync = enabled;
                log::debug!(target: "lumen::window", "vsync {}", if enabled { "on" } else { "off" });
            }
            Err(err) => log::warn!(target: "lumen::window", "could not change vsync: {err}"),
        }
    }

    pub fn vsync(&self) -> bool {
        self.vsync
    }

    /// Most recent framebuffer width applied by `on_framebuffer_size`, or
    /// the construction width.
    pub fn width(&self) -> u32 {
        self.state.size.0
    }

    pub fn height(&self) -> u32 {
        self.state.size.1
    }

    pub fn should_close(&self) -> bool {
        self.state.close_requested
    }

    pub fn set_should_close(&mut self, close: bool) {
        self.state.close_requested = close;
    }

    pub fn phase(&self) -> ShellPhase {
        self.phase
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Time since construction.
    pub fn time(&self) -> Time {
        self.clock.peek()
    }

    pub fn gl(&self) -> &P::Gl {
        self.platform.gl()
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use lumen_core::{Action, KeyCode, KeyInput};
    use lumen_gl::testing::RecordingDriver;
    use lumen_gl::{create_shader_program, GlDriver, ProgramSources, NO_INFO_LOG};

    use super::*;
    use crate::headless::HeadlessPlatform;
    use crate::traits::close_on_quit_key;

    type Ctx<'a> = AppContext<'a, RecordingDriver>;

    fn shell(width: u32, height: u32, title: &str) -> Shell<HeadlessPlatform> {
        let config = AppConfig {
            title: title.to_string(),
            width,
            height,
            ..AppConfig::default()
        };
        Shell::with_platform(&config, HeadlessPlatform::new(width, height)).unwrap()
    }

    fn key(key: KeyCode, action: Action) -> ShellEvent {
        ShellEvent::Key(KeyInput::new(key, action))
    }

    /// Uses every default hook.
    struct Defaults;
    impl LumenApp<RecordingDriver> for Defaults {}

    #[derive(Default)]
    struct Recorder {
        frames: Vec<Time>,
        cursor: Vec<(f64, f64)>,
        keys: Vec<KeyInput>,
    }

    impl LumenApp<RecordingDriver> for Recorder {
        fn render(&mut self, ctx: &mut Ctx) {
            self.frames.push(ctx.time);
        }

        fn on_key(&mut self, _ctx: &mut Ctx, input: KeyInput) {
            self.keys.push(input);
        }

        fn on_cursor_pos(&mut self, _ctx: &mut Ctx, x: f64, y: f64) {
            self.cursor.push((x, y));
        }
    }

    #[test]
    fn construction_reports_requested_size() {
        let shell = shell(640, 480, "t");
        assert_eq!((shell.width(), shell.height()), (640, 480));
        assert_eq!(shell.phase(), ShellPhase::Running);
        assert!(shell.vsync());
        assert_eq!(shell.platform().swap_interval(), Some(true));
        assert_eq!(shell.gl().current_viewport(), Some((0, 0, 640, 480)));
    }

    #[test]
    fn escape_press_sets_close_flag() {
        let mut shell = shell(640, 480, "t");
        shell.dispatch(&mut Defaults, key(KeyCode::Escape, Action::Press));
        assert!(shell.should_close());
    }

    #[test]
    fn escape_release_does_not_close() {
        let mut shell = shell(640, 480, "t");
        shell.dispatch(&mut Defaults, key(KeyCode::Escape, Action::Release));
        shell.dispatch(&mut Defaults, key(KeyCode::Escape, Action::Repeat));
        shell.dispatch(&mut Defaults, key(KeyCode::KeyQ, Action::Press));
        assert!(!shell.should_close());
    }

    #[test]
    fn overridden_on_key_replaces_quit_handling() {
        let mut shell = shell(640, 480, "t");
        let mut app = Recorder::default();
        shell.dispatch(&mut app, key(KeyCode::Escape, Action::Press));
        assert!(!shell.should_close());
        assert_eq!(app.keys.len(), 1);
    }

    #[test]
    fn override_can_reuse_quit_handling() {
        struct QuitOnQ;
        impl LumenApp<RecordingDriver> for QuitOnQ {
            fn on_key(&mut self, ctx: &mut Ctx, input: KeyInput) {
                if input.pressed(KeyCode::KeyQ) {
                    ctx.request_close();
                }
                close_on_quit_key(ctx, &input);
            }
        }
        let mut shell = shell(640, 480, "t");
        shell.dispatch(&mut QuitOnQ, key(KeyCode::KeyQ, Action::Press));
        assert!(shell.should_close());

        let mut shell = self::shell(320, 240, "esc");
        shell.dispatch(&mut QuitOnQ, key(KeyCode::Escape, Action::Press));
        assert!(shell.should_close());
    }

    #[test]
    fn framebuffer_size_updates_size_and_viewport() {
        let mut shell = shell(640, 480, "t");
        shell.dispatch(
            &mut Defaults,
            ShellEvent::FramebufferSize {
                width: 1280,
                height: 720,
            },
        );
        assert_eq!((shell.width(), shell.height()), (1280, 720));
        assert_eq!(shell.gl().current_viewport(), Some((0, 0, 1280, 720)));
    }

    #[test]
    fn cursor_event_leaves_size_alone() {
        let mut shell = shell(640, 480, "t");
        shell.dispatch(&mut Defaults, ShellEvent::CursorPos { x: 320.0, y: 240.0 });
        assert_eq!((shell.width(), shell.height()), (640, 480));
        assert!(!shell.should_close());
        assert_eq!(shell.input().cursor_position(), (320.0, 240.0));
    }

    #[test]
    fn run_renders_once_per_frame_until_escape() {
        let mut platform = HeadlessPlatform::new(640, 480);
        platform.queue(vec![ShellEvent::CursorPos { x: 1.0, y: 2.0 }]);
        platform.queue(vec![]);
        platform.queue(vec![
            ShellEvent::Key(KeyInput::new(KeyCode::Escape, Action::Press)),
            ShellEvent::CursorPos { x: 3.0, y: 4.0 },
        ]);
        let mut shell = Shell::with_platform(&AppConfig::default(), platform).unwrap();

        struct QuitsLikeDefault(Recorder);
        impl LumenApp<RecordingDriver> for QuitsLikeDefault {
            fn render(&mut self, ctx: &mut Ctx) {
                self.0.render(ctx);
            }
            fn on_cursor_pos(&mut self, ctx: &mut Ctx, x: f64, y: f64) {
                self.0.on_cursor_pos(ctx, x, y);
            }
        }

        let mut app = QuitsLikeDefault(Recorder::default());
        shell.run(&mut app);

        assert_eq!(app.0.frames.len(), 3);
        assert_eq!(shell.platform().swaps(), 3);
        assert_eq!(shell.platform().polls(), 3);
        // events of the closing poll are still dispatched
        assert_eq!(app.0.cursor, vec![(1.0, 2.0), (3.0, 4.0)]);
        assert_eq!(shell.phase(), ShellPhase::Closed);

        let frames: Vec<u64> = app.0.frames.iter().map(|t| t.frame_count).collect();
        assert_eq!(frames, vec![0, 1, 2]);
        assert!(app.0.frames.windows(2).all(|w| w[0].elapsed <= w[1].elapsed));
    }

    #[test]
    fn window_close_request_ends_run() {
        let mut platform = HeadlessPlatform::new(640, 480);
        platform.queue(vec![ShellEvent::CloseRequested]);
        let mut shell = Shell::with_platform(&AppConfig::default(), platform).unwrap();
        let mut app = Recorder::default();
        shell.run(&mut app);
        assert_eq!(app.frames.len(), 1);
        assert_eq!(shell.phase(), ShellPhase::Closed);

        // a closed shell stays closed
        shell.run(&mut app);
        assert_eq!(app.frames.len(), 1);
    }

    #[test]
    fn close_flag_is_checked_before_rendering() {
        let mut shell = shell(640, 480, "t");
        shell.set_should_close(true);
        let mut app = Recorder::default();
        shell.run(&mut app);
        assert!(app.frames.is_empty());
        assert_eq!(shell.platform().swaps(), 0);
    }

    #[test]
    fn failed_swap_does_not_stop_the_loop() {
        let mut platform = HeadlessPlatform::new(640, 480);
        platform.fail_swaps(true);
        platform.queue(vec![]);
        platform.queue(vec![ShellEvent::CloseRequested]);
        let mut shell = Shell::with_platform(&AppConfig::default(), platform).unwrap();
        let mut app = Recorder::default();
        shell.run(&mut app);
        assert_eq!(app.frames.len(), 2);
    }

    #[test]
    fn vsync_toggles() {
        let mut shell = shell(640, 480, "t");
        shell.set_vsync(false);
        assert!(!shell.vsync());
        assert_eq!(shell.platform().swap_interval(), Some(false));
    }

    #[test]
    fn refused_vsync_change_keeps_previous_setting() {
        let mut shell = shell(640, 480, "t");
        shell.platform.fail_swap_interval(true);
        shell.set_vsync(false);
        assert!(shell.vsync());
        assert_eq!(shell.platform().swap_interval(), Some(true));
    }

    #[test]
    fn vsync_off_when_platform_refuses_it_at_construction() {
        let mut platform = HeadlessPlatform::new(640, 480);
        platform.fail_swap_interval(true);
        let shell = Shell::with_platform(&AppConfig::default(), platform).unwrap();
        assert!(!shell.vsync());
        assert_eq!(shell.phase(), ShellPhase::Running);
    }

    #[test]
    fn unusable_config_is_rejected() {
        for config in [
            AppConfig { width: 0, ..AppConfig::default() },
            AppConfig { height: 0, ..AppConfig::default() },
            AppConfig { title: String::new(), ..AppConfig::default() },
        ] {
            let err = Shell::with_platform(&config, HeadlessPlatform::new(640, 480)).err();
            assert!(matches!(err, Some(crate::ShellError::WindowCreation(_))), "{config:?}");
        }
    }

    #[test]
    fn vsync_from_a_hook_applies_when_it_returns() {
        struct ToggleOnV;
        impl LumenApp<RecordingDriver> for ToggleOnV {
            fn on_key(&mut self, ctx: &mut Ctx, input: KeyInput) {
                if input.pressed(KeyCode::KeyV) {
                    ctx.set_vsync(false);
                }
            }
        }
        let mut shell = shell(640, 480, "t");
        shell.dispatch(&mut ToggleOnV, key(KeyCode::KeyV, Action::Press));
        assert!(!shell.vsync());
        assert_eq!(shell.platform().swap_interval(), Some(false));
    }

    #[test]
    fn resize_override_can_extend_default() {
        struct CountingResize(Cell<u32>);
        impl LumenApp<RecordingDriver> for CountingResize {
            fn on_framebuffer_size(&mut self, ctx: &mut Ctx, width: u32, height: u32) {
                self.0.set(self.0.get() + 1);
                ctx.apply_framebuffer_size(width, height);
            }
        }
        let mut shell = shell(640, 480, "t");
        let mut app = CountingResize(Cell::new(0));
        shell.dispatch(&mut app, ShellEvent::FramebufferSize { width: 10, height: 20 });
        assert_eq!(app.0.get(), 1);
        assert_eq!((shell.width(), shell.height()), (10, 20));
        assert_eq!(shell.gl().current_viewport(), Some((0, 0, 10, 20)));
    }

    #[test]
    fn hooks_see_input_state() {
        struct HeldKeys(Vec<bool>);
        impl LumenApp<RecordingDriver> for HeldKeys {
            fn render(&mut self, ctx: &mut Ctx) {
                self.0.push(ctx.input.is_key_pressed(KeyCode::KeyW));
            }
        }
        let mut platform = HeadlessPlatform::new(640, 480);
        platform.queue(vec![ShellEvent::Key(KeyInput::new(KeyCode::KeyW, Action::Press))]);
        platform.queue(vec![
            ShellEvent::Key(KeyInput::new(KeyCode::KeyW, Action::Release)),
        ]);
        platform.queue(vec![ShellEvent::CloseRequested]);
        let mut shell = Shell::with_platform(&AppConfig::default(), platform).unwrap();
        let mut app = HeldKeys(Vec::new());
        shell.run(&mut app);
        assert_eq!(app.0, vec![false, true, false]);
    }

    #[test]
    fn shell_and_shader_program_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let vert = dir.path().join("v.glsl");
        let frag = dir.path().join("f.glsl");
        std::fs::write(&vert, "#version 430 core\nvoid main() { gl_Position = vec4(0.0); }\n").unwrap();
        std::fs::write(&frag, "#version 430 core\nout vec4 c;\nvoid main() { c = vec4(1.0); }\n").unwrap();

        let shell = shell(640, 480, "t");
        let program = create_shader_program(shell.gl(), &ProgramSources::new(&vert, &frag)).unwrap();

        assert_eq!(shell.gl().program_info_log(program.raw()), NO_INFO_LOG);
        assert_eq!(shell.gl().live_shaders(), 0);
        assert_eq!(shell.gl().live_programs(), 1);
    }
}
