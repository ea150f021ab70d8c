//! Desktop platform: a winit window with a glutin OpenGL context, loaded
//! through glow.
//!
//! The event loop is pumped by hand (`pump_app_events` with a zero timeout)
//! so the shell keeps control of the frame loop: render, swap, then poll.

use std::ffi::CStr;
use std::num::NonZeroU32;
use std::time::Duration;

use glutin::config::{Config, ConfigTemplateBuilder, GlConfig};
use glutin::context::{ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::prelude::*;
use glutin::surface::{Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow};
use lumen_core::{Action, KeyInput, Modifiers};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::platform::scancode::PhysicalKeyExtScancode;
use winit::raw_window_handle::{HasDisplayHandle, HasWindowHandle, RawDisplayHandle};
use winit::window::{Window, WindowId};

use crate::builder::AppConfig;
use crate::error::{Result, ShellError};
use crate::platform::{Platform, ShellEvent};

/// Entry points the shell and the builder cannot work without.
const REQUIRED_SYMBOLS: [&CStr; 4] = [
    c"glGetString",
    c"glViewport",
    c"glCreateShader",
    c"glCreateProgram",
];

pub struct GlutinPlatform {
    // Field order is drop order: the GL function table goes first, the
    // event loop last.
    gl: glow::Context,
    context: PossiblyCurrentContext,
    surface: Surface<WindowSurface>,
    window: Window,
    collector: EventCollector,
    event_loop: EventLoop<()>,
    name: &'static str,
}

impl GlutinPlatform {
    /// Open the window described by `config` and make its context current on
    /// the calling thread.
    ///
    /// Anything acquired before a failing step is dropped before the error
    /// is returned.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let event_loop = EventLoop::new().map_err(|e| ShellError::Init(e.to_string()))?;
        let name = platform_name(&event_loop);

        let attributes = Window::default_attributes()
            .with_title(&config.title)
            .with_resizable(config.resizable)
            .with_inner_size(PhysicalSize::new(config.width, config.height));

        // depth buffer for the 3-D demos
        let template = ConfigTemplateBuilder::new().with_depth_size(24);
        let (window, gl_config) = DisplayBuilder::new()
            .with_window_attributes(Some(attributes))
            .build(&event_loop, template, pick_config)
            .map_err(|e| ShellError::WindowCreation(e.to_string()))?;
        let window = window.ok_or_else(|| {
            ShellError::WindowCreation("no window was created for the GL config".to_string())
        })?;

        let raw_window_handle = window
            .window_handle()
            .map_err(|e| ShellError::WindowCreation(e.to_string()))?
            .as_raw();

        let [major, minor] = config.gl_version;
        let profile = if config.core_profile {
            GlProfile::Core
        } else {
            GlProfile::Compatibility
        };
        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(major, minor))))
            .with_profile(profile)
            .build(Some(raw_window_handle));

        let display = gl_config.display();
        // SAFETY: the raw window handle belongs to `window`, which is stored
        // next to the context and dropped after it.
        let not_current = unsafe { display.create_context(&gl_config, &context_attributes) }
            .map_err(|e| {
                ShellError::WindowCreation(format!(
                    "OpenGL {major}.{minor} {profile:?} context: {e}"
                ))
            })?;

        let surface_attributes = window
            .build_surface_attributes(SurfaceAttributesBuilder::new())
            .map_err(|e| ShellError::WindowCreation(e.to_string()))?;
        // SAFETY: same as above, the surface never outlives `window`.
        let surface = unsafe { display.create_window_surface(&gl_config, &surface_attributes) }
            .map_err(|e| ShellError::WindowCreation(e.to_string()))?;

        let context = not_current
            .make_current(&surface)
            .map_err(|e| ShellError::WindowCreation(e.to_string()))?;

        for symbol in REQUIRED_SYMBOLS {
            if display.get_proc_address(symbol).is_null() {
                return Err(ShellError::GraphicsBinding(format!(
                    "could not resolve {}",
                    symbol.to_string_lossy()
                )));
            }
        }

        // SAFETY: the context is current on this thread and the loader
        // resolves symbols from the display that created it.
        let gl = unsafe {
            glow::Context::from_loader_function_cstr(|symbol| display.get_proc_address(symbol).cast())
        };

        Ok(Self {
            gl,
            context,
            surface,
            window,
            collector: EventCollector::default(),
            event_loop,
            name,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }
}

impl Platform for GlutinPlatform {
    type Gl = glow::Context;

    fn gl(&self) -> &glow::Context {
        &self.gl
    }

    fn name(&self) -> &str {
        self.name
    }

    fn framebuffer_size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    fn set_swap_interval(&mut self, vsync: bool) -> Result<()> {
        let interval = if vsync {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };
        self.surface
            .set_swap_interval(&self.context, interval)
            .map_err(|e| ShellError::Surface(e.to_string()))
    }

    fn swap_buffers(&mut self) -> Result<()> {
        self.surface
            .swap_buffers(&self.context)
            .map_err(|e| ShellError::Surface(e.to_string()))
    }

    fn poll_events(&mut self, events: &mut Vec<ShellEvent>) {
        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.collector);

        for event in self.collector.events.drain(..) {
            if let ShellEvent::FramebufferSize { width, height } = event {
                // EGL surfaces (Wayland) don't follow the window on their own
                if let (Some(w), Some(h)) = (NonZeroU32::new(width), NonZeroU32::new(height)) {
                    self.surface.resize(&self.context, w, h);
                }
            }
            events.push(event);
        }

        if let PumpStatus::Exit(code) = status {
            log::info!(target: "lumen::window", "event loop exited with code {code}");
            events.push(ShellEvent::CloseRequested);
        }
    }
}

/// Translates winit window events into [`ShellEvent`]s while the loop is
/// being pumped.
#[derive(Default)]
struct EventCollector {
    events: Vec<ShellEvent>,
    modifiers: Modifiers,
}

impl ApplicationHandler for EventCollector {
    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {}

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.events.push(ShellEvent::CloseRequested),
            WindowEvent::Resized(size) => self.events.push(ShellEvent::FramebufferSize {
                width: size.width,
                height: size.height,
            }),
            WindowEvent::CursorMoved { position, .. } => self.events.push(ShellEvent::CursorPos {
                x: position.x,
                y: position.y,
            }),
            WindowEvent::ModifiersChanged(modifiers) => self.modifiers = modifiers.state(),
            WindowEvent::KeyboardInput { event, .. } => match key_input(&event, self.modifiers) {
                Some(input) => self.events.push(ShellEvent::Key(input)),
                None => log::trace!(target: "lumen::window", "unidentified key {:?}", event.physical_key),
            },
            _ => {}
        }
    }
}

fn key_input(event: &KeyEvent, modifiers: Modifiers) -> Option<KeyInput> {
    let PhysicalKey::Code(key) = event.physical_key else {
        return None;
    };
    let action = match (event.state, event.repeat) {
        (ElementState::Pressed, false) => Action::Press,
        (ElementState::Pressed, true) => Action::Repeat,
        (ElementState::Released, _) => Action::Release,
    };
    Some(KeyInput {
        key,
        scancode: event.physical_key.to_scancode().unwrap_or(0),
        action,
        modifiers,
    })
}

/// Prefer multisampled configs.
fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    configs
        .max_by_key(|config| config.num_samples())
        // glutin's `find_configs` returns `ErrorKind::NotFound` instead of an
        // empty iterator, which `DisplayBuilder::build` maps to WindowCreation
        .expect("glutin never hands the picker an empty config list")
}

fn platform_name(event_loop: &EventLoop<()>) -> &'static str {
    match event_loop.display_handle().map(|handle| handle.as_raw()) {
        Ok(RawDisplayHandle::Windows(_)) => "Win32",
        Ok(RawDisplayHandle::AppKit(_)) => "Cocoa",
        Ok(RawDisplayHandle::Wayland(_)) => "Wayland",
        Ok(RawDisplayHandle::Xlib(_) | RawDisplayHandle::Xcb(_)) => "X11",
        _ => "None",
    }
}
