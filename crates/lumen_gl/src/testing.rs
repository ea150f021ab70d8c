//! In-memory [`GlDriver`] for tests.
//!
//! Mimics the observable behaviour of a GL driver closely enough to test the
//! builder and the shell without a context:
//! - a stage compiles when its source declares `void main(`
//! - a program links when it has both a vertex and a fragment stage attached
//! - successful compiles and links leave an empty info log

use std::cell::RefCell;
use std::collections::HashMap;

use crate::driver::{DriverInfo, GlDriver};
use crate::shader::StageKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FakeShader(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FakeProgram(pub u32);

#[derive(Debug)]
struct ShaderObject {
    kind: StageKind,
    source: String,
    compiled: bool,
    log: String,
}

#[derive(Debug, Default)]
struct ProgramObject {
    attached: Vec<StageKind>,
    linked: bool,
    log: String,
}

#[derive(Debug, Default)]
struct DriverState {
    next_name: u32,
    shaders: HashMap<u32, ShaderObject>,
    programs: HashMap<u32, ProgramObject>,
    shaders_created: usize,
    link_calls: usize,
    viewport: Option<(i32, i32, i32, i32)>,
}

impl DriverState {
    fn name(&mut self) -> u32 {
        self.next_name += 1;
        self.next_name
    }
}

#[derive(Debug, Default)]
pub struct RecordingDriver {
    state: RefCell<DriverState>,
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shader objects created and not yet deleted.
    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    /// Program objects created and not yet deleted.
    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub fn shaders_created(&self) -> usize {
        self.state.borrow().shaders_created
    }

    pub fn link_calls(&self) -> usize {
        self.state.borrow().link_calls
    }

    /// Last viewport set, as `(x, y, width, height)`.
    pub fn current_viewport(&self) -> Option<(i32, i32, i32, i32)> {
        self.state.borrow().viewport
    }
}

impl GlDriver for RecordingDriver {
    type Shader = FakeShader;
    type Program = FakeProgram;

    fn create_shader(&self, kind: StageKind) -> Result<FakeShader, String> {
        let mut state = self.state.borrow_mut();
        let name = state.name();
        state.shaders.insert(
            name,
            ShaderObject {
                kind,
                source: String::new(),
                compiled: false,
                log: String::new(),
            },
        );
        state.shaders_created += 1;
        Ok(FakeShader(name))
    }

    fn shader_source(&self, shader: FakeShader, source: &str) {
        if let Some(object) = self.state.borrow_mut().shaders.get_mut(&shader.0) {
            object.source = source.to_string();
        }
    }

    fn compile_shader(&self, shader: FakeShader) {
        if let Some(object) = self.state.borrow_mut().shaders.get_mut(&shader.0) {
            object.compiled = object.source.contains("void main(");
            object.log = if object.compiled {
                String::new()
            } else {
                "0:0(0): error: no function with name 'main'\n".to_string()
            };
        }
    }

    fn shader_compile_status(&self, shader: FakeShader) -> bool {
        self.state
            .borrow()
            .shaders
            .get(&shader.0)
            .is_some_and(|object| object.compiled)
    }

    fn raw_shader_info_log(&self, shader: FakeShader) -> String {
        self.state
            .borrow()
            .shaders
            .get(&shader.0)
            .map(|object| object.log.clone())
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: FakeShader) {
        self.state.borrow_mut().shaders.remove(&shader.0);
    }

    fn create_program(&self) -> Result<FakeProgram, String> {
        let mut state = self.state.borrow_mut();
        let name = state.name();
        state.programs.insert(name, ProgramObject::default());
        Ok(FakeProgram(name))
    }

    fn attach_shader(&self, program: FakeProgram, shader: FakeShader) {
        let mut state = self.state.borrow_mut();
        let attached = state
            .shaders
            .get(&shader.0)
            .filter(|object| object.compiled)
            .map(|object| object.kind);
        if let (Some(kind), Some(object)) = (attached, state.programs.get_mut(&program.0)) {
            object.attached.push(kind);
        }
    }

    fn link_program(&self, program: FakeProgram) {
        let mut state = self.state.borrow_mut();
        state.link_calls += 1;
        if let Some(object) = state.programs.get_mut(&program.0) {
            object.linked = object.attached.contains(&StageKind::Vertex)
                && object.attached.contains(&StageKind::Fragment);
            object.log = if object.linked {
                String::new()
            } else {
                "error: program lacks a vertex or fragment stage\n".to_string()
            };
        }
    }

    fn program_link_status(&self, program: FakeProgram) -> bool {
        self.state
            .borrow()
            .programs
            .get(&program.0)
            .is_some_and(|object| object.linked)
    }

    fn raw_program_info_log(&self, program: FakeProgram) -> String {
        self.state
            .borrow()
            .programs
            .get(&program.0)
            .map(|object| object.log.clone())
            .unwrap_or_default()
    }

    fn delete_program(&self, program: FakeProgram) {
        self.state.borrow_mut().programs.remove(&program.0);
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.state.borrow_mut().viewport = Some((x, y, width, height));
    }

    fn driver_info(&self) -> DriverInfo {
        DriverInfo {
            version: "4.3 (recording)".to_string(),
            renderer: "lumen recording driver".to_string(),
            vendor: "lumen".to_string(),
            shading_language: "4.30".to_string(),
        }
    }
}
