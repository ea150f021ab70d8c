//! Shader program builder.
//!
//! Stages are read from files, compiled one by one and linked into a
//! [`Program`].  A [`Stage`] only exists for a stage that compiled, and
//! linking consumes the stages: they are deleted whether the link succeeds or
//! not, so no intermediate shader object outlives the call that built it.
//!
//! ```rust,ignore
//! let sources = ProgramSources::new("cube.vert", "cube.frag");
//! let program = lumen_gl::create_shader_program(gl, &sources)?;
//! ```

use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use crate::driver::GlDriver;
use crate::error::{Result, ShaderError};

/// Pipeline stage, declared in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StageKind {
    Vertex,
    TessControl,
    TessEvaluation,
    Geometry,
    Fragment,
}

impl StageKind {
    pub const ALL: [StageKind; 5] = [
        StageKind::Vertex,
        StageKind::TessControl,
        StageKind::TessEvaluation,
        StageKind::Geometry,
        StageKind::Fragment,
    ];

    pub fn gl_enum(self) -> u32 {
        match self {
            StageKind::Vertex => glow::VERTEX_SHADER,
            StageKind::TessControl => glow::TESS_CONTROL_SHADER,
            StageKind::TessEvaluation => glow::TESS_EVALUATION_SHADER,
            StageKind::Geometry => glow::GEOMETRY_SHADER,
            StageKind::Fragment => glow::FRAGMENT_SHADER,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            StageKind::Vertex => "vertex",
            StageKind::TessControl => "tessellation control",
            StageKind::TessEvaluation => "tessellation evaluation",
            StageKind::Geometry => "geometry",
            StageKind::Fragment => "fragment",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A successfully compiled shader stage.
///
/// Not `Clone`: the handle is single-use and is released by
/// [`link_program`] or [`Stage::delete`].
#[derive(Debug)]
#[must_use = "a compiled stage must be linked or deleted"]
pub struct Stage<S> {
    handle: S,
    kind: StageKind,
}

impl<S: Copy> Stage<S> {
    pub fn kind(&self) -> StageKind {
        self.kind
    }

    pub fn handle(&self) -> S {
        self.handle
    }

    /// Release the stage without linking it.
    pub fn delete<G: GlDriver<Shader = S>>(self, gl: &G) {
        gl.delete_shader(self.handle);
    }
}

/// A linked program, ready to bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Program<P> {
    handle: P,
}

impl<P: Copy> Program<P> {
    /// The driver's program name, for `use_program` and uniform lookups.
    pub fn raw(&self) -> P {
        self.handle
    }

    pub fn delete<G: GlDriver<Program = P>>(self, gl: &G) {
        gl.delete_program(self.handle);
    }
}

/// Source files for one program.
///
/// Vertex and fragment stages are mandatory; geometry and the tessellation
/// pair are optional, giving the four usual stage layouts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramSources {
    pub vertex: PathBuf,
    pub tessellation: Option<(PathBuf, PathBuf)>,
    pub geometry: Option<PathBuf>,
    pub fragment: PathBuf,
}

impl ProgramSources {
    pub fn new(vertex: impl Into<PathBuf>, fragment: impl Into<PathBuf>) -> Self {
        Self {
            vertex: vertex.into(),
            tessellation: None,
            geometry: None,
            fragment: fragment.into(),
        }
    }

    pub fn with_geometry(mut self, geometry: impl Into<PathBuf>) -> Self {
        self.geometry = Some(geometry.into());
        self
    }

    pub fn with_tessellation(
        mut self,
        control: impl Into<PathBuf>,
        evaluation: impl Into<PathBuf>,
    ) -> Self {
        self.tessellation = Some((control.into(), evaluation.into()));
        self
    }

    /// Every supplied stage, in pipeline order.
    pub fn stages(&self) -> Vec<(StageKind, &Path)> {
        let mut stages = vec![(StageKind::Vertex, self.vertex.as_path())];
        if let Some((control, evaluation)) = &self.tessellation {
            stages.push((StageKind::TessControl, control.as_path()));
            stages.push((StageKind::TessEvaluation, evaluation.as_path()));
        }
        if let Some(geometry) = &self.geometry {
            stages.push((StageKind::Geometry, geometry.as_path()));
        }
        stages.push((StageKind::Fragment, self.fragment.as_path()));
        stages
    }
}

/// Read `path` and compile it as a `kind` stage.
///
/// Unreadable files give [`ShaderError::Io`]; driver compile failures give
/// [`ShaderError::Compile`] carrying the info log.  Either way no shader
/// object is left behind.
pub fn compile_stage<G: GlDriver>(
    gl: &G,
    path: impl AsRef<Path>,
    kind: StageKind,
) -> Result<Stage<G::Shader>> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| {
        log::error!(target: "lumen::io", "{}: {}", path.display(), source);
        ShaderError::Io {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let shader = gl.create_shader(kind).map_err(|err| {
        log::error!(target: "lumen::gl", "driver: {} ({kind}): {}", path.display(), one_line(&err));
        ShaderError::Driver(err)
    })?;
    gl.shader_source(shader, &source);
    gl.compile_shader(shader);

    if !gl.shader_compile_status(shader) {
        let log = gl.shader_info_log(shader);
        gl.delete_shader(shader);
        log::error!(
            target: "lumen::shader",
            "compiler: {} ({kind}): {}",
            path.display(),
            one_line(&log)
        );
        return Err(ShaderError::Compile {
            kind,
            path: path.to_path_buf(),
            log,
        });
    }

    log::debug!(target: "lumen::shader", "compiled {kind} stage {}", path.display());
    Ok(Stage {
        handle: shader,
        kind,
    })
}

/// Attach `stages` to a new program and link it.
///
/// The stages are deleted after the link attempt regardless of its outcome.
pub fn link_program<G: GlDriver>(
    gl: &G,
    stages: Vec<Stage<G::Shader>>,
) -> Result<Program<G::Program>> {
    let program = match gl.create_program() {
        Ok(program) => program,
        Err(err) => {
            stages.into_iter().for_each(|stage| stage.delete(gl));
            log::error!(target: "lumen::gl", "driver: {}", one_line(&err));
            return Err(ShaderError::Driver(err));
        }
    };

    for stage in &stages {
        gl.attach_shader(program, stage.handle);
    }
    gl.link_program(program);
    for stage in stages {
        stage.delete(gl);
    }

    if !gl.program_link_status(program) {
        let log = gl.program_info_log(program);
        gl.delete_program(program);
        log::error!(target: "lumen::shader", "linker: {}", one_line(&log));
        return Err(ShaderError::Link { log });
    }

    Ok(Program { handle: program })
}

/// Compile every stage of `sources` in pipeline order and link them.
///
/// All stages are compiled even after a failure so that every stage's
/// diagnostics get reported.  If any stage failed, the ones that compiled are
/// deleted and [`ShaderError::Stages`] is returned without linking.
pub fn create_shader_program<G: GlDriver>(
    gl: &G,
    sources: &ProgramSources,
) -> Result<Program<G::Program>> {
    let requested = sources.stages();
    let total = requested.len();

    let mut compiled = Vec::with_capacity(total);
    let mut failed = Vec::new();
    for (kind, path) in requested {
        match compile_stage(gl, path, kind) {
            Ok(stage) => compiled.push(stage),
            Err(err) => failed.push(err),
        }
    }

    if !failed.is_empty() {
        compiled.into_iter().for_each(|stage| stage.delete(gl));
        return Err(ShaderError::Stages { failed, total });
    }

    let program = link_program(gl, compiled)?;
    log::info!(
        target: "lumen::shader",
        "linked {total}-stage program from {}",
        sources.vertex.display()
    );
    Ok(program)
}

pub(crate) fn one_line(log: &str) -> String {
    log.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" | ")
}
