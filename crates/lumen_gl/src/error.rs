use std::{io, path::PathBuf};

use thiserror::Error;

use crate::shader::{one_line, StageKind};

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// `log` is the driver's info log as returned; the message flattens it
    /// to one line.
    #[error("compiler: {kind} stage {}: {}", path.display(), one_line(log))]
    Compile {
        kind: StageKind,
        path: PathBuf,
        log: String,
    },

    #[error("linker: {}", one_line(log))]
    Link { log: String },

    /// The driver refused to create a shader or program object.
    #[error("driver: {}", one_line(.0))]
    Driver(String),

    /// One or more stages of a program could not be built; the program was
    /// not linked.
    #[error("{} of {total} stage(s) failed: {}", failed.len(), summary(failed))]
    Stages {
        failed: Vec<ShaderError>,
        total: usize,
    },
}

fn summary(errors: &[ShaderError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, ShaderError>;
