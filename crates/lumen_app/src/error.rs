use thiserror::Error;

/// Errors raised while building or driving a [`Shell`](crate::Shell).
///
/// `Init`, `WindowCreation` and `GraphicsBinding` only happen during
/// construction and leave no shell behind.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("failed to initialize the windowing subsystem: {0}")]
    Init(String),

    #[error("failed to create window: {0}")]
    WindowCreation(String),

    #[error("failed to initialize OpenGL bindings: {0}")]
    GraphicsBinding(String),

    /// Presenting or configuring the window surface failed.
    #[error("surface: {0}")]
    Surface(String),

    #[error("config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ShellError>;
