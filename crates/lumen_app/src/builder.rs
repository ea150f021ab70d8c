use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, ShellError};

/// Window and context settings for a [`Shell`](crate::Shell).
///
/// Can be built in code through [`App`] or read from TOML; missing keys take
/// their default:
///
/// ```toml
/// title = "Cube"
/// width = 640
/// height = 480
/// vsync = true
/// gl_version = [4, 3]
/// core_profile = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    /// Requested context version, `[major, minor]`.
    pub gl_version: [u8; 2],
    /// Core profile when true, compatibility profile otherwise.
    pub core_profile: bool,
    pub resizable: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Lumen Application".to_string(),
            width: 640,
            height: 480,
            vsync: true,
            gl_version: [4, 3],
            core_profile: true,
            resizable: true,
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| ShellError::Config(e.message().to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ShellError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Reject settings no window can be created with.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ShellError::WindowCreation(format!(
                "invalid window size {}x{}",
                self.width, self.height
            )));
        }
        if self.title.is_empty() {
            return Err(ShellError::WindowCreation("empty window title".to_string()));
        }
        if self.gl_version[0] == 0 {
            return Err(ShellError::WindowCreation(format!(
                "invalid OpenGL version {}.{}",
                self.gl_version[0], self.gl_version[1]
            )));
        }
        Ok(())
    }
}

/// Builder entry point.
///
/// ```rust,ignore
/// let mut shell = App::new().with_title("Cube").with_size(640, 480).build()?;
/// let mut cube = Cube::new(shell.gl())?;
/// shell.run(&mut cube);
/// ```
#[derive(Debug, Clone, Default)]
pub struct App {
    config: AppConfig,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.config.title = title.to_string();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.config.vsync = vsync;
        self
    }

    pub fn with_gl_version(mut self, major: u8, minor: u8) -> Self {
        self.config.gl_version = [major, minor];
        self
    }

    pub fn with_core_profile(mut self, core: bool) -> Self {
        self.config.core_profile = core;
        self
    }

    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.config.resizable = resizable;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Create the window and make its GL context current on this thread.
    #[cfg(not(any(target_arch = "wasm32", target_os = "android", target_os = "ios")))]
    pub fn build(self) -> Result<crate::Shell<crate::GlutinPlatform>> {
        crate::Shell::new(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let app = App::new()
            .with_title("t")
            .with_size(800, 600)
            .with_vsync(false)
            .with_gl_version(3, 3);
        let config = app.config();
        assert_eq!(config.title, "t");
        assert_eq!((config.width, config.height), (800, 600));
        assert!(!config.vsync);
        assert_eq!(config.gl_version, [3, 3]);
        assert!(config.core_profile);
    }

    #[test]
    fn toml_fills_missing_keys_with_defaults() {
        let config = AppConfig::from_toml_str("title = \"Cube\"\nwidth = 1024\n").unwrap();
        assert_eq!(config.title, "Cube");
        assert_eq!(config.width, 1024);
        assert_eq!(config.height, 480);
        assert_eq!(config.gl_version, [4, 3]);
    }

    #[test]
    fn toml_rejects_unknown_keys() {
        let err = AppConfig::from_toml_str("fullscreen = true\n").unwrap_err();
        assert!(matches!(err, ShellError::Config(_)));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load(dir.path().join("lumen.toml")).unwrap_err();
        assert!(err.to_string().contains("lumen.toml"));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lumen.toml");
        std::fs::write(&path, "vsync = false\ngl_version = [3, 3]\n").unwrap();
        let config = AppConfig::load(&path).unwrap();
        assert!(!config.vsync);
        assert_eq!(config.gl_version, [3, 3]);
    }

    #[test]
    fn validation() {
        assert!(AppConfig::default().validate().is_ok());
        let zero = AppConfig {
            width: 0,
            ..AppConfig::default()
        };
        assert!(matches!(zero.validate(), Err(ShellError::WindowCreation(_))));
        let untitled = AppConfig {
            title: String::new(),
            ..AppConfig::default()
        };
        assert!(matches!(untitled.validate(), Err(ShellError::WindowCreation(_))));
    }
}
