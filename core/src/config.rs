//! file: core/src/config.rs
//! description: project configuration (`serpent.json`) and discovery helpers.
//!
//! A project may carry a `serpent.json` next to its sources. Every field is
//! optional; a missing file means all defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Level, SerpentErrorExt};
use crate::location::{Location, Span};

pub const CONFIG_FILE_NAME: &str = "serpent.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Preferred compiler executable, e.g. `clang++`.
    #[serde(default)]
    pub compiler: Option<String>,
    #[serde(default)]
    pub flags: Vec<String>,
    #[serde(default = "default_cpp_dir")]
    pub cpp_dir: String,
    #[serde(default = "default_obj_dir")]
    pub obj_dir: String,
    #[serde(default = "default_output")]
    pub output: String,
    /// Keep going when a file fails to translate.
    #[serde(default)]
    pub skip_failed: bool,
}

fn default_cpp_dir() -> String { "cpp".to_string() }
fn default_obj_dir() -> String { "obj".to_string() }
fn default_output() -> String { "main".to_string() }

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            compiler: None,
            flags: Vec::new(),
            cpp_dir: default_cpp_dir(),
            obj_dir: default_obj_dir(),
            output: default_output(),
            skip_failed: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_indent_width")]
    pub indent_width: usize,
    /// Name of the implicit method receiver, elided from method signatures.
    #[serde(default = "default_receiver")]
    pub receiver: String,
    #[serde(default)]
    pub build: BuildConfig,
}

fn default_indent_width() -> usize { 4 }
fn default_receiver() -> String { "self".to_string() }

impl Default for Config {
    fn default() -> Self {
        Config {
            indent_width: default_indent_width(),
            receiver: default_receiver(),
            build: BuildConfig::default(),
        }
    }
}

impl Config {
    /// Load a config from a JSON file path.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::new(path, format!("read config: {}", e)))?;
        let config: Config = serde_json::from_str(&raw)
            .map_err(|e| ConfigError::new(path, format!("parse config: {}", e)))?;
        config.validate().map_err(|reason| ConfigError::new(path, reason))?;
        Ok(config)
    }

    /// Load `serpent.json` from `dir` if present, otherwise return defaults.
    pub fn discover<P: AsRef<Path>>(dir: P) -> Result<Config, ConfigError> {
        let path = dir.as_ref().join(CONFIG_FILE_NAME);
        if path.is_file() {
            log::info!("using config {}", path.display());
            Config::load_from_file(path)
        } else {
            Ok(Config::default())
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(1..=16).contains(&self.indent_width) {
            return Err(format!("indent_width must be between 1 and 16, got {}", self.indent_width));
        }
        if self.receiver.trim().is_empty() {
            return Err("receiver name is empty".to_string());
        }
        if self.build.output.trim().is_empty() {
            return Err("build.output is empty".to_string());
        }
        if self.build.cpp_dir == self.build.obj_dir {
            return Err(format!(
                "build.cpp_dir and build.obj_dir must differ (both '{}')",
                self.build.cpp_dir
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ConfigError {
    pub path: PathBuf,
    pub reason: String,
}

impl ConfigError {
    fn new(path: &Path, reason: String) -> Self {
        ConfigError {
            path: path.to_path_buf(),
            reason,
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid config {}: {}", self.path.display(), self.reason)
    }
}

impl std::error::Error for ConfigError {}

impl SerpentErrorExt for ConfigError {
    fn level(&self) -> Level {
        Level::Critical
    }

    fn message(&self) -> String {
        self.to_string()
    }

    fn issuer(&self) -> String {
        "serpent.config".to_string()
    }

    fn span(&self) -> Option<Span> {
        None
    }

    fn location(&self) -> Option<Location> {
        None
    }
}
