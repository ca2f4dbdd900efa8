use std::path::PathBuf;

use crate::SerpentErrorExt;

/// A source file queued for translation.
#[derive(Debug, Clone)]
pub struct Script {
    pub name: String,
    pub path: PathBuf,
    pub content: String,
}

impl Script {
    pub fn new(path: PathBuf) -> Result<Self, MissingScriptError> {
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let content = std::fs::read_to_string(&path).map_err(|e| MissingScriptError {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        // Diagnostics name files by absolute path when one can be resolved.
        let path = std::fs::canonicalize(&path).unwrap_or(path);
        Ok(Script {
            name,
            path,
            content,
        })
    }

    /// Build a script from in-memory source, e.g. for tests or stdin input.
    pub fn from_source(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        Script {
            name,
            path,
            content: content.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }

    pub fn display_path(&self) -> String {
        self.path.display().to_string()
    }

    /// The 1-based `line` of the source, if present.
    pub fn line(&self, line: usize) -> Option<&str> {
        self.content.lines().nth(line.checked_sub(1)?)
    }
}

impl std::fmt::Display for Script {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Script: {} at {:?}", self.name, self.path)
    }
}

#[derive(Debug, Clone)]
pub struct MissingScriptError {
    pub path: PathBuf,
    pub reason: String,
}

impl std::fmt::Display for MissingScriptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Missing script at {:?}: {}", self.path, self.reason)
    }
}

impl std::error::Error for MissingScriptError {}

impl SerpentErrorExt for MissingScriptError {
    fn level(&self) -> crate::Level {
        crate::Level::Critical
    }

    fn message(&self) -> String {
        self.to_string()
    }

    fn issuer(&self) -> String {
        "serpent.script".to_string()
    }

    fn span(&self) -> Option<crate::location::Span> {
        None
    }

    fn location(&self) -> Option<crate::location::Location> {
        None
    }
}
