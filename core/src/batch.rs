//! file: core/src/batch.rs
//! description: whole-project translation.
//!
//! Discovers every `.py` file under a project directory, translates each one
//! with its own lowering state and writes the C++ next to the project under
//! `build.cpp_dir`, mirroring the source layout. Whether one failed file
//! stops the batch is the caller's choice (`BatchPolicy`).

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{Level, SerpentErrorExt};
use crate::location::{Location, Span};
use crate::script::Script;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchPolicy {
    /// Stop at the first file that fails.
    Abort,
    /// Record the failure and carry on with the next file.
    Skip,
}

impl BatchPolicy {
    pub fn from_config(config: &Config) -> Self {
        if config.build.skip_failed {
            BatchPolicy::Skip
        } else {
            BatchPolicy::Abort
        }
    }
}

#[derive(Debug, Clone)]
pub struct TranslatedFile {
    pub source: PathBuf,
    pub output: PathBuf,
}

/// A file that could not be translated. `content` is kept so reports can
/// quote the offending line.
#[derive(Debug)]
pub struct FileFailure {
    pub source: PathBuf,
    pub content: Option<String>,
    pub error: Box<dyn SerpentErrorExt>,
}

#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub translated: Vec<TranslatedFile>,
    pub failures: Vec<FileFailure>,
    /// Set when `BatchPolicy::Abort` cut the batch short.
    pub aborted: bool,
}

impl BatchOutcome {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn outputs(&self) -> Vec<PathBuf> {
        self.translated.iter().map(|t| t.output.clone()).collect()
    }
}

/// Host-level failure that prevents the batch from running at all.
#[derive(Debug, Clone)]
pub struct BatchError {
    pub path: PathBuf,
    pub reason: String,
}

impl std::fmt::Display for BatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.reason)
    }
}

impl std::error::Error for BatchError {}

impl SerpentErrorExt for BatchError {
    fn level(&self) -> Level {
        Level::Critical
    }

    fn message(&self) -> String {
        self.to_string()
    }

    fn issuer(&self) -> String {
        "serpent.batch".to_string()
    }

    fn span(&self) -> Option<Span> {
        None
    }

    fn location(&self) -> Option<Location> {
        None
    }
}

fn batch_error(path: &Path, reason: impl Into<String>) -> BatchError {
    BatchError {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

/// All `.py` files below `dir`, sorted, excluding the configured output
/// directories.
pub fn discover_sources(dir: &Path, config: &Config) -> Result<Vec<PathBuf>, BatchError> {
    if !dir.is_dir() {
        return Err(batch_error(dir, "not a directory"));
    }
    let pattern = format!(
        "{}/**/*.py",
        glob::Pattern::escape(&dir.to_string_lossy())
    );
    let excluded = [dir.join(&config.build.cpp_dir), dir.join(&config.build.obj_dir)];
    let entries = glob::glob(&pattern).map_err(|e| batch_error(dir, format!("glob error: {}", e)))?;

    let mut sources = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| batch_error(dir, format!("glob error: {}", e)))?;
        if excluded.iter().any(|ex| path.starts_with(ex)) {
            continue;
        }
        if path.is_file() {
            sources.push(path);
        }
    }
    sources.sort();
    log::info!("found {} source files under {}", sources.len(), dir.display());
    Ok(sources)
}

/// Mirror `source` (relative to `root`) under `root/out_dir`, swapping the
/// extension for `ext`.
pub fn mirrored_path(root: &Path, source: &Path, out_dir: &str, ext: &str) -> PathBuf {
    let relative = source.strip_prefix(root).unwrap_or(source);
    let relative = match relative.file_name() {
        Some(_) => relative.to_path_buf(),
        None => PathBuf::from("main"),
    };
    root.join(out_dir).join(relative).with_extension(ext)
}

pub fn translate_project(dir: &Path, config: &Config, policy: BatchPolicy) -> Result<BatchOutcome, BatchError> {
    translate_project_with(dir, config, policy, |_| {})
}

/// Like `translate_project`, calling `on_file` before each file is handled.
pub fn translate_project_with<F>(
    dir: &Path,
    config: &Config,
    policy: BatchPolicy,
    mut on_file: F,
) -> Result<BatchOutcome, BatchError>
where
    F: FnMut(&Path),
{
    let sources = discover_sources(dir, config)?;
    let mut outcome = BatchOutcome::default();

    for source in sources {
        on_file(&source);
        let failure = match Script::new(source.clone()) {
            Err(err) => Some(FileFailure {
                source: source.clone(),
                content: None,
                error: Box::new(err),
            }),
            Ok(script) => match crate::translate_source(&script, config) {
                Ok(cpp) => {
                    let output = mirrored_path(dir, &source, &config.build.cpp_dir, "cpp");
                    write_output(&output, &cpp)?;
                    log::info!("translated {} -> {}", source.display(), output.display());
                    outcome.translated.push(TranslatedFile { source, output });
                    None
                }
                Err(err) => Some(FileFailure {
                    source: source.clone(),
                    content: Some(script.content),
                    error: Box::new(err),
                }),
            },
        };

        if let Some(failure) = failure {
            log::warn!("failed to translate {}", failure.source.display());
            outcome.failures.push(failure);
            if policy == BatchPolicy::Abort {
                outcome.aborted = true;
                break;
            }
        }
    }
    Ok(outcome)
}

fn write_output(path: &Path, text: &str) -> Result<(), BatchError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| batch_error(parent, format!("create dir: {}", e)))?;
    }
    std::fs::write(path, text).map_err(|e| batch_error(path, format!("write: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirrored_path_keeps_relative_layout() {
        let root = Path::new("/proj");
        assert_eq!(
            mirrored_path(root, Path::new("/proj/pkg/util.py"), "cpp", "cpp"),
            PathBuf::from("/proj/cpp/pkg/util.cpp")
        );
        assert_eq!(
            mirrored_path(root, Path::new("/proj/cpp/main.cpp"), "obj", "o"),
            PathBuf::from("/proj/obj/cpp/main.o")
        );
    }

    #[test]
    fn policy_follows_config() {
        let mut config = Config::default();
        assert_eq!(BatchPolicy::from_config(&config), BatchPolicy::Abort);
        config.build.skip_failed = true;
        assert_eq!(BatchPolicy::from_config(&config), BatchPolicy::Skip);
    }
}
