//! C++ compiler discovery and invocation for generated sources.
//!
//! Finds a compiler on `PATH` (via `which`), compiles translated `.cpp`
//! files to objects, links them and runs the result. Process failures are
//! reported as `ToolchainError` with the compiler's captured stderr.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use serde::Serialize;

/// Compilers tried in order when no hint is given.
pub fn candidate_compilers() -> Vec<&'static str> {
    #[cfg(target_os = "windows")]
    return vec!["g++", "clang++"];
    #[cfg(not(target_os = "windows"))]
    return vec!["g++", "clang++", "c++"];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Compiler {
    pub name: String,
    pub path: PathBuf,
    pub version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolchainError {
    /// Neither the hint nor any candidate is on `PATH`.
    NoCompiler { hint: Option<String> },
    /// The process could not be started.
    Spawn { program: String, reason: String },
    /// The process ran and exited unsuccessfully.
    Failed { program: String, code: Option<i32>, stderr: String },
    Io { path: PathBuf, reason: String },
}

impl fmt::Display for ToolchainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolchainError::NoCompiler { hint: Some(hint) } => {
                write!(f, "compiler '{}' not found and no fallback C++ compiler is installed", hint)
            }
            ToolchainError::NoCompiler { hint: None } => {
                write!(f, "No supported C++ compiler found on the system")
            }
            ToolchainError::Spawn { program, reason } => {
                write!(f, "Failed to execute '{}': {}", program, reason)
            }
            ToolchainError::Failed { program, code, stderr } => {
                let code = code.map(|c| c.to_string()).unwrap_or_else(|| "signal".to_string());
                write!(f, "'{}' exited with {}:\n{}", program, code, stderr.trim_end())
            }
            ToolchainError::Io { path, reason } => write!(f, "{}: {}", path.display(), reason),
        }
    }
}

impl std::error::Error for ToolchainError {}

/// Find available compilers from a list of candidate names (uses `which`).
pub fn find_available_compilers_from(candidates: &[&str]) -> Vec<(String, PathBuf)> {
    let mut found = Vec::new();
    for c in candidates {
        if let Ok(p) = which::which(c) {
            found.push((c.to_string(), p));
        }
    }
    found
}

/// All default candidates that are installed, with their version line.
pub fn find_available_compilers() -> Vec<Compiler> {
    find_available_compilers_from(&candidate_compilers())
        .into_iter()
        .map(|(name, path)| {
            let version = get_compiler_version(&path);
            Compiler { name, path, version }
        })
        .collect()
}

pub fn compilers_json(compilers: &[Compiler]) -> String {
    serde_json::to_string(compilers).unwrap_or_else(|_| "[]".to_string())
}

/// First line of `<compiler> --version`.
pub fn get_compiler_version(path: &Path) -> Option<String> {
    let out = Command::new(path).arg("--version").output().ok()?;
    let combined = format!(
        "{}\n{}",
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr)
    );
    combined
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
}

/// Resolve `hint` on `PATH`, falling back to the first installed candidate.
pub fn select_compiler(hint: Option<&str>) -> Result<(String, PathBuf), ToolchainError> {
    if let Some(h) = hint {
        if let Ok(p) = which::which(h) {
            return Ok((h.to_string(), p));
        }
        log::warn!("compiler '{}' not found, trying defaults", h);
    }
    find_available_compilers_from(&candidate_compilers())
        .into_iter()
        .next()
        .ok_or_else(|| ToolchainError::NoCompiler {
            hint: hint.map(str::to_string),
        })
}

/// Platform executable name for `base`.
pub fn executable_name(base: &str) -> String {
    if cfg!(target_os = "windows") && !base.ends_with(".exe") {
        format!("{}.exe", base)
    } else {
        base.to_string()
    }
}

/// Build a compiler command: sources, flags, then `-o out`. With
/// `compile_only` the command produces an object (`-c`).
pub fn build_compile_command(
    path: &Path,
    sources: &[PathBuf],
    flags: &[String],
    out: &Path,
    compile_only: bool,
) -> Command {
    let mut cmd = Command::new(path);
    if compile_only {
        cmd.arg("-c");
    }
    for src in sources {
        cmd.arg(src);
    }
    for f in flags {
        cmd.arg(f);
    }
    cmd.arg("-o");
    cmd.arg(out);
    cmd
}

/// A selected compiler plus the extra flags passed on every invocation.
#[derive(Debug, Clone)]
pub struct Toolchain {
    pub name: String,
    pub path: PathBuf,
    pub flags: Vec<String>,
}

impl Toolchain {
    pub fn detect(hint: Option<&str>, flags: &[String]) -> Result<Self, ToolchainError> {
        let (name, path) = select_compiler(hint)?;
        log::info!("using compiler {} at {}", name, path.display());
        Ok(Toolchain {
            name,
            path,
            flags: flags.to_vec(),
        })
    }

    /// `<cc> -c src flags -o obj`
    pub fn compile_object(&self, src: &Path, obj: &Path) -> Result<(), ToolchainError> {
        ensure_parent(obj)?;
        let cmd = build_compile_command(&self.path, &[src.to_path_buf()], &self.flags, obj, true);
        self.run(cmd)
    }

    /// `<cc> objs flags -o out`; returns the executable path.
    pub fn link_objects(&self, objs: &[PathBuf], out: &Path) -> Result<PathBuf, ToolchainError> {
        ensure_parent(out)?;
        let cmd = build_compile_command(&self.path, objs, &self.flags, out, false);
        self.run(cmd)?;
        Ok(out.to_path_buf())
    }

    fn run(&self, mut cmd: Command) -> Result<(), ToolchainError> {
        log::debug!("running {:?}", cmd);
        let output = cmd.output().map_err(|e| ToolchainError::Spawn {
            program: self.name.clone(),
            reason: e.to_string(),
        })?;
        if !output.status.success() {
            return Err(ToolchainError::Failed {
                program: self.name.clone(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }
        Ok(())
    }
}

fn ensure_parent(path: &Path) -> Result<(), ToolchainError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|e| ToolchainError::Io {
                path: parent.to_path_buf(),
                reason: e.to_string(),
            })
        }
        _ => Ok(()),
    }
}

/// Run a built executable with inherited stdio and return its exit status.
pub fn run_binary(path: &Path) -> Result<ExitStatus, ToolchainError> {
    Command::new(path).status().map_err(|e| ToolchainError::Spawn {
        program: path.display().to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_command_places_output_last() {
        let cmd = build_compile_command(
            Path::new("g++"),
            &[PathBuf::from("a.cpp")],
            &["-O2".to_string()],
            Path::new("obj/a.o"),
            true,
        );
        let args: Vec<String> = cmd.get_args().map(|a| a.to_string_lossy().to_string()).collect();
        assert_eq!(args, vec!["-c", "a.cpp", "-O2", "-o", "obj/a.o"]);
    }

    #[test]
    fn unknown_hint_without_fallbacks_reports_hint() {
        let err = ToolchainError::NoCompiler { hint: Some("zz++".into()) };
        assert!(err.to_string().contains("zz++"));
    }

    #[test]
    fn failed_error_includes_stderr() {
        let err = ToolchainError::Failed {
            program: "g++".into(),
            code: Some(1),
            stderr: "main.cpp:1: error\n".into(),
        };
        assert_eq!(err.to_string(), "'g++' exited with 1:\nmain.cpp:1: error");
    }
}
