pub mod ast;
pub mod batch;
pub mod config;
pub mod error;
pub mod location;
pub mod lower;
pub mod script;

use std::path::Path;

pub use ast::generate_ast_from_source;
pub use batch::{translate_project, BatchOutcome, BatchPolicy};
pub use config::{Config, ConfigError};
pub use error::{ErrorKind, Level, SerpentErrorExt, TranslateError, TranslateResult};
pub use location::{Location, Span};
pub use lower::lower_ast_to_cpp;
pub use script::{MissingScriptError, Script};

pub fn generate_error_report<E: SerpentErrorExt + ?Sized>(error: &E) -> String {
    let level = error.level();
    let location = match error.location() {
        Some(loc) => loc.to_string(),
        None => "unknown location".to_string(),
    };
    let message = error.message();

    format!("SERPENT | {} | {} | {}", level, location, message)
}

/// Translate an in-memory script to C++ text.
pub fn translate_source(script: &Script, config: &Config) -> TranslateResult<String> {
    let ast = generate_ast_from_source(script)?;
    lower_ast_to_cpp(&ast, script, config)
}

/// Read and translate the file at `path`.
pub fn translate_file<P: AsRef<Path>>(path: P, config: &Config) -> Result<String, Box<dyn SerpentErrorExt>> {
    let script = Script::new(path.as_ref().to_path_buf())?;
    Ok(translate_source(&script, config)?)
}

impl From<MissingScriptError> for Box<dyn SerpentErrorExt> {
    fn from(err: MissingScriptError) -> Self {
        Box::new(err)
    }
}

impl From<TranslateError> for Box<dyn SerpentErrorExt> {
    fn from(err: TranslateError) -> Self {
        Box::new(err)
    }
}

impl From<ConfigError> for Box<dyn SerpentErrorExt> {
    fn from(err: ConfigError) -> Self {
        Box::new(err)
    }
}
