//! file: core/src/error.rs
//! description: error levels, the shared error trait and translation errors.
//!
//! Every error surfaced by the core implements `SerpentErrorExt` so callers
//! can render them uniformly. Translation failures use the closed
//! `ErrorKind` enumeration carried by `TranslateError`.

use std::fmt;

use crate::location::{Location, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Info,
    Warning,
    Error,
    Critical,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level_str = match self {
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
        };
        write!(f, "{}", level_str)
    }
}

pub trait SerpentErrorExt {
    fn level(&self) -> Level;
    fn message(&self) -> String;
    fn issuer(&self) -> String;
    fn span(&self) -> Option<Span>;
    fn location(&self) -> Option<Location>;
}

impl fmt::Debug for dyn SerpentErrorExt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let loc_str = match self.location() {
            Some(loc) => format!("{}:{}:{}", loc.file, loc.line, loc.column),
            None => "unknown".to_string(),
        };
        let span_str = match self.span() {
            Some(span) => span.to_string(),
            None => "span:none".to_string(),
        };

        write!(
            f,
            "SERPENT | {} | {} | {} | {} | {}",
            self.level(),
            loc_str,
            self.issuer(),
            span_str,
            self.message()
        )
    }
}

impl fmt::Display for dyn SerpentErrorExt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Closed set of reasons a translation can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An annotation or type name has no C++ counterpart.
    UnknownType,
    /// An operator has no C++ counterpart.
    UnknownOperator,
    /// A non-constructor function is missing its return annotation.
    FunctionType,
    /// Any other construct the lowering does not support.
    Translation,
    /// The front end rejected the source text.
    Syntax,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::UnknownType => "UnknownTypeError",
            ErrorKind::UnknownOperator => "UnknownOperatorError",
            ErrorKind::FunctionType => "FunctionTypeError",
            ErrorKind::Translation => "TranslationError",
            ErrorKind::Syntax => "SyntaxError",
        };
        write!(f, "{}", name)
    }
}

/// A failure raised while turning one source file into C++.
///
/// Once a `TranslateError` has been tagged with a source location it keeps
/// that tag; re-tagging an already tagged error is a no-op (see
/// `lower::diagnostics`).
#[derive(Debug, Clone)]
pub struct TranslateError {
    kind: ErrorKind,
    message: String,
    issuer: String,
    location: Option<Location>,
    span: Option<Span>,
    cause: Option<Box<TranslateError>>,
}

impl TranslateError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, issuer: impl Into<String>) -> Self {
        TranslateError {
            kind,
            message: message.into(),
            issuer: issuer.into(),
            location: None,
            span: None,
            cause: None,
        }
    }

    pub fn unknown_type(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownType, message, "serpent.lower.tables")
    }

    pub fn unknown_operator(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownOperator, message, "serpent.lower.tables")
    }

    pub fn function_type(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::FunctionType, message, "serpent.lower.objects")
    }

    pub fn translation(message: impl Into<String>, issuer: impl Into<String>) -> Self {
        Self::new(ErrorKind::Translation, message, issuer)
    }

    pub fn syntax(message: impl Into<String>, location: Option<Location>) -> Self {
        TranslateError {
            location,
            ..Self::new(ErrorKind::Syntax, message, "serpent.ast.frontend")
        }
    }

    /// Wrap `cause` into a new error of the same kind whose message is
    /// prefixed with `tag` and which records `location` and the source
    /// `span` of the failing construct.
    pub fn tagged(cause: TranslateError, tag: &str, location: Location, span: Option<Span>) -> Self {
        TranslateError {
            kind: cause.kind,
            message: format!("{} failed to compile due to: {}", tag, cause.message),
            issuer: cause.issuer.clone(),
            location: Some(location),
            span,
            cause: Some(Box::new(cause)),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn is_tagged(&self) -> bool {
        self.location.is_some()
    }

    pub fn cause(&self) -> Option<&TranslateError> {
        self.cause.as_deref()
    }

    /// The innermost error in the cause chain.
    pub fn root_cause(&self) -> &TranslateError {
        let mut current = self;
        while let Some(next) = current.cause() {
            current = next;
        }
        current
    }
}

impl fmt::Display for TranslateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for TranslateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}

impl SerpentErrorExt for TranslateError {
    fn level(&self) -> Level {
        Level::Error
    }

    fn message(&self) -> String {
        self.message.clone()
    }

    fn issuer(&self) -> String {
        self.issuer.clone()
    }

    fn span(&self) -> Option<Span> {
        self.span.clone()
    }

    fn location(&self) -> Option<Location> {
        self.location.clone()
    }
}

pub type TranslateResult<T> = Result<T, TranslateError>;
