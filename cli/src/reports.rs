/// cli/src/reports.rs
/// Diagnostic reports for the CLI
/// description: Converts translation, configuration and toolchain failures
/// into `Report`s that can be printed with a source snippet or exported as
/// JSON. `ReportCollector` aggregates them and decides the exit code.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use console::Style;
use cpp_toolchain::ToolchainError;
use serde::{Deserialize, Serialize};
use serpent_core::batch::FileFailure;
use serpent_core::{Level, SerpentErrorExt};

/// Severity levels for reports
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Fatal,
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Fatal => "FATAL",
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
            Severity::Info => "INFO",
        };
        write!(f, "{}", s)
    }
}

impl From<Level> for Severity {
    fn from(level: Level) -> Self {
        match level {
            Level::Critical => Severity::Fatal,
            Level::Error => Severity::Error,
            Level::Warning => Severity::Warning,
            Level::Info => Severity::Info,
        }
    }
}

/// Stage of the pipeline a report came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Config,
    Translate,
    Compile,
    Link,
    Run,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Config => "config",
            Stage::Translate => "translate",
            Stage::Compile => "compile",
            Stage::Link => "link",
            Stage::Run => "run",
        };
        write!(f, "{}", s)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportLocation {
    pub file: String,
    pub line: usize,
    pub column: usize,
    /// Column just past the failing construct when it ends on the same line.
    pub end_column: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub message: String,
    pub severity: Severity,
    pub stage: Stage,
    pub issuer: String,
    /// File the report is about, when known.
    pub file: Option<String>,
    pub location: Option<ReportLocation>,
    /// The offending source line, quoted in pretty output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

impl Report {
    pub fn new(message: &str, severity: Severity, stage: Stage, issuer: &str) -> Self {
        Report {
            message: message.to_string(),
            severity,
            stage,
            issuer: issuer.to_string(),
            file: None,
            location: None,
            snippet: None,
        }
    }

    pub fn with_file(mut self, file: &Path) -> Self {
        self.file = Some(file.display().to_string());
        self
    }

    /// Build a report from any core error.
    pub fn from_error(error: &dyn SerpentErrorExt, stage: Stage) -> Self {
        let mut report = Report::new(
            &error.message(),
            Severity::from(error.level()),
            stage,
            &error.issuer(),
        );
        if let Some(loc) = error.location() {
            let end_column = error
                .span()
                .filter(|span| span.start.line == span.end.line && span.start.line == loc.line)
                .map(|span| span.end.column);
            report.file = Some(loc.file.clone());
            report.location = Some(ReportLocation {
                file: loc.file,
                line: loc.line,
                column: loc.column,
                end_column,
            });
        }
        report
    }

    /// A failed file from a batch, quoting the offending line when the
    /// source text was read.
    pub fn from_failure(failure: &FileFailure) -> Self {
        let mut report = Report::from_error(failure.error.as_ref(), Stage::Translate);
        if report.file.is_none() {
            report.file = Some(failure.source.display().to_string());
        }
        if let (Some(content), Some(loc)) = (&failure.content, &report.location) {
            report.snippet = loc
                .line
                .checked_sub(1)
                .and_then(|idx| content.lines().nth(idx))
                .map(str::to_string);
        }
        report
    }

    /// Missing compilers and spawn or filesystem failures are fatal; a
    /// compiler that ran and rejected its input is an ordinary error.
    pub fn from_toolchain(error: &ToolchainError, stage: Stage, file: Option<&Path>) -> Self {
        let severity = match error {
            ToolchainError::Failed { .. } => Severity::Error,
            _ => Severity::Fatal,
        };
        let report = Report::new(&error.to_string(), severity, stage, "serpent.toolchain");
        match file {
            Some(path) => report.with_file(path),
            None => report,
        }
    }

    /// Render with the source snippet and carets under the failing construct.
    pub fn render_pretty(&self) -> String {
        let header = Style::new().bold();
        let sev = match self.severity {
            Severity::Fatal => Style::new().on_red().white().bold(),
            Severity::Error => Style::new().red().bold(),
            Severity::Warning => Style::new().yellow().bold(),
            Severity::Info => Style::new().blue().bold(),
        };

        let mut out = format!(
            "{} {}\n",
            sev.apply_to(format!("[{}]", self.severity)),
            header.apply_to(&self.message)
        );

        if let Some(loc) = &self.location {
            out.push_str(&format!(" --> {}:{}:{}\n", loc.file, loc.line, loc.column));
            if let Some(line_str) = &self.snippet {
                out.push_str(&format!(" {:4} | {}\n", loc.line, line_str));
                let col = loc.column.saturating_sub(1);
                let width = loc
                    .end_column
                    .map(|end| end.saturating_sub(loc.column))
                    .unwrap_or(1)
                    .max(1);
                let caret_line = format!("      | {}{}", " ".repeat(col), "^".repeat(width));
                out.push_str(&format!("{}\n", Style::new().green().apply_to(caret_line)));
            }
        } else if let Some(file) = &self.file {
            out.push_str(&format!(" --> {}\n", file));
        }
        out
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let loc = match (&self.location, &self.file) {
            (Some(l), _) => format!(" at {}:{}:{}", l.file, l.line, l.column),
            (None, Some(file)) => format!(" in {}", file),
            (None, None) => "".to_string(),
        };
        write!(f, "[{}]{} ({}): {}", self.severity, loc, self.stage, self.message)
    }
}

impl std::error::Error for Report {}

/// Collector that aggregates reports, drops duplicates and decides the
/// process exit code.
#[derive(Debug, Clone, Default)]
pub struct ReportCollector {
    pub reports: Vec<Report>,
    seen: HashSet<(String, Option<String>)>, // (message, file)
}

impl ReportCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, r: Report) {
        let key = (r.message.clone(), r.file.clone());
        if self.seen.insert(key) {
            self.reports.push(r);
        }
    }

    pub fn extend(&mut self, others: impl IntoIterator<Item = Report>) {
        for r in others {
            self.push(r);
        }
    }

    pub fn counts(&self) -> (usize, usize, usize, usize) {
        let mut f = 0;
        let mut e = 0;
        let mut w = 0;
        let mut i = 0;
        for r in &self.reports {
            match r.severity {
                Severity::Fatal => f += 1,
                Severity::Error => e += 1,
                Severity::Warning => w += 1,
                Severity::Info => i += 1,
            }
        }
        (f, e, w, i)
    }

    /// 0 = clean or warnings only, 1 = errors, 2 = fatal
    pub fn exit_code(&self) -> i32 {
        let (f, e, _, _) = self.counts();
        if f > 0 {
            2
        } else if e > 0 {
            1
        } else {
            0
        }
    }

    pub fn print_all_pretty(&self) {
        for r in &self.reports {
            eprint!("{}", r.render_pretty());
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.reports)
    }
}
