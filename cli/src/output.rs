/// cli/src/output.rs
/// Output utilities for CLI
/// description: Styles, the batch progress bar and the summary tables
/// printed by `build` and `compilers`.

use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use console::Style;
use cpp_toolchain::Compiler;
use indicatif::{ProgressBar, ProgressStyle};
use serpent_core::BatchOutcome;

/// Styles for different output elements
pub struct FormatStyle {
    pub title: Style,
    pub info: Style,
    pub warning: Style,
    pub error: Style,
    pub success: Style,
}

impl Default for FormatStyle {
    fn default() -> Self {
        FormatStyle {
            title: Style::new().bold().underlined(),
            info: Style::new().cyan(),
            warning: Style::new().yellow(),
            error: Style::new().red().bold(),
            success: Style::new().green().bold(),
        }
    }
}

/// Progress bar for a batch of `total` files. Hidden when `quiet`, e.g.
/// when stdout carries JSON.
pub fn setup_progress_bar(total: usize, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(total as u64);
    let style = ProgressStyle::with_template("  {spinner:.cyan} {wide_msg}  {bar:40.cyan/blue}  {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
    pb.set_style(style);
    pb
}

/// One row per source file: translated ones with their output, failed ones
/// with the reason.
pub fn summary_table(outcome: &BatchOutcome) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Source", "Status", "Output"]);

    for file in &outcome.translated {
        table.add_row(vec![
            file.source.display().to_string(),
            "ok".to_string(),
            file.output.display().to_string(),
        ]);
    }
    for failure in &outcome.failures {
        table.add_row(vec![
            failure.source.display().to_string(),
            "failed".to_string(),
            failure.error.message(),
        ]);
    }
    table
}

pub fn compilers_table(compilers: &[Compiler]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Name", "Path", "Version"]);
    for c in compilers {
        table.add_row(vec![
            c.name.clone(),
            c.path.display().to_string(),
            c.version.clone().unwrap_or_else(|| "unknown".to_string()),
        ]);
    }
    table
}
