//! file: core/src/lower/buffer.rs
//! description: indentation-aware text accumulator for emitted C++.

use std::collections::BTreeSet;

pub const DEFAULT_INDENT_WIDTH: usize = 4;

/// Ordered emitted fragments plus the indentation and line-start state that
/// decide how the next fragment is prefixed.
#[derive(Debug, Clone)]
pub struct EmitBuffer {
    fragments: Vec<String>,
    indent_width: usize,
    depth: usize,
    line_start: bool,
}

impl Default for EmitBuffer {
    fn default() -> Self {
        EmitBuffer::new(DEFAULT_INDENT_WIDTH)
    }
}

impl EmitBuffer {
    pub fn new(indent_width: usize) -> Self {
        EmitBuffer {
            fragments: Vec::new(),
            indent_width,
            depth: 0,
            line_start: true,
        }
    }

    /// Write `fragment`, indenting it only when it opens a line.
    pub fn append(&mut self, fragment: &str) {
        let text = if self.line_start {
            format!("{}{}", " ".repeat(self.indent_width * self.depth), fragment)
        } else {
            fragment.to_string()
        };
        log::trace!("emit {:?}", text);
        self.fragments.push(text);
        self.line_start = false;
    }

    /// Terminate the current line with `terminator` (normally `;`).
    pub fn end_statement(&mut self, terminator: &str) {
        self.append(&format!("{}\n", terminator));
        self.line_start = true;
    }

    pub fn push_indent(&mut self) {
        self.depth += 1;
    }

    pub fn pop_indent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_line_start(&self) -> bool {
        self.line_start
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// Render include directives, a blank separator and the fragments.
    pub fn serialize(&self, includes: &BTreeSet<String>) -> String {
        let mut out = String::new();
        for include in includes {
            out.push_str(&format!("#include {}\n", include));
        }
        out.push_str("\n\n");
        for fragment in &self.fragments {
            out.push_str(fragment);
        }
        out
    }
}
