//! file: core/src/lower/lowering_context.rs
//! description: per-file mutable state threaded through the lowering.
//!
//! `TranslationState` is created when a file starts lowering and consumed
//! when its text is serialized. Nothing in it outlives the file, so every
//! file gets a fresh one.

use std::collections::BTreeSet;

use super::buffer::EmitBuffer;
use super::scope::DeclarationTracker;

#[derive(Debug, Clone)]
pub struct TranslationState {
    /// Path used in diagnostic tags.
    pub file: String,
    pub buffer: EmitBuffer,
    pub declarations: DeclarationTracker,
    /// Headers required by the emitted code, e.g. `<string>`.
    pub includes: BTreeSet<String>,
    /// Name of the class whose body is being lowered, if any.
    pub current_class: Option<String>,
    /// Line of the most recently visited node that carried a location.
    pub current_line: usize,
}

impl TranslationState {
    pub fn new(file: impl Into<String>, indent_width: usize) -> Self {
        TranslationState {
            file: file.into(),
            buffer: EmitBuffer::new(indent_width),
            declarations: DeclarationTracker::new(),
            includes: BTreeSet::new(),
            current_class: None,
            current_line: 0,
        }
    }

    pub fn require_header(&mut self, header: &str) {
        if self.includes.insert(header.to_string()) {
            log::debug!("{} now requires {}", self.file, header);
        }
    }

    pub fn enclosing_class(&self) -> Option<&str> {
        self.current_class.as_deref()
    }

    /// Serialize the buffer with the collected includes.
    pub fn finish(self) -> String {
        self.buffer.serialize(&self.includes)
    }
}
